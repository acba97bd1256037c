// ui/cli.rs
//
// MOS command dispatch loop
// - read one line through the external editor into the shared CommandLine
// - CR: hand the bytes to the interpreter, report any error code
// - ESC (or any other terminator): print "<prompt>Escape", drop the line
// - buffer cleared at the top of every iteration
// - every command error is reported and survived; only a cancelled wait
//   (host only) ends the loop

use core::convert::Infallible;

use log::{debug, warn};

use crate::config::MosConfig;
use crate::error::{LinkError, MosError};
use crate::hal::SerialLink;
use crate::interp::{CommandInterpreter, ErrorCode};
use crate::ui::console::Console;
use crate::ui::line::{CommandLine, LineEditor, Terminator};

/// What one loop iteration did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Executed,
    Failed(ErrorCode),
    Escaped,
    /// The editor hit a link fault; the line was dropped.
    Discarded(LinkError),
}

pub struct Shell<'a> {
    prompt: char,
    console: Console<'a>,
    editor: &'a mut dyn LineEditor,
    interp: &'a mut dyn CommandInterpreter,
    line: CommandLine,
}

impl<'a> Shell<'a> {
    pub fn new(
        config: &MosConfig,
        link: &'a mut dyn SerialLink,
        editor: &'a mut dyn LineEditor,
        interp: &'a mut dyn CommandInterpreter,
        line: CommandLine,
    ) -> Self {
        Self { prompt: config.prompt, console: Console::new(link), editor, interp, line }
    }

    /// Run one read/execute/report iteration.
    pub fn step(&mut self) -> Result<Outcome, MosError> {
        self.line.clear();

        let key = match self.editor.read_line(&mut self.line) {
            Ok(key) => key,
            Err(LinkError::Interrupted) => return Err(MosError::Interrupted),
            Err(err) => {
                warn!("cli: line dropped: {}", err);
                return Ok(Outcome::Discarded(err));
            }
        };

        match Terminator::from_keycode(key) {
            Terminator::Accept => match self.interp.exec(self.line.as_bytes()) {
                Ok(()) => Ok(Outcome::Executed),
                Err(code) => {
                    debug!("cli: command failed with {}", code.get());
                    self.console.report(code);
                    Ok(Outcome::Failed(code))
                }
            },
            Terminator::Abort => {
                self.console.escape_notice(self.prompt);
                Ok(Outcome::Escaped)
            }
        }
    }

    /// Loop forever. Returns only when a blocking wait is cancelled.
    pub fn run(&mut self) -> Result<Infallible, MosError> {
        loop {
            self.step()?;
        }
    }

    pub fn line(&self) -> &CommandLine {
        &self.line
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{trace, written, Call, MockEditor, MockInterp, MockLink};
    use pretty_assertions::assert_eq;

    #[test]
    fn accepted_line_is_executed_and_error_reported() {
        let t = trace();
        let mut link = MockLink::new(&t, &[]);
        let mut editor = MockEditor::new(&t, &[(&b"DIR"[..], 13), (&b"CAT"[..], 13)]);
        let mut interp = MockInterp::new(&t, &[Err(ErrorCode::INVALID_NAME), Ok(())]);
        let cfg = MosConfig::new();
        let mut shell = Shell::new(&cfg, &mut link, &mut editor, &mut interp, CommandLine::new());

        assert_eq!(shell.step(), Ok(Outcome::Failed(ErrorCode::INVALID_NAME)));
        assert_eq!(shell.step(), Ok(Outcome::Executed));
        assert_eq!(shell.step(), Err(MosError::Interrupted));
        drop(shell);

        assert_eq!(interp.executed(), [b"DIR".to_vec(), b"CAT".to_vec()]);
        assert_eq!(written(&t), b"Invalid path name\n\r");
        let reads = t.borrow().iter().filter(|c| matches!(c, Call::ReadLine { .. })).count();
        assert_eq!(reads, 3);
    }

    #[test]
    fn escape_drops_partial_input() {
        let t = trace();
        let mut link = MockLink::new(&t, &[]);
        let mut editor = MockEditor::new(&t, &[(&b"DI"[..], 27), (&b""[..], 13)]);
        let mut interp = MockInterp::new(&t, &[Ok(())]);
        let cfg = MosConfig::new();
        let mut shell = Shell::new(&cfg, &mut link, &mut editor, &mut interp, CommandLine::new());

        assert_eq!(shell.step(), Ok(Outcome::Escaped));
        assert_eq!(shell.line().as_bytes(), b"DI");
        assert_eq!(shell.step(), Ok(Outcome::Executed));
        drop(shell);

        assert_eq!(editor.lengths_on_entry(), [0, 0]);
        assert_eq!(interp.executed(), [Vec::<u8>::new()]);
        assert_eq!(written(&t), b"*Escape\n\r");
    }

    #[test]
    fn unknown_error_code_still_prints() {
        let t = trace();
        let mut link = MockLink::new(&t, &[]);
        let mut editor = MockEditor::new(&t, &[(&b"FOO"[..], 13)]);
        let mut interp = MockInterp::new(&t, &[Err(ErrorCode::new(77).unwrap())]);
        let cfg = MosConfig::new();
        let mut shell = Shell::new(&cfg, &mut link, &mut editor, &mut interp, CommandLine::new());

        assert!(matches!(shell.step(), Ok(Outcome::Failed(_))));
        drop(shell);
        assert_eq!(written(&t), b"Unknown error 77\n\r");
    }

    #[test]
    fn link_fault_is_survived() {
        let t = trace();
        let mut link = MockLink::new(&t, &[]);
        let mut editor = MockEditor::new(&t, &[(&b"X"[..], 13)]).with_fault_first(LinkError::Overrun);
        let mut interp = MockInterp::new(&t, &[Ok(())]);
        let cfg = MosConfig::new();
        let mut shell = Shell::new(&cfg, &mut link, &mut editor, &mut interp, CommandLine::new());

        assert_eq!(shell.step(), Ok(Outcome::Discarded(LinkError::Overrun)));
        assert_eq!(shell.step(), Ok(Outcome::Executed));
        assert_eq!(shell.run(), Err(MosError::Interrupted));
    }
}
