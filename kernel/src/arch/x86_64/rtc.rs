//! CMOS real-time clock.

use ::x86_64::instructions::port::Port;
use log::debug;

use crate::hal::RealTimeClock;

const CMOS_ADDRESS: u16 = 0x70;
const CMOS_DATA: u16 = 0x71;

const REG_STATUS_A: u8 = 0x0A;
const REG_STATUS_B: u8 = 0x0B;

// NMI stays disabled while we hold the index register
const NMI_DISABLE: u8 = 0x80;

const UPDATE_IN_PROGRESS: u8 = 0x80;
const BINARY_MODE: u8 = 0x04;
const HOUR_24: u8 = 0x02;

#[derive(Debug, Default)]
pub struct CmosRtc {
    binary: bool,
    hour_24: bool,
}

impl CmosRtc {
    pub const fn new() -> Self {
        Self { binary: false, hour_24: false }
    }

    fn read(&self, reg: u8) -> u8 {
        unsafe {
            Port::<u8>::new(CMOS_ADDRESS).write(NMI_DISABLE | reg);
            Port::<u8>::new(CMOS_DATA).read()
        }
    }

    pub fn is_binary(&self) -> bool {
        self.binary
    }

    pub fn is_24_hour(&self) -> bool {
        self.hour_24
    }
}

impl RealTimeClock for CmosRtc {
    fn init(&mut self) {
        while self.read(REG_STATUS_A) & UPDATE_IN_PROGRESS != 0 {
            core::hint::spin_loop();
        }
        let status = self.read(REG_STATUS_B);
        self.binary = status & BINARY_MODE != 0;
        self.hour_24 = status & HOUR_24 != 0;
        debug!("rtc: cmos, binary={} 24h={}", self.binary, self.hour_24);
    }
}
