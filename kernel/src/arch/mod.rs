//! Board support.
//!
//! The core is board-agnostic; a board only has to provide the `hal`
//! traits. The x86_64 board is compiled for the freestanding image.

cfg_if::cfg_if! {
    if #[cfg(all(feature = "bare-metal", target_arch = "x86_64"))] {
        pub mod x86_64;
        pub use self::x86_64 as board;
    }
}
