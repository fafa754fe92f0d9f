// Protocol module - U-Boot console commands and the XMODEM sender
pub mod boot;
pub mod xmodem;

pub use boot::{LoadMethod, AUTOBOOT_MARKER, EXIT_COMMAND, LINE_ENDING, LOAD_ADDRESS, PROMPT_MARKER};
pub use xmodem::{ChecksumMode, XmodemSender};
