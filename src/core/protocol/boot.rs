//! Fixed U-Boot console protocol for the Phytium-Pi board.
//!
//! The markers and commands here match the board's boot loader build and are
//! not meant to be configured.

/// Memory address the payload is loaded to and started from.
pub const LOAD_ADDRESS: u32 = 0x9010_0000;

/// Substring of the autoboot countdown line.
pub const AUTOBOOT_MARKER: &str = "Hit any key";

/// Substring of the U-Boot shell prompt.
pub const PROMPT_MARKER: &str = "Phytium-Pi#";

/// Substring printed by `loadx` once it is waiting for XMODEM data.
pub const LOADX_READY_MARKER: &str = "Ready for binary";

/// User input that ends the interactive relay.
pub const EXIT_COMMAND: &str = "exit";

/// Terminator appended to everything written to the console.
pub const LINE_ENDING: &str = "\r\n";

/// How the payload reaches the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadMethod {
    /// `fatload` the payload from the first USB stick.
    Usb,
    /// Stream a local image with `loadx`.
    Xmodem { image: Vec<u8> },
}

impl std::fmt::Display for LoadMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoadMethod::Usb => write!(f, "usb"),
            LoadMethod::Xmodem { image } => write!(f, "xmodem ({} bytes)", image.len()),
        }
    }
}

/// `usb start; fatload usb 0 0x90100000 <payload>\r\n`
pub fn usb_load_command(payload: &str) -> String {
    format!("usb start; fatload usb 0 {:#x} {}{}", LOAD_ADDRESS, payload, LINE_ENDING)
}

/// `loadx 0x90100000\r\n`
pub fn loadx_command() -> String {
    format!("loadx {:#x}{}", LOAD_ADDRESS, LINE_ENDING)
}

/// `go 0x90100000\r\n`
pub fn go_command() -> String {
    format!("go {:#x}{}", LOAD_ADDRESS, LINE_ENDING)
}

/// User input as it goes on the wire.
pub fn console_line(input: &str) -> String {
    format!("{}{}", input, LINE_ENDING)
}
