use crate::domain::error::TransferError;
use clap::{error::ErrorKind, Parser, ValueEnum};
use std::ffi::OsString;

pub const BANNER: &str = "-- Uboot Transfer --";

/// Command line arguments for uboot-transfer
#[derive(Parser, Debug)]
#[command(
    name = "uboot-transfer",
    version = env!("CARGO_PKG_VERSION"),
    about = "Boot a payload through the U-Boot serial console and stay attached",
    long_about = "Wakes a Phytium-Pi board out of autoboot, loads a payload at 0x90100000 and jumps to it, then relays the serial console until `exit` is typed."
)]
pub struct Args {
    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Disable logging
    #[arg(short, long)]
    pub quiet: bool,

    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<String>,

    /// How the payload reaches the board
    #[arg(short, long, value_enum, default_value = "usb")]
    pub method: LoadMethodArg,

    /// Serial device path
    pub device: String,

    /// Baud rate (leading digits are used, anything else reads as 0)
    #[arg(allow_hyphen_values = true)]
    pub baud: String,

    /// Payload path: on the USB stick for `usb`, local file for `xmodem`
    pub payload: String,
}

/// Load method argument
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadMethodArg {
    /// `fatload` from the first USB stick
    Usb,
    /// Stream the local file with `loadx`
    Xmodem,
}

/// What `main` should do after looking at the command line
#[derive(Debug)]
pub enum ParseOutcome {
    Run(Args),
    Exit(i32),
}

/// Parse the command line. Anything but exactly three positionals prints the
/// usage line and yields exit status 1. `--help` and `--version` show their
/// text first but are not a run, so they exit 1 as well.
pub fn parse_args<I, T>(args: I) -> ParseOutcome
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    match Args::try_parse_from(args) {
        Ok(args) => ParseOutcome::Run(args),
        Err(e) => {
            if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) {
                let _ = e.print();
            }
            println!("{}", TransferError::Usage);
            ParseOutcome::Exit(1)
        }
    }
}

/// Integer conversion that keeps leading digits and degrades to 0.
///
/// `"115200"` -> 115200, `" 9600baud"` -> 9600, `"fast"` -> 0, `"-1"` -> 0.
/// Values beyond `u32::MAX` saturate.
pub fn parse_baud(text: &str) -> u32 {
    let text = text.trim_start();
    let (negative, digits) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };

    let value = digits
        .bytes()
        .take_while(u8::is_ascii_digit)
        .fold(0u32, |acc, d| acc.saturating_mul(10).saturating_add(u32::from(d - b'0')));

    if negative {
        0
    } else {
        value
    }
}

impl std::fmt::Display for LoadMethodArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoadMethodArg::Usb => write!(f, "usb"),
            LoadMethodArg::Xmodem => write!(f, "xmodem"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn run(args: &[&str]) -> Option<Args> {
        match parse_args(std::iter::once("uboot-transfer").chain(args.iter().copied())) {
            ParseOutcome::Run(args) => Some(args),
            ParseOutcome::Exit(_) => None,
        }
    }

    fn exit_code(args: &[&str]) -> Option<i32> {
        match parse_args(std::iter::once("uboot-transfer").chain(args.iter().copied())) {
            ParseOutcome::Run(_) => None,
            ParseOutcome::Exit(code) => Some(code),
        }
    }

    #[test]
    fn test_three_positionals() {
        let args = run(&["/dev/ttyUSB0", "115200", "kernel.bin"]).unwrap();
        assert_eq!(args.device, "/dev/ttyUSB0");
        assert_eq!(args.baud, "115200");
        assert_eq!(args.payload, "kernel.bin");
        assert_eq!(args.method, LoadMethodArg::Usb);
    }

    #[test]
    fn test_wrong_argument_count_exits_1() {
        assert_eq!(exit_code(&[]), Some(1));
        assert_eq!(exit_code(&["/dev/ttyUSB0"]), Some(1));
        assert_eq!(exit_code(&["/dev/ttyUSB0", "115200"]), Some(1));
        assert_eq!(exit_code(&["/dev/ttyUSB0", "115200", "a.bin", "extra"]), Some(1));
    }

    #[test]
    fn test_help_and_version_exit_1() {
        assert_eq!(exit_code(&["--help"]), Some(1));
        assert_eq!(exit_code(&["-V"]), Some(1));
        assert_eq!(exit_code(&["/dev/ttyUSB0", "115200", "a.bin", "--help"]), Some(1));
    }

    #[test]
    fn test_negative_baud_is_positional() {
        let args = run(&["/dev/ttyUSB0", "-5", "kernel.bin"]).unwrap();
        assert_eq!(parse_baud(&args.baud), 0);
    }

    #[test]
    fn test_flags_and_method() {
        let args = run(&["-v", "--method", "xmodem", "/dev/ttyS0", "9600", "a.bin"]).unwrap();
        assert!(args.verbose);
        assert_eq!(args.method, LoadMethodArg::Xmodem);
    }

    #[test]
    fn test_parse_baud_examples() {
        assert_eq!(parse_baud("115200"), 115200);
        assert_eq!(parse_baud("  9600baud"), 9600);
        assert_eq!(parse_baud("+57600"), 57600);
        assert_eq!(parse_baud("fast"), 0);
        assert_eq!(parse_baud(""), 0);
        assert_eq!(parse_baud("-115200"), 0);
        assert_eq!(parse_baud("99999999999"), u32::MAX);
    }

    proptest! {
        #[test]
        fn prop_parse_baud_matches_u32(n in any::<u32>(), suffix in "[a-z ]{0,6}") {
            prop_assert_eq!(parse_baud(&format!("{}{}", n, suffix)), n);
        }

        #[test]
        fn prop_non_numeric_is_zero(text in "[a-zA-Z_][a-zA-Z0-9_]{0,10}") {
            prop_assert_eq!(parse_baud(&text), 0);
        }
    }
}
