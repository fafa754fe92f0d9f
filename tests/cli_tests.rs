use std::process::{Command, Stdio};
use std::str;

fn uboot_transfer() -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_uboot-transfer"));
    command.stdin(Stdio::null()).env("HOME", std::env::temp_dir());
    command
}

/// CLI interface tests
#[cfg(test)]
mod cli_tests {
    use super::*;

    #[test]
    fn test_cli_help() {
        let output = uboot_transfer()
            .arg("--help")
            .output()
            .expect("Failed to execute command");

        let stdout = str::from_utf8(&output.stdout).expect("Invalid UTF-8");

        assert_eq!(output.status.code(), Some(1));
        assert!(stdout.contains("-- Uboot Transfer --"));
        assert!(stdout.contains("Usage: uboot-transfer <device> <baud> <file_path>"));
        assert!(stdout.contains("<DEVICE>"));
        assert!(stdout.contains("<BAUD>"));
        assert!(stdout.contains("<PAYLOAD>"));
        assert!(stdout.contains("--method"));
    }

    #[test]
    fn test_cli_version() {
        let output = uboot_transfer()
            .arg("--version")
            .output()
            .expect("Failed to execute command");

        let stdout = str::from_utf8(&output.stdout).expect("Invalid UTF-8");
        assert_eq!(output.status.code(), Some(1));
        assert!(stdout.contains(env!("CARGO_PKG_VERSION")));
        assert!(stdout.contains("Usage: uboot-transfer <device> <baud> <file_path>"));
    }

    #[test]
    fn test_cli_wrong_argument_count() {
        for args in [&[][..], &["/dev/ttyUSB0"][..], &["/dev/ttyUSB0", "115200"][..], &["a", "b", "c", "d"][..]] {
            let output = uboot_transfer()
                .args(args)
                .output()
                .expect("Failed to execute command");

            let stdout = str::from_utf8(&output.stdout).expect("Invalid UTF-8");
            assert_eq!(output.status.code(), Some(1), "args: {:?}", args);
            assert!(stdout.contains("Usage: uboot-transfer <device> <baud> <file_path>"));
            assert!(!stdout.contains("Open serial device"));
        }
    }

    #[test]
    fn test_cli_missing_device() {
        let output = uboot_transfer()
            .args(["-q", "/dev/uboot-transfer-missing", "115200", "kernel.bin"])
            .output()
            .expect("Failed to execute command");

        let stdout = str::from_utf8(&output.stdout).expect("Invalid UTF-8");
        assert_eq!(output.status.code(), Some(1));
        assert!(stdout.contains("Device /dev/uboot-transfer-missing does not exist"));
        assert!(!stdout.contains("Open serial device"));
    }

    #[test]
    fn test_cli_non_serial_device_reports_serial_error() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let output = uboot_transfer()
            .args(["-q", file.path().to_str().unwrap(), "fast", "kernel.bin"])
            .output()
            .expect("Failed to execute command");

        let stdout = str::from_utf8(&output.stdout).expect("Invalid UTF-8");
        assert_eq!(output.status.code(), Some(1));
        assert!(stdout.contains("Open serial device"));
        assert!(stdout.contains("Serial error:"));
    }

    #[test]
    fn test_cli_invalid_method() {
        let output = uboot_transfer()
            .args(["--method", "kermit", "/dev/ttyUSB0", "115200", "kernel.bin"])
            .output()
            .expect("Failed to execute command");

        assert_eq!(output.status.code(), Some(1));
    }
}
