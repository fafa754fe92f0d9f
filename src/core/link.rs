// Link module - Transport seam between the console driver and the device
use crate::domain::error::TransferResult;
use std::time::Duration;

/// Line-oriented connection to a boot-loader console.
///
/// `read_line` blocks until a full line (terminated by `\n`) has arrived and
/// returns it with the terminator still attached. Implementations decode bytes
/// lossily; the device is free to emit anything.
pub trait SerialLink: Send {
    /// Read one line from the device.
    fn read_line(&mut self) -> TransferResult<String>;

    /// Write raw bytes to the device.
    fn write_all(&mut self, data: &[u8]) -> TransferResult<()>;

    /// Read a single byte, giving up after `timeout`. Used by the binary load protocol.
    fn read_byte(&mut self, timeout: Duration) -> TransferResult<Option<u8>>;

    /// Release the underlying handle.
    fn close(self) -> TransferResult<()>
    where
        Self: Sized;
}

/// Local terminal used to echo device traffic and collect user input.
pub trait Console: Send {
    /// Print one line of device output.
    fn echo(&mut self, line: &str) -> TransferResult<()>;

    /// Read one line typed by the user, without its line terminator.
    /// `None` once input is exhausted.
    fn read_input(&mut self) -> TransferResult<Option<String>>;
}
