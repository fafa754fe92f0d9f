use crate::core::link::SerialLink;
use crate::domain::{
    config::{ParityConfig, SerialSettings},
    error::{TransferError, TransferResult},
};
use serialport::SerialPort;
use std::io::{ErrorKind, Read, Write};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Longest run of bytes without a newline handed out as one line
pub const MAX_LINE_BYTES: usize = 64 * 1024;

/// Serial port opened for a console session
pub struct SerialClient {
    port: Box<dyn SerialPort>,
    name: String,
    poll_timeout: Duration,
    inbox: Inbox,
}

impl SerialClient {
    /// Open `device` with the configured framing (8-N-1 by default).
    pub fn open(device: &str, baud_rate: u32, settings: &SerialSettings) -> TransferResult<Self> {
        let connection_error = |message: String| TransferError::Connection {
            device: device.to_string(),
            source: serialport::Error::new(serialport::ErrorKind::InvalidInput, message),
        };

        let mut builder = serialport::new(device, baud_rate);

        builder = builder.data_bits(match settings.data_bits {
            5 => serialport::DataBits::Five,
            6 => serialport::DataBits::Six,
            7 => serialport::DataBits::Seven,
            8 => serialport::DataBits::Eight,
            other => return Err(connection_error(format!("Invalid data bits: {}", other))),
        });

        builder = builder.stop_bits(match settings.stop_bits {
            1 => serialport::StopBits::One,
            2 => serialport::StopBits::Two,
            other => return Err(connection_error(format!("Invalid stop bits: {}", other))),
        });

        builder = builder.parity(match settings.parity {
            ParityConfig::None => serialport::Parity::None,
            ParityConfig::Even => serialport::Parity::Even,
            ParityConfig::Odd => serialport::Parity::Odd,
        });

        builder = builder
            .flow_control(serialport::FlowControl::None)
            .timeout(settings.poll_timeout());

        let port = builder.open().map_err(|source| TransferError::Connection {
            device: device.to_string(),
            source,
        })?;

        info!("Serial port {} opened at {} baud", device, baud_rate);

        Ok(Self::from_port(port, device, settings.poll_timeout()))
    }

    /// Wrap a port that is already open and set to `poll_timeout`.
    pub fn from_port(port: Box<dyn SerialPort>, name: &str, poll_timeout: Duration) -> Self {
        Self {
            port,
            name: name.to_string(),
            poll_timeout,
            inbox: Inbox::default(),
        }
    }
}

impl SerialLink for SerialClient {
    fn read_line(&mut self) -> TransferResult<String> {
        loop {
            if let Some(line) = self.inbox.take_line() {
                return Ok(line);
            }
            // Timeouts only bound a single poll; the line read itself waits indefinitely
            self.inbox.fill(&mut self.port)?;
        }
    }

    fn write_all(&mut self, data: &[u8]) -> TransferResult<()> {
        self.port.write_all(data)?;
        self.port.flush()?;
        debug!("Sent {} bytes over serial", data.len());
        Ok(())
    }

    fn read_byte(&mut self, timeout: Duration) -> TransferResult<Option<u8>> {
        if self.inbox.is_empty() {
            self.port.set_timeout(timeout).map_err(std::io::Error::from)?;
            let filled = self.inbox.fill(&mut self.port);
            self.port
                .set_timeout(self.poll_timeout)
                .map_err(std::io::Error::from)?;
            if !filled? {
                return Ok(None);
            }
        }

        Ok(self.inbox.take_byte())
    }

    fn close(mut self) -> TransferResult<()> {
        let flushed = self.port.flush();
        drop(self.port);
        info!("Serial port {} closed", self.name);
        flushed.map_err(TransferError::from)
    }
}

/// Bytes received but not yet handed out as a line or a single byte
#[derive(Debug, Default)]
struct Inbox {
    pending: Vec<u8>,
}

impl Inbox {
    fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Pull whatever `reader` has into the inbox. `Ok(false)` on a poll timeout.
    fn fill<R: Read + ?Sized>(&mut self, reader: &mut R) -> TransferResult<bool> {
        let mut buffer = [0u8; 1024];
        loop {
            match reader.read(&mut buffer) {
                Ok(0) => return Err(TransferError::LinkClosed),
                Ok(n) => {
                    debug!("Received {} bytes over serial", n);
                    self.pending.extend_from_slice(&buffer[..n]);
                    return Ok(true);
                }
                Err(ref e) if e.kind() == ErrorKind::TimedOut => return Ok(false),
                Err(ref e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// Next complete line, newline included. Without a newline, a run of
    /// `MAX_LINE_BYTES` is cut off as a line of its own.
    fn take_line(&mut self) -> Option<String> {
        let end = match self.pending.iter().take(MAX_LINE_BYTES).position(|b| *b == b'\n') {
            Some(pos) => pos + 1,
            None if self.pending.len() >= MAX_LINE_BYTES => {
                warn!("No line ending in {} bytes, passing them on as one line", MAX_LINE_BYTES);
                MAX_LINE_BYTES
            }
            None => return None,
        };
        let line: Vec<u8> = self.pending.drain(..end).collect();
        Some(String::from_utf8_lossy(&line).into_owned())
    }

    fn take_byte(&mut self) -> Option<u8> {
        if self.pending.is_empty() {
            return None;
        }
        Some(self.pending.remove(0))
    }
}
