// Simulated U-Boot console shared by the integration tests
#![allow(dead_code)]

use std::collections::VecDeque;
use std::io;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use uboot_transfer::{Console, SerialLink, TransferError, TransferResult};

/// Something the simulated device does when a line is requested
pub enum Event {
    Line(String),
    Fail(io::ErrorKind),
}

/// Everything the driver did to the device
#[derive(Default)]
pub struct Wire {
    pub writes: Vec<Vec<u8>>,
    pub lines_read: usize,
    pub closes: usize,
}

impl Wire {
    pub fn text_writes(&self) -> Vec<String> {
        self.writes
            .iter()
            .map(|w| String::from_utf8_lossy(w).into_owned())
            .collect()
    }
}

pub struct ScriptedDevice {
    events: VecDeque<Event>,
    bytes: VecDeque<Option<u8>>,
    fail_write_at: Option<usize>,
    wire: Arc<Mutex<Wire>>,
}

impl ScriptedDevice {
    pub fn new(lines: &[&str]) -> (Self, Arc<Mutex<Wire>>) {
        let wire = Arc::new(Mutex::new(Wire::default()));
        let device = Self {
            events: lines.iter().map(|l| Event::Line(format!("{}\r\n", l))).collect(),
            bytes: VecDeque::new(),
            fail_write_at: None,
            wire: Arc::clone(&wire),
        };
        (device, wire)
    }

    pub fn then_fail(mut self, kind: io::ErrorKind) -> Self {
        self.events.push_back(Event::Fail(kind));
        self
    }

    pub fn with_byte_replies(mut self, replies: &[Option<u8>]) -> Self {
        self.bytes = replies.iter().copied().collect();
        self
    }

    /// Fail the `index`-th write (zero based)
    pub fn fail_write_at(mut self, index: usize) -> Self {
        self.fail_write_at = Some(index);
        self
    }
}

impl SerialLink for ScriptedDevice {
    fn read_line(&mut self) -> TransferResult<String> {
        match self.events.pop_front() {
            Some(Event::Line(line)) => {
                self.wire.lock().unwrap().lines_read += 1;
                Ok(line)
            }
            Some(Event::Fail(kind)) => Err(io::Error::new(kind, "simulated link failure").into()),
            None => Err(TransferError::LinkClosed),
        }
    }

    fn write_all(&mut self, data: &[u8]) -> TransferResult<()> {
        let mut wire = self.wire.lock().unwrap();
        if self.fail_write_at == Some(wire.writes.len()) {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "simulated write failure").into());
        }
        wire.writes.push(data.to_vec());
        Ok(())
    }

    fn read_byte(&mut self, _timeout: Duration) -> TransferResult<Option<u8>> {
        self.bytes.pop_front().ok_or(TransferError::LinkClosed)
    }

    fn close(self) -> TransferResult<()> {
        self.wire.lock().unwrap().closes += 1;
        Ok(())
    }
}

/// Keyboard with a fixed list of lines
pub struct ScriptedConsole {
    pub inputs: VecDeque<String>,
    pub echoed: Arc<Mutex<Vec<String>>>,
}

impl ScriptedConsole {
    pub fn new(inputs: &[&str]) -> Self {
        Self {
            inputs: inputs.iter().map(|s| s.to_string()).collect(),
            echoed: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

impl Console for ScriptedConsole {
    fn echo(&mut self, line: &str) -> TransferResult<()> {
        self.echoed.lock().unwrap().push(line.to_string());
        Ok(())
    }

    fn read_input(&mut self) -> TransferResult<Option<String>> {
        Ok(self.inputs.pop_front())
    }
}
