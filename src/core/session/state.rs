use std::fmt;
use std::time::{Duration, Instant};

/// Stage of the scripted console interaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Phase {
    /// Link open, nothing read yet
    Connected,
    /// Nudging the board until the autoboot countdown shows up
    Wake,
    /// Getting the payload onto the board and starting it
    Load,
    /// Relaying user input to the console
    Interactive,
    /// User typed `exit`
    Finished,
}

impl Phase {
    /// The phase that follows this one, if any.
    pub fn next(self) -> Option<Phase> {
        match self {
            Phase::Connected => Some(Phase::Wake),
            Phase::Wake => Some(Phase::Load),
            Phase::Load => Some(Phase::Interactive),
            Phase::Interactive => Some(Phase::Finished),
            Phase::Finished => None,
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Connected => write!(f, "Connected"),
            Phase::Wake => write!(f, "Wake"),
            Phase::Load => write!(f, "Load"),
            Phase::Interactive => write!(f, "Interactive"),
            Phase::Finished => write!(f, "Finished"),
        }
    }
}

/// Session statistics
#[derive(Debug, Clone)]
pub struct SessionStatistics {
    /// Lines read from the device
    pub lines_received: u64,
    /// Bytes read as lines from the device
    pub bytes_received: u64,
    /// Writes issued to the device
    pub writes: u64,
    /// Bytes written to the device
    pub bytes_sent: u64,
    /// Session start
    pub started_at: Instant,
}

impl SessionStatistics {
    pub fn new() -> Self {
        Self {
            lines_received: 0,
            bytes_received: 0,
            writes: 0,
            bytes_sent: 0,
            started_at: Instant::now(),
        }
    }

    pub fn record_line(&mut self, raw_len: usize) {
        self.lines_received += 1;
        self.bytes_received += raw_len as u64;
    }

    pub fn record_write(&mut self, len: usize) {
        self.writes += 1;
        self.bytes_sent += len as u64;
    }

    pub fn uptime(&self) -> Duration {
        self.started_at.elapsed()
    }
}

impl Default for SessionStatistics {
    fn default() -> Self {
        Self::new()
    }
}
