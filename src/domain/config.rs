use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Uboot transfer configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransferConfig {
    /// Global configuration
    #[serde(default)]
    pub global: GlobalConfig,
    /// Serial port settings
    #[serde(default)]
    pub serial: SerialSettings,
    /// XMODEM load settings
    #[serde(default)]
    pub xmodem: XmodemSettings,
}

/// Global configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlobalConfig {
    /// Default log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// Serial port settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SerialSettings {
    /// Read poll granularity in milliseconds. Line reads keep polling past it.
    #[serde(default = "default_poll_timeout")]
    pub poll_timeout_ms: u64,
    #[serde(default = "default_data_bits")]
    pub data_bits: u8,
    #[serde(default = "default_stop_bits")]
    pub stop_bits: u8,
    #[serde(default = "default_parity")]
    pub parity: ParityConfig,
}

/// Parity configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParityConfig {
    None,
    Odd,
    Even,
}

/// XMODEM sender tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct XmodemSettings {
    /// Attempts per block (and for the final EOT) before cancelling
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// How long to wait for the receiver to request the first block
    #[serde(default = "default_start_timeout")]
    pub start_timeout_ms: u64,
    /// How long to wait for the ACK of a single block
    #[serde(default = "default_block_timeout")]
    pub block_timeout_ms: u64,
}

impl SerialSettings {
    pub fn poll_timeout(&self) -> Duration {
        Duration::from_millis(self.poll_timeout_ms)
    }
}

impl XmodemSettings {
    /// Attempts per block; a configured 0 still sends each block once.
    pub fn attempts(&self) -> u32 {
        self.max_retries.max(1)
    }

    pub fn start_timeout(&self) -> Duration {
        Duration::from_millis(self.start_timeout_ms)
    }

    pub fn block_timeout(&self) -> Duration {
        Duration::from_millis(self.block_timeout_ms)
    }
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_poll_timeout() -> u64 {
    100
}

fn default_data_bits() -> u8 {
    8
}

fn default_stop_bits() -> u8 {
    1
}

fn default_parity() -> ParityConfig {
    ParityConfig::None
}

fn default_max_retries() -> u32 {
    10
}

fn default_start_timeout() -> u64 {
    60_000
}

fn default_block_timeout() -> u64 {
    10_000
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

impl Default for SerialSettings {
    fn default() -> Self {
        Self {
            poll_timeout_ms: default_poll_timeout(),
            data_bits: default_data_bits(),
            stop_bits: default_stop_bits(),
            parity: default_parity(),
        }
    }
}

impl Default for ParityConfig {
    fn default() -> Self {
        default_parity()
    }
}

impl Default for XmodemSettings {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            start_timeout_ms: default_start_timeout(),
            block_timeout_ms: default_block_timeout(),
        }
    }
}
