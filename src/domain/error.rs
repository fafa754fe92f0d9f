use thiserror::Error;

/// Uboot transfer unified error type
#[derive(Error, Debug)]
pub enum TransferError {
    #[error("Usage: uboot-transfer <device> <baud> <file_path>")]
    Usage,

    #[error("Device {path} does not exist")]
    DeviceNotFound { path: String },

    #[error("Failed to open serial port {device}: {source}")]
    Connection {
        device: String,
        #[source]
        source: serialport::Error,
    },

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("Serial link closed by device")]
    LinkClosed,

    #[error("XMODEM transfer failed: {0}")]
    Xmodem(String),

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Logging error: {0}")]
    Logging(String),
}

impl TransferError {
    /// Whether the error is raised before any connection is opened.
    pub fn is_precondition(&self) -> bool {
        matches!(self, Self::Usage | Self::DeviceNotFound { .. })
    }
}

pub type TransferResult<T> = Result<T, TransferError>;
