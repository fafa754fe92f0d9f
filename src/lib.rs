//! Uboot Transfer Library
//!
//! Serial console driver for U-Boot boards: wakes the board out of autoboot,
//! loads a payload, jumps to it and relays an interactive console session.

pub mod cli;
pub mod core;
pub mod domain;
pub mod infrastructure;

pub use crate::core::link::{Console, SerialLink};
pub use crate::core::protocol::LoadMethod;
pub use crate::core::session::{Phase, Session, SessionOptions, SessionParams, SessionStatistics};
pub use domain::config::TransferConfig;
pub use domain::error::{TransferError, TransferResult};
