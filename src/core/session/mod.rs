// Session module - Scripted boot handshake and interactive relay
pub mod session;
pub mod state;

pub use session::{Session, SessionOptions, SessionParams};
pub use state::{Phase, SessionStatistics};
