// Core module - Console driver logic independent of the serial transport
pub mod link;
pub mod protocol;
pub mod session;
