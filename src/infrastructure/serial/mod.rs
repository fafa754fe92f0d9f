// Serial module - serialport-backed console link
pub mod client;

pub use client::SerialClient;
