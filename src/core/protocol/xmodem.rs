//! XMODEM sender for U-Boot's `loadx`.
//!
//! Only the classic 128-byte block variant is spoken. The receiver picks the
//! trailer: `C` requests CRC-16, `NAK` requests the 8-bit checksum.

use crate::core::link::SerialLink;
use crate::domain::config::XmodemSettings;
use crate::domain::error::{TransferError, TransferResult};
use crc::{Crc, CRC_16_XMODEM};
use std::time::Instant;
use tracing::{debug, info, warn};

pub const SOH: u8 = 0x01;
pub const EOT: u8 = 0x04;
pub const ACK: u8 = 0x06;
pub const NAK: u8 = 0x15;
pub const CAN: u8 = 0x18;
pub const CRC_REQUEST: u8 = b'C';
pub const PAD: u8 = 0x1A;
pub const BLOCK_SIZE: usize = 128;

pub const XMODEM_CRC16: Crc<u16> = Crc::<u16>::new(&CRC_16_XMODEM);

/// Block trailer negotiated with the receiver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChecksumMode {
    /// One-byte arithmetic sum
    Checksum,
    /// Two-byte big-endian CRC-16/XMODEM
    Crc16,
}

/// Build one `SOH` frame. Short chunks are padded with `PAD`.
pub fn frame_block(seq: u8, chunk: &[u8], mode: ChecksumMode) -> Vec<u8> {
    debug_assert!(chunk.len() <= BLOCK_SIZE);

    let mut data = [PAD; BLOCK_SIZE];
    data[..chunk.len()].copy_from_slice(chunk);

    let mut frame = Vec::with_capacity(BLOCK_SIZE + 5);
    frame.push(SOH);
    frame.push(seq);
    frame.push(!seq);
    frame.extend_from_slice(&data);

    match mode {
        ChecksumMode::Crc16 => frame.extend_from_slice(&XMODEM_CRC16.checksum(&data).to_be_bytes()),
        ChecksumMode::Checksum => {
            frame.push(data.iter().fold(0u8, |sum, b| sum.wrapping_add(*b)))
        }
    }

    frame
}

/// Drives one transfer over a borrowed link
pub struct XmodemSender<'a, L: SerialLink> {
    link: &'a mut L,
    settings: &'a XmodemSettings,
}

impl<'a, L: SerialLink> XmodemSender<'a, L> {
    pub fn new(link: &'a mut L, settings: &'a XmodemSettings) -> Self {
        Self { link, settings }
    }

    /// Send `image` and return the number of blocks the receiver acknowledged.
    pub fn send(&mut self, image: &[u8]) -> TransferResult<usize> {
        let mode = self.await_start()?;
        info!("XMODEM receiver ready ({:?}), sending {} bytes", mode, image.len());

        let mut seq: u8 = 1;
        let mut blocks = 0;
        for chunk in image.chunks(BLOCK_SIZE) {
            let frame = frame_block(seq, chunk, mode);
            self.send_frame(seq, &frame)?;
            seq = seq.wrapping_add(1);
            blocks += 1;
        }

        self.finish()?;
        info!("XMODEM transfer complete, {} blocks", blocks);
        Ok(blocks)
    }

    fn await_start(&mut self) -> TransferResult<ChecksumMode> {
        let deadline = Instant::now() + self.settings.start_timeout();

        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return Err(TransferError::Xmodem(
                    "receiver never requested the first block".to_string(),
                ));
            }

            match self.link.read_byte(remaining)? {
                Some(CRC_REQUEST) => return Ok(ChecksumMode::Crc16),
                Some(NAK) => return Ok(ChecksumMode::Checksum),
                Some(CAN) => return self.cancelled(),
                // loadx keeps printing its banner until the first request
                Some(other) => debug!("Ignoring byte {:#04x} before transfer start", other),
                None => {}
            }
        }
    }

    fn send_frame(&mut self, seq: u8, frame: &[u8]) -> TransferResult<()> {
        for attempt in 1..=self.settings.attempts() {
            debug!(seq, attempt, header = %hex::encode(&frame[..3]), "Sending XMODEM block");
            self.link.write_all(frame)?;

            match self.link.read_byte(self.settings.block_timeout())? {
                Some(ACK) => return Ok(()),
                Some(CAN) => return self.cancelled(),
                Some(NAK) => warn!("Block {} rejected (attempt {})", seq, attempt),
                Some(other) => warn!("Block {} answered with {:#04x} (attempt {})", seq, other, attempt),
                None => warn!("Block {} timed out (attempt {})", seq, attempt),
            }
        }

        self.abort()?;
        Err(TransferError::Xmodem(format!(
            "block {} not acknowledged after {} attempts",
            seq,
            self.settings.attempts()
        )))
    }

    fn finish(&mut self) -> TransferResult<()> {
        for attempt in 1..=self.settings.attempts() {
            self.link.write_all(&[EOT])?;
            match self.link.read_byte(self.settings.block_timeout())? {
                Some(ACK) => return Ok(()),
                other => debug!("EOT answered with {:?} (attempt {})", other, attempt),
            }
        }

        Err(TransferError::Xmodem("end of transmission not acknowledged".to_string()))
    }

    fn cancelled<T>(&mut self) -> TransferResult<T> {
        self.abort()?;
        Err(TransferError::Xmodem("cancelled by receiver".to_string()))
    }

    fn abort(&mut self) -> TransferResult<()> {
        warn!("Cancelling XMODEM transfer");
        self.link.write_all(&[CAN, CAN])
    }
}
