use crate::core::{
    link::{Console, SerialLink},
    protocol::{
        boot::{self, LoadMethod, AUTOBOOT_MARKER, EXIT_COMMAND, LINE_ENDING, LOADX_READY_MARKER, PROMPT_MARKER},
        xmodem::XmodemSender,
    },
    session::state::{Phase, SessionStatistics},
};
use crate::domain::{
    config::XmodemSettings,
    error::{TransferError, TransferResult},
};
use tracing::{debug, error, info, warn};

/// Values fixed at startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionParams {
    /// Serial device path
    pub device: String,
    /// Baud rate the link was opened at
    pub baud_rate: u32,
    /// Payload path, handed to the board as-is for USB loads
    pub payload: String,
}

/// How the session loads its payload
#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub method: LoadMethod,
    pub xmodem: XmodemSettings,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            method: LoadMethod::Usb,
            xmodem: XmodemSettings::default(),
        }
    }
}

/// One scripted console session over an exclusively owned link.
///
/// The link is closed exactly once: at the end of [`Session::run`] whatever its
/// outcome, or on drop if `run` never completed.
pub struct Session<L: SerialLink> {
    params: SessionParams,
    options: SessionOptions,
    link: Option<L>,
    phase: Phase,
    statistics: SessionStatistics,
}

impl<L: SerialLink> Session<L> {
    /// Wrap an already opened link
    pub fn new(params: SessionParams, options: SessionOptions, link: L) -> Self {
        Self {
            params,
            options,
            link: Some(link),
            phase: Phase::Connected,
            statistics: SessionStatistics::new(),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Run every phase to completion, then release the link.
    pub fn run<C: Console>(mut self, console: &mut C) -> TransferResult<SessionStatistics> {
        info!(
            device = %self.params.device,
            baud = self.params.baud_rate,
            method = %self.options.method,
            "Starting console session"
        );

        let outcome = self.drive(console);
        if let Err(e) = &outcome {
            error!(phase = %self.phase, "Session failed: {}", e);
        }

        let closed = self.close();
        outcome?;
        closed?;

        let statistics = std::mem::take(&mut self.statistics);
        info!(
            lines = statistics.lines_received,
            writes = statistics.writes,
            uptime_ms = statistics.uptime().as_millis() as u64,
            "Console session finished"
        );
        Ok(statistics)
    }

    fn drive<C: Console>(&mut self, console: &mut C) -> TransferResult<()> {
        self.advance(Phase::Wake);
        self.wake(console)?;

        self.advance(Phase::Load);
        match self.options.method {
            LoadMethod::Usb => self.load_usb(console)?,
            LoadMethod::Xmodem { .. } => self.load_xmodem(console)?,
        }

        self.advance(Phase::Interactive);
        self.interact(console)?;

        self.advance(Phase::Finished);
        Ok(())
    }

    /// Answer every line with a bare line ending until the autoboot countdown appears.
    fn wake<C: Console>(&mut self, console: &mut C) -> TransferResult<()> {
        loop {
            let line = self.next_line(console)?;
            if line.contains(AUTOBOOT_MARKER) {
                info!("Autoboot countdown detected");
                return Ok(());
            }
            self.send(LINE_ENDING)?;
        }
    }

    /// Keep issuing the load and jump commands until the prompt shows up.
    fn load_usb<C: Console>(&mut self, console: &mut C) -> TransferResult<()> {
        let load = boot::usb_load_command(&self.params.payload);
        let go = boot::go_command();

        loop {
            let line = self.next_line(console)?;
            if line.contains(PROMPT_MARKER) {
                info!("Boot prompt detected");
                return Ok(());
            }
            self.send(&load)?;
            self.send(&go)?;
        }
    }

    fn load_xmodem<C: Console>(&mut self, console: &mut C) -> TransferResult<()> {
        loop {
            let line = self.next_line(console)?;
            if line.contains(PROMPT_MARKER) {
                info!("Boot prompt detected");
                break;
            }
            self.send(LINE_ENDING)?;
        }

        self.send(&boot::loadx_command())?;
        while !self.next_line(console)?.contains(LOADX_READY_MARKER) {}

        let image: &[u8] = match &self.options.method {
            LoadMethod::Xmodem { image } => image.as_slice(),
            LoadMethod::Usb => &[],
        };
        let link = self.link.as_mut().ok_or(TransferError::LinkClosed)?;
        XmodemSender::new(link, &self.options.xmodem).send(image)?;
        let sent = image.len();
        self.statistics.record_write(sent);

        self.send(&boot::go_command())
    }

    /// Relay user input line by line until `exit`.
    fn interact<C: Console>(&mut self, console: &mut C) -> TransferResult<()> {
        loop {
            let input = match console.read_input()? {
                Some(input) => input,
                None => {
                    info!("Local input closed, leaving the console");
                    EXIT_COMMAND.to_string()
                }
            };

            self.send(&boot::console_line(&input))?;
            self.next_line(console)?;

            if input == EXIT_COMMAND {
                return Ok(());
            }
        }
    }

    fn advance(&mut self, to: Phase) {
        debug_assert_eq!(self.phase.next(), Some(to));
        info!("{} -> {}", self.phase, to);
        self.phase = to;
    }

    fn link_mut(&mut self) -> TransferResult<&mut L> {
        self.link.as_mut().ok_or(TransferError::LinkClosed)
    }

    /// Read a line, echo it when it has content, and return it trimmed.
    fn next_line<C: Console>(&mut self, console: &mut C) -> TransferResult<String> {
        let raw = self.link_mut()?.read_line()?;
        self.statistics.record_line(raw.len());

        let line = raw.trim();
        debug!(phase = %self.phase, "<- {}", line);
        if !line.is_empty() {
            console.echo(line)?;
        }
        Ok(line.to_string())
    }

    fn send(&mut self, text: &str) -> TransferResult<()> {
        debug!(phase = %self.phase, "-> {:?}", text);
        self.link_mut()?.write_all(text.as_bytes())?;
        self.statistics.record_write(text.len());
        Ok(())
    }

    fn close(&mut self) -> TransferResult<()> {
        match self.link.take() {
            Some(link) => {
                info!("Closing serial device {}", self.params.device);
                link.close()
            }
            None => Ok(()),
        }
    }
}

impl<L: SerialLink> Drop for Session<L> {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            warn!("Failed to close serial device {}: {}", self.params.device, e);
        }
    }
}
