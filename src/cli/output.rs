use crate::core::link::Console;
use crate::domain::error::TransferResult;
use std::io::{self, BufRead, Write};

/// Console bound to the process's stdin and stdout
pub struct StdConsole;

impl StdConsole {
    pub fn new() -> Self {
        Self
    }
}

impl Default for StdConsole {
    fn default() -> Self {
        Self::new()
    }
}

impl Console for StdConsole {
    fn echo(&mut self, line: &str) -> TransferResult<()> {
        let mut stdout = io::stdout().lock();
        writeln!(stdout, "{}", line)?;
        stdout.flush()?;
        Ok(())
    }

    fn read_input(&mut self) -> TransferResult<Option<String>> {
        read_line_from(&mut io::stdin().lock())
    }
}

/// Read one line and strip its terminator (`\n` or `\r\n`). `None` at end of input.
pub fn read_line_from<R: BufRead>(reader: &mut R) -> TransferResult<Option<String>> {
    let mut input = String::new();
    if reader.read_line(&mut input)? == 0 {
        return Ok(None);
    }

    if input.ends_with('\n') {
        input.pop();
        if input.ends_with('\r') {
            input.pop();
        }
    }
    Ok(Some(input))
}
