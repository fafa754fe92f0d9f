// CLI module - Command line interface
pub mod args;
pub mod commands;
pub mod output;

pub use args::{parse_args, parse_baud, Args, LoadMethodArg, ParseOutcome};
pub use commands::{execute_command, run_session};
pub use output::StdConsole;
