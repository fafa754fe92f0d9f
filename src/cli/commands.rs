use crate::cli::args::{parse_baud, Args, LoadMethodArg};
use crate::cli::output::StdConsole;
use crate::core::link::{Console, SerialLink};
use crate::core::protocol::LoadMethod;
use crate::core::session::{Session, SessionOptions, SessionParams, SessionStatistics};
use crate::domain::error::{TransferError, TransferResult};
use crate::infrastructure::{config::ConfigManager, logging::init_logging, serial::SerialClient};
use std::io;
use std::path::Path;
use tracing::info;

/// Execute the transfer and map the outcome to a process exit status
pub async fn execute_command(args: Args) -> i32 {
    match transfer(args).await {
        Ok(()) => 0,
        Err(e) => {
            report(&e);
            1
        }
    }
}

async fn transfer(args: Args) -> TransferResult<()> {
    let params = SessionParams {
        baud_rate: parse_baud(&args.baud),
        device: args.device,
        payload: args.payload,
    };
    check_device(&params.device)?;

    let config_manager = ConfigManager::new();
    let config = if let Some(config_path) = &args.config {
        config_manager.load_config_from_path(config_path.as_ref())?
    } else {
        config_manager.load_config()?
    };

    if !args.quiet {
        init_logging(&config.global.log_level, args.verbose)?;
    }

    let method = load_method(args.method, &params.payload)?;

    println!("Open serial device");
    let link = SerialClient::open(&params.device, params.baud_rate, &config.serial)?;
    let options = SessionOptions {
        method,
        xmodem: config.xmodem,
    };

    let statistics = run_session(Session::new(params, options, link), StdConsole::new()).await?;
    info!(
        bytes_sent = statistics.bytes_sent,
        bytes_received = statistics.bytes_received,
        "Transfer session complete"
    );
    Ok(())
}

/// Fail with `DeviceNotFound` unless `device` names an existing path.
pub fn check_device(device: &str) -> TransferResult<()> {
    if Path::new(device).exists() {
        Ok(())
    } else {
        Err(TransferError::DeviceNotFound {
            path: device.to_string(),
        })
    }
}

/// Resolve the load method. XMODEM needs the payload locally, so it is read up front.
pub fn load_method(method: LoadMethodArg, payload: &str) -> TransferResult<LoadMethod> {
    match method {
        LoadMethodArg::Usb => Ok(LoadMethod::Usb),
        LoadMethodArg::Xmodem => {
            let image = std::fs::read(payload)
                .map_err(|e| io::Error::new(e.kind(), format!("{}: {}", payload, e)))?;
            Ok(LoadMethod::Xmodem { image })
        }
    }
}

/// Run the blocking session off the async runtime and wait for it.
pub async fn run_session<L, C>(session: Session<L>, mut console: C) -> TransferResult<SessionStatistics>
where
    L: SerialLink + 'static,
    C: Console + 'static,
{
    tokio::task::spawn_blocking(move || session.run(&mut console))
        .await
        .map_err(|e| {
            TransferError::Io(io::Error::new(
                io::ErrorKind::Other,
                format!("Console session task failed: {}", e),
            ))
        })?
}

fn report(error: &TransferError) {
    match error {
        e if e.is_precondition() => println!("{}", e),
        TransferError::Config { .. } | TransferError::Logging(_) => eprintln!("Error: {}", error),
        _ => println!("Serial error: {}", error),
    }
}
