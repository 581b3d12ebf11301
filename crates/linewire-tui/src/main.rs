//! Linewire client entry point.
//!
//! # Usage
//!
//! ```bash
//! linewire localhost 1234
//!
//! # With logging (stdout belongs to the UI)
//! LINEWIRE_LOG_FILE=/tmp/linewire.log RUST_LOG=debug linewire localhost 1234
//! ```

use std::{fs::OpenOptions, sync::Mutex};

use clap::Parser;
use linewire_app::{App, ExitReason, TerminalLoop};
use linewire_client::{ClientConfig, NetworkLoop, handoff};
use linewire_tui::{TerminalDriver, TerminalError, ui::Layout};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Environment variable naming the log file.
const LOG_FILE_ENV: &str = "LINEWIRE_LOG_FILE";

/// Linewire terminal client
#[derive(Parser, Debug)]
#[command(name = "linewire")]
#[command(about = "Line-oriented TCP terminal client")]
#[command(version)]
struct Args {
    /// Server host name or address
    host: String,

    /// Server port
    port: u16,
}

fn init_logging() -> std::io::Result<()> {
    let Some(path) = std::env::var_os(LOG_FILE_ENV) else {
        return Ok(());
    };

    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(Mutex::new(file)).with_ansi(false))
        .with(filter)
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    init_logging()?;

    tracing::info!("Linewire client starting");

    let (outbound_tx, outbound_rx) = handoff();
    let (inbound_tx, inbound_rx) = handoff();

    let network = NetworkLoop::new(ClientConfig::default(), outbound_rx, inbound_tx);
    let host = args.host.clone();
    let port = args.port;
    let network = tokio::spawn(async move { network.run(&host, port).await });

    // Driver lives in this scope so the terminal is restored before anything
    // is printed below
    let result: Result<ExitReason, TerminalError> = async {
        let driver = TerminalDriver::new(Layout::standard())?;
        let app = App::new(format!("{}:{}", args.host, args.port));
        let mut terminal = TerminalLoop::new(driver, app, outbound_tx, inbound_rx);
        terminal.run().await
    }
    .await;

    match network.await {
        Ok(Ok(end)) => tracing::info!("Network loop finished: {:?}", end),
        Ok(Err(e)) => tracing::warn!("Network loop failed: {}", e),
        Err(e) => tracing::error!("Network task did not finish: {}", e),
    }

    match result? {
        ExitReason::UserQuit => tracing::info!("Client exiting at user request"),
        ExitReason::ConnectionClosed => tracing::info!("Client exiting: connection closed"),
    }

    Ok(())
}
