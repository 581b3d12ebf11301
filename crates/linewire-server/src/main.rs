//! Linewire echo server binary.
//!
//! # Usage
//!
//! ```bash
//! # Default: 127.0.0.1:1234
//! linewire-server
//!
//! # Listen on all interfaces with small reads
//! linewire-server --bind 0.0.0.0:7000 --read-buffer-size 16 --log-level debug
//! ```

use clap::Parser;
use linewire_server::{EchoServer, ServerConfig};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Linewire echo server
#[derive(Parser, Debug)]
#[command(name = "linewire-server")]
#[command(about = "TCP echo server for the linewire client")]
#[command(version)]
struct Args {
    /// Address to bind to
    #[arg(short, long, default_value = "127.0.0.1:1234")]
    bind: String,

    /// Listen backlog
    #[arg(long, default_value = "100")]
    backlog: u32,

    /// Largest single read per connection, in bytes
    #[arg(long, default_value = "1000")]
    read_buffer_size: usize,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

/// Resolves on SIGINT, or SIGQUIT where the platform has it.
async fn shutdown_signal() {
    let interrupt = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Cannot listen for SIGINT: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let quit = async {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::quit()) {
            Ok(mut quit) => {
                quit.recv().await;
            },
            Err(e) => {
                tracing::error!("Cannot listen for SIGQUIT: {}", e);
                std::future::pending::<()>().await;
            },
        }
    };

    #[cfg(not(unix))]
    let quit = std::future::pending::<()>();

    tokio::select! {
        () = interrupt => tracing::info!("Received SIGINT"),
        () = quit => tracing::info!("Received SIGQUIT"),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::registry().with(fmt::layer()).with(filter).init();

    tracing::info!("Linewire echo server starting");
    tracing::info!("Binding to {}", args.bind);

    let config = ServerConfig {
        bind_address: args.bind,
        backlog: args.backlog,
        read_buffer_size: args.read_buffer_size,
    };

    let server = EchoServer::bind(config)?;

    tracing::info!("Server listening on {}", server.local_addr()?);

    server.run_until(shutdown_signal()).await?;

    tracing::info!("Server stopped");
    Ok(())
}
