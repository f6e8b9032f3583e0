//! lazy-server: serves fixed responses under path prefixes, building each
//! mount's handler on the first request that reaches it.
//!
//! ```text
//! Client ──▶ axum router ──▶ /foo ──▶ LazyHandler ──▶ (built on first hit)
//!                        ├─▶ /bar ──▶ LazyHandler ──▶ (untouched until hit)
//!                        └─▶ anything else ──▶ 404
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use lazy_handler::config::{self, ServerConfig};
use lazy_handler::observability::logging;
use lazy_handler::{HttpServer, Shutdown};

#[derive(Parser)]
#[command(name = "lazy-server")]
#[command(about = "Serve lazily built handlers under path prefixes", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the configured bind address.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => config::load_config(path)?,
        None => ServerConfig::default(),
    };
    if let Some(bind) = cli.bind {
        config = config::override_bind_address(config, bind)?;
    }

    logging::init(&config.observability)?;
    tracing::info!("lazy-server v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        bind_address = %config.listener.bind_address,
        mounts = config.mounts.len(),
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config);
    let mut server_task = tokio::spawn(server.run(listener, shutdown.signal()));

    tokio::select! {
        // Server exited on its own (e.g. accept error).
        result = &mut server_task => {
            result??;
            return Ok(());
        }
        result = shutdown.trigger_on_ctrl_c() => result?,
    }

    // Drain in-flight requests.
    server_task.await??;

    tracing::info!("Shutdown complete");
    Ok(())
}
