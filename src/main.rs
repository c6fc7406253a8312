use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info};

use capbridge::config::{self, platform_base_url};
use capbridge::dispatch::Dispatcher;
use capbridge::error::Result;
use capbridge::host::{host_channel, HostEvent};
use capbridge::middleware::CapabilityRouter;
use capbridge::server::BridgeServer;

#[derive(Parser, Debug)]
#[command(name = "capbridge")]
#[command(about = "Loopback HTTP bridge exposing native device capabilities to embedded web content", long_about = None)]
struct Args {
    /// Path to configuration file (YAML/JSON/TOML)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize tracing
    let log_level = if args.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(format!("capbridge={log_level}").parse().unwrap()),
        )
        .init();

    // Load configuration
    let config = match args.config {
        Some(path) => {
            info!("Loading configuration from: {}", path.display());
            config::load_from_path(&path).await?
        }
        None => config::load_from_env_or_file().await?,
    };

    info!("Starting capability bridge on port {}", config.port);

    // Wire the host channel. In an embedding the host application owns the
    // receiver on its UI task; standalone, a close request shuts us down.
    let (host, mut host_rx) = host_channel();

    // Build the handler chain. Capability plugins are registered on the
    // router by the embedding application before start; standalone we run
    // with an empty capability set and the transport's 404 fallback.
    let mut dispatcher = Dispatcher::new(Some(host));
    dispatcher.append_middleware(Arc::new(CapabilityRouter::new()));

    let server = Arc::new(BridgeServer::new(config.clone(), dispatcher));
    server.start().await?;
    info!("Bridge endpoint ready at {}", platform_base_url(config.port));

    tokio::select! {
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
        _ = drain_host_events(&mut host_rx) => {
            info!("Host close requested");
        }
    }

    if let Err(e) = server.stop().await {
        error!("Failed to stop bridge server: {}", e);
    }

    Ok(())
}

async fn drain_host_events(rx: &mut tokio::sync::mpsc::UnboundedReceiver<HostEvent>) {
    while let Some(event) = rx.recv().await {
        match event {
            HostEvent::CloseRequested => break,
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
