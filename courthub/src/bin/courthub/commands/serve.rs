use anyhow::{Context, Result};
use clap::Args;
use courthub::{Hub, HubConfig, http};
use tokio::{net::TcpListener, signal::ctrl_c};

#[cfg(unix)]
use tokio::signal::unix::{SignalKind, signal};

use crate::examples::ExampleGroup;
use crate::output::OutputManager;

pub const EXAMPLES: &[ExampleGroup] = &[ExampleGroup {
    title: "Run the API",
    commands: &[
        "courthub serve                          # Listen on the configured host and port",
        "courthub serve --port 8080              # Override the listen port",
        "courthub --config dev.toml serve        # Use an explicit configuration file",
    ],
}];

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Port to listen on (overrides PORT and the configuration file)
    #[arg(long)]
    pub port: Option<u16>,

    /// Address to bind (overrides the configuration file)
    #[arg(long)]
    pub host: Option<String>,
}

pub async fn handle_serve(args: ServeArgs, mut config: HubConfig, output: &OutputManager) -> Result<()> {
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(host) = args.host {
        config.server.host = host;
    }

    let address = config.socket_addr()?;
    let hub = Hub::connect(&config).await?;
    let listener = TcpListener::bind(address)
        .await
        .with_context(|| format!("Failed to bind {address}"))?;

    output.success(&format!("CourtHub listening on http://{address}"));
    output.key_value("Storage", hub.store().backend_name());

    http::serve(listener, http::router(hub), shutdown_signal()).await
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match ctrl_c().await {
            Ok(()) => log::info!("Received Ctrl+C, shutting down"),
            Err(err) => {
                log::error!("Failed to install Ctrl+C handler: {err}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                log::info!("Received terminate signal, shutting down");
            }
            Err(err) => {
                log::error!("Failed to install signal handler: {err}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
