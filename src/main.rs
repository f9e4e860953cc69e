//! Service binary: run the gRPC and HTTP servers, or seed the corpora.

use std::sync::Arc;

use clap::Parser;

use datasmith::clients::vector::WeaviateClient;
use datasmith::config::{Cli, Command};
use datasmith::server::{grpc, http, Orchestrator};
use datasmith::{seed, telemetry};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    telemetry::init_tracing(&cli.settings);

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(cli.settings).await,
        Command::Seed => {
            let store = Arc::new(WeaviateClient::new(&cli.settings));
            seed::run(store).await?;
            Ok(())
        }
    }
}

async fn serve(settings: datasmith::config::Settings) -> anyhow::Result<()> {
    tracing::info!(
        service = %settings.service_name,
        environment = %settings.environment,
        grpc_port = settings.grpc_port,
        http_port = settings.http_port,
        "application_starting"
    );

    let orchestrator = Arc::new(Orchestrator::new(settings));

    // The cache is optional; a failed connection leaves it disabled.
    orchestrator.cache().connect().await;

    let shutdown = Arc::new(tokio::sync::Notify::new());

    let grpc_task = tokio::spawn({
        let orchestrator = orchestrator.clone();
        let shutdown = shutdown.clone();
        async move {
            grpc::serve(orchestrator, async move { shutdown.notified().await }).await
        }
    });
    let http_task = tokio::spawn({
        let orchestrator = orchestrator.clone();
        let shutdown = shutdown.clone();
        async move {
            http::serve(orchestrator, async move { shutdown.notified().await }).await
        }
    });

    tokio::signal::ctrl_c().await?;
    tracing::info!("shutdown_signal_received");
    shutdown.notify_waiters();

    let (grpc_result, http_result) = tokio::join!(grpc_task, http_task);
    orchestrator.cache().disconnect().await;
    grpc_result??;
    http_result??;

    tracing::info!("application_stopped");
    Ok(())
}
