// wildlife-id - Wildlife species identification with Gemini
// Author: kelexine (https://github.com/kelexine)

use anyhow::Result;
use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tracing::{info, warn};
use wildlife_id::cli::{Args, Command};
use wildlife_id::config::AppConfig;
use wildlife_id::gemini::{GeminiClient, SpeciesIdentifier};
use wildlife_id::report;
use wildlife_id::server::create_router;
use wildlife_id::session::IdentificationSession;
use wildlife_id::utils::logging;
use wildlife_id::vision::ImageUpload;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Phase 1: Load configuration
    let mut config = AppConfig::load(args.config.as_deref())?;

    // Phase 2: Initialize logging
    logging::init(&config.logging)?;
    info!("Starting wildlife-id v{}", env!("CARGO_PKG_VERSION"));

    match args.command {
        Command::Identify { image, json, model } => {
            if let Some(model) = model {
                config.gemini.model = model;
            }
            let session = build_session(&config)?;

            // Rejected before any request is made
            let upload = ImageUpload::from_path(&image, config.upload.max_image_bytes).await?;
            session.select_image(upload)?;
            let identification = session.identify().await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&identification)?);
            } else {
                print!("{}", report::render_text(&identification));
                println!("\n{}", report::DISCLAIMER);
            }
        }
        Command::Serve { host, port } => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            let session = build_session(&config)?;

            let addr: SocketAddr =
                format!("{}:{}", config.server.host, config.server.port).parse()?;
            let app = create_router(config, session);

            info!("Starting server on {}", addr);
            let listener = tokio::net::TcpListener::bind(addr).await?;

            axum::serve(listener, app)
                .with_graceful_shutdown(shutdown_signal())
                .await?;

            info!("Server shut down gracefully");
        }
    }

    Ok(())
}

fn build_session(config: &AppConfig) -> Result<Arc<IdentificationSession>> {
    let client = GeminiClient::new(&config.gemini, &config.logging)?;
    if !client.is_configured() {
        warn!("API key not detected (app may not function). Set API_KEY or GEMINI_API_KEY.");
    } else {
        info!("Using model {} at {}", client.model(), client.base_url());
    }

    Ok(Arc::new(IdentificationSession::new(
        Arc::new(client),
        config.upload.max_image_bytes,
    )))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            info!("Received SIGTERM signal");
        },
    }
}
