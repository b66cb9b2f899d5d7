// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::{Context, Result};
use clap::Parser;
use image_voice_node::{
    api::{create_app, start_server, AppState},
    cli::Cli,
    config::{default_key_file_path, load_credentials, EnvCredentials, ServerConfig},
    orchestrator::UploadOrchestrator,
    providers::ProviderHandles,
    staging::{spawn_sweeper, StagingArea},
    version,
};
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(&cli.log_level, cli.json_logs);

    info!("Starting {}", version::get_version_string());
    info!("Build: {}", version::VERSION);
    info!("Features: {}", version::FEATURES.join(", "));

    let config = cli.into_config();
    if let Err(e) = config.validate() {
        anyhow::bail!("Invalid configuration: {}", e);
    }

    let staging = Arc::new(StagingArea::new(&config.staging_root));
    staging
        .prepare()
        .await
        .context("Failed to create staging directories")?;

    let providers = init_providers(&config);
    let orchestrator = UploadOrchestrator::new(
        providers,
        Arc::clone(&staging),
        config.voice.clone(),
        config.max_upload_bytes,
    );
    let credentials_ok = orchestrator.providers_available();

    let sweeper = spawn_sweeper(
        Arc::clone(&staging),
        config.sweep_interval,
        config.staging_max_age,
    );

    let listener = tokio::net::TcpListener::bind(config.listen_addr())
        .await
        .with_context(|| format!("Failed to bind {}", config.listen_addr()))?;

    info!("Server running on port {}", config.port);
    info!("Environment: {}", config.environment);
    info!("Temp directory: {}", staging.input_dir().display());
    info!("Output directory: {}", staging.output_dir().display());
    info!("Allowed origins: {:?}", config.allowed_origins);
    if !credentials_ok {
        print_credentials_guidance(&config);
    }

    let state = AppState::new(config, orchestrator);
    let result = start_server(listener, create_app(state), shutdown_signal()).await;

    sweeper.abort();
    result
}

fn init_tracing(filter: &str, json: bool) {
    let env_filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(env_filter);

    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

/// Build provider handles, or `None` when uploads must answer 503
fn init_providers(config: &ServerConfig) -> Option<ProviderHandles> {
    let key_file = default_key_file_path();
    let credentials = load_credentials(&key_file, EnvCredentials::from_env())?;

    match ProviderHandles::google(&credentials, &config.vision_endpoint, &config.tts_endpoint) {
        Ok(handles) => {
            info!(
                "Google Cloud services initialized successfully for project {} ({:?})",
                credentials.key.project_id.as_deref().unwrap_or("<unset>"),
                credentials.source
            );
            Some(handles)
        }
        Err(e) => {
            error!("Error initializing Google Cloud services: {:#}", e);
            None
        }
    }
}

fn print_credentials_guidance(config: &ServerConfig) {
    warn!("Google Cloud credentials not configured!");
    if config.is_production() {
        warn!("For production deployment, set these environment variables:");
        warn!("- GOOGLE_CLOUD_PRIVATE_KEY");
        warn!("- GOOGLE_CLOUD_CLIENT_EMAIL");
        warn!("- GOOGLE_CLOUD_PROJECT_ID");
    } else {
        warn!("To use this service, you need to:");
        warn!("1. Create a Google Cloud project at https://console.cloud.google.com");
        warn!("2. Enable the Vision API and Text-to-Speech API");
        warn!("3. Create a service account and download the JSON key");
        warn!("4. Replace the empty credentials.json file with your downloaded key");
        warn!("5. Restart the server");
    }
}

/// Resolve on SIGINT or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
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

    info!("Shutdown signal received");
}
