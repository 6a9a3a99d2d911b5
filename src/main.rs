// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use relational_docproof::{
    api::router,
    blockchain::KeyDeriver,
    config::{AppConfig, StoreBackend, LOG_FORMAT_ENV},
    docproof::{Registrar, RegistrarSettings},
    providers::{CallbackUrls, LogOnlyNotifier, PaymentNotifier, WebhookClient},
    state::AppState,
    storage::{InMemoryStore, RegistrationDatabase, RegistrationStore},
};

const DEFAULT_LOG_FILTER: &str = "info,tower_http=debug";

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match std::env::var(LOG_FORMAT_ENV).as_deref() {
        Ok("json") => builder.json().init(),
        _ => builder.pretty().init(),
    }
}

#[tokio::main]
async fn main() {
    init_tracing();

    if let Err(e) = run().await {
        error!(error = %e, "Server failed");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let config = AppConfig::from_env()?;
    info!(
        network = config.network.id,
        network_name = config.network.name,
        chain_id = config.network.chain_id,
        document_price = config.document_price,
        fee_per_kilobyte = config.fee_per_kilobyte,
        fee_multiplier = config.fee_multiplier,
        "Configuration loaded"
    );

    let deriver = Arc::new(KeyDeriver::from_seed_hex(
        &config.master_seed_hex,
        config.network.clone(),
    )?);

    let store: Arc<dyn RegistrationStore> = match config.store_backend {
        StoreBackend::Redb => Arc::new(RegistrationDatabase::open_in_dir(&config.data_dir)?),
        StoreBackend::Memory => {
            warn!("Using in-memory store, registrations are lost on restart");
            Arc::new(InMemoryStore::new())
        }
    };

    let notifier: Arc<dyn PaymentNotifier> = match &config.notifier_url {
        Some(url) => Arc::new(WebhookClient::new(url.clone(), config.notifier_token.clone())?),
        None => {
            warn!("NOTIFIER_URL not set, payment notifications will only be logged");
            Arc::new(LogOnlyNotifier)
        }
    };

    let settings = RegistrarSettings {
        document_price: config.document_price,
        fee_per_kilobyte: config.fee_per_kilobyte,
        fee_multiplier: config.fee_multiplier,
        confirmations: config.required_confirmations,
        callbacks: CallbackUrls::new(&config.host_url, config.callback_token.clone()),
    };
    let registrar = Arc::new(Registrar::new(deriver, store.clone(), notifier, settings));

    let app = router(AppState::new(registrar, store, config.network.clone()));

    let listener = TcpListener::bind(config.bind_address()).await?;
    info!(
        addr = %listener.local_addr()?,
        "Docproof server listening (docs at /docs)"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
