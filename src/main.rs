// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use anyhow::Context;
use clap::Parser;
use instrument_search::app::{create_router, AppState, VERSION};
use instrument_search::config::Settings;
use instrument_search::services::elasticsearch::ElasticsearchClient;
use instrument_search::services::logging::init_tracing;
use instrument_search::services::search::{SearchBackend, SearchService};
use instrument_search::services::seed::seed_index;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let settings = Settings::parse();

    let client = Arc::new(ElasticsearchClient::new(
        &settings.elasticsearch_url,
        settings.index.clone(),
        settings.request_timeout(),
    )?);

    // The backend may come up after us; requests fail with 502 until it does
    match client.info().await {
        Ok(info) => tracing::info!(
            url = %settings.elasticsearch_url,
            cluster = info.cluster_name.as_deref().unwrap_or("unknown"),
            version = %info.version,
            "Connected to Elasticsearch"
        ),
        Err(e) => tracing::warn!(
            url = %settings.elasticsearch_url,
            error = %e,
            "Elasticsearch is not reachable yet"
        ),
    }

    if let Some(path) = &settings.seed_file {
        match seed_index(&client, path).await {
            Ok(count) => tracing::info!(count, path = %path.display(), "Seeded index"),
            Err(e) => tracing::error!(error = ?e, "Failed to seed index"),
        }
    }

    let state = AppState {
        search: SearchService::new(client),
    };
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(settings.listen_addr)
        .await
        .with_context(|| format!("Failed to bind {}", settings.listen_addr))?;

    tracing::info!(
        addr = %settings.listen_addr,
        index = %settings.index,
        "instrument-search v{} listening",
        VERSION
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
