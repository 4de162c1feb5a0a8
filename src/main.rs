// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Headless driver for the playground map core.
//!
//! Loads the snapshot, refreshes from the service map API, sorts by the
//! configured location, logs the nearest units and prints the final
//! projection as GeoJSON on stdout.

use anyhow::Context;
use playground_map::{
    config::Config,
    db::{FileStore, KeyValueStore},
    services::{
        map, DeniedLocationProvider, FixedLocationProvider, LocationProvider, ServiceMapClient,
        SnapshotSource, TrackingPolicy, UnitRepository,
    },
    Session,
};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// How many of the nearest units to log per projection.
const LOG_NEAREST: usize = 5;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!(
        url = %config.units_api_url,
        service = %config.units_service,
        "Starting playground map"
    );

    let kv: Arc<dyn KeyValueStore> = Arc::new(FileStore::new(&config.store_path));

    let client = ServiceMapClient::new(&config).context("Failed to build HTTP client")?;
    let snapshot = config
        .snapshot_path
        .clone()
        .map(SnapshotSource::File)
        .unwrap_or_default();
    let repository = UnitRepository::new(client, snapshot);

    let provider: Box<dyn LocationProvider> = match config.fixed_location {
        Some(coordinate) => Box::new(FixedLocationProvider::new(coordinate)),
        None => Box::new(DeniedLocationProvider),
    };

    let (session, handle) = Session::new(
        repository,
        Arc::clone(&kv),
        provider,
        TrackingPolicy::SingleReading,
    );
    let session_task = tokio::spawn(session.run());

    // Wait for the refresh outcome, or give up a little after the HTTP timeout.
    let mut projections = handle.subscribe();
    let deadline = tokio::time::sleep(config.request_timeout + Duration::from_secs(2));
    tokio::pin!(deadline);

    loop {
        tokio::select! {
            changed = projections.changed() => {
                if changed.is_err() {
                    break;
                }
                let projection = projections.borrow_and_update().clone();
                log_projection(&projection, &config.display_locale);
                let located = config.fixed_location.is_none() || projection.location.is_some();
                if projection.refresh.is_some() && located {
                    break;
                }
            }
            _ = &mut deadline => {
                tracing::warn!("Timed out waiting for refresh, using what we have");
                break;
            }
        }
    }

    let projection = handle.current();
    let units: Vec<_> = projection.views.iter().map(|v| Arc::clone(&v.unit)).collect();
    if let Some(viewport) = map::initial_viewport(kv.as_ref(), &units) {
        tracing::info!(
            lat = viewport.center.latitude,
            lon = viewport.center.longitude,
            lat_span = viewport.lat_span,
            lon_span = viewport.lon_span,
            "Map viewport"
        );
    }

    let collection = map::feature_collection(&projection.views, &config.display_locale);
    println!("{}", serde_json::to_string_pretty(&collection)?);

    handle.shutdown().await;
    session_task.await.context("Session task failed")?;
    Ok(())
}

fn log_projection(projection: &playground_map::Projection, locale: &str) {
    tracing::info!(
        revision = projection.revision,
        units = projection.views.len(),
        located = projection.location.is_some(),
        refresh = ?projection.refresh,
        "Projection updated"
    );

    for view in projection.views.iter().take(LOG_NEAREST) {
        tracing::debug!(
            id = view.id(),
            name = %view.unit.display_name(locale),
            distance_meters = ?view.distance_meters,
            favorite = view.is_favorite,
            "Unit"
        );
    }
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new("playground_map=debug,info")
            }),
        )
        .with(format)
        .init();
}
