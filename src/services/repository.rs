// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Unit loading: bundled snapshot first, then network refresh.

use crate::error::{AppError, Result};
use crate::models::unit::dedup_by_id;
use crate::models::{Unit, UnitPage};
use crate::services::ServiceMapClient;
use chrono::{DateTime, Utc};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

/// Snapshot of the unit list shipped with the application.
pub const BUNDLED_SNAPSHOT: &str = include_str!("../../data/units_snapshot.json");

/// Where the startup snapshot comes from.
#[derive(Debug, Clone, Default)]
pub enum SnapshotSource {
    #[default]
    Bundled,
    File(PathBuf),
}

/// Result of reconciling a fetch with the held units.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// Fetched count differed; the unit set was replaced.
    Replaced { previous: usize, current: usize },
    /// Fetched count matched the held count; nothing changed.
    ///
    /// Content edits that keep the count the same are missed here.
    Unchanged { count: usize },
    /// Network or decode failure; nothing changed.
    Failed,
}

/// Parse a snapshot document (same envelope as the API).
pub fn parse_snapshot(json_data: &str) -> Result<Vec<Unit>> {
    let page: UnitPage = serde_json::from_str(json_data)
        .map_err(|e| AppError::AssetUnavailable(format!("Malformed snapshot: {}", e)))?;
    Ok(dedup_by_id(page.results))
}

/// Read and parse a snapshot.
pub fn read_snapshot(source: &SnapshotSource) -> Result<Vec<Unit>> {
    match source {
        SnapshotSource::Bundled => parse_snapshot(BUNDLED_SNAPSHOT),
        SnapshotSource::File(path) => {
            let json_data = fs::read_to_string(path).map_err(|e| {
                AppError::AssetUnavailable(format!("{}: {}", path.display(), e))
            })?;
            parse_snapshot(&json_data)
        }
    }
}

/// Holds the current unit set.
pub struct UnitRepository {
    client: ServiceMapClient,
    snapshot: SnapshotSource,
    units: Vec<Arc<Unit>>,
    last_refreshed: Option<DateTime<Utc>>,
}

impl UnitRepository {
    pub fn new(client: ServiceMapClient, snapshot: SnapshotSource) -> Self {
        Self {
            client,
            snapshot,
            units: Vec::new(),
            last_refreshed: None,
        }
    }

    /// Current units, in dataset order.
    pub fn units(&self) -> &[Arc<Unit>] {
        &self.units
    }

    /// When the network last replaced the unit set.
    pub fn last_refreshed(&self) -> Option<DateTime<Utc>> {
        self.last_refreshed
    }

    pub fn client(&self) -> &ServiceMapClient {
        &self.client
    }

    /// Populate from the snapshot. A missing or malformed snapshot yields
    /// an empty set.
    pub fn load_snapshot(&mut self) -> &[Arc<Unit>] {
        let units = match read_snapshot(&self.snapshot) {
            Ok(units) => {
                tracing::info!(count = units.len(), "Loaded unit snapshot");
                units
            }
            Err(e) => {
                tracing::error!(error = %e, "Snapshot unavailable, starting empty");
                Vec::new()
            }
        };

        self.units = units.into_iter().map(Arc::new).collect();
        &self.units
    }

    /// Fetch from the network and reconcile. Never fails; on error the
    /// previously loaded units are kept.
    pub async fn refresh(&mut self) -> &[Arc<Unit>] {
        let fetched = self.client.fetch_units().await;
        self.reconcile(fetched);
        &self.units
    }

    /// Apply a fetch result.
    ///
    /// Units are replaced only when the fetched `count` differs from the
    /// number held. Same-count content changes are not detected.
    ///
    /// A page-limited fetch holds fewer units than its `count`, so every
    /// later refresh of that dataset is a replacement.
    pub fn reconcile(&mut self, fetched: Result<UnitPage>) -> RefreshOutcome {
        let page = match fetched {
            Ok(page) => page,
            Err(e) if e.is_refresh_failure() => {
                tracing::warn!(error = %e, held = self.units.len(), "Refresh failed, keeping units");
                return RefreshOutcome::Failed;
            }
            Err(e) => {
                tracing::error!(
                    error = %e,
                    held = self.units.len(),
                    "Unexpected refresh error, keeping units"
                );
                return RefreshOutcome::Failed;
            }
        };

        let previous = self.units.len();
        if page.count == previous {
            tracing::debug!(count = previous, "Unit count unchanged, skipping refresh");
            return RefreshOutcome::Unchanged { count: previous };
        }

        self.units = dedup_by_id(page.results)
            .into_iter()
            .map(Arc::new)
            .collect();
        self.last_refreshed = Some(Utc::now());

        let current = self.units.len();
        tracing::info!(previous, current, "Replaced units from network");
        if current != page.count {
            tracing::warn!(
                count = page.count,
                held = current,
                "Held units differ from reported count, next refresh will replace again"
            );
        }
        RefreshOutcome::Replaced { previous, current }
    }
}
