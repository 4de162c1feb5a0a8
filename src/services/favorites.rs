// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Persistent favorites ("visited" marks).

use crate::db::{keys, KeyValueStore};
use crate::error::AppError;
use crate::models::{FavoritesSet, UnitId};
use std::sync::{Arc, Mutex, MutexGuard};

/// Favorites backed by a durable key-value store.
///
/// The set is loaded once and every toggle is written through before it
/// returns. The internal mutex serializes toggles, so handlers can call
/// this without their own locking.
pub struct FavoritesStore {
    kv: Arc<dyn KeyValueStore>,
    current: Mutex<FavoritesSet>,
}

impl FavoritesStore {
    /// Open the store and load the persisted set.
    pub fn open(kv: Arc<dyn KeyValueStore>) -> Self {
        let current = read_favorites(kv.as_ref());
        tracing::info!(count = current.len(), "Loaded favorites");
        Self {
            kv,
            current: Mutex::new(current),
        }
    }

    /// Re-read the persisted set. Missing or malformed data is an empty set.
    pub fn load(&self) -> FavoritesSet {
        let set = read_favorites(self.kv.as_ref());
        *self.lock() = set.clone();
        set
    }

    /// The in-memory set, without touching storage.
    pub fn current(&self) -> FavoritesSet {
        self.lock().clone()
    }

    /// Flip `id` and persist. Returns the resulting set.
    ///
    /// If the write fails the flip is undone, so the returned set always
    /// matches what is stored.
    pub fn toggle(&self, id: UnitId) -> FavoritesSet {
        let mut current = self.lock();
        let now_favorite = current.toggle(id);

        let written = serde_json::to_value(&*current)
            .map_err(|e| AppError::PersistenceWrite(e.to_string()))
            .and_then(|value| self.kv.set(keys::FAVORITES, value));

        match written {
            Ok(()) => {
                tracing::debug!(unit_id = id, favorite = now_favorite, "Toggled favorite");
            }
            Err(e) => {
                current.toggle(id);
                tracing::error!(unit_id = id, error = %e, "Failed to persist favorite, reverted");
            }
        }

        current.clone()
    }

    fn lock(&self) -> MutexGuard<'_, FavoritesSet> {
        // Every mutation leaves the set valid, so a poisoned lock is usable.
        self.current.lock().unwrap_or_else(|p| p.into_inner())
    }
}

/// Read favorites, degrading any failure to an empty set.
fn read_favorites(kv: &dyn KeyValueStore) -> FavoritesSet {
    let value = match kv.get(keys::FAVORITES) {
        Ok(Some(value)) => value,
        Ok(None) => return FavoritesSet::new(),
        Err(e) => {
            tracing::warn!(error = %e, "Favorites unreadable, using empty set");
            return FavoritesSet::new();
        }
    };

    serde_json::from_value(value).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Favorites malformed, using empty set");
        FavoritesSet::new()
    })
}
