// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Set of favorited ("visited") unit IDs.

use crate::models::UnitId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Favorited unit IDs.
///
/// Persisted as a plain JSON array of integers. Order carries no meaning;
/// a `BTreeSet` just keeps the stored form stable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FavoritesSet(BTreeSet<UnitId>);

impl FavoritesSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: UnitId) -> bool {
        self.0.contains(&id)
    }

    /// Flip membership of `id`. Returns true if it is now a favorite.
    pub fn toggle(&mut self, id: UnitId) -> bool {
        if self.0.remove(&id) {
            false
        } else {
            self.0.insert(id);
            true
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = UnitId> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<UnitId> for FavoritesSet {
    fn from_iter<I: IntoIterator<Item = UnitId>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
