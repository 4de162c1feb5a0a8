// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application state and its transitions.

use crate::models::{Coordinate, FavoritesSet, Unit, UnitView};
use crate::services::projection::project;
use std::sync::Arc;

/// Inputs to the projection. Replaced, never mutated in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppState {
    pub units: Vec<Arc<Unit>>,
    pub location: Option<Coordinate>,
    pub favorites: FavoritesSet,
}

/// A transition of [`AppState`].
#[derive(Debug, Clone, PartialEq)]
pub enum Change {
    UnitsReplaced(Vec<Arc<Unit>>),
    LocationChanged(Option<Coordinate>),
    FavoritesChanged(FavoritesSet),
}

impl AppState {
    /// `(state, change) -> state`
    pub fn apply(self, change: Change) -> Self {
        match change {
            Change::UnitsReplaced(units) => Self { units, ..self },
            Change::LocationChanged(location) => Self { location, ..self },
            Change::FavoritesChanged(favorites) => Self { favorites, ..self },
        }
    }

    pub fn project(&self) -> Vec<UnitView> {
        project(&self.units, self.location, &self.favorites)
    }
}
