// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Display-ready unit record produced by projection.

use crate::models::{Coordinate, Unit, UnitId};
use std::sync::Arc;

/// A unit annotated for one render.
///
/// Built fresh on every projection and never patched afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct UnitView {
    pub unit: Arc<Unit>,
    /// Present only when both the user location and the unit coordinate are known
    pub distance_meters: Option<f64>,
    pub is_favorite: bool,
}

impl UnitView {
    pub fn id(&self) -> UnitId {
        self.unit.id
    }

    pub fn coordinate(&self) -> Option<Coordinate> {
        self.unit.coordinate
    }
}
