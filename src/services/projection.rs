// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Projection of units into the sorted, annotated view list.

use crate::geo_distance::distance_meters;
use crate::models::{Coordinate, FavoritesSet, Unit, UnitView};
use std::sync::Arc;

/// Build the display list.
///
/// Without a user location every unit is returned in dataset order with no
/// distance. With one, units lacking a coordinate are dropped and the rest
/// are sorted nearest first; equal distances keep dataset order.
///
/// `is_favorite` always comes from `favorites`.
pub fn project(
    units: &[Arc<Unit>],
    user_location: Option<Coordinate>,
    favorites: &FavoritesSet,
) -> Vec<UnitView> {
    let view = |unit: &Arc<Unit>, distance_meters: Option<f64>| UnitView {
        unit: Arc::clone(unit),
        distance_meters,
        is_favorite: favorites.contains(unit.id),
    };

    let Some(user) = user_location else {
        return units.iter().map(|u| view(u, None)).collect();
    };

    let mut views: Vec<(f64, UnitView)> = units
        .iter()
        .filter_map(|u| {
            let d = distance_meters(user, u.coordinate?);
            Some((d, view(u, Some(d))))
        })
        .collect();

    // `sort_by` is stable
    views.sort_by(|(a, _), (b, _)| a.total_cmp(b));
    views.into_iter().map(|(_, v)| v).collect()
}
