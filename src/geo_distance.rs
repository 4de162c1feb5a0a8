// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Great-circle distance between two coordinates.

use crate::models::Coordinate;
use geo::{Distance, Haversine, Point};

/// Mean Earth radius used by `geo`'s haversine, in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_008.8;

/// Haversine distance in meters.
///
/// Symmetric in its arguments and exactly zero for identical points.
#[inline]
pub fn distance_meters(from: Coordinate, to: Coordinate) -> f64 {
    Haversine.distance(Point::from(from), Point::from(to))
}
