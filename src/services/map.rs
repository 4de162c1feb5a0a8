// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Map layer support: viewport fitting/persistence and GeoJSON export.

use crate::db::{keys, KeyValueStore};
use crate::error::AppError;
use crate::models::{Coordinate, Unit, UnitView};
use geo::BoundingRect;
use geojson::{feature::Id, Feature, FeatureCollection, Geometry};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use std::sync::Arc;

/// Extra room around fitted units, as a fraction of the span.
const FIT_MARGIN: f64 = 0.1;

/// Smallest span in degrees, so a single unit does not zoom to street level.
const MIN_SPAN_DEGREES: f64 = 0.005;

/// Visible map region.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub center: Coordinate,
    pub lat_span: f64,
    pub lon_span: f64,
}

impl Viewport {
    /// Region covering every unit with a coordinate.
    pub fn fit(units: &[Arc<Unit>]) -> Option<Self> {
        let points: Vec<geo::Point<f64>> = units
            .iter()
            .filter_map(|u| u.coordinate)
            .map(geo::Point::from)
            .collect();

        let rect = geo::MultiPoint(points).bounding_rect()?;
        let center = rect.center();

        Some(Self {
            center: Coordinate::new(center.y, center.x),
            lat_span: (rect.height() * (1.0 + FIT_MARGIN)).max(MIN_SPAN_DEGREES),
            lon_span: (rect.width() * (1.0 + FIT_MARGIN)).max(MIN_SPAN_DEGREES),
        })
    }

    pub fn contains(&self, c: Coordinate) -> bool {
        (c.latitude - self.center.latitude).abs() <= self.lat_span / 2.0
            && (c.longitude - self.center.longitude).abs() <= self.lon_span / 2.0
    }
}

/// Last saved viewport, if any. Failures are logged and ignored.
pub fn load_viewport(kv: &dyn KeyValueStore) -> Option<Viewport> {
    match kv.get(keys::MAP_VIEWPORT) {
        Ok(Some(value)) => serde_json::from_value(value)
            .map_err(|e| tracing::warn!(error = %e, "Ignoring malformed saved viewport"))
            .ok(),
        Ok(None) => None,
        Err(e) => {
            tracing::warn!(error = %e, "Saved viewport unreadable");
            None
        }
    }
}

/// Remember the viewport. Best effort.
pub fn save_viewport(kv: &dyn KeyValueStore, viewport: &Viewport) {
    let result = serde_json::to_value(viewport)
        .map_err(|e| AppError::PersistenceWrite(e.to_string()))
        .and_then(|value| kv.set(keys::MAP_VIEWPORT, value));

    if let Err(e) = result {
        tracing::warn!(error = %e, "Failed to save viewport");
    }
}

/// Viewport to open the map at: the saved one, else one fitting the units.
pub fn initial_viewport(kv: &dyn KeyValueStore, units: &[Arc<Unit>]) -> Option<Viewport> {
    load_viewport(kv).or_else(|| Viewport::fit(units))
}

/// Render views as GeoJSON points. Views without a coordinate are skipped.
pub fn feature_collection(views: &[UnitView], locale: &str) -> FeatureCollection {
    let features = views
        .iter()
        .filter_map(|view| {
            let c = view.coordinate()?;

            let mut properties = Map::new();
            properties.insert("id".to_string(), Value::from(view.id()));
            properties.insert(
                "name".to_string(),
                Value::from(view.unit.display_name(locale)),
            );
            properties.insert("is_favorite".to_string(), Value::from(view.is_favorite));
            if let Some(d) = view.distance_meters.and_then(Number::from_f64) {
                properties.insert("distance_meters".to_string(), Value::Number(d));
            }

            Some(Feature {
                bbox: None,
                geometry: Some(Geometry::new(geojson::Value::Point(vec![
                    c.longitude,
                    c.latitude,
                ]))),
                id: Some(Id::Number(Number::from(view.id()))),
                properties: Some(properties),
                foreign_members: None,
            })
        })
        .collect();

    FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }
}
