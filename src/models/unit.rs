// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Playground unit model and the open-data wire schema.

use crate::models::Coordinate;
use serde::{Deserialize, Serialize};

/// Stable unit identifier from the open-data service.
pub type UnitId = u64;

/// Locale used when the requested one is missing, in order.
const FALLBACK_LOCALES: [&str; 3] = ["fi", "sv", "en"];

/// Text in the languages the service publishes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LocalizedText {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fi: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sv: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub en: Option<String>,
}

impl LocalizedText {
    /// Text in `locale`, falling back to fi, sv, en.
    pub fn get(&self, locale: &str) -> Option<&str> {
        std::iter::once(locale)
            .chain(FALLBACK_LOCALES)
            .find_map(|l| self.lookup(l))
    }

    fn lookup(&self, locale: &str) -> Option<&str> {
        let text = match locale {
            "fi" => self.fi.as_deref(),
            "sv" => self.sv.as_deref(),
            "en" => self.en.as_deref(),
            _ => None,
        };
        text.filter(|t| !t.trim().is_empty())
    }
}

impl From<&str> for LocalizedText {
    fn from(fi: &str) -> Self {
        Self {
            fi: Some(fi.to_string()),
            ..Default::default()
        }
    }
}

/// A playground unit. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "UnitRecord")]
pub struct Unit {
    /// Service map unit ID (unique within a dataset)
    pub id: UnitId,
    pub name: LocalizedText,
    /// Absent for units without a known location
    pub coordinate: Option<Coordinate>,
    pub street_address: Option<LocalizedText>,
    pub address_zip: Option<String>,
    pub municipality: Option<String>,
    /// Service tree classification
    pub service_nodes: Vec<u64>,
    pub www: Option<LocalizedText>,
    pub accessibility_phone: Option<String>,
    pub accessibility_email: Option<String>,
}

impl Unit {
    /// Minimal unit, mostly for tests and fixtures.
    pub fn new(id: UnitId, name: &str, coordinate: Option<Coordinate>) -> Self {
        Self {
            id,
            name: LocalizedText::from(name),
            coordinate,
            street_address: None,
            address_zip: None,
            municipality: None,
            service_nodes: Vec::new(),
            www: None,
            accessibility_phone: None,
            accessibility_email: None,
        }
    }

    /// Name to show for `locale`, or a placeholder when the record has none.
    pub fn display_name(&self, locale: &str) -> String {
        self.name
            .get(locale)
            .map(str::to_string)
            .unwrap_or_else(|| format!("Unit {}", self.id))
    }
}

/// Unit as it appears in the service map JSON.
///
/// Unknown fields are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct UnitRecord {
    pub id: UnitId,
    #[serde(default)]
    pub name: LocalizedText,
    /// GeoJSON geometry, expected to be a Point in `[lon, lat]` order
    #[serde(default)]
    pub location: Option<geojson::Geometry>,
    #[serde(default)]
    pub street_address: Option<LocalizedText>,
    #[serde(default)]
    pub address_zip: Option<String>,
    #[serde(default)]
    pub municipality: Option<String>,
    #[serde(default)]
    pub service_nodes: Vec<u64>,
    #[serde(default)]
    pub www: Option<LocalizedText>,
    #[serde(default)]
    pub accessibility_phone: Option<String>,
    #[serde(default)]
    pub accessibility_email: Option<String>,
}

impl UnitRecord {
    fn coordinate(&self) -> Option<Coordinate> {
        match &self.location.as_ref()?.value {
            geojson::Value::Point(position) if position.len() >= 2 => {
                let (lon, lat) = (position[0], position[1]);
                (lat.is_finite() && lon.is_finite()).then(|| Coordinate::new(lat, lon))
            }
            _ => None,
        }
    }
}

impl From<UnitRecord> for Unit {
    fn from(record: UnitRecord) -> Self {
        let coordinate = record.coordinate();
        Self {
            id: record.id,
            name: record.name,
            coordinate,
            street_address: record.street_address,
            address_zip: record.address_zip,
            municipality: record.municipality,
            service_nodes: record.service_nodes,
            www: record.www,
            accessibility_phone: record.accessibility_phone,
            accessibility_email: record.accessibility_email,
        }
    }
}

/// Paginated response envelope, shared by the API and the bundled snapshot.
#[derive(Debug, Clone, Deserialize)]
pub struct UnitPage {
    pub count: usize,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub previous: Option<String>,
    pub results: Vec<Unit>,
}

/// Drop repeated IDs, keeping the first occurrence.
pub fn dedup_by_id(units: Vec<Unit>) -> Vec<Unit> {
    let mut seen = std::collections::HashSet::with_capacity(units.len());
    let before = units.len();
    let units: Vec<Unit> = units.into_iter().filter(|u| seen.insert(u.id)).collect();

    if units.len() != before {
        tracing::warn!(
            dropped = before - units.len(),
            "Dataset contained duplicate unit IDs"
        );
    }
    units
}
