// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod coordinate;
pub mod favorites;
pub mod unit;
pub mod view;

pub use coordinate::Coordinate;
pub use favorites::FavoritesSet;
pub use unit::{LocalizedText, Unit, UnitId, UnitPage, UnitRecord};
pub use view::UnitView;
