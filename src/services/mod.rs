// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod favorites;
pub mod location;
pub mod map;
pub mod projection;
pub mod repository;
pub mod servicemap;

pub use favorites::FavoritesStore;
pub use location::{
    AuthorizationStatus, ChannelLocationProvider, DeniedLocationProvider, FixedLocationProvider,
    LocationEvent, LocationFeed, LocationProvider, LocationTracker, TrackingPolicy,
};
pub use map::Viewport;
pub use projection::project;
pub use repository::{RefreshOutcome, SnapshotSource, UnitRepository};
pub use servicemap::ServiceMapClient;
