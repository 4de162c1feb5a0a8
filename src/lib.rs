// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Playground map: nearby public playgrounds from municipal open data.
//!
//! This crate provides the view-model core: loading units from a bundled
//! snapshot and the service map API, sorting them by distance from the
//! user, and keeping the user's favorites.

pub mod config;
pub mod db;
pub mod error;
pub mod geo_distance;
pub mod models;
pub mod services;
pub mod session;
pub mod state;

pub use session::{Projection, Session, SessionEvent, SessionHandle};
pub use state::{AppState, Change};
