// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User location: provider contract and tracking state.
//!
//! Platform location services live outside this crate. They plug in through
//! [`LocationProvider`], which pushes [`LocationEvent`]s over a channel.
//! [`LocationTracker`] folds those events into the single value the
//! projection needs: a coordinate, or nothing. Missing permission and
//! missing fix are the same thing to it.

use crate::models::Coordinate;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;

/// Channel depth between a provider and the session.
const LOCATION_CHANNEL_CAPACITY: usize = 16;

/// Location permission as reported by the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthorizationStatus {
    #[default]
    NotDetermined,
    Denied,
    Restricted,
    Authorized,
}

/// Event pushed by a location provider.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LocationEvent {
    Authorization(AuthorizationStatus),
    Fix(Coordinate),
    /// The provider lost its fix.
    FixLost,
}

/// Source of location events.
pub trait LocationProvider: Send {
    /// Begin delivering events. Called once.
    fn start(&mut self) -> mpsc::Receiver<LocationEvent>;

    /// Stop delivering events. Safe to call more than once.
    fn stop(&mut self);
}

/// How long to keep the provider running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrackingPolicy {
    /// Stop after the first usable fix.
    #[default]
    SingleReading,
    Continuous,
}

/// Effect of one event on the tracker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocationUpdate {
    /// Usable location after the event
    pub location: Option<Coordinate>,
    /// The provider should be stopped now
    pub stop: bool,
}

/// Folds location events into the current usable location.
#[derive(Debug, Default)]
pub struct LocationTracker {
    policy: TrackingPolicy,
    status: AuthorizationStatus,
    fix: Option<Coordinate>,
    stop_requested: bool,
}

impl LocationTracker {
    pub fn new(policy: TrackingPolicy) -> Self {
        Self {
            policy,
            ..Default::default()
        }
    }

    /// The location usable for distance sorting, if any.
    pub fn current(&self) -> Option<Coordinate> {
        match self.status {
            AuthorizationStatus::Authorized => self.fix,
            _ => None,
        }
    }

    pub fn status(&self) -> AuthorizationStatus {
        self.status
    }

    pub fn apply(&mut self, event: LocationEvent) -> LocationUpdate {
        match event {
            LocationEvent::Authorization(status) => {
                if status != AuthorizationStatus::Authorized {
                    // A revoked permission must not leave a stale fix behind
                    self.fix = None;
                }
                self.status = status;
            }
            LocationEvent::Fix(coordinate) => {
                if self.status == AuthorizationStatus::Authorized {
                    self.fix = Some(coordinate);
                } else {
                    tracing::debug!(status = ?self.status, "Ignoring fix without authorization");
                }
            }
            LocationEvent::FixLost => self.fix = None,
        }

        let location = self.current();
        let stop = !self.stop_requested
            && self.policy == TrackingPolicy::SingleReading
            && location.is_some();
        if stop {
            self.stop_requested = true;
        }

        LocationUpdate { location, stop }
    }
}

/// Provider reporting one fixed coordinate, as if permission was granted.
pub struct FixedLocationProvider {
    coordinate: Coordinate,
}

impl FixedLocationProvider {
    pub fn new(coordinate: Coordinate) -> Self {
        Self { coordinate }
    }
}

impl LocationProvider for FixedLocationProvider {
    fn start(&mut self) -> mpsc::Receiver<LocationEvent> {
        let (tx, rx) = mpsc::channel(LOCATION_CHANNEL_CAPACITY);
        // Capacity covers both events, so try_send cannot fail here
        let _ = tx.try_send(LocationEvent::Authorization(AuthorizationStatus::Authorized));
        let _ = tx.try_send(LocationEvent::Fix(self.coordinate));
        rx
    }

    fn stop(&mut self) {}
}

/// Provider for a device without location permission.
#[derive(Default)]
pub struct DeniedLocationProvider;

impl LocationProvider for DeniedLocationProvider {
    fn start(&mut self) -> mpsc::Receiver<LocationEvent> {
        let (tx, rx) = mpsc::channel(1);
        let _ = tx.try_send(LocationEvent::Authorization(AuthorizationStatus::Denied));
        rx
    }

    fn stop(&mut self) {}
}

/// Provider fed by hand through a [`LocationFeed`].
///
/// Bridges push-style platform callbacks into the channel contract.
pub struct ChannelLocationProvider {
    rx: Option<mpsc::Receiver<LocationEvent>>,
    stopped: Arc<AtomicBool>,
}

/// Sending half of a [`ChannelLocationProvider`].
#[derive(Clone)]
pub struct LocationFeed {
    tx: mpsc::Sender<LocationEvent>,
    stopped: Arc<AtomicBool>,
}

impl ChannelLocationProvider {
    pub fn new() -> (Self, LocationFeed) {
        let (tx, rx) = mpsc::channel(LOCATION_CHANNEL_CAPACITY);
        let stopped = Arc::new(AtomicBool::new(false));
        let provider = Self {
            rx: Some(rx),
            stopped: Arc::clone(&stopped),
        };
        (provider, LocationFeed { tx, stopped })
    }
}

impl LocationProvider for ChannelLocationProvider {
    fn start(&mut self) -> mpsc::Receiver<LocationEvent> {
        self.rx.take().unwrap_or_else(|| {
            tracing::warn!("Location provider started twice");
            mpsc::channel(1).1
        })
    }

    fn stop(&mut self) {
        self.stopped.store(true, Ordering::SeqCst);
    }
}

impl LocationFeed {
    /// Deliver an event. Returns false once the provider is stopped or the
    /// receiver is gone.
    pub async fn send(&self, event: LocationEvent) -> bool {
        if self.is_stopped() {
            return false;
        }
        self.tx.send(event).await.is_ok()
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }
}
