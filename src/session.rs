// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! The owning context that drives state changes.
//!
//! All mutation happens on the task running [`Session::run`]. The network
//! refresh and the location provider run elsewhere and hand their results
//! back as [`SessionEvent`]s over one channel; UI commands use the same
//! channel through a [`SessionHandle`]. Every state change publishes a fresh
//! [`Projection`] on a watch channel.
//!
//! Startup order:
//! 1. Load the bundled snapshot and publish it
//! 2. Spawn the network refresh
//! 3. Start the location provider

use crate::db::KeyValueStore;
use crate::error::Result;
use crate::models::{Coordinate, UnitId, UnitPage, UnitView};
use crate::services::map::{self, Viewport};
use crate::services::{
    FavoritesStore, LocationEvent, LocationProvider, LocationTracker, RefreshOutcome,
    TrackingPolicy, UnitRepository,
};
use crate::state::{AppState, Change};
use std::ops::ControlFlow;
use std::sync::Arc;
use tokio::sync::{mpsc, watch};

const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Input to the session loop.
#[derive(Debug)]
pub enum SessionEvent {
    /// Result of the background network fetch
    UnitsFetched(Result<UnitPage>),
    Location(LocationEvent),
    ToggleFavorite(UnitId),
    SaveViewport(Viewport),
    Shutdown,
}

/// What the presentation layer renders.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Projection {
    pub views: Vec<UnitView>,
    pub location: Option<Coordinate>,
    /// Outcome of the network refresh, once it has finished
    pub refresh: Option<RefreshOutcome>,
    /// Incremented whenever `views` is recomputed
    pub revision: u64,
}

/// Cloneable access to a running session.
#[derive(Clone)]
pub struct SessionHandle {
    events: mpsc::Sender<SessionEvent>,
    projection: watch::Receiver<Projection>,
}

impl SessionHandle {
    /// Returns false if the session has stopped.
    pub async fn toggle_favorite(&self, id: UnitId) -> bool {
        self.send(SessionEvent::ToggleFavorite(id)).await
    }

    pub async fn save_viewport(&self, viewport: Viewport) -> bool {
        self.send(SessionEvent::SaveViewport(viewport)).await
    }

    pub async fn shutdown(&self) -> bool {
        self.send(SessionEvent::Shutdown).await
    }

    pub async fn send(&self, event: SessionEvent) -> bool {
        self.events.send(event).await.is_ok()
    }

    /// Receiver notified on every new projection.
    pub fn subscribe(&self) -> watch::Receiver<Projection> {
        self.projection.clone()
    }

    /// Latest published projection.
    pub fn current(&self) -> Projection {
        self.projection.borrow().clone()
    }
}

/// Single owner of the unit cache, the location and the favorites.
pub struct Session {
    state: AppState,
    repository: UnitRepository,
    favorites: FavoritesStore,
    kv: Arc<dyn KeyValueStore>,
    tracker: LocationTracker,
    provider: Box<dyn LocationProvider>,
    events_tx: Option<mpsc::Sender<SessionEvent>>,
    events_rx: mpsc::Receiver<SessionEvent>,
    projection_tx: watch::Sender<Projection>,
    last_refresh: Option<RefreshOutcome>,
    revision: u64,
}

impl Session {
    pub fn new(
        repository: UnitRepository,
        kv: Arc<dyn KeyValueStore>,
        provider: Box<dyn LocationProvider>,
        policy: TrackingPolicy,
    ) -> (Self, SessionHandle) {
        let (events_tx, events_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        let (projection_tx, projection_rx) = watch::channel(Projection::default());
        let favorites = FavoritesStore::open(Arc::clone(&kv));

        let state = AppState {
            favorites: favorites.current(),
            ..AppState::default()
        };

        let handle = SessionHandle {
            events: events_tx.clone(),
            projection: projection_rx,
        };

        let session = Self {
            state,
            repository,
            favorites,
            kv,
            tracker: LocationTracker::new(policy),
            provider,
            events_tx: Some(events_tx),
            events_rx,
            projection_tx,
            last_refresh: None,
            revision: 0,
        };

        (session, handle)
    }

    /// Run until shut down or every handle is dropped.
    pub async fn run(mut self) {
        let units = self.repository.load_snapshot().to_vec();
        self.transition(Change::UnitsReplaced(units));

        if let Some(events_tx) = self.events_tx.take() {
            self.spawn_refresh(events_tx.clone());
            self.spawn_location(events_tx);
        }

        while let Some(event) = self.events_rx.recv().await {
            if self.handle(event).is_break() {
                break;
            }
        }

        self.provider.stop();
        tracing::info!("Session stopped");
    }

    fn spawn_refresh(&self, events_tx: mpsc::Sender<SessionEvent>) {
        let client = self.repository.client().clone();
        tokio::spawn(async move {
            let fetched = client.fetch_units().await;
            if events_tx.send(SessionEvent::UnitsFetched(fetched)).await.is_err() {
                tracing::debug!("Session gone before refresh finished");
            }
        });
    }

    fn spawn_location(&mut self, events_tx: mpsc::Sender<SessionEvent>) {
        let mut locations = self.provider.start();
        tokio::spawn(async move {
            while let Some(event) = locations.recv().await {
                if events_tx.send(SessionEvent::Location(event)).await.is_err() {
                    break;
                }
            }
        });
    }

    fn handle(&mut self, event: SessionEvent) -> ControlFlow<()> {
        match event {
            SessionEvent::UnitsFetched(fetched) => {
                let outcome = self.repository.reconcile(fetched);
                self.last_refresh = Some(outcome.clone());
                match outcome {
                    RefreshOutcome::Replaced { .. } => {
                        let units = self.repository.units().to_vec();
                        self.transition(Change::UnitsReplaced(units));
                    }
                    RefreshOutcome::Unchanged { .. } | RefreshOutcome::Failed => {
                        self.record_refresh()
                    }
                }
            }
            SessionEvent::Location(event) => {
                let update = self.tracker.apply(event);
                if update.stop {
                    tracing::debug!("Got a location reading, stopping provider");
                    self.provider.stop();
                }
                if update.location != self.state.location {
                    self.transition(Change::LocationChanged(update.location));
                }
            }
            SessionEvent::ToggleFavorite(id) => {
                // Persisted before the new projection is published
                let favorites = self.favorites.toggle(id);
                if favorites != self.state.favorites {
                    self.transition(Change::FavoritesChanged(favorites));
                }
            }
            SessionEvent::SaveViewport(viewport) => {
                map::save_viewport(self.kv.as_ref(), &viewport);
            }
            SessionEvent::Shutdown => return ControlFlow::Break(()),
        }
        ControlFlow::Continue(())
    }

    fn transition(&mut self, change: Change) {
        self.state = std::mem::take(&mut self.state).apply(change);
        self.publish();
    }

    /// Expose the refresh outcome without re-projecting. Views and
    /// revision stay as they are.
    fn record_refresh(&mut self) {
        let refresh = self.last_refresh.clone();
        self.projection_tx.send_modify(|p| p.refresh = refresh);
    }

    fn publish(&mut self) {
        self.revision += 1;
        self.projection_tx.send_replace(Projection {
            views: self.state.project(),
            location: self.state.location,
            refresh: self.last_refresh.clone(),
            revision: self.revision,
        });
    }
}
