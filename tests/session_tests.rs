// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session wiring: snapshot first, refresh second, location and favorites.

mod common;

use common::{
    page_json, spawn_fake_api, spawn_fake_api_with_delay, test_config, unit_json, wait_for, Reply,
};
use playground_map::db::{keys, KeyValueStore, MemoryStore};
use playground_map::models::Coordinate;
use playground_map::services::map::{load_viewport, Viewport};
use playground_map::services::{
    AuthorizationStatus, ChannelLocationProvider, DeniedLocationProvider, LocationEvent,
    LocationFeed, LocationProvider, RefreshOutcome, ServiceMapClient, SnapshotSource,
    TrackingPolicy, UnitRepository,
};
use playground_map::{Session, SessionHandle};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

const HOME: Coordinate = Coordinate::new(60.1710, 24.9414);

struct Harness {
    handle: SessionHandle,
    kv: Arc<MemoryStore>,
    task: tokio::task::JoinHandle<()>,
}

fn start(
    url: &str,
    kv: Arc<MemoryStore>,
    provider: Box<dyn LocationProvider>,
    policy: TrackingPolicy,
) -> Harness {
    let client = ServiceMapClient::new(&test_config(url)).unwrap();
    let repository = UnitRepository::new(client, SnapshotSource::Bundled);
    let (session, handle) = Session::new(repository, kv.clone(), provider, policy);
    let task = tokio::spawn(session.run());
    Harness { handle, kv, task }
}

fn start_with_feed(url: &str, policy: TrackingPolicy) -> (Harness, LocationFeed) {
    let (provider, feed) = ChannelLocationProvider::new();
    let harness = start(url, Arc::new(MemoryStore::new()), Box::new(provider), policy);
    (harness, feed)
}

async fn authorize_at(feed: &LocationFeed, at: Coordinate) {
    assert!(
        feed.send(LocationEvent::Authorization(AuthorizationStatus::Authorized))
            .await
    );
    assert!(feed.send(LocationEvent::Fix(at)).await);
}

#[tokio::test]
async fn test_snapshot_visible_before_network() {
    let api = spawn_fake_api_with_delay(
        vec![Reply::Json(page_json(
            1,
            vec![unit_json(1, "Verkosta", Some((60.2, 24.9)))],
            None,
        ))],
        Duration::from_millis(500),
    )
    .await;
    let (harness, _feed) = start_with_feed(&api.url, TrackingPolicy::SingleReading);
    let mut rx = harness.handle.subscribe();

    let first = wait_for(&mut rx, |p| p.revision >= 1).await;
    assert_eq!(first.views.len(), 6, "snapshot published first");
    assert_eq!(first.refresh, None);

    let refreshed = wait_for(&mut rx, |p| p.refresh.is_some()).await;
    assert_eq!(
        refreshed.refresh,
        Some(RefreshOutcome::Replaced {
            previous: 6,
            current: 1
        })
    );
    assert_eq!(refreshed.views.len(), 1);
    assert_eq!(refreshed.views[0].id(), 1);

    harness.handle.shutdown().await;
    harness.task.await.unwrap();
}

#[tokio::test]
async fn test_failed_refresh_keeps_snapshot() {
    let api = spawn_fake_api(vec![Reply::Status(500, "down".to_string())]).await;
    let (harness, _feed) = start_with_feed(&api.url, TrackingPolicy::SingleReading);
    let mut rx = harness.handle.subscribe();

    let projection = wait_for(&mut rx, |p| p.refresh.is_some()).await;
    assert_eq!(projection.refresh, Some(RefreshOutcome::Failed));
    assert_eq!(projection.views.len(), 6);
}

#[tokio::test]
async fn test_same_count_refresh_does_not_reproject() {
    let api = spawn_fake_api(vec![Reply::Json(page_json(
        6,
        (1..=6)
            .map(|id| unit_json(id, "Eri sisältö", Some((61.0, 23.0))))
            .collect(),
        None,
    ))])
    .await;
    let (harness, _feed) = start_with_feed(&api.url, TrackingPolicy::SingleReading);
    let mut rx = harness.handle.subscribe();

    let snapshot = wait_for(&mut rx, |p| p.revision >= 1).await;
    let refreshed = wait_for(&mut rx, |p| p.refresh.is_some()).await;

    assert_eq!(refreshed.refresh, Some(RefreshOutcome::Unchanged { count: 6 }));
    assert_eq!(refreshed.revision, snapshot.revision);
    assert_eq!(refreshed.views, snapshot.views);
    assert!(refreshed
        .views
        .iter()
        .zip(&snapshot.views)
        .all(|(a, b)| Arc::ptr_eq(&a.unit, &b.unit)));
}

#[tokio::test]
async fn test_failed_refresh_does_not_reproject() {
    let api = spawn_fake_api(vec![Reply::Status(500, "down".to_string())]).await;
    let (harness, _feed) = start_with_feed(&api.url, TrackingPolicy::SingleReading);
    let mut rx = harness.handle.subscribe();

    let snapshot = wait_for(&mut rx, |p| p.revision >= 1).await;
    let refreshed = wait_for(&mut rx, |p| p.refresh.is_some()).await;
    assert_eq!(refreshed.refresh, Some(RefreshOutcome::Failed));
    assert_eq!(refreshed.revision, snapshot.revision);
}

#[tokio::test]
async fn test_location_resorts_and_drops_uncoordinated() {
    let api = spawn_fake_api(vec![Reply::Status(500, "down".to_string())]).await;
    let (harness, feed) = start_with_feed(&api.url, TrackingPolicy::Continuous);
    let mut rx = harness.handle.subscribe();

    let unlocated = wait_for(&mut rx, |p| p.revision >= 1).await;
    assert_eq!(unlocated.views.len(), 6);

    authorize_at(&feed, HOME).await;
    let located = wait_for(&mut rx, |p| p.location == Some(HOME)).await;
    assert_eq!(located.views.len(), 5, "unit without a location is hidden");
    assert!(located
        .views
        .windows(2)
        .all(|w| w[0].distance_meters <= w[1].distance_meters));
    assert_eq!(located.views[0].id(), 40393, "Kaisaniemi is nearest");

    // Revoking permission falls back to the unsorted list
    assert!(
        feed.send(LocationEvent::Authorization(AuthorizationStatus::Denied))
            .await
    );
    let revoked = wait_for(&mut rx, |p| {
        p.location.is_none() && p.revision > located.revision
    })
    .await;
    assert_eq!(revoked.views.len(), 6);
    assert!(revoked.views.iter().all(|v| v.distance_meters.is_none()));
}

#[tokio::test]
async fn test_single_reading_stops_provider() {
    let api = spawn_fake_api(vec![Reply::Status(500, "down".to_string())]).await;
    let (harness, feed) = start_with_feed(&api.url, TrackingPolicy::SingleReading);
    let mut rx = harness.handle.subscribe();

    authorize_at(&feed, HOME).await;
    wait_for(&mut rx, |p| p.location == Some(HOME)).await;

    assert!(feed.is_stopped());
    assert!(!feed.send(LocationEvent::Fix(Coordinate::new(61.0, 23.0))).await);
}

#[tokio::test]
async fn test_denied_location_lists_everything() {
    let api = spawn_fake_api(vec![Reply::Status(500, "down".to_string())]).await;
    let harness = start(
        &api.url,
        Arc::new(MemoryStore::new()),
        Box::new(DeniedLocationProvider),
        TrackingPolicy::SingleReading,
    );
    let mut rx = harness.handle.subscribe();

    let projection = wait_for(&mut rx, |p| p.refresh.is_some()).await;
    assert_eq!(projection.location, None);
    assert_eq!(projection.views.len(), 6);
}

#[tokio::test]
async fn test_toggle_persists_before_publish() {
    let api = spawn_fake_api(vec![Reply::Status(500, "down".to_string())]).await;
    let kv = Arc::new(MemoryStore::new());
    kv.set(keys::FAVORITES, json!([40374])).unwrap();

    let (provider, _feed) = ChannelLocationProvider::new();
    let harness = start(&api.url, kv, Box::new(provider), TrackingPolicy::SingleReading);
    let mut rx = harness.handle.subscribe();

    let initial = wait_for(&mut rx, |p| p.revision >= 1).await;
    let favorite_ids: Vec<_> = initial
        .views
        .iter()
        .filter(|v| v.is_favorite)
        .map(|v| v.id())
        .collect();
    assert_eq!(favorite_ids, vec![40374], "favorites loaded at startup");

    // Unit without a coordinate
    assert!(harness.handle.toggle_favorite(40533).await);
    let toggled = wait_for(&mut rx, |p| {
        p.views.iter().any(|v| v.id() == 40533 && v.is_favorite)
    })
    .await;
    assert_eq!(
        harness.kv.get(keys::FAVORITES).unwrap(),
        Some(json!([40374, 40533]))
    );

    assert!(harness.handle.toggle_favorite(40533).await);
    wait_for(&mut rx, |p| p.revision > toggled.revision).await;
    assert_eq!(harness.kv.get(keys::FAVORITES).unwrap(), Some(json!([40374])));
}

#[tokio::test]
async fn test_save_viewport() {
    let api = spawn_fake_api(vec![Reply::Status(500, "down".to_string())]).await;
    let (harness, _feed) = start_with_feed(&api.url, TrackingPolicy::SingleReading);

    let viewport = Viewport {
        center: HOME,
        lat_span: 0.05,
        lon_span: 0.1,
    };
    assert!(harness.handle.save_viewport(viewport).await);
    harness.handle.shutdown().await;
    harness.task.await.unwrap();

    assert_eq!(load_viewport(harness.kv.as_ref()), Some(viewport));
}

#[tokio::test]
async fn test_session_stops_on_shutdown() {
    let url = common::dead_url().await;
    let (harness, _feed) = start_with_feed(&url, TrackingPolicy::SingleReading);

    assert!(harness.handle.shutdown().await);
    tokio::time::timeout(Duration::from_secs(5), harness.task)
        .await
        .expect("session should stop")
        .unwrap();

    assert!(!harness.handle.toggle_favorite(1).await);
}
