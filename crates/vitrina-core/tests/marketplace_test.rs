// Integration tests for `Marketplace` against a wiremock backend.
#![allow(clippy::unwrap_used)]

use chrono::{Duration, Utc};
use pretty_assertions::assert_eq;
use secrecy::SecretString;
use serde_json::{Value, json};
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use vitrina_core::{
    AuthCredentials, Command, CommandResult, CoreError, Marketplace, MarketplaceConfig,
    MockSettings, Preview, Role, ShopStatus, StreamFilter, ViewMode,
};

// ── Helpers ─────────────────────────────────────────────────────────

fn config(server: &MockServer, auth: AuthCredentials) -> MarketplaceConfig {
    let mut cfg = MarketplaceConfig::new(
        Url::parse(&format!("{}/api/", server.uri())).unwrap(),
        Url::parse(&format!("{}/v1/", server.uri())).unwrap(),
        SecretString::from("key-1".to_owned()),
    );
    cfg.auth = auth;
    cfg.mock = MockSettings {
        enabled: false,
        ..MockSettings::default()
    };
    cfg.reel_sweep_interval_secs = 0;
    cfg.refresh_after_mutation = false;
    cfg
}

fn token() -> AuthCredentials {
    AuthCredentials::Token(SecretString::from("id-tok".to_owned()))
}

async fn mount_get(server: &MockServer, route: &str, body: Value) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

async fn mount_catalog(server: &MockServer) {
    let soon = Utc::now() + Duration::hours(2);
    mount_get(
        server,
        "/api/shops",
        json!([
            { "id": "s1", "name": "Moda Urbana", "status": "ACTIVE", "plan": "Maxima Visibilidad" },
            { "id": "s2", "name": "Sin Estado" },
            { "id": "s3", "name": "Suspendida", "status": "SUSPENDED" }
        ]),
    )
    .await;
    mount_get(
        server,
        "/api/streams",
        json!([
            { "id": "live-1", "shopId": "s1", "title": "Liquidación", "status": "LIVE" },
            { "id": "up-1", "shopId": "s1", "status": "UPCOMING", "scheduledAt": soon },
            { "id": "hidden-1", "shopId": "s2", "status": "LIVE" },
            { "id": "orphan-1", "shopId": "gone", "status": "LIVE" },
            { "id": "banned-1", "shopId": "s1", "status": "BANNED" }
        ]),
    )
    .await;
    mount_get(
        server,
        "/api/reels",
        json!([
            { "id": "r-new", "shopId": "s1", "createdAt": Utc::now() - Duration::hours(1) },
            { "id": "r-old", "shopId": "s1", "createdAt": Utc::now() - Duration::hours(30) }
        ]),
    )
    .await;
}

async fn mount_identity(server: &MockServer, role: &str, shop_id: Option<&str>) {
    Mock::given(method("POST"))
        .and(path("/v1/accounts:lookup"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "users": [{ "localId": "u1", "email": "ana@example.com", "emailVerified": true }]
        })))
        .mount(server)
        .await;
    mount_get(
        server,
        "/api/me",
        json!({
            "uid": "u1",
            "email": "ana@example.com",
            "role": role,
            "shopId": shop_id,
            "favorites": ["s1"]
        }),
    )
    .await;
    mount_get(server, "/api/notifications", json!([])).await;
}

async fn connected(server: &MockServer, auth: AuthCredentials) -> Marketplace {
    let marketplace = Marketplace::new(config(server, auth)).unwrap();
    marketplace.connect().await.unwrap();
    marketplace
}

// ── Refresh & normalization ─────────────────────────────────────────

#[tokio::test]
async fn test_anonymous_refresh_normalizes_catalog() {
    let server = MockServer::start().await;
    mount_catalog(&server).await;

    let marketplace = connected(&server, AuthCredentials::Anonymous).await;

    assert!(!marketplace.session().is_authenticated());
    assert_eq!(marketplace.shops_snapshot().len(), 3);

    let public: Vec<String> = marketplace
        .public_shops()
        .iter()
        .map(|s| s.id.clone())
        .collect();
    assert_eq!(public, vec!["s1".to_owned(), "s2".to_owned()]);

    let listed: Vec<String> = marketplace
        .streams_for(StreamFilter::All)
        .iter()
        .map(|s| s.id.clone())
        .collect();
    assert_eq!(listed, vec!["live-1".to_owned(), "up-1".to_owned()]);

    let orphan = marketplace.stream("orphan-1").unwrap();
    assert_eq!(orphan.shop.name, "Sin Tienda Seleccionada");

    let reels: Vec<String> = marketplace
        .active_reels()
        .iter()
        .map(|r| r.id.clone())
        .collect();
    assert_eq!(reels, vec!["r-new".to_owned()]);

    marketplace.disconnect().await;
}

#[tokio::test]
async fn test_mock_content_fills_empty_catalog() {
    let server = MockServer::start().await;
    mount_get(
        &server,
        "/api/shops",
        json!([{ "id": "s1", "name": "Moda Urbana", "status": "ACTIVE" }]),
    )
    .await;
    mount_get(&server, "/api/streams", json!([])).await;
    mount_get(&server, "/api/reels", json!([])).await;

    let mut cfg = config(&server, AuthCredentials::Anonymous);
    cfg.mock = MockSettings::default();
    let marketplace = Marketplace::new(cfg).unwrap();
    marketplace.connect().await.unwrap();

    let streams = marketplace.streams_for(StreamFilter::All);
    assert_eq!(streams.len(), 1);
    assert!(streams[0].is_mock());
    assert_eq!(streams[0].status, vitrina_core::StreamStatus::Live);

    marketplace.disconnect().await;
}

// ── Client interactions ─────────────────────────────────────────────

#[tokio::test]
async fn test_client_actions_require_sign_in() {
    let server = MockServer::start().await;
    mount_catalog(&server).await;

    let marketplace = connected(&server, AuthCredentials::Anonymous).await;
    let err = marketplace
        .execute(Command::ToggleFavorite {
            shop_id: "s1".into(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::NotSignedIn));

    marketplace.disconnect().await;
}

#[tokio::test]
async fn test_reminder_on_upcoming_offers_invite() {
    let server = MockServer::start().await;
    mount_catalog(&server).await;
    mount_identity(&server, "CLIENT", None).await;
    Mock::given(method("POST"))
        .and(path("/api/me/reminders/up-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "reminders": ["up-1"] })))
        .expect(1)
        .mount(&server)
        .await;

    let marketplace = connected(&server, token()).await;
    assert_eq!(marketplace.session().view_mode(), ViewMode::Client);
    assert!(marketplace.user_context().is_favorite("s1"));

    let result = marketplace
        .execute(Command::ToggleReminder {
            stream_id: "up-1".into(),
        })
        .await
        .unwrap();

    match result {
        CommandResult::Reminders {
            added,
            offer_invite,
            ..
        } => {
            assert!(added);
            assert!(offer_invite);
        }
        other => panic!("unexpected result: {other:?}"),
    }
    assert!(marketplace.user_context().has_reminder("up-1"));

    marketplace.disconnect().await;
}

#[tokio::test]
async fn test_removing_reminder_offers_no_invite() {
    let server = MockServer::start().await;
    mount_catalog(&server).await;
    mount_identity(&server, "CLIENT", None).await;
    Mock::given(method("POST"))
        .and(path("/api/me/reminders/up-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "reminders": [] })))
        .expect(1)
        .mount(&server)
        .await;

    let marketplace = connected(&server, token()).await;
    let result = marketplace
        .execute(Command::ToggleReminder {
            stream_id: "up-1".into(),
        })
        .await
        .unwrap();

    match result {
        CommandResult::Reminders {
            added,
            offer_invite,
            ..
        } => {
            assert!(!added);
            assert!(!offer_invite);
        }
        other => panic!("unexpected result: {other:?}"),
    }
    assert!(!marketplace.user_context().has_reminder("up-1"));

    marketplace.disconnect().await;
}

#[tokio::test]
async fn test_like_echoes_server_count() {
    let server = MockServer::start().await;
    mount_catalog(&server).await;
    mount_identity(&server, "CLIENT", None).await;
    Mock::given(method("POST"))
        .and(path("/api/streams/live-1/like"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "likedStreams": ["live-1"], "likes": 42 })),
        )
        .mount(&server)
        .await;

    let marketplace = connected(&server, token()).await;
    let result = marketplace
        .execute(Command::ToggleLike {
            stream_id: "live-1".into(),
        })
        .await
        .unwrap();

    assert!(matches!(result, CommandResult::Like { liked: true, likes: 42 }));
    assert_eq!(marketplace.stream("live-1").unwrap().likes, 42);

    marketplace.disconnect().await;
}

#[tokio::test]
async fn test_placeholder_streams_reject_interaction() {
    let server = MockServer::start().await;
    mount_catalog(&server).await;
    mount_identity(&server, "CLIENT", None).await;

    let marketplace = connected(&server, token()).await;
    let err = marketplace
        .execute(Command::ToggleLike {
            stream_id: "mock-stream-20260101-s1".into(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::PlaceholderContent { .. }));

    // Viewing a placeholder reel is a silent no-op.
    let ok = marketplace
        .execute(Command::MarkReelViewed {
            reel_id: "mock-reel-20260101-s1".into(),
        })
        .await
        .unwrap();
    assert!(matches!(ok, CommandResult::Ok));

    marketplace.disconnect().await;
}

// ── Merchant & admin ────────────────────────────────────────────────

#[tokio::test]
async fn test_merchant_cannot_touch_other_shops() {
    let server = MockServer::start().await;
    mount_catalog(&server).await;
    mount_identity(&server, "SHOP", Some("s2")).await;

    let marketplace = connected(&server, token()).await;
    assert_eq!(marketplace.session().role(), Some(Role::Shop));

    let err = marketplace
        .execute(Command::ExtendStream {
            stream_id: "live-1".into(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::NotPermitted { .. }));

    marketplace.disconnect().await;
}

#[tokio::test]
async fn test_admin_preview_blocks_admin_actions() {
    let server = MockServer::start().await;
    mount_catalog(&server).await;
    mount_identity(&server, "ADMIN", None).await;
    mount_get(&server, "/api/admin/reports", json!([])).await;

    let marketplace = connected(&server, token()).await;
    marketplace.enter_preview(Preview::Client).unwrap();
    assert_eq!(marketplace.session().view_mode(), ViewMode::Client);

    let err = marketplace
        .execute(Command::BanStream {
            stream_id: "live-1".into(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::PreviewBlocked { .. }));

    marketplace.exit_preview();
    assert_eq!(marketplace.session().view_mode(), ViewMode::Admin);

    marketplace.disconnect().await;
}

#[tokio::test]
async fn test_suspending_shop_hides_its_streams() {
    let server = MockServer::start().await;
    mount_catalog(&server).await;
    mount_identity(&server, "ADMIN", None).await;
    mount_get(&server, "/api/admin/reports", json!([])).await;
    Mock::given(method("PATCH"))
        .and(path("/api/admin/shops/s1/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "s1",
            "name": "Moda Urbana",
            "status": "SUSPENDED",
            "plan": "Maxima Visibilidad"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let marketplace = connected(&server, token()).await;
    assert_eq!(marketplace.streams_for(StreamFilter::All).len(), 2);

    marketplace
        .execute(Command::SetShopStatus {
            shop_id: "s1".into(),
            status: ShopStatus::Suspended,
        })
        .await
        .unwrap();

    assert_eq!(
        marketplace.shop("s1").unwrap().status,
        Some(ShopStatus::Suspended)
    );
    assert!(marketplace.streams_for(StreamFilter::All).is_empty());
    assert!(marketplace.active_reels().is_empty());
    assert_eq!(
        marketplace.stream("live-1").unwrap().shop.status,
        Some(ShopStatus::Suspended)
    );

    marketplace.disconnect().await;
}

#[tokio::test]
async fn test_preview_refused_for_non_admin() {
    let server = MockServer::start().await;
    mount_catalog(&server).await;
    mount_identity(&server, "CLIENT", None).await;

    let marketplace = connected(&server, token()).await;
    let err = marketplace.enter_preview(Preview::Client).unwrap_err();
    assert!(matches!(err, CoreError::NotPermitted { .. }));

    marketplace.disconnect().await;
}

#[tokio::test]
async fn test_logout_clears_private_state() {
    let server = MockServer::start().await;
    mount_catalog(&server).await;
    mount_identity(&server, "CLIENT", None).await;

    let marketplace = connected(&server, token()).await;
    assert!(marketplace.user_context().is_favorite("s1"));

    let session = marketplace.logout();
    assert!(!session.is_authenticated());
    assert!(marketplace.user_context().favorites.is_empty());
    assert!(!marketplace.api().has_token());

    marketplace.disconnect().await;
}

#[tokio::test]
async fn test_logout_during_refresh_keeps_private_state_clear() {
    let server = MockServer::start().await;
    mount_catalog(&server).await;
    let slow = std::time::Duration::from_millis(300);
    Mock::given(method("POST"))
        .and(path("/v1/accounts:lookup"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "users": [{ "localId": "u1", "email": "ana@example.com", "emailVerified": true }]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/me"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "uid": "u1", "role": "CLIENT", "favorites": ["s1"] }))
                .set_delay(slow),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/notifications"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([{ "id": "n1", "message": "Tu vivo empieza pronto" }]))
                .set_delay(slow),
        )
        .mount(&server)
        .await;

    let marketplace = connected(&server, token()).await;
    assert_eq!(marketplace.notifications().len(), 1);

    let refreshing = {
        let marketplace = marketplace.clone();
        tokio::spawn(async move { marketplace.full_refresh().await })
    };
    tokio::time::sleep(std::time::Duration::from_millis(100)).await;
    marketplace.logout();
    refreshing.await.unwrap().unwrap();

    assert!(!marketplace.session().is_authenticated());
    assert!(marketplace.notifications().is_empty());
    assert!(marketplace.user_context().favorites.is_empty());

    marketplace.disconnect().await;
}

// ── Calendar invites ────────────────────────────────────────────────

#[tokio::test]
async fn test_calendar_invite_falls_back_to_local_rendering() {
    let server = MockServer::start().await;
    mount_catalog(&server).await;
    Mock::given(method("GET"))
        .and(path("/api/streams/up-1/ics"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let marketplace = connected(&server, AuthCredentials::Anonymous).await;
    let doc = marketplace.calendar_invite("up-1").await.unwrap();
    assert!(doc.starts_with("BEGIN:VCALENDAR\r\n"));
    assert!(doc.contains("UID:stream-up-1@vitrina"));

    marketplace.disconnect().await;
}

#[tokio::test]
async fn test_execute_before_connect_is_disconnected() {
    let server = MockServer::start().await;
    let marketplace = Marketplace::new(config(&server, AuthCredentials::Anonymous)).unwrap();

    let err = marketplace
        .execute(Command::MarkAllNotificationsRead)
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::Disconnected));
}
