//! HTTP surface of the entry router, driven with `tower::ServiceExt::oneshot`

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use entry::domain::entity::{Booking, EntryState};
use entry::{EntryConfig, InMemoryEntryRepository, UserRole, entry_router_generic, sign_session_token};
use kernel::id::{BookingId, EventId, TicketId, UserId};
use platform::clock::ManualClock;
use qr_token::QrSecret;
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;
use uuid::Uuid;

const WINDOW_MS: i64 = 15_000;
const NOW_MS: i64 = 1000 * WINDOW_MS + 1_000;
const SESSION_SECRET: [u8; 32] = [5u8; 32];

struct TestApp {
    router: Router,
    clock: ManualClock,
    holder_cookie: String,
    organizer_cookie: String,
    stranger_cookie: String,
}

async fn add_user(repo: &InMemoryEntryRepository, id: &str, role: UserRole) -> String {
    let session_id = Uuid::new_v4();
    let user_id = UserId::parse(id).unwrap();
    repo.insert_user(user_id.clone(), role).await;
    repo.insert_session(session_id, user_id, NOW_MS + 3_600_000)
        .await;
    format!(
        "auth_session={}",
        sign_session_token(session_id, &SESSION_SECRET)
    )
}

async fn setup() -> TestApp {
    let repo = InMemoryEntryRepository::new();
    let holder_cookie = add_user(&repo, "holder", UserRole::User).await;
    let organizer_cookie = add_user(&repo, "organizer", UserRole::User).await;
    let stranger_cookie = add_user(&repo, "stranger", UserRole::User).await;

    let event_id = EventId::parse("E1").unwrap();
    let ticket_id = TicketId::parse("T9").unwrap();
    repo.insert_event(event_id.clone(), "Night Market", UserId::parse("organizer").unwrap())
        .await;
    repo.insert_ticket(ticket_id.clone(), "Standing").await;
    repo.insert_booking(Booking {
        id: BookingId::parse("B123").unwrap(),
        user_id: UserId::parse("holder").unwrap(),
        event_id,
        ticket_id,
        quantity: 1,
        customer_name: "Ren".to_string(),
        customer_email: "ren@example.com".to_string(),
        entry: EntryState::default(),
    })
    .await;

    let config = EntryConfig::new(QrSecret::from_text("test-qr-secret").unwrap(), SESSION_SECRET);
    let clock = ManualClock::new(NOW_MS);
    let router = entry_router_generic(repo, config, Arc::new(clock.clone()));

    TestApp {
        router,
        clock,
        holder_cookie,
        organizer_cookie,
        stranger_cookie,
    }
}

async fn send(router: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let response = router.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn post(uri: &str, cookie: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::COOKIE, cookie)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn current_token(app: &TestApp) -> String {
    let (status, body) = send(
        &app.router,
        post("/bookings/B123/tokens", &app.holder_cookie, json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body["tokens"][0]["qrValue"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn requests_without_session_are_unauthorized() {
    let app = setup().await;

    let req = Request::builder()
        .method("GET")
        .uri("/secret")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&app.router, req).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["status"], 401);
}

#[tokio::test]
async fn bearer_token_is_accepted() {
    let app = setup().await;
    let token = app.holder_cookie.trim_start_matches("auth_session=");

    let req = Request::builder()
        .method("GET")
        .uri("/secret")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&app.router, req).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["secret"], "dGVzdC1xci1zZWNyZXQ=");
    assert_eq!(body["ttlMs"], 30_i64 * 24 * 60 * 60 * 1000);
}

#[tokio::test]
async fn token_batch_wire_shape() {
    let app = setup().await;

    let (status, body) = send(
        &app.router,
        post("/bookings/B123/tokens", &app.holder_cookie, json!({})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["windowMs"], WINDOW_MS);
    assert_eq!(body["tokens"][0]["expiresAt"], 1001 * WINDOW_MS);
    assert_eq!(body["tokens"][1]["expiresAt"], 1002 * WINDOW_MS);

    let qr: Value = serde_json::from_str(body["tokens"][0]["qrValue"].as_str().unwrap()).unwrap();
    assert_eq!(qr["bookingId"], "B123");
    assert_eq!(qr["ticketId"], "T9");
    assert_eq!(qr["ts"], 1000);
    assert_eq!(qr["sig"].as_str().unwrap().len(), 64);
}

#[tokio::test]
async fn stranger_cannot_issue_tokens() {
    let app = setup().await;

    let (status, body) = send(
        &app.router,
        post("/bookings/B123/tokens", &app.stranger_cookie, json!({})),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["detail"], "Not authorized");
}

#[tokio::test]
async fn scan_then_replay_then_reset() {
    let app = setup().await;
    let token = current_token(&app).await;

    let (status, body) = send(
        &app.router,
        post("/scan", &app.organizer_cookie, json!({ "token": token })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["booking"]["id"], "B123");
    assert_eq!(body["booking"]["customerName"], "Ren");
    assert_eq!(body["booking"]["eventName"], "Night Market");
    assert_eq!(body["booking"]["ticketName"], "Standing");
    assert_eq!(body["booking"]["scannedAt"], NOW_MS);

    let (status, body) = send(
        &app.router,
        post("/scan", &app.organizer_cookie, json!({ "token": token })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "already_used");

    let (status, _) = send(
        &app.router,
        post("/bookings/B123/tokens", &app.holder_cookie, json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = send(
        &app.router,
        post("/bookings/B123/reset", &app.organizer_cookie, json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["reset"], true);

    let (status, body) = send(
        &app.router,
        post("/scan", &app.organizer_cookie, json!({ "token": token })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn inspect_only_scan() {
    let app = setup().await;
    let token = current_token(&app).await;

    let (status, body) = send(
        &app.router,
        post(
            "/scan",
            &app.organizer_cookie,
            json!({ "token": token, "markScanned": false }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["booking"]["scannedAt"], Value::Null);

    let (_, body) = send(
        &app.router,
        post("/scan", &app.organizer_cookie, json!({ "token": token })),
    )
    .await;
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn rejected_codes_share_one_message() {
    let app = setup().await;
    let token = current_token(&app).await;

    let mut qr: Value = serde_json::from_str(&token).unwrap();
    qr["sig"] = json!("ab".repeat(32));
    let tampered = qr.to_string();

    for bad in [tampered.as_str(), "{not json", "hello"] {
        let (status, body) = send(
            &app.router,
            post("/scan", &app.organizer_cookie, json!({ "token": bad })),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["detail"], "Invalid QR code");
    }
}

#[tokio::test]
async fn expired_code_is_gone() {
    let app = setup().await;
    let token = current_token(&app).await;

    app.clock.advance(2 * WINDOW_MS);

    let (status, body) = send(
        &app.router,
        post("/scan", &app.organizer_cookie, json!({ "token": token })),
    )
    .await;
    assert_eq!(status, StatusCode::GONE);
    assert_eq!(body["detail"], "QR code expired");
}

#[tokio::test]
async fn validate_flow_over_http() {
    let app = setup().await;
    let token = current_token(&app).await;

    let (status, body) = send(
        &app.router,
        post("/validate", &app.organizer_cookie, json!({ "token": token })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["booking"]["validatedAt"], NOW_MS);

    let (_, body) = send(
        &app.router,
        post("/validate", &app.organizer_cookie, json!({ "token": token })),
    )
    .await;
    assert_eq!(body["status"], "already_validated");

    let (_, body) = send(
        &app.router,
        post(
            "/bookings/B123/validation/reset",
            &app.organizer_cookie,
            json!({}),
        ),
    )
    .await;
    assert_eq!(body["reset"], true);

    send(
        &app.router,
        post("/scan", &app.organizer_cookie, json!({ "token": token })),
    )
    .await;

    let (_, body) = send(
        &app.router,
        post("/validate", &app.organizer_cookie, json!({ "token": token })),
    )
    .await;
    assert_eq!(body["status"], "already_entered");
}

#[tokio::test]
async fn unknown_booking_path_is_not_found() {
    let app = setup().await;

    let (status, _) = send(
        &app.router,
        post("/bookings/B999/tokens", &app.holder_cookie, json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
