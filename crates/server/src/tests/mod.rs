// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use super::*;
use axum::{
    body::Body,
    http::{Request, StatusCode as HttpStatusCode},
};
use serde::de::DeserializeOwned;
use shiftbot::ChatContext;
use shiftbot_api::{NotificationKind, RecordingNotifier};
use shiftbot_domain::Decision;
use tower::ServiceExt;

/// Dates far enough ahead that the real clock never makes them past.
const TEST_DATE: &str = "2099-03-10";

fn roster_entry(id: &str, name: &str) -> RosterEntry {
    RosterEntry {
        employee_id: id.to_string(),
        display_name: name.to_string(),
        email: Some(format!("{id}@example.com")),
    }
}

/// Helper to create test app state with in-memory persistence.
fn create_test_app_state() -> (AppState, Arc<RecordingNotifier>) {
    let persistence: Persistence =
        Persistence::new_in_memory().expect("Failed to create in-memory persistence");
    let notifier: Arc<RecordingNotifier> = Arc::new(RecordingNotifier::new());
    let config: EngineConfig = EngineConfig {
        owner_employee_id: Some(String::from("owner")),
        ..EngineConfig::default()
    };
    let roster: StaticRoster = StaticRoster::new(vec![
        roster_entry("owner", "Owner"),
        roster_entry("alice", "Alice"),
        roster_entry("bob", "Bob"),
        roster_entry("carol", "Carol"),
    ]);
    let context: EngineContext =
        EngineContext::new(config, Arc::new(roster), notifier.clone());
    let app_state: AppState = AppState {
        persistence: Arc::new(Mutex::new(persistence)),
        router: DialogRouter::new(context),
    };
    (app_state, notifier)
}

async fn send<T: Serialize>(app: &Router, method: &str, uri: &str, body: &T) -> Response {
    app.clone()
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_string(body).unwrap()))
                .unwrap(),
        )
        .await
        .unwrap()
}

async fn fetch(app: &Router, uri: &str) -> Response {
    app.clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn read_json<T: DeserializeOwned>(response: Response) -> T {
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body_bytes).unwrap()
}

fn shift_request(actor: &str, employee: &str, start: &str, end: &str) -> CreateShiftRequest {
    CreateShiftRequest {
        actor_id: actor.to_string(),
        employee_id: employee.to_string(),
        date: TEST_DATE.to_string(),
        start: start.to_string(),
        end: end.to_string(),
    }
}

async fn seed_shift(app: &Router, employee: &str, start: &str, end: &str) -> i64 {
    let response = send(
        app,
        "POST",
        "/shifts",
        &shift_request("owner", employee, start, end),
    )
    .await;
    assert_eq!(response.status(), HttpStatusCode::OK);
    let created: CreateShiftResponse = read_json(response).await;
    created.shift.shift_id
}

async fn say(app: &Router, user: &str, context: ChatContext, text: &str) -> Option<Reply> {
    let message: IncomingMessage = IncomingMessage::text(user, context, text);
    let response = send(app, "POST", "/webhook", &message).await;
    assert_eq!(response.status(), HttpStatusCode::OK);
    let body: WebhookResponse = read_json(response).await;
    body.reply
}

#[tokio::test]
async fn test_health_returns_ok() {
    let (app_state, _) = create_test_app_state();
    let app: Router = build_router(app_state);

    let response = fetch(&app, "/health").await;

    assert_eq!(response.status(), HttpStatusCode::OK);
    let body: HealthResponse = read_json(response).await;
    assert_eq!(body.status, "ok");
}

#[tokio::test]
async fn test_webhook_answers_help() {
    let (app_state, _) = create_test_app_state();
    let app: Router = build_router(app_state);

    let reply = say(&app, "U-alice", ChatContext::Direct, "help")
        .await
        .unwrap();

    assert!(reply.text.starts_with("Available commands:"));
}

#[tokio::test]
async fn test_webhook_stays_silent_on_group_chatter() {
    let (app_state, _) = create_test_app_state();
    let app: Router = build_router(app_state);

    let reply = say(&app, "U-alice", ChatContext::Group, "see you all tomorrow").await;

    assert!(reply.is_none());
}

#[tokio::test]
async fn test_webhook_links_chat_account() {
    let (app_state, _) = create_test_app_state();
    let app: Router = build_router(app_state.clone());

    let prompt = say(&app, "U-alice", ChatContext::Direct, "authenticate")
        .await
        .unwrap();
    assert!(prompt.text.contains("enter your name"));

    let welcome = say(&app, "U-alice", ChatContext::Direct, "Alice")
        .await
        .unwrap();
    assert!(welcome.text.starts_with("Welcome, Alice!"));

    let mut persistence = app_state.persistence.lock().await;
    let linked = persistence.get_employee_by_chat_user("U-alice").unwrap();
    assert_eq!(linked.unwrap().display_name, "Alice");
}

#[tokio::test]
async fn test_create_shift_as_owner_succeeds() {
    let (app_state, _) = create_test_app_state();
    let app: Router = build_router(app_state);

    let response = send(
        &app,
        "POST",
        "/shifts",
        &shift_request("owner", "alice", "09:00", "17:00"),
    )
    .await;

    assert_eq!(response.status(), HttpStatusCode::OK);
    let created: CreateShiftResponse = read_json(response).await;
    assert_eq!(created.shift.employee_name, "Alice");
    assert_eq!(created.shift.date, TEST_DATE);
}

#[tokio::test]
async fn test_create_shift_as_employee_is_forbidden() {
    let (app_state, _) = create_test_app_state();
    let app: Router = build_router(app_state);

    let response = send(
        &app,
        "POST",
        "/shifts",
        &shift_request("alice", "alice", "09:00", "17:00"),
    )
    .await;

    assert_eq!(response.status(), HttpStatusCode::FORBIDDEN);
    let body: ErrorResponse = read_json(response).await;
    assert!(body.error);
    assert!(body.message.starts_with("You are not allowed to do that"));
}

#[tokio::test]
async fn test_overlapping_shift_is_unprocessable() {
    let (app_state, _) = create_test_app_state();
    let app: Router = build_router(app_state);
    seed_shift(&app, "alice", "09:00", "12:00").await;

    let response = send(
        &app,
        "POST",
        "/shifts",
        &shift_request("owner", "alice", "11:00", "14:00"),
    )
    .await;

    assert_eq!(response.status(), HttpStatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_malformed_time_is_bad_request() {
    let (app_state, _) = create_test_app_state();
    let app: Router = build_router(app_state);

    let response = send(
        &app,
        "POST",
        "/shifts",
        &shift_request("owner", "alice", "17:00", "09:00"),
    )
    .await;

    assert_eq!(response.status(), HttpStatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_list_shifts_returns_seeded_shifts() {
    let (app_state, _) = create_test_app_state();
    let app: Router = build_router(app_state);
    seed_shift(&app, "alice", "09:00", "12:00").await;
    seed_shift(&app, "bob", "12:00", "15:00").await;

    let response = fetch(&app, "/shifts?from=2099-03-01&to=2099-03-31").await;

    assert_eq!(response.status(), HttpStatusCode::OK);
    let listed: ListShiftsResponse = read_json(response).await;
    let names: Vec<&str> = listed
        .shifts
        .iter()
        .map(|s| s.employee_name.as_str())
        .collect();
    assert_eq!(names, vec!["Alice", "Bob"]);
}

#[tokio::test]
async fn test_exchange_decided_once() {
    let (app_state, notifier) = create_test_app_state();
    let app: Router = build_router(app_state);
    let shift_id: i64 = seed_shift(&app, "alice", "18:00", "20:00").await;

    let response = send(
        &app,
        "POST",
        "/exchange_requests",
        &CreateExchangeRequestsRequest {
            requester_id: String::from("alice"),
            shift_id,
            approver_ids: vec![String::from("bob"), String::from("carol")],
        },
    )
    .await;
    assert_eq!(response.status(), HttpStatusCode::OK);
    let submitted: SubmissionResponse = read_json(response).await;
    assert_eq!(submitted.request_ids.len(), 2);

    let uri: String = format!("/exchange_requests/{}/decision", submitted.request_ids[0]);
    let approve: DecideRequest = DecideRequest {
        actor_id: String::from("bob"),
        decision: Decision::Approve,
    };
    let response = send(&app, "POST", &uri, &approve).await;
    assert_eq!(response.status(), HttpStatusCode::OK);
    let decided: DecisionApiResponse = read_json(response).await;
    assert_eq!(decided.status, RequestStatus::Approved);
    assert_eq!(decided.shift.unwrap().employee_id, "bob");
    assert_eq!(decided.auto_rejected, vec![submitted.request_ids[1].clone()]);

    let again = send(&app, "POST", &uri, &approve).await;
    assert_eq!(again.status(), HttpStatusCode::CONFLICT);

    let kinds: Vec<NotificationKind> = notifier.events().iter().map(|e| e.kind).collect();
    assert!(kinds.contains(&NotificationKind::Approved));
    assert!(kinds.contains(&NotificationKind::AutoRejected));
}

#[tokio::test]
async fn test_decision_on_unknown_request_is_not_found() {
    let (app_state, _) = create_test_app_state();
    let app: Router = build_router(app_state);

    let response = send(
        &app,
        "POST",
        "/deletion_requests/deletion_1_missing/decision",
        &DecideRequest {
            actor_id: String::from("owner"),
            decision: Decision::Approve,
        },
    )
    .await;

    assert_eq!(response.status(), HttpStatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_deletion_without_reason_is_bad_request() {
    let (app_state, _) = create_test_app_state();
    let app: Router = build_router(app_state);
    let shift_id: i64 = seed_shift(&app, "alice", "18:00", "20:00").await;

    let response = send(
        &app,
        "POST",
        "/deletion_requests",
        &CreateDeletionRequestRequest {
            requester_id: String::from("alice"),
            shift_id,
            reason: String::new(),
        },
    )
    .await;

    assert_eq!(response.status(), HttpStatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_pending_requests_lists_additions_for_target() {
    let (app_state, _) = create_test_app_state();
    let app: Router = build_router(app_state);

    let response = send(
        &app,
        "POST",
        "/addition_requests",
        &CreateAdditionRequestsRequest {
            requester_id: String::from("owner"),
            target_ids: vec![String::from("bob")],
            date: TEST_DATE.to_string(),
            start: String::from("18:00"),
            end: String::from("22:00"),
        },
    )
    .await;
    assert_eq!(response.status(), HttpStatusCode::OK);

    let response = fetch(&app, "/requests/pending?employee_id=bob").await;

    assert_eq!(response.status(), HttpStatusCode::OK);
    let pending: PendingRequestsResponse = read_json(response).await;
    assert_eq!(pending.incoming.len(), 1);
    assert_eq!(pending.incoming[0].kind, RequestKind::Addition);
    assert!(pending.outgoing.is_empty());
}
