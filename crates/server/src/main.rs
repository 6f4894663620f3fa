// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]
#![allow(clippy::multiple_crate_versions)]

mod notifier;

use axum::{
    Json, Router,
    extract::{Path, Query, State as AxumState},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use clap::Parser;
use serde::{Deserialize, Serialize};
use shiftbot::{IncomingMessage, Reply};
use shiftbot_api::{
    ApiError, CreateAdditionRequestsRequest, CreateDeletionRequestRequest,
    CreateExchangeRequestsRequest, CreateShiftRequest, CreateShiftResponse, DecideRequest,
    DecisionReport, DialogRouter, EngineConfig, EngineContext, ListShiftsRequest,
    ListShiftsResponse, PendingRequestsResponse, RosterEntry, ShiftInfo, StaticRoster,
    SubmissionResponse,
    handlers::{
        create_addition_requests, create_deletion_request, create_exchange_requests,
        create_shift, decide_request, list_pending_requests, list_shifts,
    },
};
use shiftbot_domain::{RequestKind, RequestStatus};
use shiftbot_persistence::{Persistence, PersistenceError};
use std::path::PathBuf;
use std::sync::Arc;
use time::OffsetDateTime;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

use crate::notifier::{DEFAULT_QUEUE_CAPACITY, QueueNotifier, deliver};

/// Shiftbot Server - chat webhook and HTTP API for shift workflows
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses in-memory database.
    #[arg(short, long)]
    database: Option<String>,

    /// Port to bind the server to
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// Path to a JSON engine configuration file. Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Path to a JSON file listing the roster entries.
    #[arg(short, long)]
    roster: Option<PathBuf>,
}

/// Application state shared across handlers.
///
/// One connection serves every request; the Mutex serializes turns and
/// decisions.
#[derive(Clone)]
struct AppState {
    /// The persistence layer.
    persistence: Arc<Mutex<Persistence>>,
    /// The dialogue router, which also owns the engine context.
    router: DialogRouter,
}

impl AppState {
    const fn context(&self) -> &EngineContext {
        self.router.context()
    }
}

/// Response body for the chat webhook.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct WebhookResponse {
    /// What to send back to the chat, if anything.
    reply: Option<Reply>,
}

/// Query parameters for listing pending requests.
#[derive(Debug, Deserialize)]
struct PendingQuery {
    /// The employee whose requests to list.
    employee_id: String,
}

/// API response for a decision.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct DecisionApiResponse {
    /// The decided request.
    request_id: String,
    /// The workflow.
    kind: RequestKind,
    /// Status after the decision.
    status: RequestStatus,
    /// The shift holding the hours after an approval.
    shift: Option<ShiftInfo>,
    /// Requests closed as a side effect.
    auto_rejected: Vec<String>,
    /// Message for the actor.
    message: String,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct HealthResponse {
    status: String,
}

/// Error response type.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ErrorResponse {
    /// Error indicator.
    error: bool,
    /// Error message.
    message: String,
}

/// HTTP error wrapper that implements `IntoResponse`.
struct HttpError {
    /// The HTTP status code.
    status: StatusCode,
    /// The error message.
    message: String,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body: Json<ErrorResponse> = Json(ErrorResponse {
            error: true,
            message: self.message,
        });
        (self.status, body).into_response()
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        let status: StatusCode = match &err {
            ApiError::AuthenticationFailed { .. } => StatusCode::UNAUTHORIZED,
            ApiError::Unauthorized { .. } => StatusCode::FORBIDDEN,
            ApiError::DomainRuleViolation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::InvalidInput { .. } => StatusCode::BAD_REQUEST,
            ApiError::ResourceNotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::StateConflict { .. } => StatusCode::CONFLICT,
            ApiError::Internal { .. } => {
                error!(error = %err, "Internal error");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        Self {
            status,
            message: err.user_message(),
        }
    }
}

impl From<PersistenceError> for HttpError {
    fn from(err: PersistenceError) -> Self {
        error!(error = %err, "Persistence error");
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: format!("Persistence error: {err}"),
        }
    }
}

fn decision_to_response(report: &DecisionReport, context: &EngineContext) -> DecisionApiResponse {
    let directory = context.directory();
    DecisionApiResponse {
        request_id: report.request_id.value().to_string(),
        kind: report.kind,
        status: report.status,
        shift: report
            .shift
            .as_ref()
            .map(|shift| ShiftInfo::from_shift(shift, &directory)),
        auto_rejected: report
            .auto_rejected
            .iter()
            .map(|id| id.value().to_string())
            .collect(),
        message: report.message.clone(),
    }
}

/// Handler for POST `/webhook` endpoint.
///
/// Routes one chat event and returns the reply, if any.
async fn handle_webhook(
    AxumState(app_state): AxumState<AppState>,
    Json(message): Json<IncomingMessage>,
) -> Json<WebhookResponse> {
    info!(
        chat_user_id = %message.chat_user_id,
        context = ?message.context,
        "Handling webhook event"
    );

    let mut persistence = app_state.persistence.lock().await;
    let reply: Option<Reply> =
        app_state
            .router
            .route(&mut persistence, &message, OffsetDateTime::now_utc());
    drop(persistence);

    Json(WebhookResponse { reply })
}

/// Handler for POST `/shifts` endpoint.
///
/// Seeds a shift for an employee.
async fn handle_create_shift(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<CreateShiftRequest>,
) -> Result<Json<CreateShiftResponse>, HttpError> {
    info!(
        actor_id = %req.actor_id,
        employee_id = %req.employee_id,
        date = %req.date,
        "Handling create_shift request"
    );

    let mut persistence = app_state.persistence.lock().await;
    let response: CreateShiftResponse = create_shift(
        app_state.context(),
        &mut persistence,
        &req,
        OffsetDateTime::now_utc(),
    )?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for GET `/shifts` endpoint.
async fn handle_list_shifts(
    AxumState(app_state): AxumState<AppState>,
    Query(query): Query<ListShiftsRequest>,
) -> Result<Json<ListShiftsResponse>, HttpError> {
    info!(from = %query.from, to = %query.to, "Handling list_shifts request");

    let mut persistence = app_state.persistence.lock().await;
    let response: ListShiftsResponse = list_shifts(app_state.context(), &mut persistence, &query)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST `/exchange_requests` endpoint.
///
/// Offers a shift to several colleagues at once.
async fn handle_create_exchange_requests(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<CreateExchangeRequestsRequest>,
) -> Result<Json<SubmissionResponse>, HttpError> {
    info!(
        requester_id = %req.requester_id,
        shift_id = req.shift_id,
        approvers = req.approver_ids.len(),
        "Handling create_exchange_requests request"
    );

    let mut persistence = app_state.persistence.lock().await;
    let response: SubmissionResponse = create_exchange_requests(
        app_state.context(),
        &mut persistence,
        &req,
        OffsetDateTime::now_utc(),
    )?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST `/addition_requests` endpoint.
async fn handle_create_addition_requests(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<CreateAdditionRequestsRequest>,
) -> Result<Json<SubmissionResponse>, HttpError> {
    info!(
        requester_id = %req.requester_id,
        date = %req.date,
        targets = req.target_ids.len(),
        "Handling create_addition_requests request"
    );

    let mut persistence = app_state.persistence.lock().await;
    let response: SubmissionResponse = create_addition_requests(
        app_state.context(),
        &mut persistence,
        &req,
        OffsetDateTime::now_utc(),
    )?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST `/deletion_requests` endpoint.
async fn handle_create_deletion_request(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<CreateDeletionRequestRequest>,
) -> Result<Json<SubmissionResponse>, HttpError> {
    info!(
        requester_id = %req.requester_id,
        shift_id = req.shift_id,
        "Handling create_deletion_request request"
    );

    let mut persistence = app_state.persistence.lock().await;
    let response: SubmissionResponse = create_deletion_request(
        app_state.context(),
        &mut persistence,
        &req,
        OffsetDateTime::now_utc(),
    )?;
    drop(persistence);

    Ok(Json(response))
}

async fn decide(
    app_state: &AppState,
    kind: RequestKind,
    request_id: &str,
    req: &DecideRequest,
) -> Result<Json<DecisionApiResponse>, HttpError> {
    info!(
        kind = %kind,
        request_id = %request_id,
        actor_id = %req.actor_id,
        decision = %req.decision,
        "Handling decision request"
    );

    let mut persistence = app_state.persistence.lock().await;
    let report: DecisionReport = decide_request(
        app_state.context(),
        &mut persistence,
        kind,
        request_id,
        req,
        OffsetDateTime::now_utc(),
    )?;
    drop(persistence);

    Ok(Json(decision_to_response(&report, app_state.context())))
}

/// Handler for POST `/exchange_requests/{request_id}/decision` endpoint.
async fn handle_decide_exchange(
    AxumState(app_state): AxumState<AppState>,
    Path(request_id): Path<String>,
    Json(req): Json<DecideRequest>,
) -> Result<Json<DecisionApiResponse>, HttpError> {
    decide(&app_state, RequestKind::Exchange, &request_id, &req).await
}

/// Handler for POST `/addition_requests/{request_id}/decision` endpoint.
async fn handle_decide_addition(
    AxumState(app_state): AxumState<AppState>,
    Path(request_id): Path<String>,
    Json(req): Json<DecideRequest>,
) -> Result<Json<DecisionApiResponse>, HttpError> {
    decide(&app_state, RequestKind::Addition, &request_id, &req).await
}

/// Handler for POST `/deletion_requests/{request_id}/decision` endpoint.
async fn handle_decide_deletion(
    AxumState(app_state): AxumState<AppState>,
    Path(request_id): Path<String>,
    Json(req): Json<DecideRequest>,
) -> Result<Json<DecisionApiResponse>, HttpError> {
    decide(&app_state, RequestKind::Deletion, &request_id, &req).await
}

/// Handler for GET `/requests/pending` endpoint.
async fn handle_list_pending_requests(
    AxumState(app_state): AxumState<AppState>,
    Query(query): Query<PendingQuery>,
) -> Result<Json<PendingRequestsResponse>, HttpError> {
    info!(employee_id = %query.employee_id, "Handling list_pending_requests request");

    let mut persistence = app_state.persistence.lock().await;
    let response: PendingRequestsResponse =
        list_pending_requests(app_state.context(), &mut persistence, &query.employee_id)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for GET `/health` endpoint.
async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: String::from("ok"),
    })
}

/// Builds the application router with all endpoints.
fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/webhook", post(handle_webhook))
        .route("/shifts", post(handle_create_shift))
        .route("/shifts", get(handle_list_shifts))
        .route("/exchange_requests", post(handle_create_exchange_requests))
        .route("/addition_requests", post(handle_create_addition_requests))
        .route("/deletion_requests", post(handle_create_deletion_request))
        .route(
            "/exchange_requests/{request_id}/decision",
            post(handle_decide_exchange),
        )
        .route(
            "/addition_requests/{request_id}/decision",
            post(handle_decide_addition),
        )
        .route(
            "/deletion_requests/{request_id}/decision",
            post(handle_decide_deletion),
        )
        .route("/requests/pending", get(handle_list_pending_requests))
        .route("/health", get(handle_health))
        .with_state(app_state)
}

/// Loads the engine configuration, falling back to defaults.
fn load_config(path: Option<&PathBuf>) -> Result<EngineConfig, Box<dyn std::error::Error>> {
    let Some(path) = path else {
        info!("No configuration file given, using defaults");
        return Ok(EngineConfig::default());
    };
    info!(path = %path.display(), "Loading configuration");
    let raw: String = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

/// Loads the roster entries from a JSON array.
fn load_roster(path: Option<&PathBuf>) -> Result<Vec<RosterEntry>, Box<dyn std::error::Error>> {
    let Some(path) = path else {
        warn!("No roster file given; nobody will be able to link a chat account");
        return Ok(Vec::new());
    };
    info!(path = %path.display(), "Loading roster");
    let raw: String = std::fs::read_to_string(path)?;
    let entries: Vec<RosterEntry> = serde_json::from_str(&raw)?;
    info!(employees = entries.len(), "Roster loaded");
    Ok(entries)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing Shiftbot Server");

    let config: EngineConfig = load_config(args.config.as_ref())?;
    let roster: Vec<RosterEntry> = load_roster(args.roster.as_ref())?;

    let persistence: Persistence = if let Some(db_path) = &args.database {
        info!("Using file-based database at: {}", db_path);
        Persistence::new_with_file(db_path)?
    } else {
        info!("Using in-memory database");
        Persistence::new_in_memory()?
    };
    let persistence: Arc<Mutex<Persistence>> = Arc::new(Mutex::new(persistence));

    let (notifier, queue) = QueueNotifier::new(DEFAULT_QUEUE_CAPACITY);
    tokio::spawn(deliver(queue));

    let context: EngineContext = EngineContext::new(
        config,
        Arc::new(StaticRoster::new(roster)),
        Arc::new(notifier),
    );
    let app_state: AppState = AppState {
        persistence,
        router: DialogRouter::new(context),
    };

    let app: Router = build_router(app_state);

    let addr: std::net::SocketAddr = format!("127.0.0.1:{}", args.port).parse()?;
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests;
