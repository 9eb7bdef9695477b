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

use axum::{
    Json, Router,
    extract::{Path, State as AxumState},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use clap::Parser;
use serde::{Deserialize, Serialize};
use slotbook::{BookingService, RetryPolicy};
use slotbook_api::{
    ApiError, CreateReservationRequest, ListReservationsResponse, PasswordPolicy,
    RegisterUserRequest, ReservationResponse, TransitionReservationRequest, UserResponse,
    cancel_reservation, confirm_reservation, create_reservation, get_reservation,
    list_user_reservations, register_user, translate_persistence_error,
};
use slotbook_persistence::{
    ConnectionOptions, DEFAULT_PASSWORD_HASH_COST, DatabaseTarget, Persistence,
};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

/// Slotbook Server - HTTP server for the Slotbook reservation engine
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file.
    #[arg(short, long, default_value = "slotbook.db")]
    database: PathBuf,

    /// `MySQL`/`MariaDB` connection URL. Takes precedence over `--database`.
    #[arg(long)]
    mysql_url: Option<String>,

    /// Port to bind the server to
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// Address to bind the server to
    #[arg(short, long, default_value = "127.0.0.1")]
    bind: String,

    /// How long a `SQLite` statement waits on a locked database, in milliseconds
    #[arg(long, default_value_t = 5000)]
    busy_timeout_ms: u64,

    /// Attempts per booking operation when storage is contended
    #[arg(long, default_value_t = 5)]
    max_attempts: u32,
}

/// Application state shared across handlers.
///
/// Holds only connection settings. Every request opens its own connection on
/// the blocking pool, so concurrent bookings are serialized by the database
/// and never by a lock in this process.
#[derive(Debug, Clone)]
struct AppState {
    /// The migrated database every request connects to.
    target: Arc<DatabaseTarget>,
    /// Per-connection settings.
    options: ConnectionOptions,
    /// Retry budget for contended storage.
    retry: RetryPolicy,
    /// Password rules for registration.
    password_policy: PasswordPolicy,
    /// bcrypt cost for new password hashes.
    password_hash_cost: u32,
}

/// Error response type.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ErrorResponse {
    /// Error indicator.
    error: bool,
    /// Stable machine-readable error code.
    code: String,
    /// Error message.
    message: String,
}

/// Liveness response.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct HealthResponse {
    status: String,
}

/// HTTP error wrapper that implements `IntoResponse`.
#[derive(Debug)]
struct HttpError {
    /// The HTTP status code.
    status: StatusCode,
    /// The stable error code.
    code: String,
    /// The error message.
    message: String,
}

impl HttpError {
    fn internal(message: String) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            code: String::from("internal_error"),
            message,
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body: Json<ErrorResponse> = Json(ErrorResponse {
            error: true,
            code: self.code,
            message: self.message,
        });
        (self.status, body).into_response()
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        let status: StatusCode = match err {
            ApiError::InvalidInput { .. } | ApiError::PasswordPolicyViolation { .. } => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Unauthorized { .. } => StatusCode::FORBIDDEN,
            ApiError::ResourceNotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::DomainRuleViolation { .. } => StatusCode::CONFLICT,
            ApiError::ServiceUnavailable { .. } => {
                warn!(error = %err, "Storage unavailable");
                StatusCode::SERVICE_UNAVAILABLE
            }
            ApiError::Internal { .. } => {
                error!(error = %err, "Internal error");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        Self {
            status,
            code: err.code().to_string(),
            message: err.to_string(),
        }
    }
}

/// Opens a connection on the blocking pool and runs `operation` with it.
async fn with_persistence<T, F>(app_state: &AppState, operation: F) -> Result<T, HttpError>
where
    T: Send + 'static,
    F: FnOnce(Persistence) -> Result<T, ApiError> + Send + 'static,
{
    let target: Arc<DatabaseTarget> = Arc::clone(&app_state.target);
    let options: ConnectionOptions = app_state.options;

    tokio::task::spawn_blocking(move || {
        let persistence: Persistence =
            Persistence::connect(&target, options).map_err(translate_persistence_error)?;
        operation(persistence)
    })
    .await
    .map_err(|e| HttpError::internal(format!("Request task failed: {e}")))?
    .map_err(HttpError::from)
}

/// Runs `operation` against a booking service over a fresh connection.
async fn with_service<T, F>(app_state: &AppState, operation: F) -> Result<T, HttpError>
where
    T: Send + 'static,
    F: FnOnce(&mut BookingService<Persistence>) -> Result<T, ApiError> + Send + 'static,
{
    let retry: RetryPolicy = app_state.retry;

    with_persistence(app_state, move |persistence| {
        let mut service: BookingService<Persistence> =
            BookingService::with_retry_policy(persistence, retry);
        operation(&mut service)
    })
    .await
}

/// Handler for POST `/users` endpoint.
///
/// Registers a user so it can make reservations.
async fn handle_register_user(
    AxumState(app_state): AxumState<AppState>,
    Json(request): Json<RegisterUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>), HttpError> {
    info!(email = %request.email, "Handling register_user request");

    let policy: PasswordPolicy = app_state.password_policy;
    let cost: u32 = app_state.password_hash_cost;
    let response: UserResponse = with_persistence(&app_state, move |mut persistence| {
        persistence.set_password_hash_cost(cost);
        register_user(&mut persistence, &request, &policy)
    })
    .await?;

    Ok((StatusCode::CREATED, Json(response)))
}

/// Handler for POST `/reservations` endpoint.
async fn handle_create_reservation(
    AxumState(app_state): AxumState<AppState>,
    Json(request): Json<CreateReservationRequest>,
) -> Result<(StatusCode, Json<ReservationResponse>), HttpError> {
    let response: ReservationResponse =
        with_service(&app_state, move |service| create_reservation(service, request)).await?;

    Ok((StatusCode::CREATED, Json(response)))
}

/// Handler for GET `/reservations/{reservation_id}` endpoint.
async fn handle_get_reservation(
    AxumState(app_state): AxumState<AppState>,
    Path(reservation_id): Path<i64>,
) -> Result<Json<ReservationResponse>, HttpError> {
    let response: ReservationResponse = with_service(&app_state, move |service| {
        get_reservation(service, reservation_id)
    })
    .await?;

    Ok(Json(response))
}

/// Handler for GET `/users/{user_id}/reservations` endpoint.
async fn handle_list_user_reservations(
    AxumState(app_state): AxumState<AppState>,
    Path(user_id): Path<i64>,
) -> Result<Json<ListReservationsResponse>, HttpError> {
    let response: ListReservationsResponse = with_service(&app_state, move |service| {
        list_user_reservations(service, user_id)
    })
    .await?;

    Ok(Json(response))
}

/// Handler for POST `/reservations/{reservation_id}/confirm` endpoint.
async fn handle_confirm_reservation(
    AxumState(app_state): AxumState<AppState>,
    Path(reservation_id): Path<i64>,
    Json(request): Json<TransitionReservationRequest>,
) -> Result<Json<ReservationResponse>, HttpError> {
    let response: ReservationResponse = with_service(&app_state, move |service| {
        confirm_reservation(service, reservation_id, request)
    })
    .await?;

    Ok(Json(response))
}

/// Handler for POST `/reservations/{reservation_id}/cancel` endpoint.
async fn handle_cancel_reservation(
    AxumState(app_state): AxumState<AppState>,
    Path(reservation_id): Path<i64>,
    Json(request): Json<TransitionReservationRequest>,
) -> Result<Json<ReservationResponse>, HttpError> {
    let response: ReservationResponse = with_service(&app_state, move |service| {
        cancel_reservation(service, reservation_id, request)
    })
    .await?;

    Ok(Json(response))
}

/// Handler for GET `/health` endpoint.
#[allow(clippy::unused_async)]
async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: String::from("ok"),
    })
}

/// Builds the application router with all endpoints.
fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/health", get(handle_health))
        .route("/users", post(handle_register_user))
        .route(
            "/users/{user_id}/reservations",
            get(handle_list_user_reservations),
        )
        .route("/reservations", post(handle_create_reservation))
        .route("/reservations/{reservation_id}", get(handle_get_reservation))
        .route(
            "/reservations/{reservation_id}/confirm",
            post(handle_confirm_reservation),
        )
        .route(
            "/reservations/{reservation_id}/cancel",
            post(handle_cancel_reservation),
        )
        .with_state(app_state)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command-line arguments
    let args: Args = Args::parse();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing Slotbook Server");

    let target: DatabaseTarget = if let Some(url) = &args.mysql_url {
        info!("Using MySQL/MariaDB database");
        DatabaseTarget::Mysql(url.clone())
    } else {
        info!("Using file-based database at: {}", args.database.display());
        DatabaseTarget::Sqlite(args.database.clone())
    };
    let options: ConnectionOptions = ConnectionOptions {
        busy_timeout: Duration::from_millis(args.busy_timeout_ms),
    };

    // Migrate once; request connections skip it
    let target: DatabaseTarget = tokio::task::spawn_blocking(move || {
        Persistence::open(&target, options).map(|_| target)
    })
    .await??;

    let app_state: AppState = AppState {
        target: Arc::new(target),
        options,
        retry: RetryPolicy::new().with_max_attempts(args.max_attempts),
        password_policy: PasswordPolicy::default(),
        password_hash_cost: DEFAULT_PASSWORD_HASH_COST,
    };

    // Build router
    let app: Router = build_router(app_state);

    // Bind to address
    let addr: std::net::SocketAddr = format!("{}:{}", args.bind, args.port).parse()?;
    info!("Server listening on {}", addr);

    // Run server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
