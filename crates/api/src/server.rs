//! HTTP server for progress evaluation.
//!
//! Routes:
//! - `GET|POST /api/v1/course/progress-status` (bearer authenticated)
//! - `GET /api/v1/health`

use std::collections::HashMap;
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Query, Request, State};
use axum::middleware::{self, Next};
use axum::response::{Json, Response};
use axum::routing::get;
use axum::Router;
use coursepace_core::{Clock, ProgressResult, SystemClock};
use coursepace_progress::ProgressEvaluator;
use serde_json::Value;
use tokio::net::TcpListener;
use tracing::{debug, info, warn};
use ulid::Ulid;

use crate::auth::BearerAuth;
use crate::config::ServerConfig;
use crate::error::ApiError;
use crate::validation::{validate_fields, FieldErrors, RequestFields};

/// Path of the evaluation endpoint.
pub const PROGRESS_STATUS_PATH: &str = "/api/v1/course/progress-status";

/// Path of the health endpoint.
pub const HEALTH_PATH: &str = "/api/v1/health";

/// Shared state of request handlers.
#[derive(Clone)]
pub struct AppState {
    evaluator: Arc<ProgressEvaluator<Arc<dyn Clock>>>,
    auth: BearerAuth,
}

impl AppState {
    /// Create state evaluating against `clock` and accepting `auth` tokens.
    pub fn new(clock: Arc<dyn Clock>, auth: BearerAuth) -> Self {
        Self {
            evaluator: Arc::new(ProgressEvaluator::new(clock)),
            auth,
        }
    }
}

/// Errors raised while starting the server.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Serving without a token would reject every request
    #[error("at least one API token is required (set COURSEPACE_API_TOKENS)")]
    NoTokens,

    /// Binding or serving failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Build the API router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            PROGRESS_STATUS_PATH,
            get(progress_status).post(progress_status),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), require_bearer))
        .route(HEALTH_PATH, get(health))
        .with_state(state)
}

/// coursepace HTTP server.
pub struct ProgressServer {
    config: ServerConfig,
    state: AppState,
}

impl ProgressServer {
    /// Create a server evaluating against the system clock.
    pub fn new(config: ServerConfig) -> Result<Self, ServerError> {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Create a server evaluating against the given clock.
    pub fn with_clock(config: ServerConfig, clock: Arc<dyn Clock>) -> Result<Self, ServerError> {
        let auth = BearerAuth::new(config.usable_tokens());
        if auth.token_count() == 0 {
            return Err(ServerError::NoTokens);
        }

        Ok(Self {
            state: AppState::new(clock, auth),
            config,
        })
    }

    /// Bind the configured address and serve until the process stops.
    pub async fn serve(self) -> Result<(), ServerError> {
        let listener = TcpListener::bind(self.config.listen).await?;
        self.serve_on(listener).await
    }

    /// Serve on an already bound listener.
    pub async fn serve_on(self, listener: TcpListener) -> Result<(), ServerError> {
        let addr = listener.local_addr()?;
        info!(
            "{} v{} listening on {}",
            self.config.server_name, self.config.version, addr
        );
        axum::serve(listener, router(self.state)).await?;
        Ok(())
    }
}

async fn health() -> Json<Value> {
    Json(serde_json::json!({"status": "ok"}))
}

async fn require_bearer(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if let Err(err) = state.auth.verify(request.headers()) {
        warn!(reason = %err, path = %request.uri().path(), "Rejected unauthenticated request");
        return Err(err.into());
    }
    Ok(next.run(request).await)
}

async fn progress_status(
    State(state): State<AppState>,
    Query(query): Query<HashMap<String, String>>,
    body: Bytes,
) -> Result<Json<ProgressResult>, ApiError> {
    let request_id = Ulid::new();

    let fields = collect_fields(query, &body).and_then(|fields| validate_fields(&fields));
    let request = match fields {
        Ok(request) => request,
        Err(errors) => {
            let rejected: Vec<&str> = errors.fields().collect();
            info!(%request_id, fields = ?rejected, "Rejected progress request");
            return Err(errors.into());
        }
    };
    debug!(%request_id, ?request, "Evaluating progress");

    let result = state.evaluator.evaluate(&request);
    info!(
        %request_id,
        status = %result.status,
        expected_progress = result.expected_progress,
        needed_daily_learning_time = result.needed_daily_learning_time,
        "Progress evaluated"
    );
    Ok(Json(result))
}

/// Fields come from a JSON object body, or from the query string when the
/// body is empty.
fn collect_fields(
    query: HashMap<String, String>,
    body: &[u8],
) -> Result<RequestFields, FieldErrors> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(query
            .into_iter()
            .map(|(name, value)| (name, Value::String(value)))
            .collect());
    }

    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(fields)) => Ok(fields),
        Ok(_) => Err(FieldErrors::single(
            "body",
            "The request body must be a JSON object.",
        )),
        Err(err) => Err(FieldErrors::single(
            "body",
            format!("The request body is not valid JSON: {err}"),
        )),
    }
}
