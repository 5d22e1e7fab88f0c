//! HTTP request/response mapping for the accessor.
//!
//! - `GET /user/{id}` returns the JSON record.
//! - `PUT /user/{id}` takes a JSON record, keys it by the path id, and returns
//!   the id.
//! - `GET /health` is a liveness check.
//!
//! Accessor calls block, so handlers hop onto tokio's blocking pool.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::{AccessError, User, UserId, UserService, UserState, UserStore};

/// Request body for `PUT /user/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserBody {
    /// Ignored; the path id is authoritative.
    #[serde(default)]
    pub id: Option<UserId>,
    /// Display name.
    pub username: String,
    /// Contact address.
    pub email: String,
    /// Status flag.
    pub state: UserState,
}

impl UserBody {
    /// Turn the body into a record keyed by `id`.
    pub fn into_user(self, id: UserId) -> User {
        User::new(id, self.username, self.email, self.state)
    }
}

/// Error response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error description.
    pub error: String,
}

/// Health response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Health {
    /// Healthy flag.
    pub ok: bool,
}

/// Failure of a request after routing.
#[derive(Debug)]
pub enum ApiError {
    /// The accessor reported an error.
    Access(AccessError),
    /// The blocking task panicked or was cancelled.
    Worker(String),
}

impl From<AccessError> for ApiError {
    fn from(err: AccessError) -> Self {
        Self::Access(err)
    }
}

impl ApiError {
    /// Status code for this error.
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Access(AccessError::NotFound(_)) => StatusCode::NOT_FOUND,
            Self::Access(AccessError::Timeout(_)) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Access(AccessError::Store(_) | AccessError::Interrupted) | Self::Worker(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error = match self {
            Self::Access(err) => err.to_string(),
            Self::Worker(msg) => format!("worker failure: {msg}"),
        };
        if status.is_server_error() {
            tracing::error!(%status, %error, "request failed");
        }
        (status, Json(ErrorResponse { error })).into_response()
    }
}

/// Build the router over a shared accessor.
pub fn router<S: UserStore + 'static>(service: Arc<UserService<S>>) -> Router {
    Router::new()
        .route("/user/{id}", get(get_user::<S>).put(put_user::<S>))
        .route("/health", get(health))
        .with_state(service)
}

/// `GET /user/{id}`
pub async fn get_user<S: UserStore + 'static>(
    State(service): State<Arc<UserService<S>>>,
    Path(id): Path<UserId>,
) -> Result<Json<User>, ApiError> {
    let request_id = Uuid::new_v4();
    tracing::info!(%request_id, id, "read user");
    let user = run_blocking(move || service.read(id)).await?;
    Ok(Json(user))
}

/// `PUT /user/{id}`
pub async fn put_user<S: UserStore + 'static>(
    State(service): State<Arc<UserService<S>>>,
    Path(id): Path<UserId>,
    Json(body): Json<UserBody>,
) -> Result<Json<UserId>, ApiError> {
    let request_id = Uuid::new_v4();
    if body.id.is_some_and(|body_id| body_id != id) {
        tracing::debug!(%request_id, id, body_id = ?body.id, "body id overridden by path");
    }
    tracing::info!(%request_id, id, "write user");
    let user = body.into_user(id);
    let written = run_blocking(move || service.write(&user)).await?;
    Ok(Json(written))
}

/// `GET /health`
pub async fn health() -> Json<Health> {
    Json(Health { ok: true })
}

async fn run_blocking<T, F>(f: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, AccessError> + Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| ApiError::Worker(e.to_string()))?
        .map_err(ApiError::from)
}
