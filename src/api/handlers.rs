//! API Handlers
//!
//! HTTP request handlers for the user endpoints. Reads return the cached JSON
//! bytes verbatim; writes return freshly serialized store results.

use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;
use tracing::debug;

use crate::cache::CacheLayer;
use crate::coordinator::{CacheAside, CachePolicy, JsonPayload};
use crate::error::{ApiError, Result, USER_NOT_FOUND};
use crate::models::{
    CreateUserRequest, HealthResponse, MessageResponse, UpdateUserRequest, User,
};
use crate::store::UserStore;

pub const NO_DATA: &str = "No data provided";

/// Application state shared across all handlers.
#[derive(Clone, Debug)]
pub struct AppState {
    pub users: Arc<CacheAside>,
}

impl AppState {
    pub fn new(users: CacheAside) -> Self {
        Self {
            users: Arc::new(users),
        }
    }

    /// Wires a coordinator from its store, cache and TTL policy.
    pub fn from_parts(
        store: Arc<dyn UserStore>,
        cache: Arc<dyn CacheLayer>,
        policy: CachePolicy,
    ) -> Self {
        Self::new(CacheAside::new(store, cache, policy))
    }
}

impl IntoResponse for JsonPayload {
    fn into_response(self) -> Response {
        (
            [(header::CONTENT_TYPE, "application/json")],
            self.into_bytes(),
        )
            .into_response()
    }
}

fn body_or_reject<T>(payload: std::result::Result<Json<T>, JsonRejection>) -> Result<T> {
    payload.map(|Json(body)| body).map_err(|rejection| {
        debug!("Rejected request body: {}", rejection);
        ApiError::Validation(NO_DATA.to_string())
    })
}

/// Create bodies must be a non-empty JSON value; `{}`, `[]`, `null`, `""`,
/// `0` and `false` all count as no data.
fn create_body(payload: std::result::Result<Json<Value>, JsonRejection>) -> Result<CreateUserRequest> {
    let value = body_or_reject(payload)?;
    let empty = match &value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(fields) => fields.is_empty(),
    };
    if empty {
        return Err(ApiError::Validation(NO_DATA.to_string()));
    }

    serde_json::from_value(value).map_err(|e| {
        debug!("Rejected create body: {}", e);
        ApiError::Validation(NO_DATA.to_string())
    })
}

/// Non-integer ids name no user.
fn user_id(path: std::result::Result<Path<i64>, PathRejection>) -> Result<i64> {
    path.map(|Path(id)| id).map_err(|rejection| {
        debug!("Rejected user id: {}", rejection);
        ApiError::NotFound(USER_NOT_FOUND.to_string())
    })
}

/// Handler for GET /api/health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}

/// Handler for POST /api/users
///
/// Validation runs before anything touches the store.
pub async fn create_user_handler(
    State(state): State<AppState>,
    payload: std::result::Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<User>)> {
    let new_user = create_body(payload)?
        .validate()
        .map_err(ApiError::Validation)?;

    let user = state.users.create_user(new_user).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// Handler for GET /api/users
pub async fn list_users_handler(State(state): State<AppState>) -> Result<JsonPayload> {
    state.users.list_users().await
}

/// Handler for GET /api/users/:id
pub async fn get_user_handler(
    State(state): State<AppState>,
    path: std::result::Result<Path<i64>, PathRejection>,
) -> Result<JsonPayload> {
    state.users.get_user(user_id(path)?).await
}

/// Handler for PUT /api/users/:id
///
/// An unknown id is reported before the body is looked at.
pub async fn update_user_handler(
    State(state): State<AppState>,
    path: std::result::Result<Path<i64>, PathRejection>,
    payload: std::result::Result<Json<UpdateUserRequest>, JsonRejection>,
) -> Result<Json<User>> {
    let id = user_id(path)?;
    state.users.require_user(id).await?;

    let changes = body_or_reject(payload)?.into_changes();
    let user = state.users.update_user(id, changes).await?;
    Ok(Json(user))
}

/// Handler for DELETE /api/users/:id
pub async fn delete_user_handler(
    State(state): State<AppState>,
    path: std::result::Result<Path<i64>, PathRejection>,
) -> Result<Json<MessageResponse>> {
    state.users.delete_user(user_id(path)?).await?;
    Ok(Json(MessageResponse::user_deleted()))
}
