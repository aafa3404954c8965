//! Router assembly and the session-token extractor.

use axum::Router;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::routing::{get, post};
use chrono::Utc;

use deck_core::entities::User;

use crate::AppState;
use crate::error::ServerError;
use crate::repos;

mod auth;
mod tasks;

/// Session token request header (case-insensitive on the wire).
pub const SESSION_HEADER: &str = "x-session-token";

pub(crate) fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/users/me", get(auth::me))
        .route("/api/tasks", get(tasks::list).post(tasks::create))
        .route(
            "/api/tasks/{id}",
            get(tasks::show).put(tasks::update).delete(tasks::remove),
        )
        .layer(axum::middleware::from_fn(crate::middleware::correlation))
        .with_state(state)
}

async fn health() -> &'static str {
    "OK"
}

/// The authenticated user, resolved from the `X-Session-Token` header
/// against the sessions table. Handlers taking this reject with 401 when
/// the token is missing, expired, or revoked.
pub struct CurrentUser(pub User);

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ServerError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(SESSION_HEADER)
            .and_then(|value| value.to_str().ok())
            .filter(|token| !token.is_empty())
            .ok_or(ServerError::Unauthorized("missing session token"))?;
        let session = repos::sessions::find_active(&state.db, token, Utc::now())?
            .ok_or(ServerError::Unauthorized("session expired or revoked"))?;
        let user = repos::users::find(&state.db, session.user_id)?
            .ok_or(ServerError::Unauthorized("session user no longer exists"))?;
        Ok(Self(user))
    }
}
