//! Dev login flow: email + name opens a session, no identity provider
//! round trip. The returned session token authenticates everything else.

use axum::Json;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use chrono::Utc;
use serde::Deserialize;

use deck_core::entities::{Session, User};
use deck_core::envelope::Envelope;
use deck_core::problem::InvalidParam;

use crate::AppState;
use crate::error::ServerError;
use crate::repos;
use crate::routes::{CurrentUser, SESSION_HEADER};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub name: String,
}

pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<Envelope<Session>>, ServerError> {
    let mut params = Vec::new();
    let email = body.email.trim();
    if email.is_empty() || !email.contains('@') {
        params.push(InvalidParam {
            name: "email".to_string(),
            reason: "A valid email address is required".to_string(),
        });
    }
    let name = body.name.trim();
    if name.is_empty() {
        params.push(InvalidParam {
            name: "name".to_string(),
            reason: "Name is required".to_string(),
        });
    }
    if !params.is_empty() {
        return Err(ServerError::Validation(params));
    }

    let now = Utc::now();
    let user = repos::users::upsert_dev(&state.db, email, name, now)?;
    let session = repos::sessions::create(
        &state.db,
        user.id,
        state.config.server.session_ttl_hours,
        now,
    )?;
    tracing::info!(user = %user.email, "session opened");
    Ok(Json(Envelope::ok(session)))
}

pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<StatusCode, ServerError> {
    let token = headers
        .get(SESSION_HEADER)
        .and_then(|value| value.to_str().ok())
        .filter(|token| !token.is_empty())
        .ok_or(ServerError::Unauthorized("missing session token"))?;
    repos::sessions::revoke(&state.db, token, Utc::now())?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn me(CurrentUser(user): CurrentUser) -> Json<Envelope<User>> {
    Json(Envelope::ok(user))
}
