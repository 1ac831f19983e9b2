use anyhow::Context;
use axum::{
    extract::{FromRef, State},
    routing::post,
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{LoginRequest, TokenResponse},
        jwt::JwtKeys,
        password::{verify_decoy, verify_password},
    },
    error::ApiError,
    extract::ApiJson,
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new().route("/login", post(login))
}

#[instrument(skip_all)]
pub async fn login(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<LoginRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let found = state.users.find_by_username(&payload.username).await?;

    // unknown usernames still pay for one Argon2 verification
    let hash = found.as_ref().map(|u| u.password_hash.clone());
    let password = payload.password;
    let ok = tokio::task::spawn_blocking(move || match hash {
        Some(hash) => verify_password(&password, &hash),
        None => verify_decoy(&password),
    })
    .await
    .context("join password verification")?;

    let user = match found {
        Some(user) if ok => user,
        Some(user) => {
            warn!(username = %user.username, user_id = user.id, "login invalid password");
            return Err(ApiError::InvalidCredentials);
        }
        None => {
            warn!(username = %payload.username, "login unknown username");
            return Err(ApiError::InvalidCredentials);
        }
    };

    let access_token = JwtKeys::from_ref(&state).sign(&user.username)?;

    info!(user_id = user.id, username = %user.username, "user logged in");
    Ok(Json(TokenResponse::bearer(access_token)))
}
