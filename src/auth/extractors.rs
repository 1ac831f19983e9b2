use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};
use tracing::{debug, warn};

use super::jwt::JwtKeys;
use crate::{error::ApiError, state::AppState, users::User};

/// Resolves the caller from `Authorization: Bearer <token>`.
///
/// Missing header, wrong scheme, a token that fails verification and a
/// subject that no longer exists all produce the same `Unauthenticated`.
pub async fn authenticate(state: &AppState, headers: &HeaderMap) -> Result<User, ApiError> {
    let token = bearer_token(headers).ok_or_else(|| {
        debug!("missing or non-bearer Authorization header");
        ApiError::Unauthenticated
    })?;

    let claims = JwtKeys::from_ref(state).verify(token).map_err(|e| {
        warn!(error = %e, "invalid or expired token");
        ApiError::Unauthenticated
    })?;

    match state.users.find_by_username(&claims.sub).await? {
        Some(user) => Ok(user),
        None => {
            warn!(subject = %claims.sub, "token subject does not exist");
            Err(ApiError::Unauthenticated)
        }
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

/// The authenticated caller. Put it first in a handler's arguments so the
/// gate runs before any body or query parsing.
pub struct CurrentUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        authenticate(state, &parts.headers).await.map(CurrentUser)
    }
}
