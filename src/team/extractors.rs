use axum::{
    async_trait,
    extract::{FromRequestParts, Query},
    http::request::Parts,
};

use crate::{error::ApiError, users::Status};

/// Repeated `?status=<code>` query parameters. `None` when absent.
/// Any value outside the four codes is a validation error.
#[derive(Debug, PartialEq, Eq)]
pub struct StatusFilter(pub Option<Vec<Status>>);

#[async_trait]
impl<S> FromRequestParts<S> for StatusFilter
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Query(pairs) = Query::<Vec<(String, String)>>::try_from_uri(&parts.uri)
            .map_err(|e| ApiError::Validation(e.body_text()))?;

        let mut statuses = Vec::new();
        for (_, raw) in pairs.into_iter().filter(|(key, _)| key == "status") {
            let status = raw.parse::<Status>().map_err(|_| {
                ApiError::Validation(format!(
                    "status: invalid value {raw:?}, expected one of 0, 1, 2, 3"
                ))
            })?;
            if !statuses.contains(&status) {
                statuses.push(status);
            }
        }
        Ok(StatusFilter((!statuses.is_empty()).then_some(statuses)))
    }
}
