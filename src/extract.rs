//! JSON body extractor that reports every rejection as a 422 `ApiError`.
//!
//! Works like `axum::Json<T>`, but syntax errors, missing fields, wrong
//! types and a missing `Content-Type` all come back as validation errors
//! with the same `{"detail": ...}` body the rest of the API uses.

use axum::{
    async_trait,
    extract::{FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::ApiError;

pub struct ApiJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(ApiJson(value)),
            Err(rejection) => {
                let detail = rejection.body_text();
                debug!(%detail, "json body rejected");
                Err(ApiError::Validation(detail))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
        routing::post,
        Router,
    };
    use serde::Deserialize;
    use tower::ServiceExt;

    #[derive(Debug, Deserialize)]
    struct Named {
        #[allow(dead_code)]
        name: String,
    }

    async fn handler(ApiJson(_body): ApiJson<Named>) -> &'static str {
        "ok"
    }

    async fn send(content_type: Option<&str>, body: &'static str) -> StatusCode {
        let app = Router::new().route("/t", post(handler));
        let mut req = Request::builder().method("POST").uri("/t");
        if let Some(ct) = content_type {
            req = req.header("content-type", ct);
        }
        let res = app.oneshot(req.body(Body::from(body)).unwrap()).await.unwrap();
        res.status()
    }

    #[tokio::test]
    async fn valid_body_passes() {
        assert_eq!(send(Some("application/json"), r#"{"name":"x"}"#).await, StatusCode::OK);
    }

    #[tokio::test]
    async fn every_rejection_is_422() {
        let json = Some("application/json");
        assert_eq!(send(json, "not json").await, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(send(json, "{}").await, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(send(json, r#"{"name":7}"#).await, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(send(None, r#"{"name":"x"}"#).await, StatusCode::UNPROCESSABLE_ENTITY);
    }
}
