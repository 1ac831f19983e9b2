use crate::state::AppState;
use axum::Router;

pub mod claims;
mod dto;
pub mod extractors;
pub mod handlers;
pub mod jwt;
pub mod password;

pub use extractors::{authenticate, CurrentUser};

pub fn router() -> Router<AppState> {
    handlers::auth_routes()
}
