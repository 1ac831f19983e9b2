use crate::state::AppState;
use axum::Router;

mod dto;
mod extractors;
pub mod handlers;

pub fn router() -> Router<AppState> {
    handlers::team_routes()
}
