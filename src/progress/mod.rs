use axum::Router;

use crate::state::AppState;

pub mod aggregate;
mod dto;
pub mod handlers;
pub mod repo;

pub fn router() -> Router<AppState> {
    handlers::routes()
}
