pub(crate) mod dto;
pub mod handlers;
pub mod repo;
pub mod repo_types;
mod summary;

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    handlers::expense_routes()
}
