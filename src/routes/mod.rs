//! Router assembly: note pages, probes, static files, and the tower layers around them.

mod common;
mod note;

pub use common::common_routes;
pub use note::{note_routes, NoteUrl};

use crate::config::AppConfig;
use crate::state::AppState;
use axum::Router;
use tower_http::{limit::RequestBodyLimitLayer, services::ServeDir, trace::TraceLayer};

/// Full application router for `state`, serving static files from `config.public_dir`.
pub fn app(state: AppState, config: &AppConfig) -> Router {
    Router::new()
        .merge(note_routes(state.clone()))
        .merge(common_routes(state))
        .nest_service("/public", ServeDir::new(&config.public_dir))
        .layer(RequestBodyLimitLayer::new(config.body_limit))
        .layer(TraceLayer::new_for_http())
}
