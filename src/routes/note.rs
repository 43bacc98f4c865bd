//! Note page routes and the URLs views link to.

use crate::handlers::note::{create, delete as delete_handler, edit, index, update};
use crate::state::AppState;
use axum::{routing::get, routing::post, Router};

/// Paths for the note pages.
pub struct NoteUrl;

impl NoteUrl {
    pub fn index() -> &'static str {
        "/"
    }

    pub fn create() -> &'static str {
        "/create"
    }

    pub fn edit(id: i64) -> String {
        format!("/edit/{}", id)
    }

    pub fn update(id: i64) -> String {
        format!("/update/{}", id)
    }

    pub fn delete(id: i64) -> String {
        format!("/delete/{}", id)
    }
}

pub fn note_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/create", post(create))
        .route("/edit/:id", get(edit))
        .route("/update/:id", post(update))
        .route("/delete/:id", post(delete_handler))
        .with_state(state)
}
