//! Note handlers: list, create, edit, update, delete.
//!
//! Input problems re-render the originating page with the untrimmed input and 422.
//! A well-formed id with no row re-renders the list with 500. Successful writes redirect to the list.

use crate::error::AppError;
use crate::response::{redirect, render, render_with_error};
use crate::routes::NoteUrl;
use crate::service::{NoteInput, NoteModel};
use crate::state::AppState;
use crate::views::{NoteEditView, NoteIndexView};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Response,
    Form,
};

pub const NOT_FOUND_MESSAGE: &str = "Note not found";
const NOT_FOUND_STATUS: StatusCode = StatusCode::INTERNAL_SERVER_ERROR;

async fn list_with_error(
    state: &AppState,
    form: NoteInput,
    error: &str,
    status: StatusCode,
) -> Result<Response, AppError> {
    let notes = state.notes.find_all().await?;
    Ok(render_with_error(NoteIndexView::new(notes).with_form(form), error, status))
}

async fn invalid_id(state: &AppState, raw: &str, error: &str) -> Result<Response, AppError> {
    tracing::warn!(id = %raw, error, "rejected note id");
    list_with_error(state, NoteInput::default(), error, StatusCode::UNPROCESSABLE_ENTITY).await
}

async fn not_found(state: &AppState, id: i64) -> Result<Response, AppError> {
    tracing::warn!(id, "note not found");
    list_with_error(state, NoteInput::default(), NOT_FOUND_MESSAGE, NOT_FOUND_STATUS).await
}

pub async fn index(State(state): State<AppState>) -> Result<Response, AppError> {
    let notes = state.notes.find_all().await?;
    Ok(render(&NoteIndexView::new(notes), StatusCode::OK))
}

pub async fn create(State(state): State<AppState>, Form(input): Form<NoteInput>) -> Result<Response, AppError> {
    let valid = match NoteModel::validate_create(&input) {
        Ok(v) => v,
        Err(e) => {
            tracing::warn!(error = %e, "rejected note");
            return list_with_error(&state, input, e.message(), StatusCode::UNPROCESSABLE_ENTITY).await;
        }
    };
    let note = state.notes.create(&valid).await?;
    tracing::info!(id = note.id, "note created");
    Ok(redirect(NoteUrl::index()))
}

pub async fn edit(State(state): State<AppState>, Path(raw_id): Path<String>) -> Result<Response, AppError> {
    let id = match NoteModel::validate_id(&raw_id) {
        Ok(id) => id,
        Err(e) => return invalid_id(&state, &raw_id, e.message()).await,
    };
    match state.notes.find(id).await? {
        Some(note) => Ok(render(&NoteEditView::from(&note), StatusCode::OK)),
        None => not_found(&state, id).await,
    }
}

pub async fn update(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    Form(input): Form<NoteInput>,
) -> Result<Response, AppError> {
    let id = match NoteModel::validate_id(&raw_id) {
        Ok(id) => id,
        Err(e) => return invalid_id(&state, &raw_id, e.message()).await,
    };
    if !state.notes.exists(id).await? {
        return not_found(&state, id).await;
    }
    let valid = match NoteModel::validate_update(&input) {
        Ok(v) => v,
        Err(e) => {
            tracing::warn!(id, error = %e, "rejected note update");
            return Ok(render_with_error(
                NoteEditView::new(id, input),
                e.message(),
                StatusCode::UNPROCESSABLE_ENTITY,
            ));
        }
    };
    state.notes.update(id, &valid).await?;
    tracing::info!(id, "note updated");
    Ok(redirect(NoteUrl::index()))
}

pub async fn delete(State(state): State<AppState>, Path(raw_id): Path<String>) -> Result<Response, AppError> {
    let id = match NoteModel::validate_id(&raw_id) {
        Ok(id) => id,
        Err(e) => return invalid_id(&state, &raw_id, e.message()).await,
    };
    if !state.notes.exists(id).await? {
        return not_found(&state, id).await;
    }
    state.notes.delete(id).await?;
    tracing::info!(id, "note deleted");
    Ok(redirect(NoteUrl::index()))
}
