//! HTML and redirect response helpers used by the handlers.

use crate::views::{layout, Template};
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};

/// Render `data` inside the shared layout.
pub fn render<T: Template>(data: &T, status: StatusCode) -> Response {
    tracing::debug!(template = T::NAME, status = status.as_u16(), "render");
    let page = layout::page(&data.title(), data.body());
    (status, Html(page.into_string())).into_response()
}

/// Render `data` with `error` shown above the form.
pub fn render_with_error<T: Template>(mut data: T, error: impl Into<String>, status: StatusCode) -> Response {
    data.set_error(error.into());
    render(&data, status)
}

/// 303 See Other, so a refresh after a POST does not resubmit.
pub fn redirect(location: &str) -> Response {
    Redirect::to(location).into_response()
}
