//! Probes: liveness, store readiness, build version.

use crate::state::AppState;
use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::Serialize;

#[derive(Serialize)]
struct Liveness {
    status: &'static str,
}

/// Readiness of the embedded store.
#[derive(Serialize)]
struct StoreReadiness {
    status: &'static str,
    database: &'static str,
    /// `file` when mutations are written to disk, `memory` otherwise.
    persistence: &'static str,
}

async fn health() -> Json<Liveness> {
    Json(Liveness { status: "ok" })
}

async fn ready(State(state): State<AppState>) -> (StatusCode, Json<StoreReadiness>) {
    let persistence = if state.store.path().is_some() { "file" } else { "memory" };
    match state.store.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(StoreReadiness {
                status: "ok",
                database: "ok",
                persistence,
            }),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "store not ready");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(StoreReadiness {
                    status: "degraded",
                    database: "unavailable",
                    persistence,
                }),
            )
        }
    }
}

async fn version() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

pub fn common_routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/ready", get(ready))
        .route("/version", get(version))
        .with_state(state)
}
