//! Notekeeper: server-rendered notes stored in a single-file SQLite image.

pub mod config;
pub mod error;
pub mod handlers;
pub mod response;
pub mod routes;
pub mod service;
pub mod sql;
pub mod state;
pub mod store;
pub mod views;

pub use config::AppConfig;
pub use error::{AppError, ConfigError};
pub use routes::{app, common_routes, note_routes, NoteUrl};
pub use service::{Note, NoteInput, NoteModel, Repository, Table};
pub use state::AppState;
pub use store::Store;
