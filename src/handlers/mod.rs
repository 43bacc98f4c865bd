//! HTTP handlers for the note pages.

pub mod note;
pub use note::*;
