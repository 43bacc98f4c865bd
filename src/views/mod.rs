//! Server-rendered HTML. Each view is a data struct that renders its own body; the
//! shared layout is applied by `response::render`.

pub mod layout;
pub mod note;

use maud::Markup;

pub use note::{NoteEditView, NoteIndexView};

pub trait Template {
    /// Stable name used in logs, e.g. `note/index`.
    const NAME: &'static str;

    fn title(&self) -> String;

    fn body(&self) -> Markup;

    fn set_error(&mut self, error: String);
}
