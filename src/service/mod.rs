//! Domain layer: field validation, generic table CRUD, and the note model.

pub mod crud;
pub mod note;
pub mod validation;
pub use crud::{Entity, Repository, Table};
pub use note::{Note, NoteInput, NoteModel};
pub use validation::{check, parse_rules, validate, Rule, ValidationError, ValidationResult};
