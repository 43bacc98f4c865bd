//! Note entity: validation pipeline and CRUD on top of the generic repository.

use crate::error::AppError;
use crate::service::crud::{Entity, Repository, Table};
use crate::service::validation::{check, Rule, ValidationError, ValidationResult};
use crate::sql::{OrderBy, Record};
use crate::store::{Store, TableSchema, NOTES_TABLE};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

pub const TITLE_MAX: usize = 100;
pub const CONTENT_MAX: usize = 1000;

const TITLE_RULES: &[Rule] = &[Rule::Required, Rule::MaxLength(TITLE_MAX)];
const CONTENT_RULES: &[Rule] = &[Rule::Required, Rule::MaxLength(CONTENT_MAX)];
const ID_RULES: &[Rule] = &[Rule::PositiveInteger];

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Note {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub created_at: String,
}

impl Entity for Note {
    const TABLE: &'static TableSchema = &NOTES_TABLE;
}

/// Create/update form payload. Missing fields read as empty strings.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteInput {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
}

impl NoteInput {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        NoteInput {
            title: title.into(),
            content: content.into(),
        }
    }

    pub fn trimmed(&self) -> Self {
        NoteInput {
            title: self.title.trim().to_string(),
            content: self.content.trim().to_string(),
        }
    }

    fn to_record(&self) -> Record {
        let t = self.trimmed();
        let mut r = Record::new();
        r.insert("title".into(), Value::String(t.title));
        r.insert("content".into(), Value::String(t.content));
        r
    }
}

impl From<&Note> for NoteInput {
    fn from(note: &Note) -> Self {
        NoteInput::new(note.title.clone(), note.content.clone())
    }
}

#[derive(Clone)]
pub struct NoteModel {
    repo: Arc<dyn Repository<Note>>,
}

impl NoteModel {
    pub fn new(store: Store) -> Self {
        Self::with_repository(Arc::new(Table::<Note>::new(store)))
    }

    pub fn with_repository(repo: Arc<dyn Repository<Note>>) -> Self {
        NoteModel { repo }
    }

    fn validate_input(input: &NoteInput) -> ValidationResult<NoteInput> {
        check("Title", &input.title, TITLE_RULES)?;
        check("Content", &input.content, CONTENT_RULES)?;
        Ok(input.trimmed())
    }

    /// Title then content; first failure wins. Returns the trimmed input.
    pub fn validate_create(input: &NoteInput) -> ValidationResult<NoteInput> {
        Self::validate_input(input)
    }

    pub fn validate_update(input: &NoteInput) -> ValidationResult<NoteInput> {
        Self::validate_input(input)
    }

    pub fn validate_id(raw: &str) -> ValidationResult<i64> {
        check("ID", raw, ID_RULES)?;
        crate::service::validation::parse_number(raw)
            .filter(|n| *n <= i64::MAX as f64)
            .map(|n| n as i64)
            .ok_or_else(|| ValidationError::new("ID must be a positive integer"))
    }

    /// Newest first.
    pub async fn find_all(&self) -> Result<Vec<Note>, AppError> {
        self.repo.find_all(Some(OrderBy::desc("id"))).await
    }

    pub async fn find(&self, id: i64) -> Result<Option<Note>, AppError> {
        self.repo.find_by_id(id).await
    }

    pub async fn exists(&self, id: i64) -> Result<bool, AppError> {
        self.repo.exists(id).await
    }

    /// Insert the trimmed input and return the stored row with its id and timestamp.
    pub async fn create(&self, input: &NoteInput) -> Result<Note, AppError> {
        let id = self.repo.insert(&input.to_record()).await?;
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("note {}", id)))
    }

    /// Title and content only; id and created_at never change.
    pub async fn update(&self, id: i64, input: &NoteInput) -> Result<Note, AppError> {
        self.repo.update(id, &input.to_record()).await?;
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("note {}", id)))
    }

    pub async fn delete(&self, id: i64) -> Result<(), AppError> {
        self.repo.delete(id).await
    }
}
