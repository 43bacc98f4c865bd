//! List and edit pages for notes.

use crate::routes::NoteUrl;
use crate::service::note::{CONTENT_MAX, TITLE_MAX};
use crate::service::{Note, NoteInput};
use crate::views::Template;
use maud::{html, Markup};

fn error_banner(error: Option<&str>) -> Markup {
    html! {
        @if let Some(e) = error {
            p.error role="alert" { (e) }
        }
    }
}

fn note_fields(form: &NoteInput) -> Markup {
    html! {
        label for="title" { "Title" }
        input #title type="text" name="title" maxlength=(TITLE_MAX) value=(form.title);
        label for="content" { "Content" }
        textarea #content name="content" rows="5" maxlength=(CONTENT_MAX) { (form.content) }
    }
}

/// `GET /`: every note plus the create form.
#[derive(Clone, Debug, Default)]
pub struct NoteIndexView {
    pub notes: Vec<Note>,
    /// Echoed back after a failed create.
    pub form: NoteInput,
    pub error: Option<String>,
}

impl NoteIndexView {
    pub fn new(notes: Vec<Note>) -> Self {
        NoteIndexView {
            notes,
            ..Default::default()
        }
    }

    pub fn with_form(mut self, form: NoteInput) -> Self {
        self.form = form;
        self
    }
}

impl Template for NoteIndexView {
    const NAME: &'static str = "note/index";

    fn title(&self) -> String {
        "Notes".to_string()
    }

    fn body(&self) -> Markup {
        html! {
            h1 { "Notes" }
            (error_banner(self.error.as_deref()))
            form.note-form method="post" action=(NoteUrl::create()) {
                (note_fields(&self.form))
                button type="submit" { "Create" }
            }
            @if self.notes.is_empty() {
                p.empty { "No notes yet." }
            } @else {
                ul.notes {
                    @for note in &self.notes {
                        li.note id=(format!("note-{}", note.id)) {
                            h2 { (note.title) }
                            p.content { (note.content) }
                            small.created { (note.created_at) }
                            div.actions {
                                a href=(NoteUrl::edit(note.id)) { "Edit" }
                                form method="post" action=(NoteUrl::delete(note.id)) {
                                    button type="submit" { "Delete" }
                                }
                            }
                        }
                    }
                }
            }
        }
    }

    fn set_error(&mut self, error: String) {
        self.error = Some(error);
    }
}

/// `GET /edit/:id`: form prefilled with the stored note, or the rejected input.
#[derive(Clone, Debug)]
pub struct NoteEditView {
    pub id: i64,
    pub form: NoteInput,
    pub error: Option<String>,
}

impl NoteEditView {
    pub fn new(id: i64, form: NoteInput) -> Self {
        NoteEditView { id, form, error: None }
    }
}

impl From<&Note> for NoteEditView {
    fn from(note: &Note) -> Self {
        NoteEditView::new(note.id, NoteInput::from(note))
    }
}

impl Template for NoteEditView {
    const NAME: &'static str = "note/edit";

    fn title(&self) -> String {
        format!("Edit note #{}", self.id)
    }

    fn body(&self) -> Markup {
        html! {
            h1 { "Edit note" }
            (error_banner(self.error.as_deref()))
            form.note-form method="post" action=(NoteUrl::update(self.id)) {
                (note_fields(&self.form))
                button type="submit" { "Save" }
                " "
                a href=(NoteUrl::index()) { "Cancel" }
            }
        }
    }

    fn set_error(&mut self, error: String) {
        self.error = Some(error);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note(id: i64, title: &str) -> Note {
        Note {
            id,
            title: title.to_string(),
            content: "body".to_string(),
            created_at: "2024-01-01 00:00:00".to_string(),
        }
    }

    #[test]
    fn index_lists_notes_with_actions() {
        let html = NoteIndexView::new(vec![note(2, "Second"), note(1, "First")]).body().into_string();
        assert!(html.contains("Second"));
        assert!(html.contains(r#"href="/edit/2""#));
        assert!(html.contains(r#"action="/delete/1""#));
        assert!(html.find("Second") < html.find("First"));
        assert!(!html.contains("No notes yet."));
    }

    #[test]
    fn index_echoes_form_and_error() {
        let mut view = NoteIndexView::new(Vec::new()).with_form(NoteInput::new("  keep me  ", "<b>x</b>"));
        view.set_error("Title is required".into());
        let html = view.body().into_string();
        assert!(html.contains(r#"value="  keep me  ""#));
        assert!(html.contains("&lt;b&gt;x&lt;/b&gt;"));
        assert!(html.contains("Title is required"));
        assert!(html.contains("No notes yet."));
    }

    #[test]
    fn edit_posts_to_update() {
        let view = NoteEditView::from(&note(5, "Five"));
        assert_eq!(view.title(), "Edit note #5");
        let html = view.body().into_string();
        assert!(html.contains(r#"action="/update/5""#));
        assert!(html.contains(r#"value="Five""#));
    }
}
