//! Shared application state for all routes.

use crate::service::NoteModel;
use crate::store::Store;

#[derive(Clone)]
pub struct AppState {
    pub store: Store,
    pub notes: NoteModel,
}

impl AppState {
    pub fn new(store: Store) -> Self {
        AppState {
            notes: NoteModel::new(store.clone()),
            store,
        }
    }
}
