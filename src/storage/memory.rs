use std::sync::{Mutex, PoisonError};

use crate::error::AppError;
use crate::storage::{Document, DocumentStore};

/// In-memory backend for tests: same contract as the file store, no disk.
#[derive(Default)]
pub struct MemoryStore {
    doc: Mutex<Document>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DocumentStore for MemoryStore {
    fn load(&self) -> Result<Document, AppError> {
        Ok(self
            .doc
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }

    fn save(&self, doc: &Document) -> Result<(), AppError> {
        *self.doc.lock().unwrap_or_else(PoisonError::into_inner) = doc.clone();
        Ok(())
    }

    fn probe(&self) -> Result<(), AppError> {
        Ok(())
    }
}
