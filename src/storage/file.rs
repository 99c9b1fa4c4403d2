use std::fs;
use std::path::{Path, PathBuf};

use crate::error::AppError;
use crate::storage::{Document, DocumentStore};

/// Production backend: one JSON file on disk.
///
/// Writes go through a temporary file in the same directory followed by a
/// rename, so a crash mid-write can never leave a truncated document behind.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn parent_dir(&self) -> &Path {
        self.path.parent().unwrap_or_else(|| Path::new("."))
    }
}

impl DocumentStore for JsonFileStore {
    fn load(&self) -> Result<Document, AppError> {
        if !self.path.exists() {
            self.save(&Document::default())?;
        }
        let raw = fs::read_to_string(&self.path)?;
        let mut doc: Document = serde_json::from_str(&raw)?;
        doc.reconcile_user_counter();
        Ok(doc)
    }

    fn save(&self, doc: &Document) -> Result<(), AppError> {
        fs::create_dir_all(self.parent_dir())?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_string_pretty(doc)?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    fn probe(&self) -> Result<(), AppError> {
        fs::create_dir_all(self.parent_dir())?;
        let marker = self.parent_dir().join(".health_check");
        fs::write(&marker, "ok")?;
        fs::remove_file(&marker)?;
        Ok(())
    }
}
