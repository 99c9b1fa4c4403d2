//!
//! # Document Storage
//!
//! All persisted state lives in a single JSON document: every user, every
//! user's task list, and the id counters. The document is the unit of
//! persistence — it is read wholly and written wholly on every mutating
//! request, with no partial updates.
//!
//! The backend is injectable through the [`DocumentStore`] trait so tests can
//! substitute an in-memory fake for the production file store. The [`Store`]
//! wrapper owns the backend plus a mutex that serializes each
//! load-mutate-save cycle, so two concurrent writers cannot overwrite each
//! other's changes.

pub mod file;
pub mod memory;

pub use file::JsonFileStore;
pub use memory::MemoryStore;

use std::collections::BTreeMap;
use std::sync::{Mutex, PoisonError};

use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::models::{Task, User};

/// Version stamped into freshly seeded documents and reported by `/health`.
pub const DOCUMENT_VERSION: &str = "3.0.0";

/// Counters kept alongside the data they govern.
///
/// Invariant: for every user id present in the task map, `next_id` holds an
/// integer strictly greater than every task id under that user. Counters only
/// ever increment, so deleted ids are never handed out again.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Metadata {
    /// Per-user next task id.
    #[serde(rename = "nextId")]
    pub next_id: BTreeMap<String, u32>,
    /// Next user id to assign. Documents written before this counter existed
    /// are reconciled on load.
    #[serde(rename = "nextUserId", default = "first_id")]
    pub next_user_id: u64,
}

fn first_id() -> u64 {
    1
}

/// The whole persisted state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub version: String,
    pub users: Vec<User>,
    /// Task lists keyed by owning user id, each in insertion order.
    pub tasks: BTreeMap<String, Vec<Task>>,
    pub metadata: Metadata,
}

impl Default for Document {
    fn default() -> Self {
        Self {
            version: DOCUMENT_VERSION.to_string(),
            users: Vec::new(),
            tasks: BTreeMap::new(),
            metadata: Metadata {
                next_id: BTreeMap::new(),
                next_user_id: 1,
            },
        }
    }
}

impl Document {
    /// First user with the given email, matched exactly and case-sensitively.
    pub fn find_user_by_email(&self, email: &str) -> Option<&User> {
        self.users.iter().find(|user| user.email == email)
    }

    /// Hands out the next user id and advances the persisted counter.
    pub fn allocate_user_id(&mut self) -> String {
        let id = self.metadata.next_user_id;
        self.metadata.next_user_id += 1;
        id.to_string()
    }

    /// The user's tasks in stored order; empty if the user has none yet.
    pub fn tasks_for(&self, user_id: &str) -> &[Task] {
        self.tasks.get(user_id).map(Vec::as_slice).unwrap_or_default()
    }

    /// Mutable access to the user's task list, lazily initializing the list
    /// and its id counter on first use.
    pub fn user_tasks_mut(&mut self, user_id: &str) -> &mut Vec<Task> {
        self.metadata.next_id.entry(user_id.to_string()).or_insert(1);
        self.tasks.entry(user_id.to_string()).or_default()
    }

    /// Hands out the user's next task id and advances the counter.
    pub fn allocate_task_id(&mut self, user_id: &str) -> u32 {
        let next = self.metadata.next_id.entry(user_id.to_string()).or_insert(1);
        let id = *next;
        *next += 1;
        id
    }

    /// Brings the user-id counter in line with documents written before the
    /// counter existed, where ids were derived from the user count.
    pub fn reconcile_user_counter(&mut self) {
        let floor = self.users.len() as u64 + 1;
        if self.metadata.next_user_id < floor {
            self.metadata.next_user_id = floor;
        }
    }
}

/// Persistence backend for the document.
pub trait DocumentStore: Send + Sync {
    /// Reads the persisted document, seeding an empty one first if none
    /// exists yet.
    fn load(&self) -> Result<Document, AppError>;

    /// Replaces the persisted document wholly.
    fn save(&self, doc: &Document) -> Result<(), AppError>;

    /// Verifies the storage location is usable. Only the health check calls
    /// this.
    fn probe(&self) -> Result<(), AppError>;
}

/// Backend plus the mutex that makes each load-mutate-save cycle atomic with
/// respect to other writers.
pub struct Store {
    backend: Box<dyn DocumentStore>,
    write_lock: Mutex<()>,
}

impl Store {
    pub fn new(backend: impl DocumentStore + 'static) -> Self {
        Self {
            backend: Box::new(backend),
            write_lock: Mutex::new(()),
        }
    }

    /// Loads the current document for read-only use.
    pub fn read(&self) -> Result<Document, AppError> {
        self.backend.load()
    }

    /// Runs `mutate` over the freshly loaded document and persists the result,
    /// holding the write lock for the whole cycle. Nothing is written when
    /// `mutate` fails.
    pub fn update<T>(
        &self,
        mutate: impl FnOnce(&mut Document) -> Result<T, AppError>,
    ) -> Result<T, AppError> {
        let _guard = self
            .write_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let mut doc = self.backend.load()?;
        let out = mutate(&mut doc)?;
        self.backend.save(&doc)?;
        Ok(out)
    }

    pub fn probe(&self) -> Result<(), AppError> {
        self.backend.probe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TaskCreate;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    fn create_input(description: &str) -> TaskCreate {
        serde_json::from_value(serde_json::json!({ "description": description })).unwrap()
    }

    #[test]
    fn test_seeded_document_shape() {
        let doc = Document::default();
        assert_eq!(doc.version, DOCUMENT_VERSION);
        assert!(doc.users.is_empty());
        assert!(doc.tasks.is_empty());
        assert_eq!(doc.metadata.next_user_id, 1);
    }

    #[test]
    fn test_user_ids_are_sequential() {
        let mut doc = Document::default();
        assert_eq!(doc.allocate_user_id(), "1");
        assert_eq!(doc.allocate_user_id(), "2");
        assert_eq!(doc.metadata.next_user_id, 3);
    }

    #[test]
    fn test_task_ids_never_reused_after_delete() {
        let mut doc = Document::default();
        for description in ["one", "two", "three"] {
            let id = doc.allocate_task_id("1");
            let task = Task::new(id, create_input(description));
            doc.user_tasks_mut("1").push(task);
        }
        let ids: Vec<u32> = doc.tasks_for("1").iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);

        // Delete the middle task, then create another: id 2 must not come back.
        doc.user_tasks_mut("1").retain(|t| t.id != 2);
        let id = doc.allocate_task_id("1");
        assert_eq!(id, 4);

        // The counter stays strictly greater than every stored id.
        let max_id = doc.tasks_for("1").iter().map(|t| t.id).max().unwrap();
        assert!(doc.metadata.next_id["1"] > max_id);
    }

    #[test]
    fn test_tasks_for_unknown_user_is_empty() {
        let doc = Document::default();
        assert!(doc.tasks_for("42").is_empty());
    }

    #[test]
    fn test_lazy_counter_initialization() {
        let mut doc = Document::default();
        doc.user_tasks_mut("7");
        assert_eq!(doc.metadata.next_id.get("7"), Some(&1));
        assert!(doc.tasks_for("7").is_empty());
    }

    #[test]
    fn test_reconcile_user_counter_for_legacy_documents() {
        let mut doc = Document::default();
        doc.users.push(User::new(
            "1".to_string(),
            "a@example.com".to_string(),
            "hash".to_string(),
        ));
        doc.users.push(User::new(
            "2".to_string(),
            "b@example.com".to_string(),
            "hash".to_string(),
        ));
        doc.metadata.next_user_id = 1; // as deserialized from a legacy file
        doc.reconcile_user_counter();
        assert_eq!(doc.metadata.next_user_id, 3);
        assert_eq!(doc.allocate_user_id(), "3");
    }

    #[test]
    fn test_update_is_not_persisted_on_error() {
        let store = Store::new(MemoryStore::new());
        let result: Result<(), AppError> = store.update(|doc| {
            doc.allocate_task_id("1");
            Err(AppError::NotFound("Task not found".into()))
        });
        assert!(result.is_err());

        let doc = store.read().unwrap();
        assert!(doc.metadata.next_id.is_empty(), "failed update must not save");
    }

    #[test]
    fn test_concurrent_creations_preserve_both_ids() {
        let store = Arc::new(Store::new(MemoryStore::new()));

        let handles: Vec<_> = (0..2)
            .map(|n| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || {
                    store
                        .update(|doc| {
                            let id = doc.allocate_task_id("1");
                            let task = Task::new(id, create_input(&format!("task {}", n)));
                            doc.user_tasks_mut("1").push(task);
                            Ok(id)
                        })
                        .unwrap()
                })
            })
            .collect();

        let mut ids: Vec<u32> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        ids.sort_unstable();
        assert_eq!(ids, vec![1, 2]);

        // Both writes survived: the serialized critical section rules out the
        // lost-update overwrite.
        let doc = store.read().unwrap();
        assert_eq!(doc.tasks_for("1").len(), 2);
    }

    #[test]
    fn test_document_round_trips_through_json() {
        let mut doc = Document::default();
        let user_id = doc.allocate_user_id();
        doc.users.push(User::new(
            user_id.clone(),
            "round@example.com".to_string(),
            "hash".to_string(),
        ));
        let id = doc.allocate_task_id(&user_id);
        let task = Task::new(id, create_input("persist me"));
        doc.user_tasks_mut(&user_id).push(task);

        let json = serde_json::to_string(&doc).unwrap();
        assert!(json.contains("\"nextId\""));
        assert!(json.contains("\"nextUserId\""));

        let restored: Document = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.users.len(), 1);
        assert_eq!(restored.tasks_for(&user_id).len(), 1);
        assert_eq!(restored.metadata.next_user_id, doc.metadata.next_user_id);
    }
}
