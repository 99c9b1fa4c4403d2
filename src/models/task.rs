use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

/// Priority assigned when a creation request omits one.
pub const DEFAULT_PRIORITY: &str = "normal";

/// Represents a to-do item as stored in the document and returned by the API.
///
/// Task ids are unique per owning user, not globally; they come from the
/// per-user counter in the document metadata and are never reused, even
/// after deletion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: u32,
    pub description: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    /// Free-form label; the chat assistant uses "low", "normal", "high"
    /// and "critical" but the API does not restrict the vocabulary.
    pub priority: String,
    pub tags: Vec<String>,
    pub due_date: Option<DateTime<Utc>>,
}

/// Input structure for creating a task.
#[derive(Debug, Deserialize, Validate)]
pub struct TaskCreate {
    /// Must be between 1 and 500 characters.
    #[validate(length(min = 1, max = 500))]
    pub description: String,

    #[validate(length(max = 50))]
    #[serde(default = "default_priority")]
    pub priority: String,

    #[serde(default)]
    pub tags: Vec<String>,

    pub due_date: Option<DateTime<Utc>>,
}

fn default_priority() -> String {
    DEFAULT_PRIORITY.to_string()
}

/// Partial update for a task. Only fields present in the request body are
/// applied; everything else keeps its stored value.
///
/// `due_date` is nullable, so its wrapper is doubled: an absent field
/// deserializes to `None` (leave unchanged) while an explicit `null`
/// deserializes to `Some(None)` (clear the date).
#[derive(Debug, Default, Deserialize, Validate)]
pub struct TaskPatch {
    #[validate(length(min = 1, max = 500))]
    pub description: Option<String>,

    pub completed: Option<bool>,

    #[validate(length(max = 50))]
    pub priority: Option<String>,

    pub tags: Option<Vec<String>>,

    #[serde(default, deserialize_with = "double_option")]
    pub due_date: Option<Option<DateTime<Utc>>>,
}

fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl Task {
    /// Creates a new `Task` from a creation request and a freshly allocated id.
    /// New tasks start uncompleted with the current timestamp.
    pub fn new(id: u32, input: TaskCreate) -> Self {
        Self {
            id,
            description: input.description,
            completed: false,
            created_at: Utc::now(),
            priority: input.priority,
            tags: input.tags,
            due_date: input.due_date,
        }
    }

    /// Merges a partial update into the task, touching only the fields the
    /// request actually carried.
    pub fn apply(&mut self, patch: TaskPatch) {
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(completed) = patch.completed {
            self.completed = completed;
        }
        if let Some(priority) = patch.priority {
            self.priority = priority;
        }
        if let Some(tags) = patch.tags {
            self.tags = tags;
        }
        if let Some(due_date) = patch.due_date {
            self.due_date = due_date;
        }
    }
}
