use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A registered account as stored in the persisted document.
///
/// Users are append-only: there is no update or delete path, and the
/// `password_hash` never leaves the document (auth responses carry only the
/// token and id).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Sequential, stringified integer id allocated from the document's
    /// persisted counter.
    pub id: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(id: String, email: String, password_hash: String) -> Self {
        Self {
            id,
            email,
            password_hash,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_creation() {
        let user = User::new(
            "1".to_string(),
            "test@example.com".to_string(),
            "$2b$12$hash".to_string(),
        );
        assert_eq!(user.id, "1");
        assert_eq!(user.email, "test@example.com");
        assert!(user.created_at <= Utc::now());
    }
}
