use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A free-form timestamped note entered by the user.
///
/// The timestamp is fixed at creation; only the content may change, via
/// [`crate::store::EntryStore::update_thought`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Thought {
    pub id: Uuid,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl Thought {
    pub fn new(content: String, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            content,
            timestamp: now,
        }
    }
}

/// A structured, completable to-do item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: Uuid,

    pub title: String,

    #[serde(default)]
    pub description: Option<String>,

    pub is_completed: bool,

    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,

    pub created_at: DateTime<Utc>,

    /// The thought this task was extracted from, when there was one.
    #[serde(default)]
    pub thought_id: Option<Uuid>,
}

impl Task {
    pub fn new(title: String, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title,
            description: None,
            is_completed: false,
            due_date: None,
            created_at: now,
            thought_id: None,
        }
    }
}
