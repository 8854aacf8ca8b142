use crate::naming::names_eq;
use chrono::serde::ts_milliseconds;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Reserved execution mode name meaning "no mode selected".
pub const NONE_MODE: &str = "None";

/// Name given to snippets created without one.
pub const DEFAULT_NAME: &str = "Unnamed";

/// Version written into every persisted record.
pub const STORE_VERSION: u32 = 1;

pub fn is_none_mode(name: &str) -> bool {
    names_eq(name, NONE_MODE)
}

/// Current time truncated to the millisecond precision used on disk, so a
/// snippet compares equal to itself after a save/load cycle.
pub fn now_ms() -> DateTime<Utc> {
    let now = Utc::now();
    DateTime::from_timestamp_millis(now.timestamp_millis()).unwrap_or(now)
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Snippet {
    pub id: Uuid,
    #[serde(with = "ts_milliseconds")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "ts_milliseconds")]
    pub edited_at: DateTime<Utc>,
    #[serde(default)]
    pub pinned: bool,
    pub name: String,
    #[serde(default)]
    pub code: String,
    #[serde(default = "default_mode")]
    pub execution_mode: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

fn default_mode() -> String {
    NONE_MODE.to_string()
}

impl Snippet {
    pub fn new(name: String, code: String) -> Self {
        let now = now_ms();
        let name = if name.is_empty() {
            DEFAULT_NAME.to_string()
        } else {
            name
        };
        Self {
            id: Uuid::new_v4(),
            created_at: now,
            edited_at: now,
            pinned: false,
            name,
            code,
            execution_mode: default_mode(),
            category: None,
        }
    }

    pub fn with_mode(mut self, mode: impl Into<String>) -> Self {
        self.execution_mode = mode.into();
        self
    }

    pub fn with_category(mut self, category: Option<String>) -> Self {
        self.category = category.filter(|c| !c.is_empty());
        self
    }

    pub fn in_category(&self, category: &str) -> bool {
        self.category
            .as_deref()
            .is_some_and(|c| names_eq(c, category))
    }
}

/// The unsaved "new snippet" slot: code and mode the user is drafting.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DraftSnippet {
    #[serde(default)]
    pub code: String,
    #[serde(default = "default_mode")]
    pub mode: String,
}

impl Default for DraftSnippet {
    fn default() -> Self {
        Self {
            code: String::new(),
            mode: default_mode(),
        }
    }
}

/// Everything that gets persisted, as a single versioned record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoreData {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub new_snippet: DraftSnippet,
    #[serde(default)]
    pub snippets: Vec<Snippet>,
}

fn default_version() -> u32 {
    STORE_VERSION
}

impl Default for StoreData {
    fn default() -> Self {
        Self {
            version: STORE_VERSION,
            categories: Vec::new(),
            new_snippet: DraftSnippet::default(),
            snippets: Vec::new(),
        }
    }
}

/// What happens to a category's members when the category is removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryDeletePolicy {
    /// Members stay, with their category cleared.
    ClearMembers,
    /// Members are removed along with the category.
    DeleteMembers,
}
