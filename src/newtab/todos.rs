//! # Todo List
//!
//! A short checklist shown next to the bookmarks. Todos live under the
//! `todos` store key and travel in backups with everything else.
//!
//! Stored lists get the same treatment as bookmarks: entries that cannot be
//! read are dropped, missing ids are generated, and a repeated id keeps only
//! its first entry. Legacy numeric ids are kept as their decimal text.

use crate::error::NewtabError;
use crate::model::id_text;
use chrono::{SecondsFormat, Utc};
use log::debug;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct TodoId(String);

impl TodoId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn short(&self) -> &str {
        match self.0.char_indices().nth(8) {
            Some((idx, _)) => &self.0[..idx],
            None => &self.0,
        }
    }
}

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TodoId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl<'de> Deserialize<'de> for TodoId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        id_text(deserializer).map(TodoId)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: TodoId,
    pub text: String,
    pub completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl Todo {
    /// An open todo stamped with the current time.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: TodoId::generate(),
            text: text.into(),
            completed: false,
            created_at: Some(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)),
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TodoDraft {
    #[serde(default)]
    id: Option<TodoId>,
    text: String,
    #[serde(default)]
    completed: bool,
    #[serde(default)]
    created_at: Option<String>,
}

/// Which todos a listing shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TodoFilter {
    #[default]
    All,
    Active,
    Completed,
}

impl TodoFilter {
    pub fn matches(&self, todo: &Todo) -> bool {
        match self {
            TodoFilter::All => true,
            TodoFilter::Active => !todo.completed,
            TodoFilter::Completed => todo.completed,
        }
    }
}

impl FromStr for TodoFilter {
    type Err = NewtabError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(TodoFilter::All),
            "active" => Ok(TodoFilter::Active),
            "completed" | "done" => Ok(TodoFilter::Completed),
            other => Err(NewtabError::Contract(format!("Unknown todo filter: {}", other))),
        }
    }
}

/// Reads a stored or imported list. Returns the todos and how many entries
/// were unreadable.
pub fn restore_todos(values: &[Value]) -> (Vec<Todo>, usize) {
    let mut seen: HashSet<TodoId> = HashSet::new();
    let mut malformed = 0;
    let mut out = Vec::with_capacity(values.len());

    for value in values {
        let draft = match serde_json::from_value::<TodoDraft>(value.clone()) {
            Ok(draft) => draft,
            Err(e) => {
                debug!("skipping malformed todo entry: {}", e);
                malformed += 1;
                continue;
            }
        };
        let id = match draft.id {
            Some(id) if !id.as_str().trim().is_empty() => id,
            _ => TodoId::generate(),
        };
        if !seen.insert(id.clone()) {
            debug!("dropping todo with duplicate id {}", id);
            continue;
        }
        out.push(Todo {
            id,
            text: draft.text,
            completed: draft.completed,
            created_at: draft.created_at,
        });
    }

    (out, malformed)
}
