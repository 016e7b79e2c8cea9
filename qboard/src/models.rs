pub mod document;

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identity of a question inside its collection.
///
/// The remote store hands out string document keys, the local store
/// derives integer ids from the creation timestamp.
///
/// Ids order stamps numerically, keys by text, and every stamp before any key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QuestionId {
    Stamp(i64),
    Key(String),
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuestionId::Stamp(stamp) => write!(f, "{stamp}"),
            QuestionId::Key(key) => write!(f, "{key}"),
        }
    }
}

impl QuestionId {
    /// A remote document key, kept exactly as typed.
    pub fn remote(key: &str) -> Self {
        QuestionId::Key(key.to_string())
    }

    /// A local id. Text that is not a plain integer cannot match any local
    /// question and is kept as a key.
    pub fn local(text: &str) -> Self {
        let text = text.trim();
        match text.parse::<i64>() {
            Ok(stamp) if stamp.to_string() == text => QuestionId::Stamp(stamp),
            _ => QuestionId::Key(text.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Answer {
    pub content: String,
    pub date: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: QuestionId,
    pub title: String,
    pub content: String,
    pub detail: String,
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub answers: Vec<Answer>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub views: Option<u64>,
}

impl Question {
    pub fn answer_count(&self) -> usize {
        self.answers.len()
    }
}
