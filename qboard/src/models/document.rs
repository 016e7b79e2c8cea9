use serde::{Deserialize, Serialize};

/// A document as the remote collection returns it.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Document {
    pub id: String,
    #[serde(default)]
    pub fields: serde_json::Value,
}

#[derive(Debug, Deserialize)]
pub struct InsertResponse {
    pub id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Ascending => "asc",
            Direction::Descending => "desc",
        }
    }
}
