//! Domain DTOs for the todo API.
//!
//! # Design
//! The server owns the schema; the client only names the fields it touches.
//! Everything else travels in a flattened `extra` map so a decoded `Todo`
//! still carries every field the server sent, and caller-supplied fields on
//! `NewTodo` / `TodoPatch` reach the wire untouched. Named fields are lenient
//! on decode: a `null` or missing value never fails the whole response.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Identifier of a todo.
///
/// Ids minted by this client are epoch milliseconds, so two creations in the
/// same millisecond collide. Servers may hand back string ids for records
/// created elsewhere; those are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TodoId {
    Number(u64),
    Text(String),
}

impl TodoId {
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            TodoId::Number(n) => Some(*n),
            TodoId::Text(_) => None,
        }
    }
}

impl From<u64> for TodoId {
    fn from(id: u64) -> Self {
        TodoId::Number(id)
    }
}

impl From<String> for TodoId {
    fn from(id: String) -> Self {
        TodoId::Text(id)
    }
}

impl From<&str> for TodoId {
    fn from(id: &str) -> Self {
        TodoId::Text(id.to_string())
    }
}

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TodoId::Number(n) => write!(f, "{n}"),
            TodoId::Text(s) => f.write_str(s),
        }
    }
}

/// Digits parse as a numeric id, anything else is kept as text.
impl FromStr for TodoId {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(s.parse::<u64>()
            .map(TodoId::Number)
            .unwrap_or_else(|_| TodoId::Text(s.to_string())))
    }
}

/// A single todo item returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Todo {
    pub id: TodoId,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "null_as_false")]
    pub completed: bool,
    /// ISO-8601 creation timestamp, kept as the server's text.
    #[serde(
        rename = "createdAt",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn null_as_false<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or(false))
}

/// Caller-supplied fields for a new todo. `id`, `completed` and `createdAt`
/// are injected by the client and override anything set here.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct NewTodo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl NewTodo {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            extra: Map::new(),
        }
    }

    /// Attach an arbitrary extra field to the payload.
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }
}

/// Partial update payload. Only the fields present are sent; omitted fields
/// remain unchanged on the server. An `extra` entry named like a typed field
/// replaces it on the wire.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TodoPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TodoPatch {
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    pub fn completed(completed: bool) -> Self {
        Self {
            completed: Some(completed),
            ..Self::default()
        }
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.completed.is_none() && self.extra.is_empty()
    }
}
