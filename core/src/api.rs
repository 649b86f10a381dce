//! Stateless HTTP request builder and response parser for the todo API.
//!
//! # Design
//! `TodoApi` holds only a `base_url` and carries no mutable state between
//! calls. Each operation is split into a `build_*` method that produces an
//! `HttpRequest` and a `parse_*` method that consumes an `HttpResponse`.
//! `TodoClient` glues the two together around a `Transport`.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::de::DeserializeOwned;
use serde::ser::Error as _;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{NewTodo, Todo, TodoId, TodoPatch};

pub const CONTENT_TYPE_JSON: (&str, &str) = ("content-type", "application/json");

/// Request builder and response parser bound to one base address.
#[derive(Debug, Clone)]
pub struct TodoApi {
    base_url: String,
}

impl TodoApi {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_list_todos(&self) -> HttpRequest {
        self.request(HttpMethod::Get, "/todos".to_string(), None)
    }

    pub fn build_get_todo(&self, id: &TodoId) -> HttpRequest {
        self.request(HttpMethod::Get, format!("/todos/{id}"), None)
    }

    /// Build the creation request stamped with the current wall clock.
    pub fn build_create_todo(&self, todo: &NewTodo) -> Result<HttpRequest, ApiError> {
        self.build_create_todo_at(todo, Utc::now())
    }

    /// Build the creation request stamped with `now`.
    ///
    /// The caller's fields are sent as-is, then `id` (epoch milliseconds),
    /// `completed: false` and `createdAt` are written over them.
    pub fn build_create_todo_at(
        &self,
        todo: &NewTodo,
        now: DateTime<Utc>,
    ) -> Result<HttpRequest, ApiError> {
        let mut fields = to_object(todo)?;
        fields.insert("id".to_string(), Value::from(timestamp_id(now)));
        fields.insert("completed".to_string(), Value::Bool(false));
        fields.insert("createdAt".to_string(), Value::from(iso_timestamp(now)));
        let body = encode(&fields)?;
        Ok(self.request(HttpMethod::Post, "/todos".to_string(), Some(body)))
    }

    /// Build the update request. Only the fields set in `updates` are sent,
    /// each key once.
    pub fn build_update_todo(&self, id: &TodoId, updates: &TodoPatch) -> Result<HttpRequest, ApiError> {
        let body = encode(&to_object(updates)?)?;
        Ok(self.request(HttpMethod::Patch, format!("/todos/{id}"), Some(body)))
    }

    /// Build the toggle request. The body carries `completed` and nothing else.
    pub fn build_toggle_todo(&self, id: &TodoId, completed: bool) -> Result<HttpRequest, ApiError> {
        self.build_update_todo(id, &TodoPatch::completed(completed))
    }

    pub fn build_delete_todo(&self, id: &TodoId) -> HttpRequest {
        self.request(HttpMethod::Delete, format!("/todos/{id}"), None)
    }

    pub fn parse_list_todos(&self, response: HttpResponse) -> Result<Vec<Todo>, ApiError> {
        decode(response)
    }

    pub fn parse_get_todo(&self, response: HttpResponse) -> Result<Todo, ApiError> {
        decode(response)
    }

    pub fn parse_create_todo(&self, response: HttpResponse) -> Result<Todo, ApiError> {
        decode(response)
    }

    pub fn parse_update_todo(&self, response: HttpResponse) -> Result<Todo, ApiError> {
        decode(response)
    }

    /// Only the status matters; whatever body the server sends is ignored.
    pub fn parse_delete_todo(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response)
    }

    fn request(&self, method: HttpMethod, path: String, body: Option<String>) -> HttpRequest {
        let (name, value) = CONTENT_TYPE_JSON;
        HttpRequest {
            method,
            url: format!("{}{path}", self.base_url),
            headers: vec![(name.to_string(), value.to_string())],
            body,
        }
    }
}

/// Milliseconds since the Unix epoch.
pub fn timestamp_id(now: DateTime<Utc>) -> u64 {
    now.timestamp_millis().max(0) as u64
}

/// `YYYY-MM-DDTHH:MM:SS.sssZ`, the shape JavaScript's `toISOString` emits.
pub fn iso_timestamp(now: DateTime<Utc>) -> String {
    now.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Serialize through a `Map` so a flattened key that repeats a named field
/// ends up once, with the later (flattened) value.
fn to_object<T: Serialize>(payload: &T) -> Result<Map<String, Value>, ApiError> {
    match serde_json::to_value(payload).map_err(ApiError::SerializationError)? {
        Value::Object(fields) => Ok(fields),
        other => Err(ApiError::SerializationError(serde_json::Error::custom(
            format_args!("expected a JSON object, got {other}"),
        ))),
    }
}

fn encode<T: Serialize>(payload: &T) -> Result<String, ApiError> {
    serde_json::to_string(payload).map_err(ApiError::SerializationError)
}

fn decode<T: DeserializeOwned>(response: HttpResponse) -> Result<T, ApiError> {
    check_status(&response)?;
    serde_json::from_str(&response.body).map_err(ApiError::DeserializationError)
}

/// Map non-success status codes to the appropriate `ApiError` variant.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    if response.status == 404 {
        return Err(ApiError::NotFound);
    }
    Err(ApiError::HttpError {
        status: response.status,
        body: response.body.clone(),
    })
}
