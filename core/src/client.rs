//! Async client for the todo API.
//!
//! # Design
//! `TodoClient` pairs a `TodoApi` (request building, response parsing) with a
//! `Transport` (the round-trip). Every operation issues exactly one request.
//! Failures of any kind are logged once, naming the operation, and the
//! original `ApiError` is handed back untouched: no retries, no fallback.

use std::fmt;

use tracing::error;

use crate::api::TodoApi;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::transport::{ReqwestTransport, Transport};
use crate::types::{NewTodo, Todo, TodoId, TodoPatch};

/// Address of the todo service when nothing else is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:3001";

/// Client operations, used to label diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    GetAllTodos,
    GetTodo,
    CreateTodo,
    UpdateTodo,
    DeleteTodo,
    ToggleTodo,
}

impl Operation {
    pub fn name(self) -> &'static str {
        match self {
            Operation::GetAllTodos => "get_all_todos",
            Operation::GetTodo => "get_todo",
            Operation::CreateTodo => "create_todo",
            Operation::UpdateTodo => "update_todo",
            Operation::DeleteTodo => "delete_todo",
            Operation::ToggleTodo => "toggle_todo",
        }
    }

    fn failure_message(self) -> &'static str {
        match self {
            Operation::GetAllTodos => "Error fetching todos",
            Operation::GetTodo => "Error fetching todo",
            Operation::CreateTodo => "Error creating todo",
            Operation::UpdateTodo => "Error updating todo",
            Operation::DeleteTodo => "Error deleting todo",
            Operation::ToggleTodo => "Error toggling todo",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Client for the remote `/todos` resource.
///
/// Cheap to clone when the transport is; `ReqwestTransport` shares its
/// connection pool between clones.
#[derive(Debug, Clone)]
pub struct TodoClient<T = ReqwestTransport> {
    api: TodoApi,
    transport: T,
}

impl TodoClient<ReqwestTransport> {
    /// Client over HTTP, bound to `base_url`.
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        Ok(Self::with_transport(base_url, ReqwestTransport::new()?))
    }
}

impl<T: Transport> TodoClient<T> {
    pub fn with_transport(base_url: &str, transport: T) -> Self {
        Self {
            api: TodoApi::new(base_url),
            transport,
        }
    }

    pub fn base_url(&self) -> &str {
        self.api.base_url()
    }

    /// `GET /todos`, in the order the server returns them.
    pub async fn get_all_todos(&self) -> Result<Vec<Todo>, ApiError> {
        let result = async {
            let response = self.send(self.api.build_list_todos()).await?;
            self.api.parse_list_todos(response)
        }
        .await;
        result.inspect_err(|err| log_failure(Operation::GetAllTodos, err))
    }

    /// `GET /todos/{id}`.
    pub async fn get_todo(&self, id: impl Into<TodoId>) -> Result<Todo, ApiError> {
        let id = id.into();
        let result = async {
            let response = self.send(self.api.build_get_todo(&id)).await?;
            self.api.parse_get_todo(response)
        }
        .await;
        result.inspect_err(|err| log_failure(Operation::GetTodo, err))
    }

    /// `POST /todos` with the caller's fields plus a timestamp `id`,
    /// `completed: false` and `createdAt`. Returns what the server stored.
    pub async fn create_todo(&self, todo: &NewTodo) -> Result<Todo, ApiError> {
        let result = async {
            let request = self.api.build_create_todo(todo)?;
            let response = self.send(request).await?;
            self.api.parse_create_todo(response)
        }
        .await;
        result.inspect_err(|err| log_failure(Operation::CreateTodo, err))
    }

    /// `PATCH /todos/{id}` with only the fields set in `updates`.
    pub async fn update_todo(
        &self,
        id: impl Into<TodoId>,
        updates: &TodoPatch,
    ) -> Result<Todo, ApiError> {
        let id = id.into();
        let result = async {
            let request = self.api.build_update_todo(&id, updates)?;
            let response = self.send(request).await?;
            self.api.parse_update_todo(response)
        }
        .await;
        result.inspect_err(|err| log_failure(Operation::UpdateTodo, err))
    }

    /// `DELETE /todos/{id}`. Returns `id` itself; the response body is not read.
    pub async fn delete_todo(&self, id: impl Into<TodoId>) -> Result<TodoId, ApiError> {
        let id = id.into();
        let result = async {
            let response = self.send(self.api.build_delete_todo(&id)).await?;
            self.api.parse_delete_todo(response)?;
            Ok::<_, ApiError>(id)
        }
        .await;
        result.inspect_err(|err| log_failure(Operation::DeleteTodo, err))
    }

    /// `PATCH /todos/{id}` with exactly `{"completed": completed}`.
    pub async fn toggle_todo(
        &self,
        id: impl Into<TodoId>,
        completed: bool,
    ) -> Result<Todo, ApiError> {
        let id = id.into();
        let result = async {
            let request = self.api.build_toggle_todo(&id, completed)?;
            let response = self.send(request).await?;
            self.api.parse_update_todo(response)
        }
        .await;
        result.inspect_err(|err| log_failure(Operation::ToggleTodo, err))
    }

    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        tracing::debug!(method = request.method.as_str(), url = %request.url, "sending request");
        self.transport.execute(request).await
    }
}

fn log_failure(operation: Operation, err: &ApiError) {
    error!(operation = operation.name(), error = %err, "{}", operation.failure_message());
}
