//! Async client for a remote `todos` REST resource.
//!
//! # Overview
//! Five operations (list, create, update, delete, toggle) plus a single-item
//! fetch, each a single HTTP round-trip against a fixed base address.
//!
//! # Design
//! - `TodoApi` builds `HttpRequest` values and parses `HttpResponse` values
//!   without touching the network.
//! - `Transport` performs the round-trip; `ReqwestTransport` is the real one.
//! - `TodoClient` composes the two, logs each failure once via `tracing` and
//!   returns the original `ApiError`.
//! - The client is constructed explicitly by the application and passed to
//!   whoever needs it; there is no global instance.

pub mod api;
pub mod client;
pub mod error;
pub mod http;
pub mod transport;
pub mod types;

pub use api::TodoApi;
pub use client::{Operation, TodoClient, DEFAULT_BASE_URL};
pub use error::{ApiError, BoxError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use transport::{ReqwestTransport, Transport};
pub use types::{NewTodo, Todo, TodoId, TodoPatch};
