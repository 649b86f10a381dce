//! In-memory stand-in for the remote todo service.
//!
//! Mirrors json-server's `/todos` resource: bodies are stored exactly as
//! posted, in insertion order. Ids may be numbers or strings and are matched
//! against the path segment by their text form. PATCH merges shallowly and
//! DELETE answers `{}`.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde_json::{json, Map, Value};
use tokio::{net::TcpListener, sync::RwLock};

/// Todos in insertion order, stored exactly as clients sent them.
pub type Db = Arc<RwLock<Vec<Map<String, Value>>>>;

pub fn app() -> Router {
    app_with(Db::default())
}

/// Router over an existing store, so tests can seed or inspect it.
pub fn app_with(db: Db) -> Router {
    Router::new()
        .route("/todos", get(list_todos).post(create_todo))
        .route(
            "/todos/{id}",
            get(get_todo).patch(update_todo).delete(delete_todo),
        )
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

fn id_of(todo: &Map<String, Value>) -> Option<u64> {
    todo.get("id").and_then(Value::as_u64)
}

/// Text form of a stored id, as it would appear in a URL path.
fn id_text(todo: &Map<String, Value>) -> Option<String> {
    match todo.get("id")? {
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) => Some(s.clone()),
        _ => None,
    }
}

fn has_id(todo: &Map<String, Value>, id: &str) -> bool {
    id_text(todo).as_deref() == Some(id)
}

async fn list_todos(State(db): State<Db>) -> Json<Vec<Map<String, Value>>> {
    Json(db.read().await.clone())
}

async fn create_todo(
    State(db): State<Db>,
    Json(input): Json<Value>,
) -> Result<(StatusCode, Json<Map<String, Value>>), StatusCode> {
    let Value::Object(mut todo) = input else {
        return Err(StatusCode::UNPROCESSABLE_ENTITY);
    };
    let mut todos = db.write().await;
    let id = match id_text(&todo) {
        Some(id) => id,
        None => {
            let next = todos.iter().filter_map(id_of).max().unwrap_or(0) + 1;
            todo.insert("id".to_string(), Value::from(next));
            next.to_string()
        }
    };
    if todos.iter().any(|t| has_id(t, &id)) {
        tracing::warn!(%id, "duplicate todo id");
        return Err(StatusCode::CONFLICT);
    }
    todos.push(todo.clone());
    tracing::debug!(%id, "todo created");
    Ok((StatusCode::CREATED, Json(todo)))
}

async fn get_todo(
    State(db): State<Db>,
    Path(id): Path<String>,
) -> Result<Json<Map<String, Value>>, StatusCode> {
    let todos = db.read().await;
    todos
        .iter()
        .find(|t| has_id(t, &id))
        .cloned()
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

async fn update_todo(
    State(db): State<Db>,
    Path(id): Path<String>,
    Json(input): Json<Value>,
) -> Result<Json<Map<String, Value>>, StatusCode> {
    let Value::Object(changes) = input else {
        return Err(StatusCode::UNPROCESSABLE_ENTITY);
    };
    let mut todos = db.write().await;
    let todo = todos
        .iter_mut()
        .find(|t| has_id(t, &id))
        .ok_or(StatusCode::NOT_FOUND)?;
    for (key, value) in changes {
        if key != "id" {
            todo.insert(key, value);
        }
    }
    Ok(Json(todo.clone()))
}

async fn delete_todo(
    State(db): State<Db>,
    Path(id): Path<String>,
) -> Result<Json<Value>, StatusCode> {
    let mut todos = db.write().await;
    let index = todos
        .iter()
        .position(|t| has_id(t, &id))
        .ok_or(StatusCode::NOT_FOUND)?;
    todos.remove(index);
    Ok(Json(json!({})))
}
