use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::routing::post;
use axum::{Json, Router};
use serde::Deserialize;

use crate::application::todo_service::TodoService;
use crate::domain::error::TodoError;
use crate::domain::todo::{CreateTodoRequest, DeleteTodoRequest, UpdateTodoRequest};
use crate::http::types::{Empty, TodoBody, TodoListBody};

#[derive(Clone)]
pub struct AppState<S: TodoService> {
    pub service: S,
}

/// One resource path; the verb picks the operation.
pub fn router<S: TodoService + Clone>(state: AppState<S>) -> Router {
    Router::new()
        .route(
            "/todos",
            post(create_todo::<S>)
                .get(read_todos::<S>)
                .put(update_todo::<S>)
                .delete(delete_todos::<S>),
        )
        .with_state(state)
}

async fn create_todo<S: TodoService>(
    State(state): State<AppState<S>>,
    payload: Result<Json<CreateTodoRequest>, JsonRejection>,
) -> Result<Json<TodoBody>, TodoError> {
    let Json(req) = payload.map_err(invalid_body)?;
    if req.subject.is_empty() {
        return Err(TodoError::InvalidRequest("subject must not be empty".into()));
    }
    let todo = state.service.create(req.subject, req.description).await?;
    Ok(Json(TodoBody { todo }))
}

#[derive(Debug, Deserialize)]
struct ReadTodoQuery {
    #[serde(default)]
    prev_id: i64,
    #[serde(default = "default_size")]
    size: i64,
}

fn default_size() -> i64 {
    5
}

async fn read_todos<S: TodoService>(
    State(state): State<AppState<S>>,
    query: Result<Query<ReadTodoQuery>, QueryRejection>,
) -> Result<Json<TodoListBody>, TodoError> {
    let Query(q) = query.map_err(|e| TodoError::InvalidRequest(e.to_string()))?;
    let todos = state.service.read(q.prev_id, q.size).await?;
    Ok(Json(TodoListBody { todos }))
}

async fn update_todo<S: TodoService>(
    State(state): State<AppState<S>>,
    payload: Result<Json<UpdateTodoRequest>, JsonRejection>,
) -> Result<Json<TodoBody>, TodoError> {
    let Json(req) = payload.map_err(invalid_body)?;
    if req.id == 0 || req.subject.is_empty() {
        return Err(TodoError::InvalidRequest(
            "id must be non-zero and subject must not be empty".into(),
        ));
    }
    let todo = state.service.update(req.id, req.subject, req.description).await?;
    Ok(Json(TodoBody { todo }))
}

async fn delete_todos<S: TodoService>(
    State(state): State<AppState<S>>,
    payload: Result<Json<DeleteTodoRequest>, JsonRejection>,
) -> Result<Json<Empty>, TodoError> {
    let Json(req) = payload.map_err(invalid_body)?;
    if req.ids.is_empty() {
        return Err(TodoError::InvalidRequest("ids must not be empty".into()));
    }
    state.service.delete(req.ids).await?;
    Ok(Json(Empty {}))
}

// Any undecodable body is a 400, regardless of which rejection axum raised.
fn invalid_body(e: JsonRejection) -> TodoError {
    TodoError::InvalidRequest(e.body_text())
}
