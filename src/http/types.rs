use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::domain::{error::TodoError, todo::Todo};

// Response bodies with fixed fields, one per endpoint shape.

#[derive(Debug, Serialize)]
pub struct TodoBody {
    pub todo: Todo,
}

#[derive(Debug, Serialize)]
pub struct TodoListBody {
    pub todos: Vec<Todo>,
}

/// Serializes to `{}`.
#[derive(Debug, Serialize)]
pub struct Empty {}

impl IntoResponse for TodoError {
    fn into_response(self) -> Response {
        let status = match self {
            TodoError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            TodoError::NotFound => StatusCode::NOT_FOUND,
            TodoError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        // Plain-text error body, status line carries the semantics.
        (status, self.to_string()).into_response()
    }
}
