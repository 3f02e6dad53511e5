use async_trait::async_trait;

use crate::domain::{error::TodoError, todo::Todo};

/// The four TODO operations the HTTP layer depends on. Implementations own
/// the persistence mapping; handlers own request validation.
#[async_trait]
pub trait TodoService: Send + Sync + 'static {
    /// Inserts a row and returns it as the store persisted it.
    async fn create(&self, subject: String, description: String) -> Result<Todo, TodoError>;
    /// Returns up to `size` rows newest-first; with a non-zero `prev_id`,
    /// only rows strictly older than it (keyset pagination).
    async fn read(&self, prev_id: i64, size: i64) -> Result<Vec<Todo>, TodoError>;
    /// Rewrites subject/description of one row, or `NotFound`.
    async fn update(&self, id: i64, subject: String, description: String)
        -> Result<Todo, TodoError>;
    /// Deletes all rows in `ids`; `NotFound` when none existed. An empty
    /// `ids` is a no-op success.
    async fn delete(&self, ids: Vec<i64>) -> Result<(), TodoError>;
}
