use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{sqlite::{SqlitePoolOptions, SqliteRow}, Pool, Row, Sqlite};

use crate::application::todo_service::TodoService;
use crate::domain::{error::TodoError, todo::Todo};

#[derive(Clone)]
pub struct SqliteTodoService {
    pool: Arc<Pool<Sqlite>>,
}

impl SqliteTodoService {
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await?;
        Ok(Self { pool: Arc::new(pool) })
    }

    pub async fn init(&self) -> Result<()> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS todos (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                subject TEXT NOT NULL,
                description TEXT NOT NULL DEFAULT '',
                created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
                updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
            )",
        )
        .execute(&*self.pool)
        .await?;
        Ok(())
    }

    /// Re-read after a write so timestamps come from the store, not from
    /// whatever clock this process has.
    async fn confirm(&self, id: i64) -> Result<Option<Todo>, TodoError> {
        let row = sqlx::query(
            "SELECT id, subject, description, created_at, updated_at FROM todos WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&*self.pool)
        .await?;
        row.map(row_to_todo).transpose()
    }
}

#[async_trait]
impl TodoService for SqliteTodoService {
    async fn create(&self, subject: String, description: String) -> Result<Todo, TodoError> {
        let result = sqlx::query("INSERT INTO todos (subject, description) VALUES (?1, ?2)")
            .bind(&subject)
            .bind(&description)
            .execute(&*self.pool)
            .await?;
        let id = result.last_insert_rowid();
        self.confirm(id)
            .await?
            .ok_or_else(|| TodoError::Storage(anyhow::anyhow!("inserted row {id} vanished")))
    }

    async fn read(&self, prev_id: i64, size: i64) -> Result<Vec<Todo>, TodoError> {
        let rows = if prev_id == 0 {
            sqlx::query(
                "SELECT id, subject, description, created_at, updated_at FROM todos
                 ORDER BY id DESC LIMIT ?1",
            )
            .bind(size)
            .fetch_all(&*self.pool)
            .await?
        } else {
            sqlx::query(
                "SELECT id, subject, description, created_at, updated_at FROM todos
                 WHERE id < ?1 ORDER BY id DESC LIMIT ?2",
            )
            .bind(prev_id)
            .bind(size)
            .fetch_all(&*self.pool)
            .await?
        };
        rows.into_iter().map(row_to_todo).collect()
    }

    async fn update(&self, id: i64, subject: String, description: String)
        -> Result<Todo, TodoError>
    {
        let result = sqlx::query(
            "UPDATE todos SET subject = ?1, description = ?2, updated_at = CURRENT_TIMESTAMP
             WHERE id = ?3",
        )
        .bind(&subject)
        .bind(&description)
        .bind(id)
        .execute(&*self.pool)
        .await?;
        if result.rows_affected() == 0 {
            return Err(TodoError::NotFound);
        }
        self.confirm(id).await?.ok_or(TodoError::NotFound)
    }

    async fn delete(&self, ids: Vec<i64>) -> Result<(), TodoError> {
        if ids.is_empty() {
            return Ok(());
        }
        // One statement for the whole set; SQLite has no array bind, so the
        // placeholder list is built per call.
        let placeholders = vec!["?"; ids.len()].join(", ");
        let sql = format!("DELETE FROM todos WHERE id IN ({placeholders})");
        let mut query = sqlx::query(&sql);
        for id in &ids {
            query = query.bind(*id);
        }
        let result = query.execute(&*self.pool).await?;
        if result.rows_affected() == 0 {
            return Err(TodoError::NotFound);
        }
        Ok(())
    }
}

fn row_to_todo(row: SqliteRow) -> Result<Todo, TodoError> {
    Ok(Todo {
        id: row.try_get("id")?,
        subject: row.try_get("subject")?,
        description: row.try_get("description")?,
        created_at: row.try_get::<DateTime<Utc>, _>("created_at")?,
        updated_at: row.try_get::<DateTime<Utc>, _>("updated_at")?,
    })
}
