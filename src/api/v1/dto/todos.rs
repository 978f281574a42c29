/*
 * Responsibility
 * - Todos の request/response DTO
 */
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::repos::store::TodoRow;

#[derive(Debug, Deserialize)]
pub struct CreateTodoRequest {
    pub note: String,
    pub description: Option<String>,
    pub final_date: DateTime<Utc>,
}

impl CreateTodoRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.note.trim().is_empty() {
            return Err("note is required");
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateTodoRequest {
    pub note: Option<String>,
    pub description: Option<String>,
    pub final_date: Option<DateTime<Utc>>,
}

impl UpdateTodoRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if let Some(note) = &self.note
            && note.trim().is_empty()
        {
            return Err("note cannot be empty");
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub struct TodoResponse {
    pub id: i64,
    pub user_id: i64,
    pub note: String,
    pub description: Option<String>,
    pub final_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl From<TodoRow> for TodoResponse {
    fn from(row: TodoRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            note: row.note,
            description: row.description,
            final_date: row.final_date,
            created_at: row.created_at,
        }
    }
}
