//! Store contracts the security core depends on.
//!
//! Both stores are external collaborators as far as auth is concerned: the
//! middleware and the ownership guard only ever call the `find_active_*`
//! lookups. "Active" always means `deleted_at IS NULL` — a soft-deleted row
//! does not exist for any operation defined here.
//!
//! Production implementations live in `user_repo` / `todo_repo` (Postgres);
//! tests substitute in-memory ones.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::repos::error::RepoError;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserRow {
    pub id: i64,
    pub firstname: String,
    pub lastname: String,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub firstname: String,
    pub lastname: String,
    pub username: String,
    pub email: String,
    pub password_hash: String,
}

/// Partial update; None ≙ leave the column as is.
#[derive(Debug, Clone, Default)]
pub struct UserPatch {
    pub firstname: Option<String>,
    pub lastname: Option<String>,
    pub username: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_active_by_id(&self, id: i64) -> Result<Option<UserRow>, RepoError>;
    async fn find_active_by_username(&self, username: &str) -> Result<Option<UserRow>, RepoError>;
    async fn find_active_by_email(&self, email: &str) -> Result<Option<UserRow>, RepoError>;
    async fn find_active_by_username_or_email(
        &self,
        username_or_email: &str,
    ) -> Result<Option<UserRow>, RepoError>;
    async fn list_active(&self) -> Result<Vec<UserRow>, RepoError>;
    async fn create(&self, new: NewUser) -> Result<UserRow, RepoError>;
    async fn update(&self, id: i64, patch: UserPatch) -> Result<Option<UserRow>, RepoError>;
    /// Soft delete. Returns false when no active row matched.
    async fn soft_delete(&self, id: i64) -> Result<bool, RepoError>;
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TodoRow {
    pub id: i64,
    pub user_id: i64,
    pub note: String,
    pub description: Option<String>,
    pub final_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewTodo {
    pub user_id: i64,
    pub note: String,
    pub description: Option<String>,
    pub final_date: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct TodoPatch {
    pub note: Option<String>,
    pub description: Option<String>,
    pub final_date: Option<DateTime<Utc>>,
}

#[async_trait]
pub trait TodoStore: Send + Sync {
    async fn find_active_by_id(&self, id: i64) -> Result<Option<TodoRow>, RepoError>;
    async fn list_active_by_user(&self, user_id: i64) -> Result<Vec<TodoRow>, RepoError>;
    async fn create(&self, new: NewTodo) -> Result<TodoRow, RepoError>;
    async fn update(&self, id: i64, patch: TodoPatch) -> Result<Option<TodoRow>, RepoError>;
    /// Soft delete. Returns false when no active row matched.
    async fn soft_delete(&self, id: i64) -> Result<bool, RepoError>;
}
