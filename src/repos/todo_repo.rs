/*
 * Responsibility
 * - todos テーブル向け SQLx 操作 (TodoStore の Postgres 実装)
 * - user_id の FK 前提、削除は soft delete (deleted_at)
 */
use async_trait::async_trait;
use sqlx::PgPool;

use crate::repos::error::RepoError;
use crate::repos::store::{NewTodo, TodoPatch, TodoRow, TodoStore};

#[derive(Debug, Clone)]
pub struct PgTodoStore {
    db: PgPool,
}

impl PgTodoStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl TodoStore for PgTodoStore {
    async fn find_active_by_id(&self, id: i64) -> Result<Option<TodoRow>, RepoError> {
        let row = sqlx::query_as::<_, TodoRow>(
            r#"
            SELECT id, user_id, note, description, final_date, created_at
            FROM todos
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;

        Ok(row)
    }

    async fn list_active_by_user(&self, user_id: i64) -> Result<Vec<TodoRow>, RepoError> {
        let rows = sqlx::query_as::<_, TodoRow>(
            r#"
            SELECT id, user_id, note, description, final_date, created_at
            FROM todos
            WHERE user_id = $1 AND deleted_at IS NULL
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await?;

        Ok(rows)
    }

    async fn create(&self, new: NewTodo) -> Result<TodoRow, RepoError> {
        let row = sqlx::query_as::<_, TodoRow>(
            r#"
            INSERT INTO todos (user_id, note, description, final_date)
            VALUES ($1, $2, $3, $4)
            RETURNING id, user_id, note, description, final_date, created_at
            "#,
        )
        .bind(new.user_id)
        .bind(&new.note)
        .bind(&new.description)
        .bind(new.final_date)
        .fetch_one(&self.db)
        .await?;

        Ok(row)
    }

    async fn update(&self, id: i64, patch: TodoPatch) -> Result<Option<TodoRow>, RepoError> {
        let row = sqlx::query_as::<_, TodoRow>(
            r#"
            UPDATE todos
            SET
                note = COALESCE($2, note),
                description = COALESCE($3, description),
                final_date = COALESCE($4, final_date)
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING id, user_id, note, description, final_date, created_at
            "#,
        )
        .bind(id)
        .bind(patch.note)
        .bind(patch.description)
        .bind(patch.final_date)
        .fetch_optional(&self.db)
        .await?;

        Ok(row)
    }

    async fn soft_delete(&self, id: i64) -> Result<bool, RepoError> {
        let result = sqlx::query(
            r#"
            UPDATE todos
            SET deleted_at = now()
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .execute(&self.db)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
