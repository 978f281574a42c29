/*
 * Responsibility
 * - users テーブル向け SQLx 操作 (UserStore の Postgres 実装)
 * - 全ての SELECT は deleted_at IS NULL で絞る (soft delete)
 * - DB エラーは RepoError に変換して返す
 */
use async_trait::async_trait;
use sqlx::PgPool;

use crate::repos::error::RepoError;
use crate::repos::store::{NewUser, UserPatch, UserRow, UserStore};

#[derive(Debug, Clone)]
pub struct PgUserStore {
    db: PgPool,
}

impl PgUserStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_active_by_id(&self, id: i64) -> Result<Option<UserRow>, RepoError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, firstname, lastname, username, email, password_hash, created_at
            FROM users
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;

        Ok(row)
    }

    async fn find_active_by_username(&self, username: &str) -> Result<Option<UserRow>, RepoError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, firstname, lastname, username, email, password_hash, created_at
            FROM users
            WHERE username = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(username)
        .fetch_optional(&self.db)
        .await?;

        Ok(row)
    }

    async fn find_active_by_email(&self, email: &str) -> Result<Option<UserRow>, RepoError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, firstname, lastname, username, email, password_hash, created_at
            FROM users
            WHERE email = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(email)
        .fetch_optional(&self.db)
        .await?;

        Ok(row)
    }

    async fn find_active_by_username_or_email(
        &self,
        username_or_email: &str,
    ) -> Result<Option<UserRow>, RepoError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, firstname, lastname, username, email, password_hash, created_at
            FROM users
            WHERE (username = $1 OR email = $1) AND deleted_at IS NULL
            "#,
        )
        .bind(username_or_email)
        .fetch_optional(&self.db)
        .await?;

        Ok(row)
    }

    async fn list_active(&self) -> Result<Vec<UserRow>, RepoError> {
        let rows = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, firstname, lastname, username, email, password_hash, created_at
            FROM users
            WHERE deleted_at IS NULL
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(rows)
    }

    async fn create(&self, new: NewUser) -> Result<UserRow, RepoError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (firstname, lastname, username, email, password_hash)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, firstname, lastname, username, email, password_hash, created_at
            "#,
        )
        .bind(&new.firstname)
        .bind(&new.lastname)
        .bind(&new.username)
        .bind(&new.email)
        .bind(&new.password_hash)
        .fetch_one(&self.db)
        .await?;

        Ok(row)
    }

    async fn update(&self, id: i64, patch: UserPatch) -> Result<Option<UserRow>, RepoError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            UPDATE users
            SET
                firstname = COALESCE($2, firstname),
                lastname = COALESCE($3, lastname),
                username = COALESCE($4, username),
                email = COALESCE($5, email),
                password_hash = COALESCE($6, password_hash)
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING id, firstname, lastname, username, email, password_hash, created_at
            "#,
        )
        .bind(id)
        .bind(patch.firstname)
        .bind(patch.lastname)
        .bind(patch.username)
        .bind(patch.email)
        .bind(patch.password_hash)
        .fetch_optional(&self.db)
        .await?;

        Ok(row)
    }

    async fn soft_delete(&self, id: i64) -> Result<bool, RepoError> {
        let result = sqlx::query(
            r#"
            UPDATE users
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
