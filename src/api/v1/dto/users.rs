/*
 * Responsibility
 * - Users の request/response DTO
 * - validation (形式チェック) 用の validate() を持たせる
 */
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::repos::store::UserRow;

fn looks_like_email(s: &str) -> bool {
    // 形式チェックのみ。厳密な RFC 準拠は狙わない (存在確認はできない)。
    match s.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && domain.contains('.') && !domain.starts_with('.')
        }
        None => false,
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub firstname: String,
    pub lastname: String,
    pub username: String,
    pub email: String,
    pub password: String,
}

impl CreateUserRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.firstname.trim().is_empty() {
            return Err("firstname is required");
        }
        if self.lastname.trim().is_empty() {
            return Err("lastname is required");
        }
        if self.username.len() < 3 || self.username.len() > 50 {
            return Err("username must be 3-50 chars");
        }
        if !looks_like_email(&self.email) {
            return Err("email is not valid");
        }
        if self.password.len() < 6 {
            return Err("password must be >= 6 chars");
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub firstname: Option<String>,
    pub lastname: Option<String>,
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

impl UpdateUserRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if let Some(name) = &self.firstname
            && name.trim().is_empty()
        {
            return Err("firstname cannot be empty");
        }
        if let Some(name) = &self.lastname
            && name.trim().is_empty()
        {
            return Err("lastname cannot be empty");
        }
        if let Some(username) = &self.username
            && (username.len() < 3 || username.len() > 50)
        {
            return Err("username must be 3-50 chars");
        }
        if let Some(email) = &self.email
            && !looks_like_email(email)
        {
            return Err("email is not valid");
        }
        if let Some(password) = &self.password
            && password.len() < 6
        {
            return Err("password must be >= 6 chars");
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username_or_email: String,
    pub password: String,
}

impl LoginRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.username_or_email.trim().is_empty() {
            return Err("username_or_email is required");
        }
        if self.password.is_empty() {
            return Err("password is required");
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub token_type: &'static str,
    /// seconds until the issued token expires
    pub expires_in: u64,
    pub user_id: i64,
    pub username: String,
    pub email: String,
}

/// 公開プロフィール。password_hash は絶対に出さない。
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: i64,
    pub firstname: String,
    pub lastname: String,
    pub username: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl From<UserRow> for UserResponse {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            firstname: row.firstname,
            lastname: row.lastname,
            username: row.username,
            email: row.email,
            created_at: row.created_at,
        }
    }
}
