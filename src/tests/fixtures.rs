//! Test fixtures: in-memory `UserStore`/`TodoStore` implementations plus a
//! router builder mirroring the production wiring (auth middleware + v1
//! routes), so the scenarios drive exactly the code paths production runs —
//! minus Postgres.

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, header};
use chrono::{Duration, Utc};

use crate::api;
use crate::middleware;
use crate::repos::error::RepoError;
use crate::repos::store::{
    NewTodo, NewUser, TodoPatch, TodoRow, TodoStore, UserPatch, UserRow, UserStore,
};
use crate::services::auth::token::TokenService;
use crate::state::AppState;

/// Test signing secret; >= 64 bytes, same constraint Config enforces.
pub const TEST_SECRET: &[u8] =
    b"request-test-secret-0123456789abcdef0123456789abcdef0123456789abcdef";

pub const TEST_TTL_SECONDS: u64 = 3600;

#[derive(Default)]
pub struct MemUserStore {
    rows: Mutex<Vec<(UserRow, bool)>>,
    next_id: AtomicI64,
}

impl MemUserStore {
    fn active(rows: &[(UserRow, bool)]) -> impl Iterator<Item = &UserRow> {
        rows.iter().filter(|(_, deleted)| !deleted).map(|(r, _)| r)
    }
}

#[async_trait]
impl UserStore for MemUserStore {
    async fn find_active_by_id(&self, id: i64) -> Result<Option<UserRow>, RepoError> {
        let rows = self.rows.lock().unwrap();
        Ok(Self::active(&rows).find(|r| r.id == id).cloned())
    }

    async fn find_active_by_username(&self, username: &str) -> Result<Option<UserRow>, RepoError> {
        let rows = self.rows.lock().unwrap();
        Ok(Self::active(&rows).find(|r| r.username == username).cloned())
    }

    async fn find_active_by_email(&self, email: &str) -> Result<Option<UserRow>, RepoError> {
        let rows = self.rows.lock().unwrap();
        Ok(Self::active(&rows).find(|r| r.email == email).cloned())
    }

    async fn find_active_by_username_or_email(
        &self,
        username_or_email: &str,
    ) -> Result<Option<UserRow>, RepoError> {
        let rows = self.rows.lock().unwrap();
        Ok(Self::active(&rows)
            .find(|r| r.username == username_or_email || r.email == username_or_email)
            .cloned())
    }

    async fn list_active(&self) -> Result<Vec<UserRow>, RepoError> {
        let rows = self.rows.lock().unwrap();
        Ok(Self::active(&rows).cloned().collect())
    }

    async fn create(&self, new: NewUser) -> Result<UserRow, RepoError> {
        let row = UserRow {
            id: self.next_id.fetch_add(1, Ordering::SeqCst) + 1,
            firstname: new.firstname,
            lastname: new.lastname,
            username: new.username,
            email: new.email,
            password_hash: new.password_hash,
            created_at: Utc::now(),
        };
        self.rows.lock().unwrap().push((row.clone(), false));
        Ok(row)
    }

    async fn update(&self, id: i64, patch: UserPatch) -> Result<Option<UserRow>, RepoError> {
        let mut rows = self.rows.lock().unwrap();
        let Some((row, _)) = rows.iter_mut().find(|(r, deleted)| r.id == id && !deleted) else {
            return Ok(None);
        };
        if let Some(v) = patch.firstname {
            row.firstname = v;
        }
        if let Some(v) = patch.lastname {
            row.lastname = v;
        }
        if let Some(v) = patch.username {
            row.username = v;
        }
        if let Some(v) = patch.email {
            row.email = v;
        }
        if let Some(v) = patch.password_hash {
            row.password_hash = v;
        }
        Ok(Some(row.clone()))
    }

    async fn soft_delete(&self, id: i64) -> Result<bool, RepoError> {
        let mut rows = self.rows.lock().unwrap();
        match rows.iter_mut().find(|(r, deleted)| r.id == id && !deleted) {
            Some(entry) => {
                entry.1 = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[derive(Default)]
pub struct MemTodoStore {
    rows: Mutex<Vec<(TodoRow, bool)>>,
    next_id: AtomicI64,
}

#[async_trait]
impl TodoStore for MemTodoStore {
    async fn find_active_by_id(&self, id: i64) -> Result<Option<TodoRow>, RepoError> {
        let rows = self.rows.lock().unwrap();
        Ok(rows
            .iter()
            .filter(|(_, deleted)| !deleted)
            .map(|(r, _)| r)
            .find(|r| r.id == id)
            .cloned())
    }

    async fn list_active_by_user(&self, user_id: i64) -> Result<Vec<TodoRow>, RepoError> {
        let rows = self.rows.lock().unwrap();
        Ok(rows
            .iter()
            .filter(|(r, deleted)| !deleted && r.user_id == user_id)
            .map(|(r, _)| r.clone())
            .collect())
    }

    async fn create(&self, new: NewTodo) -> Result<TodoRow, RepoError> {
        let row = TodoRow {
            id: self.next_id.fetch_add(1, Ordering::SeqCst) + 1,
            user_id: new.user_id,
            note: new.note,
            description: new.description,
            final_date: new.final_date,
            created_at: Utc::now(),
        };
        self.rows.lock().unwrap().push((row.clone(), false));
        Ok(row)
    }

    async fn update(&self, id: i64, patch: TodoPatch) -> Result<Option<TodoRow>, RepoError> {
        let mut rows = self.rows.lock().unwrap();
        let Some((row, _)) = rows.iter_mut().find(|(r, deleted)| r.id == id && !deleted) else {
            return Ok(None);
        };
        if let Some(v) = patch.note {
            row.note = v;
        }
        if let Some(v) = patch.description {
            row.description = Some(v);
        }
        if let Some(v) = patch.final_date {
            row.final_date = v;
        }
        Ok(Some(row.clone()))
    }

    async fn soft_delete(&self, id: i64) -> Result<bool, RepoError> {
        let mut rows = self.rows.lock().unwrap();
        match rows.iter_mut().find(|(r, deleted)| r.id == id && !deleted) {
            Some(entry) => {
                entry.1 = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

pub struct TestApp {
    pub state: AppState,
    pub router: Router,
}

/// Build the v1 router exactly as `app::build_router` wires it, minus the
/// CORS/HTTP layers (they are not part of what these scenarios check).
pub fn test_app() -> TestApp {
    let state = AppState::new(
        Arc::new(MemUserStore::default()),
        Arc::new(MemTodoStore::default()),
        Arc::new(TokenService::new(TEST_SECRET, TEST_TTL_SECONDS)),
    );

    let v1 = api::v1::routes();
    let v1 = middleware::auth::access::apply(v1, state.clone());
    let router = Router::new().nest("/api/v1", v1).with_state(state.clone());

    TestApp { state, router }
}

/// Insert an account directly into the store (skips the register endpoint)
/// and mint a real token for it. Password hash is deliberately junk; these
/// accounts never log in through the API.
pub async fn seed_user(app: &TestApp, username: &str) -> (UserRow, String) {
    let row = app
        .state
        .users
        .create(NewUser {
            firstname: "Test".into(),
            lastname: "User".into(),
            username: username.into(),
            email: format!("{username}@example.com"),
            password_hash: "seeded-no-login".into(),
        })
        .await
        .unwrap();

    let token = app.state.auth.issue(&row.username, row.id).unwrap();
    (row, token)
}

pub async fn seed_todo(app: &TestApp, user_id: i64, note: &str) -> TodoRow {
    app.state
        .todos
        .create(NewTodo {
            user_id,
            note: note.into(),
            description: None,
            final_date: Utc::now() + Duration::days(7),
        })
        .await
        .unwrap()
}

pub fn request(
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);

    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }

    match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&json).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

pub async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
