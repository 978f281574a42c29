/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 *   - stores: UserStore / TodoStore, auth: TokenService
 * - Clone 前提で持つ (内部は Arc/Clone cheap)
 */
use std::sync::Arc;

use crate::repos::store::{TodoStore, UserStore};
use crate::services::auth::token::TokenService;

#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserStore>,
    pub todos: Arc<dyn TodoStore>,
    pub auth: Arc<TokenService>,
}

impl AppState {
    pub fn new(
        users: Arc<dyn UserStore>,
        todos: Arc<dyn TodoStore>,
        auth: Arc<TokenService>,
    ) -> Self {
        Self { users, todos, auth }
    }
}
