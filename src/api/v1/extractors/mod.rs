/*
 * Responsibility
 * - extractors の公開インターフェース
 */
mod auth_ctx;
mod owned_todo;

pub use auth_ctx::{AuthCtx, AuthCtxExtractor};
pub use owned_todo::OwnedTodo;
