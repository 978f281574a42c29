/*
 * Responsibility
 * - repos の公開インターフェース (re-export)
 */
pub mod error;
pub mod store;
pub mod todo_repo;
pub mod user_repo;
