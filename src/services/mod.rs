/*
 * Responsibility
 * - services の公開インターフェース (re-export)
 */
pub mod auth;
