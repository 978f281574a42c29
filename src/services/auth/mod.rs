/*
 * Responsibility
 * - 認証まわりの service (token 発行/検証, password hash)
 * - HTTP / axum 依存はここに持ち込まない
 */
pub mod password;
pub mod token;
