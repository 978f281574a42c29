/*
 * Responsibility
 * - 認証 middleware の公開インターフェース
 * - access: 認証 (AuthCtx を extensions に入れる。落とさない)
 * - require: 認可の手前のゲート (AuthCtx が無ければ 401)
 */
pub mod access;
pub mod require;
