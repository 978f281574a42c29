/*
 * Responsibility
 * - Handler から見える「認証済みコンテキスト」の型
 * - middleware が検証して request extensions に格納し、handler はこの型だけを受け取る
 *
 * Notes
 * - JWT の検証ロジックは middleware/services 側の責務
 * - 1 リクエストに 1 つ。middleware が一度だけ書き、以降は読み取り専用
 */

/// 認証済みのリクエストに付与されるコンテキスト
///
/// - `user_id` は accounts(users) テーブルの内部 ID
/// - `username` は token の subject と一致することが検証済み
#[derive(Debug, Clone)]
pub struct AuthCtx {
    pub user_id: i64,
    pub username: String,
}

impl AuthCtx {
    pub fn new(user_id: i64, username: String) -> Self {
        Self { user_id, username }
    }
}
