//! Access-token (JWT) 検証 → AuthCtx を extensions に入れる
//!
//! この middleware は自分では絶対にリクエストを拒否しない：
//! - ヘッダ無し / `Bearer ` 形式でない → そのまま next へ
//! - token が壊れている / 期限切れ / subject 不一致 → warn ログだけ残して next へ
//! - アカウントが見つからない (削除済み含む) → next へ（存在有無は漏らさない）
//!
//! 401 を返すかどうかは下流 (`require::require_auth` と各 route の構成) が
//! 決める。ここを通った時点で、認証済みなら AuthCtx が extensions に入って
//! いる、それだけが契約。

use axum::{
    Router,
    body::Body,
    extract::State,
    http::{HeaderMap, Request, header},
    middleware::{self, Next},
    response::Response,
};

use crate::api::v1::extractors::AuthCtx;
use crate::error::AppError;
use crate::repos::store::UserStore;
use crate::state::AppState;

/// `/api/v1/*` に認証を掛けるための middleware を適用する。
///
/// 例：
/// ```ignore
/// let v1 = api::v1::routes();
/// let v1 = middleware::auth::access::apply(v1, state.clone());
/// app = app.nest("/api/v1", v1);
/// ```
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    // axum 0.8 の from_fn は State extractor を受け取れないため、`from_fn_with_state` で明示的に state を渡す
    router.layer(middleware::from_fn_with_state(state, access_middleware))
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
}

async fn access_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let Some(token) = bearer_token(req.headers()) else {
        // 匿名リクエスト。公開 route かどうかは下流が判断する。
        return Ok(next.run(req).await);
    };

    // 署名だけ確認して subject (username) を取り出す。期限切れ判定は
    // validate 側。ここで失敗する token は偽造か破損。
    let username = match state.auth.extract_username(token) {
        Ok(username) => username,
        Err(err) => {
            tracing::warn!(error = %err, "failed to decode access token subject");
            return Ok(next.run(req).await);
        }
    };

    // soft delete されたアカウントはここで消える: 古い token が有効期限内でも
    // active な行が無ければ匿名扱いになる。
    let account = match state.users.find_active_by_username(&username).await {
        Ok(Some(account)) => account,
        Ok(None) => {
            return Ok(next.run(req).await);
        }
        Err(err) => {
            tracing::error!(error = %err, "credential store lookup failed");
            return Err(AppError::Internal);
        }
    };

    match state.auth.validate(token, &account.username) {
        Ok(_principal) => {
            let auth_ctx = AuthCtx::new(account.id, account.username);
            // middleware → extractor への受け渡し
            req.extensions_mut().insert(auth_ctx);
        }
        Err(err) => {
            tracing::warn!(error = %err, "access token validation failed");
        }
    }

    Ok(next.run(req).await)
}
