//! 保護 route のゲート。
//!
//! route テーブル側で「公開は /users/register, /users/login (+ /health) のみ、
//! 残りは全部このゲートの内側」という形に寄せる。access middleware が
//! AuthCtx を入れなかったリクエストはここで一律 401 になる。

use axum::{body::Body, http::Request, middleware::Next, response::Response};

use crate::api::v1::extractors::AuthCtx;
use crate::error::AppError;

pub async fn require_auth(req: Request<Body>, next: Next) -> Result<Response, AppError> {
    if req.extensions().get::<AuthCtx>().is_none() {
        return Err(AppError::Unauthorized);
    }

    Ok(next.run(req).await)
}
