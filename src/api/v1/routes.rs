/*
 * Responsibility
 * - v1 の URL 構造を定義 (公開/保護の route テーブルはここが唯一の真実)
 * - 公開は /health, /users/register, /users/login のみ
 * - それ以外は require_auth の内側 (AuthCtx 無しは一律 401)
 */
use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::middleware::auth::require::require_auth;
use crate::state::AppState;

use crate::api::v1::handlers::{
    health::health,
    todos::{create_todo, delete_todo, get_todo, list_todos, update_todo},
    users::{delete_user, get_user, list_users, login, register, update_user},
};

pub fn routes() -> Router<AppState> {
    let public = Router::new()
        .route("/health", get(health))
        .route("/users/register", post(register))
        .route("/users/login", post(login));

    let protected = Router::new()
        .route("/users", get(list_users))
        .route(
            "/users/{user_id}",
            get(get_user).put(update_user).delete(delete_user),
        )
        .route("/todos", get(list_todos).post(create_todo))
        .route(
            "/todos/{todo_id}",
            get(get_todo).put(update_todo).delete(delete_todo),
        )
        // route_layer: 登録済み route にだけ掛かる (404 は guard を通らない)
        .route_layer(middleware::from_fn(require_auth));

    public.merge(protected)
}
