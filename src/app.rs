/*
 * Responsibility
 * - Config読み込み → 依存生成 → Router 組み立て
 * - Middleware の適用 (access auth / CORS / HTTP 層)
 * - axum::serve() で起動
 */
use std::sync::Arc;
use std::{panic, process};

use anyhow::{Context, Result};
use axum::Router;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::repos::{todo_repo::PgTodoStore, user_repo::PgUserStore};
use crate::services::auth::token::TokenService;
use crate::state::AppState;
use crate::{api, middleware};

fn init_tracing() {
    // Prefer RUST_LOG if set; otherwise use a sensible default.
    // Ex:
    // RUST_LOG=info,todolist_api=debug,tower_http=debug cargo run
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn init_panic_hook(abort_on_panic: bool) {
    // Keep the default hook as a fallback (prints to stderr with location/payload).
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        // Always surface panics via tracing so they don't get "lost"
        // (stderr can be hidden depending on how the process is launched.)
        tracing::error!(?info, "panic");

        // In development, fail fast: crash the whole process so we notice immediately.
        // In production, prefer the default behavior (stderr) and let the server keep running.
        if abort_on_panic {
            process::abort();
        } else {
            default_hook(info);
        }
    }))
}

pub async fn run() -> Result<()> {
    init_tracing();

    // 設定不備 (JWT_SECRET 無し等) はここで落ちる。リクエストを受け始めてから
    // 気づくよりずっと良い。
    let config = Config::from_env().context("failed to load configuration")?;

    let abort_on_panic = !config.app_env.is_production();
    init_panic_hook(abort_on_panic);

    tracing::info!(
        "starting API in {:?} mode on {}",
        config.app_env,
        config.addr
    );

    let db = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await
        .context("failed to connect to database")?;

    sqlx::migrate!()
        .run(&db)
        .await
        .context("failed to run migrations")?;

    let state = build_state(db, &config);
    let app = build_router(state, &config);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn build_state(db: sqlx::PgPool, config: &Config) -> AppState {
    let auth = TokenService::new(
        config.jwt_secret.as_bytes(),
        config.access_token_ttl_seconds,
    );

    AppState::new(
        Arc::new(PgUserStore::new(db.clone())),
        Arc::new(PgTodoStore::new(db)),
        Arc::new(auth),
    )
}

fn build_router(state: AppState, config: &Config) -> Router {
    let v1 = api::v1::routes();
    // 認証 middleware は v1 全体に掛ける (公開 route も通るが、落とさないので無害)
    let v1 = middleware::auth::access::apply(v1, state.clone());

    let app = Router::new().nest("/api/v1", v1).with_state(state);

    let app = middleware::cors::apply(app, config);
    middleware::http::apply(app)
}
