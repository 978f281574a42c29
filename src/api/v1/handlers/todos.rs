/*
 * Responsibility
 * - /todos 系 CRUD handler
 * - 一覧と作成は AuthCtx (自分のリソースのみ)、単体操作は OwnedTodo 経由
 * - OwnedTodo が所有権チェック済みの行を渡してくるので、ここでは再取得しない
 */
use axum::{Json, extract::State, http::StatusCode};

use crate::{
    api::v1::dto::todos::{CreateTodoRequest, TodoResponse, UpdateTodoRequest},
    api::v1::extractors::{AuthCtxExtractor, OwnedTodo},
    error::AppError,
    repos::store::{NewTodo, TodoPatch, TodoStore},
    state::AppState,
};

pub async fn list_todos(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
) -> Result<Json<Vec<TodoResponse>>, AppError> {
    let rows = state.todos.list_active_by_user(ctx.user_id).await?;
    let res = rows.into_iter().map(TodoResponse::from).collect();

    Ok(Json(res))
}

pub async fn create_todo(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    Json(req): Json<CreateTodoRequest>,
) -> Result<(StatusCode, Json<TodoResponse>), AppError> {
    req.validate()
        .map_err(|msg| AppError::bad_request("VALIDATION", msg))?;

    let row = state
        .todos
        .create(NewTodo {
            // owner は必ず認証済み principal。リクエスト body からは受け取らない。
            user_id: ctx.user_id,
            note: req.note,
            description: req.description,
            final_date: req.final_date,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(TodoResponse::from(row))))
}

pub async fn get_todo(OwnedTodo(row): OwnedTodo) -> Result<Json<TodoResponse>, AppError> {
    Ok(Json(TodoResponse::from(row)))
}

pub async fn update_todo(
    State(state): State<AppState>,
    OwnedTodo(row): OwnedTodo,
    Json(req): Json<UpdateTodoRequest>,
) -> Result<Json<TodoResponse>, AppError> {
    req.validate()
        .map_err(|msg| AppError::bad_request("VALIDATION", msg))?;

    let row = state
        .todos
        .update(
            row.id,
            TodoPatch {
                note: req.note,
                description: req.description,
                final_date: req.final_date,
            },
        )
        .await?
        // ガード通過後に消えた場合 (並行 delete)。404 でよい。
        .ok_or_else(|| AppError::not_found("todo"))?;

    Ok(Json(TodoResponse::from(row)))
}

pub async fn delete_todo(
    State(state): State<AppState>,
    OwnedTodo(row): OwnedTodo,
) -> Result<StatusCode, AppError> {
    let deleted = state.todos.soft_delete(row.id).await?;

    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("todo"))
    }
}
