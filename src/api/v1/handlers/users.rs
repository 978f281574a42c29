/*
 * Responsibility
 * - /users 系 handler (register/login は公開、他は認証必須)
 * - Path/Json を extractor で受け、DTO validation → store 呼び出し
 *
 * Note
 * - login の失敗理由 (アカウント無し / パスワード不一致) は外から区別できて
 *   はいけない。どちらも同じ Unauthorized に落とす。
 */
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use tracing::error;

use crate::{
    api::v1::dto::users::{
        CreateUserRequest, LoginRequest, LoginResponse, UpdateUserRequest, UserResponse,
    },
    error::AppError,
    repos::store::{NewUser, UserPatch, UserStore},
    services::auth::password,
    state::AppState,
};

pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>), AppError> {
    req.validate()
        .map_err(|msg| AppError::bad_request("VALIDATION", msg))?;

    if state
        .users
        .find_active_by_username(&req.username)
        .await?
        .is_some()
    {
        return Err(AppError::conflict("USERNAME_TAKEN", "username already exists"));
    }
    if state.users.find_active_by_email(&req.email).await?.is_some() {
        return Err(AppError::conflict("EMAIL_TAKEN", "email already exists"));
    }

    let password_hash = password::hash(&req.password)?;

    let row = state
        .users
        .create(NewUser {
            firstname: req.firstname,
            lastname: req.lastname,
            username: req.username,
            email: req.email,
            password_hash,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(UserResponse::from(row))))
}

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    req.validate()
        .map_err(|msg| AppError::bad_request("VALIDATION", msg))?;

    let account = state
        .users
        .find_active_by_username_or_email(&req.username_or_email)
        .await?
        .ok_or(AppError::Unauthorized)?;

    if !password::verify(&req.password, &account.password_hash) {
        return Err(AppError::Unauthorized);
    }

    let token = state
        .auth
        .issue(&account.username, account.id)
        .map_err(|err| {
            error!(error = %err, "failed to issue access token");
            AppError::Internal
        })?;

    Ok(Json(LoginResponse {
        token,
        token_type: "Bearer",
        expires_in: state.auth.ttl_seconds(),
        user_id: account.id,
        username: account.username,
        email: account.email,
    }))
}

pub async fn list_users(
    State(state): State<AppState>,
) -> Result<Json<Vec<UserResponse>>, AppError> {
    let rows = state.users.list_active().await?;
    let res = rows.into_iter().map(UserResponse::from).collect();

    Ok(Json(res))
}

pub async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<Json<UserResponse>, AppError> {
    let row = state
        .users
        .find_active_by_id(user_id)
        .await?
        .ok_or_else(|| AppError::not_found("user"))?;

    Ok(Json(UserResponse::from(row)))
}

pub async fn update_user(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    Json(req): Json<UpdateUserRequest>,
) -> Result<Json<UserResponse>, AppError> {
    req.validate()
        .map_err(|msg| AppError::bad_request("VALIDATION", msg))?;

    // uniqueness は active な行の中だけで見る。自分自身との衝突は許す。
    if let Some(username) = &req.username {
        let existing = state.users.find_active_by_username(username).await?;
        if existing.is_some_and(|u| u.id != user_id) {
            return Err(AppError::conflict("USERNAME_TAKEN", "username already exists"));
        }
    }
    if let Some(email) = &req.email {
        let existing = state.users.find_active_by_email(email).await?;
        if existing.is_some_and(|u| u.id != user_id) {
            return Err(AppError::conflict("EMAIL_TAKEN", "email already exists"));
        }
    }

    let password_hash = match &req.password {
        Some(p) => Some(password::hash(p)?),
        None => None,
    };

    let row = state
        .users
        .update(
            user_id,
            UserPatch {
                firstname: req.firstname,
                lastname: req.lastname,
                username: req.username,
                email: req.email,
                password_hash,
            },
        )
        .await?
        .ok_or_else(|| AppError::not_found("user"))?;

    Ok(Json(UserResponse::from(row)))
}

pub async fn delete_user(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<StatusCode, AppError> {
    let deleted = state.users.soft_delete(user_id).await?;

    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("user"))
    }
}
