//! Ownership guard for single-todo routes.
//!
//! `OwnedTodo` is attached per-route simply by appearing in the handler
//! signature, so which routes are guarded — and where the resource id comes
//! from — is visible and type-checked at wiring time. The extractor:
//!
//! 1. reads the `{todo_id}` path segment,
//! 2. loads the active row by id only (owner not yet in the query),
//! 3. rejects 404 when there is no active row,
//! 4. rejects 403 when the row's owner is not the request principal,
//! 5. otherwise hands the already-loaded row to the handler (no second
//!    lookup).
//!
//! Existence is checked before ownership: a nonexistent id is 404 for every
//! authenticated caller, an existing foreign todo is 403. The 403 does
//! confirm existence to authenticated non-owners.
//!
//! The guard performs no writes; it must run before any mutation in the
//! handler and can be abandoned on cancellation.

use axum::extract::rejection::PathRejection;
use axum::extract::{FromRequestParts, Path};
use axum::http::request::Parts;

use crate::api::v1::extractors::AuthCtx;
use crate::error::AppError;
use crate::repos::store::{TodoRow, TodoStore};
use crate::state::AppState;

pub struct OwnedTodo(pub TodoRow);

impl FromRequestParts<AppState> for OwnedTodo
where
    AppState: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Path(todo_id) = Path::<i64>::from_request_parts(parts, state)
            .await
            .map_err(|rej| match rej {
                // A guarded route without an id segment is a wiring bug, not
                // client input. Surface as 500 and make noise.
                PathRejection::MissingPathParams(_) => {
                    tracing::error!("ownership-guarded route has no todo id path param");
                    AppError::Internal
                }
                _ => AppError::bad_request("INVALID_TODO_ID", "invalid todo id"),
            })?;

        // Guaranteed by require_auth ordering; kept as a real check so the
        // extractor stands on its own in tests.
        let ctx = parts
            .extensions
            .get::<AuthCtx>()
            .cloned()
            .ok_or(AppError::Unauthorized)?;

        let row = state
            .todos
            .find_active_by_id(todo_id)
            .await
            .map_err(AppError::from)?
            .ok_or_else(|| AppError::not_found("todo"))?;

        if row.user_id != ctx.user_id {
            return Err(AppError::Forbidden);
        }

        Ok(OwnedTodo(row))
    }
}
