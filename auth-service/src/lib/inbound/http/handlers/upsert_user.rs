use axum::extract::rejection::JsonRejection;
use axum::extract::rejection::PathRejection;
use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use super::ApiError;
use super::ERR_BAD_REQUEST;
use super::ERR_JSON_INVALID;
use crate::domain::user::models::RegisterUserCommand;
use crate::domain::user::models::UpdateUserCommand;
use crate::domain::user::models::UserId;
use crate::inbound::http::router::AppState;

/// `POST /api/users/{id}`: id `0` registers a new account, a positive id
/// updates that account.
pub async fn upsert_user(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
    body: Result<Json<UpsertUserRequestBody>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let Path(id) = id.map_err(|_| ApiError::bad_request(ERR_BAD_REQUEST))?;
    let Json(body) = body.map_err(|e| {
        tracing::debug!(reason = %e, "Rejected user request body");
        ApiError::bad_request(ERR_JSON_INVALID)
    })?;

    match id {
        0 => {
            if body.admin {
                tracing::debug!("Admin flag is ignored on registration");
            }
            let command = RegisterUserCommand::new(
                body.username.unwrap_or_default(),
                body.password.unwrap_or_default(),
            )?;
            state.user_service.register_user(command).await?;
        }
        id if id > 0 => {
            let command = UpdateUserCommand::new(body.username, body.password, body.admin)?;
            state.user_service.update_user(UserId(id), command).await?;
        }
        _ => return Err(ApiError::bad_request(ERR_BAD_REQUEST)),
    }

    Ok(StatusCode::NO_CONTENT)
}

#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct UpsertUserRequestBody {
    #[serde(default)]
    username: Option<String>,
    #[serde(default)]
    password: Option<String>,
    #[serde(default)]
    admin: bool,
}
