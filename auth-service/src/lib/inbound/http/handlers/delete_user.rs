use axum::extract::rejection::PathRejection;
use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;

use crate::domain::user::models::UserId;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ERR_BAD_REQUEST;
use crate::inbound::http::middleware::CurrentUser;
use crate::inbound::http::router::AppState;
use crate::user::errors::UserError;

pub async fn delete_user(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let Path(id) = id.map_err(|_| ApiError::bad_request(ERR_BAD_REQUEST))?;

    if id == current_user.id() {
        return Err(UserError::SelfDeleteRejected.into());
    }

    let user_id = UserId(id);
    state.user_service.find_user_by_id(user_id).await?;
    state.user_service.delete_user_by_id(user_id).await?;

    Ok(StatusCode::OK)
}
