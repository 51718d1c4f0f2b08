use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use super::ERR_BAD_REQUEST;
use crate::domain::user::models::UserSummary;
use crate::inbound::http::router::AppState;
use crate::token::models::AuthContext;

const AVATAR_URL: &str = "https://i.pravatar.cc/50";

pub async fn get_profile(
    State(state): State<AppState>,
    context: Option<Extension<AuthContext>>,
) -> Result<ApiSuccess<ProfileResponseData>, ApiError> {
    let context = context.map(|Extension(context)| context).unwrap_or_default();

    state
        .user_service
        .profile(&context)
        .await
        .map_err(|_| ApiError::bad_request(ERR_BAD_REQUEST))
        .map(|summary| ApiSuccess::new(StatusCode::OK, summary.into()))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfileResponseData {
    pub id: i64,
    pub name: String,
    pub avatar: String,
}

impl From<UserSummary> for ProfileResponseData {
    fn from(summary: UserSummary) -> Self {
        Self {
            id: summary.id.0,
            name: summary.username,
            avatar: AVATAR_URL.to_string(),
        }
    }
}
