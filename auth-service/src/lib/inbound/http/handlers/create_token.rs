use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use super::ERR_JSON_INVALID;
use super::ERR_PASSWORD_MISMATCH;
use crate::inbound::http::router::AppState;
use crate::token::models::Credentials;
use crate::token::models::IssuedToken;

pub async fn create_token(
    State(state): State<AppState>,
    body: Result<Json<CreateTokenRequestBody>, JsonRejection>,
) -> Result<ApiSuccess<CreateTokenResponseData>, ApiError> {
    let Json(body) = body.map_err(|e| {
        tracing::debug!(reason = %e, "Rejected token request body");
        ApiError::bad_request(ERR_JSON_INVALID)
    })?;

    let issued = state
        .token_service
        .generate(Credentials::new(body.username, body.password))
        .await
        .map_err(|e| {
            if e.is_server_error() {
                tracing::error!(error = ?e, "Token issuance failed");
            }
            ApiError::BadRequest(vec![ERR_PASSWORD_MISMATCH.to_string(), e.to_string()])
        })?;

    Ok(ApiSuccess::new(StatusCode::OK, issued.into()))
}

#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct CreateTokenRequestBody {
    username: String,
    password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateTokenResponseData {
    pub token: String,
    pub id: i64,
    pub username: String,
    pub roles: Vec<auth::Role>,
    /// Unix seconds
    pub expires_at: i64,
}

impl From<IssuedToken> for CreateTokenResponseData {
    fn from(issued: IssuedToken) -> Self {
        Self {
            token: issued.token,
            id: issued.claims.id,
            username: issued.claims.username,
            roles: issued.claims.roles,
            expires_at: issued.claims.exp,
        }
    }
}
