use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use serde::Serialize;

use crate::user::errors::UserError;

pub mod create_token;
pub mod delete_user;
pub mod get_profile;
pub mod index;
pub mod upsert_user;

pub const ERR_JSON_INVALID: &str = "err.json_invalid";
pub const ERR_BAD_REQUEST: &str = "err.bad_request";
pub const ERR_PASSWORD_MISMATCH: &str = "err.password_mismatch";
pub const ERR_UNAUTHORIZED: &str = "err.unauthorized";
pub const ERR_FORBIDDEN: &str = "err.forbidden";

#[derive(Debug, Clone)]
pub struct ApiSuccess<T: Serialize + PartialEq>(StatusCode, Json<T>);

impl<T> PartialEq for ApiSuccess<T>
where
    T: Serialize + PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0 && self.1 .0 == other.1 .0
    }
}

impl<T: Serialize + PartialEq> ApiSuccess<T> {
    pub fn new(status: StatusCode, data: T) -> Self {
        ApiSuccess(status, Json(data))
    }
}

impl<T: Serialize + PartialEq> IntoResponse for ApiSuccess<T> {
    fn into_response(self) -> Response {
        (self.0, self.1).into_response()
    }
}

/// Failure responses. Every variant renders `{"errors": [...]}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    BadRequest(Vec<String>),
    Unauthorized,
    Forbidden,
    InternalServerError,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(vec![message.into()])
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, errors) = match self {
            ApiError::BadRequest(errors) => (StatusCode::BAD_REQUEST, errors),
            ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, vec![ERR_UNAUTHORIZED.to_string()]),
            ApiError::Forbidden => (StatusCode::FORBIDDEN, vec![ERR_FORBIDDEN.to_string()]),
            ApiError::InternalServerError => (
                StatusCode::INTERNAL_SERVER_ERROR,
                vec!["server error".to_string()],
            ),
        };

        (status, Json(ApiErrorBody { errors })).into_response()
    }
}

/// Domain failures surface as `400` carrying the error's display text.
///
/// Infrastructure causes are logged here and only the fixed
/// `server error` text reaches the client.
impl From<UserError> for ApiError {
    fn from(err: UserError) -> Self {
        if err.is_server_error() {
            tracing::error!(error = ?err, "Request failed on a server error");
        }
        ApiError::bad_request(err.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiErrorBody {
    pub errors: Vec<String>,
}
