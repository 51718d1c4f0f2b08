use std::sync::Arc;

use auth::Role;
use axum::extract::Request;
use axum::extract::State;
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::response::Response;

use super::authenticated::CurrentUser;
use crate::inbound::http::handlers::ApiError;

/// Reject callers holding none of the required roles with `403`.
pub async fn require_any_role(
    State(required): State<Arc<[Role]>>,
    request: Request,
    next: Next,
) -> Response {
    let caller = request
        .extensions()
        .get::<CurrentUser>()
        .map(|user| (user.id(), user.claims().has_any_role(&required)));

    match caller {
        Some((_, true)) => next.run(request).await,
        Some((user_id, false)) => {
            tracing::debug!(user_id, required = ?required, "Caller lacks required role");
            ApiError::Forbidden.into_response()
        }
        None => {
            tracing::error!("Role gate reached without an authenticated caller");
            ApiError::InternalServerError.into_response()
        }
    }
}
