use auth::Claims;
use axum::extract::Request;
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::response::Response;

use crate::inbound::http::handlers::ApiError;
use crate::token::models::AuthContext;

/// Claims of a caller that passed the authenticated gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser(Claims);

impl CurrentUser {
    pub fn claims(&self) -> &Claims {
        &self.0
    }

    pub fn id(&self) -> i64 {
        self.0.id
    }
}

/// Reject requests whose `AuthContext` is empty with `401`.
pub async fn require_authenticated(mut request: Request, next: Next) -> Response {
    let claims = request
        .extensions()
        .get::<AuthContext>()
        .and_then(|context| context.claims().cloned());

    match claims {
        Some(claims) => {
            request.extensions_mut().insert(CurrentUser(claims));
            next.run(request).await
        }
        None => ApiError::Unauthorized.into_response(),
    }
}
