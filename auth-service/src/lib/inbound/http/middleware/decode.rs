use std::sync::Arc;

use auth::Authenticator;
use axum::extract::Request;
use axum::extract::State;
use axum::http::header;
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::Response;

use crate::token::models::AuthContext;

/// Populate the request's `AuthContext` from its bearer token.
///
/// Never rejects: a missing or unusable token leaves the context empty and
/// the decision to the authenticated gate.
pub async fn decode_token(
    State(authenticator): State<Arc<Authenticator>>,
    mut request: Request,
    next: Next,
) -> Response {
    let context = match bearer_token(request.headers()) {
        Some(token) => match authenticator.validate_token(token) {
            Ok(claims) => AuthContext::authenticated(claims),
            Err(e) => {
                tracing::debug!(reason = %e, "Bearer token rejected");
                AuthContext::empty()
            }
        },
        None => AuthContext::empty(),
    };

    request.extensions_mut().insert(context);
    next.run(request).await
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();

    if scheme.eq_ignore_ascii_case("Bearer") && !token.is_empty() {
        Some(token)
    } else {
        None
    }
}
