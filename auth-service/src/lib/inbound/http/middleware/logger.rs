use axum::extract::Request;
use axum::extract::State;
use axum::middleware::Next;
use axum::response::Response;

/// Outermost gate: one log line per request, short-circuits included.
pub async fn log_request(
    State(route): State<&'static str>,
    request: Request,
    next: Next,
) -> Response {
    let method = request.method().clone();
    let response = next.run(request).await;
    let status = response.status();

    if status.is_success() {
        tracing::info!(route, %method, status = status.as_u16(), outcome = "success", "Request handled");
    } else {
        tracing::warn!(route, %method, status = status.as_u16(), outcome = "failure", "Request handled");
    }

    response
}
