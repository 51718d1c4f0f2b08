use std::sync::Arc;
use std::time::Duration;

use auth::Authenticator;
use auth::Role;
use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::routing::delete;
use axum::routing::get;
use axum::routing::post;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::create_token::create_token;
use super::handlers::delete_user::delete_user;
use super::handlers::get_profile::get_profile;
use super::handlers::index::index;
use super::handlers::upsert_user::upsert_user;
use super::middleware::public;
use super::middleware::AuthPipeline;
use crate::token::ports::TokenServicePort;
use crate::user::ports::UserServicePort;

#[derive(Clone)]
pub struct AppState {
    pub token_service: Arc<dyn TokenServicePort>,
    pub user_service: Arc<dyn UserServicePort>,
}

pub fn create_router(
    token_service: Arc<dyn TokenServicePort>,
    user_service: Arc<dyn UserServicePort>,
    authenticator: Arc<Authenticator>,
) -> Router {
    let state = AppState {
        token_service,
        user_service,
    };

    let admin_only = |route: &'static str| {
        AuthPipeline::new(route, Arc::clone(&authenticator)).require_any_role([Role::Admin])
    };

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    Router::new()
        .route("/", public("index", get(index)))
        .route("/api/tokens", public("create_token", post(create_token)))
        .route(
            "/api/users",
            AuthPipeline::new("profile", Arc::clone(&authenticator)).wrap(get(get_profile)),
        )
        .route("/api/users/:id", admin_only("upsert_user").wrap(post(upsert_user)))
        .route("/api/users/:id", admin_only("delete_user").wrap(delete(delete_user)))
        .layer(trace_layer)
        .layer(CorsLayer::permissive())
        .with_state(state)
}
