//! Request gates composed in a fixed order around route handlers.
//!
//! A protected route always runs, outermost first:
//! logging, token decode, authenticated gate, optional role gate, handler.

use std::sync::Arc;

use auth::Authenticator;
use auth::Role;
use axum::middleware::from_fn;
use axum::middleware::from_fn_with_state;
use axum::routing::MethodRouter;

pub mod authenticated;
pub mod authorized;
pub mod decode;
pub mod logger;

pub use authenticated::CurrentUser;

/// Builder for the gate chain of one protected route.
///
/// Routes choose only whether a role gate is present and which roles it
/// accepts; the order of the remaining gates cannot be changed.
pub struct AuthPipeline {
    route: &'static str,
    authenticator: Arc<Authenticator>,
    required_roles: Vec<Role>,
}

impl AuthPipeline {
    pub fn new(route: &'static str, authenticator: Arc<Authenticator>) -> Self {
        Self {
            route,
            authenticator,
            required_roles: Vec::new(),
        }
    }

    /// Add a role gate satisfied by holding any of `roles`.
    pub fn require_any_role(mut self, roles: impl IntoIterator<Item = Role>) -> Self {
        self.required_roles.extend(roles);
        self
    }

    /// Wrap `method_router` in the gate chain.
    pub fn wrap<S>(self, method_router: MethodRouter<S>) -> MethodRouter<S>
    where
        S: Clone + Send + Sync + 'static,
    {
        let mut method_router = method_router;

        if !self.required_roles.is_empty() {
            let required: Arc<[Role]> = self.required_roles.into();
            method_router = method_router
                .route_layer(from_fn_with_state(required, authorized::require_any_role));
        }

        method_router
            .route_layer(from_fn(authenticated::require_authenticated))
            .route_layer(from_fn_with_state(self.authenticator, decode::decode_token))
            .route_layer(from_fn_with_state(self.route, logger::log_request))
    }
}

/// Wrap an unprotected route with the logging gate only.
pub fn public<S>(route: &'static str, method_router: MethodRouter<S>) -> MethodRouter<S>
where
    S: Clone + Send + Sync + 'static,
{
    method_router.route_layer(from_fn_with_state(route, logger::log_request))
}
