use std::fmt;

use auth::Claims;

/// Username and plaintext password presented at token issuance.
///
/// Lives for a single request; the password never appears in `Debug` output.
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: String, password: String) -> Self {
        Self { username, password }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Signed token plus the claims it carries.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub claims: Claims,
}

/// Request-scoped holder of the caller's verified claims.
///
/// Empty until a valid bearer token has been decoded for the request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthContext(Option<Claims>);

impl AuthContext {
    pub fn empty() -> Self {
        Self(None)
    }

    pub fn authenticated(claims: Claims) -> Self {
        Self(Some(claims))
    }

    pub fn claims(&self) -> Option<&Claims> {
        self.0.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.0.is_some()
    }
}
