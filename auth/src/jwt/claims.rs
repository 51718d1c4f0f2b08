use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

/// Closed set of roles a caller can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Member,
    Admin,
}

impl Role {
    /// Roles granted to an account, derived from its admin flag.
    ///
    /// Every account is a `Member`; administrators additionally hold `Admin`.
    pub fn for_account(is_admin: bool) -> Vec<Role> {
        if is_admin {
            vec![Role::Member, Role::Admin]
        } else {
            vec![Role::Member]
        }
    }
}

/// Identity claims carried by an access token.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// User identifier
    pub id: i64,

    pub username: String,

    pub roles: Vec<Role>,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// Create claims for a user account.
    ///
    /// # Arguments
    /// * `id` - Unique user identifier
    /// * `username` - Username
    /// * `is_admin` - Whether the account holds the `Admin` role
    /// * `issued_at` - Issuance instant
    /// * `ttl` - Lifetime of the token from `issued_at`
    ///
    /// # Returns
    /// Claims with roles, iat and exp set
    pub fn for_user(
        id: i64,
        username: impl Into<String>,
        is_admin: bool,
        issued_at: DateTime<Utc>,
        ttl: Duration,
    ) -> Self {
        let expiration = issued_at + ttl;

        Self {
            id,
            username: username.into(),
            roles: Role::for_account(is_admin),
            iat: issued_at.timestamp(),
            exp: expiration.timestamp(),
        }
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    /// True when the claims hold at least one of `required`.
    ///
    /// An empty requirement is never satisfied.
    pub fn has_any_role(&self, required: &[Role]) -> bool {
        required.iter().any(|role| self.has_role(*role))
    }

    pub fn is_admin(&self) -> bool {
        self.has_role(Role::Admin)
    }

    /// Check if token is expired.
    pub fn is_expired(&self, current_timestamp: i64) -> bool {
        self.exp < current_timestamp
    }
}
