use std::sync::OnceLock;

use chrono::Duration;
use chrono::Utc;

use crate::jwt::Claims;
use crate::jwt::JwtError;
use crate::jwt::JwtHandler;
use crate::password::PasswordError;
use crate::password::PasswordHasher;

/// Authentication coordinator combining password verification and JWT generation.
///
/// Holds the process-wide signing secret, token lifetime and hashing cost.
/// Shared read-only between requests.
pub struct Authenticator {
    password_hasher: PasswordHasher,
    jwt_handler: JwtHandler,
    token_ttl: Duration,
    decoy_hash: OnceLock<String>,
}

/// Plaintext behind the hash checked when no account matches.
const DECOY_PASSWORD: &str = "decoy-password-for-missing-accounts";

/// Result of successful authentication.
#[derive(Debug, Clone)]
pub struct AuthenticationResult {
    /// JWT access token
    pub access_token: String,

    /// Claims encoded in `access_token`
    pub claims: Claims,
}

/// Authentication operation errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthenticationError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Password error: {0}")]
    PasswordError(#[from] PasswordError),

    #[error("JWT error: {0}")]
    JwtError(#[from] JwtError),
}

impl Authenticator {
    /// Create a new authenticator.
    ///
    /// # Arguments
    /// * `jwt_secret` - Secret key for JWT signing
    /// * `token_ttl` - Lifetime of issued tokens
    ///
    /// # Returns
    /// Authenticator using the default password hashing cost
    pub fn new(jwt_secret: &[u8], token_ttl: Duration) -> Self {
        Self {
            password_hasher: PasswordHasher::new(),
            jwt_handler: JwtHandler::new(jwt_secret),
            token_ttl,
            decoy_hash: OnceLock::new(),
        }
    }

    /// Replace the password hasher (e.g. to tune the cost factor).
    pub fn with_password_hasher(mut self, password_hasher: PasswordHasher) -> Self {
        self.password_hasher = password_hasher;
        self.decoy_hash = OnceLock::new();
        self
    }

    pub fn token_ttl(&self) -> Duration {
        self.token_ttl
    }

    /// Hash a password for storage.
    ///
    /// # Errors
    /// * `PasswordError` - Hashing operation failed
    pub fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        self.password_hasher.hash(password)
    }

    /// Build claims for an account, issued now and expiring after the configured TTL.
    pub fn claims_for(&self, id: i64, username: &str, is_admin: bool) -> Claims {
        Claims::for_user(id, username, is_admin, Utc::now(), self.token_ttl)
    }

    /// Verify credentials and generate JWT token.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to verify
    /// * `stored_hash` - Stored password hash
    /// * `claims` - JWT claims to encode in token
    ///
    /// # Errors
    /// * `InvalidCredentials` - Password does not match
    /// * `PasswordError` - Password verification failed
    /// * `JwtError` - Token generation failed
    pub fn authenticate(
        &self,
        password: &str,
        stored_hash: &str,
        claims: Claims,
    ) -> Result<AuthenticationResult, AuthenticationError> {
        let is_valid = self.password_hasher.verify(password, stored_hash)?;

        if !is_valid {
            return Err(AuthenticationError::InvalidCredentials);
        }

        let access_token = self.jwt_handler.encode(&claims)?;

        Ok(AuthenticationResult {
            access_token,
            claims,
        })
    }

    /// Reject a login for an account that is missing or removed.
    ///
    /// Runs one bcrypt verification against a decoy hash at the configured
    /// cost, so the rejection takes as long as a wrong password does.
    ///
    /// # Returns
    /// `InvalidCredentials`, or `PasswordError` if the decoy hash cannot be built
    pub fn reject_unknown_account(&self, password: &str) -> AuthenticationError {
        match self.prepare_decoy() {
            Ok(hash) => {
                let _ = self.password_hasher.verify(password, hash);
                AuthenticationError::InvalidCredentials
            }
            Err(e) => AuthenticationError::PasswordError(e),
        }
    }

    /// Build the decoy hash ahead of the first rejected login.
    ///
    /// # Errors
    /// * `PasswordError` - Hashing failed (e.g. cost out of range)
    pub fn prepare_decoy(&self) -> Result<&str, PasswordError> {
        if let Some(hash) = self.decoy_hash.get() {
            return Ok(hash);
        }
        let hash = self.password_hasher.hash(DECOY_PASSWORD)?;
        Ok(self.decoy_hash.get_or_init(|| hash))
    }

    /// Decoy hash, once built.
    pub fn decoy_hash(&self) -> Option<&str> {
        self.decoy_hash.get().map(String::as_str)
    }

    /// Generate JWT token without password verification.
    ///
    /// # Errors
    /// * `JwtError` - Token generation failed
    pub fn generate_token(&self, claims: &Claims) -> Result<String, JwtError> {
        self.jwt_handler.encode(claims)
    }

    /// Validate and decode JWT token.
    ///
    /// # Errors
    /// * `JwtError` - Token is malformed, forged or expired
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        self.jwt_handler.decode(token)
    }
}
