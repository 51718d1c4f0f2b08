use async_trait::async_trait;

use crate::domain::token::models::Credentials;
use crate::domain::token::models::IssuedToken;
use crate::user::errors::UserError;

/// Port for token issuance.
#[async_trait]
pub trait TokenServicePort: Send + Sync + 'static {
    /// Check credentials and sign a token for the matching account.
    ///
    /// Unknown users, removed accounts and wrong passwords are
    /// indistinguishable to the caller.
    ///
    /// # Errors
    /// * `InvalidCredentials` - No active account matches the credentials
    /// * `Password` - Stored hash could not be verified
    /// * `Token` - Token signing failed
    /// * `DatabaseError` - Database operation failed
    async fn generate(&self, credentials: Credentials) -> Result<IssuedToken, UserError>;
}
