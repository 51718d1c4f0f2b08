use std::sync::Arc;

use async_trait::async_trait;
use auth::AuthenticationError;
use auth::Authenticator;

use crate::domain::token::models::Credentials;
use crate::domain::token::models::IssuedToken;
use crate::domain::token::ports::TokenServicePort;
use crate::user::errors::UserError;
use crate::user::ports::UserStore;

/// Issues signed tokens for accounts whose credentials check out.
pub struct TokenService<US>
where
    US: UserStore,
{
    store: Arc<US>,
    authenticator: Arc<Authenticator>,
}

impl<US> TokenService<US>
where
    US: UserStore,
{
    pub fn new(store: Arc<US>, authenticator: Arc<Authenticator>) -> Self {
        Self {
            store,
            authenticator,
        }
    }

    /// Missing and removed accounts pay for one bcrypt check, like a wrong password.
    async fn reject(&self, password: String) -> UserError {
        let authenticator = Arc::clone(&self.authenticator);

        match tokio::task::spawn_blocking(move || authenticator.reject_unknown_account(&password))
            .await
        {
            Ok(error) => UserError::from(error),
            Err(e) => UserError::Unknown(format!("Password verification task failed: {}", e)),
        }
    }
}

#[async_trait]
impl<US> TokenServicePort for TokenService<US>
where
    US: UserStore,
{
    async fn generate(&self, credentials: Credentials) -> Result<IssuedToken, UserError> {
        let user = match self.store.find_by_username(&credentials.username).await? {
            Some(user) if !user.removed => user,
            Some(_) => {
                tracing::debug!(username = %credentials.username, "Token requested for removed account");
                return Err(self.reject(credentials.password).await);
            }
            None => {
                tracing::debug!(username = %credentials.username, "Token requested for unknown account");
                return Err(self.reject(credentials.password).await);
            }
        };

        let claims = self
            .authenticator
            .claims_for(user.id.0, user.username.as_str(), user.is_admin);
        let authenticator = Arc::clone(&self.authenticator);
        let password = credentials.password;
        let password_hash = user.password_hash;

        let result = tokio::task::spawn_blocking(move || {
            authenticator.authenticate(&password, &password_hash, claims)
        })
        .await
        .map_err(|e| UserError::Unknown(format!("Password verification task failed: {}", e)))?;

        let authenticated = result.map_err(|e| {
            if matches!(e, AuthenticationError::InvalidCredentials) {
                tracing::debug!(user_id = %user.id, "Password mismatch");
            }
            UserError::from(e)
        })?;

        tracing::info!(user_id = %user.id, "Issued token");

        Ok(IssuedToken {
            token: authenticated.access_token,
            claims: authenticated.claims,
        })
    }
}
