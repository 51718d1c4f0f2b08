use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::token::models::AuthContext;
use crate::domain::user::models::NewUser;
use crate::domain::user::models::RegisterUserCommand;
use crate::domain::user::models::UpdateUserCommand;
use crate::domain::user::models::UserId;
use crate::domain::user::models::UserRecord;
use crate::domain::user::models::UserSummary;
use crate::domain::user::models::Username;
use crate::user::errors::UserError;
use crate::user::ports::UserServicePort;
use crate::user::ports::UserStore;
use crate::user::ports::UserUpdate;

/// Domain service implementation for user operations.
///
/// Concrete implementation of UserServicePort with dependency injection.
pub struct UserService<US>
where
    US: UserStore,
{
    store: Arc<US>,
    password_hasher: auth::PasswordHasher,
}

impl<US> UserService<US>
where
    US: UserStore,
{
    /// Create a new user service with injected dependencies.
    ///
    /// # Arguments
    /// * `store` - User persistence implementation
    /// * `password_hasher` - Hasher for new and changed passwords
    ///
    /// # Returns
    /// Configured user service instance
    pub fn new(store: Arc<US>, password_hasher: auth::PasswordHasher) -> Self {
        Self {
            store,
            password_hasher,
        }
    }

    /// Create the administrator account unless the username is already taken.
    ///
    /// # Returns
    /// Whether a new account was created
    ///
    /// # Errors
    /// * `InvalidUsername` - Username is empty or too long
    /// * `EmptyPassword` - Password is empty
    /// * `Password` - Password hashing failed
    /// * `DatabaseError` - Database operation failed
    pub async fn ensure_admin(&self, username: &str, password: &str) -> Result<bool, UserError> {
        let command = RegisterUserCommand::new(username.to_string(), password.to_string())?;

        if self
            .store
            .find_by_username(command.username.as_str())
            .await?
            .is_some()
        {
            tracing::debug!(username = %command.username, "Administrator account already exists");
            return Ok(false);
        }

        let password_hash = self.hash_password(command.password).await?;
        let admin = self
            .store
            .create(NewUser {
                username: command.username,
                password_hash,
                is_admin: true,
            })
            .await?;

        tracing::info!(user_id = %admin.id, username = %admin.username, "Created administrator account");

        Ok(true)
    }

    /// bcrypt is CPU bound; keep it off the async workers.
    async fn hash_password(&self, password: String) -> Result<String, UserError> {
        let hasher = self.password_hasher;

        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| UserError::Unknown(format!("Password hashing task failed: {}", e)))?
            .map_err(UserError::from)
    }

    async fn apply_update(
        &self,
        update: &mut dyn UserUpdate,
        id: UserId,
        command: UpdateUserCommand,
    ) -> Result<(), UserError> {
        if let Some(username) = &command.username {
            update.set_username(username).await?;
        }

        if let Some(password) = command.password {
            let password_hash = self.hash_password(password).await?;
            update.set_password_hash(&password_hash).await?;
        }

        if !update.set_admin(command.is_admin).await? {
            return Err(UserError::NotFound(id.0));
        }

        Ok(())
    }
}

#[async_trait]
impl<US> UserServicePort for UserService<US>
where
    US: UserStore,
{
    async fn profile(&self, context: &AuthContext) -> Result<UserSummary, UserError> {
        context
            .claims()
            .map(UserSummary::from)
            .ok_or(UserError::BadRequest)
    }

    async fn find_user_by_id(&self, id: UserId) -> Result<UserSummary, UserError> {
        let user = self
            .store
            .find_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id.0))?;

        if user.is_admin {
            return Err(UserError::CannotDeleteAdmin);
        }
        if user.removed {
            return Err(UserError::AlreadyRemoved);
        }

        Ok(UserSummary::from(&user))
    }

    async fn delete_user_by_id(&self, id: UserId) -> Result<(), UserError> {
        if self.store.soft_delete(id).await? {
            tracing::info!(user_id = %id, "User removed");
        } else {
            tracing::warn!(user_id = %id, "Soft delete matched no removable user");
        }

        Ok(())
    }

    async fn register_user(&self, command: RegisterUserCommand) -> Result<UserRecord, UserError> {
        let password_hash = self.hash_password(command.password).await?;

        let user = self
            .store
            .create(NewUser {
                username: command.username,
                password_hash,
                is_admin: false,
            })
            .await?;

        tracing::info!(user_id = %user.id, username = %user.username, "User registered");

        Ok(user)
    }

    async fn update_user(&self, id: UserId, command: UpdateUserCommand) -> Result<(), UserError> {
        let mut update = self.store.begin_update(id).await?;

        match self.apply_update(update.as_mut(), id, command).await {
            Ok(()) => {
                if let Err(e) = update.commit().await {
                    tracing::error!(user_id = %id, error = ?e, "Failed to commit user update");
                    return Err(e);
                }
                tracing::info!(user_id = %id, "User updated");
                Ok(())
            }
            Err(e) => {
                if let Err(rollback_error) = update.rollback().await {
                    tracing::error!(
                        user_id = %id,
                        error = ?rollback_error,
                        "Failed to roll back user update"
                    );
                }
                Err(e)
            }
        }
    }
}
