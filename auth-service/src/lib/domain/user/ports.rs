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

/// Port for user domain service operations.
#[async_trait]
pub trait UserServicePort: Send + Sync + 'static {
    /// Describe the caller from already-verified claims.
    ///
    /// # Errors
    /// * `BadRequest` - Context holds no claims
    async fn profile(&self, context: &AuthContext) -> Result<UserSummary, UserError>;

    /// Look up a user that may be soft-deleted.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `CannotDeleteAdmin` - User is an administrator
    /// * `AlreadyRemoved` - User is already soft-deleted
    /// * `DatabaseError` - Database operation failed
    async fn find_user_by_id(&self, id: UserId) -> Result<UserSummary, UserError>;

    /// Soft-delete a user. Administrators are never marked removed.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn delete_user_by_id(&self, id: UserId) -> Result<(), UserError>;

    /// Hash the password and insert a new non-admin account.
    ///
    /// # Errors
    /// * `Password` - Password hashing failed
    /// * `DatabaseError` - Insert failed, including a taken username
    async fn register_user(&self, command: RegisterUserCommand) -> Result<UserRecord, UserError>;

    /// Apply a partial update atomically.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `Password` - Password hashing failed
    /// * `DatabaseError` - A write, commit or the transaction start failed
    async fn update_user(&self, id: UserId, command: UpdateUserCommand) -> Result<(), UserError>;
}

/// Persistence operations for user records.
#[async_trait]
pub trait UserStore: Send + Sync + 'static {
    /// Retrieve user by username, including soft-deleted ones.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_by_username(&self, username: &str) -> Result<Option<UserRecord>, UserError>;

    /// Retrieve user by identifier, including soft-deleted ones.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_by_id(&self, id: UserId) -> Result<Option<UserRecord>, UserError>;

    /// Persist a new user and return it with its assigned id.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed or username is taken
    async fn create(&self, user: NewUser) -> Result<UserRecord, UserError>;

    /// Set `removed` on a non-admin user.
    ///
    /// # Returns
    /// Whether a record was marked (false for admins and unknown ids)
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn soft_delete(&self, id: UserId) -> Result<bool, UserError>;

    /// Open a transaction that updates the fields of one user.
    ///
    /// # Errors
    /// * `DatabaseError` - Transaction could not be started
    async fn begin_update(&self, id: UserId) -> Result<Box<dyn UserUpdate>, UserError>;
}

/// Field writes against one user inside a single storage transaction.
///
/// Nothing written through this handle is visible to other callers until
/// `commit` succeeds. Dropping the handle without committing discards it.
#[async_trait]
pub trait UserUpdate: Send {
    async fn set_username(&mut self, username: &Username) -> Result<(), UserError>;

    async fn set_password_hash(&mut self, password_hash: &str) -> Result<(), UserError>;

    /// Overwrite the admin flag.
    ///
    /// # Returns
    /// Whether the target user exists
    async fn set_admin(&mut self, is_admin: bool) -> Result<bool, UserError>;

    async fn commit(self: Box<Self>) -> Result<(), UserError>;

    async fn rollback(self: Box<Self>) -> Result<(), UserError>;
}
