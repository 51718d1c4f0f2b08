use std::fmt;

use auth::Claims;

use crate::user::errors::UserError;
use crate::user::errors::UsernameError;

/// User unique identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UserId(pub i64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Username value type
///
/// Ensures username is non-empty and at most 64 characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Username(String);

impl Username {
    const MAX_LENGTH: usize = 64;

    /// Create a new valid username.
    ///
    /// # Errors
    /// * `Empty` - Username is empty
    /// * `TooLong` - Username longer than 64 characters
    pub fn new(username: String) -> Result<Self, UsernameError> {
        let length = username.chars().count();
        if length == 0 {
            Err(UsernameError::Empty)
        } else if length > Self::MAX_LENGTH {
            Err(UsernameError::TooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            })
        } else {
            Ok(Self(username))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Persisted user account.
///
/// Records are never hard-deleted; `removed` marks a soft delete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub id: UserId,
    pub username: Username,
    pub password_hash: String,
    pub is_admin: bool,
    pub removed: bool,
}

/// Account fields required to insert a new record.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: Username,
    pub password_hash: String,
    pub is_admin: bool,
}

/// Public view of an account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserSummary {
    pub id: UserId,
    pub username: String,
}

impl From<&Claims> for UserSummary {
    fn from(claims: &Claims) -> Self {
        Self {
            id: UserId(claims.id),
            username: claims.username.clone(),
        }
    }
}

impl From<&UserRecord> for UserSummary {
    fn from(record: &UserRecord) -> Self {
        Self {
            id: record.id,
            username: record.username.as_str().to_string(),
        }
    }
}

/// Command to register a new account.
pub struct RegisterUserCommand {
    pub username: Username,
    pub password: String,
}

impl RegisterUserCommand {
    /// Construct a register command.
    ///
    /// # Errors
    /// * `InvalidUsername` - Username is empty or too long
    /// * `EmptyPassword` - Password is empty
    pub fn new(username: String, password: String) -> Result<Self, UserError> {
        let username = Username::new(username)?;
        if password.is_empty() {
            return Err(UserError::EmptyPassword);
        }
        Ok(Self { username, password })
    }
}

impl fmt::Debug for RegisterUserCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterUserCommand")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Command to update an existing user.
///
/// `username` and `password` are applied only when present. `is_admin` is
/// always written.
pub struct UpdateUserCommand {
    pub username: Option<Username>,
    pub password: Option<String>,
    pub is_admin: bool,
}

impl UpdateUserCommand {
    /// Build an update from raw request fields; empty strings mean "unchanged".
    ///
    /// # Errors
    /// * `InvalidUsername` - Username exceeds the maximum length
    pub fn new(
        username: Option<String>,
        password: Option<String>,
        is_admin: bool,
    ) -> Result<Self, UserError> {
        let username = username
            .filter(|name| !name.is_empty())
            .map(Username::new)
            .transpose()?;
        let password = password.filter(|password| !password.is_empty());

        Ok(Self {
            username,
            password,
            is_admin,
        })
    }
}

impl fmt::Debug for UpdateUserCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UpdateUserCommand")
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("is_admin", &self.is_admin)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_username_validation() {
        assert!(Username::new("alice".to_string()).is_ok());
        assert_eq!(Username::new(String::new()), Err(UsernameError::Empty));
        assert!(matches!(
            Username::new("a".repeat(65)),
            Err(UsernameError::TooLong { max: 64, actual: 65 })
        ));
    }

    #[test]
    fn test_register_command_requires_password() {
        let result = RegisterUserCommand::new("alice".to_string(), String::new());
        assert!(matches!(result, Err(UserError::EmptyPassword)));

        let result = RegisterUserCommand::new(String::new(), "p@ss".to_string());
        assert!(matches!(result, Err(UserError::InvalidUsername(_))));
    }

    #[test]
    fn test_update_command_treats_empty_fields_as_unchanged() {
        let command =
            UpdateUserCommand::new(Some(String::new()), Some(String::new()), true).unwrap();

        assert!(command.username.is_none());
        assert!(command.password.is_none());
        assert!(command.is_admin);
    }

    #[test]
    fn test_commands_do_not_print_passwords() {
        let register = RegisterUserCommand::new("alice".to_string(), "p@ss".to_string()).unwrap();
        let update = UpdateUserCommand::new(None, Some("s3cret".to_string()), false).unwrap();

        assert!(!format!("{:?}", register).contains("p@ss"));
        assert!(!format!("{:?}", update).contains("s3cret"));
    }
}
