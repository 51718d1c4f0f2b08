use thiserror::Error;

/// Error for Username validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UsernameError {
    #[error("Username must not be empty")]
    Empty,

    #[error("Username too long: maximum {max} characters, got {actual}")]
    TooLong { max: usize, actual: usize },
}

/// Top-level error for all user and token operations.
///
/// Infrastructure variants render as a fixed `server error` message; their
/// payload is only for server-side logs.
#[derive(Debug, Clone, Error)]
pub enum UserError {
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("invalid username: {0}")]
    InvalidUsername(#[from] UsernameError),

    #[error("bad request")]
    BadRequest,

    #[error("password must not be empty")]
    EmptyPassword,

    #[error("no such user")]
    NotFound(i64),

    #[error("you can't delete admin")]
    CannotDeleteAdmin,

    #[error("this user already deleted")]
    AlreadyRemoved,

    #[error("you can't delete yourself")]
    SelfDeleteRejected,

    #[error("server error")]
    Password(#[from] auth::PasswordError),

    #[error("server error")]
    Token(#[from] auth::JwtError),

    #[error("server error")]
    DatabaseError(String),

    #[error("server error")]
    Unknown(String),
}

impl UserError {
    /// Whether the error stems from infrastructure rather than the request.
    pub fn is_server_error(&self) -> bool {
        matches!(
            self,
            UserError::Password(_)
                | UserError::Token(_)
                | UserError::DatabaseError(_)
                | UserError::Unknown(_)
        )
    }
}

impl From<sqlx::Error> for UserError {
    fn from(err: sqlx::Error) -> Self {
        UserError::DatabaseError(err.to_string())
    }
}

impl From<auth::AuthenticationError> for UserError {
    fn from(err: auth::AuthenticationError) -> Self {
        match err {
            auth::AuthenticationError::InvalidCredentials => UserError::InvalidCredentials,
            auth::AuthenticationError::PasswordError(e) => UserError::Password(e),
            auth::AuthenticationError::JwtError(e) => UserError::Token(e),
        }
    }
}
