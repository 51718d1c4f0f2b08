use super::errors::PasswordError;

/// Password hashing implementation.
///
/// Provides salted, cost-parameterized password hashing (internally uses bcrypt).
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    /// Cost used when none is configured.
    pub const DEFAULT_COST: u32 = 10;

    /// Lowest cost bcrypt accepts.
    pub const MIN_COST: u32 = 4;

    /// Highest cost bcrypt accepts.
    pub const MAX_COST: u32 = 31;

    /// bcrypt only reads the first 72 bytes of its input.
    pub const MAX_PASSWORD_BYTES: usize = 72;

    /// Create a new password hasher with the default cost.
    pub fn new() -> Self {
        Self::with_cost(Self::DEFAULT_COST)
    }

    /// Create a password hasher with an explicit cost factor.
    ///
    /// The cost is validated lazily: an out-of-range value makes every
    /// `hash` call fail with `HashingFailed`.
    pub fn with_cost(cost: u32) -> Self {
        Self { cost }
    }

    /// Configured cost factor.
    pub fn cost(&self) -> u32 {
        self.cost
    }

    /// Hash a plaintext password securely.
    ///
    /// A fresh random salt is generated per call and embedded in the output.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to hash
    ///
    /// # Returns
    /// Modular crypt format hash (`$2b$<cost>$<salt+hash>`)
    ///
    /// # Errors
    /// * `TooLong` - Password exceeds 72 bytes and would be truncated
    /// * `HashingFailed` - Cost out of range or hashing operation failed
    pub fn hash(&self, password: &str) -> Result<String, PasswordError> {
        if password.len() > Self::MAX_PASSWORD_BYTES {
            return Err(PasswordError::TooLong {
                max: Self::MAX_PASSWORD_BYTES,
                actual: password.len(),
            });
        }

        bcrypt::hash(password, self.cost).map_err(|e| PasswordError::HashingFailed(e.to_string()))
    }

    /// Verify a password against a stored hash.
    ///
    /// Comparison of the derived digest is constant-time.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to verify
    /// * `hash` - Stored bcrypt hash
    ///
    /// # Returns
    /// True if password matches, false otherwise
    ///
    /// # Errors
    /// * `VerificationFailed` - Hash format is invalid
    pub fn verify(&self, password: &str, hash: &str) -> Result<bool, PasswordError> {
        bcrypt::verify(password, hash).map_err(|e| {
            PasswordError::VerificationFailed(format!("Invalid password hash: {}", e))
        })
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}
