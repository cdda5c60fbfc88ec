use chrono::Duration;

use crate::jwt::Claims;
use crate::jwt::TokenError;
use crate::jwt::TokenService;
use crate::password::PasswordError;
use crate::password::PasswordHasher;

/// Lifetime of every issued access token.
pub const DEFAULT_TOKEN_TTL_HOURS: i64 = 2;

/// Authentication coordinator combining password verification and token issuance.
pub struct Authenticator {
    password_hasher: PasswordHasher,
    token_service: TokenService,
    token_ttl: Duration,
}

/// Result of successful authentication.
#[derive(Debug)]
pub struct AuthenticationResult {
    /// Signed bearer token
    pub access_token: String,
}

/// Authentication operation errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthenticationError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Token error: {0}")]
    TokenError(#[from] TokenError),
}

impl Authenticator {
    /// Create an authenticator issuing tokens with the default two-hour lifetime.
    pub fn new(token_secret: &[u8]) -> Self {
        Self::with_ttl(token_secret, Duration::hours(DEFAULT_TOKEN_TTL_HOURS))
    }

    /// Create an authenticator with an explicit token lifetime.
    pub fn with_ttl(token_secret: &[u8], token_ttl: Duration) -> Self {
        Self {
            password_hasher: PasswordHasher::new(),
            token_service: TokenService::new(token_secret),
            token_ttl,
        }
    }

    /// Hash a password for storage.
    ///
    /// # Errors
    /// * `PasswordError` - Hashing operation failed
    pub fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        self.password_hasher.hash(password)
    }

    /// Verify credentials and issue a token for the user.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to verify
    /// * `stored_hash` - Stored password hash
    /// * `user_id` - Identifier embedded in the token
    /// * `email` - Email embedded in the token
    ///
    /// # Errors
    /// * `InvalidCredentials` - Password does not match (or the hash is unreadable)
    /// * `TokenError` - Token generation failed
    pub fn authenticate(
        &self,
        password: &str,
        stored_hash: &str,
        user_id: i64,
        email: &str,
    ) -> Result<AuthenticationResult, AuthenticationError> {
        if !self.password_hasher.verify(password, stored_hash) {
            return Err(AuthenticationError::InvalidCredentials);
        }

        let access_token = self.token_service.issue(user_id, email, self.token_ttl)?;

        Ok(AuthenticationResult { access_token })
    }

    /// Reject a login for an account that does not exist.
    ///
    /// Performs the same hashing work as a failed `authenticate` call. The
    /// decoy result is discarded: the decoy never matches, only its cost matters.
    pub fn reject_unknown(&self, password: &str) -> AuthenticationError {
        let _ = self.password_hasher.verify_decoy(password);
        AuthenticationError::InvalidCredentials
    }

    /// Validate a bearer token and return its claims.
    ///
    /// # Errors
    /// * `TokenError` - Token is malformed, forged or expired
    pub fn validate_token(&self, token: &str) -> Result<Claims, TokenError> {
        self.token_service.verify(token)
    }
}
