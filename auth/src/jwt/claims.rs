use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

/// Identity and timing facts signed into a bearer token.
///
/// Derived from a user record at issuance and never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// User identifier
    #[serde(rename = "sub")]
    pub user_id: i64,

    pub email: String,

    /// Issued at (Unix timestamp)
    #[serde(rename = "iat")]
    pub issued_at: i64,

    /// Expiration time (Unix timestamp)
    #[serde(rename = "exp")]
    pub expires_at: i64,
}

impl Claims {
    /// Build claims for a user, valid for `ttl` from `now`.
    pub fn for_user(user_id: i64, email: impl Into<String>, now: DateTime<Utc>, ttl: Duration) -> Self {
        Self {
            user_id,
            email: email.into(),
            issued_at: now.timestamp(),
            expires_at: (now + ttl).timestamp(),
        }
    }

    /// Check if the claims are expired at the given instant.
    ///
    /// Expiry is exclusive: a token is no longer valid at `exp` itself.
    pub fn is_expired(&self, current_timestamp: i64) -> bool {
        current_timestamp >= self.expires_at
    }
}
