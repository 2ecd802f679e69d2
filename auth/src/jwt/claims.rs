use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

/// Session token claims.
///
/// Carries the authenticated subject and the validity window. Both timestamps
/// are Unix seconds, as required by RFC 7519.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Subject (user identifier)
    pub sub: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// Create claims for a user, issued now and expiring after `expiration_hours`.
    pub fn for_user(user_id: impl ToString, expiration_hours: i64) -> Self {
        Self::issued_at(user_id, Utc::now(), expiration_hours)
    }

    /// Create claims for a user with an explicit issue time.
    ///
    /// # Arguments
    /// * `user_id` - Unique user identifier, stored as `sub`
    /// * `issued_at` - Issue instant
    /// * `expiration_hours` - Hours until the token expires
    pub fn issued_at(
        user_id: impl ToString,
        issued_at: DateTime<Utc>,
        expiration_hours: i64,
    ) -> Self {
        let expiration = issued_at + Duration::hours(expiration_hours);

        Self {
            sub: user_id.to_string(),
            iat: issued_at.timestamp(),
            exp: expiration.timestamp(),
        }
    }

}

/// Claims carrying an expiration instant.
///
/// A token is valid only strictly before its `exp`; at `exp` itself it is
/// already expired.
pub trait Expiring {
    /// Expiration time (Unix timestamp).
    fn expires_at(&self) -> i64;

    fn is_expired(&self, current_timestamp: i64) -> bool {
        self.expires_at() <= current_timestamp
    }
}

impl Expiring for Claims {
    fn expires_at(&self) -> i64 {
        self.exp
    }
}
