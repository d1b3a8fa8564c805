//! OAuth client-credentials token handling

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Token endpoint the form is posted to
pub const TOKEN_URL: &str = "https://appleid.apple.com/auth/oauth2/token";

/// Scope requested for reporting access
pub const TOKEN_SCOPE: &str = "searchadsorg";

/// A token is treated as expired this long before it actually is
pub const EXPIRY_BUFFER_SECS: i64 = 60;

/// Longest lifetime honoured from a token response
pub const MAX_TOKEN_LIFETIME_SECS: i64 = 24 * 60 * 60;

/// Token endpoint response
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    /// Lifetime in seconds
    pub expires_in: i64,
    #[serde(default)]
    pub token_type: Option<String>,
}

impl TokenResponse {
    /// Stamp the token with its expiry as seen from `now`.
    ///
    /// The lifetime is clamped to `0..=MAX_TOKEN_LIFETIME_SECS`, so a
    /// non-positive `expires_in` yields a token that is already expired.
    pub fn into_access_token(self, now: DateTime<Utc>) -> AccessToken {
        let lifetime = self.expires_in.saturating_sub(EXPIRY_BUFFER_SECS);
        if lifetime > MAX_TOKEN_LIFETIME_SECS {
            warn!(expires_in = self.expires_in, "Token lifetime clamped");
        }
        let expires_at = Duration::try_seconds(lifetime.clamp(0, MAX_TOKEN_LIFETIME_SECS))
            .and_then(|lifetime| now.checked_add_signed(lifetime))
            .unwrap_or(now);

        AccessToken {
            expires_at,
            access_token: self.access_token,
        }
    }
}

/// A bearer token with a known expiry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessToken {
    pub access_token: String,
    pub expires_at: DateTime<Utc>,
}

impl AccessToken {
    pub fn is_valid(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }

    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.access_token)
    }
}

/// Form fields of a client-credentials token request
pub fn token_form<'a>(client_id: &'a str, client_secret: &'a str) -> [(&'static str, &'a str); 4] {
    [
        ("grant_type", "client_credentials"),
        ("client_id", client_id),
        ("client_secret", client_secret),
        ("scope", TOKEN_SCOPE),
    ]
}
