//! Authentication configuration.

use serde::{Deserialize, Serialize};

/// Authentication and token issuance configuration.
///
/// Constructed once at process start and treated as immutable for the
/// process lifetime.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Secret key for JWT signing (HMAC-SHA256).
    #[serde(default = "default_jwt_secret")]
    pub jwt_secret: String,
    /// Expected `iss` claim on every issued and validated token.
    #[serde(default = "default_issuer")]
    pub jwt_issuer: String,
    /// Expected `aud` claim on every issued and validated token.
    #[serde(default = "default_audience")]
    pub jwt_audience: String,
    /// Access token TTL in minutes.
    #[serde(default = "default_access_ttl")]
    pub access_ttl_minutes: u64,
    /// Days a refresh token outlives the access token it was issued with.
    #[serde(default = "default_refresh_extra_days")]
    pub refresh_extra_days: i64,
    /// Clock-skew tolerance when validating token lifetimes, in seconds.
    #[serde(default = "default_clock_skew")]
    pub clock_skew_seconds: u64,
    /// Minimum password length.
    #[serde(default = "default_password_min")]
    pub password_min_length: usize,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: default_jwt_secret(),
            jwt_issuer: default_issuer(),
            jwt_audience: default_audience(),
            access_ttl_minutes: default_access_ttl(),
            refresh_extra_days: default_refresh_extra_days(),
            clock_skew_seconds: default_clock_skew(),
            password_min_length: default_password_min(),
        }
    }
}

fn default_jwt_secret() -> String {
    "CHANGE_ME_IN_PRODUCTION".to_string()
}

fn default_issuer() -> String {
    "rolegate".to_string()
}

fn default_audience() -> String {
    "rolegate-client".to_string()
}

fn default_access_ttl() -> u64 {
    60
}

fn default_refresh_extra_days() -> i64 {
    7
}

fn default_clock_skew() -> u64 {
    120
}

fn default_password_min() -> usize {
    8
}
