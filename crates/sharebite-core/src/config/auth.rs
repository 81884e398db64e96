//! Identity verification configuration.

use serde::{Deserialize, Serialize};

/// Settings for verifying bearer credentials from the identity provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// HMAC secret shared with the identity provider.
    pub token_secret: String,
    /// Expected token issuer (checked when set).
    #[serde(default)]
    pub issuer: Option<String>,
    /// Clock-skew leeway in seconds when validating expiry.
    #[serde(default = "default_leeway")]
    pub leeway_seconds: u64,
}

fn default_leeway() -> u64 {
    5
}
