//! Token claims issued by the identity provider.

use serde::{Deserialize, Serialize};

/// Claims carried by a verified bearer token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// The principal's email address (subject).
    pub sub: String,
    /// Display name, when the provider includes one.
    #[serde(default)]
    pub name: Option<String>,
    /// Issuer.
    #[serde(default)]
    pub iss: Option<String>,
    /// Issued-at (seconds since epoch).
    pub iat: i64,
    /// Expiry (seconds since epoch).
    pub exp: i64,
}

impl Claims {
    /// The verified principal email.
    pub fn email(&self) -> &str {
        &self.sub
    }
}
