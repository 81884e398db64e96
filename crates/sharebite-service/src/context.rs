//! Request context carrying the authenticated principal.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Context for the current authenticated request.
///
/// Extracted from the verified bearer token and passed into service
/// methods so that every operation knows *who* is acting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    /// The verified principal's email address.
    pub email: String,
    /// Display name from the identity provider, when present.
    pub display_name: Option<String>,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    /// Creates a new request context.
    pub fn new(email: String, display_name: Option<String>) -> Self {
        Self {
            email,
            display_name,
            request_time: Utc::now(),
        }
    }
}
