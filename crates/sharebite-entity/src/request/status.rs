//! Request lifecycle status enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::ParseStatusError;

/// Lifecycle state of a food request, driven by the donor.
///
/// Cancellation is not a state: it deletes the record and restores the
/// listing quantity instead of transitioning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "request_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    /// Awaiting a decision from the donor.
    Pending,
    /// Approved by the donor.
    Accepted,
    /// Declined by the donor.
    Rejected,
    /// Handed over.
    Completed,
}

impl RequestStatus {
    /// Return the status as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
            Self::Completed => "completed",
        }
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for RequestStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "accepted" => Ok(Self::Accepted),
            "rejected" => Ok(Self::Rejected),
            "completed" => Ok(Self::Completed),
            _ => Err(ParseStatusError(format!(
                "Invalid request status: '{s}'. Expected one of: pending, accepted, rejected, completed"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_known_statuses() {
        for (text, status) in [
            ("pending", RequestStatus::Pending),
            ("accepted", RequestStatus::Accepted),
            ("rejected", RequestStatus::Rejected),
            ("Completed", RequestStatus::Completed),
        ] {
            assert_eq!(text.parse::<RequestStatus>().unwrap(), status);
        }
    }

    #[test]
    fn parse_rejects_unknown_status() {
        assert!("cancelled".parse::<RequestStatus>().is_err());
        assert!("".parse::<RequestStatus>().is_err());
    }
}
