//! Listing availability status enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::ParseStatusError;

/// Availability of a listing.
///
/// A listing is `Unavailable` exactly when no claimable quantity remains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "listing_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ListingStatus {
    /// The listing still has claimable portions.
    Available,
    /// The listing's quantity has been fully reserved.
    Unavailable,
}

impl ListingStatus {
    /// The status implied by a remaining quantity.
    pub fn for_quantity(quantity: i32) -> Self {
        if quantity <= 0 {
            Self::Unavailable
        } else {
            Self::Available
        }
    }

    /// Return the status as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Unavailable => "unavailable",
        }
    }
}

impl fmt::Display for ListingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ListingStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "available" => Ok(Self::Available),
            "unavailable" => Ok(Self::Unavailable),
            _ => Err(ParseStatusError(format!(
                "Invalid listing status: '{s}'. Expected one of: available, unavailable"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_follows_quantity() {
        assert_eq!(ListingStatus::for_quantity(0), ListingStatus::Unavailable);
        assert_eq!(ListingStatus::for_quantity(-1), ListingStatus::Unavailable);
        assert_eq!(ListingStatus::for_quantity(1), ListingStatus::Available);
        assert_eq!(ListingStatus::for_quantity(40), ListingStatus::Available);
    }

    #[test]
    fn parse_round_trip() {
        assert_eq!(
            "available".parse::<ListingStatus>().unwrap(),
            ListingStatus::Available
        );
        assert_eq!(
            "UNAVAILABLE".parse::<ListingStatus>().unwrap(),
            ListingStatus::Unavailable
        );
        assert!("requested".parse::<ListingStatus>().is_err());
    }
}
