//! Browse filters for the available-listings query.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Sort order for browsing available listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ListingSort {
    /// Soonest expiration first (the default).
    #[default]
    ExpiryNearest,
    /// Latest expiration first.
    ExpiryFarthest,
    /// Largest quantity first.
    QuantityHigh,
    /// Smallest quantity first.
    QuantityLow,
    /// Food name A-Z.
    NameAsc,
    /// Food name Z-A.
    NameDesc,
}

impl FromStr for ListingSort {
    type Err = ();

    /// Unknown sort keys fall back to the default rather than failing,
    /// matching the lenient browse behavior.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "expiry-farthest" => Self::ExpiryFarthest,
            "quantity-high" => Self::QuantityHigh,
            "quantity-low" => Self::QuantityLow,
            "name-asc" => Self::NameAsc,
            "name-desc" => Self::NameDesc,
            _ => Self::ExpiryNearest,
        })
    }
}

/// Filters applied when browsing available listings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListingFilter {
    /// Case-insensitive substring match on the food name.
    pub food_name: Option<String>,
    /// Case-insensitive substring match on the location.
    pub location: Option<String>,
    /// Minimum remaining quantity.
    pub min_quantity: Option<i32>,
    /// Maximum remaining quantity.
    pub max_quantity: Option<i32>,
    /// Earliest acceptable expiration date (inclusive).
    pub start_date: Option<chrono::NaiveDate>,
    /// Latest acceptable expiration date (inclusive).
    pub end_date: Option<chrono::NaiveDate>,
    /// Sort order.
    #[serde(default)]
    pub sort: ListingSort,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_sort_falls_back_to_default() {
        assert_eq!(
            "newest".parse::<ListingSort>().unwrap(),
            ListingSort::ExpiryNearest
        );
        assert_eq!(
            "quantity-high".parse::<ListingSort>().unwrap(),
            ListingSort::QuantityHigh
        );
    }
}
