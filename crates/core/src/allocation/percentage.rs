//! Quantized allocation percentages.
//!
//! Operators pick percentages from a fixed selector, so the only valid
//! values are the multiples of ten from 10 to 100. [`Percentage`] can only
//! hold one of those values; anything else is rejected at construction.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Allowed selector values, in display order.
pub const ALLOWED_PERCENTAGES: [u8; 10] = [10, 20, 30, 40, 50, 60, 70, 80, 90, 100];

/// The sum every bucket's allocation must reach.
pub const REQUIRED_TOTAL: i64 = 100;

/// A percentage drawn from [`ALLOWED_PERCENTAGES`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct Percentage(u8);

/// Returned when a value is outside the quantization set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("percentage must be one of 10, 20, ..., 100, got {0}")]
pub struct InvalidPercentage(pub i64);

impl Percentage {
    /// The whole bucket on one trunk.
    pub const FULL: Percentage = Percentage(100);

    /// Build a percentage, or `None` if `value` is not in the set.
    pub fn new(value: i64) -> Option<Self> {
        ALLOWED_PERCENTAGES
            .iter()
            .copied()
            .find(|&allowed| i64::from(allowed) == value)
            .map(Percentage)
    }

    /// Build a percentage from entered input, which may be fractional.
    pub fn from_number(value: f64) -> Option<Self> {
        if value.fract() != 0.0 || !(0.0..=f64::from(u8::MAX)).contains(&value) {
            return None;
        }
        Self::new(value as i64)
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// Every selectable percentage, ascending.
    pub fn choices() -> impl Iterator<Item = Percentage> {
        ALLOWED_PERCENTAGES.iter().copied().map(Percentage)
    }
}

impl TryFrom<i64> for Percentage {
    type Error = InvalidPercentage;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Percentage::new(value).ok_or(InvalidPercentage(value))
    }
}

impl From<Percentage> for i64 {
    fn from(p: Percentage) -> Self {
        i64::from(p.0)
    }
}

impl From<Percentage> for f64 {
    fn from(p: Percentage) -> Self {
        f64::from(p.0)
    }
}

impl fmt::Display for Percentage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_every_multiple_of_ten() {
        for value in (10..=100).step_by(10) {
            assert_eq!(Percentage::new(value).map(i64::from), Some(value));
        }
    }

    #[test]
    fn rejects_values_outside_the_set() {
        for value in [0, 5, 45, 55, 99, 110, -10] {
            assert!(Percentage::new(value).is_none(), "{value} should be rejected");
        }
        assert_eq!(Percentage::try_from(55), Err(InvalidPercentage(55)));
    }

    #[test]
    fn entered_numbers_must_be_whole_members() {
        assert_eq!(Percentage::from_number(60.0), Percentage::new(60));
        assert_eq!(Percentage::from_number(55.5), None);
        assert_eq!(Percentage::from_number(60.000_001), None);
        assert_eq!(Percentage::from_number(1e300), None);
        assert_eq!(Percentage::from_number(-10.0), None);
    }

    #[test]
    fn choices_cover_the_selector() {
        let values: Vec<u8> = Percentage::choices().map(Percentage::value).collect();
        assert_eq!(values, ALLOWED_PERCENTAGES);
    }

    #[test]
    fn serde_rejects_unquantized_numbers() {
        let p: Percentage = serde_json::from_str("70").unwrap();
        assert_eq!(p.value(), 70);
        assert_eq!(serde_json::to_string(&p).unwrap(), "70");
        assert!(serde_json::from_str::<Percentage>("75").is_err());
    }

    #[test]
    fn displays_with_percent_sign() {
        assert_eq!(Percentage::FULL.to_string(), "100%");
    }
}
