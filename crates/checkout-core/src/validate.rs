//! # Card Validation
//!
//! Checksum and calendar checks on raw field input. Both predicates ignore
//! non-digit characters and answer with a plain `bool`; turning a `false`
//! into a user-facing reason is done in [`crate::field`].

use crate::digits_only;
use chrono::{Datelike, Local, NaiveDate};
use serde::{Deserialize, Serialize};

/// Shortest card number accepted by the checksum check
pub const MIN_CARD_DIGITS: usize = 13;
/// Longest card number accepted by the checksum check
pub const MAX_CARD_DIGITS: usize = 19;

/// Luhn (mod 10) checksum over an all-digit string.
///
/// Returns `false` for anything containing a non-digit.
pub fn luhn_checksum_valid(digits: &str) -> bool {
    let mut sum = 0u32;
    for (i, c) in digits.chars().rev().enumerate() {
        let Some(mut digit) = c.to_digit(10) else {
            return false;
        };
        if i % 2 == 1 {
            digit *= 2;
            if digit > 9 {
                digit -= 9;
            }
        }
        sum += digit;
    }
    sum % 10 == 0
}

/// Compute the Luhn check digit to append to `payload`.
pub fn luhn_check_digit(payload: &str) -> Option<u32> {
    if !payload.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    (0..10).find(|d| luhn_checksum_valid(&format!("{}{}", payload, d)))
}

/// Validate a card number: 13 to 19 digits passing the Luhn checksum.
///
/// ## Example
/// ```rust
/// use checkout_core::validate::is_valid_card_number;
///
/// assert!(is_valid_card_number("4532 0151 1283 0366"));
/// assert!(!is_valid_card_number("4532015112830367"));
/// ```
pub fn is_valid_card_number(raw: &str) -> bool {
    let digits = digits_only(raw);
    if !(MIN_CARD_DIGITS..=MAX_CARD_DIGITS).contains(&digits.len()) {
        return false;
    }
    luhn_checksum_valid(&digits)
}

/// Month and four-digit year parsed from `MMYY` input
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ExpiryDate {
    pub year: i32,
    pub month: u32,
}

impl ExpiryDate {
    /// Parse `MMYY` (separators ignored). Requires exactly four digits and a
    /// month in 1..=12; the year is taken as `20YY`.
    pub fn parse(raw: &str) -> Option<Self> {
        let digits = digits_only(raw);
        if digits.len() != 4 {
            return None;
        }
        let month: u32 = digits[..2].parse().ok()?;
        let year: i32 = digits[2..].parse().ok()?;
        if !(1..=12).contains(&month) {
            return None;
        }
        Some(Self {
            year: 2000 + year,
            month,
        })
    }

    /// A card is good through the last day of its expiry month.
    pub fn is_expired_at(&self, today: NaiveDate) -> bool {
        (self.year, self.month) < (today.year(), today.month())
    }
}

/// Validate an `MM/YY` expiry against the given calendar date.
pub fn is_valid_expiry_at(raw: &str, today: NaiveDate) -> bool {
    ExpiryDate::parse(raw)
        .map(|expiry| !expiry.is_expired_at(today))
        .unwrap_or(false)
}

/// Validate an `MM/YY` expiry against the local clock.
pub fn is_valid_expiry(raw: &str) -> bool {
    is_valid_expiry_at(raw, Local::now().date_naive())
}
