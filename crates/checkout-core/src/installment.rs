//! # Installment Pricing
//!
//! Builds the financing table shown in the installment picker.
//!
//! ```text
//!  count │ rate %                 │ total
//! ───────┼────────────────────────┼──────────────────────────
//!  1..=3 │ 0                      │ order total
//!  n ≥ 4 │ 1.99 + (n - 3) × 0.5   │ order total × (1 + rate/100)
//! ```
//!
//! Amounts are plain `f64` and never rounded here; rounding to the
//! currency's minor unit is a display concern (see [`crate::money`]).

use serde::{Deserialize, Serialize};

/// Installment count used when the caller does not cap it
pub const DEFAULT_MAX_INSTALLMENTS: u32 = 12;
/// Highest installment count paid without interest
pub const INTEREST_FREE_INSTALLMENTS: u32 = 3;
/// Rate step origin, in percent
pub const BASE_INTEREST_RATE: f64 = 1.99;
/// Rate increase per installment past the interest-free tier, in percent
pub const INTEREST_RATE_STEP: f64 = 0.5;

/// One row of the installment table
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InstallmentOption {
    pub installments: u32,
    /// Amount of each installment
    pub value: f64,
    /// Amount paid over all installments
    pub total: f64,
    /// Interest applied on top of the order total, in percent
    pub interest_rate: f64,
    pub has_interest: bool,
}

impl InstallmentOption {
    /// Interest added on top of the order total
    pub fn interest_amount(&self, order_total: f64) -> f64 {
        self.total - order_total
    }
}

/// Interest rate in percent for a given installment count
pub fn interest_rate_for(installments: u32) -> f64 {
    if installments <= INTEREST_FREE_INSTALLMENTS {
        0.0
    } else {
        let steps = f64::from(installments - INTEREST_FREE_INSTALLMENTS);
        BASE_INTEREST_RATE + steps * INTEREST_RATE_STEP
    }
}

/// Price a single installment count.
pub fn installment_option(total: f64, installments: u32) -> InstallmentOption {
    let has_interest = installments > INTEREST_FREE_INSTALLMENTS;
    let interest_rate = interest_rate_for(installments);
    let financed = if has_interest {
        total * (1.0 + interest_rate / 100.0)
    } else {
        total
    };

    InstallmentOption {
        installments,
        value: financed / f64::from(installments),
        total: financed,
        interest_rate,
        has_interest,
    }
}

/// Build the table for counts `1..=max_installments`, ascending.
///
/// ## Example
/// ```rust
/// use checkout_core::installment::compute_installment_options;
///
/// let options = compute_installment_options(1000.0, 12);
/// assert_eq!(options.len(), 12);
/// assert!(!options[2].has_interest);
/// assert!(options[3].has_interest);
/// ```
pub fn compute_installment_options(total: f64, max_installments: u32) -> Vec<InstallmentOption> {
    (1..=max_installments)
        .map(|count| installment_option(total, count))
        .collect()
}

/// Same as [`compute_installment_options`] with the default cap of 12.
pub fn default_installment_options(total: f64) -> Vec<InstallmentOption> {
    compute_installment_options(total, DEFAULT_MAX_INSTALLMENTS)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn cents(value: f64) -> i64 {
        (value * 100.0).round() as i64
    }

    #[test]
    fn test_interest_free_tier() {
        let options = compute_installment_options(1000.0, 12);
        for option in &options[..3] {
            assert_eq!(option.interest_rate, 0.0);
            assert_eq!(option.total, 1000.0);
            assert!(!option.has_interest);
        }
        assert!(approx(options[2].value, 1000.0 / 3.0));
    }

    #[test]
    fn test_interest_schedule() {
        assert!(approx(interest_rate_for(4), 2.49));
        assert!(approx(interest_rate_for(5), 2.99));
        assert!(approx(interest_rate_for(12), 1.99 + 9.0 * 0.5));
        assert!(approx(interest_rate_for(12), 6.49));

        let options = compute_installment_options(1000.0, 12);
        assert!(approx(options[3].interest_rate, 2.49));
        assert!(approx(options[11].interest_rate, 6.49));
        assert!(options[3..].iter().all(|o| o.has_interest));
    }

    #[test]
    fn test_totals_grow_after_interest_free_tier() {
        let options = compute_installment_options(1000.0, 12);
        for pair in options[2..].windows(2) {
            assert!(pair[1].total > pair[0].total);
            assert!(pair[1].interest_rate > pair[0].interest_rate);
        }
    }

    #[test]
    fn test_count_and_order() {
        for max in [1, 3, 6, 12, 18] {
            let options = compute_installment_options(250.0, max);
            assert_eq!(options.len(), max as usize);
            for (i, option) in options.iter().enumerate() {
                assert_eq!(option.installments, i as u32 + 1);
            }
        }
        assert_eq!(default_installment_options(10.0).len(), 12);
        assert!(compute_installment_options(10.0, 0).is_empty());
    }

    #[test]
    fn test_five_hundred_over_six() {
        let options = compute_installment_options(500.0, 6);
        assert_eq!(options.len(), 6);
        assert_eq!(cents(options[0].total), 50000);
        assert_eq!(options[0].interest_rate, 0.0);

        assert!(approx(options[3].interest_rate, 2.49));
        assert_eq!(cents(options[3].total), 51245);
        assert_eq!(cents(options[3].value), 12811);

        assert!(approx(options[5].interest_rate, 3.49));
        assert_eq!(cents(options[5].total), 51745);
    }

    #[test]
    fn test_per_installment_times_count_is_total() {
        for option in compute_installment_options(715.0, 12) {
            assert!(approx(option.value * f64::from(option.installments), option.total));
            assert!(approx(option.interest_amount(715.0), option.total - 715.0));
        }
    }
}
