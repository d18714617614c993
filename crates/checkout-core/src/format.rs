//! # Input Formatting
//!
//! Keystroke-level display formatting for the card number and expiry
//! fields. Both functions strip non-digits first, so feeding their own
//! output back in gives the same result.

use crate::brand::{CardBrand, DigitGrouping};
use crate::digits_only;

/// Group a card number for display.
///
/// Fifteen-digit brands use `4-6-5`, everything else blocks of four. Digits
/// past the last block are kept as a trailing group; truncating overlong
/// input is left to the caller.
///
/// ## Example
/// ```rust
/// use checkout_core::brand::CardBrand;
/// use checkout_core::format::format_card_number;
///
/// assert_eq!(format_card_number("4111111111111111", CardBrand::Visa), "4111 1111 1111 1111");
/// assert_eq!(format_card_number("378282246310005", CardBrand::Amex), "3782 822463 10005");
/// ```
pub fn format_card_number(raw: &str, brand: CardBrand) -> String {
    let digits = digits_only(raw);

    let blocks: &[usize] = match brand.descriptor().grouping {
        DigitGrouping::FourSixFive => &[4, 6, 5],
        DigitGrouping::Quads => &[],
    };

    let mut groups: Vec<&str> = Vec::new();
    let mut rest = digits.as_str();
    for &size in blocks {
        if rest.is_empty() {
            break;
        }
        let (head, tail) = rest.split_at(size.min(rest.len()));
        groups.push(head);
        rest = tail;
    }
    while !rest.is_empty() {
        let (head, tail) = rest.split_at(4.min(rest.len()));
        groups.push(head);
        rest = tail;
    }

    groups.join(" ")
}

/// Format an expiry as `MM/YY`.
///
/// With fewer than two digits the digits are returned as-is; with two or
/// three the year part is partial (`"12/"`, `"12/2"`). Digits beyond the
/// fourth are dropped. No calendar validation happens here.
pub fn format_expiry(raw: &str) -> String {
    let digits = digits_only(raw);
    if digits.len() < 2 {
        return digits;
    }
    let (month, year) = digits.split_at(2);
    format!("{}/{}", month, &year[..year.len().min(2)])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quad_grouping() {
        assert_eq!(format_card_number("", CardBrand::Visa), "");
        assert_eq!(format_card_number("4", CardBrand::Visa), "4");
        assert_eq!(format_card_number("41111", CardBrand::Visa), "4111 1");
        assert_eq!(
            format_card_number("5500000000000004", CardBrand::Mastercard),
            "5500 0000 0000 0004"
        );
        assert_eq!(
            format_card_number("30569309025904", CardBrand::Diners),
            "3056 9309 0259 04"
        );
        assert_eq!(
            format_card_number("6011000000000000", CardBrand::Unknown),
            "6011 0000 0000 0000"
        );
    }

    #[test]
    fn test_amex_grouping() {
        assert_eq!(format_card_number("3782", CardBrand::Amex), "3782");
        assert_eq!(format_card_number("37828", CardBrand::Amex), "3782 8");
        assert_eq!(
            format_card_number("3782822463", CardBrand::Amex),
            "3782 822463"
        );
        assert_eq!(
            format_card_number("378282246310005", CardBrand::Amex),
            "3782 822463 10005"
        );
    }

    #[test]
    fn test_overlong_input_is_not_truncated() {
        assert_eq!(
            format_card_number("3782822463100051", CardBrand::Amex),
            "3782 822463 10005 1"
        );
        assert_eq!(
            format_card_number("41111111111111112222", CardBrand::Visa),
            "4111 1111 1111 1111 2222"
        );
    }

    #[test]
    fn test_card_number_idempotent() {
        let inputs = [
            "",
            "4",
            "4111 11",
            "411111111111111122",
            "3782-822463-10005",
            "37828224631000512",
        ];
        for brand in [CardBrand::Visa, CardBrand::Amex, CardBrand::Unknown] {
            for input in inputs {
                let once = format_card_number(input, brand);
                assert_eq!(
                    format_card_number(&once, brand),
                    once,
                    "{} / {}",
                    input,
                    brand
                );
            }
        }
    }

    #[test]
    fn test_format_expiry() {
        assert_eq!(format_expiry(""), "");
        assert_eq!(format_expiry("1"), "1");
        assert_eq!(format_expiry("12"), "12/");
        assert_eq!(format_expiry("122"), "12/2");
        assert_eq!(format_expiry("1225"), "12/25");
        assert_eq!(format_expiry("122599"), "12/25");
        assert_eq!(format_expiry("13/99"), "13/99");
    }

    #[test]
    fn test_expiry_idempotent() {
        for input in ["", "0", "06", "062", "0625", "06/25"] {
            let once = format_expiry(input);
            assert_eq!(format_expiry(&once), once);
        }
    }
}
