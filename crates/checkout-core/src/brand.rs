//! # Card Brand Detection
//!
//! Maps the leading digits of a card number (the BIN) to a card brand.
//!
//! Detection walks an ordered table of BIN matchers. Each matcher compares a
//! prefix whose width is the digit count of its (lower) bound, so `4` looks at
//! one digit, `51..=55` at two and `506699..=506778` at six. The first match
//! wins, which is why the six-digit Elo and Hipercard ranges are declared
//! before the broad Visa/Mastercard prefixes they overlap with.
//!
//! ```text
//! "4011 78"  ──► digits "401178" ──► Elo  (401178..=401179, width 6)
//! "4111 11"  ──► digits "411111" ──► Visa (4, width 1)
//! "6011 00"  ──► digits "601100" ──► Unknown
//! ```

use crate::digits_only;
use serde::{Deserialize, Serialize};
use tracing::trace;

use self::CardBrand::{Amex, Diners, Elo, Hipercard, Mastercard, Visa};

/// Known card brands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardBrand {
    Visa,
    Mastercard,
    Elo,
    Amex,
    Hipercard,
    Diners,
    Unknown,
}

impl CardBrand {
    /// Stable identifier, also used as the payment method id
    pub fn as_str(&self) -> &'static str {
        match self {
            CardBrand::Visa => "visa",
            CardBrand::Mastercard => "mastercard",
            CardBrand::Elo => "elo",
            CardBrand::Amex => "amex",
            CardBrand::Hipercard => "hipercard",
            CardBrand::Diners => "diners",
            CardBrand::Unknown => "unknown",
        }
    }

    /// Static descriptor for this brand
    pub fn descriptor(&self) -> &'static BrandDescriptor {
        match self {
            CardBrand::Visa => &VISA,
            CardBrand::Mastercard => &MASTERCARD,
            CardBrand::Elo => &ELO,
            CardBrand::Amex => &AMEX,
            CardBrand::Hipercard => &HIPERCARD,
            CardBrand::Diners => &DINERS,
            CardBrand::Unknown => &UNKNOWN,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, CardBrand::Unknown)
    }
}

impl Default for CardBrand {
    fn default() -> Self {
        CardBrand::Unknown
    }
}

impl std::fmt::Display for CardBrand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How a formatted card number is split into blocks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DigitGrouping {
    /// Blocks of four (`4111 1111 1111 1111`)
    Quads,
    /// Fifteen-digit layout (`3782 822463 10005`)
    FourSixFive,
}

/// Immutable metadata for a card brand
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BrandDescriptor {
    pub brand: CardBrand,
    pub display_name: &'static str,
    /// Accent color for card artwork
    pub color: &'static str,
    pub cvv_length: usize,
    /// Valid total digit counts
    pub number_lengths: &'static [usize],
    pub grouping: DigitGrouping,
}

impl BrandDescriptor {
    pub fn accepts_length(&self, length: usize) -> bool {
        self.number_lengths.contains(&length)
    }

    pub fn min_length(&self) -> usize {
        self.number_lengths.iter().copied().min().unwrap_or(16)
    }

    pub fn max_length(&self) -> usize {
        self.number_lengths.iter().copied().max().unwrap_or(16)
    }
}

pub static VISA: BrandDescriptor = BrandDescriptor {
    brand: CardBrand::Visa,
    display_name: "Visa",
    color: "#1A1F71",
    cvv_length: 3,
    number_lengths: &[16],
    grouping: DigitGrouping::Quads,
};

pub static MASTERCARD: BrandDescriptor = BrandDescriptor {
    brand: CardBrand::Mastercard,
    display_name: "Mastercard",
    color: "#EB001B",
    cvv_length: 3,
    number_lengths: &[16],
    grouping: DigitGrouping::Quads,
};

pub static ELO: BrandDescriptor = BrandDescriptor {
    brand: CardBrand::Elo,
    display_name: "Elo",
    color: "#FFCB05",
    cvv_length: 3,
    number_lengths: &[16],
    grouping: DigitGrouping::Quads,
};

pub static AMEX: BrandDescriptor = BrandDescriptor {
    brand: CardBrand::Amex,
    display_name: "American Express",
    color: "#006FCF",
    cvv_length: 4,
    number_lengths: &[15],
    grouping: DigitGrouping::FourSixFive,
};

pub static HIPERCARD: BrandDescriptor = BrandDescriptor {
    brand: CardBrand::Hipercard,
    display_name: "Hipercard",
    color: "#B5121B",
    cvv_length: 3,
    number_lengths: &[16],
    grouping: DigitGrouping::Quads,
};

pub static DINERS: BrandDescriptor = BrandDescriptor {
    brand: CardBrand::Diners,
    display_name: "Diners Club",
    color: "#0079BE",
    cvv_length: 3,
    number_lengths: &[14, 16],
    grouping: DigitGrouping::Quads,
};

pub static UNKNOWN: BrandDescriptor = BrandDescriptor {
    brand: CardBrand::Unknown,
    display_name: "Cartão",
    color: "#6b7280",
    cvv_length: 3,
    number_lengths: &[16],
    grouping: DigitGrouping::Quads,
};

/// Prefix comparison for one BIN table entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinMatcher {
    Exact(u32),
    /// Inclusive bounds; both sides have the same digit width
    Range(u32, u32),
}

impl BinMatcher {
    /// Number of leading digits this matcher compares against
    pub const fn width(&self) -> usize {
        let mut value = match self {
            BinMatcher::Exact(v) => *v,
            BinMatcher::Range(low, _) => *low,
        };
        let mut width = 1;
        while value >= 10 {
            value /= 10;
            width += 1;
        }
        width
    }

    /// Compare against the leading digits of `digits`.
    ///
    /// Inputs shorter than the matcher width are compared as whatever prefix
    /// is available, so `"5"` never matches `51..=55`.
    pub fn matches(&self, digits: &str) -> bool {
        let take = self.width().min(digits.len());
        let prefix: u32 = match digits[..take].parse() {
            Ok(p) => p,
            Err(_) => return false,
        };
        match *self {
            BinMatcher::Exact(value) => prefix == value,
            BinMatcher::Range(low, high) => (low..=high).contains(&prefix),
        }
    }
}

/// One entry of the ordered BIN table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BinRange {
    pub brand: CardBrand,
    pub matcher: BinMatcher,
}

const fn exact(brand: CardBrand, value: u32) -> BinRange {
    BinRange {
        brand,
        matcher: BinMatcher::Exact(value),
    }
}

const fn range(brand: CardBrand, low: u32, high: u32) -> BinRange {
    BinRange {
        brand,
        matcher: BinMatcher::Range(low, high),
    }
}

/// Ordered BIN table. First match wins.
pub static BIN_TABLE: &[BinRange] = &[
    range(Elo, 401178, 401179),
    exact(Elo, 431274),
    exact(Elo, 438935),
    exact(Elo, 451416),
    exact(Elo, 457393),
    range(Elo, 457631, 457632),
    exact(Elo, 504175),
    range(Elo, 506699, 506778),
    range(Elo, 509000, 509999),
    exact(Elo, 627780),
    exact(Elo, 636297),
    exact(Elo, 636368),
    range(Elo, 650031, 650033),
    range(Elo, 650035, 650051),
    range(Elo, 650405, 650439),
    range(Elo, 650485, 650538),
    range(Elo, 650541, 650598),
    range(Elo, 650700, 650718),
    range(Elo, 650720, 650727),
    range(Elo, 650901, 650978),
    range(Elo, 651652, 651679),
    range(Elo, 655000, 655019),
    range(Elo, 655021, 655058),
    exact(Hipercard, 606282),
    exact(Hipercard, 637095),
    exact(Hipercard, 637568),
    exact(Hipercard, 637599),
    exact(Hipercard, 637609),
    exact(Hipercard, 637612),
    exact(Amex, 34),
    exact(Amex, 37),
    range(Diners, 300, 305),
    exact(Diners, 36),
    range(Diners, 38, 39),
    range(Mastercard, 51, 55),
    range(Mastercard, 2221, 2720),
    exact(Visa, 4),
];

/// Detect the card brand from raw user input.
///
/// Non-digit characters are ignored. Always returns a descriptor; input with
/// no digits or an unlisted prefix yields the `Unknown` descriptor.
///
/// ## Example
/// ```rust
/// use checkout_core::brand::{classify_brand, CardBrand};
///
/// assert_eq!(classify_brand("4111 1111 1111 1111").brand, CardBrand::Visa);
/// assert_eq!(classify_brand("").brand, CardBrand::Unknown);
/// ```
pub fn classify_brand(raw: &str) -> &'static BrandDescriptor {
    let digits = digits_only(raw);
    if digits.is_empty() {
        return &UNKNOWN;
    }

    let brand = BIN_TABLE
        .iter()
        .find(|entry| entry.matcher.matches(&digits))
        .map(|entry| entry.brand)
        .unwrap_or(CardBrand::Unknown);

    trace!(brand = %brand, digits = digits.len(), "classified card brand");
    brand.descriptor()
}
