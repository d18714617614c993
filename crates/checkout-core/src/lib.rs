//! # checkout-core
//!
//! Card data validation and installment pricing for the ticket checkout.
//!
//! This crate provides:
//! - `classify_brand` and `classify_bank` for BIN-based card detection
//! - `format_card_number` and `format_expiry` for as-you-type masking
//! - `is_valid_card_number` (Luhn) and `is_valid_expiry`
//! - `compute_installment_options` for the installment picker
//! - `CardForm` and `FieldErrors` for whole-form validation with pt-BR messages
//! - `Checkout` and the `TokenService` trait for handing a validated form to
//!   the payment provider
//!
//! Every function is pure apart from the clock read in the `*_expiry`
//! helpers without an `_at` suffix. Nothing here stores or logs card digits.
//!
//! ## Example
//!
//! ```rust
//! use checkout_core::{classify_brand, compute_installment_options, format_card_number, CardBrand};
//!
//! let brand = classify_brand("4111111111111111");
//! assert_eq!(brand.brand, CardBrand::Visa);
//! assert_eq!(format_card_number("4111111111111111", brand.brand), "4111 1111 1111 1111");
//!
//! let options = compute_installment_options(500.0, 6);
//! assert_eq!(options[2].value, 500.0 / 3.0);
//! ```

pub mod bank;
pub mod brand;
pub mod config;
pub mod error;
pub mod field;
pub mod form;
pub mod format;
pub mod installment;
pub mod money;
pub mod order;
pub mod token;
pub mod validate;

// Re-exports for convenience
pub use bank::{classify_bank, BankDescriptor};
pub use brand::{classify_brand, BrandDescriptor, CardBrand, DigitGrouping};
pub use config::CheckoutConfig;
pub use error::{CheckoutError, CheckoutResult};
pub use field::{card_preview, CardPreview, DocumentKind, Field, FieldError, FieldErrors};
pub use form::{CardForm, Identification, ValidatedCard};
pub use format::{format_card_number, format_expiry};
pub use installment::{
    compute_installment_options, default_installment_options, InstallmentOption,
    DEFAULT_MAX_INSTALLMENTS,
};
pub use money::{format_amount, Currency, Price};
pub use order::{OrderItem, OrderSummary};
pub use token::{
    BoxedTokenService, CardToken, Checkout, Payer, PaymentRequest, TokenRequest, TokenService,
};
pub use validate::{is_valid_card_number, is_valid_expiry, is_valid_expiry_at, ExpiryDate};

/// Strip everything but ASCII digits from raw input.
pub fn digits_only(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).collect()
}
