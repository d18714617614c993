//! # Checkout Error Types
//!
//! Typed errors for the parts of the checkout that can fail: configuration
//! loading, form submission and the tokenization hand-off. The classifiers,
//! formatters, validators and the pricing engine are total and never return
//! these.

use crate::field::{Field, FieldError, FieldErrors};
use thiserror::Error;

/// Core error type for checkout operations
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CheckoutError {
    /// Configuration errors (missing keys, invalid config)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A single field failed validation
    #[error("Invalid {field}: {reason}")]
    InvalidField { field: Field, reason: FieldError },

    /// One or more form fields failed validation
    #[error("Invalid form: {0}")]
    InvalidForm(FieldErrors),

    /// Selected installment count is not in the offered table
    #[error("Installment count {installments} not offered (max {max})")]
    InstallmentNotOffered { installments: u32, max: u32 },

    /// Order amount is unusable (non-positive, mixed currencies)
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// Token provider failed to produce a card token
    #[error("Tokenization failed [{provider}]: {message}")]
    Tokenization { provider: String, message: String },

    /// Token provider rejected specific fields
    #[error("Token rejected by {provider}: {causes:?}")]
    TokenRejected {
        provider: String,
        causes: Vec<String>,
    },

    /// Token provider could not be reached or is not initialised
    #[error("Payment provider unavailable: {0}")]
    ProviderUnavailable(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl CheckoutError {
    /// Returns true if submitting again may succeed without user changes
    pub fn is_retryable(&self) -> bool {
        matches!(self, CheckoutError::ProviderUnavailable(_))
    }

    /// Stable code for the UI to key messages on
    pub fn code(&self) -> &'static str {
        match self {
            CheckoutError::Configuration(_) => "configuration",
            CheckoutError::InvalidField { .. } => "invalid_field",
            CheckoutError::InvalidForm(_) => "invalid_form",
            CheckoutError::InstallmentNotOffered { .. } => "installment_not_offered",
            CheckoutError::InvalidAmount(_) => "invalid_amount",
            CheckoutError::Tokenization { .. } => "tokenization_failed",
            CheckoutError::TokenRejected { .. } => "token_rejected",
            CheckoutError::ProviderUnavailable(_) => "provider_unavailable",
            CheckoutError::Serialization(_) => "serialization",
        }
    }

    /// Field-level errors carried by this error, if any
    pub fn field_errors(&self) -> Option<FieldErrors> {
        match self {
            CheckoutError::InvalidForm(errors) => Some(errors.clone()),
            CheckoutError::InvalidField { field, reason } => {
                let mut errors = FieldErrors::default();
                errors.set(*field, *reason);
                Some(errors)
            }
            CheckoutError::TokenRejected { causes, .. } => {
                let errors = FieldErrors::from_provider_causes(causes.as_slice());
                (!errors.is_empty()).then_some(errors)
            }
            _ => None,
        }
    }
}

impl From<toml::de::Error> for CheckoutError {
    fn from(err: toml::de::Error) -> Self {
        CheckoutError::Configuration(err.to_string())
    }
}

impl From<serde_json::Error> for CheckoutError {
    fn from(err: serde_json::Error) -> Self {
        CheckoutError::Serialization(err.to_string())
    }
}

/// Result type alias for checkout operations
pub type CheckoutResult<T> = Result<T, CheckoutError>;
