//! # Checkout Configuration
//!
//! Settings the surrounding checkout page needs: the token provider's public
//! key, display locale and currency, and the installment cap. Loaded from
//! environment variables or a `[checkout]` TOML table.

use crate::error::{CheckoutError, CheckoutResult};
use crate::installment::DEFAULT_MAX_INSTALLMENTS;
use crate::money::Currency;
use serde::{Deserialize, Serialize};
use std::env;

/// Highest installment cap accepted from configuration
pub const MAX_CONFIGURABLE_INSTALLMENTS: u32 = 24;

/// Checkout configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckoutConfig {
    /// Public key for the hosted card fields (TEST-... or APP_USR-...)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_key: Option<String>,

    /// Locale passed to the hosted fields
    pub locale: String,

    /// Display currency
    pub currency: Currency,

    /// Installment cap offered in the picker
    pub max_installments: u32,
}

impl Default for CheckoutConfig {
    fn default() -> Self {
        Self {
            public_key: None,
            locale: "pt-BR".to_string(),
            currency: Currency::BRL,
            max_installments: DEFAULT_MAX_INSTALLMENTS,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    checkout: CheckoutConfig,
}

impl CheckoutConfig {
    /// Load configuration from environment variables.
    ///
    /// Optional env vars:
    /// - `CHECKOUT_PUBLIC_KEY`
    /// - `CHECKOUT_LOCALE` (default `pt-BR`)
    /// - `CHECKOUT_CURRENCY` (default `brl`)
    /// - `CHECKOUT_MAX_INSTALLMENTS` (default 12)
    pub fn from_env() -> CheckoutResult<Self> {
        dotenvy::dotenv().ok(); // Load .env file if present
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> CheckoutResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(key) = lookup("CHECKOUT_PUBLIC_KEY").filter(|k| !k.trim().is_empty()) {
            config.public_key = Some(key.trim().to_string());
        }
        if let Some(locale) = lookup("CHECKOUT_LOCALE") {
            config.locale = locale;
        }
        if let Some(currency) = lookup("CHECKOUT_CURRENCY") {
            config.currency = currency.parse()?;
        }
        if let Some(max) = lookup("CHECKOUT_MAX_INSTALLMENTS") {
            config.max_installments = max.trim().parse().map_err(|_| {
                CheckoutError::Configuration(format!(
                    "CHECKOUT_MAX_INSTALLMENTS must be a number, got '{}'",
                    max
                ))
            })?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Load from a TOML document with a `[checkout]` table
    pub fn from_toml(toml_str: &str) -> CheckoutResult<Self> {
        let file: ConfigFile = toml::from_str(toml_str)?;
        file.checkout.validate()?;
        Ok(file.checkout)
    }

    /// Check value ranges and key format
    pub fn validate(&self) -> CheckoutResult<()> {
        if !(1..=MAX_CONFIGURABLE_INSTALLMENTS).contains(&self.max_installments) {
            return Err(CheckoutError::Configuration(format!(
                "max_installments must be between 1 and {}",
                MAX_CONFIGURABLE_INSTALLMENTS
            )));
        }

        if let Some(key) = &self.public_key {
            if !key.starts_with("TEST-") && !key.starts_with("APP_USR-") {
                return Err(CheckoutError::Configuration(
                    "public key must start with TEST- or APP_USR-".to_string(),
                ));
            }
        }

        if self.locale.trim().is_empty() {
            return Err(CheckoutError::Configuration(
                "locale must not be empty".to_string(),
            ));
        }

        Ok(())
    }

    /// Check if using a sandbox key
    pub fn is_test_mode(&self) -> bool {
        self.public_key
            .as_deref()
            .map(|k| k.starts_with("TEST-"))
            .unwrap_or(false)
    }

    /// Builder: set the public key
    pub fn with_public_key(mut self, key: impl Into<String>) -> Self {
        self.public_key = Some(key.into());
        self
    }

    /// Builder: set the installment cap
    pub fn with_max_installments(mut self, max: u32) -> Self {
        self.max_installments = max;
        self
    }
}
