//! # checkout-wasm
//!
//! WebAssembly bindings for ticket-checkout-rs.
//!
//! This crate provides WASM-compatible functions for:
//! - Detecting brand and issuing bank while the card number is typed
//! - Masking the card number, expiry and document inputs
//! - Validating card number and expiry client-side
//! - Building the installment picker
//!
//! ## Usage (JavaScript)
//!
//! ```javascript
//! import init, { classify_brand, format_card_number, installment_options } from 'ticket-checkout-wasm';
//!
//! await init();
//!
//! input.value = format_card_number(input.value);
//! const brand = classify_brand(input.value); // { brand: 'visa', display_name: 'Visa', ... }
//! const options = installment_options(715.0, 12);
//! ```
//!
//! ## Building
//!
//! ```bash
//! wasm-pack build --target web
//! ```

use checkout_core::field::{self, DocumentKind};
use checkout_core::{
    bank, brand, compute_installment_options, format_amount, validate, Currency,
    InstallmentOption, DEFAULT_MAX_INSTALLMENTS,
};
use chrono::NaiveDate;
use serde::Serialize;
use wasm_bindgen::prelude::*;

/// Initialize the WASM module (called automatically)
#[wasm_bindgen(start)]
pub fn init() {
    // Set up panic hook for better error messages
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Brand badge data for the card preview
#[derive(Debug, Serialize)]
pub struct BrandView {
    brand: &'static str,
    display_name: &'static str,
    color: &'static str,
    cvv_length: usize,
    max_length: usize,
}

impl BrandView {
    fn detect(raw: &str) -> Self {
        let descriptor = brand::classify_brand(raw);
        Self {
            brand: descriptor.brand.as_str(),
            display_name: descriptor.display_name,
            color: descriptor.color,
            cvv_length: descriptor.cvv_length,
            max_length: descriptor.max_length(),
        }
    }
}

/// Installment row as the picker renders it
#[derive(Debug, Serialize)]
pub struct InstallmentView {
    installments: u32,
    value: f64,
    total: f64,
    interest_rate: f64,
    has_interest: bool,
    label: String,
}

impl InstallmentView {
    fn from_option(option: &InstallmentOption, currency: Currency) -> Self {
        // a single payment is not advertised as interest-free
        let suffix = if option.has_interest {
            format!(" ({} total)", format_amount(option.total, currency))
        } else if option.installments > 1 {
            " sem juros".to_string()
        } else {
            String::new()
        };
        Self {
            installments: option.installments,
            value: option.value,
            total: option.total,
            interest_rate: option.interest_rate,
            has_interest: option.has_interest,
            label: format!(
                "{}x de {}{}",
                option.installments,
                format_amount(option.value, currency),
                suffix
            ),
        }
    }
}

fn installment_views(total: f64, max: Option<u32>) -> Vec<InstallmentView> {
    compute_installment_options(total, max.unwrap_or(DEFAULT_MAX_INSTALLMENTS))
        .iter()
        .map(|option| InstallmentView::from_option(option, Currency::BRL))
        .collect()
}

/// Browser's local calendar date
fn today_from_js() -> Option<NaiveDate> {
    let now = js_sys::Date::new_0();
    NaiveDate::from_ymd_opt(
        now.get_full_year() as i32,
        now.get_month() + 1,
        now.get_date(),
    )
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value)
        .map_err(|e| JsValue::from_str(&format!("Serialization failed: {}", e)))
}

/// Detect the card brand from the raw card number input
#[wasm_bindgen]
pub fn classify_brand(raw: &str) -> Result<JsValue, JsValue> {
    to_js(&BrandView::detect(raw))
}

/// Detect the issuing bank; `null` when unknown or fewer than four digits
#[wasm_bindgen]
pub fn classify_bank(raw: &str) -> Result<JsValue, JsValue> {
    match bank::classify_bank(raw) {
        Some(bank) => to_js(bank),
        None => Ok(JsValue::NULL),
    }
}

/// Mask the card number using the brand detected from the same input
#[wasm_bindgen]
pub fn format_card_number(raw: &str) -> String {
    let brand = brand::classify_brand(raw).brand;
    checkout_core::format_card_number(raw, brand)
}

/// Mask the expiry input as `MM/YY`
#[wasm_bindgen]
pub fn format_expiry(raw: &str) -> String {
    checkout_core::format_expiry(raw)
}

/// Mask a CPF (`cpf`) or CNPJ (`cnpj`) input
#[wasm_bindgen]
pub fn format_document(kind: &str, raw: &str) -> Result<String, JsValue> {
    let kind: DocumentKind = kind
        .parse()
        .map_err(|e| JsValue::from_str(&format!("{}", e)))?;
    Ok(field::format_document(kind, raw))
}

/// Text for the card preview, with placeholders for untyped fields
#[wasm_bindgen]
pub fn card_preview(
    card_number: &str,
    card_holder: &str,
    expiration_date: &str,
    security_code: &str,
) -> Result<JsValue, JsValue> {
    to_js(&field::card_preview(
        card_number,
        card_holder,
        expiration_date,
        security_code,
    ))
}

/// Luhn check with length bounds
#[wasm_bindgen]
pub fn is_valid_card_number(raw: &str) -> bool {
    validate::is_valid_card_number(raw)
}

/// Expiry check against the browser's local date
#[wasm_bindgen]
pub fn is_valid_expiry(raw: &str) -> bool {
    match today_from_js() {
        Some(today) => validate::is_valid_expiry_at(raw, today),
        None => false,
    }
}

/// Installment picker rows for an order total
#[wasm_bindgen]
pub fn installment_options(total: f64, max: Option<u32>) -> Result<JsValue, JsValue> {
    to_js(&installment_views(total, max))
}

/// Format an amount in reais for display
#[wasm_bindgen]
pub fn format_price(amount: f64) -> String {
    format_amount(amount, Currency::BRL)
}

/// Log to browser console
#[wasm_bindgen]
pub fn log(message: &str) {
    web_sys::console::log_1(&JsValue::from_str(message));
}

/// Get library version
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}


#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use js_sys::{Array, Reflect};
    use wasm_bindgen_test::*;

    fn get(value: &JsValue, key: &str) -> JsValue {
        Reflect::get(value, &JsValue::from_str(key)).unwrap()
    }

    #[wasm_bindgen_test]
    fn test_classify_brand_object() {
        let value = classify_brand("4011 78").unwrap();
        assert_eq!(get(&value, "brand").as_string().as_deref(), Some("elo"));
        assert_eq!(get(&value, "cvv_length").as_f64(), Some(3.0));

        let value = classify_brand("").unwrap();
        assert_eq!(get(&value, "brand").as_string().as_deref(), Some("unknown"));
    }

    #[wasm_bindgen_test]
    fn test_classify_bank_null_until_four_digits() {
        assert!(classify_bank("438").unwrap().is_null());
        assert!(classify_bank("9999 0000").unwrap().is_null());

        let value = classify_bank("4389 35").unwrap();
        assert_eq!(get(&value, "name").as_string().as_deref(), Some("Bradesco"));
    }

    #[wasm_bindgen_test]
    fn test_installment_options_rows() {
        let rows = Array::from(&installment_options(300.0, None).unwrap());
        assert_eq!(rows.length(), 12);

        let first = rows.get(0);
        assert_eq!(get(&first, "installments").as_f64(), Some(1.0));
        assert_eq!(get(&first, "has_interest").as_bool(), Some(false));
        assert_eq!(
            get(&first, "label").as_string().as_deref(),
            Some("1x de R$ 300,00")
        );

        let fourth = rows.get(3);
        assert_eq!(get(&fourth, "has_interest").as_bool(), Some(true));

        let capped = Array::from(&installment_options(300.0, Some(4)).unwrap());
        assert_eq!(capped.length(), 4);
    }

    #[wasm_bindgen_test]
    fn test_card_preview_object() {
        let value = card_preview("", "", "", "12").unwrap();
        assert_eq!(
            get(&value, "number").as_string().as_deref(),
            Some("•••• •••• •••• ••••")
        );
        assert_eq!(
            get(&value, "holder").as_string().as_deref(),
            Some("NOME DO TITULAR")
        );
        assert_eq!(
            get(&value, "security_code").as_string().as_deref(),
            Some("••")
        );
    }

    #[wasm_bindgen_test]
    fn test_expiry_against_browser_clock() {
        assert!(is_valid_expiry("12/99"));
        assert!(!is_valid_expiry("01/00"));
    }
}
