//! # Field Rules
//!
//! Turns raw field input into a per-field verdict the checkout form can show
//! next to each input. Each check answers with a [`FieldError`] code; the UI
//! text for a code lives in [`message`].
//!
//! ```text
//! raw input ──► check_*() ──► Ok(..)            field is clean
//!                        └──► Err(FieldError)   message(field, code)
//! ```

use crate::brand::{classify_brand, BrandDescriptor, CardBrand};
use crate::digits_only;
use crate::error::CheckoutError;
use crate::format::{format_card_number, format_expiry};
use crate::validate::{luhn_checksum_valid, ExpiryDate, MIN_CARD_DIGITS};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Placeholder shown on the card preview before any number is typed
pub const CARD_NUMBER_PLACEHOLDER: &str = "•••• •••• •••• ••••";
/// Placeholder shown on the card preview before an expiry is typed
pub const EXPIRY_PLACEHOLDER: &str = "MM/AA";
/// Placeholder shown on the card preview before a holder name is typed
pub const HOLDER_PLACEHOLDER: &str = "NOME DO TITULAR";
/// Placeholder shown on the back of the card preview before a CVV is typed
pub const SECURITY_CODE_PLACEHOLDER: &str = "•••";

/// Checkout form fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    CardNumber,
    ExpirationDate,
    SecurityCode,
    CardHolder,
    DocNumber,
}

impl Field {
    pub const ALL: [Field; 5] = [
        Field::CardNumber,
        Field::ExpirationDate,
        Field::SecurityCode,
        Field::CardHolder,
        Field::DocNumber,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Field::CardNumber => "card_number",
            Field::ExpirationDate => "expiration_date",
            Field::SecurityCode => "security_code",
            Field::CardHolder => "card_holder",
            Field::DocNumber => "doc_number",
        }
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Why a field is not acceptable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldError {
    Empty,
    Invalid,
    Incomplete,
    /// Card brand not accepted
    InvalidType,
    Expired,
}

impl FieldError {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldError::Empty => "empty",
            FieldError::Invalid => "invalid",
            FieldError::Incomplete => "incomplete",
            FieldError::InvalidType => "invalid_type",
            FieldError::Expired => "expired",
        }
    }
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// User-facing message for a field error.
pub fn message(field: Field, error: FieldError) -> &'static str {
    use FieldError::*;
    match (field, error) {
        (Field::CardNumber, Empty) => "Digite o número do cartão",
        (Field::CardNumber, Invalid) => "Número do cartão inválido",
        (Field::CardNumber, Incomplete) => "Número do cartão incompleto",
        (Field::CardNumber, InvalidType) => "Bandeira não suportada",
        (Field::ExpirationDate, Empty) => "Digite a validade",
        (Field::ExpirationDate, Invalid) => "Validade inválida",
        (Field::ExpirationDate, Incomplete) => "Validade incompleta",
        (Field::ExpirationDate, Expired) => "Cartão expirado",
        (Field::SecurityCode, Empty) => "Digite o CVV",
        (Field::SecurityCode, Invalid) => "CVV inválido",
        (Field::SecurityCode, Incomplete) => "CVV incompleto",
        (Field::CardHolder, Empty | Incomplete) => "Digite o nome completo",
        (Field::CardHolder, Invalid) => "Nome inválido",
        (Field::DocNumber, Empty) => "Digite o documento",
        (Field::DocNumber, Invalid | Incomplete) => "Documento inválido",
        _ => "Campo inválido",
    }
}

/// Identity document accepted for the payer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DocumentKind {
    Cpf,
    Cnpj,
}

impl DocumentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentKind::Cpf => "CPF",
            DocumentKind::Cnpj => "CNPJ",
        }
    }

    pub fn digit_count(&self) -> usize {
        match self {
            DocumentKind::Cpf => 11,
            DocumentKind::Cnpj => 14,
        }
    }

    /// Separator to insert before the digit at each index
    fn separators(&self) -> &'static [(usize, char)] {
        match self {
            DocumentKind::Cpf => &[(3, '.'), (6, '.'), (9, '-')],
            DocumentKind::Cnpj => &[(2, '.'), (5, '.'), (8, '/'), (12, '-')],
        }
    }
}

impl Default for DocumentKind {
    fn default() -> Self {
        DocumentKind::Cpf
    }
}

impl FromStr for DocumentKind {
    type Err = CheckoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "CPF" => Ok(DocumentKind::Cpf),
            "CNPJ" => Ok(DocumentKind::Cnpj),
            _ => Err(CheckoutError::InvalidField {
                field: Field::DocNumber,
                reason: FieldError::InvalidType,
            }),
        }
    }
}

/// Per-field errors collected from a whole form
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldErrors {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card_number: Option<FieldError>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration_date: Option<FieldError>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub security_code: Option<FieldError>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card_holder: Option<FieldError>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc_number: Option<FieldError>,
}

impl FieldErrors {
    fn slot(&mut self, field: Field) -> &mut Option<FieldError> {
        match field {
            Field::CardNumber => &mut self.card_number,
            Field::ExpirationDate => &mut self.expiration_date,
            Field::SecurityCode => &mut self.security_code,
            Field::CardHolder => &mut self.card_holder,
            Field::DocNumber => &mut self.doc_number,
        }
    }

    pub fn get(&self, field: Field) -> Option<FieldError> {
        match field {
            Field::CardNumber => self.card_number,
            Field::ExpirationDate => self.expiration_date,
            Field::SecurityCode => self.security_code,
            Field::CardHolder => self.card_holder,
            Field::DocNumber => self.doc_number,
        }
    }

    pub fn set(&mut self, field: Field, error: FieldError) {
        *self.slot(field) = Some(error);
    }

    pub fn clear(&mut self, field: Field) {
        *self.slot(field) = None;
    }

    /// Record the outcome of a check, keeping its success value
    pub fn record<T>(&mut self, field: Field, result: Result<T, FieldError>) -> Option<T> {
        match result {
            Ok(value) => {
                self.clear(field);
                Some(value)
            }
            Err(error) => {
                self.set(field, error);
                None
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    pub fn count(&self) -> usize {
        self.iter().count()
    }

    /// Failing fields in form order
    pub fn iter(&self) -> impl Iterator<Item = (Field, FieldError)> + '_ {
        Field::ALL
            .into_iter()
            .filter_map(|field| self.get(field).map(|error| (field, error)))
    }

    /// Failing fields with their display message
    pub fn messages(&self) -> Vec<(Field, &'static str)> {
        self.iter()
            .map(|(field, error)| (field, message(field, error)))
            .collect()
    }

    /// Map provider rejection cause codes back onto form fields.
    ///
    /// Unknown codes are ignored.
    pub fn from_provider_causes<S: AsRef<str>>(causes: &[S]) -> Self {
        let mut errors = Self::default();
        for cause in causes {
            let field = match cause.as_ref() {
                "316" => Field::CardHolder,
                "324" => Field::DocNumber,
                "E301" => Field::CardNumber,
                "E302" => Field::SecurityCode,
                _ => continue,
            };
            errors.set(field, FieldError::Invalid);
        }
        errors
    }
}

impl std::fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<String> = self
            .iter()
            .map(|(field, error)| format!("{}={}", field, error))
            .collect();
        write!(f, "{}", parts.join(", "))
    }
}

/// Check a card number field, returning the detected brand.
///
/// ## Rules
/// - No digits → `Empty`
/// - Shorter than the brand's shortest length → `Incomplete`
/// - Failing Luhn, or a length the brand does not issue → `Invalid`
/// - Unrecognised BIN → `InvalidType`
pub fn check_card_number(raw: &str) -> Result<&'static BrandDescriptor, FieldError> {
    let digits = digits_only(raw);
    if digits.is_empty() {
        return Err(FieldError::Empty);
    }

    let brand = classify_brand(&digits);
    let min = if brand.brand.is_known() {
        brand.min_length()
    } else {
        MIN_CARD_DIGITS
    };
    if digits.len() < min {
        return Err(FieldError::Incomplete);
    }
    if !luhn_checksum_valid(&digits) {
        return Err(FieldError::Invalid);
    }
    if !brand.brand.is_known() {
        return Err(FieldError::InvalidType);
    }
    if !brand.accepts_length(digits.len()) {
        return Err(FieldError::Invalid);
    }

    Ok(brand)
}

/// Check an expiry field against the given date.
pub fn check_expiry_at(raw: &str, today: NaiveDate) -> Result<ExpiryDate, FieldError> {
    let digits = digits_only(raw);
    match digits.len() {
        0 => return Err(FieldError::Empty),
        1..=3 => return Err(FieldError::Incomplete),
        4 => {}
        _ => return Err(FieldError::Invalid),
    }

    let expiry = ExpiryDate::parse(&digits).ok_or(FieldError::Invalid)?;
    if expiry.is_expired_at(today) {
        return Err(FieldError::Expired);
    }
    Ok(expiry)
}

/// Check an expiry field against the local clock.
pub fn check_expiry(raw: &str) -> Result<ExpiryDate, FieldError> {
    check_expiry_at(raw, Local::now().date_naive())
}

/// Check a security code against the brand's CVV length.
pub fn check_security_code(raw: &str, brand: &BrandDescriptor) -> Result<(), FieldError> {
    let code = raw.trim();
    if code.is_empty() {
        return Err(FieldError::Empty);
    }
    if !code.chars().all(|c| c.is_ascii_digit()) {
        return Err(FieldError::Invalid);
    }
    match code.len().cmp(&brand.cvv_length) {
        std::cmp::Ordering::Less => Err(FieldError::Incomplete),
        std::cmp::Ordering::Greater => Err(FieldError::Invalid),
        std::cmp::Ordering::Equal => Ok(()),
    }
}

/// Check the card holder name; at least first and last name are required.
///
/// Returns the name normalised to upper case with single spaces.
pub fn check_card_holder(raw: &str) -> Result<String, FieldError> {
    let words: Vec<&str> = raw.split_whitespace().collect();
    match words.len() {
        0 => Err(FieldError::Empty),
        1 => Err(FieldError::Incomplete),
        _ => Ok(words.join(" ").to_uppercase()),
    }
}

/// Check a payer document number, returning its digits.
pub fn check_document(kind: DocumentKind, raw: &str) -> Result<String, FieldError> {
    let digits = digits_only(raw);
    if digits.is_empty() {
        return Err(FieldError::Empty);
    }
    match digits.len().cmp(&kind.digit_count()) {
        std::cmp::Ordering::Less => Err(FieldError::Incomplete),
        std::cmp::Ordering::Greater => Err(FieldError::Invalid),
        std::cmp::Ordering::Equal => Ok(digits),
    }
}

/// Format a document number as it is typed (`000.000.000-00` for CPF,
/// `00.000.000/0000-00` for CNPJ). Digits past the document length are
/// dropped.
pub fn format_document(kind: DocumentKind, raw: &str) -> String {
    let digits = digits_only(raw);
    let separators = kind.separators();
    let mut formatted = String::with_capacity(digits.len() + separators.len());

    for (i, c) in digits.chars().take(kind.digit_count()).enumerate() {
        if let Some((_, sep)) = separators.iter().find(|(at, _)| *at == i) {
            formatted.push(*sep);
        }
        formatted.push(c);
    }
    formatted
}

/// Mask a security code for the card preview, one bullet per character.
pub fn mask_security_code(raw: &str) -> String {
    if raw.is_empty() {
        return SECURITY_CODE_PLACEHOLDER.to_string();
    }
    "•".repeat(raw.chars().count())
}

/// Text drawn on the card preview next to the form
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardPreview {
    pub brand: CardBrand,
    pub number: String,
    pub holder: String,
    pub expiry: String,
    pub security_code: String,
}

/// Build the card preview from the raw form inputs, falling back to the
/// placeholders for anything not typed yet.
pub fn card_preview(
    card_number: &str,
    card_holder: &str,
    expiration_date: &str,
    security_code: &str,
) -> CardPreview {
    let brand = classify_brand(card_number).brand;
    let number = format_card_number(card_number, brand);
    let holder = card_holder.trim().to_uppercase();
    let expiry = format_expiry(expiration_date);

    CardPreview {
        brand,
        number: or_placeholder(number, CARD_NUMBER_PLACEHOLDER),
        holder: or_placeholder(holder, HOLDER_PLACEHOLDER),
        expiry: or_placeholder(expiry, EXPIRY_PLACEHOLDER),
        security_code: mask_security_code(security_code),
    }
}

fn or_placeholder(value: String, placeholder: &str) -> String {
    if value.is_empty() {
        placeholder.to_string()
    } else {
        value
    }
}
