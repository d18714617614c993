//! # Card Form
//!
//! Whole-form validation for the card checkout. Every field is checked on
//! submit so the UI can flag all problems at once instead of one per click.

use crate::bank::{classify_bank, BankDescriptor};
use crate::brand::{classify_brand, CardBrand};
use crate::field::{
    check_card_holder, check_card_number, check_document, check_expiry_at, check_security_code,
    DocumentKind, Field, FieldErrors,
};
use crate::validate::ExpiryDate;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Raw values collected by the checkout form
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CardForm {
    pub card_number: String,
    pub expiration_date: String,
    pub security_code: String,
    pub card_holder: String,
    #[serde(default)]
    pub document_kind: DocumentKind,
    pub document_number: String,
    /// Selected installment count
    #[serde(default = "default_installments")]
    pub installments: u32,
}

fn default_installments() -> u32 {
    1
}

/// Payer identity document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identification {
    #[serde(rename = "type")]
    pub kind: DocumentKind,
    /// Digits only
    pub number: String,
}

/// What a valid form resolves to. Card digits are not kept.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidatedCard {
    pub brand: CardBrand,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bank: Option<BankDescriptor>,
    pub expiry: ExpiryDate,
    /// Upper-cased, single-spaced
    pub holder_name: String,
    pub identification: Identification,
    pub installments: u32,
}

impl ValidatedCard {
    /// First word of the holder name
    pub fn first_name(&self) -> &str {
        self.holder_name.split(' ').next().unwrap_or_default()
    }

    /// Everything after the first word of the holder name
    pub fn last_name(&self) -> &str {
        self.holder_name
            .split_once(' ')
            .map(|(_, rest)| rest)
            .unwrap_or_default()
    }
}

impl CardForm {
    /// Brand detected from the current card number input
    pub fn brand(&self) -> CardBrand {
        classify_brand(&self.card_number).brand
    }

    /// Run every field check as of `today`.
    pub fn validate_at(&self, today: NaiveDate) -> Result<ValidatedCard, FieldErrors> {
        let mut errors = FieldErrors::default();

        let brand = errors.record(Field::CardNumber, check_card_number(&self.card_number));
        let expiry = errors.record(
            Field::ExpirationDate,
            check_expiry_at(&self.expiration_date, today),
        );
        // CVV length follows whatever brand the digits suggest, even if the
        // number itself is not valid yet
        let cvv_brand = brand.unwrap_or_else(|| classify_brand(&self.card_number));
        errors.record(
            Field::SecurityCode,
            check_security_code(&self.security_code, cvv_brand),
        );
        let holder_name = errors.record(Field::CardHolder, check_card_holder(&self.card_holder));
        let document = errors.record(
            Field::DocNumber,
            check_document(self.document_kind, &self.document_number),
        );

        match (brand, expiry, holder_name, document) {
            (Some(brand), Some(expiry), Some(holder_name), Some(number)) if errors.is_empty() => {
                Ok(ValidatedCard {
                    brand: brand.brand,
                    bank: classify_bank(&self.card_number).copied(),
                    expiry,
                    holder_name,
                    identification: Identification {
                        kind: self.document_kind,
                        number,
                    },
                    installments: self.installments,
                })
            }
            _ => {
                debug!(failing = errors.count(), "card form rejected: {}", errors);
                Err(errors)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::FieldError;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 10).unwrap()
    }

    fn valid_form() -> CardForm {
        CardForm {
            card_number: "4389 3500 0000 0002".to_string(),
            expiration_date: "12/27".to_string(),
            security_code: "123".to_string(),
            card_holder: "joao da silva".to_string(),
            document_kind: DocumentKind::Cpf,
            document_number: "123.456.789-09".to_string(),
            installments: 3,
        }
    }

    #[test]
    fn test_valid_form() {
        let card = valid_form().validate_at(today()).unwrap();
        assert_eq!(card.brand, CardBrand::Elo);
        assert_eq!(card.bank.map(|b| b.name), Some("Bradesco"));
        assert_eq!(
            card.expiry,
            ExpiryDate {
                year: 2027,
                month: 12
            }
        );
        assert_eq!(card.holder_name, "JOAO DA SILVA");
        assert_eq!(card.first_name(), "JOAO");
        assert_eq!(card.last_name(), "DA SILVA");
        assert_eq!(card.identification.number, "12345678909");
        assert_eq!(card.installments, 3);
    }

    #[test]
    fn test_all_errors_reported_together() {
        let form = CardForm {
            card_number: "4111 1111".to_string(),
            expiration_date: "05/25".to_string(),
            security_code: "".to_string(),
            card_holder: "joao".to_string(),
            document_kind: DocumentKind::Cpf,
            document_number: "123".to_string(),
            installments: 1,
        };

        let errors = form.validate_at(today()).unwrap_err();
        assert_eq!(errors.get(Field::CardNumber), Some(FieldError::Incomplete));
        assert_eq!(errors.get(Field::ExpirationDate), Some(FieldError::Expired));
        assert_eq!(errors.get(Field::SecurityCode), Some(FieldError::Empty));
        assert_eq!(errors.get(Field::CardHolder), Some(FieldError::Incomplete));
        assert_eq!(errors.get(Field::DocNumber), Some(FieldError::Incomplete));
        assert_eq!(errors.count(), 5);
    }

    #[test]
    fn test_security_code_follows_amex_length() {
        let mut form = valid_form();
        form.card_number = "3782 822463 10005".to_string();
        let errors = form.validate_at(today()).unwrap_err();
        assert_eq!(
            errors.get(Field::SecurityCode),
            Some(FieldError::Incomplete)
        );
        assert_eq!(errors.count(), 1);

        form.security_code = "1234".to_string();
        let card = form.validate_at(today()).unwrap();
        assert_eq!(card.brand, CardBrand::Amex);
        assert!(card.bank.is_none());
    }

    #[test]
    fn test_brand_from_partial_input() {
        let mut form = CardForm::default();
        assert_eq!(form.brand(), CardBrand::Unknown);
        form.card_number = "51".to_string();
        assert_eq!(form.brand(), CardBrand::Mastercard);
    }

    #[test]
    fn test_deserialize_from_ui_payload() {
        let form: CardForm = serde_json::from_value(serde_json::json!({
            "card_number": "4111111111111111",
            "expiration_date": "12/30",
            "security_code": "123",
            "card_holder": "Ana Souza",
            "document_number": "12345678909"
        }))
        .unwrap();
        assert_eq!(form.document_kind, DocumentKind::Cpf);
        assert_eq!(form.installments, 1);
        assert!(form.validate_at(today()).is_ok());
    }
}
