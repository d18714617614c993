//! # Card Tokenization Gate
//!
//! The card number, expiry and CVV are typed into fields hosted by the
//! payment provider; only the provider can turn them into a single-use card
//! token. This module is the seam to that provider and the last check before
//! a payment request leaves the page.
//!
//! ```text
//!  CardForm ──► validate ──► installment lookup ──► TokenService ──► PaymentRequest
//!                 │                 │                     │
//!                 └─ InvalidForm    └─ NotOffered         └─ Tokenization / TokenRejected
//! ```
//!
//! The token service is injected, never a global, so tests and alternative
//! providers plug in the same way.

use crate::config::CheckoutConfig;
use crate::error::{CheckoutError, CheckoutResult};
use crate::form::{CardForm, Identification, ValidatedCard};
use crate::installment::InstallmentOption;
use crate::order::{OrderItem, OrderSummary};
use async_trait::async_trait;
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

/// What the provider needs besides its own hosted card fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenRequest {
    pub cardholder_name: String,
    pub identification: Identification,
}

/// Single-use card token issued by the provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardToken {
    pub id: String,
}

/// Capability to tokenize the card held in the provider's hosted fields.
///
/// Implementations wrap the provider SDK on the page. A rejection that
/// points at specific inputs should be reported as
/// [`CheckoutError::TokenRejected`] with the provider's cause codes.
#[async_trait]
pub trait TokenService: Send + Sync {
    /// Create a card token from the hosted fields.
    async fn create_card_token(&self, request: &TokenRequest) -> CheckoutResult<CardToken>;

    /// Get the provider name (for logging).
    fn provider_name(&self) -> &'static str;
}

/// Type alias for a shared token service (dynamic dispatch)
pub type BoxedTokenService = Arc<dyn TokenService>;

/// Payer block of the payment request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payer {
    pub first_name: String,
    pub last_name: String,
    pub identification: Identification,
}

/// Payment request handed back to the page for submission to the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentRequest {
    pub token: String,
    /// Amount charged, rounded to the currency's minor unit
    pub transaction_amount: f64,
    pub installments: u32,
    /// Detected brand id (e.g. "visa")
    pub payment_method_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issuer: Option<String>,
    pub payer: Payer,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_reference: Option<String>,
    pub items: Vec<OrderItem>,
    /// Lets the backend drop duplicate submissions
    pub idempotency_key: String,
}

impl PaymentRequest {
    pub fn to_json(&self) -> CheckoutResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Checkout session for one order page
#[derive(Clone)]
pub struct Checkout {
    config: CheckoutConfig,
    tokens: BoxedTokenService,
}

impl Checkout {
    pub fn new(config: CheckoutConfig, tokens: BoxedTokenService) -> Self {
        Self { config, tokens }
    }

    pub fn config(&self) -> &CheckoutConfig {
        &self.config
    }

    /// Installment table offered for an order
    pub fn installment_options(&self, order: &OrderSummary) -> Vec<InstallmentOption> {
        order.installment_options(self.config.max_installments)
    }

    /// Validate, tokenize and build the payment request as of today.
    pub async fn prepare_payment(
        &self,
        form: &CardForm,
        order: &OrderSummary,
    ) -> CheckoutResult<PaymentRequest> {
        self.prepare_payment_at(form, order, Local::now().date_naive())
            .await
    }

    /// Validate, tokenize and build the payment request.
    ///
    /// The token service is only called once the order, the selected
    /// installment count and every form field are valid.
    #[instrument(skip(self, form, order), fields(provider = self.tokens.provider_name()))]
    pub async fn prepare_payment_at(
        &self,
        form: &CardForm,
        order: &OrderSummary,
        today: NaiveDate,
    ) -> CheckoutResult<PaymentRequest> {
        if order.is_empty() || order.total().amount <= 0 {
            return Err(CheckoutError::InvalidAmount(
                "order has nothing to charge".to_string(),
            ));
        }

        let card = form.validate_at(today).map_err(CheckoutError::InvalidForm)?;
        let option = self.select_installment(order, card.installments)?;

        debug!(
            brand = %card.brand,
            installments = option.installments,
            "requesting card token"
        );

        let request = TokenRequest {
            cardholder_name: card.holder_name.clone(),
            identification: card.identification.clone(),
        };
        let token = match self.tokens.create_card_token(&request).await {
            Ok(token) => token,
            Err(err) => {
                warn!(code = err.code(), "card tokenization failed: {}", err);
                return Err(err);
            }
        };

        let payment = self.build_request(token, &card, &option, order);
        info!(
            brand = %card.brand,
            installments = payment.installments,
            amount = payment.transaction_amount,
            "payment request ready"
        );
        Ok(payment)
    }

    fn select_installment(
        &self,
        order: &OrderSummary,
        installments: u32,
    ) -> CheckoutResult<InstallmentOption> {
        let max = self.config.max_installments;
        self.installment_options(order)
            .into_iter()
            .find(|option| option.installments == installments)
            .ok_or(CheckoutError::InstallmentNotOffered { installments, max })
    }

    fn build_request(
        &self,
        token: CardToken,
        card: &ValidatedCard,
        option: &InstallmentOption,
        order: &OrderSummary,
    ) -> PaymentRequest {
        let currency = order.currency;
        let amount = currency.from_smallest_unit(currency.to_smallest_unit(option.total));

        PaymentRequest {
            token: token.id,
            transaction_amount: amount,
            installments: option.installments,
            payment_method_id: card.brand.as_str().to_string(),
            issuer: card.bank.map(|bank| bank.name.to_string()),
            payer: Payer {
                first_name: card.first_name().to_string(),
                last_name: card.last_name().to_string(),
                identification: card.identification.clone(),
            },
            external_reference: order.reference.clone(),
            items: order.items.clone(),
            idempotency_key: Uuid::new_v4().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{DocumentKind, Field, FieldError};
    use crate::money::{Currency, Price};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Token service double that counts calls and replays a fixed outcome
    struct StubTokens {
        calls: AtomicUsize,
        outcome: Result<String, CheckoutError>,
    }

    impl StubTokens {
        fn issuing(id: &str) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                outcome: Ok(id.to_string()),
            })
        }

        fn failing(err: CheckoutError) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                outcome: Err(err),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl TokenService for StubTokens {
        async fn create_card_token(&self, request: &TokenRequest) -> CheckoutResult<CardToken> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            assert!(!request.cardholder_name.is_empty());
            self.outcome.clone().map(|id| CardToken { id })
        }

        fn provider_name(&self) -> &'static str {
            "stub"
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 10).unwrap()
    }

    fn order() -> OrderSummary {
        OrderSummary::from_items(vec![
            OrderItem::new("Pista Premium", 2, Price::new(150.0, Currency::BRL)),
            OrderItem::new("Camarote VIP", 1, Price::new(350.0, Currency::BRL)),
        ])
        .unwrap()
        .with_reference("ord-42")
    }

    fn form(installments: u32) -> CardForm {
        CardForm {
            card_number: "4296 1234 1234 1237".to_string(),
            expiration_date: "08/28".to_string(),
            security_code: "321".to_string(),
            card_holder: "Maria Clara Souza".to_string(),
            document_kind: DocumentKind::Cpf,
            document_number: "529.982.247-25".to_string(),
            installments,
        }
    }

    #[tokio::test]
    async fn test_prepare_payment_interest_free() {
        let tokens = StubTokens::issuing("tok_123");
        let checkout = Checkout::new(CheckoutConfig::default(), tokens.clone());

        let payment = checkout
            .prepare_payment_at(&form(3), &order(), today())
            .await
            .unwrap();

        assert_eq!(tokens.calls(), 1);
        assert_eq!(payment.token, "tok_123");
        assert_eq!(payment.transaction_amount, 715.0);
        assert_eq!(payment.installments, 3);
        assert_eq!(payment.payment_method_id, "visa");
        assert_eq!(payment.issuer.as_deref(), Some("Nubank"));
        assert_eq!(payment.payer.first_name, "MARIA");
        assert_eq!(payment.payer.last_name, "CLARA SOUZA");
        assert_eq!(payment.payer.identification.number, "52998224725");
        assert_eq!(payment.external_reference.as_deref(), Some("ord-42"));
        assert_eq!(payment.items.len(), 2);
        assert!(Uuid::parse_str(&payment.idempotency_key).is_ok());
    }

    #[tokio::test]
    async fn test_prepare_payment_with_interest() {
        let checkout = Checkout::new(CheckoutConfig::default(), StubTokens::issuing("tok"));
        let payment = checkout
            .prepare_payment_at(&form(4), &order(), today())
            .await
            .unwrap();

        // 715.00 × 1.0249
        assert_eq!(payment.transaction_amount, 732.80);
        assert!(payment.to_json().unwrap().contains("\"installments\":4"));
    }

    #[tokio::test]
    async fn test_invalid_form_never_reaches_provider() {
        let tokens = StubTokens::issuing("tok");
        let checkout = Checkout::new(CheckoutConfig::default(), tokens.clone());

        let mut bad = form(1);
        bad.security_code = "12".to_string();
        let err = checkout
            .prepare_payment_at(&bad, &order(), today())
            .await
            .unwrap_err();

        assert_eq!(tokens.calls(), 0);
        let errors = err.field_errors().unwrap();
        assert_eq!(
            errors.get(Field::SecurityCode),
            Some(FieldError::Incomplete)
        );
    }

    #[tokio::test]
    async fn test_installment_above_cap() {
        let tokens = StubTokens::issuing("tok");
        let config = CheckoutConfig::default().with_max_installments(6);
        let checkout = Checkout::new(config, tokens.clone());

        let err = checkout
            .prepare_payment_at(&form(10), &order(), today())
            .await
            .unwrap_err();

        assert_eq!(
            err,
            CheckoutError::InstallmentNotOffered {
                installments: 10,
                max: 6
            }
        );
        assert_eq!(tokens.calls(), 0);
        assert_eq!(checkout.installment_options(&order()).len(), 6);
    }

    #[tokio::test]
    async fn test_empty_order_rejected() {
        let tokens = StubTokens::issuing("tok");
        let checkout = Checkout::new(CheckoutConfig::default(), tokens.clone());

        let err = checkout
            .prepare_payment_at(&form(1), &OrderSummary::new(Currency::BRL), today())
            .await
            .unwrap_err();

        assert_eq!(err.code(), "invalid_amount");
        assert_eq!(tokens.calls(), 0);
    }

    #[tokio::test]
    async fn test_provider_rejection_maps_to_fields() {
        let tokens = StubTokens::failing(CheckoutError::TokenRejected {
            provider: "stub".into(),
            causes: vec!["324".into()],
        });
        let checkout = Checkout::new(CheckoutConfig::default(), tokens.clone());

        let err = checkout
            .prepare_payment_at(&form(1), &order(), today())
            .await
            .unwrap_err();

        assert_eq!(tokens.calls(), 1);
        assert!(!err.is_retryable());
        let errors = err.field_errors().unwrap();
        assert_eq!(errors.get(Field::DocNumber), Some(FieldError::Invalid));
    }

    #[tokio::test]
    async fn test_provider_unavailable_is_retryable() {
        let checkout = Checkout::new(
            CheckoutConfig::default(),
            StubTokens::failing(CheckoutError::ProviderUnavailable("sdk not loaded".into())),
        );

        let err = checkout
            .prepare_payment_at(&form(1), &order(), today())
            .await
            .unwrap_err();
        assert!(err.is_retryable());
    }
}
