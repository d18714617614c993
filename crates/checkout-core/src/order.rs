//! # Order Summary
//!
//! Ticket line items and the amount the installment table is priced from.
//! The total charged is the ticket subtotal plus a flat 10% service fee.

use crate::error::{CheckoutError, CheckoutResult};
use crate::installment::{compute_installment_options, InstallmentOption};
use crate::money::{Currency, Price};
use serde::{Deserialize, Serialize};

/// Service fee charged on top of the ticket subtotal, in percent
pub const SERVICE_FEE_PERCENT: i64 = 10;

/// A ticket line in the order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    /// Ticket name (e.g., "Pista Premium")
    pub name: String,

    /// Quantity
    pub quantity: u32,

    /// Unit price
    pub unit_price: Price,
}

impl OrderItem {
    pub fn new(name: impl Into<String>, quantity: u32, unit_price: Price) -> Self {
        Self {
            name: name.into(),
            quantity,
            unit_price,
        }
    }

    /// Calculate the total price for this line item
    pub fn total(&self) -> Price {
        Price {
            amount: self.unit_price.amount * self.quantity as i64,
            currency: self.unit_price.currency,
        }
    }
}

/// Order totals shown next to the card form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderSummary {
    /// Order reference passed through to the payment backend
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,

    pub items: Vec<OrderItem>,

    pub currency: Currency,
}

impl OrderSummary {
    pub fn new(currency: Currency) -> Self {
        Self {
            reference: None,
            items: Vec::new(),
            currency,
        }
    }

    /// Build a summary from line items; all items must share one currency.
    pub fn from_items(items: Vec<OrderItem>) -> CheckoutResult<Self> {
        let currency = items
            .first()
            .map(|item| item.unit_price.currency)
            .unwrap_or_default();

        let mut summary = Self::new(currency);
        for item in items {
            summary.add_item(item)?;
        }
        Ok(summary)
    }

    /// Add a line item
    pub fn add_item(&mut self, item: OrderItem) -> CheckoutResult<()> {
        if item.unit_price.currency != self.currency {
            return Err(CheckoutError::InvalidAmount(format!(
                "item '{}' priced in {} but order is in {}",
                item.name, item.unit_price.currency, self.currency
            )));
        }
        self.items.push(item);
        Ok(())
    }

    /// Builder: set the order reference
    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = Some(reference.into());
        self
    }

    /// Sum of all line items
    pub fn subtotal(&self) -> Price {
        let amount = self.items.iter().map(|item| item.total().amount).sum();
        Price::from_cents(amount, self.currency)
    }

    /// Service fee, rounded half-up to the minor unit
    pub fn service_fee(&self) -> Price {
        let subtotal = self.subtotal().amount;
        let fee = (subtotal * SERVICE_FEE_PERCENT + 50) / 100;
        Price::from_cents(fee, self.currency)
    }

    /// Amount charged: subtotal plus service fee
    pub fn total(&self) -> Price {
        Price::from_cents(
            self.subtotal().amount + self.service_fee().amount,
            self.currency,
        )
    }

    /// Installment table for this order's total
    pub fn installment_options(&self, max_installments: u32) -> Vec<InstallmentOption> {
        compute_installment_options(self.total().as_decimal(), max_installments)
    }

    /// Check if order is empty
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Get ticket count
    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|i| i.quantity).sum()
    }
}
