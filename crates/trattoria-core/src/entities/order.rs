//! Orders and their parts: payments, invoices, kitchen requests and the
//! per-item quantities of a request.

use super::{clean_name, clean_text, require_positive, require_range};
use crate::primitives::DEFAULT_TAX_RATE_BP;
use crate::status::{OrderRequestStatus, OrderStatus, PaymentStatus};
use crate::types::{Money, TrattoriaError};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// How an order is served.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderKind {
    DineIn,
    Takeaway,
    Delivery,
}

impl OrderKind {
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::DineIn => "dine-in",
            Self::Takeaway => "takeaway",
            Self::Delivery => "delivery",
        }
    }
}

/// An order placed by (or for) a customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub kind: OrderKind,
    pub status: OrderStatus,
    pub placed_at: NaiveDateTime,
    pub notes: Option<String>,
}

impl Order {
    /// A freshly placed order.
    pub fn new(
        kind: OrderKind,
        placed_at: NaiveDateTime,
        notes: Option<&str>,
    ) -> Result<Self, TrattoriaError> {
        Ok(Self {
            kind,
            status: OrderStatus::Placed,
            placed_at,
            notes: clean_text("order notes", notes)?,
        })
    }
}

// =============================================================================
// PAYMENT
// =============================================================================

/// How a payment is settled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentMethod {
    Card { holder: String, last_four: String },
    Cash { tendered: Money },
}

/// A single payment against an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    pub amount: Money,
    pub method: PaymentMethod,
    pub status: PaymentStatus,
}

impl Payment {
    /// A pending card payment.
    pub fn card(amount: Money, holder: &str, last_four: &str) -> Result<Self, TrattoriaError> {
        require_positive("payment amount", amount.cents())?;
        let last_four = last_four.trim();
        if last_four.len() != 4 || !last_four.chars().all(|c| c.is_ascii_digit()) {
            return Err(TrattoriaError::invalid_field(
                "card digits",
                "expected the last four digits",
            ));
        }
        Ok(Self {
            amount,
            method: PaymentMethod::Card {
                holder: clean_name("card holder", holder)?,
                last_four: last_four.to_string(),
            },
            status: PaymentStatus::Pending,
        })
    }

    /// A pending cash payment. `tendered` must cover `amount`.
    pub fn cash(amount: Money, tendered: Money) -> Result<Self, TrattoriaError> {
        require_positive("payment amount", amount.cents())?;
        if tendered < amount {
            return Err(TrattoriaError::invalid_field(
                "tendered",
                format!("{} does not cover {}", tendered, amount),
            ));
        }
        Ok(Self {
            amount,
            method: PaymentMethod::Cash { tendered },
            status: PaymentStatus::Pending,
        })
    }

    /// Change owed for a cash payment; zero for cards.
    #[must_use]
    pub fn change(&self) -> Money {
        match self.method {
            PaymentMethod::Cash { tendered } => tendered.saturating_sub(self.amount),
            PaymentMethod::Card { .. } => Money::ZERO,
        }
    }
}

// =============================================================================
// INVOICE
// =============================================================================

/// The single invoice issued for an order.
///
/// Amounts are derived from the order when requested; the record keeps only
/// what was fixed at issue time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invoice {
    pub number: String,
    pub issued_on: NaiveDate,
    /// Tax rate in basis points.
    pub tax_rate_bp: u16,
}

impl Invoice {
    pub fn new(number: &str, issued_on: NaiveDate, tax_rate_bp: u16) -> Result<Self, TrattoriaError> {
        require_range("tax rate", u64::from(tax_rate_bp), 0, 10_000)?;
        Ok(Self {
            number: clean_name("invoice number", number)?,
            issued_on,
            tax_rate_bp,
        })
    }

    /// An invoice at the default tax rate.
    pub fn standard(number: &str, issued_on: NaiveDate) -> Result<Self, TrattoriaError> {
        Self::new(number, issued_on, DEFAULT_TAX_RATE_BP)
    }
}

/// Amounts of an invoice, derived from its order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceTotals {
    pub subtotal: Money,
    pub discount: Money,
    pub tax: Money,
    pub total: Money,
}

// =============================================================================
// ORDER REQUEST / ITEM QUANTITY
// =============================================================================

/// A batch of items sent to the kitchen for an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRequest {
    pub status: OrderRequestStatus,
    pub note: Option<String>,
}

impl OrderRequest {
    pub fn new(note: Option<&str>) -> Result<Self, TrattoriaError> {
        Ok(Self {
            status: OrderRequestStatus::Pending,
            note: clean_text("request note", note)?,
        })
    }
}

/// How many of one menu item a request asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemQuantity {
    pub quantity: u32,
}

impl ItemQuantity {
    pub fn new(quantity: u32) -> Result<Self, TrattoriaError> {
        require_positive("quantity", u64::from(quantity))?;
        Ok(Self { quantity })
    }
}
