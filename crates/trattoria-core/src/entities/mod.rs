//! # Entity Records
//!
//! Scalar state of every entity type, with validating constructors.
//!
//! Records never hold references to other entities: every link lives in the
//! store's relationship instances. A record that exists has already passed
//! validation, so the relationship engine never sees a half-valid entity.

mod customer;
mod menu;
mod order;
mod reservation;
mod staff;
mod supply;

pub use customer::{Customer, Discount, Feedback};
pub use menu::{Ingredient, Menu, MenuItem};
pub use order::{
    Invoice, InvoiceTotals, ItemQuantity, Order, OrderKind, OrderRequest, Payment, PaymentMethod,
};
pub use reservation::{Reservation, Table};
pub use staff::{ManagerProfile, Staff, StaffRole};
pub use supply::{Supplier, SupplyLog};

use crate::primitives::{MAX_EMAIL_LENGTH, MAX_NAME_LENGTH, MAX_TEXT_LENGTH};
use crate::types::TrattoriaError;

// =============================================================================
// FIELD VALIDATION
// =============================================================================

/// Trim a required short name and check its length.
pub(crate) fn clean_name(field: &'static str, raw: &str) -> Result<String, TrattoriaError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(TrattoriaError::invalid_field(field, "must not be empty"));
    }
    if trimmed.chars().count() > MAX_NAME_LENGTH {
        return Err(TrattoriaError::invalid_field(
            field,
            format!("longer than {} characters", MAX_NAME_LENGTH),
        ));
    }
    Ok(trimmed.to_string())
}

/// Trim optional free text. Blank text becomes `None`.
pub(crate) fn clean_text(
    field: &'static str,
    raw: Option<&str>,
) -> Result<Option<String>, TrattoriaError> {
    let Some(trimmed) = raw.map(str::trim).filter(|t| !t.is_empty()) else {
        return Ok(None);
    };
    if trimmed.chars().count() > MAX_TEXT_LENGTH {
        return Err(TrattoriaError::invalid_field(
            field,
            format!("longer than {} characters", MAX_TEXT_LENGTH),
        ));
    }
    Ok(Some(trimmed.to_string()))
}

/// Trim and lowercase an email address and check its basic shape.
pub(crate) fn clean_email(raw: &str) -> Result<String, TrattoriaError> {
    let email = raw.trim().to_lowercase();
    if email.len() > MAX_EMAIL_LENGTH {
        return Err(TrattoriaError::invalid_field(
            "email",
            format!("longer than {} bytes", MAX_EMAIL_LENGTH),
        ));
    }
    let well_formed = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    };
    if !well_formed || email.chars().any(char::is_whitespace) {
        return Err(TrattoriaError::invalid_field(
            "email",
            format!("'{}' is not an address", email),
        ));
    }
    Ok(email)
}

/// Reject zero for counts that must be positive.
pub(crate) fn require_positive(field: &'static str, value: u64) -> Result<(), TrattoriaError> {
    if value == 0 {
        return Err(TrattoriaError::invalid_field(field, "must be positive"));
    }
    Ok(())
}

/// Check `value` lies in `low..=high`.
pub(crate) fn require_range(
    field: &'static str,
    value: u64,
    low: u64,
    high: u64,
) -> Result<(), TrattoriaError> {
    if value < low || value > high {
        return Err(TrattoriaError::invalid_field(
            field,
            format!("{} is outside {}..={}", value, low, high),
        ));
    }
    Ok(())
}
