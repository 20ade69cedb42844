//! Customers and the records that hang off them.

use super::{clean_email, clean_name, clean_text, require_range};
use crate::primitives::{LOYALTY_POINTS_PER_UNIT, MAX_RATING};
use crate::types::{Money, TrattoriaError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A restaurant guest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub loyalty_points: u64,
}

impl Customer {
    /// Create a customer with no loyalty points.
    pub fn new(name: &str, email: Option<&str>) -> Result<Self, TrattoriaError> {
        Ok(Self {
            name: clean_name("customer name", name)?,
            email: email.map(clean_email).transpose()?,
            phone: None,
            loyalty_points: 0,
        })
    }

    /// Attach a phone number. Digits, spaces, `+` and `-` only.
    pub fn with_phone(mut self, phone: &str) -> Result<Self, TrattoriaError> {
        let phone = phone.trim();
        let digits = phone.chars().filter(char::is_ascii_digit).count();
        if !(6..=15).contains(&digits)
            || !phone
                .chars()
                .all(|c| c.is_ascii_digit() || matches!(c, ' ' | '+' | '-'))
        {
            return Err(TrattoriaError::invalid_field(
                "phone",
                format!("'{}' is not a phone number", phone),
            ));
        }
        self.phone = Some(phone.to_string());
        Ok(self)
    }

    /// Points earned for a settled payment of `amount`.
    #[must_use]
    pub fn points_for(amount: Money) -> u64 {
        (amount.cents() / 100).saturating_mul(LOYALTY_POINTS_PER_UNIT)
    }
}

/// A percentage discount that can be applied to orders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Discount {
    pub code: String,
    /// Whole percent, `1..=100`.
    pub percent: u8,
}

impl Discount {
    pub fn new(code: &str, percent: u8) -> Result<Self, TrattoriaError> {
        require_range("discount percent", u64::from(percent), 1, 100)?;
        Ok(Self {
            code: clean_name("discount code", code)?.to_uppercase(),
            percent,
        })
    }

    /// Amount this discount takes off `subtotal`, rounding down.
    #[must_use]
    pub fn reduction(&self, subtotal: Money) -> Money {
        subtotal.basis_points(u32::from(self.percent) * 100)
    }
}

/// A rating left by a customer for a menu item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feedback {
    /// `1..=5`
    pub rating: u8,
    pub comment: Option<String>,
    pub submitted_on: NaiveDate,
}

impl Feedback {
    pub fn new(
        rating: u8,
        comment: Option<&str>,
        submitted_on: NaiveDate,
    ) -> Result<Self, TrattoriaError> {
        require_range("rating", u64::from(rating), 1, u64::from(MAX_RATING))?;
        Ok(Self {
            rating,
            comment: clean_text("comment", comment)?,
            submitted_on,
        })
    }
}
