//! Suppliers and their delivery records.

use super::{clean_email, clean_name, require_positive};
use crate::types::{Money, TrattoriaError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A company delivering ingredients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Supplier {
    pub name: String,
    pub contact_email: Option<String>,
}

impl Supplier {
    pub fn new(name: &str, contact_email: Option<&str>) -> Result<Self, TrattoriaError> {
        Ok(Self {
            name: clean_name("supplier name", name)?,
            contact_email: contact_email.map(clean_email).transpose()?,
        })
    }
}

/// One delivery of an ingredient by a supplier.
///
/// The same supplier may deliver the same ingredient any number of times;
/// each delivery is its own record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplyLog {
    pub quantity: u64,
    pub unit_cost: Money,
    pub delivered_on: NaiveDate,
}

impl SupplyLog {
    pub fn new(quantity: u64, unit_cost: Money, delivered_on: NaiveDate) -> Result<Self, TrattoriaError> {
        require_positive("delivered quantity", quantity)?;
        Ok(Self {
            quantity,
            unit_cost,
            delivered_on,
        })
    }

    /// Cost of the whole delivery, saturating.
    #[must_use]
    pub fn total_cost(&self) -> Money {
        Money(self.unit_cost.cents().saturating_mul(self.quantity))
    }
}
