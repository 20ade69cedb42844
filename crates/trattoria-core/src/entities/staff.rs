//! Staff members and the manager-only profile.

use super::clean_name;
use crate::types::TrattoriaError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// What a staff member does on the floor or in the kitchen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StaffRole {
    Chef,
    Cook,
    Waiter,
    Host,
    Bartender,
}

impl StaffRole {
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Chef => "chef",
            Self::Cook => "cook",
            Self::Waiter => "waiter",
            Self::Host => "host",
            Self::Bartender => "bartender",
        }
    }
}

/// State only a manager carries. Only managers take part in supervision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManagerProfile {
    pub department: String,
}

impl ManagerProfile {
    pub fn new(department: &str) -> Result<Self, TrattoriaError> {
        Ok(Self {
            department: clean_name("department", department)?,
        })
    }
}

/// An employee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Staff {
    pub name: String,
    pub role: StaffRole,
    pub hired_on: NaiveDate,
    pub manager: Option<ManagerProfile>,
}

impl Staff {
    pub fn new(name: &str, role: StaffRole, hired_on: NaiveDate) -> Result<Self, TrattoriaError> {
        Ok(Self {
            name: clean_name("staff name", name)?,
            role,
            hired_on,
            manager: None,
        })
    }

    /// Same member, hired as a manager.
    #[must_use]
    pub fn as_manager(mut self, profile: ManagerProfile) -> Self {
        self.manager = Some(profile);
        self
    }

    #[must_use]
    pub fn is_manager(&self) -> bool {
        self.manager.is_some()
    }

    /// Whole years worked as of `on`. Zero before the hire date.
    #[must_use]
    pub fn years_of_service(&self, on: NaiveDate) -> u32 {
        on.years_since(self.hired_on).unwrap_or(0)
    }
}
