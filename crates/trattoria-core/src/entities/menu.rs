//! Menus, the dishes on them and what the dishes are made of.

use super::{clean_name, clean_text, require_positive};
use crate::types::{Money, TrattoriaError};
use serde::{Deserialize, Serialize};

/// A named collection of menu items (lunch, dinner, wine list...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Menu {
    pub name: String,
    pub description: Option<String>,
}

impl Menu {
    pub fn new(name: &str, description: Option<&str>) -> Result<Self, TrattoriaError> {
        Ok(Self {
            name: clean_name("menu name", name)?,
            description: clean_text("menu description", description)?,
        })
    }
}

/// A dish that can be ordered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItem {
    pub name: String,
    pub price: Money,
    pub vegetarian: bool,
}

impl MenuItem {
    pub fn new(name: &str, price: Money, vegetarian: bool) -> Result<Self, TrattoriaError> {
        require_positive("price", price.cents())?;
        Ok(Self {
            name: clean_name("menu item name", name)?,
            price,
            vegetarian,
        })
    }
}

/// A stocked ingredient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    pub name: String,
    /// Unit the stock is counted in ("g", "ml", "pcs").
    pub unit: String,
    pub stock: u64,
}

impl Ingredient {
    pub fn new(name: &str, unit: &str, stock: u64) -> Result<Self, TrattoriaError> {
        Ok(Self {
            name: clean_name("ingredient name", name)?,
            unit: clean_name("unit", unit)?,
            stock,
        })
    }

    /// Add delivered stock, saturating.
    pub fn restock(&mut self, quantity: u64) {
        self.stock = self.stock.saturating_add(quantity);
    }
}
