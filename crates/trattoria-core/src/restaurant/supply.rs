//! Suppliers, the ingredients they carry and their deliveries.

use super::Restaurant;
use super::catalogue::SUPPLIER_INGREDIENTS;
use crate::entities::{Supplier, SupplyLog};
use crate::relationship::Attach;
use crate::types::{IngredientId, SupplierId, SupplyLogId, TrattoriaError};
use std::collections::BTreeSet;

impl Restaurant {
    /// Register a supplier with the ingredients it carries. At least one is
    /// required.
    pub fn add_supplier(
        &mut self,
        supplier: Supplier,
        ingredients: &[IngredientId],
    ) -> Result<SupplierId, TrattoriaError> {
        let ingredients: BTreeSet<IngredientId> = ingredients.iter().copied().collect();
        SUPPLIER_INGREDIENTS.require_initial(ingredients.len())?;
        for ingredient in &ingredients {
            self.ingredients.require(*ingredient)?;
        }

        let id: SupplierId = self.claim();
        for ingredient in ingredients {
            self.supplier_ingredients.attach(id, ingredient)?;
        }
        self.suppliers.insert(id, supplier)?;
        Ok(id)
    }

    pub fn carry_ingredient(
        &mut self,
        supplier: SupplierId,
        ingredient: IngredientId,
    ) -> Result<Attach, TrattoriaError> {
        self.suppliers.require(supplier)?;
        self.ingredients.require(ingredient)?;
        self.supplier_ingredients.attach(supplier, ingredient)
    }

    /// Stop carrying an ingredient. A supplier carries at least one.
    pub fn drop_ingredient(
        &mut self,
        supplier: SupplierId,
        ingredient: IngredientId,
    ) -> Result<(), TrattoriaError> {
        self.suppliers.require(supplier)?;
        self.ingredients.require(ingredient)?;
        self.supplier_ingredients.detach(supplier, ingredient)
    }

    /// Record a delivery and restock the ingredient.
    ///
    /// Every call creates a new log, even for a pair that already has some.
    pub fn record_supply(
        &mut self,
        supplier: SupplierId,
        ingredient: IngredientId,
        log: SupplyLog,
    ) -> Result<SupplyLogId, TrattoriaError> {
        self.suppliers.require(supplier)?;
        self.ingredients.require(ingredient)?;

        let id: SupplyLogId = self.claim();
        let quantity = log.quantity;
        self.supplies.create(supplier, ingredient, id)?;
        self.supply_logs.insert(id, log)?;
        self.ingredients.get_mut(ingredient)?.restock(quantity);
        tracing::debug!(supplier = %supplier, ingredient = %ingredient, quantity, "supply recorded");
        Ok(id)
    }

    /// Delete a delivery record from both its supplier and its ingredient.
    pub fn delete_supply_log(&mut self, log: SupplyLogId) -> Result<SupplyLog, TrattoriaError> {
        self.supply_logs.require(log)?;
        self.supplies.delete(log)?;
        self.supply_logs
            .remove(log)
            .ok_or_else(|| TrattoriaError::not_found(log))
    }

    /// Delete a supplier with its delivery records. Ingredients stay.
    pub fn delete_supplier(&mut self, supplier: SupplierId) -> Result<Supplier, TrattoriaError> {
        self.suppliers.require(supplier)?;
        for log in self.supplies.delete_for_left(supplier) {
            self.supply_logs.remove(log);
        }
        self.supplier_ingredients.purge_source(supplier);
        self.suppliers
            .remove(supplier)
            .ok_or_else(|| TrattoriaError::not_found(supplier))
    }
}
