//! Menus, menu items and ingredients.

use super::Restaurant;
use super::catalogue::{MENU_ITEMS, MENU_ITEM_INGREDIENTS};
use crate::entities::{Ingredient, Menu, MenuItem};
use crate::relationship::Attach;
use crate::types::{IngredientId, MenuId, MenuItemId, TrattoriaError};
use std::collections::BTreeSet;

impl Restaurant {
    // =========================================================================
    // INGREDIENTS
    // =========================================================================

    pub fn add_ingredient(&mut self, ingredient: Ingredient) -> Result<IngredientId, TrattoriaError> {
        let id: IngredientId = self.claim();
        self.ingredients.insert(id, ingredient)?;
        Ok(id)
    }

    /// Delete an ingredient.
    ///
    /// Refused while it is the last ingredient of a dish or the last
    /// ingredient a supplier carries. Its supply logs are deleted with it.
    pub fn delete_ingredient(&mut self, ingredient: IngredientId) -> Result<Ingredient, TrattoriaError> {
        self.ingredients.require(ingredient)?;
        self.item_ingredients.check_release_target(ingredient)?;
        self.supplier_ingredients.check_release_target(ingredient)?;

        for log in self.supplies.delete_for_right(ingredient) {
            self.supply_logs.remove(log);
        }
        self.item_ingredients.purge_target(ingredient);
        self.supplier_ingredients.purge_target(ingredient);
        self.ingredients
            .remove(ingredient)
            .ok_or_else(|| TrattoriaError::not_found(ingredient))
    }

    // =========================================================================
    // MENU ITEMS
    // =========================================================================

    /// Create a dish from its ingredients. At least one is required.
    pub fn create_menu_item(
        &mut self,
        item: MenuItem,
        ingredients: &[IngredientId],
    ) -> Result<MenuItemId, TrattoriaError> {
        let ingredients: BTreeSet<IngredientId> = ingredients.iter().copied().collect();
        MENU_ITEM_INGREDIENTS.require_initial(ingredients.len())?;
        for ingredient in &ingredients {
            self.ingredients.require(*ingredient)?;
        }

        let id: MenuItemId = self.claim();
        for ingredient in ingredients {
            self.item_ingredients.attach(id, ingredient)?;
        }
        self.menu_items.insert(id, item)?;
        Ok(id)
    }

    /// Add an ingredient to a dish. Re-adding is a no-op.
    pub fn link_ingredient(
        &mut self,
        item: MenuItemId,
        ingredient: IngredientId,
    ) -> Result<Attach, TrattoriaError> {
        self.menu_items.require(item)?;
        self.ingredients.require(ingredient)?;
        self.item_ingredients.attach(item, ingredient)
    }

    /// Remove an ingredient from a dish. A dish keeps at least one.
    pub fn unlink_ingredient(
        &mut self,
        item: MenuItemId,
        ingredient: IngredientId,
    ) -> Result<(), TrattoriaError> {
        self.menu_items.require(item)?;
        self.ingredients.require(ingredient)?;
        self.item_ingredients.detach(item, ingredient)
    }

    /// Delete a dish.
    ///
    /// Refused while it is the only item of a menu. Order lines and
    /// feedback for it are deleted; its ingredients stay.
    pub fn delete_menu_item(&mut self, item: MenuItemId) -> Result<MenuItem, TrattoriaError> {
        self.menu_items.require(item)?;
        self.menu_contents.check_release_target(item)?;

        for line in self.quantities.delete_for_right(item) {
            self.item_quantities.remove(line);
        }
        for entry in self.item_feedback.purge_source(item) {
            self.customer_feedback.purge_target(entry);
            self.feedback.remove(entry);
        }
        self.item_ingredients.purge_source(item);
        self.menu_contents.purge_target(item);
        self.menu_items
            .remove(item)
            .ok_or_else(|| TrattoriaError::not_found(item))
    }

    // =========================================================================
    // MENUS
    // =========================================================================

    /// Create a menu with its first items. At least one is required.
    pub fn create_menu(&mut self, menu: Menu, items: &[MenuItemId]) -> Result<MenuId, TrattoriaError> {
        let items: BTreeSet<MenuItemId> = items.iter().copied().collect();
        MENU_ITEMS.require_initial(items.len())?;
        for item in &items {
            self.menu_items.require(*item)?;
        }

        let id: MenuId = self.claim();
        for item in items {
            self.menu_contents.attach(id, item)?;
        }
        self.menus.insert(id, menu)?;
        Ok(id)
    }

    pub fn add_to_menu(&mut self, menu: MenuId, item: MenuItemId) -> Result<Attach, TrattoriaError> {
        self.menus.require(menu)?;
        self.menu_items.require(item)?;
        self.menu_contents.attach(menu, item)
    }

    /// Take an item off a menu. The menu keeps at least one item.
    pub fn remove_from_menu(&mut self, menu: MenuId, item: MenuItemId) -> Result<(), TrattoriaError> {
        self.menus.require(menu)?;
        self.menu_items.require(item)?;
        self.menu_contents.detach(menu, item)
    }

    /// Delete a menu. Its items stay.
    pub fn delete_menu(&mut self, menu: MenuId) -> Result<Menu, TrattoriaError> {
        self.menus.require(menu)?;
        self.menu_contents.purge_source(menu);
        self.menus
            .remove(menu)
            .ok_or_else(|| TrattoriaError::not_found(menu))
    }
}
