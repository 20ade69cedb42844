//! # Restaurant Store
//!
//! The explicit store holding every extent and every relationship instance
//! of the restaurant model.
//!
//! There is no global state: a `Restaurant` is created at start-up, passed
//! around by reference, and emptied with [`Restaurant::reset`] for test
//! isolation.
//!
//! Domain operations live in the submodules, one per area. Each operation
//! validates every precondition before its first mutation, so a failed call
//! leaves the store exactly as it was.

pub mod catalogue;
mod customers;
mod menu;
mod orders;
mod reservations;
mod snapshot;
mod staff;
mod supply;

pub use snapshot::SerializableRestaurant;

use crate::association_class::{AssociationClass, PairPolicy};
use crate::entities::{
    Customer, Discount, Feedback, Ingredient, Invoice, ItemQuantity, Menu, MenuItem, Order,
    OrderRequest, Payment, Reservation, Staff, Supplier, SupplyLog, Table,
};
use crate::extent::Extent;
use crate::hierarchy::Hierarchy;
use crate::integrity::{self, IntegrityReport};
use crate::qualified::QualifiedAssociation;
use crate::relationship::Association;
use crate::types::{
    CustomerId, DiscountId, EntityKey, EntityKind, FeedbackId, IngredientId, InvoiceId,
    ItemQuantityId, MenuId, MenuItemId, OrderId, OrderRequestId, PaymentId, ReservationId,
    ReservationSlot, StaffId, SupplierId, SupplyLogId, TableId,
};
use catalogue::*;

/// Every extent and relationship of one restaurant.
#[derive(Debug, Clone)]
pub struct Restaurant {
    /// Next identifier to hand out. Shared by all kinds.
    pub(crate) next_id: u64,

    // Extents
    pub(crate) customers: Extent<CustomerId, Customer>,
    pub(crate) orders: Extent<OrderId, Order>,
    pub(crate) payments: Extent<PaymentId, Payment>,
    pub(crate) invoices: Extent<InvoiceId, Invoice>,
    pub(crate) requests: Extent<OrderRequestId, OrderRequest>,
    pub(crate) item_quantities: Extent<ItemQuantityId, ItemQuantity>,
    pub(crate) menus: Extent<MenuId, Menu>,
    pub(crate) menu_items: Extent<MenuItemId, MenuItem>,
    pub(crate) ingredients: Extent<IngredientId, Ingredient>,
    pub(crate) suppliers: Extent<SupplierId, Supplier>,
    pub(crate) supply_logs: Extent<SupplyLogId, SupplyLog>,
    pub(crate) staff: Extent<StaffId, Staff>,
    pub(crate) tables: Extent<TableId, Table>,
    pub(crate) reservations: Extent<ReservationId, Reservation>,
    pub(crate) discounts: Extent<DiscountId, Discount>,
    pub(crate) feedback: Extent<FeedbackId, Feedback>,

    // Relationships
    pub(crate) order_payments: Association<OrderId, PaymentId>,
    pub(crate) order_invoice: Association<OrderId, InvoiceId>,
    pub(crate) order_requests: Association<OrderId, OrderRequestId>,
    pub(crate) customer_orders: Association<CustomerId, OrderId>,
    pub(crate) order_tables: Association<OrderId, TableId>,
    pub(crate) order_discounts: Association<OrderId, DiscountId>,
    pub(crate) menu_contents: Association<MenuId, MenuItemId>,
    pub(crate) item_ingredients: Association<MenuItemId, IngredientId>,
    pub(crate) supplier_ingredients: Association<SupplierId, IngredientId>,
    pub(crate) reservation_tables: Association<ReservationId, TableId>,
    pub(crate) customer_feedback: Association<CustomerId, FeedbackId>,
    pub(crate) item_feedback: Association<MenuItemId, FeedbackId>,
    pub(crate) quantities: AssociationClass<OrderRequestId, MenuItemId, ItemQuantityId>,
    pub(crate) supplies: AssociationClass<SupplierId, IngredientId, SupplyLogId>,
    pub(crate) supervision: Hierarchy<StaffId>,
    pub(crate) bookings: QualifiedAssociation<CustomerId, ReservationSlot, ReservationId>,
}

impl Default for Restaurant {
    fn default() -> Self {
        Self {
            next_id: 1,
            customers: Extent::new(),
            orders: Extent::new(),
            payments: Extent::new(),
            invoices: Extent::new(),
            requests: Extent::new(),
            item_quantities: Extent::new(),
            menus: Extent::new(),
            menu_items: Extent::new(),
            ingredients: Extent::new(),
            suppliers: Extent::new(),
            supply_logs: Extent::new(),
            staff: Extent::new(),
            tables: Extent::new(),
            reservations: Extent::new(),
            discounts: Extent::new(),
            feedback: Extent::new(),
            order_payments: Association::new(ORDER_PAYMENTS),
            order_invoice: Association::new(ORDER_INVOICE),
            order_requests: Association::new(ORDER_REQUESTS),
            customer_orders: Association::new(CUSTOMER_ORDERS),
            order_tables: Association::new(ORDER_TABLES),
            order_discounts: Association::new(ORDER_DISCOUNTS),
            menu_contents: Association::new(MENU_ITEMS),
            item_ingredients: Association::new(MENU_ITEM_INGREDIENTS),
            supplier_ingredients: Association::new(SUPPLIER_INGREDIENTS),
            reservation_tables: Association::new(RESERVATION_TABLES),
            customer_feedback: Association::new(CUSTOMER_FEEDBACK),
            item_feedback: Association::new(MENU_ITEM_FEEDBACK),
            quantities: AssociationClass::new(
                PairPolicy::Bag,
                REQUEST_ITEM_QUANTITIES,
                MENU_ITEM_QUANTITIES,
            ),
            supplies: AssociationClass::new(
                PairPolicy::Bag,
                SUPPLIER_SUPPLY_LOGS,
                INGREDIENT_SUPPLY_LOGS,
            ),
            supervision: Hierarchy::new(SUPERVISION),
            bookings: QualifiedAssociation::new(CUSTOMER_RESERVATIONS),
        }
    }
}

impl Restaurant {
    /// Create an empty restaurant.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty every extent and relationship.
    ///
    /// Identifiers keep counting up so ids from before the reset are never
    /// reused.
    pub fn reset(&mut self) {
        self.customers.clear();
        self.orders.clear();
        self.payments.clear();
        self.invoices.clear();
        self.requests.clear();
        self.item_quantities.clear();
        self.menus.clear();
        self.menu_items.clear();
        self.ingredients.clear();
        self.suppliers.clear();
        self.supply_logs.clear();
        self.staff.clear();
        self.tables.clear();
        self.reservations.clear();
        self.discounts.clear();
        self.feedback.clear();

        self.order_payments.clear();
        self.order_invoice.clear();
        self.order_requests.clear();
        self.customer_orders.clear();
        self.order_tables.clear();
        self.order_discounts.clear();
        self.menu_contents.clear();
        self.item_ingredients.clear();
        self.supplier_ingredients.clear();
        self.reservation_tables.clear();
        self.customer_feedback.clear();
        self.item_feedback.clear();
        self.quantities.clear();
        self.supplies.clear();
        self.supervision.clear();
        self.bookings.clear();
        tracing::debug!("restaurant reset");
    }

    /// Hand out the next identifier.
    fn claim<K: EntityKey>(&mut self) -> K {
        let id = K::from_raw(self.next_id);
        self.next_id = self.next_id.saturating_add(1);
        id
    }

    /// Whether the store holds no entities.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.counts().iter().all(|(_, n)| *n == 0)
    }

    /// Live instance count per kind, in `EntityKind::ALL` order.
    #[must_use]
    pub fn counts(&self) -> Vec<(EntityKind, usize)> {
        EntityKind::ALL
            .iter()
            .map(|kind| (*kind, self.count_of(*kind)))
            .collect()
    }

    /// Live instance count of one kind.
    #[must_use]
    pub fn count_of(&self, kind: EntityKind) -> usize {
        match kind {
            EntityKind::Customer => self.customers.len(),
            EntityKind::Order => self.orders.len(),
            EntityKind::Payment => self.payments.len(),
            EntityKind::Invoice => self.invoices.len(),
            EntityKind::OrderRequest => self.requests.len(),
            EntityKind::ItemQuantity => self.item_quantities.len(),
            EntityKind::Menu => self.menus.len(),
            EntityKind::MenuItem => self.menu_items.len(),
            EntityKind::Ingredient => self.ingredients.len(),
            EntityKind::Supplier => self.suppliers.len(),
            EntityKind::SupplyLog => self.supply_logs.len(),
            EntityKind::Staff => self.staff.len(),
            EntityKind::Table => self.tables.len(),
            EntityKind::Reservation => self.reservations.len(),
            EntityKind::Discount => self.discounts.len(),
            EntityKind::Feedback => self.feedback.len(),
        }
    }

    /// Total number of links across every relationship.
    #[must_use]
    pub fn link_count(&self) -> usize {
        self.order_payments.link_count()
            + self.order_invoice.link_count()
            + self.order_requests.link_count()
            + self.customer_orders.link_count()
            + self.order_tables.link_count()
            + self.order_discounts.link_count()
            + self.menu_contents.link_count()
            + self.item_ingredients.link_count()
            + self.supplier_ingredients.link_count()
            + self.reservation_tables.link_count()
            + self.customer_feedback.link_count()
            + self.item_feedback.link_count()
            + self.quantities.left().link_count()
            + self.quantities.right().link_count()
            + self.supplies.left().link_count()
            + self.supplies.right().link_count()
            + self.supervision.links().link_count()
            + self.bookings.references().count()
    }

    /// Check every relationship invariant against the current state.
    #[must_use]
    pub fn verify_integrity(&self) -> IntegrityReport {
        integrity::verify(self)
    }
}

// =============================================================================
// READ-ONLY VIEWS
// =============================================================================

impl Restaurant {
    pub fn customers(&self) -> &Extent<CustomerId, Customer> {
        &self.customers
    }

    pub fn orders(&self) -> &Extent<OrderId, Order> {
        &self.orders
    }

    pub fn payments(&self) -> &Extent<PaymentId, Payment> {
        &self.payments
    }

    pub fn invoices(&self) -> &Extent<InvoiceId, Invoice> {
        &self.invoices
    }

    pub fn requests(&self) -> &Extent<OrderRequestId, OrderRequest> {
        &self.requests
    }

    pub fn item_quantities(&self) -> &Extent<ItemQuantityId, ItemQuantity> {
        &self.item_quantities
    }

    pub fn menus(&self) -> &Extent<MenuId, Menu> {
        &self.menus
    }

    pub fn menu_items(&self) -> &Extent<MenuItemId, MenuItem> {
        &self.menu_items
    }

    pub fn ingredients(&self) -> &Extent<IngredientId, Ingredient> {
        &self.ingredients
    }

    pub fn suppliers(&self) -> &Extent<SupplierId, Supplier> {
        &self.suppliers
    }

    pub fn supply_logs(&self) -> &Extent<SupplyLogId, SupplyLog> {
        &self.supply_logs
    }

    pub fn staff(&self) -> &Extent<StaffId, Staff> {
        &self.staff
    }

    pub fn tables(&self) -> &Extent<TableId, Table> {
        &self.tables
    }

    pub fn reservations(&self) -> &Extent<ReservationId, Reservation> {
        &self.reservations
    }

    pub fn discounts(&self) -> &Extent<DiscountId, Discount> {
        &self.discounts
    }

    pub fn feedback(&self) -> &Extent<FeedbackId, Feedback> {
        &self.feedback
    }

    /// Order -> payments.
    pub fn order_payments(&self) -> &Association<OrderId, PaymentId> {
        &self.order_payments
    }

    /// Order -> invoice.
    pub fn order_invoice(&self) -> &Association<OrderId, InvoiceId> {
        &self.order_invoice
    }

    /// Order -> kitchen requests.
    pub fn order_requests(&self) -> &Association<OrderId, OrderRequestId> {
        &self.order_requests
    }

    /// Customer -> orders.
    pub fn customer_orders(&self) -> &Association<CustomerId, OrderId> {
        &self.customer_orders
    }

    /// Order -> tables currently seating it.
    pub fn order_tables(&self) -> &Association<OrderId, TableId> {
        &self.order_tables
    }

    /// Order -> applied discounts.
    pub fn order_discounts(&self) -> &Association<OrderId, DiscountId> {
        &self.order_discounts
    }

    /// Menu -> items.
    pub fn menu_contents(&self) -> &Association<MenuId, MenuItemId> {
        &self.menu_contents
    }

    /// Menu item -> ingredients.
    pub fn item_ingredients(&self) -> &Association<MenuItemId, IngredientId> {
        &self.item_ingredients
    }

    /// Supplier -> ingredients it carries.
    pub fn supplier_ingredients(&self) -> &Association<SupplierId, IngredientId> {
        &self.supplier_ingredients
    }

    /// Reservation -> tables held.
    pub fn reservation_tables(&self) -> &Association<ReservationId, TableId> {
        &self.reservation_tables
    }

    /// Customer -> feedback.
    pub fn customer_feedback(&self) -> &Association<CustomerId, FeedbackId> {
        &self.customer_feedback
    }

    /// Menu item -> feedback.
    pub fn item_feedback(&self) -> &Association<MenuItemId, FeedbackId> {
        &self.item_feedback
    }

    /// Request x menu item -> item quantity.
    pub fn quantities(&self) -> &AssociationClass<OrderRequestId, MenuItemId, ItemQuantityId> {
        &self.quantities
    }

    /// Supplier x ingredient -> supply log.
    pub fn supplies(&self) -> &AssociationClass<SupplierId, IngredientId, SupplyLogId> {
        &self.supplies
    }

    /// Manager supervision forest.
    pub fn supervision(&self) -> &Hierarchy<StaffId> {
        &self.supervision
    }

    /// Customer reservations keyed by slot.
    pub fn bookings(&self) -> &QualifiedAssociation<CustomerId, ReservationSlot, ReservationId> {
        &self.bookings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_restaurant_is_empty() {
        let r = Restaurant::new();
        assert!(r.is_empty());
        assert_eq!(r.link_count(), 0);
        assert_eq!(r.counts().len(), EntityKind::ALL.len());
    }

    #[test]
    fn reset_clears_but_keeps_counting() {
        let mut r = Restaurant::new();
        let first = r
            .add_customer(Customer::new("Ada", None).expect("customer"))
            .expect("add");
        r.reset();
        assert!(r.is_empty());

        let second = r
            .add_customer(Customer::new("Bea", None).expect("customer"))
            .expect("add");
        assert!(second > first);
    }
}
