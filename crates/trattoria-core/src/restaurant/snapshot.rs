//! Serializable form of a [`Restaurant`].
//!
//! Records are stored per extent in creation order; links are stored once,
//! as forward pairs. Rebuilding re-attaches every pair through the
//! relationship engine, so both ends of every link are repopulated and every
//! cardinality and cycle rule is re-checked on the way in.

use super::Restaurant;
use crate::entities::{
    Customer, Discount, Feedback, Ingredient, Invoice, ItemQuantity, Menu, MenuItem, Order,
    OrderRequest, Payment, Reservation, Staff, Supplier, SupplyLog, Table,
};
use crate::extent::Extent;
use crate::relationship::Association;
use crate::types::{
    CustomerId, DiscountId, EntityKey, FeedbackId, IngredientId, InvoiceId, ItemQuantityId,
    MenuId, MenuItemId, OrderId, OrderRequestId, PaymentId, ReservationId, StaffId, SupplierId,
    SupplyLogId, TableId, TrattoriaError,
};
use serde::{Deserialize, Serialize};

/// Owned, serializable snapshot of every extent and link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializableRestaurant {
    pub next_id: u64,

    pub customers: Vec<(CustomerId, Customer)>,
    pub orders: Vec<(OrderId, Order)>,
    pub payments: Vec<(PaymentId, Payment)>,
    pub invoices: Vec<(InvoiceId, Invoice)>,
    pub requests: Vec<(OrderRequestId, OrderRequest)>,
    pub item_quantities: Vec<(ItemQuantityId, ItemQuantity)>,
    pub menus: Vec<(MenuId, Menu)>,
    pub menu_items: Vec<(MenuItemId, MenuItem)>,
    pub ingredients: Vec<(IngredientId, Ingredient)>,
    pub suppliers: Vec<(SupplierId, Supplier)>,
    pub supply_logs: Vec<(SupplyLogId, SupplyLog)>,
    pub staff: Vec<(StaffId, Staff)>,
    pub tables: Vec<(TableId, Table)>,
    pub reservations: Vec<(ReservationId, Reservation)>,
    pub discounts: Vec<(DiscountId, Discount)>,
    pub feedback: Vec<(FeedbackId, Feedback)>,

    pub order_payments: Vec<(OrderId, PaymentId)>,
    pub order_invoice: Vec<(OrderId, InvoiceId)>,
    pub order_requests: Vec<(OrderId, OrderRequestId)>,
    pub customer_orders: Vec<(CustomerId, OrderId)>,
    pub order_tables: Vec<(OrderId, TableId)>,
    pub order_discounts: Vec<(OrderId, DiscountId)>,
    pub menu_contents: Vec<(MenuId, MenuItemId)>,
    pub item_ingredients: Vec<(MenuItemId, IngredientId)>,
    pub supplier_ingredients: Vec<(SupplierId, IngredientId)>,
    pub reservation_tables: Vec<(ReservationId, TableId)>,
    pub customer_feedback: Vec<(CustomerId, FeedbackId)>,
    pub item_feedback: Vec<(MenuItemId, FeedbackId)>,
    /// `(line, request, item)`
    pub quantities: Vec<(ItemQuantityId, OrderRequestId, MenuItemId)>,
    /// `(log, supplier, ingredient)`
    pub supplies: Vec<(SupplyLogId, SupplierId, IngredientId)>,
    /// `(supervisor, subordinate)`
    pub supervision: Vec<(StaffId, StaffId)>,
    /// `(reservation, customer)`; indexed registrations come before
    /// shadowed ones so the same registration wins on reload.
    pub bookings: Vec<(ReservationId, CustomerId)>,
}

impl From<&Restaurant> for SerializableRestaurant {
    fn from(r: &Restaurant) -> Self {
        let mut bookings: Vec<(ReservationId, CustomerId)> = r
            .bookings
            .indexed()
            .map(|(customer, _, reservation)| (reservation, customer))
            .collect();
        bookings.extend(
            r.bookings
                .shadowed()
                .into_iter()
                .filter_map(|reservation| {
                    r.bookings
                        .owner_of(reservation)
                        .map(|customer| (reservation, customer))
                }),
        );

        Self {
            next_id: r.next_id,
            customers: r.customers.snapshot(),
            orders: r.orders.snapshot(),
            payments: r.payments.snapshot(),
            invoices: r.invoices.snapshot(),
            requests: r.requests.snapshot(),
            item_quantities: r.item_quantities.snapshot(),
            menus: r.menus.snapshot(),
            menu_items: r.menu_items.snapshot(),
            ingredients: r.ingredients.snapshot(),
            suppliers: r.suppliers.snapshot(),
            supply_logs: r.supply_logs.snapshot(),
            staff: r.staff.snapshot(),
            tables: r.tables.snapshot(),
            reservations: r.reservations.snapshot(),
            discounts: r.discounts.snapshot(),
            feedback: r.feedback.snapshot(),
            order_payments: r.order_payments.pairs().collect(),
            order_invoice: r.order_invoice.pairs().collect(),
            order_requests: r.order_requests.pairs().collect(),
            customer_orders: r.customer_orders.pairs().collect(),
            order_tables: r.order_tables.pairs().collect(),
            order_discounts: r.order_discounts.pairs().collect(),
            menu_contents: r.menu_contents.pairs().collect(),
            item_ingredients: r.item_ingredients.pairs().collect(),
            supplier_ingredients: r.supplier_ingredients.pairs().collect(),
            reservation_tables: r.reservation_tables.pairs().collect(),
            customer_feedback: r.customer_feedback.pairs().collect(),
            item_feedback: r.item_feedback.pairs().collect(),
            quantities: r
                .item_quantities
                .ids()
                .into_iter()
                .filter_map(|line| {
                    r.quantities
                        .endpoints(line)
                        .map(|(request, item)| (line, request, item))
                })
                .collect(),
            supplies: r
                .supply_logs
                .ids()
                .into_iter()
                .filter_map(|log| {
                    r.supplies
                        .endpoints(log)
                        .map(|(supplier, ingredient)| (log, supplier, ingredient))
                })
                .collect(),
            supervision: r.supervision.links().pairs().collect(),
            bookings,
        }
    }
}

/// Fail if a link names an entity its extent does not hold.
fn require_endpoint<K: EntityKey, T>(
    extent: &Extent<K, T>,
    key: K,
    relationship: &str,
) -> Result<(), TrattoriaError> {
    if extent.contains(key) {
        Ok(())
    } else {
        Err(TrattoriaError::DeserializationError(format!(
            "{}: link to unknown {}",
            relationship, key
        )))
    }
}

/// Re-attach stored forward pairs through the link primitive.
fn repair<S: EntityKey, T: EntityKey, A, B>(
    association: &mut Association<S, T>,
    sources: &Extent<S, A>,
    targets: &Extent<T, B>,
    pairs: Vec<(S, T)>,
) -> Result<(), TrattoriaError> {
    let relationship = association.def().name;
    for (source, target) in pairs {
        require_endpoint(sources, source, relationship)?;
        require_endpoint(targets, target, relationship)?;
        association.attach(source, target).map_err(|e| {
            TrattoriaError::DeserializationError(format!("{} -> {}: {}", source, target, e))
        })?;
    }
    Ok(())
}

/// Largest raw id in an extent, if any.
fn highest<K: EntityKey, T>(items: &[(K, T)]) -> u64 {
    items.last().map_or(0, |(key, _)| key.raw())
}

impl TryFrom<SerializableRestaurant> for Restaurant {
    type Error = TrattoriaError;

    fn try_from(s: SerializableRestaurant) -> Result<Self, Self::Error> {
        let highest_id = [
            highest(&s.customers),
            highest(&s.orders),
            highest(&s.payments),
            highest(&s.invoices),
            highest(&s.requests),
            highest(&s.item_quantities),
            highest(&s.menus),
            highest(&s.menu_items),
            highest(&s.ingredients),
            highest(&s.suppliers),
            highest(&s.supply_logs),
            highest(&s.staff),
            highest(&s.tables),
            highest(&s.reservations),
            highest(&s.discounts),
            highest(&s.feedback),
        ]
        .into_iter()
        .max()
        .unwrap_or(0);
        if s.next_id <= highest_id {
            return Err(TrattoriaError::DeserializationError(format!(
                "next id {} is not above highest stored id {}",
                s.next_id, highest_id
            )));
        }

        let mut r = Restaurant::new();
        r.next_id = s.next_id;

        // 1. Bulk-replace every extent.
        r.customers.replace_all(s.customers)?;
        r.orders.replace_all(s.orders)?;
        r.payments.replace_all(s.payments)?;
        r.invoices.replace_all(s.invoices)?;
        r.requests.replace_all(s.requests)?;
        r.item_quantities.replace_all(s.item_quantities)?;
        r.menus.replace_all(s.menus)?;
        r.menu_items.replace_all(s.menu_items)?;
        r.ingredients.replace_all(s.ingredients)?;
        r.suppliers.replace_all(s.suppliers)?;
        r.supply_logs.replace_all(s.supply_logs)?;
        r.staff.replace_all(s.staff)?;
        r.tables.replace_all(s.tables)?;
        r.reservations.replace_all(s.reservations)?;
        r.discounts.replace_all(s.discounts)?;
        r.feedback.replace_all(s.feedback)?;

        // 2. Reverse-connection repair: every link goes back in through the
        // engine so both ends are populated.
        repair(&mut r.order_payments, &r.orders, &r.payments, s.order_payments)?;
        repair(&mut r.order_invoice, &r.orders, &r.invoices, s.order_invoice)?;
        repair(&mut r.order_requests, &r.orders, &r.requests, s.order_requests)?;
        repair(&mut r.customer_orders, &r.customers, &r.orders, s.customer_orders)?;
        repair(&mut r.order_tables, &r.orders, &r.tables, s.order_tables)?;
        repair(&mut r.order_discounts, &r.orders, &r.discounts, s.order_discounts)?;
        repair(&mut r.menu_contents, &r.menus, &r.menu_items, s.menu_contents)?;
        repair(&mut r.item_ingredients, &r.menu_items, &r.ingredients, s.item_ingredients)?;
        repair(
            &mut r.supplier_ingredients,
            &r.suppliers,
            &r.ingredients,
            s.supplier_ingredients,
        )?;
        repair(
            &mut r.reservation_tables,
            &r.reservations,
            &r.tables,
            s.reservation_tables,
        )?;
        repair(&mut r.customer_feedback, &r.customers, &r.feedback, s.customer_feedback)?;
        repair(&mut r.item_feedback, &r.menu_items, &r.feedback, s.item_feedback)?;

        for (line, request, item) in s.quantities {
            require_endpoint(&r.item_quantities, line, "item-quantities")?;
            require_endpoint(&r.requests, request, "item-quantities")?;
            require_endpoint(&r.menu_items, item, "item-quantities")?;
            r.quantities.create(request, item, line)?;
        }
        for (log, supplier, ingredient) in s.supplies {
            require_endpoint(&r.supply_logs, log, "supply-logs")?;
            require_endpoint(&r.suppliers, supplier, "supply-logs")?;
            require_endpoint(&r.ingredients, ingredient, "supply-logs")?;
            r.supplies.create(supplier, ingredient, log)?;
        }
        for (supervisor, subordinate) in s.supervision {
            require_endpoint(&r.staff, supervisor, "supervision")?;
            require_endpoint(&r.staff, subordinate, "supervision")?;
            r.supervision.restore(supervisor, subordinate)?;
        }
        for (reservation, customer) in s.bookings {
            require_endpoint(&r.customers, customer, "customer-reservations")?;
            let slot = r.reservations.require(reservation)?.slot;
            r.bookings.add(customer, slot, reservation)?;
        }

        // 3. Whole-graph check.
        let report = r.verify_integrity();
        if let Some(first) = report.violations.first() {
            return Err(TrattoriaError::DeserializationError(format!(
                "{} integrity violation(s), first: {}",
                report.violations.len(),
                first
            )));
        }
        Ok(r)
    }
}
