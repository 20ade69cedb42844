//! Orders, payments, invoices, kitchen requests, tables and discounts.

use super::Restaurant;
use super::catalogue::ORDER_INVOICE;
use crate::entities::{
    Customer, Discount, Invoice, InvoiceTotals, ItemQuantity, Order, OrderKind, OrderRequest,
    Payment,
};
use crate::relationship::Attach;
use crate::status::{Lifecycle, OrderRequestStatus, OrderStatus, PaymentStatus};
use crate::types::{
    CustomerId, DiscountId, InvoiceId, ItemQuantityId, MenuItemId, Money, OrderId,
    OrderRequestId, PaymentId, TableId, TrattoriaError,
};

impl Restaurant {
    // =========================================================================
    // ORDERS
    // =========================================================================

    /// Place an order, optionally for a known customer.
    pub fn place_order(
        &mut self,
        customer: Option<CustomerId>,
        order: Order,
    ) -> Result<OrderId, TrattoriaError> {
        if let Some(customer) = customer {
            self.customers.require(customer)?;
        }
        let id: OrderId = self.claim();
        if let Some(customer) = customer {
            self.customer_orders.attach(customer, id)?;
        }
        self.orders.insert(id, order)?;
        tracing::debug!(order = %id, "order placed");
        Ok(id)
    }

    /// Move an order to `customer`. Returns the previous customer.
    pub fn assign_customer(
        &mut self,
        order: OrderId,
        customer: CustomerId,
    ) -> Result<Option<CustomerId>, TrattoriaError> {
        self.orders.require(order)?;
        self.customers.require(customer)?;
        self.customer_orders.reassign(order, customer)
    }

    /// Make an order anonymous. Returns the former customer.
    pub fn clear_customer(&mut self, order: OrderId) -> Result<Option<CustomerId>, TrattoriaError> {
        self.orders.require(order)?;
        match self.customer_orders.source_of(order) {
            Some(customer) => {
                self.customer_orders.detach(customer, order)?;
                Ok(Some(customer))
            }
            None => Ok(None),
        }
    }

    /// Move an order through its lifecycle.
    ///
    /// Completing or cancelling an order releases every table it holds.
    pub fn set_order_status(
        &mut self,
        order: OrderId,
        next: OrderStatus,
    ) -> Result<(), TrattoriaError> {
        let record = self.orders.get_mut(order)?;
        record.status = record.status.advance(next)?;

        if next.is_terminal() {
            let released = self.order_tables.purge_source(order);
            if !released.is_empty() {
                tracing::info!(order = %order, tables = released.len(), "tables released");
            }
        }
        Ok(())
    }

    /// Delete an order with every part it owns.
    ///
    /// Payments, the invoice, requests and their item quantities go with it;
    /// tables, discounts and the customer are only unlinked.
    pub fn delete_order(&mut self, order: OrderId) -> Result<Order, TrattoriaError> {
        self.orders.require(order)?;

        for payment in self.order_payments.purge_source(order) {
            self.payments.remove(payment);
        }
        for invoice in self.order_invoice.purge_source(order) {
            self.invoices.remove(invoice);
        }
        for request in self.order_requests.purge_source(order) {
            self.drop_request_parts(request);
            self.requests.remove(request);
        }
        self.order_tables.purge_source(order);
        self.order_discounts.purge_source(order);
        self.customer_orders.purge_target(order);

        let record = self.orders.remove(order).ok_or_else(|| TrattoriaError::not_found(order))?;
        tracing::info!(order = %order, "order deleted");
        Ok(record)
    }

    // =========================================================================
    // PAYMENTS
    // =========================================================================

    /// Take a payment for an order.
    pub fn add_payment(&mut self, order: OrderId, payment: Payment) -> Result<PaymentId, TrattoriaError> {
        if self.orders.require(order)?.status == OrderStatus::Cancelled {
            return Err(TrattoriaError::InvalidState(format!(
                "{} is cancelled",
                order
            )));
        }
        let id: PaymentId = self.claim();
        self.order_payments.attach(order, id)?;
        self.payments.insert(id, payment)?;
        Ok(id)
    }

    /// Remove and destroy a payment. An order never drops its last payment.
    pub fn remove_payment(&mut self, order: OrderId, payment: PaymentId) -> Result<Payment, TrattoriaError> {
        self.orders.require(order)?;
        self.payments.require(payment)?;
        self.order_payments.detach(order, payment)?;
        self.payments
            .remove(payment)
            .ok_or_else(|| TrattoriaError::not_found(payment))
    }

    /// Settle, fail or refund a payment.
    ///
    /// Completing credits loyalty points to the order's customer; refunding
    /// takes them back.
    pub fn set_payment_status(
        &mut self,
        payment: PaymentId,
        next: PaymentStatus,
    ) -> Result<(), TrattoriaError> {
        let customer = self
            .order_payments
            .source_of(payment)
            .and_then(|order| self.customer_orders.source_of(order));

        let record = self.payments.get_mut(payment)?;
        let next = record.status.advance(next)?;
        let points = Customer::points_for(record.amount);

        if let Some(customer) = customer {
            let holder = self.customers.get_mut(customer)?;
            match next {
                PaymentStatus::Completed => {
                    holder.loyalty_points = holder.loyalty_points.saturating_add(points);
                }
                PaymentStatus::Refunded => {
                    holder.loyalty_points = holder.loyalty_points.saturating_sub(points);
                }
                PaymentStatus::Pending | PaymentStatus::Failed => {}
            }
        }
        record.status = next;
        Ok(())
    }

    /// Sum of completed payments on an order.
    pub fn amount_paid(&self, order: OrderId) -> Result<Money, TrattoriaError> {
        self.orders.require(order)?;
        let mut paid = Money::ZERO;
        for payment in self.order_payments.targets(order) {
            let record = self.payments.require(payment)?;
            if record.status == PaymentStatus::Completed {
                paid = paid.saturating_add(record.amount);
            }
        }
        Ok(paid)
    }

    // =========================================================================
    // INVOICE
    // =========================================================================

    /// Issue the order's invoice. An order gets exactly one, once.
    pub fn issue_invoice(&mut self, order: OrderId, invoice: Invoice) -> Result<InvoiceId, TrattoriaError> {
        self.orders.require(order)?;
        if self.order_invoice.target_count(order) > 0 {
            return Err(TrattoriaError::OwnershipImmutable {
                relationship: ORDER_INVOICE.name,
            });
        }
        let id: InvoiceId = self.claim();
        self.order_invoice.attach(order, id)?;
        self.invoices.insert(id, invoice)?;
        Ok(id)
    }

    /// Amounts of an invoice, derived from its order as it stands.
    pub fn invoice_totals(&self, invoice: InvoiceId) -> Result<InvoiceTotals, TrattoriaError> {
        let record = self.invoices.require(invoice)?;
        let order = self
            .order_invoice
            .source_of(invoice)
            .ok_or(TrattoriaError::NotLinked {
                relationship: ORDER_INVOICE.name,
            })?;

        let subtotal = self.order_subtotal(order)?;
        let discount = self.order_discount(order)?;
        let net = subtotal.saturating_sub(discount);
        let tax = net.basis_points(u32::from(record.tax_rate_bp));
        Ok(InvoiceTotals {
            subtotal,
            discount,
            tax,
            total: net.saturating_add(tax),
        })
    }

    // =========================================================================
    // KITCHEN REQUESTS
    // =========================================================================

    /// Send a request to the kitchen with its item lines.
    ///
    /// Every line is validated before anything is linked.
    pub fn raise_request(
        &mut self,
        order: OrderId,
        request: OrderRequest,
        lines: &[(MenuItemId, ItemQuantity)],
    ) -> Result<OrderRequestId, TrattoriaError> {
        let status = self.orders.require(order)?.status;
        if status.is_terminal() {
            return Err(TrattoriaError::InvalidState(format!(
                "{} is {}",
                order,
                status.name()
            )));
        }
        for (item, _) in lines {
            self.menu_items.require(*item)?;
        }

        let id: OrderRequestId = self.claim();
        self.order_requests.attach(order, id)?;
        self.requests.insert(id, request)?;
        for (item, quantity) in lines {
            self.add_item_quantity(id, *item, *quantity)?;
        }
        Ok(id)
    }

    /// Add an item line to a request.
    ///
    /// Lines are independent: the same item may appear on several lines.
    pub fn add_item_quantity(
        &mut self,
        request: OrderRequestId,
        item: MenuItemId,
        quantity: ItemQuantity,
    ) -> Result<ItemQuantityId, TrattoriaError> {
        self.requests.require(request)?;
        self.menu_items.require(item)?;
        let id: ItemQuantityId = self.claim();
        self.quantities.create(request, item, id)?;
        self.item_quantities.insert(id, quantity)?;
        Ok(id)
    }

    /// Delete an item line, clearing it from both ends.
    pub fn delete_item_quantity(&mut self, line: ItemQuantityId) -> Result<ItemQuantity, TrattoriaError> {
        self.item_quantities.require(line)?;
        self.quantities.delete(line)?;
        self.item_quantities
            .remove(line)
            .ok_or_else(|| TrattoriaError::not_found(line))
    }

    pub fn set_request_status(
        &mut self,
        request: OrderRequestId,
        next: OrderRequestStatus,
    ) -> Result<(), TrattoriaError> {
        let record = self.requests.get_mut(request)?;
        record.status = record.status.advance(next)?;
        Ok(())
    }

    /// Delete a request and its item lines.
    pub fn delete_request(&mut self, request: OrderRequestId) -> Result<OrderRequest, TrattoriaError> {
        self.requests.require(request)?;
        self.drop_request_parts(request);
        self.order_requests.purge_target(request);
        self.requests
            .remove(request)
            .ok_or_else(|| TrattoriaError::not_found(request))
    }

    fn drop_request_parts(&mut self, request: OrderRequestId) {
        for line in self.quantities.delete_for_left(request) {
            self.item_quantities.remove(line);
        }
    }

    /// Sum of price x quantity over every line of every request.
    pub fn order_subtotal(&self, order: OrderId) -> Result<Money, TrattoriaError> {
        self.orders.require(order)?;
        let mut subtotal = Money::ZERO;
        for request in self.order_requests.targets(order) {
            for line in self.quantities.of_left(request) {
                let Some((_, item)) = self.quantities.endpoints(line) else {
                    continue;
                };
                let price = self.menu_items.require(item)?.price;
                let quantity = self.item_quantities.require(line)?.quantity;
                subtotal = subtotal.saturating_add(price.times(quantity));
            }
        }
        Ok(subtotal)
    }

    // =========================================================================
    // TABLES
    // =========================================================================

    fn require_seatable(&self, order: OrderId) -> Result<(), TrattoriaError> {
        let record = self.orders.require(order)?;
        if record.kind != OrderKind::DineIn {
            return Err(TrattoriaError::InvalidState(format!(
                "{} is {}, only dine-in orders are seated",
                order,
                record.kind.name()
            )));
        }
        if record.status.is_terminal() {
            return Err(TrattoriaError::InvalidState(format!(
                "{} is {}",
                order,
                record.status.name()
            )));
        }
        Ok(())
    }

    /// Seat a dine-in order at a free table.
    pub fn assign_table(&mut self, order: OrderId, table: TableId) -> Result<Attach, TrattoriaError> {
        self.require_seatable(order)?;
        self.tables.require(table)?;
        self.order_tables.attach(order, table)
    }

    /// Free one table of an order.
    pub fn release_table(&mut self, order: OrderId, table: TableId) -> Result<(), TrattoriaError> {
        self.orders.require(order)?;
        self.tables.require(table)?;
        self.order_tables.detach(order, table)
    }

    /// Move a table to another dine-in order. Returns the previous order.
    pub fn reseat_table(&mut self, table: TableId, order: OrderId) -> Result<Option<OrderId>, TrattoriaError> {
        self.require_seatable(order)?;
        self.tables.require(table)?;
        self.order_tables.reassign(table, order)
    }

    // =========================================================================
    // DISCOUNTS
    // =========================================================================

    /// Register a discount. Codes are unique.
    pub fn add_discount(&mut self, discount: Discount) -> Result<DiscountId, TrattoriaError> {
        if self.discounts.iter().any(|(_, d)| d.code == discount.code) {
            return Err(TrattoriaError::invalid_field(
                "discount code",
                format!("{} already exists", discount.code),
            ));
        }
        let id: DiscountId = self.claim();
        self.discounts.insert(id, discount)?;
        Ok(id)
    }

    /// Apply a discount to an order. Applying it twice is an error.
    pub fn apply_discount(&mut self, order: OrderId, discount: DiscountId) -> Result<(), TrattoriaError> {
        self.orders.require(order)?;
        self.discounts.require(discount)?;
        self.order_discounts.attach(order, discount).map(|_| ())
    }

    pub fn remove_discount(&mut self, order: OrderId, discount: DiscountId) -> Result<(), TrattoriaError> {
        self.orders.require(order)?;
        self.discounts.require(discount)?;
        self.order_discounts.detach(order, discount)
    }

    /// Delete a discount, unlinking it from every order.
    pub fn delete_discount(&mut self, discount: DiscountId) -> Result<Discount, TrattoriaError> {
        self.discounts.require(discount)?;
        self.order_discounts.purge_target(discount);
        self.discounts
            .remove(discount)
            .ok_or_else(|| TrattoriaError::not_found(discount))
    }

    /// Reduction from the largest applied discount. Discounts do not stack.
    pub fn order_discount(&self, order: OrderId) -> Result<Money, TrattoriaError> {
        let subtotal = self.order_subtotal(order)?;
        let mut best = Money::ZERO;
        for discount in self.order_discounts.targets(order) {
            best = best.max(self.discounts.require(discount)?.reduction(subtotal));
        }
        Ok(best)
    }

    /// Subtotal minus the best discount.
    pub fn order_total(&self, order: OrderId) -> Result<Money, TrattoriaError> {
        Ok(self
            .order_subtotal(order)?
            .saturating_sub(self.order_discount(order)?))
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{Ingredient, MenuItem, Table};
    use chrono::NaiveDate;

    struct Fixture {
        r: Restaurant,
        customer: CustomerId,
        pizza: MenuItemId,
        pasta: MenuItemId,
    }

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 6, 1).expect("date")
    }

    fn order(kind: OrderKind) -> Order {
        let at = day().and_hms_opt(19, 0, 0).expect("time");
        Order::new(kind, at, None).expect("order")
    }

    fn fixture() -> Fixture {
        let mut r = Restaurant::new();
        let customer = r
            .add_customer(Customer::new("Ada", None).expect("customer"))
            .expect("add");
        let flour = r
            .add_ingredient(Ingredient::new("Flour", "g", 1000).expect("ingredient"))
            .expect("add");
        let pizza = r
            .create_menu_item(MenuItem::new("Pizza", Money(900), true).expect("item"), &[flour])
            .expect("item");
        let pasta = r
            .create_menu_item(MenuItem::new("Pasta", Money(1200), true).expect("item"), &[flour])
            .expect("item");
        Fixture {
            r,
            customer,
            pizza,
            pasta,
        }
    }

    fn qty(n: u32) -> ItemQuantity {
        ItemQuantity::new(n).expect("qty")
    }

    #[test]
    fn subtotal_discount_and_invoice() {
        let mut f = fixture();
        let o = f
            .r
            .place_order(Some(f.customer), order(OrderKind::Takeaway))
            .expect("order");
        f.r.raise_request(
            o,
            OrderRequest::new(None).expect("request"),
            &[(f.pizza, qty(2)), (f.pasta, qty(1))],
        )
        .expect("request");
        assert_eq!(f.r.order_subtotal(o).expect("subtotal"), Money(3000));

        let ten = f.r.add_discount(Discount::new("TEN", 10).expect("d")).expect("add");
        let twenty = f.r.add_discount(Discount::new("TWENTY", 20).expect("d")).expect("add");
        f.r.apply_discount(o, ten).expect("apply");
        f.r.apply_discount(o, twenty).expect("apply");
        assert!(matches!(
            f.r.apply_discount(o, ten),
            Err(TrattoriaError::AlreadyLinked { .. })
        ));
        assert_eq!(f.r.order_total(o).expect("total"), Money(2400));

        let inv = f
            .r
            .issue_invoice(o, Invoice::new("INV-1", day(), 1000).expect("invoice"))
            .expect("issue");
        let totals = f.r.invoice_totals(inv).expect("totals");
        assert_eq!(totals.discount, Money(600));
        assert_eq!(totals.tax, Money(240));
        assert_eq!(totals.total, Money(2640));
    }

    #[test]
    fn invoice_is_set_once() {
        let mut f = fixture();
        let o = f.r.place_order(None, order(OrderKind::Takeaway)).expect("order");
        f.r.issue_invoice(o, Invoice::standard("INV-1", day()).expect("inv"))
            .expect("first");
        assert!(matches!(
            f.r.issue_invoice(o, Invoice::standard("INV-2", day()).expect("inv")),
            Err(TrattoriaError::OwnershipImmutable { .. })
        ));
        assert_eq!(f.r.invoices().len(), 1);
    }

    #[test]
    fn payment_completion_credits_loyalty() {
        let mut f = fixture();
        let o = f
            .r
            .place_order(Some(f.customer), order(OrderKind::Takeaway))
            .expect("order");
        let p = f
            .r
            .add_payment(o, Payment::cash(Money(2550), Money(3000)).expect("cash"))
            .expect("pay");

        f.r.set_payment_status(p, PaymentStatus::Completed).expect("complete");
        assert_eq!(f.r.customers().require(f.customer).expect("c").loyalty_points, 25);
        assert_eq!(f.r.amount_paid(o).expect("paid"), Money(2550));

        f.r.set_payment_status(p, PaymentStatus::Refunded).expect("refund");
        assert_eq!(f.r.customers().require(f.customer).expect("c").loyalty_points, 0);
        assert!(f.r.set_payment_status(p, PaymentStatus::Completed).is_err());
    }

    #[test]
    fn only_dine_in_orders_get_tables() {
        let mut f = fixture();
        let table = f.r.add_table(Table::new(1, 4).expect("table")).expect("add");
        let takeaway = f.r.place_order(None, order(OrderKind::Takeaway)).expect("order");
        assert!(matches!(
            f.r.assign_table(takeaway, table),
            Err(TrattoriaError::InvalidState(_))
        ));

        let dine_in = f.r.place_order(None, order(OrderKind::DineIn)).expect("order");
        f.r.assign_table(dine_in, table).expect("seat");
        let other = f.r.place_order(None, order(OrderKind::DineIn)).expect("order");
        assert!(matches!(
            f.r.assign_table(other, table),
            Err(TrattoriaError::AboveMaximumCardinality { .. })
        ));

        assert_eq!(f.r.reseat_table(table, other).expect("reseat"), Some(dine_in));
        assert_eq!(f.r.order_tables().source_of(table), Some(other));
    }

    #[test]
    fn completing_dine_in_releases_tables() {
        let mut f = fixture();
        let table = f.r.add_table(Table::new(1, 4).expect("table")).expect("add");
        let o = f.r.place_order(None, order(OrderKind::DineIn)).expect("order");
        f.r.assign_table(o, table).expect("seat");

        for next in [OrderStatus::Preparing, OrderStatus::Served, OrderStatus::Completed] {
            f.r.set_order_status(o, next).expect("advance");
        }
        assert_eq!(f.r.order_tables().target_count(o), 0);
        assert_eq!(f.r.order_tables().source_of(table), None);
    }

    #[test]
    fn delete_order_cascades() {
        let mut f = fixture();
        let table = f.r.add_table(Table::new(1, 4).expect("table")).expect("add");
        let o = f
            .r
            .place_order(Some(f.customer), order(OrderKind::DineIn))
            .expect("order");
        f.r.assign_table(o, table).expect("seat");
        f.r.add_payment(o, Payment::cash(Money(100), Money(100)).expect("cash"))
            .expect("pay");
        f.r.issue_invoice(o, Invoice::standard("INV-9", day()).expect("inv"))
            .expect("invoice");
        let req = f
            .r
            .raise_request(o, OrderRequest::new(None).expect("req"), &[(f.pizza, qty(1))])
            .expect("request");

        f.r.delete_order(o).expect("delete");

        assert!(f.r.payments().is_empty());
        assert!(f.r.invoices().is_empty());
        assert!(!f.r.requests().contains(req));
        assert!(f.r.item_quantities().is_empty());
        assert_eq!(f.r.quantities().of_right(f.pizza).count(), 0);
        assert_eq!(f.r.customer_orders().target_count(f.customer), 0);
        assert_eq!(f.r.order_tables().source_of(table), None);
        assert!(f.r.verify_integrity().is_consistent());
    }

    #[test]
    fn request_lines_validated_first() {
        let mut f = fixture();
        let o = f.r.place_order(None, order(OrderKind::Takeaway)).expect("order");
        let before = f.r.requests().len();

        let err = f
            .r
            .raise_request(
                o,
                OrderRequest::new(None).expect("req"),
                &[(f.pizza, qty(1)), (MenuItemId(999), qty(1))],
            )
            .expect_err("unknown item");
        assert!(matches!(err, TrattoriaError::EntityNotFound { .. }));
        assert_eq!(f.r.requests().len(), before);
        assert!(f.r.item_quantities().is_empty());
    }
}
