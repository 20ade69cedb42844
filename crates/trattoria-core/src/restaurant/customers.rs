//! Customers and their feedback.

use super::Restaurant;
use crate::entities::{Customer, Feedback};
use crate::types::{CustomerId, FeedbackId, MenuItemId, TrattoriaError};

impl Restaurant {
    pub fn add_customer(&mut self, customer: Customer) -> Result<CustomerId, TrattoriaError> {
        let id: CustomerId = self.claim();
        self.customers.insert(id, customer)?;
        Ok(id)
    }

    /// Delete a customer.
    ///
    /// Orders stay but become anonymous. Feedback and reservations belong to
    /// the customer and are deleted with it.
    pub fn delete_customer(&mut self, customer: CustomerId) -> Result<Customer, TrattoriaError> {
        self.customers.require(customer)?;

        self.customer_orders.purge_source(customer);
        for entry in self.customer_feedback.purge_source(customer) {
            self.item_feedback.purge_target(entry);
            self.feedback.remove(entry);
        }
        for reservation in self.bookings.release_owner(customer) {
            self.reservation_tables.purge_source(reservation);
            self.reservations.remove(reservation);
        }

        let record = self
            .customers
            .remove(customer)
            .ok_or_else(|| TrattoriaError::not_found(customer))?;
        tracing::info!(customer = %customer, "customer deleted");
        Ok(record)
    }

    /// Record a customer's feedback on a menu item.
    pub fn submit_feedback(
        &mut self,
        customer: CustomerId,
        item: MenuItemId,
        feedback: Feedback,
    ) -> Result<FeedbackId, TrattoriaError> {
        self.customers.require(customer)?;
        self.menu_items.require(item)?;

        let id: FeedbackId = self.claim();
        self.customer_feedback.check_attach(customer, id)?;
        self.item_feedback.check_attach(item, id)?;
        self.customer_feedback.attach(customer, id)?;
        self.item_feedback.attach(item, id)?;
        self.feedback.insert(id, feedback)?;
        Ok(id)
    }

    /// Delete a feedback entry from both its customer and its menu item.
    pub fn delete_feedback(&mut self, entry: FeedbackId) -> Result<Feedback, TrattoriaError> {
        self.feedback.require(entry)?;
        self.customer_feedback.purge_target(entry);
        self.item_feedback.purge_target(entry);
        self.feedback
            .remove(entry)
            .ok_or_else(|| TrattoriaError::not_found(entry))
    }

    /// Average rating of a menu item in tenths (`43` is 4.3), if rated.
    pub fn average_rating(&self, item: MenuItemId) -> Result<Option<u64>, TrattoriaError> {
        self.menu_items.require(item)?;
        let mut total = 0u64;
        let mut count = 0u64;
        for entry in self.item_feedback.targets(item) {
            total += u64::from(self.feedback.require(entry)?.rating);
            count += 1;
        }
        Ok((count > 0).then(|| total * 10 / count))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{Ingredient, MenuItem, Order, OrderKind, Reservation, Table};
    use crate::types::{Money, ReservationSlot};
    use chrono::{NaiveDate, NaiveTime};

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 7, 4).expect("date")
    }

    fn setup() -> (Restaurant, CustomerId, MenuItemId) {
        let mut r = Restaurant::new();
        let c = r
            .add_customer(Customer::new("Ada", Some("ada@example.com")).expect("customer"))
            .expect("add");
        let basil = r
            .add_ingredient(Ingredient::new("Basil", "g", 50).expect("ingredient"))
            .expect("add");
        let item = r
            .create_menu_item(MenuItem::new("Pesto", Money(1100), true).expect("item"), &[basil])
            .expect("item");
        (r, c, item)
    }

    #[test]
    fn feedback_links_both_ends() {
        let (mut r, c, item) = setup();
        let fb = r
            .submit_feedback(c, item, Feedback::new(4, None, day()).expect("fb"))
            .expect("submit");
        r.submit_feedback(c, item, Feedback::new(5, None, day()).expect("fb"))
            .expect("submit");

        assert!(r.customer_feedback().is_linked(c, fb));
        assert!(r.item_feedback().is_linked(item, fb));
        assert_eq!(r.average_rating(item).expect("avg"), Some(45));

        r.delete_feedback(fb).expect("delete");
        assert!(!r.customer_feedback().is_linked(c, fb));
        assert_eq!(r.item_feedback().target_count(item), 1);
    }

    #[test]
    fn feedback_requires_known_item() {
        let (mut r, c, _) = setup();
        let err = r
            .submit_feedback(c, MenuItemId(404), Feedback::new(3, None, day()).expect("fb"))
            .expect_err("unknown item");
        assert!(matches!(err, TrattoriaError::EntityNotFound { .. }));
        assert!(r.feedback().is_empty());
        assert_eq!(r.customer_feedback().link_count(), 0);
    }

    #[test]
    fn deleting_customer_cascades() {
        let (mut r, c, item) = setup();
        let at = day().and_hms_opt(12, 0, 0).expect("time");
        let order = r
            .place_order(Some(c), Order::new(OrderKind::Takeaway, at, None).expect("order"))
            .expect("order");
        r.submit_feedback(c, item, Feedback::new(4, None, day()).expect("fb"))
            .expect("submit");
        let table = r.add_table(Table::new(3, 2).expect("table")).expect("table");
        let slot = ReservationSlot::new(day(), NaiveTime::from_hms_opt(20, 0, 0).expect("time"));
        let (reservation, _) = r
            .book(c, Reservation::new(slot, 2, None).expect("res"), &[table])
            .expect("book");

        r.delete_customer(c).expect("delete");

        assert!(r.orders().contains(order));
        assert_eq!(r.customer_orders().source_of(order), None);
        assert!(r.feedback().is_empty());
        assert_eq!(r.item_feedback().target_count(item), 0);
        assert!(!r.reservations().contains(reservation));
        assert_eq!(r.reservation_tables().source_count(table), 0);
        assert!(r.verify_integrity().is_consistent());
    }
}
