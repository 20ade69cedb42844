//! # Relationship Scenario Tests (T0-T4)
//!
//! End-to-end checks of the relationship engine through the store's public
//! operations. Each tier exercises one relationship flavour.
//!
//! ## Tiers
//! - T0: Aggregation floor (menu item ingredients)
//! - T1: Reflexive hierarchy (manager supervision)
//! - T2: Association class with bag semantics (supply logs)
//! - T3: Association class deletion (item quantities)
//! - T4: Composition floor (order payments)

use chrono::{NaiveDate, NaiveDateTime};
use trattoria_core::{
    Attach, Customer, Ingredient, ItemQuantity, ManagerProfile, MenuItem, Money, Order, OrderKind,
    OrderRequest, Payment, Restaurant, Staff, StaffId, StaffRole, Supplier, SupplyLog,
    TrattoriaError,
};

fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 6, 12).expect("date")
}

fn noon() -> NaiveDateTime {
    day().and_hms_opt(12, 0, 0).expect("time")
}

fn ingredient(r: &mut Restaurant, name: &str) -> trattoria_core::IngredientId {
    r.add_ingredient(Ingredient::new(name, "g", 1000).expect("ingredient"))
        .expect("add ingredient")
}

// =============================================================================
// TIER T0: AGGREGATION FLOOR
// =============================================================================

mod t0_aggregation_floor {
    use super::*;

    /// T0.1: Removing the only ingredient of a dish fails and changes nothing.
    #[test]
    fn last_ingredient_cannot_be_removed() {
        let mut r = Restaurant::new();
        let cheese = ingredient(&mut r, "Cheese");
        let pizza = r
            .create_menu_item(MenuItem::new("Pizza", Money(1100), true).expect("item"), &[cheese])
            .expect("pizza");

        let result = r.unlink_ingredient(pizza, cheese);
        assert!(matches!(
            result,
            Err(TrattoriaError::BelowMinimumCardinality {
                relationship: "menu-item-ingredients",
                ..
            })
        ));
        assert!(r.item_ingredients().is_linked(pizza, cheese));
    }

    /// T0.2: With a second ingredient the removal succeeds on both sides.
    #[test]
    fn removal_after_second_ingredient() {
        let mut r = Restaurant::new();
        let cheese = ingredient(&mut r, "Cheese");
        let tomato = ingredient(&mut r, "Tomato");
        let pizza = r
            .create_menu_item(MenuItem::new("Pizza", Money(1100), true).expect("item"), &[cheese])
            .expect("pizza");

        assert_eq!(r.link_ingredient(pizza, tomato).expect("link"), Attach::Linked);
        r.unlink_ingredient(pizza, cheese).expect("unlink");

        assert_eq!(
            r.item_ingredients().targets(pizza).collect::<Vec<_>>(),
            vec![tomato]
        );
        assert_eq!(r.item_ingredients().sources(cheese).count(), 0);
        assert!(r.verify_integrity().is_consistent());
    }
}

// =============================================================================
// TIER T1: REFLEXIVE HIERARCHY
// =============================================================================

mod t1_reflexive_hierarchy {
    use super::*;

    fn manager(r: &mut Restaurant, name: &str) -> StaffId {
        r.hire(
            Staff::new(name, StaffRole::Chef, day())
                .expect("staff")
                .as_manager(ManagerProfile::new("Kitchen").expect("profile")),
        )
        .expect("hire")
    }

    /// T1.1: Closing a supervision loop fails and keeps every link.
    #[test]
    fn cycle_rejected() {
        let mut r = Restaurant::new();
        let a = manager(&mut r, "A");
        let b = manager(&mut r, "B");
        let c = manager(&mut r, "C");
        r.set_supervisor(a, b).expect("a -> b");
        r.set_supervisor(b, c).expect("b -> c");

        let result = r.set_supervisor(c, a);
        assert!(matches!(result, Err(TrattoriaError::Cycle { .. })));

        assert_eq!(r.supervision().supervisor_of(a), Some(b));
        assert_eq!(r.supervision().supervisor_of(b), Some(c));
        assert_eq!(r.supervision().supervisor_of(c), None);
        assert_eq!(r.supervision().chain(a), vec![b, c]);
    }

    /// T1.2: Self-supervision is rejected.
    #[test]
    fn self_supervision_rejected() {
        let mut r = Restaurant::new();
        let a = manager(&mut r, "A");
        assert!(matches!(
            r.set_supervisor(a, a),
            Err(TrattoriaError::SelfReference { .. })
        ));
    }

    /// T1.3: Changing supervisor moves the member between subordinate sets.
    #[test]
    fn supervisor_change_updates_both_sides() {
        let mut r = Restaurant::new();
        let a = manager(&mut r, "A");
        let b = manager(&mut r, "B");
        let c = manager(&mut r, "C");
        r.set_supervisor(a, b).expect("a -> b");

        assert_eq!(r.set_supervisor(a, c).expect("a -> c"), Some(b));
        assert_eq!(r.supervision().subordinates(b).count(), 0);
        assert_eq!(r.supervision().subordinates(c).collect::<Vec<_>>(), vec![a]);
    }
}

// =============================================================================
// TIER T2: ASSOCIATION CLASS (BAG)
// =============================================================================

mod t2_association_class_bag {
    use super::*;

    /// T2.1: Three deliveries for the same pair are three distinct logs.
    #[test]
    fn repeated_pair_yields_independent_logs() {
        let mut r = Restaurant::new();
        let flour = ingredient(&mut r, "Flour");
        let mill = r
            .add_supplier(Supplier::new("Mulino", None).expect("supplier"), &[flour])
            .expect("supplier");

        let logs: Vec<_> = (1..=3)
            .map(|n| {
                r.record_supply(
                    mill,
                    flour,
                    SupplyLog::new(n * 100, Money(2), day()).expect("log"),
                )
                .expect("supply")
            })
            .collect();

        assert_eq!(logs.len(), 3);
        assert!(logs[0] != logs[1] && logs[1] != logs[2]);
        assert_eq!(r.supplies().of_left(mill).collect::<Vec<_>>(), logs);
        assert_eq!(r.supplies().of_right(flour).collect::<Vec<_>>(), logs);
        assert_eq!(r.supply_logs().len(), 3);
        for log in &logs {
            assert_eq!(r.supplies().endpoints(*log), Some((mill, flour)));
        }
    }
}

// =============================================================================
// TIER T3: ASSOCIATION CLASS DELETION
// =============================================================================

mod t3_association_class_delete {
    use super::*;

    /// T3.1: Deleting an item line clears both ends and the extent.
    #[test]
    fn delete_clears_both_ends() {
        let mut r = Restaurant::new();
        let dough = ingredient(&mut r, "Dough");
        let pizza = r
            .create_menu_item(MenuItem::new("Pizza", Money(1100), true).expect("item"), &[dough])
            .expect("pizza");
        let order = r
            .place_order(None, Order::new(OrderKind::Takeaway, noon(), None).expect("order"))
            .expect("order");
        let request = r
            .raise_request(order, OrderRequest::new(None).expect("request"), &[])
            .expect("request");

        let line = r
            .add_item_quantity(request, pizza, ItemQuantity::new(3).expect("quantity"))
            .expect("line");
        r.delete_item_quantity(line).expect("delete");

        assert_eq!(r.quantities().of_left(request).count(), 0);
        assert_eq!(r.quantities().of_right(pizza).count(), 0);
        assert!(!r.item_quantities().contains(line));
        assert_eq!(r.quantities().endpoints(line), None);
        assert!(r.verify_integrity().is_consistent());
    }
}

// =============================================================================
// TIER T4: COMPOSITION FLOOR
// =============================================================================

mod t4_composition_floor {
    use super::*;

    /// T4.1: An order never drops its only payment; with two it may drop one.
    #[test]
    fn last_payment_cannot_be_removed() {
        let mut r = Restaurant::new();
        let ada = r
            .add_customer(Customer::new("Ada", None).expect("customer"))
            .expect("customer");
        let order = r
            .place_order(Some(ada), Order::new(OrderKind::DineIn, noon(), None).expect("order"))
            .expect("order");
        let first = r
            .add_payment(order, Payment::cash(Money(2000), Money(2000)).expect("payment"))
            .expect("first");

        assert!(matches!(
            r.remove_payment(order, first),
            Err(TrattoriaError::BelowMinimumCardinality {
                relationship: "order-payments",
                role: "payments",
                min: 1,
            })
        ));
        assert!(r.payments().contains(first));

        let second = r
            .add_payment(order, Payment::card(Money(500), "Ada", "4242").expect("payment"))
            .expect("second");
        r.remove_payment(order, first).expect("remove first");

        assert!(!r.payments().contains(first));
        assert_eq!(r.order_payments().source_of(first), None);
        assert!(r.verify_integrity().is_consistent());
        assert_eq!(
            r.order_payments().targets(order).collect::<Vec<_>>(),
            vec![second]
        );
    }

    /// T4.2: Deleting an order removes every owned part from every index.
    #[test]
    fn deleting_order_removes_every_part() {
        let mut r = Restaurant::new();
        let dough = ingredient(&mut r, "Dough");
        let pizza = r
            .create_menu_item(MenuItem::new("Pizza", Money(1100), true).expect("item"), &[dough])
            .expect("pizza");
        let order = r
            .place_order(None, Order::new(OrderKind::Delivery, noon(), None).expect("order"))
            .expect("order");
        let payment = r
            .add_payment(order, Payment::cash(Money(1100), Money(1500)).expect("payment"))
            .expect("payment");
        let request = r
            .raise_request(
                order,
                OrderRequest::new(Some("extra basil")).expect("request"),
                &[(pizza, ItemQuantity::new(1).expect("quantity"))],
            )
            .expect("request");

        r.delete_order(order).expect("delete");

        assert!(!r.payments().contains(payment));
        assert!(!r.requests().contains(request));
        assert!(r.item_quantities().is_empty());
        assert_eq!(r.quantities().of_right(pizza).count(), 0);
        assert_eq!(r.order_payments().link_count(), 0);
        assert!(r.verify_integrity().is_consistent());
    }
}
