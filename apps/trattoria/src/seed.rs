//! Demo data for a fresh restaurant file.

use crate::config::RestaurantDefaults;
use chrono::{Datelike, NaiveDate, NaiveTime};
use serde::Serialize;
use trattoria_core::{
    Customer, Discount, Feedback, Ingredient, Invoice, ItemQuantity, ManagerProfile, Menu,
    MenuItem, Money, Order, OrderKind, OrderRequest, Payment, PaymentStatus, Reservation,
    ReservationSlot, Restaurant, Staff, StaffRole, Supplier, SupplyLog, Table, TrattoriaError,
};

/// What `seed` created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SeedSummary {
    pub entities: usize,
    pub links: usize,
}

fn time(hour: u32, minute: u32) -> Result<NaiveTime, TrattoriaError> {
    NaiveTime::from_hms_opt(hour, minute, 0)
        .ok_or_else(|| TrattoriaError::InvalidArgument(format!("bad time {}:{}", hour, minute)))
}

/// Populate an empty restaurant with a small, fully linked data set.
pub fn seed(
    r: &mut Restaurant,
    defaults: &RestaurantDefaults,
    today: NaiveDate,
) -> Result<SeedSummary, TrattoriaError> {
    if !r.is_empty() {
        return Err(TrattoriaError::InvalidState(
            "restaurant already has data; run init --force first".to_string(),
        ));
    }

    // Pantry and suppliers.
    let flour = r.add_ingredient(Ingredient::new("Flour", "g", 0)?)?;
    let tomato = r.add_ingredient(Ingredient::new("Tomato", "g", 0)?)?;
    let mozzarella = r.add_ingredient(Ingredient::new("Mozzarella", "g", 0)?)?;
    let basil = r.add_ingredient(Ingredient::new("Basil", "leaf", 0)?)?;
    let oil = r.add_ingredient(Ingredient::new("Olive oil", "ml", 0)?)?;

    let mill = r.add_supplier(Supplier::new("Mulino Bianco", None)?, &[flour])?;
    let dairy = r.add_supplier(
        Supplier::new("Caseificio Rossi", Some("ordini@caseificio.example"))?,
        &[mozzarella],
    )?;
    let market = r.add_supplier(Supplier::new("Mercato Centrale", None)?, &[tomato, basil, oil])?;
    r.record_supply(mill, flour, SupplyLog::new(25_000, Money(1), today)?)?;
    r.record_supply(dairy, mozzarella, SupplyLog::new(4_000, Money(2), today)?)?;
    r.record_supply(market, tomato, SupplyLog::new(10_000, Money(1), today)?)?;
    r.record_supply(market, basil, SupplyLog::new(200, Money(5), today)?)?;
    r.record_supply(market, oil, SupplyLog::new(5_000, Money(1), today)?)?;

    // Menu.
    let margherita = r.create_menu_item(
        MenuItem::new("Pizza Margherita", Money(1150), true)?,
        &[flour, tomato, mozzarella, basil],
    )?;
    let marinara = r.create_menu_item(
        MenuItem::new("Pizza Marinara", Money(950), true)?,
        &[flour, tomato, oil],
    )?;
    let caprese = r.create_menu_item(
        MenuItem::new("Insalata Caprese", Money(1000), true)?,
        &[tomato, mozzarella, basil, oil],
    )?;
    r.create_menu(
        Menu::new(&format!("{} dinner", defaults.name), None)?,
        &[margherita, marinara, caprese],
    )?;

    // Floor.
    let mut tables = Vec::new();
    for (number, seats) in [(1u16, 2u8), (2, 4), (3, 4), (4, 8)] {
        tables.push(r.add_table(Table::new(number, seats)?)?);
    }

    // Staff.
    let hired = today.with_day(1).unwrap_or(today);
    let giulia = r.hire(
        Staff::new("Giulia", StaffRole::Chef, hired)?.as_manager(ManagerProfile::new("Kitchen")?),
    )?;
    let marco = r.hire(
        Staff::new("Marco", StaffRole::Cook, hired)?.as_manager(ManagerProfile::new("Line")?),
    )?;
    r.hire(Staff::new("Sara", StaffRole::Waiter, hired)?)?;
    r.set_supervisor(marco, giulia)?;

    // Guests.
    let ada = r.add_customer(Customer::new("Ada", Some("ada@example.com"))?)?;
    let bea = r.add_customer(Customer::new("Bea", None)?.with_phone("+39 055 000000")?)?;

    let tomorrow = today.succ_opt().unwrap_or(today);
    r.book(
        ada,
        Reservation::new(ReservationSlot::new(tomorrow, time(20, 0)?), 2, None)?,
        &tables[..1],
    )?;

    let order = r.place_order(
        Some(bea),
        Order::new(OrderKind::DineIn, today.and_time(time(19, 30)?), None)?,
    )?;
    r.assign_table(order, tables[1])?;
    r.raise_request(
        order,
        OrderRequest::new(Some("one without basil"))?,
        &[
            (margherita, ItemQuantity::new(2)?),
            (caprese, ItemQuantity::new(1)?),
        ],
    )?;
    let welcome = r.add_discount(Discount::new("welcome", 10)?)?;
    r.apply_discount(order, welcome)?;
    let total = r.order_total(order)?;
    let payment = r.add_payment(order, Payment::card(total, "Bea", "4242")?)?;
    r.set_payment_status(payment, PaymentStatus::Completed)?;
    r.issue_invoice(
        order,
        Invoice::new("INV-0001", today, defaults.default_tax_rate_bp)?,
    )?;
    r.submit_feedback(bea, margherita, Feedback::new(5, Some("Perfetta"), today)?)?;

    let summary = SeedSummary {
        entities: r.counts().iter().map(|(_, n)| n).sum(),
        links: r.link_count(),
    };
    tracing::info!(entities = summary.entities, links = summary.links, "seeded");
    Ok(summary)
}
