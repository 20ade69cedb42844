//! Tables and reservations.

use super::Restaurant;
use super::catalogue::RESERVATION_TABLES;
use crate::entities::{Reservation, Table};
use crate::qualified::Registration;
use crate::relationship::Attach;
use crate::status::{Lifecycle, ReservationStatus};
use crate::types::{CustomerId, ReservationId, ReservationSlot, TableId, TrattoriaError};
use std::collections::BTreeSet;

impl Restaurant {
    // =========================================================================
    // TABLES
    // =========================================================================

    /// Add a table. Table numbers are unique.
    pub fn add_table(&mut self, table: Table) -> Result<TableId, TrattoriaError> {
        if self.tables.iter().any(|(_, t)| t.number == table.number) {
            return Err(TrattoriaError::invalid_field(
                "table number",
                format!("{} is already in use", table.number),
            ));
        }
        let id: TableId = self.claim();
        self.tables.insert(id, table)?;
        Ok(id)
    }

    /// Remove a table.
    ///
    /// Refused while it is the only table of a reservation; unlinked from any
    /// order it seats.
    pub fn delete_table(&mut self, table: TableId) -> Result<Table, TrattoriaError> {
        self.tables.require(table)?;
        self.reservation_tables.check_release_target(table)?;
        self.order_tables.purge_target(table);
        self.reservation_tables.purge_target(table);
        self.tables
            .remove(table)
            .ok_or_else(|| TrattoriaError::not_found(table))
    }

    // =========================================================================
    // RESERVATIONS
    // =========================================================================

    /// Book tables for a customer.
    ///
    /// The reservation is filed under its slot. If the customer already has a
    /// reservation for that slot, the earlier one stays reachable by slot and
    /// the new one is reported as shadowed.
    pub fn book(
        &mut self,
        customer: CustomerId,
        reservation: Reservation,
        tables: &[TableId],
    ) -> Result<(ReservationId, Registration<ReservationId>), TrattoriaError> {
        self.customers.require(customer)?;
        let tables: BTreeSet<TableId> = tables.iter().copied().collect();
        RESERVATION_TABLES.require_initial(tables.len())?;

        let mut seats = 0u32;
        for table in &tables {
            seats += u32::from(self.tables.require(*table)?.seats);
        }
        if seats < u32::from(reservation.party_size) {
            return Err(TrattoriaError::InvalidArgument(format!(
                "{} seats for a party of {}",
                seats, reservation.party_size
            )));
        }

        let id: ReservationId = self.claim();
        let slot = reservation.slot;
        for table in tables {
            self.reservation_tables.attach(id, table)?;
        }
        self.reservations.insert(id, reservation)?;
        let registration = self.bookings.add(customer, slot, id)?;
        Ok((id, registration))
    }

    /// Reservation filed for `customer` at `slot`.
    #[must_use]
    pub fn reservation_at(&self, customer: CustomerId, slot: ReservationSlot) -> Option<ReservationId> {
        self.bookings.lookup(customer, slot)
    }

    pub fn add_reservation_table(
        &mut self,
        reservation: ReservationId,
        table: TableId,
    ) -> Result<Attach, TrattoriaError> {
        self.reservations.require(reservation)?;
        self.tables.require(table)?;
        self.reservation_tables.attach(reservation, table)
    }

    /// Release one table of a reservation. A reservation keeps at least one.
    pub fn remove_reservation_table(
        &mut self,
        reservation: ReservationId,
        table: TableId,
    ) -> Result<(), TrattoriaError> {
        self.reservations.require(reservation)?;
        self.tables.require(table)?;
        self.reservation_tables.detach(reservation, table)
    }

    /// Move a reservation to another slot, re-filing it under the new key.
    pub fn reschedule(
        &mut self,
        reservation: ReservationId,
        slot: ReservationSlot,
    ) -> Result<Registration<ReservationId>, TrattoriaError> {
        let status = self.reservations.require(reservation)?.status;
        if status.is_terminal() {
            return Err(TrattoriaError::InvalidState(format!(
                "{} is {}",
                reservation,
                status.name()
            )));
        }
        let registration = self.bookings.rekey(reservation, slot)?;
        self.reservations.get_mut(reservation)?.slot = slot;
        Ok(registration)
    }

    /// Hand a reservation over to another customer, keeping its slot.
    pub fn transfer_reservation(
        &mut self,
        reservation: ReservationId,
        customer: CustomerId,
    ) -> Result<Registration<ReservationId>, TrattoriaError> {
        self.reservations.require(reservation)?;
        self.customers.require(customer)?;
        self.bookings.reassign(reservation, customer)
    }

    pub fn set_reservation_status(
        &mut self,
        reservation: ReservationId,
        next: ReservationStatus,
    ) -> Result<(), TrattoriaError> {
        let record = self.reservations.get_mut(reservation)?;
        record.status = record.status.advance(next)?;
        Ok(())
    }

    /// Delete a reservation, freeing its tables and its slot.
    pub fn delete_reservation(&mut self, reservation: ReservationId) -> Result<Reservation, TrattoriaError> {
        self.reservations.require(reservation)?;
        self.reservation_tables.purge_source(reservation);
        if self.bookings.owner_of(reservation).is_some() {
            self.bookings.remove(reservation)?;
        }
        self.reservations
            .remove(reservation)
            .ok_or_else(|| TrattoriaError::not_found(reservation))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::Customer;
    use chrono::{NaiveDate, NaiveTime};

    fn slot(day: u32, hour: u32) -> ReservationSlot {
        ReservationSlot::new(
            NaiveDate::from_ymd_opt(2026, 8, day).expect("date"),
            NaiveTime::from_hms_opt(hour, 0, 0).expect("time"),
        )
    }

    fn setup() -> (Restaurant, CustomerId, TableId, TableId) {
        let mut r = Restaurant::new();
        let c = r
            .add_customer(Customer::new("Ada", None).expect("customer"))
            .expect("add");
        let t1 = r.add_table(Table::new(1, 4).expect("table")).expect("add");
        let t2 = r.add_table(Table::new(2, 2).expect("table")).expect("add");
        (r, c, t1, t2)
    }

    fn party(at: ReservationSlot, size: u8) -> Reservation {
        Reservation::new(at, size, None).expect("reservation")
    }

    #[test]
    fn table_numbers_unique() {
        let (mut r, _, _, _) = setup();
        assert!(matches!(
            r.add_table(Table::new(1, 6).expect("table")),
            Err(TrattoriaError::InvalidField { .. })
        ));
    }

    #[test]
    fn booking_needs_tables_and_seats() {
        let (mut r, c, t1, t2) = setup();
        assert!(matches!(
            r.book(c, party(slot(1, 20), 2), &[]),
            Err(TrattoriaError::BelowMinimumCardinality { .. })
        ));
        assert!(matches!(
            r.book(c, party(slot(1, 20), 5), &[t1]),
            Err(TrattoriaError::InvalidArgument(_))
        ));
        let (id, reg) = r.book(c, party(slot(1, 20), 5), &[t1, t2]).expect("book");
        assert_eq!(reg, Registration::Registered);
        assert_eq!(r.reservation_at(c, slot(1, 20)), Some(id));
        assert_eq!(r.reservations().len(), 1);
    }

    #[test]
    fn same_slot_keeps_first_booking() {
        let (mut r, c, t1, t2) = setup();
        let (first, _) = r.book(c, party(slot(2, 19), 2), &[t1]).expect("first");
        let (second, reg) = r.book(c, party(slot(2, 19), 2), &[t2]).expect("second");

        assert_eq!(reg, Registration::Shadowed { by: first });
        assert_eq!(r.reservation_at(c, slot(2, 19)), Some(first));
        assert_eq!(r.bookings().owner_of(second), Some(c));

        let report = r.verify_integrity();
        assert!(report.is_consistent());
        assert_eq!(report.shadowed, vec![second]);
    }

    #[test]
    fn reschedule_rekeys() {
        let (mut r, c, t1, _) = setup();
        let (id, _) = r.book(c, party(slot(3, 19), 2), &[t1]).expect("book");

        r.reschedule(id, slot(4, 21)).expect("reschedule");
        assert_eq!(r.reservation_at(c, slot(3, 19)), None);
        assert_eq!(r.reservation_at(c, slot(4, 21)), Some(id));
        assert_eq!(r.reservations().require(id).expect("r").slot, slot(4, 21));
        assert!(r.verify_integrity().is_consistent());
    }

    #[test]
    fn transfer_moves_to_other_customer() {
        let (mut r, c, t1, _) = setup();
        let other = r
            .add_customer(Customer::new("Bea", None).expect("customer"))
            .expect("add");
        let (id, _) = r.book(c, party(slot(5, 20), 2), &[t1]).expect("book");

        r.transfer_reservation(id, other).expect("transfer");
        assert_eq!(r.reservation_at(c, slot(5, 20)), None);
        assert_eq!(r.reservation_at(other, slot(5, 20)), Some(id));
    }

    #[test]
    fn reservation_table_floor() {
        let (mut r, c, t1, t2) = setup();
        let (id, _) = r.book(c, party(slot(6, 20), 2), &[t1]).expect("book");

        assert!(r.remove_reservation_table(id, t1).is_err());
        assert!(r.delete_table(t1).is_err());
        r.add_reservation_table(id, t2).expect("add");
        r.remove_reservation_table(id, t1).expect("remove");
        r.delete_table(t1).expect("delete");
        assert_eq!(r.reservation_tables().targets(id).collect::<Vec<_>>(), vec![t2]);
    }

    #[test]
    fn delete_reservation_frees_slot() {
        let (mut r, c, t1, _) = setup();
        let (id, _) = r.book(c, party(slot(7, 20), 2), &[t1]).expect("book");
        r.set_reservation_status(id, ReservationStatus::Confirmed)
            .expect("confirm");

        r.delete_reservation(id).expect("delete");
        assert_eq!(r.reservation_at(c, slot(7, 20)), None);
        assert_eq!(r.reservation_tables().source_count(t1), 0);
        assert!(r.reservations().is_empty());
    }
}
