//! Dining tables and reservations.

use super::{clean_text, require_range};
use crate::primitives::{MAX_PARTY_SIZE, MAX_TABLE_SEATS};
use crate::status::ReservationStatus;
use crate::types::{ReservationSlot, TrattoriaError};
use serde::{Deserialize, Serialize};

/// A physical table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    /// Number shown on the floor plan; unique per restaurant.
    pub number: u16,
    pub seats: u8,
}

impl Table {
    pub fn new(number: u16, seats: u8) -> Result<Self, TrattoriaError> {
        require_range("table number", u64::from(number), 1, u64::from(u16::MAX))?;
        require_range("seats", u64::from(seats), 1, u64::from(MAX_TABLE_SEATS))?;
        Ok(Self { number, seats })
    }
}

/// A booking for a party at a date and time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reservation {
    pub slot: ReservationSlot,
    pub party_size: u8,
    pub status: ReservationStatus,
    pub note: Option<String>,
}

impl Reservation {
    pub fn new(
        slot: ReservationSlot,
        party_size: u8,
        note: Option<&str>,
    ) -> Result<Self, TrattoriaError> {
        require_range("party size", u64::from(party_size), 1, u64::from(MAX_PARTY_SIZE))?;
        Ok(Self {
            slot,
            party_size,
            status: ReservationStatus::Pending,
            note: clean_text("reservation note", note)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};

    #[test]
    fn table_bounds() {
        assert!(Table::new(0, 4).is_err());
        assert!(Table::new(1, 0).is_err());
        assert!(Table::new(1, MAX_TABLE_SEATS + 1).is_err());
        assert!(Table::new(12, 4).is_ok());
    }

    #[test]
    fn party_bounds() {
        let slot = ReservationSlot::new(
            NaiveDate::from_ymd_opt(2026, 5, 1).expect("date"),
            NaiveTime::from_hms_opt(20, 0, 0).expect("time"),
        );
        assert!(Reservation::new(slot, 0, None).is_err());
        assert!(Reservation::new(slot, MAX_PARTY_SIZE + 1, None).is_err());
        let r = Reservation::new(slot, 4, Some("birthday")).expect("reservation");
        assert_eq!(r.status, ReservationStatus::Pending);
    }
}
