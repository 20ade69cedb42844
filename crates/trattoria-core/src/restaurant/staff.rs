//! Staff and the manager supervision hierarchy.

use super::Restaurant;
use crate::entities::{ManagerProfile, Staff};
use crate::types::{StaffId, TrattoriaError};
use chrono::NaiveDate;

impl Restaurant {
    pub fn hire(&mut self, staff: Staff) -> Result<StaffId, TrattoriaError> {
        let id: StaffId = self.claim();
        self.staff.insert(id, staff)?;
        Ok(id)
    }

    fn require_manager(&self, member: StaffId) -> Result<(), TrattoriaError> {
        if !self.staff.require(member)?.is_manager() {
            return Err(TrattoriaError::InvalidArgument(format!(
                "{} is not a manager",
                member
            )));
        }
        Ok(())
    }

    /// Give a staff member the manager profile.
    pub fn promote(&mut self, member: StaffId, profile: ManagerProfile) -> Result<(), TrattoriaError> {
        self.staff.get_mut(member)?.manager = Some(profile);
        Ok(())
    }

    /// Take the manager profile away.
    ///
    /// Refused while the manager has subordinates. A demoted member also
    /// leaves their own supervisor.
    pub fn demote(&mut self, member: StaffId) -> Result<ManagerProfile, TrattoriaError> {
        self.require_manager(member)?;
        self.supervision.release(member)?;
        self.staff
            .get_mut(member)?
            .manager
            .take()
            .ok_or_else(|| TrattoriaError::InvalidState(format!("{} is not a manager", member)))
    }

    /// Make `member` report to `supervisor`. Both must be managers.
    ///
    /// Returns the previous supervisor.
    pub fn set_supervisor(
        &mut self,
        member: StaffId,
        supervisor: StaffId,
    ) -> Result<Option<StaffId>, TrattoriaError> {
        self.require_manager(member)?;
        self.require_manager(supervisor)?;
        self.supervision.set_supervisor(member, supervisor)
    }

    pub fn clear_supervisor(&mut self, member: StaffId) -> Result<Option<StaffId>, TrattoriaError> {
        self.staff.require(member)?;
        self.supervision.clear_supervisor(member)
    }

    pub fn remove_subordinate(
        &mut self,
        supervisor: StaffId,
        subordinate: StaffId,
    ) -> Result<(), TrattoriaError> {
        self.staff.require(supervisor)?;
        self.staff.require(subordinate)?;
        self.supervision.remove_subordinate(supervisor, subordinate)
    }

    /// Remove a staff member. Refused while they have subordinates.
    pub fn dismiss(&mut self, member: StaffId) -> Result<Staff, TrattoriaError> {
        self.staff.require(member)?;
        self.supervision.release(member)?;
        self.staff
            .remove(member)
            .ok_or_else(|| TrattoriaError::not_found(member))
    }

    pub fn years_of_service(&self, member: StaffId, on: NaiveDate) -> Result<u32, TrattoriaError> {
        Ok(self.staff.require(member)?.years_of_service(on))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::StaffRole;

    fn hired() -> NaiveDate {
        NaiveDate::from_ymd_opt(2021, 9, 1).expect("date")
    }

    fn manager(r: &mut Restaurant, name: &str) -> StaffId {
        let profile = ManagerProfile::new("Floor").expect("profile");
        r.hire(
            Staff::new(name, StaffRole::Host, hired())
                .expect("staff")
                .as_manager(profile),
        )
        .expect("hire")
    }

    #[test]
    fn only_managers_supervise() {
        let mut r = Restaurant::new();
        let boss = manager(&mut r, "Boss");
        let waiter = r
            .hire(Staff::new("Wes", StaffRole::Waiter, hired()).expect("staff"))
            .expect("hire");

        assert!(matches!(
            r.set_supervisor(waiter, boss),
            Err(TrattoriaError::InvalidArgument(_))
        ));
        r.promote(waiter, ManagerProfile::new("Bar").expect("profile"))
            .expect("promote");
        r.set_supervisor(waiter, boss).expect("supervise");
        assert_eq!(r.supervision().supervisor_of(waiter), Some(boss));
    }

    #[test]
    fn demote_blocked_by_subordinates() {
        let mut r = Restaurant::new();
        let a = manager(&mut r, "A");
        let b = manager(&mut r, "B");
        let c = manager(&mut r, "C");
        r.set_supervisor(a, b).expect("a -> b");
        r.set_supervisor(b, c).expect("b -> c");

        assert!(matches!(r.demote(b), Err(TrattoriaError::InvalidState(_))));
        assert!(r.staff().require(b).expect("b").is_manager());

        r.demote(a).expect("demote a");
        assert_eq!(r.supervision().subordinates(b).count(), 0);
        r.demote(b).expect("demote b");
        assert_eq!(r.supervision().subordinates(c).count(), 0);
        assert!(r.verify_integrity().is_consistent());
    }

    #[test]
    fn dismiss_blocked_by_subordinates() {
        let mut r = Restaurant::new();
        let a = manager(&mut r, "A");
        let b = manager(&mut r, "B");
        r.set_supervisor(a, b).expect("a -> b");

        assert!(r.dismiss(b).is_err());
        r.remove_subordinate(b, a).expect("remove");
        r.dismiss(b).expect("dismiss");
        assert!(!r.staff().contains(b));
    }

    #[test]
    fn service_years() {
        let mut r = Restaurant::new();
        let a = manager(&mut r, "A");
        let on = NaiveDate::from_ymd_opt(2026, 9, 1).expect("date");
        assert_eq!(r.years_of_service(a, on).expect("years"), 5);
    }
}
