//! # Reflexive Hierarchy
//!
//! A single entity type related to itself as supervisor / subordinates.
//!
//! Built on the same [`Association`] as every other relationship, with the
//! supervisor as source and the subordinate as target. On top of the link
//! primitive it enforces:
//! - at most one supervisor per entity (`0..1` target side)
//! - no self-supervision
//! - no cycles: following supervisors from any entity never revisits it

use crate::primitives::MAX_HIERARCHY_DEPTH;
use crate::relationship::{Association, RelationshipDef};
use crate::types::{EntityKey, TrattoriaError};
use std::collections::BTreeSet;

/// A rooted forest over keys of type `K`.
#[derive(Debug, Clone)]
pub struct Hierarchy<K: EntityKey> {
    links: Association<K, K>,
}

impl<K: EntityKey> Hierarchy<K> {
    /// Create an empty hierarchy for `def`.
    ///
    /// `def.source` describes the subordinates collection and `def.target`
    /// the supervisor reference.
    #[must_use]
    pub fn new(def: RelationshipDef) -> Self {
        Self {
            links: Association::new(def),
        }
    }

    /// The underlying link store.
    #[must_use]
    pub fn links(&self) -> &Association<K, K> {
        &self.links
    }

    /// Supervisor of `member`, if any.
    #[must_use]
    pub fn supervisor_of(&self, member: K) -> Option<K> {
        self.links.source_of(member)
    }

    /// Direct subordinates of `member`.
    pub fn subordinates(&self, member: K) -> impl Iterator<Item = K> + '_ {
        self.links.targets(member)
    }

    /// Whether `member` supervises anyone.
    #[must_use]
    pub fn has_subordinates(&self, member: K) -> bool {
        self.links.target_count(member) > 0
    }

    /// Supervisors of `member` from the nearest up to the root.
    ///
    /// Bounded by `MAX_HIERARCHY_DEPTH`.
    #[must_use]
    pub fn chain(&self, member: K) -> Vec<K> {
        let mut chain = Vec::new();
        let mut current = self.supervisor_of(member);
        while let Some(next) = current {
            if chain.len() >= MAX_HIERARCHY_DEPTH || next == member {
                break;
            }
            chain.push(next);
            current = self.supervisor_of(next);
        }
        chain
    }

    /// Check whether `member` may report to `supervisor`.
    ///
    /// Returns the current supervisor.
    pub fn check_set_supervisor(&self, member: K, supervisor: K) -> Result<Option<K>, TrattoriaError> {
        let relationship = self.links.def().name;
        if member == supervisor {
            return Err(TrattoriaError::SelfReference { relationship });
        }

        // Walk the candidate's chain to its root; meeting `member` means the
        // new link would close a loop.
        let mut current = Some(supervisor);
        let mut hops = 0usize;
        while let Some(node) = current {
            if node == member || hops > MAX_HIERARCHY_DEPTH {
                return Err(TrattoriaError::Cycle { relationship });
            }
            current = self.supervisor_of(node);
            hops += 1;
        }

        self.links.check_reassign(member, supervisor)
    }

    /// Make `member` report to `supervisor`, replacing any previous one.
    ///
    /// Returns the previous supervisor. Unchanged links are a no-op.
    pub fn set_supervisor(&mut self, member: K, supervisor: K) -> Result<Option<K>, TrattoriaError> {
        self.check_set_supervisor(member, supervisor)?;
        self.links.reassign(member, supervisor)
    }

    /// Detach `member` from its supervisor. Returns the former supervisor.
    pub fn clear_supervisor(&mut self, member: K) -> Result<Option<K>, TrattoriaError> {
        match self.supervisor_of(member) {
            Some(supervisor) => {
                self.links.detach(supervisor, member)?;
                Ok(Some(supervisor))
            }
            None => Ok(None),
        }
    }

    /// Remove `subordinate` from `supervisor`'s set, clearing both ends.
    pub fn remove_subordinate(&mut self, supervisor: K, subordinate: K) -> Result<(), TrattoriaError> {
        self.links.detach(supervisor, subordinate)
    }

    /// Drop `member` from the hierarchy entirely.
    ///
    /// Fails with `InvalidState` while `member` still has subordinates, since
    /// each of them must keep a valid supervisor.
    pub fn release(&mut self, member: K) -> Result<Option<K>, TrattoriaError> {
        if self.has_subordinates(member) {
            return Err(TrattoriaError::InvalidState(format!(
                "{} still has {} subordinate(s)",
                member,
                self.links.target_count(member)
            )));
        }
        self.clear_supervisor(member)
    }

    /// Members whose supervisor chain revisits a node.
    #[must_use]
    pub fn cyclic_members(&self) -> Vec<K> {
        let mut members: BTreeSet<K> = BTreeSet::new();
        for (supervisor, subordinate) in self.links.pairs() {
            members.insert(supervisor);
            members.insert(subordinate);
        }

        members
            .into_iter()
            .filter(|&member| {
                let mut seen = BTreeSet::new();
                let mut current = Some(member);
                while let Some(node) = current {
                    if !seen.insert(node) {
                        return true;
                    }
                    current = self.supervisor_of(node);
                }
                false
            })
            .collect()
    }

    /// Restore a persisted `supervisor -> subordinate` link.
    ///
    /// Goes through the same checks as `set_supervisor`, so a corrupt file
    /// cannot smuggle in a cycle.
    pub fn restore(&mut self, supervisor: K, subordinate: K) -> Result<(), TrattoriaError> {
        self.set_supervisor(subordinate, supervisor).map(|_| ())
    }

    /// Drop every link.
    pub fn clear(&mut self) {
        self.links.clear();
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::relationship::{Multiplicity, Ownership, Side};
    use crate::types::StaffId;

    const SUPERVISION: RelationshipDef = RelationshipDef::new(
        "supervision",
        Side::guarded("subordinates", Multiplicity::ZERO_OR_MORE),
        Side::guarded("supervisor", Multiplicity::ZERO_OR_ONE),
        Ownership::Reflexive,
    );

    fn ids() -> (StaffId, StaffId, StaffId) {
        (StaffId(1), StaffId(2), StaffId(3))
    }

    #[test]
    fn self_supervision_rejected() {
        let mut h = Hierarchy::new(SUPERVISION);
        assert!(matches!(
            h.set_supervisor(StaffId(1), StaffId(1)),
            Err(TrattoriaError::SelfReference { .. })
        ));
    }

    #[test]
    fn cycle_rejected_and_links_unchanged() {
        let (a, b, c) = ids();
        let mut h = Hierarchy::new(SUPERVISION);
        h.set_supervisor(a, b).expect("a -> b");
        h.set_supervisor(b, c).expect("b -> c");

        assert!(matches!(
            h.set_supervisor(c, a),
            Err(TrattoriaError::Cycle { .. })
        ));
        assert_eq!(h.supervisor_of(a), Some(b));
        assert_eq!(h.supervisor_of(b), Some(c));
        assert_eq!(h.supervisor_of(c), None);
    }

    #[test]
    fn replacing_supervisor_moves_subordinate() {
        let (a, b, c) = ids();
        let mut h = Hierarchy::new(SUPERVISION);
        h.set_supervisor(a, b).expect("a -> b");

        let previous = h.set_supervisor(a, c).expect("a -> c");
        assert_eq!(previous, Some(b));
        assert_eq!(h.subordinates(b).count(), 0);
        assert_eq!(h.subordinates(c).collect::<Vec<_>>(), vec![a]);
    }

    #[test]
    fn setting_same_supervisor_is_noop() {
        let (a, b, _) = ids();
        let mut h = Hierarchy::new(SUPERVISION);
        h.set_supervisor(a, b).expect("a -> b");
        h.set_supervisor(a, b).expect("again");
        assert_eq!(h.links().link_count(), 1);
    }

    #[test]
    fn chain_walks_to_root() {
        let (a, b, c) = ids();
        let mut h = Hierarchy::new(SUPERVISION);
        h.set_supervisor(a, b).expect("a -> b");
        h.set_supervisor(b, c).expect("b -> c");

        assert_eq!(h.chain(a), vec![b, c]);
        assert!(h.chain(c).is_empty());
        assert!(h.cyclic_members().is_empty());
    }

    #[test]
    fn remove_subordinate_requires_membership() {
        let (a, b, c) = ids();
        let mut h = Hierarchy::new(SUPERVISION);
        h.set_supervisor(a, b).expect("a -> b");

        assert!(matches!(
            h.remove_subordinate(c, a),
            Err(TrattoriaError::NotLinked { .. })
        ));
        h.remove_subordinate(b, a).expect("remove");
        assert_eq!(h.supervisor_of(a), None);
    }

    #[test]
    fn release_blocked_by_subordinates() {
        let (a, b, c) = ids();
        let mut h = Hierarchy::new(SUPERVISION);
        h.set_supervisor(a, b).expect("a -> b");
        h.set_supervisor(b, c).expect("b -> c");

        assert!(matches!(h.release(b), Err(TrattoriaError::InvalidState(_))));
        assert_eq!(h.release(a).expect("release"), Some(b));
        assert_eq!(h.release(b).expect("release"), Some(c));
    }
}
