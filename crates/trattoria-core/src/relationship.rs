//! # Relationship Engine
//!
//! The link primitive and the generic relationship definition every paired
//! accessor in the model goes through.
//!
//! A [`RelationshipDef`] describes one bidirectional pairing: the role name
//! and cardinality bounds on each side, the ownership kind and the duplicate
//! policy. An [`Association`] instantiates a definition between two key
//! types and keeps a forward index (source -> targets) and a reverse index
//! (target -> sources) in lock step.
//!
//! ## Guarantees
//!
//! - Both indices are updated together or not at all
//! - Every precondition is checked before the first mutation
//! - Removal never takes a side below its `min`
//! - Attaching never takes a side above its `max`

use crate::types::{EntityKey, TrattoriaError};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

// =============================================================================
// DEFINITIONS
// =============================================================================

/// Cardinality bounds for one side of a relationship.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Multiplicity {
    pub min: usize,
    /// `None` means unbounded.
    pub max: Option<usize>,
}

impl Multiplicity {
    /// `0..1`
    pub const ZERO_OR_ONE: Multiplicity = Multiplicity::new(0, Some(1));
    /// `1..1`
    pub const EXACTLY_ONE: Multiplicity = Multiplicity::new(1, Some(1));
    /// `0..*`
    pub const ZERO_OR_MORE: Multiplicity = Multiplicity::new(0, None);
    /// `1..*`
    pub const ONE_OR_MORE: Multiplicity = Multiplicity::new(1, None);

    /// Create explicit bounds.
    #[must_use]
    pub const fn new(min: usize, max: Option<usize>) -> Self {
        Self { min, max }
    }

    /// Whether a side holding `current` links may take one more.
    #[must_use]
    pub fn allows_more(self, current: usize) -> bool {
        self.max.is_none_or(|max| current < max)
    }

    /// Whether a side holding `current` links may give one up.
    #[must_use]
    pub fn allows_removal(self, current: usize) -> bool {
        current.saturating_sub(1) >= self.min
    }

    /// Whether `count` lies within the bounds.
    #[must_use]
    pub fn contains(self, count: usize) -> bool {
        count >= self.min && self.max.is_none_or(|max| count <= max)
    }
}

impl fmt::Display for Multiplicity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.max {
            Some(max) => write!(f, "{}..{}", self.min, max),
            None => write!(f, "{}..*", self.min),
        }
    }
}

/// How the two ends of a relationship own each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ownership {
    /// Targets are parts that cannot exist without, and never move away
    /// from, their source.
    Composition,
    /// Shared membership; removing a link never destroys either end.
    Aggregation,
    /// Plain navigable reference.
    Association,
    /// Both ends are the same entity type.
    Reflexive,
}

/// What attaching an already-linked pair does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DuplicatePolicy {
    /// Re-attaching is a no-op.
    Ignore,
    /// Re-attaching fails with `AlreadyLinked`.
    Reject,
}

/// When a side's `min` is enforced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FloorMode {
    /// The first links are made during construction, so every live entity
    /// must satisfy `min` at all times.
    Strict,
    /// An entity may start with no links; once linked, removal may not go
    /// below `min`.
    RemovalGuard,
}

/// One side of a relationship, as seen from the entity holding the links.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Side {
    /// Name of the collection or reference on this side.
    pub role: &'static str,
    pub multiplicity: Multiplicity,
    pub floor: FloorMode,
}

impl Side {
    /// A side whose floor is checked on every live entity.
    #[must_use]
    pub const fn strict(role: &'static str, multiplicity: Multiplicity) -> Self {
        Self {
            role,
            multiplicity,
            floor: FloorMode::Strict,
        }
    }

    /// A side whose floor only guards removal.
    #[must_use]
    pub const fn guarded(role: &'static str, multiplicity: Multiplicity) -> Self {
        Self {
            role,
            multiplicity,
            floor: FloorMode::RemovalGuard,
        }
    }
}

/// Describes one bidirectional pairing.
///
/// `source` constrains how many targets each source holds; `target`
/// constrains how many sources each target holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelationshipDef {
    pub name: &'static str,
    pub source: Side,
    pub target: Side,
    pub ownership: Ownership,
    pub duplicates: DuplicatePolicy,
}

impl RelationshipDef {
    /// Create a definition with `DuplicatePolicy::Ignore`.
    #[must_use]
    pub const fn new(name: &'static str, source: Side, target: Side, ownership: Ownership) -> Self {
        Self {
            name,
            source,
            target,
            ownership,
            duplicates: DuplicatePolicy::Ignore,
        }
    }

    /// Same definition, rejecting duplicate pairs.
    #[must_use]
    pub const fn rejecting_duplicates(mut self) -> Self {
        self.duplicates = DuplicatePolicy::Reject;
        self
    }

    /// Check that a source created with `count` distinct targets satisfies
    /// its floor.
    pub fn require_initial(&self, count: usize) -> Result<(), TrattoriaError> {
        if count < self.source.multiplicity.min {
            return Err(self.below_min(&self.source));
        }
        if !self.source.multiplicity.contains(count) {
            return Err(self.above_max(&self.source));
        }
        Ok(())
    }

    fn below_min(&self, side: &Side) -> TrattoriaError {
        TrattoriaError::BelowMinimumCardinality {
            relationship: self.name,
            role: side.role,
            min: side.multiplicity.min,
        }
    }

    fn above_max(&self, side: &Side) -> TrattoriaError {
        TrattoriaError::AboveMaximumCardinality {
            relationship: self.name,
            role: side.role,
            max: side.multiplicity.max.unwrap_or(usize::MAX),
        }
    }
}

/// Result of an attach that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attach {
    /// A new link was established.
    Linked,
    /// The pair was already linked; nothing changed.
    Unchanged,
}

// =============================================================================
// ASSOCIATION (LINK PRIMITIVE)
// =============================================================================

/// A relationship instance between sources `S` and targets `T`.
///
/// Uses `BTreeMap`/`BTreeSet` for deterministic iteration. Callers only get
/// copies of keys, never the internal collections.
#[derive(Debug, Clone)]
pub struct Association<S: EntityKey, T: EntityKey> {
    def: RelationshipDef,
    /// source -> targets
    forward: BTreeMap<S, BTreeSet<T>>,
    /// target -> sources
    reverse: BTreeMap<T, BTreeSet<S>>,
}

impl<S: EntityKey, T: EntityKey> Association<S, T> {
    /// Create an empty relationship for `def`.
    #[must_use]
    pub fn new(def: RelationshipDef) -> Self {
        Self {
            def,
            forward: BTreeMap::new(),
            reverse: BTreeMap::new(),
        }
    }

    /// The definition this relationship enforces.
    #[must_use]
    pub fn def(&self) -> &RelationshipDef {
        &self.def
    }

    /// Whether `source` and `target` are linked.
    #[must_use]
    pub fn is_linked(&self, source: S, target: T) -> bool {
        self.forward
            .get(&source)
            .is_some_and(|targets| targets.contains(&target))
    }

    /// Targets held by `source`, in key order.
    pub fn targets(&self, source: S) -> impl Iterator<Item = T> + '_ {
        self.forward
            .get(&source)
            .into_iter()
            .flat_map(|targets| targets.iter().copied())
    }

    /// Sources holding `target`, in key order.
    pub fn sources(&self, target: T) -> impl Iterator<Item = S> + '_ {
        self.reverse
            .get(&target)
            .into_iter()
            .flat_map(|sources| sources.iter().copied())
    }

    /// The single source of `target`, for sides bounded at one.
    #[must_use]
    pub fn source_of(&self, target: T) -> Option<S> {
        self.sources(target).next()
    }

    /// The single target of `source`, for sides bounded at one.
    #[must_use]
    pub fn target_of(&self, source: S) -> Option<T> {
        self.targets(source).next()
    }

    /// Number of targets held by `source`.
    #[must_use]
    pub fn target_count(&self, source: S) -> usize {
        self.forward.get(&source).map_or(0, BTreeSet::len)
    }

    /// Number of sources holding `target`.
    #[must_use]
    pub fn source_count(&self, target: T) -> usize {
        self.reverse.get(&target).map_or(0, BTreeSet::len)
    }

    /// Total number of links.
    #[must_use]
    pub fn link_count(&self) -> usize {
        self.forward.values().map(BTreeSet::len).sum()
    }

    /// Every link as `(source, target)`, ordered by source then target.
    pub fn pairs(&self) -> impl Iterator<Item = (S, T)> + '_ {
        self.forward
            .iter()
            .flat_map(|(s, targets)| targets.iter().map(move |t| (*s, *t)))
    }

    // -------------------------------------------------------------------------
    // attach
    // -------------------------------------------------------------------------

    /// Check whether `attach(source, target)` would succeed, without mutating.
    pub fn check_attach(&self, source: S, target: T) -> Result<Attach, TrattoriaError> {
        if self.is_linked(source, target) {
            return match self.def.duplicates {
                DuplicatePolicy::Ignore => Ok(Attach::Unchanged),
                DuplicatePolicy::Reject => Err(TrattoriaError::AlreadyLinked {
                    relationship: self.def.name,
                }),
            };
        }

        if !self
            .def
            .source
            .multiplicity
            .allows_more(self.target_count(source))
        {
            return Err(self.def.above_max(&self.def.source));
        }

        if !self
            .def
            .target
            .multiplicity
            .allows_more(self.source_count(target))
        {
            // A part already owned by another composite cannot be re-parented.
            if self.def.ownership == Ownership::Composition {
                return Err(TrattoriaError::OwnershipImmutable {
                    relationship: self.def.name,
                });
            }
            return Err(self.def.above_max(&self.def.target));
        }

        Ok(Attach::Linked)
    }

    /// Link `source` and `target` on both sides.
    ///
    /// Idempotent under `DuplicatePolicy::Ignore`.
    pub fn attach(&mut self, source: S, target: T) -> Result<Attach, TrattoriaError> {
        let outcome = self.check_attach(source, target)?;
        if outcome == Attach::Linked {
            self.insert_link(source, target);
            tracing::debug!(
                relationship = self.def.name,
                source = %source,
                target = %target,
                "linked"
            );
        }
        Ok(outcome)
    }

    // -------------------------------------------------------------------------
    // detach
    // -------------------------------------------------------------------------

    /// Check whether `detach(source, target)` would succeed.
    ///
    /// The floor is checked on both sides, except the part side of a
    /// composition: a detached part is destroyed, not left below its floor.
    pub fn check_detach(&self, source: S, target: T) -> Result<(), TrattoriaError> {
        if !self.is_linked(source, target) {
            return Err(TrattoriaError::NotLinked {
                relationship: self.def.name,
            });
        }
        if !self
            .def
            .source
            .multiplicity
            .allows_removal(self.target_count(source))
        {
            return Err(self.def.below_min(&self.def.source));
        }
        if self.def.ownership != Ownership::Composition
            && !self
                .def
                .target
                .multiplicity
                .allows_removal(self.source_count(target))
        {
            return Err(self.def.below_min(&self.def.target));
        }
        Ok(())
    }

    /// Remove the link between `source` and `target` on both sides.
    pub fn detach(&mut self, source: S, target: T) -> Result<(), TrattoriaError> {
        self.check_detach(source, target)?;
        self.remove_link(source, target);
        tracing::debug!(
            relationship = self.def.name,
            source = %source,
            target = %target,
            "unlinked"
        );
        Ok(())
    }

    // -------------------------------------------------------------------------
    // release (one end is going away)
    // -------------------------------------------------------------------------

    /// Check that `target` can leave the relationship entirely.
    ///
    /// Only the sources' floors matter; the target itself is being destroyed.
    pub fn check_release_target(&self, target: T) -> Result<(), TrattoriaError> {
        for source in self.sources(target) {
            if !self
                .def
                .source
                .multiplicity
                .allows_removal(self.target_count(source))
            {
                return Err(self.def.below_min(&self.def.source));
            }
        }
        Ok(())
    }

    /// Unlink `target` from every source, respecting the sources' floors.
    pub fn release_target(&mut self, target: T) -> Result<Vec<S>, TrattoriaError> {
        self.check_release_target(target)?;
        Ok(self.purge_target(target))
    }

    /// Check that `source` can leave the relationship entirely.
    pub fn check_release_source(&self, source: S) -> Result<(), TrattoriaError> {
        for target in self.targets(source) {
            if !self
                .def
                .target
                .multiplicity
                .allows_removal(self.source_count(target))
            {
                return Err(self.def.below_min(&self.def.target));
            }
        }
        Ok(())
    }

    /// Unlink `source` from every target, respecting the targets' floors.
    pub fn release_source(&mut self, source: S) -> Result<Vec<T>, TrattoriaError> {
        self.check_release_source(source)?;
        Ok(self.purge_source(source))
    }

    /// Unlink `source` from every target without floor checks.
    ///
    /// Only for cascades where the targets are destroyed along with the
    /// source (composition) or the caller has already validated the floors.
    pub fn purge_source(&mut self, source: S) -> Vec<T> {
        let targets: Vec<T> = self
            .forward
            .remove(&source)
            .map(|set| set.into_iter().collect())
            .unwrap_or_default();
        for target in &targets {
            self.remove_reverse(*target, source);
        }
        if !targets.is_empty() {
            tracing::debug!(
                relationship = self.def.name,
                source = %source,
                count = targets.len(),
                "purged source"
            );
        }
        targets
    }

    /// Unlink `target` from every source without floor checks.
    pub fn purge_target(&mut self, target: T) -> Vec<S> {
        let sources: Vec<S> = self
            .reverse
            .remove(&target)
            .map(|set| set.into_iter().collect())
            .unwrap_or_default();
        for source in &sources {
            self.remove_forward(*source, target);
        }
        if !sources.is_empty() {
            tracing::debug!(
                relationship = self.def.name,
                target = %target,
                count = sources.len(),
                "purged target"
            );
        }
        sources
    }

    // -------------------------------------------------------------------------
    // reassign
    // -------------------------------------------------------------------------

    /// Check whether `target` can move to `new_source`.
    ///
    /// Returns the current source, if any. Composition parts never move.
    pub fn check_reassign(&self, target: T, new_source: S) -> Result<Option<S>, TrattoriaError> {
        let current = self.source_of(target);
        if current == Some(new_source) {
            return Ok(current);
        }
        if self.def.ownership == Ownership::Composition && current.is_some() {
            return Err(TrattoriaError::OwnershipImmutable {
                relationship: self.def.name,
            });
        }
        if self.def.target.multiplicity.max != Some(1) {
            return Err(TrattoriaError::InvalidArgument(format!(
                "{}: reassign needs a single-valued {} side",
                self.def.name, self.def.target.role
            )));
        }
        if let Some(old) = current {
            if !self
                .def
                .source
                .multiplicity
                .allows_removal(self.target_count(old))
            {
                return Err(self.def.below_min(&self.def.source));
            }
        }
        if !self
            .def
            .source
            .multiplicity
            .allows_more(self.target_count(new_source))
        {
            return Err(self.def.above_max(&self.def.source));
        }
        Ok(current)
    }

    /// Move `target` from its current source to `new_source`.
    ///
    /// Returns the previous source. A no-op when already there.
    pub fn reassign(&mut self, target: T, new_source: S) -> Result<Option<S>, TrattoriaError> {
        let previous = self.check_reassign(target, new_source)?;
        if previous == Some(new_source) {
            return Ok(previous);
        }
        if let Some(old) = previous {
            self.remove_link(old, target);
        }
        self.insert_link(new_source, target);
        tracing::debug!(
            relationship = self.def.name,
            target = %target,
            to = %new_source,
            "reassigned"
        );
        Ok(previous)
    }

    // -------------------------------------------------------------------------
    // integrity
    // -------------------------------------------------------------------------

    /// Pairs visible from one index but not the other.
    #[must_use]
    pub fn asymmetric_pairs(&self) -> Vec<(S, T)> {
        let mut broken: Vec<(S, T)> = self
            .pairs()
            .filter(|(s, t)| !self.reverse.get(t).is_some_and(|set| set.contains(s)))
            .collect();
        for (t, sources) in &self.reverse {
            for s in sources {
                if !self.is_linked(*s, *t) {
                    broken.push((*s, *t));
                }
            }
        }
        broken
    }

    /// Drop every link.
    pub fn clear(&mut self) {
        self.forward.clear();
        self.reverse.clear();
    }

    fn insert_link(&mut self, source: S, target: T) {
        self.forward.entry(source).or_default().insert(target);
        self.reverse.entry(target).or_default().insert(source);
    }

    fn remove_link(&mut self, source: S, target: T) {
        self.remove_forward(source, target);
        self.remove_reverse(target, source);
    }

    fn remove_forward(&mut self, source: S, target: T) {
        if let Some(targets) = self.forward.get_mut(&source) {
            targets.remove(&target);
            if targets.is_empty() {
                self.forward.remove(&source);
            }
        }
    }

    fn remove_reverse(&mut self, target: T, source: S) {
        if let Some(sources) = self.reverse.get_mut(&target) {
            sources.remove(&source);
            if sources.is_empty() {
                self.reverse.remove(&target);
            }
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{IngredientId, MenuItemId, OrderId, PaymentId, TableId};

    const BOTH_FLOORS: RelationshipDef = RelationshipDef::new(
        "dish-ingredients",
        Side::strict("ingredients", Multiplicity::ONE_OR_MORE),
        Side::strict("dishes", Multiplicity::ONE_OR_MORE),
        Ownership::Aggregation,
    );

    const PARTS: RelationshipDef = RelationshipDef::new(
        "order-payments",
        Side::guarded("payments", Multiplicity::ONE_OR_MORE),
        Side::strict("order", Multiplicity::EXACTLY_ONE),
        Ownership::Composition,
    );

    const SEATING: RelationshipDef = RelationshipDef::new(
        "seating",
        Side::guarded("tables", Multiplicity::ZERO_OR_MORE),
        Side::guarded("order", Multiplicity::ZERO_OR_ONE),
        Ownership::Association,
    );

    fn dishes() -> Association<MenuItemId, IngredientId> {
        Association::new(BOTH_FLOORS)
    }

    #[test]
    fn multiplicity_display() {
        assert_eq!(Multiplicity::ONE_OR_MORE.to_string(), "1..*");
        assert_eq!(Multiplicity::ZERO_OR_ONE.to_string(), "0..1");
    }

    #[test]
    fn attach_is_symmetric() {
        let mut rel = dishes();
        rel.attach(MenuItemId(1), IngredientId(2)).expect("attach");

        assert!(rel.is_linked(MenuItemId(1), IngredientId(2)));
        assert_eq!(rel.targets(MenuItemId(1)).collect::<Vec<_>>(), vec![IngredientId(2)]);
        assert_eq!(rel.sources(IngredientId(2)).collect::<Vec<_>>(), vec![MenuItemId(1)]);
        assert!(rel.asymmetric_pairs().is_empty());
    }

    #[test]
    fn attach_twice_is_noop() {
        let mut rel = dishes();
        assert_eq!(
            rel.attach(MenuItemId(1), IngredientId(2)).expect("attach"),
            Attach::Linked
        );
        assert_eq!(
            rel.attach(MenuItemId(1), IngredientId(2)).expect("attach"),
            Attach::Unchanged
        );
        assert_eq!(rel.link_count(), 1);
    }

    #[test]
    fn reject_policy_reports_already_linked() {
        let mut rel: Association<OrderId, TableId> =
            Association::new(SEATING.rejecting_duplicates());
        rel.attach(OrderId(1), TableId(1)).expect("attach");

        let err = rel.attach(OrderId(1), TableId(1)).expect_err("duplicate");
        assert!(matches!(err, TrattoriaError::AlreadyLinked { .. }));
    }

    #[test]
    fn detach_checks_both_floors() {
        let mut rel = dishes();
        rel.attach(MenuItemId(1), IngredientId(10)).expect("attach");
        rel.attach(MenuItemId(1), IngredientId(11)).expect("attach");

        // Ingredient 10 is only used by dish 1: its own floor blocks removal.
        let err = rel.detach(MenuItemId(1), IngredientId(10)).expect_err("floor");
        assert_eq!(
            err,
            TrattoriaError::BelowMinimumCardinality {
                relationship: "dish-ingredients",
                role: "dishes",
                min: 1
            }
        );

        // Give ingredient 10 a second dish; now dish 1 has two ingredients
        // and ingredient 10 has two dishes.
        rel.attach(MenuItemId(2), IngredientId(10)).expect("attach");
        rel.detach(MenuItemId(1), IngredientId(10)).expect("detach");
        assert!(!rel.is_linked(MenuItemId(1), IngredientId(10)));
        assert_eq!(rel.target_count(MenuItemId(1)), 1);

        // Dish 1's last ingredient cannot go.
        let err = rel.detach(MenuItemId(1), IngredientId(11)).expect_err("floor");
        assert!(matches!(
            err,
            TrattoriaError::BelowMinimumCardinality { role: "ingredients", .. }
        ));
    }

    #[test]
    fn detach_unlinked_pair_fails() {
        let mut rel = dishes();
        assert!(matches!(
            rel.detach(MenuItemId(1), IngredientId(1)),
            Err(TrattoriaError::NotLinked { .. })
        ));
    }

    #[test]
    fn composition_part_cannot_be_reparented() {
        let mut rel: Association<OrderId, PaymentId> = Association::new(PARTS);
        rel.attach(OrderId(1), PaymentId(5)).expect("attach");

        assert!(matches!(
            rel.attach(OrderId(2), PaymentId(5)),
            Err(TrattoriaError::OwnershipImmutable { .. })
        ));
        assert!(matches!(
            rel.reassign(PaymentId(5), OrderId(2)),
            Err(TrattoriaError::OwnershipImmutable { .. })
        ));
        assert_eq!(rel.source_of(PaymentId(5)), Some(OrderId(1)));
    }

    #[test]
    fn single_valued_side_rejects_second_source() {
        let mut rel: Association<OrderId, TableId> = Association::new(SEATING);
        rel.attach(OrderId(1), TableId(1)).expect("attach");

        assert!(matches!(
            rel.attach(OrderId(2), TableId(1)),
            Err(TrattoriaError::AboveMaximumCardinality { role: "order", .. })
        ));
    }

    #[test]
    fn reassign_moves_target() {
        let mut rel: Association<OrderId, TableId> = Association::new(SEATING);
        rel.attach(OrderId(1), TableId(1)).expect("attach");

        let previous = rel.reassign(TableId(1), OrderId(2)).expect("reassign");
        assert_eq!(previous, Some(OrderId(1)));
        assert_eq!(rel.source_of(TableId(1)), Some(OrderId(2)));
        assert_eq!(rel.target_count(OrderId(1)), 0);
        assert!(rel.asymmetric_pairs().is_empty());
    }

    #[test]
    fn release_target_respects_source_floor() {
        let mut rel: Association<OrderId, PaymentId> = Association::new(PARTS);
        rel.attach(OrderId(1), PaymentId(1)).expect("attach");

        assert!(rel.release_target(PaymentId(1)).is_err());
        assert!(rel.is_linked(OrderId(1), PaymentId(1)));

        rel.attach(OrderId(1), PaymentId(2)).expect("attach");
        assert_eq!(rel.release_target(PaymentId(1)).expect("release"), vec![OrderId(1)]);
        assert_eq!(rel.targets(OrderId(1)).collect::<Vec<_>>(), vec![PaymentId(2)]);
    }

    #[test]
    fn detach_part_keeps_owner_floor_only() {
        let mut rel: Association<OrderId, PaymentId> = Association::new(PARTS);
        rel.attach(OrderId(1), PaymentId(1)).expect("attach");
        rel.attach(OrderId(1), PaymentId(2)).expect("attach");

        rel.detach(OrderId(1), PaymentId(1)).expect("detach one of two parts");
        assert_eq!(rel.source_of(PaymentId(1)), None);
        assert_eq!(rel.targets(OrderId(1)).collect::<Vec<_>>(), vec![PaymentId(2)]);

        let err = rel.detach(OrderId(1), PaymentId(2)).expect_err("last part");
        assert!(matches!(
            err,
            TrattoriaError::BelowMinimumCardinality { role: "payments", .. }
        ));
        assert!(rel.is_linked(OrderId(1), PaymentId(2)));
        assert!(rel.asymmetric_pairs().is_empty());
    }

    #[test]
    fn purge_source_cascades_without_checks() {
        let mut rel: Association<OrderId, PaymentId> = Association::new(PARTS);
        rel.attach(OrderId(1), PaymentId(1)).expect("attach");
        rel.attach(OrderId(1), PaymentId(2)).expect("attach");

        let parts = rel.purge_source(OrderId(1));
        assert_eq!(parts, vec![PaymentId(1), PaymentId(2)]);
        assert_eq!(rel.link_count(), 0);
        assert_eq!(rel.source_of(PaymentId(1)), None);
    }

    #[test]
    fn failed_attach_leaves_graph_unchanged() {
        let mut rel: Association<OrderId, TableId> = Association::new(SEATING);
        rel.attach(OrderId(1), TableId(1)).expect("attach");
        let before: Vec<_> = rel.pairs().collect();

        let _ = rel.attach(OrderId(2), TableId(1));
        assert_eq!(rel.pairs().collect::<Vec<_>>(), before);
    }
}
