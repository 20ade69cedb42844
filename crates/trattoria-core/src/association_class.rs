//! # Association Classes
//!
//! A relationship that carries its own state is an entity in its own right:
//! each instance `L` is linked to exactly one `A` and exactly one `B`
//! through two composition relationships. The instance's attributes live in
//! its extent; this module only keeps the links.
//!
//! Two pair policies share the same create/delete shape:
//! - [`PairPolicy::Unique`]: at most one instance per `(A, B)` pair
//! - [`PairPolicy::Bag`]: any number of independent instances per pair

use crate::relationship::{Association, RelationshipDef};
use crate::types::{EntityKey, TrattoriaError};

/// Whether several instances may connect the same endpoint pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairPolicy {
    /// A second instance for the same pair fails with `AlreadyLinked`.
    Unique,
    /// Every create yields a new, independently deletable instance.
    Bag,
}

/// Links of an association class between `A` and `B`, reified as `L`.
#[derive(Debug, Clone)]
pub struct AssociationClass<A: EntityKey, B: EntityKey, L: EntityKey> {
    policy: PairPolicy,
    left: Association<A, L>,
    right: Association<B, L>,
}

impl<A: EntityKey, B: EntityKey, L: EntityKey> AssociationClass<A, B, L> {
    /// Create an empty association class.
    ///
    /// `left` links `A -> L` and `right` links `B -> L`; both should give
    /// `L` a single-valued target side.
    #[must_use]
    pub fn new(policy: PairPolicy, left: RelationshipDef, right: RelationshipDef) -> Self {
        Self {
            policy,
            left: Association::new(left),
            right: Association::new(right),
        }
    }

    /// The pair policy in force.
    #[must_use]
    pub fn policy(&self) -> PairPolicy {
        self.policy
    }

    /// The `A -> L` links.
    #[must_use]
    pub fn left(&self) -> &Association<A, L> {
        &self.left
    }

    /// The `B -> L` links.
    #[must_use]
    pub fn right(&self) -> &Association<B, L> {
        &self.right
    }

    /// Both endpoints of `link`, if it is live.
    #[must_use]
    pub fn endpoints(&self, link: L) -> Option<(A, B)> {
        Some((self.left.source_of(link)?, self.right.source_of(link)?))
    }

    /// Instances attached to `a`.
    pub fn of_left(&self, a: A) -> impl Iterator<Item = L> + '_ {
        self.left.targets(a)
    }

    /// Instances attached to `b`.
    pub fn of_right(&self, b: B) -> impl Iterator<Item = L> + '_ {
        self.right.targets(b)
    }

    /// Instances connecting exactly `a` and `b`.
    #[must_use]
    pub fn between(&self, a: A, b: B) -> Vec<L> {
        self.left
            .targets(a)
            .filter(|link| self.right.is_linked(b, *link))
            .collect()
    }

    /// Check that `create(a, b, link)` would succeed.
    pub fn check_create(&self, a: A, b: B, link: L) -> Result<(), TrattoriaError> {
        if self.policy == PairPolicy::Unique && !self.between(a, b).is_empty() {
            return Err(TrattoriaError::AlreadyLinked {
                relationship: self.left.def().name,
            });
        }
        if self.left.source_of(link).is_some() || self.right.source_of(link).is_some() {
            return Err(TrattoriaError::InvalidArgument(format!(
                "{} is already attached",
                link
            )));
        }
        self.left.check_attach(a, link)?;
        self.right.check_attach(b, link)?;
        Ok(())
    }

    /// Register `link` on both endpoints.
    pub fn create(&mut self, a: A, b: B, link: L) -> Result<(), TrattoriaError> {
        self.check_create(a, b, link)?;
        self.left.attach(a, link)?;
        self.right.attach(b, link)?;
        Ok(())
    }

    /// Clear every reference to `link`, returning its former endpoints.
    pub fn delete(&mut self, link: L) -> Result<(A, B), TrattoriaError> {
        let (a, b) = self.endpoints(link).ok_or(TrattoriaError::NotLinked {
            relationship: self.left.def().name,
        })?;
        self.left.check_release_target(link)?;
        self.right.check_release_target(link)?;
        self.left.purge_target(link);
        self.right.purge_target(link);
        Ok((a, b))
    }

    /// Delete every instance attached to `a` (cascade from the `A` side).
    pub fn delete_for_left(&mut self, a: A) -> Vec<L> {
        let links = self.left.purge_source(a);
        for link in &links {
            self.right.purge_target(*link);
        }
        links
    }

    /// Delete every instance attached to `b` (cascade from the `B` side).
    pub fn delete_for_right(&mut self, b: B) -> Vec<L> {
        let links = self.right.purge_source(b);
        for link in &links {
            self.left.purge_target(*link);
        }
        links
    }

    /// Instances attached on one side only.
    #[must_use]
    pub fn half_linked(&self) -> Vec<L> {
        let mut broken: Vec<L> = self
            .left
            .pairs()
            .map(|(_, link)| link)
            .filter(|link| self.right.source_of(*link).is_none())
            .collect();
        broken.extend(
            self.right
                .pairs()
                .map(|(_, link)| link)
                .filter(|link| self.left.source_of(*link).is_none()),
        );
        broken
    }

    /// Drop every instance link.
    pub fn clear(&mut self) {
        self.left.clear();
        self.right.clear();
    }
}

// =============================================================================
// TESTS
// =============================================================================
