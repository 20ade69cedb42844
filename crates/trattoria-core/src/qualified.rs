//! # Qualified Association
//!
//! A one-to-many relationship indexed by a derived key, so lookup by key is
//! a map lookup.
//!
//! Two structures are kept:
//! - `index`: owner -> key -> target (the owner-side map)
//! - `owners`: target -> (owner, key) (the target-side scalar)
//!
//! A target offered under a key that is already taken keeps its owner
//! reference but is not indexed: the first registration wins and the new
//! one is reported back as [`Registration::Shadowed`].

use crate::types::{EntityKey, TrattoriaError};
use std::collections::BTreeMap;
use std::fmt;

/// Outcome of adding a target under a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Registration<T> {
    /// The target is now reachable by its key.
    Registered,
    /// The key was held by `by`; the target keeps its owner reference but
    /// is not reachable by key.
    Shadowed { by: T },
}

/// Owner -> key -> target index with a target-side owner reference.
#[derive(Debug, Clone)]
pub struct QualifiedAssociation<O, Q, T>
where
    O: EntityKey,
    Q: Copy + Ord + fmt::Debug + fmt::Display,
    T: EntityKey,
{
    name: &'static str,
    index: BTreeMap<O, BTreeMap<Q, T>>,
    owners: BTreeMap<T, (O, Q)>,
}

impl<O, Q, T> QualifiedAssociation<O, Q, T>
where
    O: EntityKey,
    Q: Copy + Ord + fmt::Debug + fmt::Display,
    T: EntityKey,
{
    /// Create an empty qualified association.
    #[must_use]
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            index: BTreeMap::new(),
            owners: BTreeMap::new(),
        }
    }

    /// Relationship name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Target registered under `key` for `owner`.
    #[must_use]
    pub fn lookup(&self, owner: O, key: Q) -> Option<T> {
        self.index.get(&owner)?.get(&key).copied()
    }

    /// Owner referenced by `target`, whether or not it is indexed.
    #[must_use]
    pub fn owner_of(&self, target: T) -> Option<O> {
        self.owners.get(&target).map(|(owner, _)| *owner)
    }

    /// Key `target` was offered under.
    #[must_use]
    pub fn key_of(&self, target: T) -> Option<Q> {
        self.owners.get(&target).map(|(_, key)| *key)
    }

    /// Whether `target` is reachable from its owner by key.
    #[must_use]
    pub fn is_registered(&self, target: T) -> bool {
        self.owners
            .get(&target)
            .is_some_and(|(owner, key)| self.lookup(*owner, *key) == Some(target))
    }

    /// Indexed entries of `owner` in key order.
    pub fn entries(&self, owner: O) -> impl Iterator<Item = (Q, T)> + '_ {
        self.index
            .get(&owner)
            .into_iter()
            .flat_map(|by_key| by_key.iter().map(|(k, t)| (*k, *t)))
    }

    /// Every indexed `(owner, key, target)` triple.
    pub fn indexed(&self) -> impl Iterator<Item = (O, Q, T)> + '_ {
        self.index.iter().flat_map(|(owner, by_key)| {
            by_key.iter().map(move |(key, target)| (*owner, *key, *target))
        })
    }

    /// Every target with its owner reference, indexed or not.
    pub fn references(&self) -> impl Iterator<Item = (T, O, Q)> + '_ {
        self.owners
            .iter()
            .map(|(target, (owner, key))| (*target, *owner, *key))
    }

    /// Targets that hold an owner reference but lost their key to another.
    #[must_use]
    pub fn shadowed(&self) -> Vec<T> {
        self.owners
            .keys()
            .copied()
            .filter(|target| !self.is_registered(*target))
            .collect()
    }

    /// Register `target` for `owner` under `key`.
    ///
    /// The target's owner reference is always set. If the key is already
    /// held by another target the existing entry stays in place.
    pub fn add(&mut self, owner: O, key: Q, target: T) -> Result<Registration<T>, TrattoriaError> {
        if let Some((current_owner, current_key)) = self.owners.get(&target) {
            if *current_owner == owner && *current_key == key {
                return Ok(match self.lookup(owner, key) {
                    Some(holder) if holder != target => Registration::Shadowed { by: holder },
                    _ => Registration::Registered,
                });
            }
            return Err(TrattoriaError::AlreadyLinked {
                relationship: self.name,
            });
        }

        self.owners.insert(target, (owner, key));
        let by_key = self.index.entry(owner).or_default();
        match by_key.get(&key) {
            Some(holder) => {
                let holder = *holder;
                tracing::warn!(
                    relationship = self.name,
                    owner = %owner,
                    key = %key,
                    target = %target,
                    holder = %holder,
                    "key already registered; keeping first registration"
                );
                Ok(Registration::Shadowed { by: holder })
            }
            None => {
                by_key.insert(key, target);
                tracing::debug!(
                    relationship = self.name,
                    owner = %owner,
                    key = %key,
                    target = %target,
                    "registered"
                );
                Ok(Registration::Registered)
            }
        }
    }

    /// Remove `target`, clearing its owner reference and, if it is the
    /// indexed instance, its map entry.
    pub fn remove(&mut self, target: T) -> Result<(O, Q), TrattoriaError> {
        let (owner, key) = self
            .owners
            .remove(&target)
            .ok_or(TrattoriaError::NotLinked {
                relationship: self.name,
            })?;

        if let Some(by_key) = self.index.get_mut(&owner) {
            if by_key.get(&key) == Some(&target) {
                by_key.remove(&key);
            }
            if by_key.is_empty() {
                self.index.remove(&owner);
            }
        }
        tracing::debug!(
            relationship = self.name,
            owner = %owner,
            target = %target,
            "unregistered"
        );
        Ok((owner, key))
    }

    /// Move `target` to `new_key` under the same owner.
    ///
    /// The new key follows the same first-writer-wins rule as `add`.
    pub fn rekey(&mut self, target: T, new_key: Q) -> Result<Registration<T>, TrattoriaError> {
        let (owner, _) = self.remove(target)?;
        self.add(owner, new_key, target)
    }

    /// Move `target` to `new_owner`, keeping its key.
    pub fn reassign(&mut self, target: T, new_owner: O) -> Result<Registration<T>, TrattoriaError> {
        let (_, key) = self.remove(target)?;
        self.add(new_owner, key, target)
    }

    /// Remove every target referencing `owner`, indexed or shadowed.
    pub fn release_owner(&mut self, owner: O) -> Vec<T> {
        let targets: Vec<T> = self
            .owners
            .iter()
            .filter(|(_, (o, _))| *o == owner)
            .map(|(t, _)| *t)
            .collect();
        for target in &targets {
            self.owners.remove(target);
        }
        self.index.remove(&owner);
        targets
    }

    /// Index entries whose target does not reference them back.
    #[must_use]
    pub fn dangling_entries(&self) -> Vec<T> {
        self.indexed()
            .filter(|(owner, key, target)| self.owners.get(target) != Some(&(*owner, *key)))
            .map(|(_, _, target)| target)
            .collect()
    }

    /// Drop everything.
    pub fn clear(&mut self) {
        self.index.clear();
        self.owners.clear();
    }
}

// =============================================================================
// TESTS
// =============================================================================
