//! # Extent Registry
//!
//! Per-entity-type ordered collection of all live instances.
//!
//! - Append-on-create: an id enters the extent only after its creating
//!   operation has established every mandatory link
//! - Read-only view for callers outside the crate
//! - Explicit bulk clear and bulk replace (used by reset and load)
//!
//! Identifiers come from a monotonic counter, so `BTreeMap` order is
//! creation order.

use crate::types::{EntityKey, TrattoriaError};
use std::collections::BTreeMap;

/// The registry of all live instances of one entity type.
#[derive(Debug, Clone)]
pub struct Extent<K: EntityKey, T> {
    members: BTreeMap<K, T>,
}

impl<K: EntityKey, T> Default for Extent<K, T> {
    fn default() -> Self {
        Self {
            members: BTreeMap::new(),
        }
    }
}

impl<K: EntityKey, T> Extent<K, T> {
    /// Create an empty extent.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live instances.
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Whether the extent holds no instances.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Whether `key` is a live instance.
    #[must_use]
    pub fn contains(&self, key: K) -> bool {
        self.members.contains_key(&key)
    }

    /// Borrow an instance.
    #[must_use]
    pub fn get(&self, key: K) -> Option<&T> {
        self.members.get(&key)
    }

    /// Borrow an instance or fail with `EntityNotFound`.
    pub fn require(&self, key: K) -> Result<&T, TrattoriaError> {
        self.members
            .get(&key)
            .ok_or_else(|| TrattoriaError::not_found(key))
    }

    /// Iterate instances in creation order.
    pub fn iter(&self) -> impl Iterator<Item = (K, &T)> + '_ {
        self.members.iter().map(|(k, v)| (*k, v))
    }

    /// Snapshot of the live ids in creation order.
    #[must_use]
    pub fn ids(&self) -> Vec<K> {
        self.members.keys().copied().collect()
    }

    /// Append a freshly created instance.
    ///
    /// Ids must arrive in increasing order; anything else would break the
    /// creation-order invariant.
    pub(crate) fn insert(&mut self, key: K, value: T) -> Result<(), TrattoriaError> {
        if let Some((last, _)) = self.members.last_key_value() {
            if key <= *last {
                return Err(TrattoriaError::InvalidArgument(format!(
                    "{} appended out of creation order (last {})",
                    key, last
                )));
            }
        }
        self.members.insert(key, value);
        Ok(())
    }

    /// Mutable access for scalar updates (status, stock, points).
    pub(crate) fn get_mut(&mut self, key: K) -> Result<&mut T, TrattoriaError> {
        self.members
            .get_mut(&key)
            .ok_or_else(|| TrattoriaError::not_found(key))
    }

    /// Remove an instance, returning its record.
    pub(crate) fn remove(&mut self, key: K) -> Option<T> {
        self.members.remove(&key)
    }

    /// Drop every instance.
    pub(crate) fn clear(&mut self) {
        self.members.clear();
    }

    /// Replace the whole extent with `items`.
    ///
    /// Used by load. Ids must be strictly increasing; on error the extent
    /// is left untouched.
    pub(crate) fn replace_all(&mut self, items: Vec<(K, T)>) -> Result<(), TrattoriaError> {
        let mut rebuilt = BTreeMap::new();
        let mut previous: Option<K> = None;
        for (key, value) in items {
            if previous.is_some_and(|p| key <= p) {
                return Err(TrattoriaError::DeserializationError(format!(
                    "{} extent is not in creation order at {}",
                    K::KIND,
                    key
                )));
            }
            previous = Some(key);
            rebuilt.insert(key, value);
        }
        self.members = rebuilt;
        Ok(())
    }
}

impl<K: EntityKey, T: Clone> Extent<K, T> {
    /// Owned copy of every `(id, record)` pair in creation order.
    #[must_use]
    pub fn snapshot(&self) -> Vec<(K, T)> {
        self.members
            .iter()
            .map(|(k, v)| (*k, v.clone()))
            .collect()
    }
}

// =============================================================================
// TESTS
// =============================================================================
