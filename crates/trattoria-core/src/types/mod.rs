//! # Core Type Definitions
//!
//! This module contains the shared types for the Trattoria object graph:
//! - Entity identifiers (`CustomerId`, `OrderId`, ...) and the `EntityKind` tag
//! - Integer money (`Money`)
//! - The qualified reservation key (`ReservationSlot`)
//! - Error types (`TrattoriaError`)
//!
//! ## Determinism Guarantees
//!
//! All types in this module:
//! - Use integer arithmetic only (no floating-point)
//! - Implement `Ord` for deterministic ordering in `BTreeMap`/`BTreeSet`
//! - Use checked or saturating arithmetic for amounts

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

// =============================================================================
// ENTITY KIND
// =============================================================================

/// Tag naming every entity type that owns an extent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Customer,
    Order,
    Payment,
    Invoice,
    OrderRequest,
    ItemQuantity,
    Menu,
    MenuItem,
    Ingredient,
    Supplier,
    SupplyLog,
    Staff,
    Table,
    Reservation,
    Discount,
    Feedback,
}

impl EntityKind {
    /// Every kind, in the order extents are persisted.
    pub const ALL: [EntityKind; 16] = [
        EntityKind::Customer,
        EntityKind::Order,
        EntityKind::Payment,
        EntityKind::Invoice,
        EntityKind::OrderRequest,
        EntityKind::ItemQuantity,
        EntityKind::Menu,
        EntityKind::MenuItem,
        EntityKind::Ingredient,
        EntityKind::Supplier,
        EntityKind::SupplyLog,
        EntityKind::Staff,
        EntityKind::Table,
        EntityKind::Reservation,
        EntityKind::Discount,
        EntityKind::Feedback,
    ];

    /// Human-readable name of the kind.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            EntityKind::Customer => "customer",
            EntityKind::Order => "order",
            EntityKind::Payment => "payment",
            EntityKind::Invoice => "invoice",
            EntityKind::OrderRequest => "order request",
            EntityKind::ItemQuantity => "item quantity",
            EntityKind::Menu => "menu",
            EntityKind::MenuItem => "menu item",
            EntityKind::Ingredient => "ingredient",
            EntityKind::Supplier => "supplier",
            EntityKind::SupplyLog => "supply log",
            EntityKind::Staff => "staff member",
            EntityKind::Table => "table",
            EntityKind::Reservation => "reservation",
            EntityKind::Discount => "discount",
            EntityKind::Feedback => "feedback",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// =============================================================================
// ENTITY IDENTIFIERS
// =============================================================================

/// Common surface of every typed entity identifier.
///
/// Identifiers are allocated from a single monotonic counter per store,
/// so ordering by id is ordering by creation.
pub trait EntityKey: Copy + Ord + fmt::Debug + fmt::Display {
    /// The entity kind this identifier addresses.
    const KIND: EntityKind;

    /// Wrap a raw identifier.
    fn from_raw(raw: u64) -> Self;

    /// The raw identifier value.
    fn raw(self) -> u64;
}

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident => $kind:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub struct $name(pub u64);

        impl EntityKey for $name {
            const KIND: EntityKind = EntityKind::$kind;

            fn from_raw(raw: u64) -> Self {
                Self(raw)
            }

            fn raw(self) -> u64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}#{}", EntityKind::$kind.name(), self.0)
            }
        }
    };
}

entity_id!(
    /// Identifier of a customer.
    CustomerId => Customer
);
entity_id!(
    /// Identifier of an order.
    OrderId => Order
);
entity_id!(
    /// Identifier of a payment (composition part of an order).
    PaymentId => Payment
);
entity_id!(
    /// Identifier of an invoice (set-once part of an order).
    InvoiceId => Invoice
);
entity_id!(
    /// Identifier of a kitchen request raised for an order.
    OrderRequestId => OrderRequest
);
entity_id!(
    /// Identifier of an item-quantity association instance.
    ItemQuantityId => ItemQuantity
);
entity_id!(
    /// Identifier of a menu.
    MenuId => Menu
);
entity_id!(
    /// Identifier of a menu item.
    MenuItemId => MenuItem
);
entity_id!(
    /// Identifier of an ingredient.
    IngredientId => Ingredient
);
entity_id!(
    /// Identifier of a supplier.
    SupplierId => Supplier
);
entity_id!(
    /// Identifier of a supply-log association instance.
    SupplyLogId => SupplyLog
);
entity_id!(
    /// Identifier of a staff member.
    StaffId => Staff
);
entity_id!(
    /// Identifier of a dining table.
    TableId => Table
);
entity_id!(
    /// Identifier of a reservation.
    ReservationId => Reservation
);
entity_id!(
    /// Identifier of a discount.
    DiscountId => Discount
);
entity_id!(
    /// Identifier of a feedback entry.
    FeedbackId => Feedback
);

// =============================================================================
// MONEY
// =============================================================================

/// An amount of money in cents.
///
/// Integer only; no floating point anywhere in the model.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub struct Money(pub u64);

impl Money {
    /// Zero cents.
    pub const ZERO: Money = Money(0);

    /// Create an amount from cents.
    #[must_use]
    pub const fn from_cents(cents: u64) -> Self {
        Self(cents)
    }

    /// Get the raw amount in cents.
    #[must_use]
    pub const fn cents(self) -> u64 {
        self.0
    }

    /// Add two amounts, saturating at `u64::MAX`.
    #[must_use]
    pub const fn saturating_add(self, other: Money) -> Self {
        Self(self.0.saturating_add(other.0))
    }

    /// Subtract, saturating at zero.
    #[must_use]
    pub const fn saturating_sub(self, other: Money) -> Self {
        Self(self.0.saturating_sub(other.0))
    }

    /// Multiply by a whole quantity, saturating.
    #[must_use]
    pub const fn times(self, quantity: u32) -> Self {
        Self(self.0.saturating_mul(quantity as u64))
    }

    /// Apply a rate expressed in basis points (1/100 of a percent), rounding down.
    #[must_use]
    pub const fn basis_points(self, bp: u32) -> Self {
        Self(self.0.saturating_mul(bp as u64) / 10_000)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

// =============================================================================
// QUALIFIER
// =============================================================================

/// Key of the customer → reservation qualified association.
///
/// Ordered by date first, then time, so a customer's reservations iterate
/// chronologically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ReservationSlot {
    pub date: NaiveDate,
    pub time: NaiveTime,
}

impl ReservationSlot {
    /// Create a slot key.
    #[must_use]
    pub const fn new(date: NaiveDate, time: NaiveTime) -> Self {
        Self { date, time }
    }
}

impl fmt::Display for ReservationSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.date, self.time.format("%H:%M"))
    }
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors that can occur in the Trattoria model.
///
/// - No silent failures
/// - Use `Result<T, TrattoriaError>` for fallible operations
/// - Every relationship violation leaves the graph exactly as it was
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TrattoriaError {
    /// A required endpoint was missing or not usable for this operation.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A scalar field failed validation.
    #[error("Invalid {field}: {reason}")]
    InvalidField { field: &'static str, reason: String },

    /// The referenced entity is not in its extent.
    #[error("Unknown {kind} {id}")]
    EntityNotFound { kind: EntityKind, id: u64 },

    /// The pair is already linked and the relationship rejects duplicates.
    #[error("{relationship}: pair is already linked")]
    AlreadyLinked { relationship: &'static str },

    /// Detach requested on a pair with no existing link.
    #[error("{relationship}: pair is not linked")]
    NotLinked { relationship: &'static str },

    /// Removal would leave a side below its minimum cardinality.
    #[error("{relationship}: removing would leave {role} below its minimum of {min}")]
    BelowMinimumCardinality {
        relationship: &'static str,
        role: &'static str,
        min: usize,
    },

    /// Attaching would push a side past its maximum cardinality.
    #[error("{relationship}: {role} already holds its maximum of {max}")]
    AboveMaximumCardinality {
        relationship: &'static str,
        role: &'static str,
        max: usize,
    },

    /// The link would close a cycle in an acyclic hierarchy.
    #[error("{relationship}: link would create a cycle")]
    Cycle { relationship: &'static str },

    /// An entity was linked to itself in a reflexive relationship.
    #[error("{relationship}: an entity cannot be linked to itself")]
    SelfReference { relationship: &'static str },

    /// A set-once composition link cannot be reassigned.
    #[error("{relationship}: ownership is immutable once set")]
    OwnershipImmutable { relationship: &'static str },

    /// A status change not permitted by the state machine.
    #[error("Invalid status transition: {from} -> {to}")]
    InvalidTransition { from: &'static str, to: &'static str },

    /// The entity is not in a state that permits the operation.
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// A serialization error occurred.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// A deserialization error occurred.
    #[error("Deserialization error: {0}")]
    DeserializationError(String),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    IoError(String),
}

impl TrattoriaError {
    /// Build an `EntityNotFound` for a typed key.
    #[must_use]
    pub fn not_found<K: EntityKey>(key: K) -> Self {
        Self::EntityNotFound {
            kind: K::KIND,
            id: key.raw(),
        }
    }

    /// Build an `InvalidField` error.
    #[must_use]
    pub fn invalid_field(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidField {
            field,
            reason: reason.into(),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
