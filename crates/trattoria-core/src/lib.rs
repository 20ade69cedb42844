//! # trattoria-core
//!
//! The restaurant domain model and its relationship-integrity engine - THE
//! LOGIC.
//!
//! Every entity lives in a typed extent inside a [`Restaurant`] store, and
//! every link between entities goes through one generic engine that keeps
//! both ends consistent and enforces cardinality, ownership and acyclicity.
//!
//! ## Layers
//!
//! - `extent`, `relationship`, `hierarchy`, `qualified`,
//!   `association_class`: the engine
//! - `entities`, `status`: scalar records and status state machines
//! - `restaurant`: the store, one relationship instance per pairing
//! - `integrity`: whole-store verification
//! - `formats`: binary persistence with reverse-link repair
//!
//! ## Architectural Constraints
//!
//! - No async, no network dependencies (pure Rust)
//! - Deterministic: `BTreeMap`/`BTreeSet` only, integer money, no floats
//! - No global state: the store is an explicit value

// =============================================================================
// MODULES
// =============================================================================

pub mod association_class;
pub mod entities;
pub mod extent;
pub mod formats;
pub mod hierarchy;
pub mod integrity;
pub mod primitives;
pub mod qualified;
pub mod relationship;
pub mod restaurant;
pub mod status;
pub mod types;

// =============================================================================
// RE-EXPORTS: Core Types
// =============================================================================

pub use types::{
    CustomerId, DiscountId, EntityKey, EntityKind, FeedbackId, IngredientId, InvoiceId,
    ItemQuantityId, MenuId, MenuItemId, Money, OrderId, OrderRequestId, PaymentId, ReservationId,
    ReservationSlot, StaffId, SupplierId, SupplyLogId, TableId, TrattoriaError,
};

// =============================================================================
// RE-EXPORTS: Engine
// =============================================================================

pub use association_class::{AssociationClass, PairPolicy};
pub use extent::Extent;
pub use hierarchy::Hierarchy;
pub use integrity::{IntegrityReport, Violation};
pub use qualified::{QualifiedAssociation, Registration};
pub use relationship::{
    Association, Attach, DuplicatePolicy, FloorMode, Multiplicity, Ownership, RelationshipDef,
    Side,
};

// =============================================================================
// RE-EXPORTS: Model
// =============================================================================

pub use entities::{
    Customer, Discount, Feedback, Ingredient, Invoice, InvoiceTotals, ItemQuantity, ManagerProfile,
    Menu, MenuItem, Order, OrderKind, OrderRequest, Payment, PaymentMethod, Reservation, Staff,
    StaffRole, Supplier, SupplyLog, Table,
};
pub use restaurant::{Restaurant, SerializableRestaurant};
pub use status::{Lifecycle, OrderRequestStatus, OrderStatus, PaymentStatus, ReservationStatus};

// =============================================================================
// RE-EXPORTS: Formats
// =============================================================================

pub use formats::{
    LoadOutcome, PersistenceHeader, load_from_path, load_or_empty, restaurant_from_bytes,
    restaurant_to_bytes, save_to_path,
};
