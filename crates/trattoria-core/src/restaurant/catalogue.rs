//! # Relationship Catalogue
//!
//! Every relationship the restaurant model instantiates, as data.
//!
//! `source` bounds how many targets one source holds, `target` bounds how
//! many sources one target holds. Strict sides get their first links inside
//! the creating operation; guarded sides may start empty and only block
//! removal below their floor.

use crate::relationship::{Multiplicity, Ownership, RelationshipDef, Side};

const ZERO_OR_ONE: Multiplicity = Multiplicity::ZERO_OR_ONE;
const EXACTLY_ONE: Multiplicity = Multiplicity::EXACTLY_ONE;
const ZERO_OR_MORE: Multiplicity = Multiplicity::ZERO_OR_MORE;
const ONE_OR_MORE: Multiplicity = Multiplicity::ONE_OR_MORE;

// =============================================================================
// ORDERS
// =============================================================================

/// Order owns its payments. Once paid, an order keeps at least one.
pub const ORDER_PAYMENTS: RelationshipDef = RelationshipDef::new(
    "order-payments",
    Side::guarded("payments", ONE_OR_MORE),
    Side::strict("order", EXACTLY_ONE),
    Ownership::Composition,
);

/// At most one invoice per order, set once.
pub const ORDER_INVOICE: RelationshipDef = RelationshipDef::new(
    "order-invoice",
    Side::guarded("invoice", ZERO_OR_ONE),
    Side::strict("order", EXACTLY_ONE),
    Ownership::Composition,
)
.rejecting_duplicates();

pub const ORDER_REQUESTS: RelationshipDef = RelationshipDef::new(
    "order-requests",
    Side::guarded("requests", ZERO_OR_MORE),
    Side::strict("order", EXACTLY_ONE),
    Ownership::Composition,
);

/// Orders may be anonymous.
pub const CUSTOMER_ORDERS: RelationshipDef = RelationshipDef::new(
    "customer-orders",
    Side::guarded("orders", ZERO_OR_MORE),
    Side::guarded("customer", ZERO_OR_ONE),
    Ownership::Association,
);

/// A table seats at most one order at a time.
pub const ORDER_TABLES: RelationshipDef = RelationshipDef::new(
    "order-tables",
    Side::guarded("tables", ZERO_OR_MORE),
    Side::guarded("order", ZERO_OR_ONE),
    Ownership::Association,
);

pub const ORDER_DISCOUNTS: RelationshipDef = RelationshipDef::new(
    "order-discounts",
    Side::guarded("discounts", ZERO_OR_MORE),
    Side::guarded("orders", ZERO_OR_MORE),
    Ownership::Association,
)
.rejecting_duplicates();

// =============================================================================
// MENU
// =============================================================================

pub const MENU_ITEMS: RelationshipDef = RelationshipDef::new(
    "menu-items",
    Side::strict("items", ONE_OR_MORE),
    Side::guarded("menus", ZERO_OR_MORE),
    Ownership::Aggregation,
);

/// A dish keeps at least one ingredient; an ingredient may sit unused.
///
/// The ingredient side stays `0..*` on purpose. A `1..*` floor there would
/// refuse taking Cheese off Pizza whenever Pizza is the only dish using
/// Cheese, even though Pizza keeps its other ingredients.
pub const MENU_ITEM_INGREDIENTS: RelationshipDef = RelationshipDef::new(
    "menu-item-ingredients",
    Side::strict("ingredients", ONE_OR_MORE),
    Side::guarded("menuItems", ZERO_OR_MORE),
    Ownership::Aggregation,
);

pub const SUPPLIER_INGREDIENTS: RelationshipDef = RelationshipDef::new(
    "supplier-ingredients",
    Side::strict("ingredients", ONE_OR_MORE),
    Side::guarded("suppliers", ZERO_OR_MORE),
    Ownership::Aggregation,
);

// =============================================================================
// FEEDBACK
// =============================================================================

pub const CUSTOMER_FEEDBACK: RelationshipDef = RelationshipDef::new(
    "customer-feedback",
    Side::guarded("feedback", ZERO_OR_MORE),
    Side::strict("customer", EXACTLY_ONE),
    Ownership::Composition,
);

pub const MENU_ITEM_FEEDBACK: RelationshipDef = RelationshipDef::new(
    "menu-item-feedback",
    Side::guarded("feedback", ZERO_OR_MORE),
    Side::strict("menuItem", EXACTLY_ONE),
    Ownership::Composition,
);

// =============================================================================
// ASSOCIATION CLASSES
// =============================================================================

pub const REQUEST_ITEM_QUANTITIES: RelationshipDef = RelationshipDef::new(
    "item-quantities",
    Side::guarded("itemQuantities", ZERO_OR_MORE),
    Side::strict("orderRequest", EXACTLY_ONE),
    Ownership::Composition,
);

pub const MENU_ITEM_QUANTITIES: RelationshipDef = RelationshipDef::new(
    "item-quantities",
    Side::guarded("itemQuantities", ZERO_OR_MORE),
    Side::strict("menuItem", EXACTLY_ONE),
    Ownership::Composition,
);

pub const SUPPLIER_SUPPLY_LOGS: RelationshipDef = RelationshipDef::new(
    "supply-logs",
    Side::guarded("supplyLogs", ZERO_OR_MORE),
    Side::strict("supplier", EXACTLY_ONE),
    Ownership::Composition,
);

pub const INGREDIENT_SUPPLY_LOGS: RelationshipDef = RelationshipDef::new(
    "supply-logs",
    Side::guarded("supplyLogs", ZERO_OR_MORE),
    Side::strict("ingredient", EXACTLY_ONE),
    Ownership::Composition,
);

// =============================================================================
// STAFF / RESERVATIONS
// =============================================================================

/// Managers only; acyclic, at most one supervisor each.
pub const SUPERVISION: RelationshipDef = RelationshipDef::new(
    "supervision",
    Side::guarded("subordinates", ZERO_OR_MORE),
    Side::guarded("supervisor", ZERO_OR_ONE),
    Ownership::Reflexive,
);

pub const RESERVATION_TABLES: RelationshipDef = RelationshipDef::new(
    "reservation-tables",
    Side::strict("tables", ONE_OR_MORE),
    Side::guarded("reservations", ZERO_OR_MORE),
    Ownership::Aggregation,
);

/// Customer -> reservation, keyed by date and time.
pub const CUSTOMER_RESERVATIONS: &str = "customer-reservations";
