//! # Innate Primitives
//!
//! Hardcoded runtime constants for the Trattoria core.
//!
//! These are compiled into the binary and are immutable at runtime.

/// Magic bytes for the Trattoria binary format header.
///
/// - File Header = Magic Bytes ("TRAT") + Version (u8) before payload.
pub const MAGIC_BYTES: &[u8; 4] = b"TRAT";

/// Current serialization format version.
///
/// Increment this when making breaking changes to the serialization format.
pub const FORMAT_VERSION: u8 = 1;

/// Maximum number of supervisor hops walked when checking for cycles.
///
/// A chain longer than this is treated as corrupt rather than walked forever.
pub const MAX_HIERARCHY_DEPTH: usize = 1024;

// =============================================================================
// INPUT VALIDATION LIMITS
// =============================================================================

/// Maximum length for names (customers, staff, menu items, ...).
pub const MAX_NAME_LENGTH: usize = 120;

/// Maximum length for free text (comments, notes, descriptions).
pub const MAX_TEXT_LENGTH: usize = 2000;

/// Maximum length for an email address.
pub const MAX_EMAIL_LENGTH: usize = 254;

/// Largest party a single reservation may seat.
pub const MAX_PARTY_SIZE: u8 = 40;

/// Largest number of seats at a single table.
pub const MAX_TABLE_SEATS: u8 = 20;

/// Highest feedback rating.
pub const MAX_RATING: u8 = 5;

/// Default sales tax applied to invoices, in basis points (8.00%).
pub const DEFAULT_TAX_RATE_BP: u16 = 800;

/// Loyalty points earned per whole currency unit paid.
pub const LOYALTY_POINTS_PER_UNIT: u64 = 1;
