//! # Persistence Format
//!
//! Binary serialization for a [`Restaurant`].
//!
//! Format: Header (5 bytes) + postcard-serialized [`SerializableRestaurant`].
//! - 4 bytes: Magic ("TRAT")
//! - 1 byte: Version
//!
//! Decoding validates size and header before touching the payload, then
//! rebuilds the store through the relationship engine (see
//! [`SerializableRestaurant`]) so a file is either restored completely or
//! rejected.
//!
//! File access is limited to whole-file read and write. A caller that must
//! always have a store uses [`load_or_empty`], which falls back to an empty
//! one and hands back the failure.

use crate::primitives;
use crate::restaurant::{Restaurant, SerializableRestaurant};
use crate::types::TrattoriaError;
use std::path::Path;

// =============================================================================
// LIMITS
// =============================================================================

/// Maximum accepted size of a persisted restaurant.
///
/// Checked before deserialization so a corrupt length prefix cannot trigger
/// a huge allocation.
pub const MAX_PERSISTENCE_PAYLOAD_SIZE: usize = 64 * 1024 * 1024; // 64 MB

/// Length of the file header.
pub const HEADER_LEN: usize = 5;

// =============================================================================
// FILE HEADER
// =============================================================================

/// Magic and format version at the start of every restaurant file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PersistenceHeader {
    pub magic: [u8; 4],
    pub version: u8,
}

impl PersistenceHeader {
    /// The header this build writes.
    pub const CURRENT: Self = Self {
        magic: *primitives::MAGIC_BYTES,
        version: primitives::FORMAT_VERSION,
    };

    #[must_use]
    pub fn encode(self) -> [u8; HEADER_LEN] {
        let [m0, m1, m2, m3] = self.magic;
        [m0, m1, m2, m3, self.version]
    }

    /// Split `bytes` into a checked header and the payload behind it.
    ///
    /// Fails on short input, foreign magic or any version but the current
    /// one.
    pub fn split(bytes: &[u8]) -> Result<(Self, &[u8]), TrattoriaError> {
        let (head, payload) = bytes.split_first_chunk::<HEADER_LEN>().ok_or_else(|| {
            TrattoriaError::DeserializationError(format!(
                "Data too short: {} bytes, header needs {}",
                bytes.len(),
                HEADER_LEN
            ))
        })?;
        let [m0, m1, m2, m3, version] = *head;
        let header = Self {
            magic: [m0, m1, m2, m3],
            version,
        };

        if header.magic != Self::CURRENT.magic {
            return Err(TrattoriaError::DeserializationError(
                "Invalid magic bytes".to_string(),
            ));
        }
        if header.version != Self::CURRENT.version {
            return Err(TrattoriaError::DeserializationError(format!(
                "Unsupported version: {} (expected {})",
                header.version,
                Self::CURRENT.version
            )));
        }
        Ok((header, payload))
    }
}

// =============================================================================
// SERIALIZATION FUNCTIONS
// =============================================================================

/// Serialize a restaurant to bytes (header + payload).
pub fn restaurant_to_bytes(restaurant: &Restaurant) -> Result<Vec<u8>, TrattoriaError> {
    let payload = postcard::to_stdvec(&SerializableRestaurant::from(restaurant))
        .map_err(|e| TrattoriaError::SerializationError(e.to_string()))?;

    let mut result = Vec::with_capacity(HEADER_LEN + payload.len());
    result.extend_from_slice(&PersistenceHeader::CURRENT.encode());
    result.extend_from_slice(&payload);
    Ok(result)
}

/// Deserialize a restaurant from bytes.
///
/// The size limit and header are checked before the payload is decoded;
/// the store is then rebuilt and verified.
pub fn restaurant_from_bytes(bytes: &[u8]) -> Result<Restaurant, TrattoriaError> {
    if bytes.len() > MAX_PERSISTENCE_PAYLOAD_SIZE {
        return Err(TrattoriaError::DeserializationError(format!(
            "Data size {} bytes exceeds maximum allowed {} bytes",
            bytes.len(),
            MAX_PERSISTENCE_PAYLOAD_SIZE
        )));
    }
    let (_, payload) = PersistenceHeader::split(bytes)?;

    let serializable: SerializableRestaurant = postcard::from_bytes(payload).map_err(|e| {
        TrattoriaError::DeserializationError(format!("Failed to decode restaurant data: {}", e))
    })?;

    Restaurant::try_from(serializable)
}

// =============================================================================
// FILE ACCESS
// =============================================================================

/// Write a restaurant to `path`, replacing any existing file.
pub fn save_to_path(restaurant: &Restaurant, path: &Path) -> Result<(), TrattoriaError> {
    let bytes = restaurant_to_bytes(restaurant)?;
    std::fs::write(path, &bytes)
        .map_err(|e| TrattoriaError::IoError(format!("{}: {}", path.display(), e)))?;
    tracing::info!(path = %path.display(), bytes = bytes.len(), "restaurant saved");
    Ok(())
}

/// Read and rebuild a restaurant from `path`.
pub fn load_from_path(path: &Path) -> Result<Restaurant, TrattoriaError> {
    let size = std::fs::metadata(path)
        .map_err(|e| TrattoriaError::IoError(format!("{}: {}", path.display(), e)))?
        .len();
    if size > MAX_PERSISTENCE_PAYLOAD_SIZE as u64 {
        return Err(TrattoriaError::DeserializationError(format!(
            "File size {} bytes exceeds maximum allowed {} bytes",
            size, MAX_PERSISTENCE_PAYLOAD_SIZE
        )));
    }

    let bytes = std::fs::read(path)
        .map_err(|e| TrattoriaError::IoError(format!("{}: {}", path.display(), e)))?;
    let restaurant = restaurant_from_bytes(&bytes)?;
    tracing::info!(
        path = %path.display(),
        entities = restaurant.counts().iter().map(|(_, n)| n).sum::<usize>(),
        links = restaurant.link_count(),
        "restaurant loaded"
    );
    Ok(restaurant)
}

/// Result of [`load_or_empty`].
#[derive(Debug)]
pub struct LoadOutcome {
    pub restaurant: Restaurant,
    /// Why the file could not be used, when the store is empty because of a
    /// failure rather than a fresh start.
    pub error: Option<TrattoriaError>,
}

impl LoadOutcome {
    /// Whether the file was restored.
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.error.is_none()
    }
}

/// Load `path`, or present an empty restaurant if it is missing or corrupt.
///
/// Never yields a partially-loaded store.
pub fn load_or_empty(path: &Path) -> LoadOutcome {
    match load_from_path(path) {
        Ok(restaurant) => LoadOutcome {
            restaurant,
            error: None,
        },
        Err(error) => {
            tracing::warn!(path = %path.display(), error = %error, "load failed; starting empty");
            LoadOutcome {
                restaurant: Restaurant::new(),
                error: Some(error),
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
    use crate::entities::{Customer, Feedback, Ingredient, MenuItem};
    use crate::types::Money;
    use chrono::NaiveDate;

    fn sample() -> Restaurant {
        let mut r = Restaurant::new();
        let ada = r
            .add_customer(Customer::new("Ada", Some("ada@example.com")).expect("customer"))
            .expect("add");
        let cheese = r
            .add_ingredient(Ingredient::new("Cheese", "g", 500).expect("ingredient"))
            .expect("add");
        let pizza = r
            .create_menu_item(MenuItem::new("Pizza", Money(1200), true).expect("item"), &[cheese])
            .expect("item");
        let day = NaiveDate::from_ymd_opt(2026, 5, 1).expect("date");
        r.submit_feedback(ada, pizza, Feedback::new(5, Some("great"), day).expect("feedback"))
            .expect("feedback");
        r
    }

    #[test]
    fn header_splits_off_payload() {
        let mut bytes = PersistenceHeader::CURRENT.encode().to_vec();
        assert_eq!(&bytes[..4], primitives::MAGIC_BYTES);
        bytes.extend_from_slice(b"rest");

        let (header, payload) = PersistenceHeader::split(&bytes).expect("split");
        assert_eq!(header, PersistenceHeader::CURRENT);
        assert_eq!(payload, b"rest");
    }

    #[test]
    fn bytes_roundtrip_bit_exact() {
        let r = sample();

        let bytes1 = restaurant_to_bytes(&r).expect("first serialize");
        let restored = restaurant_from_bytes(&bytes1).expect("deserialize");
        let bytes2 = restaurant_to_bytes(&restored).expect("second serialize");

        assert_eq!(bytes1, bytes2, "serialization must be bit-exact");
    }

    #[test]
    fn rejects_bad_magic() {
        let mut bytes = restaurant_to_bytes(&sample()).expect("serialize");
        bytes[0] = b'X';
        assert!(matches!(
            restaurant_from_bytes(&bytes),
            Err(TrattoriaError::DeserializationError(_))
        ));
    }

    #[test]
    fn rejects_future_version() {
        let mut bytes = restaurant_to_bytes(&sample()).expect("serialize");
        bytes[4] = primitives::FORMAT_VERSION + 1;
        let err = restaurant_from_bytes(&bytes).expect_err("version");
        assert!(err.to_string().contains("Unsupported version"));
    }

    #[test]
    fn rejects_short_and_truncated_data() {
        let err = restaurant_from_bytes(b"TRA").expect_err("short");
        assert!(err.to_string().contains("too short"));
        assert!(PersistenceHeader::split(b"TRAT").is_err());
        let bytes = restaurant_to_bytes(&sample()).expect("serialize");
        assert!(restaurant_from_bytes(&bytes[..bytes.len() / 2]).is_err());
    }

    #[test]
    fn feedback_rejoins_both_owners() {
        let bytes = restaurant_to_bytes(&sample()).expect("serialize");
        let r = restaurant_from_bytes(&bytes).expect("deserialize");

        let (entry, _) = r.feedback().iter().next().expect("feedback");
        let (customer, _) = r.customers().iter().next().expect("customer");
        let (item, _) = r.menu_items().iter().next().expect("item");
        assert_eq!(r.customer_feedback().source_of(entry), Some(customer));
        assert_eq!(r.item_feedback().source_of(entry), Some(item));
        assert_eq!(r.customer_feedback().targets(customer).collect::<Vec<_>>(), vec![entry]);
    }
}
