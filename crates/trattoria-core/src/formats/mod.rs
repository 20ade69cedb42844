//! # Formats
//!
//! On-disk representation of a restaurant.

pub mod persistence;

pub use persistence::{
    HEADER_LEN, LoadOutcome, MAX_PERSISTENCE_PAYLOAD_SIZE, PersistenceHeader, load_from_path,
    load_or_empty, restaurant_from_bytes, restaurant_to_bytes, save_to_path,
};
