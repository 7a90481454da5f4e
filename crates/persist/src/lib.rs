//! Persistence for named view configurations.
//!
//! # Invariants
//! - The store file is versioned; a file with another schema version is
//!   refused instead of guessed at.
//! - Every mutation is on disk before the call returns.
//! - Loaded cameras are clamped exactly like live ones.

mod store;

pub use store::{SavedView, ViewStore, ViewStoreError};

pub fn crate_info() -> &'static str {
    "ballstick-persist v0.1.0"
}
