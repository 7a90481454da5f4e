//! Shared types for the ball-and-stick viewer: molecules, visibility masks, colors.
//!
//! # Invariants
//! - An atom's `original_index` is fixed when the molecule is built and never reassigned.
//! - Bonds reference atoms by `original_index`, never by position in a filtered list.
//! - Elements missing from a visibility mask are visible.

mod color;
mod types;

pub use color::{ColorParseError, Rgba};
pub use types::{Atom, Bond, Molecule, VisibilityMask};

pub fn crate_info() -> &'static str {
    "ballstick-common v0.1.0"
}
