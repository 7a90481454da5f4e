//! Molecule library: the local source of `Molecule` records.
//!
//! Molecules are keyed by id and loaded from or saved to a JSON file of the
//! form `{"molecules": [...]}`. A set of small sample molecules is bundled.
//!
//! # Invariants
//! - Every molecule in a library has only bonds between its own atoms, with
//!   order 1 to 3.
//! - Atom `original_index` values come from atom list position on load.

mod library;
pub mod samples;

pub use library::{LibraryError, MAX_BOND_ORDER, MoleculeLibrary};

pub fn crate_info() -> &'static str {
    "ballstick-assets v0.1.0"
}
