//! Scene State: the currently visible subset of a molecule.
//!
//! # Invariants
//! - A bond is in the scene iff both of its endpoint atoms are.
//! - The scene is rebuilt in full on every load; there is no incremental patching.
//! - Loading never fails. A missing molecule produces an empty scene.

pub mod scene;

pub use scene::{Scene, SceneSummary};
