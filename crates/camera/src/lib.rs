//! Camera Transform: rotation around two axes, a clamped zoom, and a
//! fixed-focal-length projection from molecule space to surface pixels.
//!
//! # Invariants
//! - Stored zoom is always within [`MIN_ZOOM`, `MAX_ZOOM`]; every mutator clamps.
//! - Projection is recomputed per frame and never cached.
//! - The perspective divide is left unguarded at `depth == -PERSPECTIVE`.

mod camera;

pub use camera::{
    BASE_SCALE, Camera, DEFAULT_ROTATION_X, DEFAULT_ROTATION_Y, DEFAULT_ZOOM, MAX_ZOOM, MIN_ZOOM,
    NamedView, PERSPECTIVE, ProjectedPoint, UnknownViewError,
};
