//! Render Pipeline: element appearance, a surface-agnostic drawing interface,
//! and the depth-sorted ball-and-stick frame.
//!
//! # Invariants
//! - Rendering never mutates the scene or the camera.
//! - Every frame starts from a cleared surface and projects from scratch.
//! - All bonds are painted before any atom; atoms are painted in ascending
//!   depth, with equal depths keeping scene order.
//!
//! Two surfaces ship with the crate: [`RecordingSurface`] keeps the draw
//! calls for inspection, [`RasterSurface`] rasterizes into an RGBA image and
//! writes PNG.

pub mod appearance;
pub mod font;
mod pipeline;
mod raster;
mod surface;

pub use appearance::{element_color, element_radius, label_color};
pub use pipeline::{FrameStats, PaintOrder, RenderPipeline, RenderStyle};
pub use raster::{RasterSurface, RenderError};
pub use surface::{DrawCommand, RecordingSurface, Surface};

pub fn crate_info() -> &'static str {
    "ballstick-render v0.1.0"
}
