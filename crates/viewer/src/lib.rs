//! Viewer: one handle wiring scene, camera, interaction controller and
//! render pipeline to a surface.
//!
//! # Invariants
//! - No global state. Each [`Viewer`] owns everything it draws from.
//! - Every state change that asks for a redraw renders exactly one frame.
//! - Visibility or molecule changes rebuild the scene from scratch.
//!
//! The host owns scheduling: when a response carries `schedule_tick`, it
//! calls [`Viewer::tick`] on its next animation frame or timer.

mod config;
mod viewer;

pub use config::{ConfigError, ViewerConfig};
pub use viewer::Viewer;

pub fn crate_info() -> &'static str {
    "ballstick-viewer v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("viewer"));
    }
}
