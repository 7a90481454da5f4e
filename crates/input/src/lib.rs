//! Interaction Controller: pointer, wheel and UI commands mapped onto the camera.
//!
//! # Invariants
//! - Manual and automatic rotation never run together: a drag start stops spinning.
//! - Spin cancellation is cooperative. A stop takes effect when the next tick fires.
//! - Handlers never render. They return an [`EventResponse`] and the host acts on it.

pub mod controller;
pub mod event;

pub use controller::{
    BUTTON_ZOOM_STEP, DRAG_SENSITIVITY, EventResponse, InteractionController, InteractionState,
    SPIN_STEP, WHEEL_ZOOM_IN, WHEEL_ZOOM_OUT,
};
pub use event::{Command, InputEvent};
