use crate::event::{Command, InputEvent};
use ballstick_camera::Camera;
use glam::DVec2;

/// Radians of rotation per pixel of drag.
pub const DRAG_SENSITIVITY: f64 = 0.01;
/// Radians added to `rotation_y` per spin tick.
pub const SPIN_STEP: f64 = 0.02;
/// Zoom factor for a positive wheel delta.
pub const WHEEL_ZOOM_OUT: f64 = 0.9;
/// Zoom factor for a negative wheel delta.
pub const WHEEL_ZOOM_IN: f64 = 1.1;
/// Zoom factor of the zoom-in command; zoom-out uses its inverse.
pub const BUTTON_ZOOM_STEP: f64 = 1.2;

/// Pointer state. Spinning is tracked separately since it can coexist with `Idle`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InteractionState {
    Idle,
    Dragging { last: DVec2 },
}

/// What the host should do after an input was handled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EventResponse {
    /// Camera or scene changed; redraw the surface.
    pub redraw: bool,
    /// Schedule one call to [`InteractionController::tick`] on the next
    /// animation frame or timer.
    pub schedule_tick: bool,
    /// Suppress the surface's native handling of the event (page scroll).
    pub prevent_default: bool,
}

impl EventResponse {
    pub const NONE: Self = Self {
        redraw: false,
        schedule_tick: false,
        prevent_default: false,
    };

    pub const REDRAW: Self = Self {
        redraw: true,
        schedule_tick: false,
        prevent_default: false,
    };
}

/// State machine over pointer, wheel and command input.
///
/// Owns no camera; every handler mutates the camera it is given, so several
/// viewers can each hold their own controller.
#[derive(Debug, Clone)]
pub struct InteractionController {
    state: InteractionState,
    spinning: bool,
    /// A tick has been requested from the host and has not fired yet.
    tick_pending: bool,
}

impl Default for InteractionController {
    fn default() -> Self {
        Self {
            state: InteractionState::Idle,
            spinning: false,
            tick_pending: false,
        }
    }
}

impl InteractionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> InteractionState {
        self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, InteractionState::Dragging { .. })
    }

    pub fn is_spinning(&self) -> bool {
        self.spinning
    }

    pub fn handle_event(&mut self, camera: &mut Camera, event: InputEvent) -> EventResponse {
        match event {
            InputEvent::PointerDown { x, y } => self.pointer_down(x, y),
            InputEvent::PointerMove { x, y } => self.pointer_move(camera, x, y),
            InputEvent::PointerUp | InputEvent::PointerLeave => self.pointer_up(),
            InputEvent::Wheel { delta } => self.wheel(camera, delta),
        }
    }

    pub fn handle_command(&mut self, camera: &mut Camera, command: &Command) -> EventResponse {
        match command {
            Command::SetView(name) => {
                if camera.set_named_view(name) {
                    EventResponse::REDRAW
                } else {
                    EventResponse::NONE
                }
            }
            Command::ResetView => {
                camera.reset();
                EventResponse::REDRAW
            }
            Command::ZoomIn => {
                camera.zoom_by(BUTTON_ZOOM_STEP);
                EventResponse::REDRAW
            }
            Command::ZoomOut => {
                camera.zoom_by(1.0 / BUTTON_ZOOM_STEP);
                EventResponse::REDRAW
            }
            Command::ToggleSpin => self.toggle_spin(),
        }
    }

    /// Begin a drag. Stops spinning first.
    pub fn pointer_down(&mut self, x: f64, y: f64) -> EventResponse {
        if self.spinning {
            self.stop_spin();
        }
        self.state = InteractionState::Dragging {
            last: DVec2::new(x, y),
        };
        tracing::trace!(x, y, "drag start");
        EventResponse::NONE
    }

    /// Rotate by the pointer delta while dragging. Horizontal motion turns
    /// around the vertical axis, vertical motion around the horizontal axis.
    pub fn pointer_move(&mut self, camera: &mut Camera, x: f64, y: f64) -> EventResponse {
        let InteractionState::Dragging { last } = self.state else {
            return EventResponse::NONE;
        };
        let pos = DVec2::new(x, y);
        let delta = pos - last;
        camera.rotate_by(delta.y * DRAG_SENSITIVITY, delta.x * DRAG_SENSITIVITY);
        self.state = InteractionState::Dragging { last: pos };
        EventResponse::REDRAW
    }

    pub fn pointer_up(&mut self) -> EventResponse {
        if self.is_dragging() {
            tracing::trace!("drag end");
        }
        self.state = InteractionState::Idle;
        EventResponse::NONE
    }

    /// Zoom out for positive deltas, in for negative ones. A zero delta
    /// changes nothing. Native scrolling is always suppressed.
    pub fn wheel(&mut self, camera: &mut Camera, delta: f64) -> EventResponse {
        let factor = if delta > 0.0 {
            WHEEL_ZOOM_OUT
        } else if delta < 0.0 {
            WHEEL_ZOOM_IN
        } else {
            return EventResponse {
                prevent_default: true,
                ..EventResponse::NONE
            };
        };
        camera.zoom_by(factor);
        EventResponse {
            redraw: true,
            prevent_default: true,
            ..EventResponse::NONE
        }
    }

    pub fn toggle_spin(&mut self) -> EventResponse {
        if self.spinning {
            self.stop_spin()
        } else {
            self.start_spin()
        }
    }

    /// Enter spinning. Asks for a tick unless one is still pending from an
    /// earlier spin, in which case that tick picks the spin back up.
    pub fn start_spin(&mut self) -> EventResponse {
        self.spinning = true;
        let schedule_tick = !self.tick_pending;
        self.tick_pending = true;
        tracing::debug!(schedule_tick, "spin started");
        EventResponse {
            schedule_tick,
            ..EventResponse::NONE
        }
    }

    /// Leave spinning. Any already scheduled tick becomes a no-op when it fires.
    pub fn stop_spin(&mut self) -> EventResponse {
        self.spinning = false;
        tracing::debug!("spin stopped");
        EventResponse::NONE
    }

    /// One animation tick. Checks spinning at fire time: if still spinning,
    /// advances `rotation_y` and asks to redraw and reschedule; otherwise
    /// does nothing.
    pub fn tick(&mut self, camera: &mut Camera) -> EventResponse {
        self.tick_pending = false;
        if !self.spinning {
            return EventResponse::NONE;
        }
        camera.rotate_by(0.0, SPIN_STEP);
        self.tick_pending = true;
        EventResponse {
            redraw: true,
            schedule_tick: true,
            prevent_default: false,
        }
    }
}
