/// Raw pointer and wheel input in surface-local pixels.
///
/// Hosts translate their platform events into these; the controller never
/// sees platform types.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    PointerDown { x: f64, y: f64 },
    PointerMove { x: f64, y: f64 },
    PointerUp,
    /// Pointer left the surface. Ends a drag like `PointerUp`.
    PointerLeave,
    /// Signed wheel delta. Positive scrolls down (zooms out).
    Wheel { delta: f64 },
}

/// Discrete UI commands issued by buttons and menus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Apply a named view (`front`, `top`, `side`, `iso`). Unknown names do nothing.
    SetView(String),
    ResetView,
    ZoomIn,
    ZoomOut,
    ToggleSpin,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pointer_events_carry_positions() {
        let e = InputEvent::PointerDown { x: 10.0, y: 20.0 };
        assert!(matches!(e, InputEvent::PointerDown { x, .. } if x == 10.0));
    }

    #[test]
    fn set_view_keeps_raw_name() {
        let c = Command::SetView("bogus".into());
        assert_eq!(c, Command::SetView("bogus".to_string()));
    }
}
