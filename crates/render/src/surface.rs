use ballstick_common::Rgba;
use glam::DVec2;
use std::fmt::Write as _;

/// A 2D drawing target. All renderers draw through this trait.
///
/// Coordinates are surface pixels with the origin at the top-left corner and
/// y growing downward. Implementations clip anything outside the surface.
pub trait Surface {
    fn width(&self) -> u32;
    fn height(&self) -> u32;

    /// Erase the whole surface to transparent.
    fn clear(&mut self);

    /// Fill the whole surface with a two-stop top-to-bottom gradient.
    fn fill_vertical_gradient(&mut self, top: Rgba, bottom: Rgba);

    fn stroke_line(&mut self, from: DVec2, to: DVec2, width: f64, color: Rgba);

    fn fill_disc(&mut self, center: DVec2, radius: f64, color: Rgba);

    /// Fill a disc shaded from `inner` at the center to `outer` at the rim.
    fn fill_radial_disc(&mut self, center: DVec2, radius: f64, inner: Rgba, outer: Rgba);

    fn stroke_circle(&mut self, center: DVec2, radius: f64, width: f64, color: Rgba);

    /// Draw `text` centered on `center`. `size` is the cap height in pixels.
    fn fill_text(&mut self, text: &str, center: DVec2, size: f64, color: Rgba);
}

/// One recorded drawing call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear,
    VerticalGradient {
        top: Rgba,
        bottom: Rgba,
    },
    Line {
        from: DVec2,
        to: DVec2,
        width: f64,
        color: Rgba,
    },
    Disc {
        center: DVec2,
        radius: f64,
        color: Rgba,
    },
    RadialDisc {
        center: DVec2,
        radius: f64,
        inner: Rgba,
        outer: Rgba,
    },
    Circle {
        center: DVec2,
        radius: f64,
        width: f64,
        color: Rgba,
    },
    Text {
        text: String,
        center: DVec2,
        size: f64,
        color: Rgba,
    },
}

/// Surface that records draw calls instead of producing pixels.
///
/// Useful for tests, for dry runs from the CLI, and for checking paint order.
#[derive(Debug, Clone)]
pub struct RecordingSurface {
    width: u32,
    height: u32,
    commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            commands: Vec::new(),
        }
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Drain the recorded commands.
    pub fn take(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Human-readable listing of the recorded calls, one per line.
    pub fn describe(&self) -> String {
        self.describe_commands(&self.commands)
    }

    /// Like [`describe`](Self::describe), starting at the last `Clear`.
    pub fn describe_last_frame(&self) -> String {
        let start = self
            .commands
            .iter()
            .rposition(|c| matches!(c, DrawCommand::Clear))
            .unwrap_or(0);
        self.describe_commands(&self.commands[start..])
    }

    fn describe_commands(&self, commands: &[DrawCommand]) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "=== Frame {}x{} ({} commands) ===",
            self.width,
            self.height,
            commands.len()
        );
        for cmd in commands {
            let _ = match cmd {
                DrawCommand::Clear => writeln!(out, "clear"),
                DrawCommand::VerticalGradient { top, bottom } => {
                    writeln!(out, "gradient {top} -> {bottom}")
                }
                DrawCommand::Line {
                    from,
                    to,
                    width,
                    color,
                } => writeln!(
                    out,
                    "line ({:.1}, {:.1}) -> ({:.1}, {:.1}) w={width:.1} {color}",
                    from.x, from.y, to.x, to.y
                ),
                DrawCommand::Disc {
                    center,
                    radius,
                    color,
                } => writeln!(
                    out,
                    "disc ({:.1}, {:.1}) r={radius:.1} {color}",
                    center.x, center.y
                ),
                DrawCommand::RadialDisc {
                    center,
                    radius,
                    inner,
                    outer,
                } => writeln!(
                    out,
                    "shaded ({:.1}, {:.1}) r={radius:.1} {inner} -> {outer}",
                    center.x, center.y
                ),
                DrawCommand::Circle {
                    center,
                    radius,
                    width,
                    color,
                } => writeln!(
                    out,
                    "circle ({:.1}, {:.1}) r={radius:.1} w={width:.1} {color}",
                    center.x, center.y
                ),
                DrawCommand::Text {
                    text,
                    center,
                    size,
                    color,
                } => writeln!(
                    out,
                    "text {text:?} ({:.1}, {:.1}) size={size:.1} {color}",
                    center.x, center.y
                ),
            };
        }
        out
    }
}

impl Surface for RecordingSurface {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn clear(&mut self) {
        self.commands.push(DrawCommand::Clear);
    }

    fn fill_vertical_gradient(&mut self, top: Rgba, bottom: Rgba) {
        self.commands
            .push(DrawCommand::VerticalGradient { top, bottom });
    }

    fn stroke_line(&mut self, from: DVec2, to: DVec2, width: f64, color: Rgba) {
        self.commands.push(DrawCommand::Line {
            from,
            to,
            width,
            color,
        });
    }

    fn fill_disc(&mut self, center: DVec2, radius: f64, color: Rgba) {
        self.commands.push(DrawCommand::Disc {
            center,
            radius,
            color,
        });
    }

    fn fill_radial_disc(&mut self, center: DVec2, radius: f64, inner: Rgba, outer: Rgba) {
        self.commands.push(DrawCommand::RadialDisc {
            center,
            radius,
            inner,
            outer,
        });
    }

    fn stroke_circle(&mut self, center: DVec2, radius: f64, width: f64, color: Rgba) {
        self.commands.push(DrawCommand::Circle {
            center,
            radius,
            width,
            color,
        });
    }

    fn fill_text(&mut self, text: &str, center: DVec2, size: f64, color: Rgba) {
        self.commands.push(DrawCommand::Text {
            text: text.to_string(),
            center,
            size,
            color,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_in_call_order() {
        let mut s = RecordingSurface::new(10, 10);
        s.clear();
        s.fill_disc(DVec2::new(1.0, 2.0), 3.0, Rgba::BLACK);
        assert_eq!(s.commands().len(), 2);
        assert_eq!(s.commands()[0], DrawCommand::Clear);
        assert!(matches!(s.commands()[1], DrawCommand::Disc { radius, .. } if radius == 3.0));
    }

    #[test]
    fn take_drains() {
        let mut s = RecordingSurface::new(10, 10);
        s.clear();
        assert_eq!(s.take().len(), 1);
        assert!(s.commands().is_empty());
    }

    #[test]
    fn describe_lists_commands() {
        let mut s = RecordingSurface::new(64, 32);
        s.clear();
        s.fill_text("O", DVec2::new(5.0, 6.0), 12.0, Rgba::WHITE);
        let text = s.describe();
        assert!(text.contains("Frame 64x32 (2 commands)"));
        assert!(text.contains("text \"O\" (5.0, 6.0) size=12.0 #FFFFFF"));
    }

    #[test]
    fn describe_last_frame_starts_at_last_clear() {
        let mut s = RecordingSurface::new(8, 8);
        s.clear();
        s.fill_disc(DVec2::ZERO, 1.0, Rgba::BLACK);
        s.clear();
        s.fill_text("H", DVec2::ZERO, 10.0, Rgba::WHITE);
        let text = s.describe_last_frame();
        assert!(text.contains("(2 commands)"));
        assert!(!text.contains("disc"));
        assert_eq!(text.lines().nth(1), Some("clear"));
        assert_eq!(s.commands().len(), 4);
    }
}
