use glam::{DVec2, DVec3};
use serde::{Deserialize, Serialize};
use std::f64::consts::FRAC_PI_2;
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_ROTATION_X: f64 = 0.5;
pub const DEFAULT_ROTATION_Y: f64 = 0.5;
pub const DEFAULT_ZOOM: f64 = 1.0;
pub const MIN_ZOOM: f64 = 0.1;
pub const MAX_ZOOM: f64 = 5.0;
/// Focal distance of the perspective divide, in molecule units.
pub const PERSPECTIVE: f64 = 5.0;
/// Pixels per molecule unit at zoom 1 and depth 0.
pub const BASE_SCALE: f64 = 100.0;

/// A point after projection onto the surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectedPoint {
    pub screen_x: f64,
    pub screen_y: f64,
    /// Post-rotation, pre-projection z. Paint order only.
    pub depth: f64,
    /// Perspective factor `PERSPECTIVE / (PERSPECTIVE + depth)`.
    pub scale: f64,
}

impl ProjectedPoint {
    pub fn screen(&self) -> DVec2 {
        DVec2::new(self.screen_x, self.screen_y)
    }
}

/// A preset rotation pair selectable by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NamedView {
    Front,
    Top,
    Side,
    Iso,
}

impl NamedView {
    pub const ALL: [NamedView; 4] = [Self::Front, Self::Top, Self::Side, Self::Iso];

    /// `(rotation_x, rotation_y)` for this view.
    pub fn rotation(self) -> (f64, f64) {
        match self {
            Self::Front => (0.0, 0.0),
            Self::Top => (FRAC_PI_2, 0.0),
            Self::Side => (0.0, FRAC_PI_2),
            Self::Iso => (DEFAULT_ROTATION_X, DEFAULT_ROTATION_Y),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Front => "front",
            Self::Top => "top",
            Self::Side => "side",
            Self::Iso => "iso",
        }
    }
}

impl fmt::Display for NamedView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown view {0:?} (expected front, top, side or iso)")]
pub struct UnknownViewError(pub String);

impl FromStr for NamedView {
    type Err = UnknownViewError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|v| v.name() == s)
            .ok_or_else(|| UnknownViewError(s.to_string()))
    }
}

/// Rotation/zoom camera.
///
/// Lives as long as the surface it drives. Mutated only through the methods
/// below, all of which keep zoom clamped.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "CameraRecord")]
pub struct Camera {
    rotation_x: f64,
    rotation_y: f64,
    zoom: f64,
}

#[derive(Deserialize)]
struct CameraRecord {
    rotation_x: f64,
    rotation_y: f64,
    zoom: f64,
}

impl From<CameraRecord> for Camera {
    fn from(r: CameraRecord) -> Self {
        let mut camera = Camera::default();
        camera.set_rotation(r.rotation_x, r.rotation_y);
        camera.set_zoom(r.zoom);
        camera
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            rotation_x: DEFAULT_ROTATION_X,
            rotation_y: DEFAULT_ROTATION_Y,
            zoom: DEFAULT_ZOOM,
        }
    }
}

impl Camera {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rotation_x(&self) -> f64 {
        self.rotation_x
    }

    pub fn rotation_y(&self) -> f64 {
        self.rotation_y
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn set_rotation(&mut self, x: f64, y: f64) {
        self.rotation_x = x;
        self.rotation_y = y;
    }

    pub fn rotate_by(&mut self, dx: f64, dy: f64) {
        self.rotation_x += dx;
        self.rotation_y += dy;
    }

    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
    }

    pub fn zoom_by(&mut self, factor: f64) {
        self.set_zoom(self.zoom * factor);
    }

    /// Restore default rotation and zoom.
    pub fn reset(&mut self) {
        *self = Self::default();
        tracing::debug!("camera reset");
    }

    pub fn apply_view(&mut self, view: NamedView) {
        let (x, y) = view.rotation();
        self.set_rotation(x, y);
        tracing::debug!(%view, "named view applied");
    }

    /// Apply a view by name. Unknown names leave the camera unchanged and
    /// return `false`.
    pub fn set_named_view(&mut self, name: &str) -> bool {
        match name.parse::<NamedView>() {
            Ok(view) => {
                self.apply_view(view);
                true
            }
            Err(e) => {
                tracing::debug!("{e}, camera unchanged");
                false
            }
        }
    }

    /// Project a molecule-space point onto a `width` x `height` surface.
    ///
    /// Rotates around the vertical axis by `rotation_y`, then around the
    /// horizontal axis by `rotation_x`, then applies the perspective divide.
    /// Screen y grows downward.
    pub fn project(&self, point: DVec3, width: f64, height: f64) -> ProjectedPoint {
        let (sin_y, cos_y) = self.rotation_y.sin_cos();
        let x1 = point.x * cos_y - point.z * sin_y;
        let z1 = point.x * sin_y + point.z * cos_y;

        let (sin_x, cos_x) = self.rotation_x.sin_cos();
        let y1 = point.y * cos_x - z1 * sin_x;
        let z2 = point.y * sin_x + z1 * cos_x;

        let scale = PERSPECTIVE / (PERSPECTIVE + z2);
        let pixels = BASE_SCALE * self.zoom * scale;

        ProjectedPoint {
            screen_x: width / 2.0 + x1 * pixels,
            screen_y: height / 2.0 - y1 * pixels,
            depth: z2,
            scale,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn front_camera() -> Camera {
        let mut cam = Camera::new();
        cam.set_rotation(0.0, 0.0);
        cam
    }

    #[test]
    fn default_camera() {
        let cam = Camera::default();
        assert_eq!(cam.rotation_x(), 0.5);
        assert_eq!(cam.rotation_y(), 0.5);
        assert_eq!(cam.zoom(), 1.0);
    }

    #[test]
    fn origin_projects_to_surface_center() {
        let p = front_camera().project(DVec3::ZERO, 800.0, 600.0);
        assert_eq!(p.screen_x, 400.0);
        assert_eq!(p.screen_y, 300.0);
        assert_eq!(p.depth, 0.0);
        assert_eq!(p.scale, 1.0);
    }

    #[test]
    fn unit_x_lands_base_scale_pixels_right() {
        let p = front_camera().project(DVec3::X, 800.0, 600.0);
        assert!((p.screen_x - 500.0).abs() < EPS);
        assert!((p.screen_y - 300.0).abs() < EPS);
    }

    #[test]
    fn screen_y_grows_downward() {
        let p = front_camera().project(DVec3::Y, 800.0, 600.0);
        assert!((p.screen_y - 200.0).abs() < EPS);
    }

    #[test]
    fn positive_depth_shrinks_toward_center() {
        let cam = front_camera();
        let p = cam.project(DVec3::new(1.0, 0.0, 5.0), 800.0, 600.0);
        assert_eq!(p.depth, 5.0);
        assert!((p.scale - 0.5).abs() < EPS);
        assert!((p.screen_x - 450.0).abs() < EPS);
    }

    #[test]
    fn quarter_turn_around_vertical_moves_x_into_depth() {
        let mut cam = front_camera();
        cam.set_rotation(0.0, FRAC_PI_2);
        let p = cam.project(DVec3::X, 800.0, 600.0);
        assert!((p.depth - 1.0).abs() < EPS);
        assert!((p.screen_x - 400.0).abs() < 1e-6);
    }

    #[test]
    fn zoom_scales_offsets() {
        let mut cam = front_camera();
        cam.set_zoom(2.0);
        let p = cam.project(DVec3::X, 800.0, 600.0);
        assert!((p.screen_x - 600.0).abs() < EPS);
    }

    #[test]
    fn singular_depth_is_not_guarded() {
        let cam = front_camera();
        let p = cam.project(DVec3::new(1.0, 0.0, -PERSPECTIVE), 800.0, 600.0);
        assert!(p.scale.is_infinite());
        assert!(!p.screen_x.is_finite());
    }

    #[test]
    fn zoom_stays_clamped() {
        let mut cam = Camera::new();
        for _ in 0..200 {
            cam.zoom_by(1.1);
        }
        assert_eq!(cam.zoom(), MAX_ZOOM);
        for _ in 0..200 {
            cam.zoom_by(0.9);
        }
        assert_eq!(cam.zoom(), MIN_ZOOM);
        cam.set_zoom(1e9);
        assert_eq!(cam.zoom(), MAX_ZOOM);
        cam.zoom_by(-3.0);
        assert_eq!(cam.zoom(), MIN_ZOOM);
    }

    #[test]
    fn reset_restores_defaults() {
        let mut cam = Camera::new();
        cam.rotate_by(3.0, -7.0);
        cam.set_zoom(4.2);
        cam.reset();
        assert_eq!(cam, Camera::default());
    }

    #[test]
    fn named_views() {
        let mut cam = Camera::new();
        assert!(cam.set_named_view("top"));
        assert_eq!((cam.rotation_x(), cam.rotation_y()), (FRAC_PI_2, 0.0));
        assert!(cam.set_named_view("side"));
        assert_eq!((cam.rotation_x(), cam.rotation_y()), (0.0, FRAC_PI_2));
        assert!(cam.set_named_view("front"));
        assert_eq!((cam.rotation_x(), cam.rotation_y()), (0.0, 0.0));
        assert!(cam.set_named_view("iso"));
        assert_eq!((cam.rotation_x(), cam.rotation_y()), (0.5, 0.5));
    }

    #[test]
    fn unknown_view_is_a_noop() {
        let mut cam = Camera::new();
        cam.rotate_by(0.25, 0.75);
        let before = cam;
        assert!(!cam.set_named_view("bogus"));
        assert_eq!(cam, before);
    }

    #[test]
    fn named_view_parse_error_names_input() {
        let err = "Top".parse::<NamedView>().unwrap_err();
        assert_eq!(err, UnknownViewError("Top".into()));
    }

    #[test]
    fn named_view_views_leave_zoom_alone() {
        let mut cam = Camera::new();
        cam.set_zoom(3.0);
        cam.apply_view(NamedView::Top);
        assert_eq!(cam.zoom(), 3.0);
    }

    #[test]
    fn deserialization_clamps_zoom() {
        let cam: Camera =
            serde_json::from_str(r#"{"rotation_x":1.0,"rotation_y":2.0,"zoom":50.0}"#).unwrap();
        assert_eq!(cam.zoom(), MAX_ZOOM);
        assert_eq!(cam.rotation_y(), 2.0);
        let json = serde_json::to_string(&cam).unwrap();
        assert!(json.contains("\"zoom\":5.0"));
    }
}
