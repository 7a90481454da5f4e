use crate::config::ViewerConfig;
use ballstick_camera::Camera;
use ballstick_common::{Molecule, VisibilityMask};
use ballstick_input::{Command, EventResponse, InputEvent, InteractionController};
use ballstick_persist::SavedView;
use ballstick_render::{FrameStats, RasterSurface, RenderPipeline, Surface};
use ballstick_scene::Scene;

/// One interactive view of one molecule on one surface.
///
/// Owns its camera, scene, controller and surface outright. Any number of
/// viewers can coexist.
#[derive(Debug)]
pub struct Viewer<S: Surface> {
    surface: S,
    scene: Scene,
    camera: Camera,
    controller: InteractionController,
    pipeline: RenderPipeline,
    molecule: Option<Molecule>,
    visibility: VisibilityMask,
    frames: u64,
    last_frame: FrameStats,
}

impl Viewer<RasterSurface> {
    /// A viewer over a fresh raster surface sized by `config`.
    pub fn raster(config: &ViewerConfig) -> Self {
        Self::new(RasterSurface::new(config.width, config.height), config)
    }
}

impl<S: Surface> Viewer<S> {
    /// Wrap `surface`. Nothing is drawn until the first molecule load or
    /// explicit render.
    pub fn new(surface: S, config: &ViewerConfig) -> Self {
        Self {
            surface,
            scene: Scene::new(),
            camera: Camera::new(),
            controller: InteractionController::new(),
            pipeline: RenderPipeline::new(config.style.clone()),
            molecule: None,
            visibility: VisibilityMask::all_visible(),
            frames: 0,
            last_frame: FrameStats::default(),
        }
    }

    /// Replace the molecule and mask, rebuild the scene and render once.
    pub fn set_molecule(&mut self, molecule: Option<&Molecule>, mask: &VisibilityMask) -> FrameStats {
        self.molecule = molecule.cloned();
        self.visibility = mask.clone();
        self.reload()
    }

    /// Change the mask for the current molecule. The scene is rebuilt from
    /// scratch.
    pub fn set_visibility(&mut self, mask: &VisibilityMask) -> FrameStats {
        self.visibility = mask.clone();
        self.reload()
    }

    /// Drop the molecule and render the empty background.
    pub fn clear(&mut self) -> FrameStats {
        self.molecule = None;
        self.scene.clear();
        self.render()
    }

    fn reload(&mut self) -> FrameStats {
        self.scene
            .load_molecule(self.molecule.as_ref(), &self.visibility);
        if self.scene.is_empty() {
            tracing::debug!("scene is empty after load");
        }
        self.render()
    }

    /// Feed a pointer or wheel event. Renders when the camera changed.
    pub fn handle_event(&mut self, event: InputEvent) -> EventResponse {
        let response = self.controller.handle_event(&mut self.camera, event);
        self.apply(response)
    }

    /// Run a UI command. Renders when the camera changed.
    pub fn handle_command(&mut self, command: &Command) -> EventResponse {
        let response = self.controller.handle_command(&mut self.camera, command);
        self.apply(response)
    }

    /// Deliver a scheduled spin tick. A tick that finds spinning stopped
    /// neither renders nor asks to be rescheduled.
    pub fn tick(&mut self) -> EventResponse {
        let response = self.controller.tick(&mut self.camera);
        self.apply(response)
    }

    fn apply(&mut self, response: EventResponse) -> EventResponse {
        if response.redraw {
            self.render();
        }
        response
    }

    /// Draw one frame of the current scene.
    pub fn render(&mut self) -> FrameStats {
        self.last_frame = self
            .pipeline
            .render(&mut self.surface, &self.scene, &self.camera);
        self.frames += 1;
        self.last_frame
    }

    /// Replace the camera wholesale and render.
    pub fn set_camera(&mut self, camera: Camera) -> FrameStats {
        self.camera = camera;
        self.render()
    }

    /// Capture the current camera and mask under `name`.
    pub fn save_view(&self, name: impl Into<String>) -> SavedView {
        SavedView::new(
            name,
            self.molecule.as_ref().map(|m| m.id.clone()),
            self.camera,
            self.visibility.clone(),
        )
    }

    /// Restore a saved camera and mask. The molecule is not looked up here;
    /// callers load `view.molecule_id` themselves if it differs.
    pub fn restore_view(&mut self, view: &SavedView) -> FrameStats {
        tracing::debug!(name = %view.name, "restoring view");
        self.camera = view.camera;
        self.set_visibility(&view.visibility)
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn controller(&self) -> &InteractionController {
        &self.controller
    }

    pub fn molecule(&self) -> Option<&Molecule> {
        self.molecule.as_ref()
    }

    pub fn visibility(&self) -> &VisibilityMask {
        &self.visibility
    }

    pub fn is_spinning(&self) -> bool {
        self.controller.is_spinning()
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn into_surface(self) -> S {
        self.surface
    }

    /// Frames rendered since construction.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn last_frame(&self) -> FrameStats {
        self.last_frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ballstick_camera::{DEFAULT_ROTATION_X, DEFAULT_ROTATION_Y, MAX_ZOOM, MIN_ZOOM};
    use ballstick_render::{DrawCommand, RecordingSurface};
    use std::f64::consts::FRAC_PI_2;

    const EPS: f64 = 1e-9;

    fn water() -> Molecule {
        Molecule::new("water", "Water", "H2O")
            .with_atom("O", 0.0, 0.0, 0.0)
            .with_atom("H", 0.96, 0.0, 0.0)
            .with_atom("H", -0.24, 0.93, 0.0)
            .with_bond(0, 1, 1)
            .with_bond(0, 2, 1)
    }

    fn viewer() -> Viewer<RecordingSurface> {
        Viewer::new(RecordingSurface::new(800, 600), &ViewerConfig::default())
    }

    #[test]
    fn set_molecule_loads_and_renders() {
        let mut v = viewer();
        let stats = v.set_molecule(Some(&water()), &VisibilityMask::all_visible());
        assert_eq!(stats.atoms_drawn, 3);
        assert_eq!(stats.bonds_drawn, 2);
        assert_eq!(v.frames(), 1);
        assert_eq!(v.scene().atom_count(), 3);
    }

    #[test]
    fn hiding_hydrogen_leaves_lone_oxygen() {
        let mut v = viewer();
        v.set_molecule(Some(&water()), &VisibilityMask::all_visible());
        let mut mask = VisibilityMask::all_visible();
        mask.hide("H");
        let stats = v.set_visibility(&mask);
        assert_eq!(v.scene().atom_count(), 1);
        assert_eq!(v.scene().bond_count(), 0);
        assert_eq!(stats.atoms_drawn, 1);
        assert_eq!(v.scene().atoms()[0].element, "O");
    }

    #[test]
    fn absent_molecule_renders_background_only() {
        let mut v = viewer();
        v.set_molecule(Some(&water()), &VisibilityMask::all_visible());
        v.surface_mut().take();
        v.set_molecule(None, &VisibilityMask::all_visible());
        assert!(v.scene().is_empty());
        assert_eq!(v.scene().bond_count(), 0);
        assert_eq!(v.surface().commands().len(), 2);
    }

    #[test]
    fn drag_rotates_and_redraws() {
        let mut v = viewer();
        v.set_molecule(Some(&water()), &VisibilityMask::all_visible());
        v.handle_event(InputEvent::PointerDown { x: 100.0, y: 100.0 });
        let r = v.handle_event(InputEvent::PointerMove { x: 200.0, y: 100.0 });
        v.handle_event(InputEvent::PointerUp);

        assert!(r.redraw);
        assert!((v.camera().rotation_y() - (DEFAULT_ROTATION_Y + 1.0)).abs() < EPS);
        assert_eq!(v.camera().rotation_x(), DEFAULT_ROTATION_X);
        assert_eq!(v.frames(), 2);
    }

    #[test]
    fn wheel_is_clamped_and_suppresses_scroll() {
        let mut v = viewer();
        for _ in 0..100 {
            let r = v.handle_event(InputEvent::Wheel { delta: -120.0 });
            assert!(r.prevent_default);
        }
        assert_eq!(v.camera().zoom(), MAX_ZOOM);
        for _ in 0..100 {
            v.handle_event(InputEvent::Wheel { delta: 120.0 });
        }
        assert_eq!(v.camera().zoom(), MIN_ZOOM);
    }

    #[test]
    fn named_views_and_reset() {
        let mut v = viewer();
        v.handle_command(&Command::SetView("top".into()));
        assert_eq!(v.camera().rotation_x(), FRAC_PI_2);
        assert_eq!(v.camera().rotation_y(), 0.0);

        let frames = v.frames();
        let r = v.handle_command(&Command::SetView("bogus".into()));
        assert!(!r.redraw);
        assert_eq!(v.frames(), frames);
        assert_eq!(v.camera().rotation_x(), FRAC_PI_2);

        v.handle_command(&Command::ZoomIn);
        v.handle_command(&Command::ResetView);
        assert_eq!(*v.camera(), Camera::default());
    }

    #[test]
    fn spin_ticks_render_until_stopped() {
        let mut v = viewer();
        let start = v.handle_command(&Command::ToggleSpin);
        assert!(start.schedule_tick);

        let r = v.tick();
        assert!(r.redraw && r.schedule_tick);
        assert_eq!(v.frames(), 1);

        v.handle_command(&Command::ToggleSpin);
        let r = v.tick();
        assert_eq!(r, EventResponse::NONE);
        assert_eq!(v.frames(), 1);
    }

    #[test]
    fn drag_start_stops_spin() {
        let mut v = viewer();
        v.handle_command(&Command::ToggleSpin);
        v.handle_event(InputEvent::PointerDown { x: 0.0, y: 0.0 });
        assert!(!v.is_spinning());
        let y = v.camera().rotation_y();
        v.tick();
        assert_eq!(v.camera().rotation_y(), y);
    }

    #[test]
    fn viewers_are_independent() {
        let mut a = viewer();
        let mut b = viewer();
        a.set_molecule(Some(&water()), &VisibilityMask::all_visible());
        a.handle_command(&Command::ZoomIn);
        assert_eq!(b.camera().zoom(), 1.0);
        assert!(b.scene().is_empty());
        b.render();
        assert_eq!(b.frames(), 1);
        assert_eq!(a.frames(), 2);
    }

    #[test]
    fn save_and_restore_view() {
        let mut v = viewer();
        let mut mask = VisibilityMask::all_visible();
        mask.hide("H");
        v.set_molecule(Some(&water()), &mask);
        v.handle_command(&Command::SetView("side".into()));
        let saved = v.save_view("side-heavy");
        assert_eq!(saved.molecule_id.as_deref(), Some("water"));

        v.handle_command(&Command::ResetView);
        v.set_visibility(&VisibilityMask::all_visible());
        assert_eq!(v.scene().atom_count(), 3);

        v.restore_view(&saved);
        assert_eq!(v.camera().rotation_y(), FRAC_PI_2);
        assert_eq!(v.scene().atom_count(), 1);
    }

    #[test]
    fn raster_viewer_paints_pixels() {
        let config = ViewerConfig::default().with_size(120, 90).unwrap();
        let mut v = Viewer::raster(&config);
        v.set_molecule(Some(&water()), &VisibilityMask::all_visible());
        let corner = v.surface().pixel(0, 0).unwrap();
        assert_eq!(corner, config.style.background_top);
        assert!(
            v.into_surface()
                .image()
                .pixels()
                .any(|p| p[0] > 200 && p[1] < 60 && p[2] < 60)
        );
    }

    #[test]
    fn every_redraw_starts_with_clear() {
        let mut v = viewer();
        v.set_molecule(Some(&water()), &VisibilityMask::all_visible());
        v.handle_command(&Command::ZoomOut);
        let clears = v
            .surface()
            .commands()
            .iter()
            .filter(|c| matches!(c, DrawCommand::Clear))
            .count();
        assert_eq!(clears as u64, v.frames());
    }
}
