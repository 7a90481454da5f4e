use crate::appearance::{element_color, element_radius, label_color};
use crate::surface::Surface;
use ballstick_camera::{Camera, ProjectedPoint};
use ballstick_common::Rgba;
use ballstick_scene::Scene;
use glam::DVec2;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;

/// Colors and sizes used by the pipeline. Missing fields take the defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderStyle {
    pub background_top: Rgba,
    pub background_bottom: Rgba,
    pub bond_color: Rgba,
    /// Stroke width contributed by each unit of bond order.
    pub bond_width_per_order: f64,
    pub shadow_offset: DVec2,
    pub shadow_color: Rgba,
    pub outline_color: Rgba,
    pub outline_width: f64,
    /// How far the disc center is lightened toward white, in `[0, 1]`.
    pub highlight: f64,
    /// Label size as a fraction of the disc radius.
    pub label_scale: f64,
    pub min_label_size: f64,
}

impl Default for RenderStyle {
    fn default() -> Self {
        Self {
            background_top: Rgba::rgb(0xF5, 0xF7, 0xFA),
            background_bottom: Rgba::rgb(0xC3, 0xCF, 0xE2),
            bond_color: Rgba::rgb(0x55, 0x55, 0x55),
            bond_width_per_order: 3.0,
            shadow_offset: DVec2::new(3.0, 3.0),
            shadow_color: Rgba::new(0, 0, 0, 0x40),
            outline_color: Rgba::new(0, 0, 0, 0x66),
            outline_width: 1.0,
            highlight: 0.5,
            label_scale: 0.6,
            min_label_size: 10.0,
        }
    }
}

/// Paint order between bonds and atoms.
///
/// Only one policy exists: every bond is painted, in scene order, before any
/// atom. Bonds are never depth sorted, so a bond behind an atom may still
/// show through a nearer bond's atom gap. That is accepted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaintOrder {
    #[default]
    BondsUnderAtoms,
}

/// Counters for one rendered frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub atoms_drawn: usize,
    /// Atoms whose projected radius was not a finite positive number, i.e.
    /// at or behind the perspective singularity.
    pub atoms_culled: usize,
    pub bonds_drawn: usize,
    /// Bonds with an endpoint that is missing or culled.
    pub bonds_skipped: usize,
}

impl fmt::Display for FrameStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Frame: atoms={} (culled {}) bonds={} (skipped {})",
            self.atoms_drawn, self.atoms_culled, self.bonds_drawn, self.bonds_skipped
        )
    }
}

/// An atom's projection plus what is needed to paint it.
#[derive(Debug, Clone)]
struct ProjectedAtom<'a> {
    element: &'a str,
    original_index: usize,
    point: ProjectedPoint,
    /// Disc radius in pixels.
    radius: f64,
}

impl ProjectedAtom<'_> {
    /// False at or behind the perspective singularity, where the radius is
    /// infinite or negative and the screen position is mirrored.
    fn is_drawable(&self) -> bool {
        self.radius.is_finite() && self.radius > 0.0 && self.point.screen().is_finite()
    }
}

/// Ascending depth, NaN last. Stable sorting with this keeps scene order
/// for equal depths.
fn by_depth(a: &ProjectedAtom<'_>, b: &ProjectedAtom<'_>) -> Ordering {
    let (da, db) = (a.point.depth, b.point.depth);
    match (da.is_nan(), db.is_nan()) {
        (false, false) => da.partial_cmp(&db).unwrap_or(Ordering::Equal),
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
    }
}

/// Draws a scene through a camera onto any [`Surface`].
///
/// Stateless between frames: every call projects from scratch.
#[derive(Debug, Clone, Default)]
pub struct RenderPipeline {
    style: RenderStyle,
    order: PaintOrder,
}

impl RenderPipeline {
    pub fn new(style: RenderStyle) -> Self {
        Self {
            style,
            order: PaintOrder::default(),
        }
    }

    pub fn style(&self) -> &RenderStyle {
        &self.style
    }

    pub fn paint_order(&self) -> PaintOrder {
        self.order
    }

    /// Render one frame.
    ///
    /// Clears, paints the background, projects and depth sorts the atoms,
    /// then paints according to [`PaintOrder`]. An empty scene leaves only
    /// the background.
    pub fn render<S: Surface + ?Sized>(
        &self,
        surface: &mut S,
        scene: &Scene,
        camera: &Camera,
    ) -> FrameStats {
        let _span = tracing::info_span!(
            "render",
            atoms = scene.atom_count(),
            bonds = scene.bond_count()
        )
        .entered();

        let mut stats = FrameStats::default();
        let width = surface.width() as f64;
        let height = surface.height() as f64;

        surface.clear();
        surface.fill_vertical_gradient(self.style.background_top, self.style.background_bottom);

        let mut projected: Vec<ProjectedAtom<'_>> = scene
            .atoms()
            .iter()
            .map(|atom| {
                let point = camera.project(atom.position(), width, height);
                ProjectedAtom {
                    element: &atom.element,
                    original_index: atom.original_index,
                    radius: element_radius(&atom.element) * camera.zoom() * point.scale,
                    point,
                }
            })
            .collect();
        projected.sort_by(by_depth);

        match self.order {
            PaintOrder::BondsUnderAtoms => {
                self.draw_bonds(surface, scene, &projected, &mut stats);
                for atom in &projected {
                    self.draw_atom(surface, atom, &mut stats);
                }
            }
        }

        tracing::trace!(%stats, "frame rendered");
        stats
    }

    fn draw_bonds<S: Surface + ?Sized>(
        &self,
        surface: &mut S,
        scene: &Scene,
        projected: &[ProjectedAtom<'_>],
        stats: &mut FrameStats,
    ) {
        // Culled atoms are left out, so their bonds are skipped too.
        let positions: HashMap<usize, DVec2> = projected
            .iter()
            .filter(|a| a.is_drawable())
            .map(|a| (a.original_index, a.point.screen()))
            .collect();

        for bond in scene.bonds() {
            match positions.get(&bond.from).zip(positions.get(&bond.to)) {
                Some((&from, &to)) => {
                    let width = bond.order as f64 * self.style.bond_width_per_order;
                    surface.stroke_line(from, to, width, self.style.bond_color);
                    stats.bonds_drawn += 1;
                }
                _ => stats.bonds_skipped += 1,
            }
        }
    }

    fn draw_atom<S: Surface + ?Sized>(
        &self,
        surface: &mut S,
        atom: &ProjectedAtom<'_>,
        stats: &mut FrameStats,
    ) {
        if !atom.is_drawable() {
            stats.atoms_culled += 1;
            return;
        }
        let (center, radius) = (atom.point.screen(), atom.radius);

        let base = element_color(atom.element);
        let style = &self.style;
        surface.fill_disc(center + style.shadow_offset, radius, style.shadow_color);
        surface.fill_radial_disc(center, radius, base.lighten(style.highlight), base);
        surface.stroke_circle(center, radius, style.outline_width, style.outline_color);

        let size = (radius * style.label_scale).max(style.min_label_size);
        surface.fill_text(atom.element, center, size, label_color(atom.element));
        stats.atoms_drawn += 1;
    }
}
