//! Element appearance lookup: display color, display radius, label color.
//!
//! Pure functions. Unknown symbols fall back to defaults instead of failing.

use ballstick_common::Rgba;

/// Pixels per unit of table radius, before zoom and perspective.
pub const RADIUS_SCALE: f64 = 30.0;
/// Table radius used for unknown elements.
pub const DEFAULT_RADIUS: f64 = 0.7;
/// Color used for unknown elements.
pub const DEFAULT_COLOR: Rgba = Rgba::rgb(0x80, 0x80, 0x80);

/// Elements whose luminance is above this get a dark label.
const LIGHT_LUMINANCE: f64 = 0.6;
const DARK_LABEL: Rgba = Rgba::rgb(0x22, 0x22, 0x22);
const LIGHT_LABEL: Rgba = Rgba::WHITE;

/// (symbol, CPK color, covalent-style radius)
const ELEMENTS: &[(&str, Rgba, f64)] = &[
    ("H", Rgba::rgb(0xFF, 0xFF, 0xFF), 0.31),
    ("He", Rgba::rgb(0xD9, 0xFF, 0xFF), 0.28),
    ("Li", Rgba::rgb(0xCC, 0x80, 0xFF), 1.28),
    ("B", Rgba::rgb(0xFF, 0xB5, 0xB5), 0.84),
    ("C", Rgba::rgb(0x90, 0x90, 0x90), 0.76),
    ("N", Rgba::rgb(0x30, 0x50, 0xF8), 0.71),
    ("O", Rgba::rgb(0xFF, 0x0D, 0x0D), 0.66),
    ("F", Rgba::rgb(0x90, 0xE0, 0x50), 0.57),
    ("Na", Rgba::rgb(0xAB, 0x5C, 0xF2), 1.66),
    ("Mg", Rgba::rgb(0x8A, 0xFF, 0x00), 1.41),
    ("Al", Rgba::rgb(0xBF, 0xA6, 0xA6), 1.21),
    ("Si", Rgba::rgb(0xF0, 0xC8, 0xA0), 1.11),
    ("P", Rgba::rgb(0xFF, 0x80, 0x00), 1.07),
    ("S", Rgba::rgb(0xFF, 0xFF, 0x30), 1.05),
    ("Cl", Rgba::rgb(0x1F, 0xF0, 0x1F), 1.02),
    ("K", Rgba::rgb(0x8F, 0x40, 0xD4), 2.03),
    ("Ca", Rgba::rgb(0x3D, 0xFF, 0x00), 1.76),
    ("Fe", Rgba::rgb(0xE0, 0x66, 0x33), 1.32),
    ("Cu", Rgba::rgb(0xC8, 0x80, 0x33), 1.32),
    ("Zn", Rgba::rgb(0x7D, 0x80, 0xB0), 1.22),
    ("Br", Rgba::rgb(0xA6, 0x29, 0x29), 1.20),
    ("I", Rgba::rgb(0x94, 0x00, 0x94), 1.39),
];

fn lookup(symbol: &str) -> Option<&'static (&'static str, Rgba, f64)> {
    ELEMENTS.iter().find(|(s, _, _)| *s == symbol)
}

pub fn element_color(symbol: &str) -> Rgba {
    lookup(symbol).map_or(DEFAULT_COLOR, |(_, color, _)| *color)
}

/// Display radius in pixels at zoom 1 and depth 0.
pub fn element_radius(symbol: &str) -> f64 {
    lookup(symbol).map_or(DEFAULT_RADIUS, |(_, _, r)| *r) * RADIUS_SCALE
}

/// Dark text on light elements (hydrogen), light text otherwise.
pub fn label_color(symbol: &str) -> Rgba {
    if element_color(symbol).luminance() > LIGHT_LUMINANCE {
        DARK_LABEL
    } else {
        LIGHT_LABEL
    }
}
