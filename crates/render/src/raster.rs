use crate::font;
use crate::surface::Surface;
use ballstick_common::Rgba;
use glam::DVec2;
use image::{ImageFormat, RgbaImage};
use std::io::Cursor;
use std::path::Path;

/// Errors from exporting a raster surface.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("image encoding error: {0}")]
    Image(#[from] image::ImageError),
}

/// Software rasterizer over an RGBA pixel buffer.
///
/// Shapes are anti-aliased by per-pixel coverage against the pixel center and
/// composited with source-over alpha blending.
#[derive(Debug, Clone)]
pub struct RasterSurface {
    image: RgbaImage,
}

impl RasterSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: RgbaImage::new(width, height),
        }
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }

    /// Color at a pixel, or `None` outside the surface.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        self.image
            .get_pixel_checked(x, y)
            .map(|p| Rgba::new(p[0], p[1], p[2], p[3]))
    }

    pub fn save_png(&self, path: impl AsRef<Path>) -> Result<(), RenderError> {
        self.image.save_with_format(path, ImageFormat::Png)?;
        Ok(())
    }

    pub fn encode_png(&self) -> Result<Vec<u8>, RenderError> {
        let mut cursor = Cursor::new(Vec::new());
        self.image.write_to(&mut cursor, ImageFormat::Png)?;
        Ok(cursor.into_inner())
    }

    /// Source-over blend of `color` scaled by `coverage` into one pixel.
    fn blend(&mut self, x: u32, y: u32, color: Rgba, coverage: f64) {
        let alpha = color.a as f64 / 255.0 * coverage.clamp(0.0, 1.0);
        if alpha <= 0.0 {
            return;
        }
        let dst = self.image.get_pixel_mut(x, y);
        let dst_alpha = dst[3] as f64 / 255.0;
        let out_alpha = alpha + dst_alpha * (1.0 - alpha);
        if out_alpha <= 0.0 {
            return;
        }
        let mix = |src: u8, dst: u8| {
            let v = (src as f64 * alpha + dst as f64 * dst_alpha * (1.0 - alpha)) / out_alpha;
            v.round().clamp(0.0, 255.0) as u8
        };
        dst[0] = mix(color.r, dst[0]);
        dst[1] = mix(color.g, dst[1]);
        dst[2] = mix(color.b, dst[2]);
        dst[3] = (out_alpha * 255.0).round() as u8;
    }

    /// Pixel rows and columns overlapping `[min, max]`, clipped to the surface.
    fn pixel_bounds(&self, min: DVec2, max: DVec2) -> Option<(u32, u32, u32, u32)> {
        if !min.is_finite() || !max.is_finite() {
            return None;
        }
        let w = self.image.width() as f64;
        let h = self.image.height() as f64;
        let x0 = min.x.floor().max(0.0);
        let y0 = min.y.floor().max(0.0);
        let x1 = max.x.ceil().min(w);
        let y1 = max.y.ceil().min(h);
        if x0 >= x1 || y0 >= y1 {
            return None;
        }
        Some((x0 as u32, y0 as u32, x1 as u32, y1 as u32))
    }

    /// Run `shade` for every pixel whose center lies near the given box.
    /// `shade` returns a coverage and color for that center, or `None`.
    fn shade_region<F>(&mut self, min: DVec2, max: DVec2, mut shade: F)
    where
        F: FnMut(DVec2) -> Option<(f64, Rgba)>,
    {
        let Some((x0, y0, x1, y1)) = self.pixel_bounds(min, max) else {
            return;
        };
        for y in y0..y1 {
            for x in x0..x1 {
                let p = DVec2::new(x as f64 + 0.5, y as f64 + 0.5);
                if let Some((coverage, color)) = shade(p) {
                    self.blend(x, y, color, coverage);
                }
            }
        }
    }

    /// Fill an axis-aligned rectangle with area-weighted edge coverage.
    fn fill_rect(&mut self, origin: DVec2, size: DVec2, color: Rgba) {
        let end = origin + size;
        self.shade_region(origin, end, |p| {
            let overlap_x = (p.x + 0.5).min(end.x) - (p.x - 0.5).max(origin.x);
            let overlap_y = (p.y + 0.5).min(end.y) - (p.y - 0.5).max(origin.y);
            (overlap_x > 0.0 && overlap_y > 0.0).then_some((overlap_x * overlap_y, color))
        });
    }
}

/// False for zero, negative and NaN.
fn is_positive(v: f64) -> bool {
    v > 0.0
}

/// Coverage of a pixel center at signed distance `d` outside an edge.
fn edge_coverage(d: f64) -> f64 {
    (0.5 - d).clamp(0.0, 1.0)
}

fn distance_to_segment(p: DVec2, a: DVec2, b: DVec2) -> f64 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq == 0.0 {
        return p.distance(a);
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}

impl Surface for RasterSurface {
    fn width(&self) -> u32 {
        self.image.width()
    }

    fn height(&self) -> u32 {
        self.image.height()
    }

    fn clear(&mut self) {
        for p in self.image.pixels_mut() {
            *p = image::Rgba([0, 0, 0, 0]);
        }
    }

    fn fill_vertical_gradient(&mut self, top: Rgba, bottom: Rgba) {
        let h = self.image.height();
        let span = h.saturating_sub(1).max(1) as f64;
        for y in 0..h {
            let c = top.lerp(bottom, y as f64 / span);
            for x in 0..self.image.width() {
                self.blend(x, y, c, 1.0);
            }
        }
    }

    fn stroke_line(&mut self, from: DVec2, to: DVec2, width: f64, color: Rgba) {
        if !is_positive(width) {
            return;
        }
        let half = width / 2.0;
        let pad = DVec2::splat(half + 1.0);
        self.shade_region(from.min(to) - pad, from.max(to) + pad, |p| {
            let d = distance_to_segment(p, from, to) - half;
            let coverage = edge_coverage(d);
            (coverage > 0.0).then_some((coverage, color))
        });
    }

    fn fill_disc(&mut self, center: DVec2, radius: f64, color: Rgba) {
        if !is_positive(radius) {
            return;
        }
        let pad = DVec2::splat(radius + 1.0);
        self.shade_region(center - pad, center + pad, |p| {
            let coverage = edge_coverage(p.distance(center) - radius);
            (coverage > 0.0).then_some((coverage, color))
        });
    }

    fn fill_radial_disc(&mut self, center: DVec2, radius: f64, inner: Rgba, outer: Rgba) {
        if !is_positive(radius) {
            return;
        }
        let pad = DVec2::splat(radius + 1.0);
        self.shade_region(center - pad, center + pad, |p| {
            let d = p.distance(center);
            let coverage = edge_coverage(d - radius);
            (coverage > 0.0).then(|| (coverage, inner.lerp(outer, d / radius)))
        });
    }

    fn stroke_circle(&mut self, center: DVec2, radius: f64, width: f64, color: Rgba) {
        if !is_positive(radius) || !is_positive(width) {
            return;
        }
        let half = width / 2.0;
        let pad = DVec2::splat(radius + half + 1.0);
        self.shade_region(center - pad, center + pad, |p| {
            let coverage = edge_coverage((p.distance(center) - radius).abs() - half);
            (coverage > 0.0).then_some((coverage, color))
        });
    }

    fn fill_text(&mut self, text: &str, center: DVec2, size: f64, color: Rgba) {
        if !is_positive(size) || !center.is_finite() {
            return;
        }
        let cell = size / font::GLYPH_HEIGHT as f64;
        let extent = DVec2::new(
            font::text_cells(text) as f64 * cell,
            font::GLYPH_HEIGHT as f64 * cell,
        );
        let origin = center - extent / 2.0;
        for (i, ch) in text.chars().enumerate() {
            let glyph_x = origin.x + (i * font::ADVANCE) as f64 * cell;
            for (col, row) in font::lit_cells(ch) {
                let at = DVec2::new(glyph_x + col as f64 * cell, origin.y + row as f64 * cell);
                self.fill_rect(at, DVec2::splat(cell), color);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgba = Rgba::rgb(255, 0, 0);

    #[test]
    fn clear_makes_transparent() {
        let mut s = RasterSurface::new(4, 4);
        s.fill_vertical_gradient(Rgba::WHITE, Rgba::WHITE);
        s.clear();
        assert_eq!(s.pixel(2, 2), Some(Rgba::TRANSPARENT));
    }

    #[test]
    fn gradient_runs_top_to_bottom() {
        let mut s = RasterSurface::new(2, 11);
        s.fill_vertical_gradient(Rgba::BLACK, Rgba::WHITE);
        assert_eq!(s.pixel(0, 0), Some(Rgba::BLACK));
        assert_eq!(s.pixel(1, 10), Some(Rgba::WHITE));
        let mid = s.pixel(0, 5).unwrap();
        assert!(mid.r > 100 && mid.r < 160);
    }

    #[test]
    fn disc_covers_center_not_corners() {
        let mut s = RasterSurface::new(21, 21);
        s.fill_disc(DVec2::new(10.5, 10.5), 6.0, RED);
        assert_eq!(s.pixel(10, 10), Some(RED));
        assert_eq!(s.pixel(0, 0), Some(Rgba::TRANSPARENT));
    }

    #[test]
    fn radial_disc_is_lighter_in_the_middle() {
        let mut s = RasterSurface::new(41, 41);
        let outer = Rgba::rgb(100, 0, 0);
        s.fill_radial_disc(DVec2::new(20.5, 20.5), 18.0, Rgba::WHITE, outer);
        let center = s.pixel(20, 20).unwrap();
        let edge = s.pixel(20, 36).unwrap();
        assert!(center.g > edge.g);
        assert!(center.r >= edge.r);
    }

    #[test]
    fn line_is_drawn_between_endpoints() {
        let mut s = RasterSurface::new(20, 5);
        s.stroke_line(DVec2::new(2.0, 2.5), DVec2::new(18.0, 2.5), 2.0, RED);
        assert_eq!(s.pixel(10, 2), Some(RED));
        assert_eq!(s.pixel(10, 0), Some(Rgba::TRANSPARENT));
        assert_eq!(s.pixel(0, 2), Some(Rgba::TRANSPARENT));
    }

    #[test]
    fn circle_outline_leaves_inside_empty() {
        let mut s = RasterSurface::new(31, 31);
        s.stroke_circle(DVec2::new(15.5, 15.5), 10.0, 2.0, RED);
        assert_eq!(s.pixel(15, 15), Some(Rgba::TRANSPARENT));
        assert_eq!(s.pixel(25, 15), Some(RED));
    }

    #[test]
    fn shapes_are_clipped_at_edges() {
        let mut s = RasterSurface::new(10, 10);
        s.fill_disc(DVec2::new(-2.0, -2.0), 8.0, RED);
        s.stroke_line(DVec2::new(-100.0, 5.0), DVec2::new(100.0, 5.0), 1.0, RED);
        s.fill_disc(DVec2::new(f64::INFINITY, 0.0), 3.0, RED);
        s.fill_disc(DVec2::new(5.0, 5.0), -2.0, RED);
        assert_eq!(s.pixel(0, 0), Some(RED));
    }

    #[test]
    fn translucent_color_blends_over_background() {
        let mut s = RasterSurface::new(3, 3);
        s.fill_vertical_gradient(Rgba::WHITE, Rgba::WHITE);
        s.fill_disc(DVec2::new(1.5, 1.5), 5.0, Rgba::new(0, 0, 0, 128));
        let p = s.pixel(1, 1).unwrap();
        assert_eq!(p.a, 255);
        assert!(p.r > 120 && p.r < 135);
    }

    #[test]
    fn text_marks_pixels_near_center() {
        let mut s = RasterSurface::new(40, 40);
        s.fill_text("H", DVec2::new(20.0, 20.0), 14.0, Rgba::WHITE);
        // The crossbar of H passes through the center row.
        assert_eq!(s.pixel(20, 20), Some(Rgba::WHITE));
        assert_eq!(s.pixel(2, 2), Some(Rgba::TRANSPARENT));
    }

    #[test]
    fn png_encoding_has_signature() {
        let mut s = RasterSurface::new(8, 8);
        s.fill_disc(DVec2::new(4.0, 4.0), 3.0, RED);
        let bytes = s.encode_png().unwrap();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
    }
}
