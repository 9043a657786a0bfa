//! Renderer: projection and drawing.
//!
//! Takes the active `Slide` and issues filled convex polygons to a
//! `RasterSink`. The renderer is pure: it reads shapes and never writes
//! transforms back. It knows nothing about time or terminals.

pub mod canvas;
pub mod cells;

use crate::engine::Slide;
use crate::math::transform::{scaling, translation};
use crate::math::{Matrix3, Vector3};
use crate::types::{Rgba, ScreenPoint};

/// The raster surface the draw stage writes to.
pub trait RasterSink {
    fn width(&self) -> usize;
    fn height(&self) -> usize;
    /// Wipe the whole surface.
    fn clear(&mut self);
    /// Fill a convex polygon. `points` are in drawing order.
    fn fill_polygon(&mut self, points: &[ScreenPoint], color: Rgba);
}

pub struct Renderer;

impl Renderer {
    /// Draw every shape of `slide`. Does not clear the sink.
    ///
    /// `view` maps world units to raster pixels; it and the slide/shape
    /// placements are applied for this draw only.
    pub fn draw_slide(slide: &Slide, view: &Matrix3, sink: &mut dyn RasterSink) {
        let outer = *view * slide.placement;
        for shape in &slide.shapes {
            let points = Renderer::project(&shape.transformed(&outer));
            sink.fill_polygon(&points, shape.color);
        }
    }

    /// Perspective-divide transformed vertices, keeping their order.
    pub fn project(vertices: &[Vector3]) -> Vec<ScreenPoint> {
        vertices.iter().copied().map(Vector3::to_screen).collect()
    }
}

/// World-to-raster mapping: uniform scale to fit, centred.
pub fn fit_view(world_w: f64, world_h: f64, sink_w: usize, sink_h: usize) -> Matrix3 {
    let (sw, sh) = (sink_w as f64, sink_h as f64);
    let s = (sw / world_w).min(sh / world_h);
    let ox = (sw - world_w * s) / 2.0;
    let oy = (sh - world_h * s) / 2.0;
    translation(ox, oy) * scaling(s, s)
}
