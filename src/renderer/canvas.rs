//! In-memory RGBA raster.

use crate::types::{Rgba, ScreenPoint};

use super::RasterSink;

#[derive(Debug, Clone)]
pub struct Canvas {
    pub w: usize,
    pub h: usize,
    pub background: Rgba,
    pub arr: Vec<Rgba>,
}

impl Canvas {
    pub fn new(w: usize, h: usize, background: Rgba) -> Self {
        Self {
            w,
            h,
            background,
            arr: vec![background; w * h],
        }
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Rgba {
        self.arr[y * self.w + x]
    }

    /// Fill pixels whose centres lie inside a convex polygon.
    ///
    /// For each row the polygon is sampled along the line through the pixel
    /// centres; a convex polygon crosses it at most twice, so the span
    /// between the outermost crossings is the covered run. Pixels are
    /// covered when `left <= centre < right`, so shapes sharing an edge do
    /// not overlap.
    fn fill_convex(&mut self, pts: &[ScreenPoint], color: Rgba) {
        if pts.len() < 3 || self.w == 0 || self.h == 0 {
            return;
        }
        let (mut ymin, mut ymax) = (f64::INFINITY, f64::NEG_INFINITY);
        for p in pts {
            ymin = ymin.min(p.y);
            ymax = ymax.max(p.y);
        }
        if !(ymin.is_finite() && ymax.is_finite()) {
            return;
        }
        let row_lo = (ymin - 0.5).ceil().max(0.0) as usize;
        let row_hi = ((ymax - 0.5).ceil().min(self.h as f64)).max(0.0) as usize;

        for row in row_lo..row_hi {
            let yc = row as f64 + 0.5;
            let mut left = f64::INFINITY;
            let mut right = f64::NEG_INFINITY;
            for i in 0..pts.len() {
                let a = pts[i];
                let b = pts[(i + 1) % pts.len()];
                // Half-open in y so a vertex on the scanline counts once.
                let crosses = (a.y <= yc && yc < b.y) || (b.y <= yc && yc < a.y);
                if crosses {
                    let x = a.x + (yc - a.y) * (b.x - a.x) / (b.y - a.y);
                    left = left.min(x);
                    right = right.max(x);
                }
            }
            if left >= right {
                continue;
            }
            let col_lo = (left - 0.5).ceil().max(0.0) as usize;
            let col_hi = ((right - 0.5).ceil().min(self.w as f64)).max(0.0) as usize;
            let base = row * self.w;
            for px in &mut self.arr[base + col_lo.min(col_hi)..base + col_hi] {
                *px = color.over(*px);
            }
        }
    }
}

impl RasterSink for Canvas {
    fn width(&self) -> usize {
        self.w
    }

    fn height(&self) -> usize {
        self.h
    }

    fn clear(&mut self) {
        self.arr.fill(self.background);
    }

    fn fill_polygon(&mut self, points: &[ScreenPoint], color: Rgba) {
        self.fill_convex(points, color);
    }
}
