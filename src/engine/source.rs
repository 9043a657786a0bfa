//! Deck source types: the human-authored JSON format.
//!
//! These types describe *what* is on each slide and *how* it moves. The
//! engine validates them and builds runnable `Slide`s from them.

use serde::{Deserialize, Serialize};

use crate::types::Rgba;

use super::motion::Motion;

fn default_background() -> Rgba {
    Rgba::BLACK
}

fn is_origin(p: &[f64; 2]) -> bool {
    p[0] == 0.0 && p[1] == 0.0
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeckSource {
    /// World width; bouncing shapes stay inside `0..width`.
    pub width: f64,
    /// World height; bouncing shapes stay inside `0..height`.
    pub height: f64,
    #[serde(default = "default_background")]
    pub background: Rgba,
    pub slides: Vec<SlideSource>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlideSource {
    #[serde(default)]
    pub title: String,
    /// Draw-time offset shared by every shape on the slide.
    #[serde(default, skip_serializing_if = "is_origin")]
    pub offset: [f64; 2],
    pub shapes: Vec<ShapeSource>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShapeSource {
    /// Convex polygon in local coordinates, in drawing order.
    pub vertices: Vec<[f64; 2]>,
    /// Where the local origin sits in the world at rest.
    #[serde(default, skip_serializing_if = "is_origin")]
    pub position: [f64; 2],
    pub color: Rgba,
    #[serde(default)]
    pub motion: Motion,
}

impl ShapeSource {
    /// Regular polygon with `sides` vertices on a circle of `radius`,
    /// starting at angle zero.
    pub fn regular(sides: usize, radius: f64) -> Vec<[f64; 2]> {
        (0..sides)
            .map(|i| {
                let a = std::f64::consts::TAU * i as f64 / sides as f64;
                [radius * a.cos(), radius * a.sin()]
            })
            .collect()
    }

    /// Axis-aligned rectangle centred on the origin.
    pub fn rect(w: f64, h: f64) -> Vec<[f64; 2]> {
        let (hw, hh) = (w / 2.0, h / 2.0);
        vec![[hw, hh], [hw, -hh], [-hw, -hh], [-hw, hh]]
    }
}
