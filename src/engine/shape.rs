//! Shape model: immutable base geometry plus one accumulated transform.

use crate::math::{Matrix3, Vector3};
use crate::types::Rgba;

use super::motion::Motion;

#[derive(Debug, Clone)]
pub struct Shape {
    /// Vertices relative to the shape's local origin. Never mutated.
    base: Vec<Vector3>,
    /// Net motion since creation or the last reset.
    accumulated: Matrix3,
    /// Draw-time offset (the authored `position`). Never accumulated.
    placement: Matrix3,
    motion: Motion,
    /// Motion as authored, restored on reset.
    initial_motion: Motion,
    pub color: Rgba,
}

impl Shape {
    pub fn new(base: Vec<Vector3>, placement: Matrix3, motion: Motion, color: Rgba) -> Self {
        Self {
            base,
            accumulated: Matrix3::identity(),
            placement,
            initial_motion: motion.clone(),
            motion,
            color,
        }
    }

    pub fn base(&self) -> &[Vector3] {
        &self.base
    }

    pub fn accumulated(&self) -> &Matrix3 {
        &self.accumulated
    }

    pub fn placement(&self) -> &Matrix3 {
        &self.placement
    }

    pub fn motion(&self) -> &Motion {
        &self.motion
    }

    /// Re-seed the accumulated transform and restore the authored motion.
    pub fn reset(&mut self) {
        self.accumulated = Matrix3::identity();
        self.motion = self.initial_motion.clone();
    }

    /// Advance by `dt_sec`. `frame` maps accumulated space to world space
    /// (slide placement times shape placement); bounds are tested there.
    pub fn advance(&mut self, frame: &Matrix3, dt_sec: f64) {
        let to_world = *frame * self.placement;
        self.motion
            .step(&self.base, &mut self.accumulated, &to_world, dt_sec);
    }

    /// The current polygon after `outer · placement · accumulated`.
    pub fn transformed(&self, outer: &Matrix3) -> Vec<Vector3> {
        let m = *outer * self.placement * self.accumulated;
        self.base.iter().map(|v| &m * *v).collect()
    }
}

/// Indices of the extremal vertices of a polygon.
///
/// Ties go to the lowest index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Extremes {
    pub left: usize,
    pub right: usize,
    pub top: usize,
    pub bottom: usize,
}

impl Extremes {
    /// `top` is the smallest y and `bottom` the largest (raster orientation).
    /// Returns `None` for an empty polygon.
    pub fn of(points: &[Vector3]) -> Option<Extremes> {
        if points.is_empty() {
            return None;
        }
        let mut ex = Extremes {
            left: 0,
            right: 0,
            top: 0,
            bottom: 0,
        };
        for (i, p) in points.iter().enumerate().skip(1) {
            if p.x < points[ex.left].x {
                ex.left = i;
            }
            if p.x > points[ex.right].x {
                ex.right = i;
            }
            if p.y < points[ex.top].y {
                ex.top = i;
            }
            if p.y > points[ex.bottom].y {
                ex.bottom = i;
            }
        }
        Some(ex)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::transform::translation;

    fn octagon() -> Vec<Vector3> {
        // The ball from the bouncing slide, listed bottom-first.
        [
            (300.0, 275.0),
            (318.0, 282.0),
            (325.0, 300.0),
            (318.0, 318.0),
            (300.0, 325.0),
            (282.0, 318.0),
            (275.0, 300.0),
            (282.0, 282.0),
        ]
        .iter()
        .map(|&(x, y)| Vector3::point(x, y))
        .collect()
    }

    #[test]
    fn extremes_come_from_geometry() {
        let ex = Extremes::of(&octagon()).unwrap();
        assert_eq!(ex, Extremes { left: 6, right: 2, top: 0, bottom: 4 });
    }

    #[test]
    fn extremes_of_nothing() {
        assert_eq!(Extremes::of(&[]), None);
    }

    #[test]
    fn transformed_applies_placement_without_storing_it() {
        let shape = Shape::new(
            vec![Vector3::point(1.0, 0.0), Vector3::point(0.0, 1.0), Vector3::point(0.0, 0.0)],
            translation(10.0, 10.0),
            Motion::Still,
            Rgba::WHITE,
        );
        let pts = shape.transformed(&translation(5.0, 0.0));
        assert_eq!(pts[0], Vector3::point(16.0, 10.0));
        assert_eq!(*shape.accumulated(), Matrix3::identity());
    }

    #[test]
    fn reset_restores_identity_and_motion() {
        let mut shape = Shape::new(
            octagon(),
            Matrix3::identity(),
            Motion::Bounce {
                velocity_x: 50.0,
                velocity_y: 0.0,
                bounds: None,
            },
            Rgba::WHITE,
        );
        shape.advance(&Matrix3::identity(), 1.0);
        assert_ne!(*shape.accumulated(), Matrix3::identity());
        shape.reset();
        assert_eq!(*shape.accumulated(), Matrix3::identity());
        assert_eq!(shape.motion(), &Motion::Bounce { velocity_x: 50.0, velocity_y: 0.0, bounds: None });
    }
}
