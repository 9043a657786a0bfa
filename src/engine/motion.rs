//! Per-shape motion rules.
//!
//! Every rule turns `dt` into an incremental transform and left-multiplies it
//! onto the shape's accumulated transform: `accumulated = increment ·
//! accumulated`. Spin and scale are integrated per tick, never from total
//! elapsed time.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::math::transform::{about, rotation, scaling, translation};
use crate::math::{Matrix3, Vector3};

use super::shape::Extremes;

/// Axis-aligned box in world units that a bouncing shape stays inside.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    pub fn world(width: f64, height: f64) -> Self {
        Bounds {
            min_x: 0.0,
            min_y: 0.0,
            max_x: width,
            max_y: height,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Motion {
    /// Translate at a constant speed, reflecting off `bounds`.
    /// Velocities are world units per second.
    Bounce {
        velocity_x: f64,
        velocity_y: f64,
        /// Filled in with the world box when the deck is built.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        bounds: Option<Bounds>,
    },
    /// Rotate about the shape's own origin, radians per second.
    Spin { angular_velocity: f64 },
    /// Grow (positive rate) or shrink about the shape's own origin; the
    /// factor applied each tick is `1 + rate * dt` per axis, cut short at
    /// `min` / `max` and never allowed to reach zero. Once the running extent
    /// sits on a threshold the rate flips sign.
    Scale {
        rate_x: f64,
        rate_y: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max: Option<f64>,
        #[serde(skip, default = "unit_extent")]
        extent: [f64; 2],
    },
    /// Children step in order, each seeing the previous child's result.
    Composite { motions: Vec<Motion> },
    Still,
}

impl Default for Motion {
    fn default() -> Self {
        Motion::Still
    }
}

fn unit_extent() -> [f64; 2] {
    [1.0, 1.0]
}

/// Travel direction along one axis of a bouncing shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Positive,
    Negative,
}

impl Direction {
    pub fn of(velocity: f64) -> Direction {
        if velocity.is_sign_negative() {
            Direction::Negative
        } else {
            Direction::Positive
        }
    }
}

impl Motion {
    pub fn scale(rate_x: f64, rate_y: f64, min: Option<f64>, max: Option<f64>) -> Motion {
        Motion::Scale {
            rate_x,
            rate_y,
            min,
            max,
            extent: unit_extent(),
        }
    }

    /// Per-axis direction of the first bounce rule, if any.
    pub fn bounce_directions(&self) -> Option<(Direction, Direction)> {
        match self {
            Motion::Bounce {
                velocity_x,
                velocity_y,
                ..
            } => Some((Direction::of(*velocity_x), Direction::of(*velocity_y))),
            Motion::Composite { motions } => motions.iter().find_map(Motion::bounce_directions),
            _ => None,
        }
    }

    /// Give every unbounded bounce rule the world box.
    pub fn bind_bounds(&mut self, world: Bounds) {
        match self {
            Motion::Bounce { bounds, .. } if bounds.is_none() => *bounds = Some(world),
            Motion::Composite { motions } => {
                for m in motions {
                    m.bind_bounds(world);
                }
            }
            _ => {}
        }
    }

    /// Fold one tick of this motion into `accumulated`.
    ///
    /// `to_world` maps accumulated space into world space; bounds are tested
    /// against `to_world · accumulated · base`.
    pub fn step(
        &mut self,
        base: &[Vector3],
        accumulated: &mut Matrix3,
        to_world: &Matrix3,
        dt_sec: f64,
    ) {
        match self {
            Motion::Still => {}
            Motion::Composite { motions } => {
                for m in motions {
                    m.step(base, accumulated, to_world, dt_sec);
                }
            }
            Motion::Bounce {
                velocity_x,
                velocity_y,
                bounds,
            } => {
                if let Some(bounds) = bounds {
                    let world = *to_world * *accumulated;
                    let points: Vec<Vector3> = base.iter().map(|v| &world * *v).collect();
                    reflect(&points, bounds, velocity_x, velocity_y);
                }
                let dx = *velocity_x * dt_sec;
                let dy = *velocity_y * dt_sec;
                *accumulated = translation(dx, dy) * *accumulated;
            }
            Motion::Spin { angular_velocity } => {
                let (px, py) = accumulated.origin();
                let inc = about(px, py, &rotation(*angular_velocity * dt_sec));
                *accumulated = inc * *accumulated;
            }
            Motion::Scale {
                rate_x,
                rate_y,
                min,
                max,
                extent,
            } => {
                flip_rate(rate_x, extent[0], *min, *max, "x");
                flip_rate(rate_y, extent[1], *min, *max, "y");
                let fx = scale_factor(*rate_x * dt_sec, &mut extent[0], *min, *max);
                let fy = scale_factor(*rate_y * dt_sec, &mut extent[1], *min, *max);
                let (px, py) = accumulated.origin();
                *accumulated = about(px, py, &scaling(fx, fy)) * *accumulated;
            }
        }
    }
}

/// Point each velocity component back inside `bounds` when the polygon
/// touches or crosses an edge. X is resolved before Y; the axes never affect
/// each other.
fn reflect(points: &[Vector3], bounds: &Bounds, vx: &mut f64, vy: &mut f64) {
    let Some(ex) = Extremes::of(points) else {
        return;
    };
    let right = points[ex.right].x / points[ex.right].w;
    let left = points[ex.left].x / points[ex.left].w;
    let bottom = points[ex.bottom].y / points[ex.bottom].w;
    let top = points[ex.top].y / points[ex.top].w;

    if right >= bounds.max_x {
        if *vx > 0.0 {
            debug!("bounce: right edge at x={right:.2}, reversing vx={vx}");
        }
        *vx = -vx.abs();
    } else if left <= bounds.min_x {
        if *vx < 0.0 {
            debug!("bounce: left edge at x={left:.2}, reversing vx={vx}");
        }
        *vx = vx.abs();
    }

    if bottom >= bounds.max_y {
        if *vy > 0.0 {
            debug!("bounce: bottom edge at y={bottom:.2}, reversing vy={vy}");
        }
        *vy = -vy.abs();
    } else if top <= bounds.min_y {
        if *vy < 0.0 {
            debug!("bounce: top edge at y={top:.2}, reversing vy={vy}");
        }
        *vy = vy.abs();
    }
}

/// Smallest factor one tick may apply; keeps the extent positive however
/// long the tick.
const MIN_FACTOR: f64 = 1e-3;

/// Apply one tick's growth to `extent`, clamped to the thresholds, and return
/// the factor that was actually used.
fn scale_factor(growth: f64, extent: &mut f64, min: Option<f64>, max: Option<f64>) -> f64 {
    let mut next = *extent * (1.0 + growth).max(MIN_FACTOR);
    if let Some(max) = max {
        next = next.min(max);
    }
    if let Some(min) = min {
        next = next.max(min);
    }
    let factor = next / *extent;
    *extent = next;
    factor
}

fn flip_rate(rate: &mut f64, extent: f64, min: Option<f64>, max: Option<f64>, axis: &str) {
    if let Some(max) = max {
        if extent >= max && *rate > 0.0 {
            debug!("scale: {axis} extent {extent:.3} reached max {max}, shrinking");
            *rate = -*rate;
            return;
        }
    }
    if let Some(min) = min {
        if extent <= min && *rate < 0.0 {
            debug!("scale: {axis} extent {extent:.3} reached min {min}, growing");
            *rate = -*rate;
        }
    }
}
