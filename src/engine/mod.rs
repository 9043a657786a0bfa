//! Engine: the animation state.
//!
//! Builds runnable slides from a `DeckSource` and advances every shape once
//! per tick. The engine understands time and motion; it never touches a
//! raster.

pub mod demo;
pub mod motion;
pub mod shape;
pub mod source;

use std::f64::consts::TAU;

use log::trace;

use crate::error::DeckError;
use crate::math::transform::translation;
use crate::math::{Matrix3, Vector3};
use crate::types::Rgba;
use motion::Bounds;
use shape::Shape;
use source::{DeckSource, ShapeSource};

#[derive(Debug, Clone)]
pub struct Slide {
    pub title: String,
    /// Draw-time offset shared by all shapes; never accumulated.
    pub placement: Matrix3,
    pub shapes: Vec<Shape>,
}

impl Slide {
    pub fn reset(&mut self) {
        for shape in &mut self.shapes {
            shape.reset();
        }
    }
}

#[derive(Debug, Clone)]
pub struct Deck {
    pub width: f64,
    pub height: f64,
    pub background: Rgba,
    pub slides: Vec<Slide>,
}

impl Deck {
    /// Validate a source deck and build its slides.
    pub fn from_source(source: &DeckSource) -> Result<Deck, DeckError> {
        let (width, height) = (source.width, source.height);
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Err(DeckError::InvalidWorldSize { width, height });
        }
        if source.slides.is_empty() {
            return Err(DeckError::NoSlides);
        }

        let world = Bounds::world(width, height);
        let mut slides = Vec::with_capacity(source.slides.len());
        for (si, slide) in source.slides.iter().enumerate() {
            let shapes = slide
                .shapes
                .iter()
                .enumerate()
                .map(|(i, shape)| build_shape(shape, world, si, i))
                .collect::<Result<Vec<_>, _>>()?;
            slides.push(Slide {
                title: slide.title.clone(),
                placement: translation(slide.offset[0], slide.offset[1]),
                shapes,
            });
        }

        Ok(Deck {
            width,
            height,
            background: source.background,
            slides,
        })
    }

    /// Advance every shape on every slide.
    ///
    /// Inactive slides keep moving, so switching slides shows each one where
    /// its motion has got to rather than where it was left.
    pub fn update(&mut self, elapsed_ms: f64, delta_ms: f64) {
        trace!("update: t={elapsed_ms:.1}ms dt={delta_ms:.1}ms");
        let dt_sec = delta_ms / 1000.0;
        for slide in &mut self.slides {
            let frame = slide.placement;
            for shape in &mut slide.shapes {
                shape.advance(&frame, dt_sec);
            }
        }
    }

    pub fn shape_count(&self) -> usize {
        self.slides.iter().map(|s| s.shapes.len()).sum()
    }
}

fn build_shape(src: &ShapeSource, world: Bounds, slide: usize, shape: usize) -> Result<Shape, DeckError> {
    let non_finite = |what: &'static str| DeckError::NonFinite { slide, shape, what };

    if src.vertices.len() < 3 {
        return Err(DeckError::TooFewVertices {
            slide,
            shape,
            count: src.vertices.len(),
        });
    }
    if src.vertices.iter().flatten().any(|v| !v.is_finite()) {
        return Err(non_finite("vertex"));
    }
    if src.position.iter().any(|v| !v.is_finite()) {
        return Err(non_finite("position"));
    }
    check_motion(&src.motion, slide, shape)?;

    match convexity(&src.vertices) {
        Convexity::Convex => {}
        Convexity::Concave => return Err(DeckError::NotConvex { slide, shape }),
        Convexity::Degenerate => return Err(DeckError::Degenerate { slide, shape }),
    }

    let base = src.vertices.iter().map(|&[x, y]| Vector3::point(x, y)).collect();
    let mut motion = src.motion.clone();
    motion.bind_bounds(world);
    Ok(Shape::new(
        base,
        translation(src.position[0], src.position[1]),
        motion,
        src.color,
    ))
}

fn check_motion(m: &motion::Motion, slide: usize, shape: usize) -> Result<(), DeckError> {
    use motion::Motion;
    let non_finite = |what: &'static str| DeckError::NonFinite { slide, shape, what };
    match m {
        Motion::Still => Ok(()),
        Motion::Bounce {
            velocity_x,
            velocity_y,
            bounds,
        } => {
            if !(velocity_x.is_finite() && velocity_y.is_finite()) {
                return Err(non_finite("velocity"));
            }
            match bounds {
                Some(b) if !bounds_ok(b) => Err(DeckError::InvalidBounds { slide, shape }),
                _ => Ok(()),
            }
        }
        Motion::Spin { angular_velocity } => {
            if angular_velocity.is_finite() {
                Ok(())
            } else {
                Err(non_finite("angular velocity"))
            }
        }
        Motion::Scale {
            rate_x,
            rate_y,
            min,
            max,
            ..
        } => {
            if !(rate_x.is_finite() && rate_y.is_finite()) {
                return Err(non_finite("scale rate"));
            }
            let lo = min.unwrap_or(f64::MIN_POSITIVE);
            let hi = max.unwrap_or(f64::MAX);
            if lo > 0.0 && lo < hi {
                Ok(())
            } else {
                Err(DeckError::InvalidScaleRange { slide, shape })
            }
        }
        Motion::Composite { motions } => motions
            .iter()
            .try_for_each(|m| check_motion(m, slide, shape)),
    }
}

fn bounds_ok(b: &Bounds) -> bool {
    [b.min_x, b.min_y, b.max_x, b.max_y].iter().all(|v| v.is_finite())
        && b.min_x < b.max_x
        && b.min_y < b.max_y
}

#[derive(Debug, PartialEq, Eq)]
enum Convexity {
    Convex,
    Concave,
    Degenerate,
}

/// Convex means every turn goes the same way (collinear runs allowed) and
/// the boundary winds around exactly once.
fn convexity(pts: &[[f64; 2]]) -> Convexity {
    let n = pts.len();
    let mut sign = 0.0f64;
    let mut turning = 0.0f64;
    for i in 0..n {
        let [ax, ay] = pts[i];
        let [bx, by] = pts[(i + 1) % n];
        let [cx, cy] = pts[(i + 2) % n];
        let (ex, ey) = (bx - ax, by - ay);
        let (fx, fy) = (cx - bx, cy - by);
        let cross = ex * fy - ey * fx;
        if cross != 0.0 {
            if sign != 0.0 && cross.signum() != sign {
                return Convexity::Concave;
            }
            sign = cross.signum();
        }
        if (ex != 0.0 || ey != 0.0) && (fx != 0.0 || fy != 0.0) {
            turning += cross.atan2(ex * fx + ey * fy);
        }
    }
    if sign == 0.0 {
        return Convexity::Degenerate;
    }
    if (turning.abs() - TAU).abs() > 1e-6 {
        return Convexity::Concave;
    }
    Convexity::Convex
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::motion::Motion;
    use crate::engine::source::SlideSource;

    fn shape(vertices: Vec<[f64; 2]>) -> ShapeSource {
        ShapeSource {
            vertices,
            position: [0.0, 0.0],
            color: Rgba::WHITE,
            motion: Motion::Still,
        }
    }

    fn deck(shapes: Vec<ShapeSource>) -> DeckSource {
        DeckSource {
            width: 800.0,
            height: 600.0,
            background: Rgba::BLACK,
            slides: vec![SlideSource {
                title: "t".into(),
                offset: [0.0, 0.0],
                shapes,
            }],
        }
    }

    #[test]
    fn convexity_classifies_polygons() {
        assert_eq!(convexity(&ShapeSource::rect(2.0, 2.0)), Convexity::Convex);
        assert_eq!(convexity(&ShapeSource::regular(8, 25.0)), Convexity::Convex);
        // Square with a collinear midpoint.
        assert_eq!(
            convexity(&[[0.0, 0.0], [1.0, 0.0], [2.0, 0.0], [2.0, 2.0], [0.0, 2.0]]),
            Convexity::Convex
        );
        // Arrowhead.
        assert_eq!(
            convexity(&[[0.0, 0.0], [4.0, 2.0], [0.0, 4.0], [1.0, 2.0]]),
            Convexity::Concave
        );
        // Pentagram: same turn direction everywhere, but winds twice.
        let star: Vec<[f64; 2]> = (0..5)
            .map(|i| {
                let a = TAU * (2 * i) as f64 / 5.0;
                [a.cos(), a.sin()]
            })
            .collect();
        assert_eq!(convexity(&star), Convexity::Concave);
        assert_eq!(
            convexity(&[[0.0, 0.0], [1.0, 1.0], [2.0, 2.0]]),
            Convexity::Degenerate
        );
    }

    #[test]
    fn from_source_rejects_bad_shapes() {
        let err = Deck::from_source(&deck(vec![shape(vec![[0.0, 0.0], [1.0, 0.0]])])).unwrap_err();
        assert_eq!(err, DeckError::TooFewVertices { slide: 0, shape: 0, count: 2 });

        let err = Deck::from_source(&deck(vec![
            shape(ShapeSource::rect(1.0, 1.0)),
            shape(vec![[0.0, 0.0], [4.0, 2.0], [0.0, 4.0], [1.0, 2.0]]),
        ]))
        .unwrap_err();
        assert_eq!(err, DeckError::NotConvex { slide: 0, shape: 1 });

        let mut bad_scale = shape(ShapeSource::rect(1.0, 1.0));
        bad_scale.motion = Motion::scale(1.0, 1.0, Some(2.0), Some(1.0));
        let err = Deck::from_source(&deck(vec![bad_scale])).unwrap_err();
        assert_eq!(err, DeckError::InvalidScaleRange { slide: 0, shape: 0 });
    }

    #[test]
    fn from_source_rejects_bad_bounce_bounds() {
        let bounce = |bounds| Motion::Bounce { velocity_x: 1.0, velocity_y: 1.0, bounds: Some(bounds) };
        let bad = [
            Bounds { min_x: 100.0, min_y: 0.0, max_x: 100.0, max_y: 50.0 },
            Bounds { min_x: 0.0, min_y: 60.0, max_x: 100.0, max_y: 50.0 },
            Bounds { min_x: 0.0, min_y: 0.0, max_x: f64::INFINITY, max_y: 50.0 },
            Bounds { min_x: f64::NAN, min_y: 0.0, max_x: 100.0, max_y: 50.0 },
        ];
        for b in bad {
            let mut s = shape(ShapeSource::rect(10.0, 10.0));
            s.motion = Motion::Composite { motions: vec![bounce(b)] };
            assert_eq!(
                Deck::from_source(&deck(vec![s])).unwrap_err(),
                DeckError::InvalidBounds { slide: 0, shape: 0 },
                "{b:?}"
            );
        }

        let mut s = shape(ShapeSource::rect(10.0, 10.0));
        s.motion = bounce(Bounds { min_x: 10.0, min_y: 10.0, max_x: 200.0, max_y: 100.0 });
        assert!(Deck::from_source(&deck(vec![s])).is_ok());
    }

    #[test]
    fn from_source_rejects_empty_and_bad_world() {
        let mut d = deck(vec![]);
        d.slides.clear();
        assert_eq!(Deck::from_source(&d).unwrap_err(), DeckError::NoSlides);

        let mut d = deck(vec![]);
        d.width = 0.0;
        assert!(matches!(
            Deck::from_source(&d),
            Err(DeckError::InvalidWorldSize { .. })
        ));
    }

    #[test]
    fn from_source_binds_world_bounds() {
        let mut s = shape(ShapeSource::rect(10.0, 10.0));
        s.motion = Motion::Bounce { velocity_x: 1.0, velocity_y: 2.0, bounds: None };
        let d = Deck::from_source(&deck(vec![s])).unwrap();
        assert_eq!(
            d.slides[0].shapes[0].motion(),
            &Motion::Bounce {
                velocity_x: 1.0,
                velocity_y: 2.0,
                bounds: Some(Bounds::world(800.0, 600.0)),
            }
        );
    }

    #[test]
    fn update_advances_every_slide() {
        let mut s = shape(ShapeSource::rect(10.0, 10.0));
        s.position = [100.0, 100.0];
        s.motion = Motion::Bounce { velocity_x: 10.0, velocity_y: 0.0, bounds: None };
        let mut src = deck(vec![s.clone()]);
        src.slides.push(SlideSource { title: "two".into(), offset: [0.0, 0.0], shapes: vec![s] });

        let mut d = Deck::from_source(&src).unwrap();
        d.update(500.0, 500.0);
        for slide in &d.slides {
            assert_eq!(slide.shapes[0].accumulated().origin(), (5.0, 0.0));
        }
        assert_eq!(d.shape_count(), 2);
    }
}
