//! End-to-end scenarios: a frame driver fed synthetic timestamps, drawing
//! into a recording sink or an in-memory canvas.

use std::f64::consts::PI;

use polyslides::{
    engine::{
        Deck,
        motion::{Direction, Motion},
        source::{DeckSource, ShapeSource, SlideSource},
    },
    math::{Matrix3, Vector3},
    player::driver::{FrameDriver, NextFrame},
    renderer::{RasterSink, canvas::Canvas},
    types::{Rgba, ScreenPoint},
};

const GREEN: Rgba = Rgba::opaque(0, 255, 0);

#[derive(Default)]
struct Recorder {
    clears: usize,
    polygons: Vec<(Vec<ScreenPoint>, Rgba)>,
}

impl RasterSink for Recorder {
    fn width(&self) -> usize {
        800
    }
    fn height(&self) -> usize {
        600
    }
    fn clear(&mut self) {
        self.clears += 1;
        self.polygons.clear();
    }
    fn fill_polygon(&mut self, points: &[ScreenPoint], color: Rgba) {
        self.polygons.push((points.to_vec(), color));
    }
}

fn one_slide(shapes: Vec<ShapeSource>) -> DeckSource {
    DeckSource {
        width: 800.0,
        height: 600.0,
        background: Rgba::BLACK,
        slides: vec![SlideSource {
            title: "test".into(),
            offset: [0.0, 0.0],
            shapes,
        }],
    }
}

fn octagon() -> Vec<[f64; 2]> {
    vec![
        [300.0, 275.0],
        [318.0, 282.0],
        [325.0, 300.0],
        [318.0, 318.0],
        [300.0, 325.0],
        [282.0, 318.0],
        [275.0, 300.0],
        [282.0, 282.0],
    ]
}

fn driver_for(source: &DeckSource) -> FrameDriver {
    let deck = Deck::from_source(source).expect("valid deck");
    FrameDriver::new(deck, false, 60).expect("valid fps")
}

fn world_points(driver: &FrameDriver, slide: usize, shape: usize) -> Vec<Vector3> {
    driver.deck().slides[slide].shapes[shape].transformed(&Matrix3::identity())
}

fn rightmost(points: &[Vector3]) -> f64 {
    points.iter().map(|p| p.x).fold(f64::NEG_INFINITY, f64::max)
}

#[test]
fn ball_reflects_off_the_right_edge() {
    let source = one_slide(vec![ShapeSource {
        vertices: octagon(),
        position: [0.0, 0.0],
        color: GREEN,
        motion: Motion::Bounce {
            velocity_x: 50.0,
            velocity_y: 0.0,
            bounds: None,
        },
    }]);
    let mut driver = driver_for(&source);
    let mut sink = Recorder::default();

    let mut t = 0.0;
    driver.tick(t, &mut sink);
    assert_eq!(rightmost(&world_points(&driver, 0, 0)), 325.0);

    let edge = loop {
        t += 100.0;
        driver.tick(t, &mut sink);
        let right = rightmost(&world_points(&driver, 0, 0));
        if right >= 800.0 {
            break right;
        }
        assert!(t < 20_000.0, "ball never reached the edge");
    };
    let shape = &driver.deck().slides[0].shapes[0];
    assert_eq!(shape.motion().bounce_directions(), Some((Direction::Positive, Direction::Positive)));

    t += 100.0;
    driver.tick(t, &mut sink);
    let shape = &driver.deck().slides[0].shapes[0];
    assert_eq!(shape.motion().bounce_directions().map(|d| d.0), Some(Direction::Negative));
    let after = rightmost(&world_points(&driver, 0, 0));
    assert!(after < edge, "{after} should be left of {edge}");

    t += 100.0;
    driver.tick(t, &mut sink);
    assert!(rightmost(&world_points(&driver, 0, 0)) < after);
}

#[test]
fn ball_never_overshoots_by_more_than_one_step() {
    let source = one_slide(vec![ShapeSource {
        vertices: ShapeSource::regular(8, 25.0),
        position: [400.0, 300.0],
        color: GREEN,
        motion: Motion::Bounce {
            velocity_x: 170.0,
            velocity_y: -130.0,
            bounds: None,
        },
    }]);
    let mut driver = driver_for(&source);
    let mut sink = Recorder::default();
    let step = 1000.0 / 60.0;
    for i in 0..2000 {
        driver.tick(i as f64 * step, &mut sink);
        for p in world_points(&driver, 0, 0) {
            assert!(p.x > -3.0 && p.x < 803.0, "x escaped: {}", p.x);
            assert!(p.y > -3.0 && p.y < 603.0, "y escaped: {}", p.y);
        }
    }
}

#[test]
fn spin_returns_after_full_turn() {
    let source = one_slide(vec![ShapeSource {
        vertices: ShapeSource::rect(200.0, 100.0),
        position: [400.0, 300.0],
        color: GREEN,
        motion: Motion::Spin { angular_velocity: PI },
    }]);
    let mut driver = driver_for(&source);
    let mut sink = Recorder::default();
    let before = world_points(&driver, 0, 0);

    driver.tick(0.0, &mut sink);
    driver.tick(1000.0, &mut sink);
    let half = world_points(&driver, 0, 0);
    assert!(half[0].approx_eq(&Vector3::point(300.0, 250.0), 1e-9), "{:?}", half[0]);

    driver.tick(2000.0, &mut sink);
    let after = world_points(&driver, 0, 0);
    for (a, b) in before.iter().zip(&after) {
        assert!(a.approx_eq(b, 1e-9), "{a:?} vs {b:?}");
    }
}

#[test]
fn identity_square_draws_unchanged() {
    let square = vec![[100.0, 100.0], [100.0, -100.0], [-100.0, -100.0], [-100.0, 100.0]];
    let source = one_slide(vec![ShapeSource {
        vertices: square.clone(),
        position: [0.0, 0.0],
        color: GREEN,
        motion: Motion::Still,
    }]);
    let mut driver = driver_for(&source);
    let mut sink = Recorder::default();
    assert_eq!(driver.tick(16.0, &mut sink), NextFrame::Immediate);

    let expected: Vec<ScreenPoint> = square.iter().map(|&[x, y]| ScreenPoint { x, y }).collect();
    assert_eq!(sink.clears, 1);
    assert_eq!(sink.polygons, vec![(expected, GREEN)]);
}

#[test]
fn only_the_active_slide_is_drawn_but_all_slides_move() {
    let mover = ShapeSource {
        vertices: ShapeSource::rect(10.0, 10.0),
        position: [100.0, 100.0],
        color: GREEN,
        motion: Motion::Bounce {
            velocity_x: 10.0,
            velocity_y: 0.0,
            bounds: None,
        },
    };
    let mut source = one_slide(vec![mover.clone()]);
    source.slides.push(SlideSource {
        title: "second".into(),
        offset: [0.0, 0.0],
        shapes: vec![mover.clone(), mover],
    });
    let mut driver = driver_for(&source);
    let mut sink = Recorder::default();

    driver.tick(0.0, &mut sink);
    assert_eq!(sink.polygons.len(), 1);

    driver.set_active_slide(1).unwrap();
    driver.tick(1000.0, &mut sink);
    assert_eq!(sink.polygons.len(), 2);
    assert_eq!(rightmost(&world_points(&driver, 0, 0)), 115.0);
    assert_eq!(rightmost(&world_points(&driver, 1, 1)), 115.0);
}

#[test]
fn reset_slide_puts_shapes_back() {
    let source = one_slide(vec![ShapeSource {
        vertices: ShapeSource::rect(10.0, 10.0),
        position: [100.0, 100.0],
        color: GREEN,
        motion: Motion::Composite {
            motions: vec![
                Motion::Bounce { velocity_x: 30.0, velocity_y: 20.0, bounds: None },
                Motion::Spin { angular_velocity: 1.0 },
                Motion::scale(0.5, 0.5, Some(0.5), Some(2.0)),
            ],
        },
    }]);
    let mut driver = driver_for(&source);
    let mut sink = Recorder::default();
    let before = world_points(&driver, 0, 0);
    for t in [0.0, 250.0, 500.0, 750.0] {
        driver.tick(t, &mut sink);
    }
    assert_ne!(world_points(&driver, 0, 0), before);

    driver.reset_slide(0).unwrap();
    assert_eq!(world_points(&driver, 0, 0), before);
}

#[test]
fn canvas_shows_the_ball_where_the_engine_put_it() {
    let source = one_slide(vec![ShapeSource {
        vertices: ShapeSource::rect(100.0, 100.0),
        position: [200.0, 200.0],
        color: GREEN,
        motion: Motion::Bounce {
            velocity_x: 100.0,
            velocity_y: 0.0,
            bounds: None,
        },
    }]);
    let mut driver = driver_for(&source);
    // Half resolution: the view scales world units by 0.5.
    let mut canvas = Canvas::new(400, 300, Rgba::BLACK);

    driver.tick(0.0, &mut canvas);
    assert_eq!(canvas.get(100, 100), GREEN);
    assert_eq!(canvas.get(140, 100), Rgba::BLACK);

    driver.tick(1000.0, &mut canvas);
    // Moved 100 world units = 50 pixels to the right; old spot is cleared.
    assert_eq!(canvas.get(140, 100), GREEN);
    assert_eq!(canvas.get(100, 100), Rgba::BLACK);
}

#[test]
fn rate_limited_schedule_uses_whole_milliseconds() {
    let source = one_slide(vec![ShapeSource {
        vertices: ShapeSource::rect(10.0, 10.0),
        position: [100.0, 100.0],
        color: GREEN,
        motion: Motion::Still,
    }]);
    let mut driver = driver_for(&source);
    driver.set_frame_rate_limit(true);
    driver.set_target_fps(60).unwrap();
    let mut sink = Recorder::default();
    assert_eq!(
        driver.tick(0.0, &mut sink),
        NextFrame::After(std::time::Duration::from_millis(16))
    );
}
