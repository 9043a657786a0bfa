//! Built-in demo deck: one slide per motion kind plus a combined slide.

use std::f64::consts::{FRAC_PI_2, PI, TAU};

use crate::types::Rgba;

use super::motion::Motion;
use super::source::{DeckSource, ShapeSource, SlideSource};

pub const WIDTH: f64 = 800.0;
pub const HEIGHT: f64 = 600.0;

const RED: Rgba = Rgba::opaque(255, 0, 0);
const GREEN: Rgba = Rgba::opaque(0, 255, 0);
const BLUE: Rgba = Rgba::opaque(0, 0, 255);
const TEAL: Rgba = Rgba::opaque(0, 128, 128);
const ORANGE: Rgba = Rgba::new(255, 160, 0, 200);

pub fn deck() -> DeckSource {
    DeckSource {
        width: WIDTH,
        height: HEIGHT,
        background: Rgba::BLACK,
        slides: vec![bouncing_ball(), spinning(), pulsating(), composite()],
    }
}

fn bouncing_ball() -> SlideSource {
    SlideSource {
        title: "Bouncing ball".into(),
        offset: [0.0, 0.0],
        shapes: vec![ShapeSource {
            // Octagon of radius 25 around (300, 300), in world coordinates.
            vertices: vec![
                [300.0, 275.0],
                [318.0, 282.0],
                [325.0, 300.0],
                [318.0, 318.0],
                [300.0, 325.0],
                [282.0, 318.0],
                [275.0, 300.0],
                [282.0, 282.0],
            ],
            position: [0.0, 0.0],
            color: GREEN,
            motion: Motion::Bounce {
                velocity_x: 150.0,
                velocity_y: 110.0,
                bounds: None,
            },
        }],
    }
}

fn spinning() -> SlideSource {
    let spin = |angular_velocity| Motion::Spin { angular_velocity };
    SlideSource {
        title: "Spinning polygons".into(),
        offset: [0.0, 0.0],
        shapes: vec![
            ShapeSource {
                vertices: ShapeSource::regular(3, 90.0),
                position: [170.0, 300.0],
                color: RED,
                motion: spin(FRAC_PI_2),
            },
            ShapeSource {
                vertices: ShapeSource::regular(5, 90.0),
                position: [400.0, 300.0],
                color: GREEN,
                motion: spin(-PI),
            },
            ShapeSource {
                vertices: ShapeSource::rect(160.0, 60.0),
                position: [630.0, 300.0],
                color: BLUE,
                motion: spin(TAU),
            },
        ],
    }
}

fn pulsating() -> SlideSource {
    SlideSource {
        title: "Pulsating polygons".into(),
        offset: [0.0, 0.0],
        shapes: vec![
            ShapeSource {
                vertices: ShapeSource::rect(150.0, 150.0),
                position: [230.0, 300.0],
                color: RED,
                motion: Motion::scale(0.8, 0.8, Some(0.5), Some(1.8)),
            },
            ShapeSource {
                vertices: ShapeSource::regular(6, 80.0),
                position: [560.0, 300.0],
                color: BLUE,
                // Squash and stretch: the axes run out of phase.
                motion: Motion::scale(1.2, -0.6, Some(0.4), Some(2.0)),
            },
        ],
    }
}

fn composite() -> SlideSource {
    SlideSource {
        title: "All together".into(),
        offset: [0.0, 0.0],
        shapes: vec![
            ShapeSource {
                vertices: ShapeSource::rect(220.0, 220.0),
                position: [400.0, 300.0],
                color: TEAL,
                motion: Motion::Composite {
                    motions: vec![
                        Motion::Spin { angular_velocity: -0.5 },
                        Motion::scale(0.3, 0.3, Some(0.7), Some(1.3)),
                    ],
                },
            },
            ShapeSource {
                vertices: vec![[0.0, -40.0], [35.0, 20.0], [-35.0, 20.0]],
                position: [150.0, 150.0],
                color: ORANGE,
                motion: Motion::Composite {
                    motions: vec![
                        Motion::Bounce {
                            velocity_x: 180.0,
                            velocity_y: 130.0,
                            bounds: None,
                        },
                        Motion::Spin { angular_velocity: PI },
                        Motion::scale(0.9, 0.9, Some(0.6), Some(1.6)),
                    ],
                },
            },
        ],
    }
}
