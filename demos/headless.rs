//! Builds a deck programmatically and prints a
//! few frames as ASCII art, no terminal UI involved.
//!
//! Run with: cargo run --example headless

use std::f64::consts::PI;

use polyslides::{
    engine::{
        Deck,
        motion::Motion,
        source::{DeckSource, ShapeSource, SlideSource},
    },
    player::driver::FrameDriver,
    renderer::{canvas::Canvas, cells},
    types::Rgba,
};

fn main() -> anyhow::Result<()> {
    let source = DeckSource {
        width: 800.0,
        height: 600.0,
        background: Rgba::BLACK,
        slides: vec![SlideSource {
            title: "Ball and bar".into(),
            offset: [0.0, 0.0],
            shapes: vec![
                // ── A ball that bounces off the walls ──────────────
                ShapeSource {
                    vertices: ShapeSource::regular(8, 60.0),
                    position: [150.0, 150.0],
                    color: Rgba::opaque(0, 255, 0),
                    motion: Motion::Bounce {
                        velocity_x: 400.0,
                        velocity_y: 300.0,
                        bounds: None,
                    },
                },
                // ── A bar spinning a quarter turn per second ───────
                ShapeSource {
                    vertices: ShapeSource::rect(300.0, 40.0),
                    position: [400.0, 300.0],
                    color: Rgba::opaque(255, 0, 0),
                    motion: Motion::Spin {
                        angular_velocity: PI / 2.0,
                    },
                },
            ],
        }],
    };

    let deck = Deck::from_source(&source)?;
    let mut driver = FrameDriver::new(deck, false, 60)?;
    let mut canvas = Canvas::new(80, 60, Rgba::BLACK);

    for (i, t) in [0.0, 250.0, 500.0, 750.0, 1000.0].into_iter().enumerate() {
        driver.tick(t, &mut canvas);
        println!("── frame {i} at {t}ms ──");
        print!("{}", cells::to_ascii_sampled(&canvas, 1, 2));
    }
    Ok(())
}
