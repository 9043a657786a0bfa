use std::{fs, process};

use anyhow::{Context, Result, bail};

use polyslides::{
    config::PlayerConfig,
    engine::{Deck, demo, source::DeckSource},
    player::{
        Player,
        driver::{FrameDriver, NextFrame},
    },
    renderer::{canvas::Canvas, cells},
};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    if let Err(e) = run() {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

const PLAY_USAGE: &str = "polyslides play [deck.json]";
const EXPORT_USAGE: &str = "polyslides export <output.json>";
const SNAPSHOT_USAGE: &str = "polyslides snapshot <slide> <time_ms> [deck.json]";

/// Canvas size used by `snapshot`, in pixels.
const SNAPSHOT_SIZE: (usize, usize) = (160, 120);
/// Simulation step used by `snapshot`.
const SNAPSHOT_STEP_MS: f64 = 1000.0 / 60.0;

fn run() -> Result<()> {
    let mut args = std::env::args().skip(1);

    match args.next().as_deref() {
        Some("play") => {
            let path = args.next();
            play(path.as_deref())
        }
        Some("export") => {
            let path = args.next().context(EXPORT_USAGE)?;
            export(&path)
        }
        Some("snapshot") => {
            let slide: usize = args
                .next()
                .context(SNAPSHOT_USAGE)?
                .parse()
                .context("slide must be a number (1-based)")?;
            let time_ms = parse_time_ms(&args.next().context(SNAPSHOT_USAGE)?)?;
            let path = args.next();
            snapshot(slide, time_ms, path.as_deref())
        }
        _ => bail!(
            "polyslides — animated polygon slides in the terminal\n\nUsage:\n  {PLAY_USAGE}\n  {EXPORT_USAGE}\n  {SNAPSHOT_USAGE}"
        ),
    }
}

fn parse_time_ms(arg: &str) -> Result<f64> {
    let time_ms: f64 = arg.parse().context("time_ms must be a number")?;
    if !time_ms.is_finite() || time_ms < 0.0 {
        bail!("time_ms must be a finite, non-negative number of milliseconds, got {arg}");
    }
    Ok(time_ms)
}

fn load_deck(path: Option<&str>) -> Result<Deck> {
    let source = match path {
        Some(path) => {
            let json =
                fs::read_to_string(path).with_context(|| format!("Failed to read {path}"))?;
            serde_json::from_str::<DeckSource>(&json)
                .with_context(|| format!("Failed to parse {path}"))?
        }
        None => demo::deck(),
    };
    let deck = Deck::from_source(&source)
        .with_context(|| format!("Invalid deck {}", path.unwrap_or("<demo>")))?;
    log::debug!(
        "loaded {} slides, {} shapes",
        deck.slides.len(),
        deck.shape_count()
    );
    Ok(deck)
}

fn play(path: Option<&str>) -> Result<()> {
    let config = PlayerConfig::load();
    let deck = load_deck(path)?;
    let mut driver = FrameDriver::new(deck, config.limit_fps, config.fps)
        .context("Invalid player config")?;
    driver
        .set_active_slide(config.start_slide)
        .context("Invalid player config")?;

    let mut player = Player::new(driver, config);
    player.play()
}

fn export(output_path: &str) -> Result<()> {
    let json = serde_json::to_string_pretty(&demo::deck())?;
    fs::write(output_path, &json).with_context(|| format!("Failed to write {output_path}"))?;
    eprintln!("Wrote demo deck to {output_path}");
    Ok(())
}

fn snapshot(slide: usize, time_ms: f64, path: Option<&str>) -> Result<()> {
    if slide == 0 {
        bail!("slide numbers start at 1");
    }
    let deck = load_deck(path)?;
    let mut driver = FrameDriver::new(deck, false, 60)?;
    driver.set_active_slide(slide - 1)?;

    let (w, h) = SNAPSHOT_SIZE;
    let mut canvas = Canvas::new(w, h, driver.deck().background);
    let mut t = 0.0;
    loop {
        let next = driver.tick(t, &mut canvas);
        debug_assert_eq!(next, NextFrame::Immediate);
        if t >= time_ms {
            break;
        }
        t = (t + SNAPSHOT_STEP_MS).min(time_ms);
    }

    print!("{}", cells::to_ascii_sampled(&canvas, 1, 2));
    eprintln!(
        "Slide {slide} \"{}\" after {time_ms}ms ({} frames)",
        driver.deck().slides[slide - 1].title,
        driver.frame_count(),
    );
    Ok(())
}
