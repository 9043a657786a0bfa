//! Player: the terminal host for the frame driver.
//!
//! Owns the clock, the canvas and the terminal. Each pass of the loop ticks
//! the driver, paints the cells that changed, then waits for the delay the
//! driver asked for while handling keys.

pub mod driver;

use std::io::{self, Write};
use std::time::{Duration, Instant};

use anyhow::{Result, bail};
use crossterm::event::{self, Event, KeyEvent, KeyEventKind};
use crossterm::{cursor, execute, queue, style, terminal};
use log::debug;

use crate::config::{PlayerConfig, matches_binding, slide_digit};
use crate::menubar::{menu_items, print_menu_item};
use crate::renderer::canvas::Canvas;
use crate::renderer::cells::{self, CellGrid};
use crate::types::{Cell, Rgba};
use driver::{Clock, FrameDriver, MonotonicClock, NextFrame};

/// Rows reserved above the canvas for the menu bar.
const CANVAS_OFFSET: u16 = 1;
/// Menu bar plus status bar.
const CHROME_ROWS: u16 = 2;
const MIN_COLS: u16 = 20;
const MIN_ROWS: u16 = CHROME_ROWS + 4;
const MAX_FPS: u32 = 240;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

pub struct Player<C: Clock = MonotonicClock> {
    driver: FrameDriver,
    clock: C,
    config: PlayerConfig,
    canvas: Canvas,
    /// What is currently on screen, if it can be diffed against.
    grid: Option<CellGrid>,
    message: Option<String>,
    last_tick: Option<f64>,
    measured_fps: f64,
}

impl Player {
    pub fn new(driver: FrameDriver, config: PlayerConfig) -> Self {
        Player::with_clock(driver, config, MonotonicClock::new())
    }
}

impl<C: Clock> Player<C> {
    pub fn with_clock(driver: FrameDriver, config: PlayerConfig, clock: C) -> Self {
        let background = driver.deck().background;
        Self {
            driver,
            clock,
            config,
            canvas: Canvas::new(0, 0, background),
            grid: None,
            message: None,
            last_tick: None,
            measured_fps: 0.0,
        }
    }

    /// Play the deck in the terminal.
    ///
    /// Sets up the terminal, enters the frame loop, and restores the terminal
    /// on exit (even on error).
    pub fn play(&mut self) -> Result<()> {
        let (term_w, term_h) = terminal::size()?;
        if term_w < MIN_COLS || term_h < MIN_ROWS {
            bail!(
                "Terminal too small: need at least {}x{}, have {}x{}",
                MIN_COLS,
                MIN_ROWS,
                term_w,
                term_h,
            );
        }

        let mut stdout = io::stdout();
        terminal::enable_raw_mode()?;
        execute!(
            stdout,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            terminal::Clear(terminal::ClearType::All),
        )?;

        let result = self.run_loop(&mut stdout, term_w, term_h);

        // Always restore terminal state.
        let _ = execute!(
            stdout,
            style::ResetColor,
            cursor::Show,
            terminal::LeaveAlternateScreen
        );
        let _ = terminal::disable_raw_mode();

        result
    }

    // -----------------------------------------------------------------------
    // Frame loop
    // -----------------------------------------------------------------------

    fn run_loop(&mut self, stdout: &mut io::Stdout, term_w: u16, term_h: u16) -> Result<()> {
        self.resize(term_w, term_h);
        self.render_menubar(stdout)?;

        loop {
            let next = self.step();
            self.render_canvas(stdout)?;
            self.render_status(stdout)?;
            stdout.flush()?;

            let wait = match next {
                NextFrame::Immediate => Duration::from_millis(self.config.refresh_ms),
                NextFrame::After(delay) => delay,
            };
            if self.wait_for_input(stdout, wait)? == Flow::Quit {
                return Ok(());
            }
        }
    }

    /// Tick the driver at the clock's current time into the canvas.
    fn step(&mut self) -> NextFrame {
        let now = self.clock.now_ms();
        self.measure(now);
        self.driver.tick(now, &mut self.canvas)
    }

    /// Handle input until `wait` has passed.
    fn wait_for_input(&mut self, stdout: &mut io::Stdout, wait: Duration) -> Result<Flow> {
        let deadline = Instant::now() + wait;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if !event::poll(remaining)? {
                return Ok(Flow::Continue);
            }
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if self.handle_key(&key) == Flow::Quit {
                        return Ok(Flow::Quit);
                    }
                }
                Event::Resize(w, h) => {
                    self.resize(w, h);
                    queue!(stdout, terminal::Clear(terminal::ClearType::All))?;
                    self.render_menubar(stdout)?;
                }
                _ => {}
            }
            if remaining.is_zero() {
                return Ok(Flow::Continue);
            }
        }
    }

    fn handle_key(&mut self, key: &KeyEvent) -> Flow {
        let keys = &self.config.key_bindings;
        let count = self.driver.slide_count();
        let active = self.driver.active_slide();

        let result = if matches_binding(&keys.quit, key) || matches_binding(&keys.cancel, key) {
            return Flow::Quit;
        } else if matches_binding(&keys.next_slide, key) {
            self.driver.set_active_slide((active + 1) % count)
        } else if matches_binding(&keys.prev_slide, key) {
            self.driver.set_active_slide((active + count - 1) % count)
        } else if matches_binding(&keys.toggle_limit, key) {
            let enabled = !self.driver.limit_fps();
            self.driver.set_frame_rate_limit(enabled);
            Ok(())
        } else if matches_binding(&keys.fps_up, key) {
            self.driver.set_target_fps((self.driver.fps() + 5).min(MAX_FPS))
        } else if matches_binding(&keys.fps_down, key) {
            self.driver.set_target_fps(self.driver.fps().saturating_sub(5))
        } else if matches_binding(&keys.restart, key) {
            self.driver.restart();
            self.last_tick = None;
            Ok(())
        } else if matches_binding(&keys.reset_slide, key) {
            self.driver.reset_slide(active)
        } else if let Some(index) = slide_digit(key) {
            self.driver.set_active_slide(index)
        } else {
            return Flow::Continue;
        };

        self.message = result.err().map(|e| e.to_string());
        if let Some(msg) = &self.message {
            debug!("rejected key {:?}: {msg}", key.code);
        }
        Flow::Continue
    }

    fn resize(&mut self, term_w: u16, term_h: u16) {
        let cols = term_w as usize;
        let rows = term_h.saturating_sub(CHROME_ROWS) as usize;
        debug!("canvas resized to {cols}x{} pixels", rows * 2);
        self.canvas = Canvas::new(cols, rows * 2, self.driver.deck().background);
        self.grid = None;
    }

    fn measure(&mut self, now: f64) {
        if let Some(prev) = self.last_tick {
            let dt = now - prev;
            if dt > 0.0 {
                let instant = 1000.0 / dt;
                self.measured_fps = if self.measured_fps == 0.0 {
                    instant
                } else {
                    self.measured_fps * 0.9 + instant * 0.1
                };
            }
        }
        self.last_tick = Some(now);
    }

    // -----------------------------------------------------------------------
    // Terminal output
    // -----------------------------------------------------------------------

    fn render_menubar(&self, stdout: &mut io::Stdout) -> Result<()> {
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            style::ResetColor,
            terminal::Clear(terminal::ClearType::CurrentLine),
            style::Print(" "),
        )?;
        for (i, item) in menu_items(&self.config.key_bindings).iter().enumerate() {
            if i > 0 {
                queue!(stdout, style::Print("  "))?;
            }
            print_menu_item(stdout, item)?;
        }
        Ok(())
    }

    fn render_canvas(&mut self, stdout: &mut io::Stdout) -> Result<()> {
        let next = CellGrid::from_canvas(&self.canvas);
        match &self.grid {
            Some(prev) if prev.cols == next.cols && prev.rows == next.rows => {
                for change in cells::diff(prev, &next) {
                    queue!(stdout, cursor::MoveTo(change.x, change.y + CANVAS_OFFSET))?;
                    print_cell(stdout, &change.cell)?;
                }
            }
            _ => {
                for (y, row) in next.cells.iter().enumerate() {
                    queue!(stdout, cursor::MoveTo(0, y as u16 + CANVAS_OFFSET))?;
                    for cell in row {
                        print_cell(stdout, cell)?;
                    }
                }
            }
        }
        self.grid = Some(next);
        Ok(())
    }

    fn render_status(&self, stdout: &mut io::Stdout) -> Result<()> {
        let (term_w, term_h) = terminal::size()?;
        let status_y = term_h.saturating_sub(1);

        let active = self.driver.active_slide();
        let title = &self.driver.deck().slides[active].title;
        let limit = if self.driver.limit_fps() {
            format!("limit {} fps", self.driver.fps())
        } else {
            format!("unlimited (limit {} fps off)", self.driver.fps())
        };
        let mut status = format!(
            " Slide {}/{}: {} | {} | {:.1} fps",
            active + 1,
            self.driver.slide_count(),
            title,
            limit,
            self.measured_fps,
        );
        if let Some(msg) = &self.message {
            status.push_str(" | ");
            status.push_str(msg);
        }
        let status: String = status.chars().take(term_w as usize).collect();

        let mut cs = style::ContentStyle::default();
        cs.attributes.set(style::Attribute::Dim);

        queue!(
            stdout,
            cursor::MoveTo(0, status_y),
            style::ResetColor,
            terminal::Clear(terminal::ClearType::CurrentLine),
            style::PrintStyledContent(style::StyledContent::new(cs, status)),
        )?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Style conversion
// ---------------------------------------------------------------------------

fn print_cell(stdout: &mut io::Stdout, cell: &Cell) -> Result<()> {
    let cs = style::ContentStyle {
        foreground_color: Some(to_ct_color(cell.fg)),
        background_color: Some(to_ct_color(cell.bg)),
        ..Default::default()
    };
    queue!(
        stdout,
        style::PrintStyledContent(style::StyledContent::new(cs, cell.ch))
    )?;
    Ok(())
}

/// Alpha is dropped; the canvas has already composited onto its background.
pub fn to_ct_color(c: Rgba) -> style::Color {
    style::Color::Rgb {
        r: c.r,
        g: c.g,
        b: c.b,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{Deck, demo};

    /// Hands out a fixed list of timestamps.
    struct ScriptedClock(std::vec::IntoIter<f64>);

    impl Clock for ScriptedClock {
        fn now_ms(&mut self) -> f64 {
            self.0.next().expect("clock ran out of timestamps")
        }
    }

    fn player(times: Vec<f64>) -> Player<ScriptedClock> {
        let deck = Deck::from_source(&demo::deck()).unwrap();
        let driver = FrameDriver::new(deck, false, 30).unwrap();
        let mut p = Player::with_clock(driver, PlayerConfig::default(), ScriptedClock(times.into_iter()));
        p.resize(80, 24);
        p
    }

    #[test]
    fn steps_follow_the_injected_clock() {
        let mut p = player(vec![1000.0, 1100.0, 1200.0]);
        let start = *p.driver.deck().slides[0].shapes[0].accumulated();

        assert_eq!(p.step(), NextFrame::Immediate);
        assert_eq!(*p.driver.deck().slides[0].shapes[0].accumulated(), start);
        p.step();
        p.step();

        assert_eq!(p.driver.frame_count(), 3);
        assert!((p.measured_fps - 10.0).abs() < 1e-9, "{}", p.measured_fps);
        assert_ne!(*p.driver.deck().slides[0].shapes[0].accumulated(), start);
    }

    #[test]
    fn restart_key_forgets_the_last_tick() {
        let mut p = player(vec![0.0, 50.0]);
        p.step();
        p.step();
        let key = KeyEvent::new(crossterm::event::KeyCode::Char('r'), crossterm::event::KeyModifiers::NONE);
        assert_eq!(p.handle_key(&key), Flow::Continue);
        assert_eq!(p.driver.frame_count(), 0);
        assert_eq!(p.last_tick, None);
    }

    #[test]
    fn rejected_fps_change_shows_a_message() {
        let mut p = player(vec![]);
        p.driver.set_target_fps(5).unwrap();
        let key = KeyEvent::new(crossterm::event::KeyCode::Char('-'), crossterm::event::KeyModifiers::NONE);
        p.handle_key(&key);
        assert_eq!(p.driver.fps(), 5);
        assert_eq!(p.message.as_deref(), Some("target fps must be positive"));
    }
}
