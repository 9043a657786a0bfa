//! Frame driver: timestamp bookkeeping and the update/draw sequence.
//!
//! The host calls `tick` with a monotonic timestamp and gets back when it
//! should call again. The driver never schedules anything itself, so tests
//! can feed it synthetic timestamps.

use std::time::{Duration, Instant};

use log::{debug, trace};

use crate::engine::Deck;
use crate::error::ConfigError;
use crate::renderer::{RasterSink, Renderer, fit_view};

/// When the host should deliver the next tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextFrame {
    /// As soon as the host's own frame pacing allows.
    Immediate,
    /// After this delay (rate-limited playback).
    After(Duration),
}

/// Source of monotonic timestamps in milliseconds.
pub trait Clock {
    fn now_ms(&mut self) -> f64;
}

/// Milliseconds since the clock was created.
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now_ms(&mut self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }
}

/// Start and previous timestamps, latched on the first tick.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AnimationClock {
    start: Option<f64>,
    previous: f64,
}

impl AnimationClock {
    /// Returns `(elapsed, delta)` for `timestamp` without advancing.
    pub fn times(&mut self, timestamp: f64) -> (f64, f64) {
        let start = match self.start {
            Some(start) => start,
            None => {
                self.start = Some(timestamp);
                self.previous = timestamp;
                timestamp
            }
        };
        (timestamp - start, timestamp - self.previous)
    }

    pub fn advance(&mut self, timestamp: f64) {
        self.previous = timestamp;
    }

    pub fn reset(&mut self) {
        *self = AnimationClock::default();
    }
}

pub struct FrameDriver {
    deck: Deck,
    clock: AnimationClock,
    active_slide: usize,
    limit_fps: bool,
    fps: u32,
    frames: u64,
}

impl FrameDriver {
    pub fn new(deck: Deck, limit_fps: bool, fps: u32) -> Result<Self, ConfigError> {
        if fps == 0 {
            return Err(ConfigError::NonPositiveFps);
        }
        Ok(Self {
            deck,
            clock: AnimationClock::default(),
            active_slide: 0,
            limit_fps,
            fps,
            frames: 0,
        })
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn active_slide(&self) -> usize {
        self.active_slide
    }

    pub fn slide_count(&self) -> usize {
        self.deck.slides.len()
    }

    pub fn limit_fps(&self) -> bool {
        self.limit_fps
    }

    pub fn fps(&self) -> u32 {
        self.fps
    }

    /// Ticks run since creation or the last restart.
    pub fn frame_count(&self) -> u64 {
        self.frames
    }

    pub fn set_active_slide(&mut self, index: usize) -> Result<(), ConfigError> {
        let count = self.deck.slides.len();
        if index >= count {
            return Err(ConfigError::SlideOutOfRange { index, count });
        }
        self.active_slide = index;
        Ok(())
    }

    pub fn set_frame_rate_limit(&mut self, enabled: bool) {
        self.limit_fps = enabled;
    }

    pub fn set_target_fps(&mut self, fps: u32) -> Result<(), ConfigError> {
        if fps == 0 {
            return Err(ConfigError::NonPositiveFps);
        }
        self.fps = fps;
        Ok(())
    }

    /// Forget the clock; the next tick latches a new start time.
    pub fn restart(&mut self) {
        debug!("restarting animation clock");
        self.clock.reset();
        self.frames = 0;
    }

    /// Put every shape of one slide back where it started.
    pub fn reset_slide(&mut self, index: usize) -> Result<(), ConfigError> {
        let count = self.deck.slides.len();
        let slide = self
            .deck
            .slides
            .get_mut(index)
            .ok_or(ConfigError::SlideOutOfRange { index, count })?;
        debug!("resetting slide {index}");
        slide.reset();
        Ok(())
    }

    /// Update every shape, redraw the active slide and say when to come back.
    pub fn tick(&mut self, timestamp_ms: f64, sink: &mut dyn RasterSink) -> NextFrame {
        let (elapsed, delta) = self.clock.times(timestamp_ms);
        debug_assert!(delta >= 0.0, "timestamps went backwards by {}ms", -delta);
        trace!("tick {}: t={elapsed:.1}ms dt={delta:.1}ms", self.frames);

        self.deck.update(elapsed, delta);

        sink.clear();
        let view = fit_view(self.deck.width, self.deck.height, sink.width(), sink.height());
        Renderer::draw_slide(&self.deck.slides[self.active_slide], &view, sink);

        self.frames += 1;
        self.clock.advance(timestamp_ms);
        self.next_frame()
    }

    pub fn next_frame(&self) -> NextFrame {
        if self.limit_fps {
            NextFrame::After(Duration::from_millis((1000.0 / self.fps as f64).floor() as u64))
        } else {
            NextFrame::Immediate
        }
    }
}
