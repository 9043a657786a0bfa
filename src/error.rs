//! Error types for deck loading and driver configuration.

use thiserror::Error;

/// Rejected calls on the frame driver's configuration surface.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("slide index {index} is out of range (deck has {count} slides)")]
    SlideOutOfRange { index: usize, count: usize },

    #[error("target fps must be positive")]
    NonPositiveFps,
}

/// Problems found while turning a `DeckSource` into a runnable `Deck`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DeckError {
    #[error("deck has no slides")]
    NoSlides,

    #[error("world size must be positive and finite, got {width}x{height}")]
    InvalidWorldSize { width: f64, height: f64 },

    #[error("slide {slide}, shape {shape}: polygon needs at least 3 vertices, got {count}")]
    TooFewVertices {
        slide: usize,
        shape: usize,
        count: usize,
    },

    #[error("slide {slide}, shape {shape}: polygon is not convex")]
    NotConvex { slide: usize, shape: usize },

    #[error("slide {slide}, shape {shape}: polygon has no area")]
    Degenerate { slide: usize, shape: usize },

    #[error("slide {slide}, shape {shape}: {what} is not a finite number")]
    NonFinite {
        slide: usize,
        shape: usize,
        what: &'static str,
    },

    #[error("slide {slide}, shape {shape}: bounce bounds must be finite with min < max")]
    InvalidBounds { slide: usize, shape: usize },

    #[error("slide {slide}, shape {shape}: scale thresholds must satisfy 0 < min < max")]
    InvalidScaleRange { slide: usize, shape: usize },
}
