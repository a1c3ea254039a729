#![forbid(unsafe_code)]
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod arena;
pub mod error;
pub mod histogram;
pub mod palette;
pub mod perceptual;

pub use error::HistError;
pub use histogram::{HistEntry, Histogram};
pub use palette::{Palette, OPAQUE_BIAS_EPSILON};
pub use perceptual::{to_perceptual, PerceptualColor, DEFAULT_GAMMA};

/// Configuration for histogram construction.
#[derive(Debug, Clone)]
pub struct HistogramConfig {
    /// Gamma of the source pixel data, used by the perceptual conversion.
    pub gamma: f64,
    /// Hard cap on distinct posterized colors. Exceeding it fails the build
    /// with `TooManyColors`; the documented recovery is retrying with a
    /// larger `ignorebits`.
    pub max_colors: u32,
    /// Low-order bits masked off each channel before counting (0..=7).
    pub ignorebits: u32,
}

impl Default for HistogramConfig {
    fn default() -> Self {
        Self {
            gamma: DEFAULT_GAMMA,
            max_colors: 65_536,
            ignorebits: 0,
        }
    }
}

impl HistogramConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn gamma(mut self, gamma: f64) -> Self {
        self.gamma = gamma;
        self
    }

    pub fn max_colors(mut self, n: u32) -> Self {
        self.max_colors = n;
        self
    }

    pub fn ignorebits(mut self, bits: u32) -> Self {
        self.ignorebits = bits;
        self
    }
}

/// Build a weighted histogram of the distinct posterized colors in a
/// row-major RGBA image.
///
/// When `importance_map` is supplied, each pixel contributes
/// `0.5 + importance` to its color's weight instead of `1.0`.
pub fn build_histogram(
    pixels: &[rgb::RGBA<u8>],
    width: usize,
    height: usize,
    config: &HistogramConfig,
    importance_map: Option<&[f32]>,
) -> Result<Histogram, HistError> {
    validate_inputs(pixels.len(), width, height, config, importance_map)?;
    histogram::compute(pixels, config, importance_map)
}

fn validate_inputs(
    pixel_count: usize,
    width: usize,
    height: usize,
    config: &HistogramConfig,
    importance_map: Option<&[f32]>,
) -> Result<(), HistError> {
    if width == 0 || height == 0 {
        return Err(HistError::ZeroDimension);
    }
    if pixel_count != width * height {
        return Err(HistError::DimensionMismatch {
            len: pixel_count,
            width,
            height,
        });
    }
    if config.max_colors == 0 {
        return Err(HistError::InvalidMaxColors);
    }
    if config.ignorebits > 7 {
        return Err(HistError::InvalidIgnoreBits(config.ignorebits));
    }
    if let Some(map) = importance_map {
        if map.len() != pixel_count {
            return Err(HistError::ImportanceMapMismatch {
                len: map.len(),
                expected: pixel_count,
            });
        }
    }
    Ok(())
}
