//! Numeric waveform transforms.
//!
//! Everything in this module is a pure, deterministic function over a sample
//! slice: sampling-rate conversion, Savitzky-Golay smoothing, and the small
//! peak statistics shared by the catalog builder and the template generator.

mod resample;
mod smooth;


pub use resample::resample;
pub use smooth::{savgol_smooth, POLY_ORDER};

/// Errors from waveform transforms.
#[derive(Debug, thiserror::Error)]
pub enum DspError {
    /// The smoothing window is incompatible with the input sequence.
    #[error("invalid window: length {window} for a {len}-sample waveform (must be odd, longer than the cubic order, and no longer than the waveform)")]
    InvalidWindow {
        /// Requested window length.
        window: usize,
        /// Length of the input sequence.
        len: usize,
    },
}

/// Index of the first maximum sample, or `None` for an empty waveform.
///
/// Ties resolve to the lowest index, so a flat-topped pulse aligns on its
/// leading edge.
pub fn peak_index(samples: &[f64]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, &value) in samples.iter().enumerate() {
        match best {
            Some((_, max)) if value <= max => {}
            _ => best = Some((i, value)),
        }
    }
    best.map(|(i, _)| i)
}

/// Maximum sample value, or 0.0 for an empty waveform.
pub fn peak_amplitude(samples: &[f64]) -> f64 {
    peak_index(samples).map_or(0.0, |i| samples[i])
}

/// Sum of the strictly-positive samples.
///
/// Thresholding at zero excludes the noise floor, so the result is the signal
/// area and is always >= 0.
pub fn positive_integral(samples: &[f64]) -> f64 {
    samples.iter().filter(|v| **v > 0.0).sum()
}
