//! Interpolation-based sampling-rate conversion.

/// Convert a waveform sampled at `rate` to `new_rate` via linear
/// interpolation over reconstructed absolute timestamps.
///
/// Original timestamps are `index / rate`; the output holds exactly
/// `floor(len * new_rate / rate)` samples at timestamps `index / new_rate`.
/// Timestamps outside the original range clamp to the boundary samples.
/// Deterministic, no randomness.
///
/// Both rates must be positive and finite.
pub fn resample(samples: &[f64], rate: f64, new_rate: f64) -> Vec<f64> {
    debug_assert!(rate > 0.0 && rate.is_finite());
    debug_assert!(new_rate > 0.0 && new_rate.is_finite());

    let out_len = (samples.len() as f64 * new_rate / rate).floor() as usize;
    let mut out = Vec::with_capacity(out_len);
    for i in 0..out_len {
        let time = i as f64 / new_rate;
        out.push(interpolate_at(time, samples, rate));
    }
    out
}

/// Linearly interpolate the sample value at absolute time `time`, where the
/// original samples sit at `index / rate`.
fn interpolate_at(time: f64, samples: &[f64], rate: f64) -> f64 {
    // Fractional index into the original waveform.
    let position = time * rate;
    if position <= 0.0 {
        return samples[0];
    }
    let lower = position.floor() as usize;
    if lower >= samples.len() - 1 {
        return samples[samples.len() - 1];
    }
    let frac = position - lower as f64;
    samples[lower] + (samples[lower + 1] - samples[lower]) * frac
}
