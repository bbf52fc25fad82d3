//! Length reconciliation and peak alignment.

use crate::dsp;

use super::LengthPolicy;

/// Pad or truncate one waveform under the batch length policy.
///
/// `running_max` is the explicit accumulator threaded through the pass by the
/// caller; the updated value is returned alongside the waveform. With
/// `same_length` off the waveform passes through and the accumulator tracks
/// its length. An explicit target forces the length (trailing zero-pad or
/// truncation) and pins the accumulator to it. With no target, shorter
/// waveforms pad up to the accumulator and longer ones raise it.
///
/// Waveforms resized early in a pass are not re-padded when a later one turns
/// out longer; see DESIGN.md for why this single-pass asymmetry is kept.
pub fn resize_waveform(
    mut wvf: Vec<f64>,
    running_max: usize,
    policy: LengthPolicy,
) -> (Vec<f64>, usize) {
    if !policy.same_length {
        let len = wvf.len();
        return (wvf, len);
    }

    match policy.target {
        Some(target) => {
            if wvf.len() < target {
                wvf.resize(target, 0.0);
            } else {
                wvf.truncate(target);
            }
            (wvf, target)
        }
        None => {
            if wvf.len() < running_max {
                wvf.resize(running_max, 0.0);
            }
            let len = wvf.len();
            (wvf, len)
        }
    }
}

/// Align the waveform peak to the `pretrigger` sample index.
///
/// A peak arriving early is pushed right by zero-padding the front and
/// dropping the same number of trailing samples. A peak arriving late is
/// rotated left, wrapping the leading samples around to the tail; the wrap is
/// intended alignment behavior, not an artifact. Length is preserved either
/// way. Degenerate inputs (empty, or a pretrigger beyond the waveform) come
/// back as-is or all zeros.
pub fn align_peak(mut wvf: Vec<f64>, pretrigger: usize) -> Vec<f64> {
    let Some(peak) = dsp::peak_index(&wvf) else {
        return wvf;
    };

    if peak < pretrigger {
        let shift = pretrigger - peak;
        let len = wvf.len();
        if shift >= len {
            return vec![0.0; len];
        }
        let mut shifted = vec![0.0; shift];
        shifted.extend_from_slice(&wvf[..len - shift]);
        shifted
    } else {
        wvf.rotate_left(peak - pretrigger);
        wvf
    }
}
