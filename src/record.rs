//! Catalog data model: waveform classification and records.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::dsp;

/// Classification of a waveform, derived from its type folder.
///
/// Folder names match exactly; anything unrecognized is [`Unknown`] but is
/// still cataloged.
///
/// [`Unknown`]: WaveformType::Unknown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum WaveformType {
    /// Laser pulse shape reference.
    Laser,
    /// Scintillation response.
    Scint,
    /// Single-photo-electron amplitude reference.
    Spe,
    /// Noise baseline capture.
    Noise,
    /// Synthesized or measured fitting template.
    Template,
    /// Unrecognized type folder.
    Unknown,
}

impl WaveformType {
    /// Classify a type folder name. Exact match only.
    pub fn from_folder(name: &str) -> Self {
        match name {
            "LASER" => Self::Laser,
            "SCINT" => Self::Scint,
            "SPE" => Self::Spe,
            "NOISE" => Self::Noise,
            "TEMPLATE" => Self::Template,
            _ => Self::Unknown,
        }
    }

    /// Canonical folder name, also used for persisted template paths.
    pub fn folder_name(&self) -> &'static str {
        match self {
            Self::Laser => "LASER",
            Self::Scint => "SCINT",
            Self::Spe => "SPE",
            Self::Noise => "NOISE",
            Self::Template => "TEMPLATE",
            Self::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for WaveformType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.folder_name())
    }
}

impl FromStr for WaveformType {
    type Err = String;

    /// Strict parse for CLI/config type filters: only the canonical folder
    /// names are accepted, so a typo in an allow-list fails loudly instead of
    /// silently matching nothing.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match Self::from_folder(s) {
            Self::Unknown if s != "UNKNOWN" => Err(format!("unknown waveform type: {s}")),
            kind => Ok(kind),
        }
    }
}

/// Overvoltage category from a filename: `OV1`/`OV2`/`OV3` substring, or 0
/// when no marker is present.
pub fn overvoltage_from_filename(name: &str) -> u8 {
    if name.contains("OV1") {
        1
    } else if name.contains("OV2") {
        2
    } else if name.contains("OV3") {
        3
    } else {
        0
    }
}

/// One measured or synthesized waveform, immutable once emitted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaveformRecord {
    /// Provenance tag.
    pub institution: String,
    /// Source file name, or the synthesized template name.
    pub name: String,
    /// Device/model identifier (directory-derived).
    pub model: String,
    /// Waveform classification.
    #[serde(rename = "type")]
    pub kind: WaveformType,
    /// Overvoltage category, 0 = unspecified.
    pub overvoltage: u8,
    /// Seconds per sample, post-conversion if resampled.
    pub sampling_period: f64,
    /// Maximum sample value.
    pub amplitude: f64,
    /// Sum of strictly-positive samples.
    pub integral: f64,
    /// Ordered amplitude samples.
    pub samples: Vec<f64>,
    /// Per-sample timestamps, `sampling_period * index`.
    pub timebase: Vec<f64>,
}

impl WaveformRecord {
    /// Assemble a record from finished samples, deriving amplitude, integral,
    /// and timebase.
    pub fn from_samples(
        institution: impl Into<String>,
        name: impl Into<String>,
        model: impl Into<String>,
        kind: WaveformType,
        overvoltage: u8,
        sampling_period: f64,
        samples: Vec<f64>,
    ) -> Self {
        let amplitude = dsp::peak_amplitude(&samples);
        let integral = dsp::positive_integral(&samples);
        let timebase = (0..samples.len())
            .map(|i| sampling_period * i as f64)
            .collect();
        Self {
            institution: institution.into(),
            name: name.into(),
            model: model.into(),
            kind,
            overvoltage,
            sampling_period,
            amplitude,
            integral,
            samples,
            timebase,
        }
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// True when the waveform holds no samples.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Index of the first maximum sample.
    pub fn peak_index(&self) -> Option<usize> {
        dsp::peak_index(&self.samples)
    }

    /// Copy of this record with the waveform divided by its own peak
    /// amplitude. Records with a non-positive peak pass through unscaled.
    pub fn normalized(&self) -> Self {
        let mut record = self.clone();
        if record.amplitude > 0.0 {
            for sample in &mut record.samples {
                *sample /= record.amplitude;
            }
            record.integral = dsp::positive_integral(&record.samples);
            record.amplitude = dsp::peak_amplitude(&record.samples);
        }
        record
    }
}
