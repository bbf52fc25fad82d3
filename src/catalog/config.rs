//! Catalog build configuration.
//!
//! [`BuildConfig`] holds the resolved parameters for one catalog pass.
//! [`FileConfig`] is the optional `wvfcat.toml` layer: every field optional,
//! applied over the defaults before CLI flags.
//!
//! ```toml
//! # wvfcat.toml
//! [build]
//! pretrigger = 100
//! sampling_period = 4e-9
//! convert_sampling = true
//! target_sampling_period = 16e-9
//! types = ["LASER", "SPE"]
//!
//! [generate]
//! max_length = 5000
//! ```

use std::path::Path;

use serde::Deserialize;

use super::CatalogError;
use crate::record::WaveformType;

/// Default provenance tag stamped on every record.
pub const DEFAULT_INSTITUTION: &str = "CIEMAT";

/// Default pretrigger sample index the peak aligns to.
pub const DEFAULT_PRETRIGGER: usize = 100;

/// Default sampling period of the source files (4 ns, CAEN digitizer).
pub const DEFAULT_SAMPLING_PERIOD: f64 = 4e-9;

/// Default post-conversion sampling period (16 ns).
pub const DEFAULT_TARGET_SAMPLING_PERIOD: f64 = 16e-9;

/// Length-reconciliation policy shared across one batch.
#[derive(Debug, Clone, Copy)]
pub struct LengthPolicy {
    /// Explicit target length; `None` reconciles against the running
    /// maximum.
    pub target: Option<usize>,
    /// When false, waveforms pass through untouched.
    pub same_length: bool,
}

impl Default for LengthPolicy {
    fn default() -> Self {
        Self {
            target: None,
            same_length: true,
        }
    }
}

/// Parameters of one catalog-building pass.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// Provenance tag stamped on every record.
    pub institution: String,
    /// Sample index the waveform peak is aligned to.
    pub pretrigger: usize,
    /// Sampling period of the source files, seconds per sample.
    pub sampling_period: f64,
    /// Resample every waveform to `target_sampling_period`.
    pub convert_sampling: bool,
    /// Sampling period after conversion.
    pub target_sampling_period: f64,
    /// Explicit waveform length; `None` uses the running batch maximum.
    pub target_length: Option<usize>,
    /// Pad/truncate every waveform to a shared length.
    pub same_length: bool,
    /// Allow-list of type folders; `None` catalogs everything.
    pub types: Option<Vec<WaveformType>>,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            institution: DEFAULT_INSTITUTION.to_string(),
            pretrigger: DEFAULT_PRETRIGGER,
            sampling_period: DEFAULT_SAMPLING_PERIOD,
            convert_sampling: false,
            target_sampling_period: DEFAULT_TARGET_SAMPLING_PERIOD,
            target_length: None,
            same_length: true,
            types: None,
        }
    }
}

impl BuildConfig {
    /// Sampling period of the emitted records: the conversion target when
    /// resampling is on, the source period otherwise.
    pub fn effective_period(&self) -> f64 {
        if self.convert_sampling {
            self.target_sampling_period
        } else {
            self.sampling_period
        }
    }

    /// Length policy for the resize step.
    pub fn length_policy(&self) -> LengthPolicy {
        LengthPolicy {
            target: self.target_length,
            same_length: self.same_length,
        }
    }

    /// True when the type folder passes the allow-list.
    pub fn allows(&self, kind: WaveformType) -> bool {
        match &self.types {
            Some(types) => types.contains(&kind),
            None => true,
        }
    }
}

/// Root structure of a `wvfcat.toml` file.
#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    /// Overrides for the catalog build.
    #[serde(default)]
    pub build: BuildOverrides,
    /// Overrides for template generation.
    #[serde(default)]
    pub generate: GenerateOverrides,
}

/// Optional overrides for [`BuildConfig`].
#[derive(Debug, Default, Deserialize)]
pub struct BuildOverrides {
    /// Provenance tag.
    pub institution: Option<String>,
    /// Pretrigger sample index.
    pub pretrigger: Option<usize>,
    /// Source sampling period in seconds.
    pub sampling_period: Option<f64>,
    /// Enable sampling-rate conversion.
    pub convert_sampling: Option<bool>,
    /// Post-conversion sampling period in seconds.
    pub target_sampling_period: Option<f64>,
    /// Explicit waveform length.
    pub target_length: Option<usize>,
    /// Pad/truncate to a shared length.
    pub same_length: Option<bool>,
    /// Type-folder allow-list.
    pub types: Option<Vec<WaveformType>>,
}

/// Optional overrides for template generation.
#[derive(Debug, Default, Deserialize)]
pub struct GenerateOverrides {
    /// Sampling period of the source laser waveforms.
    pub sampling_period: Option<f64>,
    /// Sampling period of the synthesized templates.
    pub target_sampling_period: Option<f64>,
    /// Length of the persisted templates.
    pub max_length: Option<usize>,
    /// Skip pairs with missing components instead of aborting.
    pub continue_on_missing: Option<bool>,
}

impl FileConfig {
    /// Load configuration overrides from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, CatalogError> {
        let content = std::fs::read_to_string(path)?;
        Ok(Self::from_toml(&content)?)
    }

    /// Parse configuration overrides from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}

impl BuildOverrides {
    /// Apply the overrides that are present onto `config`.
    pub fn apply(&self, config: &mut BuildConfig) {
        if let Some(institution) = &self.institution {
            config.institution = institution.clone();
        }
        if let Some(pretrigger) = self.pretrigger {
            config.pretrigger = pretrigger;
        }
        if let Some(period) = self.sampling_period {
            config.sampling_period = period;
        }
        if let Some(convert) = self.convert_sampling {
            config.convert_sampling = convert;
        }
        if let Some(period) = self.target_sampling_period {
            config.target_sampling_period = period;
        }
        if let Some(length) = self.target_length {
            config.target_length = Some(length);
        }
        if let Some(same_length) = self.same_length {
            config.same_length = same_length;
        }
        if let Some(types) = &self.types {
            config.types = Some(types.clone());
        }
    }
}
