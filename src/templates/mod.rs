//! Synthetic template generation.
//!
//! A synthesized template is a laser pulse shape rescaled so its peak matches
//! the single-photo-electron amplitude of the same (model, overvoltage)
//! operating point, resampled to the target period, cut to start just ahead
//! of its peak, and persisted as flat numeric text.
//!
//! Note the alignment convention here is truncation-from-peak, not the
//! pretrigger rotation the catalog builder applies: a template starts
//! [`PEAK_LEAD_IN`] samples before its peak.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use log::{debug, warn};

mod error;


pub use error::TemplateError;

use crate::catalog::{
    resize_waveform, Catalog, LengthPolicy, DEFAULT_SAMPLING_PERIOD,
    DEFAULT_TARGET_SAMPLING_PERIOD,
};
use crate::dsp;
use crate::formats::write_samples;
use crate::record::{WaveformRecord, WaveformType};

/// Samples kept ahead of the peak when a template is cut.
pub const PEAK_LEAD_IN: usize = 10;

/// Parameters for one template-generation batch.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Sampling period of the source laser waveforms.
    pub source_period: f64,
    /// Sampling period of the synthesized templates.
    pub target_period: f64,
    /// Length of the persisted templates.
    pub max_length: usize,
    /// Root of the persisted output tree.
    pub output_root: PathBuf,
    /// Skip pairs with missing components instead of aborting the batch.
    pub continue_on_missing: bool,
}

impl GeneratorConfig {
    /// Config with the default periods (4 ns source, 16 ns target).
    pub fn new(output_root: impl Into<PathBuf>, max_length: usize) -> Self {
        Self {
            source_period: DEFAULT_SAMPLING_PERIOD,
            target_period: DEFAULT_TARGET_SAMPLING_PERIOD,
            max_length,
            output_root: output_root.into(),
            continue_on_missing: false,
        }
    }
}

/// Deterministic output path for a synthesized template record.
pub fn template_path(output_root: &Path, record: &WaveformRecord) -> PathBuf {
    output_root
        .join(&record.model)
        .join(record.kind.folder_name())
        .join(format!("{}.txt", record.name))
}

/// Synthesize and persist one template per (model, overvoltage) pair.
///
/// A missing laser or SPE component is fatal for the whole batch unless
/// `continue_on_missing` is set, in which case the pair is logged and
/// skipped. Write failures recover once via directory creation; a second
/// failure aborts.
pub fn generate_templates(
    catalog: &Catalog,
    config: &GeneratorConfig,
    pairs: &[(String, u8)],
) -> Result<Vec<WaveformRecord>, TemplateError> {
    let mut generated = Vec::with_capacity(pairs.len());
    for (model, overvoltage) in pairs {
        match synthesize(catalog, config, model, *overvoltage) {
            Ok(record) => {
                let path = persist(&record, config)?;
                debug!("wrote template {}", path.display());
                generated.push(record);
            }
            Err(err @ TemplateError::MissingComponent { .. }) if config.continue_on_missing => {
                warn!("skipping {model} OV{overvoltage}: {err}");
            }
            Err(err) => return Err(err),
        }
    }
    Ok(generated)
}

/// Derive one template record from the catalog's laser and SPE components.
pub fn synthesize(
    catalog: &Catalog,
    config: &GeneratorConfig,
    model: &str,
    overvoltage: u8,
) -> Result<WaveformRecord, TemplateError> {
    let laser = component(catalog, model, WaveformType::Laser, overvoltage)?;
    let spe = component(catalog, model, WaveformType::Spe, overvoltage)?;

    if laser.amplitude <= 0.0 {
        return Err(TemplateError::DegenerateComponent {
            model: model.to_string(),
            overvoltage,
        });
    }

    // Scale the laser pulse so its peak equals the SPE peak amplitude.
    let scale = spe.amplitude / laser.amplitude;
    let mut samples: Vec<f64> = laser.samples.iter().map(|v| v * scale).collect();

    if config.target_period != config.source_period {
        samples = dsp::resample(
            &samples,
            1.0 / config.source_period,
            1.0 / config.target_period,
        );
    }

    // Cut the template to start PEAK_LEAD_IN samples ahead of the peak.
    if let Some(peak) = dsp::peak_index(&samples) {
        samples.drain(..peak.saturating_sub(PEAK_LEAD_IN));
    }

    let (samples, _) = resize_waveform(
        samples,
        0,
        LengthPolicy {
            target: Some(config.max_length),
            same_length: true,
        },
    );

    let name = format!("{model}_SPE_CAEN_OV{overvoltage}");
    Ok(WaveformRecord::from_samples(
        laser.institution.clone(),
        name,
        model,
        WaveformType::Template,
        overvoltage,
        config.target_period,
        samples,
    ))
}

fn component<'a>(
    catalog: &'a Catalog,
    model: &str,
    kind: WaveformType,
    overvoltage: u8,
) -> Result<&'a WaveformRecord, TemplateError> {
    catalog
        .first(model, kind, overvoltage)
        .ok_or_else(|| TemplateError::MissingComponent {
            model: model.to_string(),
            kind,
            overvoltage,
        })
}

/// Persist one template as flat numeric text, one sample per line.
///
/// The first write attempt may fail because an intermediate directory is
/// missing; the recovery is to create the full path and retry exactly once.
fn persist(record: &WaveformRecord, config: &GeneratorConfig) -> Result<PathBuf, TemplateError> {
    let path = template_path(&config.output_root, record);
    if let Err(first) = write_flat(&path, &record.samples) {
        debug!(
            "write failed ({first}), creating directories for {}",
            path.display()
        );
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        write_flat(&path, &record.samples)?;
    }
    Ok(path)
}

fn write_flat(path: &Path, samples: &[f64]) -> std::io::Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    write_samples(&mut out, samples)?;
    out.flush()
}
