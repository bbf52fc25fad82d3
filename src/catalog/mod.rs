//! Template catalog: directory walk, normalization, and the record
//! collection.
//!
//! A catalog pass walks a `root/{model}/{type}/{file}` hierarchy and emits
//! one [`WaveformRecord`] per recognized file, after optional resampling,
//! length reconciliation, and peak alignment. The pass is single-threaded
//! and fails fast: the first unrecoverable error aborts it with no partial
//! catalog.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::debug;
use serde::Serialize;

mod config;
mod error;
mod normalize;

#[cfg(test)]
mod tests;

pub use config::{
    BuildConfig, BuildOverrides, FileConfig, GenerateOverrides, LengthPolicy,
    DEFAULT_INSTITUTION, DEFAULT_PRETRIGGER, DEFAULT_SAMPLING_PERIOD,
    DEFAULT_TARGET_SAMPLING_PERIOD,
};
pub use error::CatalogError;
pub use normalize::{align_peak, resize_waveform};

use crate::dsp;
use crate::formats::read_waveform;
use crate::record::{overvoltage_from_filename, WaveformRecord, WaveformType};

/// Ordered collection of waveform records from one build pass.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Catalog {
    records: Vec<WaveformRecord>,
}

impl Catalog {
    /// Empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record.
    pub fn push(&mut self, record: WaveformRecord) {
        self.records.push(record);
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True when the catalog holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All records, in emission order.
    pub fn records(&self) -> &[WaveformRecord] {
        &self.records
    }

    /// Iterate over the records.
    pub fn iter(&self) -> std::slice::Iter<'_, WaveformRecord> {
        self.records.iter()
    }

    /// First record matching model, type, and overvoltage.
    pub fn first(
        &self,
        model: &str,
        kind: WaveformType,
        overvoltage: u8,
    ) -> Option<&WaveformRecord> {
        self.records
            .iter()
            .find(|r| r.model == model && r.kind == kind && r.overvoltage == overvoltage)
    }

    /// Sorted, deduplicated model names.
    pub fn models(&self) -> Vec<&str> {
        let mut models: Vec<&str> = self.records.iter().map(|r| r.model.as_str()).collect();
        models.sort_unstable();
        models.dedup();
        models
    }

    /// Copy of the catalog with every waveform divided by its own peak
    /// amplitude.
    pub fn normalized(&self) -> Self {
        Self {
            records: self.records.iter().map(WaveformRecord::normalized).collect(),
        }
    }

    /// Write the full catalog as JSON, stamped with the generation time.
    pub fn write_json(&self, path: &Path) -> Result<(), CatalogError> {
        #[derive(Serialize)]
        struct Document<'a> {
            generated_at: String,
            records: &'a [WaveformRecord],
        }

        let document = Document {
            generated_at: chrono::Utc::now().to_rfc3339(),
            records: &self.records,
        };
        let file = io::BufWriter::new(fs::File::create(path)?);
        serde_json::to_writer_pretty(file, &document)?;
        Ok(())
    }

    /// Write a scalar-column summary as CSV (waveform arrays omitted).
    pub fn write_csv(&self, path: &Path) -> Result<(), CatalogError> {
        let mut writer = csv::Writer::from_path(path)?;
        writer.write_record([
            "institution",
            "name",
            "model",
            "type",
            "overvoltage",
            "sampling_period",
            "amplitude",
            "integral",
            "length",
        ])?;
        for record in &self.records {
            let overvoltage = record.overvoltage.to_string();
            let sampling_period = record.sampling_period.to_string();
            let amplitude = record.amplitude.to_string();
            let integral = record.integral.to_string();
            let length = record.len().to_string();
            writer.write_record([
                record.institution.as_str(),
                record.name.as_str(),
                record.model.as_str(),
                record.kind.folder_name(),
                overvoltage.as_str(),
                sampling_period.as_str(),
                amplitude.as_str(),
                integral.as_str(),
                length.as_str(),
            ])?;
        }
        writer.flush()?;
        Ok(())
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a WaveformRecord;
    type IntoIter = std::slice::Iter<'a, WaveformRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

impl From<Vec<WaveformRecord>> for Catalog {
    fn from(records: Vec<WaveformRecord>) -> Self {
        Self { records }
    }
}

/// Walks a template hierarchy and assembles a [`Catalog`].
pub struct CatalogBuilder {
    config: BuildConfig,
}

impl CatalogBuilder {
    /// Builder with the given pass configuration.
    pub fn new(config: BuildConfig) -> Self {
        Self { config }
    }

    /// The pass configuration.
    pub fn config(&self) -> &BuildConfig {
        &self.config
    }

    /// Build a catalog from `root/{model}/{type}/{file}`.
    ///
    /// Directory listings are sorted, so record order is deterministic.
    /// Files no parser recognizes are skipped; everything else that fails
    /// aborts the pass.
    pub fn build<P: AsRef<Path>>(&self, root: P) -> Result<Catalog, CatalogError> {
        let root = root.as_ref();
        if !root.is_dir() {
            return Err(CatalogError::InvalidRoot(root.display().to_string()));
        }

        let policy = self.config.length_policy();
        let period = self.config.effective_period();
        let mut catalog = Catalog::new();
        let mut max_length = 0usize;

        for model_dir in sorted_entries(root, EntryKind::Dir)? {
            let model = entry_name(&model_dir);
            debug!("loading model {model}");

            for type_dir in sorted_entries(&model_dir, EntryKind::Dir)? {
                let kind = WaveformType::from_folder(&entry_name(&type_dir));
                if !self.config.allows(kind) {
                    continue;
                }

                for file in sorted_entries(&type_dir, EntryKind::File)? {
                    let name = entry_name(&file);
                    let overvoltage = overvoltage_from_filename(&name);

                    let Some(raw) = read_waveform(&file)? else {
                        continue;
                    };

                    let raw = if self.config.convert_sampling {
                        // Rates are the exact reciprocals of the configured
                        // periods.
                        dsp::resample(
                            &raw,
                            1.0 / self.config.sampling_period,
                            1.0 / self.config.target_sampling_period,
                        )
                    } else {
                        raw
                    };

                    let (resized, new_max) = resize_waveform(raw, max_length, policy);
                    max_length = new_max;

                    let moved = dsp::peak_index(&resized)
                        .is_some_and(|peak| peak != self.config.pretrigger);
                    let aligned = align_peak(resized, self.config.pretrigger);
                    if moved {
                        debug!(
                            "aligned {} OV{} integral {}",
                            model,
                            overvoltage,
                            dsp::positive_integral(&aligned)
                        );
                    }

                    catalog.push(WaveformRecord::from_samples(
                        self.config.institution.clone(),
                        name,
                        model.clone(),
                        kind,
                        overvoltage,
                        period,
                        aligned,
                    ));
                }
            }
        }

        Ok(catalog)
    }
}

#[derive(Clone, Copy, PartialEq)]
enum EntryKind {
    Dir,
    File,
}

/// Sorted directory entries of one kind.
fn sorted_entries(dir: &Path, kind: EntryKind) -> Result<Vec<PathBuf>, io::Error> {
    let mut entries = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let matches = match kind {
            EntryKind::Dir => path.is_dir(),
            EntryKind::File => path.is_file(),
        };
        if matches {
            entries.push(path);
        }
    }
    entries.sort_unstable();
    Ok(entries)
}

fn entry_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}
