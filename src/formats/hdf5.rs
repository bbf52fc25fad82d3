//! Structured hierarchical container format (HDF5).
//!
//! Opens the file, takes the first stored object (sorted member order), and
//! uses its value array as the waveform. Gated behind the `hdf5` cargo
//! feature because it links against a system libhdf5.

use std::path::Path;

use super::{FormatError, WaveformParser};

/// Parser for HDF5 waveform containers.
pub struct Hdf5Parser;

impl WaveformParser for Hdf5Parser {
    fn extensions(&self) -> &'static [&'static str] {
        &["h5", "hdf5"]
    }

    fn parse(&self, path: &Path) -> Result<Vec<f64>, FormatError> {
        let file = hdf5::File::open(path)?;
        let mut names = file.member_names()?;
        names.sort_unstable();
        let first = names
            .into_iter()
            .next()
            .ok_or_else(|| FormatError::EmptyContainer(path.display().to_string()))?;
        let dataset = file.dataset(&first)?;
        Ok(dataset.read_raw::<f64>()?)
    }
}
