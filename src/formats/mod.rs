//! Waveform file parsers.
//!
//! Each supported on-disk format implements [`WaveformParser`];
//! [`read_waveform`] dispatches on the file extension. An extension no parser
//! claims is a normal "no result" outcome, not an error: the catalog builder
//! skips such files.
//!
//! Supported formats:
//!
//! - [`TextParser`] - flat numeric text, one sample per token (also the
//!   persistence format for synthesized templates, via [`write_samples`])
//! - [`NpzParser`] - packed numeric archives (ZIP of NPY members)
//! - `Hdf5Parser` - structured hierarchical containers (requires the `hdf5`
//!   feature and a system libhdf5)

use std::path::Path;

use log::debug;

mod error;
#[cfg(feature = "hdf5")]
mod hdf5;
mod npz;
mod text;


pub use error::FormatError;
#[cfg(feature = "hdf5")]
pub use self::hdf5::Hdf5Parser;
pub use npz::NpzParser;
pub use text::{write_samples, TextParser};

/// A single-format waveform parser, selected by file extension.
pub trait WaveformParser {
    /// Lowercase extensions this parser claims.
    fn extensions(&self) -> &'static [&'static str];

    /// Parse one waveform from the file.
    fn parse(&self, path: &Path) -> Result<Vec<f64>, FormatError>;
}

fn parsers() -> Vec<&'static dyn WaveformParser> {
    #[allow(unused_mut)]
    let mut registered: Vec<&'static dyn WaveformParser> = vec![&TextParser, &NpzParser];
    #[cfg(feature = "hdf5")]
    registered.push(&Hdf5Parser);
    registered
}

/// Read a single waveform, dispatching on the lowercased file extension.
///
/// Returns `Ok(None)` when no parser claims the extension; a parser failure
/// on a claimed extension is an error.
pub fn read_waveform(path: &Path) -> Result<Option<Vec<f64>>, FormatError> {
    debug!("reading waveform file {}", path.display());

    let extension = match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) => ext.to_ascii_lowercase(),
        None => {
            debug!("no extension on {}", path.display());
            return Ok(None);
        }
    };

    for parser in parsers() {
        if parser.extensions().contains(&extension.as_str()) {
            return parser.parse(path).map(Some);
        }
    }

    debug!("unrecognized waveform format: {}", path.display());
    Ok(None)
}
