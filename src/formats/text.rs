//! Flat numeric text format: one sample value per whitespace-separated
//! token. This is both an input format and the persistence format for
//! synthesized templates, so writes round-trip through [`TextParser`].

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use super::{FormatError, WaveformParser};

/// Parser for plain-text numeric waveform files.
pub struct TextParser;

impl WaveformParser for TextParser {
    fn extensions(&self) -> &'static [&'static str] {
        &["txt", "dat"]
    }

    fn parse(&self, path: &Path) -> Result<Vec<f64>, FormatError> {
        let content = fs::read_to_string(path)?;
        content
            .split_whitespace()
            .map(|token| {
                token.parse::<f64>().map_err(|_| FormatError::InvalidValue {
                    path: path.display().to_string(),
                    value: token.to_string(),
                })
            })
            .collect()
    }
}

/// Write samples as flat numeric text, one per line.
pub fn write_samples<W: Write>(out: &mut W, samples: &[f64]) -> io::Result<()> {
    for sample in samples {
        writeln!(out, "{sample}")?;
    }
    Ok(())
}
