use crate::record::WaveformType;

/// Errors from template synthesis and persistence.
#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    /// The catalog holds no component of this kind for the requested pair.
    #[error("no {kind} waveform for model {model} at OV{overvoltage}")]
    MissingComponent {
        /// Requested model.
        model: String,
        /// Component kind that was missing.
        kind: WaveformType,
        /// Requested overvoltage.
        overvoltage: u8,
    },

    /// The laser component has no positive peak to scale against.
    #[error("laser waveform for model {model} at OV{overvoltage} has no positive peak")]
    DegenerateComponent {
        /// Requested model.
        model: String,
        /// Requested overvoltage.
        overvoltage: u8,
    },

    /// I/O error persisting a template (after the one directory-creation
    /// retry).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
