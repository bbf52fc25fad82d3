/// Errors raised by waveform parsers.
///
/// An unrecognized extension is not an error: the dispatcher reports it as
/// `Ok(None)` and the catalog builder skips the file. These variants are the
/// failures of a parser that did claim the file, and they abort the pass.
#[derive(Debug, thiserror::Error)]
pub enum FormatError {
    /// I/O error while reading the file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A token could not be parsed as a sample value.
    #[error("invalid sample value {value:?} in {path}")]
    InvalidValue {
        /// File the token came from.
        path: String,
        /// Offending token.
        value: String,
    },

    /// Error from the ZIP container library.
    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// The archive holds no NPY member to read.
    #[error("archive {0} contains no NPY member")]
    EmptyArchive(String),

    /// The NPY payload violates the expected layout.
    #[error("malformed NPY payload in {path}: {reason}")]
    Npy {
        /// File the payload came from.
        path: String,
        /// What was wrong with it.
        reason: String,
    },

    /// Error from the HDF5 library.
    #[cfg(feature = "hdf5")]
    #[error("HDF5 error: {0}")]
    Hdf5(#[from] hdf5::Error),

    /// The HDF5 file holds no dataset to read.
    #[cfg(feature = "hdf5")]
    #[error("HDF5 file {0} contains no datasets")]
    EmptyContainer(String),
}
