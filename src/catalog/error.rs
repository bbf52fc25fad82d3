use crate::formats::FormatError;

/// Errors that abort a catalog-building pass.
///
/// There is no partial-catalog recovery: the first unrecoverable error stops
/// the whole pass.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// I/O error while walking the template hierarchy.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A parser failed on a file whose extension it claims.
    #[error("format error: {0}")]
    Format(#[from] FormatError),

    /// The configured root is not a directory.
    #[error("template root is not a directory: {0}")]
    InvalidRoot(String),

    /// Error parsing a TOML configuration file.
    #[error("config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Error serializing the catalog to JSON.
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// Error exporting the catalog summary as CSV.
    #[error("CSV export error: {0}")]
    Csv(#[from] csv::Error),
}
