//! # wvfcat - Waveform Template Catalog
//!
//! `wvfcat` ingests detector-calibration waveform files ("templates") from a
//! `root/{model}/{type}/{file}` directory hierarchy, normalizes their
//! sampling rate, peak alignment, and length, and assembles a unified
//! in-memory catalog. From the catalog it derives synthetic templates: laser
//! pulse shapes rescaled to the single-photo-electron amplitude of the same
//! operating point, persisted as flat numeric text files for downstream
//! signal-shape fitting.
//!
//! ## Key Features
//!
//! - **Multi-format ingestion**: plain numeric text, packed numeric archives
//!   (`.npz`), and optionally HDF5 containers, behind one capability-based
//!   parser interface. Unsupported extensions are skipped, not errors.
//!
//! - **Batch normalization**: interpolation-based resampling, a shared
//!   length-reconciliation policy with an explicit running-maximum
//!   accumulator, and peak alignment to a configurable pretrigger index.
//!
//! - **Synthetic templates**: per (model, overvoltage) pair, the laser shape
//!   is scaled by the SPE amplitude, resampled, cut just ahead of its peak,
//!   and written under a deterministic output path.
//!
//! - **Catalog exports**: JSON (full records) and CSV (scalar summary).
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use wvfcat::prelude::*;
//!
//! // Catalog every waveform under templates/{model}/{type}/
//! let catalog = CatalogBuilder::new(BuildConfig::default()).build("templates/")?;
//!
//! // Derive and persist one synthetic template per (model, overvoltage) pair
//! let config = GeneratorConfig::new("derived/", 5000);
//! let pairs = vec![("XM202".to_string(), 2)];
//! let templates = generate_templates(&catalog, &config, &pairs)?;
//! println!("synthesized {} templates", templates.len());
//! # Ok::<(), anyhow::Error>(())
//! ```
//!
//! ## Architecture
//!
//! The library is organized into the following modules:
//!
//! - [`record`]: waveform classification and the catalog data model
//! - [`formats`]: per-format parsers behind one extension-dispatched interface
//! - [`dsp`]: resampling, smoothing, and peak statistics
//! - [`catalog`]: directory walk, normalization pipeline, record collection
//! - [`templates`]: synthetic template generation and persistence
//!
//! The pipeline is single-threaded and fails fast: a catalog pass either
//! completes or stops at the first unrecoverable error, with no partial
//! output.

// Documentation lints - enforce complete documentation for publication
#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]

pub mod catalog;
pub mod dsp;
pub mod formats;
pub mod record;
pub mod templates;

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use crate::catalog::{
        align_peak, resize_waveform, BuildConfig, Catalog, CatalogBuilder, CatalogError,
        FileConfig, LengthPolicy,
    };
    pub use crate::dsp::{resample, savgol_smooth, DspError};
    pub use crate::formats::{read_waveform, FormatError, WaveformParser};
    pub use crate::record::{overvoltage_from_filename, WaveformRecord, WaveformType};
    pub use crate::templates::{
        generate_templates, template_path, GeneratorConfig, TemplateError,
    };
}
