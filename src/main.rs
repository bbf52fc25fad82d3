//! # wvfcat CLI
//!
//! Command-line front end for the waveform template catalog.
//!
//! ## Usage
//!
//! ```bash
//! # Catalog a template hierarchy and export a CSV summary
//! wvfcat build templates/ --csv catalog.csv
//!
//! # Synthesize SPE-scaled templates for two operating points
//! wvfcat generate templates/ derived/ -p XM202:2 -p XM202:3
//!
//! # Inspect a hierarchy
//! wvfcat info templates/
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::info;

use wvfcat::catalog::{BuildConfig, Catalog, CatalogBuilder, FileConfig};
use wvfcat::record::WaveformType;
use wvfcat::templates::{generate_templates, GeneratorConfig};

/// wvfcat - Waveform Template Catalog for Detector Calibration
#[derive(Parser)]
#[command(name = "wvfcat")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Verbosity level (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a catalog from a template hierarchy
    Build {
        /// Template root, organized as root/{model}/{type}/{file}
        #[arg(value_name = "ROOT")]
        root: PathBuf,

        /// Pretrigger sample index the waveform peaks align to
        #[arg(long)]
        pretrigger: Option<usize>,

        /// Sampling period of the source files, in seconds
        #[arg(short = 's', long)]
        sampling_period: Option<f64>,

        /// Resample every waveform to this period, in seconds
        #[arg(short = 'r', long, value_name = "PERIOD")]
        resample_to: Option<f64>,

        /// Pad/truncate every waveform to exactly this length
        #[arg(short = 'l', long)]
        length: Option<usize>,

        /// Keep each waveform at its own length
        #[arg(long)]
        no_same_length: bool,

        /// Only catalog these type folders (e.g. LASER,SPE)
        #[arg(long, value_delimiter = ',', value_name = "TYPE")]
        types: Vec<WaveformType>,

        /// TOML config file with [build] overrides
        #[arg(short = 'c', long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Export the full catalog as JSON
        #[arg(long, value_name = "FILE")]
        json: Option<PathBuf>,

        /// Export a scalar summary as CSV
        #[arg(long, value_name = "FILE")]
        csv: Option<PathBuf>,
    },

    /// Synthesize SPE-scaled templates and persist them
    Generate {
        /// Template root, organized as root/{model}/{type}/{file}
        #[arg(value_name = "ROOT")]
        root: PathBuf,

        /// Output root for the persisted templates
        #[arg(value_name = "OUTPUT")]
        output: PathBuf,

        /// (model, overvoltage) pair as MODEL:OV; repeatable. Defaults to
        /// every pair with both a LASER and an SPE component
        #[arg(short = 'p', long = "pair", value_name = "MODEL:OV", value_parser = parse_pair)]
        pairs: Vec<(String, u8)>,

        /// Length of the persisted templates
        #[arg(short = 'm', long, default_value = "5000")]
        max_length: usize,

        /// Sampling period of the source files, in seconds
        #[arg(short = 's', long)]
        sampling_period: Option<f64>,

        /// Sampling period of the synthesized templates, in seconds
        #[arg(short = 't', long)]
        target_period: Option<f64>,

        /// Skip pairs with missing components instead of aborting
        #[arg(long)]
        continue_on_missing: bool,

        /// TOML config file with [build]/[generate] overrides
        #[arg(short = 'c', long, value_name = "FILE")]
        config: Option<PathBuf>,
    },

    /// Display a summary of a template hierarchy
    Info {
        /// Template root, organized as root/{model}/{type}/{file}
        #[arg(value_name = "ROOT")]
        root: PathBuf,

        /// TOML config file with [build] overrides
        #[arg(short = 'c', long, value_name = "FILE")]
        config: Option<PathBuf>,
    },
}

/// Parse a MODEL:OV pair argument.
fn parse_pair(value: &str) -> Result<(String, u8), String> {
    let (model, ov) = value
        .rsplit_once(':')
        .ok_or_else(|| format!("expected MODEL:OV, got {value:?}"))?;
    if model.is_empty() {
        return Err(format!("empty model in {value:?}"));
    }
    let ov: u8 = ov
        .parse()
        .map_err(|_| format!("overvoltage must be an integer, got {ov:?}"))?;
    if ov > 3 {
        return Err(format!("overvoltage must be 0-3, got {ov}"));
    }
    Ok((model.to_string(), ov))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    match cli.command {
        Commands::Build {
            root,
            pretrigger,
            sampling_period,
            resample_to,
            length,
            no_same_length,
            types,
            config,
            json,
            csv,
        } => run_build(
            root,
            pretrigger,
            sampling_period,
            resample_to,
            length,
            no_same_length,
            types,
            config,
            json,
            csv,
        ),
        Commands::Generate {
            root,
            output,
            pairs,
            max_length,
            sampling_period,
            target_period,
            continue_on_missing,
            config,
        } => run_generate(
            root,
            output,
            pairs,
            max_length,
            sampling_period,
            target_period,
            continue_on_missing,
            config,
        ),
        Commands::Info { root, config } => run_info(root, config),
    }
}

/// Load the optional TOML config file layer.
fn load_file_config(path: Option<&PathBuf>) -> Result<FileConfig> {
    match path {
        Some(path) => FileConfig::from_file(path)
            .with_context(|| format!("failed to load config file {}", path.display())),
        None => Ok(FileConfig::default()),
    }
}

/// Resolve a build configuration: defaults, then the config file, then flags.
#[allow(clippy::too_many_arguments)]
fn resolve_build_config(
    file: &FileConfig,
    pretrigger: Option<usize>,
    sampling_period: Option<f64>,
    resample_to: Option<f64>,
    length: Option<usize>,
    no_same_length: bool,
    types: Vec<WaveformType>,
) -> BuildConfig {
    let mut config = BuildConfig::default();
    file.build.apply(&mut config);

    if let Some(pretrigger) = pretrigger {
        config.pretrigger = pretrigger;
    }
    if let Some(period) = sampling_period {
        config.sampling_period = period;
    }
    if let Some(period) = resample_to {
        config.convert_sampling = true;
        config.target_sampling_period = period;
    }
    if let Some(length) = length {
        config.target_length = Some(length);
    }
    if no_same_length {
        config.same_length = false;
    }
    if !types.is_empty() {
        config.types = Some(types);
    }
    config
}

#[allow(clippy::too_many_arguments)]
fn run_build(
    root: PathBuf,
    pretrigger: Option<usize>,
    sampling_period: Option<f64>,
    resample_to: Option<f64>,
    length: Option<usize>,
    no_same_length: bool,
    types: Vec<WaveformType>,
    config: Option<PathBuf>,
    json: Option<PathBuf>,
    csv: Option<PathBuf>,
) -> Result<()> {
    let file = load_file_config(config.as_ref())?;
    let build = resolve_build_config(
        &file,
        pretrigger,
        sampling_period,
        resample_to,
        length,
        no_same_length,
        types,
    );

    let catalog = CatalogBuilder::new(build)
        .build(&root)
        .with_context(|| format!("failed to catalog {}", root.display()))?;
    info!("cataloged {} waveforms", catalog.len());

    if let Some(path) = json {
        catalog
            .write_json(&path)
            .with_context(|| format!("failed to write {}", path.display()))?;
        println!("Wrote {}", path.display());
    }
    if let Some(path) = csv {
        catalog
            .write_csv(&path)
            .with_context(|| format!("failed to write {}", path.display()))?;
        println!("Wrote {}", path.display());
    }

    println!(
        "Cataloged {} waveforms across {} models",
        catalog.len(),
        catalog.models().len()
    );
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn run_generate(
    root: PathBuf,
    output: PathBuf,
    pairs: Vec<(String, u8)>,
    max_length: usize,
    sampling_period: Option<f64>,
    target_period: Option<f64>,
    continue_on_missing: bool,
    config: Option<PathBuf>,
) -> Result<()> {
    let file = load_file_config(config.as_ref())?;
    let build = resolve_build_config(&file, None, None, None, None, false, Vec::new());

    let catalog = CatalogBuilder::new(build)
        .build(&root)
        .with_context(|| format!("failed to catalog {}", root.display()))?;
    info!("cataloged {} waveforms", catalog.len());

    let mut generator = GeneratorConfig::new(output, max_length);
    if let Some(period) = file.generate.sampling_period {
        generator.source_period = period;
    }
    if let Some(period) = file.generate.target_sampling_period {
        generator.target_period = period;
    }
    if let Some(length) = file.generate.max_length {
        generator.max_length = length;
    }
    if let Some(skip) = file.generate.continue_on_missing {
        generator.continue_on_missing = skip;
    }
    if let Some(period) = sampling_period {
        generator.source_period = period;
    }
    if let Some(period) = target_period {
        generator.target_period = period;
    }
    if continue_on_missing {
        generator.continue_on_missing = true;
    }

    let pairs = if pairs.is_empty() {
        let derived = complete_pairs(&catalog);
        info!("no pairs requested, derived {} from the catalog", derived.len());
        derived
    } else {
        pairs
    };
    if pairs.is_empty() {
        anyhow::bail!("no (model, overvoltage) pairs to generate");
    }

    let templates = generate_templates(&catalog, &generator, &pairs)
        .context("template generation failed")?;

    for template in &templates {
        println!(
            "Wrote {}",
            wvfcat::templates::template_path(&generator.output_root, template).display()
        );
    }
    println!("Synthesized {} templates", templates.len());
    Ok(())
}

/// Every (model, overvoltage) pair with both a LASER and an SPE component.
fn complete_pairs(catalog: &Catalog) -> Vec<(String, u8)> {
    let mut pairs = Vec::new();
    for model in catalog.models() {
        for ov in 0..=3u8 {
            if catalog.first(model, WaveformType::Laser, ov).is_some()
                && catalog.first(model, WaveformType::Spe, ov).is_some()
            {
                pairs.push((model.to_string(), ov));
            }
        }
    }
    pairs
}

fn run_info(root: PathBuf, config: Option<PathBuf>) -> Result<()> {
    let file = load_file_config(config.as_ref())?;
    let build = resolve_build_config(&file, None, None, None, None, false, Vec::new());

    let catalog = CatalogBuilder::new(build)
        .build(&root)
        .with_context(|| format!("failed to catalog {}", root.display()))?;

    print_header("wvfcat Catalog Summary");
    println!("Root: {}", root.display());
    println!("Records: {}", catalog.len());
    println!();

    for model in catalog.models() {
        print_header(&format!("Model {model}"));
        for record in catalog.iter().filter(|r| r.model == model) {
            println!(
                "  {:8} OV{}  {:32} len {:6}  amp {:10.3}  int {:12.3}",
                record.kind.folder_name(),
                record.overvoltage,
                record.name,
                record.len(),
                record.amplitude,
                record.integral
            );
        }
        println!();
    }
    Ok(())
}

#[cfg(feature = "colorized_output")]
fn print_header(text: &str) {
    println!("{}", console::style(text).bold().cyan());
}

#[cfg(not(feature = "colorized_output"))]
fn print_header(text: &str) {
    println!("{text}");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_pair() {
        assert_eq!(parse_pair("XM202:2").unwrap(), ("XM202".to_string(), 2));
        assert_eq!(parse_pair("A:B:1").unwrap(), ("A:B".to_string(), 1));
        assert!(parse_pair("XM202").is_err());
        assert!(parse_pair(":1").is_err());
        assert!(parse_pair("XM202:9").is_err());
        assert!(parse_pair("XM202:x").is_err());
    }

    #[test]
    fn test_resolve_build_config_precedence() {
        let file = FileConfig::from_toml("[build]\npretrigger = 50\nsampling_period = 2e-9\n")
            .expect("valid toml");
        let config = resolve_build_config(&file, Some(80), None, Some(16e-9), None, true, Vec::new());
        // CLI flag beats the file layer; the file layer beats the default.
        assert_eq!(config.pretrigger, 80);
        assert_eq!(config.sampling_period, 2e-9);
        assert!(config.convert_sampling);
        assert!(!config.same_length);
    }
}
