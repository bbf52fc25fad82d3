use std::fs;

use tempfile::tempdir;

use super::*;
use crate::record::WaveformType;

fn policy(target: Option<usize>, same_length: bool) -> LengthPolicy {
    LengthPolicy {
        target,
        same_length,
    }
}

#[test]
fn test_resize_pass_through_when_same_length_off() {
    let (wvf, max) = resize_waveform(vec![1.0, 2.0, 3.0], 10, policy(None, false));
    assert_eq!(wvf, vec![1.0, 2.0, 3.0]);
    assert_eq!(max, 3);
}

#[test]
fn test_resize_explicit_target_pads_and_truncates() {
    // Shorter than target: trailing zero-pad.
    let (wvf, max) = resize_waveform(vec![1.0, 2.0], 0, policy(Some(4), true));
    assert_eq!(wvf, vec![1.0, 2.0, 0.0, 0.0]);
    assert_eq!(max, 4);

    // Longer than target: truncate.
    let (wvf, max) = resize_waveform(vec![1.0, 2.0, 3.0, 4.0, 5.0], 0, policy(Some(4), true));
    assert_eq!(wvf, vec![1.0, 2.0, 3.0, 4.0]);
    assert_eq!(max, 4);

    // Output length is always exactly the target, whatever came in.
    for len in [0usize, 1, 4, 9] {
        let (wvf, _) = resize_waveform(vec![1.0; len], 7, policy(Some(4), true));
        assert_eq!(wvf.len(), 4);
    }
}

#[test]
fn test_resize_pads_to_running_max() {
    // Running max 5, new input length 3: padded, max unchanged.
    let (wvf, max) = resize_waveform(vec![7.0, 8.0, 9.0], 5, policy(None, true));
    assert_eq!(wvf, vec![7.0, 8.0, 9.0, 0.0, 0.0]);
    assert_eq!(max, 5);

    // A longer waveform passes through and raises the max.
    let (wvf, max) = resize_waveform(vec![1.0; 8], 5, policy(None, true));
    assert_eq!(wvf.len(), 8);
    assert_eq!(max, 8);
}

#[test]
fn test_align_rotates_late_peak() {
    // Peak at index 2, pretrigger 1: rotate left by 1, tail wraps.
    let aligned = align_peak(vec![0.0, 0.0, 5.0, 2.0, 0.0], 1);
    assert_eq!(aligned, vec![0.0, 5.0, 2.0, 0.0, 0.0]);
}

#[test]
fn test_align_pads_early_peak() {
    // Peak at index 0, pretrigger 2: push right with zeros, length kept.
    let aligned = align_peak(vec![9.0, 4.0, 1.0, 0.0], 2);
    assert_eq!(aligned, vec![0.0, 0.0, 9.0, 4.0]);
}

#[test]
fn test_align_wraps_leading_samples_to_tail() {
    let aligned = align_peak(vec![1.0, 2.0, 9.0, 3.0], 0);
    assert_eq!(aligned, vec![9.0, 3.0, 1.0, 2.0]);
}

#[test]
fn test_align_peak_lands_on_pretrigger() {
    for pretrigger in 0..5 {
        let wvf = vec![0.0, 1.0, 7.0, 2.0, 0.5];
        let aligned = align_peak(wvf, pretrigger);
        assert_eq!(crate::dsp::peak_index(&aligned), Some(pretrigger));
    }
}

#[test]
fn test_align_degenerate_inputs() {
    assert!(align_peak(Vec::new(), 3).is_empty());
    // Pretrigger beyond the waveform: nothing left but padding.
    assert_eq!(align_peak(vec![1.0, 2.0], 10), vec![0.0, 0.0]);
}

fn write_tree(root: &std::path::Path, files: &[(&str, &str, &str, &str)]) {
    for (model, kind, name, content) in files {
        let dir = root.join(model).join(kind);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(name), content).unwrap();
    }
}

#[test]
fn test_build_walks_hierarchy() {
    let dir = tempdir().unwrap();
    write_tree(
        dir.path(),
        &[
            ("XM202", "LASER", "laser_OV2.txt", "0 0 5 2 0"),
            ("XM202", "SPE", "spe_OV2.txt", "0 9 1"),
            ("XM202", "CALIB", "odd_OV1.txt", "1 2"),
            ("FBK", "NOISE", "baseline.txt", "0.5 -0.5 0.25"),
        ],
    );

    let config = BuildConfig {
        pretrigger: 1,
        ..BuildConfig::default()
    };
    let catalog = CatalogBuilder::new(config).build(dir.path()).unwrap();

    assert_eq!(catalog.len(), 4);
    // Deterministic order: models sorted, then type folders, then files.
    assert_eq!(catalog.records()[0].model, "FBK");
    assert_eq!(catalog.records()[0].kind, WaveformType::Noise);
    assert_eq!(catalog.models(), vec!["FBK", "XM202"]);

    let laser = catalog.first("XM202", WaveformType::Laser, 2).unwrap();
    assert_eq!(laser.name, "laser_OV2.txt");
    assert_eq!(laser.peak_index(), Some(1));
    assert_eq!(laser.amplitude, 5.0);
    assert_eq!(laser.integral, 7.0);

    // Unrecognized folder name classifies as UNKNOWN but is still read.
    let unknown = catalog.first("XM202", WaveformType::Unknown, 1).unwrap();
    assert_eq!(unknown.name, "odd_OV1.txt");
}

#[test]
fn test_build_same_length_batch() {
    let dir = tempdir().unwrap();
    write_tree(
        dir.path(),
        &[
            ("XM202", "LASER", "a_OV1.txt", "0 1 2 3 4 5"),
            ("XM202", "LASER", "b_OV1.txt", "0 9"),
            ("XM202", "LASER", "c_OV1.txt", "0 4 1"),
        ],
    );

    let config = BuildConfig {
        pretrigger: 0,
        target_length: Some(6),
        ..BuildConfig::default()
    };
    let catalog = CatalogBuilder::new(config).build(dir.path()).unwrap();

    assert_eq!(catalog.len(), 3);
    for record in &catalog {
        assert_eq!(record.len(), 6);
        assert_eq!(record.timebase.len(), 6);
        assert!(record.integral >= 0.0);
    }
}

#[test]
fn test_build_skips_unrecognized_formats() {
    let dir = tempdir().unwrap();
    write_tree(
        dir.path(),
        &[
            ("XM202", "LASER", "wave_OV1.txt", "0 5 1"),
            ("XM202", "LASER", "readme.md", "not a waveform"),
        ],
    );

    let catalog = CatalogBuilder::new(BuildConfig::default())
        .build(dir.path())
        .unwrap();
    assert_eq!(catalog.len(), 1);
    assert_eq!(catalog.records()[0].name, "wave_OV1.txt");
}

#[test]
fn test_build_type_allow_list() {
    let dir = tempdir().unwrap();
    write_tree(
        dir.path(),
        &[
            ("XM202", "LASER", "wave_OV1.txt", "0 5 1"),
            ("XM202", "NOISE", "noise.txt", "1 0 1"),
        ],
    );

    let config = BuildConfig {
        types: Some(vec![WaveformType::Laser]),
        ..BuildConfig::default()
    };
    let catalog = CatalogBuilder::new(config).build(dir.path()).unwrap();
    assert_eq!(catalog.len(), 1);
    assert_eq!(catalog.records()[0].kind, WaveformType::Laser);
}

#[test]
fn test_build_resamples_when_converting() {
    let dir = tempdir().unwrap();
    write_tree(
        dir.path(),
        &[("XM202", "LASER", "wave_OV1.txt", "0 0 0 0 8 8 8 8")],
    );

    let config = BuildConfig {
        pretrigger: 1,
        convert_sampling: true,
        sampling_period: 4e-9,
        target_sampling_period: 16e-9,
        ..BuildConfig::default()
    };
    let catalog = CatalogBuilder::new(config).build(dir.path()).unwrap();

    let record = &catalog.records()[0];
    // 8 samples at a 4 ns period collapse to floor(8/4) = 2 at 16 ns.
    assert_eq!(record.len(), 2);
    assert_eq!(record.sampling_period, 16e-9);
    assert!((record.timebase[1] - 16e-9).abs() < 1e-18);
}

#[test]
fn test_build_rejects_missing_root() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("nope");
    assert!(matches!(
        CatalogBuilder::new(BuildConfig::default()).build(&missing),
        Err(CatalogError::InvalidRoot(_))
    ));
}

#[test]
fn test_build_aborts_on_corrupt_claimed_file() {
    let dir = tempdir().unwrap();
    write_tree(dir.path(), &[("XM202", "LASER", "bad_OV1.txt", "1 junk 3")]);

    assert!(matches!(
        CatalogBuilder::new(BuildConfig::default()).build(dir.path()),
        Err(CatalogError::Format(_))
    ));
}

#[test]
fn test_catalog_exports() {
    let dir = tempdir().unwrap();
    write_tree(dir.path(), &[("XM202", "SPE", "spe_OV1.txt", "0 3 1")]);
    let catalog = CatalogBuilder::new(BuildConfig::default())
        .build(dir.path())
        .unwrap();

    let json_path = dir.path().join("catalog.json");
    catalog.write_json(&json_path).unwrap();
    let text = fs::read_to_string(&json_path).unwrap();
    assert!(text.contains("\"generated_at\""));
    assert!(text.contains("\"SPE\""));

    let csv_path = dir.path().join("catalog.csv");
    catalog.write_csv(&csv_path).unwrap();
    let text = fs::read_to_string(&csv_path).unwrap();
    assert!(text.starts_with("institution,name,model,type"));
    assert!(text.contains("spe_OV1.txt"));
}

#[test]
fn test_file_config_overrides() {
    let toml = r#"
        [build]
        pretrigger = 50
        convert_sampling = true
        types = ["LASER", "SPE"]

        [generate]
        max_length = 4000
    "#;
    let file = FileConfig::from_toml(toml).unwrap();

    let mut config = BuildConfig::default();
    file.build.apply(&mut config);
    assert_eq!(config.pretrigger, 50);
    assert!(config.convert_sampling);
    assert_eq!(
        config.types,
        Some(vec![WaveformType::Laser, WaveformType::Spe])
    );
    // Untouched fields keep their defaults.
    assert_eq!(config.sampling_period, DEFAULT_SAMPLING_PERIOD);
    assert_eq!(config.institution, DEFAULT_INSTITUTION);

    assert_eq!(file.generate.max_length, Some(4000));
    assert_eq!(file.generate.continue_on_missing, None);
}

#[test]
fn test_partial_file_config() {
    let file = FileConfig::from_toml("[build]\npretrigger = 10\n").unwrap();
    assert_eq!(file.build.pretrigger, Some(10));
    assert!(file.build.sampling_period.is_none());
}
