use super::*;
use crate::capability::classifier::PerformanceTier;
use serde_json::json;

#[test]
fn empty_object_is_default_config() {
    let cfg = EngineConfig::from_json_str("{}").unwrap();
    assert_eq!(cfg, EngineConfig::default());
}

#[test]
fn tier_table_yields_6_9_12_for_twelve_blobs() {
    let cfg = EngineConfig::default();
    let counts: Vec<usize> = PerformanceTier::ALL
        .iter()
        .map(|t| cfg.tiers.profile(*t).blob_count(cfg.max_blobs))
        .collect();
    assert_eq!(counts, vec![6, 9, 12]);
}

#[test]
fn parses_palette_and_overrides() {
    let v = json!({
        "palette": [
            {"primary": {"h": 0, "s": 50, "l": 50}, "secondary": [180, 50, 50]}
        ],
        "max_blobs": 4,
        "rotations": [0.0, 90.0],
        "positions": [0.5, 0.5],
        "tiers": {"low": {"blob_fraction": 0.25, "target_fps": 24.0, "blur_px": 4}}
    });
    let cfg = EngineConfig::from_json_str(&v.to_string()).unwrap();
    assert_eq!(cfg.palette.len(), 1);
    assert_eq!(cfg.palette[0].secondary.h, 180.0);
    assert_eq!(cfg.rotations, Some(PerItem::Each(vec![0.0, 90.0])));
    assert_eq!(cfg.positions, Some(PerItem::Uniform([0.5, 0.5])));
    assert_eq!(cfg.tiers.low.blur_px, 4);
    assert_eq!(cfg.tiers.high, TierTable::default().high);
}

#[test]
fn rejects_malformed_configs() {
    for bad in [
        json!({"palette": []}),
        json!({"palette": [{"primary": [0, 50], "secondary": [0, 50, 50]}]}),
        json!({"palette": [{"primary": ["x", 50, 50], "secondary": [0, 50, 50]}]}),
        json!({"max_blobs": 0}),
        json!({"max_blobs": 51}),
        json!({"buffer_px": 4}),
        json!({"momentum": {"decay_constant": 1.0}}),
        json!({"dirty": {"merge_overlap": 0.0}}),
        json!({"blob": {"speed_min": 5.0, "speed_max": 1.0}}),
        json!({"blob": {"scale_min": 2e6, "scale_max": 2e6, "size_multiplier": 1000.0}}),
        json!({"blob": {"min_size": 4096.0}}),
        json!({"ramp_len": 2, "palette": [
            {"primary": [0, 50, 50], "secondary": [0, 50, 50]},
            {"primary": [100, 50, 50], "secondary": [100, 50, 50]},
            {"primary": [200, 50, 50], "secondary": [200, 50, 50]}
        ]}),
        json!({"unknown_field": true}),
    ] {
        let err = EngineConfig::from_json_str(&bad.to_string()).unwrap_err();
        assert!(err.to_string().contains("config error:"), "{bad}: {err}");
    }
}

#[test]
fn missing_file_is_config_error() {
    let err = EngineConfig::from_json_path("/definitely/not/here.json").unwrap_err();
    assert!(matches!(err, BlobscapeError::Config(_)));
}

#[test]
fn ramp_len_may_undercut_a_single_pair_palette() {
    let v = json!({
        "palette": [{"primary": [0, 50, 50], "secondary": [10, 50, 50]}],
        "ramp_len": 2
    });
    assert!(EngineConfig::from_json_str(&v.to_string()).is_ok());
}

#[test]
fn largest_blob_size_is_accepted_at_the_bound() {
    let mut cfg = EngineConfig::default();
    cfg.blob.scale_max = 2.0;
    cfg.blob.size_multiplier = MAX_BLOB_SIZE_PX / 2.0;
    assert!(cfg.validate().is_ok());
    cfg.blob.size_multiplier += 1.0;
    assert!(matches!(cfg.validate(), Err(BlobscapeError::Config(_))));
}
