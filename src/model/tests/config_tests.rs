//! Host configuration defaults and JSON loading.

use crate::model::{HostConfig, HostConfigError};
use camino::Utf8PathBuf;
use rstest::rstest;

#[rstest]
fn defaults_discover_and_validate() {
    let config = HostConfig::default();
    assert!(config.discover_on_build);
    assert!(config.validate_attribute_data);
    assert!(!config.retain_instances_on_reset);
    assert!(config.required_sections.is_empty());
    assert!(config.manifest_path.is_none());
}

#[rstest]
fn lenient_config_skips_attribute_validation() {
    let config = HostConfig::lenient();
    assert!(!config.validate_attribute_data);
    assert!(config.discover_on_build);
}

#[rstest]
fn builders_set_sections_and_manifest_path() {
    let config = HostConfig::default()
        .with_required_sections(["site", "climate"])
        .with_manifest_path("plugins/manifest.json");
    assert_eq!(config.required_sections, ["site", "climate"]);
    assert_eq!(
        config.manifest_path,
        Some(Utf8PathBuf::from("plugins/manifest.json"))
    );
}

#[rstest]
#[case::empty_document("{}", HostConfig::default())]
#[case::single_switch(
    r#"{"retain_instances_on_reset": true}"#,
    HostConfig { retain_instances_on_reset: true, ..HostConfig::default() }
)]
#[case::sections(
    r#"{"required_sections": ["site"], "validate_attribute_data": false}"#,
    HostConfig::lenient().with_required_sections(["site"])
)]
fn partial_json_fills_defaults(#[case] json: &str, #[case] expected: HostConfig) {
    let config = HostConfig::from_json_str(json).expect("config should parse");
    assert_eq!(config, expected);
}

#[rstest]
#[case::not_json("discover_on_build = true")]
#[case::wrong_type(r#"{"discover_on_build": "yes"}"#)]
fn malformed_json_is_rejected(#[case] json: &str) {
    assert!(matches!(
        HostConfig::from_json_str(json),
        Err(HostConfigError::Parse(_))
    ));
}
