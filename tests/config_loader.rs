use std::time::Duration;

use tempfile::TempDir;
use unistate::config::{ConfigError, PresentationConfig, RuntimeConfig, StoreConfig};

/// Test that RuntimeConfig::default() produces the documented values.
#[test]
fn test_config_default_values() {
    let config = RuntimeConfig::default();

    assert_eq!(config.store.history_capacity, 100);
    assert_eq!(config.presentation.animation_ms, 300);
    assert_eq!(config.presentation.timeout_multiplier, 2.0);
    assert_eq!(config.presentation.timeout(), Duration::from_millis(600));
}

/// Test validation passes for the default config.
#[test]
fn test_validation_passes_for_default() {
    assert!(RuntimeConfig::default().validate().is_ok());
}

/// Test that a partial file fills the rest from defaults.
#[test]
fn test_parse_partial_toml() {
    let config = RuntimeConfig::from_toml_str(
        r#"
[presentation]
animation_ms = 250
"#,
    )
    .unwrap();

    assert_eq!(config.presentation.animation(), Duration::from_millis(250));
    assert_eq!(config.presentation.timeout_multiplier, 2.0);
    assert_eq!(config.store, StoreConfig::default());
}

/// Test validation fails for a negative animation duration.
#[test]
fn test_validation_fails_negative_animation() {
    let result = RuntimeConfig::from_toml_str(
        r#"
[presentation]
animation_ms = -10
"#,
    );

    match result.unwrap_err() {
        ConfigError::ValidationError { message } => {
            assert!(message.contains("animation_ms"));
        }
        other => panic!("Expected ValidationError, got {other:?}"),
    }
}

/// Test validation fails when the timeout could beat the animation.
#[test]
fn test_validation_fails_small_multiplier() {
    let config = RuntimeConfig {
        store: StoreConfig::default(),
        presentation: PresentationConfig {
            animation_ms: 300,
            timeout_multiplier: 0.5,
        },
    };

    match config.validate().unwrap_err() {
        ConfigError::ValidationError { message } => {
            assert!(message.contains("timeout_multiplier"));
        }
        other => panic!("Expected ValidationError, got {other:?}"),
    }
}

/// Test that malformed TOML is reported as a parse error.
#[test]
fn test_parse_invalid_toml() {
    let result = RuntimeConfig::from_toml_str("[store\nhistory_capacity = ");
    assert!(matches!(result, Err(ConfigError::InvalidToml(_))));
}

/// Test that a missing file yields defaults.
#[test]
fn test_load_missing_file_returns_default() {
    let dir = TempDir::new().unwrap();
    let config = RuntimeConfig::load_from(&dir.path().join("absent.toml")).unwrap();
    assert_eq!(config, RuntimeConfig::default());
}

/// Test loading a file from disk.
#[test]
fn test_load_from_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("unistate.toml");
    std::fs::write(
        &path,
        r#"
[store]
history_capacity = 0

[presentation]
animation_ms = 150
timeout_multiplier = 3.0
"#,
    )
    .unwrap();

    let config = RuntimeConfig::load_from(&path).unwrap();
    assert_eq!(config.store.history_capacity, 0);
    assert_eq!(config.presentation.timeout(), Duration::from_millis(450));
}

/// Test that a file with bad syntax reports its path.
#[test]
fn test_load_invalid_file_reports_path() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.toml");
    std::fs::write(&path, "history_capacity = [").unwrap();

    match RuntimeConfig::load_from(&path).unwrap_err() {
        ConfigError::ParseError { path: reported, .. } => assert_eq!(reported, path),
        other => panic!("Expected ParseError, got {other:?}"),
    }
}
