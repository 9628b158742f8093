use super::*;
use serial_test::serial;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

fn with_env_vars<F, R>(vars: &[(&str, &str)], f: F) -> R
where
    F: FnOnce() -> R,
{
    // SAFETY: Test code only, we accept the thread-safety risk in tests.
    for (key, value) in vars {
        unsafe { env::set_var(key, value) };
    }

    let result = f();

    // SAFETY: Test code only, we accept the thread-safety risk in tests.
    for (key, _) in vars {
        unsafe { env::remove_var(key) };
    }

    result
}

fn clear_medguard_env() {
    // SAFETY: Test code only, we accept the thread-safety risk in tests.
    unsafe {
        env::remove_var("MEDGUARD_QDRANT_URL");
        env::remove_var("MEDGUARD_COLLECTION");
        env::remove_var("MEDGUARD_GROUND_TRUTH_PATH");
        env::remove_var("MEDGUARD_GOLDEN_PATH");
        env::remove_var("MEDGUARD_QUERY_TIMEOUT_MS");
        env::remove_var("MEDGUARD_HYBRID_ALPHA");
        env::remove_var("MEDGUARD_TOP_K");
    }
}

#[test]
fn test_default_config() {
    let config = Config::default();

    assert_eq!(config.qdrant_url, "http://localhost:6334");
    assert_eq!(config.collection_name, "medicines");
    assert!(config.ground_truth_path.is_none());
    assert!(config.golden_path.is_none());
    assert_eq!(config.query_timeout, Duration::from_millis(1500));
    assert!((config.hybrid_alpha - 0.75).abs() < f32::EPSILON);
    assert_eq!(config.top_k, 5);
}

#[test]
fn test_default_config_validates() {
    assert!(Config::default().validate().is_ok());
}

#[test]
#[serial]
fn test_from_env_with_defaults() {
    clear_medguard_env();

    let config = Config::from_env().expect("should parse with defaults");

    assert_eq!(config.qdrant_url, DEFAULT_QDRANT_URL);
    assert_eq!(config.top_k, 5);
}

#[test]
#[serial]
fn test_from_env_overrides() {
    clear_medguard_env();

    with_env_vars(
        &[
            ("MEDGUARD_QDRANT_URL", "http://qdrant.internal:6334"),
            ("MEDGUARD_COLLECTION", "formulary"),
            ("MEDGUARD_QUERY_TIMEOUT_MS", "250"),
            ("MEDGUARD_HYBRID_ALPHA", "0.6"),
            ("MEDGUARD_TOP_K", "12"),
            ("MEDGUARD_GOLDEN_PATH", "/srv/medguard/golden.json"),
        ],
        || {
            let config = Config::from_env().expect("should parse");

            assert_eq!(config.qdrant_url, "http://qdrant.internal:6334");
            assert_eq!(config.collection_name, "formulary");
            assert_eq!(config.query_timeout, Duration::from_millis(250));
            assert!((config.hybrid_alpha - 0.6).abs() < 1e-6);
            assert_eq!(config.top_k, 12);
            assert_eq!(
                config.golden_path,
                Some(PathBuf::from("/srv/medguard/golden.json"))
            );
        },
    );
}

#[test]
#[serial]
fn test_blank_optional_path_is_none() {
    clear_medguard_env();

    with_env_vars(&[("MEDGUARD_GROUND_TRUTH_PATH", "   ")], || {
        let config = Config::from_env().expect("should parse");
        assert!(config.ground_truth_path.is_none());
    });
}

#[test]
#[serial]
fn test_invalid_alpha_out_of_range() {
    clear_medguard_env();

    with_env_vars(&[("MEDGUARD_HYBRID_ALPHA", "1.5")], || {
        let err = Config::from_env().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidAlpha { .. }));
        assert!(err.to_string().contains("between 0 and 1"));
    });
}

#[test]
#[serial]
fn test_invalid_alpha_not_number() {
    clear_medguard_env();

    with_env_vars(&[("MEDGUARD_HYBRID_ALPHA", "dense")], || {
        let err = Config::from_env().unwrap_err();
        assert!(matches!(err, ConfigError::FloatParseError { .. }));
    });
}

#[test]
#[serial]
fn test_invalid_timeout_zero() {
    clear_medguard_env();

    with_env_vars(&[("MEDGUARD_QUERY_TIMEOUT_MS", "0")], || {
        let err = Config::from_env().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidTimeout { .. }));
    });
}

#[test]
#[serial]
fn test_invalid_top_k() {
    clear_medguard_env();

    with_env_vars(&[("MEDGUARD_TOP_K", "-3")], || {
        let err = Config::from_env().unwrap_err();
        assert!(matches!(err, ConfigError::IntParseError { .. }));
    });

    with_env_vars(&[("MEDGUARD_TOP_K", "0")], || {
        let err = Config::from_env().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidTopK { .. }));
    });
}

#[test]
fn test_validate_missing_golden_path() {
    let config = Config {
        golden_path: Some(PathBuf::from("/nonexistent/golden.json")),
        ..Default::default()
    };

    let err = config.validate().unwrap_err();
    assert!(matches!(err, ConfigError::PathNotFound { .. }));
}

#[test]
fn test_validate_directory_is_not_a_file() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let config = Config {
        ground_truth_path: Some(dir.path().to_path_buf()),
        ..Default::default()
    };

    let err = config.validate().unwrap_err();
    assert!(matches!(err, ConfigError::NotAFile { .. }));
}

#[test]
fn test_validate_rejects_blank_collection() {
    let config = Config {
        collection_name: "  ".to_string(),
        ..Default::default()
    };

    assert!(matches!(
        config.validate(),
        Err(ConfigError::MissingEnvVar { .. })
    ));
}
