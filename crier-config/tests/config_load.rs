use crier_config::CrierConfigLoader;
use serial_test::serial;
use std::{fs, path::PathBuf};
use tempfile::TempDir;

/// Helper to write a YAML file in a temp dir and return its path.
fn write_yaml(tmp: &TempDir, name: &str, yaml: &str) -> PathBuf {
    let p = tmp.path().join(name);
    fs::write(&p, yaml).expect("write yaml");
    p
}

#[test]
#[serial]
fn test_config_load() {
    let tmp = TempDir::new().unwrap();

    let file_yaml = r#"
webdriver_url: "http://127.0.0.1:4444"
headless: false
storage_dir: "/var/lib/crier"
pacing:
  settle: { min_ms: 100, max_ms: 200 }
  step: { min_ms: 10, max_ms: 20 }
  keystroke: { min_ms: 1, max_ms: 2 }
  submit: { min_ms: 50, max_ms: 60 }
"#;
    let p = write_yaml(&tmp, "crier.yaml", file_yaml);

    let config = CrierConfigLoader::new()
        .with_file(p)
        .load()
        .expect("load crier config");

    assert_eq!(config.webdriver_url, "http://127.0.0.1:4444");
    assert!(!config.headless);
    assert_eq!(config.storage_dir, PathBuf::from("/var/lib/crier"));
    assert_eq!(config.pacing.settle.min_ms, 100);
    assert_eq!(config.pacing.keystroke.max_ms, 2);
}

#[test]
#[serial]
fn test_missing_file_falls_back_to_defaults() {
    let config = CrierConfigLoader::new()
        .with_file("does/not/exist/crier.yaml")
        .load()
        .expect("defaults apply when file is absent");

    assert_eq!(config.webdriver_url, "http://localhost:9515");
    assert!(config.headless);
    assert_eq!(config.storage_dir, PathBuf::from("storage"));
    assert!(config.user_agent.is_none());
}

#[test]
#[serial]
fn test_env_overrides_file() {
    let tmp = TempDir::new().unwrap();
    let p = write_yaml(&tmp, "crier.yaml", "headless: true\n");

    temp_env::with_var("CRIER_WEBDRIVER_URL", Some("http://envhost:9999"), || {
        let config = CrierConfigLoader::new()
            .with_file(&p)
            .load()
            .expect("load with env overlay");
        assert_eq!(config.webdriver_url, "http://envhost:9999");
        assert!(config.headless);
    });
}

#[test]
#[serial]
fn test_env_overrides_typed_fields() {
    let tmp = TempDir::new().unwrap();
    let p = write_yaml(&tmp, "crier.yaml", "headless: true\n");

    temp_env::with_vars(
        [
            ("CRIER_HEADLESS", Some("false")),
            ("CRIER_PACING__SETTLE__MIN_MS", Some("7")),
            ("CRIER_PACING__SETTLE__MAX_MS", Some("9")),
        ],
        || {
            let config = CrierConfigLoader::new()
                .with_file(&p)
                .load()
                .expect("env values parse into non-string fields");
            assert!(!config.headless);
            assert_eq!(config.pacing.settle.min_ms, 7);
            assert_eq!(config.pacing.settle.max_ms, 9);
        },
    );
}

#[test]
#[serial]
fn test_env_expansion_in_file_values() {
    temp_env::with_var("CRIER_STORAGE_ROOT", Some("/srv/crier"), || {
        let config = CrierConfigLoader::new()
            .with_yaml_str("storage_dir: \"${CRIER_STORAGE_ROOT}/state\"")
            .load()
            .expect("load with interpolation");
        assert_eq!(config.storage_dir, PathBuf::from("/srv/crier/state"));
    });
}
