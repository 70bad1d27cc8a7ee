use std::fs;

use crashwatch::MonitorConfig;
use tempfile::TempDir;

#[test]
fn test_config_default() {
    let config = MonitorConfig::default();
    assert_eq!(config.target.display_name, "BF6");
    assert_eq!(config.poll_interval_ms, 2000);
    assert_eq!(config.event_log.window_minutes, 10);
    assert_eq!(config.event_log.max_entries, 30);
    assert!(config
        .target
        .process_names
        .iter()
        .any(|n| n == "bf6.exe"));
}

#[test]
fn test_config_init_then_load() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("nested").join("config.json");

    let mut config = MonitorConfig::default();
    config.target.display_name = "Other Game".to_string();
    config.target.process_names = vec!["other.exe".to_string()];
    config.save_to(&path).unwrap();

    let loaded = MonitorConfig::load_from(&path).unwrap();
    assert_eq!(loaded, config);
}

#[test]
fn test_config_empty_process_list_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.json");
    fs::write(&path, r#"{ "target": { "process_names": [] } }"#).unwrap();

    assert!(MonitorConfig::load_from(&path).is_err());
}

#[test]
fn test_config_invalid_json_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.json");
    fs::write(&path, "{ not json").unwrap();

    assert!(MonitorConfig::load_from(&path).is_err());
}
