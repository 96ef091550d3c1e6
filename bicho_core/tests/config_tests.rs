use std::io::Write;

use bicho_core::{ConfigError, SlotConfig, DEFAULT_ENDPOINT};

#[test]
fn loads_config_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, r#"{{"bet_step": 1.0, "bet_min": 1.0, "inverted": true}}"#).unwrap();

    let cfg = SlotConfig::load(file.path()).unwrap();

    assert_eq!(cfg.bet_step, 1.0);
    assert_eq!(cfg.bet_min, 1.0);
    assert!(cfg.inverted);
    assert_eq!(cfg.endpoint, DEFAULT_ENDPOINT);
}

#[test]
fn missing_file_is_reported_with_path() {
    let err = SlotConfig::load(std::path::Path::new("/nonexistent/slot.json")).unwrap_err();
    assert!(matches!(err, ConfigError::Read { .. }));
    assert!(err.to_string().contains("/nonexistent/slot.json"));
}
