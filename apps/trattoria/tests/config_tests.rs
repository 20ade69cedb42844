//! Configuration layering tests.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use trattoria::config::{AppConfig, DEFAULT_DATA_PATH, FileConfig, LogFormat};

fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: BTreeMap<String, String> = pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect();
    move |key| map.get(key).cloned()
}

fn write_config(dir: &Path, text: &str) -> PathBuf {
    let path = dir.join("trattoria.toml");
    std::fs::write(&path, text).expect("write config");
    path
}

#[test]
fn defaults_without_any_source() {
    let config = AppConfig::resolve(None, None, env_of(&[])).expect("resolve");
    assert_eq!(config.data_path, PathBuf::from(DEFAULT_DATA_PATH));
    assert_eq!(config.log_format, LogFormat::Text);
    assert_eq!(config.restaurant.name, "Trattoria");
}

#[test]
fn file_values_apply() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = write_config(
        dir.path(),
        r#"
data_path = "from-file.bin"
log_format = "json"

[restaurant]
name = "Da Nonna"
default_tax_rate_bp = 1000
"#,
    );

    let config = AppConfig::resolve(None, Some(&path), env_of(&[])).expect("resolve");
    assert_eq!(config.data_path, PathBuf::from("from-file.bin"));
    assert_eq!(config.log_format, LogFormat::Json);
    assert_eq!(config.restaurant.name, "Da Nonna");
    assert_eq!(config.restaurant.default_tax_rate_bp, 1000);
}

#[test]
fn env_beats_file_and_flag_beats_env() {
    let file = FileConfig::parse("data_path = \"file.bin\"\nlog_format = \"text\"").expect("parse");
    let env = env_of(&[
        ("TRATTORIA_DATA", "env.bin"),
        ("TRATTORIA_LOG_FORMAT", "json"),
    ]);

    let from_env = AppConfig::layer(None, file.clone(), &env);
    assert_eq!(from_env.data_path, PathBuf::from("env.bin"));
    assert_eq!(from_env.log_format, LogFormat::Json);

    let from_flag = AppConfig::layer(Some(PathBuf::from("flag.bin")), file, &env);
    assert_eq!(from_flag.data_path, PathBuf::from("flag.bin"));
}

#[test]
fn partial_restaurant_table_keeps_other_defaults() {
    let file = FileConfig::parse("[restaurant]\nname = \"Osteria\"").expect("parse");
    let config = AppConfig::layer(None, file, env_of(&[]));
    assert_eq!(config.restaurant.name, "Osteria");
    assert_eq!(
        config.restaurant.default_tax_rate_bp,
        AppConfig::default().restaurant.default_tax_rate_bp
    );
}

#[test]
fn missing_config_file_is_an_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let missing = dir.path().join("absent.toml");
    assert!(AppConfig::resolve(None, Some(&missing), env_of(&[])).is_err());
}

#[test]
fn malformed_config_file_is_an_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = write_config(dir.path(), "log_format = \"yaml\"");
    assert!(AppConfig::resolve(None, Some(&path), env_of(&[])).is_err());
}
