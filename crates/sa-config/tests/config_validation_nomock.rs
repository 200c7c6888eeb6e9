//! No-mock configuration validation + resolution tests.
//!
//! Covers:
//! - Loading and validating real config files on disk
//! - Resolution order (CLI > env path > env dir)
//! - Snapshot hashing of the loaded file

use sa_config::resolve::{ENV_CONFIG_DIR, ENV_CONFIG_PATH};
use sa_config::{
    resolve_config, validate_config, AnalysisConfig, ConfigSnapshot, ConfigSource,
    ValidationError,
};
use std::env;
use std::fs;
use std::path::Path;
use std::sync::{Mutex, OnceLock};
use tempfile::TempDir;

static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

struct EnvGuard {
    keys: Vec<String>,
    saved: Vec<Option<String>>,
}

impl EnvGuard {
    fn new(keys: &[&str]) -> Self {
        let mut saved = Vec::with_capacity(keys.len());
        for key in keys {
            saved.push(env::var(key).ok());
        }
        Self {
            keys: keys.iter().map(|k| k.to_string()).collect(),
            saved,
        }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        for (idx, key) in self.keys.iter().enumerate() {
            match self.saved.get(idx).and_then(|v| v.as_ref()) {
                Some(val) => env::set_var(key, val),
                None => env::remove_var(key),
            }
        }
    }
}

fn with_env_lock<T>(f: impl FnOnce() -> T) -> T {
    let _guard = ENV_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .expect("env lock poisoned");
    f()
}

fn write_config(dir: &Path, name: &str, json: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    fs::write(&path, json).expect("write config");
    path
}

const CUSTOM_CONFIG: &str = r#"{
  "schema_version": "1.0.0",
  "description": "EventBridge export column names",
  "fulfillment_columns": {
    "instance_id": "detail.instance-id",
    "time": "time",
    "instance_type": "detail.instance-type",
    "availability_zone": "detail.availability-zone"
  },
  "interruption_columns": {"instance_id": "detail.instance-id"},
  "timestamps": {"extra_formats": ["%d/%m/%Y %H:%M"]},
  "report": {"top_n": 5, "histogram_bins": 12, "preview_rows": 3}
}"#;

#[test]
fn custom_config_loads_and_validates() {
    let dir = TempDir::new().unwrap();
    let path = write_config(dir.path(), "config.json", CUSTOM_CONFIG);

    let config = AnalysisConfig::from_file(&path).expect("load config");
    validate_config(&config).expect("config should be valid");

    assert_eq!(config.fulfillment_columns.instance_id, "detail.instance-id");
    assert_eq!(config.interruption_columns.time, "time");
    assert_eq!(config.report.top_n, 5);
    assert_eq!(config.export.file_name, "uptime_summary.csv");
}

#[test]
fn wrong_schema_version_fails_validation() {
    let dir = TempDir::new().unwrap();
    let path = write_config(dir.path(), "config.json", r#"{"schema_version": "2.0.0"}"#);

    let config = AnalysisConfig::from_file(&path).expect("parses");
    let err = validate_config(&config).unwrap_err();
    assert!(matches!(err, ValidationError::VersionMismatch { .. }));
}

#[test]
fn missing_file_is_io_error() {
    let dir = TempDir::new().unwrap();
    let err = AnalysisConfig::from_file(&dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, ValidationError::IoError(_)));
}

#[test]
fn cli_path_takes_precedence_over_env() {
    with_env_lock(|| {
        let _guard = EnvGuard::new(&[ENV_CONFIG_PATH, ENV_CONFIG_DIR]);
        let dir = TempDir::new().unwrap();
        let env_path = write_config(dir.path(), "env.json", "{}");
        let cli_path = write_config(dir.path(), "cli.json", "{}");
        env::set_var(ENV_CONFIG_PATH, &env_path);

        let paths = resolve_config(Some(&cli_path));
        assert_eq!(paths.config.as_deref(), Some(cli_path.as_path()));
        assert_eq!(paths.source, ConfigSource::CliArgument);
    });
}

#[test]
fn env_path_resolves_when_present() {
    with_env_lock(|| {
        let _guard = EnvGuard::new(&[ENV_CONFIG_PATH, ENV_CONFIG_DIR]);
        let dir = TempDir::new().unwrap();
        let env_path = write_config(dir.path(), "env.json", "{}");
        env::set_var(ENV_CONFIG_PATH, &env_path);
        env::remove_var(ENV_CONFIG_DIR);

        let paths = resolve_config(None);
        assert_eq!(paths.config.as_deref(), Some(env_path.as_path()));
        assert_eq!(paths.source, ConfigSource::Environment);
    });
}

#[test]
fn env_dir_resolves_config_json() {
    with_env_lock(|| {
        let _guard = EnvGuard::new(&[ENV_CONFIG_PATH, ENV_CONFIG_DIR]);
        let dir = TempDir::new().unwrap();
        let expected = write_config(dir.path(), "config.json", "{}");
        env::remove_var(ENV_CONFIG_PATH);
        env::set_var(ENV_CONFIG_DIR, dir.path());

        let paths = resolve_config(None);
        assert_eq!(paths.config.as_deref(), Some(expected.as_path()));
        assert_eq!(paths.source, ConfigSource::Environment);
    });
}

#[test]
fn snapshot_hash_tracks_file_content() {
    let dir = TempDir::new().unwrap();
    let path = write_config(dir.path(), "config.json", CUSTOM_CONFIG);
    let config = AnalysisConfig::from_file(&path).unwrap();
    let paths = resolve_config(Some(&path));

    let a = ConfigSnapshot::new(&config, &paths, Some(CUSTOM_CONFIG));
    let b = ConfigSnapshot::new(&config, &paths, Some(CUSTOM_CONFIG));
    assert!(a.matches(&b));
    assert_eq!(a.source, "CLI argument");
    assert_eq!(a.path, Some(path.display().to_string()));
}
