use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use datasynth_generate::Probabilities;

use crate::CliError;

pub const DEFAULT_SETTINGS_FILE: &str = "datasynth.toml";

/// Persistent CLI configuration, read from `datasynth.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Embedded dataset store file.
    pub database_path: PathBuf,
    pub export_dir: PathBuf,
    /// Upper bound on records per generation request.
    pub max_records: u64,
    /// Seed used when `--seed` is not given. Unset means a fresh seed per run.
    pub seed: Option<u64>,
    pub log_level: String,
    pub log_file: Option<PathBuf>,
    pub probabilities: Probabilities,
    pub postgres: PostgresDefaults,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from("datasets.db"),
            export_dir: PathBuf::from("exports"),
            max_records: 100_000,
            seed: None,
            log_level: "info".to_string(),
            log_file: None,
            probabilities: Probabilities::default(),
            postgres: PostgresDefaults::default(),
        }
    }
}

/// Destination connection defaults. The password is never stored here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PostgresDefaults {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub user: String,
}

impl Default for PostgresDefaults {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 5432,
            database: "postgres".to_string(),
            user: "postgres".to_string(),
        }
    }
}

impl Settings {
    pub fn check_count(&self, count: u64) -> Result<(), CliError> {
        if count > self.max_records {
            return Err(CliError::InvalidInput(format!(
                "{count} records requested; the configured maximum is {}",
                self.max_records
            )));
        }
        Ok(())
    }
}

/// Reads `path`, writing the defaults there first when it does not exist.
pub fn load_or_create(path: &Path) -> Result<Settings, CliError> {
    if path.exists() {
        let content = fs::read_to_string(path)?;
        let settings: Settings = toml::from_str(&content)?;
        return Ok(settings);
    }

    let settings = Settings::default();
    save(path, &settings)?;
    Ok(settings)
}

/// Writes through a sibling temp file so a crash never leaves a truncated config.
pub fn save(path: &Path, settings: &Settings) -> Result<(), CliError> {
    let encoded = toml::to_string_pretty(settings)?;
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let file_name = path
        .file_name()
        .ok_or_else(|| CliError::InvalidInput(format!("invalid config path {}", path.display())))?;
    let tmp_path = path.with_file_name(format!("{}.tmp", file_name.to_string_lossy()));
    let mut file = OpenOptions::new()
        .create(true)
        .truncate(true)
        .write(true)
        .open(&tmp_path)?;
    file.write_all(encoded.as_bytes())?;
    file.sync_all()?;
    fs::rename(&tmp_path, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_config(label: &str) -> PathBuf {
        let mut dir = std::env::temp_dir();
        dir.push(format!("datasynth_cli_{label}_{}", uuid::Uuid::new_v4()));
        dir.join(DEFAULT_SETTINGS_FILE)
    }

    #[test]
    fn missing_file_is_created_with_defaults() {
        let path = temp_config("create");
        let settings = load_or_create(&path).expect("load settings");
        assert_eq!(settings, Settings::default());
        assert!(path.exists());

        let reloaded = load_or_create(&path).expect("reload settings");
        assert_eq!(reloaded, settings);
    }

    #[test]
    fn partial_files_fill_in_defaults() {
        let path = temp_config("partial");
        fs::create_dir_all(path.parent().expect("parent")).expect("create dir");
        fs::write(
            &path,
            "max_records = 50\n\n[probabilities]\ncoupon_code = 0.9\n\n[postgres]\nport = 6543\n",
        )
        .expect("write config");

        let settings = load_or_create(&path).expect("load settings");
        assert_eq!(settings.max_records, 50);
        assert_eq!(settings.probabilities.coupon_code, 0.9);
        assert_eq!(settings.probabilities.is_gift, 0.5);
        assert_eq!(settings.postgres.port, 6543);
        assert_eq!(settings.postgres.host, "localhost");
        assert!(settings.check_count(50).is_ok());
        assert!(settings.check_count(51).is_err());
    }
}
