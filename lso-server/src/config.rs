//! Server configuration
//!
//! Settings are read once at startup from a JSON file whose location comes
//! from `SETTINGS_FILENAME`. The file is validated before the server accepts
//! any request; a bad file aborts startup.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Settings file used when `SETTINGS_FILENAME` is not set
pub const DEFAULT_SETTINGS_FILENAME: &str = "settings.json";

/// Service configuration
///
/// Immutable after loading and shared read-only by every run.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    /// Directory that playbook names are resolved against
    pub ansible_playbooks_root_dir: PathBuf,

    /// Directory for the executable endpoint; the endpoint is disabled when unset
    #[serde(default)]
    pub executables_root_dir: Option<PathBuf>,

    /// Program used to run playbooks
    #[serde(default = "default_ansible_playbook_bin")]
    pub ansible_playbook_bin: String,

    /// Maximum wall-clock time of a single run
    #[serde(default = "default_run_timeout_secs")]
    pub run_timeout_secs: u64,

    /// Timeout of the outbound callback request
    #[serde(default = "default_callback_timeout_secs")]
    pub callback_timeout_secs: u64,

    /// Max processes running at the same time
    #[serde(default = "default_max_parallel_runs")]
    pub max_parallel_runs: usize,
}

fn default_ansible_playbook_bin() -> String {
    "ansible-playbook".to_string()
}

fn default_run_timeout_secs() -> u64 {
    3600
}

fn default_callback_timeout_secs() -> u64 {
    10
}

fn default_max_parallel_runs() -> usize {
    8
}

impl Settings {
    /// Creates settings with defaults for everything but the playbook root
    pub fn new(ansible_playbooks_root_dir: impl Into<PathBuf>) -> Self {
        Self {
            ansible_playbooks_root_dir: ansible_playbooks_root_dir.into(),
            executables_root_dir: None,
            ansible_playbook_bin: default_ansible_playbook_bin(),
            run_timeout_secs: default_run_timeout_secs(),
            callback_timeout_secs: default_callback_timeout_secs(),
            max_parallel_runs: default_max_parallel_runs(),
        }
    }

    /// Loads and validates the settings file at `path`
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file {}", path.display()))?;

        Self::from_json(&raw)
            .with_context(|| format!("Invalid settings file {}", path.display()))
    }

    /// Parses and validates settings from a JSON document
    pub fn from_json(raw: &str) -> Result<Self> {
        let settings: Settings =
            serde_json::from_str(raw).context("Settings do not match the expected schema")?;
        settings.validate()?;
        Ok(settings)
    }

    /// Validates the configuration
    pub fn validate(&self) -> Result<()> {
        if !self.ansible_playbooks_root_dir.is_dir() {
            anyhow::bail!(
                "ansible_playbooks_root_dir {} is not a directory",
                self.ansible_playbooks_root_dir.display()
            );
        }

        if let Some(dir) = &self.executables_root_dir {
            if !dir.is_dir() {
                anyhow::bail!("executables_root_dir {} is not a directory", dir.display());
            }
        }

        if self.ansible_playbook_bin.trim().is_empty() {
            anyhow::bail!("ansible_playbook_bin cannot be empty");
        }

        if self.run_timeout_secs == 0 {
            anyhow::bail!("run_timeout_secs must be greater than 0");
        }

        if self.callback_timeout_secs == 0 {
            anyhow::bail!("callback_timeout_secs must be greater than 0");
        }

        if self.max_parallel_runs == 0 {
            anyhow::bail!("max_parallel_runs must be greater than 0");
        }

        Ok(())
    }

    pub fn run_timeout(&self) -> Duration {
        Duration::from_secs(self.run_timeout_secs)
    }

    pub fn callback_timeout(&self) -> Duration {
        Duration::from_secs(self.callback_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings_json(root: &Path, extra: &str) -> String {
        format!(
            r#"{{"ansible_playbooks_root_dir": {}{}}}"#,
            serde_json::to_string(root).unwrap(),
            extra
        )
    }

    #[test]
    fn test_minimal_settings_use_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::from_json(&settings_json(dir.path(), "")).unwrap();

        assert_eq!(settings.ansible_playbooks_root_dir, dir.path());
        assert_eq!(settings.executables_root_dir, None);
        assert_eq!(settings.ansible_playbook_bin, "ansible-playbook");
        assert_eq!(settings.run_timeout(), Duration::from_secs(3600));
        assert_eq!(settings.callback_timeout(), Duration::from_secs(10));
        assert_eq!(settings.max_parallel_runs, 8);
    }

    #[test]
    fn test_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let extra = r#", "ansible_playbook_bin": "/usr/local/bin/ansible-playbook",
            "run_timeout_secs": 60, "callback_timeout_secs": 3, "max_parallel_runs": 2"#;
        let settings = Settings::from_json(&settings_json(dir.path(), extra)).unwrap();

        assert_eq!(settings.ansible_playbook_bin, "/usr/local/bin/ansible-playbook");
        assert_eq!(settings.run_timeout(), Duration::from_secs(60));
        assert_eq!(settings.callback_timeout(), Duration::from_secs(3));
        assert_eq!(settings.max_parallel_runs, 2);
    }

    #[test]
    fn test_rejects_unknown_keys() {
        let dir = tempfile::tempdir().unwrap();
        let err = Settings::from_json(&settings_json(dir.path(), r#", "playbook-dir": "/tmp""#))
            .unwrap_err();
        assert!(format!("{:#}", err).contains("unknown field"));
    }

    #[test]
    fn test_rejects_missing_root_dir() {
        assert!(Settings::from_json("{}").is_err());
    }

    #[test]
    fn test_rejects_root_that_is_not_a_directory() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        let err = Settings::from_json(&settings_json(&missing, "")).unwrap_err();
        assert!(err.to_string().contains("is not a directory"));
    }

    #[test]
    fn test_rejects_zero_limits() {
        let dir = tempfile::tempdir().unwrap();
        for extra in [
            r#", "run_timeout_secs": 0"#,
            r#", "callback_timeout_secs": 0"#,
            r#", "max_parallel_runs": 0"#,
        ] {
            assert!(Settings::from_json(&settings_json(dir.path(), extra)).is_err());
        }
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, settings_json(dir.path(), "")).unwrap();

        let settings = Settings::load(&path).unwrap();
        assert_eq!(settings.ansible_playbooks_root_dir, dir.path());
    }

    #[test]
    fn test_load_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = Settings::load(&dir.path().join("absent.json")).unwrap_err();
        assert!(err.to_string().contains("Failed to read settings file"));
    }
}
