use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use serde::Deserialize;
use tracing::info;

const CONFIG_ENV_VAR: &str = "DAYBOOK_CONFIG";
const CONFIG_FILE_NAME: &str = "daybook.toml";

/// Session tunables, loaded from a TOML file. Every field has a
/// default so an absent file means a stock session.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// IANA timezone name used for all calendar-day math.
    pub timezone: Option<String>,
    /// Length of the journal's trailing date window.
    pub window_days: usize,
    /// Simulated extraction latency.
    pub intake_delay_ms: u64,
    /// UI tick driving spinners and timers.
    pub tick_ms: u64,
    /// How long the splash screen stays up.
    pub splash_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            timezone: None,
            window_days: 7,
            intake_delay_ms: 1500,
            tick_ms: 200,
            splash_ms: 1500,
        }
    }
}

impl Config {
    /// Loads configuration. Resolution order: explicit override path,
    /// then the `DAYBOOK_CONFIG` env var, then the platform config
    /// directory. An explicitly named file must parse; a missing
    /// default location falls back to defaults.
    #[tracing::instrument(skip(override_path))]
    pub fn load(override_path: Option<&Path>) -> anyhow::Result<Self> {
        let Some(path) = resolve_config_path(override_path) else {
            info!("no config file found; using defaults");
            return Ok(Self::default());
        };

        let raw = fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let cfg: Config = toml::from_str(&raw)
            .with_context(|| format!("failed to parse {}", path.display()))?;

        info!(file = %path.display(), "loaded config");
        Ok(cfg)
    }

    #[must_use]
    pub fn intake_delay(&self) -> Duration {
        Duration::from_millis(self.intake_delay_ms)
    }

    #[must_use]
    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    #[must_use]
    pub fn splash(&self) -> Duration {
        Duration::from_millis(self.splash_ms)
    }
}

fn resolve_config_path(override_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = override_path {
        return Some(path.to_path_buf());
    }

    if let Ok(env_path) = std::env::var(CONFIG_ENV_VAR) {
        let trimmed = env_path.trim();
        if !trimmed.is_empty() {
            return Some(PathBuf::from(trimmed));
        }
    }

    let candidate = dirs::config_dir()?.join("daybook").join(CONFIG_FILE_NAME);
    candidate.exists().then_some(candidate)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::Config;

    #[test]
    fn defaults_cover_every_field() {
        let cfg = Config::default();
        assert_eq!(cfg.window_days, 7);
        assert_eq!(cfg.intake_delay_ms, 1500);
        assert_eq!(cfg.tick_ms, 200);
        assert_eq!(cfg.splash_ms, 1500);
        assert!(cfg.timezone.is_none());
    }

    #[test]
    fn file_values_override_defaults() {
        let mut file = tempfile::NamedTempFile::new().expect("tempfile");
        writeln!(
            file,
            "timezone = \"America/New_York\"\nwindow_days = 14\nintake_delay_ms = 10"
        )
        .expect("write config");

        let cfg = Config::load(Some(file.path())).expect("load config");
        assert_eq!(cfg.timezone.as_deref(), Some("America/New_York"));
        assert_eq!(cfg.window_days, 14);
        assert_eq!(cfg.intake_delay_ms, 10);
        // Unmentioned keys keep their defaults.
        assert_eq!(cfg.tick_ms, 200);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().expect("tempfile");
        writeln!(file, "window_days = \"several\"").expect("write config");

        assert!(Config::load(Some(file.path())).is_err());
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let missing = dir.path().join("nope.toml");
        assert!(Config::load(Some(&missing)).is_err());
    }
}
