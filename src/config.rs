use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::render::AvatarColors;
use crate::search::DelayRange;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub window: WindowConfig,
    pub search: SearchConfig,
    pub display: DisplayConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Quiet period after the last keystroke before a search starts
    pub debounce_ms: u64,
    /// Lower bound of the simulated backend latency
    pub min_delay_ms: u64,
    /// Upper bound of the simulated backend latency
    pub max_delay_ms: u64,
    /// Per-search timeout. 0 = wait forever
    pub timeout_ms: u64,
    /// JSONL file with `{"name", "address"}` records. None = built-in records
    pub records: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// "stable" = color derived from the address, "random" = new color every render
    pub avatar_colors: AvatarColors,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 480.0,
            height: 520.0,
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 500,
            min_delay_ms: 1000,
            max_delay_ms: 10000,
            timeout_ms: 15000,
            records: None,
        }
    }
}

impl SearchConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn delay(&self) -> DelayRange {
        DelayRange::new(
            Duration::from_millis(self.min_delay_ms),
            Duration::from_millis(self.max_delay_ms),
        )
    }

    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_ms > 0).then(|| Duration::from_millis(self.timeout_ms))
    }
}

pub fn load_from(path: &Path) -> Config {
    load_path(path)
}

pub fn load() -> Config {
    match config_path() {
        Some(path) => load_path(&path),
        None => {
            tracing::warn!("Could not determine home directory, using default config");
            Config::default()
        }
    }
}

fn load_path(path: &Path) -> Config {
    if !path.exists() {
        tracing::info!("No config file found at {:?}, using defaults", path);
        return Config::default();
    }
    match std::fs::read_to_string(path) {
        Ok(contents) => match toml::from_str(&contents) {
            Ok(config) => {
                tracing::info!("Loaded config from {:?}", path);
                config
            }
            Err(e) => {
                tracing::warn!("Failed to parse config: {}, using defaults", e);
                Config::default()
            }
        },
        Err(e) => {
            tracing::warn!("Failed to read config file: {}, using defaults", e);
            Config::default()
        }
    }
}

fn config_path() -> Option<PathBuf> {
    // ~/.config/ (XDG convention) on every platform
    dirs::home_dir().map(|home| home.join(".config").join("addrbox").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.search.debounce(), Duration::from_millis(500));
        assert_eq!(config.search.delay(), DelayRange::default());
        assert_eq!(config.search.timeout(), Some(Duration::from_secs(15)));
        assert_eq!(config.search.records, None);
        assert_eq!(config.display.avatar_colors, AvatarColors::Stable);
        assert_eq!(config.window.width, 480.0);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config: Config = toml::from_str(
            r#"
            [search]
            debounce_ms = 250
            timeout_ms = 0
            records = "/tmp/records.jsonl"

            [display]
            avatar_colors = "random"
            "#,
        )
        .unwrap();
        assert_eq!(config.search.debounce(), Duration::from_millis(250));
        assert_eq!(config.search.min_delay_ms, 1000);
        assert_eq!(config.search.timeout(), None);
        assert_eq!(
            config.search.records.as_deref(),
            Some(Path::new("/tmp/records.jsonl"))
        );
        assert_eq!(config.display.avatar_colors, AvatarColors::Random);
    }

    #[test]
    fn unknown_color_policy_is_rejected() {
        let parsed = toml::from_str::<Config>("[display]\navatar_colors = \"rainbow\"\n");
        assert!(parsed.is_err());
    }

    #[test]
    fn broken_file_falls_back_to_defaults() {
        let path = std::env::temp_dir().join(format!("addrbox-config-{}.toml", std::process::id()));
        std::fs::write(&path, "[search\ndebounce_ms = ").unwrap();
        let config = load_from(&path);
        std::fs::remove_file(&path).unwrap();
        assert_eq!(config.search.debounce_ms, 500);
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let path = std::env::temp_dir().join("addrbox-missing-config.toml");
        let config = load_from(&path);
        assert_eq!(config.search.max_delay_ms, 10000);
    }
}
