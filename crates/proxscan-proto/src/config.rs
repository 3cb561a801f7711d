use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::platform;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub scan: ScanConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub ticker: TickerConfig,
    #[serde(default)]
    pub typing: TypingConfig,
    #[serde(default)]
    pub paths: PathsConfig,
}

/// Timing of the countdown/scan cycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Seconds between two scans.
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
    /// How long the SCANNING phase is shown before the scan runs.
    #[serde(default = "default_scan_duration_ms")]
    pub scan_duration_ms: u64,
    /// Upper bound for one `nmcli` invocation.
    #[serde(default = "default_command_timeout_secs")]
    pub command_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    #[serde(default = "default_fps")]
    pub fps: u32,
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default = "default_version")]
    pub version: String,
    /// Per-character flash after a title glyph is revealed.
    #[serde(default = "default_flash_ms")]
    pub flash_ms: u64,
    /// Fade from the flash color to the accent color.
    #[serde(default = "default_fade_ms")]
    pub fade_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TickerConfig {
    /// Minimum seconds between two lookups of the slow (network) fields.
    #[serde(default = "default_dwell_secs")]
    pub dwell_secs: f64,
    /// Horizontal speed in terminal cells per frame.
    #[serde(default = "default_speed")]
    pub speed: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypingConfig {
    #[serde(default = "default_quote_char_ms")]
    pub quote_char_ms: u64,
    #[serde(default = "default_mistake_probability")]
    pub mistake_probability: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    #[serde(default = "platform::discovered_file")]
    pub discovered_file: PathBuf,
    #[serde(default = "platform::lab_file")]
    pub lab_file: PathBuf,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_interval_secs(),
            scan_duration_ms: default_scan_duration_ms(),
            command_timeout_secs: default_command_timeout_secs(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            fps: default_fps(),
            title: default_title(),
            version: default_version(),
            flash_ms: default_flash_ms(),
            fade_ms: default_fade_ms(),
        }
    }
}

impl Default for TickerConfig {
    fn default() -> Self {
        Self {
            dwell_secs: default_dwell_secs(),
            speed: default_speed(),
        }
    }
}

impl Default for TypingConfig {
    fn default() -> Self {
        Self {
            quote_char_ms: default_quote_char_ms(),
            mistake_probability: default_mistake_probability(),
        }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            discovered_file: platform::discovered_file(),
            lab_file: platform::lab_file(),
        }
    }
}

impl DisplayConfig {
    /// Time between two console frames, never shorter than 1 ms.
    pub fn frame_period(&self) -> Duration {
        Duration::from_millis((1000 / self.fps.max(1) as u64).max(1))
    }
}

impl TypingConfig {
    /// `mistake_probability` as a usable chance in `[0, 1]`; NaN and
    /// infinities count as 0.
    pub fn mistake_chance(&self) -> f64 {
        if self.mistake_probability.is_finite() {
            self.mistake_probability.clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}

fn default_interval_secs() -> u64 {
    21
}

fn default_scan_duration_ms() -> u64 {
    1000
}

fn default_command_timeout_secs() -> u64 {
    10
}

fn default_fps() -> u32 {
    20
}

fn default_title() -> String {
    "~/MATRIX PROXIMITY NET SCAN//".to_string()
}

fn default_version() -> String {
    "v0.1.0".to_string()
}

fn default_flash_ms() -> u64 {
    150
}

fn default_fade_ms() -> u64 {
    600
}

fn default_dwell_secs() -> f64 {
    7.0
}

fn default_speed() -> f64 {
    0.25
}

fn default_quote_char_ms() -> u64 {
    50
}

fn default_mistake_probability() -> f64 {
    0.12
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load `path`, writing a default config there first if it does not exist.
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            let config = Self::default();
            config.save_to(path)?;
            return Ok(config);
        }

        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        platform::config_dir().join("config.toml")
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            scan: ScanConfig::default(),
            display: DisplayConfig::default(),
            ticker: TickerConfig::default(),
            typing: TypingConfig::default(),
            paths: PathsConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.scan.interval_secs, 21);
        assert_eq!(config.scan.scan_duration_ms, 1000);
        assert_eq!(config.display.fps, 20);
        assert_eq!(config.ticker.dwell_secs, 7.0);
        assert!((config.typing.mistake_probability - 0.12).abs() < f64::EPSILON);
        assert!(config.paths.lab_file.ends_with("proxscan/lab_devices.json"));
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: Config = toml::from_str("[scan]\ninterval_secs = 30\n").unwrap();
        assert_eq!(config.scan.interval_secs, 30);
        assert_eq!(config.scan.scan_duration_ms, 1000);
        assert_eq!(config.display.title, "~/MATRIX PROXIMITY NET SCAN//");
    }

    #[test]
    fn test_frame_period_never_zero() {
        let config: Config = toml::from_str("[display]\nfps = 2000\n").unwrap();
        assert_eq!(config.display.frame_period(), Duration::from_millis(1));

        let config: Config = toml::from_str("[display]\nfps = 0\n").unwrap();
        assert_eq!(config.display.frame_period(), Duration::from_millis(1000));

        assert_eq!(Config::default().display.frame_period(), Duration::from_millis(50));
    }

    #[test]
    fn test_mistake_chance_sanitized() {
        let config: Config = toml::from_str("[typing]\nmistake_probability = nan\n").unwrap();
        assert_eq!(config.typing.mistake_chance(), 0.0);

        let config: Config = toml::from_str("[typing]\nmistake_probability = 3.5\n").unwrap();
        assert_eq!(config.typing.mistake_chance(), 1.0);

        let config: Config = toml::from_str("[typing]\nmistake_probability = -inf\n").unwrap();
        assert_eq!(config.typing.mistake_chance(), 0.0);
    }

    #[test]
    fn test_load_from_creates_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let config = Config::load_from(&path).unwrap();
        assert!(path.exists());
        assert_eq!(config.display.version, "v0.1.0");

        let reloaded = Config::load_from(&path).unwrap();
        assert_eq!(reloaded.scan.interval_secs, config.scan.interval_secs);
    }
}
