//! Command-line runner configuration.
use std::env;
use std::path::PathBuf;

/// Settings for a headless run, read from the environment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SimConfig {
    pub scenario: PathBuf,
    /// Overrides the scenario's own tick count.
    pub ticks: Option<u64>,
    pub log: LogConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            scenario: PathBuf::from(Self::DEFAULT_SCENARIO),
            ticks: None,
            log: LogConfig::default(),
        }
    }
}

impl SimConfig {
    pub const DEFAULT_SCENARIO: &'static str = "crates/runtime/scenarios/arrest.ron";

    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `PARK_SCENARIO` - Scenario file to run (default: the arrest demo)
    /// - `PARK_TICKS` - Number of ticks to run (default: the scenario's)
    /// - `PARK_LOG_TO_FILE` - Also write logs to a file (default: false)
    /// - `PARK_LOG_DIR` - Log directory (default: platform cache directory)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(path) = read_env::<PathBuf>("PARK_SCENARIO") {
            config.scenario = path;
        }
        config.ticks = read_env::<u64>("PARK_TICKS");

        if let Some(enabled) = read_env_bool("PARK_LOG_TO_FILE") {
            config.log.to_file = enabled;
        }
        if let Some(dir) = read_env::<PathBuf>("PARK_LOG_DIR") {
            config.log.dir = Some(dir);
        }

        config
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LogConfig {
    pub to_file: bool,
    pub dir: Option<PathBuf>,
}

impl LogConfig {
    /// Platform log directory:
    /// - macOS: `~/Library/Caches/park/logs`
    /// - Linux: `~/.cache/park/logs` (or `$XDG_CACHE_HOME/park/logs`)
    /// - Windows: `%LOCALAPPDATA%\park\logs`
    pub fn directory(&self) -> PathBuf {
        if let Some(dir) = &self.dir {
            return dir.clone();
        }
        directories::ProjectDirs::from("", "", "park")
            .map(|dirs| dirs.cache_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("/tmp/park"))
            .join("logs")
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}

fn read_env_bool(key: &str) -> Option<bool> {
    match env::var(key).ok()?.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}
