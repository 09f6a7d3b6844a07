//! Configuration loading and management.

use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding the timesheet exports.
    pub timesheet_dir: PathBuf,

    /// Echo each sheet's cells while tallying.
    pub verbose_cells: bool,

    /// Echo each sheet's per-day hours while tallying.
    pub verbose_hour_counts: bool,

    /// Include the day-by-hour table in text output.
    pub by_day: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            timesheet_dir: PathBuf::from("timesheets"),
            verbose_cells: false,
            verbose_hour_counts: false,
            by_day: false,
        }
    }
}

impl Config {
    /// Loads configuration, optionally from a specific file.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Load from default config location
        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        // Load from specified config file
        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        // Load from environment variables (TSUM_*)
        figment = figment.merge(Env::prefixed("TSUM_"));

        figment.extract()
    }
}

/// Returns the platform-specific config directory for tsum.
///
/// On Linux: `~/.config/tsum`
pub fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("tsum"))
}
