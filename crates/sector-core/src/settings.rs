use clap::{CommandFactory, Parser};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Result, SectorError};

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Sector price browsing and growth comparison
#[derive(Parser, Debug, Clone)]
#[command(
    name = "sector-growth",
    about = "Sector price browsing and growth comparison",
    version
)]
pub struct Settings {
    /// Directory holding one `<SYMBOL>.txt` source per sector
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// View mode
    #[arg(long, default_value = "growth", value_parser = ["growth", "browse"])]
    pub view: String,

    /// First reference date token, e.g. "2020" or "Jan-2020"
    #[arg(long)]
    pub from: Option<String>,

    /// Second reference date token, e.g. "2021" or "Jan-2021"
    #[arg(long)]
    pub to: Option<String>,

    /// Restrict the browse view to one sector (name or symbol)
    #[arg(long)]
    pub sector: Option<String>,

    /// Restrict the browse view to one year
    #[arg(long)]
    pub year: Option<i32>,

    /// Output format
    #[arg(long, default_value = "table", value_parser = ["table", "json"])]
    pub format: String,

    /// Logging level
    #[arg(long, default_value = "INFO", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR"])]
    pub log_level: String,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Clear saved configuration
    #[arg(long)]
    pub clear: bool,
}

// ── LastUsedParams ─────────────────────────────────────────────────────────────

/// Persisted last-used parameters saved to `~/.sector-growth/last_used.json`.
#[derive(Debug, Serialize, Deserialize, Default, Clone)]
pub struct LastUsedParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub view: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

/// Application directory under the user's home, `~/.sector-growth`.
pub fn app_dir() -> PathBuf {
    app_dir_in(&dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
}

/// Application directory rooted at `base_dir` (used for testing).
pub fn app_dir_in(base_dir: &Path) -> PathBuf {
    base_dir.join(".sector-growth")
}

impl LastUsedParams {
    /// Return the default path to the persisted config file.
    pub fn config_path() -> PathBuf {
        app_dir().join("last_used.json")
    }

    /// Return the config path rooted at `base_dir` (used for testing).
    pub fn config_path_in(base_dir: &Path) -> PathBuf {
        app_dir_in(base_dir).join("last_used.json")
    }

    /// Load persisted params from an explicit path.
    /// Returns `Default` when the file is absent or cannot be parsed.
    pub fn load_from(path: &Path) -> Self {
        let Ok(content) = std::fs::read_to_string(path) else {
            return Self::default();
        };
        match serde_json::from_str(&content) {
            Ok(params) => params,
            Err(e) => {
                tracing::warn!("Ignoring unreadable config {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Atomically write params to an explicit path, creating parent
    /// directories if needed.
    pub fn save_to(&self, path: &Path) -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;

        // Write to a temp file then rename for atomicity.
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, &json)?;
        std::fs::rename(&tmp, path)?;

        Ok(())
    }

    /// Delete the config file at an explicit path if it exists.
    pub fn clear_at(path: &Path) -> std::io::Result<()> {
        if path.exists() {
            std::fs::remove_file(path)?;
        }
        Ok(())
    }
}

// ── Settings impl ──────────────────────────────────────────────────────────────

impl Settings {
    /// Parse CLI arguments and merge with last-used params where no explicit
    /// CLI value was provided. Nothing is written; see [`persist`](Self::persist).
    pub fn load_with_last_used() -> Self {
        Self::load_with_last_used_impl(
            std::env::args_os().collect(),
            &LastUsedParams::config_path(),
        )
    }

    /// Full implementation – accepts args and an explicit config path so that
    /// tests can redirect to a temporary directory.
    pub fn load_with_last_used_impl(
        args: Vec<std::ffi::OsString>,
        config_path: &Path,
    ) -> Self {
        // Build raw ArgMatches so we can query ValueSource.
        let matches = Settings::command().get_matches_from(args.clone());
        let mut settings = Settings::parse_from(args);

        if settings.clear {
            if let Err(e) = LastUsedParams::clear_at(config_path) {
                tracing::warn!("Could not clear {}: {}", config_path.display(), e);
            }
            return settings.apply_debug();
        }

        let last = LastUsedParams::load_from(config_path);

        // CLI always wins; sector/year filters are never persisted.
        if settings.data_dir.is_none() {
            settings.data_dir = last.data_dir;
        }
        if settings.from.is_none() {
            settings.from = last.from;
        }
        if settings.to.is_none() {
            settings.to = last.to;
        }
        if !is_arg_explicitly_set(&matches, "view") {
            if let Some(v) = last.view {
                settings.view = v;
            }
        }
        if !is_arg_explicitly_set(&matches, "format") {
            if let Some(v) = last.format {
                settings.format = v;
            }
        }

        settings.apply_debug()
    }

    /// Save these settings as the next run's defaults.
    ///
    /// Call only once the run has produced its output, so a failing
    /// invocation leaves the previous defaults alone.
    pub fn persist(&self) -> std::io::Result<()> {
        self.persist_to(&LastUsedParams::config_path())
    }

    pub fn persist_to(&self, config_path: &Path) -> std::io::Result<()> {
        LastUsedParams::from(self).save_to(config_path)
    }

    /// Directory to read sector sources from, `~/.sector-growth/data` unless
    /// configured.
    pub fn resolved_data_dir(&self) -> PathBuf {
        self.data_dir
            .clone()
            .unwrap_or_else(|| app_dir().join("data"))
    }

    /// The two reference date tokens of the growth view.
    pub fn date_tokens(&self) -> Result<(&str, &str)> {
        match (self.from.as_deref(), self.to.as_deref()) {
            (Some(f), Some(t)) => Ok((f, t)),
            (None, _) => Err(SectorError::Config(
                "the growth view needs --from (no saved value either)".to_string(),
            )),
            (_, None) => Err(SectorError::Config(
                "the growth view needs --to (no saved value either)".to_string(),
            )),
        }
    }

    // --debug overrides log level.
    fn apply_debug(mut self) -> Self {
        if self.debug {
            self.log_level = "DEBUG".to_string();
        }
        self
    }
}

// ── Conversion ─────────────────────────────────────────────────────────────────

impl From<&Settings> for LastUsedParams {
    fn from(s: &Settings) -> Self {
        LastUsedParams {
            data_dir: s.data_dir.clone(),
            view: Some(s.view.clone()),
            from: s.from.clone(),
            to: s.to.clone(),
            format: Some(s.format.clone()),
        }
    }
}

/// Returns `true` when `name` was supplied explicitly on the command line
/// (not via default value or environment variable).
fn is_arg_explicitly_set(matches: &clap::ArgMatches, name: &str) -> bool {
    matches.value_source(name) == Some(clap::parser::ValueSource::CommandLine)
}

// ── Tests ──────────────────────────────────────────────────────────────────────
