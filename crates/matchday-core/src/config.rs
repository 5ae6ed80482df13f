// Configuration loading and parsing (config/matchday.toml).

use reqwest::Url;
use serde::Deserialize;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::info;

use crate::table::SortKey;

/// Environment variable that overrides `api.base_url`.
pub const API_URL_ENV: &str = "MATCHDAY_API_URL";

const CONFIG_FILE: &str = "matchday.toml";

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },
}

// ---------------------------------------------------------------------------
// Assembled Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Config {
    pub api: ApiConfig,
    pub ui: UiConfig,
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: Url,
    pub timeout: Duration,
    pub user_agent: String,
}

#[derive(Debug, Clone)]
pub struct UiConfig {
    /// Sort applied to standings before the user picks a column.
    pub default_sort: SortKey,
    /// League selected automatically once the league list arrives.
    pub default_league: Option<String>,
    /// Number of rows highlighted at the top and bottom of the table.
    pub highlight_rows: usize,
}

impl Default for UiConfig {
    fn default() -> Self {
        UiConfig {
            default_sort: SortKey::Position,
            default_league: None,
            highlight_rows: 3,
        }
    }
}

// ---------------------------------------------------------------------------
// matchday.toml structs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
struct ConfigFile {
    api: ApiSection,
    #[serde(default)]
    ui: UiSection,
}

#[derive(Debug, Clone, Deserialize)]
struct ApiSection {
    base_url: String,
    #[serde(default = "default_timeout_secs")]
    timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    user_agent: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct UiSection {
    #[serde(default)]
    default_sort_key: Option<String>,
    #[serde(default)]
    default_league: Option<String>,
    #[serde(default)]
    highlight_rows: Option<usize>,
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_user_agent() -> String {
    format!("matchday/{}", env!("CARGO_PKG_VERSION"))
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate `config/matchday.toml` relative to `base_dir`.
///
/// `api_url_override`, when set, replaces `api.base_url` before validation.
/// Does not copy defaults; see `load_config()`.
pub fn load_config_from(
    base_dir: &Path,
    api_url_override: Option<&str>,
) -> Result<Config, ConfigError> {
    let path = base_dir.join("config").join(CONFIG_FILE);
    let text = read_file(&path)?;
    let file: ConfigFile = toml::from_str(&text).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        source: e,
    })?;

    let raw_url = api_url_override.unwrap_or(&file.api.base_url);
    let base_url = parse_base_url(raw_url)?;

    if file.api.timeout_secs == 0 {
        return Err(ConfigError::ValidationError {
            field: "api.timeout_secs".into(),
            message: "must be greater than 0".into(),
        });
    }

    let defaults = UiConfig::default();
    let default_sort = match file.ui.default_sort_key.as_deref() {
        Some(name) => name
            .parse::<SortKey>()
            .map_err(|message| ConfigError::ValidationError {
                field: "ui.default_sort_key".into(),
                message,
            })?,
        None => defaults.default_sort,
    };

    let highlight_rows = file.ui.highlight_rows.unwrap_or(defaults.highlight_rows);
    if highlight_rows == 0 {
        return Err(ConfigError::ValidationError {
            field: "ui.highlight_rows".into(),
            message: "must be greater than 0".into(),
        });
    }

    let default_league = file
        .ui
        .default_league
        .map(|l| l.trim().to_string())
        .filter(|l| !l.is_empty());

    Ok(Config {
        api: ApiConfig {
            base_url,
            timeout: Duration::from_secs(file.api.timeout_secs),
            user_agent: file.api.user_agent,
        },
        ui: UiConfig {
            default_sort,
            default_league,
            highlight_rows,
        },
    })
}

/// Seed `config/matchday.toml` from `defaults/matchday.toml` when it is
/// missing. An existing config file is never touched. The shipped default is
/// parsed first, so a broken one is reported against its own path instead of
/// being copied. Returns the path written, if any.
pub fn seed_config(base_dir: &Path) -> Result<Option<PathBuf>, ConfigError> {
    let target = base_dir.join("config").join(CONFIG_FILE);
    if target.exists() {
        return Ok(None);
    }

    let source = base_dir.join("defaults").join(CONFIG_FILE);
    if !source.exists() {
        return Err(ConfigError::DefaultsCopyError {
            message: format!(
                "{} has neither config/{CONFIG_FILE} nor defaults/{CONFIG_FILE}; \
                 run from the project root",
                base_dir.display()
            ),
        });
    }
    let text = read_file(&source)?;
    toml::from_str::<ConfigFile>(&text).map_err(|e| ConfigError::ParseError {
        path: source.clone(),
        source: e,
    })?;

    let write_error = |e: std::io::Error| ConfigError::DefaultsCopyError {
        message: format!("failed to write {}: {e}", target.display()),
    };
    if let Some(dir) = target.parent() {
        std::fs::create_dir_all(dir).map_err(write_error)?;
    }
    // create_new: a file that appeared since the check above wins.
    match std::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&target)
    {
        Ok(mut file) => file.write_all(text.as_bytes()).map_err(write_error)?,
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => return Ok(None),
        Err(e) => return Err(write_error(e)),
    }
    Ok(Some(target))
}

/// Load config relative to the current working directory, seeding missing
/// files from `defaults/` and honouring `MATCHDAY_API_URL`.
pub fn load_config() -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    if let Some(path) = seed_config(&cwd)? {
        info!(path = %path.display(), "seeded config from defaults");
    }
    let api_url = std::env::var(API_URL_ENV).ok().filter(|v| !v.trim().is_empty());
    load_config_from(&cwd, api_url.as_deref())
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw.trim()).map_err(|e| ConfigError::ValidationError {
        field: "api.base_url".into(),
        message: format!("`{raw}` is not a valid URL: {e}"),
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::ValidationError {
            field: "api.base_url".into(),
            message: format!("scheme must be http or https, got `{}`", url.scheme()),
        });
    }
    Ok(url)
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
