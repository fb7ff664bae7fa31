use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::Deserialize;
use thiserror::Error;

/// Environment variable holding the chunirec access token.
pub const TOKEN_ENV: &str = "CHUNIREC_TOKEN";

pub const DEFAULT_API_BASE: &str = "https://api.chunirec.net/2.0";
pub const DEFAULT_REGION: &str = "jp2";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("No access token: set CHUNIREC_TOKEN or `token` in the config file")]
    MissingToken,
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Application configuration loaded from TOML config file.
/// All fields have sensible defaults; the config file is optional.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// chunirec API root.
    pub api_base: String,
    /// Server region passed with every request.
    pub region: String,
    /// Fallback token when the environment variable is unset.
    pub token: Option<String>,
    /// Player to fetch records for. Unset = token owner.
    pub user_name: Option<String>,
    /// Markdown report settings.
    pub report: ReportConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            region: DEFAULT_REGION.to_string(),
            token: None,
            user_name: None,
            report: ReportConfig::default(),
        }
    }
}

/// Markdown report configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Output file, overwritten on every run.
    pub output: PathBuf,
    /// JSON file mapping "<title> <diff>" to a video URL.
    pub video_links: PathBuf,
    /// Lowest chart constant included in the table.
    pub min_const: f64,
    /// Document heading.
    pub title: String,
    /// Paragraph between the heading and the table.
    pub note: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            output: PathBuf::from("readme.md"),
            video_links: PathBuf::from("yt_url.json"),
            min_const: crate::select::DEFAULT_MIN_CONST,
            title: "14+以上のリザルトと手元動画".to_string(),
            note: "スコアと対応してない動画があるのでがんばって撮る".to_string(),
        }
    }
}

/// Everything the API client needs. Built once and handed to the client.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    pub region: String,
    pub token: String,
}

impl AppConfig {
    /// Load config from `~/.config/chunireport/config.toml`.
    /// Returns default config if file doesn't exist.
    /// Logs a warning if the file exists but can't be parsed.
    pub fn load() -> Self {
        match Self::config_path() {
            Some(path) if path.exists() => match Self::load_from(&path) {
                Ok(config) => config,
                Err(e) => {
                    log::warn!("{e}. Using defaults.");
                    Self::default()
                }
            },
            _ => {
                log::debug!("No config file found, using defaults");
                Self::default()
            }
        }
    }

    /// Load an explicitly named config file. Unlike [`AppConfig::load`], failures are errors.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = toml::from_str::<AppConfig>(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Resolve the API settings, taking the token from the environment first.
    pub fn api(&self) -> Result<ApiConfig, ConfigError> {
        self.api_with_env_token(std::env::var(TOKEN_ENV).ok())
    }

    /// Same as [`AppConfig::api`] with the environment value supplied by the caller.
    pub fn api_with_env_token(&self, env_token: Option<String>) -> Result<ApiConfig, ConfigError> {
        let token = env_token
            .filter(|t| !t.trim().is_empty())
            .or_else(|| self.token.clone().filter(|t| !t.trim().is_empty()))
            .ok_or(ConfigError::MissingToken)?;

        Ok(ApiConfig {
            base_url: self.api_base.clone(),
            region: self.region.clone(),
            token,
        })
    }

    /// Get the config file path.
    fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", crate::APP_NAME)
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }
}
