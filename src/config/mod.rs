//! Configuration layer: typed settings with layered precedence (file → env → CLI).

use std::{path::PathBuf, str::FromStr};

use clap::{Args, builder::BoolishValueParser};
use config::{Config, Environment, File};
use serde::Deserialize;
use thiserror::Error;
use tracing::level_filters::LevelFilter;
use url::Url;

const LOCAL_CONFIG_BASENAME: &str = "photolog";
const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";
const DEFAULT_API_ROOT: &str = "/api";
const DEFAULT_SESSION_FILE: &str = "photolog-session.toml";

/// Command-line overrides shared by every front end that embeds the client.
#[derive(Debug, Args, Default, Clone)]
pub struct ConfigOverrides {
    /// Optional path to a configuration file.
    #[arg(long = "config-file", env = "PHOTOLOG_CONFIG_FILE", value_name = "PATH")]
    pub config_file: Option<PathBuf>,

    /// Server origin, e.g. <https://photos.example.com>
    #[arg(long = "site", env = "PHOTOLOG_SITE_URL", value_name = "URL")]
    pub base_url: Option<String>,

    /// Path prefix under which the REST API is mounted.
    #[arg(long = "api-root", value_name = "PATH")]
    pub api_root: Option<String>,

    /// File that persists the session token between runs.
    #[arg(long = "session-file", env = "PHOTOLOG_SESSION_FILE", value_name = "PATH")]
    pub session_file: Option<PathBuf>,

    /// Override the base log level (trace|debug|info|warn|error).
    #[arg(long = "log-level", value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Toggle JSON logging.
    #[arg(
        long = "log-json",
        value_name = "BOOL",
        value_parser = BoolishValueParser::new()
    )]
    pub log_json: Option<bool>,
}

/// Fully-resolved client settings after precedence resolution and validation.
#[derive(Debug, Clone)]
pub struct Settings {
    pub api: ApiSettings,
    pub session: SessionSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone)]
pub struct ApiSettings {
    pub base_url: Url,
    /// Always starts with `/`, never ends with one.
    pub root: String,
}

#[derive(Debug, Clone)]
pub struct SessionSettings {
    pub store_path: PathBuf,
}

#[derive(Debug, Clone)]
pub struct LoggingSettings {
    pub level: LevelFilter,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy)]
pub enum LogFormat {
    Json,
    Compact,
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to build configuration: {0}")]
    Build(#[from] config::ConfigError),
    #[error("invalid configuration for `{key}`: {reason}")]
    Invalid { key: &'static str, reason: String },
}

impl LoadError {
    fn invalid(key: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            key,
            reason: reason.into(),
        }
    }
}

/// Load settings using the configured precedence (file → environment → CLI).
pub fn load(overrides: &ConfigOverrides) -> Result<Settings, LoadError> {
    let mut builder =
        Config::builder().add_source(File::with_name(LOCAL_CONFIG_BASENAME).required(false));

    if let Some(path) = overrides.config_file.as_ref() {
        builder = builder.add_source(File::from(path.as_path()).required(true));
    }

    builder = builder.add_source(Environment::with_prefix("PHOTOLOG").separator("__"));

    let mut raw: RawSettings = builder.build()?.try_deserialize()?;
    raw.apply_overrides(overrides);
    Settings::from_raw(raw)
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawSettings {
    api: RawApiSettings,
    session: RawSessionSettings,
    logging: RawLoggingSettings,
}

impl RawSettings {
    fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        if let Some(url) = overrides.base_url.as_ref() {
            self.api.base_url = Some(url.clone());
        }
        if let Some(root) = overrides.api_root.as_ref() {
            self.api.root = Some(root.clone());
        }
        if let Some(path) = overrides.session_file.as_ref() {
            self.session.store_path = Some(path.clone());
        }
        if let Some(level) = overrides.log_level.as_ref() {
            self.logging.level = Some(level.clone());
        }
        if let Some(json) = overrides.log_json {
            self.logging.json = Some(json);
        }
    }
}

impl Settings {
    fn from_raw(raw: RawSettings) -> Result<Self, LoadError> {
        let RawSettings {
            api,
            session,
            logging,
        } = raw;

        Ok(Self {
            api: build_api_settings(api)?,
            session: build_session_settings(session)?,
            logging: build_logging_settings(logging)?,
        })
    }
}

fn build_api_settings(api: RawApiSettings) -> Result<ApiSettings, LoadError> {
    let base = api.base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
    let base_url = Url::parse(base.trim())
        .map_err(|err| LoadError::invalid("api.base_url", format!("failed to parse: {err}")))?;
    if !matches!(base_url.scheme(), "http" | "https") {
        return Err(LoadError::invalid(
            "api.base_url",
            "scheme must be http or https",
        ));
    }

    let root = api.root.unwrap_or_else(|| DEFAULT_API_ROOT.to_string());
    let root = root.trim();
    if !root.starts_with('/') {
        return Err(LoadError::invalid("api.root", "must start with `/`"));
    }
    let root = root.trim_end_matches('/').to_string();

    Ok(ApiSettings { base_url, root })
}

fn build_session_settings(session: RawSessionSettings) -> Result<SessionSettings, LoadError> {
    let store_path = session
        .store_path
        .unwrap_or_else(|| PathBuf::from(DEFAULT_SESSION_FILE));
    if store_path.as_os_str().is_empty() {
        return Err(LoadError::invalid(
            "session.store_path",
            "path must not be empty",
        ));
    }
    Ok(SessionSettings { store_path })
}

fn build_logging_settings(logging: RawLoggingSettings) -> Result<LoggingSettings, LoadError> {
    let level = match logging.level {
        Some(level) => LevelFilter::from_str(level.as_str()).map_err(|err| {
            LoadError::invalid("logging.level", format!("failed to parse: {err}"))
        })?,
        None => LevelFilter::WARN,
    };

    let format = if logging.json.unwrap_or(false) {
        LogFormat::Json
    } else {
        LogFormat::Compact
    };

    Ok(LoggingSettings { level, format })
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawApiSettings {
    base_url: Option<String>,
    root: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawSessionSettings {
    store_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawLoggingSettings {
    level: Option<String>,
    json: Option<bool>,
}
