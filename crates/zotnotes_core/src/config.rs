//! TOML configuration for library access, output and logging.
//!
//! # Responsibility
//! - Resolve and load the config file.
//! - Validate required fields before any network call is made.
//!
//! # Invariants
//! - `ZOTERO_API_KEY` overrides `library.api_key` when set and non-blank.
//! - A group library always carries a `group_id`.

use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// Default config file name looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "zotnotes.toml";
/// Environment variable naming an explicit config path.
pub const CONFIG_PATH_ENV: &str = "ZOTNOTES_CONFIG";
/// Environment variable overriding the API key.
pub const API_KEY_ENV: &str = "ZOTERO_API_KEY";

/// Errors from loading or validating configuration.
#[derive(Debug)]
pub enum ConfigError {
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse(toml::de::Error),
    /// Required field is absent or blank.
    MissingField(&'static str),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Read { path, source } => {
                write!(f, "failed to read config `{}`: {source}", path.display())
            }
            Self::Parse(err) => write!(f, "invalid config: {err}"),
            Self::MissingField(field) => write!(f, "missing required config field `{field}`"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Read { source, .. } => Some(source),
            Self::Parse(err) => Some(err),
            Self::MissingField(_) => None,
        }
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(value: toml::de::Error) -> Self {
        Self::Parse(value)
    }
}

/// Which kind of library the API prefix addresses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LibraryKind {
    #[default]
    User,
    Group,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LibraryConfig {
    pub user_id: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub kind: LibraryKind,
    #[serde(default)]
    pub group_id: Option<String>,
    /// Overrides `https://api.zotero.org`.
    #[serde(default)]
    pub base_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OutputConfig {
    pub directory: PathBuf,
}

/// Fallback queries used when the command line omits them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct DefaultsConfig {
    #[serde(default)]
    pub collection: Option<String>,
    #[serde(default)]
    pub search: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub level: Option<String>,
    /// Rolling log directory. Logs go to stderr when unset.
    #[serde(default)]
    pub directory: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AppConfig {
    pub library: LibraryConfig,
    pub output: OutputConfig,
    #[serde(default)]
    pub defaults: DefaultsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Reads, parses and validates the file at `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text, std::env::var(API_KEY_ENV).ok())
    }

    /// Parses and validates config text, applying an optional key override.
    pub fn from_toml_str(
        text: &str,
        api_key_override: Option<String>,
    ) -> Result<Self, ConfigError> {
        let mut config: AppConfig = toml::from_str(text)?;
        if let Some(key) = api_key_override.filter(|key| !key.trim().is_empty()) {
            config.library.api_key = Some(key);
        }
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.library.user_id.trim().is_empty() {
            return Err(ConfigError::MissingField("library.user_id"));
        }
        if is_blank(self.library.api_key.as_deref()) {
            return Err(ConfigError::MissingField("library.api_key"));
        }
        if self.library.kind == LibraryKind::Group
            && is_blank(self.library.group_id.as_deref())
        {
            return Err(ConfigError::MissingField("library.group_id"));
        }
        if self.output.directory.as_os_str().is_empty() {
            return Err(ConfigError::MissingField("output.directory"));
        }
        Ok(())
    }
}

/// Picks the config path: explicit argument, then env var, then the default
/// file in the working directory.
pub fn resolve_config_path(explicit: Option<&Path>) -> PathBuf {
    if let Some(path) = explicit {
        return path.to_path_buf();
    }
    match std::env::var(CONFIG_PATH_ENV) {
        Ok(value) if !value.trim().is_empty() => PathBuf::from(value.trim()),
        _ => PathBuf::from(DEFAULT_CONFIG_FILE),
    }
}

fn is_blank(value: Option<&str>) -> bool {
    value.map_or(true, |value| value.trim().is_empty())
}
