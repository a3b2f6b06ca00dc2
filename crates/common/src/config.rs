//! User configuration: where the API lives and which key to send.
//!
//! Credentials come from a qbraidrc file (`key = value` lines) or from the
//! `QBRAID_API_KEY` / `QBRAID_API_URL` environment variables.

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::errors::{QbraidChatError, Result};

pub const DEFAULT_QBRAIDRC_FILEPATH: &str = "~/.qbraid/qbraidrc";
pub const DEFAULT_QBRAID_API_URL: &str = "https://api.qbraid.com/api";

const API_KEY_FIELD: &str = "api-key";
const URL_FIELD: &str = "url";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserConfig {
    pub api_url: String,
    pub api_key: String,
}

/// Resolves credentials for every outgoing request.
pub trait UserConfigProvider: Send + Sync {
    fn user_config(&self) -> Result<UserConfig>;
}

/// Fixed credentials, already resolved.
#[derive(Debug, Clone)]
pub struct StaticConfig(pub UserConfig);

impl UserConfigProvider for StaticConfig {
    fn user_config(&self) -> Result<UserConfig> {
        Ok(self.0.clone())
    }
}

/// Reads the qbraidrc file on every call so edits apply without a restart.
#[derive(Debug, Clone)]
pub struct QbraidRcConfig {
    path: String,
}

impl QbraidRcConfig {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

impl Default for QbraidRcConfig {
    fn default() -> Self {
        Self::new(DEFAULT_QBRAIDRC_FILEPATH)
    }
}

impl UserConfigProvider for QbraidRcConfig {
    fn user_config(&self) -> Result<UserConfig> {
        read_user_config(&self.path)
    }
}

/// Credentials from the environment (and `.env`, when present).
pub struct EnvConfig;

impl EnvConfig {
    pub fn load() -> Option<UserConfig> {
        dotenv::dotenv().ok();
        Self::from_vars(
            env::var("QBRAID_API_KEY").ok(),
            env::var("QBRAID_API_URL").ok(),
        )
    }

    /// The key is mandatory, the url falls back to the public API.
    pub fn from_vars(api_key: Option<String>, api_url: Option<String>) -> Option<UserConfig> {
        let api_key = api_key.filter(|k| !k.trim().is_empty())?;
        let api_url = api_url
            .filter(|u| !u.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_QBRAID_API_URL.to_string());
        Some(UserConfig { api_url, api_key })
    }
}

/// Expands `~` to the home directory and anchors relative paths at the
/// current directory. An empty path means the default location.
pub fn resolve_qbraidrc_path(file_path: &str) -> Result<PathBuf> {
    let file_path = if file_path.is_empty() {
        DEFAULT_QBRAIDRC_FILEPATH
    } else {
        file_path
    };

    if let Some(rest) = file_path.strip_prefix('~') {
        let home = dirs::home_dir().ok_or(QbraidChatError::BadQbraidRcFilepath)?;
        Ok(home.join(rest.trim_start_matches(['/', '\\'])))
    } else {
        Ok(env::current_dir()?.join(file_path))
    }
}

pub fn parse_user_config(contents: &str) -> Result<UserConfig> {
    let mut api_key = None;
    let mut api_url = None;

    for line in contents.lines() {
        let parts: Vec<&str> = line.split('=').map(str::trim).collect();
        let slot = match parts[0] {
            API_KEY_FIELD => &mut api_key,
            URL_FIELD => &mut api_url,
            _ => continue,
        };
        if parts.len() != 2 {
            return Err(QbraidChatError::BadUserConfigFormat);
        }
        *slot = Some(parts[1].to_string());
    }

    match (api_url, api_key) {
        (Some(api_url), Some(api_key)) => Ok(UserConfig { api_url, api_key }),
        _ => Err(QbraidChatError::BadUserConfigFormat),
    }
}

pub fn read_user_config(file_path: &str) -> Result<UserConfig> {
    let path = resolve_qbraidrc_path(file_path)?;
    if !path.exists() {
        return Err(QbraidChatError::MissingConfiguration(format!(
            "{} not found",
            path.display()
        )));
    }

    debug!(path = %path.display(), "Reading qbraidrc");
    let contents = fs::read_to_string(&path)?;
    parse_user_config(&contents)
}

/// Overwrites the qbraidrc with the default url and the given key.
/// The file must already exist.
pub fn save_api_key(key: &str, file_path: &str) -> Result<()> {
    if key.trim().is_empty() || key.contains(char::is_whitespace) {
        return Err(QbraidChatError::BadApiKeyFormat);
    }

    let path = resolve_qbraidrc_path(file_path)?;
    if !is_regular_file(&path) {
        return Err(QbraidChatError::InvalidConfigFilePath(format!(
            "currpath: {}",
            path.display()
        )));
    }

    let config = format!(
        "[default]\n{URL_FIELD} = {DEFAULT_QBRAID_API_URL}\n{API_KEY_FIELD} = {key}"
    );
    fs::write(&path, config)?;
    info!(path = %path.display(), "Saved api key");
    Ok(())
}

fn is_regular_file(path: &Path) -> bool {
    fs::metadata(path).map(|m| m.is_file()).unwrap_or(false)
}
