use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::config::DEFAULT_QBRAIDRC_FILEPATH;
use crate::errors::{QbraidChatError, Result};

const SESSION_DIR: &str = "qbraid-chat";
const SESSION_FILE: &str = "session.json";

/// Snapshot of the session handed to the dispatcher. Read-only for the
/// duration of one request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionContext {
    pub agent_behavior_enabled: bool,
}

impl SessionContext {
    pub fn new(agent_behavior_enabled: bool) -> Self {
        Self {
            agent_behavior_enabled,
        }
    }
}

/// Durable session values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    #[serde(default)]
    pub agent_behavior_enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chat_model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qbraidrc_path: Option<String>,
}

impl SessionState {
    pub fn context(&self) -> SessionContext {
        SessionContext::new(self.agent_behavior_enabled)
    }

    pub fn qbraidrc_path(&self) -> &str {
        self.qbraidrc_path
            .as_deref()
            .unwrap_or(DEFAULT_QBRAIDRC_FILEPATH)
    }
}

/// JSON-file backed session storage.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<config dir>/qbraid-chat/session.json`
    pub fn default_location() -> Result<Self> {
        let dir = dirs::config_dir().ok_or_else(|| {
            QbraidChatError::MissingConfiguration("no platform config directory".to_string())
        })?;
        Ok(Self::new(dir.join(SESSION_DIR).join(SESSION_FILE)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A missing file yields the defaults.
    pub fn load(&self) -> Result<SessionState> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "No session file, using defaults");
            return Ok(SessionState::default());
        }
        let raw = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    pub fn save(&self, state: &SessionState) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(state)?)?;
        Ok(())
    }

    /// Flips the agent behavior flag and returns the new value.
    pub fn switch_agent_behavior(&self) -> Result<bool> {
        let mut state = self.load()?;
        state.agent_behavior_enabled = !state.agent_behavior_enabled;
        self.save(&state)?;
        info!(enabled = state.agent_behavior_enabled, "Agent behavior switched");
        Ok(state.agent_behavior_enabled)
    }

    pub fn set_chat_model(&self, model: &str) -> Result<()> {
        self.update(|state| state.chat_model = Some(model.to_string()))
    }

    pub fn set_qbraidrc_path(&self, path: &str) -> Result<()> {
        self.update(|state| state.qbraidrc_path = Some(path.to_string()))
    }

    fn update(&self, apply: impl FnOnce(&mut SessionState)) -> Result<()> {
        let mut state = self.load()?;
        apply(&mut state);
        self.save(&state)
    }
}
