//! Session and credential commands.

use anyhow::Result;
use common::{resolve_qbraidrc_path, save_api_key, SessionStore};
use tracing::info;

pub fn agent_behavior_status(enabled: bool) -> &'static str {
    if enabled {
        "QBraid Agent Behavior Enabled"
    } else {
        "QBraid Agent Behavior Disabled"
    }
}

/// Flips the agent behavior flag and returns the status line.
pub fn switch_agent_behavior(store: &SessionStore) -> Result<&'static str> {
    let enabled = store.switch_agent_behavior()?;
    info!(enabled, "Agent behavior switched");
    Ok(agent_behavior_status(enabled))
}

/// Writes the key into the qbraidrc the session points at.
pub fn set_api_key(store: &SessionStore, key: &str) -> Result<()> {
    let state = store.load()?;
    save_api_key(key, state.qbraidrc_path())?;
    Ok(())
}

/// Remembers a qbraidrc location. The file is not required to exist yet.
pub fn set_rc_path(store: &SessionStore, path: &str) -> Result<()> {
    anyhow::ensure!(!path.trim().is_empty(), "qbraidrc path must not be empty");
    // fail early on an unexpandable `~`
    resolve_qbraidrc_path(path)?;
    store.set_qbraidrc_path(path)?;
    Ok(())
}
