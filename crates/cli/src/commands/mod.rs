pub mod config;
pub mod models;

pub use config::{agent_behavior_status, set_api_key, set_rc_path, switch_agent_behavior};
pub use models::{resolve_model, select_model, ModelsCommand};
