//! Shared building blocks for the qBraid chat workspace:
//! error taxonomy, logging setup, user configuration and session state.

pub mod config;
pub mod errors;
pub mod session;
pub mod structured_logging;

pub use config::{
    parse_user_config, read_user_config, resolve_qbraidrc_path, save_api_key, EnvConfig,
    QbraidRcConfig, StaticConfig, UserConfig, UserConfigProvider, DEFAULT_QBRAIDRC_FILEPATH,
    DEFAULT_QBRAID_API_URL,
};
pub use errors::{QbraidChatError, Result};
pub use session::{SessionContext, SessionState, SessionStore};
pub use structured_logging::{init_structured_logging, LoggingConfig, OperationTimer};
