use thiserror::Error;

/// Error hierarchy shared by every qBraid chat crate.
///
/// Display strings are the user-facing messages; the chat boundary logs the
/// full error and shows a generic failure to the user.
#[derive(Error, Debug)]
pub enum QbraidChatError {
    // === Configuration ===
    /// The rc path cannot be expanded (no home directory for `~`).
    #[error("Your Qbraid RC file path is invalid. Please check your settings.")]
    BadQbraidRcFilepath,

    /// Blank key, or one containing whitespace.
    #[error("Your Qbraid API key is not in the correct format. Please check your settings.")]
    BadApiKeyFormat,

    #[error("Your Qbraid RC file path is invalid. Please check your settings.: {0}")]
    InvalidConfigFilePath(String),

    #[error("The user configuration is not in the correct format.")]
    BadUserConfigFormat,

    #[error("No qBraid credentials available: {0}")]
    MissingConfiguration(String),

    // === Remote API ===
    #[error("The API response format wasnt expected for the following type: {endpoint}")]
    BadApiResponseFormat {
        endpoint: String,
        violations: Vec<String>,
    },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Operation timed out after {after_ms}ms: {operation}")]
    Timeout { operation: String, after_ms: u64 },

    // === System ===
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, QbraidChatError>;

impl QbraidChatError {
    pub fn bad_response(endpoint: impl Into<String>, violations: Vec<String>) -> Self {
        Self::BadApiResponseFormat {
            endpoint: endpoint.into(),
            violations,
        }
    }

    /// Configuration problems are fixed by the user, not by retrying.
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            Self::BadQbraidRcFilepath
                | Self::BadApiKeyFormat
                | Self::InvalidConfigFilePath(_)
                | Self::BadUserConfigFormat
                | Self::MissingConfiguration(_)
        )
    }
}
