use thiserror::Error;

/// Unified error type for release-dashboard operations
#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "fetch")]
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Request to {url} failed with status {status}")]
    HttpStatus { url: String, status: u16 },

    #[error("Unsupported source: {0}")]
    UnsupportedSource(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Preferences error: {0}")]
    Preferences(String),

    #[error("Unknown change type: {0}")]
    InvalidChangeType(String),

    #[error("Unknown filter dimension: {0}")]
    InvalidDimension(String),

    #[error("Terminal error: {0}")]
    Terminal(String),
}

/// Convenience type alias for Results in release-dashboard
pub type Result<T> = std::result::Result<T, DashboardError>;

impl DashboardError {
    pub fn config(msg: impl Into<String>) -> Self {
        DashboardError::Config(msg.into())
    }

    pub fn preferences(msg: impl Into<String>) -> Self {
        DashboardError::Preferences(msg.into())
    }

    pub fn terminal(msg: impl Into<String>) -> Self {
        DashboardError::Terminal(msg.into())
    }

    /// Whether this error came from loading the input data
    pub fn is_load_failure(&self) -> bool {
        match self {
            DashboardError::Io(_)
            | DashboardError::HttpStatus { .. }
            | DashboardError::UnsupportedSource(_) => true,
            #[cfg(feature = "fetch")]
            DashboardError::Http(_) => true,
            _ => false,
        }
    }
}
