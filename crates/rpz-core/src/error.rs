use thiserror::Error;

/// Result type alias for rpzgen operations
pub type Result<T> = std::result::Result<T, RpzError>;

/// Errors that can occur while building an RPZ zone
#[derive(Error, Debug)]
pub enum RpzError {
    /// Configuration is invalid (mismatched counts, missing fields)
    #[error("configuration error: {0}")]
    Config(String),

    /// Unknown source format tag
    #[error("unknown source format: {0}")]
    UnknownFormat(String),

    /// Unknown policy action
    #[error("unknown policy action: {0}")]
    UnknownPolicy(String),

    /// A source could not be fetched; fatal to the whole run
    #[error("cannot fetch {format}-formatted source {url}: {reason}")]
    Fetch {
        /// Source URL that failed
        url: String,
        /// Declared format tag of the source
        format: String,
        /// Underlying transport or status failure
        reason: String,
    },

    /// HTTP transport failed
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// Temp file creation or atomic replace failed
    #[error("write to {path} failed: {reason}")]
    Write {
        /// Destination path being published
        path: String,
        /// Underlying failure
        reason: String,
    },

    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic internal error
    #[error("internal error: {0}")]
    Internal(String),
}

impl RpzError {
    /// Returns true if the error is a pre-flight configuration problem
    /// (reported before any network activity).
    #[must_use]
    pub const fn is_config_error(&self) -> bool {
        matches!(
            self,
            Self::Config(_) | Self::UnknownFormat(_) | Self::UnknownPolicy(_)
        )
    }
}
