//! Error types for release-digest.
//!
//! Every failure is reported through [`ReleaseDigestError`], and every
//! variant belongs to exactly one [`ErrorKind`] so callers can tell a bad
//! setup apart from a failing remote or from bad data on disk.

use std::path::Path;
use thiserror::Error;

/// Broad failure categories of the release workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Missing or invalid configuration: nothing external was touched.
    Configuration,
    /// The remote API or git transport failed or rejected the request.
    Transport,
    /// A local file, template or repository could not be processed.
    Data,
}

/// Main error type for release-digest operations.
#[derive(Error, Debug)]
pub enum ReleaseDigestError {
    // Configuration errors
    #[error("Missing required environment variable: {0}")]
    MissingEnv(&'static str),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Configuration file parse error: {0}")]
    TomlParseError(#[from] toml::de::Error),

    #[error("URL parse error: {0}")]
    UrlError(#[from] url::ParseError),

    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] log::SetLoggerError),

    // Network/API errors
    #[error("Forge operation failed: {0}")]
    ForgeError(String),

    #[error("API authentication failed: {0}")]
    AuthenticationError(String),

    #[error("API rate limit exceeded")]
    RateLimitExceeded,

    #[error("Push of {reference} was rejected: {reason}")]
    PushRejected { reference: String, reason: String },

    #[error("Push failed: {0}")]
    PushFailed(#[source] git2::Error),

    // Git errors, classified by the libgit2 error class
    #[error("Git operation failed: {0}")]
    GitError(#[from] git2::Error),

    // Data errors
    #[error("Template rendering failed: {0}")]
    TemplateError(#[from] tera::Error),

    #[error("Failed to access {path}: {source}")]
    FileError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Changelog marker {marker:?} not found in {path}")]
    MarkerNotFound { path: String, marker: String },

    #[error("Expected exactly one version line in {path}, found {found}")]
    VersionLine { path: String, found: usize },

    #[error("Datetime parse error: {0}")]
    ChronoParseError(#[from] chrono::ParseError),
}

/// Result type alias using ReleaseDigestError
pub type Result<T> = std::result::Result<T, ReleaseDigestError>;

impl ReleaseDigestError {
    /// Create a forge error with context
    pub fn forge(msg: impl Into<String>) -> Self {
        Self::ForgeError(msg.into())
    }

    /// Create an invalid config error
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Wrap an I/O error with the path it happened on
    pub fn file(path: &Path, source: std::io::Error) -> Self {
        Self::FileError {
            path: path.display().to_string(),
            source,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingEnv(_)
            | Self::InvalidConfig(_)
            | Self::TomlParseError(_)
            | Self::UrlError(_)
            | Self::LoggerError(_) => ErrorKind::Configuration,
            Self::ForgeError(_)
            | Self::AuthenticationError(_)
            | Self::RateLimitExceeded
            | Self::PushRejected { .. }
            | Self::PushFailed(_) => ErrorKind::Transport,
            Self::GitError(err) => match err.class() {
                git2::ErrorClass::Net
                | git2::ErrorClass::Http
                | git2::ErrorClass::Ssh
                | git2::ErrorClass::Ssl => ErrorKind::Transport,
                _ => ErrorKind::Data,
            },
            Self::TemplateError(_)
            | Self::FileError { .. }
            | Self::MarkerNotFound { .. }
            | Self::VersionLine { .. }
            | Self::ChronoParseError(_) => ErrorKind::Data,
        }
    }
}

// Implement From for octocrab errors (GitHub API)
impl From<octocrab::Error> for ReleaseDigestError {
    fn from(err: octocrab::Error) -> Self {
        match &err {
            octocrab::Error::GitHub { source, .. }
                if source.message.contains("rate limit") =>
            {
                Self::RateLimitExceeded
            }
            octocrab::Error::GitHub { source, .. }
                if matches!(source.status_code.as_u16(), 401 | 403) =>
            {
                Self::AuthenticationError(source.message.clone())
            }
            _ => Self::ForgeError(format!("GitHub API error: {}", err)),
        }
    }
}
