//! Interface to the hosted forge (GitHub) the release is published to.
//!
//! Provides token-based authentication, the pull request listing the
//! changelog is built from, and release creation through a common trait.

/// Configuration and authentication for the forge.
pub mod config;

/// GitHub API client implementation for GitHub.com and Enterprise.
pub mod github;

/// Shared request and response types.
pub mod request;

/// Common trait for forge platform abstraction.
pub mod traits;
