//! Daily release automation: turns the pull requests merged on one day into
//! a changelog entry, a version bump, an annotated git tag and a GitHub
//! release.
pub mod changelog;
pub mod classifier;
pub mod cli;
pub mod config;
mod error;
pub mod fetcher;
pub mod forge;
pub mod release;
pub mod renderer;
pub mod repo;
pub mod version;
pub mod workflow;

pub use error::{ErrorKind, ReleaseDigestError, Result};

#[cfg(test)]
pub mod test_helpers;
