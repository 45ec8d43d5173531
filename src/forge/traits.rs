//! Traits related to remote git forges
use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

use crate::{
    Result,
    forge::request::{CreateReleaseRequest, PullRequest},
};

#[cfg_attr(test, automock)]
#[async_trait]
pub trait Forge: Send + Sync {
    /// Returns the first page of closed pull requests, most recently
    /// updated first. Later pages are never requested.
    async fn list_recently_closed_pulls(&self) -> Result<Vec<PullRequest>>;

    /// Creates a published (non-draft, non-prerelease) release.
    async fn create_release(&self, req: CreateReleaseRequest) -> Result<()>;
}
