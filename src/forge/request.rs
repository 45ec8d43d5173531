use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
/// Snapshot of a closed pull request as returned by the forge.
pub struct PullRequest {
    pub number: u64,
    pub title: String,
    pub html_url: String,
    /// Whether the pull request was merged rather than just closed
    pub merged: bool,
    #[serde(skip)]
    pub merged_at: Option<DateTime<Utc>>,
    /// Label names in the order the forge returned them
    pub labels: Vec<String>,
}

impl PullRequest {
    pub fn has_label(&self, name: &str) -> bool {
        self.labels.iter().any(|l| l == name)
    }
}

#[derive(Debug, Clone, PartialEq)]
/// Request to create a release object for an already pushed tag.
pub struct CreateReleaseRequest {
    pub tag: String,
    pub name: String,
    pub body: String,
}
