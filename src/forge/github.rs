//! Implements the Forge trait for Github
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::*;
use octocrab::Octocrab;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};

use crate::{
    ReleaseDigestError, Result,
    forge::{
        config::RemoteConfig,
        request::{CreateReleaseRequest, PullRequest},
        traits::Forge,
    },
};

#[derive(Debug, Serialize)]
struct ListPullsParams {
    pub state: &'static str,
    pub sort: &'static str,
    pub direction: &'static str,
}

#[derive(Debug, Deserialize)]
struct GithubLabel {
    pub name: String,
}

#[derive(Debug, Deserialize)]
struct GithubPull {
    pub number: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub html_url: String,
    /// Only present on single pull request responses
    pub merged: Option<bool>,
    pub merged_at: Option<String>,
    #[serde(default)]
    pub labels: Vec<GithubLabel>,
}

impl TryFrom<GithubPull> for PullRequest {
    type Error = ReleaseDigestError;

    fn try_from(pull: GithubPull) -> Result<Self> {
        let merged_at = match pull.merged_at {
            Some(ts) => {
                Some(DateTime::parse_from_rfc3339(&ts)?.with_timezone(&Utc))
            }
            None => None,
        };

        Ok(PullRequest {
            number: pull.number,
            title: pull.title,
            html_url: pull.html_url,
            merged: pull.merged.unwrap_or(merged_at.is_some()),
            merged_at,
            labels: pull.labels.into_iter().map(|l| l.name).collect(),
        })
    }
}

/// GitHub forge implementation using Octocrab for API interactions with
/// pull requests and releases.
pub struct Github {
    config: RemoteConfig,
    base_uri: String,
    instance: Octocrab,
}

impl Github {
    /// Create GitHub client, authenticated with the personal access token
    /// when one is configured.
    pub fn new(config: RemoteConfig) -> Result<Self> {
        let base_uri = config.api_url.trim_end_matches('/').to_string();
        let mut builder =
            Octocrab::builder().base_uri(base_uri.clone()).map_err(|_| {
                ReleaseDigestError::invalid_config(format!(
                    "invalid api url: {}",
                    config.api_url
                ))
            })?;

        if let Some(token) = &config.token {
            builder =
                builder.personal_token(token.expose_secret().to_string());
        } else {
            warn!("no GITHUB_TOKEN set: using anonymous api access");
        }

        let instance = builder.build()?;

        Ok(Self {
            config,
            base_uri,
            instance,
        })
    }
}

#[async_trait]
impl Forge for Github {
    async fn list_recently_closed_pulls(&self) -> Result<Vec<PullRequest>> {
        let endpoint = format!(
            "{}/repos/{}/{}/pulls",
            self.base_uri, self.config.owner, self.config.repo
        );

        let params = ListPullsParams {
            state: "closed",
            sort: "updated",
            direction: "desc",
        };

        info!(
            "listing recently closed pull requests for {}",
            self.config.slug()
        );

        let page: Vec<GithubPull> =
            self.instance.get(endpoint, Some(&params)).await?;

        debug!("received {} closed pull requests", page.len());

        page.into_iter().map(PullRequest::try_from).collect()
    }

    async fn create_release(&self, req: CreateReleaseRequest) -> Result<()> {
        info!("creating release {} on {}", req.tag, self.config.slug());

        self.instance
            .repos(&self.config.owner, &self.config.repo)
            .releases()
            .create(&req.tag)
            .name(&req.name)
            .body(&req.body)
            .draft(false)
            .prerelease(false)
            .send()
            .await?;

        Ok(())
    }
}
