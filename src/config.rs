//! Run configuration: process environment, command line flags and the
//! optional `release-digest.toml` file, resolved once at startup.
use chrono::{Local, NaiveDate};
use derive_builder::Builder;
use log::*;
use secrecy::SecretString;
use serde::Deserialize;
use std::{
    env, fs,
    path::{Path, PathBuf},
};

use crate::{
    ReleaseDigestError, Result,
    changelog::DEFAULT_MARKER,
    cli::Args,
    forge::config::{DEFAULT_API_URL, DEFAULT_SERVER_URL, RemoteConfig},
    version::DEFAULT_VERSION_FILE,
};

/// Default configuration filename, looked up at the repository root.
pub const DEFAULT_CONFIG_FILE: &str = "release-digest.toml";
pub const DEFAULT_CHANGELOG_FILE: &str = "CHANGELOG.md";
pub const DEFAULT_TEMPLATE_FILE: &str = ".github/changelog-template.md";
pub const DEFAULT_AUTHOR_NAME: &str = "GitHub Actions";
pub const DEFAULT_AUTHOR_EMAIL: &str = "actions@github.com";

pub const REPOSITORY_VAR: &str = "GITHUB_REPOSITORY";
pub const TOKEN_VAR: &str = "GITHUB_TOKEN";
pub const API_URL_VAR: &str = "GITHUB_API_URL";
pub const SERVER_URL_VAR: &str = "GITHUB_SERVER_URL";

/// Paths (relative to the repository root) and the changelog marker.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)] // Use default for missing fields
pub struct FilesConfig {
    /// Changelog file new entries are prepended to.
    pub changelog: String,
    /// Tera template the release notes are rendered from.
    pub template: String,
    /// Packaging file carrying the `version = "..."` line.
    pub version: String,
    /// Sentinel line new entries are inserted after.
    pub marker: String,
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            changelog: DEFAULT_CHANGELOG_FILE.into(),
            template: DEFAULT_TEMPLATE_FILE.into(),
            version: DEFAULT_VERSION_FILE.into(),
            marker: DEFAULT_MARKER.into(),
        }
    }
}

/// Identity used as commit author, committer and tagger.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AuthorConfig {
    pub name: String,
    pub email: String,
}

impl Default for AuthorConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_AUTHOR_NAME.into(),
            email: DEFAULT_AUTHOR_EMAIL.into(),
        }
    }
}

/// Root structure of `release-digest.toml`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RepoConfig {
    pub files: FilesConfig,
    pub author: AuthorConfig,
}

impl RepoConfig {
    /// Load the config file from the repository root, falling back to the
    /// defaults when there is none.
    pub fn load(repo_path: &Path) -> Result<Self> {
        let path = repo_path.join(DEFAULT_CONFIG_FILE);

        if !path.exists() {
            debug!("no {DEFAULT_CONFIG_FILE} found: using defaults");
            return Ok(Self::default());
        }

        info!("loading configuration from {}", path.display());
        let content = fs::read_to_string(&path)
            .map_err(|err| ReleaseDigestError::file(&path, err))?;

        Ok(toml::from_str(&content)?)
    }
}

/// The environment variables the job reads. Empty values count as unset.
#[derive(Debug, Default, Clone)]
pub struct EnvVars {
    pub repository: Option<String>,
    pub token: Option<String>,
    pub api_url: Option<String>,
    pub server_url: Option<String>,
}

impl EnvVars {
    pub fn from_process() -> Self {
        let var = |name: &str| env::var(name).ok().filter(|v| !v.is_empty());

        Self {
            repository: var(REPOSITORY_VAR),
            token: var(TOKEN_VAR),
            api_url: var(API_URL_VAR),
            server_url: var(SERVER_URL_VAR),
        }
    }
}

/// Split an `owner/name` repository slug.
pub fn parse_repository_slug(slug: &str) -> Result<(String, String)> {
    match slug.trim().split_once('/') {
        Some((owner, name))
            if !owner.is_empty() && !name.is_empty() && !name.contains('/') =>
        {
            Ok((owner.to_string(), name.to_string()))
        }
        _ => Err(ReleaseDigestError::invalid_config(format!(
            "{REPOSITORY_VAR} must look like owner/name, got {slug:?}"
        ))),
    }
}

/// Everything a run needs, resolved once and passed to every stage.
#[derive(Debug, Clone, Builder)]
#[builder(setter(into))]
pub struct WorkflowConfig {
    /// Forge connection and credentials.
    pub remote: RemoteConfig,
    /// Root of the local working copy.
    pub repo_path: PathBuf,
    /// Merge date the release is built from.
    pub target_date: NaiveDate,
    /// Branch to push; the checked out branch when unset.
    #[builder(setter(strip_option), default)]
    pub branch: Option<String>,
    #[builder(default)]
    pub dry_run: bool,
    #[builder(default)]
    pub files: FilesConfig,
    #[builder(default)]
    pub author: AuthorConfig,
}

impl WorkflowConfig {
    pub fn builder() -> WorkflowConfigBuilder {
        WorkflowConfigBuilder::default()
    }

    /// Resolve configuration from the running process: its environment,
    /// today's local date and the repository config file.
    pub fn from_env(args: &Args) -> Result<Self> {
        Self::from_vars(
            args,
            EnvVars::from_process(),
            Local::now().date_naive(),
        )
    }

    /// Resolve configuration from explicit inputs. The target date is
    /// `--date` when given, otherwise the day before `today`.
    pub fn from_vars(
        args: &Args,
        vars: EnvVars,
        today: NaiveDate,
    ) -> Result<Self> {
        let slug = vars
            .repository
            .ok_or(ReleaseDigestError::MissingEnv(REPOSITORY_VAR))?;
        let (owner, repo) = parse_repository_slug(&slug)?;

        let remote = RemoteConfig {
            owner,
            repo,
            api_url: vars.api_url.unwrap_or_else(|| DEFAULT_API_URL.into()),
            server_url: vars
                .server_url
                .unwrap_or_else(|| DEFAULT_SERVER_URL.into()),
            token: vars.token.map(SecretString::from),
        };

        let target_date = match args.date {
            Some(date) => date,
            None => today.pred_opt().ok_or_else(|| {
                ReleaseDigestError::invalid_config(format!(
                    "no day before {today}"
                ))
            })?,
        };

        let repo_config = RepoConfig::load(&args.repo_path)?;

        let mut builder = Self::builder();
        builder
            .remote(remote)
            .repo_path(args.repo_path.clone())
            .target_date(target_date)
            .dry_run(args.dry_run)
            .files(repo_config.files)
            .author(repo_config.author);

        if let Some(branch) = &args.branch {
            builder.branch(branch.clone());
        }

        builder
            .build()
            .map_err(|err| ReleaseDigestError::invalid_config(err.to_string()))
    }

    pub fn changelog_path(&self) -> PathBuf {
        self.repo_path.join(&self.files.changelog)
    }

    pub fn template_path(&self) -> PathBuf {
        self.repo_path.join(&self.files.template)
    }

    pub fn version_path(&self) -> PathBuf {
        self.repo_path.join(&self.files.version)
    }
}
