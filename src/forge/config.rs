//! Configuration for the forge connection and the authenticated push URL.
use secrecy::{ExposeSecret, SecretString};
use url::Url;

use crate::{ReleaseDigestError, Result};

/// Default REST API base URL.
pub const DEFAULT_API_URL: &str = "https://api.github.com";
/// Default server URL used to build the push URL.
pub const DEFAULT_SERVER_URL: &str = "https://github.com";

/// Remote repository connection configuration for authenticating and
/// interacting with the forge.
#[derive(Debug, Clone)]
pub struct RemoteConfig {
    /// Repository owner.
    pub owner: String,
    /// Repository name.
    pub repo: String,
    /// REST API base URL (e.g., "https://api.github.com").
    pub api_url: String,
    /// Server URL the git remote lives on (e.g., "https://github.com").
    pub server_url: String,
    /// Access token. Optional for reads, required for pushing and
    /// creating releases.
    pub token: Option<SecretString>,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            owner: "".to_string(),
            repo: "".to_string(),
            api_url: DEFAULT_API_URL.to_string(),
            server_url: DEFAULT_SERVER_URL.to_string(),
            token: None,
        }
    }
}

impl RemoteConfig {
    /// The `owner/name` identifier of the repository.
    pub fn slug(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }

    /// Token required for write operations.
    pub fn write_token(&self) -> Result<&SecretString> {
        self.token.as_ref().ok_or_else(|| {
            ReleaseDigestError::invalid_config(
                "GITHUB_TOKEN must be set to push and publish a release",
            )
        })
    }

    /// Build the git push URL with the token embedded as the user name,
    /// i.e. `https://<token>@github.com/<owner>/<repo>.git`.
    ///
    /// Local `file://` servers (mirrors, tests) never carry credentials.
    pub fn push_url(&self) -> Result<SecretString> {
        let token = self.write_token()?;

        let mut url = Url::parse(&format!(
            "{}/{}/{}.git",
            self.server_url.trim_end_matches('/'),
            self.owner,
            self.repo
        ))?;

        if url.scheme() != "file" {
            url.set_username(token.expose_secret()).map_err(|_| {
                ReleaseDigestError::invalid_config(format!(
                    "cannot embed credentials in server url: {}",
                    self.server_url
                ))
            })?;
        }

        Ok(SecretString::from(url.to_string()))
    }
}

/// Mask any credentials in a URL so it can be logged.
pub fn redact_url(url: &str) -> String {
    match Url::parse(url) {
        Ok(mut parsed) => {
            if !parsed.username().is_empty() {
                let _ = parsed.set_username("***");
            }
            if parsed.password().is_some() {
                let _ = parsed.set_password(None);
            }
            parsed.to_string()
        }
        Err(_) => "<unparseable url>".to_string(),
    }
}
