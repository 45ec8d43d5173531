//! Git operations on the local working copy.
//!
//! Wraps `git2::Repository` with the handful of operations a release needs:
//!
//! - Staging an explicit list of files
//! - Committing with a fixed identity
//! - Annotated tagging of the new commit
//! - Pushing the branch and all tags to an authenticated URL
//!
//! # Authentication
//!
//! The push URL carries the token as its user name. The same token is also
//! answered through the credentials callback in case the transport asks for
//! it. Neither is ever logged.
use git2::RemoteCallbacks;
use log::*;
use secrecy::{ExposeSecret, SecretString};
use std::{cell::RefCell, path::Path};

use crate::{
    ReleaseDigestError, Result, config::AuthorConfig, forge::config::redact_url,
};

/// Password sent alongside a token user name over HTTPS.
const TOKEN_PASSWORD: &str = "x-oauth-basic";

/// Create Git authentication callbacks answering with the given token.
fn get_auth_callbacks<'r>(token: Option<String>) -> RemoteCallbacks<'r> {
    let mut callbacks = git2::RemoteCallbacks::new();
    callbacks.credentials(move |_url, username_from_url, _allowed| {
        let user = token.as_deref().or(username_from_url).unwrap_or_default();
        git2::Cred::userpass_plaintext(user, TOKEN_PASSWORD)
    });
    callbacks
}

/// Handle on the local working copy the release is made from.
pub struct Repository {
    repo: git2::Repository,
}

impl Repository {
    /// Open the repository whose working directory is `path`.
    pub fn open(path: &Path) -> Result<Self> {
        debug!("opening repository at {}", path.display());
        let repo = git2::Repository::open(path)?;
        Ok(Self { repo })
    }

    /// Get the repository's working directory path.
    pub fn workdir(&self) -> Result<&Path> {
        self.repo.workdir().ok_or_else(|| {
            ReleaseDigestError::invalid_config(
                "repository has no working directory",
            )
        })
    }

    /// Name of the checked out branch.
    pub fn current_branch(&self) -> Result<String> {
        let head = self.repo.head()?;

        if !head.is_branch() {
            return Err(ReleaseDigestError::invalid_config(
                "HEAD is detached: pass --branch to choose the branch to push",
            ));
        }

        head.shorthand().map(|name| name.to_string()).ok_or_else(|| {
            ReleaseDigestError::invalid_config(
                "current branch name is not valid utf-8",
            )
        })
    }

    /// Stage exactly the given paths, relative to the working directory.
    pub fn add_paths(&self, paths: &[&Path]) -> Result<()> {
        let mut index = self.repo.index()?;
        for path in paths {
            debug!("adding {} to index", path.display());
            index.add_path(path)?;
        }
        index.write()?;
        Ok(())
    }

    /// Commit the index on top of HEAD as `author` (also the committer).
    /// Returns the new commit id.
    pub fn commit(&self, msg: &str, author: &AuthorConfig) -> Result<String> {
        debug!("committing changes with msg: {msg}");
        let signature = git2::Signature::now(&author.name, &author.email)?;
        let mut index = self.repo.index()?;
        let oid = index.write_tree()?;
        let tree = self.repo.find_tree(oid)?;
        let parent_commit = self.repo.head()?.peel_to_commit()?;
        let commit = self.repo.commit(
            Some("HEAD"),
            &signature,
            &signature,
            msg,
            &tree,
            &[&parent_commit],
        )?;
        Ok(commit.to_string())
    }

    /// Create an annotated tag on HEAD, using the tag name as its message.
    pub fn tag_head(&self, tag: &str, tagger: &AuthorConfig) -> Result<()> {
        info!("creating annotated tag: {tag}");
        let commit = self.repo.head()?.peel_to_commit()?;
        let signature = git2::Signature::now(&tagger.name, &tagger.email)?;
        self.repo
            .tag(tag, commit.as_object(), &signature, tag, false)?;
        Ok(())
    }

    /// Push HEAD to `branch` on `url`, then push every local tag. Any
    /// failure of the push itself is a transport error.
    pub fn push(
        &self,
        url: &SecretString,
        token: Option<&SecretString>,
        branch: &str,
    ) -> Result<()> {
        let branch_spec = format!("HEAD:refs/heads/{branch}");
        info!(
            "pushing branch {branch} to {}",
            redact_url(url.expose_secret())
        );
        self.push_refspecs(url, token, &[branch_spec])?;

        let tag_specs = self
            .repo
            .tag_names(None)?
            .iter()
            .flatten()
            .map(|tag| format!("refs/tags/{tag}:refs/tags/{tag}"))
            .collect::<Vec<String>>();

        info!("pushing {} tags", tag_specs.len());
        self.push_refspecs(url, token, &tag_specs)
    }

    fn push_refspecs(
        &self,
        url: &SecretString,
        token: Option<&SecretString>,
        refspecs: &[String],
    ) -> Result<()> {
        if refspecs.is_empty() {
            return Ok(());
        }

        let rejected: RefCell<Vec<(String, String)>> = RefCell::new(vec![]);

        {
            let mut callbacks = get_auth_callbacks(
                token.map(|t| t.expose_secret().to_string()),
            );
            callbacks.push_update_reference(|reference, status| {
                if let Some(reason) = status {
                    rejected
                        .borrow_mut()
                        .push((reference.to_string(), reason.to_string()));
                }
                Ok(())
            });

            let mut push_opts = git2::PushOptions::default();
            push_opts.remote_callbacks(callbacks);

            let mut remote = self
                .repo
                .remote_anonymous(url.expose_secret())
                .map_err(ReleaseDigestError::PushFailed)?;
            remote
                .push(refspecs, Some(&mut push_opts))
                .map_err(ReleaseDigestError::PushFailed)?;
        }

        if let Some((reference, reason)) =
            rejected.into_inner().into_iter().next()
        {
            return Err(ReleaseDigestError::PushRejected { reference, reason });
        }

        Ok(())
    }
}
