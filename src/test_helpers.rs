//! Common test helper functions shared across test modules.
//!
//! Provides pull request fixtures and a throwaway git working copy with a
//! local bare remote to push to.
use chrono::{DateTime, Utc};
use std::{
    fs,
    path::{Path, PathBuf},
};
use tempfile::TempDir;

use crate::{
    changelog::DEFAULT_MARKER,
    forge::{config::RemoteConfig, request::PullRequest},
};

/// The changelog template shipped with the crate.
pub const TEST_TEMPLATE: &str =
    include_str!("../templates/changelog-template.md");

pub const TEST_OWNER: &str = "test";
pub const TEST_REPO: &str = "repo";
pub const TEST_BRANCH: &str = "main";

/// Release the seeded changelog already contains.
pub const PREVIOUS_ENTRY: &str = concat!(
    "## 2024.03.04\n\n### Changed\n\n",
    "- Older change ([#0](https://github.com/test/repo/pull/0))\n"
);

pub const SETUP_PY: &str = r#"from setuptools import setup

setup(
    name="app",
    version = "0.1.0",
    packages=[],
)
"#;

/// Seeded changelog content: a heading, the marker and one older entry.
pub fn changelog_content() -> String {
    format!("# Changelog\n\n{DEFAULT_MARKER}\n\n{PREVIOUS_ENTRY}")
}

/// Creates a pull request fixture. `merged_at` is an RFC 3339 timestamp;
/// the pull request counts as merged when it is given.
///
/// # Example
/// ```ignore
/// let pr = create_test_pull(42, "Fix", &["bug"], Some("2024-03-05T10:00:00Z"));
/// ```
pub fn create_test_pull(
    number: u64,
    title: &str,
    labels: &[&str],
    merged_at: Option<&str>,
) -> PullRequest {
    let merged_at = merged_at.map(|ts| {
        DateTime::parse_from_rfc3339(ts).unwrap().with_timezone(&Utc)
    });

    PullRequest {
        number,
        title: title.to_string(),
        html_url: format!("https://github.com/test/repo/pull/{number}"),
        merged: merged_at.is_some(),
        merged_at,
        labels: labels.iter().map(|l| l.to_string()).collect(),
    }
}

/// Creates a test RemoteConfig pointing at github.com.
pub fn create_test_remote_config() -> RemoteConfig {
    RemoteConfig {
        owner: TEST_OWNER.to_string(),
        repo: TEST_REPO.to_string(),
        ..RemoteConfig::default()
    }
}

/// A git working copy in a temp dir, seeded with a changelog, a version
/// file and the changelog template in one initial commit on `main`, plus
/// an empty bare remote at `<tmp>/remotes/test/repo.git`.
pub struct TestRepo {
    _tmp: TempDir,
    work: PathBuf,
    remotes: PathBuf,
}

impl TestRepo {
    pub fn new() -> Self {
        let tmp = TempDir::new().unwrap();
        let work = tmp.path().join("work");
        let remotes = tmp.path().join("remotes");

        let mut opts = git2::RepositoryInitOptions::new();
        opts.initial_head(TEST_BRANCH);
        let repo = git2::Repository::init_opts(&work, &opts).unwrap();

        fs::create_dir_all(work.join(".github")).unwrap();
        fs::write(work.join("CHANGELOG.md"), changelog_content()).unwrap();
        fs::write(work.join("setup.py"), SETUP_PY).unwrap();
        fs::write(work.join(".github/changelog-template.md"), TEST_TEMPLATE)
            .unwrap();

        let mut index = repo.index().unwrap();
        for path in ["CHANGELOG.md", "setup.py", ".github/changelog-template.md"]
        {
            index.add_path(Path::new(path)).unwrap();
        }
        index.write().unwrap();

        let tree = repo.find_tree(index.write_tree().unwrap()).unwrap();
        let sig = git2::Signature::now("Test", "test@example.com").unwrap();
        repo.commit(Some("HEAD"), &sig, &sig, "initial", &tree, &[])
            .unwrap();

        git2::Repository::init_bare(
            remotes.join(TEST_OWNER).join(format!("{TEST_REPO}.git")),
        )
        .unwrap();

        Self {
            _tmp: tmp,
            work,
            remotes,
        }
    }

    /// Working directory of the local clone.
    pub fn path(&self) -> &Path {
        &self.work
    }

    pub fn branch(&self) -> String {
        TEST_BRANCH.to_string()
    }

    pub fn git(&self) -> git2::Repository {
        git2::Repository::open(&self.work).unwrap()
    }

    /// The bare repository pushes land in.
    pub fn remote(&self) -> git2::Repository {
        git2::Repository::open_bare(
            self.remotes.join(TEST_OWNER).join(format!("{TEST_REPO}.git")),
        )
        .unwrap()
    }

    /// `file://` server URL the bare remote lives under.
    pub fn server_url(&self) -> String {
        url::Url::from_directory_path(&self.remotes)
            .unwrap()
            .to_string()
    }

    pub fn remote_url(&self) -> String {
        format!(
            "{}/{TEST_OWNER}/{TEST_REPO}.git",
            self.server_url().trim_end_matches('/')
        )
    }

    /// Remote config pushing to the local bare remote.
    pub fn remote_config(&self, token: Option<&str>) -> RemoteConfig {
        RemoteConfig {
            server_url: self.server_url(),
            token: token.map(|t| t.to_string().into()),
            ..create_test_remote_config()
        }
    }

    /// Put an unrelated commit on `branch` of the bare remote so pushes of
    /// local history to it are no longer fast-forwards.
    pub fn diverge_remote(&self, branch: &str) -> git2::Oid {
        let remote = self.remote();
        let tree = remote.treebuilder(None).unwrap().write().unwrap();
        let tree = remote.find_tree(tree).unwrap();
        let sig = git2::Signature::now("Other", "other@example.com").unwrap();
        remote
            .commit(
                Some(&format!("refs/heads/{branch}")),
                &sig,
                &sig,
                "diverged",
                &tree,
                &[],
            )
            .unwrap()
    }

    pub fn read(&self, path: &str) -> String {
        fs::read_to_string(self.work.join(path)).unwrap()
    }

    pub fn head(&self) -> git2::Oid {
        self.git().head().unwrap().target().unwrap()
    }

    /// Files changed by `commit` relative to its first parent, sorted.
    pub fn changed_files(&self, commit: git2::Oid) -> Vec<String> {
        let git = self.git();
        let commit = git.find_commit(commit).unwrap();
        let tree = commit.tree().unwrap();
        let parent_tree = commit.parent(0).unwrap().tree().unwrap();
        let diff = git
            .diff_tree_to_tree(Some(&parent_tree), Some(&tree), None)
            .unwrap();

        let mut files = diff
            .deltas()
            .filter_map(|d| d.new_file().path().map(|p| p.display().to_string()))
            .collect::<Vec<String>>();
        files.sort();
        files
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_test_pull() {
        let pr =
            create_test_pull(42, "Fix", &["bug"], Some("2024-03-05T10:00:00Z"));
        assert_eq!(pr.number, 42);
        assert!(pr.merged);
        assert!(pr.has_label("bug"));
        assert_eq!(pr.html_url, "https://github.com/test/repo/pull/42");

        let closed = create_test_pull(7, "Closed", &[], None);
        assert!(!closed.merged);
    }

    #[test]
    fn test_repo_is_seeded() {
        let test_repo = TestRepo::new();
        assert_eq!(test_repo.read("CHANGELOG.md"), changelog_content());
        assert_eq!(test_repo.read("setup.py"), SETUP_PY);
        assert!(test_repo.server_url().starts_with("file://"));
        assert!(test_repo.remote().is_empty().unwrap());
        assert_eq!(
            test_repo.git().head().unwrap().shorthand(),
            Some(TEST_BRANCH)
        );
    }
}
