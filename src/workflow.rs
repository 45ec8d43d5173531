//! The release pipeline: fetch, classify, render, publish locally, publish
//! remotely.
//!
//! Stages run strictly in order. There is no rollback: a failure leaves the
//! effects of earlier stages in place.
use log::*;
use secrecy::SecretString;
use std::path::Path;

use crate::{
    Result,
    changelog::write_changelog,
    classifier::{ChangeType, group_pulls},
    config::WorkflowConfig,
    fetcher::fetch_merged_pulls,
    forge::{request::CreateReleaseRequest, traits::Forge},
    release::{Release, release_identifier},
    renderer::render_notes,
    repo::Repository,
    version::bump_version_file,
};

/// How a run ended.
#[derive(Debug)]
pub enum Outcome {
    /// Nothing was merged on the target date; nothing was touched.
    NothingMerged,
    /// Notes were rendered but nothing was written or pushed.
    DryRun(Release),
    /// Files updated, commit and tag pushed, forge release created.
    Released(Release),
}

/// Run the whole pipeline for `config.target_date`.
pub async fn run(
    config: &WorkflowConfig,
    forge: &dyn Forge,
) -> Result<Outcome> {
    let date = config.target_date;
    let identifier = release_identifier(date);

    info!(
        "preparing release {identifier} for {} (merged on {date})",
        config.remote.slug()
    );

    let pulls = fetch_merged_pulls(forge, date).await?;

    if pulls.is_empty() {
        info!("no pull requests merged on {date}: nothing to release");
        return Ok(Outcome::NothingMerged);
    }

    let grouped = group_pulls(pulls);

    for change_type in ChangeType::ALL {
        debug!("{change_type}: {}", grouped.get(change_type).len());
    }

    let notes =
        render_notes(&config.template_path(), &identifier, date, &grouped)?;

    let release = Release {
        identifier,
        merge_date: date,
        notes,
        grouped,
    };

    if config.dry_run {
        info!(
            "dry run: release notes for {}\n{}",
            release.identifier, release.notes
        );
        return Ok(Outcome::DryRun(release));
    }

    let push_url = config.remote.push_url()?;

    publish_local(config, &release, &push_url)?;

    forge
        .create_release(CreateReleaseRequest {
            tag: release.identifier.clone(),
            name: release.identifier.clone(),
            body: release.notes.clone(),
        })
        .await?;

    info!("released {}", release.identifier);

    Ok(Outcome::Released(release))
}

/// Update the changelog and version file, commit, tag and push.
fn publish_local(
    config: &WorkflowConfig,
    release: &Release,
    push_url: &SecretString,
) -> Result<()> {
    let repo = Repository::open(&config.repo_path)?;

    let branch = match &config.branch {
        Some(branch) => branch.clone(),
        None => repo.current_branch()?,
    };

    write_changelog(
        &config.changelog_path(),
        &config.files.marker,
        &release.notes,
    )?;
    bump_version_file(&config.version_path(), &release.identifier)?;

    repo.add_paths(&[
        Path::new(&config.files.changelog),
        Path::new(&config.files.version),
    ])?;

    let sha = repo.commit(&release.commit_message(), &config.author)?;
    info!("committed {sha}: {}", release.commit_message());

    repo.tag_head(&release.identifier, &config.author)?;
    repo.push(push_url, config.remote.token.as_ref(), &branch)?;

    Ok(())
}

#[cfg(test)]
#[path = "./workflow_tests.rs"]
mod tests;
