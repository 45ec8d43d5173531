//! Selects the pull requests merged on the target date.
use chrono::NaiveDate;
use log::*;

use crate::{
    Result,
    forge::{request::PullRequest, traits::Forge},
};

/// Lazily keeps the pull requests that were merged on `date` (UTC calendar
/// date of the merge timestamp), in the order they were given.
pub fn merged_on(
    pulls: impl IntoIterator<Item = PullRequest>,
    date: NaiveDate,
) -> impl Iterator<Item = PullRequest> {
    pulls.into_iter().filter(move |pull| {
        pull.merged
            && pull
                .merged_at
                .is_some_and(|merged_at| merged_at.date_naive() == date)
    })
}

/// Fetch the first page of recently closed pull requests and keep the ones
/// merged on `date`.
///
/// Pull requests merged on `date` that have since dropped off the first
/// page of "recently updated" results are not seen.
pub async fn fetch_merged_pulls(
    forge: &dyn Forge,
    date: NaiveDate,
) -> Result<Vec<PullRequest>> {
    let candidates = forge.list_recently_closed_pulls().await?;
    let total = candidates.len();

    let merged = merged_on(candidates, date).collect::<Vec<PullRequest>>();

    info!(
        "found {} pull requests merged on {date} out of {total} recently closed",
        merged.len()
    );

    for pull in merged.iter() {
        debug!("merged: #{} {}", pull.number, pull.title);
    }

    Ok(merged)
}
