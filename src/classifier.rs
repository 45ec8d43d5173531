//! Groups merged pull requests by the kind of change they carry.
use serde::Serialize;
use std::{collections::BTreeMap, fmt};

use crate::forge::request::PullRequest;

/// Label marking dependency or tooling updates.
pub const UPDATE_LABEL: &str = "update";
/// Label marking bug fixes.
pub const BUG_LABEL: &str = "bug";

/// Changelog category. The declaration order is the order categories are
/// rendered in.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize,
)]
pub enum ChangeType {
    Changed,
    Fixed,
    Updated,
}

impl ChangeType {
    pub const ALL: [ChangeType; 3] =
        [ChangeType::Changed, ChangeType::Fixed, ChangeType::Updated];
}

impl fmt::Display for ChangeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ChangeType::Changed => "Changed",
            ChangeType::Fixed => "Fixed",
            ChangeType::Updated => "Updated",
        };
        write!(f, "{name}")
    }
}

/// Pull requests keyed by category. All categories are always present so
/// templates can enumerate them even when empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct GroupedPulls(BTreeMap<ChangeType, Vec<PullRequest>>);

impl Default for GroupedPulls {
    fn default() -> Self {
        Self(
            ChangeType::ALL
                .into_iter()
                .map(|change_type| (change_type, vec![]))
                .collect(),
        )
    }
}

impl GroupedPulls {
    pub fn get(&self, change_type: ChangeType) -> &[PullRequest] {
        self.0
            .get(&change_type)
            .map(|pulls| pulls.as_slice())
            .unwrap_or_default()
    }

    pub fn iter(
        &self,
    ) -> impl Iterator<Item = (&ChangeType, &Vec<PullRequest>)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.values().map(|pulls| pulls.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn push(&mut self, change_type: ChangeType, pull: PullRequest) {
        self.0.entry(change_type).or_default().push(pull);
    }
}

/// `update` wins over `bug`; anything else is a plain change.
pub fn classify(pull: &PullRequest) -> ChangeType {
    if pull.has_label(UPDATE_LABEL) {
        ChangeType::Updated
    } else if pull.has_label(BUG_LABEL) {
        ChangeType::Fixed
    } else {
        ChangeType::Changed
    }
}

pub fn group_pulls(
    pulls: impl IntoIterator<Item = PullRequest>,
) -> GroupedPulls {
    let mut grouped = GroupedPulls::default();

    for pull in pulls {
        let change_type = classify(&pull);
        grouped.push(change_type, pull);
    }

    grouped
}
