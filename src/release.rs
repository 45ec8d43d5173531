//! The release descriptor produced by one run.
use chrono::NaiveDate;

use crate::classifier::GroupedPulls;

/// Format of the release identifier: tag name, release name and version.
pub const RELEASE_ID_FORMAT: &str = "%Y.%m.%d";

/// Release identifier for a merge date, e.g. `2024.03.05`.
pub fn release_identifier(date: NaiveDate) -> String {
    date.format(RELEASE_ID_FORMAT).to_string()
}

/// Everything one run publishes. Projected into the changelog, the version
/// file, the git tag and the forge release.
#[derive(Debug, Clone)]
pub struct Release {
    pub identifier: String,
    pub merge_date: NaiveDate,
    /// Rendered markdown fragment
    pub notes: String,
    pub grouped: GroupedPulls,
}

impl Release {
    pub fn commit_message(&self) -> String {
        format!("Release {}", self.identifier)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_identifier_with_padding() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        assert_eq!(release_identifier(date), "2024.03.05");

        let date = NaiveDate::from_ymd_opt(1999, 12, 31).unwrap();
        assert_eq!(release_identifier(date), "1999.12.31");
    }

    #[test]
    fn commit_message_names_release() {
        let release = Release {
            identifier: "2024.03.05".into(),
            merge_date: NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(),
            notes: "".into(),
            grouped: GroupedPulls::default(),
        };
        assert_eq!(release.commit_message(), "Release 2024.03.05");
    }
}
