//! Inserts release notes into the changelog file after its sentinel marker.
use log::*;
use std::{fs, path::Path};

use crate::{ReleaseDigestError, Result};

/// Default sentinel marker new entries are inserted after.
pub const DEFAULT_MARKER: &str = "<!-- GENERATOR_PLACEHOLDER -->";

/// Insert `notes` right after the first occurrence of `marker`, separated
/// by a blank line. Everything before and after the marker is kept as is.
///
/// Returns `None` when the marker is missing.
pub fn insert_after_marker(
    existing: &str,
    marker: &str,
    notes: &str,
) -> Option<String> {
    if !existing.contains(marker) {
        return None;
    }

    Some(existing.replacen(marker, &format!("{marker}\n\n{notes}"), 1))
}

/// Prepend `notes` to the changelog at `path`. The file is left untouched
/// if it has no marker.
pub fn write_changelog(path: &Path, marker: &str, notes: &str) -> Result<()> {
    info!("updating changelog: {}", path.display());

    let existing = fs::read_to_string(path)
        .map_err(|err| ReleaseDigestError::file(path, err))?;

    let updated = insert_after_marker(&existing, marker, notes).ok_or_else(
        || ReleaseDigestError::MarkerNotFound {
            path: path.display().to_string(),
            marker: marker.to_string(),
        },
    )?;

    fs::write(path, updated).map_err(|err| ReleaseDigestError::file(path, err))
}
