//! Bumps the version declaration of the packaging file.
use log::*;
use regex::{Captures, Regex};
use std::{fs, path::Path, sync::LazyLock};

use crate::{ReleaseDigestError, Result};

/// Default packaging file holding the version line.
pub const DEFAULT_VERSION_FILE: &str = "setup.py";

static VERSION_LINE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?m)^([ \t]*version[ \t]*=[ \t]*)(["'])\d+\.\d+\.\d+(["'])"#)
        .unwrap()
});

/// Number of `version = "X.Y.Z"` lines in `content`.
pub fn version_line_count(content: &str) -> usize {
    VERSION_LINE_REGEX.find_iter(content).count()
}

/// Swap the quoted value of the first version line for `release`. Only the
/// value between the quotes changes.
pub fn replace_version(content: &str, release: &str) -> String {
    VERSION_LINE_REGEX
        .replacen(content, 1, |caps: &Captures| {
            format!("{}{}{release}{}", &caps[1], &caps[2], &caps[3])
        })
        .to_string()
}

/// Rewrite the version line of the file at `path`. The file must contain
/// exactly one version line; otherwise it is left untouched.
pub fn bump_version_file(path: &Path, release: &str) -> Result<()> {
    info!("bumping version in {} to {release}", path.display());

    let content = fs::read_to_string(path)
        .map_err(|err| ReleaseDigestError::file(path, err))?;

    let found = version_line_count(&content);

    if found != 1 {
        return Err(ReleaseDigestError::VersionLine {
            path: path.display().to_string(),
            found,
        });
    }

    fs::write(path, replace_version(&content, release))
        .map_err(|err| ReleaseDigestError::file(path, err))
}
