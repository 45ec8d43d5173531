//! Renders the release notes fragment from the repository's template.
//!
//! Templates use [Tera](https://github.com/Keats/tera) syntax and receive:
//!
//! - `release`: the release identifier (`YYYY.MM.DD`)
//! - `merge_date`: the target merge date (`YYYY-MM-DD`)
//! - `grouped_pulls`: an ordered map of category name (`Changed`, `Fixed`,
//!   `Updated`) to the list of pull requests in it, each with `number`,
//!   `title`, `html_url`, `merged` and `labels`
//!
//! Every interpolated value is escaped unless piped through `| safe`.
use chrono::NaiveDate;
use log::*;
use regex::Regex;
use std::{fs, path::Path, sync::LazyLock};
use tera::{Context, Tera};

use crate::{ReleaseDigestError, Result, classifier::GroupedPulls};

/// Name the template is registered under; its suffix turns autoescape on.
const TEMPLATE_NAME: &str = "changelog-template.md";
const AUTOESCAPE_SUFFIX: &str = ".md";

static EXTRA_NEW_LINES_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{3,}").unwrap());

/// Markup-safe escaping: `&`, `<`, `>`, `"` and `'`. Slashes are left alone
/// so links keep working in rendered markdown.
pub fn escape_markup(input: &str) -> String {
    let mut output = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => output.push_str("&amp;"),
            '<' => output.push_str("&lt;"),
            '>' => output.push_str("&gt;"),
            '"' => output.push_str("&#34;"),
            '\'' => output.push_str("&#39;"),
            _ => output.push(c),
        }
    }
    output
}

/// Collapse runs of blank lines and trim the result.
pub fn strip_extra_lines(notes: &str) -> String {
    EXTRA_NEW_LINES_REGEX
        .replace_all(notes, "\n\n")
        .trim()
        .to_string()
}

/// Render an in-memory template.
pub fn render_template(
    template: &str,
    release: &str,
    merge_date: NaiveDate,
    grouped: &GroupedPulls,
) -> Result<String> {
    let mut tera = Tera::default();
    tera.autoescape_on(vec![AUTOESCAPE_SUFFIX]);
    tera.set_escape_fn(escape_markup);
    tera.add_raw_template(TEMPLATE_NAME, template)?;

    let mut context = Context::new();
    context.insert("release", release);
    context.insert("merge_date", &merge_date.format("%Y-%m-%d").to_string());
    context.insert("grouped_pulls", grouped);

    let notes = tera.render(TEMPLATE_NAME, &context)?;

    Ok(strip_extra_lines(&notes))
}

/// Load the template at `template_path` and render it.
pub fn render_notes(
    template_path: &Path,
    release: &str,
    merge_date: NaiveDate,
    grouped: &GroupedPulls,
) -> Result<String> {
    debug!("loading changelog template: {}", template_path.display());

    let template = fs::read_to_string(template_path)
        .map_err(|err| ReleaseDigestError::file(template_path, err))?;

    render_template(&template, release, merge_date, grouped)
}
