//! Task source: turn a URL list into ordered tasks with ordinal-based paths.
//!
//! Destination paths come from the task's position, never from the URL, so
//! repeated URLs still get distinct files.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::RunError;

/// Extension given to every output file.
pub const OUTPUT_EXTENSION: &str = "html";

/// One unit of work: fetch `url`, write the body to `destination`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    index: usize,
    url: String,
    destination: PathBuf,
}

impl Task {
    pub fn new(index: usize, url: impl Into<String>, destination: impl Into<PathBuf>) -> Self {
        Self {
            index,
            url: url.into(),
            destination: destination.into(),
        }
    }

    /// 0-based position of the URL in the input list.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn destination(&self) -> &Path {
        &self.destination
    }

    pub(crate) fn into_parts(self) -> (usize, String, PathBuf) {
        (self.index, self.url, self.destination)
    }
}

/// `{dir}/{index}.html`
pub fn output_path_for(dir: &Path, index: usize) -> PathBuf {
    dir.join(format!("{}.{}", index, OUTPUT_EXTENSION))
}

/// Split a URL list into entries. Lines are trimmed (which also drops `\r`);
/// blank lines and `#` comments are skipped.
pub fn parse_url_list(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}

/// Read the whole URL list from `path`. Any read failure is fatal for the run.
pub fn read_url_list(path: &Path) -> Result<Vec<String>, RunError> {
    let text = fs::read_to_string(path).map_err(|source| RunError::InputUnavailable {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(parse_url_list(&text))
}

/// One task per URL, numbered in input order.
pub fn build_tasks<I, S>(urls: I, output_dir: &Path) -> Vec<Task>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    urls.into_iter()
        .enumerate()
        .map(|(index, url)| Task::new(index, url, output_path_for(output_dir, index)))
        .collect()
}
