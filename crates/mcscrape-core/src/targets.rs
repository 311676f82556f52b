//! Target list loading.
//!
//! Reads a header-row CSV, picks the identifier from the first admissible
//! column alias, trims, drops blanks, and de-duplicates in first-seen order.

use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

use thiserror::Error;

/// Header aliases accepted for the identifier column, in priority order.
/// `Symbo1` is a misspelling that appears in real exports.
pub const SYMBOL_COLUMN_ALIASES: &[&str] = &["Symbo1", "Symbol", "symbol"];

/// One ticker symbol. Never empty and never padded with whitespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Target(String);

impl Target {
    /// Build a target from raw input; returns `None` for blank input.
    #[must_use]
    pub fn new(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Target {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Error)]
pub enum InputError {
    #[error("failed to read target list {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed target list: {0}")]
    Csv(#[from] csv::Error),

    #[error("target list has no symbol column (expected one of: {})", SYMBOL_COLUMN_ALIASES.join(", "))]
    MissingColumn,

    #[error("no valid symbols found in target list")]
    Empty,
}

/// Load and de-duplicate the target list at `path`.
///
/// # Errors
///
/// - [`InputError::Io`] if the file cannot be opened.
/// - [`InputError::Csv`] if a row cannot be parsed.
/// - [`InputError::MissingColumn`] if no header matches an alias.
/// - [`InputError::Empty`] if no row carries a non-blank symbol.
pub fn load_targets(path: &Path) -> Result<Vec<Target>, InputError> {
    let file = std::fs::File::open(path).map_err(|e| InputError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    parse_targets(file)
}

/// Parse a target list from any reader. See [`load_targets`].
///
/// # Errors
///
/// Same as [`load_targets`] minus the file-open failure.
pub fn parse_targets<R: Read>(reader: R) -> Result<Vec<Target>, InputError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let headers = reader.headers()?.clone();
    let alias_columns: Vec<usize> = SYMBOL_COLUMN_ALIASES
        .iter()
        .filter_map(|alias| headers.iter().position(|h| h == *alias))
        .collect();
    if alias_columns.is_empty() {
        return Err(InputError::MissingColumn);
    }

    let mut seen = HashSet::new();
    let mut targets = Vec::new();
    for row in reader.records() {
        let row = row?;
        let target = alias_columns
            .iter()
            .filter_map(|&idx| row.get(idx))
            .find_map(Target::new);
        if let Some(target) = target {
            if seen.insert(target.clone()) {
                targets.push(target);
            }
        }
    }

    if targets.is_empty() {
        return Err(InputError::Empty);
    }
    Ok(targets)
}
