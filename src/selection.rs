//! Track list rendering and selection parsing
//!
//! A selection expression is a comma-separated list of tokens, each either a
//! single 1-based index (`3`) or an inclusive range (`1-5`). Whitespace
//! around tokens and numbers is ignored, so `" 1 , 3 - 5,8"` is the same as
//! `"1,3-5,8"`.
//!
//! Out-of-bounds indices and ranges are dropped with a warning while the
//! remaining tokens still apply. A token that is not numeric rejects the whole
//! expression.

use crate::error::SelectionError;
use crate::types::Track;
use std::collections::BTreeSet;
use std::fmt;
use std::fmt::Write as _;
use std::str::FromStr;
use tracing::warn;

const RULE_WIDTH: usize = 80;

/// Top-level menu answer
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuChoice {
    /// Download every track ("1")
    All,
    /// Enter a selection expression ("2")
    Pick,
}

impl FromStr for MenuChoice {
    type Err = SelectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "1" => Ok(MenuChoice::All),
            "2" => Ok(MenuChoice::Pick),
            other => Err(SelectionError::InvalidMenuChoice(other.to_string())),
        }
    }
}

/// A token that was dropped without rejecting the expression
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SelectionWarning {
    /// A single index outside `[1, total]`
    IndexOutOfRange {
        /// The index as entered
        index: i64,
    },
    /// A range with `start < 1`, `end > total` or `start > end`
    InvalidRange {
        /// Range start as entered
        start: i64,
        /// Range end as entered
        end: i64,
    },
}

impl fmt::Display for SelectionWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectionWarning::IndexOutOfRange { index } => {
                write!(f, "index {} is out of range, ignored", index)
            }
            SelectionWarning::InvalidRange { start, end } => {
                write!(f, "range {}-{} is invalid, ignored", start, end)
            }
        }
    }
}

/// Sorted, de-duplicated 1-based track indices
///
/// Every index lies in `[1, total]` for the `total` it was built with.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Selection {
    indices: Vec<usize>,
    warnings: Vec<SelectionWarning>,
}

impl Selection {
    /// Every index from 1 to `total`
    pub fn all(total: usize) -> Self {
        Self {
            indices: (1..=total).collect(),
            warnings: Vec::new(),
        }
    }

    /// Indices in ascending order
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// Tokens that were dropped while parsing
    pub fn warnings(&self) -> &[SelectionWarning] {
        &self.warnings
    }

    /// Number of selected tracks
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// Returns true if nothing was selected
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// Format tracks as a 1-indexed table of `name - artists`
pub fn render_list(tracks: &[Track]) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    let mut out = String::new();

    let _ = writeln!(out, "{}", rule);
    let _ = writeln!(out, "Tracks:");
    let _ = writeln!(out, "{}", rule);
    for (idx, track) in tracks.iter().enumerate() {
        let _ = writeln!(out, "{:3}. {}", idx + 1, track.display_name());
    }
    let _ = writeln!(out, "{}", rule);

    out
}

/// Parse a selection expression against a playlist of `total` tracks
///
/// # Errors
/// Returns [`SelectionError::InvalidToken`] if any token is not an integer or
/// an `A-B` range of integers. Indices parsed before the bad token are
/// discarded.
///
/// # Examples
///
/// ```
/// use playlist_dl::selection::parse_selection;
///
/// let selection = parse_selection("1,3-5,8", 10).unwrap();
/// assert_eq!(selection.indices(), &[1, 3, 4, 5, 8]);
/// ```
pub fn parse_selection(input: &str, total: usize) -> Result<Selection, SelectionError> {
    let total = i64::try_from(total).unwrap_or(i64::MAX);
    let mut selected = BTreeSet::new();
    let mut warnings = Vec::new();

    for token in input.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        match token.split_once('-') {
            Some((start, end)) => {
                let start = parse_number(start, token)?;
                let end = parse_number(end, token)?;
                if start < 1 || end > total || start > end {
                    warnings.push(SelectionWarning::InvalidRange { start, end });
                    continue;
                }
                selected.extend(start..=end);
            }
            None => {
                let index = parse_number(token, token)?;
                if index < 1 || index > total {
                    warnings.push(SelectionWarning::IndexOutOfRange { index });
                    continue;
                }
                selected.insert(index);
            }
        }
    }

    for warning in &warnings {
        warn!("Selection: {}", warning);
    }

    Ok(Selection {
        // Every value is within [1, total], so it fits in usize
        indices: selected.into_iter().map(|i| i as usize).collect(),
        warnings,
    })
}

/// Resolve a menu answer into a selection
///
/// `expression` is only consulted for [`MenuChoice::Pick`].
pub fn select(
    choice: MenuChoice,
    expression: &str,
    total: usize,
) -> Result<Selection, SelectionError> {
    match choice {
        MenuChoice::All => Ok(Selection::all(total)),
        MenuChoice::Pick => parse_selection(expression, total),
    }
}

/// Parse an unsigned decimal, saturating at `i64::MAX`
///
/// A digit string too long for `i64` is still a number; it just lands out of
/// range like any other index past the end of the playlist.
fn parse_number(text: &str, token: &str) -> Result<i64, SelectionError> {
    let text = text.trim();
    let digits = text.strip_prefix('+').unwrap_or(text);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(SelectionError::InvalidToken(token.to_string()));
    }
    Ok(digits.parse::<i64>().unwrap_or(i64::MAX))
}
