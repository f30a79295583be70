//! Locating the unit of content a patch rewrites.
//!
//! A [`Locator`] finds every occurrence of its target in an artifact's text.
//! The patchers decide what count they accept: literals only need to be
//! present, blocks must match exactly once.

use std::fmt;
use std::ops::Range;

use regex::Regex;

use crate::error::{Result, Violation};

#[derive(Debug, Clone)]
pub enum Locator {
    /// Exact substring.
    Literal(String),
    /// Regex, either written by hand or compiled from a code template.
    Pattern { regex: Regex, label: String },
}

impl Locator {
    pub fn literal(text: impl Into<String>) -> Self {
        Locator::Literal(text.into())
    }

    /// Raw regex pattern.
    pub fn pattern(pattern: &str) -> Result<Self> {
        Ok(Locator::Pattern {
            regex: Regex::new(pattern)?,
            label: format!("pattern /{}/", abbreviate(pattern)),
        })
    }

    /// Whitespace-tolerant multi-line template.
    ///
    /// Every whitespace run inside the template matches one or more whitespace
    /// characters; indentation before the first token is optional.  Everything
    /// else matches literally.
    pub fn template(template: &str) -> Result<Self> {
        let tokens: Vec<String> = template.split_whitespace().map(regex::escape).collect();
        let regex = Regex::new(&tokens.join(r"\s+"))?;
        Ok(Locator::Pattern {
            regex,
            label: format!("template `{}`", abbreviate(template.trim())),
        })
    }

    /// Byte ranges of every non-overlapping occurrence, in order.
    pub fn find_all(&self, text: &str) -> Vec<Range<usize>> {
        match self {
            Locator::Literal(needle) if needle.is_empty() => Vec::new(),
            Locator::Literal(needle) => text
                .match_indices(needle.as_str())
                .map(|(start, m)| start..start + m.len())
                .collect(),
            // an empty match cannot be a patch unit
            Locator::Pattern { regex, .. } => regex
                .find_iter(text)
                .filter(|m| !m.is_empty())
                .map(|m| m.range())
                .collect(),
        }
    }

    pub fn count(&self, text: &str) -> usize {
        self.find_all(text).len()
    }

    /// The single occurrence, or a violation naming what went wrong.
    pub fn find_unique(&self, text: &str) -> std::result::Result<Range<usize>, Violation> {
        let mut found = self.find_all(text);
        match found.len() {
            0 => Err(Violation::NotFound),
            1 => Ok(found.remove(0)),
            count => Err(Violation::Ambiguous { count }),
        }
    }

    /// Succeeds when at least one occurrence exists.
    pub fn require_present(&self, text: &str) -> std::result::Result<usize, Violation> {
        match self.count(text) {
            0 => Err(Violation::NotFound),
            n => Ok(n),
        }
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locator::Literal(text) => write!(f, "literal `{}`", abbreviate(text.trim())),
            Locator::Pattern { label, .. } => f.write_str(label),
        }
    }
}

/// First line of `text`, cut to 60 chars, for diagnostics.
fn abbreviate(text: &str) -> String {
    let first = text.lines().next().unwrap_or("");
    let mut out: String = first.chars().take(60).collect();
    if out.len() < text.len() {
        out.push('…');
    }
    out
}
