//! Patchers for code-like text artifacts.

use std::path::{Path, PathBuf};

use crate::error::{PatchError, Result};
use crate::locator::Locator;
use crate::procedure::Patch;

/// Replaces every occurrence of an exact substring.
///
/// The old literal must be present at least once.  Once applied the old
/// literal is gone, so a second run fails instead of doubling the edit.
#[derive(Debug, Clone)]
pub struct LiteralPatch {
    name: String,
    description: String,
    target: PathBuf,
    old: String,
    new: String,
}

impl LiteralPatch {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        target: impl Into<PathBuf>,
        old: impl Into<String>,
        new: impl Into<String>,
    ) -> Self {
        LiteralPatch {
            name: name.into(),
            description: description.into(),
            target: target.into(),
            old: old.into(),
            new: new.into(),
        }
    }
}

impl Patch for LiteralPatch {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn target(&self) -> &Path {
        &self.target
    }

    fn apply(&self, original: &str) -> Result<String> {
        let locator = Locator::literal(self.old.as_str());
        let count = locator
            .require_present(original)
            .map_err(|violation| violated(&self.target, &locator, violation))?;
        tracing::debug!(patch = %self.name, occurrences = count, "literal located");

        Ok(original.replace(self.old.as_str(), &self.new))
    }
}

/// Replaces the single region matched by a template or pattern.
///
/// Zero matches and multiple matches are both rejected; picking one of
/// several candidates would risk rewriting unrelated code.
#[derive(Debug, Clone)]
pub struct BlockPatch {
    name: String,
    description: String,
    target: PathBuf,
    locator: Locator,
    replacement: String,
}

impl BlockPatch {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        target: impl Into<PathBuf>,
        locator: Locator,
        replacement: impl Into<String>,
    ) -> Self {
        BlockPatch {
            name: name.into(),
            description: description.into(),
            target: target.into(),
            locator,
            replacement: replacement.into(),
        }
    }
}

impl Patch for BlockPatch {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn target(&self) -> &Path {
        &self.target
    }

    fn apply(&self, original: &str) -> Result<String> {
        let range = self
            .locator
            .find_unique(original)
            .map_err(|violation| violated(&self.target, &self.locator, violation))?;
        tracing::debug!(patch = %self.name, start = range.start, end = range.end, "block located");

        let indent = line_indent(original, range.start);
        let mut out = String::with_capacity(original.len() + self.replacement.len());
        out.push_str(&original[..range.start]);
        out.push_str(&reindent(&self.replacement, indent));
        out.push_str(&original[range.end..]);
        Ok(out)
    }
}

/// Whitespace between the start of the line and `pos`, or "" if the match
/// does not start the line.
fn line_indent(text: &str, pos: usize) -> &str {
    let line_start = text[..pos].rfind('\n').map_or(0, |i| i + 1);
    let prefix = &text[line_start..pos];
    if prefix.chars().all(|c| c == ' ' || c == '\t') {
        prefix
    } else {
        ""
    }
}

/// Shift every line after the first by `indent`; blank lines stay blank.
fn reindent(block: &str, indent: &str) -> String {
    if indent.is_empty() {
        return block.to_string();
    }
    let mut lines = block.split('\n');
    let mut out = lines.next().unwrap_or_default().to_string();
    for line in lines {
        out.push('\n');
        if !line.trim().is_empty() {
            out.push_str(indent);
        }
        out.push_str(line);
    }
    out
}

fn violated(target: &Path, locator: &Locator, violation: crate::error::Violation) -> PatchError {
    PatchError::AssumptionViolated {
        path: target.to_path_buf(),
        locator: locator.to_string(),
        violation,
    }
}
