use std::path::{Path, PathBuf};

use crate::document::{ContentDocument, Invariants};
use crate::error::{PatchError, Result, Violation};
use crate::procedure::Patch;

/// A pure whole-document transform.
pub type DocumentTransform = fn(ContentDocument) -> ContentDocument;

/// Rewrites a JSON content document through a [`DocumentTransform`].
///
/// The document is parsed, transformed and validated entirely in memory.  A
/// transform that changes nothing means the document is already in the
/// target state; that is reported as an assumption violation rather than
/// silently rewriting the file.
///
/// The result is checked against [`Invariants::STRUCTURAL`] unless the patch
/// is built with a stricter set.
pub struct DocumentPatch {
    name: String,
    description: String,
    target: PathBuf,
    transform: DocumentTransform,
    invariants: Invariants,
}

impl DocumentPatch {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        target: impl Into<PathBuf>,
        transform: DocumentTransform,
    ) -> Self {
        DocumentPatch {
            name: name.into(),
            description: description.into(),
            target: target.into(),
            transform,
            invariants: Invariants::STRUCTURAL,
        }
    }

    pub fn with_invariants(mut self, invariants: Invariants) -> Self {
        self.invariants = invariants;
        self
    }

    pub fn invariants(&self) -> &Invariants {
        &self.invariants
    }

    /// Transform an already-parsed document, enforcing the change and
    /// invariant checks.
    pub fn transform_document(&self, doc: ContentDocument) -> Result<ContentDocument> {
        let updated = (self.transform)(doc.clone());
        if updated == doc {
            return Err(PatchError::AssumptionViolated {
                path: self.target.clone(),
                locator: format!("document transform `{}`", self.name),
                violation: Violation::AlreadyApplied,
            });
        }
        updated.validate_against(&self.invariants)?;
        Ok(updated)
    }
}

impl Patch for DocumentPatch {
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
        let doc = ContentDocument::parse(original, &self.target)?;
        let sections_before = doc.root().len();
        let updated = self.transform_document(doc)?;
        tracing::debug!(
            patch = %self.name,
            sections_before,
            sections_after = updated.root().len(),
            "document transformed"
        );
        Ok(updated.to_pretty_string())
    }
}
