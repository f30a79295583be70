//! The locate → transform → write procedure shared by every patch.
//!
//! A [`PatchRun`] drives one [`Patch`] through its states:
//!
//! ```text
//! Unstarted → Loaded → Matched → Replaced → Persisted
//!                └───→ Mismatch → Aborted
//! ```
//!
//! `Persisted` and `Aborted` are terminal and there is no retry edge.  Any
//! other failure (unreadable artifact, unparsable content, rejected result,
//! failed write) moves straight to `Aborted` from wherever the run stood.  The
//! replacement is built entirely in memory; the artifact is only touched once
//! the patch has produced its full new content.

use std::fmt;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::artifact::{self, WriteMode};
use crate::error::{PatchError, Result};

/// One hand-written patch against a single artifact.
pub trait Patch {
    /// Short kebab-case identifier used on the command line.
    fn name(&self) -> &str;

    /// One-line summary for `list`.
    fn description(&self) -> &str;

    /// The artifact this patch rewrites.
    fn target(&self) -> &Path;

    /// Produce the full new content from the full old content.
    ///
    /// Must be pure.  Returns [`PatchError::AssumptionViolated`] when the
    /// artifact does not have the shape the patch was written for.
    fn apply(&self, original: &str) -> Result<String>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchState {
    Unstarted,
    Loaded,
    Matched,
    Replaced,
    Persisted,
    Mismatch,
    Aborted,
}

impl PatchState {
    pub fn is_terminal(self) -> bool {
        matches!(self, PatchState::Persisted | PatchState::Aborted)
    }

    pub fn can_advance_to(self, next: PatchState) -> bool {
        use PatchState::*;
        matches!(
            (self, next),
            (Unstarted, Loaded)
                | (Loaded, Matched)
                | (Loaded, Mismatch)
                | (Matched, Replaced)
                | (Replaced, Persisted)
                | (Mismatch, Aborted)
                | (Unstarted, Aborted)
                | (Loaded, Aborted)
                | (Replaced, Aborted)
        )
    }
}

impl fmt::Display for PatchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PatchState::Unstarted => "UNSTARTED",
            PatchState::Loaded => "LOADED",
            PatchState::Matched => "MATCHED",
            PatchState::Replaced => "REPLACED",
            PatchState::Persisted => "PERSISTED",
            PatchState::Mismatch => "MISMATCH",
            PatchState::Aborted => "ABORTED",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RunOptions {
    pub write_mode: WriteMode,
    /// Stop at `Replaced` without writing.
    pub dry_run: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        RunOptions {
            write_mode: WriteMode::Atomic,
            dry_run: false,
        }
    }
}

/// What a finished run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchReport {
    pub name: String,
    pub target: PathBuf,
    pub final_state: PatchState,
    pub bytes_before: usize,
    pub bytes_after: usize,
    pub written: bool,
}

pub struct PatchRun<'a> {
    patch: &'a dyn Patch,
    options: RunOptions,
    state: PatchState,
    history: Vec<PatchState>,
}

impl<'a> PatchRun<'a> {
    pub fn new(patch: &'a dyn Patch, options: RunOptions) -> Self {
        PatchRun {
            patch,
            options,
            state: PatchState::Unstarted,
            history: vec![PatchState::Unstarted],
        }
    }

    pub fn state(&self) -> PatchState {
        self.state
    }

    /// Every state visited so far, starting with `Unstarted`.
    pub fn history(&self) -> &[PatchState] {
        &self.history
    }

    fn advance(&mut self, next: PatchState) {
        debug_assert!(
            self.state.can_advance_to(next),
            "illegal patch transition {} -> {}",
            self.state,
            next
        );
        debug!(patch = self.patch.name(), from = %self.state, to = %next, "state transition");
        self.state = next;
        self.history.push(next);
    }

    /// Run the patch once.  A second call fails with
    /// [`PatchError::RunReused`] and leaves the run as it was.
    pub fn execute(&mut self) -> Result<PatchReport> {
        if self.state != PatchState::Unstarted {
            return Err(PatchError::RunReused(self.patch.name().to_string()));
        }
        let result = self.drive();
        if result.is_err() && !self.state.is_terminal() {
            self.advance(PatchState::Aborted);
        }
        result
    }

    fn drive(&mut self) -> Result<PatchReport> {
        let target = self.patch.target().to_path_buf();
        let original = artifact::read_text(&target)?;
        self.advance(PatchState::Loaded);

        let patched = match self.patch.apply(&original) {
            Ok(text) => text,
            Err(err) if err.is_assumption_violated() => {
                self.advance(PatchState::Mismatch);
                warn!(patch = self.patch.name(), error = %err, "patch does not match artifact");
                self.advance(PatchState::Aborted);
                return Err(err);
            }
            Err(err) => {
                warn!(patch = self.patch.name(), error = %err, "patch failed");
                return Err(err);
            }
        };
        self.advance(PatchState::Matched);
        self.advance(PatchState::Replaced);

        let mut report = PatchReport {
            name: self.patch.name().to_string(),
            target: target.clone(),
            final_state: self.state,
            bytes_before: original.len(),
            bytes_after: patched.len(),
            written: false,
        };

        if self.options.dry_run {
            info!(patch = self.patch.name(), path = %target.display(), "dry run, artifact left untouched");
            return Ok(report);
        }

        artifact::write_text(&target, &patched, self.options.write_mode)?;
        self.advance(PatchState::Persisted);
        info!(
            patch = self.patch.name(),
            path = %target.display(),
            bytes = patched.len(),
            "artifact rewritten"
        );

        report.final_state = self.state;
        report.written = true;
        Ok(report)
    }
}

/// Convenience wrapper: run `patch` once with `options`.
pub fn run_patch(patch: &dyn Patch, options: RunOptions) -> Result<PatchReport> {
    PatchRun::new(patch, options).execute()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content_v2::refresh_content;
    use crate::document::ContentDocument;
    use crate::error::Violation;
    use crate::structured_patch::DocumentPatch;
    use serde_json::json;

    struct Upper {
        target: PathBuf,
    }

    impl Patch for Upper {
        fn name(&self) -> &str {
            "upper"
        }
        fn description(&self) -> &str {
            "uppercase a lowercase file"
        }
        fn target(&self) -> &Path {
            &self.target
        }
        fn apply(&self, original: &str) -> Result<String> {
            if !original.chars().any(|c| c.is_lowercase()) {
                return Err(PatchError::AssumptionViolated {
                    path: self.target.clone(),
                    locator: "lowercase text".into(),
                    violation: Violation::NotFound,
                });
            }
            Ok(original.to_uppercase())
        }
    }

    fn scratch(content: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.txt");
        std::fs::write(&path, content).unwrap();
        (dir, path)
    }

    #[test]
    fn test_successful_run_visits_happy_path() {
        let (_dir, path) = scratch("hello");
        let patch = Upper { target: path.clone() };
        let mut run = PatchRun::new(&patch, RunOptions::default());
        let report = run.execute().unwrap();

        assert_eq!(
            run.history(),
            &[
                PatchState::Unstarted,
                PatchState::Loaded,
                PatchState::Matched,
                PatchState::Replaced,
                PatchState::Persisted
            ]
        );
        assert!(report.written);
        assert_eq!(report.final_state, PatchState::Persisted);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "HELLO");
    }

    #[test]
    fn test_mismatch_aborts_without_writing() {
        let (_dir, path) = scratch("HELLO");
        let patch = Upper { target: path.clone() };
        let mut run = PatchRun::new(&patch, RunOptions::default());
        let err = run.execute().unwrap_err();

        assert!(err.is_assumption_violated());
        assert_eq!(run.state(), PatchState::Aborted);
        assert_eq!(
            run.history(),
            &[
                PatchState::Unstarted,
                PatchState::Loaded,
                PatchState::Mismatch,
                PatchState::Aborted
            ]
        );
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "HELLO");
    }

    #[test]
    fn test_dry_run_stops_at_replaced() {
        let (_dir, path) = scratch("hello");
        let patch = Upper { target: path.clone() };
        let report = run_patch(
            &patch,
            RunOptions {
                dry_run: true,
                ..RunOptions::default()
            },
        )
        .unwrap();
        assert_eq!(report.final_state, PatchState::Replaced);
        assert!(!report.written);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "hello");
    }

    #[test]
    fn test_missing_artifact_aborts() {
        let dir = tempfile::tempdir().unwrap();
        let patch = Upper {
            target: dir.path().join("missing.txt"),
        };
        let mut run = PatchRun::new(&patch, RunOptions::default());
        assert!(matches!(run.execute(), Err(PatchError::Read { .. })));
        assert_eq!(run.history(), &[PatchState::Unstarted, PatchState::Aborted]);
    }

    #[test]
    fn test_malformed_document_aborts() {
        let (_dir, path) = scratch(r#"{ "meta": "#);
        let patch = DocumentPatch::new("mock-v2", "", path.clone(), refresh_content);
        let mut run = PatchRun::new(&patch, RunOptions::default());

        assert!(matches!(run.execute(), Err(PatchError::Json { .. })));
        assert_eq!(
            run.history(),
            &[PatchState::Unstarted, PatchState::Loaded, PatchState::Aborted]
        );
        assert!(run.state().is_terminal());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), r#"{ "meta": "#);
    }

    #[test]
    fn test_invalid_transform_result_aborts() {
        fn out_of_range(mut doc: ContentDocument) -> ContentDocument {
            doc.section_mut("dataAssets").insert("badDebtRate".into(), json!(3.1));
            doc
        }
        let (_dir, path) = scratch("{}");
        let patch = DocumentPatch::new("rate", "", path.clone(), out_of_range);
        let mut run = PatchRun::new(&patch, RunOptions::default());

        assert!(matches!(run.execute(), Err(PatchError::InvalidDocument(_))));
        assert_eq!(run.history().last(), Some(&PatchState::Aborted));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{}");
    }

    /// Removes its own directory while producing the replacement, so the
    /// write has nowhere to go.
    struct Vanishing {
        dir: PathBuf,
        target: PathBuf,
    }

    impl Patch for Vanishing {
        fn name(&self) -> &str {
            "vanishing"
        }
        fn description(&self) -> &str {
            ""
        }
        fn target(&self) -> &Path {
            &self.target
        }
        fn apply(&self, original: &str) -> Result<String> {
            std::fs::remove_dir_all(&self.dir).unwrap();
            Ok(original.to_uppercase())
        }
    }

    #[test]
    fn test_failed_write_aborts_after_replaced() {
        let dir = tempfile::tempdir().unwrap();
        let site = dir.path().join("site");
        let target = site.join("a.txt");

        for write_mode in [WriteMode::Atomic, WriteMode::Direct] {
            std::fs::create_dir(&site).unwrap();
            std::fs::write(&target, "hello").unwrap();
            let patch = Vanishing {
                dir: site.clone(),
                target: target.clone(),
            };
            let mut run = PatchRun::new(
                &patch,
                RunOptions {
                    write_mode,
                    dry_run: false,
                },
            );
            assert!(matches!(run.execute(), Err(PatchError::Write { .. })));
            assert_eq!(
                run.history(),
                &[
                    PatchState::Unstarted,
                    PatchState::Loaded,
                    PatchState::Matched,
                    PatchState::Replaced,
                    PatchState::Aborted
                ]
            );
        }
    }

    #[test]
    fn test_second_execute_is_rejected() {
        let (_dir, path) = scratch("hello");
        let patch = Upper { target: path.clone() };
        let mut run = PatchRun::new(&patch, RunOptions::default());
        run.execute().unwrap();

        assert!(matches!(run.execute(), Err(PatchError::RunReused(name)) if name == "upper"));
        assert_eq!(run.state(), PatchState::Persisted);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "HELLO");
    }

    #[test]
    fn test_transition_table() {
        assert!(PatchState::Unstarted.can_advance_to(PatchState::Loaded));
        assert!(PatchState::Loaded.can_advance_to(PatchState::Mismatch));
        assert!(!PatchState::Aborted.can_advance_to(PatchState::Loaded));
        assert!(!PatchState::Mismatch.can_advance_to(PatchState::Matched));
        assert!(!PatchState::Persisted.can_advance_to(PatchState::Unstarted));
        assert!(PatchState::Loaded.can_advance_to(PatchState::Aborted));
        assert!(PatchState::Replaced.can_advance_to(PatchState::Aborted));
        assert!(!PatchState::Persisted.can_advance_to(PatchState::Aborted));
        assert!(PatchState::Persisted.is_terminal());
        assert!(PatchState::Aborted.is_terminal());
        assert!(!PatchState::Replaced.is_terminal());
    }
}
