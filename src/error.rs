//! Crate-level error type.
//!
//! Every failure a patch can hit funnels into [`PatchError`].  Only
//! [`PatchError::AssumptionViolated`] is a domain error: the artifact no
//! longer looks the way the patch expects, so nothing is written and the
//! patch has to be re-authored.  The remaining variants wrap I/O, parsing
//! and configuration failures with the path involved.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, PatchError>;

/// Why a locator's presence / uniqueness precondition failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    /// The expected literal or pattern does not occur at all.
    NotFound,
    /// A pattern that must be unique matched more than once.
    Ambiguous { count: usize },
    /// A structured transform would leave the document unchanged.
    AlreadyApplied,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::NotFound => write!(f, "expected content not found"),
            Violation::Ambiguous { count } => {
                write!(f, "expected exactly one match, found {}", count)
            }
            Violation::AlreadyApplied => write!(f, "document already in target state"),
        }
    }
}

#[derive(Debug, Error)]
pub enum PatchError {
    #[error("patch assumption violated in {path}: {violation} (locator: {locator})")]
    AssumptionViolated {
        path: PathBuf,
        locator: String,
        violation: Violation,
    },

    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid locator pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("patch run `{0}` has already been executed")]
    RunReused(String),

    #[error("content document violates {} invariant(s): {}", .0.len(), .0.join("; "))]
    InvalidDocument(Vec<String>),

    #[error("invalid config {path}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("unknown patch: {0}")]
    UnknownPatch(String),
}

impl PatchError {
    /// True for the fatal "artifact drifted" outcome, false for ambient failures.
    pub fn is_assumption_violated(&self) -> bool {
        matches!(self, PatchError::AssumptionViolated { .. })
    }

    /// The violation payload, when this is an assumption failure.
    pub fn violation(&self) -> Option<&Violation> {
        match self {
            PatchError::AssumptionViolated { violation, .. } => Some(violation),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_violation_display_keeps_distinction() {
        assert_eq!(Violation::NotFound.to_string(), "expected content not found");
        assert_eq!(
            Violation::Ambiguous { count: 3 }.to_string(),
            "expected exactly one match, found 3"
        );
    }

    #[test]
    fn test_assumption_violated_message_names_path_and_locator() {
        let err = PatchError::AssumptionViolated {
            path: PathBuf::from("assets/js/app.js"),
            locator: "literal `foo`".to_string(),
            violation: Violation::NotFound,
        };
        let msg = err.to_string();
        assert!(msg.contains("assets/js/app.js"));
        assert!(msg.contains("literal `foo`"));
        assert!(msg.contains("not found"));
        assert!(err.is_assumption_violated());
        assert_eq!(err.violation(), Some(&Violation::NotFound));
    }

    #[test]
    fn test_invalid_document_lists_problems() {
        let err = PatchError::InvalidDocument(vec!["a".into(), "b".into()]);
        assert_eq!(err.to_string(), "content document violates 2 invariant(s): a; b");
        assert!(!err.is_assumption_violated());
        assert!(err.violation().is_none());
    }
}
