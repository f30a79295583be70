use std::path::Path;

use serde_json::Value;

use crate::artifact;
use crate::document::ContentDocument;
use crate::error::Result;
use crate::rules::{policy_support, s4_model, step_badges};

/// Values the site derives from the content document, plus invariant status.
#[derive(Debug, Clone, PartialEq)]
pub struct ContentReport {
    pub sections: Vec<String>,
    pub policy_cap: f64,
    /// S4 score for the calculator's default selection, when the document
    /// carries one.
    pub s4_default_score: Option<f64>,
    pub step_badges: Vec<String>,
    /// Empty when every invariant holds.
    pub problems: Vec<String>,
}

impl ContentReport {
    pub fn is_valid(&self) -> bool {
        self.problems.is_empty()
    }
}

pub fn inspect(doc: &ContentDocument) -> ContentReport {
    let policy_cap = doc
        .get("technology")
        .map(|tech| policy_support(tech).effective_cap())
        .unwrap_or(0.0);
    let s4_default_score = doc.get("technology").and_then(|tech| {
        let defaults = tech.get("calculatorDefaults")?;
        Some(s4_model(tech).default_score(defaults).score)
    });
    let badges = doc
        .get_path("businessFlow.timelineSteps")
        .and_then(Value::as_array)
        .map(|steps| step_badges(steps))
        .unwrap_or_default();
    let problems = match doc.validate() {
        Ok(()) => Vec::new(),
        Err(crate::error::PatchError::InvalidDocument(problems)) => problems,
        Err(other) => vec![other.to_string()],
    };

    ContentReport {
        sections: doc.root().keys().cloned().collect(),
        policy_cap,
        s4_default_score,
        step_badges: badges,
        problems,
    }
}

/// Load the document at `path` and inspect it.
pub fn inspect_file(path: &Path) -> Result<ContentReport> {
    let text = artifact::read_text(path)?;
    let doc = ContentDocument::parse(&text, path)?;
    Ok(inspect(&doc))
}
