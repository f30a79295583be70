//! The structured content document behind the showcase site.
//!
//! [`ContentDocument`] wraps the top-level JSON object of `mock.json`.  Key
//! order is preserved (serde_json `preserve_order`), so sections nobody
//! touches serialize back the way they were read.  Nested access is
//! `Option`-based: a section missing from an older document reads as absent,
//! and [`ContentDocument::section_mut`] creates it as an empty object.

use std::path::Path;

use serde_json::{Map, Value};

use crate::error::{PatchError, Result};

/// Key paths the rendering layer reads.  Dotted, no wildcards.
pub const REQUIRED_PATHS: &[&str] = &[
    "meta.titleZh",
    "meta.titleEn",
    "overview.kpiCards",
    "overview.threeFlow.flows",
    "objectives.shortTerm",
    "objectives.midTerm",
    "technology.scoreModel.weights",
    "technology.scoreModel.S4.policySupport",
    "technology.limitModel.kFactors",
    "technology.limitModel.creditBands",
    "technology.calculatorDefaults",
    "businessFlow.timelineSteps",
    "rolesSection.roles",
    "risk.matrix",
    "risk.detail",
    "risk.controls",
    "outcomes.projection",
    "team.members",
    "dataAssets.kpi",
];

/// Numeric fields that are rates and must lie in `[0, 1]`.
///
/// `*` matches every array element or object member at that level.  Counts,
/// currency amounts and signed deltas (e.g. `outcomes.industryImpact`) are
/// deliberately absent.
pub const RATE_PATHS: &[&str] = &[
    "overview.microCoverageTarget",
    "technology.scoreModel.weights.*",
    "technology.limitModel.kFactors.*",
    "objectives.warningRules.deviationThreshold",
    "objectives.shortTerm.materialCostSaving",
    "risk.matrix.*.prob",
    "rolesSection.roles.*.*.valueMetrics.efficiencyGain",
    "rolesSection.roles.*.*.valueMetrics.costReduction",
    "dataAssets.tPlusOneRate",
    "dataAssets.badDebtRate",
    "dataAssets.fraudDetectAcc",
    "dataAssets.redundantElimination.baseline.*",
    "dataAssets.redundantElimination.optimized.*",
    "outcomes.costSavings.institution.manualReduction",
];

/// Lists whose entries carry a 1-based `step` field.
pub const STEP_LISTS: &[&str] = &["businessFlow.timelineSteps"];

/// The invariants a transformed document is checked against before it is
/// written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Invariants {
    pub required: &'static [&'static str],
    pub rates: &'static [&'static str],
    pub step_lists: &'static [&'static str],
}

impl Invariants {
    /// Rate ranges and step order only; holds for any document version.
    pub const STRUCTURAL: Invariants = Invariants {
        required: &[],
        rates: RATE_PATHS,
        step_lists: STEP_LISTS,
    };

    /// Everything the v2 rendering layer reads.
    pub const CONTENT_V2: Invariants = Invariants {
        required: REQUIRED_PATHS,
        rates: RATE_PATHS,
        step_lists: STEP_LISTS,
    };
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ContentDocument {
    root: Map<String, Value>,
}

impl ContentDocument {
    pub fn new(root: Map<String, Value>) -> Self {
        ContentDocument { root }
    }

    /// Parse a document; the top level must be a JSON object.
    pub fn parse(text: &str, origin: &Path) -> Result<Self> {
        let json_err = |source| PatchError::Json {
            path: origin.to_path_buf(),
            source,
        };
        match serde_json::from_str::<Value>(text).map_err(json_err)? {
            Value::Object(root) => Ok(ContentDocument { root }),
            other => Err(PatchError::InvalidDocument(vec![format!(
                "top level must be an object, found {}",
                kind(&other)
            )])),
        }
    }

    /// Two-space indented JSON with non-ASCII text left as-is.
    pub fn to_pretty_string(&self) -> String {
        // Serializing a Map of Values cannot fail.
        serde_json::to_string_pretty(&self.root).unwrap_or_default()
    }

    pub fn root(&self) -> &Map<String, Value> {
        &self.root
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.root)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.root.get(key)
    }

    /// Look up a dotted path through objects (and array indices).
    pub fn get_path(&self, path: &str) -> Option<&Value> {
        let mut segments = path.split('.');
        let first = segments.next()?;
        let mut cur = self.root.get(first)?;
        for seg in segments {
            cur = match cur {
                Value::Object(map) => map.get(seg)?,
                Value::Array(items) => items.get(seg.parse::<usize>().ok()?)?,
                _ => return None,
            };
        }
        Some(cur)
    }

    /// Replace a top-level section wholesale.
    pub fn set(&mut self, key: &str, value: Value) {
        self.root.insert(key.to_string(), value);
    }

    /// The object at `key`, created empty if absent or not an object.
    pub fn section_mut(&mut self, key: &str) -> &mut Map<String, Value> {
        object_entry(&mut self.root, key)
    }

    /// Check the v2 invariants.
    pub fn validate(&self) -> Result<()> {
        self.validate_against(&Invariants::CONTENT_V2)
    }

    /// Check `invariants`; all problems are collected before failing.
    pub fn validate_against(&self, invariants: &Invariants) -> Result<()> {
        let mut problems = Vec::new();

        for path in invariants.required {
            if self.get_path(path).is_none() {
                problems.push(format!("missing required key `{}`", path));
            }
        }

        for pattern in invariants.rates {
            let segments: Vec<&str> = pattern.split('.').collect();
            let mut hits = Vec::new();
            if let Some(section) = self.root.get(segments[0]) {
                collect_matches(section, &segments[1..], segments[0].to_string(), &mut hits);
            }
            for (path, value) in hits {
                if let Some(rate) = value.as_f64() {
                    if !(0.0..=1.0).contains(&rate) {
                        problems.push(format!("rate `{}` = {} outside [0, 1]", path, rate));
                    }
                }
            }
        }

        for list in invariants.step_lists {
            if let Some(Value::Array(items)) = self.get_path(list) {
                for (idx, item) in items.iter().enumerate() {
                    match item.get("step") {
                        None => {}
                        Some(step) if step.as_u64() == Some(idx as u64 + 1) => {}
                        Some(step) => problems.push(format!(
                            "`{}.{}.step` = {} does not match position {}",
                            list,
                            idx,
                            step,
                            idx + 1
                        )),
                    }
                }
            }
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(PatchError::InvalidDocument(problems))
        }
    }
}

/// The object at `map[key]`, replacing anything that isn't one.
pub fn object_entry<'m>(map: &'m mut Map<String, Value>, key: &str) -> &'m mut Map<String, Value> {
    let slot = map
        .entry(key.to_string())
        .or_insert_with(|| Value::Object(Map::new()));
    if !slot.is_object() {
        *slot = Value::Object(Map::new());
    }
    match slot {
        Value::Object(inner) => inner,
        _ => unreachable!("slot was just made an object"),
    }
}

fn collect_matches<'v>(
    value: &'v Value,
    segments: &[&str],
    prefix: String,
    out: &mut Vec<(String, &'v Value)>,
) {
    let Some((head, rest)) = segments.split_first() else {
        out.push((prefix, value));
        return;
    };
    let join = |key: &str| {
        if prefix.is_empty() {
            key.to_string()
        } else {
            format!("{}.{}", prefix, key)
        }
    };
    match (value, *head) {
        (Value::Object(map), "*") => {
            for (k, v) in map {
                collect_matches(v, rest, join(k.as_str()), out);
            }
        }
        (Value::Array(items), "*") => {
            for (i, v) in items.iter().enumerate() {
                collect_matches(v, rest, join(i.to_string().as_str()), out);
            }
        }
        (Value::Object(map), key) => {
            if let Some(v) = map.get(key) {
                collect_matches(v, rest, join(key), out);
            }
        }
        _ => {}
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
