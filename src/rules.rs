//! Derived values the site computes from the content document.
//!
//! These are the rules the rendering patches encode: the S4 policy-support
//! cap shown under the scoring model, the S4 score the calculator derives
//! from a prosperity bucket plus policy add-ons, and the two-digit index
//! badges on the business-flow timeline.

use std::collections::BTreeSet;

use serde_json::Value;

/// One selectable policy add-on of the S4 score.
#[derive(Debug, Clone, PartialEq)]
pub struct PolicyAddon {
    pub key: String,
    pub label: String,
    pub score: f64,
}

/// `technology.scoreModel.S4.policySupport`, read leniently.
///
/// Absent or non-numeric fields stay `None` instead of failing, since older
/// documents predate some of them.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PolicySupport {
    pub base: Option<f64>,
    pub addons_cap: Option<f64>,
    pub cap: Option<f64>,
    pub addons: Vec<PolicyAddon>,
}

impl PolicySupport {
    pub fn from_value(value: &Value) -> Self {
        let num = |key: &str| value.get(key).and_then(Value::as_f64);
        let addons = value
            .get("addons")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(|item| {
                        Some(PolicyAddon {
                            key: item.get("key")?.as_str()?.to_string(),
                            label: item
                                .get("label")
                                .and_then(Value::as_str)
                                .unwrap_or_default()
                                .to_string(),
                            score: item.get("score").and_then(Value::as_f64).unwrap_or(0.0),
                        })
                    })
                    .collect()
            })
            .unwrap_or_default();

        PolicySupport {
            base: num("base"),
            addons_cap: num("addonsCap"),
            cap: num("cap"),
            addons,
        }
    }

    /// The cap shown to readers: an explicit numeric `cap` wins, otherwise
    /// `base + addonsCap` with missing parts counted as zero.
    pub fn effective_cap(&self) -> f64 {
        match self.cap {
            Some(cap) => cap,
            None => self.base.unwrap_or(0.0) + self.addons_cap.unwrap_or(0.0),
        }
    }

    /// Policy-support component of the S4 score for a set of selected add-on
    /// keys.  Each add-on counts once; unknown keys are ignored.
    pub fn score(&self, selected: &[&str]) -> PolicyScore {
        let selected: BTreeSet<&str> = selected.iter().copied().collect();
        let addon_total: f64 = selected
            .iter()
            .filter_map(|key| self.addons.iter().find(|a| a.key == *key))
            .map(|a| a.score)
            .sum();
        let capped_addon = addon_total.min(self.addons_cap.unwrap_or(0.0));
        let uncapped = self.base.unwrap_or(0.0) + capped_addon;
        // a zero cap means "no cap"
        let cap = self.cap.filter(|c| *c != 0.0);
        let score = match cap {
            Some(c) => uncapped.min(c),
            None => uncapped,
        };
        let truncated = addon_total > capped_addon || cap.is_some_and(|c| uncapped > c);

        PolicyScore {
            addon_total,
            capped_addon,
            score,
            truncated,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolicyScore {
    pub addon_total: f64,
    pub capped_addon: f64,
    pub score: f64,
    /// Some of the selected add-on points did not count.
    pub truncated: bool,
}

/// One industry-prosperity band of the S4 score.
#[derive(Debug, Clone, PartialEq)]
pub struct ProsperityBucket {
    pub key: String,
    pub label: String,
    pub score: f64,
}

/// `technology.scoreModel.S4`: prosperity buckets plus policy support.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct S4Model {
    pub buckets: Vec<ProsperityBucket>,
    pub policy: PolicySupport,
}

impl S4Model {
    pub fn from_value(value: &Value) -> Self {
        let buckets = value
            .pointer("/prosperity/buckets")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(|item| {
                        Some(ProsperityBucket {
                            key: item.get("key")?.as_str()?.to_string(),
                            label: item
                                .get("label")
                                .and_then(Value::as_str)
                                .unwrap_or_default()
                                .to_string(),
                            score: item.get("score").and_then(Value::as_f64).unwrap_or(0.0),
                        })
                    })
                    .collect()
            })
            .unwrap_or_default();

        S4Model {
            buckets,
            policy: value
                .get("policySupport")
                .map(PolicySupport::from_value)
                .unwrap_or_default(),
        }
    }

    /// Full S4 score: the chosen bucket plus the policy-support component.
    ///
    /// An unknown or absent bucket key falls back to the first bucket; with
    /// no buckets at all the prosperity part is zero.
    pub fn score(&self, bucket: Option<&str>, addons: &[&str]) -> S4Score {
        let bucket = bucket
            .and_then(|key| self.buckets.iter().find(|b| b.key == key))
            .or_else(|| self.buckets.first())
            .cloned();
        let policy = self.policy.score(addons);
        let bucket_score = bucket.as_ref().map_or(0.0, |b| b.score);

        S4Score {
            score: bucket_score + policy.score,
            bucket,
            policy,
        }
    }

    /// Score for the selection stored in `technology.calculatorDefaults`.
    pub fn default_score(&self, defaults: &Value) -> S4Score {
        let bucket = defaults.get("prosperityBucket").and_then(Value::as_str);
        let addons: Vec<&str> = defaults
            .get("policyAddons")
            .and_then(Value::as_array)
            .map(|keys| keys.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default();
        self.score(bucket, &addons)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct S4Score {
    /// The bucket that was applied, after fallback.
    pub bucket: Option<ProsperityBucket>,
    pub policy: PolicyScore,
    pub score: f64,
}

/// Read the S4 model from a `technology` section.
pub fn s4_model(technology: &Value) -> S4Model {
    technology
        .pointer("/scoreModel/S4")
        .map(S4Model::from_value)
        .unwrap_or_default()
}

/// Read the policy-support block from a `technology` section.
pub fn policy_support(technology: &Value) -> PolicySupport {
    technology
        .pointer("/scoreModel/S4/policySupport")
        .map(PolicySupport::from_value)
        .unwrap_or_default()
}

/// Convenience: the effective cap of a raw `policySupport` value.
pub fn policy_cap(policy: &Value) -> f64 {
    PolicySupport::from_value(policy).effective_cap()
}

/// Step number for the entry at `position` (0-based).
///
/// A present, non-zero `step` is used as written; anything else falls back
/// to the 1-based position.
pub fn step_number(entry: &Value, position: usize) -> String {
    match entry.get("step") {
        Some(Value::Number(n)) => match n.as_f64() {
            Some(v) if v != 0.0 => format_number(v),
            _ => (position + 1).to_string(),
        },
        Some(Value::String(s)) if !s.is_empty() => s.clone(),
        _ => (position + 1).to_string(),
    }
}

/// Two-digit index badges for an ordered step list, in list order.
pub fn step_badges(steps: &[Value]) -> Vec<String> {
    steps
        .iter()
        .enumerate()
        .map(|(idx, step)| format!("{:0>2}", step_number(step, idx)))
        .collect()
}

/// Whole numbers print without a fractional part.
pub fn format_number(v: f64) -> String {
    if v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else {
        v.to_string()
    }
}
