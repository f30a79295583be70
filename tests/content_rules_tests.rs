//! Tests for the content document model and the rules the site derives
//! from it.

use std::path::Path;

use rstest::rstest;
use serde_json::{json, Value};

use site_patch::content_v2::refresh_content;
use site_patch::document::ContentDocument;
use site_patch::rules::{policy_cap, step_badges, PolicySupport};
use site_patch::structured_patch::DocumentPatch;
use site_patch::{Patch, PatchError};

fn parse(value: Value) -> ContentDocument {
    ContentDocument::parse(&value.to_string(), Path::new("mock.json")).unwrap()
}

// -- capped-value rule ----------------------------------------------------

#[test]
fn test_cap_absent_uses_base_plus_addons_cap() {
    let doc = parse(json!({"policy": {"base": 20, "addonsCap": 30}}));
    assert_eq!(policy_cap(doc.get("policy").unwrap()), 50.0);
}

#[test]
fn test_cap_present_wins() {
    let doc = parse(json!({"policy": {"base": 20, "addonsCap": 30, "cap": 45}}));
    assert_eq!(policy_cap(doc.get("policy").unwrap()), 45.0);
}

#[rstest]
#[case(json!({}), 0.0)]
#[case(json!({"base": 20}), 20.0)]
#[case(json!({"addonsCap": 30}), 30.0)]
#[case(json!({"base": 20, "addonsCap": 30, "cap": null}), 50.0)]
#[case(json!({"base": 20, "addonsCap": 30, "cap": 12.5}), 12.5)]
fn test_cap_table(#[case] policy: Value, #[case] expected: f64) {
    assert_eq!(policy_cap(&policy), expected);
}

#[test]
fn test_policy_score_reaching_cap_is_not_truncated() {
    let policy = PolicySupport::from_value(&json!({
        "base": 35,
        "addonsCap": 30,
        "cap": 50,
        "addons": [{"key": "giant", "score": 15}]
    }));
    let s = policy.score(&["giant"]);
    assert_eq!(s.capped_addon, 15.0);
    assert_eq!(s.score, 50.0);
    assert!(!s.truncated, "score equal to the cap is not truncated");
}

// -- step reindexing rule -------------------------------------------------

#[test]
fn test_five_explicit_steps_give_padded_badges() {
    let doc = parse(json!({
        "businessFlow": {"timelineSteps": [
            {"step": 1, "title": "上链"},
            {"step": 2, "title": "确权"},
            {"step": 3, "title": "凭证"},
            {"step": 4, "title": "授信"},
            {"step": 5, "title": "回流"}
        ]}
    }));
    let steps = doc
        .get_path("businessFlow.timelineSteps")
        .and_then(Value::as_array)
        .unwrap();
    let badges = step_badges(steps);

    assert_eq!(badges, vec!["01", "02", "03", "04", "05"]);
    for (badge, step) in badges.iter().zip(steps) {
        assert_eq!(*badge, format!("{:02}", step["step"].as_u64().unwrap()));
    }
}

// -- structured transform -------------------------------------------------

fn retitle(mut doc: ContentDocument) -> ContentDocument {
    doc.section_mut("meta")
        .insert("titleEn".into(), json!("Renamed"));
    doc
}

#[test]
fn test_touching_one_section_leaves_the_rest_equal_in_value() {
    let before = refresh_content(ContentDocument::default());
    let text = before.to_pretty_string();

    let patch = DocumentPatch::new("retitle", "", "mock.json", retitle);
    let after_text = patch.apply(&text).unwrap();
    let after = ContentDocument::parse(&after_text, Path::new("mock.json")).unwrap();

    for (key, value) in before.root() {
        if key != "meta" {
            assert_eq!(after.get(key), Some(value), "section {key} changed");
        }
    }
    assert_eq!(after.get_path("meta.titleEn"), Some(&json!("Renamed")));
    assert_eq!(after.get_path("meta.titleZh"), before.get_path("meta.titleZh"));
}

#[test]
fn test_partial_legacy_document_is_accepted() {
    // no technology, businessFlow, risk or dataAssets sections at all
    let legacy = json!({"meta": {"titleZh": "旧"}, "overview": {}});
    let patch = DocumentPatch::new("mock-v2", "", "mock.json", refresh_content);
    let out = patch.apply(&legacy.to_string()).unwrap();
    let doc = ContentDocument::parse(&out, Path::new("mock.json")).unwrap();
    doc.validate().unwrap();
    assert_eq!(doc.get_path("overview.ctaButtons"), Some(&json!([])));
}

#[test]
fn test_scalar_section_is_replaced_by_object() {
    let legacy = json!({"risk": "tbd", "dataAssets": [1, 2]});
    let patch = DocumentPatch::new("mock-v2", "", "mock.json", refresh_content);
    let out = patch.apply(&legacy.to_string()).unwrap();
    let doc = ContentDocument::parse(&out, Path::new("mock.json")).unwrap();
    assert!(doc.get_path("risk.matrix").is_some());
    assert!(doc.get_path("dataAssets.kpi").is_some());
}

#[test]
fn test_transform_producing_broken_steps_is_rejected() {
    fn shuffle_steps(doc: ContentDocument) -> ContentDocument {
        let mut doc = refresh_content(doc);
        let flow = doc.section_mut("businessFlow");
        if let Some(Value::Array(steps)) = flow.get_mut("timelineSteps") {
            steps.swap(0, 1);
        }
        doc
    }
    let patch = DocumentPatch::new("shuffle", "", "mock.json", shuffle_steps);
    let err = patch.apply("{}").unwrap_err();
    match err {
        PatchError::InvalidDocument(problems) => {
            assert_eq!(problems.len(), 2);
            assert!(problems[0].contains("timelineSteps.0.step"));
        }
        other => panic!("unexpected error: {other}"),
    }
}
