use std::io::Write;

use food_inspector::{
    CompoundPolicy, Confidence, Criteria, Inspector, InspectorConfig, LabelRecord, Severity,
};
use tempfile::NamedTempFile;

fn write_temp(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temp file");
    file.write_all(contents.as_bytes()).expect("write");
    file
}

#[test]
fn config_file_wires_every_stage() {
    let vocab = write_temp(
        "mustard:\n  - mustard\n  - mustard seed\ncelery:\n  - celery\n  - celeriac\n",
    );
    let rules = write_temp(
        "cross_reactivity_rules:\n  - source: mustard\n    target: rapeseed\n    confidence: medium\n  - source: celery\n    target: mugwort\n    confidence: low\n",
    );
    let yaml = format!(
        r#"
version: "1.0"
name: "eu extras"
synonyms:
  path: {vocab:?}
  compound_policy: "strict"
  warm_cache: true
cross_reactivity:
  path: {rules:?}
  min_confidence: "medium"
"#,
        vocab = vocab.path(),
        rules = rules.path(),
    );
    let config_file = write_temp(&yaml);

    let cfg = InspectorConfig::from_file(config_file.path()).expect("config");
    let inspector = Inspector::from_config(&cfg).expect("inspector");
    assert_eq!(inspector.matcher().compound_policy(), CompoundPolicy::Strict);
    assert_eq!(inspector.matcher().patterns().len(), 4);
    assert_eq!(inspector.min_confidence(), Confidence::Medium);

    let analysis = inspector
        .analyze_label(&LabelRecord::new(
            "dressing",
            "Water, Mustard Seed, celeriac, mustard-style spices",
        ))
        .expect("analysis");

    let categories: Vec<&str> = analysis.detected_categories().collect();
    assert_eq!(categories, vec!["mustard", "celery"]);

    let mustard = analysis.allergens.get("mustard").expect("mustard hits");
    // "mustard-style" is a compound under the strict policy.
    assert_eq!(mustard.get("mustard").map(|occurrences| occurrences.len()), Some(1));
    assert!(mustard.contains("mustard seed"));

    // Low-confidence celery rule is filtered by min_confidence.
    let targets: Vec<&str> = analysis
        .cross_reactions
        .iter()
        .map(|rule| rule.target.as_str())
        .collect();
    assert_eq!(targets, vec!["rapeseed"]);
}

#[test]
fn builtin_inspector_screens_a_realistic_label() {
    let inspector = Inspector::builtin().expect("inspector");
    let label = LabelRecord::new(
        "cookie-42",
        "Enriched wheat flour, sugar, butter (milk), eggs, soy lecithin, \
         maltodextrin, natural flavor, hazelnut paste",
    );

    let analysis = inspector.analyze_label(&label).expect("analysis");
    let categories: Vec<&str> = analysis.detected_categories().collect();
    assert_eq!(
        categories,
        vec!["dairy", "eggs", "gluten", "soy", "tree_nuts", "corn"]
    );

    let gluten = analysis.allergens.get("gluten").expect("gluten");
    assert!(!gluten.contains("malt"));
    assert!(gluten.contains("wheat flour"));

    let text = label.ingredients.as_deref().expect("text");
    for category in analysis.allergens.iter() {
        for synonym in &category.synonyms {
            for occurrence in &synonym.occurrences {
                assert_eq!(&text[occurrence.start..occurrence.end], occurrence.text);
            }
        }
    }

    assert!(analysis
        .cross_reactions
        .iter()
        .any(|rule| rule.source == "dairy" && rule.target == "goat_milk"));
}

#[test]
fn analysis_serializes_for_reporting() {
    let inspector = Inspector::builtin().expect("inspector");
    let analysis = inspector
        .analyze_label(&LabelRecord::new("sauce", "Soy sauce (water, soybeans, wheat)"))
        .expect("analysis");

    let json = serde_json::to_value(&analysis).expect("serialize");
    assert_eq!(json["label_id"], "sauce");
    assert_eq!(json["allergens"]["categories"][0]["category"], "gluten");
    assert!(json["cross_reactions"].is_array());
}

#[test]
fn inspection_scoring_through_config() {
    let yaml = r#"
version: "1.0"
scoring:
  thresholds:
    critical: 95
    high: 85
    medium: 60
    low: 40
flare:
  enabled: true
  trigger_score: 70
  alert_threshold: 90
  escalation_multiplier: 2.0
"#;
    let cfg = InspectorConfig::from_yaml(yaml).expect("config");
    let inspector = Inspector::from_config(&cfg).expect("inspector");

    let criteria: Criteria = [
        ("food_safety", 80.0),
        ("cleanliness", 60.0),
        ("temperature_control", 70.0),
        ("employee_hygiene", 90.0),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v))
    .collect();

    let outcome = inspector.evaluate_inspection(&criteria, 4);
    assert_eq!(outcome.evaluation.score, 73.0);
    assert_eq!(outcome.evaluation.severity, Severity::Medium);
    assert!(outcome.flare.flare_triggered);
    assert!(!outcome.flare.alert_required);
    assert_eq!(outcome.flare.escalated_priority, 8);
}
