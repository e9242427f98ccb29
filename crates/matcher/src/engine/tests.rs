use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use synonyms::SynonymIndex;

use super::*;
use crate::metrics::{set_scan_metrics, ScanMetrics};

fn builtin_matcher() -> Matcher {
    Matcher::builtin().expect("bundled vocabulary loads")
}

fn strict_matcher(exceptions: ExceptionSet) -> Matcher {
    let cfg = MatcherConfig {
        compound_policy: CompoundPolicy::Strict,
        exceptions,
        ..MatcherConfig::default()
    };
    Matcher::with_config(SynonymIndex::builtin().expect("vocabulary"), cfg).expect("matcher")
}

fn texts(occurrences: &[MatchOccurrence]) -> Vec<&str> {
    occurrences.iter().map(|o| o.text.as_str()).collect()
}

#[test]
fn exact_word_match_reports_offsets() {
    let matcher = builtin_matcher();
    let text = "Contains malt extract and corn syrup";
    let found = matcher.find(text, "malt").expect("scan");
    assert_eq!(
        found,
        vec![MatchOccurrence {
            text: "malt".into(),
            start: 9,
            end: 13,
        }]
    );

    let phrase = matcher.find(text, "malt extract").expect("scan");
    assert_eq!(texts(&phrase), vec!["malt extract"]);
}

#[test]
fn term_inside_longer_word_is_not_matched() {
    let matcher = builtin_matcher();
    let found = matcher
        .find("Contains maltodextrin and corn syrup", "malt")
        .expect("scan");
    assert!(found.is_empty());

    let found = matcher.find("Contains milkshake flavor", "milk").expect("scan");
    assert!(found.is_empty());
}

#[test]
fn standalone_and_compound_occurrences_coexist() {
    let matcher = builtin_matcher();
    let text = "Contains malt extract, maltodextrin, and malt flavoring";
    let found = matcher.find(text, "malt").expect("scan");
    assert_eq!(found.len(), 2);
    assert!(found.windows(2).all(|pair| pair[0].start < pair[1].start));
    for occurrence in &found {
        assert_eq!(&text[occurrence.start..occurrence.end], "malt");
    }
}

#[test]
fn matching_ignores_case_but_reports_original_text() {
    let matcher = builtin_matcher();
    let text = "Contains WHEY PROTEIN and Casein";
    let whey = matcher.find(text, "whey").expect("scan");
    assert_eq!(texts(&whey), vec!["WHEY"]);
    assert_eq!(whey[0].start, 9);

    let casein = matcher.find(text, "casein").expect("scan");
    assert_eq!(texts(&casein), vec!["Casein"]);
}

#[test]
fn hyphenated_and_apostrophe_phrases_match_whole() {
    let matcher = builtin_matcher();
    let found = matcher
        .find("Contains half-and-half cream", "half-and-half")
        .expect("scan");
    assert_eq!(texts(&found), vec!["half-and-half"]);

    let found = matcher
        .find("Contains half and half", "half-and-half")
        .expect("scan");
    assert!(found.is_empty());

    let found = matcher
        .find("Contains brewer's yeast", "brewer's yeast")
        .expect("scan");
    assert_eq!(texts(&found), vec!["brewer's yeast"]);
}

#[test]
fn repeated_occurrences_are_all_reported() {
    let matcher = builtin_matcher();
    let found = matcher
        .find("milk chocolate (milk, sugar, milk solids)", "milk")
        .expect("scan");
    assert_eq!(found.len(), 3);
}

#[test]
fn offsets_are_byte_offsets_into_the_input() {
    let matcher = builtin_matcher();
    let text = "Crème fraîche, écrémé MILK";
    let found = matcher.find(text, "milk").expect("scan");
    assert_eq!(found.len(), 1);
    let start = text.find("MILK").expect("present");
    assert_eq!((found[0].start, found[0].end), (start, start + 4));
    assert_eq!(&text[found[0].start..found[0].end], "MILK");
}

#[test]
fn empty_text_or_term_yields_nothing() {
    let matcher = builtin_matcher();
    assert!(matcher.find("", "milk").expect("scan").is_empty());
    assert!(matcher.find("milk", "").expect("scan").is_empty());
    assert!(matcher.scan_all("").expect("scan").is_empty());
}

#[test]
fn category_scan_finds_each_synonym() {
    let matcher = builtin_matcher();
    let hits = matcher
        .scan_category("Ingredients: milk, whey protein, casein, sugar", "dairy")
        .expect("scan");
    assert_eq!(hits.category, "dairy");
    for synonym in ["milk", "whey", "casein", "whey protein"] {
        let occurrences = hits.get(synonym).expect("synonym matched");
        assert!(!occurrences.is_empty());
    }
    assert!(!hits.contains("butter"));
}

#[test]
fn category_scan_follows_vocabulary_order() {
    let matcher = builtin_matcher();
    let hits = matcher
        .scan_category("Contains: rye, barley, malt extract, wheat flour", "gluten")
        .expect("scan");
    let names: Vec<&str> = hits.synonym_names().collect();
    assert_eq!(
        names,
        vec!["wheat", "wheat flour", "barley", "rye", "malt", "malt extract"]
    );
}

#[test]
fn unknown_category_is_empty_not_error() {
    let matcher = builtin_matcher();
    let hits = matcher.scan_category("milk", "lupin").expect("scan");
    assert!(hits.is_empty());
    assert_eq!(hits.category, "lupin");
}

#[test]
fn full_scan_reports_every_family() {
    let matcher = builtin_matcher();
    let report = matcher
        .scan_all("Contains: wheat flour, soy lecithin, milk, eggs")
        .expect("scan");
    for category in ["gluten", "soy", "dairy", "eggs"] {
        assert!(report.contains_category(category), "missing {category}");
    }
    let names: Vec<&str> = report.category_names().collect();
    assert_eq!(names, vec!["dairy", "eggs", "gluten", "soy"]);
}

#[test]
fn allergen_free_text_is_empty() {
    let matcher = builtin_matcher();
    let report = matcher.scan_all("Salt, water, vinegar").expect("scan");
    assert!(report.is_empty());
}

#[test]
fn lecithin_alone_still_counts_as_soy() {
    let matcher = builtin_matcher();
    let with_soy = matcher
        .scan_category("Contains soy lecithin", "soy")
        .expect("scan");
    let bare = matcher.scan_category("Contains lecithin", "soy").expect("scan");
    assert!(!with_soy.is_empty());
    assert!(bare.contains("lecithin"));
}

#[test]
fn repeated_scans_are_identical() {
    let matcher = builtin_matcher();
    let text = "Enriched wheat flour, milk, soy lecithin, peanut butter, sesame oil";
    let first = matcher.scan_all(text).expect("scan");
    for _ in 0..3 {
        assert_eq!(matcher.scan_all(text).expect("scan"), first);
    }
}

#[test]
fn results_do_not_depend_on_cache_size() {
    let index = SynonymIndex::builtin().expect("vocabulary");
    let tiny = Matcher::with_config(
        index.clone(),
        MatcherConfig {
            pattern_cache_capacity: 1,
            ..MatcherConfig::default()
        },
    )
    .expect("matcher");
    let roomy = Matcher::new(index);
    let text = "Cheese (milk, salt, enzymes), wheat flour, egg yolk, anchovy";
    assert_eq!(
        tiny.scan_all(text).expect("scan"),
        roomy.scan_all(text).expect("scan")
    );
    assert_eq!(tiny.patterns().len(), 1);
}

#[test]
fn absent_text_is_invalid_argument() {
    let matcher = builtin_matcher();
    let err = matcher.try_scan_all(None).expect_err("absent text must fail");
    assert!(matches!(err, MatchError::InvalidArgument(_)));
    assert!(matcher.try_scan_all(Some("")).expect("scan").is_empty());
}

#[test]
fn absent_text_is_rejected_by_find_and_category_scan() {
    let matcher = builtin_matcher();
    assert!(matches!(
        matcher.try_find(None, "milk"),
        Err(MatchError::InvalidArgument(_))
    ));
    assert!(matches!(
        matcher.try_scan_category(None, "milk"),
        Err(MatchError::InvalidArgument(_))
    ));

    let text = "Skim milk powder, whey";
    assert_eq!(
        matcher.try_find(Some(text), "milk").expect("scan"),
        matcher.find(text, "milk").expect("scan")
    );
    assert_eq!(
        matcher.try_scan_category(Some(text), "milk").expect("scan"),
        matcher.scan_category(text, "milk").expect("scan")
    );
    assert!(matcher.try_find(Some(""), "milk").expect("scan").is_empty());
}

#[test]
fn reverse_lookup_through_matcher() {
    let matcher = builtin_matcher();
    assert_eq!(matcher.category_of("whey"), Some("dairy"));
    assert_eq!(matcher.category_of("Semolina"), Some("gluten"));
    assert_eq!(matcher.category_of("unknown_term"), None);
    assert!(matcher.synonyms_of("dairy").len() > 10);
    assert!(matcher.synonyms_of("unknown").is_empty());
}

#[test]
fn strict_policy_drops_hyphen_compounds() {
    let default = builtin_matcher();
    let strict = strict_matcher(ExceptionSet::new());
    let text = "Contains malt-flavored syrup and malt";

    assert_eq!(default.find(text, "malt").expect("scan").len(), 2);
    let found = strict.find(text, "malt").expect("scan");
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].start, text.rfind("malt").expect("present"));
}

#[test]
fn strict_policy_respects_exceptions() {
    let strict = strict_matcher(ExceptionSet::new().with("malt", ["malt-flavored"]));
    let found = strict
        .find("Contains malt-flavored syrup", "malt")
        .expect("scan");
    assert_eq!(texts(&found), vec!["malt"]);
}

#[test]
fn strict_policy_keeps_whole_phrases() {
    let strict = strict_matcher(ExceptionSet::new());
    let text = "Contains half-and-half cream";
    assert_eq!(strict.find(text, "half-and-half").expect("scan").len(), 1);
    assert!(strict.find(text, "half").expect("scan").is_empty());
    assert_eq!(builtin_matcher().find(text, "half").expect("scan").len(), 2);
}

#[test]
fn exception_cannot_reach_inside_a_word() {
    let strict = strict_matcher(ExceptionSet::new().with("malt", ["maltodextrin"]));
    let found = strict
        .find("Contains maltodextrin and corn syrup", "malt")
        .expect("scan");
    assert!(found.is_empty());
}

#[test]
fn strict_policy_applies_to_full_scans() {
    let strict = strict_matcher(ExceptionSet::new());
    let report = strict.scan_all("Contains malt-flavored syrup").expect("scan");
    assert!(!report.contains_category("gluten"));

    let report = builtin_matcher()
        .scan_all("Contains malt-flavored syrup")
        .expect("scan");
    assert!(report.contains_category("gluten"));
}

#[test]
fn warm_up_compiles_vocabulary() {
    let matcher = builtin_matcher();
    let compiled = matcher.warm_up().expect("warm up");
    assert_eq!(compiled, matcher.index().synonym_count());
    assert_eq!(matcher.patterns().len(), compiled);
}

#[test]
fn matcher_is_shareable_across_threads() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Matcher>();
}

struct CountingMetrics {
    full: AtomicUsize,
    category: AtomicUsize,
}

impl ScanMetrics for CountingMetrics {
    fn record_scan(&self, kind: ScanKind, _latency: Duration, _hit_count: usize) {
        match kind {
            ScanKind::Full => self.full.fetch_add(1, Ordering::SeqCst),
            ScanKind::Category => self.category.fetch_add(1, Ordering::SeqCst),
        };
    }
}

#[test]
fn scans_report_to_installed_metrics() {
    let metrics = Arc::new(CountingMetrics {
        full: AtomicUsize::new(0),
        category: AtomicUsize::new(0),
    });
    set_scan_metrics(Some(metrics.clone()));

    let matcher = builtin_matcher();
    matcher.scan_all("milk").expect("scan");
    matcher.scan_category("milk", "dairy").expect("scan");

    assert!(metrics.full.load(Ordering::SeqCst) >= 1);
    assert!(metrics.category.load(Ordering::SeqCst) >= 1);
    set_scan_metrics(None);
}
