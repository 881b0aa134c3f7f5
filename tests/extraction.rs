//! End-to-end extraction scenarios.
//!
//! The running example is the one the Faerie paper uses: a dictionary of
//! researcher names against a mangled sentence mentioning all of them.

use std::collections::BTreeSet;

use muninn::{ExtractionConfig, MuninnEngine, PrunerKind, SimilarityKind, TokenMode};

const NAMES: [&str; 5] = [
    "kaushik ch",
    "chakrabarti",
    "chaudhuri",
    "venkatesh",
    "surajit ch",
];

const SENTENCE: &str = "an efficient filter for approximate membership checking. \
                        venkaee shga kamunshik kabarati, dong xin, surauijt chadhurisigmod.";

fn edit_dist_config(tau: f64, pruner: PrunerKind) -> ExtractionConfig {
    ExtractionConfig {
        threshold: tau,
        pruner,
        ..ExtractionConfig::default()
    }
}

/// Distinct `(match text, entity text)` pairs of a report.
fn match_pairs(engine: &MuninnEngine, document: &str) -> BTreeSet<(String, String)> {
    engine
        .extract(document)
        .unwrap()
        .matches
        .iter()
        .map(|m| (m.text.clone(), m.entity.0.clone()))
        .collect()
}

#[test]
fn sigmod_example_verified_matches() {
    let engine = MuninnEngine::from_strings(edit_dist_config(2.0, PrunerKind::Batch), NAMES).unwrap();
    let pairs = match_pairs(&engine, SENTENCE);

    let expected: BTreeSet<(String, String)> = [
        (" chadhuri", "chaudhuri"),
        ("chadhur", "chaudhuri"),
        ("chadhuri", "chaudhuri"),
        ("chadhuris", "chaudhuri"),
        ("hadhuri", "chaudhuri"),
        ("surauijt ch", "surajit ch"),
        ("venkaee sh", "venkatesh"),
    ]
    .into_iter()
    .map(|(m, e)| (m.to_string(), e.to_string()))
    .collect();

    assert_eq!(pairs, expected);
}

#[test]
fn sigmod_example_unverified_candidates() {
    let config = ExtractionConfig {
        verify: false,
        ..edit_dist_config(2.0, PrunerKind::Batch)
    };
    let engine = MuninnEngine::from_strings(config, NAMES).unwrap();
    let pairs = match_pairs(&engine, SENTENCE);

    assert_eq!(pairs.len(), 54);
    for (text, entity) in [
        ("kamunshik ", "kaushik ch"),
        ("venkaee sh", "venkatesh"),
        ("urauijt ch", "surajit ch"),
        (" chadhuri", "chaudhuri"),
    ] {
        assert!(
            pairs.contains(&(text.to_string(), entity.to_string())),
            "missing candidate {text:?} for {entity:?}"
        );
    }
    // no candidate for chakrabarti survives the length bounds here
    assert!(pairs.iter().all(|(_, e)| e != "chakrabarti"));
}

#[test]
fn pruners_agree_on_verified_matches() {
    let reference = match_pairs(
        &MuninnEngine::from_strings(edit_dist_config(2.0, PrunerKind::None), NAMES).unwrap(),
        SENTENCE,
    );
    assert!(!reference.is_empty());

    for pruner in [PrunerKind::Lazy, PrunerKind::Bucket, PrunerKind::Batch] {
        let engine = MuninnEngine::from_strings(edit_dist_config(2.0, pruner), NAMES).unwrap();
        assert_eq!(match_pairs(&engine, SENTENCE), reference, "pruner {pruner}");
    }
}

#[test]
fn pruners_agree_on_raw_candidates() {
    let raw = |pruner| {
        let config = ExtractionConfig {
            verify: false,
            ..edit_dist_config(2.0, pruner)
        };
        let engine = MuninnEngine::from_strings(config, NAMES).unwrap();
        let report = engine.extract(SENTENCE).unwrap();
        report
            .matches
            .iter()
            .map(|m| (m.entity.1.clone(), m.span))
            .collect::<BTreeSet<_>>()
    };

    let reference = raw(PrunerKind::None);
    for pruner in [PrunerKind::Lazy, PrunerKind::Bucket, PrunerKind::Batch] {
        assert_eq!(raw(pruner), reference, "pruner {pruner}");
    }
}

#[test]
fn zero_distance_finds_exact_occurrences_only() {
    let engine = MuninnEngine::from_strings(edit_dist_config(0.0, PrunerKind::Batch), ["dolor"]).unwrap();
    let report = engine
        .extract("Lorem ipsum dolor sit amet. dolor!")
        .unwrap();

    assert_eq!(report.len(), 2);
    let spans: BTreeSet<(usize, usize)> = report.matches.iter().map(|m| m.span).collect();
    assert_eq!(spans, BTreeSet::from([(12, 17), (28, 33)]));
    assert!(report.matches.iter().all(|m| m.text == "dolor"));
    assert!(report.matches.iter().all(|m| m.score == Some(0.0)));
}

#[test]
fn unit_jaccard_threshold_finds_exact_token_runs() {
    let mut config = ExtractionConfig {
        similarity: SimilarityKind::Jaccard,
        threshold: 1.0,
        ..ExtractionConfig::default()
    };
    config.tokenizer.mode = TokenMode::Word;
    let engine = MuninnEngine::from_strings(config, ["peck of pickled peppers"]).unwrap();

    let report = engine
        .extract("a peck of pickled peppers Peter Piper picked")
        .unwrap();
    assert_eq!(report.len(), 1);
    assert_eq!(report.matches[0].text, "peck of pickled peppers");
    assert_eq!(report.matches[0].score, Some(1.0));
}

#[test]
fn single_char_entities_are_dropped_without_error() {
    let engine = MuninnEngine::from_strings(edit_dist_config(2.0, PrunerKind::Batch), ["a"]).unwrap();
    let report = engine.extract("a a a a").unwrap();
    assert!(report.is_empty());
}

#[test]
fn empty_document_yields_empty_report() {
    let engine = MuninnEngine::from_strings(ExtractionConfig::default(), NAMES).unwrap();
    for doc in ["", " ", "x"] {
        let report = engine.extract(doc).unwrap();
        assert!(report.is_empty(), "doc {doc:?}");
    }
}

#[test]
fn batch_extraction_is_order_preserving() {
    let engine = MuninnEngine::from_strings(ExtractionConfig::default(), NAMES).unwrap();
    let docs = vec![
        SENTENCE.to_string(),
        String::new(),
        "surauijt chadhurisigmod".to_string(),
    ];
    let reports = engine.extract_all(&docs).unwrap();
    assert_eq!(reports.len(), 3);
    assert!(!reports[0].is_empty());
    assert!(reports[1].is_empty());
    assert!(!reports[2].is_empty());
    assert_eq!(reports[0].document, SENTENCE.to_lowercase());
}

#[test]
fn match_lengths_always_respect_bounds() {
    // every emitted span must be between 7 and 11 characters for a
    // 10-character entity at tau = 2 with q = 2
    let engine =
        MuninnEngine::from_strings(edit_dist_config(2.0, PrunerKind::Lazy), ["surajit ch"]).unwrap();
    let report = engine.extract(SENTENCE).unwrap();
    assert!(!report.is_empty());
    for m in &report.matches {
        let chars = m.span.1 - m.span.0;
        assert!((8..=12).contains(&chars), "span {:?} -> {} chars", m.span, chars);
    }
}
