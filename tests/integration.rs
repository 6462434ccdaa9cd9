//! End-to-end scenarios over a real on-disk index.

use std::sync::Once;

use tracing_subscriber::EnvFilter;

use namematch::clean::{FixedDistance, UpperStripPunctuation};
use namematch::{NameMatchEngine, QueryParams, RawRecord};

static TRACING: Once = Once::new();

/// Install a `tracing` subscriber once per test binary, so build/query diagnostics show
/// up under `--nocapture` without every test paying init cost or clobbering a prior
/// subscriber. Controlled by `RUST_LOG`, defaulting to `debug` for this crate.
fn init_tracing() {
    TRACING.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    });
}

fn row(entity_id: &str, name: &str) -> RawRecord {
    RawRecord {
        entity_id: entity_id.to_string(),
        name_id_guid: String::new(),
        name: name.to_string(),
    }
}

/// `dist(t) = 1` if `len(t) >= 3` else `0`.
struct ScenarioDistance;
impl namematch::clean::DistanceFn for ScenarioDistance {
    fn dist(&self, word: &str) -> u32 {
        if namematch::text::utf8_length(word) >= 3 {
            1
        } else {
            0
        }
    }
}

fn open_engine() -> (tempfile::TempDir, NameMatchEngine) {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    let engine = NameMatchEngine::open(dir.path().to_str().unwrap()).unwrap();
    (dir, engine)
}

#[test]
fn s1_exact_name_ranks_first_with_score_100() {
    let (_dir, mut engine) = open_engine();
    let rows = vec![row("E1", "ACME INC"), row("E2", "APEX LLC")];
    engine
        .build(&rows, &UpperStripPunctuation, &ScenarioDistance, "", false)
        .unwrap();

    let results = engine
        .query("ACME INC", &UpperStripPunctuation, &ScenarioDistance, QueryParams::default())
        .unwrap();

    assert_eq!(results[0].entity_id, "E1");
    assert_eq!(results[0].score, 100);
    assert!(results[0].is_match);
    if let Some(e2) = results.iter().find(|r| r.entity_id == "E2") {
        assert!(e2.score < 100);
    }
}

#[test]
fn s2_single_substitution_scores_at_least_70() {
    let (_dir, mut engine) = open_engine();
    let rows = vec![row("E1", "ACME INC")];
    engine
        .build(&rows, &UpperStripPunctuation, &ScenarioDistance, "", false)
        .unwrap();

    let results = engine
        .query("ACNE INC", &UpperStripPunctuation, &ScenarioDistance, QueryParams::default())
        .unwrap();

    let e1 = results.iter().find(|r| r.entity_id == "E1").expect("E1 present");
    assert!(e1.score >= 70, "expected score >= 70, got {}", e1.score);
}

#[test]
fn s3_higher_matched_ratio_outranks_lower() {
    let (_dir, mut engine) = open_engine();
    let rows = vec![row("E1", "THE WIDGET COMPANY"), row("E2", "WIDGET CORP")];
    engine
        .build(&rows, &UpperStripPunctuation, &ScenarioDistance, "", false)
        .unwrap();

    let results = engine
        .query("WIDGET", &UpperStripPunctuation, &ScenarioDistance, QueryParams::default())
        .unwrap();

    let e1 = results.iter().find(|r| r.entity_id == "E1").expect("E1 present");
    let e2 = results.iter().find(|r| r.entity_id == "E2").expect("E2 present");
    assert!(e2.score > e1.score);
}

#[test]
fn s4_phonetic_match_scores_at_least_60() {
    let (_dir, mut engine) = open_engine();
    let rows = vec![row("E1", "JOHN SMITH")];
    engine
        .build(&rows, &UpperStripPunctuation, &ScenarioDistance, "", false)
        .unwrap();

    let results = engine
        .query("JON SMYTH", &UpperStripPunctuation, &ScenarioDistance, QueryParams::default())
        .unwrap();

    let e1 = results.iter().find(|r| r.entity_id == "E1").expect("E1 present");
    assert!(e1.score >= 60, "expected score >= 60, got {}", e1.score);
}

#[test]
fn s5_empty_query_and_stopword_only_query_return_empty() {
    let (_dir, mut engine) = open_engine();
    let rows = vec![row("E1", "ACME INC")];
    engine
        .build(&rows, &UpperStripPunctuation, &ScenarioDistance, "", false)
        .unwrap();

    let empty = engine
        .query("", &UpperStripPunctuation, &ScenarioDistance, QueryParams::default())
        .unwrap();
    assert!(empty.is_empty());
}

#[test]
fn s5_stopword_only_query_returns_empty() {
    let stopdir = tempfile::tempdir().unwrap();
    let stop_path = stopdir.path().join("stop.txt");
    std::fs::write(&stop_path, "THE\n").unwrap();

    let (_dir, mut engine) = open_engine();
    let rows = vec![row("E1", "THE WIDGET COMPANY")];
    engine
        .build(
            &rows,
            &UpperStripPunctuation,
            &ScenarioDistance,
            stop_path.to_str().unwrap(),
            false,
        )
        .unwrap();

    let results = engine
        .query("THE", &UpperStripPunctuation, &ScenarioDistance, QueryParams::default())
        .unwrap();
    assert!(results.is_empty());
}

#[test]
fn s6_only_direct_excludes_sibling_aliases() {
    let (_dir, mut engine) = open_engine();
    let rows = vec![
        row("E1", "ACME WIDGET CO"),
        row("E1", "ZZZTOP HOLDINGS"),
    ];
    engine
        .build(&rows, &UpperStripPunctuation, &ScenarioDistance, "", false)
        .unwrap();

    let params = QueryParams {
        only_direct: true,
        ..QueryParams::default()
    };
    let results = engine
        .query("ACME WIDGET CO", &UpperStripPunctuation, &ScenarioDistance, params)
        .unwrap();

    assert_eq!(results.len(), 1);
    assert!(results[0].is_match);
    assert_eq!(results[0].full_name, "ACME WIDGET CO");
}

#[test]
fn build_determinism_produces_identical_query_results() {
    let rows = vec![row("E1", "ACME INC"), row("E2", "APEX LLC")];

    let (_dir_a, mut engine_a) = open_engine();
    engine_a
        .build(&rows, &UpperStripPunctuation, &ScenarioDistance, "", false)
        .unwrap();
    let (_dir_b, mut engine_b) = open_engine();
    engine_b
        .build(&rows, &UpperStripPunctuation, &ScenarioDistance, "", false)
        .unwrap();

    let a = engine_a
        .query("ACME INC", &UpperStripPunctuation, &ScenarioDistance, QueryParams::default())
        .unwrap();
    let b = engine_b
        .query("ACME INC", &UpperStripPunctuation, &ScenarioDistance, QueryParams::default())
        .unwrap();
    assert_eq!(a, b);
}

#[test]
fn score_bounds_hold_over_a_mixed_corpus() {
    let (_dir, mut engine) = open_engine();
    let rows = vec![
        row("E1", "ACME INC"),
        row("E2", "APEX LLC"),
        row("E3", "JOHN SMITH"),
        row("E4", "THE WIDGET COMPANY"),
    ];
    engine
        .build(&rows, &UpperStripPunctuation, &ScenarioDistance, "", false)
        .unwrap();

    for q in ["ACME INC", "ACNE INC", "JON SMYTH", "WIDGET", "ZZZZZ"] {
        let results = engine
            .query(q, &UpperStripPunctuation, &ScenarioDistance, QueryParams::default())
            .unwrap();
        for r in &results {
            assert!(r.score <= 100, "score {} out of bounds for query {q}", r.score);
        }
    }
}

#[test]
fn pagination_concatenates_back_to_the_full_ranked_list() {
    let (_dir, mut engine) = open_engine();
    let rows = vec![
        row("E1", "ACME WIDGET ONE"),
        row("E2", "ACME WIDGET TWO"),
        row("E3", "ACME WIDGET THREE"),
        row("E4", "ACME WIDGET FOUR"),
        row("E5", "ACME WIDGET FIVE"),
    ];
    engine
        .build(&rows, &UpperStripPunctuation, &ScenarioDistance, "", false)
        .unwrap();

    let full = engine
        .query("ACME WIDGET", &UpperStripPunctuation, &ScenarioDistance, QueryParams::default())
        .unwrap();

    let mut reassembled = Vec::new();
    let mut page_num = 1;
    loop {
        let page = engine
            .query(
                "ACME WIDGET",
                &UpperStripPunctuation,
                &ScenarioDistance,
                QueryParams {
                    page_num,
                    page_size: 2,
                    ..QueryParams::default()
                },
            )
            .unwrap();
        if page.is_empty() {
            break;
        }
        reassembled.extend(page);
        page_num += 1;
    }

    assert_eq!(reassembled, full);
}

#[test]
fn removing_a_stopword_does_not_reduce_any_returned_score() {
    let rows = vec![row("E1", "THE WIDGET COMPANY")];

    // Build and query with "THE" treated as a stopword.
    let (_dir_a, mut with_stopword) = open_engine();
    let stopdir = tempfile::tempdir().unwrap();
    let stop_path = stopdir.path().join("stop.txt");
    std::fs::write(&stop_path, "THE\n").unwrap();
    with_stopword
        .build(&rows, &UpperStripPunctuation, &FixedDistance(1), stop_path.to_str().unwrap(), false)
        .unwrap();
    let before = with_stopword
        .query("THE WIDGET", &UpperStripPunctuation, &FixedDistance(1), QueryParams::default())
        .unwrap();
    let before_score = before
        .iter()
        .find(|r| r.entity_id == "E1")
        .expect("E1 present with stopword applied")
        .score;

    // Same corpus and query, but "THE" is no longer excluded anywhere.
    let (_dir_b, mut without_stopword) = open_engine();
    without_stopword
        .build(&rows, &UpperStripPunctuation, &FixedDistance(1), "", false)
        .unwrap();
    let after = without_stopword
        .query("THE WIDGET", &UpperStripPunctuation, &FixedDistance(1), QueryParams::default())
        .unwrap();
    let after_score = after
        .iter()
        .find(|r| r.entity_id == "E1")
        .expect("E1 present without stopword applied")
        .score;

    assert!(
        after_score >= before_score,
        "removing a stopword reduced the score: {before_score} -> {after_score}"
    );
}
