use lexipath::{LevelConfig, PathError, PathParameters, ReadingPathBuilder, Strategy};
use pretty_assertions::assert_eq;
use std::collections::{HashMap, HashSet};

const CEFR: [&str; 5] = ["A1", "A2", "B1", "B2", "C1"];

fn vocab(words: &[&str]) -> HashSet<String> {
    words.iter().map(|w| w.to_string()).collect()
}

fn level_map(entries: &[(&str, &str)]) -> HashMap<String, String> {
    entries
        .iter()
        .map(|(w, l)| (w.to_string(), l.to_string()))
        .collect()
}

fn uniform_params(
    max_books: &[(&str, usize)],
    coverage: f64,
    max_unknown: f64,
    min_relevant: f64,
    min_words: usize,
) -> PathParameters {
    PathParameters {
        max_books_per_level: max_books
            .iter()
            .map(|(l, n)| (l.to_string(), *n))
            .collect(),
        target_coverage_per_level: max_books
            .iter()
            .map(|(l, _)| (l.to_string(), coverage))
            .collect(),
        max_unknown_ratio: max_unknown,
        min_relevant_ratio: min_relevant,
        min_target_level_words: min_words,
    }
}

fn trivial_corpus_builder() -> ReadingPathBuilder {
    let mut books = HashMap::new();
    books.insert("book1".to_string(), vocab(&["a", "b"]));
    books.insert("book2".to_string(), vocab(&["a", "c"]));
    books.insert("book3".to_string(), vocab(&["c", "d", "x"]));

    let map = level_map(&[("a", "A1"), ("b", "A1"), ("c", "A2"), ("d", "B1")]);
    ReadingPathBuilder::new(&books, &map, LevelConfig::cefr()).unwrap()
}

#[test]
fn trivial_corpus_walks_the_levels() {
    let builder = trivial_corpus_builder();
    let params = uniform_params(
        &[("A1", 2), ("A2", 1), ("B1", 1), ("B2", 1), ("C1", 1)],
        1.0,
        0.5,
        0.0,
        1,
    );

    let path = builder.create_reading_path(Some(params)).unwrap();

    assert_eq!(path.total_books, vec!["book1", "book2", "book3"]);

    let a1 = &path.levels["A1"];
    assert_eq!(a1.selected_books, vec!["book1"]);
    assert_eq!(a1.coverage, 1.0);
    assert_eq!(a1.new_words_covered, vocab(&["a", "b"]));
    assert_eq!(a1.stats.target_words, 2);
    assert_eq!(a1.stats.covered_words, 2);

    let a2 = &path.levels["A2"];
    assert_eq!(a2.selected_books, vec!["book2"]);
    assert_eq!(a2.coverage, 1.0);

    let b1 = &path.levels["B1"];
    assert_eq!(b1.selected_books, vec!["book3"]);
    assert_eq!(b1.coverage, 1.0);

    // No B2/C1 vocabulary exists, so those levels come back empty.
    assert!(path.levels["B2"].selected_books.is_empty());
    assert_eq!(path.levels["B2"].coverage, 0.0);
    assert!(path.levels["C1"].selected_books.is_empty());

    let summary = &path.summary;
    assert_eq!(summary.total_books, 3);
    assert_eq!(summary.books_per_level["A1"], 1);
    assert_eq!(summary.books_per_level["B2"], 0);
    assert_eq!(summary.recommended_order, path.total_books);
    assert_eq!(summary.final_coverage["A1"].ratio, 1.0);
    assert_eq!(summary.final_coverage["B1"].ratio, 1.0);

    // Average difficulty per level: book1 1.0, book2 1.5, book3 11/3.
    assert_eq!(summary.difficulty_progression.len(), 3);
    assert_eq!(summary.difficulty_progression[0], ("A1".to_string(), 1.0));
    assert_eq!(summary.difficulty_progression[1], ("A2".to_string(), 1.5));
    assert_eq!(summary.difficulty_progression[2], ("B1".to_string(), 3.67));
}

#[test]
fn cumulative_coverage_snapshots_accumulate() {
    let builder = trivial_corpus_builder();
    let params = uniform_params(
        &[("A1", 2), ("A2", 1), ("B1", 1), ("B2", 1), ("C1", 1)],
        1.0,
        0.5,
        0.0,
        1,
    );

    let path = builder.create_reading_path(Some(params)).unwrap();

    // After A1 only book1 is in: A2 still uncovered.
    let after_a1 = &path.cumulative_coverage["A1"];
    assert_eq!(after_a1["A1"].covered, 2);
    assert_eq!(after_a1["A2"].covered, 0);

    // book2 carries the A2 word "c".
    let after_a2 = &path.cumulative_coverage["A2"];
    assert_eq!(after_a2["A2"].covered, 1);
    assert_eq!(after_a2["B1"].covered, 0);

    let after_b1 = &path.cumulative_coverage["B1"];
    assert_eq!(after_b1["B1"].covered, 1);
    assert_eq!(after_b1["B1"].ratio, 1.0);
}

#[test]
fn identical_books_tie_break_lexicographically() {
    let mut books = HashMap::new();
    books.insert("beta".to_string(), vocab(&["a", "b"]));
    books.insert("alpha".to_string(), vocab(&["a", "b"]));

    let map = level_map(&[("a", "A1"), ("b", "A1")]);
    let builder = ReadingPathBuilder::new(&books, &map, LevelConfig::cefr()).unwrap();
    let params = uniform_params(
        &[("A1", 1), ("A2", 1), ("B1", 1), ("B2", 1), ("C1", 1)],
        1.0,
        1.0,
        0.0,
        1,
    );

    let first = builder.create_reading_path(Some(params.clone())).unwrap();
    assert_eq!(first.levels["A1"].selected_books, vec!["alpha"]);

    // Byte-identical across repeated runs.
    let second = builder.create_reading_path(Some(params)).unwrap();
    assert_eq!(first, second);
}

#[test]
fn unreachable_coverage_terminates_without_error() {
    let mut books = HashMap::new();
    books.insert("half1".to_string(), vocab(&["w1", "w2"]));
    books.insert("half2".to_string(), vocab(&["w3", "w4"]));

    let map = level_map(&[("w1", "A1"), ("w2", "A1"), ("w3", "A1"), ("w4", "A1")]);
    let builder = ReadingPathBuilder::new(&books, &map, LevelConfig::cefr()).unwrap();
    let params = uniform_params(
        &[("A1", 1), ("A2", 1), ("B1", 1), ("B2", 1), ("C1", 1)],
        1.0,
        1.0,
        0.0,
        1,
    );

    let path = builder.create_reading_path(Some(params)).unwrap();
    let a1 = &path.levels["A1"];
    assert_eq!(a1.selected_books.len(), 1);
    assert_eq!(a1.coverage, 0.5);
}

#[test]
fn unknown_ratio_gate_filters_the_only_candidate() {
    let mut books = HashMap::new();
    // 8 mapped words + 2 out-of-syllabus: unknown ratio 0.2.
    books.insert(
        "risky".to_string(),
        vocab(&["w1", "w2", "w3", "w4", "w5", "w6", "w7", "w8", "x1", "x2"]),
    );

    let map = level_map(&[
        ("w1", "A1"),
        ("w2", "A1"),
        ("w3", "A1"),
        ("w4", "A1"),
        ("w5", "A1"),
        ("w6", "A1"),
        ("w7", "A1"),
        ("w8", "A1"),
    ]);
    let builder = ReadingPathBuilder::new(&books, &map, LevelConfig::cefr()).unwrap();

    let caps: [(&str, usize); 5] = [("A1", 1), ("A2", 1), ("B1", 1), ("B2", 1), ("C1", 1)];
    let strict = uniform_params(&caps, 1.0, 0.15, 0.0, 1);
    let path = builder.create_reading_path(Some(strict)).unwrap();
    assert!(path.levels["A1"].selected_books.is_empty());
    assert_eq!(path.levels["A1"].coverage, 0.0);
    assert!(path.total_books.is_empty());

    let relaxed = uniform_params(&caps, 1.0, 0.25, 0.0, 1);
    let path = builder.create_reading_path(Some(relaxed)).unwrap();
    assert_eq!(path.levels["A1"].selected_books, vec!["risky"]);
}

#[test]
fn fully_unknown_book_is_never_selected() {
    let mut books = HashMap::new();
    books.insert("mystery".to_string(), vocab(&["q1", "q2"]));
    books.insert("plain".to_string(), vocab(&["w1"]));

    let map = level_map(&[("w1", "A1")]);
    let builder = ReadingPathBuilder::new(&books, &map, LevelConfig::cefr()).unwrap();
    let params = uniform_params(
        &[("A1", 2), ("A2", 1), ("B1", 1), ("B2", 1), ("C1", 1)],
        1.0,
        1.0,
        0.0,
        1,
    );

    let path = builder.create_reading_path(Some(params)).unwrap();
    assert_eq!(path.total_books, vec!["plain"]);
}

#[test]
fn empty_book_is_accepted_but_never_selected() {
    let mut books = HashMap::new();
    books.insert("blank".to_string(), HashSet::new());
    books.insert("real".to_string(), vocab(&["w1"]));

    let map = level_map(&[("w1", "A1")]);
    let builder = ReadingPathBuilder::new(&books, &map, LevelConfig::cefr()).unwrap();
    assert_eq!(builder.get_book_statistics("blank").unwrap().total_words, 0);

    let params = uniform_params(
        &[("A1", 2), ("A2", 1), ("B1", 1), ("B2", 1), ("C1", 1)],
        1.0,
        1.0,
        0.0,
        1,
    );
    let path = builder.create_reading_path(Some(params)).unwrap();
    assert_eq!(path.total_books, vec!["real"]);
}

#[test]
fn missing_level_entry_fails_before_selection() {
    let builder = trivial_corpus_builder();

    let mut params = uniform_params(
        &[("A1", 2), ("A2", 1), ("B1", 1), ("B2", 1), ("C1", 1)],
        1.0,
        0.5,
        0.0,
        1,
    );
    params.max_books_per_level.remove("B1");

    let err = builder.create_reading_path(Some(params)).unwrap_err();
    assert!(matches!(err, PathError::InvalidParameters(_)));
}

// Five levels, 100 words each; per level four 60-word window books plus a
// 20-word review slice of the previous level. Clean enough to pass every
// preset's filters, so preset comparisons only measure the budgets.
fn graded_corpus() -> (HashMap<String, HashSet<String>>, HashMap<String, String>) {
    let mut word_map = HashMap::new();
    let mut books = HashMap::new();

    for (k, level) in CEFR.iter().enumerate() {
        let tag = level.to_lowercase();
        for i in 0..100 {
            word_map.insert(format!("{}_w{:02}", tag, i), level.to_string());
        }
        for j in 0..4 {
            let mut v = HashSet::new();
            for t in 0..60 {
                v.insert(format!("{}_w{:02}", tag, (25 * j + t) % 100));
            }
            if k > 0 {
                let lower_tag = CEFR[k - 1].to_lowercase();
                for i in 0..20 {
                    v.insert(format!("{}_w{:02}", lower_tag, i));
                }
            }
            books.insert(format!("{}b{}", tag, j), v);
        }
    }

    (books, word_map)
}

#[test]
fn run_invariants_hold_on_a_graded_corpus() {
    let (books, word_map) = graded_corpus();
    let builder = ReadingPathBuilder::new(&books, &word_map, LevelConfig::cefr()).unwrap();
    let params = Strategy::Standard.parameters(builder.config().levels());

    let path = builder
        .create_reading_path(Some(params.clone()))
        .unwrap();

    // No duplicate books across the whole path.
    let unique: HashSet<&String> = path.total_books.iter().collect();
    assert_eq!(unique.len(), path.total_books.len());

    for (level, selection) in &path.levels {
        // Per-level book caps hold.
        assert!(selection.selected_books.len() <= params.max_books_per_level[level]);
        // Reported coverage matches the tallies exactly.
        if selection.stats.target_words > 0 {
            let expected =
                selection.stats.covered_words as f64 / selection.stats.target_words as f64;
            assert_eq!(selection.coverage, expected);
        } else {
            assert_eq!(selection.coverage, 0.0);
        }
        assert_eq!(selection.stats.covered_words, selection.new_words_covered.len());
    }

    // Determinism: same inputs, byte-identical output.
    let again = builder.create_reading_path(Some(params)).unwrap();
    assert_eq!(path, again);
}

#[test]
fn exhaustive_parameters_dominate_presets() {
    let (books, word_map) = graded_corpus();
    let builder = ReadingPathBuilder::new(&books, &word_map, LevelConfig::cefr()).unwrap();

    let exhaustive = uniform_params(
        &[("A1", 100), ("A2", 100), ("B1", 100), ("B2", 100), ("C1", 100)],
        1.0,
        1.0,
        0.0,
        1,
    );
    let full = builder.create_reading_path(Some(exhaustive)).unwrap();

    for strategy in [Strategy::Conservative, Strategy::Standard, Strategy::Fast] {
        let preset_params = strategy.parameters(builder.config().levels());
        let preset = builder.create_reading_path(Some(preset_params)).unwrap();
        for level in CEFR {
            assert!(
                full.summary.final_coverage[level].ratio
                    >= preset.summary.final_coverage[level].ratio
            );
        }
    }
}

#[test]
fn conservative_covers_at_least_as_much_as_fast() {
    let (books, word_map) = graded_corpus();
    let builder = ReadingPathBuilder::new(&books, &word_map, LevelConfig::cefr()).unwrap();

    let conservative = builder
        .create_reading_path(Some(Strategy::Conservative.parameters(builder.config().levels())))
        .unwrap();
    let fast = builder
        .create_reading_path(Some(Strategy::Fast.parameters(builder.config().levels())))
        .unwrap();

    for level in CEFR {
        assert!(
            conservative.summary.final_coverage[level].ratio
                >= fast.summary.final_coverage[level].ratio
        );
    }
}
