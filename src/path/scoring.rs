use std::collections::HashSet;

use crate::analysis::book::BookAnalysis;
use crate::config::LevelConfig;

// Scoring constants are a behavioral contract: changing any of them changes
// which books get picked.
const NEW_WORD_SCORE: f64 = 10.0;
const REVIEW_BONUS_PER_WORD: f64 = 0.5;
const PREVIEW_BONUS_PER_WORD: f64 = 0.1;
const PREVIEW_WORD_CAP: usize = 100;
const UNKNOWN_WORD_PENALTY: f64 = 0.8;
const EFFICIENCY_BONUS_SCALE: f64 = 50.0;
const EFFICIENCY_MIN_ITERATION: usize = 2;

const REJECTED: f64 = -1.0;

/// Selection score of one candidate book for the target level, given the
/// words still uncovered there. Non-positive scores mean the book is not
/// selectable this iteration.
///
/// New target-level coverage dominates; words from easier levels add review
/// value, a capped slice of the next level adds preview value, unknown
/// words penalize, and from the third iteration on a coverage-efficiency
/// bonus favors books that close out the remainder.
pub(crate) fn score_book(
    analysis: &BookAnalysis,
    config: &LevelConfig,
    target_level: &str,
    target_index: usize,
    remaining_words: &HashSet<String>,
    iteration: usize,
) -> f64 {
    let target_stats = match analysis.level_stats(target_level) {
        Some(stats) if stats.count > 0 => stats,
        _ => return REJECTED,
    };

    let new_coverage = target_stats
        .words
        .iter()
        .filter(|word| remaining_words.contains(word.as_str()))
        .count();
    if new_coverage == 0 {
        return REJECTED;
    }

    let mut score = new_coverage as f64 * NEW_WORD_SCORE;

    for lower_level in &config.levels()[..target_index] {
        if let Some(stats) = analysis.level_stats(lower_level) {
            score += stats.count as f64 * REVIEW_BONUS_PER_WORD;
        }
    }

    if target_index + 1 < config.level_count() {
        let next_level = &config.levels()[target_index + 1];
        if let Some(stats) = analysis.level_stats(next_level) {
            score += stats.count.min(PREVIEW_WORD_CAP) as f64 * PREVIEW_BONUS_PER_WORD;
        }
    }

    score -= analysis.unknown_count as f64 * UNKNOWN_WORD_PENALTY;

    if iteration > EFFICIENCY_MIN_ITERATION && !remaining_words.is_empty() {
        score += EFFICIENCY_BONUS_SCALE * new_coverage as f64 / remaining_words.len() as f64;
    }

    score
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::BookAnalyzer;
    use std::collections::HashMap;
    use std::sync::Arc;

    fn analyzer() -> BookAnalyzer {
        // 10 B1 words, plenty of A1/A2 filler, one C1 preview pool.
        let mut map = HashMap::new();
        for i in 0..60 {
            map.insert(format!("a1_{}", i), "A1".to_string());
            map.insert(format!("a2_{}", i), "A2".to_string());
        }
        for i in 0..20 {
            map.insert(format!("b1_{}", i), "B1".to_string());
        }
        for i in 0..200 {
            map.insert(format!("b2_{}", i), "B2".to_string());
        }
        BookAnalyzer::new(Arc::new(crate::config::LevelConfig::cefr()), &map).unwrap()
    }

    fn vocab(words: &[String]) -> HashSet<String> {
        words.iter().cloned().collect()
    }

    #[test]
    fn review_words_outrank_equal_new_coverage() {
        let analyzer = analyzer();
        let config = analyzer.config().clone();

        let plain: Vec<String> = (0..10).map(|i| format!("b1_{}", i)).collect();
        let mut rich = plain.clone();
        for i in 0..50 {
            rich.push(format!("a1_{}", i));
            rich.push(format!("a2_{}", i));
        }

        let plain_analysis = analyzer.analyze("plain", &vocab(&plain));
        let rich_analysis = analyzer.analyze("rich", &vocab(&rich));

        let remaining: HashSet<String> = (0..20).map(|i| format!("b1_{}", i)).collect();
        let plain_score = score_book(&plain_analysis, &config, "B1", 2, &remaining, 1);
        let rich_score = score_book(&rich_analysis, &config, "B1", 2, &remaining, 1);

        // 10 new words each; 50 A1 + 50 A2 review words add 0.5 apiece.
        assert_eq!(plain_score, 100.0);
        assert_eq!(rich_score, 150.0);
    }

    #[test]
    fn efficiency_bonus_starts_on_third_iteration() {
        let analyzer = analyzer();
        let config = analyzer.config().clone();

        let words: Vec<String> = (0..10).map(|i| format!("b1_{}", i)).collect();
        let analysis = analyzer.analyze("book", &vocab(&words));
        let remaining: HashSet<String> = (0..20).map(|i| format!("b1_{}", i)).collect();

        let early = score_book(&analysis, &config, "B1", 2, &remaining, 2);
        let late = score_book(&analysis, &config, "B1", 2, &remaining, 3);

        assert_eq!(early, 100.0);
        // 50 * (10 / 20) = 25 efficiency bonus.
        assert_eq!(late, 125.0);
    }

    #[test]
    fn preview_bonus_is_capped() {
        let analyzer = analyzer();
        let config = analyzer.config().clone();

        let mut words: Vec<String> = (0..10).map(|i| format!("b1_{}", i)).collect();
        for i in 0..200 {
            words.push(format!("b2_{}", i));
        }
        let analysis = analyzer.analyze("book", &vocab(&words));
        let remaining: HashSet<String> = (0..20).map(|i| format!("b1_{}", i)).collect();

        let score = score_book(&analysis, &config, "B1", 2, &remaining, 1);
        // 100 base + capped preview of 100 words at 0.1.
        assert_eq!(score, 110.0);
    }

    #[test]
    fn rejects_books_without_new_words() {
        let analyzer = analyzer();
        let config = analyzer.config().clone();

        let words: Vec<String> = (0..10).map(|i| format!("b1_{}", i)).collect();
        let analysis = analyzer.analyze("book", &vocab(&words));

        let covered_remaining: HashSet<String> = (10..20).map(|i| format!("b1_{}", i)).collect();
        assert_eq!(
            score_book(&analysis, &config, "B1", 2, &covered_remaining, 1),
            -1.0
        );

        let a1_only = analyzer.analyze("a1", &vocab(&vec!["a1_0".to_string()]));
        let remaining: HashSet<String> = (0..20).map(|i| format!("b1_{}", i)).collect();
        assert_eq!(score_book(&a1_only, &config, "B1", 2, &remaining, 1), -1.0);
    }

    #[test]
    fn unknown_words_penalize() {
        let analyzer = analyzer();
        let config = analyzer.config().clone();

        let mut words: Vec<String> = (0..10).map(|i| format!("b1_{}", i)).collect();
        for i in 0..5 {
            words.push(format!("mystery_{}", i));
        }
        let analysis = analyzer.analyze("book", &vocab(&words));
        let remaining: HashSet<String> = (0..20).map(|i| format!("b1_{}", i)).collect();

        let score = score_book(&analysis, &config, "B1", 2, &remaining, 1);
        // 100 base - 5 * 0.8 unknown penalty.
        assert_eq!(score, 96.0);
    }
}
