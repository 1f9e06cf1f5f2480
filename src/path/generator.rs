use indexmap::IndexMap;
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::analysis::book::BookAnalysis;
use crate::config::LevelConfig;
use crate::error::PathError;
use crate::path::params::{LevelBudget, PathParameters, SelectionCriteria};
use crate::path::result::{
    CoverageStat, LevelSelection, PathSummary, ReadingPath, SelectionStats,
};
use crate::path::scoring::score_book;

/// Layered greedy selector: walks the levels in configured order, picks the
/// highest-scoring candidate book until the level's coverage target or book
/// budget is hit, and carries covered words and selected books forward into
/// the remaining levels.
#[derive(Debug)]
pub struct PathGenerator {
    config: Arc<LevelConfig>,
}

impl PathGenerator {
    pub fn new(config: Arc<LevelConfig>) -> Self {
        Self { config }
    }

    /// Run one full generation pass. Parameters are validated up front;
    /// after that the run always completes — levels that produce no
    /// selection are reported with empty results, not errors.
    pub fn create_progressive_reading_path(
        &self,
        analyses: &HashMap<String, BookAnalysis>,
        target_vocabulary: &HashMap<String, HashSet<String>>,
        params: &PathParameters,
    ) -> Result<ReadingPath, PathError> {
        let budgets = params.budgets(&self.config)?;
        let criteria = SelectionCriteria::from_parameters(params);

        let mut levels: IndexMap<String, LevelSelection> = IndexMap::new();
        let mut total_books: Vec<String> = Vec::new();
        let mut cumulative_coverage: IndexMap<String, IndexMap<String, CoverageStat>> =
            IndexMap::new();
        let mut cumulative_covered: HashSet<String> = HashSet::new();
        let mut already_selected: HashSet<String> = HashSet::new();

        for (target_index, (target_level, budget)) in
            self.config.levels().iter().zip(&budgets).enumerate()
        {
            let selection = self.select_books_for_level(
                target_level,
                target_index,
                analyses,
                target_vocabulary,
                &criteria,
                &cumulative_covered,
                &already_selected,
                *budget,
            );

            // Every level of a selected book counts toward cumulative
            // coverage, not just the level it was picked for.
            for book_id in &selection.selected_books {
                if let Some(analysis) = analyses.get(book_id) {
                    for level in self.config.levels() {
                        if let Some(stats) = analysis.level_stats(level) {
                            cumulative_covered.extend(stats.words.iter().cloned());
                        }
                    }
                }
                already_selected.insert(book_id.clone());
            }

            total_books.extend(selection.selected_books.iter().cloned());
            cumulative_coverage.insert(
                target_level.clone(),
                self.coverage_snapshot(&cumulative_covered, target_vocabulary),
            );
            levels.insert(target_level.clone(), selection);
        }

        let summary = self.build_summary(&levels, &total_books, &cumulative_coverage, analyses);

        Ok(ReadingPath {
            levels,
            total_books,
            cumulative_coverage,
            summary,
        })
    }

    #[allow(clippy::too_many_arguments)]
    fn select_books_for_level(
        &self,
        target_level: &str,
        target_index: usize,
        analyses: &HashMap<String, BookAnalysis>,
        target_vocabulary: &HashMap<String, HashSet<String>>,
        criteria: &SelectionCriteria,
        already_covered: &HashSet<String>,
        already_selected: &HashSet<String>,
        budget: LevelBudget,
    ) -> LevelSelection {
        let mut candidates =
            self.filter_candidates(target_level, analyses, criteria, already_selected);
        tracing::debug!(
            level = %target_level,
            candidates = candidates.len(),
            "Filtered candidate books"
        );

        if candidates.is_empty() {
            tracing::warn!(level = %target_level, "No suitable candidate books for level");
            return LevelSelection::empty(target_level);
        }

        let empty = HashSet::new();
        let level_target_vocab = target_vocabulary.get(target_level).unwrap_or(&empty);
        let target_total = level_target_vocab.len();
        let mut remaining_words: HashSet<String> = level_target_vocab
            .difference(already_covered)
            .cloned()
            .collect();
        let mut newly_covered: HashSet<String> = HashSet::new();
        let mut selected_books: Vec<String> = Vec::new();

        tracing::debug!(
            level = %target_level,
            target_words = target_total,
            remaining = remaining_words.len(),
            "Starting greedy selection"
        );

        let mut iteration = 0usize;
        while selected_books.len() < budget.max_books
            && target_total > 0
            && (newly_covered.len() as f64 / target_total as f64) < budget.target_coverage
            && !remaining_words.is_empty()
            && !candidates.is_empty()
        {
            iteration += 1;
            let best_index = match self.pick_best_candidate(
                &candidates,
                target_level,
                target_index,
                &remaining_words,
                iteration,
            ) {
                Some(index) => index,
                None => break,
            };

            let best = candidates.remove(best_index);
            let new_words: HashSet<String> = match best.level_stats(target_level) {
                Some(stats) => stats
                    .words
                    .intersection(&remaining_words)
                    .cloned()
                    .collect(),
                None => HashSet::new(),
            };

            for word in &new_words {
                remaining_words.remove(word);
            }
            newly_covered.extend(new_words.iter().cloned());

            tracing::debug!(
                level = %target_level,
                book = %best.book_id,
                new_words = new_words.len(),
                coverage = newly_covered.len() as f64 / target_total as f64,
                "Selected book"
            );
            selected_books.push(best.book_id.clone());
        }

        let coverage = if target_total > 0 {
            newly_covered.len() as f64 / target_total as f64
        } else {
            0.0
        };

        LevelSelection {
            target_level: target_level.to_string(),
            coverage,
            stats: SelectionStats {
                target_words: target_total,
                covered_words: newly_covered.len(),
                books_count: selected_books.len(),
            },
            selected_books,
            new_words_covered: newly_covered,
        }
    }

    /// Books that pass the per-level gate, ranked by learning value with
    /// book id as the stable tie key so runs are reproducible.
    fn filter_candidates<'a>(
        &self,
        target_level: &str,
        analyses: &'a HashMap<String, BookAnalysis>,
        criteria: &SelectionCriteria,
        already_selected: &HashSet<String>,
    ) -> Vec<&'a BookAnalysis> {
        let mut candidates: Vec<&BookAnalysis> = analyses
            .values()
            .filter(|analysis| {
                !already_selected.contains(&analysis.book_id)
                    && analysis.unknown_ratio <= criteria.max_unknown_ratio
                    && analysis.suitability(target_level) >= criteria.min_suitability_score
                    && analysis
                        .level_stats(target_level)
                        .map(|stats| stats.count)
                        .unwrap_or(0)
                        >= criteria.min_target_words
            })
            .collect();

        candidates.sort_by(|a, b| {
            b.learning_value
                .partial_cmp(&a.learning_value)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.book_id.cmp(&b.book_id))
        });
        candidates
    }

    /// Index of the highest-scoring selectable candidate, or None when no
    /// candidate scores above zero. Equal scores fall back to fewer unknown
    /// words, then higher learning value, then lexicographic book id.
    fn pick_best_candidate(
        &self,
        candidates: &[&BookAnalysis],
        target_level: &str,
        target_index: usize,
        remaining_words: &HashSet<String>,
        iteration: usize,
    ) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;

        for (index, analysis) in candidates.iter().enumerate() {
            let score = score_book(
                analysis,
                &self.config,
                target_level,
                target_index,
                remaining_words,
                iteration,
            );
            if score <= 0.0 {
                continue;
            }

            best = match best {
                None => Some((index, score)),
                Some((best_index, best_score)) => {
                    if Self::beats(score, analysis, best_score, candidates[best_index]) {
                        Some((index, score))
                    } else {
                        Some((best_index, best_score))
                    }
                }
            };
        }

        best.map(|(index, _)| index)
    }

    fn beats(
        score: f64,
        analysis: &BookAnalysis,
        best_score: f64,
        best_analysis: &BookAnalysis,
    ) -> bool {
        if score != best_score {
            return score > best_score;
        }
        match analysis.unknown_count.cmp(&best_analysis.unknown_count) {
            Ordering::Less => return true,
            Ordering::Greater => return false,
            Ordering::Equal => {}
        }
        match analysis
            .learning_value
            .partial_cmp(&best_analysis.learning_value)
            .unwrap_or(Ordering::Equal)
        {
            Ordering::Greater => return true,
            Ordering::Less => return false,
            Ordering::Equal => {}
        }
        analysis.book_id < best_analysis.book_id
    }

    fn coverage_snapshot(
        &self,
        cumulative_covered: &HashSet<String>,
        target_vocabulary: &HashMap<String, HashSet<String>>,
    ) -> IndexMap<String, CoverageStat> {
        self.config
            .levels()
            .iter()
            .map(|level| {
                let stat = match target_vocabulary.get(level) {
                    Some(vocab) if !vocab.is_empty() => {
                        let covered = vocab
                            .iter()
                            .filter(|word| cumulative_covered.contains(word.as_str()))
                            .count();
                        CoverageStat {
                            covered,
                            total: vocab.len(),
                            ratio: covered as f64 / vocab.len() as f64,
                        }
                    }
                    _ => CoverageStat {
                        covered: 0,
                        total: 0,
                        ratio: 0.0,
                    },
                };
                (level.clone(), stat)
            })
            .collect()
    }

    fn build_summary(
        &self,
        levels: &IndexMap<String, LevelSelection>,
        total_books: &[String],
        cumulative_coverage: &IndexMap<String, IndexMap<String, CoverageStat>>,
        analyses: &HashMap<String, BookAnalysis>,
    ) -> PathSummary {
        let books_per_level: IndexMap<String, usize> = self
            .config
            .levels()
            .iter()
            .map(|level| {
                (
                    level.clone(),
                    levels
                        .get(level)
                        .map(|selection| selection.selected_books.len())
                        .unwrap_or(0),
                )
            })
            .collect();

        let final_coverage = cumulative_coverage
            .values()
            .last()
            .cloned()
            .unwrap_or_default();

        let difficulty_progression: Vec<(String, f64)> = self
            .config
            .levels()
            .iter()
            .filter_map(|level| {
                let selection = levels.get(level)?;
                if selection.selected_books.is_empty() {
                    return None;
                }
                let sum: f64 = selection
                    .selected_books
                    .iter()
                    .filter_map(|book_id| analyses.get(book_id))
                    .map(|analysis| analysis.difficulty_score)
                    .sum();
                let mean = sum / selection.selected_books.len() as f64;
                Some((level.clone(), (mean * 100.0).round() / 100.0))
            })
            .collect();

        PathSummary {
            total_books: total_books.len(),
            books_per_level,
            final_coverage,
            difficulty_progression,
            recommended_order: total_books.to_vec(),
        }
    }
}
