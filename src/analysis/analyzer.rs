use indexmap::IndexMap;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::analysis::book::{BookAnalysis, LevelStats};
use crate::config::LevelConfig;
use crate::error::PathError;

/// Turns raw book vocabularies into `BookAnalysis` records.
///
/// The word-to-level map is grouped into per-level vocabulary sets once at
/// construction; each book analysis is then a single pass over the book's
/// words. Analyses are stored keyed by book id, so results do not depend on
/// corpus iteration order.
#[derive(Debug)]
pub struct BookAnalyzer {
    config: Arc<LevelConfig>,
    level_vocab: HashMap<String, HashSet<String>>,
    known_words: HashSet<String>,
    analyses: HashMap<String, BookAnalysis>,
}

impl BookAnalyzer {
    /// Build the per-level vocabulary from a word-to-level map. A word
    /// mapped to a level absent from the configuration is an error; empty
    /// word entries are ignored.
    pub fn new(
        config: Arc<LevelConfig>,
        word_level_map: &HashMap<String, String>,
    ) -> Result<Self, PathError> {
        let mut level_vocab: HashMap<String, HashSet<String>> = HashMap::new();
        let mut known_words = HashSet::new();

        for (word, level) in word_level_map {
            if word.trim().is_empty() {
                continue;
            }
            if !config.contains_level(level) {
                return Err(PathError::UnknownLevel(level.clone()));
            }
            level_vocab
                .entry(level.clone())
                .or_default()
                .insert(word.clone());
            known_words.insert(word.clone());
        }

        for level in config.levels() {
            let count = level_vocab.get(level).map(|s| s.len()).unwrap_or(0);
            tracing::debug!(level = %level, words = count, "Level vocabulary built");
        }
        tracing::info!(
            levels = config.level_count(),
            known_words = known_words.len(),
            "Vocabulary mapping grouped by level"
        );

        Ok(Self {
            config,
            level_vocab,
            known_words,
            analyses: HashMap::new(),
        })
    }

    pub fn config(&self) -> &Arc<LevelConfig> {
        &self.config
    }

    /// Per-level target vocabulary sets, cloned for a generation run.
    pub fn target_vocabulary(&self) -> HashMap<String, HashSet<String>> {
        self.config
            .levels()
            .iter()
            .map(|level| {
                (
                    level.clone(),
                    self.level_vocab.get(level).cloned().unwrap_or_default(),
                )
            })
            .collect()
    }

    /// Vocabulary size per level, in configured order.
    pub fn vocabulary_stats(&self) -> IndexMap<String, usize> {
        self.config
            .levels()
            .iter()
            .map(|level| {
                (
                    level.clone(),
                    self.level_vocab.get(level).map(|s| s.len()).unwrap_or(0),
                )
            })
            .collect()
    }

    /// Analyze every book and store the results.
    pub fn analyze_corpus(&mut self, books_vocab: &HashMap<String, HashSet<String>>) {
        for (book_id, vocab) in books_vocab {
            let analysis = self.analyze(book_id, vocab);
            self.analyses.insert(book_id.clone(), analysis);
        }
        tracing::info!(books = self.analyses.len(), "Corpus analysis complete");
    }

    pub fn analyses(&self) -> &HashMap<String, BookAnalysis> {
        &self.analyses
    }

    pub fn get(&self, book_id: &str) -> Option<&BookAnalysis> {
        self.analyses.get(book_id)
    }

    /// Analyze one book's vocabulary. Never fails: a book with no words
    /// yields an all-zero analysis that the selector will simply skip.
    pub fn analyze(&self, book_id: &str, vocab: &HashSet<String>) -> BookAnalysis {
        let total = vocab.len();
        if total == 0 {
            return self.empty_analysis(book_id);
        }
        let total_f = total as f64;

        let mut level_distributions = IndexMap::new();
        let mut cumulative_counts = Vec::with_capacity(self.config.level_count());
        let mut running_total = 0usize;
        let mut difficulty_sum = 0.0;
        let mut weighted_sum = 0.0;

        for (index, level) in self.config.levels().iter().enumerate() {
            let words: HashSet<String> = match self.level_vocab.get(level) {
                Some(level_set) => vocab.intersection(level_set).cloned().collect(),
                None => HashSet::new(),
            };
            let count = words.len();
            let weighted_value = count as f64 * self.config.weight_at(index);

            difficulty_sum += count as f64 * self.config.multiplier_at(index);
            weighted_sum += weighted_value;
            running_total += count;
            cumulative_counts.push(running_total);

            level_distributions.insert(
                level.clone(),
                LevelStats {
                    words,
                    count,
                    ratio: count as f64 / total_f,
                    weighted_value,
                },
            );
        }

        let unknown_words: HashSet<String> =
            vocab.difference(&self.known_words).cloned().collect();
        let unknown_count = unknown_words.len();
        let unknown_ratio = unknown_count as f64 / total_f;
        difficulty_sum += unknown_count as f64 * self.config.sentinel_multiplier();

        level_distributions.insert(
            self.config.sentinel().to_string(),
            LevelStats {
                words: unknown_words.clone(),
                count: unknown_count,
                ratio: unknown_ratio,
                weighted_value: 0.0,
            },
        );

        let suitability_scores: IndexMap<String, f64> = self
            .config
            .levels()
            .iter()
            .zip(&cumulative_counts)
            .map(|(level, cumulative)| (level.clone(), *cumulative as f64 / total_f))
            .collect();

        let learning_words_count = total - unknown_count;

        BookAnalysis {
            book_id: book_id.to_string(),
            total_words: total,
            level_distributions,
            unknown_words,
            unknown_count,
            unknown_ratio,
            difficulty_score: difficulty_sum / total_f,
            learning_value: weighted_sum / total_f,
            suitability_scores,
            learning_words_ratio: learning_words_count as f64 / total_f,
        }
    }

    fn empty_analysis(&self, book_id: &str) -> BookAnalysis {
        let mut level_distributions = IndexMap::new();
        for level in self.config.levels() {
            level_distributions.insert(level.clone(), LevelStats::empty());
        }
        level_distributions.insert(self.config.sentinel().to_string(), LevelStats::empty());

        let suitability_scores = self
            .config
            .levels()
            .iter()
            .map(|level| (level.clone(), 0.0))
            .collect();

        BookAnalysis {
            book_id: book_id.to_string(),
            total_words: 0,
            level_distributions,
            unknown_words: HashSet::new(),
            unknown_count: 0,
            unknown_ratio: 0.0,
            difficulty_score: 0.0,
            learning_value: 0.0,
            suitability_scores,
            learning_words_ratio: 0.0,
        }
    }
}
