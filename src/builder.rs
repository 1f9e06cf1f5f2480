use indexmap::IndexMap;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::analysis::{BookAnalysis, BookAnalyzer};
use crate::cache::PathCache;
use crate::config::LevelConfig;
use crate::error::PathError;
use crate::path::params::{PathParameters, SelectionCriteria, Strategy};
use crate::path::result::{BookEvaluation, LevelShare, ReadingPath};
use crate::path::PathGenerator;

/// Unknown ratio above which evaluation suggests reading with a dictionary.
const DICTIONARY_WARNING_RATIO: f64 = 0.2;
/// Learning value above which evaluation suggests intensive reading.
const INTENSIVE_READING_VALUE: f64 = 1.0;

const CEFR_LEVELS: [&str; 5] = ["A1", "A2", "B1", "B2", "C1"];
const DEFAULT_STRATEGIES: [&str; 3] = ["conservative", "standard", "fast"];

/// Entry point over the whole pipeline: owns the level configuration, the
/// analyzer with every book pre-analyzed, and the generator. Construction
/// does the expensive analysis once; each later call only pays for
/// generation.
#[derive(Debug)]
pub struct ReadingPathBuilder {
    config: Arc<LevelConfig>,
    analyzer: BookAnalyzer,
    generator: PathGenerator,
    target_vocabulary: HashMap<String, HashSet<String>>,
    cache: PathCache,
}

impl ReadingPathBuilder {
    pub fn new(
        books_vocab: &HashMap<String, HashSet<String>>,
        word_level_map: &HashMap<String, String>,
        config: LevelConfig,
    ) -> Result<Self, PathError> {
        if books_vocab.is_empty() {
            return Err(PathError::EmptyCorpus);
        }

        let config = Arc::new(config);
        let mut analyzer = BookAnalyzer::new(Arc::clone(&config), word_level_map)?;
        analyzer.analyze_corpus(books_vocab);
        let target_vocabulary = analyzer.target_vocabulary();

        tracing::info!(
            books = books_vocab.len(),
            levels = config.level_count(),
            "Reading path builder ready"
        );

        Ok(Self {
            generator: PathGenerator::new(Arc::clone(&config)),
            config,
            analyzer,
            target_vocabulary,
            cache: PathCache::new(),
        })
    }

    pub fn config(&self) -> &LevelConfig {
        &self.config
    }

    /// Generate a path with the given parameters, or the default preset for
    /// this level sequence (standard for CEFR, conservative otherwise).
    pub fn create_reading_path(
        &self,
        params: Option<PathParameters>,
    ) -> Result<ReadingPath, PathError> {
        let params = params.unwrap_or_else(|| self.default_parameters());
        tracing::info!(levels = self.config.level_count(), "Generating reading path");
        self.generator.create_progressive_reading_path(
            self.analyzer.analyses(),
            &self.target_vocabulary,
            &params,
        )
    }

    fn default_parameters(&self) -> PathParameters {
        let is_cefr = self
            .config
            .levels()
            .iter()
            .map(String::as_str)
            .eq(CEFR_LEVELS);
        if is_cefr {
            Strategy::Standard.parameters(self.config.levels())
        } else {
            Strategy::Conservative.parameters(self.config.levels())
        }
    }

    /// One path per requested strategy, in request order. Synonyms map to
    /// their canonical strategy; unrecognized names are logged and skipped.
    pub fn get_alternative_paths(
        &self,
        strategies: Option<&[&str]>,
    ) -> Result<Vec<(String, ReadingPath)>, PathError> {
        let requested = strategies.unwrap_or(&DEFAULT_STRATEGIES);
        let mut paths = Vec::new();

        for name in requested {
            let strategy = match Strategy::parse(name) {
                Some(strategy) => strategy,
                None => {
                    tracing::warn!(strategy = %name, "Unknown path strategy ignored");
                    continue;
                }
            };

            let canonical = strategy.name();
            let path = match self.cache.get(canonical) {
                Some(path) => path,
                None => {
                    let path = self
                        .create_reading_path(Some(strategy.parameters(self.config.levels())))?;
                    self.cache.insert(canonical, path.clone());
                    path
                }
            };
            paths.push((canonical.to_string(), path));
        }

        Ok(paths)
    }

    /// Detailed fit report for one book at one level, checked against the
    /// standard selection criteria.
    pub fn evaluate_book_for_level(
        &self,
        book_id: &str,
        level: &str,
    ) -> Result<BookEvaluation, PathError> {
        self.evaluate_with_criteria(book_id, level, &SelectionCriteria::standard())
    }

    /// Same report, checked against the selection gate of the given
    /// strategy (conservative, standard, or aggressive).
    pub fn evaluate_book_for_strategy(
        &self,
        book_id: &str,
        level: &str,
        strategy: Strategy,
    ) -> Result<BookEvaluation, PathError> {
        self.evaluate_with_criteria(book_id, level, &strategy.criteria())
    }

    fn evaluate_with_criteria(
        &self,
        book_id: &str,
        level: &str,
        criteria: &SelectionCriteria,
    ) -> Result<BookEvaluation, PathError> {
        let analysis = self
            .analyzer
            .get(book_id)
            .ok_or_else(|| PathError::UnknownBook(book_id.to_string()))?;
        self.config.index_of(level)?;

        let suitability_score = analysis.suitability(level);
        let (target_level_words, target_level_ratio) = analysis
            .level_stats(level)
            .map(|stats| (stats.count, stats.ratio))
            .unwrap_or((0, 0.0));

        let meets_selection_criteria = analysis.unknown_ratio <= criteria.max_unknown_ratio
            && suitability_score >= criteria.min_suitability_score
            && target_level_words >= criteria.min_target_words;

        let level_breakdown: IndexMap<String, LevelShare> = analysis
            .level_distributions
            .iter()
            .map(|(name, stats)| {
                (
                    name.clone(),
                    LevelShare {
                        count: stats.count,
                        ratio: stats.ratio,
                    },
                )
            })
            .collect();

        Ok(BookEvaluation {
            book_id: book_id.to_string(),
            target_level: level.to_string(),
            suitability_score,
            target_level_words,
            target_level_ratio,
            unknown_ratio: analysis.unknown_ratio,
            difficulty_score: analysis.difficulty_score,
            learning_value: analysis.learning_value,
            difficulty_category: analysis.difficulty_category(),
            meets_selection_criteria,
            level_breakdown,
            recommendations: Self::recommendations(analysis),
        })
    }

    fn recommendations(analysis: &BookAnalysis) -> Vec<String> {
        let mut recommendations = Vec::new();

        // Earliest level wins ties, matching the configured order.
        let mut best: Option<(&str, f64)> = None;
        for (level, score) in &analysis.suitability_scores {
            match best {
                Some((_, best_score)) if *score <= best_score => {}
                _ => best = Some((level.as_str(), *score)),
            }
        }
        if let Some((level, score)) = best {
            recommendations.push(format!(
                "Best suited for {} learners ({:.1}% suitability)",
                level,
                score * 100.0
            ));
        }

        if analysis.unknown_ratio > DICTIONARY_WARNING_RATIO {
            recommendations
                .push("High out-of-syllabus word ratio; pair reading with a dictionary".to_string());
        }
        if analysis.learning_value > INTENSIVE_READING_VALUE {
            recommendations.push("High learning value; a good fit for intensive reading".to_string());
        }

        recommendations
    }

    pub fn get_book_statistics(&self, book_id: &str) -> Result<&BookAnalysis, PathError> {
        self.analyzer
            .get(book_id)
            .ok_or_else(|| PathError::UnknownBook(book_id.to_string()))
    }

    /// Vocabulary size per configured level.
    pub fn get_level_vocabulary_stats(&self) -> IndexMap<String, usize> {
        self.analyzer.vocabulary_stats()
    }
}
