use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::config::LevelConfig;
use crate::error::PathError;

const DEFAULT_MAX_UNKNOWN_RATIO: f64 = 0.15;
const DEFAULT_MIN_RELEVANT_RATIO: f64 = 0.4;
const DEFAULT_MIN_TARGET_LEVEL_WORDS: usize = 30;

/// Tunable knobs for one path generation run. Validated against the level
/// configuration before any selection starts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathParameters {
    pub max_books_per_level: HashMap<String, usize>,
    pub target_coverage_per_level: HashMap<String, f64>,
    pub max_unknown_ratio: f64,
    pub min_relevant_ratio: f64,
    pub min_target_level_words: usize,
}

/// Per-level slice of the parameters, resolved once validation passed.
#[derive(Debug, Clone, Copy)]
pub(crate) struct LevelBudget {
    pub max_books: usize,
    pub target_coverage: f64,
}

impl PathParameters {
    pub fn new(
        max_books_per_level: HashMap<String, usize>,
        target_coverage_per_level: HashMap<String, f64>,
    ) -> Self {
        Self {
            max_books_per_level,
            target_coverage_per_level,
            max_unknown_ratio: DEFAULT_MAX_UNKNOWN_RATIO,
            min_relevant_ratio: DEFAULT_MIN_RELEVANT_RATIO,
            min_target_level_words: DEFAULT_MIN_TARGET_LEVEL_WORDS,
        }
    }

    /// More books, stricter filtering, high coverage targets.
    pub fn conservative(levels: &[String]) -> Self {
        let max_books = levels
            .iter()
            .enumerate()
            .map(|(i, level)| {
                let books = if i < 2 {
                    4
                } else if i < 4 {
                    3
                } else {
                    2
                };
                (level.clone(), books)
            })
            .collect();
        let coverage = levels
            .iter()
            .enumerate()
            .map(|(i, level)| (level.clone(), if i < 3 { 0.9 } else { 0.8 }))
            .collect();
        Self {
            max_books_per_level: max_books,
            target_coverage_per_level: coverage,
            max_unknown_ratio: 0.10,
            min_relevant_ratio: 0.60,
            min_target_level_words: 50,
        }
    }

    /// Balanced defaults, front-loaded toward the middle of the sequence.
    pub fn standard(levels: &[String]) -> Self {
        let max_books = levels
            .iter()
            .enumerate()
            .map(|(i, level)| {
                let books = if i < 2 {
                    3
                } else if i == 2 {
                    4
                } else if i < 4 {
                    3
                } else {
                    2
                };
                (level.clone(), books)
            })
            .collect();
        let coverage = levels
            .iter()
            .enumerate()
            .map(|(i, level)| (level.clone(), if i == 0 { 0.85 } else { 0.9 }))
            .collect();
        Self {
            max_books_per_level: max_books,
            target_coverage_per_level: coverage,
            max_unknown_ratio: DEFAULT_MAX_UNKNOWN_RATIO,
            min_relevant_ratio: DEFAULT_MIN_RELEVANT_RATIO,
            min_target_level_words: DEFAULT_MIN_TARGET_LEVEL_WORDS,
        }
    }

    /// Fewer books, permissive filtering, lower coverage targets.
    pub fn fast(levels: &[String]) -> Self {
        let max_books = levels
            .iter()
            .enumerate()
            .map(|(i, level)| (level.clone(), if i < 1 { 2 } else { 3 }))
            .collect();
        let coverage = levels
            .iter()
            .enumerate()
            .map(|(i, level)| {
                let target = if i < 2 {
                    0.75
                } else if i < 3 {
                    0.8
                } else {
                    0.85
                };
                (level.clone(), target)
            })
            .collect();
        Self {
            max_books_per_level: max_books,
            target_coverage_per_level: coverage,
            max_unknown_ratio: 0.25,
            min_relevant_ratio: 0.30,
            min_target_level_words: 10,
        }
    }

    pub fn validate(&self, config: &LevelConfig) -> Result<(), PathError> {
        self.budgets(config).map(|_| ())
    }

    /// Validate and resolve one budget per configured level, in order.
    pub(crate) fn budgets(&self, config: &LevelConfig) -> Result<Vec<LevelBudget>, PathError> {
        if !self.max_unknown_ratio.is_finite()
            || !(0.0..=1.0).contains(&self.max_unknown_ratio)
        {
            return Err(PathError::InvalidParameters(format!(
                "max_unknown_ratio must be in [0, 1], got {}",
                self.max_unknown_ratio
            )));
        }
        if !self.min_relevant_ratio.is_finite()
            || !(0.0..=1.0).contains(&self.min_relevant_ratio)
        {
            return Err(PathError::InvalidParameters(format!(
                "min_relevant_ratio must be in [0, 1], got {}",
                self.min_relevant_ratio
            )));
        }
        if self.max_unknown_ratio + self.min_relevant_ratio > 1.0 {
            return Err(PathError::InvalidParameters(
                "max_unknown_ratio + min_relevant_ratio cannot exceed 1.0".to_string(),
            ));
        }
        if self.min_target_level_words == 0 {
            return Err(PathError::InvalidParameters(
                "min_target_level_words must be at least 1".to_string(),
            ));
        }

        let mut budgets = Vec::with_capacity(config.level_count());
        for level in config.levels() {
            let max_books = match self.max_books_per_level.get(level) {
                Some(count) if *count >= 1 => *count,
                Some(count) => {
                    return Err(PathError::InvalidParameters(format!(
                        "max books for level {} must be positive, got {}",
                        level, count
                    )))
                }
                None => {
                    return Err(PathError::InvalidParameters(format!(
                        "missing max_books_per_level entry for level {}",
                        level
                    )))
                }
            };
            let target_coverage = match self.target_coverage_per_level.get(level) {
                Some(ratio) if ratio.is_finite() && (0.0..=1.0).contains(ratio) => *ratio,
                Some(ratio) => {
                    return Err(PathError::InvalidParameters(format!(
                        "target coverage for level {} must be in [0, 1], got {}",
                        level, ratio
                    )))
                }
                None => {
                    return Err(PathError::InvalidParameters(format!(
                        "missing target_coverage_per_level entry for level {}",
                        level
                    )))
                }
            };
            budgets.push(LevelBudget {
                max_books,
                target_coverage,
            });
        }
        Ok(budgets)
    }
}

/// Per-level gate a book must pass to enter the candidate pool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionCriteria {
    pub max_unknown_ratio: f64,
    pub min_suitability_score: f64,
    pub min_target_words: usize,
    /// Descriptive attribute carried through to results; the greedy scorer
    /// does not branch on it.
    pub prefer_high_coverage: bool,
}

impl SelectionCriteria {
    pub(crate) fn from_parameters(params: &PathParameters) -> Self {
        Self {
            max_unknown_ratio: params.max_unknown_ratio,
            min_suitability_score: params.min_relevant_ratio,
            min_target_words: params.min_target_level_words,
            prefer_high_coverage: true,
        }
    }

    pub fn conservative() -> Self {
        Self {
            max_unknown_ratio: 0.1,
            min_suitability_score: 0.7,
            min_target_words: 50,
            prefer_high_coverage: true,
        }
    }

    pub fn standard() -> Self {
        Self {
            max_unknown_ratio: 0.15,
            min_suitability_score: 0.5,
            min_target_words: 30,
            prefer_high_coverage: true,
        }
    }

    pub fn aggressive() -> Self {
        Self {
            max_unknown_ratio: 0.25,
            min_suitability_score: 0.3,
            min_target_words: 20,
            prefer_high_coverage: false,
        }
    }
}

/// Named parameter presets for alternative paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Strategy {
    Conservative,
    Standard,
    Fast,
}

impl Strategy {
    /// Case-insensitive name lookup. "balanced" and "aggressive" are
    /// accepted as synonyms for standard and fast.
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "conservative" => Some(Strategy::Conservative),
            "standard" | "balanced" => Some(Strategy::Standard),
            "fast" | "aggressive" => Some(Strategy::Fast),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Strategy::Conservative => "conservative",
            Strategy::Standard => "standard",
            Strategy::Fast => "fast",
        }
    }

    pub fn parameters(&self, levels: &[String]) -> PathParameters {
        match self {
            Strategy::Conservative => PathParameters::conservative(levels),
            Strategy::Standard => PathParameters::standard(levels),
            Strategy::Fast => PathParameters::fast(levels),
        }
    }

    /// Selection gate matching this strategy's filtering profile.
    pub fn criteria(&self) -> SelectionCriteria {
        match self {
            Strategy::Conservative => SelectionCriteria::conservative(),
            Strategy::Standard => SelectionCriteria::standard(),
            Strategy::Fast => SelectionCriteria::aggressive(),
        }
    }
}
