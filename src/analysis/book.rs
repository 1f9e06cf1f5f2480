use indexmap::IndexMap;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::HashSet;
use std::fmt;

/// Difficulty score below which a book counts as Beginner.
const INTERMEDIATE_THRESHOLD: f64 = 2.0;
/// Difficulty score below which a book counts as Intermediate.
const ADVANCED_THRESHOLD: f64 = 4.0;
/// Minimum suitability for a level to be recommended.
const RECOMMENDED_SUITABILITY: f64 = 0.6;

/// Serialize a word set as a lexicographically sorted sequence so emitted
/// results are byte-stable across runs.
pub(crate) fn sorted_words<S>(words: &HashSet<String>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let mut ordered: Vec<&str> = words.iter().map(|w| w.as_str()).collect();
    ordered.sort_unstable();
    ordered.serialize(serializer)
}

/// Per-level slice of a book's vocabulary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelStats {
    #[serde(serialize_with = "sorted_words")]
    pub words: HashSet<String>,
    pub count: usize,
    /// Fraction of the book's vocabulary at this level.
    pub ratio: f64,
    /// count weighted by the level's learning weight; 0 for the sentinel.
    pub weighted_value: f64,
}

impl LevelStats {
    pub(crate) fn empty() -> Self {
        Self {
            words: HashSet::new(),
            count: 0,
            ratio: 0.0,
            weighted_value: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DifficultyCategory {
    Beginner,
    Intermediate,
    Advanced,
}

impl fmt::Display for DifficultyCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DifficultyCategory::Beginner => "Beginner",
            DifficultyCategory::Intermediate => "Intermediate",
            DifficultyCategory::Advanced => "Advanced",
        };
        f.write_str(name)
    }
}

/// Full vocabulary profile of one book: per-level distributions, unknown
/// words, and the aggregate scores the path generator selects on.
///
/// Level-keyed maps iterate in configured level order, with the sentinel
/// entry last in `level_distributions`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookAnalysis {
    pub book_id: String,
    pub total_words: usize,
    pub level_distributions: IndexMap<String, LevelStats>,
    #[serde(serialize_with = "sorted_words")]
    pub unknown_words: HashSet<String>,
    pub unknown_count: usize,
    pub unknown_ratio: f64,
    pub difficulty_score: f64,
    pub learning_value: f64,
    /// Cumulative suitability per level: fraction of the book at the level
    /// or easier. Non-decreasing along the level order.
    pub suitability_scores: IndexMap<String, f64>,
    pub learning_words_ratio: f64,
}

impl BookAnalysis {
    pub fn level_stats(&self, level: &str) -> Option<&LevelStats> {
        self.level_distributions.get(level)
    }

    pub fn suitability(&self, level: &str) -> f64 {
        self.suitability_scores.get(level).copied().unwrap_or(0.0)
    }

    /// Fixed-threshold category so books stay comparable across
    /// configurations regardless of progression type.
    pub fn difficulty_category(&self) -> DifficultyCategory {
        if self.difficulty_score < INTERMEDIATE_THRESHOLD {
            DifficultyCategory::Beginner
        } else if self.difficulty_score < ADVANCED_THRESHOLD {
            DifficultyCategory::Intermediate
        } else {
            DifficultyCategory::Advanced
        }
    }

    /// Levels where the book reads comfortably (suitability >= 0.6), in
    /// configured level order.
    pub fn recommended_levels(&self) -> Vec<String> {
        self.suitability_scores
            .iter()
            .filter(|(_, score)| **score >= RECOMMENDED_SUITABILITY)
            .map(|(level, _)| level.clone())
            .collect()
    }
}
