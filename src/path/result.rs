use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::analysis::book::{sorted_words, DifficultyCategory};

/// Covered/total word counts for one level at some point in the path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoverageStat {
    pub covered: usize,
    pub total: usize,
    pub ratio: f64,
}

/// Target/covered word tallies for one level's selection round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionStats {
    pub target_words: usize,
    pub covered_words: usize,
    pub books_count: usize,
}

/// Books chosen for one target level, in selection order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelSelection {
    pub target_level: String,
    pub selected_books: Vec<String>,
    /// Fraction of the level's target vocabulary newly covered here; 0 when
    /// the target set is empty.
    pub coverage: f64,
    #[serde(serialize_with = "sorted_words")]
    pub new_words_covered: HashSet<String>,
    pub stats: SelectionStats,
}

impl LevelSelection {
    pub(crate) fn empty(target_level: &str) -> Self {
        Self {
            target_level: target_level.to_string(),
            selected_books: Vec::new(),
            coverage: 0.0,
            new_words_covered: HashSet::new(),
            stats: SelectionStats {
                target_words: 0,
                covered_words: 0,
                books_count: 0,
            },
        }
    }
}

/// Aggregate view of a finished path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathSummary {
    pub total_books: usize,
    pub books_per_level: IndexMap<String, usize>,
    pub final_coverage: IndexMap<String, CoverageStat>,
    /// Mean difficulty of the books picked per level, in level order;
    /// levels with no selection are omitted.
    pub difficulty_progression: Vec<(String, f64)>,
    pub recommended_order: Vec<String>,
}

/// Complete result of one path generation run. All level-keyed maps
/// iterate (and serialize) in configured level order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadingPath {
    pub levels: IndexMap<String, LevelSelection>,
    pub total_books: Vec<String>,
    pub cumulative_coverage: IndexMap<String, IndexMap<String, CoverageStat>>,
    pub summary: PathSummary,
}

impl ReadingPath {
    /// Stable JSON rendering: sorted word sequences, level-ordered maps.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Per-level share of a book's vocabulary, as reported by evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelShare {
    pub count: usize,
    pub ratio: f64,
}

/// How well one book fits one target level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookEvaluation {
    pub book_id: String,
    pub target_level: String,
    pub suitability_score: f64,
    pub target_level_words: usize,
    pub target_level_ratio: f64,
    pub unknown_ratio: f64,
    pub difficulty_score: f64,
    pub learning_value: f64,
    pub difficulty_category: DifficultyCategory,
    /// Whether the book passes the selection criteria the evaluation was
    /// checked against (the standard gate by default).
    pub meets_selection_criteria: bool,
    /// Count and ratio per level, sentinel included, in level order.
    pub level_breakdown: IndexMap<String, LevelShare>,
    pub recommendations: Vec<String>,
}
