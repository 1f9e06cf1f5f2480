pub mod analyzer;
pub mod book;

pub use analyzer::BookAnalyzer;
pub use book::{BookAnalysis, DifficultyCategory, LevelStats};
