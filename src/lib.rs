pub mod analysis;
pub mod builder;
mod cache;
pub mod config;
pub mod error;
pub mod logging;
pub mod path;

pub use analysis::{BookAnalysis, BookAnalyzer, DifficultyCategory, LevelStats};
pub use builder::ReadingPathBuilder;
pub use config::{LevelConfig, Progression};
pub use error::PathError;
pub use path::{
    BookEvaluation, CoverageStat, LevelSelection, LevelShare, PathGenerator, PathParameters,
    PathSummary, ReadingPath, SelectionCriteria, SelectionStats, Strategy,
};
