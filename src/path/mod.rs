pub mod generator;
pub mod params;
pub mod result;
pub mod scoring;

pub use generator::PathGenerator;
pub use params::{PathParameters, SelectionCriteria, Strategy};
pub use result::{
    BookEvaluation, CoverageStat, LevelSelection, LevelShare, PathSummary, ReadingPath,
    SelectionStats,
};
