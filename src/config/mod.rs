pub mod levels;

pub use levels::{LevelConfig, Progression};
