use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::PathError;

/// How difficulty multipliers grow across the level sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Progression {
    /// Multiplier k+1 for the k-th level (0-based).
    Linear,
    /// Multiplier 2^k for the k-th level.
    Exponential,
    /// Explicit per-level multipliers, strictly increasing in level order.
    Custom(HashMap<String, f64>),
}

/// Immutable description of the difficulty space: the ordered level names,
/// per-level learning weights, the progression curve, and the sentinel name
/// used for words that fall outside the syllabus.
///
/// Validated once at construction; all later queries are infallible for
/// configured names and return `UnknownLevel` otherwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelConfig {
    levels: Vec<String>,
    weights: HashMap<String, f64>,
    progression: Progression,
    sentinel: String,
}

impl LevelConfig {
    pub fn new(
        levels: Vec<String>,
        weights: HashMap<String, f64>,
        progression: Progression,
        sentinel: impl Into<String>,
    ) -> Result<Self, PathError> {
        let sentinel = sentinel.into();

        if levels.is_empty() {
            return Err(PathError::InvalidConfig(
                "at least one level must be configured".to_string(),
            ));
        }

        let mut seen = HashMap::new();
        for level in &levels {
            if level.trim().is_empty() {
                return Err(PathError::InvalidConfig(
                    "level names must be non-empty".to_string(),
                ));
            }
            if seen.insert(level.as_str(), ()).is_some() {
                return Err(PathError::InvalidConfig(format!("duplicate level: {}", level)));
            }
        }

        for level in &levels {
            match weights.get(level) {
                None => {
                    return Err(PathError::InvalidConfig(format!(
                        "missing weight for level {}",
                        level
                    )))
                }
                Some(w) if !w.is_finite() || *w < 0.0 => {
                    return Err(PathError::InvalidConfig(format!(
                        "weight for level {} must be non-negative, got {}",
                        level, w
                    )))
                }
                Some(_) => {}
            }
        }

        if sentinel.trim().is_empty() {
            return Err(PathError::InvalidConfig(
                "sentinel name must be non-empty".to_string(),
            ));
        }
        if levels.iter().any(|l| *l == sentinel) {
            return Err(PathError::InvalidConfig(format!(
                "sentinel name {} collides with a configured level",
                sentinel
            )));
        }

        if let Progression::Custom(rules) = &progression {
            let mut previous: Option<f64> = None;
            for level in &levels {
                let multiplier = rules.get(level).ok_or_else(|| {
                    PathError::InvalidConfig(format!(
                        "custom progression is missing a multiplier for level {}",
                        level
                    ))
                })?;
                if !multiplier.is_finite() || *multiplier <= 0.0 {
                    return Err(PathError::InvalidConfig(format!(
                        "custom multiplier for level {} must be positive, got {}",
                        level, multiplier
                    )));
                }
                if let Some(prev) = previous {
                    if *multiplier <= prev {
                        return Err(PathError::InvalidConfig(format!(
                            "custom multipliers must be strictly increasing, level {} breaks the order",
                            level
                        )));
                    }
                }
                previous = Some(*multiplier);
            }
        }

        Ok(Self {
            levels,
            weights,
            progression,
            sentinel,
        })
    }

    /// CEFR preset: A1..C1, linear progression, "BEYOND" sentinel.
    pub fn cefr() -> Self {
        let levels: Vec<String> = ["A1", "A2", "B1", "B2", "C1"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let weights = [
            ("A1", 1.5),
            ("A2", 1.3),
            ("B1", 1.1),
            ("B2", 1.0),
            ("C1", 0.9),
        ]
        .iter()
        .map(|(l, w)| (l.to_string(), *w))
        .collect();
        Self::new(levels, weights, Progression::Linear, "BEYOND")
            .expect("CEFR preset is statically valid")
    }

    /// Grade preset: Grade1..GradeN, exponential progression, "ADVANCED"
    /// sentinel. Weights start at 2.0 and decrease by 0.2 per grade with a
    /// floor of 0.8.
    pub fn grade(max_grade: usize) -> Result<Self, PathError> {
        if max_grade == 0 {
            return Err(PathError::InvalidConfig(
                "grade configuration needs at least one grade".to_string(),
            ));
        }
        let levels: Vec<String> = (1..=max_grade).map(|i| format!("Grade{}", i)).collect();
        let weights = levels
            .iter()
            .enumerate()
            .map(|(i, level)| (level.clone(), (2.0 - 0.2 * i as f64).max(0.8)))
            .collect();
        Self::new(levels, weights, Progression::Exponential, "ADVANCED")
    }

    /// Frequency preset: HighFreq..Rare, linear progression, "UNKNOWN"
    /// sentinel.
    pub fn frequency() -> Self {
        let levels: Vec<String> = ["HighFreq", "MidFreq", "LowFreq", "Rare"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let weights = [
            ("HighFreq", 1.8),
            ("MidFreq", 1.3),
            ("LowFreq", 1.0),
            ("Rare", 0.7),
        ]
        .iter()
        .map(|(l, w)| (l.to_string(), *w))
        .collect();
        Self::new(levels, weights, Progression::Linear, "UNKNOWN")
            .expect("frequency preset is statically valid")
    }

    pub fn levels(&self) -> &[String] {
        &self.levels
    }

    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    pub fn sentinel(&self) -> &str {
        &self.sentinel
    }

    pub fn contains_level(&self, level: &str) -> bool {
        self.levels.iter().any(|l| l == level)
    }

    /// Position of the level in the configured easiest-to-hardest order.
    pub fn index_of(&self, level: &str) -> Result<usize, PathError> {
        self.levels
            .iter()
            .position(|l| l == level)
            .ok_or_else(|| PathError::UnknownLevel(level.to_string()))
    }

    pub fn weight(&self, level: &str) -> Result<f64, PathError> {
        if !self.contains_level(level) {
            return Err(PathError::UnknownLevel(level.to_string()));
        }
        Ok(self.weights.get(level).copied().unwrap_or(1.0))
    }

    /// Difficulty multiplier for a configured level or the sentinel. The
    /// sentinel is one step harder than the hardest configured level.
    pub fn difficulty_multiplier(&self, level: &str) -> Result<f64, PathError> {
        if level == self.sentinel {
            return Ok(self.max_multiplier() + 1.0);
        }
        let index = self.index_of(level)?;
        Ok(self.multiplier_at(index))
    }

    pub(crate) fn weight_at(&self, index: usize) -> f64 {
        self.weights.get(&self.levels[index]).copied().unwrap_or(1.0)
    }

    pub(crate) fn sentinel_multiplier(&self) -> f64 {
        self.max_multiplier() + 1.0
    }

    pub(crate) fn multiplier_at(&self, index: usize) -> f64 {
        match &self.progression {
            Progression::Linear => (index + 1) as f64,
            Progression::Exponential => 2f64.powi(index as i32),
            // Coverage of every level is validated at construction.
            Progression::Custom(rules) => rules.get(&self.levels[index]).copied().unwrap_or(1.0),
        }
    }

    fn max_multiplier(&self) -> f64 {
        (0..self.levels.len())
            .map(|i| self.multiplier_at(i))
            .fold(0.0, f64::max)
    }
}
