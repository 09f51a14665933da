//! Solution representation for tiling problems

use super::validator::ValidationResult;
use crate::sat::SolverStatistics;
use crate::tiling::TilingGrid;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A decoded tiling and what we know about how it was found
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TilingSolution {
    pub grid: TilingGrid,
    pub validation: ValidationResult,
    /// Name of the gateway that produced the model
    pub backend: String,
    /// Time taken by the solver
    #[serde(skip)]
    pub solve_time: Duration,
    #[serde(skip)]
    pub statistics: SolverStatistics,
}

/// Outcome of one solve attempt
#[derive(Debug, Clone)]
pub enum TilingOutcome {
    Solved(TilingSolution),
    Unsatisfiable { solve_time: Duration, statistics: SolverStatistics },
}

impl TilingOutcome {
    pub fn is_satisfiable(&self) -> bool {
        matches!(self, TilingOutcome::Solved(_))
    }

    pub fn solution(&self) -> Option<&TilingSolution> {
        match self {
            TilingOutcome::Solved(solution) => Some(solution),
            TilingOutcome::Unsatisfiable { .. } => None,
        }
    }

    pub fn statistics(&self) -> &SolverStatistics {
        match self {
            TilingOutcome::Solved(solution) => &solution.statistics,
            TilingOutcome::Unsatisfiable { statistics, .. } => statistics,
        }
    }
}

/// Compact, serializable summary of a solution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolutionSummary {
    pub grid_size: usize,
    pub filled_cells: usize,
    pub is_valid: bool,
    pub solve_time_ms: u64,
}

impl TilingSolution {
    pub fn is_valid(&self) -> bool {
        self.validation.is_valid
    }

    pub fn summary(&self) -> SolutionSummary {
        SolutionSummary {
            grid_size: self.grid.size,
            filled_cells: self.grid.filled_count(),
            is_valid: self.validation.is_valid,
            solve_time_ms: self.solve_time.as_millis() as u64,
        }
    }

    /// Convert to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Create from JSON string
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
