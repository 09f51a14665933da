//! Tiling problem orchestration and solution handling

pub mod problem;
pub mod solution;
pub mod validator;

pub use problem::TilingProblem;
pub use solution::{SolutionSummary, TilingOutcome, TilingSolution};
pub use validator::{EdgeViolation, TilingValidator, ValidationResult};
