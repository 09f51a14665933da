//! Edge-matching square tiling via SAT
//!
//! This library reduces the question "can a k×k grid be filled with these
//! edge-coloured tiles so that neighbours agree?" to CNF, hands it to a SAT
//! solver and decodes the answer back into a grid.

pub mod config;
pub mod problem;
pub mod sat;
pub mod tiling;
pub mod utils;

pub use config::Settings;
pub use problem::{TilingOutcome, TilingProblem, TilingSolution};

use anyhow::Result;
use sat::UnifiedSolver;
use std::path::Path;

/// Main entry point: load `input`, encode it for a `grid_size` grid and solve
/// with the configured backend
pub fn solve_tiling<P: AsRef<Path>>(
    settings: Settings,
    input: P,
    grid_size: usize,
) -> Result<TilingOutcome> {
    let mut solver = UnifiedSolver::new(&settings.solver);
    let problem = TilingProblem::from_file(settings, input, grid_size)?;
    problem.solve(&mut solver)
}
