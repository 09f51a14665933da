//! CNF encoder for square edge-matching tilings

use super::constraints::{Clause, ConstraintGenerator, Direction};
use super::VariableBijection;
use crate::tiling::Instance;
use anyhow::Result;
use std::fmt;
use std::io::Write;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum EncodingError {
    #[error("grid size must be positive")]
    InvalidGridSize,

    #[error("{grid_size}x{grid_size} grid with {num_tiles} tiles exceeds the SAT variable range")]
    TooManyVariables { grid_size: usize, num_tiles: usize },

    #[error(transparent)]
    Constraint(#[from] anyhow::Error),
}

/// A CNF formula over `num_variables` variables
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CnfFormula {
    pub num_variables: usize,
    pub clauses: Vec<Clause>,
}

impl CnfFormula {
    pub fn new(num_variables: usize) -> Self {
        Self { num_variables, clauses: Vec::new() }
    }

    pub fn clause_count(&self) -> usize {
        self.clauses.len()
    }

    pub fn has_empty_clause(&self) -> bool {
        self.clauses.iter().any(Clause::is_empty)
    }

    /// Write the formula in DIMACS CNF format
    pub fn write_dimacs<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        writeln!(writer, "p cnf {} {}", self.num_variables, self.clauses.len())?;
        for clause in &self.clauses {
            for literal in &clause.literals {
                write!(writer, "{} ", literal)?;
            }
            writeln!(writer, "0")?;
        }
        Ok(())
    }

    /// Render the formula as a DIMACS string
    pub fn to_dimacs(&self) -> String {
        let mut buffer = Vec::new();
        // Writing into a Vec cannot fail
        let _ = self.write_dimacs(&mut buffer);
        String::from_utf8_lossy(&buffer).into_owned()
    }

    /// Check a set of true variables against every clause
    pub fn is_satisfied_by(&self, true_vars: &std::collections::HashSet<i32>) -> bool {
        self.clauses
            .iter()
            .all(|clause| clause.is_satisfied_by(|var| true_vars.contains(&var)))
    }
}

/// Clause counts per constraint family
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EncodingStatistics {
    pub grid_size: usize,
    pub num_tiles: usize,
    pub num_colors: usize,
    pub total_variables: usize,
    pub at_least_one_clauses: usize,
    pub at_most_one_clauses: usize,
    pub right_adjacency_clauses: usize,
    pub bottom_adjacency_clauses: usize,
}

impl EncodingStatistics {
    pub fn total_clauses(&self) -> usize {
        self.at_least_one_clauses
            + self.at_most_one_clauses
            + self.right_adjacency_clauses
            + self.bottom_adjacency_clauses
    }
}

/// Output of the encoder: the formula plus the bijection needed to decode it
#[derive(Debug, Clone)]
pub struct EncodedTiling {
    pub formula: CnfFormula,
    pub bijection: VariableBijection,
    pub statistics: EncodingStatistics,
}

/// Encode `instance` on a `grid_size`×`grid_size` grid
pub fn encode(instance: &Instance, grid_size: usize) -> Result<EncodedTiling, EncodingError> {
    if grid_size == 0 {
        return Err(EncodingError::InvalidGridSize);
    }

    let num_tiles = instance.num_tiles();
    if VariableBijection::placement_count(grid_size, num_tiles).is_none() {
        return Err(EncodingError::TooManyVariables { grid_size, num_tiles });
    }
    let bijection = VariableBijection::new(grid_size, num_tiles)?;
    let (formula, statistics) = generate(instance, &bijection)?;

    debug!(
        "Encoded {}x{} grid with {} tiles: {} variables, {} clauses",
        grid_size,
        grid_size,
        instance.num_tiles(),
        formula.num_variables,
        formula.clause_count()
    );

    Ok(EncodedTiling { formula, bijection, statistics })
}

fn generate(
    instance: &Instance,
    bijection: &VariableBijection,
) -> Result<(CnfFormula, EncodingStatistics)> {
    let size = bijection.grid_size();
    let generator = ConstraintGenerator::new(instance, bijection);
    let mut formula = CnfFormula::new(bijection.variable_count());
    let mut stats = EncodingStatistics {
        grid_size: size,
        num_tiles: instance.num_tiles(),
        num_colors: instance.num_colors(),
        total_variables: bijection.variable_count(),
        ..Default::default()
    };

    // Exactly one tile per cell
    for row in 0..size {
        for col in 0..size {
            formula.clauses.push(generator.at_least_one(row, col)?);
            stats.at_least_one_clauses += 1;

            let amo = generator.at_most_one(row, col)?;
            stats.at_most_one_clauses += amo.len();
            formula.clauses.extend(amo);
        }
    }

    // Shared edges must agree in colour
    for row in 0..size {
        for col in 0..size {
            for tile in 0..instance.num_tiles() {
                let right = generator.adjacency(row, col, tile, Direction::Right)?;
                stats.right_adjacency_clauses += right.len();
                formula.clauses.extend(right);

                let bottom = generator.adjacency(row, col, tile, Direction::Bottom)?;
                stats.bottom_adjacency_clauses += bottom.len();
                formula.clauses.extend(bottom);
            }
        }
    }

    Ok((formula, stats))
}

impl fmt::Display for EncodingStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "SAT Encoding Statistics:")?;
        writeln!(f, "  Grid: {}x{}", self.grid_size, self.grid_size)?;
        writeln!(f, "  Tiles: {}", self.num_tiles)?;
        writeln!(f, "  Colours: {}", self.num_colors)?;
        writeln!(f, "  Total variables: {}", self.total_variables)?;
        writeln!(f, "  Total clauses: {}", self.total_clauses())?;
        writeln!(f, "    at-least-one: {}", self.at_least_one_clauses)?;
        writeln!(f, "    at-most-one: {}", self.at_most_one_clauses)?;
        writeln!(f, "    right adjacency: {}", self.right_adjacency_clauses)?;
        writeln!(f, "    bottom adjacency: {}", self.bottom_adjacency_clauses)?;
        Ok(())
    }
}
