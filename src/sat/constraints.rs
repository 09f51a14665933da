//! Constraint generation for the edge-matching SAT encoding

use super::VariableBijection;
use crate::tiling::{Instance, Tile};
use anyhow::Result;
use itertools::Itertools;

/// Represents a SAT clause (disjunction of literals)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clause {
    pub literals: Vec<i32>, // Positive for variable, negative for negation
}

impl Clause {
    /// Create a new clause from literals
    pub fn new(literals: Vec<i32>) -> Self {
        Self { literals }
    }

    /// Create a binary clause (two literals)
    pub fn binary(lit1: i32, lit2: i32) -> Self {
        Self { literals: vec![lit1, lit2] }
    }

    /// Check if clause is empty (unsatisfiable)
    pub fn is_empty(&self) -> bool {
        self.literals.is_empty()
    }

    /// Whether some literal of this clause is true under `is_true`
    pub fn is_satisfied_by(&self, is_true: impl Fn(i32) -> bool) -> bool {
        self.literals
            .iter()
            .any(|&lit| if lit > 0 { is_true(lit) } else { !is_true(-lit) })
    }
}

/// Which neighbour an adjacency clause constrains
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Right,
    Bottom,
}

impl Direction {
    /// Neighbouring cell in this direction, if it lies on the grid
    pub fn neighbor(self, row: usize, col: usize, size: usize) -> Option<(usize, usize)> {
        match self {
            Direction::Right if col + 1 < size => Some((row, col + 1)),
            Direction::Bottom if row + 1 < size => Some((row + 1, col)),
            _ => None,
        }
    }

    /// Whether `next` may be placed in this direction from `here`
    pub fn compatible(self, here: &Tile, next: &Tile) -> bool {
        match self {
            Direction::Right => here.matches_right(next),
            Direction::Bottom => here.matches_bottom(next),
        }
    }
}

/// Generates the placement and adjacency clauses of a tiling instance
pub struct ConstraintGenerator<'a> {
    instance: &'a Instance,
    bijection: &'a VariableBijection,
}

impl<'a> ConstraintGenerator<'a> {
    pub fn new(instance: &'a Instance, bijection: &'a VariableBijection) -> Self {
        Self { instance, bijection }
    }

    fn size(&self) -> usize {
        self.bijection.grid_size()
    }

    /// Some tile occupies the cell; empty when there are no tiles
    pub fn at_least_one(&self, row: usize, col: usize) -> Result<Clause> {
        Ok(Clause::new(self.bijection.cell_variables(row, col)?))
    }

    /// No two tiles share the cell
    pub fn at_most_one(&self, row: usize, col: usize) -> Result<Vec<Clause>> {
        Ok(self
            .bijection
            .cell_variables(row, col)?
            .into_iter()
            .tuple_combinations()
            .map(|(v1, v2)| Clause::binary(-v1, -v2))
            .collect())
    }

    /// Forbid every tile at the neighbour in `direction` whose touching edge
    /// disagrees with tile `tile` at (`row`, `col`)
    pub fn adjacency(
        &self,
        row: usize,
        col: usize,
        tile: usize,
        direction: Direction,
    ) -> Result<Vec<Clause>> {
        let Some((next_row, next_col)) = direction.neighbor(row, col, self.size()) else {
            return Ok(Vec::new());
        };

        let Some(here) = self.instance.tile(tile) else {
            anyhow::bail!("Tile {} not in catalogue of {} tiles", tile, self.instance.num_tiles());
        };
        let here_var = self.bijection.cell_variable(row, col, tile)?;

        let mut clauses = Vec::new();
        for (next_tile, next) in self.instance.tiles.iter().enumerate() {
            if !direction.compatible(here, next) {
                let next_var = self.bijection.cell_variable(next_row, next_col, next_tile)?;
                clauses.push(Clause::binary(-here_var, -next_var));
            }
        }

        Ok(clauses)
    }
}
