//! Independent check that a decoded tiling satisfies the puzzle

use crate::sat::Direction;
use crate::tiling::{Instance, TilingGrid};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Checks tilings against an instance's edge colours
pub struct TilingValidator<'a> {
    instance: &'a Instance,
}

/// Result of tiling validation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub unfilled_cells: Vec<(usize, usize)>,
    pub unknown_tiles: Vec<(usize, usize)>,
    pub edge_violations: Vec<EdgeViolation>,
}

/// Two neighbouring tiles whose shared edge colours differ
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeViolation {
    pub cell: (usize, usize),
    pub neighbor: (usize, usize),
    pub description: String,
}

impl<'a> TilingValidator<'a> {
    pub fn new(instance: &'a Instance) -> Self {
        Self { instance }
    }

    /// Validate every cell and every shared edge of `grid`
    pub fn validate(&self, grid: &TilingGrid) -> ValidationResult {
        let mut result = ValidationResult::default();

        for row in 0..grid.size {
            for col in 0..grid.size {
                match grid.get(row, col) {
                    None => result.unfilled_cells.push((row, col)),
                    Some(tile) if tile >= self.instance.num_tiles() => {
                        result.unknown_tiles.push((row, col))
                    }
                    Some(tile) => {
                        for direction in [Direction::Right, Direction::Bottom] {
                            if let Some(violation) = self.check_edge(grid, row, col, tile, direction) {
                                result.edge_violations.push(violation);
                            }
                        }
                    }
                }
            }
        }

        result.is_valid = result.unfilled_cells.is_empty()
            && result.unknown_tiles.is_empty()
            && result.edge_violations.is_empty();
        result
    }

    fn check_edge(
        &self,
        grid: &TilingGrid,
        row: usize,
        col: usize,
        tile: usize,
        direction: Direction,
    ) -> Option<EdgeViolation> {
        let (next_row, next_col) = direction.neighbor(row, col, grid.size)?;
        let next_tile = grid.get(next_row, next_col)?;
        let here = self.instance.tile(tile)?;
        let next = self.instance.tile(next_tile)?;

        if direction.compatible(here, next) {
            return None;
        }

        let (ours, theirs) = match direction {
            Direction::Right => (here.right, next.left),
            Direction::Bottom => (here.bottom, next.top),
        };
        Some(EdgeViolation {
            cell: (row, col),
            neighbor: (next_row, next_col),
            description: format!(
                "{:?} edge of tile {} is {} but tile {} meets it with {}",
                direction,
                tile,
                self.instance.color_name(ours).unwrap_or("?"),
                next_tile,
                self.instance.color_name(theirs).unwrap_or("?"),
            ),
        })
    }
}

impl fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid {
            return writeln!(f, "Tiling is valid");
        }

        writeln!(f, "Tiling is invalid:")?;
        if !self.unfilled_cells.is_empty() {
            writeln!(f, "  Unfilled cells: {:?}", self.unfilled_cells)?;
        }
        if !self.unknown_tiles.is_empty() {
            writeln!(f, "  Unknown tiles at: {:?}", self.unknown_tiles)?;
        }
        for violation in &self.edge_violations {
            writeln!(
                f,
                "  {:?} -> {:?}: {}",
                violation.cell, violation.neighbor, violation.description
            )?;
        }
        Ok(())
    }
}
