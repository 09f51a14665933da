//! Decoding solver models back into tilings

use super::solver::Assignment;
use super::VariableBijection;
use crate::tiling::TilingGrid;
use tracing::{debug, trace};

/// Rebuild the k×k tiling described by `assignment`.
///
/// Foreign variable IDs are ignored. When two true variables name the same
/// cell the later one wins. Never fails; an empty assignment yields an
/// all-unfilled grid.
pub fn decode(bijection: &VariableBijection, assignment: &Assignment) -> TilingGrid {
    let mut grid = TilingGrid::new(bijection.grid_size());

    for &variable in assignment.true_variables() {
        let Some(placement) = bijection.placement(variable) else {
            trace!("Ignoring variable {} outside the tiling encoding", variable);
            continue;
        };

        // The bijection only issues in-bounds placements
        if let Ok(Some(previous)) = grid.set(placement.row, placement.col, placement.tile) {
            debug!(
                "Cell ({}, {}) assigned twice: tile {} replaced by tile {}",
                placement.row, placement.col, previous, placement.tile
            );
        }
    }

    grid
}

/// Variables that are true for a fully-specified tiling, the inverse of [`decode`]
pub fn encode_grid(bijection: &VariableBijection, grid: &TilingGrid) -> Assignment {
    let mut true_variables = Vec::with_capacity(grid.filled_count());

    for row in 0..grid.size {
        for col in 0..grid.size {
            if let Some(tile) = grid.get(row, col) {
                if let Ok(variable) = bijection.cell_variable(row, col, tile) {
                    true_variables.push(variable);
                }
            }
        }
    }

    Assignment::new(true_variables)
}
