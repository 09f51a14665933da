//! Bijection between tile placements and SAT variables

use anyhow::Result;
use std::collections::HashMap;

/// "Tile `tile` sits at cell (`row`, `col`)"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Placement {
    pub row: usize,
    pub col: usize,
    pub tile: usize,
}

impl Placement {
    pub fn new(row: usize, col: usize, tile: usize) -> Self {
        Self { row, col, tile }
    }
}

/// Dense, 1-based numbering of every placement on a k×k grid.
///
/// IDs are handed out in row-major order, then by tile index, with no gaps.
/// The table is filled once at construction and is read-only afterwards.
#[derive(Debug, Clone)]
pub struct VariableBijection {
    /// Map from placement to SAT variable ID (positive integer)
    variable_map: HashMap<Placement, i32>,
    /// Placement for variable `id` lives at `id - 1`
    placements: Vec<Placement>,
    grid_size: usize,
    num_tiles: usize,
}

impl VariableBijection {
    /// Enumerate every `(row, col, tile)` triple of a `grid_size`×`grid_size` grid.
    ///
    /// Fails when the placements would not fit in positive `i32` IDs.
    pub fn new(grid_size: usize, num_tiles: usize) -> Result<Self> {
        let Some(count) = Self::placement_count(grid_size, num_tiles) else {
            anyhow::bail!(
                "{}x{} grid with {} tiles needs more than {} variables",
                grid_size, grid_size, num_tiles, i32::MAX
            );
        };

        let mut bijection = Self {
            variable_map: HashMap::with_capacity(count),
            placements: Vec::with_capacity(count),
            grid_size,
            num_tiles,
        };

        let mut next_id: i32 = 1;
        for row in 0..grid_size {
            for col in 0..grid_size {
                for tile in 0..num_tiles {
                    let placement = Placement::new(row, col, tile);
                    bijection.placements.push(placement);
                    bijection.variable_map.insert(placement, next_id);
                    next_id = next_id.saturating_add(1);
                }
            }
        }

        Ok(bijection)
    }

    /// `grid_size² · num_tiles`, if every placement can get an `i32` ID
    pub fn placement_count(grid_size: usize, num_tiles: usize) -> Option<usize> {
        let count = grid_size.checked_mul(grid_size)?.checked_mul(num_tiles)?;
        i32::try_from(count).ok()?;
        Some(count)
    }

    /// Variable ID of a placement
    pub fn variable(&self, placement: Placement) -> Result<i32> {
        match self.variable_map.get(&placement) {
            Some(&id) => Ok(id),
            None => anyhow::bail!(
                "Placement ({}, {}, {}) out of bounds for {}x{} grid with {} tiles",
                placement.row, placement.col, placement.tile,
                self.grid_size, self.grid_size, self.num_tiles
            ),
        }
    }

    /// Variable ID for tile `tile` at (`row`, `col`)
    pub fn cell_variable(&self, row: usize, col: usize, tile: usize) -> Result<i32> {
        self.variable(Placement::new(row, col, tile))
    }

    /// All variables of one cell, in tile-index order
    pub fn cell_variables(&self, row: usize, col: usize) -> Result<Vec<i32>> {
        (0..self.num_tiles)
            .map(|tile| self.cell_variable(row, col, tile))
            .collect()
    }

    /// Invert a variable ID; `None` for IDs this bijection never issued
    pub fn placement(&self, variable: i32) -> Option<Placement> {
        let index = usize::try_from(variable).ok()?.checked_sub(1)?;
        self.placements.get(index).copied()
    }

    pub fn variable_count(&self) -> usize {
        self.placements.len()
    }

    pub fn grid_size(&self) -> usize {
        self.grid_size
    }

    pub fn num_tiles(&self) -> usize {
        self.num_tiles
    }

    /// Iterate `(id, placement)` in ID order
    pub fn iter(&self) -> impl Iterator<Item = (i32, Placement)> + '_ {
        (1..).zip(self.placements.iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_dense_ordering() {
        let bijection = VariableBijection::new(2, 3).unwrap();

        assert_eq!(bijection.cell_variable(0, 0, 0).unwrap(), 1);
        assert_eq!(bijection.cell_variable(0, 0, 2).unwrap(), 3);
        assert_eq!(bijection.cell_variable(0, 1, 0).unwrap(), 4);
        assert_eq!(bijection.cell_variable(1, 0, 0).unwrap(), 7);
        assert_eq!(bijection.cell_variable(1, 1, 2).unwrap(), 12);
        assert_eq!(bijection.variable_count(), 12);
    }

    #[test]
    fn test_totality_and_injectivity() {
        for k in 1..=4 {
            for n in 0..=4 {
                let bijection = VariableBijection::new(k, n).unwrap();
                let mut seen = HashSet::new();

                for row in 0..k {
                    for col in 0..k {
                        for tile in 0..n {
                            let id = bijection.cell_variable(row, col, tile).unwrap();
                            assert!(id >= 1 && id as usize <= k * k * n);
                            assert!(seen.insert(id));
                            assert_eq!(bijection.placement(id), Some(Placement::new(row, col, tile)));
                        }
                    }
                }

                assert_eq!(seen.len(), k * k * n);
                assert_eq!(bijection.variable_count(), k * k * n);
            }
        }
    }

    #[test]
    fn test_out_of_range() {
        let bijection = VariableBijection::new(2, 2).unwrap();

        assert!(bijection.cell_variable(2, 0, 0).is_err());
        assert!(bijection.cell_variable(0, 2, 0).is_err());
        assert!(bijection.cell_variable(0, 0, 2).is_err());

        assert_eq!(bijection.placement(0), None);
        assert_eq!(bijection.placement(-3), None);
        assert_eq!(bijection.placement(9), None);
    }

    #[test]
    fn test_no_tiles() {
        let bijection = VariableBijection::new(3, 0).unwrap();
        assert_eq!(bijection.variable_count(), 0);
        assert!(bijection.cell_variables(1, 1).unwrap().is_empty());
        assert_eq!(bijection.placement(1), None);
    }

    #[test]
    fn test_id_space_overflow_is_rejected() {
        // 50_000² cells already exceed i32::MAX
        assert!(VariableBijection::new(50_000, 1).is_err());
        assert!(VariableBijection::new(usize::MAX, 2).is_err());
        assert_eq!(VariableBijection::placement_count(46_340, 1), Some(46_340 * 46_340));
        assert_eq!(VariableBijection::placement_count(50_000, 0), Some(0));
    }

    #[test]
    fn test_iter_matches_lookup() {
        let bijection = VariableBijection::new(2, 2).unwrap();
        for (id, placement) in bijection.iter() {
            assert_eq!(bijection.variable(placement).unwrap(), id);
        }
        assert_eq!(bijection.iter().count(), 8);
    }
}
