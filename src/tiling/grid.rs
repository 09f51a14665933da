//! Square grid of tile placements

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// A k×k tiling; each cell holds a tile index or nothing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TilingGrid {
    pub size: usize,
    pub cells: Vec<Option<usize>>,
}

impl TilingGrid {
    /// Create an all-unfilled grid
    pub fn new(size: usize) -> Self {
        Self {
            size,
            cells: vec![None; size * size],
        }
    }

    /// Create a fully filled grid from rows of tile indices
    pub fn from_rows(rows: Vec<Vec<usize>>) -> Result<Self> {
        let size = rows.len();
        for (i, row) in rows.iter().enumerate() {
            if row.len() != size {
                anyhow::bail!("Row {} has length {}, expected {} (grid must be square)", i, row.len(), size);
            }
        }

        Ok(Self {
            size,
            cells: rows.into_iter().flatten().map(Some).collect(),
        })
    }

    #[inline]
    pub fn index(&self, row: usize, col: usize) -> usize {
        row * self.size + col
    }

    /// Tile index at a cell, `None` when unfilled or out of bounds
    pub fn get(&self, row: usize, col: usize) -> Option<usize> {
        if row < self.size && col < self.size {
            self.cells[self.index(row, col)]
        } else {
            None
        }
    }

    /// Place a tile, returning the index it replaced
    pub fn set(&mut self, row: usize, col: usize, tile: usize) -> Result<Option<usize>> {
        if row >= self.size || col >= self.size {
            anyhow::bail!("Coordinates ({}, {}) out of bounds for {}x{} grid", row, col, self.size, self.size);
        }
        let idx = self.index(row, col);
        Ok(self.cells[idx].replace(tile))
    }

    pub fn filled_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_some()).count()
    }

    pub fn is_complete(&self) -> bool {
        self.cells.iter().all(Option::is_some)
    }

    /// Cells as rows, convenient for comparisons and JSON
    pub fn rows(&self) -> Vec<Vec<Option<usize>>> {
        if self.size == 0 {
            return Vec::new();
        }
        self.cells.chunks(self.size).map(<[_]>::to_vec).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_grid_is_unfilled() {
        let grid = TilingGrid::new(3);
        assert_eq!(grid.cells.len(), 9);
        assert_eq!(grid.filled_count(), 0);
        assert!(!grid.is_complete());
    }

    #[test]
    fn test_set_and_get() {
        let mut grid = TilingGrid::new(2);
        assert_eq!(grid.set(1, 0, 4).unwrap(), None);
        assert_eq!(grid.set(1, 0, 5).unwrap(), Some(4));
        assert_eq!(grid.get(1, 0), Some(5));
        assert_eq!(grid.get(0, 0), None);
        assert_eq!(grid.get(7, 7), None);
        assert!(grid.set(2, 0, 1).is_err());
    }

    #[test]
    fn test_from_rows() {
        let grid = TilingGrid::from_rows(vec![vec![0, 1], vec![2, 3]]).unwrap();
        assert!(grid.is_complete());
        assert_eq!(grid.get(1, 0), Some(2));
        assert_eq!(grid.rows(), vec![vec![Some(0), Some(1)], vec![Some(2), Some(3)]]);

        assert!(TilingGrid::from_rows(vec![vec![0, 1], vec![2]]).is_err());
    }
}
