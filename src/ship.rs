//! Ship placements and placed ships tracked with a `BitBoard`.

use alloc::vec::Vec;
use core::fmt;

use crate::bitboard::BitBoard;
use crate::common::FleetError;
use crate::config::MAX_BOARD_SIZE;

/// Cell mask covering the largest supported grid.
pub(crate) type Grid = BitBoard<u128, { MAX_BOARD_SIZE as usize }>;

/// Orientation of a ship on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub enum Orientation {
    Horizontal,
    Vertical,
}

/// Cells a player asks one ship to occupy. Not validated until it is placed
/// on a board.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct Placement {
    pub cells: Vec<(usize, usize)>,
}

impl Placement {
    pub fn new(cells: Vec<(usize, usize)>) -> Self {
        Self { cells }
    }

    /// A straight ship of `length` cells starting at `(x, y)`.
    pub fn line(x: usize, y: usize, orientation: Orientation, length: usize) -> Self {
        let cells = (0..length)
            .map(|i| match orientation {
                Orientation::Horizontal => (x.saturating_add(i), y),
                Orientation::Vertical => (x, y.saturating_add(i)),
            })
            .collect();
        Self { cells }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// A validated ship on a board with its hit mask.
#[derive(Clone, PartialEq, Eq)]
pub struct Ship {
    cells: Vec<(usize, usize)>,
    mask: Grid,
    hits: Grid,
}

impl Ship {
    /// Validates `placement` on a `board_size` grid: in bounds, collinear and
    /// gap free. Cells are stored sorted from the origin.
    pub fn from_placement(placement: &Placement, board_size: u8) -> Result<Self, FleetError> {
        let mut cells = placement.cells.clone();
        let &(x0, y0) = cells.first().ok_or(FleetError::EmptyShip)?;

        if let Some(&(x, y)) = cells
            .iter()
            .find(|&&(x, y)| x >= board_size as usize || y >= board_size as usize)
        {
            return Err(FleetError::OutOfBounds { x, y });
        }

        let horizontal = cells.iter().all(|&(_, y)| y == y0);
        let vertical = cells.iter().all(|&(x, _)| x == x0);
        if !horizontal && !vertical {
            return Err(FleetError::NotAligned);
        }

        cells.sort_unstable();
        let contiguous = cells.windows(2).all(|pair| {
            let ((ax, ay), (bx, by)) = (pair[0], pair[1]);
            if horizontal {
                bx == ax + 1
            } else {
                by == ay + 1
            }
        });
        if !contiguous {
            return Err(FleetError::NotContiguous);
        }

        let mask = Grid::from_cells(cells.iter().copied())?;
        Ok(Ship {
            cells,
            mask,
            hits: Grid::new(),
        })
    }

    /// Registers a shot at `(x, y)`. Returns `true` when the cell belongs to
    /// this ship. Hitting the same cell twice leaves the hit mask unchanged.
    pub fn register_shot(&mut self, x: usize, y: usize) -> bool {
        if self.mask.get(x, y).unwrap_or(false) {
            let _ = self.hits.set(x, y);
            true
        } else {
            false
        }
    }

    pub fn contains(&self, x: usize, y: usize) -> bool {
        self.mask.get(x, y).unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Number of distinct cells hit so far.
    pub fn hit_count(&self) -> usize {
        self.hits.count_ones()
    }

    /// Sunk when every occupied cell has been hit.
    pub fn is_sunk(&self) -> bool {
        self.hit_count() == self.len()
    }

    /// Occupied cells, ordered from the origin.
    pub fn cells(&self) -> &[(usize, usize)] {
        &self.cells
    }

    /// Cells of this ship that have been hit.
    pub fn hits(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.hits.iter_set()
    }

    pub(crate) fn mask(&self) -> Grid {
        self.mask
    }
}

impl fmt::Debug for Ship {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Ship {{ cells: {:?}, hits: {} }}",
            self.cells,
            self.hit_count(),
        )
    }
}
