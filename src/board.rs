//! One player's board: validated fleet plus hit/miss bookkeeping.

use alloc::vec::Vec;
use core::fmt;
use rand::Rng;

use crate::bitboard::BitBoardError;
use crate::common::{CellState, FleetError, ShotResult};
use crate::config::Rules;
use crate::ship::{Grid, Orientation, Placement, Ship};

/// Attempts per ship before random placement gives up.
const PLACEMENT_ATTEMPTS: usize = 100;

#[derive(Clone, PartialEq, Eq)]
pub struct Board {
    size: u8,
    ships: Vec<Ship>,
    ship_map: Grid,
    hits: Grid,
    misses: Grid,
}

impl Board {
    /// Builds a board from `placements`. The fleet is valid when every ship is
    /// in bounds and straight, no two ships share a cell, and the ship lengths
    /// match the rules' fleet exactly.
    pub fn new(rules: &Rules, placements: &[Placement]) -> Result<Self, FleetError> {
        let mut ships = Vec::with_capacity(placements.len());
        let mut ship_map = Grid::new();
        for placement in placements {
            let ship = Ship::from_placement(placement, rules.board_size())?;
            if let Some((x, y)) = (ship_map & ship.mask()).iter_set().next() {
                return Err(FleetError::Overlap { x, y });
            }
            ship_map |= ship.mask();
            ships.push(ship);
        }

        let mut found: Vec<usize> = ships.iter().map(Ship::len).collect();
        found.sort_unstable();
        let expected = rules.fleet_lengths();
        if found != expected {
            return Err(FleetError::Composition { expected, found });
        }

        Ok(Board {
            size: rules.board_size(),
            ships,
            ship_map,
            hits: Grid::new(),
            misses: Grid::new(),
        })
    }

    /// Checks `placements` against `rules` without keeping the board.
    pub fn validate(rules: &Rules, placements: &[Placement]) -> Result<(), FleetError> {
        Self::new(rules, placements).map(|_| ())
    }

    /// Random legal fleet for `rules`, longest ships first. `None` when a ship
    /// cannot be fitted after a bounded number of attempts.
    pub fn random_fleet<R: Rng>(rng: &mut R, rules: &Rules) -> Option<Vec<Placement>> {
        let size = rules.board_size() as usize;
        let mut lengths = rules.fleet_lengths();
        lengths.reverse();

        let mut occupied = Grid::new();
        let mut placements = Vec::with_capacity(lengths.len());
        for len in lengths {
            let mut placed = false;
            for _ in 0..PLACEMENT_ATTEMPTS {
                let orient = if rng.random() {
                    Orientation::Horizontal
                } else {
                    Orientation::Vertical
                };
                let (max_x, max_y) = match orient {
                    Orientation::Horizontal => (size - len, size - 1),
                    Orientation::Vertical => (size - 1, size - len),
                };
                let x = rng.random_range(0..=max_x);
                let y = rng.random_range(0..=max_y);
                let placement = Placement::line(x, y, orient, len);
                let Ok(mask) = Grid::from_cells(placement.cells.iter().copied()) else {
                    continue;
                };
                if (occupied & mask).is_empty() {
                    occupied |= mask;
                    placements.push(placement);
                    placed = true;
                    break;
                }
            }
            if !placed {
                return None;
            }
        }
        Some(placements)
    }

    /// Fires at `(x, y)`. Repeated shots are accepted: a ship cell reports a
    /// hit again without changing the ship's hit count.
    pub fn execute_shot(&mut self, x: usize, y: usize) -> Result<ShotResult, BitBoardError> {
        if x >= self.size as usize || y >= self.size as usize {
            return Err(BitBoardError::IndexOutOfBounds { x, y });
        }
        if !self.ship_map.get(x, y)? {
            self.misses.set(x, y)?;
            return Ok(ShotResult::Miss);
        }

        self.hits.set(x, y)?;
        for ship in self.ships.iter_mut() {
            let was_sunk = ship.is_sunk();
            if ship.register_shot(x, y) {
                if ship.is_sunk() && !was_sunk {
                    return Ok(ShotResult::Sunk);
                }
                return Ok(ShotResult::Hit);
            }
        }
        // ship_map is the union of all ship masks
        Ok(ShotResult::Hit)
    }

    /// Whether `(x, y)` has been shot at before.
    pub fn was_targeted(&self, x: usize, y: usize) -> bool {
        self.hits.get(x, y).unwrap_or(false) || self.misses.get(x, y).unwrap_or(false)
    }

    /// Returns `true` when every ship is sunk.
    pub fn all_sunk(&self) -> bool {
        self.ships.iter().all(Ship::is_sunk)
    }

    pub fn ships_remaining(&self) -> usize {
        self.ships.iter().filter(|s| !s.is_sunk()).count()
    }

    pub fn ships(&self) -> &[Ship] {
        &self.ships
    }

    pub fn size(&self) -> u8 {
        self.size
    }

    /// Revealed state of `(x, y)`; never exposes ship positions.
    pub fn cell(&self, x: usize, y: usize) -> CellState {
        if self.hits.get(x, y).unwrap_or(false) {
            CellState::Hit
        } else if self.misses.get(x, y).unwrap_or(false) {
            CellState::Miss
        } else {
            CellState::Unknown
        }
    }

    /// Revealed cells in row-major order.
    pub fn cells(&self) -> Vec<CellState> {
        let size = self.size as usize;
        (0..size)
            .flat_map(|y| (0..size).map(move |x| (x, y)))
            .map(|(x, y)| self.cell(x, y))
            .collect()
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Board {{\n  size: {},\n  ship_map:\n{:?}  hits:\n{:?}  misses:\n{:?}  ships: {:?}\n}}",
            self.size, self.ship_map, self.hits, self.misses, self.ships
        )
    }
}
