//! Game rules: grid size and fleet composition.

use alloc::vec::Vec;
use core::fmt;

/// Largest supported grid edge; the grid is packed into a `u128` bitboard.
pub const MAX_BOARD_SIZE: u8 = 10;

/// Number of players a game needs before ships can be placed.
pub const REQUIRED_PLAYERS: usize = 2;

/// Class of ship: name and length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize))]
pub struct ShipClass {
    name: &'static str,
    length: usize,
}

impl ShipClass {
    pub const fn new(name: &'static str, length: usize) -> Self {
        Self { name, length }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn length(&self) -> usize {
        self.length
    }
}

pub const STANDARD_FLEET: [ShipClass; 5] = [
    ShipClass::new("Carrier", 5),
    ShipClass::new("Battleship", 4),
    ShipClass::new("Cruiser", 3),
    ShipClass::new("Submarine", 3),
    ShipClass::new("Destroyer", 2),
];

/// Errors returned when building a rule set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RulesError {
    /// Board edge outside `1..=MAX_BOARD_SIZE`.
    BoardSize(u8),
    /// Fleet has no ships.
    EmptyFleet,
    /// A ship class has length zero.
    ZeroLengthShip(&'static str),
    /// A ship class is longer than the board edge.
    ShipTooLong(&'static str),
    /// The fleet occupies more cells than the board has.
    FleetTooLarge { cells: usize, capacity: usize },
}

impl fmt::Display for RulesError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RulesError::BoardSize(size) => write!(
                f,
                "board size {} is outside 1..={}",
                size, MAX_BOARD_SIZE
            ),
            RulesError::EmptyFleet => write!(f, "fleet has no ships"),
            RulesError::ZeroLengthShip(name) => write!(f, "ship class {} has length zero", name),
            RulesError::ShipTooLong(name) => write!(f, "ship class {} does not fit the board", name),
            RulesError::FleetTooLarge { cells, capacity } => write!(
                f,
                "fleet needs {} cells but the board only has {}",
                cells, capacity
            ),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for RulesError {}

/// Grid size and the fleet every player must place.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize))]
pub struct Rules {
    board_size: u8,
    fleet: Vec<ShipClass>,
}

impl Rules {
    /// Validated rule set.
    pub fn new(board_size: u8, fleet: Vec<ShipClass>) -> Result<Self, RulesError> {
        if board_size == 0 || board_size > MAX_BOARD_SIZE {
            return Err(RulesError::BoardSize(board_size));
        }
        if fleet.is_empty() {
            return Err(RulesError::EmptyFleet);
        }
        for class in &fleet {
            if class.length() == 0 {
                return Err(RulesError::ZeroLengthShip(class.name()));
            }
            if class.length() > board_size as usize {
                return Err(RulesError::ShipTooLong(class.name()));
            }
        }
        let cells: usize = fleet.iter().map(ShipClass::length).sum();
        let capacity = board_size as usize * board_size as usize;
        if cells > capacity {
            return Err(RulesError::FleetTooLarge { cells, capacity });
        }
        Ok(Self { board_size, fleet })
    }

    /// 10×10 board with the classic five-ship fleet.
    pub fn standard() -> Self {
        Self {
            board_size: MAX_BOARD_SIZE,
            fleet: STANDARD_FLEET.to_vec(),
        }
    }

    pub fn board_size(&self) -> u8 {
        self.board_size
    }

    pub fn fleet(&self) -> &[ShipClass] {
        &self.fleet
    }

    /// Ship lengths of the fleet, sorted ascending.
    pub fn fleet_lengths(&self) -> Vec<usize> {
        let mut lengths: Vec<usize> = self.fleet.iter().map(ShipClass::length).collect();
        lengths.sort_unstable();
        lengths
    }

    /// Total number of cells the fleet occupies.
    pub fn total_cells(&self) -> usize {
        self.fleet.iter().map(ShipClass::length).sum()
    }

    /// Whether `(x, y)` lies on the active grid.
    pub fn in_bounds(&self, x: usize, y: usize) -> bool {
        x < self.board_size as usize && y < self.board_size as usize
    }
}

impl Default for Rules {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn standard_rules_are_valid() {
        let rules = Rules::standard();
        assert_eq!(
            Rules::new(rules.board_size(), rules.fleet().to_vec()).unwrap(),
            rules
        );
        assert_eq!(rules.total_cells(), 17);
        assert_eq!(rules.fleet_lengths(), vec![2, 3, 3, 4, 5]);
    }

    #[test]
    fn rejects_bad_rules() {
        assert_eq!(
            Rules::new(11, STANDARD_FLEET.to_vec()).unwrap_err(),
            RulesError::BoardSize(11)
        );
        assert_eq!(Rules::new(5, vec![]).unwrap_err(), RulesError::EmptyFleet);
        assert_eq!(
            Rules::new(4, vec![ShipClass::new("Carrier", 5)]).unwrap_err(),
            RulesError::ShipTooLong("Carrier")
        );
        assert_eq!(
            Rules::new(1, vec![ShipClass::new("Dinghy", 1), ShipClass::new("Dinghy", 1)])
                .unwrap_err(),
            RulesError::FleetTooLarge {
                cells: 2,
                capacity: 1
            }
        );
    }
}
