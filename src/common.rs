//! Common types: shot results, cell states and the error taxonomy.

use alloc::vec::Vec;
use core::fmt;

use crate::bitboard::BitBoardError;

/// Result of a single shot against a board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub enum ShotResult {
    /// Shot landed on a ship that is still afloat afterwards.
    Hit,
    /// Shot landed on a ship and every one of its cells is now hit.
    Sunk,
    /// Shot landed on open water.
    Miss,
}

impl ShotResult {
    pub fn is_hit(&self) -> bool {
        matches!(self, ShotResult::Hit | ShotResult::Sunk)
    }
}

/// What a board cell reveals to an observer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub enum CellState {
    Unknown,
    Hit,
    Miss,
}

/// Reasons a fleet placement is rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub enum FleetError {
    /// A ship has no cells.
    EmptyShip,
    /// A ship cell lies outside the grid.
    OutOfBounds { x: usize, y: usize },
    /// A ship's cells are not on one row or one column.
    NotAligned,
    /// A ship's cells have gaps or repeat.
    NotContiguous,
    /// Two ships share this cell.
    Overlap { x: usize, y: usize },
    /// Ship lengths do not match the required fleet.
    Composition {
        expected: Vec<usize>,
        found: Vec<usize>,
    },
}

impl fmt::Display for FleetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FleetError::EmptyShip => write!(f, "ship has no cells"),
            FleetError::OutOfBounds { x, y } => write!(f, "cell ({}, {}) is off the board", x, y),
            FleetError::NotAligned => write!(f, "ship is neither horizontal nor vertical"),
            FleetError::NotContiguous => write!(f, "ship cells are not contiguous"),
            FleetError::Overlap { x, y } => write!(f, "ships overlap at ({}, {})", x, y),
            FleetError::Composition { expected, found } => write!(
                f,
                "fleet lengths {:?} do not match required {:?}",
                found, expected
            ),
        }
    }
}

impl From<BitBoardError> for FleetError {
    fn from(err: BitBoardError) -> Self {
        match err {
            BitBoardError::IndexOutOfBounds { x, y } => FleetError::OutOfBounds { x, y },
        }
    }
}

/// Coarse classification for transports mapping errors to status codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The referenced game does not exist.
    NotFound,
    /// The action was understood but not allowed.
    Rejected,
}

/// Errors returned by game actions. None of them are fatal.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub enum GameError {
    /// No game is registered under the id.
    GameNotFound,
    /// The current phase does not permit the action.
    InvalidPhase,
    /// The game already has two players.
    GameFull,
    /// The game needs exactly two players for this action.
    NotEnoughPlayers,
    /// The player is not registered to this game.
    PlayerNotPartOfGame,
    /// The player has already joined this game.
    PlayerAlreadyJoined,
    /// The submitted fleet failed validation.
    InvalidFleet(FleetError),
    /// The player has already placed a fleet.
    FleetAlreadyPlaced,
    /// The target cell is off the grid.
    InvalidShot { x: usize, y: usize },
    /// The player already shot in the current round.
    AlreadyShot,
    /// The round already holds a shot from this player.
    DuplicateShooter,
}

impl GameError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            GameError::GameNotFound => ErrorKind::NotFound,
            _ => ErrorKind::Rejected,
        }
    }
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameError::GameNotFound => write!(f, "game not found"),
            GameError::InvalidPhase => write!(f, "action not allowed in the current phase"),
            GameError::GameFull => write!(f, "game already has two players"),
            GameError::NotEnoughPlayers => write!(f, "game needs two players"),
            GameError::PlayerNotPartOfGame => write!(f, "player is not part of the game"),
            GameError::PlayerAlreadyJoined => write!(f, "player already joined the game"),
            GameError::InvalidFleet(e) => write!(f, "invalid fleet: {}", e),
            GameError::FleetAlreadyPlaced => write!(f, "player already placed a fleet"),
            GameError::InvalidShot { x, y } => write!(f, "shot at ({}, {}) is off the board", x, y),
            GameError::AlreadyShot => write!(f, "player already shot this round"),
            GameError::DuplicateShooter => write!(f, "round already holds a shot from this player"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for FleetError {}

#[cfg(feature = "std")]
impl std::error::Error for GameError {}

impl From<FleetError> for GameError {
    fn from(err: FleetError) -> Self {
        GameError::InvalidFleet(err)
    }
}
