//! Read-only projections of a game for notifications and clients.

use alloc::vec::Vec;

use crate::common::CellState;
use crate::game::{GameId, GamePhase};
use crate::player::{Player, PlayerId};
use crate::round::RoundReport;

/// A board as anyone may see it: hits and misses, never ship positions.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct BoardView {
    pub owner: PlayerId,
    pub size: u8,
    /// Row-major, `size * size` entries.
    pub cells: Vec<CellState>,
    pub ships_remaining: usize,
}

impl BoardView {
    pub fn cell(&self, x: usize, y: usize) -> Option<CellState> {
        let size = self.size as usize;
        if x >= size || y >= size {
            return None;
        }
        self.cells.get(y * size + x).copied()
    }

    pub fn count(&self, state: CellState) -> usize {
        self.cells.iter().filter(|c| **c == state).count()
    }
}

/// Settled state of a game. Taken under the game's lock, so it never shows
/// a round halfway through resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct GameSnapshot {
    pub game_id: GameId,
    pub phase: GamePhase,
    pub players: Vec<Player>,
    /// One entry per placed fleet, in join order.
    pub boards: Vec<BoardView>,
    pub rounds_played: usize,
    pub last_round: Option<RoundReport>,
    /// Players still expected to shoot in the current round.
    pub awaiting: Vec<PlayerId>,
    pub winner: Option<PlayerId>,
}

impl GameSnapshot {
    pub fn board_of(&self, player: &PlayerId) -> Option<&BoardView> {
        self.boards.iter().find(|b| &b.owner == player)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct ShipStatus {
    pub cells: Vec<(usize, usize)>,
    pub hits: Vec<(usize, usize)>,
    pub sunk: bool,
}

/// What one player is allowed to see: the public snapshot plus their own
/// ship positions.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct PlayerView {
    pub player: PlayerId,
    pub snapshot: GameSnapshot,
    /// Empty until the player has placed a fleet.
    pub fleet: Vec<ShipStatus>,
}
