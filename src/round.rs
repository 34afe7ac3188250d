//! Simultaneous-turn bookkeeping: one shot per player, resolved together.

use alloc::vec::Vec;
use core::fmt;

use crate::common::{GameError, ShotResult};
use crate::player::PlayerId;

/// A single shot submitted by a player.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct Shot {
    pub player: PlayerId,
    pub x: usize,
    pub y: usize,
}

impl Shot {
    pub fn new(player: PlayerId, x: usize, y: usize) -> Self {
        Self { player, x, y }
    }
}

/// A shot after it was applied to the opponent's board.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct ResolvedShot {
    pub shooter: PlayerId,
    pub target: PlayerId,
    pub x: usize,
    pub y: usize,
    pub result: ShotResult,
    /// The cell had been shot at in an earlier round.
    pub repeated: bool,
}

/// Serializable record of a finished round.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct RoundReport {
    pub number: usize,
    pub shots: Vec<ResolvedShot>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundError {
    /// The player already has a shot recorded in this round.
    DuplicateShooter,
    /// The round was finished and accepts no more shots.
    RoundClosed,
}

impl fmt::Display for RoundError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoundError::DuplicateShooter => write!(f, "player already shot this round"),
            RoundError::RoundClosed => write!(f, "round is closed"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for RoundError {}

impl From<RoundError> for GameError {
    fn from(err: RoundError) -> Self {
        match err {
            RoundError::DuplicateShooter => GameError::DuplicateShooter,
            RoundError::RoundClosed => GameError::InvalidPhase,
        }
    }
}

/// One simultaneous turn. Closed rounds are immutable history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Round {
    number: usize,
    active_players: usize,
    shots: Vec<Shot>,
    resolved: Vec<ResolvedShot>,
    closed: bool,
}

impl Round {
    /// Opens round `number` (1-based) for `active_players` shooters.
    pub fn new(number: usize, active_players: usize) -> Self {
        Self {
            number,
            active_players,
            shots: Vec::with_capacity(active_players),
            resolved: Vec::new(),
            closed: false,
        }
    }

    pub fn add_shot(&mut self, shot: Shot) -> Result<(), RoundError> {
        if self.closed {
            return Err(RoundError::RoundClosed);
        }
        if !self.is_player_allowed_to_shoot(&shot.player) {
            return Err(RoundError::DuplicateShooter);
        }
        self.shots.push(shot);
        Ok(())
    }

    pub fn is_player_allowed_to_shoot(&self, player: &PlayerId) -> bool {
        !self.closed && self.shots.iter().all(|s| &s.player != player)
    }

    /// `true` once every active player has submitted a shot.
    pub fn received_both_moves(&self) -> bool {
        self.shots.len() == self.active_players
    }

    /// Closes the round and stores how its shots resolved.
    pub fn finish_round(&mut self, resolved: Vec<ResolvedShot>) {
        self.resolved = resolved;
        self.closed = true;
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn number(&self) -> usize {
        self.number
    }

    /// Shots recorded so far, in submission order.
    pub fn shots(&self) -> &[Shot] {
        &self.shots
    }

    /// Shot submitted by `player`, if any.
    pub fn shot_of(&self, player: &PlayerId) -> Option<&Shot> {
        self.shots.iter().find(|s| &s.player == player)
    }

    /// Resolved shots in application order; empty until finished.
    pub fn resolved(&self) -> &[ResolvedShot] {
        &self.resolved
    }

    pub fn report(&self) -> RoundReport {
        RoundReport {
            number: self.number,
            shots: self.resolved.clone(),
        }
    }
}
