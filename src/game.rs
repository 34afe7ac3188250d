//! The game state machine: lobby, placement, shooting, finished.
//!
//! `Game` is the single authority mutating a game's state. It validates every
//! action against the current phase and player membership, delegates to
//! [`Board`] and [`Round`], and advances the phase. Callers serialise access
//! to one game (see `service`); the state machine itself holds no shared or
//! global state.

use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;
use log::{debug, warn};
use rand::Rng;
use uuid::{Builder, Uuid};

use crate::board::Board;
use crate::common::GameError;
use crate::config::{Rules, REQUIRED_PLAYERS};
use crate::player::{Player, PlayerId};
use crate::round::{ResolvedShot, Round, RoundReport, Shot};
use crate::ship::Placement;
use crate::snapshot::{BoardView, GameSnapshot, PlayerView, ShipStatus};

/// Opaque game handle, generated once at creation.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct GameId(String);

impl GameId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Random version 4 UUID in its canonical hyphenated form.
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        Self::from_uuid(Builder::from_random_bytes(rng.random()).into_uuid())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid.hyphenated().encode_lower(&mut Uuid::encode_buffer()).into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for GameId {
    fn from(id: &str) -> Self {
        Self(id.into())
    }
}

/// Lifecycle stage of a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "std", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum GamePhase {
    Created,
    PlaceShips,
    Shoot,
    Finished,
    Deleted,
}

impl fmt::Display for GamePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            GamePhase::Created => "CREATED",
            GamePhase::PlaceShips => "PLACE_SHIPS",
            GamePhase::Shoot => "SHOOT",
            GamePhase::Finished => "FINISHED",
            GamePhase::Deleted => "DELETED",
        })
    }
}

/// What a successful shot submission led to.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub enum ShotOutcome {
    /// Shot recorded; the round waits for the opponent.
    Pending,
    /// Both shots were applied and the game continues.
    RoundResolved(RoundReport),
    /// Both shots were applied and at least one fleet is gone.
    /// `winner` is `None` when both fleets sank in the same round.
    GameOver {
        report: RoundReport,
        winner: Option<PlayerId>,
    },
}

#[derive(Debug, Clone)]
pub struct Game {
    id: GameId,
    rules: Rules,
    players: Vec<Player>,
    phase: GamePhase,
    boards: BTreeMap<PlayerId, Board>,
    rounds: Vec<Round>,
    current: Option<Round>,
    winner: Option<PlayerId>,
}

impl Game {
    pub fn new(id: GameId, rules: Rules) -> Self {
        Self {
            id,
            rules,
            players: Vec::with_capacity(REQUIRED_PLAYERS),
            phase: GamePhase::Created,
            boards: BTreeMap::new(),
            rounds: Vec::new(),
            current: None,
            winner: None,
        }
    }

    pub fn id(&self) -> &GameId {
        &self.id
    }

    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    /// Players in join order.
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player(&self, id: &PlayerId) -> Result<&Player, GameError> {
        self.players
            .iter()
            .find(|p| p.id() == id)
            .ok_or(GameError::PlayerNotPartOfGame)
    }

    pub fn board(&self, id: &PlayerId) -> Option<&Board> {
        self.boards.get(id)
    }

    /// Finished rounds, oldest first.
    pub fn rounds(&self) -> &[Round] {
        &self.rounds
    }

    /// Round collecting shots right now, if one has started.
    pub fn current_round(&self) -> Option<&Round> {
        self.current.as_ref()
    }

    /// Adds a player. The second player moves the game to `PLACE_SHIPS`.
    pub fn add_player(&mut self, player: Player) -> Result<(), GameError> {
        if self.players.len() >= REQUIRED_PLAYERS {
            return Err(GameError::GameFull);
        }
        if self.phase != GamePhase::Created {
            return Err(GameError::InvalidPhase);
        }
        if self.players.iter().any(|p| p.id() == player.id()) {
            return Err(GameError::PlayerAlreadyJoined);
        }
        debug!("game {}: player {} joined", self.id, player.id());
        self.players.push(player);
        if self.players.len() == REQUIRED_PLAYERS {
            self.set_phase(GamePhase::PlaceShips);
        }
        Ok(())
    }

    pub fn can_start_game(&self) -> bool {
        self.players.len() == REQUIRED_PLAYERS
            && matches!(self.phase, GamePhase::Created | GamePhase::PlaceShips)
    }

    /// Moves a full lobby into `PLACE_SHIPS`. Succeeds without effect when the
    /// game is already there.
    pub fn start_game(&mut self) -> Result<(), GameError> {
        if self.players.len() != REQUIRED_PLAYERS {
            return Err(GameError::NotEnoughPlayers);
        }
        match self.phase {
            GamePhase::Created => {
                self.set_phase(GamePhase::PlaceShips);
                Ok(())
            }
            GamePhase::PlaceShips => Ok(()),
            _ => Err(GameError::InvalidPhase),
        }
    }

    /// Validates and stores `player`'s fleet. Once both fleets are in, the
    /// game moves to `SHOOT`.
    pub fn place_ships(
        &mut self,
        player: &PlayerId,
        placements: &[Placement],
    ) -> Result<(), GameError> {
        if self.phase != GamePhase::PlaceShips {
            return Err(GameError::InvalidPhase);
        }
        self.player(player)?;
        if self.boards.contains_key(player) {
            return Err(GameError::FleetAlreadyPlaced);
        }
        let board = Board::new(&self.rules, placements).map_err(|e| {
            warn!("game {}: rejected fleet of {}: {}", self.id, player, e);
            GameError::InvalidFleet(e)
        })?;
        self.boards.insert(player.clone(), board);
        debug!("game {}: player {} placed ships", self.id, player);

        if self.boards.len() == REQUIRED_PLAYERS {
            self.set_phase(GamePhase::Shoot);
        }
        Ok(())
    }

    pub fn is_player_allowed_to_shoot(&self, player: &PlayerId) -> bool {
        self.phase == GamePhase::Shoot
            && self.player(player).is_ok()
            && self
                .current
                .as_ref()
                .map_or(true, |round| round.is_player_allowed_to_shoot(player))
    }

    /// Records `player`'s shot for the current round. When the round is
    /// complete both shots are applied in join order, the round is archived
    /// and the win condition is evaluated.
    pub fn shoot(&mut self, player: &PlayerId, x: usize, y: usize) -> Result<ShotOutcome, GameError> {
        if self.phase != GamePhase::Shoot {
            return Err(GameError::InvalidPhase);
        }
        self.player(player)?;
        if !self.rules.in_bounds(x, y) {
            return Err(GameError::InvalidShot { x, y });
        }

        let number = self.rounds.len() + 1;
        let round = self
            .current
            .get_or_insert_with(|| Round::new(number, REQUIRED_PLAYERS));
        if !round.is_player_allowed_to_shoot(player) {
            return Err(GameError::AlreadyShot);
        }
        round.add_shot(Shot::new(player.clone(), x, y))?;
        if !round.received_both_moves() {
            return Ok(ShotOutcome::Pending);
        }

        let report = self.resolve_round()?;
        if self.phase == GamePhase::Finished {
            Ok(ShotOutcome::GameOver {
                report,
                winner: self.winner.clone(),
            })
        } else {
            Ok(ShotOutcome::RoundResolved(report))
        }
    }

    /// Soft-deletes the game. Allowed in every phase and idempotent.
    pub fn delete_game(&mut self) {
        if self.phase != GamePhase::Deleted {
            self.set_phase(GamePhase::Deleted);
        }
    }

    /// Surviving player once the game is `FINISHED`; `None` before that, on
    /// a draw, or when no round was played.
    pub fn winner(&self) -> Option<&PlayerId> {
        if self.phase != GamePhase::Finished || self.rounds.is_empty() {
            return None;
        }
        self.winner.as_ref()
    }

    fn opponent_of(&self, player: &PlayerId) -> Option<&PlayerId> {
        self.players.iter().map(Player::id).find(|id| *id != player)
    }

    fn resolve_round(&mut self) -> Result<RoundReport, GameError> {
        let shots = match &self.current {
            Some(round) => round.shots().to_vec(),
            None => return Err(GameError::InvalidPhase),
        };

        // Join order, not submission order.
        let mut plan = Vec::with_capacity(shots.len());
        for player in &self.players {
            let Some(shot) = shots.iter().find(|s| &s.player == player.id()) else {
                continue;
            };
            let target = self
                .opponent_of(player.id())
                .ok_or(GameError::PlayerNotPartOfGame)?;
            if !self.boards.contains_key(target) {
                return Err(GameError::InvalidPhase);
            }
            plan.push((shot.clone(), target.clone()));
        }

        let mut resolved = Vec::with_capacity(plan.len());
        for (shot, target) in plan {
            let board = self
                .boards
                .get_mut(&target)
                .ok_or(GameError::InvalidPhase)?;
            let repeated = board.was_targeted(shot.x, shot.y);
            let result = board
                .execute_shot(shot.x, shot.y)
                .map_err(|_| GameError::InvalidShot { x: shot.x, y: shot.y })?;
            resolved.push(ResolvedShot {
                shooter: shot.player,
                target,
                x: shot.x,
                y: shot.y,
                result,
                repeated,
            });
        }

        let mut round = self.current.take().ok_or(GameError::InvalidPhase)?;
        round.finish_round(resolved);
        let report = round.report();
        debug!("game {}: round {} resolved: {:?}", self.id, round.number(), report.shots);
        self.rounds.push(round);

        self.evaluate_winner();
        Ok(report)
    }

    /// The first round that sinks a whole fleet ends the game. If both fleets
    /// sink in that round it is a draw.
    fn evaluate_winner(&mut self) {
        let sunk: Vec<&PlayerId> = self
            .players
            .iter()
            .map(Player::id)
            .filter(|id| self.boards.get(*id).is_some_and(Board::all_sunk))
            .collect();
        if sunk.is_empty() {
            return;
        }
        self.winner = match sunk.as_slice() {
            [loser] => self.opponent_of(loser).cloned(),
            _ => None,
        };
        self.set_phase(GamePhase::Finished);
    }

    fn set_phase(&mut self, phase: GamePhase) {
        debug!("game {}: {} -> {}", self.id, self.phase, phase);
        self.phase = phase;
    }

    /// Public projection: opponents see only hits and misses.
    pub fn snapshot(&self) -> GameSnapshot {
        let boards = self
            .players
            .iter()
            .filter_map(|p| {
                self.boards.get(p.id()).map(|board| BoardView {
                    owner: p.id().clone(),
                    size: board.size(),
                    cells: board.cells(),
                    ships_remaining: board.ships_remaining(),
                })
            })
            .collect();
        let awaiting = if self.phase == GamePhase::Shoot {
            self.players
                .iter()
                .map(Player::id)
                .filter(|id| {
                    self.current
                        .as_ref()
                        .map_or(true, |round| round.is_player_allowed_to_shoot(id))
                })
                .cloned()
                .collect()
        } else {
            Vec::new()
        };
        GameSnapshot {
            game_id: self.id.clone(),
            phase: self.phase,
            players: self.players.clone(),
            boards,
            rounds_played: self.rounds.len(),
            last_round: self.rounds.last().map(Round::report),
            awaiting,
            winner: self.winner().cloned(),
        }
    }

    /// Snapshot plus the full status of `player`'s own fleet.
    pub fn player_view(&self, player: &PlayerId) -> Result<PlayerView, GameError> {
        self.player(player)?;
        let fleet = self
            .boards
            .get(player)
            .map(|board| {
                board
                    .ships()
                    .iter()
                    .map(|ship| ShipStatus {
                        cells: ship.cells().to_vec(),
                        hits: ship.hits().collect(),
                        sunk: ship.is_sunk(),
                    })
                    .collect()
            })
            .unwrap_or_default();
        Ok(PlayerView {
            player: player.clone(),
            snapshot: self.snapshot(),
            fleet,
        })
    }
}
