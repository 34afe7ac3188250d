#![cfg(feature = "std")]

use std::sync::PoisonError;

use log::info;

use crate::common::GameError;
use crate::config::Rules;
use crate::game::{Game, GameId, GamePhase, ShotOutcome};
use crate::player::{Player, PlayerId};
use crate::ship::Placement;
use crate::snapshot::{GameSnapshot, PlayerView};
use crate::store::{GameStore, InMemoryGameStore};
use crate::update::GameUpdate;

/// Entry point for a transport layer.
///
/// Every call locks exactly one game for its whole duration, so actions on
/// one game are applied one at a time while different games proceed in
/// parallel. Snapshots are taken under the same lock and therefore only ever
/// show settled state.
pub struct GameService<S: GameStore = InMemoryGameStore> {
    store: S,
    default_rules: Rules,
}

impl GameService<InMemoryGameStore> {
    pub fn new() -> Self {
        Self::with_store(InMemoryGameStore::new(), Rules::standard())
    }
}

impl Default for GameService<InMemoryGameStore> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: GameStore> GameService<S> {
    pub fn with_store(store: S, default_rules: Rules) -> Self {
        Self {
            store,
            default_rules,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Creates a game with the service's default rules.
    pub fn create_game(&self) -> GameId {
        self.create_game_with(self.default_rules.clone())
    }

    pub fn create_game_with(&self, rules: Rules) -> GameId {
        let id = GameId::random(&mut rand::rng());
        self.store.insert(Game::new(id.clone(), rules));
        info!("created game {}", id);
        id
    }

    /// Runs `f` with exclusive access to the game. A poisoned lock is
    /// recovered: `Game` validates before it mutates, so a panicking caller
    /// cannot leave it half-updated.
    fn with_game<T>(
        &self,
        id: &GameId,
        f: impl FnOnce(&mut Game) -> Result<T, GameError>,
    ) -> Result<T, GameError> {
        let shared = self.store.get(id).ok_or(GameError::GameNotFound)?;
        let mut game = shared.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut *game)
    }

    pub fn add_player(&self, id: &GameId, player: Player) -> Result<(), GameError> {
        self.with_game(id, |game| game.add_player(player))
    }

    pub fn start_game(&self, id: &GameId) -> Result<(), GameError> {
        self.with_game(id, |game| game.start_game())
    }

    pub fn place_ships(
        &self,
        id: &GameId,
        player: &PlayerId,
        fleet: &[Placement],
    ) -> Result<(), GameError> {
        self.with_game(id, |game| game.place_ships(player, fleet))
    }

    pub fn shoot(
        &self,
        id: &GameId,
        player: &PlayerId,
        x: usize,
        y: usize,
    ) -> Result<ShotOutcome, GameError> {
        self.with_game(id, |game| {
            let outcome = game.shoot(player, x, y)?;
            if let ShotOutcome::GameOver { winner, .. } = &outcome {
                match winner {
                    Some(w) => info!("game {} finished, winner {}", game.id(), w),
                    None => info!("game {} finished in a draw", game.id()),
                }
            }
            Ok(outcome)
        })
    }

    /// Soft-deletes the game; deleting twice is not an error.
    pub fn delete_game(&self, id: &GameId) -> Result<(), GameError> {
        self.with_game(id, |game| {
            if game.phase() != GamePhase::Deleted {
                info!("deleting game {}", game.id());
            }
            game.delete_game();
            Ok(())
        })
    }

    pub fn get_state(&self, id: &GameId) -> Result<GameSnapshot, GameError> {
        self.with_game(id, |game| Ok(game.snapshot()))
    }

    pub fn player_view(&self, id: &GameId, player: &PlayerId) -> Result<PlayerView, GameError> {
        self.with_game(id, |game| game.player_view(player))
    }

    /// Notification payload for the current state of the game.
    pub fn update(&self, id: &GameId) -> Result<GameUpdate, GameError> {
        self.get_state(id).map(GameUpdate::new)
    }

    /// Snapshots of every game, ordered by id.
    pub fn list_games(&self) -> Vec<GameSnapshot> {
        self.store
            .ids()
            .iter()
            .filter_map(|id| self.get_state(id).ok())
            .collect()
    }
}
