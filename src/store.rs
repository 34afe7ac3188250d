#![cfg(feature = "std")]

use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};

use crate::game::{Game, GameId};

/// A game behind its own lock. Holding the lock is the only way to mutate it.
pub type SharedGame = Arc<Mutex<Game>>;

/// Registry of games by id, injected into [`GameService`](crate::GameService).
pub trait GameStore: Send + Sync {
    /// Registers `game` under its id and returns the shared handle.
    fn insert(&self, game: Game) -> SharedGame;
    fn get(&self, id: &GameId) -> Option<SharedGame>;
    /// Every registered id, deleted games included.
    fn ids(&self) -> Vec<GameId>;
}

/// Process-local store. The map lock is held only while looking up handles,
/// never while a game is being mutated.
#[derive(Default)]
pub struct InMemoryGameStore {
    games: RwLock<HashMap<GameId, SharedGame>>,
}

impl InMemoryGameStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.games.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl GameStore for InMemoryGameStore {
    fn insert(&self, game: Game) -> SharedGame {
        let id = game.id().clone();
        let shared = Arc::new(Mutex::new(game));
        self.games
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(id, shared.clone());
        shared
    }

    fn get(&self, id: &GameId) -> Option<SharedGame> {
        self.games
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(id)
            .cloned()
    }

    fn ids(&self) -> Vec<GameId> {
        let mut ids: Vec<GameId> = self
            .games
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .keys()
            .cloned()
            .collect();
        ids.sort();
        ids
    }
}
