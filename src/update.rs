#![cfg(feature = "std")]

use serde::{Deserialize, Serialize};

use crate::game::GameId;
use crate::snapshot::GameSnapshot;

/// Maximum encoded update size accepted by [`GameUpdate::decode`].
const MAX_UPDATE_SIZE: u64 = 1_000_000;

/// Payload a notifier publishes after each accepted action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameUpdate {
    pub game_id: GameId,
    pub snapshot: GameSnapshot,
}

impl GameUpdate {
    pub fn new(snapshot: GameSnapshot) -> Self {
        Self {
            game_id: snapshot.game_id.clone(),
            snapshot,
        }
    }

    pub fn encode(&self) -> anyhow::Result<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }

    pub fn decode(bytes: &[u8]) -> anyhow::Result<Self> {
        use bincode::Options;
        let update = bincode::DefaultOptions::new()
            .with_fixint_encoding()
            .allow_trailing_bytes()
            .with_limit(MAX_UPDATE_SIZE)
            .deserialize(bytes)?;
        Ok(update)
    }
}
