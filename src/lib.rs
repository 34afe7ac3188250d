#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

mod bitboard;
mod board;
mod common;
mod config;
mod game;
#[cfg(feature = "std")]
mod logging;
mod player;
mod round;
#[cfg(feature = "std")]
pub mod service;
mod ship;
pub mod snapshot;
#[cfg(feature = "std")]
pub mod store;
#[cfg(feature = "std")]
pub mod update;

pub use bitboard::{BitBoard, BitBoardError};
pub use board::*;
pub use common::*;
pub use config::*;
pub use game::*;
pub use player::*;
pub use round::*;
pub use ship::{Orientation, Placement, Ship};
pub use snapshot::*;
#[cfg(feature = "std")]
pub use logging::{init_logging, LOG_ENV};
#[cfg(feature = "std")]
pub use service::GameService;
#[cfg(feature = "std")]
pub use store::{GameStore, InMemoryGameStore, SharedGame};
#[cfg(feature = "std")]
pub use update::GameUpdate;
