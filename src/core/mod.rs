//! Core engine types: cards, players, state, actions, RNG, configuration.
//!
//! This module contains the fundamental building blocks the rules engine
//! operates on. Everything here is data; the game logic lives in `rules`.

pub mod action;
pub mod card;
pub mod codec;
pub mod config;
pub mod player;
pub mod rng;
pub mod state;

pub use action::Action;
pub use card::{Card, Deck, Suit, ACE_RANK};
pub use codec::ActionCodec;
pub use config::GameConfig;
pub use player::{PlayerId, PlayerMap};
pub use rng::{GameRng, GameRngState};
pub use state::{
    AttackerList, GameOutcome, GameState, GameTransition, ObservableState,
};
