//! # durak-core
//!
//! A Durak card game engine optimized for RL/MCTS training.
//!
//! ## Design Principles
//!
//! 1. **Value-Semantics State**: One [`GameState`] is threaded by value
//!    through [`rules::step`]; nothing mutates a state another component
//!    can see. Persistent data structures (`im-rs`) make cloning O(1), so
//!    a full game history is cheap to retain.
//!
//! 2. **Deterministic**: All randomness comes from an injected, seeded
//!    [`GameRng`], consumed at deal time. `legal_actions` and `step` are
//!    pure functions of the state.
//!
//! 3. **Typed Actions, Dense Ids**: Game logic works with the
//!    [`Action`] sum type; [`ActionCodec`] maps actions to a fixed-size
//!    integer space at the external-policy boundary.
//!
//! ## Modules
//!
//! - `core`: Cards, players, state, actions, RNG, configuration
//! - `rules`: Legal-action enumeration, transitions, round resolution
//! - `agents`: The `Agent` trait and baseline implementations
//! - `runner`: Drives agents through a game to completion

pub mod agents;
pub mod core;
pub mod errors;
pub mod rules;
pub mod runner;

// Re-export commonly used types
pub use crate::core::{
    Action, ActionCodec, AttackerList, Card, Deck, GameConfig, GameOutcome, GameRng,
    GameRngState, GameState, GameTransition, ObservableState, PlayerId, PlayerMap, Suit,
    ACE_RANK,
};

pub use crate::agents::{Agent, GreedyAgent, RandomAgent};

pub use crate::errors::GameError;

pub use crate::rules::{legal_actions, step, MAX_TABLE_ATTACKS};

pub use crate::runner::GameRunner;
