//! Error types.
//!
//! Every error is fatal to the current `step` call: the engine validates
//! before mutating, so a failed call leaves the state untouched and the
//! caller may retry with a legal action or abort the game. The core never
//! coerces an illegal action into a legal one.

use thiserror::Error;

use crate::core::action::Action;
use crate::core::player::PlayerId;

/// The error type for game construction, stepping, and action decoding.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum GameError {
    /// The action is not in `legal_actions` for the current state, or was
    /// offered by a player other than the one whose turn it is.
    #[error("{player} cannot {action} in this state")]
    IllegalAction { player: PlayerId, action: Action },

    /// An action id outside the valid range for the configured lowest rank.
    #[error("action id {id} out of range (action space holds {num_actions} ids)")]
    InvalidActionId { id: usize, num_actions: usize },

    /// The configuration asks for more cards dealt than the deck holds.
    #[error("cannot deal {requested} cards from a deck of {available}")]
    InsufficientCards { requested: usize, available: usize },

    /// Turn routing found no seat able to act. With four or more players a
    /// pass chain can leave a pending attacker unreachable behind stopped
    /// neighbors; surfaced instead of looping the turn forever.
    #[error("no eligible player to route the turn to")]
    NoEligibleActor,
}
