//! The agent interface and baseline implementations.
//!
//! Agents are external decision makers: the engine hands them an
//! information-restricted view of the game plus the set of legal actions,
//! and they pick one. Policies of any sophistication (human input, search,
//! learned models) plug in behind the same trait; the engine never inspects
//! which concrete agent it is talking to.

pub mod greedy;
pub mod random;

pub use greedy::GreedyAgent;
pub use random::RandomAgent;

use crate::core::action::Action;
use crate::core::state::{GameTransition, ObservableState};

/// An external decision maker for one seat.
pub trait Agent {
    /// Pick one of the offered actions.
    ///
    /// `actions` is never empty and the return value must be a member of
    /// it; the runner rejects anything else with an illegal-action error.
    /// This is the only call that may block (e.g. on human input or a
    /// model forward pass).
    fn choose_action(&mut self, state: &ObservableState, actions: &[Action]) -> Action;

    /// Notification of a completed step, delivered to every seat with its
    /// own view of the transition. Must not fail; the default does nothing.
    fn observe(&mut self, _transition: &GameTransition) {}
}
