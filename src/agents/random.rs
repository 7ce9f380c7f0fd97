//! Uniform random baseline agent.

use crate::agents::Agent;
use crate::core::action::Action;
use crate::core::rng::GameRng;
use crate::core::state::ObservableState;

/// Picks uniformly from the legal actions.
///
/// Owns its own seeded [`GameRng`], so a table of random agents plays out
/// identically for identical seeds.
#[derive(Clone, Debug)]
pub struct RandomAgent {
    rng: GameRng,
}

impl RandomAgent {
    /// Create a random agent with its own RNG stream.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: GameRng::new(seed),
        }
    }
}

impl Agent for RandomAgent {
    fn choose_action(&mut self, _state: &ObservableState, actions: &[Action]) -> Action {
        // The runner guarantees a non-empty offer.
        actions[self.rng.gen_range(0..actions.len())]
    }
}
