//! Cheapest-card baseline agent.

use crate::agents::Agent;
use crate::core::action::Action;
use crate::core::state::ObservableState;

/// Always plays the cheapest card on offer: lowest rank, trumps last.
///
/// Card actions are preferred over `Take`/`StopAttacking`, so this agent
/// defends whenever it can and keeps attacking while it holds matching
/// ranks. A useful punching bag for evaluating learned policies.
#[derive(Clone, Copy, Debug, Default)]
pub struct GreedyAgent;

impl GreedyAgent {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Agent for GreedyAgent {
    fn choose_action(&mut self, state: &ObservableState, actions: &[Action]) -> Action {
        let trump = state.trump_suit();
        actions
            .iter()
            .copied()
            .min_by_key(|action| match action.card() {
                Some(card) => (0u8, u8::from(card.suit == trump), card.rank),
                None => (1, 0, 0),
            })
            // The runner guarantees a non-empty offer.
            .unwrap_or(Action::Take)
    }
}
