//! The game runner: the composition point between the pure rules engine
//! and external agents.
//!
//! One runner owns one game. Each turn it asks the acting seat's agent for
//! an action, applies it through [`step`](crate::rules::step), and notifies
//! every agent with its own information-restricted view of the transition.
//! The full-information state history and the action log are retained, so
//! an external collaborator can rebuild any seat's information state for
//! training.

use tracing::{debug, info};

use crate::agents::Agent;
use crate::core::action::Action;
use crate::core::config::GameConfig;
use crate::core::player::PlayerId;
use crate::core::state::{GameOutcome, GameState, GameTransition, ObservableState};
use crate::errors::GameError;
use crate::rules::{legal_actions, step};

/// Drives one game of agents to completion.
pub struct GameRunner {
    state: GameState,
    agents: Vec<Box<dyn Agent>>,
    history: Vec<GameState>,
    action_log: Vec<(PlayerId, Action)>,
}

impl GameRunner {
    /// Deal a new game for the given agents, one per seat.
    pub fn new(
        config: GameConfig,
        seed: u64,
        agents: Vec<Box<dyn Agent>>,
    ) -> Result<Self, GameError> {
        assert_eq!(
            agents.len(),
            config.player_count,
            "Need exactly one agent per seat"
        );
        let state = GameState::new(config, seed)?;
        debug!(
            seed,
            trump = %state.trump_card,
            first_attacker = %state.player_taking_action,
            "game dealt"
        );
        Ok(Self {
            history: vec![state.clone()],
            state,
            agents,
            action_log: Vec::new(),
        })
    }

    /// The current full-information state.
    #[must_use]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Whether the game has finished.
    #[must_use]
    pub fn is_done(&self) -> bool {
        self.state.is_done
    }

    /// Every state the game has passed through, starting with the deal.
    #[must_use]
    pub fn history(&self) -> &[GameState] {
        &self.history
    }

    /// Every action taken so far, with the seat that took it.
    #[must_use]
    pub fn action_log(&self) -> &[(PlayerId, Action)] {
        &self.action_log
    }

    /// The state history projected onto one seat's view, the raw material
    /// for a persisted training log.
    #[must_use]
    pub fn observable_history(&self, player: PlayerId) -> Vec<ObservableState> {
        self.history.iter().map(|s| s.observable(player)).collect()
    }

    /// Run a single turn: ask the acting agent, apply, notify everyone.
    pub fn step(&mut self) -> Result<(), GameError> {
        let player = self.state.player_taking_action;
        let actions = legal_actions(&self.state);

        let view = self.state.observable(player);
        let action = self.agents[player.index()].choose_action(&view, &actions);
        debug!(%player, %action, "agent chose");

        // `step` re-validates, so a misbehaving agent surfaces as
        // IllegalAction rather than corrupting the state.
        let next = step(&self.state, player, action)?;

        let rewards = next.rewards();
        for seat in PlayerId::all(self.state.player_count()) {
            let transition = GameTransition {
                state: self.state.observable(seat),
                player,
                action,
                reward: rewards[seat.index()],
                next_state: next.observable(seat),
            };
            self.agents[seat.index()].observe(&transition);
        }

        self.action_log.push((player, action));
        self.history.push(next.clone());
        self.state = next;
        Ok(())
    }

    /// Play until the game ends and return the final standings.
    pub fn play(&mut self) -> Result<GameOutcome, GameError> {
        while !self.state.is_done {
            self.step()?;
        }
        let outcome = self
            .state
            .outcome()
            .expect("terminal state always has an outcome");
        info!(
            turns = self.action_log.len(),
            winners = ?outcome.winners,
            durak = ?outcome.durak,
            "game over"
        );
        Ok(outcome)
    }
}
