//! Game configuration.
//!
//! A [`GameConfig`] fixes the table parameters for one game: seat count,
//! the lowest rank in the deck, and the refill target for hands. The same
//! config can be reused across many seeded games, which keeps the action
//! space fixed for external policies.

use serde::{Deserialize, Serialize};

/// Table parameters for one game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Number of seats.
    pub player_count: usize,

    /// Lowest rank in the deck; the deck holds all suit x rank combinations
    /// in `[lowest_rank, 14]`. 6 gives the standard 36-card game.
    pub lowest_rank: u8,

    /// Hands are dealt and refilled up to this size.
    pub hand_size: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            player_count: 3,
            lowest_rank: 6,
            hand_size: 6,
        }
    }
}

impl GameConfig {
    /// Create a config with the default 36-card deck and 6-card hands.
    #[must_use]
    pub fn new(player_count: usize) -> Self {
        Self {
            player_count,
            ..Self::default()
        }
    }

    /// Set the lowest rank in the deck.
    #[must_use]
    pub fn with_lowest_rank(mut self, lowest_rank: u8) -> Self {
        self.lowest_rank = lowest_rank;
        self
    }

    /// Set the hand refill target.
    #[must_use]
    pub fn with_hand_size(mut self, hand_size: usize) -> Self {
        self.hand_size = hand_size;
        self
    }

    /// Total number of cards in this configuration's deck.
    #[must_use]
    pub fn deck_size(&self) -> usize {
        4 * (15 - self.lowest_rank as usize)
    }
}
