//! Action codec: the bidirectional mapping between [`Action`] values and
//! dense integer ids.
//!
//! External policies consume a fixed-size action space, so the codec is a
//! pure function of (kind, suit, rank) and the configured lowest rank -
//! independent of any game state. Two cards with the same (suit, rank)
//! always encode to the same id regardless of which hand they came from.
//!
//! ## Layout
//!
//! With `n = 15 - lowest_rank` ranks per suit and `4n` card slots:
//!
//! ```text
//! [0, 4n)        attack ids
//! [4n, 8n)       defend ids
//! [8n, 12n)      pass ids
//! 12n            take
//! 12n + 1        stop attacking
//! ```
//!
//! Within a block, a card's slot is `suit_index * n + (rank - lowest_rank)`.

use serde::{Deserialize, Serialize};

use crate::core::action::Action;
use crate::core::card::{Card, Suit, ACE_RANK};
use crate::errors::GameError;

/// Encoder/decoder for one `lowest_rank` configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionCodec {
    lowest_rank: u8,
}

impl ActionCodec {
    /// Create a codec for decks whose lowest rank is `lowest_rank`.
    #[must_use]
    pub fn new(lowest_rank: u8) -> Self {
        assert!(
            (2..=13).contains(&lowest_rank),
            "lowest_rank must be in 2..=13"
        );
        Self { lowest_rank }
    }

    /// Ranks per suit in this configuration.
    #[must_use]
    pub fn ranks_per_suit(&self) -> usize {
        (ACE_RANK - self.lowest_rank + 1) as usize
    }

    /// Number of distinct cards (one block of card-carrying ids).
    #[must_use]
    pub fn card_slots(&self) -> usize {
        4 * self.ranks_per_suit()
    }

    /// Total size of the action space.
    #[must_use]
    pub fn num_actions(&self) -> usize {
        3 * self.card_slots() + 2
    }

    /// The id of the take action.
    #[must_use]
    pub fn take_id(&self) -> usize {
        3 * self.card_slots()
    }

    /// The id of the stop-attacking action.
    #[must_use]
    pub fn stop_attacking_id(&self) -> usize {
        3 * self.card_slots() + 1
    }

    fn card_index(&self, card: Card) -> usize {
        debug_assert!(
            (self.lowest_rank..=ACE_RANK).contains(&card.rank),
            "card rank {} outside [{}, {}]",
            card.rank,
            self.lowest_rank,
            ACE_RANK
        );
        card.suit.index() * self.ranks_per_suit() + (card.rank - self.lowest_rank) as usize
    }

    fn card_from_index(&self, index: usize) -> Card {
        let n = self.ranks_per_suit();
        let suit = Suit::ALL[index / n];
        let rank = (index % n) as u8 + self.lowest_rank;
        Card::new(suit, rank)
    }

    /// Map an action to its dense id.
    #[must_use]
    pub fn encode(&self, action: &Action) -> usize {
        let slots = self.card_slots();
        match action {
            Action::Attack(card) => self.card_index(*card),
            Action::Defend(card) => slots + self.card_index(*card),
            Action::Pass(card) => 2 * slots + self.card_index(*card),
            Action::Take => self.take_id(),
            Action::StopAttacking => self.stop_attacking_id(),
        }
    }

    /// Map a dense id back to its action.
    ///
    /// Fails with [`GameError::InvalidActionId`] for ids at or beyond
    /// [`ActionCodec::num_actions`].
    pub fn decode(&self, id: usize) -> Result<Action, GameError> {
        let slots = self.card_slots();
        if id < slots {
            Ok(Action::Attack(self.card_from_index(id)))
        } else if id < 2 * slots {
            Ok(Action::Defend(self.card_from_index(id - slots)))
        } else if id < 3 * slots {
            Ok(Action::Pass(self.card_from_index(id - 2 * slots)))
        } else if id == self.take_id() {
            Ok(Action::Take)
        } else if id == self.stop_attacking_id() {
            Ok(Action::StopAttacking)
        } else {
            Err(GameError::InvalidActionId {
                id,
                num_actions: self.num_actions(),
            })
        }
    }
}
