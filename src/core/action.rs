//! Action representation.
//!
//! Internally an action is a closed sum type - the card it carries (if any)
//! is right there in the variant, so rules code never decodes integers. The
//! dense integer form that external policies consume lives at the codec
//! boundary ([`crate::core::codec::ActionCodec`]).

use serde::{Deserialize, Serialize};

use crate::core::card::Card;

/// One move by one player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    /// Add a card to the attack table.
    Attack(Card),
    /// Beat the leftmost undefended attack card.
    Defend(Card),
    /// Deflect the attack onto the next seat with a same-rank card.
    Pass(Card),
    /// Accept all cards on the table instead of defending further.
    Take,
    /// Signal no further attacks this exchange.
    StopAttacking,
}

impl Action {
    /// The card this action plays, if any.
    #[must_use]
    pub fn card(&self) -> Option<Card> {
        match self {
            Action::Attack(card) | Action::Defend(card) | Action::Pass(card) => Some(*card),
            Action::Take | Action::StopAttacking => None,
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Action::Attack(card) => write!(f, "attack {}", card),
            Action::Defend(card) => write!(f, "defend {}", card),
            Action::Pass(card) => write!(f, "pass {}", card),
            Action::Take => write!(f, "take"),
            Action::StopAttacking => write!(f, "stop attacking"),
        }
    }
}
