//! Card identity and deck construction.
//!
//! A [`Card`] is an immutable (suit, rank) pair with no built-in trump
//! knowledge - trump is contextual, determined by the trump card of the
//! current game. The [`Deck`] is built once per game from all suit x rank
//! combinations in `[lowest_rank, 14]`, shuffled with an injected
//! [`GameRng`], and dealt round-robin. The bottom card stays in the deck as
//! the trump card and is the last card drawn during refills.

use im::Vector;
use serde::{Deserialize, Serialize};

use crate::core::rng::GameRng;
use crate::errors::GameError;

/// Highest rank in any deck (ace).
pub const ACE_RANK: u8 = 14;

/// The suit of a [`Card`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Suit {
    #[serde(rename = "S")]
    Spades,
    #[serde(rename = "H")]
    Hearts,
    #[serde(rename = "D")]
    Diamonds,
    #[serde(rename = "C")]
    Clubs,
}

impl Suit {
    /// All suits, in codec index order.
    pub const ALL: [Suit; 4] = [Suit::Spades, Suit::Hearts, Suit::Diamonds, Suit::Clubs];

    /// Position of this suit within [`Suit::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }
}

impl std::fmt::Display for Suit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let symbol = match self {
            Suit::Spades => '♠',
            Suit::Hearts => '♥',
            Suit::Diamonds => '♦',
            Suit::Clubs => '♣',
        };
        write!(f, "{}", symbol)
    }
}

/// A playing card: an immutable (suit, rank) pair.
///
/// Ranks are numeric: 2-10 face value, 11 jack, 12 queen, 13 king,
/// 14 ace. Equality and ordering are by (suit, rank).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Card {
    pub suit: Suit,
    pub rank: u8,
}

impl Card {
    /// Create a new card.
    #[must_use]
    pub const fn new(suit: Suit, rank: u8) -> Self {
        Self { suit, rank }
    }

    /// Whether this card beats `attack` as a defense, given the trump suit.
    ///
    /// A card beats a same-suit card of lower rank, and any trump beats any
    /// non-trump card.
    #[must_use]
    pub fn beats(self, attack: Card, trump: Suit) -> bool {
        (self.suit == attack.suit && self.rank > attack.rank)
            || (self.suit == trump && attack.suit != trump)
    }
}

impl std::fmt::Display for Card {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.rank {
            11 => write!(f, "J{}", self.suit),
            12 => write!(f, "Q{}", self.suit),
            13 => write!(f, "K{}", self.suit),
            14 => write!(f, "A{}", self.suit),
            r => write!(f, "{}{}", r, self.suit),
        }
    }
}

/// The draw pile: an ordered sequence of cards, shuffled once at game start.
///
/// Cards are drawn from the top (the end of the sequence). The bottom card
/// (`front`) is exposed as the trump card at deal time and re-enters
/// circulation as the final draw.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deck {
    cards: Vector<Card>,
}

impl Deck {
    /// Build a full deck of all suit x rank combinations for ranks in
    /// `[lowest_rank, 14]`, shuffled in place with the supplied RNG.
    #[must_use]
    pub fn new(lowest_rank: u8, rng: &mut GameRng) -> Self {
        assert!(
            (2..=13).contains(&lowest_rank),
            "lowest_rank must be in 2..=13"
        );

        let mut cards: Vec<Card> = Suit::ALL
            .iter()
            .flat_map(|&suit| (lowest_rank..=ACE_RANK).map(move |rank| Card::new(suit, rank)))
            .collect();
        rng.shuffle(&mut cards);

        Self {
            cards: cards.into_iter().collect(),
        }
    }

    /// Build a deck from an explicit card order (bottom first). Test fixtures
    /// and history reconstruction use this; normal games go through
    /// [`Deck::new`].
    #[must_use]
    pub fn from_cards(cards: impl IntoIterator<Item = Card>) -> Self {
        Self {
            cards: cards.into_iter().collect(),
        }
    }

    /// Number of cards remaining.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Whether the deck is exhausted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// The bottom card, which determines the trump suit. `None` once the
    /// deck is exhausted.
    #[must_use]
    pub fn bottom_card(&self) -> Option<Card> {
        self.cards.front().copied()
    }

    /// Draw the top card, if any.
    pub fn draw(&mut self) -> Option<Card> {
        self.cards.pop_back()
    }

    /// Iterate the remaining cards, bottom first.
    pub fn iter(&self) -> impl Iterator<Item = &Card> {
        self.cards.iter()
    }

    /// Deal `hand_size` cards to each of `num_players` hands in round-robin
    /// order, then expose the bottom card as the trump card without removing
    /// it.
    ///
    /// Fails with [`GameError::InsufficientCards`] if dealing would leave no
    /// trump card in the deck.
    pub fn deal(
        &mut self,
        hand_size: usize,
        num_players: usize,
    ) -> Result<(Vec<Vector<Card>>, Card), GameError> {
        let requested = hand_size * num_players;
        if requested >= self.cards.len() {
            return Err(GameError::InsufficientCards {
                requested,
                available: self.cards.len(),
            });
        }

        let mut hands = vec![Vector::new(); num_players];
        for _ in 0..hand_size {
            for hand in hands.iter_mut() {
                // Guarded by the size check above.
                if let Some(card) = self.draw() {
                    hand.push_back(card);
                }
            }
        }

        let trump_card = self.bottom_card().ok_or(GameError::InsufficientCards {
            requested,
            available: 0,
        })?;
        Ok((hands, trump_card))
    }
}
