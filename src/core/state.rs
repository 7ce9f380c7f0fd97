//! Game state: the single source of truth for one game.
//!
//! ## GameState
//!
//! Full-information state, threaded by value through the transition engine.
//! Collections use `im` persistent structures, so cloning a state is O(1)
//! and a full game history can be retained cheaply. No component ever holds
//! a shared mutable reference: `step` takes a state and returns a new one.
//!
//! ## ObservableState
//!
//! The information-restricted projection handed to agents: a player sees
//! their own hand, everything on the table, the trump card, the graveyard,
//! and only the *counts* of other hands and the deck.

use im::{HashSet as ImHashSet, Vector};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::action::Action;
use crate::core::card::{Card, Deck, Suit};
use crate::core::config::GameConfig;
use crate::core::player::{PlayerId, PlayerMap};
use crate::core::rng::GameRng;
use crate::errors::GameError;

/// Ordered list of seats contributing attacks this round. Join order
/// matters: it fixes the refill order and identifies the last attacker for
/// turn re-routing.
pub type AttackerList = SmallVec<[PlayerId; 4]>;

/// Full-information state of one game.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    /// Table parameters this game was created with.
    pub config: GameConfig,

    /// One hand per seat, index = player id.
    pub hands: PlayerMap<Vector<Card>>,

    /// Remaining draw pile.
    pub deck: Deck,

    /// The exposed bottom card; its suit is trump for the whole game.
    pub trump_card: Card,

    /// Cards attacking this exchange, in play order.
    pub attack_table: Vector<Card>,

    /// Cards defending, position i beats `attack_table[i]`.
    pub defend_table: Vector<Card>,

    /// Cards retired after successful defenses.
    pub graveyard: ImHashSet<Card>,

    /// Seats contributing attacks this round, in join order.
    pub attackers: AttackerList,

    /// The seat that must defend or take.
    pub defender: PlayerId,

    /// The seat whose legal actions are currently on offer.
    pub player_taking_action: PlayerId,

    /// True once the defender has declared take; attackers may still add
    /// cards before the round resolves.
    pub defender_has_taken: bool,

    /// Seats that have signaled no further attacks this exchange.
    pub stopped_attacking: FxHashSet<PlayerId>,

    /// Terminal flag; no transitions are legal once set.
    pub is_done: bool,
}

impl GameState {
    /// Deal a new game: build and shuffle the deck from `seed`, deal hands,
    /// expose the trump card, and pick the opening attacker (the seat
    /// holding the lowest trump, or a random seat when no trump was dealt).
    pub fn new(config: GameConfig, seed: u64) -> Result<Self, GameError> {
        assert!(config.player_count >= 2, "Must have at least 2 players");
        assert!(config.hand_size > 0, "Hands must hold at least 1 card");

        let mut rng = GameRng::new(seed);
        let mut deck = Deck::new(config.lowest_rank, &mut rng);
        let (dealt, trump_card) = deck.deal(config.hand_size, config.player_count)?;
        let hands = PlayerMap::new(config.player_count, |p| dealt[p.index()].clone());

        let attacker = initial_attacker(&hands, trump_card.suit, &mut rng);
        let defender = attacker.next(config.player_count);

        Ok(Self {
            config,
            hands,
            deck,
            trump_card,
            attack_table: Vector::new(),
            defend_table: Vector::new(),
            graveyard: ImHashSet::new(),
            attackers: AttackerList::from_elem(attacker, 1),
            defender,
            player_taking_action: attacker,
            defender_has_taken: false,
            stopped_attacking: FxHashSet::default(),
            is_done: false,
        })
    }

    /// Number of seats.
    #[must_use]
    pub fn player_count(&self) -> usize {
        self.config.player_count
    }

    /// The trump suit for this game.
    #[must_use]
    pub fn trump_suit(&self) -> Suit {
        self.trump_card.suit
    }

    /// Attack cards not yet beaten by a defend card.
    #[must_use]
    pub fn num_undefended(&self) -> usize {
        self.attack_table.len() - self.defend_table.len()
    }

    /// A seat's hand.
    #[must_use]
    pub fn hand(&self, player: PlayerId) -> &Vector<Card> {
        &self.hands[player]
    }

    /// Remove one card from a seat's hand.
    ///
    /// Returns false if the card was not there; the caller validates
    /// legality first, so a false return indicates a corrupted fixture.
    pub fn remove_from_hand(&mut self, player: PlayerId, card: Card) -> bool {
        let hand = &mut self.hands[player];
        if let Some(pos) = hand.iter().position(|&c| c == card) {
            hand.remove(pos);
            true
        } else {
            false
        }
    }

    /// The most recent seat to join the attack.
    #[must_use]
    pub fn last_attacker(&self) -> PlayerId {
        // attackers is never empty: rotation always seeds the next round's
        // opener.
        *self.attackers.last().expect("attackers list is never empty")
    }

    /// Attackers that still hold cards.
    #[must_use]
    pub fn attackers_with_cards(&self) -> AttackerList {
        self.attackers
            .iter()
            .copied()
            .filter(|&p| !self.hands[p].is_empty())
            .collect()
    }

    /// Whether every attacker still holding cards has signaled stop.
    #[must_use]
    pub fn all_attackers_stopped(&self) -> bool {
        self.attackers_with_cards()
            .iter()
            .all(|p| self.stopped_attacking.contains(p))
    }

    /// Seats still holding cards.
    #[must_use]
    pub fn seats_with_cards(&self) -> usize {
        self.hands.iter().filter(|(_, h)| !h.is_empty()).count()
    }

    /// Re-evaluate the terminal condition: the deck is exhausted and at
    /// most one seat still holds cards.
    pub fn update_is_done(&mut self) {
        if self.deck.is_empty() && self.seats_with_cards() <= 1 {
            self.is_done = true;
        }
    }

    /// Total number of cards across hands, deck, tables, and graveyard.
    ///
    /// Constant for the whole game; the conservation property tests check
    /// this after every transition.
    #[must_use]
    pub fn total_cards(&self) -> usize {
        let in_hands: usize = self.hands.iter().map(|(_, h)| h.len()).sum();
        in_hands
            + self.deck.len()
            + self.attack_table.len()
            + self.defend_table.len()
            + self.graveyard.len()
    }

    /// Project this state onto what `player` is allowed to see.
    #[must_use]
    pub fn observable(&self, player: PlayerId) -> ObservableState {
        ObservableState {
            player_id: player,
            hand: self.hands[player].clone(),
            trump_card: self.trump_card,
            attack_table: self.attack_table.clone(),
            defend_table: self.defend_table.clone(),
            deck_count: self.deck.len(),
            hand_counts: self.hands.iter().map(|(_, h)| h.len()).collect(),
            graveyard: self.graveyard.clone(),
            attackers: self.attackers.clone(),
            defender: self.defender,
            player_taking_action: self.player_taking_action,
            defender_has_taken: self.defender_has_taken,
            stopped_attacking: self.stopped_attacking.clone(),
            lowest_rank: self.config.lowest_rank,
            is_done: self.is_done,
        }
    }

    /// The reward signal: all zeros until terminal, then +1 for every
    /// empty-handed seat and -1 for the seat left holding cards.
    #[must_use]
    pub fn rewards(&self) -> Vec<f32> {
        if !self.is_done {
            return vec![0.0; self.player_count()];
        }
        self.hands
            .iter()
            .map(|(_, h)| if h.is_empty() { 1.0 } else { -1.0 })
            .collect()
    }

    /// Final standings, or `None` while the game is running.
    #[must_use]
    pub fn outcome(&self) -> Option<GameOutcome> {
        if !self.is_done {
            return None;
        }
        let winners: Vec<PlayerId> = self
            .hands
            .iter()
            .filter(|(_, h)| h.is_empty())
            .map(|(p, _)| p)
            .collect();
        let durak = self
            .hands
            .iter()
            .find(|(_, h)| !h.is_empty())
            .map(|(p, _)| p);
        Some(GameOutcome {
            rewards: self.rewards(),
            winners,
            durak,
        })
    }
}

/// The seat holding the lowest trump opens the game; with no trump dealt,
/// a random seat does.
fn initial_attacker(
    hands: &PlayerMap<Vector<Card>>,
    trump: Suit,
    rng: &mut GameRng,
) -> PlayerId {
    hands
        .iter()
        .flat_map(|(p, hand)| {
            hand.iter()
                .filter(|c| c.suit == trump)
                .map(move |c| (c.rank, p))
        })
        .min()
        .map(|(_, p)| p)
        .unwrap_or_else(|| PlayerId::new(rng.gen_range(0..hands.player_count()) as u8))
}

/// What one seat is allowed to see of a [`GameState`].
///
/// Hidden information is reduced to counts: other hands and the deck appear
/// only as sizes. Everything else here is public knowledge at the table.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ObservableState {
    /// Whose view this is.
    pub player_id: PlayerId,
    /// This seat's own hand.
    pub hand: Vector<Card>,
    pub trump_card: Card,
    pub attack_table: Vector<Card>,
    pub defend_table: Vector<Card>,
    /// Cards left in the deck.
    pub deck_count: usize,
    /// Hand sizes for every seat (including this one).
    pub hand_counts: Vec<usize>,
    pub graveyard: ImHashSet<Card>,
    pub attackers: AttackerList,
    pub defender: PlayerId,
    pub player_taking_action: PlayerId,
    pub defender_has_taken: bool,
    pub stopped_attacking: FxHashSet<PlayerId>,
    pub lowest_rank: u8,
    pub is_done: bool,
}

impl ObservableState {
    /// The trump suit for this game.
    #[must_use]
    pub fn trump_suit(&self) -> Suit {
        self.trump_card.suit
    }
}

/// One step of a game as seen by one seat: the transition record delivered
/// to every agent's `observe` hook and sufficient to reconstruct that
/// seat's information state for training.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameTransition {
    /// The observing seat's view before the action.
    pub state: ObservableState,
    /// Who acted.
    pub player: PlayerId,
    /// The action taken.
    pub action: Action,
    /// Reward for the observing seat in the resulting state.
    pub reward: f32,
    /// The observing seat's view after the action.
    pub next_state: ObservableState,
}

/// Final standings of a finished game.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameOutcome {
    /// Per-seat terminal rewards.
    pub rewards: Vec<f32>,
    /// Seats that emptied their hands. Simultaneous finishes are all
    /// winners.
    pub winners: Vec<PlayerId>,
    /// The seat left holding cards, or `None` on an all-empty tie.
    pub durak: Option<PlayerId>,
}
