//! Round resolution: clearing the table, refilling hands, rotating roles,
//! and detecting the end of the game.
//!
//! A round resolves on one of two paths. A successful defense retires every
//! attack/defense pair to the graveyard and the defender becomes the next
//! attacker. A take hands the whole table to the defender, who is skipped:
//! the seat after them attacks next. Either way, hands refill from the deck
//! to the configured hand size in the order the attackers joined the round,
//! defender last, before roles rotate.

use crate::core::player::PlayerId;
use crate::core::state::{AttackerList, GameState};

/// How an exchange ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Resolution {
    /// Every attack was beaten; the table retires to the graveyard.
    ClearToGraveyard,
    /// The defender takes every card on the table into their hand.
    GiveToDefender,
}

/// Resolve the current exchange and set up the next one.
///
/// Refill order uses the roles as they were when the round ended; the
/// terminal check runs before rotation, since rotating with fewer than two
/// live hands has no valid target.
pub(crate) fn resolve_round(state: &mut GameState, resolution: Resolution) {
    let prev_attackers = state.attackers.clone();
    let prev_defender = state.defender;

    match resolution {
        Resolution::ClearToGraveyard => {
            for &card in state.attack_table.iter().chain(state.defend_table.iter()) {
                state.graveyard.insert(card);
            }
        }
        Resolution::GiveToDefender => {
            let taken: Vec<_> = state
                .defend_table
                .iter()
                .chain(state.attack_table.iter())
                .copied()
                .collect();
            state.hands[prev_defender].extend(taken);
        }
    }
    state.attack_table.clear();
    state.defend_table.clear();

    refill_hands(state, &prev_attackers, prev_defender);

    state.defender_has_taken = false;
    state.stopped_attacking.clear();

    state.update_is_done();
    if state.is_done {
        return;
    }

    // The defender leads the next round after a successful defense, and is
    // skipped after a take.
    let seed = match resolution {
        Resolution::ClearToGraveyard => prev_defender,
        Resolution::GiveToDefender => prev_defender.next(state.player_count()),
    };
    let attacker = next_live_seat(state, seed);
    let defender = next_live_seat(state, attacker.next(state.player_count()));

    state.attackers = AttackerList::from_elem(attacker, 1);
    state.defender = defender;
    state.player_taking_action = attacker;
}

/// Draw from the deck until each listed hand reaches the configured size or
/// the deck runs out. Attackers refill in join order, the defender last.
fn refill_hands(state: &mut GameState, attackers: &[PlayerId], defender: PlayerId) {
    let hand_size = state.config.hand_size;
    for &player in attackers.iter().chain(std::iter::once(&defender)) {
        while state.hands[player].len() < hand_size {
            match state.deck.draw() {
                Some(card) => state.hands[player].push_back(card),
                None => return,
            }
        }
    }
}

/// The first seat at or after `seed` still holding cards. Empty hands are
/// only possible once the deck is exhausted, and the caller has already
/// ruled out the terminal case, so at least two live seats exist.
fn next_live_seat(state: &GameState, seed: PlayerId) -> PlayerId {
    let mut seat = seed;
    while state.hands[seat].is_empty() {
        seat = seat.next(state.player_count());
    }
    seat
}
