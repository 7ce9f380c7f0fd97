//! Legal-action enumeration.
//!
//! ## Rules
//!
//! The acting seat is either the defender or an attacker.
//!
//! Defender: `Take` is always on offer; any hand card beating the leftmost
//! undefended attack is a `Defend`; `Pass` only before any defense has been
//! played, with a rank-matching card, and only when the seat that would
//! inherit the defense can still cover the grown attack.
//!
//! Attacker: with an empty table, any hand card opens the attack (stopping
//! is not an option). Afterwards `StopAttacking` is always on offer, and
//! rank-matching cards may be added while the table has room and the
//! defender holds more cards than the undefended count. A seat that is
//! neither defender nor a current attacker may only `StopAttacking`.

use rustc_hash::FxHashSet;

use crate::core::action::Action;
use crate::core::state::GameState;
use crate::rules::MAX_TABLE_ATTACKS;

/// Enumerate every action the acting seat may take. Empty once the game
/// is over.
#[must_use]
pub fn legal_actions(state: &GameState) -> Vec<Action> {
    if state.is_done {
        return Vec::new();
    }
    if state.player_taking_action == state.defender {
        defender_actions(state)
    } else {
        attacker_actions(state)
    }
}

fn defender_actions(state: &GameState) -> Vec<Action> {
    let mut actions = vec![Action::Take];
    let hand = state.hand(state.defender);

    // The defender only acts while an attack is open, but don't panic on a
    // hand-built state that says otherwise.
    let Some(&attack) = state.attack_table.get(state.defend_table.len()) else {
        return actions;
    };

    let trump = state.trump_suit();
    actions.extend(
        hand.iter()
            .filter(|d| d.beats(attack, trump))
            .map(|&d| Action::Defend(d)),
    );

    if state.defend_table.is_empty() {
        let next_defender = state.defender.next(state.player_count());
        if state.hand(next_defender).len() >= state.attack_table.len() + 1 {
            actions.extend(
                hand.iter()
                    .filter(|c| c.rank == attack.rank)
                    .map(|&c| Action::Pass(c)),
            );
        }
    }

    actions
}

fn attacker_actions(state: &GameState) -> Vec<Action> {
    let actor = state.player_taking_action;
    let hand = state.hand(actor);

    if state.attack_table.is_empty() {
        // Opening attack: any card, and the attacker may not decline.
        return hand.iter().map(|&c| Action::Attack(c)).collect();
    }

    let mut actions = vec![Action::StopAttacking];
    if !state.attackers.contains(&actor) {
        return actions;
    }
    if state.attack_table.len() >= MAX_TABLE_ATTACKS
        || state.hand(state.defender).len() <= state.num_undefended()
    {
        return actions;
    }

    let table_ranks: FxHashSet<u8> = state
        .attack_table
        .iter()
        .chain(state.defend_table.iter())
        .map(|c| c.rank)
        .collect();
    actions.extend(
        hand.iter()
            .filter(|c| table_ranks.contains(&c.rank))
            .map(|&c| Action::Attack(c)),
    );
    actions
}
