//! The transition engine: apply one action to a state.
//!
//! ## Contract
//!
//! [`step`] validates the actor and the action against
//! [`legal_actions`](crate::rules::legal_actions) before touching anything,
//! then produces a fresh state; the input state is never mutated, so a
//! failed step leaves the caller exactly where they were. Round resolution
//! (table clearing, refills, rotation, the terminal check) is delegated to
//! [`round`](crate::rules::round).
//!
//! ## Turn routing
//!
//! Most of the subtlety is in deciding who acts next. An attack routes to
//! the defender once they must respond (their hand can only just cover the
//! undefended cards, or the attacker ran out of cards); a defense that
//! levels the tables routes back to the last attacker; a stop signal walks
//! the defender's neighbors looking for a seat that may still act.

use crate::core::action::Action;
use crate::core::card::Card;
use crate::core::player::PlayerId;
use crate::core::state::GameState;
use crate::errors::GameError;
use crate::rules::legal::legal_actions;
use crate::rules::round::{resolve_round, Resolution};
use crate::rules::MAX_TABLE_ATTACKS;

/// Apply `action` for `player`, returning the successor state.
///
/// Fails with [`GameError::IllegalAction`] when it is not `player`'s turn,
/// the game is over, or the action is not currently legal. Fails with
/// [`GameError::NoEligibleActor`] when a stop signal leaves no seat that
/// can act (only reachable with attackers that are not the defender's
/// neighbors).
pub fn step(state: &GameState, player: PlayerId, action: Action) -> Result<GameState, GameError> {
    if state.is_done
        || player != state.player_taking_action
        || !legal_actions(state).contains(&action)
    {
        return Err(GameError::IllegalAction { player, action });
    }

    let mut next = state.clone();
    match action {
        Action::Attack(card) => apply_attack(&mut next, player, card),
        Action::Defend(card) => apply_defend(&mut next, player, card),
        Action::Pass(card) => apply_pass(&mut next, player, card),
        Action::Take => apply_take(&mut next),
        Action::StopAttacking => apply_stop(&mut next, player)?,
    }
    // A hand emptied mid-exchange can end the game with cards still on the
    // table.
    next.update_is_done();
    Ok(next)
}

fn apply_attack(state: &mut GameState, actor: PlayerId, card: Card) {
    // A fresh card voids prior stop signals, unless the defender already
    // committed to taking.
    if !state.defender_has_taken {
        state.stopped_attacking.clear();
    }
    if !state.attackers.contains(&actor) {
        state.attackers.push(actor);
    }
    let removed = state.remove_from_hand(actor, card);
    debug_assert!(removed, "legal attack card must come from the hand");
    state.attack_table.push_back(card);

    if state.hand(state.defender).len() == state.num_undefended()
        || state.hand(actor).is_empty()
    {
        state.player_taking_action = state.defender;
    }
}

fn apply_defend(state: &mut GameState, actor: PlayerId, card: Card) {
    state.stopped_attacking.clear();
    let removed = state.remove_from_hand(actor, card);
    debug_assert!(removed, "legal defend card must come from the hand");
    state.defend_table.push_back(card);

    if state.num_undefended() > 0 {
        // More open attacks: the defender keeps acting.
        return;
    }
    if state.attack_table.len() == MAX_TABLE_ATTACKS || state.hand(actor).is_empty() {
        // Nothing more can be thrown in: the defense stands.
        resolve_round(state, Resolution::ClearToGraveyard);
    } else {
        state.player_taking_action = state.last_attacker();
    }
}

fn apply_pass(state: &mut GameState, actor: PlayerId, card: Card) {
    state.stopped_attacking.clear();
    let removed = state.remove_from_hand(actor, card);
    debug_assert!(removed, "legal pass card must come from the hand");
    state.attack_table.push_back(card);

    if !state.attackers.contains(&actor) {
        state.attackers.push(actor);
    }
    let new_defender = actor.next(state.player_count());
    state.defender = new_defender;
    if let Some(pos) = state.attackers.iter().position(|&p| p == new_defender) {
        state.attackers.remove(pos);
    }

    if state.hand(actor).is_empty() {
        state.player_taking_action = new_defender;
    }
}

fn apply_take(state: &mut GameState) {
    if !state.defender_has_taken {
        state.defender_has_taken = true;
        state.stopped_attacking.clear();
    }
    // All-stopped is vacuously true when no attacker holds cards.
    if state.all_attackers_stopped()
        || state.hand(state.defender).len() == state.num_undefended()
    {
        resolve_round(state, Resolution::GiveToDefender);
    } else {
        state.player_taking_action = state.last_attacker();
    }
}

fn apply_stop(state: &mut GameState, actor: PlayerId) -> Result<(), GameError> {
    state.stopped_attacking.insert(actor);

    if state.num_undefended() > 0 {
        if !state.defender_has_taken {
            // The open card still needs a response.
            state.player_taking_action = state.defender;
        } else if state.all_attackers_stopped() {
            resolve_round(state, Resolution::GiveToDefender);
        } else if let Some(next) = eligible_neighbor(state) {
            state.player_taking_action = next;
        } else if !state.stopped_attacking.contains(&state.last_attacker()) {
            // The remaining attacker is the last to have played; re-offer
            // take to the defender, which re-routes to them.
            state.player_taking_action = state.defender;
        } else {
            // Pending attackers exist but none can be reached.
            return Err(GameError::NoEligibleActor);
        }
    } else if state.all_attackers_stopped() {
        resolve_round(state, Resolution::ClearToGraveyard);
    } else if let Some(next) = eligible_neighbor(state) {
        if !state.attackers.contains(&next) {
            state.attackers.push(next);
        }
        state.player_taking_action = next;
    } else {
        // Fully defended, a non-neighbor attacker is still pending, and
        // the defender has nothing left to answer.
        return Err(GameError::NoEligibleActor);
    }
    Ok(())
}

/// The defender's neighbors in `[defender + 1, defender - 1]` order,
/// skipping the last attacker, seats that already stopped, and empty hands
/// once the deck is dry.
fn eligible_neighbor(state: &GameState) -> Option<PlayerId> {
    let n = state.player_count();
    [state.defender.next(n), state.defender.prev(n)]
        .into_iter()
        .find(|&p| {
            p != state.last_attacker()
                && !state.stopped_attacking.contains(&p)
                && (!state.deck.is_empty() || !state.hand(p).is_empty())
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::card::{Deck, Suit};
    use crate::core::config::GameConfig;
    use crate::core::player::PlayerMap;
    use crate::core::state::AttackerList;
    use im::Vector;
    use rustc_hash::FxHashSet;

    fn card(suit: Suit, rank: u8) -> Card {
        Card::new(suit, rank)
    }

    fn fixture(hands: [Vec<Card>; 3], attacker: u8) -> GameState {
        let attacker = PlayerId::new(attacker);
        let hands = PlayerMap::new(3, |p| hands[p.index()].iter().copied().collect());
        GameState {
            config: GameConfig::default(),
            hands,
            deck: Deck::from_cards([]),
            trump_card: card(Suit::Spades, 9),
            attack_table: Vector::new(),
            defend_table: Vector::new(),
            graveyard: im::HashSet::new(),
            attackers: AttackerList::from_elem(attacker, 1),
            defender: attacker.next(3),
            player_taking_action: attacker,
            defender_has_taken: false,
            stopped_attacking: FxHashSet::default(),
            is_done: false,
        }
    }

    #[test]
    fn test_step_rejects_wrong_actor() {
        let state = fixture(
            [
                vec![card(Suit::Hearts, 6)],
                vec![card(Suit::Hearts, 7)],
                vec![card(Suit::Hearts, 8)],
            ],
            0,
        );

        let err = step(&state, PlayerId::new(2), Action::Attack(card(Suit::Hearts, 8)));
        assert_eq!(
            err.unwrap_err(),
            GameError::IllegalAction {
                player: PlayerId::new(2),
                action: Action::Attack(card(Suit::Hearts, 8)),
            }
        );
    }

    #[test]
    fn test_step_rejects_illegal_action_without_mutating() {
        let state = fixture(
            [
                vec![card(Suit::Hearts, 6)],
                vec![card(Suit::Hearts, 7)],
                vec![card(Suit::Hearts, 8)],
            ],
            0,
        );
        let before = state.clone();

        // Seat 0 holds no H8.
        let err = step(&state, PlayerId::new(0), Action::Attack(card(Suit::Hearts, 8)));
        assert!(matches!(err, Err(GameError::IllegalAction { .. })));
        assert_eq!(state, before);
    }

    #[test]
    fn test_attack_routes_to_cornered_defender() {
        // Defender holds one card; a single attack already consumes all of
        // their capacity.
        let state = fixture(
            [
                vec![card(Suit::Hearts, 6), card(Suit::Clubs, 6)],
                vec![card(Suit::Hearts, 7)],
                vec![card(Suit::Hearts, 8)],
            ],
            0,
        );

        let next = step(&state, PlayerId::new(0), Action::Attack(card(Suit::Hearts, 6))).unwrap();

        assert_eq!(next.attack_table, Vector::from_iter([card(Suit::Hearts, 6)]));
        assert_eq!(next.player_taking_action, PlayerId::new(1));
        assert_eq!(next.hands[PlayerId::new(0)].len(), 1);
    }

    #[test]
    fn test_attack_keeps_turn_while_defender_has_slack() {
        let state = fixture(
            [
                vec![card(Suit::Hearts, 6), card(Suit::Clubs, 6)],
                vec![card(Suit::Hearts, 7), card(Suit::Clubs, 9)],
                vec![card(Suit::Hearts, 8)],
            ],
            0,
        );

        let next = step(&state, PlayerId::new(0), Action::Attack(card(Suit::Hearts, 6))).unwrap();

        // Defender has 2 cards against 1 undefended: attacker may pile on.
        assert_eq!(next.player_taking_action, PlayerId::new(0));
    }

    #[test]
    fn test_level_defense_routes_to_last_attacker() {
        let mut state = fixture(
            [
                vec![card(Suit::Hearts, 6), card(Suit::Clubs, 6)],
                vec![card(Suit::Hearts, 7), card(Suit::Clubs, 9)],
                vec![card(Suit::Hearts, 8)],
            ],
            0,
        );
        state.attack_table.push_back(card(Suit::Hearts, 6));
        state.hands[PlayerId::new(0)] =
            Vector::from_iter([card(Suit::Clubs, 6)]);
        state.player_taking_action = PlayerId::new(1);

        let next = step(&state, PlayerId::new(1), Action::Defend(card(Suit::Hearts, 7))).unwrap();

        assert_eq!(next.defend_table, Vector::from_iter([card(Suit::Hearts, 7)]));
        assert_eq!(next.player_taking_action, PlayerId::new(0));
    }

    #[test]
    fn test_defense_with_last_card_resolves_round() {
        let mut state = fixture(
            [
                vec![card(Suit::Hearts, 6), card(Suit::Clubs, 6)],
                vec![card(Suit::Hearts, 7)],
                vec![card(Suit::Hearts, 8)],
            ],
            0,
        );
        state.attack_table.push_back(card(Suit::Hearts, 6));
        state.hands[PlayerId::new(0)] = Vector::from_iter([card(Suit::Clubs, 6)]);
        state.player_taking_action = PlayerId::new(1);

        let next = step(&state, PlayerId::new(1), Action::Defend(card(Suit::Hearts, 7))).unwrap();

        // Defender emptied their hand: the round stands, pair retired.
        assert!(next.attack_table.is_empty());
        assert!(next.graveyard.contains(&card(Suit::Hearts, 6)));
        assert!(next.graveyard.contains(&card(Suit::Hearts, 7)));
        // Deck empty, seats 0 and 2 still hold cards: game continues, and
        // the empty-handed ex-defender is skipped for the lead.
        assert!(!next.is_done);
        assert_eq!(next.player_taking_action, PlayerId::new(2));
    }

    #[test]
    fn test_pass_rotates_defense() {
        let mut state = fixture(
            [
                vec![card(Suit::Hearts, 6), card(Suit::Clubs, 6)],
                vec![card(Suit::Diamonds, 6), card(Suit::Clubs, 9)],
                vec![card(Suit::Hearts, 8), card(Suit::Clubs, 12), card(Suit::Clubs, 13)],
            ],
            0,
        );
        state.attack_table.push_back(card(Suit::Hearts, 6));
        state.hands[PlayerId::new(0)] = Vector::from_iter([card(Suit::Clubs, 6)]);
        state.player_taking_action = PlayerId::new(1);

        let next = step(&state, PlayerId::new(1), Action::Pass(card(Suit::Diamonds, 6))).unwrap();

        assert_eq!(next.defender, PlayerId::new(2));
        assert!(next.attackers.contains(&PlayerId::new(1)));
        assert_eq!(next.attack_table.len(), 2);
        // Passer still holds a card and keeps the turn as an attacker.
        assert_eq!(next.player_taking_action, PlayerId::new(1));
    }

    #[test]
    fn test_pass_with_last_card_routes_to_new_defender() {
        let mut state = fixture(
            [
                vec![card(Suit::Hearts, 6), card(Suit::Clubs, 6)],
                vec![card(Suit::Diamonds, 6)],
                vec![card(Suit::Hearts, 8), card(Suit::Clubs, 12), card(Suit::Clubs, 13)],
            ],
            0,
        );
        state.attack_table.push_back(card(Suit::Hearts, 6));
        state.hands[PlayerId::new(0)] = Vector::from_iter([card(Suit::Clubs, 6)]);
        state.player_taking_action = PlayerId::new(1);

        let next = step(&state, PlayerId::new(1), Action::Pass(card(Suit::Diamonds, 6))).unwrap();

        assert_eq!(next.defender, PlayerId::new(2));
        assert_eq!(next.player_taking_action, PlayerId::new(2));
    }

    #[test]
    fn test_pass_removes_new_defender_from_attackers() {
        // Seat 0 attacked, seat 1 passes; with 2 seats the roles swap.
        let attacker = PlayerId::new(0);
        let hands = PlayerMap::new(2, |p| {
            if p == attacker {
                Vector::from_iter([card(Suit::Clubs, 9), card(Suit::Hearts, 9)])
            } else {
                Vector::from_iter([card(Suit::Diamonds, 6), card(Suit::Clubs, 12), card(Suit::Clubs, 13)])
            }
        });
        let state = GameState {
            config: GameConfig::new(2),
            hands,
            deck: Deck::from_cards([]),
            trump_card: card(Suit::Spades, 9),
            attack_table: Vector::from_iter([card(Suit::Hearts, 6)]),
            defend_table: Vector::new(),
            graveyard: im::HashSet::new(),
            attackers: AttackerList::from_elem(attacker, 1),
            defender: PlayerId::new(1),
            player_taking_action: PlayerId::new(1),
            defender_has_taken: false,
            stopped_attacking: FxHashSet::default(),
            is_done: false,
        };

        let next = step(&state, PlayerId::new(1), Action::Pass(card(Suit::Diamonds, 6))).unwrap();

        assert_eq!(next.defender, PlayerId::new(0));
        assert_eq!(next.attackers.as_slice(), &[PlayerId::new(1)]);
    }

    #[test]
    fn test_take_with_no_slack_resolves_immediately() {
        let mut state = fixture(
            [
                vec![card(Suit::Hearts, 6), card(Suit::Clubs, 6)],
                vec![card(Suit::Hearts, 7)],
                vec![card(Suit::Hearts, 8)],
            ],
            0,
        );
        state.attack_table.push_back(card(Suit::Hearts, 6));
        state.hands[PlayerId::new(0)] = Vector::from_iter([card(Suit::Clubs, 6)]);
        state.player_taking_action = PlayerId::new(1);

        let next = step(&state, PlayerId::new(1), Action::Take).unwrap();

        // One undefended card against a one-card hand: nothing can be
        // added, the defender takes at once and is skipped for the lead.
        let hand = &next.hands[PlayerId::new(1)];
        assert_eq!(hand.len(), 2);
        assert!(hand.contains(&card(Suit::Hearts, 6)));
        assert!(!next.defender_has_taken);
        assert_eq!(next.player_taking_action, PlayerId::new(2));
        assert_eq!(next.defender, PlayerId::new(0));
    }

    #[test]
    fn test_take_with_slack_routes_to_last_attacker() {
        let mut state = fixture(
            [
                vec![card(Suit::Hearts, 6), card(Suit::Clubs, 6)],
                vec![card(Suit::Hearts, 7), card(Suit::Clubs, 9)],
                vec![card(Suit::Hearts, 8)],
            ],
            0,
        );
        state.attack_table.push_back(card(Suit::Hearts, 6));
        state.hands[PlayerId::new(0)] = Vector::from_iter([card(Suit::Clubs, 6)]);
        state.player_taking_action = PlayerId::new(1);

        let next = step(&state, PlayerId::new(1), Action::Take).unwrap();

        assert!(next.defender_has_taken);
        assert_eq!(next.attack_table.len(), 1);
        assert_eq!(next.player_taking_action, PlayerId::new(0));
    }

    #[test]
    fn test_stop_after_take_resolves_give() {
        let mut state = fixture(
            [
                vec![card(Suit::Hearts, 6), card(Suit::Clubs, 6)],
                vec![card(Suit::Hearts, 7), card(Suit::Clubs, 9)],
                vec![],
            ],
            0,
        );
        state.attack_table.push_back(card(Suit::Hearts, 6));
        state.hands[PlayerId::new(0)] = Vector::from_iter([card(Suit::Clubs, 6)]);
        state.defender_has_taken = true;

        let next = step(&state, PlayerId::new(0), Action::StopAttacking).unwrap();

        // Sole attacker with cards stopped: the defender takes the table.
        let hand = &next.hands[PlayerId::new(1)];
        assert_eq!(hand.len(), 3);
        assert!(hand.contains(&card(Suit::Hearts, 6)));
    }

    #[test]
    fn test_stop_without_take_routes_to_defender() {
        let mut state = fixture(
            [
                vec![card(Suit::Hearts, 6), card(Suit::Clubs, 6)],
                vec![card(Suit::Hearts, 7), card(Suit::Clubs, 9)],
                vec![card(Suit::Hearts, 8)],
            ],
            0,
        );
        state.attack_table.push_back(card(Suit::Hearts, 6));
        state.hands[PlayerId::new(0)] = Vector::from_iter([card(Suit::Clubs, 6)]);

        let next = step(&state, PlayerId::new(0), Action::StopAttacking).unwrap();

        assert_eq!(next.player_taking_action, PlayerId::new(1));
        assert!(next.stopped_attacking.contains(&PlayerId::new(0)));
    }

    #[test]
    fn test_stop_on_defended_table_walks_neighbors_then_clears() {
        // Seat 2 opened with D7, seat 0 threw in H6, the defender beat
        // both; the turn came back to seat 0, the last attacker.
        let mut state = fixture(
            [
                vec![card(Suit::Clubs, 6)],
                vec![card(Suit::Clubs, 9)],
                vec![card(Suit::Diamonds, 9)],
            ],
            0,
        );
        state.attack_table.extend([card(Suit::Diamonds, 7), card(Suit::Hearts, 6)]);
        state.defend_table.extend([card(Suit::Diamonds, 8), card(Suit::Hearts, 7)]);
        state.attackers = AttackerList::from_iter([PlayerId::new(2), PlayerId::new(0)]);

        // Seat 0 stops; seat 2 still has cards and has not stopped, so it
        // is consulted next.
        let next = step(&state, PlayerId::new(0), Action::StopAttacking).unwrap();
        assert_eq!(next.player_taking_action, PlayerId::new(2));

        // Seat 2 stops too: every attacker has stopped, the table clears.
        let after = step(&next, PlayerId::new(2), Action::StopAttacking).unwrap();
        assert!(after.attack_table.is_empty());
        assert!(after.graveyard.contains(&card(Suit::Diamonds, 7)));
        assert!(after.graveyard.contains(&card(Suit::Hearts, 7)));
        assert!(!after.is_done);
        // Successful defense: the ex-defender leads the next round.
        assert_eq!(after.player_taking_action, PlayerId::new(1));
    }

    #[test]
    fn test_stop_surfaces_no_eligible_actor() {
        // Four seats. Seat 3 passed its way out of defense earlier and is
        // now an attacker sitting opposite the defender: when both
        // neighbors are spoken for, nobody can be routed to.
        let hands = [
            vec![card(Suit::Clubs, 6)],
            vec![card(Suit::Clubs, 9)],
            vec![card(Suit::Diamonds, 9)],
            vec![card(Suit::Clubs, 13)],
        ];
        let state = GameState {
            config: GameConfig::new(4),
            hands: PlayerMap::new(4, |p| hands[p.index()].iter().copied().collect()),
            deck: Deck::from_cards([]),
            trump_card: card(Suit::Spades, 9),
            attack_table: Vector::from_iter([card(Suit::Diamonds, 7)]),
            defend_table: Vector::from_iter([card(Suit::Diamonds, 8)]),
            graveyard: im::HashSet::new(),
            attackers: AttackerList::from_iter([PlayerId::new(3), PlayerId::new(0)]),
            defender: PlayerId::new(1),
            player_taking_action: PlayerId::new(2),
            defender_has_taken: false,
            stopped_attacking: FxHashSet::default(),
            is_done: false,
        };
        // Neighbors of the defender are seats 2 (just stopped) and 0 (the
        // last attacker); seat 3 still pends but cannot be reached.
        let err = step(&state, PlayerId::new(2), Action::StopAttacking);
        assert_eq!(err.unwrap_err(), GameError::NoEligibleActor);
    }

    #[test]
    fn test_game_ends_when_attack_empties_second_to_last_hand() {
        let mut state = fixture(
            [
                vec![],
                vec![card(Suit::Spades, 7), card(Suit::Spades, 6)],
                vec![card(Suit::Hearts, 7)],
            ],
            2,
        );
        state.defender = PlayerId::new(1);
        state.attackers = AttackerList::from_elem(PlayerId::new(2), 1);

        let next = step(&state, PlayerId::new(2), Action::Attack(card(Suit::Hearts, 7))).unwrap();

        // Seat 2 played its last card: only seat 1 still holds any.
        assert!(next.is_done);
        assert_eq!(next.rewards(), vec![1.0, -1.0, 1.0]);
        assert!(legal_actions(&next).is_empty());
    }
}
