use crate::domain::state::{ClearReason, FinishStatus, Role, TableEvent, Tier};
use crate::domain::test_state_helpers::{assert_conserved, pid, state_with_hands, t0};
use crate::domain::tricks::{play_cards, skip_turn};
use crate::domain::Rank;
use crate::errors::domain::{ConflictKind, DomainError, ValidationKind};

#[test]
fn first_play_fixes_required_count() {
    let mut state = state_with_hands(&[&["7H", "9H"], &["8S", "8D", "TC"]]);
    let p0 = pid(&state, 0);
    let p1 = pid(&state, 1);

    play_cards(&mut state, p0, &[0], None, t0()).unwrap();
    assert_eq!(state.required_count, 1);
    assert_eq!(state.pile_top_rank(), Some(Rank::Seven));
    assert_conserved(&state);

    // Next player must play exactly one card.
    let err = play_cards(&mut state, p1, &[0, 1], None, t0()).unwrap_err();
    assert!(matches!(
        err,
        DomainError::Validation(ValidationKind::WrongCardCount, _)
    ));

    // A single higher card is fine.
    play_cards(&mut state, p1, &[2], None, t0()).unwrap();
    assert_eq!(state.pile_top_rank(), Some(Rank::Ten));
    assert_conserved(&state);
}

#[test]
fn pair_lead_requires_pairs_to_follow() {
    let mut state = state_with_hands(&[&["7H", "7S", "AH"], &["9H", "9S", "KC"]]);
    let p0 = pid(&state, 0);
    let p1 = pid(&state, 1);

    play_cards(&mut state, p0, &[0, 1], None, t0()).unwrap();
    assert_eq!(state.required_count, 2);

    let err = play_cards(&mut state, p1, &[2], None, t0()).unwrap_err();
    assert!(matches!(
        err,
        DomainError::Validation(ValidationKind::WrongCardCount, _)
    ));

    play_cards(&mut state, p1, &[0, 1], None, t0()).unwrap();
    assert_eq!(state.pile_top_rank(), Some(Rank::Nine));
}

#[test]
fn wildcard_played_as_king_holds_the_top() {
    let mut state = state_with_hands(&[&["KH", "5C"], &["2H", "9C"], &["QH", "4C"]]);
    let p0 = pid(&state, 0);
    let p1 = pid(&state, 1);

    play_cards(&mut state, p0, &[0], None, t0()).unwrap();
    assert_eq!(state.pile_top_rank(), Some(Rank::King));

    // Wildcard declared as king: legal, the top stays King, and the equal
    // rank bypasses the next seat.
    let outcome = play_cards(&mut state, p1, &[0], Some(Rank::King), t0()).unwrap();
    assert_eq!(state.pile_top_rank(), Some(Rank::King));
    assert_eq!(outcome.bypassed_seat, Some(3));
    assert_eq!(state.current_seat, 0);

    // The declared rank binds comparisons: a five cannot follow.
    let err = play_cards(&mut state, p0, &[0], None, t0()).unwrap_err();
    assert!(matches!(
        err,
        DomainError::Validation(ValidationKind::RankTooLow, _)
    ));
}

#[test]
fn raw_wildcards_reset_the_bar() {
    let mut state = state_with_hands(&[&["KH", "3C"], &["2H", "9C"], &["4H", "4D"]]);
    let p0 = pid(&state, 0);
    let p1 = pid(&state, 1);
    let p2 = pid(&state, 2);

    play_cards(&mut state, p0, &[0], None, t0()).unwrap();
    // A raw wildcard (no declared rank) goes on anything...
    play_cards(&mut state, p1, &[0], None, t0()).unwrap();
    assert_eq!(state.pile_top_rank(), Some(Rank::Two));
    // ...and anything goes on it.
    play_cards(&mut state, p2, &[0], None, t0()).unwrap();
    assert_eq!(state.pile_top_rank(), Some(Rank::Four));
}

#[test]
fn ace_clears_pile_and_seat_replays() {
    let mut state = state_with_hands(&[&["AH", "5C", "6C"], &["9H", "9C"], &["TH", "TC"]]);
    let p0 = pid(&state, 0);
    let p1 = pid(&state, 1);
    let p2 = pid(&state, 2);

    play_cards(&mut state, p0, &[1], None, t0()).unwrap();
    state.player_mut(p2).unwrap().skipped = true;
    // With seat 3 sitting out, p1's play hands the turn straight back to p0.
    play_cards(&mut state, p1, &[0], None, t0()).unwrap();
    assert_eq!(state.current_seat, 0);

    let outcome = play_cards(&mut state, p0, &[0], None, t0()).unwrap();
    assert!(outcome.ace_cleared);
    assert!(state.pile.is_empty());
    assert_eq!(state.required_count, 1);
    // Same seat leads the fresh pile; everyone's pass flags are gone.
    assert_eq!(state.current_seat, 0);
    assert!(state.players.values().all(|p| !p.skipped));
    assert_conserved(&state);
}

#[test]
fn ace_as_last_card_clears_and_turn_moves_on() {
    let mut state = state_with_hands(&[&["AH", "9H"], &["9C", "TC"], &["JH", "JC"]]);
    let p0 = pid(&state, 0);
    let p1 = pid(&state, 1);
    let p2 = pid(&state, 2);

    play_cards(&mut state, p0, &[1], None, t0()).unwrap();
    play_cards(&mut state, p1, &[1], None, t0()).unwrap();
    play_cards(&mut state, p2, &[0], None, t0()).unwrap();

    // Ace as the last card: the pile clears, but the finished seat cannot
    // replay, so the fresh pile starts at the next active seat.
    let outcome = play_cards(&mut state, p0, &[0], None, t0()).unwrap();
    assert!(outcome.ace_cleared);
    assert_eq!(outcome.finished, Some(Tier::Gold));
    assert!(state.pile.is_empty());
    assert_eq!(state.current_seat, state.player(p1).unwrap().seat);
    assert!(state.players.values().all(|p| !p.skipped));
    assert_conserved(&state);
}

#[test]
fn wildcard_declared_as_ace_triggers_the_ace_effect() {
    let mut state = state_with_hands(&[&["KH", "5C"], &["2H", "9C"]]);
    let p0 = pid(&state, 0);
    let p1 = pid(&state, 1);

    play_cards(&mut state, p0, &[0], None, t0()).unwrap();
    let outcome = play_cards(&mut state, p1, &[0], Some(Rank::Ace), t0()).unwrap();
    assert!(outcome.ace_cleared);
    assert!(state.pile.is_empty());
    assert_eq!(state.current_seat, state.player(p1).unwrap().seat);
}

#[test]
fn matching_rank_bypasses_the_next_seat() {
    // Four players on canonical seats [0, 2, 3, 1].
    let mut state = state_with_hands(&[
        &["9H", "5C"],
        &["9S", "6C"],
        &["TH", "7C"],
        &["9D", "8C"],
    ]);
    let ids: Vec<_> = (0..4).map(|i| pid(&state, i)).collect();

    play_cards(&mut state, ids[0], &[1], None, t0()).unwrap();
    play_cards(&mut state, ids[1], &[1], None, t0()).unwrap();
    play_cards(&mut state, ids[2], &[1], None, t0()).unwrap();
    play_cards(&mut state, ids[3], &[0], None, t0()).unwrap();

    // Seat 0 matches the nine beneath: the turn advances twice, bypassing
    // seat 2 and landing on seat 3.
    let outcome = play_cards(&mut state, ids[0], &[0], None, t0()).unwrap();
    assert_eq!(outcome.bypassed_seat, Some(2));
    assert_eq!(state.current_seat, 3);
    assert!(matches!(
        state.last_event,
        Some(TableEvent::SeatBypassed { seat: 2 })
    ));
    // The bypassed seat was merely passed over; it has not skipped.
    assert!(!state.player_at_seat(2).unwrap().skipped);
}

#[test]
fn round_returns_to_pile_owner_and_clears() {
    let mut state = state_with_hands(&[&["9H", "5C"], &["3H", "3C"], &["4H", "4C"]]);
    let p0 = pid(&state, 0);
    let p1 = pid(&state, 1);
    let p2 = pid(&state, 2);

    play_cards(&mut state, p0, &[1], None, t0()).unwrap();
    skip_turn(&mut state, p1, t0()).unwrap();
    let outcome = skip_turn(&mut state, p2, t0()).unwrap();

    // Nobody played over the five; the pile owner starts a fresh pile.
    assert_eq!(outcome.pile_cleared, Some(ClearReason::RoundReturned));
    assert!(state.pile.is_empty());
    assert_eq!(state.current_seat, state.player(p0).unwrap().seat);
    assert!(state.players.values().all(|p| !p.skipped));
    assert_conserved(&state);
}

#[test]
fn all_skipped_clears_for_a_fresh_pile() {
    // The pile owner finishes, then every remaining hand passes.
    let mut state = state_with_hands(&[&["5C"], &["3H", "3C"], &["4H", "4C"]]);
    let p0 = pid(&state, 0);
    let p1 = pid(&state, 1);
    let p2 = pid(&state, 2);

    play_cards(&mut state, p0, &[0], None, t0()).unwrap();
    skip_turn(&mut state, p1, t0()).unwrap();
    let outcome = skip_turn(&mut state, p2, t0()).unwrap();

    assert_eq!(outcome.pile_cleared, Some(ClearReason::AllSkipped));
    assert!(state.pile.is_empty());
    assert_eq!(state.required_count, 1);
    assert!(state.players.values().all(|p| !p.skipped));
    assert_eq!(state.current_seat, state.player(p1).unwrap().seat);
}

#[test]
fn finishing_order_assigns_tiers_and_roles() {
    // Five players; four finish in order, the fifth is auto-marked loser.
    let mut state = state_with_hands(&[
        &["9H"],
        &["TH"],
        &["JH"],
        &["QH"],
        &["KH", "3C"],
    ]);
    let ids: Vec<_> = (0..5).map(|i| pid(&state, i)).collect();

    play_cards(&mut state, ids[0], &[0], None, t0()).unwrap();
    play_cards(&mut state, ids[1], &[0], None, t0()).unwrap();
    play_cards(&mut state, ids[2], &[0], None, t0()).unwrap();
    let outcome = play_cards(&mut state, ids[3], &[0], None, t0()).unwrap();

    assert_eq!(outcome.finished, Some(Tier::Loser));
    assert!(outcome.round_complete);
    assert!(state.game_over);
    assert_eq!(state.winner, Some(ids[0]));
    assert_eq!(
        state.finishing_order,
        vec![ids[0], ids[1], ids[2], ids[3], ids[4]]
    );

    let role_of = |id| state.player(id).unwrap().role;
    assert_eq!(role_of(ids[0]), Role::President);
    assert_eq!(role_of(ids[1]), Role::VicePresident);
    assert_eq!(role_of(ids[3]), Role::ViceCulo);
    assert_eq!(role_of(ids[4]), Role::Culo);
    assert_eq!(
        state.player(ids[4]).unwrap().finish,
        FinishStatus::Finished(Tier::Loser)
    );
}

#[test]
fn turn_validity_is_enforced() {
    let mut state = state_with_hands(&[&["9H", "5C"], &["3H", "3C"]]);
    let p1 = pid(&state, 1);

    let err = play_cards(&mut state, p1, &[0], None, t0()).unwrap_err();
    assert!(matches!(
        err,
        DomainError::Validation(ValidationKind::OutOfTurn, _)
    ));
    let err = skip_turn(&mut state, p1, t0()).unwrap_err();
    assert!(matches!(
        err,
        DomainError::Validation(ValidationKind::OutOfTurn, _)
    ));
}

#[test]
fn rejections_leave_state_unchanged() {
    let mut state = state_with_hands(&[&["9H", "5C"], &["3H", "3C"]]);
    let p0 = pid(&state, 0);
    let before_hand = state.player(p0).unwrap().hand.clone();

    // Out-of-range, duplicate, and empty selections all bounce cleanly.
    assert!(play_cards(&mut state, p0, &[5], None, t0()).is_err());
    assert!(play_cards(&mut state, p0, &[0, 0], None, t0()).is_err());
    assert!(play_cards(&mut state, p0, &[], None, t0()).is_err());

    assert_eq!(state.player(p0).unwrap().hand, before_hand);
    assert!(state.pile.is_empty());
    assert_conserved(&state);
}

#[test]
fn finished_player_cannot_act_again() {
    let mut state = state_with_hands(&[&["9H"], &["3H", "3C"], &["4H", "4C"]]);
    let p0 = pid(&state, 0);

    play_cards(&mut state, p0, &[0], None, t0()).unwrap();
    assert_eq!(
        state.player(p0).unwrap().finish,
        FinishStatus::Finished(Tier::Gold)
    );

    // Force the turn marker back onto the finished seat to probe the guard.
    state.current_seat = state.player(p0).unwrap().seat;
    let err = play_cards(&mut state, p0, &[0], None, t0()).unwrap_err();
    assert!(matches!(
        err,
        DomainError::Conflict(ConflictKind::AlreadyFinished, _)
    ));
}

#[test]
fn skipped_player_cannot_act_until_reset() {
    let mut state = state_with_hands(&[&["9H", "5C"], &["3H", "3C"]]);
    let p0 = pid(&state, 0);

    play_cards(&mut state, p0, &[0], None, t0()).unwrap();
    // Hand the turn back to p0 artificially with the skip flag set.
    state.player_mut(p0).unwrap().skipped = true;
    state.current_seat = state.player(p0).unwrap().seat;

    let err = skip_turn(&mut state, p0, t0()).unwrap_err();
    assert!(matches!(
        err,
        DomainError::Conflict(ConflictKind::AlreadySkipped, _)
    ));
}

#[test]
fn finishing_order_is_append_only_under_play() {
    let mut state = state_with_hands(&[&["9H"], &["TH", "3C"], &["JH", "4C"]]);
    let ids: Vec<_> = (0..3).map(|i| pid(&state, i)).collect();

    play_cards(&mut state, ids[0], &[0], None, t0()).unwrap();
    let order_after_first = state.finishing_order.clone();
    assert_eq!(order_after_first, vec![ids[0]]);

    play_cards(&mut state, ids[1], &[0], None, t0()).unwrap();
    assert_eq!(state.finishing_order[..1], order_after_first[..]);
    assert_eq!(state.finishing_order.len(), 3); // auto-loser appended
}
