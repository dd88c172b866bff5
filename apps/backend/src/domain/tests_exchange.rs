use crate::domain::exchange::{
    select_card, ExchangeLeg, ExchangePhase, ExchangeSide, ExchangeState,
};
use crate::domain::state::{GameState, Role};
use crate::domain::test_state_helpers::{cards, pid, state_with_hands, t0};
use crate::domain::tricks::play_cards;
use crate::errors::domain::{ConflictKind, DomainError, ValidationKind};

/// Four players with a full role set from a previous round:
/// president, vice-president, vice-culo, culo (in seat order).
fn state_with_roles() -> GameState {
    let mut state = state_with_hands(&[
        &["KH", "AH", "QH"],
        &["JH", "TS", "9S"],
        &["6H", "7H", "8H"],
        &["3H", "4H", "5H"],
    ]);
    let roles = [
        Role::President,
        Role::VicePresident,
        Role::ViceCulo,
        Role::Culo,
    ];
    for (i, role) in roles.into_iter().enumerate() {
        let id = pid(&state, i);
        state.player_mut(id).unwrap().role = role;
    }
    state.exchange = ExchangeState::for_round(&state);
    state
}

#[test]
fn for_round_requires_president_and_culo() {
    let mut state = state_with_hands(&[&["KH"], &["3H"]]);
    assert!(ExchangeState::for_round(&state).is_none());

    let p0 = pid(&state, 0);
    state.player_mut(p0).unwrap().role = Role::President;
    assert!(ExchangeState::for_round(&state).is_none());

    let p1 = pid(&state, 1);
    state.player_mut(p1).unwrap().role = Role::Culo;
    let ex = ExchangeState::for_round(&state).unwrap();
    assert_eq!(ex.phase, ExchangePhase::PresidentReceive);
    assert_eq!(ex.president, p0);
    assert_eq!(ex.culo, p1);
    assert_eq!(ex.vice_president, None);
}

#[test]
fn vice_roles_join_only_as_a_pair() {
    let mut state = state_with_hands(&[&["KH"], &["JH"], &["3H"]]);
    let roles = [Role::President, Role::VicePresident, Role::Culo];
    for (i, role) in roles.into_iter().enumerate() {
        let id = pid(&state, i);
        state.player_mut(id).unwrap().role = role;
    }
    let ex = ExchangeState::for_round(&state).unwrap();
    assert_eq!(ex.vice_president, None);
    assert_eq!(ex.vice_culo, None);
}

#[test]
fn play_and_skip_are_blocked_while_exchange_runs() {
    let mut state = state_with_roles();
    let p0 = pid(&state, 0);

    let err = play_cards(&mut state, p0, &[0], None, t0()).unwrap_err();
    assert!(matches!(
        err,
        DomainError::Conflict(ConflictKind::ExchangeInProgress, _)
    ));
}

#[test]
fn only_the_selecting_role_holder_acts() {
    let mut state = state_with_roles();
    let culo = pid(&state, 3);

    let err = select_card(
        &mut state,
        culo,
        0,
        ExchangeSide::Receive,
        ExchangeLeg::President,
    )
    .unwrap_err();
    assert!(matches!(
        err,
        DomainError::Validation(ValidationKind::OutOfTurn, _)
    ));
}

#[test]
fn phase_tag_must_match_protocol_state() {
    let mut state = state_with_roles();
    let president = pid(&state, 0);

    // Giving during the receive phase is out of phase.
    let err = select_card(
        &mut state,
        president,
        0,
        ExchangeSide::Give,
        ExchangeLeg::President,
    )
    .unwrap_err();
    assert!(matches!(
        err,
        DomainError::Validation(ValidationKind::WrongExchangePhase, _)
    ));

    // So is targeting the vice leg before the president leg completes.
    let err = select_card(
        &mut state,
        president,
        0,
        ExchangeSide::Receive,
        ExchangeLeg::Vice,
    )
    .unwrap_err();
    assert!(matches!(
        err,
        DomainError::Validation(ValidationKind::WrongExchangePhase, _)
    ));
}

#[test]
fn out_of_range_selection_leaves_hands_unchanged() {
    let mut state = state_with_roles();
    let president = pid(&state, 0);
    let culo = pid(&state, 3);
    let culo_hand = state.player(culo).unwrap().hand.clone();
    let president_hand = state.player(president).unwrap().hand.clone();

    let err = select_card(
        &mut state,
        president,
        7,
        ExchangeSide::Receive,
        ExchangeLeg::President,
    )
    .unwrap_err();
    assert!(matches!(
        err,
        DomainError::Validation(ValidationKind::InvalidCardIndex, _)
    ));
    assert_eq!(state.player(culo).unwrap().hand, culo_hand);
    assert_eq!(state.player(president).unwrap().hand, president_hand);
    assert!(state
        .exchange
        .as_ref()
        .unwrap()
        .pending_receive
        .is_empty());
}

#[test]
fn duplicate_selection_is_rejected() {
    let mut state = state_with_roles();
    let president = pid(&state, 0);

    select_card(
        &mut state,
        president,
        1,
        ExchangeSide::Receive,
        ExchangeLeg::President,
    )
    .unwrap();
    let err = select_card(
        &mut state,
        president,
        1,
        ExchangeSide::Receive,
        ExchangeLeg::President,
    )
    .unwrap_err();
    assert!(matches!(
        err,
        DomainError::Validation(ValidationKind::InvalidCardIndex, _)
    ));
}

#[test]
fn full_protocol_swaps_and_completes() {
    let mut state = state_with_roles();
    let president = pid(&state, 0);
    let vice_president = pid(&state, 1);
    let vice_culo = pid(&state, 2);
    let culo = pid(&state, 3);

    // President takes the culo's 3H and 5H (indices 0 and 2).
    let progress = select_card(
        &mut state,
        president,
        0,
        ExchangeSide::Receive,
        ExchangeLeg::President,
    )
    .unwrap();
    assert_eq!((progress.selected, progress.needed), (1, 2));
    select_card(
        &mut state,
        president,
        2,
        ExchangeSide::Receive,
        ExchangeLeg::President,
    )
    .unwrap();
    assert_eq!(
        state.exchange.as_ref().unwrap().phase,
        ExchangePhase::PresidentGive
    );

    // President gives back KH and AH (indices 0 and 1 of own hand).
    select_card(
        &mut state,
        president,
        0,
        ExchangeSide::Give,
        ExchangeLeg::President,
    )
    .unwrap();
    select_card(
        &mut state,
        president,
        1,
        ExchangeSide::Give,
        ExchangeLeg::President,
    )
    .unwrap();

    // Swap done: both hands re-sorted by rank then suit.
    assert_eq!(state.player(president).unwrap().hand, cards(&["3H", "5H", "QH"]));
    assert_eq!(state.player(culo).unwrap().hand, cards(&["4H", "KH", "AH"]));
    assert_eq!(
        state.exchange.as_ref().unwrap().phase,
        ExchangePhase::ViceReceive
    );
    assert!(state.exchange_blocking());

    // Vice leg: one card each way.
    select_card(
        &mut state,
        vice_president,
        0,
        ExchangeSide::Receive,
        ExchangeLeg::Vice,
    )
    .unwrap();
    assert_eq!(
        state.exchange.as_ref().unwrap().phase,
        ExchangePhase::ViceGive
    );
    let progress = select_card(
        &mut state,
        vice_president,
        0,
        ExchangeSide::Give,
        ExchangeLeg::Vice,
    )
    .unwrap();

    // Vice-president traded JH for the vice-culo's 6H.
    assert_eq!(
        state.player(vice_president).unwrap().hand,
        cards(&["6H", "9S", "TS"])
    );
    assert_eq!(
        state.player(vice_culo).unwrap().hand,
        cards(&["7H", "8H", "JH"])
    );
    // Completion discards the protocol.
    assert_eq!(progress.phase, ExchangePhase::Complete);
    assert!(state.exchange.is_none());
    assert!(!state.exchange_blocking());

    // Ordinary play resumes for the current seat.
    let p0 = pid(&state, 0);
    play_cards(&mut state, p0, &[0], None, t0()).unwrap();
}

#[test]
fn protocol_without_vices_completes_after_president_leg() {
    let mut state = state_with_hands(&[&["KH", "AH"], &["3H", "4H"]]);
    let president = pid(&state, 0);
    let culo = pid(&state, 1);
    state.player_mut(president).unwrap().role = Role::President;
    state.player_mut(culo).unwrap().role = Role::Culo;
    state.exchange = ExchangeState::for_round(&state);

    for idx in [0, 1] {
        select_card(
            &mut state,
            president,
            idx,
            ExchangeSide::Receive,
            ExchangeLeg::President,
        )
        .unwrap();
    }
    let mut last_phase = ExchangePhase::PresidentGive;
    for idx in [0, 1] {
        last_phase = select_card(
            &mut state,
            president,
            idx,
            ExchangeSide::Give,
            ExchangeLeg::President,
        )
        .unwrap()
        .phase;
    }

    assert_eq!(last_phase, ExchangePhase::Complete);
    assert!(state.exchange.is_none());
    // The whole hands traded places here.
    assert_eq!(state.player(president).unwrap().hand, cards(&["3H", "4H"]));
    assert_eq!(state.player(culo).unwrap().hand, cards(&["KH", "AH"]));
}

#[test]
fn selection_after_completion_is_rejected() {
    let mut state = state_with_hands(&[&["KH", "AH"], &["3H", "4H"]]);
    let president = pid(&state, 0);
    let culo = pid(&state, 1);
    state.player_mut(president).unwrap().role = Role::President;
    state.player_mut(culo).unwrap().role = Role::Culo;
    state.exchange = ExchangeState::for_round(&state);

    for idx in [0, 1] {
        select_card(
            &mut state,
            president,
            idx,
            ExchangeSide::Receive,
            ExchangeLeg::President,
        )
        .unwrap();
        }
    for idx in [0, 1] {
        select_card(
            &mut state,
            president,
            idx,
            ExchangeSide::Give,
            ExchangeLeg::President,
        )
        .unwrap();
    }

    let err = select_card(
        &mut state,
        president,
        0,
        ExchangeSide::Receive,
        ExchangeLeg::President,
    )
    .unwrap_err();
    assert!(matches!(
        err,
        DomainError::Validation(ValidationKind::WrongExchangePhase, _)
    ));
}
