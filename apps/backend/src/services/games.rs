//! Room action surface.
//!
//! Every operation resolves a room through the registry, takes that room's
//! exclusive lock for its full read-modify-write cycle, and runs the domain
//! transition. Rejected actions return the specific reason and leave the
//! aggregate unmutated.

use lazy_regex::regex_is_match;
use rand::Rng;
use time::OffsetDateTime;
use tracing::{debug, info};

use crate::domain::dealing;
use crate::domain::exchange::{
    self, ExchangeLeg, ExchangePhase, ExchangeProgress, ExchangeSide, ExchangeState,
};
use crate::domain::player_view::{build_view, PlayerViewInfo};
use crate::domain::snapshot;
use crate::domain::state::{FinishStatus, GameState, Player, PlayerId, Role, Seat, Tier};
use crate::domain::timer::{self, PenaltyCardsOnTimeout, SkipOnTimeout, TimeoutPolicy};
use crate::domain::tricks::{self, PlayOutcome, SkipOutcome};
use crate::domain::Rank;
use crate::config::TimeoutPenalty;
use crate::errors::domain::{ConflictKind, DomainError, NotFoundKind, ValidationKind};
use crate::state::app_state::AppState;
use crate::state::registry::RoomId;

const MAX_NAME_LEN: usize = 20;

/// Outcome of a successful join.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinOutcome {
    pub player_id: PlayerId,
    pub seat: Seat,
    pub is_host: bool,
}

/// Room domain service.
#[derive(Debug, Clone, Copy, Default)]
pub struct GameService;

impl GameService {
    pub fn new() -> Self {
        Self
    }

    /// Create a fresh room with the deployment's default deck size.
    pub fn create_room(&self, app: &AppState) -> RoomId {
        let id = app.registry.create(app.config.default_deck_size);
        info!(room = %id, "Room created");
        id
    }

    /// Join a room. The first joiner becomes host; a joiner during a live
    /// round is dealt in from the unused remainder of the deck.
    pub fn join(
        &self,
        app: &AppState,
        room_id: &RoomId,
        name: &str,
    ) -> Result<JoinOutcome, DomainError> {
        let name = name.trim();
        validate_name(name)?;

        let room = app.registry.room(room_id)?;
        let mut state = room.write();

        if state.seating.is_full() {
            return Err(DomainError::capacity(
                "Game is full. Please wait for a spot to open",
            ));
        }

        let player_id = PlayerId::new();
        let seat = state.seating.claim_seat(player_id).ok_or_else(|| {
            DomainError::capacity("Game is full. Please wait for a spot to open")
        })?;
        let is_host = state.host.is_none();
        if is_host {
            state.host = Some(player_id);
        }
        state.players.insert(
            player_id,
            Player {
                id: player_id,
                name: name.to_owned(),
                seat,
                hand: Vec::new(),
                skipped: false,
                finish: FinishStatus::Active,
                role: Role::Neutral,
                is_host,
            },
        );

        if state.started && !state.game_over {
            let mut rng = rand::thread_rng();
            dealing::redistribute(&mut state, &mut rng);
        }

        info!(room = %room_id, player = %player_id, seat, is_host, "Player joined");
        Ok(JoinOutcome {
            player_id,
            seat,
            is_host,
        })
    }

    /// Start the game: deal the whole deck, seat the first turn, and open
    /// the card exchange when the previous round produced the roles for it.
    pub fn start_game(
        &self,
        app: &AppState,
        room_id: &RoomId,
        caller: PlayerId,
    ) -> Result<(), DomainError> {
        let room = app.registry.room(room_id)?;
        let mut state = room.write();
        ensure_host(&state, caller)?;
        if state.started {
            return Err(DomainError::conflict(
                ConflictKind::GameAlreadyStarted,
                "Game has already started",
            ));
        }
        deal_new_round(&mut state)?;
        info!(room = %room_id, players = state.players.len(), "Game started");
        Ok(())
    }

    pub fn play_cards(
        &self,
        app: &AppState,
        room_id: &RoomId,
        player_id: PlayerId,
        indices: &[usize],
        wildcard_rank: Option<Rank>,
    ) -> Result<PlayOutcome, DomainError> {
        let room = app.registry.room(room_id)?;
        let mut state = room.write();
        debug!(room = %room_id, player = %player_id, ?indices, "Playing cards");

        let outcome = tricks::play_cards(
            &mut state,
            player_id,
            indices,
            wildcard_rank,
            OffsetDateTime::now_utc(),
        )?;
        if let Some(tier) = outcome.finished {
            info!(room = %room_id, player = %player_id, ?tier, "Player finished");
        }
        if outcome.round_complete {
            info!(room = %room_id, "Round complete");
        }
        Ok(outcome)
    }

    pub fn skip_turn(
        &self,
        app: &AppState,
        room_id: &RoomId,
        player_id: PlayerId,
    ) -> Result<SkipOutcome, DomainError> {
        let room = app.registry.room(room_id)?;
        let mut state = room.write();
        debug!(room = %room_id, player = %player_id, "Skipping turn");
        tricks::skip_turn(&mut state, player_id, OffsetDateTime::now_utc())
    }

    /// Host-only: clear hands, pile, and the finishing order, then redeal.
    /// Roles persist, so the next round's exchange follows from them.
    pub fn reset_game(
        &self,
        app: &AppState,
        room_id: &RoomId,
        caller: PlayerId,
    ) -> Result<(), DomainError> {
        let room = app.registry.room(room_id)?;
        let mut state = room.write();
        ensure_host(&state, caller)?;
        deal_new_round(&mut state)?;
        info!(room = %room_id, "Game reset by host");
        Ok(())
    }

    /// Host-only manual role override. Validates every target before any
    /// mutation, so a bad entry rejects the whole batch.
    pub fn assign_roles(
        &self,
        app: &AppState,
        room_id: &RoomId,
        caller: PlayerId,
        assignments: &[(PlayerId, Role)],
    ) -> Result<(), DomainError> {
        let room = app.registry.room(room_id)?;
        let mut state = room.write();
        ensure_host(&state, caller)?;
        for (target, _) in assignments {
            state.player(*target)?;
        }
        for (target, role) in assignments {
            state.player_mut(*target)?.role = *role;
        }
        info!(room = %room_id, count = assignments.len(), "Roles assigned by host");
        Ok(())
    }

    /// Host-only manual tier override. Assigning a tier also inserts the
    /// player into the finishing order; clearing one removes them - the only
    /// path that ever removes an id from the order.
    pub fn assign_ranks(
        &self,
        app: &AppState,
        room_id: &RoomId,
        caller: PlayerId,
        assignments: &[(PlayerId, Option<Tier>)],
    ) -> Result<(), DomainError> {
        let room = app.registry.room(room_id)?;
        let mut state = room.write();
        ensure_host(&state, caller)?;
        for (target, _) in assignments {
            state.player(*target)?;
        }
        for (target, tier) in assignments {
            match tier {
                Some(tier) => {
                    state.player_mut(*target)?.finish = FinishStatus::Finished(*tier);
                    if !state.finishing_order.contains(target) {
                        state.finishing_order.push(*target);
                    }
                }
                None => {
                    state.player_mut(*target)?.finish = FinishStatus::Active;
                    state.finishing_order.retain(|id| id != target);
                }
            }
        }
        info!(room = %room_id, count = assignments.len(), "Ranks assigned by host");
        Ok(())
    }

    /// Host-only; takes effect on the next deal.
    pub fn change_deck_size(
        &self,
        app: &AppState,
        room_id: &RoomId,
        caller: PlayerId,
        factor: f64,
    ) -> Result<(), DomainError> {
        let room = app.registry.room(room_id)?;
        let mut state = room.write();
        ensure_host(&state, caller)?;
        state.deck_size = crate::domain::DeckSize::try_from_factor(factor)?;
        info!(room = %room_id, factor, "Deck size changed");
        Ok(())
    }

    pub fn exchange_card(
        &self,
        app: &AppState,
        room_id: &RoomId,
        player_id: PlayerId,
        card_index: usize,
        side: ExchangeSide,
        leg: ExchangeLeg,
    ) -> Result<ExchangeProgress, DomainError> {
        let room = app.registry.room(room_id)?;
        let mut state = room.write();
        debug!(room = %room_id, player = %player_id, card_index, "Exchange selection");
        let progress = exchange::select_card(&mut state, player_id, card_index, side, leg)?;
        if progress.phase == ExchangePhase::Complete {
            info!(room = %room_id, "Card exchange complete");
        }
        Ok(progress)
    }

    /// Host-only: remove a player, purge them from the finishing order, and
    /// keep the round playable (turn advanced off the freed seat, exchange
    /// cancelled if they were party to it, hands redistributed if needed).
    pub fn kick_player(
        &self,
        app: &AppState,
        room_id: &RoomId,
        caller: PlayerId,
        target: PlayerId,
    ) -> Result<(), DomainError> {
        let room = app.registry.room(room_id)?;
        let mut state = room.write();
        ensure_host(&state, caller)?;
        if target == caller {
            return Err(DomainError::validation(
                ValidationKind::Other("KICK_SELF".into()),
                "The host cannot kick themselves",
            ));
        }
        let removed = state.players.remove(&target).ok_or_else(|| {
            DomainError::not_found(NotFoundKind::Player, format!("Player {target}"))
        })?;
        state.seating.release(removed.seat);
        state.finishing_order.retain(|id| *id != target);
        state.cards_dealt = state.cards_dealt.saturating_sub(removed.hand.len());
        if state.winner == Some(target) {
            state.winner = None;
        }
        if state.exchange.as_ref().is_some_and(|ex| ex.involves(target)) {
            state.exchange = None;
        }
        if state.started && !state.game_over && state.current_seat == removed.seat {
            tricks::advance_turn(&mut state, OffsetDateTime::now_utc());
        }
        if state.started && !state.game_over && state.players.len() >= 2 {
            let mut rng = rand::thread_rng();
            dealing::redistribute(&mut state, &mut rng);
        }
        info!(room = %room_id, player = %target, "Player kicked");
        Ok(())
    }

    /// Per-player snapshot of the room.
    ///
    /// Runs the turn-timeout check first (a poll is what surfaces lapsed
    /// deadlines), then consumes the one-shot forced-advance marker. Takes
    /// the write lock for exactly that reason.
    pub fn poll_state(
        &self,
        app: &AppState,
        room_id: &RoomId,
        player_id: PlayerId,
    ) -> Result<PlayerViewInfo, DomainError> {
        let room = app.registry.room(room_id)?;
        let mut state = room.write();

        let now = OffsetDateTime::now_utc();
        let policy: Box<dyn TimeoutPolicy> = match app.config.timeout_penalty {
            TimeoutPenalty::Skip => Box::new(SkipOnTimeout),
            TimeoutPenalty::GrantCards => Box::new(PenaltyCardsOnTimeout::default()),
        };
        let mut rng = rand::thread_rng();
        if let Some(seat) =
            timer::check_timeout(&mut state, now, app.config.turn_timer, policy.as_ref(), &mut rng)
        {
            info!(room = %room_id, seat, "Turn forced on timeout");
        }

        let forced = state.forced_seat.take();
        let timer_view = timer::remaining(&state, now, app.config.turn_timer);
        build_view(&state, player_id, timer_view, forced)
    }

    /// Snapshot blob for the persistence collaborator.
    pub fn save_room(&self, app: &AppState, room_id: &RoomId) -> Result<String, DomainError> {
        let room = app.registry.room(room_id)?;
        let state = room.read();
        snapshot::save(&state)
    }

    /// Restore a room from a snapshot blob under the given id.
    pub fn load_room(
        &self,
        app: &AppState,
        room_id: RoomId,
        blob: &str,
    ) -> Result<(), DomainError> {
        let state = snapshot::load(blob)?;
        app.registry.insert(room_id, state);
        Ok(())
    }
}

fn validate_name(name: &str) -> Result<(), DomainError> {
    if name.is_empty() {
        return Err(DomainError::validation(
            ValidationKind::InvalidName,
            "Please enter a name",
        ));
    }
    if name.len() > MAX_NAME_LEN {
        return Err(DomainError::validation(
            ValidationKind::InvalidName,
            format!("Name must be {MAX_NAME_LEN} characters or less"),
        ));
    }
    if !regex_is_match!(r"^[a-zA-Z0-9 _-]+$", name) {
        return Err(DomainError::validation(
            ValidationKind::InvalidName,
            "Name can only contain letters, numbers, spaces, underscores, and hyphens",
        ));
    }
    Ok(())
}

fn ensure_host(state: &GameState, caller: PlayerId) -> Result<(), DomainError> {
    let player = state.player(caller)?;
    if !player.is_host {
        return Err(DomainError::permission(
            "Only the host can perform this action",
        ));
    }
    Ok(())
}

/// Deal a fresh round into the room: every seated player gets an even share
/// of the whole deck, the first canonical seat opens, and the exchange
/// protocol starts when the standing roles call for one.
fn deal_new_round(state: &mut GameState) -> Result<(), DomainError> {
    let seats = state.seating.occupied_in_order();
    if seats.len() < 2 {
        return Err(DomainError::validation(
            ValidationKind::InvalidPlayerCount,
            "Need at least 2 players to start the game",
        ));
    }

    let seed = rand::thread_rng().gen::<u64>();
    let hands = dealing::deal_hands(state.deck_size, &seats, seed)?;

    state.finishing_order.clear();
    state.game_over = false;
    state.winner = None;
    state.pile.clear();
    state.required_count = 1;
    state.last_pile_owner = None;
    state.last_pile_len = 0;
    state.forced_seat = None;
    state.last_event = None;

    for (seat, hand) in hands {
        if let Some(id) = state.seating.occupant(seat) {
            if let Some(p) = state.players.get_mut(&id) {
                p.hand = hand;
                p.skipped = false;
                p.finish = FinishStatus::Active;
            }
        }
    }
    state.cards_dealt = state.deck_size.card_count();
    state.current_seat = state
        .seating
        .first_occupied()
        .unwrap_or(0);
    state.exchange = ExchangeState::for_round(state);
    state.started = true;
    state.turn_started_at = Some(OffsetDateTime::now_utc());
    Ok(())
}
