//! Error codes for the action surface.
//!
//! This module defines all error codes the engine reports to its callers.
//! Add new codes here; never pass ad-hoc strings as error codes.
//!
//! All error codes are SCREAMING_SNAKE_CASE and map 1:1 to the strings a
//! presentation or transport layer would put on the wire.

use core::fmt;

use super::domain::{ConflictKind, DomainError, NotFoundKind, ValidationKind};

/// Centralized error codes for the engine's action surface.
///
/// Each variant maps to a canonical SCREAMING_SNAKE_CASE string. The mapping
/// from [`DomainError`] is total, so every rejection has a stable code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Play validation
    /// Out of turn
    OutOfTurn,
    /// Wrong number of cards for this pile
    WrongCardCount,
    /// Selected cards resolve to different ranks
    RankMismatch,
    /// Play is lower than the pile top
    RankTooLow,
    /// Card index outside the hand
    InvalidCardIndex,
    /// Exchange selection out of phase
    WrongExchangePhase,
    /// Exchange selection against the wrong hand
    WrongExchangeHand,
    /// Display name rejected
    InvalidName,
    /// Not enough (or too many) players for the operation
    InvalidPlayerCount,
    /// Card token failed to parse
    ParseCard,
    /// General validation error
    ValidationError,

    // Conflicts
    /// Player already finished this round
    AlreadyFinished,
    /// Player already skipped this pile
    AlreadySkipped,
    /// Card exchange must complete first
    ExchangeInProgress,
    /// Game has already started
    GameAlreadyStarted,
    /// Game has not started yet
    GameNotStarted,
    /// Generic conflict (fallback for unmatched conflicts)
    Conflict,

    // Resource not found
    /// Player not found
    PlayerNotFound,
    /// Room not found
    RoomNotFound,
    /// General not found error
    NotFound,

    // Access and limits
    /// Host-only action invoked by a non-host
    Forbidden,
    /// Seating is full
    GameFull,
    /// Configuration error (e.g. invalid deck size)
    ConfigError,
}

impl ErrorCode {
    /// The canonical wire string for this code.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::OutOfTurn => "OUT_OF_TURN",
            ErrorCode::WrongCardCount => "WRONG_CARD_COUNT",
            ErrorCode::RankMismatch => "RANK_MISMATCH",
            ErrorCode::RankTooLow => "RANK_TOO_LOW",
            ErrorCode::InvalidCardIndex => "INVALID_CARD_INDEX",
            ErrorCode::WrongExchangePhase => "WRONG_EXCHANGE_PHASE",
            ErrorCode::WrongExchangeHand => "WRONG_EXCHANGE_HAND",
            ErrorCode::InvalidName => "INVALID_NAME",
            ErrorCode::InvalidPlayerCount => "INVALID_PLAYER_COUNT",
            ErrorCode::ParseCard => "PARSE_CARD",
            ErrorCode::ValidationError => "VALIDATION_ERROR",
            ErrorCode::AlreadyFinished => "ALREADY_FINISHED",
            ErrorCode::AlreadySkipped => "ALREADY_SKIPPED",
            ErrorCode::ExchangeInProgress => "EXCHANGE_IN_PROGRESS",
            ErrorCode::GameAlreadyStarted => "GAME_ALREADY_STARTED",
            ErrorCode::GameNotStarted => "GAME_NOT_STARTED",
            ErrorCode::Conflict => "CONFLICT",
            ErrorCode::PlayerNotFound => "PLAYER_NOT_FOUND",
            ErrorCode::RoomNotFound => "ROOM_NOT_FOUND",
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::Forbidden => "FORBIDDEN",
            ErrorCode::GameFull => "GAME_FULL",
            ErrorCode::ConfigError => "CONFIG_ERROR",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&DomainError> for ErrorCode {
    fn from(err: &DomainError) -> Self {
        match err {
            DomainError::Validation(kind, _) => match kind {
                ValidationKind::OutOfTurn => ErrorCode::OutOfTurn,
                ValidationKind::WrongCardCount => ErrorCode::WrongCardCount,
                ValidationKind::RankMismatch => ErrorCode::RankMismatch,
                ValidationKind::RankTooLow => ErrorCode::RankTooLow,
                ValidationKind::InvalidCardIndex => ErrorCode::InvalidCardIndex,
                ValidationKind::WrongExchangePhase => ErrorCode::WrongExchangePhase,
                ValidationKind::WrongExchangeHand => ErrorCode::WrongExchangeHand,
                ValidationKind::InvalidName => ErrorCode::InvalidName,
                ValidationKind::InvalidPlayerCount => ErrorCode::InvalidPlayerCount,
                ValidationKind::ParseCard => ErrorCode::ParseCard,
                _ => ErrorCode::ValidationError,
            },
            DomainError::Conflict(kind, _) => match kind {
                ConflictKind::AlreadyFinished => ErrorCode::AlreadyFinished,
                ConflictKind::AlreadySkipped => ErrorCode::AlreadySkipped,
                ConflictKind::ExchangeInProgress => ErrorCode::ExchangeInProgress,
                ConflictKind::GameAlreadyStarted => ErrorCode::GameAlreadyStarted,
                ConflictKind::GameNotStarted => ErrorCode::GameNotStarted,
                _ => ErrorCode::Conflict,
            },
            DomainError::NotFound(kind, _) => match kind {
                NotFoundKind::Player => ErrorCode::PlayerNotFound,
                NotFoundKind::Room => ErrorCode::RoomNotFound,
                _ => ErrorCode::NotFound,
            },
            DomainError::Permission(_) => ErrorCode::Forbidden,
            DomainError::Capacity(_) => ErrorCode::GameFull,
            DomainError::Config(_) => ErrorCode::ConfigError,
        }
    }
}
