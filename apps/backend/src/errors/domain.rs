//! Domain-level error type used across the engine and its action surface.
//!
//! This error type is transport-agnostic. Every rejected action leaves the
//! game aggregate unmutated and carries the specific reason; there is no
//! fatal error class inside the engine. Callers that need a wire-stable
//! reason string should map through [`crate::errors::ErrorCode`].

use thiserror::Error;

/// Validation failure kinds (rule violations and malformed input)
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ValidationKind {
    OutOfTurn,
    WrongCardCount,
    RankMismatch,
    RankTooLow,
    InvalidCardIndex,
    WrongExchangePhase,
    WrongExchangeHand,
    InvalidName,
    InvalidPlayerCount,
    ParseCard,
    Other(String),
}

/// Semantic conflict kinds (the action is well-formed but the state refuses it)
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConflictKind {
    AlreadyFinished,
    AlreadySkipped,
    ExchangeInProgress,
    GameAlreadyStarted,
    GameNotStarted,
    Other(String),
}

/// Domain-level not found entities
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum NotFoundKind {
    Player,
    Room,
    Other(String),
}

/// Central domain error type
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// Input/user validation or game rule violation
    #[error("validation error {0:?}: {1}")]
    Validation(ValidationKind, String),
    /// Semantic conflict
    #[error("conflict {0:?}: {1}")]
    Conflict(ConflictKind, String),
    /// Missing resource in domain terms
    #[error("not found {0:?}: {1}")]
    NotFound(NotFoundKind, String),
    /// Non-host caller invoking a host-only action
    #[error("permission denied: {0}")]
    Permission(String),
    /// Seating is full
    #[error("capacity reached: {0}")]
    Capacity(String),
    /// Invalid configuration value (e.g. deck size)
    #[error("config error: {0}")]
    Config(String),
}

impl DomainError {
    pub fn validation(kind: ValidationKind, detail: impl Into<String>) -> Self {
        Self::Validation(kind, detail.into())
    }
    pub fn validation_other(detail: impl Into<String>) -> Self {
        let detail = detail.into();
        Self::Validation(ValidationKind::Other(detail.clone()), detail)
    }
    pub fn conflict(kind: ConflictKind, detail: impl Into<String>) -> Self {
        Self::Conflict(kind, detail.into())
    }
    pub fn not_found(kind: NotFoundKind, detail: impl Into<String>) -> Self {
        Self::NotFound(kind, detail.into())
    }
    pub fn permission(detail: impl Into<String>) -> Self {
        Self::Permission(detail.into())
    }
    pub fn capacity(detail: impl Into<String>) -> Self {
        Self::Capacity(detail.into())
    }
    pub fn config(detail: impl Into<String>) -> Self {
        Self::Config(detail.into())
    }
}
