// Error types for ledger operations.

use thiserror::Error;

use crate::player::PlayerId;

/// Why a ledger operation was rejected.
///
/// A rejected operation never leaves a partial change behind: the ledger is
/// exactly as it was before the call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("name must not be empty")]
    EmptyName,

    #[error("a player named `{name}` already exists")]
    DuplicateName { name: String },

    #[error("no player with id {id}")]
    NotFound { id: PlayerId },

    #[error("at least {required} players are required, found {actual}")]
    InsufficientPlayers { required: usize, actual: usize },

    #[error("score for {id} would leave the supported range")]
    ScoreOverflow { id: PlayerId },

    #[error("players cannot be added or removed while a game is in progress")]
    RosterLocked,
}
