//! Error types for rounds, catalogs and stores.

use thiserror::Error;

use crate::catalog::CatalogKey;

/// Errors surfaced by round and roster operations.
#[derive(Debug, Error)]
pub enum GameError {
    /// Catalog for the requested difficulty and language is missing or empty.
    #[error("no terms available for {key}")]
    EmptyCatalog { key: CatalogKey },

    /// Not enough players to start a round.
    #[error("need at least {need} players to start, have {have}")]
    InsufficientPlayers { have: usize, need: usize },

    /// Player name was blank after trimming.
    #[error("player name cannot be empty")]
    EmptyPlayerName,

    /// Operation is only allowed on the setup screen.
    #[error("a round is already in progress")]
    RoundInProgress,
}

/// Errors raised while loading term catalogs.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("catalog parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Term ids must be unique within one catalog.
    #[error("duplicate term id {id} in {key}")]
    DuplicateId { key: CatalogKey, id: u32 },
}

/// Errors raised by key-value store writes.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(String),
}
