//! Pure game logic for Bible Imposter.
//!
//! This crate contains all round logic that is independent of any UI,
//! terminal, or storage backend. State is read from and written to an
//! injected [`store::KeyValueStore`], terms come from an injected
//! [`catalog::CatalogSource`], and every random draw goes through an
//! injected [`rand::Rng`], so a whole round can be replayed in a unit test
//! with an in-memory store and a seeded generator.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`catalog`] | Difficulty/language keys, terms, embedded catalog library |
//! | [`constants`] | Player minimum, history cap, recency weights, role text, store keys |
//! | [`error`] | Error enums for rounds, catalogs and stores |
//! | [`game`] | Round orchestrator the UI shell talks to |
//! | [`imposter`] | Recency-weighted imposter selection and its bounded history |
//! | [`roster`] | Ordered player list with persistence |
//! | [`session`] | Round state machine and role lookup |
//! | [`settings`] | Persisted difficulty, language and hint toggle |
//! | [`store`] | Key-value store contract and in-memory implementation |
//! | [`word_history`] | No-repeat term selection cycling through a catalog |

pub mod catalog;
pub mod constants;
pub mod error;
pub mod game;
pub mod imposter;
pub mod roster;
pub mod session;
pub mod settings;
pub mod store;
pub mod word_history;

/// Commonly used types for convenient importing
pub mod prelude {
    pub use crate::catalog::{CatalogKey, CatalogLibrary, CatalogSource, Difficulty, Language, Term};
    pub use crate::error::GameError;
    pub use crate::game::Game;
    pub use crate::roster::{Player, Roster};
    pub use crate::session::{GameStatus, Role};
    pub use crate::settings::Settings;
    pub use crate::store::{KeyValueStore, MemoryStore, StoredValue};
}
