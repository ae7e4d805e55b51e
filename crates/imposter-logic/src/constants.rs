//! Game constants: player minimum, history sizes, recency weights, role
//! text and the logical key space of the persisted store.

/// Fewer players than this cannot start a round.
pub const MIN_PLAYERS: usize = 3;

/// Number of recent imposters remembered, newest first.
pub const IMPOSTER_HISTORY_CAP: usize = 7;

/// Recency weights for imposter selection.
///
/// | history position | weight |
/// |---|---|
/// | absent | 1.00 |
/// | 0 | 0.00 |
/// | 1 | 0.80 |
/// | p ≥ 2 | 0.85 + 0.03 × (p − 2), at most 0.98 |
pub mod weights {
    /// Weight of a player who is not in the recent history.
    pub const NOT_RECENT: f64 = 1.0;
    /// Weight of the most recent imposter.
    pub const MOST_RECENT: f64 = 0.0;
    /// Weight of the imposter from two rounds ago.
    pub const SECOND: f64 = 0.80;
    /// Weight of the imposter from three rounds ago.
    pub const THIRD: f64 = 0.85;
    /// Added per position after the third.
    pub const STEP: f64 = 0.03;
    /// Upper clamp for any remembered player.
    pub const CEILING: f64 = 0.98;
}

/// Text shown on the reveal card.
pub mod roles {
    pub const IMPOSTER: &str = "You are the Imposter!";
    pub const HINT_PREFIX: &str = "Hint: ";
    /// Returned when a role is asked for outside a round.
    pub const UNASSIGNED: &str = "Error";
}

/// Logical keys in the key-value store.
pub mod keys {
    use crate::catalog::CatalogKey;

    pub const ROSTER: &str = "user_roster_cache";
    pub const DIFFICULTY: &str = "selected_difficulty";
    pub const LANGUAGE: &str = "selected_language";
    pub const SHOW_HINT: &str = "show_hint_for_imposter";
    pub const IMPOSTER_HISTORY: &str = "imposter_history";

    /// Per-catalog served-term history, e.g. `history_Easy_English`.
    pub fn term_history(key: CatalogKey) -> String {
        format!(
            "history_{}_{}",
            key.difficulty.label(),
            key.language.label()
        )
    }
}
