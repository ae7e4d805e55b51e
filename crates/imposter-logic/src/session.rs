//! Round state machine.
//!
//! ```text
//! Setup ──begin──▶ Playing ──advance (last player)──▶ Finished
//!   ▲                 │ advance                          │
//!   │                 └────────◀─────┘                   │
//!   └──────────────────────────reset─────────────────────┘
//! ```
//!
//! The session holds only what one round needs. It never touches the roster
//! or the store; [`crate::game::Game`] drives it.

use std::fmt;

use uuid::Uuid;

use crate::catalog::Term;
use crate::constants::roles;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GameStatus {
    #[default]
    Setup,
    Playing,
    Finished,
}

/// What a player sees on the reveal card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Role {
    /// The player does not know the term. `hint` is set only when the hint
    /// setting is on and the term has one.
    Imposter { hint: Option<String> },
    /// The player sees the secret term.
    Civilian { term: String },
    /// No round in progress.
    Unassigned,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Imposter { hint: None } => f.write_str(roles::IMPOSTER),
            Role::Imposter { hint: Some(hint) } => {
                write!(f, "{}\n{}{}", roles::IMPOSTER, roles::HINT_PREFIX, hint)
            }
            Role::Civilian { term } => f.write_str(term),
            Role::Unassigned => f.write_str(roles::UNASSIGNED),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GameSession {
    pub status: GameStatus,
    pub secret_term: Option<Term>,
    pub imposter_id: Option<Uuid>,
    pub starting_player_id: Option<Uuid>,
    pub current_player_index: usize,
}

impl GameSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enter `Playing` with the first player up.
    pub fn begin(&mut self, term: Term, imposter_id: Uuid, starting_player_id: Uuid) {
        self.secret_term = Some(term);
        self.imposter_id = Some(imposter_id);
        self.starting_player_id = Some(starting_player_id);
        self.current_player_index = 0;
        self.status = GameStatus::Playing;
    }

    /// Hand over to the next player, or finish after the last one.
    ///
    /// Does nothing outside `Playing`. The index never passes
    /// `player_count - 1`.
    pub fn advance(&mut self, player_count: usize) -> GameStatus {
        if self.status != GameStatus::Playing {
            return self.status;
        }
        if self.current_player_index + 1 < player_count {
            self.current_player_index += 1;
        } else {
            self.status = GameStatus::Finished;
        }
        self.status
    }

    /// Back to `Setup` with all round data cleared.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn is_active(&self) -> bool {
        self.status != GameStatus::Setup
    }

    pub fn role(&self, player_id: Uuid, show_hint: bool) -> Role {
        let Some(term) = &self.secret_term else {
            return Role::Unassigned;
        };
        if self.imposter_id == Some(player_id) {
            let hint = if show_hint {
                term.hint().map(str::to_string)
            } else {
                None
            };
            Role::Imposter { hint }
        } else {
            Role::Civilian {
                term: term.text.clone(),
            }
        }
    }

    /// Reveal-card text for `player_id`.
    pub fn role_text(&self, player_id: Uuid, show_hint: bool) -> String {
        self.role(player_id, show_hint).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn started() -> (GameSession, Uuid, Uuid) {
        let imposter = Uuid::new_v4();
        let other = Uuid::new_v4();
        let mut session = GameSession::new();
        session.begin(Term::new(3, "Jericho", Some("Place")), imposter, other);
        (session, imposter, other)
    }

    #[test]
    fn test_begin_enters_playing() {
        let (session, imposter, other) = started();
        assert_eq!(session.status, GameStatus::Playing);
        assert_eq!(session.imposter_id, Some(imposter));
        assert_eq!(session.starting_player_id, Some(other));
        assert_eq!(session.current_player_index, 0);
    }

    #[test]
    fn test_advance_finishes_on_last_player() {
        let (mut session, _, _) = started();
        assert_eq!(session.advance(3), GameStatus::Playing);
        assert_eq!(session.advance(3), GameStatus::Playing);
        assert_eq!(session.current_player_index, 2);
        assert_eq!(session.advance(3), GameStatus::Finished);
        assert_eq!(session.current_player_index, 2);
        // Further calls are inert.
        assert_eq!(session.advance(3), GameStatus::Finished);
        assert_eq!(session.current_player_index, 2);
    }

    #[test]
    fn test_advance_in_setup_is_noop() {
        let mut session = GameSession::new();
        assert_eq!(session.advance(3), GameStatus::Setup);
        assert_eq!(session.current_player_index, 0);
    }

    #[test]
    fn test_reset_clears_round() {
        let (mut session, _, _) = started();
        session.advance(3);
        session.reset();
        assert_eq!(session, GameSession::default());
    }

    #[test]
    fn test_roles() {
        let (session, imposter, other) = started();
        assert_eq!(session.role_text(other, false), "Jericho");
        assert_eq!(session.role_text(imposter, false), roles::IMPOSTER);
        assert_eq!(
            session.role_text(imposter, true),
            "You are the Imposter!\nHint: Place"
        );
        assert_ne!(session.role_text(imposter, true), session.role_text(other, true));
    }

    #[test]
    fn test_hint_setting_without_hint() {
        let imposter = Uuid::new_v4();
        let mut session = GameSession::new();
        session.begin(Term::new(1, "Ark", None), imposter, imposter);
        assert_eq!(session.role(imposter, true), Role::Imposter { hint: None });
    }

    #[test]
    fn test_role_before_round_is_sentinel() {
        let session = GameSession::new();
        assert_eq!(session.role(Uuid::new_v4(), true), Role::Unassigned);
        assert_eq!(session.role_text(Uuid::new_v4(), false), "Error");
    }
}
