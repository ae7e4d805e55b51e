//! Round orchestrator - the API the UI shell drives.
//!
//! [`Game`] owns the roster, settings, imposter history and the current
//! session, and is built from an explicitly injected store, catalog source
//! and random source. Every method completes synchronously; the shell reads
//! the published state back after each call to render its screen.
//!
//! ```
//! use imposter_logic::prelude::*;
//! use rand::SeedableRng;
//!
//! let rng = rand::rngs::StdRng::seed_from_u64(7);
//! let mut game = Game::new(MemoryStore::new(), CatalogLibrary::embedded(), rng);
//! for name in ["Ruth", "Naomi", "Boaz"] {
//!     game.add_player(name).unwrap();
//! }
//! game.start_game().unwrap();
//! assert_eq!(game.status(), GameStatus::Playing);
//! ```

use rand::seq::SliceRandom;
use rand::Rng;
use uuid::Uuid;

use crate::catalog::{CatalogKey, CatalogSource, Difficulty, Language};
use crate::constants::MIN_PLAYERS;
use crate::error::GameError;
use crate::imposter::{select_imposter, ImposterHistory};
use crate::roster::{Player, Roster};
use crate::session::{GameSession, GameStatus, Role};
use crate::settings::Settings;
use crate::store::KeyValueStore;
use crate::word_history;

pub struct Game<S, C, R> {
    store: S,
    catalogs: C,
    rng: R,
    roster: Roster,
    settings: Settings,
    imposter_history: ImposterHistory,
    session: GameSession,
    /// Message for the blocking alert; `Some` means the error flag is set.
    error: Option<String>,
}

impl<S, C, R> Game<S, C, R>
where
    S: KeyValueStore,
    C: CatalogSource,
    R: Rng,
{
    /// Load roster, settings and imposter history from `store`.
    pub fn new(store: S, catalogs: C, rng: R) -> Self {
        let roster = Roster::load(&store);
        let settings = Settings::load(&store);
        let imposter_history = ImposterHistory::load(&store);
        log::info!(
            "Loaded {} players, catalog {}",
            roster.len(),
            settings.catalog_key()
        );

        Self {
            store,
            catalogs,
            rng,
            roster,
            settings,
            imposter_history,
            session: GameSession::new(),
            error: None,
        }
    }

    // ── Roster ──────────────────────────────────────────────────────────

    /// Append a player and persist the roster. Returns the new player's id.
    pub fn add_player(&mut self, name: &str) -> Result<Uuid, GameError> {
        self.ensure_setup()?;
        let id = self.roster.add(name)?.id;
        self.roster.save(&mut self.store);
        Ok(id)
    }

    /// Remove one player by id. Returns whether anyone was removed.
    pub fn remove_player(&mut self, id: Uuid) -> Result<bool, GameError> {
        self.ensure_setup()?;
        let removed = self.roster.remove(id).is_some();
        if removed {
            self.roster.save(&mut self.store);
        }
        Ok(removed)
    }

    /// Remove the players at the given display offsets.
    pub fn remove_players_at(&mut self, offsets: &[usize]) -> Result<usize, GameError> {
        self.ensure_setup()?;
        let removed = self.roster.remove_at(offsets);
        if removed > 0 {
            self.roster.save(&mut self.store);
        }
        Ok(removed)
    }

    pub fn remove_all_players(&mut self) -> Result<(), GameError> {
        self.ensure_setup()?;
        self.roster.clear();
        self.roster.save(&mut self.store);
        Ok(())
    }

    // ── Settings ────────────────────────────────────────────────────────

    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        self.settings.set_difficulty(&mut self.store, difficulty);
    }

    pub fn set_language(&mut self, language: Language) {
        self.settings.set_language(&mut self.store, language);
    }

    pub fn set_show_hint_for_imposter(&mut self, show: bool) {
        self.settings.set_show_hint_for_imposter(&mut self.store, show);
    }

    // ── Round lifecycle ─────────────────────────────────────────────────

    /// Start a round: draw the secret term, pick the imposter, pick who
    /// speaks first, and hand the device to the first player.
    ///
    /// With fewer than [`MIN_PLAYERS`] players this is a silent no-op that
    /// returns [`GameError::InsufficientPlayers`]. A missing or empty catalog
    /// sets the error message and returns [`GameError::EmptyCatalog`]. In
    /// both cases the session stays in `Setup` and nothing is persisted.
    pub fn start_game(&mut self) -> Result<(), GameError> {
        self.ensure_setup()?;
        if self.roster.len() < MIN_PLAYERS {
            return Err(GameError::InsufficientPlayers {
                have: self.roster.len(),
                need: MIN_PLAYERS,
            });
        }

        let key = self.settings.catalog_key();
        let term = match word_history::next_term(&self.catalogs, &mut self.store, key, &mut self.rng)
        {
            Ok(term) => term,
            Err(e) => {
                log::warn!("Cannot start round: {}", e);
                self.error = Some(empty_catalog_message(key));
                return Err(e);
            }
        };

        let players = self.roster.players();
        let imposter = select_imposter(players, &self.imposter_history, &mut self.rng)
            .map(|i| players[i].clone())
            .ok_or(GameError::InsufficientPlayers {
                have: players.len(),
                need: MIN_PLAYERS,
            })?;
        // Independent draw; may be the imposter.
        let starter_id = players
            .choose(&mut self.rng)
            .map(|p| p.id)
            .unwrap_or(imposter.id);

        self.imposter_history.record(imposter.name.clone());
        self.imposter_history.save(&mut self.store);

        log::trace!("Round term {:?}, imposter {:?}", term.text, imposter.name);
        self.session.begin(term, imposter.id, starter_id);
        log::info!(
            "Round started: {} players, catalog {}",
            self.roster.len(),
            key
        );
        Ok(())
    }

    /// Pass the device on. Finishes the round after the last player.
    pub fn next_player(&mut self) -> GameStatus {
        let status = self.session.advance(self.roster.len());
        if status == GameStatus::Finished {
            log::info!("All players have seen their role");
        }
        status
    }

    /// Back to the menu. Roster and settings are kept.
    pub fn reset_game(&mut self) {
        self.session.reset();
        log::debug!("Round reset");
    }

    /// Reveal-card text for `player_id`, honoring the hint setting.
    pub fn role(&self, player_id: Uuid) -> String {
        self.role_of(player_id).to_string()
    }

    pub fn role_of(&self, player_id: Uuid) -> Role {
        self.session
            .role(player_id, self.settings.show_hint_for_imposter)
    }

    // ── Published state ─────────────────────────────────────────────────

    pub fn status(&self) -> GameStatus {
        self.session.status
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn imposter_history(&self) -> &ImposterHistory {
        &self.imposter_history
    }

    pub fn current_player_index(&self) -> usize {
        self.session.current_player_index
    }

    /// Player holding the device, while a round is being played.
    pub fn current_player(&self) -> Option<&Player> {
        if self.session.status != GameStatus::Playing {
            return None;
        }
        self.roster.players().get(self.session.current_player_index)
    }

    /// Player who speaks first once everyone has seen their role.
    pub fn starting_player(&self) -> Option<&Player> {
        self.roster.get(self.session.starting_player_id?)
    }

    /// Pending error message, if the error flag is set.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Clear the error flag once the alert has been shown.
    pub fn dismiss_error(&mut self) -> Option<String> {
        self.error.take()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn ensure_setup(&self) -> Result<(), GameError> {
        if self.session.is_active() {
            return Err(GameError::RoundInProgress);
        }
        Ok(())
    }
}

fn empty_catalog_message(key: CatalogKey) -> String {
    format!(
        "Could not load words for {}. Please check the catalog files.",
        key
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Catalog, CatalogLibrary, Term};
    use crate::constants::keys;
    use crate::store::MemoryStore;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    type TestGame = Game<MemoryStore, CatalogLibrary, StdRng>;

    fn game_with(names: &[&str]) -> TestGame {
        let mut game = Game::new(
            MemoryStore::new(),
            CatalogLibrary::embedded(),
            StdRng::seed_from_u64(42),
        );
        for n in names {
            game.add_player(n).unwrap();
        }
        game
    }

    #[test]
    fn test_start_requires_three_players() {
        let mut game = game_with(&["A", "B"]);
        let before = game.store().clone();

        let err = game.start_game().unwrap_err();
        assert!(matches!(
            err,
            GameError::InsufficientPlayers { have: 2, need: 3 }
        ));
        assert_eq!(game.status(), GameStatus::Setup);
        assert_eq!(game.store(), &before);
        assert!(game.error().is_none());
    }

    #[test]
    fn test_start_sets_round_and_history() {
        let mut game = game_with(&["A", "B", "C"]);
        game.start_game().unwrap();

        let session = game.session();
        assert_eq!(session.status, GameStatus::Playing);
        assert!(session.secret_term.is_some());
        let imposter = game.roster().get(session.imposter_id.unwrap()).unwrap();
        assert_eq!(game.imposter_history().most_recent(), Some(imposter.name.as_str()));
        assert!(game.starting_player().is_some());
        assert_eq!(game.current_player().map(|p| p.name.as_str()), Some("A"));
        assert_eq!(
            game.store().get_texts(keys::IMPOSTER_HISTORY),
            Some(vec![imposter.name.clone()])
        );
    }

    #[test]
    fn test_empty_catalog_surfaces_error() {
        let mut game = Game::new(
            MemoryStore::new(),
            CatalogLibrary::new(),
            StdRng::seed_from_u64(1),
        );
        for n in ["A", "B", "C"] {
            game.add_player(n).unwrap();
        }
        let before = game.store().clone();

        let err = game.start_game().unwrap_err();
        assert!(matches!(err, GameError::EmptyCatalog { .. }));
        assert_eq!(game.status(), GameStatus::Setup);
        assert_eq!(game.store(), &before);
        assert_eq!(
            game.error(),
            Some("Could not load words for Easy (English). Please check the catalog files.")
        );
        assert!(game.dismiss_error().is_some());
        assert!(game.error().is_none());
    }

    #[test]
    fn test_walk_through_round() {
        let mut game = game_with(&["A", "B", "C", "D"]);
        game.start_game().unwrap();
        for _ in 0..3 {
            assert_eq!(game.next_player(), GameStatus::Playing);
        }
        assert_eq!(game.current_player_index(), 3);
        assert_eq!(game.next_player(), GameStatus::Finished);
        assert_eq!(game.current_player_index(), 3);
        assert!(game.current_player().is_none());

        game.reset_game();
        assert_eq!(game.status(), GameStatus::Setup);
        assert_eq!(game.session(), &GameSession::default());
        assert_eq!(game.roster().len(), 4);
    }

    #[test]
    fn test_roles_differ_for_imposter() {
        let mut game = game_with(&["A", "B", "C"]);
        game.start_game().unwrap();
        let imposter = game.session().imposter_id.unwrap();
        let term = game.session().secret_term.clone().unwrap();

        for p in game.roster().iter() {
            if p.id == imposter {
                assert_eq!(game.role(p.id), "You are the Imposter!");
            } else {
                assert_eq!(game.role(p.id), term.text);
            }
        }
    }

    #[test]
    fn test_hint_setting_reaches_role() {
        let mut game = game_with(&["A", "B", "C"]);
        game.set_show_hint_for_imposter(true);
        game.start_game().unwrap();
        let imposter = game.session().imposter_id.unwrap();
        let hint = game.session().secret_term.as_ref().unwrap().hint().unwrap().to_string();
        assert_eq!(
            game.role(imposter),
            format!("You are the Imposter!\nHint: {hint}")
        );
    }

    #[test]
    fn test_roster_locked_during_round() {
        let mut game = game_with(&["A", "B", "C"]);
        game.start_game().unwrap();
        assert!(matches!(game.add_player("D"), Err(GameError::RoundInProgress)));
        assert!(matches!(game.remove_all_players(), Err(GameError::RoundInProgress)));
        assert!(matches!(game.start_game(), Err(GameError::RoundInProgress)));
        assert_eq!(game.roster().len(), 3);
    }

    #[test]
    fn test_state_reloads_from_store() {
        let mut game = game_with(&["A", "B", "C"]);
        game.set_difficulty(Difficulty::Hard);
        game.start_game().unwrap();
        let history = game.imposter_history().clone();
        let store = game.store().clone();

        let reloaded: TestGame =
            Game::new(store, CatalogLibrary::embedded(), StdRng::seed_from_u64(5));
        assert_eq!(reloaded.roster(), game.roster());
        assert_eq!(reloaded.settings().difficulty, Difficulty::Hard);
        assert_eq!(reloaded.imposter_history(), &history);
        assert_eq!(reloaded.status(), GameStatus::Setup);
    }

    #[test]
    fn test_single_term_catalog_repeats_each_round() {
        let key = CatalogKey::new(Difficulty::Easy, Language::English);
        let mut library = CatalogLibrary::new();
        library.insert(Catalog::new(key, vec![Term::new(1, "Manna", None)]).unwrap());
        let mut game = Game::new(MemoryStore::new(), library, StdRng::seed_from_u64(3));
        for n in ["A", "B", "C"] {
            game.add_player(n).unwrap();
        }
        for _ in 0..3 {
            game.start_game().unwrap();
            assert_eq!(game.session().secret_term.as_ref().unwrap().text, "Manna");
            game.reset_game();
        }
    }

    #[test]
    fn test_remove_players() {
        let mut game = game_with(&["A", "B", "C", "D"]);
        let b = game.roster()[1].id;
        assert!(game.remove_player(b).unwrap());
        assert!(!game.remove_player(b).unwrap());
        assert_eq!(game.remove_players_at(&[0]).unwrap(), 1);
        let names: Vec<_> = game.roster().iter().map(|p| p.name.clone()).collect();
        assert_eq!(names, ["C", "D"]);
        game.remove_all_players().unwrap();
        assert!(game.roster().is_empty());
        assert_eq!(game.store().get_text(keys::ROSTER).as_deref(), Some("[]"));
    }
}
