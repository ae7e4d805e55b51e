//! Persisted player-facing settings.
//!
//! Each field lives under its own key and is loaded on its own, so a bad
//! value for one setting resets only that setting.

use crate::catalog::{CatalogKey, Difficulty, Language};
use crate::constants::keys;
use crate::store::{log_write_failure, KeyValueStore, StoredValue};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    pub difficulty: Difficulty,
    pub language: Language,
    /// Show the term's category hint on the imposter's reveal card.
    pub show_hint_for_imposter: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Easy,
            language: Language::English,
            show_hint_for_imposter: false,
        }
    }
}

impl Settings {
    pub fn load<S: KeyValueStore + ?Sized>(store: &S) -> Self {
        let defaults = Self::default();

        let difficulty = match store.get_text(keys::DIFFICULTY) {
            Some(label) => Difficulty::from_label(&label).unwrap_or_else(|| {
                log::warn!("Unknown difficulty '{}', using default", label);
                defaults.difficulty
            }),
            None => defaults.difficulty,
        };
        let language = match store.get_text(keys::LANGUAGE) {
            Some(label) => Language::from_label(&label).unwrap_or_else(|| {
                log::warn!("Unknown language '{}', using default", label);
                defaults.language
            }),
            None => defaults.language,
        };
        let show_hint_for_imposter = store
            .get_flag(keys::SHOW_HINT)
            .unwrap_or(defaults.show_hint_for_imposter);

        Self {
            difficulty,
            language,
            show_hint_for_imposter,
        }
    }

    /// Catalog the next round draws from.
    pub fn catalog_key(&self) -> CatalogKey {
        CatalogKey::new(self.difficulty, self.language)
    }

    pub fn set_difficulty<S: KeyValueStore + ?Sized>(&mut self, store: &mut S, value: Difficulty) {
        self.difficulty = value;
        let stored = StoredValue::Text(value.label().to_string());
        log_write_failure(keys::DIFFICULTY, store.set(keys::DIFFICULTY, stored));
    }

    pub fn set_language<S: KeyValueStore + ?Sized>(&mut self, store: &mut S, value: Language) {
        self.language = value;
        let stored = StoredValue::Text(value.label().to_string());
        log_write_failure(keys::LANGUAGE, store.set(keys::LANGUAGE, stored));
    }

    pub fn set_show_hint_for_imposter<S: KeyValueStore + ?Sized>(
        &mut self,
        store: &mut S,
        value: bool,
    ) {
        self.show_hint_for_imposter = value;
        log_write_failure(keys::SHOW_HINT, store.set(keys::SHOW_HINT, StoredValue::Flag(value)));
    }
}
