//! Term catalogs keyed by difficulty and language.
//!
//! Each (difficulty, language) pair names one fixed list of terms. The six
//! shipped lists are embedded at compile time from `data/catalogs/` and
//! parsed once when a [`CatalogLibrary`] is built. A directory of JSON files
//! with the same names can replace them at startup.
//!
//! ```
//! use imposter_logic::catalog::{CatalogKey, CatalogLibrary, CatalogSource, Difficulty, Language};
//!
//! let library = CatalogLibrary::embedded();
//! let key = CatalogKey::new(Difficulty::Easy, Language::English);
//! assert!(!library.catalog(key).unwrap().is_empty());
//! ```

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::CatalogError;

// ── Embedded data (same JSON files the original app bundled) ────────────
const EASY_EN: &str = include_str!("../../../data/catalogs/easy.json");
const EASY_ZH: &str = include_str!("../../../data/catalogs/easy-zh.json");
const EASY_ES: &str = include_str!("../../../data/catalogs/easy-es.json");
const HARD_EN: &str = include_str!("../../../data/catalogs/hard.json");
const HARD_ZH: &str = include_str!("../../../data/catalogs/hard-zh.json");
const HARD_ES: &str = include_str!("../../../data/catalogs/hard-es.json");

/// Term difficulty tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Difficulty {
    Easy,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 2] = [Difficulty::Easy, Difficulty::Hard];

    /// Display label, also the persisted value.
    pub fn label(self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Hard => "Hard",
        }
    }

    /// File stem of the catalog for this tier.
    pub fn file_stem(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Hard => "hard",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.label() == label)
    }
}

/// Catalog language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    English,
    Chinese,
    Spanish,
}

impl Language {
    pub const ALL: [Language; 3] = [Language::English, Language::Chinese, Language::Spanish];

    /// Display label, also the persisted value.
    pub fn label(self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Chinese => "中文",
            Language::Spanish => "Español",
        }
    }

    /// Suffix appended to the difficulty stem in catalog file names.
    pub fn file_suffix(self) -> &'static str {
        match self {
            Language::English => "",
            Language::Chinese => "-zh",
            Language::Spanish => "-es",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|l| l.label() == label)
    }
}

/// Identifies one fixed term list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CatalogKey {
    pub difficulty: Difficulty,
    pub language: Language,
}

impl CatalogKey {
    pub fn new(difficulty: Difficulty, language: Language) -> Self {
        Self {
            difficulty,
            language,
        }
    }

    /// Every shipped (difficulty, language) combination.
    pub fn all() -> impl Iterator<Item = CatalogKey> {
        Difficulty::ALL.into_iter().flat_map(|difficulty| {
            Language::ALL
                .into_iter()
                .map(move |language| CatalogKey::new(difficulty, language))
        })
    }

    /// `easy.json`, `hard-zh.json`, ...
    pub fn file_name(self) -> String {
        format!(
            "{}{}.json",
            self.difficulty.file_stem(),
            self.language.file_suffix()
        )
    }
}

impl fmt::Display for CatalogKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.difficulty.label(), self.language.label())
    }
}

/// A secret term and its optional category hint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Term {
    pub id: u32,
    #[serde(rename = "term")]
    pub text: String,
    #[serde(default)]
    pub hint: Option<String>,
}

impl Term {
    pub fn new(id: u32, text: impl Into<String>, hint: Option<&str>) -> Self {
        Self {
            id,
            text: text.into(),
            hint: hint.map(str::to_string),
        }
    }

    /// The hint, treating a blank string as absent.
    pub fn hint(&self) -> Option<&str> {
        self.hint.as_deref().map(str::trim).filter(|h| !h.is_empty())
    }
}

/// Immutable term list for one key.
#[derive(Debug, Clone)]
pub struct Catalog {
    key: CatalogKey,
    terms: Vec<Term>,
}

impl Catalog {
    /// Build a catalog, rejecting duplicate term ids.
    pub fn new(key: CatalogKey, terms: Vec<Term>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::with_capacity(terms.len());
        for term in &terms {
            if !seen.insert(term.id) {
                return Err(CatalogError::DuplicateId { key, id: term.id });
            }
        }
        Ok(Self { key, terms })
    }

    /// Parse a JSON array of `{ "id", "term", "hint" }` objects.
    pub fn parse(key: CatalogKey, json: &str) -> Result<Self, CatalogError> {
        let terms: Vec<Term> = serde_json::from_str(json)?;
        Self::new(key, terms)
    }

    pub fn key(&self) -> CatalogKey {
        self.key
    }

    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn contains_id(&self, id: u32) -> bool {
        self.terms.iter().any(|t| t.id == id)
    }
}

/// Read-only source of catalogs, loaded once.
pub trait CatalogSource {
    fn catalog(&self, key: CatalogKey) -> Option<&Catalog>;
}

/// All catalogs available to a running game.
#[derive(Debug, Clone, Default)]
pub struct CatalogLibrary {
    catalogs: HashMap<CatalogKey, Catalog>,
}

impl CatalogLibrary {
    /// Empty library; every lookup misses.
    pub fn new() -> Self {
        Self::default()
    }

    /// The six catalogs compiled into the binary.
    ///
    /// A catalog that fails to parse is logged and left out, so lookups for
    /// its key behave as a missing catalog.
    pub fn embedded() -> Self {
        let mut library = Self::new();
        for key in CatalogKey::all() {
            match Catalog::parse(key, embedded_json(key)) {
                Ok(catalog) => library.insert(catalog),
                Err(e) => log::error!("Embedded catalog {} is invalid: {}", key, e),
            }
        }
        log::debug!("Loaded {} embedded catalogs", library.len());
        library
    }

    /// Load `<stem><suffix>.json` files from `dir`.
    ///
    /// Missing or malformed files are skipped with a warning. Fails only if
    /// the directory itself cannot be read.
    pub fn from_dir(dir: &Path) -> Result<Self, CatalogError> {
        if !dir.is_dir() {
            return Err(CatalogError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("catalog directory {} not found", dir.display()),
            )));
        }

        let mut library = Self::new();
        for key in CatalogKey::all() {
            let path = dir.join(key.file_name());
            let json = match std::fs::read_to_string(&path) {
                Ok(json) => json,
                Err(e) => {
                    log::warn!("Skipping catalog {}: {}", path.display(), e);
                    continue;
                }
            };
            match Catalog::parse(key, &json) {
                Ok(catalog) => library.insert(catalog),
                Err(e) => log::warn!("Skipping catalog {}: {}", path.display(), e),
            }
        }
        log::info!(
            "Loaded {} catalogs from {}",
            library.len(),
            dir.display()
        );
        Ok(library)
    }

    /// Add or replace the catalog for its key.
    pub fn insert(&mut self, catalog: Catalog) {
        self.catalogs.insert(catalog.key(), catalog);
    }

    pub fn len(&self) -> usize {
        self.catalogs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.catalogs.is_empty()
    }
}

impl CatalogSource for CatalogLibrary {
    fn catalog(&self, key: CatalogKey) -> Option<&Catalog> {
        self.catalogs.get(&key)
    }
}

fn embedded_json(key: CatalogKey) -> &'static str {
    match (key.difficulty, key.language) {
        (Difficulty::Easy, Language::English) => EASY_EN,
        (Difficulty::Easy, Language::Chinese) => EASY_ZH,
        (Difficulty::Easy, Language::Spanish) => EASY_ES,
        (Difficulty::Hard, Language::English) => HARD_EN,
        (Difficulty::Hard, Language::Chinese) => HARD_ZH,
        (Difficulty::Hard, Language::Spanish) => HARD_ES,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key() -> CatalogKey {
        CatalogKey::new(Difficulty::Easy, Language::English)
    }

    #[test]
    fn test_embedded_catalogs_all_present() {
        let library = CatalogLibrary::embedded();
        assert_eq!(library.len(), 6);
        for key in CatalogKey::all() {
            let catalog = library.catalog(key).unwrap();
            assert!(!catalog.is_empty(), "{} is empty", key);
            assert!(catalog.terms().iter().all(|t| t.hint().is_some()));
        }
    }

    #[test]
    fn test_file_names() {
        assert_eq!(key().file_name(), "easy.json");
        assert_eq!(
            CatalogKey::new(Difficulty::Hard, Language::Chinese).file_name(),
            "hard-zh.json"
        );
    }

    #[test]
    fn test_labels_round_trip() {
        for d in Difficulty::ALL {
            assert_eq!(Difficulty::from_label(d.label()), Some(d));
        }
        for l in Language::ALL {
            assert_eq!(Language::from_label(l.label()), Some(l));
        }
        assert_eq!(Difficulty::from_label("Medium"), None);
    }

    #[test]
    fn test_parse_reads_term_field_and_optional_hint() {
        let json = r#"[{"id": 1, "term": "Noah", "hint": "Person"}, {"id": 2, "term": "Ark"}]"#;
        let catalog = Catalog::parse(key(), json).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.terms()[0].text, "Noah");
        assert_eq!(catalog.terms()[0].hint(), Some("Person"));
        assert_eq!(catalog.terms()[1].hint(), None);
    }

    #[test]
    fn test_blank_hint_is_absent() {
        let term = Term::new(1, "Noah", Some("   "));
        assert_eq!(term.hint(), None);
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let json = r#"[{"id": 1, "term": "Noah"}, {"id": 1, "term": "Moses"}]"#;
        let err = Catalog::parse(key(), json).unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateId { id: 1, .. }));
    }

    #[test]
    fn test_malformed_json_rejected() {
        assert!(matches!(
            Catalog::parse(key(), "not json"),
            Err(CatalogError::Json(_))
        ));
    }

    #[test]
    fn test_dir_skips_malformed_catalog() {
        use crate::error::GameError;
        use crate::store::MemoryStore;
        use crate::word_history::next_term;
        use rand::rngs::StdRng;
        use rand::SeedableRng;

        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("easy.json"),
            r#"[{"id": 1, "term": "Noah", "hint": "Person"}]"#,
        )
        .unwrap();
        std::fs::write(dir.path().join("hard.json"), "[{\"id\": 1, \"term\"").unwrap();

        let library = CatalogLibrary::from_dir(dir.path()).unwrap();
        let hard = CatalogKey::new(Difficulty::Hard, Language::English);
        assert_eq!(library.len(), 1);
        assert_eq!(library.catalog(key()).unwrap().terms()[0].text, "Noah");
        assert!(library.catalog(hard).is_none());

        let mut store = MemoryStore::new();
        let mut rng = StdRng::seed_from_u64(5);
        let err = next_term(&library, &mut store, hard, &mut rng).unwrap_err();
        assert!(matches!(err, GameError::EmptyCatalog { key: k } if k == hard));
        assert!(store.is_empty());
    }

    #[test]
    fn test_missing_directory_is_error() {
        let result = CatalogLibrary::from_dir(Path::new("/definitely/not/a/catalog/dir"));
        assert!(matches!(result, Err(CatalogError::Io(_))));
    }
}
