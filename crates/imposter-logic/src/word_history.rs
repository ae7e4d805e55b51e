//! No-repeat term selection.
//!
//! Every catalog key has its own served-term history in the store. A term
//! is drawn uniformly from the terms not yet in that history. Once every
//! term has been served the history is cleared and the whole catalog is
//! eligible again, so no term repeats until all others have been seen.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::catalog::{Catalog, CatalogKey, CatalogSource, Term};
use crate::constants::keys;
use crate::error::GameError;
use crate::store::{log_write_failure, KeyValueStore, StoredValue};

/// Term ids served from one catalog since its last full cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionHistory {
    ids: Vec<u32>,
}

impl SelectionHistory {
    /// Read the history for `catalog` from the store.
    ///
    /// Ids that are negative, out of range, duplicated, or no longer in the
    /// catalog are dropped, so the result never repeats an id and is never
    /// longer than the catalog.
    pub fn load<S: KeyValueStore + ?Sized>(store: &S, catalog: &Catalog) -> Self {
        let raw = store
            .get_ints(&keys::term_history(catalog.key()))
            .unwrap_or_default();

        let mut ids: Vec<u32> = Vec::with_capacity(raw.len());
        for value in raw {
            let Ok(id) = u32::try_from(value) else {
                continue;
            };
            if catalog.contains_id(id) && !ids.contains(&id) {
                ids.push(id);
            }
        }
        Self { ids }
    }

    pub fn save<S: KeyValueStore + ?Sized>(&self, store: &mut S, key: CatalogKey) {
        let store_key = keys::term_history(key);
        let values = self.ids.iter().map(|&id| i64::from(id)).collect();
        log_write_failure(&store_key, store.set(&store_key, StoredValue::Ints(values)));
    }

    pub fn contains(&self, id: u32) -> bool {
        self.ids.contains(&id)
    }

    pub fn ids(&self) -> &[u32] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Serve the next unseen term for `key` and record it.
///
/// Fails with [`GameError::EmptyCatalog`] if the catalog is missing or has
/// no terms; the store is untouched in that case.
pub fn next_term<C, S, R>(
    catalogs: &C,
    store: &mut S,
    key: CatalogKey,
    rng: &mut R,
) -> Result<Term, GameError>
where
    C: CatalogSource + ?Sized,
    S: KeyValueStore + ?Sized,
    R: Rng + ?Sized,
{
    let catalog = catalogs
        .catalog(key)
        .filter(|c| !c.is_empty())
        .ok_or(GameError::EmptyCatalog { key })?;

    let mut history = SelectionHistory::load(&*store, catalog);

    let mut available: Vec<&Term> = catalog
        .terms()
        .iter()
        .filter(|t| !history.contains(t.id))
        .collect();

    if available.is_empty() {
        log::info!(
            "All {} terms in {} served, starting a new cycle",
            catalog.len(),
            key
        );
        let store_key = keys::term_history(key);
        log_write_failure(&store_key, store.remove(&store_key));
        history = SelectionHistory::default();
        available = catalog.terms().iter().collect();
    }

    let chosen = available
        .choose(rng)
        .copied()
        .cloned()
        .ok_or(GameError::EmptyCatalog { key })?;

    history.ids.push(chosen.id);
    history.save(store, key);
    log::debug!(
        "Served term from {} ({}/{} in cycle)",
        key,
        history.len(),
        catalog.len()
    );

    Ok(chosen)
}
