//! Recency-weighted imposter selection.
//!
//! The last [`IMPOSTER_HISTORY_CAP`] imposters are remembered by name,
//! newest first. Each roster member gets a weight from their position in
//! that history (see [`crate::constants::weights`]) and one member is drawn
//! with probability proportional to weight. The most recent imposter has
//! weight zero, so nobody is imposter twice in a row, and older entries
//! climb back toward full weight as they age out.

use rand::seq::IteratorRandom;
use rand::Rng;

use crate::constants::{keys, weights, IMPOSTER_HISTORY_CAP};
use crate::roster::Player;
use crate::store::{log_write_failure, KeyValueStore, StoredValue};

/// Names of recent imposters, newest first, at most
/// [`IMPOSTER_HISTORY_CAP`] long.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImposterHistory {
    names: Vec<String>,
}

impl ImposterHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from names in newest-first order, keeping the newest
    /// [`IMPOSTER_HISTORY_CAP`].
    pub fn from_names<I, T>(names: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self {
            names: names
                .into_iter()
                .map(Into::into)
                .take(IMPOSTER_HISTORY_CAP)
                .collect(),
        }
    }

    /// Read from the store; a missing or malformed entry is an empty history.
    pub fn load<S: KeyValueStore + ?Sized>(store: &S) -> Self {
        Self::from_names(store.get_texts(keys::IMPOSTER_HISTORY).unwrap_or_default())
    }

    pub fn save<S: KeyValueStore + ?Sized>(&self, store: &mut S) {
        log_write_failure(
            keys::IMPOSTER_HISTORY,
            store.set(
                keys::IMPOSTER_HISTORY,
                StoredValue::Texts(self.names.clone()),
            ),
        );
    }

    /// Push `name` to the front, evicting the oldest entry past the cap.
    pub fn record(&mut self, name: impl Into<String>) {
        self.names.insert(0, name.into());
        self.names.truncate(IMPOSTER_HISTORY_CAP);
    }

    /// Position of the newest occurrence of `name`, 0 = most recent.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    pub fn most_recent(&self) -> Option<&str> {
        self.names.first().map(String::as_str)
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Selection weight for a player at `position` in the history.
pub fn recency_weight(position: Option<usize>) -> f64 {
    match position {
        None => weights::NOT_RECENT,
        Some(0) => weights::MOST_RECENT,
        Some(1) => weights::SECOND,
        // Clamp never binds at the current cap of 7 (position 6 is 0.97).
        Some(p) => (weights::THIRD + weights::STEP * (p - 2) as f64).min(weights::CEILING),
    }
}

/// Weight for every roster member, in roster order.
pub fn imposter_weights(roster: &[Player], history: &ImposterHistory) -> Vec<f64> {
    roster
        .iter()
        .map(|p| recency_weight(history.position(&p.name)))
        .collect()
}

/// Walk `weights` accumulating, returning the first index whose running
/// total is strictly greater than `draw`.
///
/// A draw landing exactly on a boundary belongs to the next entry. If float
/// rounding leaves `draw` at or past the total, the last positive-weight
/// entry is returned. `None` only when no weight is positive.
pub fn pick_weighted(weights: &[f64], draw: f64) -> Option<usize> {
    let mut cumulative = 0.0;
    for (i, &w) in weights.iter().enumerate() {
        cumulative += w;
        if draw < cumulative {
            return Some(i);
        }
    }
    weights.iter().rposition(|&w| w > 0.0)
}

/// Pick the imposter's roster index.
///
/// Returns `None` only for an empty roster. When every weight is zero the
/// draw falls back to a uniform choice among players other than the most
/// recent imposter, or among everyone if that leaves nobody.
pub fn select_imposter<R: Rng + ?Sized>(
    roster: &[Player],
    history: &ImposterHistory,
    rng: &mut R,
) -> Option<usize> {
    if roster.is_empty() {
        return None;
    }

    let weights = imposter_weights(roster, history);
    let total: f64 = weights.iter().sum();

    if total > 0.0 {
        let draw = rng.gen_range(0.0..total);
        log::debug!("Imposter draw {:.3} of {:.3}", draw, total);
        return pick_weighted(&weights, draw);
    }

    log::debug!("All imposter weights zero, falling back to uniform draw");
    let most_recent = history.most_recent();
    (0..roster.len())
        .filter(|&i| Some(roster[i].name.as_str()) != most_recent)
        .choose(rng)
        .or_else(|| (0..roster.len()).choose(rng))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn players(names: &[&str]) -> Vec<Player> {
        names.iter().map(|n| Player::new(*n)).collect()
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_recency_weight_table() {
        let expected = [0.0, 0.80, 0.85, 0.88, 0.91, 0.94, 0.97];
        assert!(approx(recency_weight(None), 1.0));
        for (pos, want) in expected.iter().enumerate() {
            assert!(
                approx(recency_weight(Some(pos)), *want),
                "position {pos}: got {}",
                recency_weight(Some(pos))
            );
        }
    }

    #[test]
    fn test_recency_weight_clamped() {
        assert!(approx(recency_weight(Some(7)), 0.98));
        assert!(approx(recency_weight(Some(50)), 0.98));
    }

    #[test]
    fn test_uniform_example_draw() {
        let roster = players(&["A", "B", "C"]);
        let w = imposter_weights(&roster, &ImposterHistory::new());
        assert_eq!(w, vec![1.0, 1.0, 1.0]);
        assert_eq!(pick_weighted(&w, 2.5), Some(2));
        assert_eq!(pick_weighted(&w, 0.0), Some(0));
    }

    #[test]
    fn test_boundary_draw_advances() {
        assert_eq!(pick_weighted(&[1.0, 1.0, 1.0], 1.0), Some(1));
        assert_eq!(pick_weighted(&[1.0, 1.0, 1.0], 2.0), Some(2));
    }

    #[test]
    fn test_zero_weight_never_picked() {
        let w = [1.0, 1.0, 0.0];
        for step in 0..200 {
            let draw = f64::from(step) * 0.01;
            assert_ne!(pick_weighted(&w, draw), Some(2));
        }
    }

    #[test]
    fn test_overshoot_returns_last_positive() {
        assert_eq!(pick_weighted(&[1.0, 1.0, 0.0], 2.0), Some(1));
        assert_eq!(pick_weighted(&[0.0, 0.0], 0.0), None);
    }

    #[test]
    fn test_most_recent_excluded_example() {
        let roster = players(&["A", "B", "C"]);
        let history = ImposterHistory::from_names(["C"]);
        assert_eq!(imposter_weights(&roster, &history), vec![1.0, 1.0, 0.0]);

        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..500 {
            assert_ne!(select_imposter(&roster, &history, &mut rng), Some(2));
        }
    }

    #[test]
    fn test_degenerate_single_player() {
        let roster = players(&["Solo"]);
        let history = ImposterHistory::from_names(["Solo"]);
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(select_imposter(&roster, &history, &mut rng), Some(0));
    }

    #[test]
    fn test_degenerate_duplicate_names() {
        // Two players sharing the most recent imposter's name both weigh zero.
        let roster = players(&["Sam", "Sam"]);
        let history = ImposterHistory::from_names(["Sam"]);
        let mut rng = StdRng::seed_from_u64(9);
        let pick = select_imposter(&roster, &history, &mut rng);
        assert!(matches!(pick, Some(0) | Some(1)));
    }

    #[test]
    fn test_empty_roster() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(select_imposter(&[], &ImposterHistory::new(), &mut rng), None);
    }

    #[test]
    fn test_history_record_caps_newest_first() {
        let mut history = ImposterHistory::new();
        for i in 0..10 {
            history.record(format!("p{i}"));
        }
        assert_eq!(history.len(), IMPOSTER_HISTORY_CAP);
        assert_eq!(history.most_recent(), Some("p9"));
        assert_eq!(history.names().last().map(String::as_str), Some("p3"));
    }

    #[test]
    fn test_history_load_truncates_oversized() {
        let mut store = crate::store::MemoryStore::new();
        let names: Vec<String> = (0..12).map(|i| format!("n{i}")).collect();
        store
            .set(keys::IMPOSTER_HISTORY, StoredValue::Texts(names))
            .unwrap();
        let history = ImposterHistory::load(&store);
        assert_eq!(history.len(), IMPOSTER_HISTORY_CAP);
        assert_eq!(history.most_recent(), Some("n0"));
    }

    #[test]
    fn test_recent_imposters_chosen_less_often() {
        let roster = players(&["A", "B", "C", "D"]);
        let history = ImposterHistory::from_names(["A", "B"]);
        let mut rng = StdRng::seed_from_u64(2024);
        let mut counts = [0usize; 4];
        for _ in 0..20_000 {
            let i = select_imposter(&roster, &history, &mut rng).unwrap();
            counts[i] += 1;
        }
        assert_eq!(counts[0], 0);
        assert!(counts[1] < counts[2]);
        assert!(counts[1] < counts[3]);
    }
}
