//! Bible Imposter Headless Round Harness
//!
//! Validates catalog data and selection behavior over thousands of rounds.
//! Runs entirely in-process against an in-memory store.
//!
//! Usage:
//!   cargo run -p imposter-simtest
//!   cargo run -p imposter-simtest -- --verbose

use std::collections::{HashMap, HashSet};

use imposter_logic::catalog::{CatalogKey, CatalogLibrary, CatalogSource};
use imposter_logic::constants::IMPOSTER_HISTORY_CAP;
use imposter_logic::game::Game;
use imposter_logic::imposter::{select_imposter, ImposterHistory};
use imposter_logic::roster::Player;
use imposter_logic::session::GameStatus;
use imposter_logic::store::MemoryStore;
use imposter_logic::word_history::next_term;
use rand::rngs::StdRng;
use rand::SeedableRng;

const SEED: u64 = 0x1b1e;
const ROUNDS: usize = 5_000;

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

fn main() {
    let verbose = std::env::args().any(|a| a == "--verbose");
    println!("=== Bible Imposter Round Harness ===\n");

    let mut results = Vec::new();

    // 1. Embedded catalog validation
    results.extend(validate_catalogs(verbose));

    // 2. Word cycling per catalog
    results.extend(validate_word_cycles(verbose));

    // 3. Imposter selection fairness
    results.extend(validate_imposter_selection(verbose));

    // 4. Full rounds through the game API
    results.extend(validate_rounds(verbose));

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed, total, failed
    );

    if failed > 0 {
        std::process::exit(1);
    }
}

fn players(n: usize) -> Vec<Player> {
    (0..n).map(|i| Player::new(format!("Player {}", i + 1))).collect()
}

// ── 1. Catalogs ─────────────────────────────────────────────────────────

fn validate_catalogs(verbose: bool) -> Vec<TestResult> {
    println!("--- Catalogs ---");
    let mut results = Vec::new();
    let library = CatalogLibrary::embedded();

    results.push(TestResult {
        name: "catalogs_all_loaded".into(),
        passed: library.len() == CatalogKey::all().count(),
        detail: format!("{} catalogs loaded", library.len()),
    });

    for key in CatalogKey::all() {
        let Some(catalog) = library.catalog(key) else {
            results.push(TestResult {
                name: format!("catalog_{}", key.file_name()),
                passed: false,
                detail: format!("{} missing", key),
            });
            continue;
        };

        if verbose {
            println!("  {}: {} terms", key, catalog.len());
        }

        let missing_hints = catalog.terms().iter().filter(|t| t.hint().is_none()).count();
        let blank_terms = catalog
            .terms()
            .iter()
            .filter(|t| t.text.trim().is_empty())
            .count();

        results.push(TestResult {
            name: format!("catalog_{}_terms", key.file_name()),
            passed: !catalog.is_empty() && blank_terms == 0,
            detail: format!("{} terms, {} blank", catalog.len(), blank_terms),
        });
        results.push(TestResult {
            name: format!("catalog_{}_hints", key.file_name()),
            passed: missing_hints == 0,
            detail: format!("{} terms without a hint", missing_hints),
        });
    }

    // Languages of one tier should line up id-for-id.
    for difficulty in imposter_logic::catalog::Difficulty::ALL {
        let ids: Vec<HashSet<u32>> = CatalogKey::all()
            .filter(|k| k.difficulty == difficulty)
            .filter_map(|k| library.catalog(k))
            .map(|c| c.terms().iter().map(|t| t.id).collect())
            .collect();
        let aligned = ids.windows(2).all(|w| w[0] == w[1]);
        results.push(TestResult {
            name: format!("catalog_{}_languages_aligned", difficulty.file_stem()),
            passed: aligned,
            detail: format!("{} language variants share term ids", ids.len()),
        });
    }

    results
}

// ── 2. Word cycling ─────────────────────────────────────────────────────

fn validate_word_cycles(_verbose: bool) -> Vec<TestResult> {
    println!("--- Word Cycling ---");
    let mut results = Vec::new();
    let library = CatalogLibrary::embedded();
    let mut store = MemoryStore::new();
    let mut rng = StdRng::seed_from_u64(SEED);

    for key in CatalogKey::all() {
        let Some(size) = library.catalog(key).map(|c| c.len()) else {
            continue;
        };

        // Three full cycles: each must cover the catalog exactly once.
        let mut cycles_ok = true;
        for _ in 0..3 {
            let mut seen = HashSet::new();
            for _ in 0..size {
                match next_term(&library, &mut store, key, &mut rng) {
                    Ok(term) => {
                        if !seen.insert(term.id) {
                            cycles_ok = false;
                        }
                    }
                    Err(_) => cycles_ok = false,
                }
            }
            cycles_ok &= seen.len() == size;
        }

        results.push(TestResult {
            name: format!("cycle_{}", key.file_name()),
            passed: cycles_ok,
            detail: format!("3 cycles of {} terms without repeats", size),
        });
    }

    results
}

// ── 3. Imposter selection ───────────────────────────────────────────────

fn validate_imposter_selection(verbose: bool) -> Vec<TestResult> {
    println!("--- Imposter Selection ---");
    let mut results = Vec::new();
    let mut rng = StdRng::seed_from_u64(SEED);

    for size in [3usize, 4, 6, 10] {
        let roster = players(size);
        let mut history = ImposterHistory::new();
        let mut counts: HashMap<String, usize> = HashMap::new();
        let mut repeats = 0usize;
        let mut max_len = 0usize;

        for _ in 0..ROUNDS {
            let Some(i) = select_imposter(&roster, &history, &mut rng) else {
                repeats += 1;
                continue;
            };
            let name = roster[i].name.clone();
            if history.most_recent() == Some(name.as_str()) {
                repeats += 1;
            }
            history.record(name.clone());
            max_len = max_len.max(history.len());
            *counts.entry(name).or_default() += 1;
        }

        results.push(TestResult {
            name: format!("imposter_no_repeat_{}p", size),
            passed: repeats == 0,
            detail: format!("{} back-to-back repeats in {} rounds", repeats, ROUNDS),
        });

        results.push(TestResult {
            name: format!("imposter_history_cap_{}p", size),
            passed: max_len <= IMPOSTER_HISTORY_CAP,
            detail: format!("max history length {}", max_len),
        });

        // Every player within ±35% of an even share.
        let even = ROUNDS as f64 / size as f64;
        let worst = counts
            .values()
            .map(|&c| (c as f64 - even).abs() / even)
            .fold(0.0f64, f64::max);
        if verbose {
            let mut shares: Vec<_> = counts.iter().collect();
            shares.sort();
            println!("  {} players: {:?}", size, shares);
        }
        results.push(TestResult {
            name: format!("imposter_fair_share_{}p", size),
            passed: counts.len() == size && worst < 0.35,
            detail: format!("worst deviation {:.1}% from even share", worst * 100.0),
        });
    }

    results
}

// ── 4. Full rounds ──────────────────────────────────────────────────────

fn validate_rounds(_verbose: bool) -> Vec<TestResult> {
    println!("--- Full Rounds ---");
    let mut results = Vec::new();

    let mut game = Game::new(
        MemoryStore::new(),
        CatalogLibrary::embedded(),
        StdRng::seed_from_u64(SEED),
    );

    // Two players cannot start.
    let added = ["Ruth", "Naomi"]
        .into_iter()
        .try_for_each(|name| game.add_player(name).map(|_| ()));
    if let Err(e) = added {
        results.push(TestResult {
            name: "round_roster_setup".into(),
            passed: false,
            detail: format!("adding players failed: {}", e),
        });
        return results;
    }
    let before = game.store().clone();
    let blocked = game.start_game().is_err()
        && game.status() == GameStatus::Setup
        && game.store() == &before;
    results.push(TestResult {
        name: "round_needs_three_players".into(),
        passed: blocked,
        detail: "2 players → stays in Setup, store untouched".into(),
    });

    let added = ["Boaz", "Obed"]
        .into_iter()
        .try_for_each(|name| game.add_player(name).map(|_| ()));
    let size = game.roster().len();
    results.push(TestResult {
        name: "round_roster_setup".into(),
        passed: added.is_ok() && size == 4,
        detail: match added {
            Ok(()) => format!("{} players on the roster", size),
            Err(e) => format!("adding players failed: {}", e),
        },
    });
    if size != 4 {
        return results;
    }

    let mut walks_ok = true;
    let mut roles_ok = true;
    for _ in 0..500 {
        if game.start_game().is_err() {
            walks_ok = false;
            break;
        }

        let session = game.session().clone();
        let term = session.secret_term.clone().map(|t| t.text).unwrap_or_default();
        for p in game.roster().iter() {
            let role = game.role(p.id);
            let is_imposter = Some(p.id) == session.imposter_id;
            roles_ok &= if is_imposter { role != term } else { role == term };
        }

        let mut calls = 0;
        while game.next_player() == GameStatus::Playing {
            calls += 1;
            walks_ok &= game.current_player_index() < size;
        }
        walks_ok &= calls + 1 == size && game.starting_player().is_some();
        game.reset_game();
    }

    results.push(TestResult {
        name: "round_walk_finishes".into(),
        passed: walks_ok,
        detail: format!("500 rounds, {} handoffs each", size),
    });
    results.push(TestResult {
        name: "round_roles_consistent".into(),
        passed: roles_ok,
        detail: "imposter role differs, others see the term".into(),
    });

    results
}
