//! Bible Imposter - terminal edition.
//!
//! One device is passed around the table. Everyone but the imposter sees
//! the secret term; the imposter has to blend in.
//!
//! Usage:
//!   cargo run -p imposter-shell
//!   cargo run -p imposter-shell -- --seed 7 --store /tmp/imposter.store -v

mod persistence;
mod reveal;
mod shell;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use imposter_logic::catalog::CatalogLibrary;
use imposter_logic::game::Game;
use log::LevelFilter;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::persistence::FileStore;
use crate::shell::Shell;

/// Bible Imposter - pass-the-device party game
#[derive(Parser, Debug)]
#[command(name = "bible-imposter")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// File holding the roster, settings and selection history
    #[arg(long, default_value = "bible-imposter.store")]
    store: PathBuf,

    /// Directory of catalog JSON files (easy.json, hard-zh.json, ...)
    /// replacing the built-in term lists
    #[arg(long)]
    catalogs: Option<PathBuf>,

    /// Random seed (default: random)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Increase log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Args {
    fn log_level(&self) -> LevelFilter {
        match self.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    env_logger::Builder::new()
        .filter_level(args.log_level())
        .parse_default_env()
        .init();

    let catalogs = match &args.catalogs {
        Some(dir) => match CatalogLibrary::from_dir(dir) {
            Ok(library) => library,
            Err(e) => {
                eprintln!("Error: {e}");
                return ExitCode::FAILURE;
            }
        },
        None => CatalogLibrary::embedded(),
    };

    let rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let store = FileStore::open(&args.store);
    log::info!("Using store {}", store.path().display());

    let mut shell = Shell::new(Game::new(store, catalogs, rng));
    let stdin = std::io::stdin();
    let stdout = std::io::stdout();

    match shell.run(stdin.lock(), &mut stdout.lock()) {
        Ok(()) => {
            log::info!("Goodbye ({} players saved)", shell.game().roster().len());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
