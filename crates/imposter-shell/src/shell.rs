//! Line-oriented game shell.
//!
//! Reads one command per line and redraws the current screen after each
//! one: the menu while in `Setup`, the pass-the-device screen while
//! `Playing`, and the starting-player screen once `Finished`.

use std::io::{self, BufRead, Write};

use imposter_logic::catalog::{CatalogSource, Difficulty, Language};
use imposter_logic::constants::MIN_PLAYERS;
use imposter_logic::error::GameError;
use imposter_logic::game::Game;
use imposter_logic::session::GameStatus;
use imposter_logic::store::KeyValueStore;
use rand::Rng;

use crate::reveal::RevealCard;

/// A parsed shell command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Add(String),
    /// Zero-based roster offsets.
    Remove(Vec<usize>),
    Clear,
    List,
    Difficulty(Difficulty),
    Language(Language),
    Hint(bool),
    Settings,
    Start,
    Hold,
    Release,
    Next,
    Menu,
    Help,
    Quit,
}

impl Command {
    /// Parse one input line. Player numbers are one-based on screen.
    pub fn parse(line: &str) -> Result<Command, String> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        match word.to_lowercase().as_str() {
            "add" => Ok(Command::Add(rest.to_string())),
            "remove" | "rm" => parse_offsets(rest).map(Command::Remove),
            "clear" => Ok(Command::Clear),
            "list" | "ls" => Ok(Command::List),
            "difficulty" => parse_difficulty(rest).map(Command::Difficulty),
            "language" | "lang" => parse_language(rest).map(Command::Language),
            "hint" => match rest.to_lowercase().as_str() {
                "on" => Ok(Command::Hint(true)),
                "off" => Ok(Command::Hint(false)),
                _ => Err("Usage: hint <on|off>".to_string()),
            },
            "settings" => Ok(Command::Settings),
            "start" => Ok(Command::Start),
            "hold" | "reveal" => Ok(Command::Hold),
            "release" | "hide" => Ok(Command::Release),
            "next" => Ok(Command::Next),
            "menu" => Ok(Command::Menu),
            "help" | "?" => Ok(Command::Help),
            "quit" | "exit" => Ok(Command::Quit),
            "" => Err(String::new()),
            other => Err(format!("Unknown command '{}'. Type 'help'.", other)),
        }
    }
}

fn parse_offsets(arg: &str) -> Result<Vec<usize>, String> {
    let usage = || "Usage: remove <n>[,<n>...]".to_string();
    if arg.is_empty() {
        return Err(usage());
    }
    arg.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .map(|s| match s.parse::<usize>() {
            Ok(n) if n >= 1 => Ok(n - 1),
            _ => Err(usage()),
        })
        .collect()
}

fn parse_difficulty(arg: &str) -> Result<Difficulty, String> {
    match arg.to_lowercase().as_str() {
        "easy" => Ok(Difficulty::Easy),
        "hard" => Ok(Difficulty::Hard),
        _ => Err("Usage: difficulty <easy|hard>".to_string()),
    }
}

fn parse_language(arg: &str) -> Result<Language, String> {
    match arg.to_lowercase().as_str() {
        "en" | "english" => Ok(Language::English),
        "zh" | "chinese" | "中文" => Ok(Language::Chinese),
        "es" | "spanish" | "español" => Ok(Language::Spanish),
        _ => Err("Usage: language <en|zh|es>".to_string()),
    }
}

const HELP: &str = "\
Menu:     add <name> | remove <n>[,<n>...] | clear | list | start
Settings: difficulty <easy|hard> | language <en|zh|es> | hint <on|off> | settings
Round:    hold | release | next | menu
Other:    help | quit";

/// Game plus the screen-local reveal card.
pub struct Shell<S, C, R> {
    game: Game<S, C, R>,
    card: RevealCard,
}

impl<S, C, R> Shell<S, C, R>
where
    S: KeyValueStore,
    C: CatalogSource,
    R: Rng,
{
    pub fn new(game: Game<S, C, R>) -> Self {
        Self {
            game,
            card: RevealCard::new(),
        }
    }

    pub fn game(&self) -> &Game<S, C, R> {
        &self.game
    }

    /// Run until `quit` or end of input.
    pub fn run<I: BufRead, O: Write>(&mut self, input: I, out: &mut O) -> io::Result<()> {
        self.render(out)?;
        for line in input.lines() {
            let line = line?;
            match Command::parse(&line) {
                Ok(Command::Quit) => break,
                Ok(command) => {
                    self.execute(command, out)?;
                }
                Err(msg) if msg.is_empty() => {}
                Err(msg) => writeln!(out, "{}", msg)?,
            }
        }
        Ok(())
    }

    /// Apply one command and redraw.
    pub fn execute<O: Write>(&mut self, command: Command, out: &mut O) -> io::Result<()> {
        match (self.game.status(), command) {
            (_, Command::Help) => {
                writeln!(out, "{}", HELP)?;
                return Ok(());
            }
            (_, Command::Settings) => {
                self.render_settings(out)?;
                return Ok(());
            }
            (GameStatus::Setup, Command::Difficulty(d)) => self.game.set_difficulty(d),
            (GameStatus::Setup, Command::Language(l)) => self.game.set_language(l),
            (GameStatus::Setup, Command::Hint(on)) => self.game.set_show_hint_for_imposter(on),

            (GameStatus::Setup, Command::Add(name)) => {
                if let Err(e) = self.game.add_player(&name) {
                    writeln!(out, "{}", e)?;
                }
            }
            (GameStatus::Setup, Command::Remove(offsets)) => {
                if let Err(e) = self.game.remove_players_at(&offsets) {
                    writeln!(out, "{}", e)?;
                }
            }
            (GameStatus::Setup, Command::Clear) => {
                if let Err(e) = self.game.remove_all_players() {
                    writeln!(out, "{}", e)?;
                }
            }
            (GameStatus::Setup, Command::List) => {}
            (GameStatus::Setup, Command::Start) => match self.game.start_game() {
                Ok(()) => self.card.release(),
                // The menu already explains the minimum; nothing to report.
                Err(GameError::InsufficientPlayers { .. }) => {}
                Err(e) => {
                    let msg = self.game.dismiss_error().unwrap_or_else(|| e.to_string());
                    writeln!(out, "Error: {}", msg)?;
                }
            },

            (GameStatus::Playing, Command::Hold) => {
                if let Some(player) = self.game.current_player() {
                    let role = self.game.role(player.id);
                    self.card.hold(role);
                }
            }
            (GameStatus::Playing, Command::Release) => self.card.release(),
            (GameStatus::Playing, Command::Next) => {
                self.card.release();
                self.game.next_player();
            }

            (GameStatus::Finished, Command::Menu) => {
                self.card.release();
                self.game.reset_game();
            }

            (_, _) => {
                writeln!(out, "That command is not available on this screen.")?;
                return Ok(());
            }
        }
        self.render(out)
    }

    /// Draw the screen for the current status.
    pub fn render<O: Write>(&self, out: &mut O) -> io::Result<()> {
        writeln!(out)?;
        match self.game.status() {
            GameStatus::Setup => self.render_menu(out),
            GameStatus::Playing => self.render_turn(out),
            GameStatus::Finished => self.render_finished(out),
        }
    }

    fn render_menu<O: Write>(&self, out: &mut O) -> io::Result<()> {
        let settings = self.game.settings();
        writeln!(out, "=== Bible Imposter ===")?;
        writeln!(
            out,
            "Difficulty: {}   Language: {}",
            settings.difficulty.label(),
            settings.language.label()
        )?;
        writeln!(out, "Players:")?;
        if self.game.roster().is_empty() {
            writeln!(out, "  (none)")?;
        }
        for (i, player) in self.game.roster().iter().enumerate() {
            writeln!(out, "  {}. {}", i + 1, player.name)?;
        }
        if self.game.roster().len() < MIN_PLAYERS {
            writeln!(out, "Need at least {} players to start.", MIN_PLAYERS)?;
        } else {
            writeln!(out, "Type 'start' to begin.")?;
        }
        Ok(())
    }

    fn render_settings<O: Write>(&self, out: &mut O) -> io::Result<()> {
        let settings = self.game.settings();
        writeln!(out, "--- Settings ---")?;
        writeln!(out, "Difficulty: {}", settings.difficulty.label())?;
        writeln!(out, "Language:   {}", settings.language.label())?;
        writeln!(
            out,
            "Show hint for imposter: {}",
            if settings.show_hint_for_imposter { "on" } else { "off" }
        )?;
        writeln!(
            out,
            "When enabled, the imposter sees a category hint (e.g. \"Person\", \"Place\", \"Event\") to help them blend in."
        )
    }

    fn render_turn<O: Write>(&self, out: &mut O) -> io::Result<()> {
        let Some(player) = self.game.current_player() else {
            return Ok(());
        };
        writeln!(out, "Pass the device to:")?;
        writeln!(out, "  {}", player.name)?;
        writeln!(out, "+------------------------------+")?;
        for line in self.card.face() {
            writeln!(out, "  {}", line)?;
        }
        writeln!(out, "+------------------------------+")?;
        if self.card.is_revealed() {
            writeln!(out, "'release' to hide, then 'next' for the next player.")
        } else {
            writeln!(out, "'hold' to reveal, 'next' for the next player.")
        }
    }

    fn render_finished<O: Write>(&self, out: &mut O) -> io::Result<()> {
        writeln!(out, "All players are ready!")?;
        if let Some(starter) = self.game.starting_player() {
            writeln!(out, "The starting player is:")?;
            writeln!(out, "  {}", starter.name)?;
        }
        writeln!(out, "Type 'menu' to go back.")
    }
}
