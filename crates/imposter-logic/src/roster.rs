//! Ordered player roster.
//!
//! Order is both display order and turn order. A player's identity is their
//! id; renaming is delete + re-add. The roster is persisted as one JSON blob.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::keys;
use crate::error::GameError;
use crate::store::{log_write_failure, KeyValueStore, StoredValue};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Player {
    pub id: Uuid,
    pub name: String,
}

impl Player {
    /// New player with a fresh random id.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Roster {
    players: Vec<Player>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the roster blob; missing or undecodable data is an empty roster.
    pub fn load<S: KeyValueStore + ?Sized>(store: &S) -> Self {
        let Some(blob) = store.get_text(keys::ROSTER) else {
            return Self::new();
        };
        match serde_json::from_str::<Vec<Player>>(&blob) {
            Ok(players) => Self { players },
            Err(e) => {
                log::warn!("Discarding unreadable roster: {}", e);
                Self::new()
            }
        }
    }

    pub fn save<S: KeyValueStore + ?Sized>(&self, store: &mut S) {
        match serde_json::to_string(&self.players) {
            Ok(blob) => {
                log_write_failure(keys::ROSTER, store.set(keys::ROSTER, StoredValue::Text(blob)))
            }
            Err(e) => log::warn!("Failed to encode roster: {}", e),
        }
    }

    /// Append a player. The name is trimmed and must not be empty.
    pub fn add(&mut self, name: &str) -> Result<&Player, GameError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(GameError::EmptyPlayerName);
        }
        self.players.push(Player::new(name));
        Ok(&self.players[self.players.len() - 1])
    }

    /// Remove by id, returning the removed player.
    pub fn remove(&mut self, id: Uuid) -> Option<Player> {
        let index = self.position(id)?;
        Some(self.players.remove(index))
    }

    /// Remove the players at `offsets` (indices into the current order).
    /// Out-of-range and repeated offsets are ignored. Returns how many were
    /// removed.
    pub fn remove_at(&mut self, offsets: &[usize]) -> usize {
        let mut offsets: Vec<usize> = offsets
            .iter()
            .copied()
            .filter(|&i| i < self.players.len())
            .collect();
        offsets.sort_unstable();
        offsets.dedup();
        for &i in offsets.iter().rev() {
            self.players.remove(i);
        }
        offsets.len()
    }

    pub fn clear(&mut self) {
        self.players.clear();
    }

    pub fn get(&self, id: Uuid) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    pub fn position(&self, id: Uuid) -> Option<usize> {
        self.players.iter().position(|p| p.id == id)
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Player> {
        self.players.iter()
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }
}

impl std::ops::Index<usize> for Roster {
    type Output = Player;

    fn index(&self, index: usize) -> &Player {
        &self.players[index]
    }
}
