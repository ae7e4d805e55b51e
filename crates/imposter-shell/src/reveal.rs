//! Press-and-hold reveal card.
//!
//! Pure presentation state: holding copies the role text onto the card,
//! releasing blanks it again. Nothing here touches the game or the store.

/// Reveal card for the player currently holding the device.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RevealCard {
    shown: Option<String>,
}

impl RevealCard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start holding: show `role` until released.
    pub fn hold(&mut self, role: String) {
        self.shown = Some(role);
    }

    pub fn release(&mut self) {
        self.shown = None;
    }

    pub fn is_revealed(&self) -> bool {
        self.shown.is_some()
    }

    /// Lines to draw for the card face.
    pub fn face(&self) -> Vec<String> {
        match &self.shown {
            Some(role) => {
                let mut lines = vec!["Your Role:".to_string()];
                lines.extend(role.lines().map(str::to_string));
                lines
            }
            None => vec!["Hold to Reveal".to_string()],
        }
    }
}
