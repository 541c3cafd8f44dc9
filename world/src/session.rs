//! Session keeping the initial layout around so games can be restarted.

use fire_breaker_core::Rules;
use tracing::info;

use crate::{Game, Layout};

/// Owns the active game together with the layout and rules it was built from.
#[derive(Clone, Debug)]
pub struct Session {
    layout: Layout,
    rules: Rules,
    game: Game,
}

impl Session {
    /// Starts a session with a fresh game.
    #[must_use]
    pub fn new(layout: Layout, rules: Rules) -> Self {
        let game = Game::new(&layout, rules.clone());
        Self {
            layout,
            rules,
            game,
        }
    }

    /// Layout every game of this session starts from.
    #[must_use]
    pub const fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Game currently being played.
    #[must_use]
    pub const fn game(&self) -> &Game {
        &self.game
    }

    /// Mutable access to the game currently being played.
    pub fn game_mut(&mut self) -> &mut Game {
        &mut self.game
    }

    /// Discards the active game and starts over from the original layout.
    pub fn reset(&mut self) {
        info!("session reset");
        self.game = Game::new(&self.layout, self.rules.clone());
    }
}
