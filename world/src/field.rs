//! Board cells and their per-variant state.

use std::collections::BTreeSet;

use fire_breaker_core::{EngineId, ForestState, PlayerId};

/// Discriminant of a [`Field`] used to select cells of one variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// Burnable terrain that may hold engines.
    Forest,
    /// Water source used for refills.
    Pond,
    /// Home base of a player.
    FireStation,
}

/// Single cell of the board.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Field {
    /// Burnable terrain.
    Forest(Forest),
    /// Water source without state.
    Pond,
    /// Home base owned by a player.
    FireStation {
        /// Player the station belongs to.
        owner: PlayerId,
    },
}

impl Field {
    /// Variant of this cell.
    #[must_use]
    pub const fn kind(&self) -> FieldKind {
        match self {
            Self::Forest(_) => FieldKind::Forest,
            Self::Pond => FieldKind::Pond,
            Self::FireStation { .. } => FieldKind::FireStation,
        }
    }

    /// Forest carried by this cell, if it is one.
    #[must_use]
    pub const fn as_forest(&self) -> Option<&Forest> {
        match self {
            Self::Forest(forest) => Some(forest),
            _ => None,
        }
    }

    pub(crate) fn as_forest_mut(&mut self) -> Option<&mut Forest> {
        match self {
            Self::Forest(forest) => Some(forest),
            _ => None,
        }
    }

    /// Reports whether an adjacent engine may refill its tank here.
    #[must_use]
    pub const fn is_refill_source(&self) -> bool {
        matches!(self, Self::Pond | Self::FireStation { .. })
    }
}

/// Terrain cell with a burn state and the engines standing on it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Forest {
    state: ForestState,
    engines: BTreeSet<EngineId>,
}

impl Forest {
    /// Creates an unoccupied forest in the provided state.
    #[must_use]
    pub const fn new(state: ForestState) -> Self {
        Self {
            state,
            engines: BTreeSet::new(),
        }
    }

    /// Current burn state.
    #[must_use]
    pub const fn state(&self) -> ForestState {
        self.state
    }

    pub(crate) fn set_state(&mut self, state: ForestState) {
        self.state = state;
    }

    /// Advances the burn state one step and reports whether it changed.
    pub(crate) fn increase_burning(&mut self) -> bool {
        let next = self.state.successor();
        let changed = next != self.state;
        self.state = next;
        changed
    }

    /// Reports whether the forest is on fire.
    #[must_use]
    pub const fn is_burning(&self) -> bool {
        self.state.is_burning()
    }

    /// Reports whether at least one engine stands here.
    #[must_use]
    pub fn is_occupied(&self) -> bool {
        !self.engines.is_empty()
    }

    /// Engines standing here, ordered by owner and number.
    pub fn engines(&self) -> impl Iterator<Item = EngineId> + '_ {
        self.engines.iter().copied()
    }

    pub(crate) fn add_engine(&mut self, engine: EngineId) {
        let _ = self.engines.insert(engine);
    }

    pub(crate) fn remove_engine(&mut self, engine: EngineId) {
        let _ = self.engines.remove(&engine);
    }
}
