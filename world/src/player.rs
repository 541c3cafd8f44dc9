//! Players and the fire engines they own.

use std::collections::BTreeMap;

use fire_breaker_core::{EngineId, PlayerId};

/// Engine with a water tank.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FireEngine {
    id: EngineId,
    water: u32,
    capacity: u32,
}

impl FireEngine {
    /// Creates an engine with a full tank.
    #[must_use]
    pub const fn new(id: EngineId, capacity: u32) -> Self {
        Self {
            id,
            water: capacity,
            capacity,
        }
    }

    /// Identifier of the engine.
    #[must_use]
    pub const fn id(&self) -> EngineId {
        self.id
    }

    /// Water units left in the tank.
    #[must_use]
    pub const fn water(&self) -> u32 {
        self.water
    }

    /// Reports whether the tank is full.
    #[must_use]
    pub const fn is_full(&self) -> bool {
        self.water >= self.capacity
    }

    /// Reports whether the tank is empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.water == 0
    }

    pub(crate) fn refill(&mut self) {
        self.water = self.capacity;
    }

    pub(crate) fn use_water(&mut self) {
        self.water = self.water.saturating_sub(1);
    }
}

/// Participant owning a set of engines.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Player {
    id: PlayerId,
    engines: BTreeMap<u32, FireEngine>,
    next_engine_number: u32,
}

impl Player {
    /// Creates a player without engines.
    #[must_use]
    pub const fn new(id: PlayerId) -> Self {
        Self {
            id,
            engines: BTreeMap::new(),
            next_engine_number: 0,
        }
    }

    /// Identifier of the player.
    #[must_use]
    pub const fn id(&self) -> PlayerId {
        self.id
    }

    /// Allocates the next engine number and stores a fresh engine.
    pub(crate) fn create_engine(&mut self, capacity: u32) -> EngineId {
        let id = EngineId::new(self.id, self.next_engine_number);
        self.next_engine_number = self.next_engine_number.saturating_add(1);
        let _ = self.engines.insert(id.number(), FireEngine::new(id, capacity));
        id
    }

    /// Looks up an engine by its number.
    #[must_use]
    pub fn engine(&self, number: u32) -> Option<&FireEngine> {
        self.engines.get(&number)
    }

    pub(crate) fn engine_mut(&mut self, number: u32) -> Option<&mut FireEngine> {
        self.engines.get_mut(&number)
    }

    /// Engines owned by the player, ordered by number.
    pub fn engines(&self) -> impl Iterator<Item = &FireEngine> + '_ {
        self.engines.values()
    }

    pub(crate) fn remove_engine(&mut self, number: u32) {
        let _ = self.engines.remove(&number);
    }

    /// Reports whether the player still owns an engine.
    #[must_use]
    pub fn has_engines(&self) -> bool {
        !self.engines.is_empty()
    }
}
