//! Per-turn ledger of action points, treated forests and stationary engines.

use std::collections::{BTreeMap, BTreeSet};

use fire_breaker_core::{EngineId, PlayerId, Position};

/// Resources available to the player in turn.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Turn {
    player: PlayerId,
    points_per_engine: u32,
    action_points: BTreeMap<EngineId, u32>,
    extinguished: BTreeMap<EngineId, BTreeSet<Position>>,
    stationary: BTreeSet<EngineId>,
}

impl Turn {
    /// Starts a turn granting `points_per_engine` to every listed engine.
    #[must_use]
    pub fn new<I>(player: PlayerId, engines: I, points_per_engine: u32) -> Self
    where
        I: IntoIterator<Item = EngineId>,
    {
        Self {
            player,
            points_per_engine,
            action_points: engines
                .into_iter()
                .map(|engine| (engine, points_per_engine))
                .collect(),
            extinguished: BTreeMap::new(),
            stationary: BTreeSet::new(),
        }
    }

    /// Player owning this turn.
    #[must_use]
    pub const fn player(&self) -> PlayerId {
        self.player
    }

    /// Remaining action points of a tracked engine.
    #[must_use]
    pub fn action_points(&self, engine: EngineId) -> Option<u32> {
        self.action_points.get(&engine).copied()
    }

    /// Consumes one action point; untracked engines are ignored.
    pub fn use_point(&mut self, engine: EngineId) {
        if let Some(points) = self.action_points.get_mut(&engine) {
            debug_assert!(*points > 0, "{engine} used a point it did not have");
            *points = points.saturating_sub(1);
        }
    }

    /// Records that the engine treated the forest at `position`.
    pub fn mark_extinguished(&mut self, engine: EngineId, position: Position) {
        let _ = self
            .extinguished
            .entry(engine)
            .or_default()
            .insert(position);
    }

    /// Reports whether the engine already treated `position` this turn.
    #[must_use]
    pub fn has_extinguished(&self, engine: EngineId, position: Position) -> bool {
        self.extinguished
            .get(&engine)
            .is_some_and(|positions| positions.contains(&position))
    }

    /// Reports whether the engine may still relocate this turn.
    #[must_use]
    pub fn can_move(&self, engine: EngineId) -> bool {
        !self.stationary.contains(&engine)
    }

    /// Bars the engine from relocating for the rest of the turn.
    pub fn mark_stationary(&mut self, engine: EngineId) {
        let _ = self.stationary.insert(engine);
    }

    /// Registers an engine acquired mid-turn with a full budget.
    ///
    /// # Panics
    ///
    /// Panics if the engine belongs to another player.
    pub fn add_engine(&mut self, engine: EngineId) {
        assert_eq!(
            engine.owner(),
            self.player,
            "engine does not belong to the player of this turn"
        );
        let _ = self.action_points.insert(engine, self.points_per_engine);
    }
}
