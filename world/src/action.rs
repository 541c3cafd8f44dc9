//! Player actions validated against the game before any state changes.

use fire_breaker_core::{EngineId, Event, GameError, IllegalAction, Position};
use tracing::debug;

use crate::Game;

/// Move a player may perform while the game is acting.
///
/// Every action checks all of its preconditions first and only then mutates
/// the game, so a rejected action leaves no trace.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    /// Relocates an engine along a short orthogonal path.
    Move {
        /// Engine to relocate.
        engine: EngineId,
        /// Forest the engine should end up on.
        destination: Position,
    },
    /// Pours water on an orthogonally adjacent forest.
    Extinguish {
        /// Engine pouring the water.
        engine: EngineId,
        /// Forest to treat.
        target: Position,
    },
    /// Refills an engine next to a pond or fire station.
    Refill {
        /// Engine to refill.
        engine: EngineId,
    },
    /// Buys a new engine next to the player's fire station.
    BuyEngine {
        /// Forest the new engine appears on.
        spawn: Position,
    },
}

impl Action {
    /// Engine the action operates on, if any.
    #[must_use]
    pub const fn engine(&self) -> Option<EngineId> {
        match self {
            Self::Move { engine, .. } | Self::Extinguish { engine, .. } | Self::Refill { engine } => {
                Some(*engine)
            }
            Self::BuyEngine { .. } => None,
        }
    }

    /// Reports whether the engine may not relocate after this action.
    #[must_use]
    pub const fn is_immobilizing(&self) -> bool {
        matches!(self, Self::Extinguish { .. } | Self::Refill { .. })
    }

    /// Validates and executes the action on behalf of the player in turn.
    pub fn perform(&self, game: &mut Game, out_events: &mut Vec<Event>) -> Result<(), GameError> {
        game.ensure_acting()?;

        match *self {
            Self::Move {
                engine,
                destination,
            } => {
                let from = ready_engine(game, engine)?;
                move_engine(game, engine, from, destination, out_events)?;
            }
            Self::Extinguish { engine, target } => {
                let from = ready_engine(game, engine)?;
                extinguish(game, engine, from, target, out_events)?;
            }
            Self::Refill { engine } => {
                let from = ready_engine(game, engine)?;
                refill(game, engine, from, out_events)?;
            }
            Self::BuyEngine { spawn } => buy_engine(game, spawn, out_events)?,
        }

        if let Some(engine) = self.engine() {
            game.turn.use_point(engine);
            if self.is_immobilizing() {
                game.turn.mark_stationary(engine);
            }
        }
        game.announce_outcome(out_events);
        Ok(())
    }
}

/// Confirms the engine is deployed, owned by the player in turn and has points left.
fn ready_engine(game: &Game, engine: EngineId) -> Result<Position, IllegalAction> {
    let position = game
        .board
        .position_of(engine)
        .ok_or(IllegalAction::UnknownEngine(engine))?;
    let player = game.turn.player();
    if engine.owner() != player {
        return Err(IllegalAction::NotOwned { engine, player });
    }
    if game.turn.action_points(engine).unwrap_or(0) == 0 {
        return Err(IllegalAction::NoActionPoints(engine));
    }
    Ok(position)
}

fn move_engine(
    game: &mut Game,
    engine: EngineId,
    from: Position,
    destination: Position,
    out_events: &mut Vec<Event>,
) -> Result<(), IllegalAction> {
    if !game.turn.can_move(engine) {
        return Err(IllegalAction::Stationary(engine));
    }
    let reachable = (1..=game.rules.max_move_distance)
        .any(|steps| game.board.can_reach(engine, destination, steps));
    if !reachable {
        return Err(IllegalAction::Unreachable {
            engine,
            destination,
        });
    }

    game.board.remove_engine(engine);
    game.board.place_engine(engine, destination);
    debug!(%engine, %from, to = %destination, "engine moved");
    out_events.push(Event::EngineMoved {
        engine,
        from,
        to: destination,
    });
    Ok(())
}

fn extinguish(
    game: &mut Game,
    engine: EngineId,
    from: Position,
    target: Position,
    out_events: &mut Vec<Event>,
) -> Result<(), IllegalAction> {
    let (state, treated) = game
        .board
        .forest(target)
        .and_then(|forest| Some((forest.state(), forest.state().extinguished()?)))
        .ok_or(IllegalAction::NotExtinguishable(target))?;
    if !from.is_adjacent(target, false) {
        return Err(IllegalAction::NotAdjacent { engine, target });
    }
    if game.turn.has_extinguished(engine, target) {
        return Err(IllegalAction::AlreadyExtinguished { engine, target });
    }
    if game.engine(engine).map_or(true, |tank| tank.is_empty()) {
        return Err(IllegalAction::TankEmpty(engine));
    }

    if let Some(tank) = game.engine_mut(engine) {
        tank.use_water();
    }
    if let Some(forest) = game.board.forest_mut(target) {
        forest.set_state(treated);
    }
    game.turn.mark_extinguished(engine, target);
    debug!(%engine, %target, from = ?state, to = ?treated, "forest extinguished");
    out_events.push(Event::FieldExtinguished {
        engine,
        position: target,
        from: state,
        to: treated,
    });

    if state.is_burning() {
        let player = game.turn.player();
        let reward = game.rules.extinguish_reward;
        game.update_reputation(player, reward);
        if let Some(reputation) = game.reputation(player) {
            out_events.push(Event::ReputationChanged { player, reputation });
        }
    }
    Ok(())
}

fn refill(
    game: &mut Game,
    engine: EngineId,
    from: Position,
    out_events: &mut Vec<Event>,
) -> Result<(), IllegalAction> {
    if game.engine(engine).map_or(true, |tank| tank.is_full()) {
        return Err(IllegalAction::TankFull(engine));
    }
    let has_source = from.adjacents(true).any(|neighbour| {
        game.board
            .field(neighbour)
            .is_some_and(|field| field.is_refill_source())
    });
    if !has_source {
        return Err(IllegalAction::NoWaterSource(engine));
    }

    if let Some(tank) = game.engine_mut(engine) {
        tank.refill();
    }
    debug!(%engine, "engine refilled");
    out_events.push(Event::EngineRefilled { engine });
    Ok(())
}

fn buy_engine(
    game: &mut Game,
    spawn: Position,
    out_events: &mut Vec<Event>,
) -> Result<(), IllegalAction> {
    let player = game.turn.player();
    let required = game.rules.engine_cost;
    let available = game.reputation(player).unwrap_or(0);
    if available < required {
        return Err(IllegalAction::InsufficientReputation {
            required,
            available,
        });
    }
    let valid_spawn = game.board.fire_station(player).is_some_and(|station| {
        station.is_adjacent(spawn, true)
            && game
                .board
                .forest(spawn)
                .is_some_and(|forest| !forest.is_burning())
    });
    if !valid_spawn {
        return Err(IllegalAction::InvalidSpawn(spawn));
    }
    let capacity = game.rules.tank_capacity;
    let Some(owner) = game.player_mut(player) else {
        return Err(IllegalAction::InvalidSpawn(spawn));
    };

    let engine = owner.create_engine(capacity);
    game.turn.add_engine(engine);
    game.board.place_engine(engine, spawn);
    game.update_reputation(player, -required);
    debug!(%engine, %spawn, "engine bought");
    out_events.push(Event::EngineBought {
        engine,
        position: spawn,
    });
    if let Some(reputation) = game.reputation(player) {
        out_events.push(Event::ReputationChanged { player, reputation });
    }
    Ok(())
}
