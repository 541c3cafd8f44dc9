//! Scripted crew that fights the fire on behalf of the player in turn.

use fire_breaker_core::Command;
use fire_breaker_world::{query, Game};

/// Picks the next action for the player in turn, or `None` once its crews are done.
///
/// Engines with water treat an adjacent burning forest they have not treated
/// yet this turn; empty engines refill when a source is nearby.
pub(crate) fn next_action(game: &Game) -> Option<Command> {
    let board = game.board();
    let turn = game.current_turn();

    query::player_status(game)
        .engines
        .into_iter()
        .filter(|status| status.action_points > 0)
        .find_map(|status| {
            let engine = status.engine;
            if status.water == 0 {
                let has_source = status.position.adjacents(true).any(|neighbour| {
                    board
                        .field(neighbour)
                        .is_some_and(|field| field.is_refill_source())
                });
                return has_source.then_some(Command::Refill { engine });
            }

            status
                .position
                .adjacents(false)
                .find(|target| {
                    !turn.has_extinguished(engine, *target)
                        && board
                            .forest(*target)
                            .is_some_and(|forest| forest.is_burning())
                })
                .map(|target| Command::Extinguish { engine, target })
        })
}
