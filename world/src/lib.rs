#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative game state management for Fire Breaker.

mod action;
mod board;
mod cycle;
mod field;
mod layout;
mod player;
mod session;
mod turn;

use std::collections::{BTreeMap, BTreeSet};

use fire_breaker_core::{
    Command, EngineId, Event, ForestState, GameError, Phase, PlayerId, Position, Rules, Wind,
};
use tracing::{debug, info, trace};

pub use action::Action;
pub use board::Board;
pub use cycle::Cycle;
pub use field::{Field, FieldKind, Forest};
pub use layout::{Layout, Tile};
pub use player::{FireEngine, Player};
pub use session::Session;
pub use turn::Turn;

/// Authoritative state of a running game.
///
/// The game alternates between [`Phase::Acting`], in which the player in turn
/// performs actions and eventually ends the turn, and
/// [`Phase::AwaitingFireSpread`], entered whenever every live player finished a
/// turn. Only the fire spread leads back to acting.
#[derive(Clone, Debug)]
pub struct Game {
    rules: Rules,
    board: Board,
    players: Vec<Player>,
    turns: Cycle<PlayerId>,
    reputation: BTreeMap<PlayerId, i32>,
    turn: Turn,
    phase: Phase,
}

impl Game {
    /// Builds a game from a validated layout.
    ///
    /// # Panics
    ///
    /// Panics if the layout has no fire station or places an engine for a
    /// player without one.
    #[must_use]
    pub fn new(layout: &Layout, rules: Rules) -> Self {
        let ids = layout.players();
        let Some(&first) = ids.first() else {
            panic!("layout must contain at least one fire station");
        };

        let mut players: Vec<Player> = ids.iter().copied().map(Player::new).collect();
        let mut fields = Vec::with_capacity(layout.tiles().len());
        let mut deployments = Vec::new();
        for (position, tile) in layout.cells() {
            let field = match tile {
                Tile::Forest(state) => Field::Forest(Forest::new(state)),
                Tile::Engine(owner) => {
                    let Some(player) = players.iter_mut().find(|player| player.id() == owner)
                    else {
                        panic!("engine at {position} belongs to {owner} without a fire station");
                    };
                    deployments.push((player.create_engine(rules.tank_capacity), position));
                    Field::Forest(Forest::new(ForestState::Dry))
                }
                Tile::Pond => Field::Pond,
                Tile::FireStation(owner) => Field::FireStation { owner },
            };
            fields.push(field);
        }

        let mut board = Board::new(layout.dimensions(), fields);
        for (engine, position) in deployments {
            board.place_engine(engine, position);
        }

        let turn = Turn::new(
            first,
            engines_of(&players, first),
            rules.action_points,
        );
        let turns = Cycle::new(ids.clone(), rules.turn_rotation);
        let reputation = ids.iter().map(|id| (*id, 0)).collect();

        debug!(players = ids.len(), "game created");
        Self {
            rules,
            board,
            players,
            turns,
            reputation,
            turn,
            phase: Phase::Acting,
        }
    }

    /// Rule constants of this game.
    #[must_use]
    pub const fn rules(&self) -> &Rules {
        &self.rules
    }

    /// Board holding the fields and engines.
    #[must_use]
    pub const fn board(&self) -> &Board {
        &self.board
    }

    /// Phase the game is currently in.
    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// Ledger of the turn in progress.
    #[must_use]
    pub const fn current_turn(&self) -> &Turn {
        &self.turn
    }

    /// Player whose turn is in progress.
    #[must_use]
    pub const fn current_player(&self) -> PlayerId {
        self.turn.player()
    }

    /// Players still in the game.
    pub fn players(&self) -> impl Iterator<Item = &Player> + '_ {
        self.players.iter()
    }

    /// Live player with the provided identifier.
    #[must_use]
    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|player| player.id() == id)
    }

    pub(crate) fn player_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
        self.players.iter_mut().find(|player| player.id() == id)
    }

    /// Engine with the provided identifier, if its owner still has it.
    #[must_use]
    pub fn engine(&self, id: EngineId) -> Option<&FireEngine> {
        self.player(id.owner())?.engine(id.number())
    }

    pub(crate) fn engine_mut(&mut self, id: EngineId) -> Option<&mut FireEngine> {
        self.player_mut(id.owner())?.engine_mut(id.number())
    }

    /// Reputation balance of a player that took part in the game.
    #[must_use]
    pub fn reputation(&self, player: PlayerId) -> Option<i32> {
        self.reputation.get(&player).copied()
    }

    /// Adds `delta` to the player's reputation; unknown players are ignored.
    pub fn update_reputation(&mut self, player: PlayerId, delta: i32) {
        if let Some(points) = self.reputation.get_mut(&player) {
            *points = points.saturating_add(delta);
        }
    }

    /// Reports whether the fire has to spread before play continues.
    #[must_use]
    pub fn should_spread_fire(&self) -> bool {
        self.phase == Phase::AwaitingFireSpread
    }

    /// Reports whether no forest is burning anymore.
    #[must_use]
    pub fn is_won(&self) -> bool {
        self.board.forests().all(|(_, forest)| !forest.is_burning())
    }

    /// Reports whether every player has been eliminated.
    #[must_use]
    pub fn is_lost(&self) -> bool {
        self.players.is_empty()
    }

    /// Reports whether the game has been won or lost.
    #[must_use]
    pub fn is_over(&self) -> bool {
        self.is_won() || self.is_lost()
    }

    /// Ends the turn of the current player.
    pub fn end_turn(&mut self, out_events: &mut Vec<Event>) -> Result<(), GameError> {
        self.ensure_acting()?;
        debug!(player = %self.turn.player(), "turn ended");
        self.pass_turn(out_events);
        Ok(())
    }

    /// Lets the fire spread along the wind once a round is complete.
    ///
    /// Strongly burning forests ignite their neighbour in every wind
    /// direction while lightly burning forests flare up on their own. Each
    /// forest escalates at most once. Engines on strongly burning forests are
    /// destroyed afterwards and players without engines leave the game.
    pub fn spread_fire(&mut self, wind: &Wind, out_events: &mut Vec<Event>) -> Result<(), GameError> {
        if self.is_over() {
            return Err(GameError::GameOver);
        }
        if self.phase != Phase::AwaitingFireSpread {
            return Err(GameError::FireSpreadNotDue);
        }

        self.set_phase(Phase::Acting, out_events);
        self.escalate(wind, out_events);
        self.burn_engines(out_events);
        self.eliminate_players(out_events);
        self.announce_outcome(out_events);
        Ok(())
    }

    fn escalate(&mut self, wind: &Wind, out_events: &mut Vec<Event>) {
        let mut targets = BTreeSet::new();
        for (position, forest) in self.board.forests() {
            match forest.state() {
                ForestState::StrongBurn => {
                    targets.extend(wind.iter().filter_map(|direction| direction.adjacent(position)));
                }
                ForestState::LightBurn => {
                    let _ = targets.insert(position);
                }
                ForestState::Wet | ForestState::Dry => {}
            }
        }

        for position in targets {
            let Some(forest) = self.board.forest_mut(position) else {
                continue;
            };
            if forest.increase_burning() {
                let state = forest.state();
                trace!(%position, ?state, "fire escalated");
                out_events.push(Event::FireEscalated { position, state });
            }
        }
    }

    fn burn_engines(&mut self, out_events: &mut Vec<Event>) {
        let burnt: Vec<(EngineId, Position)> = self
            .board
            .engines()
            .filter(|(_, position)| {
                self.board
                    .forest(*position)
                    .is_some_and(|forest| forest.state() == ForestState::StrongBurn)
            })
            .collect();

        for (engine, position) in burnt {
            self.board.remove_engine(engine);
            if let Some(owner) = self.player_mut(engine.owner()) {
                owner.remove_engine(engine.number());
            }
            debug!(%engine, %position, "engine burnt");
            out_events.push(Event::EngineBurnt { engine, position });
        }
    }

    fn eliminate_players(&mut self, out_events: &mut Vec<Event>) {
        let eliminated: Vec<PlayerId> = self
            .players
            .iter()
            .filter(|player| !player.has_engines())
            .map(Player::id)
            .collect();
        self.players.retain(Player::has_engines);
        for player in &eliminated {
            info!(%player, "player eliminated");
            out_events.push(Event::PlayerEliminated { player: *player });
        }

        let current_eliminated = eliminated.contains(&self.turn.player());
        self.turns.eliminate(eliminated);
        if current_eliminated && !self.is_lost() {
            self.pass_turn(out_events);
        }
    }

    fn pass_turn(&mut self, out_events: &mut Vec<Event>) {
        let _ = self.turns.advance();
        if let Some(&player) = self.turns.current() {
            self.turn = Turn::new(
                player,
                engines_of(&self.players, player),
                self.rules.action_points,
            );
            out_events.push(Event::TurnPassed { player });
        }

        if self.turns.position() == 0 {
            self.set_phase(Phase::AwaitingFireSpread, out_events);
        }
    }

    fn set_phase(&mut self, phase: Phase, out_events: &mut Vec<Event>) {
        if self.phase != phase {
            debug!(?phase, "phase changed");
            self.phase = phase;
            out_events.push(Event::PhaseChanged { phase });
        }
    }

    pub(crate) fn ensure_acting(&self) -> Result<(), GameError> {
        if self.is_over() {
            return Err(GameError::GameOver);
        }
        if self.phase == Phase::AwaitingFireSpread {
            return Err(GameError::FireSpreadPending);
        }
        Ok(())
    }

    pub(crate) fn announce_outcome(&self, out_events: &mut Vec<Event>) {
        if self.is_lost() {
            info!("every engine burnt, game lost");
            out_events.push(Event::GameLost);
        } else if self.is_won() {
            info!("every fire extinguished, game won");
            out_events.push(Event::GameWon);
        }
    }
}

fn engines_of(players: &[Player], id: PlayerId) -> Vec<EngineId> {
    players
        .iter()
        .find(|player| player.id() == id)
        .map(|player| player.engines().map(FireEngine::id).collect())
        .unwrap_or_default()
}

/// Applies the provided command to the game.
///
/// Rejected commands return an error and leave both the game and
/// `out_events` untouched.
pub fn apply(game: &mut Game, command: Command, out_events: &mut Vec<Event>) -> Result<(), GameError> {
    let action = match command {
        Command::MoveEngine {
            engine,
            destination,
        } => Action::Move {
            engine,
            destination,
        },
        Command::Extinguish { engine, target } => Action::Extinguish { engine, target },
        Command::Refill { engine } => Action::Refill { engine },
        Command::BuyEngine { spawn } => Action::BuyEngine { spawn },
        Command::EndTurn => return game.end_turn(out_events),
        Command::SpreadFire { wind } => return game.spread_fire(&wind, out_events),
    };
    action.perform(game, out_events)
}

/// Query functions that provide read-only access to the game state.
pub mod query {
    use fire_breaker_core::{EngineId, PlayerId, Position};

    use super::{Field, Game};

    /// Status of a single engine of the player in turn.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct EngineStatus {
        /// Identifier of the engine.
        pub engine: EngineId,
        /// Water left in the tank.
        pub water: u32,
        /// Action points left this turn.
        pub action_points: u32,
        /// Cell the engine stands on.
        pub position: Position,
    }

    /// Status of the player in turn and its engines.
    #[derive(Clone, Debug, PartialEq, Eq)]
    pub struct PlayerStatus {
        /// Player whose turn is in progress.
        pub player: PlayerId,
        /// Reputation balance of that player.
        pub reputation: i32,
        /// Engines of the player ordered by number.
        pub engines: Vec<EngineStatus>,
    }

    /// Renders a cell as `L` for ponds, the owner for stations and the burn
    /// indicator followed by the labels of the engines on it for forests.
    #[must_use]
    pub fn field_label(game: &Game, position: Position) -> Option<String> {
        let label = match game.board.field(position)? {
            Field::Pond => "L".to_owned(),
            Field::FireStation { owner } => owner.to_string(),
            Field::Forest(forest) => {
                let mut label = forest.state().indicator().to_string();
                for engine in forest.engines() {
                    label.push(',');
                    label.push_str(&engine.to_string());
                }
                label
            }
        };
        Some(label)
    }

    /// Rows of burn indicators where every non-burning cell renders as `x`.
    #[must_use]
    pub fn burn_map(game: &Game) -> Vec<String> {
        let dimensions = game.board.dimensions();
        (0..dimensions.height())
            .map(|row| {
                (0..dimensions.width())
                    .map(|column| {
                        game.board
                            .forest(Position::new(row, column))
                            .map(|forest| forest.state())
                            .filter(|state| state.is_burning())
                            .map_or('x', |state| state.indicator())
                    })
                    .collect()
            })
            .collect()
    }

    /// Captures the player in turn together with its deployed engines.
    #[must_use]
    pub fn player_status(game: &Game) -> PlayerStatus {
        let player = game.current_player();
        let engines = game
            .player(player)
            .into_iter()
            .flat_map(|owner| owner.engines())
            .filter_map(|engine| {
                let id = engine.id();
                Some(EngineStatus {
                    engine: id,
                    water: engine.water(),
                    action_points: game.turn.action_points(id).unwrap_or(0),
                    position: game.board.position_of(id)?,
                })
            })
            .collect();
        PlayerStatus {
            player,
            reputation: game.reputation(player).unwrap_or(0),
            engines,
        }
    }
}

#[cfg(test)]
mod tests {
    use fire_breaker_core::{Dimensions, Direction, IllegalAction};

    use super::*;

    const A: PlayerId = PlayerId::new('A');
    const B: PlayerId = PlayerId::new('B');
    const C: PlayerId = PlayerId::new('C');
    const D: PlayerId = PlayerId::new('D');

    fn drill() -> Game {
        Game::new(&Layout::standard_drill(), Rules::default())
    }

    fn end_round(game: &mut Game) -> Vec<Event> {
        let mut events = Vec::new();
        for _ in 0..game.players().count() {
            game.end_turn(&mut events).expect("acting phase");
        }
        events
    }

    fn state_at(game: &Game, row: i32, column: i32) -> Option<ForestState> {
        game.board()
            .forest(Position::new(row, column))
            .map(Forest::state)
    }

    #[test]
    fn new_game_starts_with_first_player_acting() {
        let game = drill();
        assert_eq!(game.current_player(), A);
        assert_eq!(game.phase(), Phase::Acting);
        assert_eq!(game.players().count(), 4);
        assert_eq!(game.reputation(D), Some(0));
        assert_eq!(
            game.current_turn().action_points(EngineId::new(A, 0)),
            Some(3)
        );
        assert!(!game.is_over());
    }

    #[test]
    fn completing_a_lap_requires_a_fire_spread() {
        let mut game = drill();
        let events = end_round(&mut game);

        assert!(game.should_spread_fire());
        assert_eq!(
            events.last(),
            Some(&Event::PhaseChanged {
                phase: Phase::AwaitingFireSpread
            })
        );
        let mut rejected = Vec::new();
        assert_eq!(
            game.end_turn(&mut rejected),
            Err(GameError::FireSpreadPending)
        );
        assert!(rejected.is_empty());
    }

    #[test]
    fn turn_order_rotates_left_after_each_lap() {
        let mut game = drill();
        let events = end_round(&mut game);
        let passed: Vec<PlayerId> = events
            .iter()
            .filter_map(|event| match event {
                Event::TurnPassed { player } => Some(*player),
                _ => None,
            })
            .collect();
        assert_eq!(passed, vec![B, C, D, B]);
        assert_eq!(game.current_player(), B);
    }

    #[test]
    fn fire_cannot_spread_mid_round() {
        let mut game = drill();
        let mut events = Vec::new();
        assert_eq!(
            game.spread_fire(&Wind::all(), &mut events),
            Err(GameError::FireSpreadNotDue)
        );
        assert!(events.is_empty());
    }

    #[test]
    fn calm_spread_only_escalates_light_fires() {
        let mut game = drill();
        let _ = end_round(&mut game);
        let mut events = Vec::new();
        game.spread_fire(&Wind::calm(), &mut events)
            .expect("round complete");

        assert_eq!(state_at(&game, 1, 2), Some(ForestState::StrongBurn));
        assert_eq!(state_at(&game, 2, 3), Some(ForestState::Dry));
        assert_eq!(state_at(&game, 2, 1), Some(ForestState::Wet));
        assert_eq!(game.phase(), Phase::Acting);
    }

    #[test]
    fn strong_fire_spreads_along_the_wind() {
        let mut game = drill();
        let _ = end_round(&mut game);
        let mut events = Vec::new();
        game.spread_fire(&Wind::single(Direction::East), &mut events)
            .expect("round complete");

        assert_eq!(state_at(&game, 2, 3), Some(ForestState::LightBurn));
        assert_eq!(state_at(&game, 3, 2), Some(ForestState::Dry));
        assert!(events.contains(&Event::FireEscalated {
            position: Position::new(2, 3),
            state: ForestState::LightBurn,
        }));
    }

    #[test]
    fn overlapping_sources_escalate_a_forest_once() {
        let layout = Layout::new(
            Dimensions::new(1, 4).expect("dimensions"),
            vec![
                Tile::FireStation(A),
                Tile::Forest(ForestState::StrongBurn),
                Tile::Forest(ForestState::LightBurn),
                Tile::Engine(A),
            ],
        );
        let mut game = Game::new(&layout, Rules::default());
        let _ = end_round(&mut game);
        let mut events = Vec::new();
        game.spread_fire(&Wind::single(Direction::East), &mut events)
            .expect("round complete");

        assert_eq!(
            state_at(&game, 0, 2),
            Some(ForestState::StrongBurn),
            "light fire hit by the wind escalates a single step"
        );
        assert_eq!(state_at(&game, 0, 3), Some(ForestState::Dry));
    }

    #[test]
    fn actions_are_rejected_once_the_game_is_won() {
        let layout = Layout::new(
            Dimensions::new(1, 3).expect("dimensions"),
            vec![
                Tile::FireStation(A),
                Tile::Engine(A),
                Tile::Forest(ForestState::LightBurn),
            ],
        );
        let mut game = Game::new(&layout, Rules::default());
        let mut events = Vec::new();
        apply(
            &mut game,
            Command::Extinguish {
                engine: EngineId::new(A, 0),
                target: Position::new(0, 2),
            },
            &mut events,
        )
        .expect("adjacent light fire");

        assert!(game.is_won());
        assert_eq!(events.last(), Some(&Event::GameWon));
        assert_eq!(game.end_turn(&mut events), Err(GameError::GameOver));
    }

    #[test]
    fn rejected_actions_leave_no_trace() {
        let mut game = drill();
        let before = query::player_status(&game);
        let mut events = Vec::new();
        let result = apply(
            &mut game,
            Command::BuyEngine {
                spawn: Position::new(0, 1),
            },
            &mut events,
        );

        assert_eq!(
            result,
            Err(GameError::Illegal(IllegalAction::InsufficientReputation {
                required: 5,
                available: 0,
            }))
        );
        assert!(events.is_empty());
        assert_eq!(query::player_status(&game), before);
    }

    #[test]
    fn field_labels_list_engines_in_order() {
        let mut game = drill();
        let mut events = Vec::new();
        game.update_reputation(A, 5);
        apply(
            &mut game,
            Command::BuyEngine {
                spawn: Position::new(1, 1),
            },
            &mut events,
        )
        .expect("calm forest next to the station");

        assert_eq!(
            query::field_label(&game, Position::new(1, 1)).as_deref(),
            Some("d,A0,A1")
        );
        assert_eq!(query::field_label(&game, Position::new(0, 2)).as_deref(), Some("L"));
        assert_eq!(query::field_label(&game, Position::new(4, 4)).as_deref(), Some("B"));
        assert_eq!(query::field_label(&game, Position::new(5, 0)), None);
    }

    #[test]
    fn burn_map_hides_calm_cells() {
        let game = drill();
        assert_eq!(
            query::burn_map(&game),
            vec!["xxxxx", "xx+xx", "xx*xx", "xxxxx", "xxxxx"]
        );
    }

    #[test]
    fn player_status_reports_engines_of_the_current_player() {
        let game = drill();
        let status = query::player_status(&game);
        assert_eq!(status.player, A);
        assert_eq!(status.reputation, 0);
        assert_eq!(
            status.engines,
            vec![query::EngineStatus {
                engine: EngineId::new(A, 0),
                water: 3,
                action_points: 3,
                position: Position::new(1, 1),
            }]
        );
    }

    #[test]
    fn apply_routes_turn_commands() {
        let mut game = drill();
        let mut events = Vec::new();
        apply(&mut game, Command::EndTurn, &mut events).expect("acting phase");
        assert_eq!(events, vec![Event::TurnPassed { player: B }]);
        assert_eq!(
            apply(
                &mut game,
                Command::SpreadFire { wind: Wind::calm() },
                &mut events
            ),
            Err(GameError::FireSpreadNotDue)
        );
        assert_eq!(game.current_player(), B);
    }

    #[test]
    fn eliminating_the_last_player_loses_the_game() {
        let layout = Layout::new(
            Dimensions::new(1, 3).expect("dimensions"),
            vec![
                Tile::FireStation(C),
                Tile::Engine(C),
                Tile::Forest(ForestState::StrongBurn),
            ],
        );
        let mut game = Game::new(&layout, Rules::default());
        let mut events = Vec::new();
        for wind in [Wind::single(Direction::West), Wind::calm()] {
            let _ = end_round(&mut game);
            events.clear();
            game.spread_fire(&wind, &mut events)
                .expect("round complete");
        }

        assert!(game.is_lost());
        assert!(events.contains(&Event::EngineBurnt {
            engine: EngineId::new(C, 0),
            position: Position::new(0, 1),
        }));
        assert_eq!(events.last(), Some(&Event::GameLost));
        assert_eq!(
            game.spread_fire(&Wind::calm(), &mut events),
            Err(GameError::GameOver)
        );
    }
}
