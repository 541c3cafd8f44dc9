use fire_breaker_core::{
    Command, Dimensions, EngineId, ForestState, PlayerId, Position, Rules, Wind,
};
use fire_breaker_world::{self as world, Board, Cycle, Field, Forest, Game, Layout, Tile, Turn};
use proptest::prelude::*;

const SIDE: i32 = 4;

fn forest_state() -> impl Strategy<Value = ForestState> {
    prop::sample::select(ForestState::ALL.to_vec())
}

fn dimensions() -> Dimensions {
    Dimensions::new(SIDE, SIDE).expect("positive dimensions")
}

fn forest_board(states: &[ForestState]) -> Board {
    let fields = states
        .iter()
        .map(|state| Field::Forest(Forest::new(*state)))
        .collect();
    Board::new(dimensions(), fields)
}

/// Station of `A` in the top-left corner and its engine right of it; every
/// other cell is a forest taken from `states`.
fn crew_layout(states: &[ForestState]) -> Layout {
    let player = PlayerId::new('A');
    let tiles = states
        .iter()
        .enumerate()
        .map(|(index, state)| match index {
            0 => Tile::FireStation(player),
            1 => Tile::Engine(player),
            _ => Tile::Forest(*state),
        })
        .collect();
    Layout::new(dimensions(), tiles)
}

fn manhattan(a: Position, b: Position) -> u32 {
    a.row().abs_diff(b.row()) + a.column().abs_diff(b.column())
}

proptest! {
    #[test]
    fn single_live_element_stays_current(
        len in 1usize..8,
        rotation in -4i32..4,
        advances in 0usize..24,
    ) {
        let elements: Vec<usize> = (0..len).collect();
        let mut cycle = Cycle::new(elements, rotation);
        cycle.eliminate((1..len).collect());

        for _ in 0..advances {
            let _ = cycle.advance();
            prop_assert_eq!(cycle.current(), Some(&0));
        }
    }

    #[test]
    fn escalation_saturates_at_strong_burn(start in forest_state(), steps in 3usize..12) {
        let mut state = start;
        for _ in 0..steps {
            state = state.successor();
        }
        prop_assert_eq!(state, ForestState::StrongBurn);
        prop_assert_eq!(state.successor(), ForestState::StrongBurn);
    }

    #[test]
    fn fresh_turn_grants_full_budget(count in 0u32..10, points in 1u32..6) {
        let player = PlayerId::new('A');
        let engines: Vec<EngineId> = (0..count).map(|number| EngineId::new(player, number)).collect();
        let turn = Turn::new(player, engines.iter().copied(), points);

        for engine in engines {
            prop_assert_eq!(turn.action_points(engine), Some(points));
            prop_assert!(turn.can_move(engine));
        }
    }

    #[test]
    fn reachable_destinations_are_calm_and_in_range(
        states in prop::collection::vec(forest_state(), 16),
        origin in (0..SIDE, 0..SIDE),
        destination in (0..SIDE, 0..SIDE),
        steps in 1u32..4,
    ) {
        let mut board = forest_board(&states);
        let engine = EngineId::new(PlayerId::new('A'), 0);
        let origin = Position::new(origin.0, origin.1);
        let destination = Position::new(destination.0, destination.1);
        board.place_engine(engine, origin);

        if board.can_reach(engine, destination, steps) {
            let state = board.forest(destination).map(Forest::state);
            prop_assert!(state.is_some_and(|state| !state.is_burning()));
            let distance = manhattan(origin, destination);
            prop_assert!(distance <= steps);
            prop_assert_eq!((steps - distance) % 2, 0);
        }
    }

    #[test]
    fn strong_fire_around_the_origin_blocks_every_move(
        states in prop::collection::vec(forest_state(), 16),
        destination in (0..SIDE, 0..SIDE),
        steps in 1u32..4,
    ) {
        let origin = Position::new(1, 1);
        let mut states = states;
        for (row, column) in [(0, 1), (2, 1), (1, 0), (1, 2)] {
            let index = usize::try_from(row * SIDE + column).expect("index");
            states[index] = ForestState::StrongBurn;
        }
        let mut board = forest_board(&states);
        let engine = EngineId::new(PlayerId::new('A'), 0);
        board.place_engine(engine, origin);

        let destination = Position::new(destination.0, destination.1);
        prop_assert!(!board.can_reach(engine, destination, steps));
    }

    #[test]
    fn calm_spread_only_escalates_light_fires(states in prop::collection::vec(forest_state(), 16)) {
        let mut game = Game::new(&crew_layout(&states), Rules::default());
        prop_assume!(!game.is_over());
        let before: Vec<(Position, ForestState)> = game
            .board()
            .forests()
            .map(|(position, forest)| (position, forest.state()))
            .collect();

        let mut events = Vec::new();
        world::apply(&mut game, Command::EndTurn, &mut events).expect("acting phase");
        world::apply(&mut game, Command::SpreadFire { wind: Wind::calm() }, &mut events)
            .expect("round complete");

        for (position, state) in before {
            let expected = if state == ForestState::LightBurn {
                ForestState::StrongBurn
            } else {
                state
            };
            prop_assert_eq!(game.board().forest(position).map(Forest::state), Some(expected));
        }
    }
}
