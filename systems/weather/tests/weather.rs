use fire_breaker_core::{Command, Event, Phase, Rules};
use fire_breaker_system_weather::{wind_from_roll, Config, Weather};
use fire_breaker_world::{self as world, query, Game, Layout};

#[test]
fn answers_a_completed_round_with_one_spread() {
    let mut game = Game::new(&Layout::standard_drill(), Rules::default());
    let mut weather = Weather::new(Config::new(0x5eed));
    let mut events = Vec::new();
    for _ in 0..4 {
        world::apply(&mut game, Command::EndTurn, &mut events).expect("acting phase");
    }

    let mut commands = Vec::new();
    weather.handle(&events, &mut commands);

    assert_eq!(commands.len(), 1, "one spread per round");
    let mut spread = Vec::new();
    for command in commands {
        world::apply(&mut game, command, &mut spread).expect("round complete");
    }
    assert_eq!(spread.first(), Some(&Event::PhaseChanged { phase: Phase::Acting }));
    assert_eq!(game.phase(), Phase::Acting);
}

#[test]
fn same_seed_replays_the_same_fire() {
    let first = replay(0x1234_5678);
    let second = replay(0x1234_5678);

    assert_eq!(first, second, "replay diverged between runs");
}

#[test]
fn rolled_winds_match_the_die_mapping() {
    let mut rolling = Weather::new(Config::new(42));
    let mut handling = Weather::new(Config::new(42));
    let pending = [Event::PhaseChanged {
        phase: Phase::AwaitingFireSpread,
    }];

    for _ in 0..20 {
        let expected = wind_from_roll(rolling.roll()).expect("die face");
        let mut commands = Vec::new();
        handling.handle(&pending, &mut commands);
        assert_eq!(commands, vec![Command::SpreadFire { wind: expected }]);
    }
}

fn replay(seed: u64) -> Vec<String> {
    let mut game = Game::new(&Layout::standard_drill(), Rules::default());
    let mut weather = Weather::new(Config::new(seed));

    for _ in 0..6 {
        if game.is_over() {
            break;
        }
        let mut events = Vec::new();
        while !game.should_spread_fire() {
            world::apply(&mut game, Command::EndTurn, &mut events).expect("acting phase");
        }
        let mut commands = Vec::new();
        weather.handle(&events, &mut commands);
        for command in commands {
            world::apply(&mut game, command, &mut events).expect("round complete");
        }
    }

    query::burn_map(&game)
}
