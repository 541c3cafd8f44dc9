#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs a Fire Breaker drill on the standard board.

mod crew;

use std::{fs, path::PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use fire_breaker_core::{Command, Event, GameError, Rules};
use fire_breaker_system_weather::{Config, Weather};
use fire_breaker_world::{self as world, query, Layout, Session};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "fire_breaker=info";

/// Command-line arguments accepted by the drill.
#[derive(Debug, Parser)]
#[command(name = "fire-breaker", about = "Runs a Fire Breaker drill on the standard board")]
struct Args {
    /// Seed of the die that decides the wind.
    #[arg(long, default_value_t = 0x5eed)]
    seed: u64,
    /// TOML file overriding the default rules.
    #[arg(long)]
    rules: Option<PathBuf>,
    /// Number of rounds after which the drill stops.
    #[arg(long, default_value_t = 20)]
    max_rounds: u32,
}

/// Entry point for the Fire Breaker command-line interface.
fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let rules = match &args.rules {
        Some(path) => {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("failed to read rules at {}", path.display()))?;
            parse_rules(&contents)
                .with_context(|| format!("invalid rules in {}", path.display()))?
        }
        None => Rules::default(),
    };

    let mut session = Session::new(Layout::standard_drill(), rules);
    let mut weather = Weather::new(Config::new(args.seed));
    info!(
        seed = args.seed,
        max_rounds = args.max_rounds,
        rules = ?session.game().rules(),
        "drill started"
    );
    print_board(&session);

    for round in 1..=args.max_rounds {
        let outcome = play_round(&mut session, &mut weather)
            .with_context(|| format!("round {round} was rejected"))?;
        println!("round {round}: {outcome}");
        print_board(&session);
        if session.game().is_over() {
            break;
        }
    }

    let game = session.game();
    let verdict = if game.is_won() {
        "won"
    } else if game.is_lost() {
        "lost"
    } else {
        "undecided"
    };
    info!(verdict, "drill finished");
    println!("{verdict}");
    Ok(())
}

fn parse_rules(contents: &str) -> Result<Rules> {
    toml::from_str(contents).context("failed to parse rules toml contents")
}

/// Lets every crew act until the fire is due, then spreads it.
fn play_round(session: &mut Session, weather: &mut Weather) -> Result<String, GameError> {
    let game = session.game_mut();
    let mut events = Vec::new();

    while !game.should_spread_fire() && !game.is_over() {
        while let Some(command) = crew::next_action(game).filter(|_| !game.is_over()) {
            if let Err(error) = world::apply(game, command, &mut events) {
                warn!(%error, "crew action rejected");
                break;
            }
        }
        if game.is_over() {
            break;
        }
        world::apply(game, Command::EndTurn, &mut events)?;
    }
    log_events(&events);

    // A spread that eliminates the player in turn may complete the next lap.
    let mut pending = events;
    let mut spread = Vec::new();
    loop {
        let mut commands = Vec::new();
        weather.handle(&pending, &mut commands);
        if commands.is_empty() {
            break;
        }
        pending.clear();
        for command in commands {
            world::apply(game, command, &mut pending)?;
        }
        log_events(&pending);
        spread.extend(pending.iter().cloned());
    }

    let outcome = if spread.contains(&Event::GameLost) {
        "lose".to_owned()
    } else if spread
        .iter()
        .any(|event| matches!(event, Event::PlayerEliminated { .. }))
    {
        game.current_player().to_string()
    } else if game.is_won() {
        "win".to_owned()
    } else {
        "OK".to_owned()
    };
    Ok(outcome)
}

fn log_events(events: &[Event]) {
    for event in events {
        match event {
            Event::PlayerEliminated { player } => info!(%player, "player eliminated"),
            Event::GameWon | Event::GameLost => info!(?event, "game over"),
            _ => debug!(?event, "event"),
        }
    }
}

fn print_board(session: &Session) {
    for row in query::burn_map(session.game()) {
        println!("{row}");
    }
}

#[cfg(test)]
mod tests {
    use fire_breaker_core::PlayerId;

    use super::*;

    #[test]
    fn rules_fall_back_to_defaults_for_missing_keys() {
        let rules = parse_rules("engine_cost = 3\n").expect("valid rules");
        assert_eq!(rules.engine_cost, 3);
        assert_eq!(rules.tank_capacity, Rules::default().tank_capacity);
    }

    #[test]
    fn unknown_rule_keys_are_rejected() {
        assert!(parse_rules("tank_size = 3\n").is_err());
    }

    #[test]
    fn first_drill_round_contains_the_light_fire() {
        let mut session = Session::new(Layout::standard_drill(), Rules::default());
        let mut weather = Weather::new(Config::new(3));

        let outcome = play_round(&mut session, &mut weather).expect("legal round");

        let game = session.game();
        assert_eq!(outcome, "OK");
        assert!(!game.should_spread_fire());
        assert_eq!(game.reputation(PlayerId::new('A')), Some(1));
        assert_eq!(game.current_player(), PlayerId::new('B'));
        assert_eq!(game.players().count(), 4);
        assert_eq!(
            query::burn_map(game)[2].chars().nth(2),
            Some('*'),
            "no crew stands next to the strong fire"
        );
    }
}
