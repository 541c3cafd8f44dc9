#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Weather system that rolls the wind whenever the fire is due to spread.

use fire_breaker_core::{Command, Direction, Event, Phase, Wind};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Faces of the die that decides the wind.
pub const DIE_FACES: u8 = 6;

/// Maps a die roll to the wind it produces.
///
/// A one blows in every direction, a six is calm and the faces in between
/// select north, east, south and west in that order. Anything outside the
/// die yields `None`.
#[must_use]
pub fn wind_from_roll(roll: u8) -> Option<Wind> {
    match roll {
        1 => Some(Wind::all()),
        2..=5 => {
            let direction = Direction::ALL[usize::from(roll - 2)];
            Some(Wind::single(direction))
        }
        DIE_FACES => Some(Wind::calm()),
        _ => None,
    }
}

/// Configuration parameters required to construct the weather system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    rng_seed: u64,
}

impl Config {
    /// Creates a configuration rolling dice from the provided seed.
    #[must_use]
    pub const fn new(rng_seed: u64) -> Self {
        Self { rng_seed }
    }
}

/// Pure system that answers every pending fire spread with a rolled wind.
#[derive(Debug)]
pub struct Weather {
    rng: ChaCha8Rng,
}

impl Weather {
    /// Creates a new weather system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
        }
    }

    /// Rolls the die once.
    pub fn roll(&mut self) -> u8 {
        self.rng.gen_range(1..=DIE_FACES)
    }

    /// Emits one spread command for every announcement that the round is over.
    pub fn handle(&mut self, events: &[Event], out: &mut Vec<Command>) {
        for event in events {
            if let Event::PhaseChanged {
                phase: Phase::AwaitingFireSpread,
            } = event
            {
                let roll = self.roll();
                let wind = wind_from_roll(roll).unwrap_or_default();
                out.push(Command::SpreadFire { wind });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_face_maps_to_a_wind() {
        for roll in 1..=DIE_FACES {
            assert!(wind_from_roll(roll).is_some(), "face {roll}");
        }
        assert!(wind_from_roll(0).is_none());
        assert!(wind_from_roll(7).is_none());
    }

    #[test]
    fn middle_faces_follow_the_compass() {
        let expected = [
            Direction::North,
            Direction::East,
            Direction::South,
            Direction::West,
        ];
        for (roll, direction) in (2..=5).zip(expected) {
            assert_eq!(wind_from_roll(roll), Some(Wind::single(direction)));
        }
        assert_eq!(wind_from_roll(1), Some(Wind::all()));
        assert_eq!(wind_from_roll(6), Some(Wind::calm()));
    }

    #[test]
    fn rolls_stay_on_the_die() {
        let mut weather = Weather::new(Config::new(7));
        for _ in 0..200 {
            let roll = weather.roll();
            assert!((1..=DIE_FACES).contains(&roll), "rolled {roll}");
        }
    }

    #[test]
    fn ignores_events_other_than_pending_spreads() {
        let mut weather = Weather::new(Config::new(1));
        let mut commands = Vec::new();
        weather.handle(
            &[
                Event::PhaseChanged {
                    phase: Phase::Acting,
                },
                Event::GameWon,
            ],
            &mut commands,
        );
        assert!(commands.is_empty());
    }
}
