#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Fire Breaker engine.
//!
//! This crate defines the vocabulary that connects adapters, the
//! authoritative game, and pure systems. Adapters submit [`Command`] values
//! describing desired moves, the world validates and executes them via its
//! `apply` entry point, and then reports [`Event`] values describing exactly
//! what changed. A rejected command yields a [`GameError`] and no events.

use std::{
    cmp::Ordering,
    collections::BTreeSet,
    fmt,
    hash::{Hash, Hasher},
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Commands that express all permissible game mutations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Moves an engine one or more orthogonal steps to a new forest.
    MoveEngine {
        /// Engine that should relocate.
        engine: EngineId,
        /// Forest cell the engine should end up on.
        destination: Position,
    },
    /// Pours one unit of water onto an orthogonally adjacent forest.
    Extinguish {
        /// Engine that pours the water.
        engine: EngineId,
        /// Forest cell receiving the water.
        target: Position,
    },
    /// Refills an engine's tank next to a pond or fire station.
    Refill {
        /// Engine whose tank should be refilled.
        engine: EngineId,
    },
    /// Buys a new engine for the current player with reputation points.
    BuyEngine {
        /// Forest cell next to the player's fire station where the engine appears.
        spawn: Position,
    },
    /// Ends the current player's turn.
    EndTurn,
    /// Spreads the fire once every player finished a turn.
    SpreadFire {
        /// Directions along which strongly burning forests ignite their neighbours.
        wind: Wind,
    },
}

/// Events reported by the world after processing a command.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Confirms that an engine relocated.
    EngineMoved {
        /// Engine that moved.
        engine: EngineId,
        /// Cell the engine occupied before moving.
        from: Position,
        /// Cell the engine occupies after moving.
        to: Position,
    },
    /// Confirms that an engine poured water onto a forest.
    FieldExtinguished {
        /// Engine that poured the water.
        engine: EngineId,
        /// Forest that received the water.
        position: Position,
        /// State of the forest before treatment.
        from: ForestState,
        /// State of the forest after treatment.
        to: ForestState,
    },
    /// Confirms that an engine's tank was refilled.
    EngineRefilled {
        /// Engine that was refilled.
        engine: EngineId,
    },
    /// Confirms that a player bought a new engine.
    EngineBought {
        /// Identifier allocated to the new engine.
        engine: EngineId,
        /// Forest the engine was placed on.
        position: Position,
    },
    /// Reports a player's new reputation balance.
    ReputationChanged {
        /// Player whose balance changed.
        player: PlayerId,
        /// Balance after the change.
        reputation: i32,
    },
    /// Announces the player whose turn just began.
    TurnPassed {
        /// Player now in turn.
        player: PlayerId,
    },
    /// Announces that the game entered a new phase.
    PhaseChanged {
        /// Phase that became active.
        phase: Phase,
    },
    /// Reports that a forest burns more strongly after the fire spread.
    FireEscalated {
        /// Forest that escalated.
        position: Position,
        /// State the forest escalated to.
        state: ForestState,
    },
    /// Reports that an engine was destroyed by a strongly burning forest.
    EngineBurnt {
        /// Engine that was destroyed.
        engine: EngineId,
        /// Forest the engine stood on.
        position: Position,
    },
    /// Reports that a player lost its last engine and left the game.
    PlayerEliminated {
        /// Player that was eliminated.
        player: PlayerId,
    },
    /// Every fire on the board has been extinguished.
    GameWon,
    /// Every engine on the board has burnt.
    GameLost,
}

/// Describes which kind of transition the game currently accepts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Players may perform actions and end their turns.
    Acting,
    /// Every player finished a turn; the fire must spread before play resumes.
    AwaitingFireSpread,
}

/// Rectangular extent of a board measured in whole cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dimensions {
    height: i32,
    width: i32,
}

impl Dimensions {
    /// Creates dimensions with the provided height and width.
    ///
    /// Returns `None` unless both extents are positive.
    #[must_use]
    pub const fn new(height: i32, width: i32) -> Option<Self> {
        if height > 0 && width > 0 {
            Some(Self { height, width })
        } else {
            None
        }
    }

    /// Number of rows.
    #[must_use]
    pub const fn height(&self) -> i32 {
        self.height
    }

    /// Number of columns.
    #[must_use]
    pub const fn width(&self) -> i32 {
        self.width
    }

    /// Reports whether the coordinates fall within these dimensions.
    #[must_use]
    pub const fn contains(&self, row: i32, column: i32) -> bool {
        row >= 0 && column >= 0 && row < self.height && column < self.width
    }

    /// Total number of cells covered by these dimensions.
    #[must_use]
    pub fn area(&self) -> usize {
        let height = usize::try_from(self.height).unwrap_or(0);
        let width = usize::try_from(self.width).unwrap_or(0);
        height.saturating_mul(width)
    }

    /// Row-major offset of the position, if it lies within these dimensions.
    #[must_use]
    pub fn index(&self, position: Position) -> Option<usize> {
        if !self.contains(position.row, position.column) {
            return None;
        }

        let row = usize::try_from(position.row).ok()?;
        let column = usize::try_from(position.column).ok()?;
        let width = usize::try_from(self.width).ok()?;
        row.checked_mul(width)?.checked_add(column)
    }

    /// Iterates every bounded position in row-major order.
    pub fn positions(self) -> impl Iterator<Item = Position> {
        (0..self.height).flat_map(move |row| {
            (0..self.width).map(move |column| Position {
                row,
                column,
                bound: Some(self),
            })
        })
    }
}

static ORTHOGONAL_OFFSETS: [(i32, i32); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];
static DIAGONAL_OFFSETS: [(i32, i32); 4] = [(1, -1), (-1, 1), (1, 1), (-1, -1)];

/// Location of a single board cell, optionally bound to [`Dimensions`].
///
/// Rows grow downwards and columns grow to the right. Arithmetic on a bound
/// position never leaves the bound; it yields `None` instead. Equality,
/// ordering and hashing only consider the coordinates.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct Position {
    row: i32,
    column: i32,
    #[serde(skip)]
    bound: Option<Dimensions>,
}

impl Position {
    /// Creates an unbounded position.
    #[must_use]
    pub const fn new(row: i32, column: i32) -> Self {
        Self {
            row,
            column,
            bound: None,
        }
    }

    /// Creates a position bound to the provided dimensions.
    ///
    /// Returns `None` when the coordinates lie outside the bound.
    #[must_use]
    pub const fn bounded(bound: Dimensions, row: i32, column: i32) -> Option<Self> {
        if bound.contains(row, column) {
            Some(Self {
                row,
                column,
                bound: Some(bound),
            })
        } else {
            None
        }
    }

    /// Zero-based row index.
    #[must_use]
    pub const fn row(&self) -> i32 {
        self.row
    }

    /// Zero-based column index.
    #[must_use]
    pub const fn column(&self) -> i32 {
        self.column
    }

    /// Shifts the position by the provided deltas.
    ///
    /// Returns `None` if the result leaves the bound or overflows.
    #[must_use]
    pub fn offset(self, rows: i32, columns: i32) -> Option<Self> {
        let row = self.row.checked_add(rows)?;
        let column = self.column.checked_add(columns)?;
        match self.bound {
            Some(bound) => Self::bounded(bound, row, column),
            None => Some(Self::new(row, column)),
        }
    }

    /// Lazily enumerates the neighbours of this position that stay in bounds.
    ///
    /// The four orthogonal neighbours come first, followed by the four
    /// diagonal ones when requested.
    pub fn adjacents(self, include_diagonals: bool) -> impl Iterator<Item = Position> {
        let diagonals: &'static [(i32, i32)] = if include_diagonals {
            &DIAGONAL_OFFSETS
        } else {
            &[]
        };
        ORTHOGONAL_OFFSETS
            .iter()
            .chain(diagonals)
            .filter_map(move |&(rows, columns)| self.offset(rows, columns))
    }

    /// Reports whether `other` is a neighbour of this position.
    #[must_use]
    pub fn is_adjacent(self, other: Position, include_diagonals: bool) -> bool {
        self.adjacents(include_diagonals)
            .any(|neighbour| neighbour == other)
    }
}

impl PartialEq for Position {
    fn eq(&self, other: &Self) -> bool {
        self.row == other.row && self.column == other.column
    }
}

impl Eq for Position {}

impl Hash for Position {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.row.hash(state);
        self.column.hash(state);
    }
}

impl PartialOrd for Position {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Position {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.row, self.column).cmp(&(other.row, other.column))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.column)
    }
}

/// Compass directions used for wind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Direction {
    /// Towards decreasing row indices.
    North,
    /// Towards increasing column indices.
    East,
    /// Towards increasing row indices.
    South,
    /// Towards decreasing column indices.
    West,
}

impl Direction {
    /// All four directions in clockwise order starting at north.
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    /// Row and column delta of a single step in this direction.
    #[must_use]
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Self::North => (-1, 0),
            Self::East => (0, 1),
            Self::South => (1, 0),
            Self::West => (0, -1),
        }
    }

    /// Neighbour of `position` in this direction, if it stays in bounds.
    #[must_use]
    pub fn adjacent(self, position: Position) -> Option<Position> {
        let (rows, columns) = self.delta();
        position.offset(rows, columns)
    }
}

/// Set of directions the wind blows in during a fire spread.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Wind {
    directions: BTreeSet<Direction>,
}

impl Wind {
    /// Wind without any direction.
    #[must_use]
    pub fn calm() -> Self {
        Self::default()
    }

    /// Wind blowing in every direction at once.
    #[must_use]
    pub fn all() -> Self {
        Self::from_directions(Direction::ALL)
    }

    /// Wind blowing in exactly one direction.
    #[must_use]
    pub fn single(direction: Direction) -> Self {
        Self::from_directions([direction])
    }

    /// Wind blowing in the provided directions.
    #[must_use]
    pub fn from_directions<I>(directions: I) -> Self
    where
        I: IntoIterator<Item = Direction>,
    {
        Self {
            directions: directions.into_iter().collect(),
        }
    }

    /// Reports whether the wind blows in no direction.
    #[must_use]
    pub fn is_calm(&self) -> bool {
        self.directions.is_empty()
    }

    /// Reports whether the wind blows in the provided direction.
    #[must_use]
    pub fn contains(&self, direction: Direction) -> bool {
        self.directions.contains(&direction)
    }

    /// Iterates the directions in clockwise order.
    pub fn iter(&self) -> impl Iterator<Item = Direction> + '_ {
        self.directions.iter().copied()
    }
}

/// Identifier of a player, rendered as its single-character label.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayerId(char);

impl PlayerId {
    /// Creates a player identifier from its label.
    #[must_use]
    pub const fn new(label: char) -> Self {
        Self(label)
    }

    /// Label shown to players.
    #[must_use]
    pub const fn label(&self) -> char {
        self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a fire engine: its owner plus a per-owner sequence number.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EngineId {
    owner: PlayerId,
    number: u32,
}

impl EngineId {
    /// Creates an engine identifier.
    #[must_use]
    pub const fn new(owner: PlayerId, number: u32) -> Self {
        Self { owner, number }
    }

    /// Player owning the engine.
    #[must_use]
    pub const fn owner(&self) -> PlayerId {
        self.owner
    }

    /// Sequence number allocated by the owner.
    #[must_use]
    pub const fn number(&self) -> u32 {
        self.number
    }
}

impl fmt::Display for EngineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.owner, self.number)
    }
}

/// Burn state of a forest, ordered from safest to most dangerous.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ForestState {
    /// Soaked forest that does not burn.
    Wet,
    /// Dry forest that may catch fire.
    Dry,
    /// Forest burning lightly.
    LightBurn,
    /// Forest burning strongly; impassable and lethal for engines.
    StrongBurn,
}

impl ForestState {
    /// All states from safest to most dangerous.
    pub const ALL: [ForestState; 4] = [
        ForestState::Wet,
        ForestState::Dry,
        ForestState::LightBurn,
        ForestState::StrongBurn,
    ];

    /// State reached when fire is applied; `StrongBurn` stays `StrongBurn`.
    #[must_use]
    pub const fn successor(self) -> Self {
        match self {
            Self::Wet => Self::Dry,
            Self::Dry => Self::LightBurn,
            Self::LightBurn | Self::StrongBurn => Self::StrongBurn,
        }
    }

    /// State reached when an engine pours water on it, or `None` when already wet.
    #[must_use]
    pub const fn extinguished(self) -> Option<Self> {
        match self {
            Self::Wet => None,
            Self::Dry | Self::LightBurn => Some(Self::Wet),
            Self::StrongBurn => Some(Self::LightBurn),
        }
    }

    /// Reports whether the forest is on fire.
    #[must_use]
    pub const fn is_burning(self) -> bool {
        matches!(self, Self::LightBurn | Self::StrongBurn)
    }

    /// Single-character indicator (`w`, `d`, `+` or `*`).
    #[must_use]
    pub const fn indicator(self) -> char {
        match self {
            Self::Wet => 'w',
            Self::Dry => 'd',
            Self::LightBurn => '+',
            Self::StrongBurn => '*',
        }
    }

    /// Looks up the state rendered by the provided indicator.
    #[must_use]
    pub fn from_indicator(indicator: char) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|state| state.indicator() == indicator)
    }
}

/// Tunable rule constants of a game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Rules {
    /// Water units an engine tank holds when full.
    pub tank_capacity: u32,
    /// Action points every engine receives at the start of its owner's turn.
    pub action_points: u32,
    /// Reputation points a new engine costs.
    pub engine_cost: i32,
    /// Reputation points earned for treating a burning forest.
    pub extinguish_reward: i32,
    /// Largest number of orthogonal steps a single move may cover.
    pub max_move_distance: u32,
    /// Rotation applied to the turn order after every round; negative rotates left.
    pub turn_rotation: i32,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            tank_capacity: 3,
            action_points: 3,
            engine_cost: 5,
            extinguish_reward: 1,
            max_move_distance: 2,
            turn_rotation: -1,
        }
    }
}

/// Reasons an action may be rejected by the rules.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum IllegalAction {
    /// The engine is not deployed on the board.
    #[error("unknown engine {0}")]
    UnknownEngine(EngineId),
    /// The engine belongs to someone other than the player in turn.
    #[error("{engine} does not belong to player {player}")]
    NotOwned {
        /// Engine named in the action.
        engine: EngineId,
        /// Player currently in turn.
        player: PlayerId,
    },
    /// The engine has used up its action points for this turn.
    #[error("{0} does not have enough action points")]
    NoActionPoints(EngineId),
    /// The engine already treated a forest or refilled this turn.
    #[error("{0} cannot move anymore")]
    Stationary(EngineId),
    /// No valid path leads to the destination.
    #[error("cannot move {engine} to {destination}")]
    Unreachable {
        /// Engine that attempted to move.
        engine: EngineId,
        /// Requested destination.
        destination: Position,
    },
    /// The target is not a forest or is already wet.
    #[error("cannot extinguish {0}")]
    NotExtinguishable(Position),
    /// The target does not share an edge with the engine's cell.
    #[error("{engine} is not adjacent to target {target}")]
    NotAdjacent {
        /// Engine that attempted to extinguish.
        engine: EngineId,
        /// Requested target.
        target: Position,
    },
    /// The engine already treated this forest during the current turn.
    #[error("{engine} has already extinguished {target} in this turn")]
    AlreadyExtinguished {
        /// Engine that attempted to extinguish.
        engine: EngineId,
        /// Requested target.
        target: Position,
    },
    /// The engine's tank is empty.
    #[error("{0} does not have enough water")]
    TankEmpty(EngineId),
    /// The engine's tank is already full.
    #[error("{0} is already full")]
    TankFull(EngineId),
    /// Neither a pond nor a fire station surrounds the engine.
    #[error("{0} cannot be refilled in this position")]
    NoWaterSource(EngineId),
    /// The player cannot afford a new engine.
    #[error("not enough reputation points: {available} of {required}")]
    InsufficientReputation {
        /// Reputation points a new engine costs.
        required: i32,
        /// Reputation points the player owns.
        available: i32,
    },
    /// The spawn cell is not a calm forest next to the player's fire station.
    #[error("cannot spawn an engine on {0}")]
    InvalidSpawn(Position),
}

/// Errors reported when a command cannot be applied.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum GameError {
    /// The game has already been won or lost.
    #[error("game is over")]
    GameOver,
    /// A round just ended and the fire has to spread first.
    #[error("fire must spread before play continues")]
    FireSpreadPending,
    /// The fire only spreads once every player finished a turn.
    #[error("fire cannot spread before the round is complete")]
    FireSpreadNotDue,
    /// The action violates the rules.
    #[error("illegal move: {0}")]
    Illegal(#[from] IllegalAction),
}
