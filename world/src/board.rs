//! Grid of fields plus the index of deployed engines.

use std::collections::BTreeMap;

use fire_breaker_core::{Dimensions, EngineId, ForestState, PlayerId, Position};

use crate::field::{Field, FieldKind, Forest};

/// Board owning every cell and tracking where each engine stands.
///
/// Cells are stored densely in row-major order. The engine index and the
/// occupant sets of the forests are only mutated together through
/// [`Board::place_engine`] and [`Board::remove_engine`], so an engine is always
/// listed by exactly one forest and that forest matches the index.
#[derive(Clone, Debug)]
pub struct Board {
    dimensions: Dimensions,
    fields: Vec<Field>,
    fire_stations: BTreeMap<PlayerId, Position>,
    engine_positions: BTreeMap<EngineId, Position>,
}

impl Board {
    /// Creates a board from row-major fields without any engines.
    ///
    /// # Panics
    ///
    /// Panics if the number of fields does not cover the dimensions.
    #[must_use]
    pub fn new(dimensions: Dimensions, fields: Vec<Field>) -> Self {
        assert_eq!(
            fields.len(),
            dimensions.area(),
            "board fields must cover every cell"
        );

        let fire_stations = dimensions
            .positions()
            .zip(&fields)
            .filter_map(|(position, field)| match field {
                Field::FireStation { owner } => Some((*owner, position)),
                _ => None,
            })
            .collect();

        Self {
            dimensions,
            fields,
            fire_stations,
            engine_positions: BTreeMap::new(),
        }
    }

    /// Extent of the board.
    #[must_use]
    pub const fn dimensions(&self) -> Dimensions {
        self.dimensions
    }

    /// Binds coordinates to the board, if they lie on it.
    #[must_use]
    pub fn bind(&self, position: Position) -> Option<Position> {
        Position::bounded(self.dimensions, position.row(), position.column())
    }

    /// Cell at the provided position.
    #[must_use]
    pub fn field(&self, position: Position) -> Option<&Field> {
        let index = self.dimensions.index(position)?;
        self.fields.get(index)
    }

    fn field_mut(&mut self, position: Position) -> Option<&mut Field> {
        let index = self.dimensions.index(position)?;
        self.fields.get_mut(index)
    }

    /// Forest at the provided position, if that cell is one.
    #[must_use]
    pub fn forest(&self, position: Position) -> Option<&Forest> {
        self.field(position).and_then(Field::as_forest)
    }

    pub(crate) fn forest_mut(&mut self, position: Position) -> Option<&mut Forest> {
        self.field_mut(position).and_then(Field::as_forest_mut)
    }

    /// Cell the engine currently stands on.
    #[must_use]
    pub fn position_of(&self, engine: EngineId) -> Option<Position> {
        self.engine_positions.get(&engine).copied()
    }

    /// Home base of the provided player.
    #[must_use]
    pub fn fire_station(&self, player: PlayerId) -> Option<Position> {
        self.fire_stations.get(&player).copied()
    }

    /// Puts the engine on the forest at `position`.
    ///
    /// # Panics
    ///
    /// Panics if the target cell is not a forest or the engine is already
    /// deployed.
    pub fn place_engine(&mut self, engine: EngineId, position: Position) {
        let Some(position) = self.bind(position) else {
            panic!("cannot place {engine} outside the board at {position}");
        };
        if let Some(deployed) = self.position_of(engine) {
            panic!("{engine} is already deployed at {deployed}");
        }
        let Some(forest) = self.forest_mut(position) else {
            panic!("cannot place {engine} on non-forest cell {position}");
        };
        forest.add_engine(engine);
        let _ = self.engine_positions.insert(engine, position);
    }

    /// Takes the engine off the board; does nothing if it is not deployed.
    pub fn remove_engine(&mut self, engine: EngineId) {
        let Some(position) = self.engine_positions.remove(&engine) else {
            return;
        };
        if let Some(forest) = self.forest_mut(position) {
            forest.remove_engine(engine);
        }
    }

    /// Reports whether the engine reaches `destination` in exactly `steps` hops.
    ///
    /// Hops are orthogonal, never revisit a cell and only cross forests that
    /// are not burning strongly. The destination must differ from the origin
    /// and must not burn at all.
    #[must_use]
    pub fn can_reach(&self, engine: EngineId, destination: Position, steps: u32) -> bool {
        let Some(origin) = self.position_of(engine) else {
            return false;
        };
        let Some(destination) = self.bind(destination) else {
            return false;
        };
        if origin == destination {
            return false;
        }
        if !self
            .forest(destination)
            .is_some_and(|forest| !forest.is_burning())
        {
            return false;
        }

        let mut path = vec![origin];
        self.path_exists(&mut path, destination, steps)
    }

    fn path_exists(&self, path: &mut Vec<Position>, destination: Position, steps: u32) -> bool {
        let Some(&from) = path.last() else {
            return false;
        };
        if steps == 0 {
            return from == destination;
        }

        for next in from.adjacents(false) {
            if path.contains(&next) || !self.is_passable(next) {
                continue;
            }
            path.push(next);
            let found = self.path_exists(path, destination, steps - 1);
            let _ = path.pop();
            if found {
                return true;
            }
        }
        false
    }

    fn is_passable(&self, position: Position) -> bool {
        self.forest(position)
            .is_some_and(|forest| forest.state() != ForestState::StrongBurn)
    }

    /// Enumerates the cells of one variant together with their positions.
    pub fn fields_of_kind(&self, kind: FieldKind) -> impl Iterator<Item = (Position, &Field)> + '_ {
        self.dimensions
            .positions()
            .zip(&self.fields)
            .filter(move |(_, field)| field.kind() == kind)
    }

    /// Enumerates every forest together with its position.
    pub fn forests(&self) -> impl Iterator<Item = (Position, &Forest)> + '_ {
        self.fields_of_kind(FieldKind::Forest)
            .filter_map(|(position, field)| field.as_forest().map(|forest| (position, forest)))
    }

    /// Deployed engines together with their positions, ordered by identifier.
    pub fn engines(&self) -> impl Iterator<Item = (EngineId, Position)> + '_ {
        self.engine_positions
            .iter()
            .map(|(engine, position)| (*engine, *position))
    }
}
