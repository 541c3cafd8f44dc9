//! Validated initial layouts that games are built from.

use std::collections::BTreeSet;

use fire_breaker_core::{Dimensions, ForestState, PlayerId, Position};

const DRILL_DIMENSIONS: Dimensions = match Dimensions::new(5, 5) {
    Some(dimensions) => dimensions,
    None => panic!("drill dimensions must be positive"),
};

/// Content of a single cell in an initial layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tile {
    /// Forest in the provided state.
    Forest(ForestState),
    /// Dry forest holding the first engine of the player.
    Engine(PlayerId),
    /// Water source.
    Pond,
    /// Home base of the player.
    FireStation(PlayerId),
}

/// Row-major initial layout of a board.
///
/// Placement rules are checked by whoever produces the layout; games built
/// from it trust it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Layout {
    dimensions: Dimensions,
    tiles: Vec<Tile>,
}

impl Layout {
    /// Creates a layout from row-major tiles.
    ///
    /// # Panics
    ///
    /// Panics if the tiles do not cover the dimensions exactly.
    #[must_use]
    pub fn new(dimensions: Dimensions, tiles: Vec<Tile>) -> Self {
        assert_eq!(
            tiles.len(),
            dimensions.area(),
            "layout tiles must cover every cell"
        );
        Self { dimensions, tiles }
    }

    /// Five by five board with four crews around a central fire.
    ///
    /// ```text
    /// A d L d D
    /// d A + D d
    /// L w * d L
    /// d C d B d
    /// C d L w B
    /// ```
    ///
    /// Stations sit in the corners, ponds at the edge midpoints and each crew
    /// starts diagonally inside its station.
    #[must_use]
    pub fn standard_drill() -> Self {
        let [a, b, c, d] = ['A', 'B', 'C', 'D'].map(PlayerId::new);
        let dry = Tile::Forest(ForestState::Dry);
        let wet = Tile::Forest(ForestState::Wet);
        let light = Tile::Forest(ForestState::LightBurn);
        let strong = Tile::Forest(ForestState::StrongBurn);
        let station = Tile::FireStation;
        let engine = Tile::Engine;
        let pond = Tile::Pond;

        #[rustfmt::skip]
        let tiles = vec![
            station(a), dry, pond, dry, station(d),
            dry, engine(a), light, engine(d), dry,
            pond, wet, strong, dry, pond,
            dry, engine(c), dry, engine(b), dry,
            station(c), dry, pond, wet, station(b),
        ];
        Self::new(DRILL_DIMENSIONS, tiles)
    }

    /// Extent of the board.
    #[must_use]
    pub const fn dimensions(&self) -> Dimensions {
        self.dimensions
    }

    /// Tiles in row-major order.
    #[must_use]
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// Tile at the provided position.
    #[must_use]
    pub fn tile(&self, position: Position) -> Option<Tile> {
        let index = self.dimensions.index(position)?;
        self.tiles.get(index).copied()
    }

    /// Tiles paired with their bounded positions.
    pub fn cells(&self) -> impl Iterator<Item = (Position, Tile)> + '_ {
        self.dimensions.positions().zip(self.tiles.iter().copied())
    }

    /// Players owning a fire station, in label order.
    #[must_use]
    pub fn players(&self) -> Vec<PlayerId> {
        self.tiles
            .iter()
            .filter_map(|tile| match tile {
                Tile::FireStation(owner) => Some(*owner),
                _ => None,
            })
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}
