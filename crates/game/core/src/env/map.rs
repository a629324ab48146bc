use crate::state::Position;

/// Static map oracle exposing immutable room geometry.
///
/// Tile *occupancy* is not part of this oracle: which tiles are covered by a
/// creature is a pure function of the roster, so the map surface stays
/// read-only and the pipeline never needs to lock it.
pub trait MapOracle: Send + Sync {
    fn dimensions(&self) -> MapDimensions;

    fn tile(&self, position: Position) -> Option<StaticTile>;

    /// Light level of `position` as perceived from `viewer`.
    ///
    /// Defaults to fully lit for maps without a lighting model.
    fn light_level(&self, _position: Position, _viewer: Position) -> LightLevel {
        LightLevel::Lit
    }

    fn contains(&self, position: Position) -> bool {
        self.dimensions().contains(position)
    }

    /// Terrain height of a tile; missing tiles are treated as ground level
    /// so off-map creatures resolve to neutral elevation bonuses.
    fn height(&self, position: Position) -> i32 {
        self.tile(position).map(|tile| tile.height()).unwrap_or(0)
    }

    /// True if the tile exists and can be stood on.
    fn is_open(&self, position: Position) -> bool {
        self.tile(position)
            .map(|tile| tile.is_passable())
            .unwrap_or(false)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MapDimensions {
    pub width: u32,
    pub height: u32,
}

impl MapDimensions {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn contains(&self, position: Position) -> bool {
        position.x >= 0
            && position.y >= 0
            && position.x < self.width as i32
            && position.y < self.height as i32
    }
}

/// Immutable descriptor for a tile in the static layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StaticTile {
    terrain: TerrainKind,
    height: i32,
}

impl StaticTile {
    /// Creates a ground-level tile with the given terrain.
    pub const fn new(terrain: TerrainKind) -> Self {
        Self { terrain, height: 0 }
    }

    /// Creates a tile at an explicit terrain height.
    pub const fn with_height(terrain: TerrainKind, height: i32) -> Self {
        Self { terrain, height }
    }

    pub fn terrain(self) -> TerrainKind {
        self.terrain
    }

    pub fn height(self) -> i32 {
        self.height
    }

    pub fn is_passable(self) -> bool {
        self.terrain.is_passable()
    }
}

/// Canonical terrain classes for static map tiles.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TerrainKind {
    Floor,
    Wall,
    Void,
    Water,
}

impl TerrainKind {
    pub fn is_passable(self) -> bool {
        matches!(self, TerrainKind::Floor)
    }
}

/// Perceived illumination of a tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LightLevel {
    Dark,
    Dim,
    Lit,
}

/// Uniform rectangular room used by tests and simple scenarios: every tile
/// is open floor at ground level, fully lit.
#[derive(Clone, Copy, Debug)]
pub struct OpenRoom {
    dimensions: MapDimensions,
}

impl OpenRoom {
    pub const fn new(width: u32, height: u32) -> Self {
        Self {
            dimensions: MapDimensions::new(width, height),
        }
    }
}

impl MapOracle for OpenRoom {
    fn dimensions(&self) -> MapDimensions {
        self.dimensions
    }

    fn tile(&self, position: Position) -> Option<StaticTile> {
        self.dimensions
            .contains(position)
            .then_some(StaticTile::new(TerrainKind::Floor))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dimensions_reject_out_of_bounds() {
        let dims = MapDimensions::new(4, 3);
        assert!(dims.contains(Position::new(0, 0)));
        assert!(dims.contains(Position::new(3, 2)));
        assert!(!dims.contains(Position::new(4, 0)));
        assert!(!dims.contains(Position::new(0, -1)));
    }

    #[test]
    fn open_room_is_passable_everywhere_inside() {
        let room = OpenRoom::new(5, 5);
        assert!(room.is_open(Position::new(2, 2)));
        assert!(!room.is_open(Position::new(9, 9)));
        assert_eq!(room.height(Position::new(2, 2)), 0);
    }

    #[test]
    fn light_levels_order_dark_below_lit() {
        assert!(LightLevel::Dark < LightLevel::Lit);
        assert!(LightLevel::Dim < LightLevel::Lit);
    }
}
