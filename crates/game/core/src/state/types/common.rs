use std::fmt;

/// Unique identifier for a creature tracked in the roster.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CreatureId(pub u32);

impl fmt::Display for CreatureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Discrete grid position expressed in tile coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const ORIGIN: Self = Self { x: 0, y: 0 };

    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Chessboard distance: diagonal steps cost the same as orthogonal ones.
    pub fn distance(&self, other: Position) -> u32 {
        let dx = (self.x - other.x).unsigned_abs();
        let dy = (self.y - other.y).unsigned_abs();
        dx.max(dy)
    }

    pub fn offset(&self, dx: i32, dy: i32) -> Position {
        Position::new(self.x + dx, self.y + dy)
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::ORIGIN
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Eight-way facing, clockwise from north.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Facing {
    #[default]
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
}

impl Facing {
    pub const ALL: [Facing; 8] = [
        Facing::North,
        Facing::NorthEast,
        Facing::East,
        Facing::SouthEast,
        Facing::South,
        Facing::SouthWest,
        Facing::West,
        Facing::NorthWest,
    ];

    pub fn index(self) -> u8 {
        Self::ALL.iter().position(|&f| f == self).unwrap_or(0) as u8
    }

    pub fn from_index(index: u8) -> Facing {
        Self::ALL[(index % 8) as usize]
    }

    /// Unit tile step in this direction.
    pub fn delta(self) -> (i32, i32) {
        match self {
            Facing::North => (0, -1),
            Facing::NorthEast => (1, -1),
            Facing::East => (1, 0),
            Facing::SouthEast => (1, 1),
            Facing::South => (0, 1),
            Facing::SouthWest => (-1, 1),
            Facing::West => (-1, 0),
            Facing::NorthWest => (-1, -1),
        }
    }

    /// Facing that points from `from` towards `to`, by coordinate sign.
    /// Identical positions have no direction.
    pub fn towards(from: Position, to: Position) -> Option<Facing> {
        let dx = (to.x - from.x).signum();
        let dy = (to.y - from.y).signum();
        Self::ALL.into_iter().find(|f| f.delta() == (dx, dy))
    }

    pub fn opposite(self) -> Facing {
        self.rotated(4)
    }

    /// Rotates by 45-degree steps; positive is clockwise.
    pub fn rotated(self, steps: i8) -> Facing {
        let index = i16::from(self.index()) + i16::from(steps);
        Facing::from_index(index.rem_euclid(8) as u8)
    }
}

/// Allegiance used for friend/foe determination.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Faction {
    /// Player-aligned heroes.
    Heroes,
    /// Dungeon denizens.
    #[default]
    Monsters,
    /// Hostile to nobody; bystanders and scenery creatures.
    Neutral,
}

impl Faction {
    /// Neutral creatures fight nobody; everyone else fights the other side.
    pub fn is_hostile_to(self, other: Faction) -> bool {
        self != Faction::Neutral && other != Faction::Neutral && self != other
    }
}

/// Tile extent of a creature, anchored at its position (top-left tile).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Footprint {
    pub width: u8,
    pub height: u8,
}

impl Footprint {
    pub const SINGLE: Self = Self {
        width: 1,
        height: 1,
    };

    pub fn new(width: u8, height: u8) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
        }
    }

    /// Tiles covered when anchored at `origin`.
    pub fn tiles_at(&self, origin: Position) -> Vec<Position> {
        let mut tiles = Vec::with_capacity(usize::from(self.width) * usize::from(self.height));
        for dy in 0..i32::from(self.height) {
            for dx in 0..i32::from(self.width) {
                tiles.push(origin.offset(dx, dy));
            }
        }
        tiles
    }
}

impl Default for Footprint {
    fn default() -> Self {
        Self::SINGLE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chebyshev_distance_counts_diagonals_once() {
        let a = Position::new(0, 0);
        assert_eq!(a.distance(Position::new(3, 3)), 3);
        assert_eq!(a.distance(Position::new(0, 5)), 5);
        assert_eq!(a.distance(Position::new(-2, 1)), 2);
    }

    #[test]
    fn facing_rotation_wraps_both_ways() {
        assert_eq!(Facing::North.rotated(1), Facing::NorthEast);
        assert_eq!(Facing::North.rotated(-1), Facing::NorthWest);
        assert_eq!(Facing::West.rotated(4), Facing::East);
        assert_eq!(Facing::North.opposite(), Facing::South);
    }

    #[test]
    fn towards_uses_coordinate_signs() {
        let from = Position::new(2, 2);
        assert_eq!(Facing::towards(from, Position::new(2, 0)), Some(Facing::North));
        assert_eq!(
            Facing::towards(from, Position::new(5, 5)),
            Some(Facing::SouthEast)
        );
        assert_eq!(Facing::towards(from, from), None);
    }

    #[test]
    fn neutral_faction_is_never_hostile() {
        assert!(Faction::Heroes.is_hostile_to(Faction::Monsters));
        assert!(!Faction::Heroes.is_hostile_to(Faction::Heroes));
        assert!(!Faction::Neutral.is_hostile_to(Faction::Monsters));
        assert!(!Faction::Monsters.is_hostile_to(Faction::Neutral));
    }

    #[test]
    fn footprint_tiles_cover_the_rectangle() {
        let tiles = Footprint::new(2, 1).tiles_at(Position::new(4, 4));
        assert_eq!(tiles, vec![Position::new(4, 4), Position::new(5, 4)]);
    }
}
