use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display, EnumIter,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Direction {
    East,
    SouthEast,
    SouthWest,
    West,
    NorthWest,
    NorthEast,
}

impl Direction {
    pub const fn unit(self) -> CubeCoord {
        match self {
            Direction::NorthEast => CubeCoord::new(1, 0, -1),
            Direction::SouthWest => CubeCoord::new(-1, 0, 1),
            Direction::NorthWest => CubeCoord::new(0, 1, -1),
            Direction::SouthEast => CubeCoord::new(0, -1, 1),
            Direction::East => CubeCoord::new(1, -1, 0),
            Direction::West => CubeCoord::new(-1, 1, 0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CubeCoord {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl CubeCoord {
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    pub const fn add(self, other: CubeCoord) -> Self {
        CubeCoord::new(self.x + other.x, self.y + other.y, self.z + other.z)
    }

    pub const fn neighbor(self, direction: Direction) -> Self {
        self.add(direction.unit())
    }
}

impl Default for CubeCoord {
    fn default() -> Self {
        CubeCoord::new(0, 0, 0)
    }
}
