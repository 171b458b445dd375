use std::fmt;
use std::ops::{Add, Sub};

/// A cell address on the electrode grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const NORTH: Point = Point::new(0, 1);
    pub const EAST: Point = Point::new(1, 0);
    pub const SOUTH: Point = Point::new(0, -1);
    pub const WEST: Point = Point::new(-1, 0);

    pub const DIRECTIONS: [Point; 4] = [Self::NORTH, Self::EAST, Self::SOUTH, Self::WEST];

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Offset that leads from `from` to `to`.
    pub fn direction(from: Point, to: Point) -> Point {
        to - from
    }

    /// A droplet can move from `p1` to `p2` within a single time step: it
    /// either stays or moves one cell along a cardinal direction.
    pub fn reachable(p1: Point, p2: Point) -> bool {
        if p1 == p2 {
            return true;
        }
        Self::DIRECTIONS.iter().any(|&d| p1 + d == p2)
    }

    /// 8-connected neighbourhood test, including identical cells. Missing
    /// positions are never adjacent.
    pub fn adjacent(p1: Option<Point>, p2: Option<Point>) -> bool {
        match (p1, p2) {
            (Some(a), Some(b)) => (a.x - b.x).abs() <= 1 && (a.y - b.y).abs() <= 1,
            _ => false,
        }
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.x, self.y)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    pub fn offset(self) -> Point {
        match self {
            Direction::North => Point::NORTH,
            Direction::East => Point::EAST,
            Direction::South => Point::SOUTH,
            Direction::West => Point::WEST,
        }
    }

    /// Accepts both compass (`N`) and screen (`U`) spellings.
    pub fn from_token(token: &str) -> Option<Direction> {
        match token {
            "N" | "U" => Some(Direction::North),
            "E" | "R" => Some(Direction::East),
            "S" | "D" => Some(Direction::South),
            "W" | "L" => Some(Direction::West),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn reachable_cardinal_and_stay() {
        let p = Point::new(3, 3);
        assert!(Point::reachable(p, p));
        for d in Point::DIRECTIONS {
            assert!(Point::reachable(p, p + d));
        }
        assert!(!Point::reachable(p, Point::new(4, 4)));
        assert!(!Point::reachable(p, Point::new(3, 5)));
    }

    #[test]
    fn adjacent_handles_missing() {
        assert!(!Point::adjacent(None, Some(Point::new(0, 0))));
        assert!(!Point::adjacent(Some(Point::new(0, 0)), None));
        assert!(Point::adjacent(Some(Point::new(0, 0)), Some(Point::new(1, 1))));
        assert!(!Point::adjacent(Some(Point::new(0, 0)), Some(Point::new(2, 0))));
    }

    #[test]
    fn diagonal_is_adjacent_but_not_reachable() {
        let a = Point::new(0, 0);
        let b = Point::new(1, -1);
        assert!(Point::adjacent(Some(a), Some(b)));
        assert!(!Point::reachable(a, b));
    }

    #[test]
    fn direction_tokens() {
        assert_eq!(Direction::from_token("U"), Some(Direction::North));
        assert_eq!(Direction::from_token("W"), Some(Direction::West));
        assert_eq!(Direction::from_token("Q"), None);
        assert_eq!(Direction::South.offset(), Point::new(0, -1));
    }

    proptest! {
        #[test]
        fn reachable_implies_adjacent(
            ax in -20i32..20, ay in -20i32..20,
            bx in -20i32..20, by in -20i32..20,
        ) {
            let a = Point::new(ax, ay);
            let b = Point::new(bx, by);
            if Point::reachable(a, b) {
                prop_assert!(Point::adjacent(Some(a), Some(b)));
            }
        }
    }
}
