//! Grid positions and distance

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

/// The eight neighbor offsets, orthogonal first
pub const NEIGHBORS: [(i32, i32); 8] = [
    (0, 1),
    (0, -1),
    (1, 0),
    (-1, 0),
    (1, 1),
    (-1, 1),
    (1, -1),
    (-1, -1),
];

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    pub fn neighbors(self) -> impl Iterator<Item = Point> {
        NEIGHBORS.iter().map(move |&(dx, dy)| self.offset(dx, dy))
    }

    pub fn distance(self, other: Point) -> i32 {
        distance(self, other)
    }
}

/// Approximate Euclidean distance: the long axis plus half the short one.
pub fn distance(a: Point, b: Point) -> i32 {
    let dy = (a.y - b.y).abs();
    let dx = (a.x - b.x).abs();
    if dy > dx { dy + (dx >> 1) } else { dx + (dy >> 1) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance() {
        let o = Point::new(0, 0);
        assert_eq!(distance(o, o), 0);
        assert_eq!(distance(o, Point::new(5, 0)), 5);
        assert_eq!(distance(o, Point::new(0, -7)), 7);
        assert_eq!(distance(o, Point::new(4, 2)), 5);
        assert_eq!(distance(o, Point::new(1, 1)), 1);
    }

    #[test]
    fn test_neighbors() {
        let p = Point::new(3, 3);
        let all: Vec<_> = p.neighbors().collect();
        assert_eq!(all.len(), 8);
        assert!(all.iter().all(|n| distance(p, *n) == 1));
    }
}
