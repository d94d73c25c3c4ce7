//! Walls, bounds and line of sight

use mspell_core::MAX_RANGE;
use mspell_core::geom::Point;

#[derive(Debug, Clone)]
pub struct Grid {
    width: i32,
    height: i32,
    walls: Vec<bool>,
}

impl Grid {
    /// An open room whose outer edge is wall
    pub fn new(width: i32, height: i32) -> Self {
        let width = width.max(3);
        let height = height.max(3);
        let mut grid = Self {
            width,
            height,
            walls: vec![false; (width * height) as usize],
        };
        for x in 0..width {
            grid.set_wall(Point::new(x, 0), true);
            grid.set_wall(Point::new(x, height - 1), true);
        }
        for y in 0..height {
            grid.set_wall(Point::new(0, y), true);
            grid.set_wall(Point::new(width - 1, y), true);
        }
        grid
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn in_bounds(&self, p: Point) -> bool {
        p.x >= 0 && p.y >= 0 && p.x < self.width && p.y < self.height
    }

    fn index(&self, p: Point) -> Option<usize> {
        self.in_bounds(p).then(|| (p.y * self.width + p.x) as usize)
    }

    pub fn set_wall(&mut self, p: Point, wall: bool) {
        if let Some(i) = self.index(p) {
            self.walls[i] = wall;
        }
    }

    /// Out of bounds counts as wall
    pub fn is_wall(&self, p: Point) -> bool {
        self.index(p).is_none_or(|i| self.walls[i])
    }

    pub fn is_floor(&self, p: Point) -> bool {
        !self.is_wall(p)
    }

    /// Grids from `from` (exclusive) to `to` (inclusive), Bresenham style
    pub fn path(&self, from: Point, to: Point) -> Vec<Point> {
        let mut out = Vec::new();
        let (mut x, mut y) = (from.x, from.y);
        let dx = (to.x - x).abs();
        let dy = -(to.y - y).abs();
        let sx = if x < to.x { 1 } else { -1 };
        let sy = if y < to.y { 1 } else { -1 };
        let mut err = dx + dy;
        while (x, y) != (to.x, to.y) {
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
            out.push(Point::new(x, y));
        }
        out
    }

    /// A projection from `from` reaches `to`: in range, and no wall before
    /// the last grid.
    pub fn projectable(&self, from: Point, to: Point) -> bool {
        if from.distance(to) > MAX_RANGE {
            return false;
        }
        let path = self.path(from, to);
        let Some((_, before)) = path.split_last() else {
            return true;
        };
        before.iter().all(|&p| self.is_floor(p))
    }

    /// Like [`Grid::projectable`] but the target grid must be open too
    pub fn line_of_fire(&self, from: Point, to: Point) -> bool {
        self.projectable(from, to) && self.is_floor(to)
    }

    pub fn floor_points(&self) -> impl Iterator<Item = Point> + '_ {
        (0..self.height)
            .flat_map(move |y| (0..self.width).map(move |x| Point::new(x, y)))
            .filter(|&p| self.is_floor(p))
    }
}
