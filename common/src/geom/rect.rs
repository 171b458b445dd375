use super::point::Point;
use std::fmt;

/// Axis-aligned block of cells, both corners inclusive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rect {
    pub min: Point,
    pub max: Point,
}

impl Rect {
    pub fn new(p1: Point, p2: Point) -> Self {
        Self {
            min: Point::new(p1.x.min(p2.x), p1.y.min(p2.y)),
            max: Point::new(p1.x.max(p2.x), p1.y.max(p2.y)),
        }
    }

    pub fn from_point(p: Point) -> Self {
        Self { min: p, max: p }
    }

    pub fn width(&self) -> i32 {
        self.max.x - self.min.x + 1
    }
    pub fn height(&self) -> i32 {
        self.max.y - self.min.y + 1
    }

    pub fn size(&self) -> Point {
        Point::new(self.width(), self.height())
    }

    pub fn is_point(&self) -> bool {
        self.min == self.max
    }

    pub fn center(&self) -> Point {
        Point::new((self.min.x + self.max.x) / 2, (self.min.y + self.max.y) / 2)
    }

    pub fn overlaps(&self, other: &Rect) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    /// Grows the rectangle by `size` cells on every side.
    pub fn extend(&self, size: i32) -> Rect {
        Rect::new(
            Point::new(self.min.x - size, self.min.y - size),
            Point::new(self.max.x + size, self.max.y + size),
        )
    }

    /// Every cell inside, row-major from `min`.
    pub fn positions(&self) -> Vec<Point> {
        let mut out = Vec::with_capacity((self.width() * self.height()).max(0) as usize);
        for y in self.min.y..=self.max.y {
            for x in self.min.x..=self.max.x {
                out.push(Point::new(x, y));
            }
        }
        out
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_point() {
            write!(f, "{}", self.min)
        } else {
            write!(f, "[{} {}]", self.min, self.max)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corners_are_normalized() {
        let r = Rect::new(Point::new(3, 0), Point::new(1, 2));
        assert_eq!(r.min, Point::new(1, 0));
        assert_eq!(r.max, Point::new(3, 2));
        assert_eq!(r.size(), Point::new(3, 3));
    }

    #[test]
    fn positions_inclusive() {
        let r = Rect::new(Point::new(0, 0), Point::new(1, 2));
        let ps = r.positions();
        assert_eq!(ps.len(), 6);
        assert!(ps.contains(&Point::new(1, 2)));
        assert!(ps.iter().all(|&p| r.contains(p)));
        assert_eq!(Rect::from_point(Point::new(4, 4)).positions(), vec![Point::new(4, 4)]);
    }

    #[test]
    fn overlap_touching_cells() {
        let a = Rect::new(Point::new(0, 0), Point::new(2, 2));
        let b = Rect::new(Point::new(2, 2), Point::new(3, 3));
        let c = Rect::new(Point::new(3, 0), Point::new(4, 1));
        assert!(a.overlaps(&b));
        assert!(!a.overlaps(&c));
        assert!(a.extend(1).overlaps(&c));
    }
}
