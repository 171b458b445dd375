use crate::db::indices::DropletId;
use crate::geom::point::Point;
use std::collections::{BTreeSet, HashSet};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Two droplets of different nets came within one cell of each other.
///
/// Equality ignores which droplet is named first.
#[derive(Clone, Copy, Debug)]
pub struct FluidicConstraintViolation {
    pub d1: DropletId,
    pub f1: Point,
    pub d2: DropletId,
    pub f2: Point,
    pub timestep: u32,
}

impl FluidicConstraintViolation {
    pub fn new(d1: DropletId, f1: Point, d2: DropletId, f2: Point, timestep: u32) -> Self {
        Self {
            d1,
            f1,
            d2,
            f2,
            timestep,
        }
    }

    fn canonical(&self) -> (u32, (DropletId, Point), (DropletId, Point)) {
        let a = (self.d1, self.f1);
        let b = (self.d2, self.f2);
        if a <= b {
            (self.timestep, a, b)
        } else {
            (self.timestep, b, a)
        }
    }

    pub fn contains_field(&self, p: Point) -> bool {
        self.f1 == p || self.f2 == p
    }
}

impl PartialEq for FluidicConstraintViolation {
    fn eq(&self, other: &Self) -> bool {
        self.canonical() == other.canonical()
    }
}

impl Eq for FluidicConstraintViolation {}

impl Hash for FluidicConstraintViolation {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.canonical().hash(state);
    }
}

impl fmt::Display for FluidicConstraintViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "At timestep {} droplet {} is too close to droplet {} : {} <-> {}",
            self.timestep, self.d1, self.d2, self.f1, self.f2
        )
    }
}

/// Result of one adjacency scan: the violations and every cell they touch.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AdjacencyReport {
    violations: Vec<FluidicConstraintViolation>,
    fields: BTreeSet<Point>,
}

impl AdjacencyReport {
    pub fn from_violations(set: HashSet<FluidicConstraintViolation>) -> Self {
        let mut violations: Vec<_> = set.into_iter().collect();
        violations.sort_by_key(|v| v.canonical());
        let fields = violations.iter().flat_map(|v| [v.f1, v.f2]).collect();
        Self { violations, fields }
    }

    pub fn violations(&self) -> &[FluidicConstraintViolation] {
        &self.violations
    }

    /// Cells implicated in at least one violation.
    pub fn fields(&self) -> &BTreeSet<Point> {
        &self.fields
    }

    pub fn contains_field(&self, p: Point) -> bool {
        self.fields.contains(&p)
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn len(&self) -> usize {
        self.violations.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symmetric_equality() {
        let a = FluidicConstraintViolation::new(
            DropletId(1),
            Point::new(0, 0),
            DropletId(2),
            Point::new(1, 0),
            4,
        );
        let b = FluidicConstraintViolation::new(
            DropletId(2),
            Point::new(1, 0),
            DropletId(1),
            Point::new(0, 0),
            4,
        );
        assert_eq!(a, b);
        let report = AdjacencyReport::from_violations([a, b].into_iter().collect());
        assert_eq!(report.len(), 1);
        assert!(report.contains_field(Point::new(1, 0)));
        assert_eq!(
            a.to_string(),
            "At timestep 4 droplet 1 is too close to droplet 2 : (0,0) <-> (1,0)"
        );
    }
}
