use crate::db::indices::{DropletId, FluidId, MixerId, PinId};
use crate::db::resources::ActuationVector;
use crate::geom::point::{Direction, Point};
use crate::geom::range::Range;

/// What a cell is used for besides carrying droplets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum FieldRole {
    #[default]
    Plain,
    /// Droplets leave the chip towards `direction`.
    Sink { direction: Direction },
    /// Droplets of `fluid` enter the chip from `direction`.
    Dispenser { fluid: FluidId, direction: Direction },
}

/// Per-cell state. The chip keys every field by its own `pos`.
#[derive(Clone, Debug, Default)]
pub struct Field {
    pos: Point,
    pub role: FieldRole,
    pub blockage: Option<Range>,
    /// Index into `Chip::detectors`.
    pub detector: Option<usize>,
    pub pin: Option<PinId>,
    pub actuation: Option<ActuationVector>,
    pub usage: u32,
    pub source_ids: Vec<DropletId>,
    pub target_ids: Vec<DropletId>,
    pub mixers: Vec<MixerId>,
}

impl Field {
    pub fn new(pos: Point) -> Self {
        Self {
            pos,
            ..Default::default()
        }
    }

    pub fn sink(pos: Point, direction: Direction) -> Self {
        Self {
            pos,
            role: FieldRole::Sink { direction },
            ..Default::default()
        }
    }

    pub fn dispenser(pos: Point, fluid: FluidId, direction: Direction) -> Self {
        Self {
            pos,
            role: FieldRole::Dispenser { fluid, direction },
            ..Default::default()
        }
    }

    /// Fixed at construction; it is the field's key in the chip.
    pub fn pos(&self) -> Point {
        self.pos
    }

    pub fn is_sink(&self) -> bool {
        matches!(self.role, FieldRole::Sink { .. })
    }

    pub fn is_dispenser(&self) -> bool {
        matches!(self.role, FieldRole::Dispenser { .. })
    }

    pub fn attach_blockage(&mut self, blockage: Range) {
        self.blockage = Some(blockage);
    }

    pub fn is_potentially_blocked(&self) -> bool {
        self.blockage.is_some()
    }

    pub fn is_blocked(&self, t: u32) -> bool {
        self.blockage.is_some_and(|b| b.in_range(t))
    }

    pub fn has_resource(&self) -> bool {
        self.detector.is_some()
    }

    /// A cell vector that actually carries entries.
    pub fn cell_actuation(&self) -> Option<&ActuationVector> {
        self.actuation.as_ref().filter(|v| !v.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blockage_window() {
        let mut f = Field::new(Point::new(1, 1));
        assert!(!f.is_blocked(3));
        f.attach_blockage(Range::new(2, 4));
        assert!(f.is_potentially_blocked());
        assert!(!f.is_blocked(1));
        assert!(f.is_blocked(3));
        assert!(!f.is_blocked(5));
    }

    #[test]
    fn roles() {
        let s = Field::sink(Point::new(0, -1), Direction::South);
        assert!(s.is_sink() && !s.is_dispenser());
        let d = Field::dispenser(Point::new(-1, 0), FluidId(2), Direction::West);
        assert!(d.is_dispenser());
        assert_eq!(Field::new(Point::new(0, 0)).role, FieldRole::Plain);
    }

    #[test]
    fn empty_cell_vector_is_ignored() {
        let mut f = Field::new(Point::new(0, 0));
        f.actuation = Some(ActuationVector::from(""));
        assert!(f.cell_actuation().is_none());
        f.actuation = Some(ActuationVector::from("1"));
        assert!(f.cell_actuation().is_some());
    }
}
