use crate::db::droplet::Droplet;
use crate::db::indices::DropletId;
use crate::error::{ChipError, ChipResult};
use crate::geom::point::Point;
use crate::geom::rect::Rect;

/// Where and when a droplet of a net enters the chip.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Source {
    pub droplet_id: DropletId,
    pub start_position: Point,
    pub spawn_time: u32,
}

impl Source {
    pub fn new(droplet_id: DropletId, start_position: Point) -> Self {
        Self::spawned_at(droplet_id, start_position, 1)
    }

    pub fn spawned_at(droplet_id: DropletId, start_position: Point, spawn_time: u32) -> Self {
        Self {
            droplet_id,
            start_position,
            spawn_time,
        }
    }
}

/// Droplets heading for a common target. Members may come arbitrarily close
/// to each other without violating the fluidic constraints.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Net {
    target: Point,
    sources: Vec<Source>,
}

impl Net {
    pub fn new(sources: Vec<Source>, target: Point) -> ChipResult<Self> {
        if sources.is_empty() {
            return Err(ChipError::EmptyNet);
        }
        Ok(Self { target, sources })
    }

    pub fn target(&self) -> Point {
        self.target
    }

    pub fn sources(&self) -> &[Source] {
        &self.sources
    }

    pub fn contains_droplet_id(&self, id: DropletId) -> bool {
        self.sources.iter().any(|s| s.droplet_id == id)
    }

    pub fn contains_droplet(&self, d: &Droplet) -> bool {
        self.contains_droplet_id(d.id)
    }

    /// Smallest rectangle covering all sources and the target.
    pub fn bounding_box(&self) -> Rect {
        self.sources
            .iter()
            .fold(Rect::from_point(self.target), |acc, s| {
                Rect::new(
                    Point::new(
                        acc.min.x.min(s.start_position.x),
                        acc.min.y.min(s.start_position.y),
                    ),
                    Point::new(
                        acc.max.x.max(s.start_position.x),
                        acc.max.y.max(s.start_position.y),
                    ),
                )
            })
    }

    pub fn contains_point(&self, p: Point) -> bool {
        self.bounding_box().contains(p)
    }
}
