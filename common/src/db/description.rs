use crate::db::droplet::Droplet;
use crate::db::indices::{DropletId, FluidId, PinId};
use crate::db::net::Net;
use crate::db::resources::{ActuationVector, Detector, Mixer};
use crate::geom::point::{Direction, Point};
use crate::geom::range::Range;
use crate::geom::rect::Rect;
use std::collections::HashMap;

/// An input/output port at the chip border. `grid_position` is the chip
/// cell droplets enter from or leave to; the port itself sits one step
/// further along `direction`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExternalPort {
    pub grid_position: Point,
    pub direction: Direction,
}

impl ExternalPort {
    pub fn new(grid_position: Point, direction: Direction) -> Self {
        Self {
            grid_position,
            direction,
        }
    }

    pub fn port_position(&self) -> Point {
        self.grid_position + self.direction.offset()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DispenserDef {
    pub fluid: FluidId,
    pub port: ExternalPort,
}

/// Everything a chip file declares, as handed over by the parser before
/// the chip is assembled.
#[derive(Clone, Debug, Default)]
pub struct ChipDescription {
    pub grids: Vec<Rect>,
    pub droplets: Vec<Droplet>,
    pub nets: Vec<Net>,
    pub sinks: Vec<ExternalPort>,
    pub dispensers: Vec<DispenserDef>,
    pub blockages: Vec<(Rect, Range)>,
    pub detectors: Vec<Detector>,
    pub pin_assignments: Vec<(Point, PinId)>,
    pub pin_actuations: HashMap<PinId, ActuationVector>,
    pub cell_actuations: HashMap<Point, ActuationVector>,
    pub mixers: Vec<Mixer>,
    pub fluid_types: HashMap<FluidId, String>,
    pub droplet_fluids: HashMap<DropletId, FluidId>,
    pub annotations: Vec<String>,
    /// Problems the parser already reported inline.
    pub parse_errors: Vec<String>,
}

impl ChipDescription {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_grid(grid: Rect) -> Self {
        Self {
            grids: vec![grid],
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn port_sits_outside_its_cell() {
        let port = ExternalPort::new(Point::new(0, 3), Direction::West);
        assert_eq!(port.port_position(), Point::new(-1, 3));
    }
}
