use crate::db::indices::{FluidId, MixerId, PinId};
use crate::error::{ChipError, ChipResult};
use crate::geom::point::Point;
use crate::geom::range::Range;
use crate::geom::rect::Rect;
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Actuation {
    On,
    Off,
    DontCare,
}

impl Actuation {
    pub fn from_char(c: char) -> Self {
        match c {
            '1' => Actuation::On,
            '0' => Actuation::Off,
            _ => Actuation::DontCare,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Actuation::On => '1',
            Actuation::Off => '0',
            Actuation::DontCare => 'X',
        }
    }
}

/// Per-step electrode states. Entry `i` belongs to time step `i + 1`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ActuationVector {
    vec: Vec<Actuation>,
}

impl ActuationVector {
    pub fn len(&self) -> usize {
        self.vec.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vec.is_empty()
    }

    pub fn get(&self, index: usize) -> ChipResult<Actuation> {
        self.vec
            .get(index)
            .copied()
            .ok_or(ChipError::ActuationIndexOutOfRange {
                index,
                len: self.vec.len(),
            })
    }

    /// State at 1-based time step `t`.
    pub fn at_step(&self, t: u32) -> ChipResult<Actuation> {
        if t == 0 {
            return Err(ChipError::TimeStepZero);
        }
        self.get(t as usize - 1)
    }

    pub fn iter(&self) -> impl Iterator<Item = Actuation> + '_ {
        self.vec.iter().copied()
    }
}

impl From<&str> for ActuationVector {
    fn from(s: &str) -> Self {
        Self {
            vec: s.chars().map(Actuation::from_char).collect(),
        }
    }
}

impl fmt::Display for ActuationVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s: String = self.vec.iter().map(|a| a.as_char()).collect();
        f.write_str(&s)
    }
}

/// A group of cells wired to the same control signal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Pin {
    pub id: PinId,
    pub cells: Vec<Point>,
}

impl Pin {
    pub fn new(id: PinId) -> Self {
        Self {
            id,
            cells: Vec::new(),
        }
    }

    pub fn with_cell(id: PinId, cell: Point) -> Self {
        Self {
            id,
            cells: vec![cell],
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Mixer {
    pub id: MixerId,
    pub position: Rect,
    pub timing: Range,
}

impl fmt::Display for Mixer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Mixer {}: {} {}", self.id, self.timing, self.position)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Detector {
    pub position: Rect,
    pub completion_time: u32,
    pub fluid_type: FluidId,
}

impl Detector {
    pub fn at(position: Point, completion_time: u32, fluid_type: FluidId) -> Self {
        Self {
            position: Rect::from_point(position),
            completion_time,
            fluid_type,
        }
    }
}
