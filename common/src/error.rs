use crate::db::indices::DropletId;
use crate::geom::point::Point;
use thiserror::Error;

pub type ChipResult<T> = Result<T, ChipError>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ChipError {
    #[error("actuation index {index} out of range for vector of length {len}")]
    ActuationIndexOutOfRange { index: usize, len: usize },
    #[error("time steps start at 1; step 0 has no actuation entry")]
    TimeStepZero,
    #[error("no field at {0}")]
    NoFieldAt(Point),
    #[error("a net needs at least one source")]
    EmptyNet,
    #[error("droplet {droplet:?} already belongs to a net")]
    NetAlreadySet { droplet: DropletId },
    #[error("droplet {droplet:?} has no route")]
    EmptyRoute { droplet: DropletId },
}
