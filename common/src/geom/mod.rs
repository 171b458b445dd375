pub mod point;
pub mod range;
pub mod rect;
