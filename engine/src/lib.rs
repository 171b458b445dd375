pub mod actuation;
pub mod adjacency;
pub mod builder;
pub mod usage;

pub use actuation::is_actuated;
pub use adjacency::adjacent_activations;
pub use builder::build;
