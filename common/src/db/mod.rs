pub mod core;
pub mod description;
pub mod droplet;
pub mod field;
pub mod indices;
pub mod net;
pub mod resources;
pub mod violation;
