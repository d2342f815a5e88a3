//! Schema module - Genome, blueprint and configuration types.

mod blueprint;
mod config;
mod genome;
mod layer;
mod units;

pub use blueprint::*;
pub use config::*;
pub use genome::*;
pub use layer::*;
pub use units::*;
