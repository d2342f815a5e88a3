//! Compute module - Trait curves, breeding and body simulation.

mod clock;
mod curve;
mod fish;
mod random;

pub mod body;
pub mod breeding;

pub use body::*;
pub use breeding::*;
pub use clock::*;
pub use curve::*;
pub use fish::*;
pub use random::*;
