//! Breeding: crossover, mutation and litter production.
//!
//! This module provides:
//! - Per-trait sigmoid crossover of two parents ([`Mixer`])
//! - Byte and plane mutation with event reporting ([`Mutator`])
//! - Litter production with optional forced mutation ([`Breeder`])
//! - A genetic distance measure for comparing individuals

mod breeder;
mod distance;
mod mixer;
mod mutator;

pub use breeder::*;
pub use distance::*;
pub use mixer::*;
pub use mutator::*;
