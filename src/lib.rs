//! Koi genetics - Heritable pattern and body genomes for simulated koi.
//!
//! Each fish carries a compact genome: up to three pattern layers (spots,
//! stripes, ridge) and a handful of body traits. Genomes are bred from two
//! parents with curve-shaped crossover and rare mutations, drive a kinematic
//! spring-chain body, and serialize to bytes or to a scannable radial code.
//!
//! # Architecture
//!
//! The crate is split into three modules:
//!
//! - `schema`: Genome types, blueprints and configuration
//! - `compute`: Trait curves, breeding, body simulation and populations
//! - `codec`: Byte serialization and the visual code
//!
//! # Example
//!
//! ```rust,no_run
//! use koi_genetics::{
//!     codec,
//!     compute::{Breeder, GenomeRng},
//!     schema::{Blueprint, BreedingConfig},
//! };
//!
//! let blueprints = Blueprint::defaults();
//! let mut rng = GenomeRng::new(7);
//!
//! let mother = blueprints[0].spawn(&mut rng);
//! let father = blueprints[1].spawn(&mut rng);
//!
//! let litter = Breeder::new(&mother, &father).breed(&BreedingConfig::default(), &mut rng, |_| {});
//!
//! let image = codec::encode(&litter.offspring[0]).unwrap();
//! assert_eq!(codec::decode(&image).as_ref(), litter.offspring.first());
//! ```

pub mod codec;
pub mod compute;
pub mod schema;

// Re-export commonly used types
pub use codec::{ByteBuffer, CodeError, FormatError, decode, encode};
pub use compute::{Body, Breeder, Fish, FrameClock, GenomeRng, Litter, School, TraitCurve};
pub use schema::{Blueprint, BodyTraits, Genome, KoiConfig, PatternLayer};
