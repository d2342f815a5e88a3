//! Genome: the heritable record of one individual.
//!
//! # Wire format
//!
//! ```text
//! Layer count: u8 (1..=3)
//! Layers, in kind order, each:
//!   Kind: u8
//!   Palette index: u8 (< PALETTE_SIZE)
//!   Plane normal: 3 x f32
//!   Traits: u8 x 5 or 6, depending on kind
//! Body:
//!   Length, radius, growth speed, mating frequency, offspring count: u8 each
//!   Age: u16
//! ```

use serde::{Deserialize, Serialize};

use super::{LayerKind, PatternLayer};
use crate::codec::{ByteBuffer, FormatError};
use crate::compute::TraitCurve;

/// Litter size as a function of the offspring count trait.
pub const SAMPLER_OFFSPRING_COUNT: TraitCurve = TraitCurve::power(2.0, 7.0, 1.2);

/// Minimum number of updates between matings as a function of mating frequency.
pub const SAMPLER_MATING_FREQUENCY: TraitCurve = TraitCurve::power(100.0, 400.0, 0.3);

/// Body level traits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct BodyTraits {
    pub length: u8,
    pub radius: u8,
    pub growth_speed: u8,
    pub mating_frequency: u8,
    pub offspring_count: u8,
    /// Age in updates.
    pub age: u16,
}

impl BodyTraits {
    /// Serialized size in bytes.
    pub const SIZE: usize = 7;

    /// Number of offspring a mother with these traits produces.
    pub fn litter_size(&self) -> usize {
        SAMPLER_OFFSPRING_COUNT
            .sample(self.offspring_count as f32 / 255.0)
            .round() as usize
    }

    /// Minimum number of updates between matings.
    pub fn mate_timeout(&self) -> u32 {
        SAMPLER_MATING_FREQUENCY
            .sample(self.mating_frequency as f32 / 255.0)
            .round() as u32
    }

    /// The heritable byte traits, in serialization order. Age is not heritable.
    pub fn heritable(&self) -> [u8; 5] {
        [
            self.length,
            self.radius,
            self.growth_speed,
            self.mating_frequency,
            self.offspring_count,
        ]
    }

    /// Mutable heritable traits, in serialization order.
    pub fn heritable_mut(&mut self) -> [&mut u8; 5] {
        [
            &mut self.length,
            &mut self.radius,
            &mut self.growth_speed,
            &mut self.mating_frequency,
            &mut self.offspring_count,
        ]
    }

    pub fn serialize(&self, buffer: &mut ByteBuffer) {
        for value in self.heritable() {
            buffer.write_u8(value);
        }
        buffer.write_u16(self.age);
    }

    pub fn deserialize(buffer: &mut ByteBuffer) -> Result<Self, FormatError> {
        Ok(Self {
            length: buffer.read_u8()?,
            radius: buffer.read_u8()?,
            growth_speed: buffer.read_u8()?,
            mating_frequency: buffer.read_u8()?,
            offspring_count: buffer.read_u8()?,
            age: buffer.read_u16()?,
        })
    }
}

/// Pattern layers plus body traits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Genome {
    layers: Vec<PatternLayer>,
    pub body: BodyTraits,
}

impl Genome {
    /// Create a genome. Layers are put in kind order and only the first layer
    /// of each kind is kept.
    ///
    /// `layers` must not be empty: a genome without layers cannot be
    /// serialized back. Configured blueprints are checked for this and for
    /// duplicate kinds by [`KoiConfig::validate`](super::KoiConfig::validate).
    pub fn new(mut layers: Vec<PatternLayer>, body: BodyTraits) -> Self {
        debug_assert!(!layers.is_empty(), "genome needs at least one layer");

        layers.sort_by_key(PatternLayer::kind);
        layers.dedup_by_key(|layer| layer.kind());

        Self { layers, body }
    }

    /// Pattern layers in kind order.
    pub fn layers(&self) -> &[PatternLayer] {
        &self.layers
    }

    /// Mutable access to the layers. Kinds and order cannot change through a
    /// slice.
    pub fn layers_mut(&mut self) -> &mut [PatternLayer] {
        &mut self.layers
    }

    /// The layer of the given kind, if present.
    pub fn layer(&self, kind: LayerKind) -> Option<&PatternLayer> {
        self.layers.iter().find(|layer| layer.kind() == kind)
    }

    /// Total number of byte traits (layers plus heritable body traits).
    pub fn trait_count(&self) -> usize {
        self.layers
            .iter()
            .map(|layer| layer.kind().trait_count())
            .sum::<usize>()
            + 5
    }

    /// Serialized size in bytes.
    pub fn serialized_len(&self) -> usize {
        1 + self
            .layers
            .iter()
            .map(PatternLayer::serialized_len)
            .sum::<usize>()
            + BodyTraits::SIZE
    }

    pub fn serialize(&self, buffer: &mut ByteBuffer) {
        buffer.write_u8(self.layers.len() as u8);
        for layer in &self.layers {
            layer.serialize(buffer);
        }
        self.body.serialize(buffer);
    }

    /// Read a genome. Any field outside its valid domain is an error.
    pub fn deserialize(buffer: &mut ByteBuffer) -> Result<Self, FormatError> {
        let count = buffer.read_u8()?;
        if count == 0 || count as usize > LayerKind::COUNT {
            return Err(FormatError::LayerCount(count));
        }

        let mut layers: Vec<PatternLayer> = Vec::with_capacity(count as usize);
        for _ in 0..count {
            let layer = PatternLayer::deserialize(buffer)?;
            if let Some(previous) = layers.last() {
                if previous.kind() >= layer.kind() {
                    return Err(FormatError::LayerOrder);
                }
            }
            layers.push(layer);
        }

        Ok(Self {
            layers,
            body: BodyTraits::deserialize(buffer)?,
        })
    }

    /// Serialize into a fresh byte vector.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buffer = ByteBuffer::new();
        self.serialize(&mut buffer);
        buffer.into_bytes()
    }

    /// Deserialize from bytes that must contain exactly one genome.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, FormatError> {
        let mut buffer = ByteBuffer::from_bytes(bytes);
        let genome = Self::deserialize(&mut buffer)?;

        match buffer.remaining() {
            0 => Ok(genome),
            n => Err(FormatError::TrailingBytes(n)),
        }
    }
}
