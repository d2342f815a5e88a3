//! Random trait mutation.

use std::f32::consts::TAU;

use crate::compute::{GenomeRng, TraitCurve};
use crate::schema::{Genome, LayerKind, MutationConfig, Plane};

/// A single applied mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationEvent {
    /// A layer byte trait changed.
    Trait {
        kind: LayerKind,
        index: usize,
        from: u8,
        to: u8,
    },
    /// A layer plane rotated.
    Plane { kind: LayerKind },
    /// A heritable body trait changed.
    Body { index: usize, from: u8, to: u8 },
}

/// Offset a byte by `distance.sample(x)`, rounded and clamped.
///
/// The result always differs from the input: zero offsets become a single
/// step and offsets that vanish against a bound step the other way.
pub fn mutate_u8(value: u8, distance: &TraitCurve, x: f32) -> u8 {
    let mut offset = distance.sample(x).round() as i32;
    if offset == 0 {
        offset = if x < 0.5 { -1 } else { 1 };
    }

    let mutated = (value as i32 + offset).clamp(0, 255);
    if mutated == value as i32 {
        (value as i32 - offset.signum()) as u8
    } else {
        mutated as u8
    }
}

/// Tilt a plane normal by a tangent offset in a random direction.
pub fn mutate_plane(plane: &Plane, distance: &TraitCurve, rng: &mut GenomeRng) -> Plane {
    let (a, b) = plane.normal.any_orthonormal_pair();
    let angle = rng.float() * TAU;
    let length = distance.sample(rng.float());

    Plane::new(plane.normal + (a * angle.cos() + b * angle.sin()) * length)
}

/// Applies mutations to offspring genomes.
#[derive(Debug, Clone, Copy)]
pub struct Mutator<'a> {
    config: &'a MutationConfig,
}

impl<'a> Mutator<'a> {
    pub fn new(config: &'a MutationConfig) -> Self {
        Self { config }
    }

    /// Roll every trait and plane of a genome. Returns the mutation count.
    pub fn mutate<F>(&self, genome: &mut Genome, rng: &mut GenomeRng, on_mutate: &mut F) -> usize
    where
        F: FnMut(&MutationEvent),
    {
        let config = self.config;
        let mut count = 0;
        let mut emit = |event: MutationEvent| {
            log::debug!("Mutation: {:?}", event);
            on_mutate(&event);
            count += 1;
        };

        for layer in genome.layers_mut() {
            let kind = layer.kind();

            for (index, value) in layer.traits_mut().into_iter().enumerate() {
                if rng.chance(config.trait_probability) {
                    let from = *value;
                    *value = mutate_u8(from, &config.trait_distance, rng.float());
                    emit(MutationEvent::Trait {
                        kind,
                        index,
                        from,
                        to: *value,
                    });
                }
            }

            if rng.chance(config.plane_probability) {
                let plane = layer.plane_mut();
                *plane = mutate_plane(plane, &config.plane_distance, rng);
                emit(MutationEvent::Plane { kind });
            }
        }

        for (index, value) in genome.body.heritable_mut().into_iter().enumerate() {
            if rng.chance(config.trait_probability) {
                let from = *value;
                *value = mutate_u8(from, &config.trait_distance, rng.float());
                emit(MutationEvent::Body {
                    index,
                    from,
                    to: *value,
                });
            }
        }

        count
    }

    /// Mutate exactly one byte trait, chosen uniformly over all layer and
    /// heritable body traits.
    pub fn force<F>(
        &self,
        genome: &mut Genome,
        rng: &mut GenomeRng,
        on_mutate: &mut F,
    ) -> MutationEvent
    where
        F: FnMut(&MutationEvent),
    {
        let mut index = rng.below(genome.trait_count());
        let x = rng.float();
        let distance = &self.config.trait_distance;

        let event = 'found: {
            for layer in genome.layers_mut() {
                let kind = layer.kind();
                let count = kind.trait_count();

                if index < count {
                    let mut traits = layer.traits_mut();
                    let from = *traits[index];
                    *traits[index] = mutate_u8(from, distance, x);
                    break 'found MutationEvent::Trait {
                        kind,
                        index,
                        from,
                        to: *traits[index],
                    };
                }
                index -= count;
            }

            let body = genome.body.heritable_mut();
            let index = index.min(body.len() - 1);
            let from = *body[index];
            *body[index] = mutate_u8(from, distance, x);
            MutationEvent::Body {
                index,
                from,
                to: *body[index],
            }
        };

        log::debug!("Forced mutation: {:?}", event);
        on_mutate(&event);
        event
    }
}
