//! Litter production from two parents.

use super::{MutationEvent, Mixer, Mutator};
use crate::compute::GenomeRng;
use crate::schema::{BreedingConfig, Genome};

/// Offspring of one mating.
#[derive(Debug, Clone, PartialEq)]
pub struct Litter {
    /// Offspring genomes, all aged zero.
    pub offspring: Vec<Genome>,
    /// Number of mutations applied across the litter.
    pub mutations: usize,
}

/// Breeds a mother with a father.
#[derive(Debug, Clone, Copy)]
pub struct Breeder<'a> {
    mother: &'a Genome,
    father: &'a Genome,
}

impl<'a> Breeder<'a> {
    pub fn new(mother: &'a Genome, father: &'a Genome) -> Self {
        Self { mother, father }
    }

    /// Number of offspring this mating produces.
    pub fn litter_size(&self, config: &BreedingConfig) -> usize {
        config
            .litter_size
            .unwrap_or_else(|| self.mother.body.litter_size())
    }

    /// Produce a litter.
    ///
    /// Each offspring picks a primary parent with equal probability and draws
    /// one crossover sample. With mutation enabled every offspring is rolled
    /// for mutations, and `force_mutation` guarantees that the litter carries
    /// at least one. The same seed always produces the same litter.
    pub fn breed<F>(&self, config: &BreedingConfig, rng: &mut GenomeRng, mut on_mutate: F) -> Litter
    where
        F: FnMut(&MutationEvent),
    {
        let size = self.litter_size(config);
        let mutator = config.mutation.as_ref().map(Mutator::new);
        let mut mutations = 0;

        let mut offspring: Vec<Genome> = (0..size)
            .map(|_| {
                let mother_primary = rng.chance(0.5);
                let (primary, secondary) = if mother_primary {
                    (self.mother, self.father)
                } else {
                    (self.father, self.mother)
                };

                let t = rng.float();
                log::trace!("Crossover t = {:.3}, mother primary: {}", t, mother_primary);

                let mut child = Mixer::new(primary, secondary).mix(t);
                if let Some(mutator) = &mutator {
                    mutations += mutator.mutate(&mut child, rng, &mut on_mutate);
                }
                child
            })
            .collect();

        if let Some(mutator) = &mutator {
            if config.force_mutation && mutations == 0 && !offspring.is_empty() {
                let index = rng.below(offspring.len());
                mutator.force(&mut offspring[index], rng, &mut on_mutate);
                mutations += 1;
            }
        }

        log::info!(
            "Bred litter of {} with {} mutations",
            offspring.len(),
            mutations
        );

        Litter {
            offspring,
            mutations,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Blueprint, MutationConfig, PatternLayer};
    use proptest::prelude::*;

    fn parents(seed: u64) -> (Genome, Genome) {
        let blueprint = &Blueprint::defaults()[2];
        let mut rng = GenomeRng::new(seed);
        (blueprint.spawn(&mut rng), blueprint.spawn(&mut rng))
    }

    fn no_mutation() -> BreedingConfig {
        BreedingConfig {
            mutation: None,
            force_mutation: false,
            litter_size: None,
        }
    }

    fn between(value: u8, a: u8, b: u8) -> bool {
        value >= a.min(b) && value <= a.max(b)
    }

    #[test]
    fn test_litter_from_offspring_count() {
        let (mut mother, father) = parents(1);
        mother.body.offspring_count = 128;

        let litter =
            Breeder::new(&mother, &father).breed(&no_mutation(), &mut GenomeRng::new(9), |_| {});

        assert_eq!(litter.offspring.len(), 4);
        assert_eq!(litter.mutations, 0);

        for child in &litter.offspring {
            assert_eq!(child.body.age, 0);
            for ((c, m), f) in child
                .body
                .heritable()
                .iter()
                .zip(mother.body.heritable())
                .zip(father.body.heritable())
            {
                assert!(between(*c, m, f));
            }
            for ((c, m), f) in child
                .layers()
                .iter()
                .zip(mother.layers())
                .zip(father.layers())
            {
                for ((cv, mv), fv) in c.traits().iter().zip(m.traits()).zip(f.traits()) {
                    assert!(between(*cv, mv, fv));
                }
                assert!(c.plane().is_normal());
            }
        }
    }

    #[test]
    fn test_litter_size_override() {
        let (mother, father) = parents(2);
        let config = BreedingConfig {
            litter_size: Some(11),
            ..no_mutation()
        };

        let litter = Breeder::new(&mother, &father).breed(&config, &mut GenomeRng::new(0), |_| {});
        assert_eq!(litter.offspring.len(), 11);

        let config = BreedingConfig {
            litter_size: Some(0),
            force_mutation: true,
            ..BreedingConfig::default()
        };
        let litter = Breeder::new(&mother, &father).breed(&config, &mut GenomeRng::new(0), |_| {});
        assert!(litter.offspring.is_empty());
        assert_eq!(litter.mutations, 0);
    }

    #[test]
    fn test_breeding_is_deterministic() {
        let (mother, father) = parents(3);
        let config = BreedingConfig::default();
        let breeder = Breeder::new(&mother, &father);

        let a = breeder.breed(&config, &mut GenomeRng::new(77), |_| {});
        let b = breeder.breed(&config, &mut GenomeRng::new(77), |_| {});

        assert_eq!(a, b);
        let bytes_a: Vec<_> = a.offspring.iter().map(Genome::to_bytes).collect();
        let bytes_b: Vec<_> = b.offspring.iter().map(Genome::to_bytes).collect();
        assert_eq!(bytes_a, bytes_b);
    }

    #[test]
    fn test_palette_follows_a_parent() {
        let (mut mother, father) = parents(4);
        if let Some(PatternLayer::Spots(spots)) = mother.layers_mut().first_mut() {
            spots.palette_index = 15;
        }

        let litter =
            Breeder::new(&mother, &father).breed(&no_mutation(), &mut GenomeRng::new(5), |_| {});
        for child in &litter.offspring {
            let index = child.layers()[0].palette_index();
            assert!(index == 15 || index == father.layers()[0].palette_index());
        }
    }

    proptest! {
        #[test]
        fn prop_forced_mutation(seed in any::<u64>()) {
            let (mother, father) = parents(seed);
            let silent = MutationConfig {
                trait_probability: 0.0,
                plane_probability: 0.0,
                ..MutationConfig::default()
            };
            let forced = BreedingConfig {
                mutation: Some(silent),
                force_mutation: true,
                litter_size: None,
            };
            let plain = BreedingConfig {
                force_mutation: false,
                ..forced.clone()
            };
            let breeder = Breeder::new(&mother, &father);

            let mut events = Vec::new();
            let mutated = breeder.breed(&forced, &mut GenomeRng::new(seed), |e| events.push(*e));
            let reference = breeder.breed(&plain, &mut GenomeRng::new(seed), |_| {});

            prop_assert_eq!(mutated.mutations, 1);
            prop_assert_eq!(events.len(), 1);
            prop_assert_eq!(reference.mutations, 0);

            let differing = mutated
                .offspring
                .iter()
                .zip(&reference.offspring)
                .filter(|(a, b)| a != b)
                .count();
            prop_assert_eq!(differing, 1);
        }
    }
}
