//! Individuals and populations.
//!
//! A [`Fish`] pairs a genome (heredity) with a body (live physical state).
//! The genome's body traits parameterize the body once; afterwards only the
//! body's age changes, and it is written back when the fish is serialized.

use glam::Vec2;
use rayon::prelude::*;

use super::{
    Body, BodyMesh, Breeder, GenomeRng, Hit, Litter, MutationEvent, PatternRegion, Surroundings,
    pick_nearest,
};
use crate::codec::FormatError;
use crate::schema::{Blueprint, BreedingConfig, Genome, UnitSystem};

/// One individual.
#[derive(Debug, Clone)]
pub struct Fish {
    genome: Genome,
    body: Body,
    mate_countdown: u32,
}

impl Fish {
    pub fn new(genome: Genome) -> Self {
        let body = Body::new(&genome.body);

        Self {
            genome,
            body,
            mate_countdown: 0,
        }
    }

    /// Spawn a fresh individual from a blueprint.
    pub fn spawn(
        blueprint: &Blueprint,
        rng: &mut GenomeRng,
        position: Vec2,
        direction: Vec2,
    ) -> Self {
        let mut fish = Self::new(blueprint.spawn(rng));
        fish.body.initialize_spine(position, direction);
        fish
    }

    /// The genome with the body's current age.
    pub fn genome(&self) -> Genome {
        let mut genome = self.genome.clone();
        genome.body.age = self.body.age();
        genome
    }

    #[inline]
    pub fn body(&self) -> &Body {
        &self.body
    }

    #[inline]
    pub fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        self.genome().to_bytes()
    }

    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, FormatError> {
        Ok(Self::new(Genome::from_bytes(bytes)?))
    }

    /// Whether the mating timeout has elapsed.
    #[inline]
    pub fn can_mate(&self) -> bool {
        self.mate_countdown == 0
    }

    /// Advance one tick, aging the body.
    pub fn update(
        &mut self,
        head: Vec2,
        direction: Vec2,
        speed: f32,
        surroundings: Option<&mut Surroundings<'_>>,
    ) {
        self.mate_countdown = self.mate_countdown.saturating_sub(1);
        self.body.update(head, direction, speed, true, surroundings);
    }

    /// Breed with a father. Both parents wait out their mating timeout
    /// afterwards, offspring are placed at the mother's spawn position.
    pub fn breed<F>(
        &mut self,
        father: &mut Fish,
        config: &BreedingConfig,
        rng: &mut GenomeRng,
        on_mutate: F,
    ) -> (Litter, Vec<Fish>)
    where
        F: FnMut(&MutationEvent),
    {
        let mother_genome = self.genome();
        let father_genome = father.genome();
        let litter = Breeder::new(&mother_genome, &father_genome).breed(config, rng, on_mutate);

        self.mate_countdown = self.genome.body.mate_timeout();
        father.mate_countdown = father.genome.body.mate_timeout();

        let position = self.body.offspring_position();
        let offspring = litter
            .offspring
            .iter()
            .map(|genome| {
                let mut fish = Fish::new(genome.clone());
                let heading = Vec2::from_angle(rng.float() * std::f32::consts::TAU);
                fish.body.initialize_spine(position, heading);
                fish
            })
            .collect();

        (litter, offspring)
    }

    /// Human readable length and weight.
    pub fn describe(&self, units: UnitSystem) -> String {
        format!(
            "{}, {}",
            units.format_length(self.body.length()),
            units.format_weight(self.body.weight())
        )
    }
}

/// Per-tick movement target for one fish.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Steering {
    pub head: Vec2,
    /// Normalized heading.
    pub direction: Vec2,
    pub speed: f32,
}

/// A population of exclusively owned individuals.
#[derive(Debug, Clone, Default)]
pub struct School {
    fish: Vec<Fish>,
}

impl School {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, fish: Fish) {
        self.fish.push(fish);
    }

    pub fn extend(&mut self, fish: impl IntoIterator<Item = Fish>) {
        self.fish.extend(fish);
    }

    pub fn remove(&mut self, index: usize) -> Fish {
        self.fish.remove(index)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.fish.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.fish.is_empty()
    }

    pub fn fish(&self) -> &[Fish] {
        &self.fish
    }

    pub fn fish_mut(&mut self) -> &mut [Fish] {
        &mut self.fish
    }

    /// Advance every fish by one tick in parallel.
    ///
    /// `steer` supplies each fish's target from its index and current state.
    /// Individuals share no mutable state, so no water or audio sinks are
    /// attached here.
    pub fn update<F>(&mut self, steer: F)
    where
        F: Fn(usize, &Fish) -> Steering + Sync,
    {
        self.fish.par_iter_mut().enumerate().for_each(|(index, fish)| {
            let steering = steer(index, fish);
            fish.update(steering.head, steering.direction, steering.speed, None);
        });
    }

    /// Index of the fish at `point`, preferring direct hits over the nearest
    /// near miss.
    pub fn pick(&self, point: Vec2) -> Option<usize> {
        let mut hits: Vec<Hit<usize>> = Vec::new();

        for (index, fish) in self.fish.iter().enumerate() {
            if fish.body.at_position(point, &mut hits, index) {
                return Some(index);
            }
        }

        pick_nearest(&hits).map(|hit| hit.id)
    }

    /// Render all fish into one mesh.
    pub fn render(&self, regions: &[PatternRegion], time: f32) -> BodyMesh {
        let mut mesh = BodyMesh::new();
        let fallback = PatternRegion::default();

        for (index, fish) in self.fish.iter().enumerate() {
            let region = regions.get(index).unwrap_or(&fallback);
            fish.body.render(&mut mesh, region, time);
        }

        mesh
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn school(count: usize) -> School {
        let blueprints = Blueprint::defaults();
        let mut rng = GenomeRng::new(21);
        let mut school = School::new();

        for i in 0..count {
            let position = Vec2::new(i as f32 * 3.0, 0.0);
            let blueprint = &blueprints[i % blueprints.len()];
            school.push(Fish::spawn(blueprint, &mut rng, position, Vec2::X));
        }
        school
    }

    #[test]
    fn test_serialized_age_is_live() {
        let mut school = school(1);
        let fish = &mut school.fish_mut()[0];

        for _ in 0..25 {
            fish.update(Vec2::ZERO, Vec2::X, 0.0, None);
        }

        let restored = Fish::from_bytes(fish.to_bytes()).unwrap();
        assert_eq!(restored.body().age(), 25);
        assert_eq!(restored.genome(), fish.genome());
    }

    #[test]
    fn test_parallel_update_matches_sequential() {
        let steer = |index: usize, fish: &Fish| Steering {
            head: fish.body().spine()[0] + Vec2::new(0.03, 0.01 * index as f32),
            direction: Vec2::new(1.0, 0.01 * index as f32).normalize(),
            speed: 0.03,
        };

        let mut parallel = school(6);
        let mut sequential = parallel.clone();

        for _ in 0..20 {
            parallel.update(steer);
            for (index, fish) in sequential.fish_mut().iter_mut().enumerate() {
                let s = steer(index, fish);
                fish.update(s.head, s.direction, s.speed, None);
            }
        }

        for (a, b) in parallel.fish().iter().zip(sequential.fish()) {
            assert_eq!(a.body().spine(), b.body().spine());
        }
    }

    #[test]
    fn test_pick() {
        let school = school(3);
        let target = school.fish()[1].body().offspring_position();

        assert_eq!(school.pick(target), Some(1));
        assert_eq!(school.pick(Vec2::new(100.0, 100.0)), None);
    }

    #[test]
    fn test_breed_sets_timeouts() {
        let mut school = school(2);
        let mut father = school.remove(1);
        let mother = &mut school.fish_mut()[0];
        let config = BreedingConfig::default();

        let mut rng = GenomeRng::new(4);
        let (litter, offspring) = mother.breed(&mut father, &config, &mut rng, |_| {});

        assert_eq!(litter.offspring.len(), offspring.len());
        assert!(!mother.can_mate());
        assert!(!father.can_mate());
        for child in &offspring {
            assert_eq!(child.body().age(), 0);
            assert_eq!(child.body().spine()[0], mother.body().offspring_position());
        }
    }

    #[test]
    fn test_render_and_describe() {
        let school = school(2);
        let mesh = school.render(&[PatternRegion::default()], 1.0);
        assert!(mesh.triangle_count() > 0);

        let text = school.fish()[0].describe(UnitSystem::Metric);
        assert!(text.ends_with(" kg"));
    }
}
