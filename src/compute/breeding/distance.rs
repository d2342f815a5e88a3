//! Genetic distance between genomes.

use crate::schema::Genome;

/// Compute genetic distance between two genomes, in `[0, 1]`.
///
/// Matching layers contribute their normalized byte differences and the
/// angle between their planes. A layer kind present in only one genome counts
/// as a maximal difference.
pub fn genome_distance(g1: &Genome, g2: &Genome) -> f32 {
    let mut distance = 0.0f32;
    let mut count = 0;

    for layer in g1.layers() {
        match g2.layer(layer.kind()) {
            Some(other) => {
                for (a, b) in layer.traits().iter().zip(other.traits()) {
                    distance += (*a as f32 - b as f32).abs() / 255.0;
                    count += 1;
                }
                distance += (1.0 - layer.plane().normal.dot(other.plane().normal)) * 0.5;
                distance += (layer.palette_index() != other.palette_index()) as u8 as f32;
                count += 2;
            }
            None => {
                distance += 1.0;
                count += 1;
            }
        }
    }

    // Kinds only the second genome carries
    for layer in g2.layers() {
        if g1.layer(layer.kind()).is_none() {
            distance += 1.0;
            count += 1;
        }
    }

    for (a, b) in g1.body.heritable().iter().zip(g2.body.heritable()) {
        distance += (*a as f32 - b as f32).abs() / 255.0;
        count += 1;
    }

    (distance / count as f32).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compute::GenomeRng;
    use crate::schema::Blueprint;

    #[test]
    fn test_distance_identity_and_symmetry() {
        let blueprints = Blueprint::defaults();
        let mut rng = GenomeRng::new(12);
        let a = blueprints[0].spawn(&mut rng);
        let b = blueprints[2].spawn(&mut rng);

        assert!(genome_distance(&a, &a) < 1e-6);
        assert!((genome_distance(&a, &b) - genome_distance(&b, &a)).abs() < 1e-6);
        assert!(genome_distance(&a, &b) > 0.0);
    }

    #[test]
    fn test_related_genomes_are_closer() {
        let blueprint = &Blueprint::defaults()[1];
        let mut rng = GenomeRng::new(3);
        let a = blueprint.spawn(&mut rng);
        let mut sibling = a.clone();
        sibling.body.length = sibling.body.length.wrapping_add(10);
        let stranger = Blueprint::defaults()[0].spawn(&mut rng);

        assert!(genome_distance(&a, &sibling) < genome_distance(&a, &stranger));
    }
}
