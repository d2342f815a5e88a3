//! Blueprints for spawning individuals from scratch.
//!
//! A blueprint is a named bundle of trait curves. Spawning samples every curve
//! with a fresh uniform random value and rounds the result into a trait byte.

use serde::{Deserialize, Serialize};

use super::{
    BodyTraits, Genome, LayerKind, LayerRidge, LayerSpots, LayerStripes, PALETTE_SIZE,
    PatternLayer, Plane,
};
use crate::compute::{GenomeRng, TraitCurve};

/// Palette selection for a spawned layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaletteChoice {
    /// Always use this palette index.
    Index(u8),
    /// Pick a random palette index on every spawn.
    Random,
}

impl PaletteChoice {
    fn pick(self, rng: &mut GenomeRng) -> u8 {
        match self {
            PaletteChoice::Index(index) => index.min(PALETTE_SIZE - 1),
            PaletteChoice::Random => rng.below(PALETTE_SIZE as usize) as u8,
        }
    }
}

/// Sample a curve with a fresh random value and round it into a byte.
fn sample_u8(curve: &TraitCurve, rng: &mut GenomeRng) -> u8 {
    curve.sample(rng.float()).round().clamp(0.0, 255.0) as u8
}

/// Blueprint for a single pattern layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum LayerBlueprint {
    Spots {
        palette: PaletteChoice,
        scale: TraitCurve,
        stretch: TraitCurve,
        threshold: TraitCurve,
        x_focus: TraitCurve,
        y_focus: TraitCurve,
        power: TraitCurve,
    },
    Stripes {
        palette: PaletteChoice,
        scale: TraitCurve,
        distortion: TraitCurve,
        roughness: TraitCurve,
        threshold: TraitCurve,
        slant: TraitCurve,
        suppression: TraitCurve,
    },
    Ridge {
        palette: PaletteChoice,
        scale: TraitCurve,
        power: TraitCurve,
        threshold: TraitCurve,
        focus: TraitCurve,
        focus_power: TraitCurve,
    },
}

impl LayerBlueprint {
    /// Kind of the layers this blueprint spawns.
    pub fn kind(&self) -> LayerKind {
        match self {
            LayerBlueprint::Spots { .. } => LayerKind::Spots,
            LayerBlueprint::Stripes { .. } => LayerKind::Stripes,
            LayerBlueprint::Ridge { .. } => LayerKind::Ridge,
        }
    }

    /// Spawn a layer with a random plane.
    pub fn spawn(&self, rng: &mut GenomeRng) -> PatternLayer {
        match self {
            LayerBlueprint::Spots {
                palette,
                scale,
                stretch,
                threshold,
                x_focus,
                y_focus,
                power,
            } => PatternLayer::Spots(LayerSpots {
                palette_index: palette.pick(rng),
                plane: Plane::random(rng),
                scale: sample_u8(scale, rng),
                stretch: sample_u8(stretch, rng),
                threshold: sample_u8(threshold, rng),
                x_focus: sample_u8(x_focus, rng),
                y_focus: sample_u8(y_focus, rng),
                power: sample_u8(power, rng),
            }),
            LayerBlueprint::Stripes {
                palette,
                scale,
                distortion,
                roughness,
                threshold,
                slant,
                suppression,
            } => PatternLayer::Stripes(LayerStripes {
                palette_index: palette.pick(rng),
                plane: Plane::random(rng),
                scale: sample_u8(scale, rng),
                distortion: sample_u8(distortion, rng),
                roughness: sample_u8(roughness, rng),
                threshold: sample_u8(threshold, rng),
                slant: sample_u8(slant, rng),
                suppression: sample_u8(suppression, rng),
            }),
            LayerBlueprint::Ridge {
                palette,
                scale,
                power,
                threshold,
                focus,
                focus_power,
            } => PatternLayer::Ridge(LayerRidge {
                palette_index: palette.pick(rng),
                plane: Plane::random(rng),
                scale: sample_u8(scale, rng),
                power: sample_u8(power, rng),
                threshold: sample_u8(threshold, rng),
                focus: sample_u8(focus, rng),
                focus_power: sample_u8(focus_power, rng),
            }),
        }
    }

    fn curves(&self) -> Vec<&TraitCurve> {
        match self {
            LayerBlueprint::Spots {
                scale,
                stretch,
                threshold,
                x_focus,
                y_focus,
                power,
                ..
            } => vec![scale, stretch, threshold, x_focus, y_focus, power],
            LayerBlueprint::Stripes {
                scale,
                distortion,
                roughness,
                threshold,
                slant,
                suppression,
                ..
            } => vec![scale, distortion, roughness, threshold, slant, suppression],
            LayerBlueprint::Ridge {
                scale,
                power,
                threshold,
                focus,
                focus_power,
                ..
            } => vec![scale, power, threshold, focus, focus_power],
        }
    }
}

/// Blueprint for body traits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodyBlueprint {
    pub length: TraitCurve,
    pub radius: TraitCurve,
    pub growth_speed: TraitCurve,
    pub mating_frequency: TraitCurve,
    pub offspring_count: TraitCurve,
}

impl Default for BodyBlueprint {
    fn default() -> Self {
        Self {
            length: TraitCurve::linear(64.0, 192.0),
            radius: TraitCurve::linear(80.0, 176.0),
            growth_speed: TraitCurve::power(32.0, 224.0, 1.5),
            mating_frequency: TraitCurve::linear(40.0, 216.0),
            offspring_count: TraitCurve::power(32.0, 224.0, 2.0),
        }
    }
}

impl BodyBlueprint {
    pub fn spawn(&self, rng: &mut GenomeRng) -> BodyTraits {
        BodyTraits {
            length: sample_u8(&self.length, rng),
            radius: sample_u8(&self.radius, rng),
            growth_speed: sample_u8(&self.growth_speed, rng),
            mating_frequency: sample_u8(&self.mating_frequency, rng),
            offspring_count: sample_u8(&self.offspring_count, rng),
            age: 0,
        }
    }
}

/// A named trait curve bundle that spawns complete genomes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Blueprint {
    /// Display name.
    pub name: String,
    /// Layer blueprints, one per layer kind at most.
    pub layers: Vec<LayerBlueprint>,
    /// Body trait curves.
    #[serde(default)]
    pub body: BodyBlueprint,
}

impl Blueprint {
    /// Spawn a new genome aged zero.
    pub fn spawn(&self, rng: &mut GenomeRng) -> Genome {
        let layers = self.layers.iter().map(|layer| layer.spawn(rng)).collect();
        let body = self.body.spawn(rng);

        Genome::new(layers, body)
    }

    /// All trait curves of this blueprint.
    pub fn curves(&self) -> Vec<&TraitCurve> {
        let body = &self.body;
        let mut curves: Vec<&TraitCurve> = self.layers.iter().flat_map(|l| l.curves()).collect();
        curves.extend([
            &body.length,
            &body.radius,
            &body.growth_speed,
            &body.mating_frequency,
            &body.offspring_count,
        ]);
        curves
    }

    /// The built-in blueprints.
    pub fn defaults() -> Vec<Blueprint> {
        let byte = |min: f32, max: f32| TraitCurve::linear(min, max);

        vec![
            Blueprint {
                name: "spotted".into(),
                layers: vec![LayerBlueprint::Spots {
                    palette: PaletteChoice::Random,
                    scale: byte(60.0, 200.0),
                    stretch: byte(0.0, 128.0),
                    threshold: TraitCurve::plateau(40.0, 128.0, 220.0, 1.0),
                    x_focus: byte(0.0, 255.0),
                    y_focus: byte(0.0, 255.0),
                    power: TraitCurve::power(20.0, 235.0, 2.0),
                }],
                body: BodyBlueprint::default(),
            },
            Blueprint {
                name: "striped".into(),
                layers: vec![
                    LayerBlueprint::Spots {
                        palette: PaletteChoice::Index(0),
                        scale: byte(30.0, 90.0),
                        stretch: byte(0.0, 64.0),
                        threshold: byte(100.0, 180.0),
                        x_focus: byte(64.0, 192.0),
                        y_focus: byte(64.0, 192.0),
                        power: byte(60.0, 160.0),
                    },
                    LayerBlueprint::Stripes {
                        palette: PaletteChoice::Random,
                        scale: byte(90.0, 230.0),
                        distortion: TraitCurve::power(0.0, 200.0, 2.0),
                        roughness: byte(0.0, 180.0),
                        threshold: TraitCurve::plateau(40.0, 128.0, 220.0, 1.0),
                        slant: byte(0.0, 255.0),
                        suppression: byte(0.0, 128.0),
                    },
                ],
                body: BodyBlueprint::default(),
            },
            Blueprint {
                name: "ridged".into(),
                layers: vec![
                    LayerBlueprint::Spots {
                        palette: PaletteChoice::Random,
                        scale: byte(100.0, 255.0),
                        stretch: byte(0.0, 200.0),
                        threshold: byte(60.0, 200.0),
                        x_focus: byte(0.0, 255.0),
                        y_focus: byte(0.0, 255.0),
                        power: byte(0.0, 255.0),
                    },
                    LayerBlueprint::Ridge {
                        palette: PaletteChoice::Index(1),
                        scale: byte(40.0, 220.0),
                        power: TraitCurve::power(30.0, 230.0, 0.6),
                        threshold: byte(60.0, 200.0),
                        focus: byte(0.0, 255.0),
                        focus_power: byte(20.0, 160.0),
                    },
                ],
                body: BodyBlueprint::default(),
            },
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::LayerKind;

    #[test]
    fn test_spawn_is_deterministic() {
        for blueprint in Blueprint::defaults() {
            let a = blueprint.spawn(&mut GenomeRng::new(5));
            let b = blueprint.spawn(&mut GenomeRng::new(5));
            assert_eq!(a, b);
            assert_eq!(a.body.age, 0);
        }
    }

    #[test]
    fn test_spawned_traits_follow_curves() {
        let blueprint = &Blueprint::defaults()[2];
        let mut rng = GenomeRng::new(99);

        for _ in 0..50 {
            let genome = blueprint.spawn(&mut rng);
            assert_eq!(genome.layers().len(), 2);
            assert!((64..=192).contains(&genome.body.length));

            match genome.layer(LayerKind::Ridge) {
                Some(PatternLayer::Ridge(ridge)) => {
                    assert_eq!(ridge.palette_index, 1);
                    assert!(ridge.focus_power >= 20 && ridge.focus_power <= 160);
                    assert!(ridge.plane.is_normal());
                }
                other => panic!("missing ridge layer: {:?}", other),
            }
        }
    }

    #[test]
    fn test_random_palette_in_range() {
        let mut rng = GenomeRng::new(1);
        for _ in 0..100 {
            assert!(PaletteChoice::Random.pick(&mut rng) < PALETTE_SIZE);
        }
        assert_eq!(PaletteChoice::Index(200).pick(&mut rng), PALETTE_SIZE - 1);
    }

    #[test]
    fn test_layer_kinds_match_spawned_layers() {
        let mut rng = GenomeRng::new(8);
        for blueprint in Blueprint::defaults() {
            for layer in &blueprint.layers {
                assert_eq!(layer.spawn(&mut rng).kind(), layer.kind());
            }
        }
    }

    #[test]
    fn test_serde_roundtrip() {
        let blueprints = Blueprint::defaults();
        let json = serde_json::to_string(&blueprints).unwrap();
        let parsed: Vec<Blueprint> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, blueprints);
    }
}
