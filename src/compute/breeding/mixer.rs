//! Crossover of two parent genomes.
//!
//! One interpolation sample `t` is drawn per offspring and shared by every
//! trait, so an offspring slides along a single primary-to-secondary axis.
//! Each trait reshapes `t` with its own sigmoid: steep sigmoids snap a trait
//! towards one parent, shallow ones blend smoothly.

use crate::compute::TraitCurve;
use crate::schema::{BodyTraits, Genome, PatternLayer};

/// Plane interpolation curve, shared by all layer kinds.
pub const SAMPLER_PLANE: TraitCurve = TraitCurve::sigmoid(0.0, 1.0, 8.0);

/// Spots: scale, stretch, threshold, x focus, y focus, power.
pub const SAMPLERS_SPOTS: [TraitCurve; 6] = [
    TraitCurve::sigmoid(0.0, 1.0, 15.0),
    TraitCurve::sigmoid(0.0, 1.0, 6.0),
    TraitCurve::sigmoid(0.0, 1.0, 2.0),
    TraitCurve::sigmoid(0.0, 1.0, 4.0),
    TraitCurve::sigmoid(0.0, 1.0, 4.0),
    TraitCurve::sigmoid(0.0, 1.0, 2.0),
];

/// Stripes: scale, distortion, roughness, threshold, slant, suppression.
pub const SAMPLERS_STRIPES: [TraitCurve; 6] = [
    TraitCurve::sigmoid(0.0, 1.0, 12.0),
    TraitCurve::sigmoid(0.0, 1.0, 3.0),
    TraitCurve::sigmoid(0.0, 1.0, 3.0),
    TraitCurve::sigmoid(0.0, 1.0, 2.0),
    TraitCurve::sigmoid(0.0, 1.0, 6.0),
    TraitCurve::sigmoid(0.0, 1.0, 2.0),
];

/// Ridge: scale, power, threshold, focus, focus power.
pub const SAMPLERS_RIDGE: [TraitCurve; 5] = [
    TraitCurve::sigmoid(0.0, 1.0, 15.0),
    TraitCurve::sigmoid(0.0, 1.0, 2.0),
    TraitCurve::sigmoid(0.0, 1.0, 2.0),
    TraitCurve::sigmoid(0.0, 1.0, 10.0),
    TraitCurve::sigmoid(0.0, 1.0, 11.0),
];

/// Body: length, radius, growth speed, mating frequency, offspring count.
pub const SAMPLERS_BODY: [TraitCurve; 5] = [
    TraitCurve::sigmoid(0.0, 1.0, 3.0),
    TraitCurve::sigmoid(0.0, 1.0, 3.0),
    TraitCurve::sigmoid(0.0, 1.0, 2.0),
    TraitCurve::sigmoid(0.0, 1.0, 2.0),
    TraitCurve::sigmoid(0.0, 1.0, 2.0),
];

/// Mix two bytes: `round(clamp(a + (b - a) * curve(t), 0, 255))`.
#[inline]
pub fn mix_u8(a: u8, b: u8, curve: &TraitCurve, t: f32) -> u8 {
    let a = a as f32;
    let b = b as f32;

    (a + (b - a) * curve.sample(t)).clamp(0.0, 255.0).round() as u8
}

/// Mix two layers of the same kind. Returns `None` for mismatched kinds.
///
/// The palette index is inherited from the primary layer.
pub fn mix_layers(
    primary: &PatternLayer,
    secondary: &PatternLayer,
    t: f32,
) -> Option<PatternLayer> {
    let curves: &[TraitCurve] = match (primary, secondary) {
        (PatternLayer::Spots(_), PatternLayer::Spots(_)) => &SAMPLERS_SPOTS,
        (PatternLayer::Stripes(_), PatternLayer::Stripes(_)) => &SAMPLERS_STRIPES,
        (PatternLayer::Ridge(_), PatternLayer::Ridge(_)) => &SAMPLERS_RIDGE,
        _ => return None,
    };

    let mut child = primary.clone();
    let plane = primary
        .plane()
        .interpolate(secondary.plane(), SAMPLER_PLANE.sample(t));

    for ((value, other), curve) in child
        .traits_mut()
        .into_iter()
        .zip(secondary.traits())
        .zip(curves)
    {
        *value = mix_u8(*value, other, curve, t);
    }
    *child.plane_mut() = plane;

    Some(child)
}

/// Mix heritable body traits. Offspring start at age zero.
pub fn mix_body(primary: &BodyTraits, secondary: &BodyTraits, t: f32) -> BodyTraits {
    let mut child = BodyTraits {
        age: 0,
        ..*primary
    };

    for ((value, other), curve) in child
        .heritable_mut()
        .into_iter()
        .zip(secondary.heritable())
        .zip(&SAMPLERS_BODY)
    {
        *value = mix_u8(*value, other, curve, t);
    }

    child
}

/// Crossover of a primary and a secondary parent.
#[derive(Debug, Clone, Copy)]
pub struct Mixer<'a> {
    primary: &'a Genome,
    secondary: &'a Genome,
}

impl<'a> Mixer<'a> {
    pub fn new(primary: &'a Genome, secondary: &'a Genome) -> Self {
        Self { primary, secondary }
    }

    /// Produce the offspring genome for interpolation sample `t`.
    ///
    /// Every layer of the primary parent is mixed with the secondary parent's
    /// layer of the same kind, or copied when the secondary has none.
    pub fn mix(&self, t: f32) -> Genome {
        let layers = self
            .primary
            .layers()
            .iter()
            .map(|layer| {
                self.secondary
                    .layer(layer.kind())
                    .and_then(|other| mix_layers(layer, other, t))
                    .unwrap_or_else(|| layer.clone())
            })
            .collect();

        Genome::new(layers, mix_body(&self.primary.body, &self.secondary.body, t))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{LayerKind, LayerRidge, LayerSpots, Plane};
    use glam::Vec3;

    fn ridge(value: u8, normal: Vec3) -> PatternLayer {
        PatternLayer::Ridge(LayerRidge {
            palette_index: value % 16,
            plane: Plane::new(normal),
            scale: value,
            power: value,
            threshold: value,
            focus: value,
            focus_power: value,
        })
    }

    fn spots(value: u8) -> PatternLayer {
        PatternLayer::Spots(LayerSpots {
            palette_index: 0,
            plane: Plane::new(Vec3::Y),
            scale: value,
            stretch: value,
            threshold: value,
            x_focus: value,
            y_focus: value,
            power: value,
        })
    }

    #[test]
    fn test_mix_u8_endpoints() {
        let curve = TraitCurve::sigmoid(0.0, 1.0, 4.0);
        assert_eq!(mix_u8(10, 200, &curve, 0.0), 10);
        assert_eq!(mix_u8(10, 200, &curve, 1.0), 200);
        assert_eq!(mix_u8(200, 10, &curve, 0.5), 105);
    }

    #[test]
    fn test_mix_layers_between_parents() {
        let a = ridge(20, Vec3::X);
        let b = ridge(220, Vec3::Y);

        for step in 0..=10 {
            let t = step as f32 / 10.0;
            let child = mix_layers(&a, &b, t).unwrap();
            assert_eq!(child.palette_index(), a.palette_index());
            assert!(child.plane().is_normal());
            assert!(child.traits().iter().all(|&v| (20..=220).contains(&v)));
        }
    }

    #[test]
    fn test_mix_layers_kind_mismatch() {
        assert!(mix_layers(&ridge(1, Vec3::X), &spots(1), 0.5).is_none());
    }

    #[test]
    fn test_mixer_keeps_primary_layers() {
        let primary = Genome::new(vec![spots(10), ridge(30, Vec3::Z)], BodyTraits::default());
        let secondary = Genome::new(vec![spots(50)], BodyTraits::default());

        let child = Mixer::new(&primary, &secondary).mix(0.7);
        assert_eq!(child.layers().len(), 2);
        assert_eq!(child.layer(LayerKind::Ridge), primary.layer(LayerKind::Ridge));
    }

    #[test]
    fn test_mix_body_resets_age() {
        let mut a = BodyTraits::default();
        a.age = 999;
        a.length = 40;
        let mut b = a;
        b.length = 240;

        let child = mix_body(&a, &b, 0.5);
        assert_eq!(child.age, 0);
        assert!(child.length > 40 && child.length < 240);
    }
}
