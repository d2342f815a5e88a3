//! Kinematic spring-chain body simulation.
//!
//! A body is a chain of vertebrae. Every tick the head is placed at a target
//! position and each following vertebra is pulled towards its rest offset by
//! a per-segment spring, then reprojected to lie exactly `spacing` behind its
//! predecessor. A phase oscillator bends the rest direction to produce a
//! swimming wave.
//!
//! This module provides:
//! - [`Body`]: spine state, update, loop animation and derived measurements
//! - Fin and tail geometry that trails the spine
//! - Mesh emission with interpolation between ticks
//! - Point picking with a nearest-body disambiguation pass
//! - Water and audio effects through caller supplied sinks

mod collision;
mod effects;
mod fin;
mod mesh;
mod tail;

pub use collision::*;
pub use effects::*;
pub use fin::*;
pub use mesh::*;
pub use tail::*;

use std::f32::consts::{PI, TAU};

use glam::Vec2;

use crate::compute::TraitCurve;
use crate::schema::BodyTraits;

/// Spine length in meters per vertebra.
pub const RESOLUTION: f32 = 0.12;
pub const SWIM_AMPLITUDE: f32 = 11.0;
pub const SWIM_SPEED: f32 = 6.0;
/// Speed below which the body does not swing.
pub const SPEED_SWING_THRESHOLD: f32 = 0.01;
pub const FIN_PHASE_SPEED: f32 = 0.4;
pub const FIN_FRONT_AT: TraitCurve = TraitCurve::linear(0.11, 0.23);
pub const FIN_BACK_AT: TraitCurve = TraitCurve::linear(0.45, 0.7);
/// Size of a newborn relative to an adult.
pub const SIZE_MIN: f32 = 0.1;
pub const SAMPLER_LENGTH: TraitCurve = TraitCurve::power(0.6, 1.2, 1.2);
pub const SAMPLER_GROWTH_MULTIPLIER: TraitCurve = TraitCurve::power(30.0, 80.0, 4.0);
pub const SAMPLER_SPRING_START: TraitCurve = TraitCurve::linear(0.4, 0.85);
pub const SAMPLER_SPRING_END: TraitCurve = TraitCurve::linear(0.3, 0.6);
pub const SPRING_POWER: f32 = 1.7;
pub const SPINE_LOOP_FLEXIBILITY: TraitCurve = TraitCurve::power(0.0, 2.3, 0.16);
pub const SPINE_LOOP_ANGLE_AMPLITUDE: f32 = 0.07;
pub const SPINE_LOOP_PHASE_AMPLITUDE: f32 = 0.6;
/// Relative spine position offspring are spawned at.
pub const OFFSPRING_VERTEBRA: f32 = 0.4;
pub const KILOGRAMS_PER_AREA: f32 = 22.0;
/// Weight in kilograms above which a body counts as heavy.
pub const HEAVY_THRESHOLD: f32 = 2.3;

/// Body radius relative to body length.
pub fn sampler_radius() -> TraitCurve {
    TraitCurve::plateau(0.1, 0.13, 0.21, 1.7)
}

/// Body outline along the spine, `t = 0` at the head.
pub fn body_shape(t: f32) -> f32 {
    ((t.clamp(0.0, 1.0) * 0.8 + 0.2) * PI).sin().max(0.0).sqrt()
}

/// The live physical state of one individual.
#[derive(Debug, Clone)]
pub struct Body {
    traits: BodyTraits,
    length_sampled: f32,
    radius_sampled: f32,
    size_curve: TraitCurve,
    size: f32,
    spacing: f32,
    spine: Vec<Vec2>,
    spine_previous: Vec<Vec2>,
    springs: Vec<f32>,
    fins: Vec<Fin>,
    tail: Tail,
    phase: f32,
    fin_phase: f32,
    tail_audio_countdown: u32,
}

impl Body {
    /// Build a body from body traits, resting at the origin facing +X.
    pub fn new(traits: &BodyTraits) -> Self {
        let length_sampled = SAMPLER_LENGTH.sample(traits.length as f32 / 255.0);
        let radius_sampled = length_sampled * sampler_radius().sample(traits.radius as f32 / 255.0);
        let size_curve = TraitCurve::inverse(
            SIZE_MIN,
            1.0,
            SAMPLER_GROWTH_MULTIPLIER.sample(traits.growth_speed as f32 / 255.0),
        );
        let size = size_curve.sample(traits.age as f32 / u16::MAX as f32);
        let vertebrae = ((length_sampled / RESOLUTION).ceil() as usize).max(3);

        let radius = traits.radius as f32 / 255.0;
        let springs = make_springs(
            vertebrae,
            SAMPLER_SPRING_START.sample(radius),
            SAMPLER_SPRING_END.sample(radius),
        );

        let length = traits.length as f32 / 255.0;
        let front = fin_vertebra(vertebrae, FIN_FRONT_AT.sample(length));
        let back = fin_vertebra(vertebrae, FIN_BACK_AT.sample(length));
        let offset = |vertebra: usize| {
            radius_sampled * body_shape(vertebra as f32 / (vertebrae - 1) as f32)
        };
        let fins = vec![
            Fin::new(front, FinSide::Left, offset(front)),
            Fin::new(front, FinSide::Right, offset(front)),
            Fin::new(back, FinSide::Left, offset(back)),
            Fin::new(back, FinSide::Right, offset(back)),
        ];

        let spine = vec![Vec2::ZERO; vertebrae];
        let tail = Tail::connect(&spine, radius_sampled, size);

        let mut body = Self {
            traits: *traits,
            length_sampled,
            radius_sampled,
            size_curve,
            size,
            spacing: 0.0,
            spine_previous: spine.clone(),
            spine,
            springs,
            fins,
            tail,
            phase: 0.0,
            fin_phase: 0.0,
            tail_audio_countdown: 0,
        };
        body.calculate_spacing();
        body.initialize_spine(Vec2::ZERO, Vec2::X);
        body
    }

    /// Lay the spine out straight behind `head`, opposite to `direction`.
    pub fn initialize_spine(&mut self, head: Vec2, direction: Vec2) {
        let step = direction.try_normalize().unwrap_or(Vec2::X) * self.spacing;

        self.spine[0] = head;
        for vertebra in 1..self.spine.len() {
            self.spine[vertebra] = self.spine[vertebra - 1] - step;
        }
        self.spine_previous.copy_from_slice(&self.spine);

        for fin in &mut self.fins {
            fin.initialize_position(self.spine[fin.vertebra()]);
        }
        self.tail = Tail::connect(&self.spine, self.radius_sampled, self.size);
    }

    /// Recompute the rest distance between vertebrae from the current size.
    fn calculate_spacing(&mut self) {
        self.spacing =
            self.size.max(SIZE_MIN) * self.length_sampled / (self.spine.len() - 1) as f32;
    }

    /// Advance the body by one tick.
    ///
    /// `direction` must be normalized. Ticks never fail: degenerate segments
    /// keep their previous heading.
    pub fn update(
        &mut self,
        head: Vec2,
        direction: Vec2,
        speed: f32,
        advance_age: bool,
        surroundings: Option<&mut Surroundings<'_>>,
    ) {
        if advance_age && self.traits.age != u16::MAX {
            self.traits.age += 1;
            self.size = self.size_curve.sample(self.traits.age as f32 / u16::MAX as f32);
        }

        self.tail_audio_countdown = self.tail_audio_countdown.saturating_sub(1);

        self.spine_previous.copy_from_slice(&self.spine);
        self.spine[0] = head;
        self.calculate_spacing();

        let swing = (speed - SPEED_SWING_THRESHOLD).max(0.0) * SWIM_AMPLITUDE;
        let angle = direction.y.atan2(direction.x) + PI + self.phase.cos() * swing;
        let mut heading = Vec2::from_angle(angle);

        for vertebra in 1..self.spine.len() {
            let mut delta = self.spine[vertebra] - self.spine[vertebra - 1];

            let rest = self.springs[vertebra - 1];
            let spring = rest + (1.0 - rest) * (1.0 - self.size);
            let correction =
                self.spine[vertebra - 1] + heading * self.spacing - self.spine[vertebra];
            let heading_previous = heading;

            heading = delta.try_normalize().unwrap_or(heading);
            delta += correction * spring;

            self.spine[vertebra] = self.spine[vertebra - 1]
                + delta.try_normalize().unwrap_or(heading) * self.spacing;

            for fin in self.fins.iter_mut().filter(|fin| fin.vertebra() == vertebra) {
                fin.update(self.spine[vertebra], heading_previous, self.fin_phase, self.size);
            }
        }

        self.tail.update(&self.spine, self.size);

        self.phase = (self.phase + SWIM_SPEED * speed / self.size).rem_euclid(TAU);
        self.fin_phase = (self.fin_phase - FIN_PHASE_SPEED).rem_euclid(TAU);

        if let Some(surroundings) = surroundings {
            self.disturb_water(speed, surroundings);
        }
    }

    /// Instantly move the head to `position`, keeping the body shape.
    pub fn move_to(&mut self, position: Vec2) {
        let delta = position - self.spine[0];

        for vertebra in &mut self.spine {
            *vertebra += delta;
        }
        self.spine_previous.copy_from_slice(&self.spine);

        for fin in &mut self.fins {
            fin.shift(delta);
        }
        self.tail.shift(delta);
    }

    /// Pose the body for a looping preview animation between two points.
    ///
    /// The body is centered on the segment from `start` to `end` and a sine
    /// wave travels down the spine as `progress` goes from 0 to 1.
    pub fn animate_loop(&mut self, start: Vec2, end: Vec2, progress: f32) {
        let delta = end - start;
        let distance = delta.length();
        let axis = delta.try_normalize().unwrap_or(Vec2::X);
        let direction = -delta.y.atan2(delta.x) + PI;
        let shift = 0.5 * (distance - (self.spine.len() - 1) as f32 * self.spacing);
        let phase = progress * TAU;
        let last = (self.spine.len() - 1) as f32;

        self.spine[0] = start + axis * shift;

        for vertebra in 1..self.spine.len() {
            let along = vertebra as f32 / last;
            let angle = ((SPINE_LOOP_FLEXIBILITY.sample(along) - progress) * TAU).sin()
                * SPINE_LOOP_ANGLE_AMPLITUDE
                - direction;
            let heading = Vec2::from_angle(angle);

            self.spine[vertebra] = self.spine[vertebra - 1] - heading * self.spacing;

            for fin in self.fins.iter_mut().filter(|fin| fin.vertebra() == vertebra) {
                fin.set_neutral(
                    self.spine[vertebra],
                    -heading,
                    phase,
                    SPINE_LOOP_PHASE_AMPLITUDE,
                    self.size,
                );
            }
        }

        self.spine_previous.copy_from_slice(&self.spine);
        self.tail.set_neutral(&self.spine, self.size);
    }

    #[inline]
    pub fn spine(&self) -> &[Vec2] {
        &self.spine
    }

    #[inline]
    pub fn spine_previous(&self) -> &[Vec2] {
        &self.spine_previous
    }

    /// Per-segment spring stiffness, head to tail.
    #[inline]
    pub fn springs(&self) -> &[f32] {
        &self.springs
    }

    #[inline]
    pub fn fins(&self) -> &[Fin] {
        &self.fins
    }

    #[inline]
    pub fn tail(&self) -> &Tail {
        &self.tail
    }

    /// Last vertebra of the body proper, the tail fin starts after it.
    #[inline]
    pub fn tail_offset(&self) -> usize {
        self.tail.offset()
    }

    #[inline]
    pub fn spacing(&self) -> f32 {
        self.spacing
    }

    /// Current size relative to an adult, in `[SIZE_MIN, 1]`.
    #[inline]
    pub fn size(&self) -> f32 {
        self.size
    }

    /// Age in ticks.
    #[inline]
    pub fn age(&self) -> u16 {
        self.traits.age
    }

    /// Age in seconds for a given tick duration.
    pub fn age_seconds(&self, update_rate: f32) -> f32 {
        self.traits.age as f32 * update_rate
    }

    /// Body traits with the live age.
    #[inline]
    pub fn traits(&self) -> &BodyTraits {
        &self.traits
    }

    #[inline]
    pub fn radius(&self) -> f32 {
        self.radius_sampled
    }

    /// Head to tail length in centimeters.
    pub fn length(&self) -> f32 {
        (self.spine.len() - 1) as f32 * self.spacing * 100.0
    }

    /// Weight in kilograms, modelling the body as an ellipse.
    pub fn weight(&self) -> f32 {
        let axis_length = self.length_sampled * 0.5 * self.size;
        let axis_radius = self.radius_sampled * self.size;

        PI * axis_length * axis_radius * KILOGRAMS_PER_AREA
    }

    pub fn is_heavy(&self) -> bool {
        self.weight() > HEAVY_THRESHOLD
    }

    fn offspring_vertebra(&self) -> usize {
        ((self.spine.len() - 1) as f32 * OFFSPRING_VERTEBRA).round() as usize
    }

    /// Position offspring are released at.
    pub fn offspring_position(&self) -> Vec2 {
        self.spine[self.offspring_vertebra()]
    }

    /// Offspring position one tick ago.
    pub fn offspring_position_previous(&self) -> Vec2 {
        self.spine_previous[self.offspring_vertebra()]
    }
}

/// Spring stiffness per segment, tapering from `start` to `end` along the spine.
fn make_springs(vertebrae: usize, start: f32, end: f32) -> Vec<f32> {
    let taper = TraitCurve::power(start, end, SPRING_POWER);
    let last = (vertebrae - 2).max(1) as f32;

    (0..vertebrae - 1)
        .map(|segment| taper.sample(segment as f32 / last))
        .collect()
}

/// Vertebra at a relative spine position, never the head.
fn fin_vertebra(vertebrae: usize, at: f32) -> usize {
    ((at * (vertebrae - 1) as f32).round() as usize).clamp(1, vertebrae - 1)
}
