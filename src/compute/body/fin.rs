//! Pectoral and pelvic fins attached to spine vertebrae.

use glam::Vec2;

/// Resting angle between a fin and the body normal, in radians.
pub const FIN_SWEEP: f32 = 0.6;
/// Swing amplitude of a fin while swimming, in radians.
pub const FIN_SWING: f32 = 0.35;
/// Fin length relative to its lateral offset.
pub const FIN_LENGTH: f32 = 1.6;

/// Body side a fin is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinSide {
    Left,
    Right,
}

impl FinSide {
    #[inline]
    pub fn sign(self) -> f32 {
        match self {
            FinSide::Left => 1.0,
            FinSide::Right => -1.0,
        }
    }
}

/// A single fin, stored as an anchor on the body outline and a tip.
#[derive(Debug, Clone, PartialEq)]
pub struct Fin {
    vertebra: usize,
    side: FinSide,
    offset: f32,
    anchor: Vec2,
    anchor_previous: Vec2,
    tip: Vec2,
    tip_previous: Vec2,
}

impl Fin {
    /// Create a fin at a vertebra, `offset` away from the spine at full size.
    pub fn new(vertebra: usize, side: FinSide, offset: f32) -> Self {
        Self {
            vertebra,
            side,
            offset,
            anchor: Vec2::ZERO,
            anchor_previous: Vec2::ZERO,
            tip: Vec2::ZERO,
            tip_previous: Vec2::ZERO,
        }
    }

    /// Index of the vertebra this fin follows.
    #[inline]
    pub fn vertebra(&self) -> usize {
        self.vertebra
    }

    #[inline]
    pub fn side(&self) -> FinSide {
        self.side
    }

    /// Collapse the fin onto its vertebra.
    pub fn initialize_position(&mut self, position: Vec2) {
        self.anchor = position;
        self.anchor_previous = position;
        self.tip = position;
        self.tip_previous = position;
    }

    /// Place anchor and tip for a tailward spine direction and swing angle.
    fn place(&mut self, position: Vec2, direction: Vec2, swing: f32, size: f32) {
        let normal = direction.perp() * self.side.sign();
        let angle = FIN_SWEEP + swing;

        self.anchor = position + normal * self.offset * size;
        self.tip = self.anchor
            + (normal * angle.cos() + direction * angle.sin()) * self.offset * FIN_LENGTH * size;
    }

    /// Follow the vertebra after a simulation tick.
    ///
    /// `direction` is the tailward direction of the segment in front of the
    /// vertebra, taken before the spine moved.
    pub fn update(&mut self, position: Vec2, direction: Vec2, phase: f32, size: f32) {
        self.anchor_previous = self.anchor;
        self.tip_previous = self.tip;

        let swing = phase.sin() * self.side.sign() * FIN_SWING;
        self.place(position, direction, swing, size);
    }

    /// Pose the fin without motion history, used by loop animations.
    pub fn set_neutral(
        &mut self,
        position: Vec2,
        direction: Vec2,
        phase: f32,
        amplitude: f32,
        size: f32,
    ) {
        self.place(position, direction, phase.sin() * amplitude, size);
        self.anchor_previous = self.anchor;
        self.tip_previous = self.tip;
    }

    /// Translate the fin, including its motion history.
    pub fn shift(&mut self, delta: Vec2) {
        self.anchor += delta;
        self.anchor_previous += delta;
        self.tip += delta;
        self.tip_previous += delta;
    }

    /// Anchor position interpolated between the last two ticks.
    #[inline]
    pub fn anchor(&self, time: f32) -> Vec2 {
        self.anchor_previous.lerp(self.anchor, time)
    }

    /// Tip position interpolated between the last two ticks.
    #[inline]
    pub fn tip(&self, time: f32) -> Vec2 {
        self.tip_previous.lerp(self.tip, time)
    }
}
