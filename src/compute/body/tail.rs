//! Tail fin trailing the last spine segments.

use glam::Vec2;

/// Fraction of spine segments covered by the tail fin.
pub const TAIL_FRACTION: f32 = 0.25;
/// Half width of the tail fin at its tip, relative to the grown body radius.
pub const TAIL_SPREAD: f32 = 1.3;
/// Fraction of the remaining distance tail edges close every tick.
pub const TAIL_SPRING: f32 = 0.45;

/// Left and right outline points of the tail fin at one vertebra.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TailEdge {
    pub vertebra: usize,
    pub left: Vec2,
    pub right: Vec2,
    left_previous: Vec2,
    right_previous: Vec2,
}

impl TailEdge {
    /// Edge points interpolated between the last two ticks.
    pub fn at(&self, time: f32) -> (Vec2, Vec2) {
        (
            self.left_previous.lerp(self.left, time),
            self.right_previous.lerp(self.right, time),
        )
    }
}

/// Tail fin state.
#[derive(Debug, Clone, PartialEq)]
pub struct Tail {
    offset: usize,
    width: f32,
    edges: Vec<TailEdge>,
}

impl Tail {
    /// Attach a tail to a spine of at least three vertebrae.
    ///
    /// The returned tail starts after vertebra `offset()`, which always lies in
    /// `1..spine.len() - 1`. `radius` is the fully grown body radius; the fin
    /// width follows the body's current `size`.
    pub fn connect(spine: &[Vec2], radius: f32, size: f32) -> Self {
        let segments = spine.len().saturating_sub(1).max(2);
        let tail_segments =
            ((segments as f32 * TAIL_FRACTION).round() as usize).clamp(1, segments - 1);
        let offset = segments - tail_segments;

        let mut tail = Self {
            offset,
            width: radius * TAIL_SPREAD,
            edges: (offset + 1..=segments)
                .map(|vertebra| TailEdge {
                    vertebra,
                    left: Vec2::ZERO,
                    right: Vec2::ZERO,
                    left_previous: Vec2::ZERO,
                    right_previous: Vec2::ZERO,
                })
                .collect(),
        };
        tail.set_neutral(spine, size);
        tail
    }

    /// Last vertebra belonging to the body rather than the tail.
    #[inline]
    pub fn offset(&self) -> usize {
        self.offset
    }

    #[inline]
    pub fn edges(&self) -> &[TailEdge] {
        &self.edges
    }

    /// Rest positions of the edge points at a vertebra.
    fn targets(&self, spine: &[Vec2], vertebra: usize, size: f32) -> (Vec2, Vec2) {
        let direction = (spine[vertebra] - spine[vertebra - 1])
            .try_normalize()
            .unwrap_or(Vec2::X);
        let span = (spine.len() - 1 - self.offset) as f32;
        let half_width = self.width * size * (vertebra - self.offset) as f32 / span;
        let normal = direction.perp() * half_width;

        (spine[vertebra] + normal, spine[vertebra] - normal)
    }

    /// Let the edges trail behind the spine after a tick.
    pub fn update(&mut self, spine: &[Vec2], size: f32) {
        for i in 0..self.edges.len() {
            let (left, right) = self.targets(spine, self.edges[i].vertebra, size);
            let edge = &mut self.edges[i];

            edge.left_previous = edge.left;
            edge.right_previous = edge.right;
            edge.left += (left - edge.left) * TAIL_SPRING;
            edge.right += (right - edge.right) * TAIL_SPRING;
        }
    }

    /// Snap the edges to their rest positions and clear motion history.
    pub fn set_neutral(&mut self, spine: &[Vec2], size: f32) {
        for i in 0..self.edges.len() {
            let (left, right) = self.targets(spine, self.edges[i].vertebra, size);
            let edge = &mut self.edges[i];

            edge.left = left;
            edge.right = right;
            edge.left_previous = left;
            edge.right_previous = right;
        }
    }

    /// Translate the tail, including its motion history.
    pub fn shift(&mut self, delta: Vec2) {
        for edge in &mut self.edges {
            edge.left += delta;
            edge.right += delta;
            edge.left_previous += delta;
            edge.right_previous += delta;
        }
    }
}
