//! Triangle mesh emission for rendering bodies.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::{Body, body_shape};

/// Texture atlas rectangle holding one individual's pattern.
///
/// The body strip spans `u_body_start..u_body_end`, fins and tail sample
/// `u_fin_start..u_fin_end`. Both share the `v` range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PatternRegion {
    pub u_body_start: f32,
    pub u_body_end: f32,
    pub u_fin_start: f32,
    pub u_fin_end: f32,
    pub v_start: f32,
    pub v_end: f32,
}

impl Default for PatternRegion {
    fn default() -> Self {
        Self {
            u_body_start: 0.0,
            u_body_end: 0.8,
            u_fin_start: 0.8,
            u_fin_end: 1.0,
            v_start: 0.0,
            v_end: 1.0,
        }
    }
}

impl PatternRegion {
    #[inline]
    fn u_body(&self, t: f32) -> f32 {
        self.u_body_start + (self.u_body_end - self.u_body_start) * t
    }

    #[inline]
    fn u_fin(&self, t: f32) -> f32 {
        self.u_fin_start + (self.u_fin_end - self.u_fin_start) * t
    }
}

/// Mesh vertex: position plus atlas coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub x: f32,
    pub y: f32,
    pub u: f32,
    pub v: f32,
}

/// Indexed triangle list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BodyMesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl BodyMesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.vertices.clear();
        self.indices.clear();
    }

    #[inline]
    pub fn vertex_count(&self) -> u32 {
        self.vertices.len() as u32
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    fn push(&mut self, position: Vec2, u: f32, v: f32) -> u32 {
        let index = self.vertex_count();
        self.vertices.push(Vertex {
            x: position.x,
            y: position.y,
            u,
            v,
        });
        index
    }

    /// Two triangles `a b c`, `c d a`.
    fn quad(&mut self, a: u32, b: u32, c: u32, d: u32) {
        self.indices.extend_from_slice(&[a, b, c, c, d, a]);
    }
}

impl Body {
    /// Vertebra position interpolated between the last two ticks.
    #[inline]
    pub fn vertebra_at(&self, vertebra: usize, time: f32) -> Vec2 {
        self.spine_previous[vertebra].lerp(self.spine[vertebra], time)
    }

    /// Append this body's geometry, interpolated to tick progress `time`.
    ///
    /// Fins come first so the body covers their roots, the tail fin last.
    /// Rendering never changes simulation state.
    pub fn render(&self, mesh: &mut BodyMesh, region: &PatternRegion, time: f32) {
        let time = time.clamp(0.0, 1.0);
        let points: Vec<Vec2> = (0..self.spine.len())
            .map(|vertebra| self.vertebra_at(vertebra, time))
            .collect();
        let last = points.len() - 1;

        for fin in &self.fins {
            let root = points[fin.vertebra()];
            let anchor = fin.anchor(time);
            let tip = fin.tip(time);

            let a = mesh.push(root, region.u_fin_start, region.v_start);
            let b = mesh.push(anchor, region.u_fin_start, region.v_end);
            let c = mesh.push(tip, region.u_fin_end, region.v_end);
            let d = mesh.push(root + (tip - anchor), region.u_fin_end, region.v_start);
            mesh.quad(a, b, c, d);
        }

        let radius = self.radius_sampled * self.size;
        let first = mesh.vertex_count();
        for (vertebra, point) in points.iter().enumerate() {
            let t = vertebra as f32 / last as f32;
            let forward = points[vertebra.saturating_sub(1)] - points[(vertebra + 1).min(last)];
            let normal = forward.try_normalize().unwrap_or(Vec2::X).perp() * radius * body_shape(t);

            mesh.push(*point + normal, region.u_body(t), region.v_start);
            mesh.push(*point - normal, region.u_body(t), region.v_end);
        }
        for segment in 0..last as u32 {
            let base = first + segment * 2;
            mesh.quad(base, base + 1, base + 3, base + 2);
        }

        let offset = self.tail.offset();
        let edges = self.tail.edges();
        let v_center = (region.v_start + region.v_end) * 0.5;
        let mut previous_left = mesh.push(points[offset], region.u_fin(0.0), v_center);
        let mut previous_right = previous_left;
        for (i, edge) in edges.iter().enumerate() {
            let (left, right) = edge.at(time);
            let t = (i + 1) as f32 / edges.len() as f32;

            let l = mesh.push(left, region.u_fin(t), region.v_start);
            let r = mesh.push(right, region.u_fin(t), region.v_end);
            mesh.quad(previous_left, previous_right, r, l);
            previous_left = l;
            previous_right = r;
        }
    }
}
