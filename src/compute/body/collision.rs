//! Point picking against body spines.

use glam::Vec2;

use super::Body;

/// Broad phase radius multiplier relative to the body radius.
pub const BROAD_RADIUS: f32 = 3.0;

/// A near miss recorded for nearest-body disambiguation.
#[derive(Debug, Clone, PartialEq)]
pub struct Hit<T> {
    pub id: T,
    /// Squared distance from the query point to the nearest spine segment.
    pub distance_squared: f32,
}

impl Body {
    /// Test whether `point` lies on this body.
    ///
    /// Returns true for a direct hit. Points within the widened broad radius
    /// of a segment but outside the body are pushed onto `hits` under `id`,
    /// to be resolved with [`pick_nearest`] once every body was tested.
    pub fn at_position<T>(&self, point: Vec2, hits: &mut Vec<Hit<T>>, id: T) -> bool {
        let radius = self.radius_sampled;
        let broad = self.spacing * (self.spine.len() - 1) as f32 * 0.5 + radius * BROAD_RADIUS;

        if point.distance_squared(self.offspring_position()) > broad * broad {
            return false;
        }

        let mut nearest = f32::INFINITY;
        for segment in self.spine.windows(2) {
            let axis = (segment[1] - segment[0]) / self.spacing;
            let projected = axis.dot(point - segment[0]).clamp(0.0, self.spacing);
            let squared = point.distance_squared(segment[0] + axis * projected);

            if squared < radius * radius {
                return true;
            }
            nearest = nearest.min(squared);
        }

        let near = radius * BROAD_RADIUS;
        if nearest < near * near {
            hits.push(Hit {
                id,
                distance_squared: nearest,
            });
        }

        false
    }
}

/// The hit closest to its query point.
pub fn pick_nearest<T>(hits: &[Hit<T>]) -> Option<&Hit<T>> {
    hits.iter()
        .min_by(|a, b| a.distance_squared.total_cmp(&b.distance_squared))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::BodyTraits;

    fn body_at(head: Vec2) -> Body {
        let mut body = Body::new(&BodyTraits {
            length: 128,
            radius: 128,
            growth_speed: 0,
            mating_frequency: 0,
            offspring_count: 0,
            age: u16::MAX,
        });
        body.move_to(head);
        body
    }

    #[test]
    fn test_direct_hit() {
        let body = body_at(Vec2::ZERO);
        let mut hits: Vec<Hit<usize>> = Vec::new();

        let middle = body.spine()[body.spine().len() / 2];
        assert!(body.at_position(middle + Vec2::Y * body.radius() * 0.5, &mut hits, 0));
        assert!(hits.is_empty());
    }

    #[test]
    fn test_far_miss() {
        let body = body_at(Vec2::ZERO);
        let mut hits: Vec<Hit<usize>> = Vec::new();

        assert!(!body.at_position(Vec2::new(50.0, 50.0), &mut hits, 0));
        assert!(hits.is_empty());
    }

    #[test]
    fn test_near_misses_pick_nearest() {
        let a = body_at(Vec2::ZERO);
        let b = body_at(Vec2::new(0.0, a.radius() * 4.0));
        let mut hits = Vec::new();

        // Between both bodies, closer to the first one
        let point = a.spine()[2] + Vec2::Y * a.radius() * 1.5;
        assert!(!a.at_position(point, &mut hits, "a"));
        assert!(!b.at_position(point, &mut hits, "b"));

        assert_eq!(hits.len(), 2);
        assert_eq!(pick_nearest(&hits).map(|hit| hit.id), Some("a"));
        assert!(pick_nearest::<u8>(&[]).is_none());
    }
}
