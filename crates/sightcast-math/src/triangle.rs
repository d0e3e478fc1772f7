//! Triangles and the bounded-segment intersection test.

use crate::{Point3, INTERSECT_EPSILON};

/// A triangle with three ordered vertices.
///
/// No winding order is enforced; the intersection test is two-sided, so
/// both faces block equally.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    /// First vertex.
    pub p1: Point3,
    /// Second vertex.
    pub p2: Point3,
    /// Third vertex.
    pub p3: Point3,
}

impl Triangle {
    /// Create a triangle from three vertices.
    pub fn new(p1: Point3, p2: Point3, p3: Point3) -> Self {
        Self { p1, p2, p3 }
    }

    /// The three vertices in order.
    pub fn vertices(&self) -> [Point3; 3] {
        [self.p1, self.p2, self.p3]
    }

    /// Mean vertex coordinate along `axis` (0 = x, 1 = y, 2 = z).
    ///
    /// Used as the split sort key during tree construction.
    pub fn centroid_on(&self, axis: usize) -> f64 {
        (self.p1[axis] + self.p2[axis] + self.p3[axis]) / 3.0
    }

    /// Test whether the open segment from `origin` to `target` passes
    /// through this triangle (Möller–Trumbore, bounded).
    ///
    /// The hit parameter must lie strictly inside `(INTERSECT_EPSILON, 1)`:
    /// an endpoint lying exactly on the triangle does not count as an
    /// intersection. Degenerate triangles fail the parallel check and
    /// never intersect.
    pub fn intersects_segment(&self, origin: &Point3, target: &Point3) -> bool {
        let e1 = self.p2 - self.p1;
        let e2 = self.p3 - self.p1;
        let dir = target - origin;

        let h = dir.cross(&e2);
        let a = e1.dot(&h);
        // Segment parallel to the triangle's plane.
        if a.abs() < INTERSECT_EPSILON {
            return false;
        }

        let f = 1.0 / a;
        let s = origin - self.p1;
        let u = f * s.dot(&h);
        if u < 0.0 || u > 1.0 {
            return false;
        }

        let q = s.cross(&e1);
        let v = f * dir.dot(&q);
        if v < 0.0 || u + v > 1.0 {
            return false;
        }

        let t = f * e2.dot(&q);
        t > INTERSECT_EPSILON && t < 1.0
    }
}
