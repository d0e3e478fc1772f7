//! Axis-aligned bounding boxes and the segment slab test.

use crate::Point3;

/// Axis-aligned bounding box in 3D.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb3 {
    /// Minimum corner.
    pub min: Point3,
    /// Maximum corner.
    pub max: Point3,
}

impl Aabb3 {
    /// Create an AABB from min and max corners.
    pub fn new(min: Point3, max: Point3) -> Self {
        Self { min, max }
    }

    /// Create an empty (inverted) AABB suitable for expansion.
    pub fn empty() -> Self {
        Self {
            min: Point3::new(f64::INFINITY, f64::INFINITY, f64::INFINITY),
            max: Point3::new(f64::NEG_INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY),
        }
    }

    /// Expand this AABB to include a point.
    pub fn include_point(&mut self, p: &Point3) {
        self.min.x = self.min.x.min(p.x);
        self.min.y = self.min.y.min(p.y);
        self.min.z = self.min.z.min(p.z);
        self.max.x = self.max.x.max(p.x);
        self.max.y = self.max.y.max(p.y);
        self.max.z = self.max.z.max(p.z);
    }

    /// Test whether the segment from `origin` to `target` crosses this box,
    /// using the slab method: the segment misses iff the per-axis slab
    /// intervals fail to overlap, or the box lies entirely behind `origin`.
    ///
    /// The direction is normalized for numerical stability only; the
    /// pass/fail outcome is invariant to its scale. Zero direction
    /// components divide to IEEE infinities rather than faulting, and the
    /// min/max folds discard any NaNs, so axis-aligned and zero-length
    /// segments get a deterministic answer.
    pub fn intersects_segment(&self, origin: &Point3, target: &Point3) -> bool {
        let dir = (target - origin).normalize();

        let t1 = (self.min.x - origin.x) / dir.x;
        let t2 = (self.max.x - origin.x) / dir.x;
        let t3 = (self.min.y - origin.y) / dir.y;
        let t4 = (self.max.y - origin.y) / dir.y;
        let t5 = (self.min.z - origin.z) / dir.z;
        let t6 = (self.max.z - origin.z) / dir.z;

        let t_min = t1.min(t2).max(t3.min(t4)).max(t5.min(t6));
        let t_max = t1.max(t2).min(t3.max(t4)).min(t5.max(t6));

        if t_max < 0.0 {
            return false;
        }
        if t_min > t_max {
            return false;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_box() -> Aabb3 {
        Aabb3::new(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 1.0, 1.0))
    }

    #[test]
    fn test_include_point() {
        let mut aabb = Aabb3::empty();
        aabb.include_point(&Point3::new(1.0, -2.0, 3.0));
        aabb.include_point(&Point3::new(-1.0, 2.0, 0.0));
        assert_eq!(aabb.min, Point3::new(-1.0, -2.0, 0.0));
        assert_eq!(aabb.max, Point3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_segment_hit() {
        let aabb = unit_box();
        let origin = Point3::new(-5.0, 0.5, 0.5);
        let target = Point3::new(5.0, 0.5, 0.5);
        assert!(aabb.intersects_segment(&origin, &target));
    }

    #[test]
    fn test_segment_miss() {
        let aabb = unit_box();
        let origin = Point3::new(-5.0, 5.0, 5.0);
        let target = Point3::new(5.0, 5.0, 5.0);
        assert!(!aabb.intersects_segment(&origin, &target));
    }

    #[test]
    fn test_segment_origin_inside() {
        let aabb = unit_box();
        let origin = Point3::new(0.5, 0.5, 0.5);
        let target = Point3::new(10.0, 0.5, 0.5);
        assert!(aabb.intersects_segment(&origin, &target));
    }

    #[test]
    fn test_segment_pointing_away() {
        // Box entirely behind the origin.
        let aabb = unit_box();
        let origin = Point3::new(-5.0, 0.5, 0.5);
        let target = Point3::new(-10.0, 0.5, 0.5);
        assert!(!aabb.intersects_segment(&origin, &target));
    }

    #[test]
    fn test_segment_diagonal() {
        let aabb = unit_box();
        let origin = Point3::new(-1.0, -1.0, -1.0);
        let target = Point3::new(2.0, 2.0, 2.0);
        assert!(aabb.intersects_segment(&origin, &target));
    }

    #[test]
    fn test_axis_aligned_divides_are_deterministic() {
        // Direction has two zero components; slab divisions produce
        // infinities, which the folds must handle without faulting.
        let aabb = unit_box();
        let origin = Point3::new(0.5, 0.5, -3.0);
        let target = Point3::new(0.5, 0.5, 3.0);
        assert!(aabb.intersects_segment(&origin, &target));

        // Same direction, but shifted off the box on x.
        let origin = Point3::new(2.5, 0.5, -3.0);
        let target = Point3::new(2.5, 0.5, 3.0);
        assert!(!aabb.intersects_segment(&origin, &target));
    }

    #[test]
    fn test_zero_length_segment_does_not_panic() {
        let aabb = unit_box();
        let p = Point3::new(0.5, 0.5, 0.5);
        // All-NaN slab parameters; any boolean is acceptable as long as
        // the call returns.
        let _ = aabb.intersects_segment(&p, &p);
    }
}
