use crate::{Interval, Ray, Vec3};

/// Axis-Aligned Bounding Box used by the BVH to prune subtrees.
///
/// Defined by its minimum and maximum corners. Constructors keep
/// `min <= max` component-wise.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// Create an AABB from its corners. The caller guarantees `min <= max`.
    pub fn new(min: Vec3, max: Vec3) -> Self {
        debug_assert!(min.cmple(max).all(), "inverted AABB: {min} > {max}");
        Self { min, max }
    }

    /// Create an AABB that surrounds two other AABBs.
    pub fn surrounding(box0: &Aabb, box1: &Aabb) -> Self {
        Self {
            min: box0.min.min(box1.min),
            max: box0.max.max(box1.max),
        }
    }

    /// True if `other` lies entirely inside this box (boundaries included).
    pub fn contains_box(&self, other: &Aabb) -> bool {
        self.min.cmple(other.min).all() && self.max.cmpge(other.max).all()
    }

    /// Test if a ray intersects this AABB within the given interval.
    ///
    /// Slab method. The comparison is inclusive, so a zero-thickness box
    /// is still hit where its slab is crossed.
    pub fn hit(&self, r: &Ray, mut ray_t: Interval) -> bool {
        for axis in 0..3 {
            let origin = r.origin[axis];
            if r.direction[axis] == 0.0 {
                // Parallel to this slab: inside it for every t, or never
                if origin < self.min[axis] || origin > self.max[axis] {
                    return false;
                }
                continue;
            }

            let inv_d = 1.0 / r.direction[axis];
            let mut t0 = (self.min[axis] - origin) * inv_d;
            let mut t1 = (self.max[axis] - origin) * inv_d;
            if inv_d < 0.0 {
                std::mem::swap(&mut t0, &mut t1);
            }

            ray_t.min = t0.max(ray_t.min);
            ray_t.max = t1.min(ray_t.max);
            if ray_t.max < ray_t.min {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aabb_surrounding() {
        let box1 = Aabb::new(Vec3::ZERO, Vec3::new(5.0, 5.0, 5.0));
        let box2 = Aabb::new(Vec3::new(3.0, -3.0, 3.0), Vec3::new(10.0, 10.0, 10.0));
        let surrounding = Aabb::surrounding(&box1, &box2);

        assert_eq!(surrounding.min, Vec3::new(0.0, -3.0, 0.0));
        assert_eq!(surrounding.max, Vec3::new(10.0, 10.0, 10.0));
        assert!(surrounding.contains_box(&box1));
        assert!(surrounding.contains_box(&box2));
        assert!(!box1.contains_box(&surrounding));
    }

    #[test]
    fn test_aabb_hit() {
        let aabb = Aabb::new(Vec3::new(-1.0, -1.0, -1.0), Vec3::new(1.0, 1.0, 1.0));

        // Ray pointing at center
        let ray = Ray::new(Vec3::new(0.0, 0.0, -5.0), Vec3::new(0.0, 0.0, 1.0));
        assert!(aabb.hit(&ray, Interval::new(0.0, 100.0)));

        // Ray pointing away
        let ray = Ray::new(Vec3::new(0.0, 0.0, -5.0), Vec3::new(0.0, 0.0, -1.0));
        assert!(!aabb.hit(&ray, Interval::new(0.0, 100.0)));

        // Ray missing the box
        let ray = Ray::new(Vec3::new(10.0, 0.0, 0.0), Vec3::new(0.0, 0.0, 1.0));
        assert!(!aabb.hit(&ray, Interval::new(0.0, 100.0)));
    }

    #[test]
    fn test_aabb_hit_respects_interval() {
        let aabb = Aabb::new(Vec3::new(-1.0, -1.0, -1.0), Vec3::new(1.0, 1.0, 1.0));
        let ray = Ray::new(Vec3::new(0.0, 0.0, -5.0), Vec3::Z);

        // Box spans t in [4, 6]
        assert!(!aabb.hit(&ray, Interval::new(0.0, 3.5)));
        assert!(!aabb.hit(&ray, Interval::new(6.5, 10.0)));
        assert!(aabb.hit(&ray, Interval::new(5.0, 10.0)));
    }

    #[test]
    fn test_aabb_hit_diagonal() {
        let aabb = Aabb::new(Vec3::new(1.0, 1.0, 1.0), Vec3::new(2.0, 2.0, 2.0));
        let ray = Ray::new(Vec3::ZERO, Vec3::new(1.0, 1.0, 1.0));
        assert!(aabb.hit(&ray, Interval::new(0.0, f32::INFINITY)));

        let ray = Ray::new(Vec3::ZERO, Vec3::new(1.0, -1.0, 1.0));
        assert!(!aabb.hit(&ray, Interval::new(0.0, f32::INFINITY)));
    }

    #[test]
    fn test_aabb_hit_flat_box() {
        // Zero thickness along y, like the bounds of a floor tile
        let aabb = Aabb::new(Vec3::new(-2.0, 0.0, -2.0), Vec3::new(2.0, 0.0, 2.0));
        let forward = Interval::new(0.001, f32::INFINITY);

        let down = Ray::new(Vec3::new(0.3, 5.0, 0.2), -Vec3::Y);
        assert!(aabb.hit(&down, forward));

        let slanted = Ray::new(Vec3::new(0.0, 5.0, 0.0), Vec3::new(0.1, -1.0, 0.3));
        assert!(aabb.hit(&slanted, forward));

        // -Vec3::Y carries negative zeros in x and z
        let beside = Ray::new(Vec3::new(3.0, 5.0, 0.0), -Vec3::Y);
        assert!(!aabb.hit(&beside, forward));
        let beside = Ray::new(Vec3::new(-3.0, 5.0, 0.0), Vec3::new(0.0, -1.0, 0.0));
        assert!(!aabb.hit(&beside, forward));

        // Skimming along the plane of the slab
        let skim = Ray::new(Vec3::new(-5.0, 0.0, 0.0), Vec3::X);
        assert!(aabb.hit(&skim, forward));

        // The slab sits at t = 5, outside [0.001, 4]
        assert!(!aabb.hit(&down, Interval::new(0.001, 4.0)));
    }
}
