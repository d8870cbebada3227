//! OpenRay math - vectors, rays, intervals and bounding boxes.
//!
//! `Vec3` is glam's single-precision vector; it serves as point, direction
//! and linear RGB color throughout the renderer.

// Re-export glam for convenience
pub use glam::*;

mod aabb;
mod interval;
mod ray;
mod vector;

pub use aabb::Aabb;
pub use interval::Interval;
pub use ray::Ray;
pub use vector::Vec3Ext;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec3_creation() {
        let v = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(v.x, 1.0);
        assert_eq!(v.y, 2.0);
        assert_eq!(v.z, 3.0);
    }

    #[test]
    fn test_vec3_operations() {
        let a = Vec3::new(1.0, 2.0, 3.0);
        let b = Vec3::new(4.0, 5.0, 6.0);
        assert_eq!(a + b, Vec3::new(5.0, 7.0, 9.0));
        assert_eq!(b - a, Vec3::new(3.0, 3.0, 3.0));
        assert_eq!(a * 2.0, Vec3::new(2.0, 4.0, 6.0));
        // Component-wise (Hadamard) product, used for color attenuation
        assert_eq!(a * b, Vec3::new(4.0, 10.0, 18.0));
        assert_eq!(a.dot(b), 32.0);
        assert_eq!(Vec3::X.cross(Vec3::Y), Vec3::Z);
    }

    #[test]
    fn test_vec3_indexing() {
        let v = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(v[0], 1.0);
        assert_eq!(v[1], 2.0);
        assert_eq!(v[2], 3.0);
    }
}
