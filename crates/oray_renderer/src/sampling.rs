//! Random sampling helpers.
//!
//! Every function takes the caller's generator explicitly; nothing in the
//! renderer touches a global or thread-local RNG.

use oray_math::Vec3;
use rand::{Rng, RngCore};

/// Uniform sample in [0, 1).
#[inline]
pub fn gen_f32(rng: &mut dyn RngCore) -> f32 {
    rng.gen::<f32>()
}

/// Uniform point inside the unit sphere, by rejection from the [-1, 1]^3 cube.
pub fn random_in_unit_sphere(rng: &mut dyn RngCore) -> Vec3 {
    loop {
        let p = Vec3::new(
            gen_f32(rng) * 2.0 - 1.0,
            gen_f32(rng) * 2.0 - 1.0,
            gen_f32(rng) * 2.0 - 1.0,
        );
        if p.length_squared() < 1.0 {
            return p;
        }
    }
}

/// Uniformly distributed direction on the unit sphere.
pub fn random_unit_vector(rng: &mut dyn RngCore) -> Vec3 {
    loop {
        let p = random_in_unit_sphere(rng);
        let len_sq = p.length_squared();
        // Points at the very center have no usable direction
        if len_sq > 1e-12 {
            return p / len_sq.sqrt();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_gen_f32_range() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1000 {
            let x = gen_f32(&mut rng);
            assert!((0.0..1.0).contains(&x));
        }
    }

    #[test]
    fn test_random_in_unit_sphere() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1000 {
            assert!(random_in_unit_sphere(&mut rng).length_squared() < 1.0);
        }
    }

    #[test]
    fn test_random_unit_vector_is_unit_and_centered() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut sum = Vec3::ZERO;
        let n = 20_000;
        for _ in 0..n {
            let v = random_unit_vector(&mut rng);
            assert!((v.length() - 1.0).abs() < 1e-5);
            sum += v;
        }
        // Uniform on the sphere: the mean direction tends to zero
        assert!((sum / n as f32).length() < 0.03);
    }
}
