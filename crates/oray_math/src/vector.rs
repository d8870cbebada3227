// Extends glam::Vec3 with the optics helpers the materials need.
//
// glam already covers arithmetic, Hadamard product (`a * b`), dot/cross,
// normalization and indexed access.

use glam::Vec3;

/// Threshold below which every component counts as zero.
const NEAR_ZERO: f32 = 1e-8;

/// Extension trait for Vec3 with ray-tracing specific operations.
pub trait Vec3Ext {
    /// True if every component is within 1e-8 of zero.
    fn near_zero(&self) -> bool;

    /// Mirror `self` about the normal `n`: v - 2(v·n)n.
    fn reflect(&self, n: Vec3) -> Vec3;

    /// Refract the unit vector `self` through a surface with unit normal `n`.
    ///
    /// `eta_ratio` is the ratio of refractive indices (incident over
    /// transmitted). The caller handles total internal reflection first.
    fn refract(&self, n: Vec3, eta_ratio: f32) -> Vec3;
}

impl Vec3Ext for Vec3 {
    #[inline]
    fn near_zero(&self) -> bool {
        self.x.abs() < NEAR_ZERO && self.y.abs() < NEAR_ZERO && self.z.abs() < NEAR_ZERO
    }

    #[inline]
    fn reflect(&self, n: Vec3) -> Vec3 {
        *self - 2.0 * self.dot(n) * n
    }

    fn refract(&self, n: Vec3, eta_ratio: f32) -> Vec3 {
        let cos_theta = (-*self).dot(n).min(1.0);
        let r_out_perp = eta_ratio * (*self + cos_theta * n);
        let r_out_parallel = -(1.0 - r_out_perp.length_squared()).abs().sqrt() * n;
        r_out_perp + r_out_parallel
    }
}
