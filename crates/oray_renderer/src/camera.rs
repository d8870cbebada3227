//! Camera for ray generation.

use crate::settings::RenderSettings;
use oray_math::{Ray, Vec3};

/// Pinhole camera mapping normalized screen coordinates to world rays.
///
/// The view rectangle sits one unit in front of the eye; there is no lens
/// model, so every ray starts at the eye position.
#[derive(Debug, Clone)]
pub struct Camera {
    // Camera positioning
    look_from: Vec3,
    look_at: Vec3,
    vup: Vec3,
    vfov: f32, // Vertical field of view in degrees
    aspect_ratio: f32,

    // Cached view rectangle
    lower_left_corner: Vec3,
    horizontal: Vec3,
    vertical: Vec3,
    u: Vec3,
    v: Vec3,
    w: Vec3,
}

impl Camera {
    /// Create a camera at `look_from` aimed at `look_at`.
    pub fn new(look_from: Vec3, look_at: Vec3, vup: Vec3, vfov: f32, aspect_ratio: f32) -> Self {
        let theta = vfov.to_radians();
        let h = (theta / 2.0).tan();
        let viewport_height = 2.0 * h;
        let viewport_width = aspect_ratio * viewport_height;

        // Camera basis: w points backwards, u to the right, v up
        let w = (look_from - look_at).normalize_or_zero();
        let u = vup.cross(w).try_normalize().unwrap_or(Vec3::X);
        let v = w.cross(u);

        let horizontal = viewport_width * u;
        let vertical = viewport_height * v;
        let lower_left_corner = look_from - horizontal / 2.0 - vertical / 2.0 - w;

        Self {
            look_from,
            look_at,
            vup,
            vfov,
            aspect_ratio,
            lower_left_corner,
            horizontal,
            vertical,
            u,
            v,
            w,
        }
    }

    /// Camera described by the render settings.
    pub fn from_settings(settings: &RenderSettings) -> Self {
        Self::new(
            settings.look_from,
            settings.look_at,
            settings.vup,
            settings.vfov,
            settings.aspect_ratio(),
        )
    }

    /// Ray through screen position (s, t), with (0, 0) the lower-left and
    /// (1, 1) the upper-right corner of the view.
    ///
    /// Deterministic: the same (s, t) always yields the same ray.
    pub fn get_ray(&self, s: f32, t: f32) -> Ray {
        let target = self.lower_left_corner + s * self.horizontal + t * self.vertical;
        Ray::new(self.look_from, target - self.look_from)
    }

    pub fn look_from(&self) -> Vec3 {
        self.look_from
    }

    pub fn look_at(&self) -> Vec3 {
        self.look_at
    }

    pub fn vup(&self) -> Vec3 {
        self.vup
    }

    pub fn vfov(&self) -> f32 {
        self.vfov
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.aspect_ratio
    }

    /// Orthonormal camera basis (right, up, backward).
    pub fn basis(&self) -> (Vec3, Vec3, Vec3) {
        (self.u, self.v, self.w)
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::from_settings(&RenderSettings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_camera() -> Camera {
        Camera::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0), Vec3::Y, 90.0, 2.0)
    }

    #[test]
    fn test_camera_basis() {
        let camera = test_camera();
        let (u, v, w) = camera.basis();

        assert!((u - Vec3::X).length() < 1e-6);
        assert!((v - Vec3::Y).length() < 1e-6);
        assert!((w - Vec3::Z).length() < 1e-6);
    }

    #[test]
    fn test_center_ray_points_at_target() {
        let camera = Camera::new(
            Vec3::new(3.0, 2.0, 5.0),
            Vec3::new(-1.0, 0.5, 0.0),
            Vec3::Y,
            40.0,
            16.0 / 9.0,
        );

        let ray = camera.get_ray(0.5, 0.5);
        let expected = (camera.look_at() - camera.look_from()).normalize();
        assert_eq!(ray.origin(), camera.look_from());
        assert!((ray.direction().normalize() - expected).length() < 1e-5);
    }

    #[test]
    fn test_view_rectangle_corners() {
        // 90 degree FOV: the view rectangle at distance 1 spans [-1, 1] vertically
        let camera = test_camera();

        let lower_left = camera.get_ray(0.0, 0.0).direction();
        assert!((lower_left - Vec3::new(-2.0, -1.0, -1.0)).length() < 1e-5);

        let upper_right = camera.get_ray(1.0, 1.0).direction();
        assert!((upper_right - Vec3::new(2.0, 1.0, -1.0)).length() < 1e-5);
    }

    #[test]
    fn test_rays_are_deterministic() {
        let camera = Camera::default();
        for (s, t) in [(0.0, 0.0), (0.25, 0.75), (0.5, 0.5), (1.0, 1.0)] {
            let a = camera.get_ray(s, t);
            let b = camera.get_ray(s, t);
            assert_eq!(a.origin().to_array(), b.origin().to_array());
            assert_eq!(a.direction().to_array(), b.direction().to_array());
        }
    }

    #[test]
    fn test_default_camera_matches_settings() {
        let camera = Camera::default();
        assert_eq!(camera.look_from(), Vec3::new(0.0, 0.0, 1.0));
        assert_eq!(camera.look_at(), Vec3::new(0.0, 0.0, -1.0));
        assert_eq!(camera.vfov(), 20.0);
        assert!((camera.aspect_ratio() - 400.0 / 225.0).abs() < 1e-6);
    }
}
