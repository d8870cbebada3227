//! Sphere primitive for ray tracing.

use crate::{
    hittable::{HitRecord, Hittable},
    Material,
};
use oray_math::{Aabb, Interval, Ray, Vec3};
use std::f32::consts::PI;
use std::sync::Arc;

/// A sphere primitive.
pub struct Sphere {
    center: Vec3,
    radius: f32,
    material: Arc<dyn Material>,
}

impl Sphere {
    /// Create a new sphere. Negative radii are clamped to zero.
    pub fn new(center: Vec3, radius: f32, material: Arc<dyn Material>) -> Self {
        Self {
            center,
            radius: radius.max(0.0),
            material,
        }
    }

    pub fn center(&self) -> Vec3 {
        self.center
    }

    pub fn set_center(&mut self, center: Vec3) {
        self.center = center;
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn set_radius(&mut self, radius: f32) {
        self.radius = radius.max(0.0);
    }

    pub fn set_material(&mut self, material: Arc<dyn Material>) {
        self.material = material;
    }

    /// Get the UV coordinates for a point on the unit sphere.
    ///
    /// u: angle around the Y axis from X=-1, v: angle from Y=-1 to Y=+1.
    /// (1,0,0) -> (0.50, 0.50), (0,1,0) -> (0.50, 1.00), (0,0,1) -> (0.25, 0.50)
    fn get_sphere_uv(p: Vec3) -> (f32, f32) {
        let theta = (-p.y).clamp(-1.0, 1.0).acos();
        let phi = (-p.z).atan2(p.x) + PI;

        (phi / (2.0 * PI), theta / PI)
    }
}

impl Hittable for Sphere {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'a>> {
        let oc = self.center - ray.origin();
        let a = ray.direction().length_squared();
        let h = ray.direction().dot(oc);
        let c = oc.length_squared() - self.radius * self.radius;

        let discriminant = h * h - a * c;
        if discriminant < 0.0 {
            return None;
        }

        let sqrtd = discriminant.sqrt();

        // Find the nearest root in the acceptable range
        let mut root = (h - sqrtd) / a;
        if !ray_t.contains(root) {
            root = (h + sqrtd) / a;
            if !ray_t.contains(root) {
                return None;
            }
        }

        let outward_normal = (ray.at(root) - self.center) / self.radius;
        Some(HitRecord::new(
            ray,
            root,
            outward_normal,
            Self::get_sphere_uv(outward_normal),
            self.material.as_ref(),
        ))
    }

    fn bounding_box(&self) -> Option<Aabb> {
        let rvec = Vec3::splat(self.radius);
        Some(Aabb::new(self.center - rvec, self.center + rvec))
    }

    fn material(&self) -> Option<Arc<dyn Material>> {
        Some(self.material.clone())
    }
}
