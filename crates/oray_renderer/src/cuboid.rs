//! Axis-aligned box primitive.

use crate::{
    hittable::{HitRecord, Hittable},
    Material,
};
use oray_math::{Aabb, Interval, Ray, Vec3};
use std::sync::Arc;

/// A solid axis-aligned box between two corners.
pub struct Cuboid {
    min: Vec3,
    max: Vec3,
    material: Arc<dyn Material>,
}

/// One of the six faces, as (axis, max side?).
#[derive(Debug, Clone, Copy, PartialEq)]
struct Face {
    axis: usize,
    is_max: bool,
}

impl Cuboid {
    /// Create a box spanning two opposite corners, given in any order.
    pub fn new(a: Vec3, b: Vec3, material: Arc<dyn Material>) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
            material,
        }
    }

    /// Create a box from its center and edge lengths.
    pub fn from_center_size(center: Vec3, size: Vec3, material: Arc<dyn Material>) -> Self {
        let half = size.abs() * 0.5;
        Self::new(center - half, center + half, material)
    }

    pub fn min(&self) -> Vec3 {
        self.min
    }

    pub fn max(&self) -> Vec3 {
        self.max
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Move and resize the box in place.
    pub fn set_transform(&mut self, center: Vec3, size: Vec3) {
        let half = size.abs() * 0.5;
        self.min = center - half;
        self.max = center + half;
    }

    pub fn set_material(&mut self, material: Arc<dyn Material>) {
        self.material = material;
    }

    /// The face whose plane lies closest to `p`.
    fn closest_face(&self, p: Vec3) -> Face {
        let mut best = Face { axis: 0, is_max: false };
        let mut best_dist = f32::INFINITY;
        for axis in 0..3 {
            for (is_max, bound) in [(false, self.min[axis]), (true, self.max[axis])] {
                let dist = (p[axis] - bound).abs();
                if dist < best_dist {
                    best_dist = dist;
                    best = Face { axis, is_max };
                }
            }
        }
        best
    }

    /// Outward normal and surface coordinates for a point on `face`.
    ///
    /// Each face is parameterized so that, seen from outside, u runs left
    /// to right and v bottom to top; opposite faces are mirrored.
    fn face_frame(&self, face: Face, p: Vec3) -> (Vec3, (f32, f32)) {
        let extent = self.size().max(Vec3::splat(f32::MIN_POSITIVE));
        let local = ((p - self.min) / extent).clamp(Vec3::ZERO, Vec3::ONE);

        let sign = if face.is_max { 1.0 } else { -1.0 };
        let mut normal = Vec3::ZERO;
        normal[face.axis] = sign;

        let uv = match (face.axis, face.is_max) {
            (0, false) => (local.z, local.y),
            (0, true) => (1.0 - local.z, local.y),
            (1, false) => (local.x, local.z),
            (1, true) => (local.x, 1.0 - local.z),
            (_, false) => (1.0 - local.x, local.y),
            (_, true) => (local.x, local.y),
        };

        (normal, uv)
    }
}

impl Hittable for Cuboid {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'a>> {
        // Slab method: entry is the latest near plane, exit the earliest far plane
        let mut t_enter = f32::NEG_INFINITY;
        let mut t_exit = f32::INFINITY;
        for axis in 0..3 {
            let inv_d = 1.0 / ray.direction()[axis];
            let mut t0 = (self.min[axis] - ray.origin()[axis]) * inv_d;
            let mut t1 = (self.max[axis] - ray.origin()[axis]) * inv_d;
            if inv_d < 0.0 {
                std::mem::swap(&mut t0, &mut t1);
            }
            t_enter = t_enter.max(t0);
            t_exit = t_exit.min(t1);
            if t_exit < t_enter {
                return None;
            }
        }

        // Entry surface if it is in range, otherwise the exit surface (ray
        // starting inside the box, e.g. refracted through glass)
        let t = if ray_t.contains(t_enter) {
            t_enter
        } else if ray_t.contains(t_exit) {
            t_exit
        } else {
            return None;
        };

        let p = ray.at(t);
        let (outward_normal, uv) = self.face_frame(self.closest_face(p), p);
        Some(HitRecord::new(ray, t, outward_normal, uv, self.material.as_ref()))
    }

    fn bounding_box(&self) -> Option<Aabb> {
        Some(Aabb::new(self.min, self.max))
    }

    fn material(&self) -> Option<Arc<dyn Material>> {
        Some(self.material.clone())
    }
}
