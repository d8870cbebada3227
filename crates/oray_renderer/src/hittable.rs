//! Hittable trait and HitRecord for ray-object intersection.

use crate::Material;
use oray_math::{Aabb, Interval, Ray, Vec3};
use std::sync::Arc;

/// Record of a ray-object intersection.
///
/// A plain value produced by a single `hit` call; it borrows the struck
/// material from the geometry for as long as the scene is alive.
#[derive(Clone, Copy)]
pub struct HitRecord<'a> {
    /// Point of intersection
    pub p: Vec3,
    /// Surface normal at intersection (always points against ray)
    pub normal: Vec3,
    /// Material at the intersection point
    pub material: &'a dyn Material,
    /// Surface coordinates, both in [0, 1]
    pub u: f32,
    pub v: f32,
    /// Parameter t where the intersection occurs
    pub t: f32,
    /// Whether the ray hit the front face (outside) of the surface
    pub front_face: bool,
}

impl<'a> HitRecord<'a> {
    /// Build a record for a hit at parameter `t`, orienting the normal
    /// against the incoming ray.
    pub fn new(
        ray: &Ray,
        t: f32,
        outward_normal: Vec3,
        (u, v): (f32, f32),
        material: &'a dyn Material,
    ) -> Self {
        let mut rec = Self {
            p: ray.at(t),
            normal: outward_normal,
            material,
            u,
            v,
            t,
            front_face: true,
        };
        rec.set_face_normal(ray, outward_normal);
        rec
    }

    /// Set the face normal based on ray direction and outward normal.
    ///
    /// The normal is always stored pointing against the ray direction,
    /// so we need to track whether we hit the front or back face.
    pub fn set_face_normal(&mut self, ray: &Ray, outward_normal: Vec3) {
        self.front_face = ray.direction().dot(outward_normal) < 0.0;
        self.normal = if self.front_face {
            outward_normal
        } else {
            -outward_normal
        };
    }
}

/// Trait for objects that can be hit by rays.
///
/// Implemented by primitives, the flat [`HittableList`] and the BVH, which
/// are interchangeable wherever a scene is expected.
pub trait Hittable: Send + Sync {
    /// Closest intersection with `t` inside `ray_t` (bounds inclusive).
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'a>>;

    /// Axis-aligned bounds, or `None` for unbounded/empty geometry.
    fn bounding_box(&self) -> Option<Aabb>;

    /// Material owned by this object. Aggregates have none.
    fn material(&self) -> Option<Arc<dyn Material>> {
        None
    }
}

/// A list of hittable objects, searched linearly.
#[derive(Clone, Default)]
pub struct HittableList {
    objects: Vec<Arc<dyn Hittable>>,
}

impl HittableList {
    /// Create a new empty hittable list.
    pub fn new() -> Self {
        Self {
            objects: Vec::new(),
        }
    }

    /// Add an object to the list.
    pub fn add(&mut self, object: Arc<dyn Hittable>) {
        self.objects.push(object);
    }

    /// Remove and return the object at `index`.
    pub fn remove(&mut self, index: usize) -> Arc<dyn Hittable> {
        self.objects.remove(index)
    }

    /// Clear all objects from the list.
    pub fn clear(&mut self) {
        self.objects.clear();
    }

    /// Get the number of objects.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Check if the list is empty.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Arc<dyn Hittable>> {
        self.objects.get(index)
    }

    pub fn objects(&self) -> &[Arc<dyn Hittable>] {
        &self.objects
    }
}

impl FromIterator<Arc<dyn Hittable>> for HittableList {
    fn from_iter<I: IntoIterator<Item = Arc<dyn Hittable>>>(iter: I) -> Self {
        Self {
            objects: iter.into_iter().collect(),
        }
    }
}

impl Hittable for HittableList {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'a>> {
        let mut closest = None;
        let mut closest_so_far = ray_t.max;

        for object in &self.objects {
            if let Some(rec) = object.hit(ray, ray_t.with_max(closest_so_far)) {
                closest_so_far = rec.t;
                closest = Some(rec);
            }
        }

        closest
    }

    fn bounding_box(&self) -> Option<Aabb> {
        let mut objects = self.objects.iter();
        let first = objects.next()?.bounding_box()?;
        objects.try_fold(first, |acc, object| {
            object
                .bounding_box()
                .map(|bbox| Aabb::surrounding(&acc, &bbox))
        })
    }
}
