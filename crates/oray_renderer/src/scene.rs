//! Scene snapshot: the named objects a render pass is built from.

use crate::{BvhNode, Dielectric, Hittable, HittableList, Lambertian, Metal, Sphere};
use oray_math::Vec3;
use rand::RngCore;
use std::sync::Arc;
use std::time::Instant;

/// A piece of geometry with a display name.
#[derive(Clone)]
pub struct SceneObject {
    pub name: String,
    pub geometry: Arc<dyn Hittable>,
}

impl SceneObject {
    pub fn new(name: impl Into<String>, geometry: Arc<dyn Hittable>) -> Self {
        Self {
            name: name.into(),
            geometry,
        }
    }
}

/// An owned collection of scene objects.
///
/// The scene is edited between renders; each render builds a fresh
/// acceleration structure from it with [`Scene::build_world`].
#[derive(Clone, Default)]
pub struct Scene {
    objects: Vec<SceneObject>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ground plus three spheres: matte blue, glass and polished gold.
    pub fn default_scene() -> Self {
        let mut scene = Self::new();
        scene.add(
            "Ground",
            Arc::new(Sphere::new(
                Vec3::new(0.0, -100.5, -1.0),
                100.0,
                Arc::new(Lambertian::from_color(Vec3::new(0.8, 0.8, 0.0))),
            )),
        );
        scene.add(
            "Center Sphere",
            Arc::new(Sphere::new(
                Vec3::new(0.0, 0.0, -1.0),
                0.5,
                Arc::new(Lambertian::from_color(Vec3::new(0.1, 0.2, 0.5))),
            )),
        );
        scene.add(
            "Glass Sphere",
            Arc::new(Sphere::new(
                Vec3::new(-1.0, 0.0, -1.0),
                0.5,
                Arc::new(Dielectric::new(1.5)),
            )),
        );
        scene.add(
            "Metal Sphere",
            Arc::new(Sphere::new(
                Vec3::new(1.0, 0.0, -1.0),
                0.5,
                Arc::new(Metal::new(Vec3::new(0.8, 0.6, 0.2), 0.0)),
            )),
        );
        scene
    }

    /// Add an object and return its index.
    pub fn add(&mut self, name: impl Into<String>, geometry: Arc<dyn Hittable>) -> usize {
        self.objects.push(SceneObject::new(name, geometry));
        self.objects.len() - 1
    }

    /// Remove the object at `index`, if there is one.
    pub fn remove(&mut self, index: usize) -> Option<SceneObject> {
        (index < self.objects.len()).then(|| self.objects.remove(index))
    }

    pub fn clear(&mut self) {
        self.objects.clear();
    }

    /// Replace the contents with the default scene.
    pub fn reset(&mut self) {
        *self = Self::default_scene();
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&SceneObject> {
        self.objects.get(index)
    }

    /// First object with the given name.
    pub fn find(&self, name: &str) -> Option<&SceneObject> {
        self.objects.iter().find(|object| object.name == name)
    }

    pub fn objects(&self) -> &[SceneObject] {
        &self.objects
    }

    /// Flat list of the scene geometry.
    pub fn to_list(&self) -> HittableList {
        self.objects
            .iter()
            .map(|object| object.geometry.clone())
            .collect()
    }

    /// Build the structure a render pass traces against.
    ///
    /// Returns a BVH over the scene, or an empty list for an empty scene.
    pub fn build_world(&self, rng: &mut dyn RngCore) -> Arc<dyn Hittable> {
        let start = Instant::now();
        let list = self.to_list();

        match BvhNode::from_list(&list, rng) {
            Some(bvh) => {
                log::info!(
                    "Built BVH over {} objects: {} nodes, depth {} ({:.2?})",
                    list.len(),
                    bvh.node_count(),
                    bvh.depth(),
                    start.elapsed()
                );
                Arc::new(bvh)
            }
            None => {
                log::info!("Scene is empty; rendering the background only");
                Arc::new(list)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oray_math::{Interval, Ray};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_default_scene() {
        let scene = Scene::default_scene();
        assert_eq!(scene.len(), 4);
        assert_eq!(scene.get(0).map(|o| o.name.as_str()), Some("Ground"));
        assert!(scene.find("Glass Sphere").is_some());
        assert!(scene.find("Teapot").is_none());
    }

    #[test]
    fn test_add_remove_reset() {
        let mut scene = Scene::new();
        assert!(scene.is_empty());

        let index = scene.add(
            "Ball",
            Arc::new(Sphere::new(Vec3::ZERO, 1.0, Arc::new(Dielectric::new(1.3)))),
        );
        assert_eq!(index, 0);
        assert_eq!(scene.len(), 1);

        assert!(scene.remove(5).is_none());
        let removed = scene.remove(0).expect("object exists");
        assert_eq!(removed.name, "Ball");
        assert!(scene.is_empty());

        scene.reset();
        assert_eq!(scene.len(), 4);
        scene.clear();
        assert!(scene.is_empty());
    }

    #[test]
    fn test_build_world_matches_list() {
        let scene = Scene::default_scene();
        let mut rng = StdRng::seed_from_u64(9);
        let world = scene.build_world(&mut rng);
        let list = scene.to_list();

        let interval = Interval::new(0.001, f32::INFINITY);
        for direction in [
            Vec3::new(0.0, 0.0, -1.0),
            Vec3::new(-1.0, 0.0, -1.0),
            Vec3::new(1.0, 0.0, -1.0),
            Vec3::new(0.0, -1.0, -1.0),
            Vec3::new(0.0, 1.0, 0.0),
        ] {
            let ray = Ray::new(Vec3::new(0.0, 0.0, 1.0), direction);
            let a = world.hit(&ray, interval).map(|rec| rec.t);
            let b = list.hit(&ray, interval).map(|rec| rec.t);
            assert_eq!(a, b);
        }
    }

    #[test]
    fn test_build_world_empty_scene() {
        let mut rng = StdRng::seed_from_u64(1);
        let world = Scene::new().build_world(&mut rng);
        let ray = Ray::new(Vec3::ZERO, Vec3::Z);
        assert!(world.hit(&ray, Interval::new(0.001, f32::INFINITY)).is_none());
        assert!(world.bounding_box().is_none());
    }
}
