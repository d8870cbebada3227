//! Bounding Volume Hierarchy (BVH) acceleration structure.
//!
//! A binary tree over the scene's objects, rebuilt from scratch before every
//! render pass and read-only afterwards, so any number of worker threads can
//! traverse it without locking.
//!
//! Each node splits along a uniformly random axis. Subsets larger than two
//! are sorted by their boxes' minimum corner on that axis and cut at the
//! index midpoint. Node boxes are computed once during the build and never
//! refit; when geometry changes the whole tree is rebuilt.
//!
//! Every object handed to the builder must report a bounding box. An object
//! without one leaves the enclosing node boxes undefined (`None`); such nodes
//! are never pruned, which keeps results correct but gives up the speedup.

use crate::{HitRecord, Hittable, HittableList};
use oray_math::{Aabb, Interval, Ray};
use rand::{Rng, RngCore};
use std::cmp::Ordering;
use std::sync::Arc;

/// One of the two child slots of a [`BvhNode`].
pub enum BvhChild {
    /// Internal subtree.
    Node(Box<BvhNode>),
    /// Scene object. A single-object node stores the same object in both slots.
    Leaf(Arc<dyn Hittable>),
}

/// BVH node with exactly two children and the box enclosing both.
pub struct BvhNode {
    left: BvhChild,
    right: BvhChild,
    bbox: Option<Aabb>,
}

impl BvhNode {
    /// Build a BVH over the objects of a list.
    ///
    /// Returns `None` for an empty list; callers render the (empty) list
    /// directly in that case.
    pub fn from_list(list: &HittableList, rng: &mut dyn RngCore) -> Option<Self> {
        Self::new(list.objects().to_vec(), rng)
    }

    /// Build a BVH from a list of hittable objects.
    pub fn new(mut objects: Vec<Arc<dyn Hittable>>, rng: &mut dyn RngCore) -> Option<Self> {
        if objects.is_empty() {
            return None;
        }
        if objects.iter().any(|o| o.bounding_box().is_none()) {
            log::warn!("BVH built over geometry without a bounding box; affected nodes will not prune");
        }
        Some(Self::build(&mut objects, rng))
    }

    /// Recursive BVH construction over a non-empty slice.
    fn build(objects: &mut [Arc<dyn Hittable>], rng: &mut dyn RngCore) -> Self {
        let axis = rng.gen_range(0..3);
        let compare = |a: &Arc<dyn Hittable>, b: &Arc<dyn Hittable>| box_compare(a, b, axis);

        let (left, right) = match objects.len() {
            1 => (
                BvhChild::Leaf(objects[0].clone()),
                BvhChild::Leaf(objects[0].clone()),
            ),
            2 => {
                let (a, b) = (&objects[0], &objects[1]);
                if compare(a, b) == Ordering::Less {
                    (BvhChild::Leaf(a.clone()), BvhChild::Leaf(b.clone()))
                } else {
                    (BvhChild::Leaf(b.clone()), BvhChild::Leaf(a.clone()))
                }
            }
            len => {
                objects.sort_by(compare);
                let (lower, upper) = objects.split_at_mut(len / 2);
                (
                    BvhChild::Node(Box::new(Self::build(lower, rng))),
                    BvhChild::Node(Box::new(Self::build(upper, rng))),
                )
            }
        };

        let bbox = match (left.bounding_box(), right.bounding_box()) {
            (Some(l), Some(r)) => Some(Aabb::surrounding(&l, &r)),
            _ => None,
        };

        Self { left, right, bbox }
    }

    pub fn left(&self) -> &BvhChild {
        &self.left
    }

    pub fn right(&self) -> &BvhChild {
        &self.right
    }

    /// Number of node levels, counting this one.
    pub fn depth(&self) -> usize {
        1 + self.left.depth().max(self.right.depth())
    }

    /// Number of internal nodes in the tree.
    pub fn node_count(&self) -> usize {
        1 + self.left.node_count() + self.right.node_count()
    }
}

impl BvhChild {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'a>> {
        match self {
            BvhChild::Node(node) => node.hit(ray, ray_t),
            BvhChild::Leaf(object) => object.hit(ray, ray_t),
        }
    }

    pub fn bounding_box(&self) -> Option<Aabb> {
        match self {
            BvhChild::Node(node) => node.bbox,
            BvhChild::Leaf(object) => object.bounding_box(),
        }
    }

    fn depth(&self) -> usize {
        match self {
            BvhChild::Node(node) => node.depth(),
            BvhChild::Leaf(_) => 0,
        }
    }

    fn node_count(&self) -> usize {
        match self {
            BvhChild::Node(node) => node.node_count(),
            BvhChild::Leaf(_) => 0,
        }
    }

    fn is_same_leaf(&self, other: &BvhChild) -> bool {
        match (self, other) {
            (BvhChild::Leaf(a), BvhChild::Leaf(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

/// Order two objects by the minimum corner of their boxes along `axis`.
fn box_compare(a: &Arc<dyn Hittable>, b: &Arc<dyn Hittable>, axis: usize) -> Ordering {
    match (a.bounding_box(), b.bounding_box()) {
        (Some(box_a), Some(box_b)) => box_a.min[axis]
            .partial_cmp(&box_b.min[axis])
            .unwrap_or(Ordering::Equal),
        _ => Ordering::Equal,
    }
}

impl Hittable for BvhNode {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'a>> {
        if let Some(bbox) = &self.bbox {
            if !bbox.hit(ray, ray_t) {
                return None;
            }
        }

        let hit_left = self.left.hit(ray, ray_t);
        if self.left.is_same_leaf(&self.right) {
            return hit_left;
        }

        // Only check right up to closest hit
        let right_max = hit_left.as_ref().map_or(ray_t.max, |rec| rec.t);
        let hit_right = self.right.hit(ray, ray_t.with_max(right_max));

        hit_right.or(hit_left)
    }

    fn bounding_box(&self) -> Option<Aabb> {
        self.bbox
    }
}
