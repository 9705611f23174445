//! Bounding Volume Hierarchy (BVH) acceleration structure.
//!
//! A binary tree of bounding boxes over the scene's hittables. Each branch splits its
//! objects at the count midpoint along the longest axis of their combined box, so the tree
//! is balanced by count. Built once, immutable afterwards.

use std::cmp::Ordering;
use std::sync::Arc;

use crate::{HitRecord, Hittable, HittableList, Ray};
use lumen_math::{Aabb, Interval};
use rand::RngCore;

/// BVH node - a branch with two children, a leaf with one object, or nothing.
pub enum BvhNode {
    /// Internal node with two children.
    Branch {
        left: Box<BvhNode>,
        right: Box<BvhNode>,
        bbox: Aabb,
    },
    /// A single object.
    Leaf {
        object: Arc<dyn Hittable>,
        bbox: Aabb,
    },
    /// Empty node (for edge cases).
    Empty,
}

impl BvhNode {
    /// Build a BVH over the objects of a list.
    pub fn new(list: HittableList) -> Self {
        Self::from_objects(list.into_objects())
    }

    /// Create a BVH from a list of hittable objects.
    pub fn from_objects(mut objects: Vec<Arc<dyn Hittable>>) -> Self {
        if objects.is_empty() {
            return BvhNode::Empty;
        }

        let node = Self::build(&mut objects);
        log::debug!(
            "Built BVH over {} objects: {} nodes, depth {}",
            objects.len(),
            node.node_count(),
            node.depth()
        );
        node
    }

    /// Recursive construction over a non-empty span, sorted in place.
    fn build(objects: &mut [Arc<dyn Hittable>]) -> Self {
        let bbox = objects.iter().fold(Aabb::EMPTY, |acc, obj| {
            Aabb::surrounding(&acc, &obj.bounding_box())
        });

        if objects.len() == 1 {
            return BvhNode::Leaf {
                object: objects[0].clone(),
                bbox,
            };
        }

        // Two objects become one leaf each as they are
        if objects.len() > 2 {
            let axis = bbox.longest_axis();
            objects.sort_by(|a, b| box_compare(a.as_ref(), b.as_ref(), axis));
        }

        let mid = objects.len() / 2;
        let (lower, upper) = objects.split_at_mut(mid);

        BvhNode::Branch {
            left: Box::new(Self::build(lower)),
            right: Box::new(Self::build(upper)),
            bbox,
        }
    }

    /// Total number of nodes, branches and leaves.
    pub fn node_count(&self) -> usize {
        match self {
            BvhNode::Empty => 0,
            BvhNode::Leaf { .. } => 1,
            BvhNode::Branch { left, right, .. } => 1 + left.node_count() + right.node_count(),
        }
    }

    /// Number of nodes on the longest root-to-leaf path.
    pub fn depth(&self) -> usize {
        match self {
            BvhNode::Empty => 0,
            BvhNode::Leaf { .. } => 1,
            BvhNode::Branch { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }
}

/// Order by the low end of each box along `axis`.
fn box_compare(a: &dyn Hittable, b: &dyn Hittable, axis: usize) -> Ordering {
    let a_min = a.bounding_box().axis_interval(axis).min;
    let b_min = b.bounding_box().axis_interval(axis).min;
    a_min.partial_cmp(&b_min).unwrap_or(Ordering::Equal)
}

impl Hittable for BvhNode {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rec: &mut HitRecord<'a>,
        rng: &mut dyn RngCore,
    ) -> bool {
        match self {
            BvhNode::Empty => false,

            BvhNode::Leaf { object, bbox } => {
                if !bbox.hit(ray, ray_t) {
                    return false;
                }
                object.hit(ray, ray_t, rec, rng)
            }

            BvhNode::Branch { left, right, bbox } => {
                if !bbox.hit(ray, ray_t) {
                    return false;
                }

                let hit_left = left.hit(ray, ray_t, rec, rng);

                // Only check right up to closest hit
                let right_max = if hit_left { rec.t } else { ray_t.max };
                let hit_right = right.hit(ray, Interval::new(ray_t.min, right_max), rec, rng);

                hit_left || hit_right
            }
        }
    }

    fn bounding_box(&self) -> Aabb {
        match self {
            BvhNode::Empty => Aabb::EMPTY,
            BvhNode::Leaf { bbox, .. } => *bbox,
            BvhNode::Branch { bbox, .. } => *bbox,
        }
    }
}
