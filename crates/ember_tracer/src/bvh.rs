//! Bounding Volume Hierarchy (BVH) acceleration structure.
//!
//! A binary tree over an arena of primitives. Nodes refer to primitives by
//! [`PrimitiveId`], so the same arena can also back the scene's light list.

use crate::primitive::{Primitive, PrimitiveId};
use crate::{HitRecord, Hittable, Ray};
use ember_math::{Aabb, Interval};
use rand::RngCore;

/// BVH node - either a branch with two children or a leaf with primitives.
#[derive(Debug, Clone)]
pub enum BvhNode {
    /// Internal node with two children.
    Branch {
        left: Box<BvhNode>,
        right: Box<BvhNode>,
        bbox: Aabb,
    },
    /// Leaf referring to one or two primitives; a single primitive appears
    /// on both sides.
    Leaf {
        left: PrimitiveId,
        right: PrimitiveId,
        bbox: Aabb,
    },
    /// Empty tree.
    Empty,
}

impl BvhNode {
    /// Build a subtree over `ids`, reordering them in place.
    ///
    /// Median split on the longest axis of the range's bounding box, sorting by
    /// the low edge of each primitive's box on that axis.
    fn build(primitives: &[Primitive], ids: &mut [PrimitiveId]) -> Self {
        let bbox = ids.iter().fold(Aabb::EMPTY, |acc, id| {
            Aabb::surrounding(&acc, &primitives[id.index()].bounding_box())
        });

        match ids.len() {
            0 => BvhNode::Empty,
            1 => BvhNode::Leaf {
                left: ids[0],
                right: ids[0],
                bbox,
            },
            2 => BvhNode::Leaf {
                left: ids[0],
                right: ids[1],
                bbox,
            },
            n => {
                let axis = bbox.longest_axis();
                ids.sort_by(|a, b| {
                    let a_min = primitives[a.index()].bounding_box().axis_interval(axis).min;
                    let b_min = primitives[b.index()].bounding_box().axis_interval(axis).min;
                    a_min.total_cmp(&b_min)
                });

                let mid = n / 2;
                let (left_ids, right_ids) = ids.split_at_mut(mid);
                let left = Self::build(primitives, left_ids);
                let right = Self::build(primitives, right_ids);

                BvhNode::Branch {
                    left: Box::new(left),
                    right: Box::new(right),
                    bbox,
                }
            }
        }
    }

    /// Closest hit below this node, resolving leaves against `primitives`.
    pub fn hit<'a>(
        &self,
        primitives: &'a [Primitive],
        ray: &Ray,
        ray_t: Interval,
        rng: &mut dyn RngCore,
    ) -> Option<HitRecord<'a>> {
        match self {
            BvhNode::Empty => None,

            BvhNode::Leaf { left, right, bbox } => {
                if !bbox.hit(ray, ray_t) {
                    return None;
                }

                let hit_left = primitives[left.index()].hit(ray, ray_t, rng);
                if left == right {
                    return hit_left;
                }

                // Only check right up to closest hit
                let right_max = hit_left.as_ref().map_or(ray_t.max, |rec| rec.t);
                let hit_right =
                    primitives[right.index()].hit(ray, Interval::new(ray_t.min, right_max), rng);
                hit_right.or(hit_left)
            }

            BvhNode::Branch { left, right, bbox } => {
                if !bbox.hit(ray, ray_t) {
                    return None;
                }

                let hit_left = left.hit(primitives, ray, ray_t, rng);
                let right_max = hit_left.as_ref().map_or(ray_t.max, |rec| rec.t);
                let hit_right = right.hit(primitives, ray, Interval::new(ray_t.min, right_max), rng);
                hit_right.or(hit_left)
            }
        }
    }

    pub fn bounding_box(&self) -> Aabb {
        match self {
            BvhNode::Empty => Aabb::EMPTY,
            BvhNode::Leaf { bbox, .. } => *bbox,
            BvhNode::Branch { bbox, .. } => *bbox,
        }
    }

    /// Number of levels below and including this node.
    pub fn depth(&self) -> usize {
        match self {
            BvhNode::Empty => 0,
            BvhNode::Leaf { .. } => 1,
            BvhNode::Branch { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }

    /// Number of nodes in this subtree.
    pub fn node_count(&self) -> usize {
        match self {
            BvhNode::Empty => 0,
            BvhNode::Leaf { .. } => 1,
            BvhNode::Branch { left, right, .. } => 1 + left.node_count() + right.node_count(),
        }
    }
}

/// A BVH together with the primitive arena it indexes.
///
/// Built once and read-only afterwards; traversal needs no locking.
#[derive(Clone)]
pub struct Bvh {
    primitives: Vec<Primitive>,
    root: BvhNode,
}

impl Bvh {
    /// Create a BVH over `primitives`. Ids are the positions in the input.
    pub fn new(primitives: Vec<Primitive>) -> Self {
        let mut ids: Vec<PrimitiveId> = (0..primitives.len() as u32).map(PrimitiveId).collect();
        let root = BvhNode::build(&primitives, &mut ids);
        Self { primitives, root }
    }

    pub fn root(&self) -> &BvhNode {
        &self.root
    }

    pub fn primitives(&self) -> &[Primitive] {
        &self.primitives
    }

    pub fn primitive(&self, id: PrimitiveId) -> Option<&Primitive> {
        self.primitives.get(id.index())
    }

    pub fn len(&self) -> usize {
        self.primitives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }
}

impl Hittable for Bvh {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rng: &mut dyn RngCore,
    ) -> Option<HitRecord<'a>> {
        self.root.hit(&self.primitives, ray, ray_t, rng)
    }

    fn bounding_box(&self) -> Aabb {
        self.root.bounding_box()
    }
}
