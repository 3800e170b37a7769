use shadekit_math::{Interval, Ray};

use super::{VoxelNode, VoxelTree};

/// Marches rays through the leaves of a [`VoxelTree`].
///
/// Space outside the root of the tree counts as empty.
#[derive(Clone, Copy)]
pub struct VoxelTreeIntersector<'a> {
    tree: &'a VoxelTree,
}

impl<'a> VoxelTreeIntersector<'a> {
    pub fn new(tree: &'a VoxelTree) -> Self {
        Self { tree }
    }

    /// Distance along `ray` to the first point within `ray_t` that lies in
    /// a leaf whose solidity equals `solid`, or `None` if there is none.
    ///
    /// The ray direction does not need to be normalized; distances are in
    /// units of its length.
    pub fn trace(&self, ray: &Ray, ray_t: Interval, solid: bool) -> Option<f32> {
        if ray_t.is_empty() {
            return None;
        }

        let Some(root) = self.tree.root() else {
            return (!solid).then_some(ray_t.min);
        };

        let Some(inside) = root.bbox().clip(ray, ray_t) else {
            return (!solid).then_some(ray_t.min);
        };

        // The ray starts outside the tree, in empty space.
        if !solid && inside.min > ray_t.min {
            return Some(ray_t.min);
        }

        if let Some(t) = trace_node(root, ray, inside, solid) {
            return Some(t);
        }

        // The ray leaves the tree before the end of its extent.
        (!solid && inside.max < ray_t.max).then_some(inside.max)
    }
}

/// `ray_t` is already clipped to the bounding box of `node`.
fn trace_node(node: &VoxelNode, ray: &Ray, ray_t: Interval, solid: bool) -> Option<f32> {
    match node {
        VoxelNode::Leaf { solid: leaf_solid, .. } => (*leaf_solid == solid).then_some(ray_t.min),
        VoxelNode::Interior { children, .. } => {
            let mut order = [(0usize, Interval::EMPTY); 8];
            let mut count = 0;
            for (i, child) in children.iter().enumerate() {
                if let Some(span) = child.bbox().clip(ray, ray_t) {
                    order[count] = (i, span);
                    count += 1;
                }
            }

            // Visit children front to back. Spans only overlap when the ray
            // runs along a splitting plane, so keep going while a later
            // child could still hold a closer hit.
            let order = &mut order[..count];
            order.sort_unstable_by(|a, b| a.1.min.total_cmp(&b.1.min));

            let mut closest: Option<f32> = None;
            for &(i, span) in order.iter() {
                if closest.is_some_and(|t| span.min >= t) {
                    break;
                }
                if let Some(t) = trace_node(&children[i], ray, span, solid) {
                    closest = Some(closest.map_or(t, |c| c.min(t)));
                }
            }
            closest
        }
    }
}
