//! Sparse voxelization of scene geometry.
//!
//! The scene is approximated by an octree whose leaves are either solid
//! (overlapped by at least one triangle) or empty. Rays are marched through
//! the leaves to find where they enter solid or empty space.

mod intersector;
mod tree;

pub use intersector::VoxelTreeIntersector;
pub use tree::{VoxelNode, VoxelTree, DEFAULT_MAX_EXTENT_FRACTION};
