//! Tree construction and occlusion queries.

use sightcast_math::{Aabb3, Point3, Triangle};

use crate::error::{BuildError, Result};

/// Maximum number of triangles stored in a leaf.
pub const LEAF_SIZE: usize = 3;

/// A kd-tree node - either a leaf owning a small triangle group or an
/// internal node with exactly two children.
#[derive(Debug, Clone, PartialEq)]
pub enum KdNode {
    /// Leaf node holding 1 to [`LEAF_SIZE`] triangles.
    Leaf {
        /// Axis-aligned bounding box of this node.
        aabb: Aabb3,
        /// Triangles in this leaf, in construction order.
        triangles: Vec<Triangle>,
    },
    /// Internal node with two children and no triangles of its own.
    Internal {
        /// Axis-aligned bounding box of this node.
        aabb: Aabb3,
        /// Split axis (0 = x, 1 = y, 2 = z), cycling with depth.
        axis: usize,
        /// Child built from the first half of the sorted sequence.
        left: Box<KdNode>,
        /// Child built from the second half of the sorted sequence.
        right: Box<KdNode>,
    },
}

impl KdNode {
    /// Bounding box of this node.
    pub fn aabb(&self) -> &Aabb3 {
        match self {
            KdNode::Leaf { aabb, .. } => aabb,
            KdNode::Internal { aabb, .. } => aabb,
        }
    }
}

/// Static occlusion index over a triangle list.
///
/// Built once, then immutable: no query mutates any node, so a built tree
/// can be read concurrently from any number of threads.
#[derive(Debug, Clone, Default)]
pub struct KdTree {
    root: Option<KdNode>,
    /// The original flat list, insertion order, kept for the brute-force
    /// validation query.
    triangles: Vec<Triangle>,
}

impl KdTree {
    /// Build the index from a triangle list.
    ///
    /// Fails with [`BuildError::EmptyGeometry`] if the list is empty.
    /// Construction is deterministic: the same input order always yields
    /// the same tree shape.
    pub fn build(triangles: Vec<Triangle>) -> Result<Self> {
        if triangles.is_empty() {
            return Err(BuildError::EmptyGeometry);
        }
        let mut work = triangles.clone();
        let root = build_node(&mut work, 0);
        Ok(Self {
            root: Some(root),
            triangles,
        })
    }

    /// Test whether any triangle blocks the open segment from `origin` to
    /// `target`, returning the first one found.
    ///
    /// First-hit, not nearest-hit: leaves are scanned in stored order and
    /// the left child is always descended before the right, short-circuiting
    /// on the first hit. An empty tree answers `None`; that is not an error.
    pub fn occludes(&self, origin: &Point3, target: &Point3) -> Option<&Triangle> {
        self.root
            .as_ref()
            .and_then(|root| query_node(root, origin, target))
    }

    /// Brute-force variant of [`occludes`](Self::occludes) over the flat
    /// triangle list, for validating the tree traversal.
    ///
    /// Agrees with the tree query on hit/no-hit for any input, though the
    /// reported triangle may differ when several intersect.
    pub fn occludes_linear(&self, origin: &Point3, target: &Point3) -> Option<&Triangle> {
        self.triangles
            .iter()
            .find(|tri| tri.intersects_segment(origin, target))
    }

    /// The root node, if the tree is non-empty.
    pub fn root(&self) -> Option<&KdNode> {
        self.root.as_ref()
    }

    /// The flat triangle list the tree was built from, in insertion order.
    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }
}

/// Recursively build a node from a non-empty triangle slice.
///
/// The slice is reordered in place by the split sort; triangle contents
/// are never modified.
fn build_node(triangles: &mut [Triangle], depth: usize) -> KdNode {
    let axis = depth % 3;

    let mut aabb = Aabb3::empty();
    for tri in triangles.iter() {
        for p in tri.vertices() {
            aabb.include_point(&p);
        }
    }

    if triangles.len() <= LEAF_SIZE {
        return KdNode::Leaf {
            aabb,
            triangles: triangles.to_vec(),
        };
    }

    // Stable descending sort by centroid: ties keep their input order,
    // which keeps the tree shape reproducible. total_cmp stays total even
    // for NaN centroids from degenerate coordinates.
    triangles.sort_by(|a, b| b.centroid_on(axis).total_cmp(&a.centroid_on(axis)));

    let mid = triangles.len() / 2;
    let (first_half, second_half) = triangles.split_at_mut(mid);

    KdNode::Internal {
        aabb,
        axis,
        left: Box::new(build_node(first_half, depth + 1)),
        right: Box::new(build_node(second_half, depth + 1)),
    }
}

/// Recursive descent: prune on the node box, then first-hit in leaves,
/// left child before right in internal nodes.
fn query_node<'a>(node: &'a KdNode, origin: &Point3, target: &Point3) -> Option<&'a Triangle> {
    if !node.aabb().intersects_segment(origin, target) {
        return None;
    }

    match node {
        KdNode::Leaf { triangles, .. } => triangles
            .iter()
            .find(|tri| tri.intersects_segment(origin, target)),
        KdNode::Internal { left, right, .. } => {
            query_node(left, origin, target).or_else(|| query_node(right, origin, target))
        }
    }
}
