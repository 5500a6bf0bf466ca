// Copyright 2026 the Sylva Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Octree and quadtree facades, and the runtime factory.

use std::fmt;
use std::fs::File;
use std::io::BufWriter;

use tracing::{debug, info};

use crate::config::TreeOptions;
use crate::dimension::{Dimension, Planar, Volumetric};
use crate::entity::Spatial;
use crate::error::{ExportError, TreeError};
use crate::export::DotGraph;
use crate::node::{Filter, NodeId, NodeTree};
use crate::search::Search;
use crate::types::Bound;

/// A self-subdividing tree over a fixed world bound.
///
/// Wraps a [`NodeTree`] together with its [`TreeOptions`]: removals merge when
/// configured to, and radius queries map their floating-point center through the
/// configured scale function first.
pub struct SpatialTree<D: Dimension, E> {
    nodes: NodeTree<D, E>,
    options: TreeOptions,
}

/// 8-way tree over X, Y and Z.
pub type Octree<E> = SpatialTree<Volumetric, E>;

/// 4-way tree over X and Z.
pub type Quadtree<E> = SpatialTree<Planar, E>;

impl<D: Dimension, E> fmt::Debug for SpatialTree<D, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpatialTree")
            .field("nodes", &self.nodes)
            .field("options", &self.options)
            .finish()
    }
}

impl<D: Dimension, E: Spatial + Clone> SpatialTree<D, E> {
    /// Create an empty tree covering `bound`.
    ///
    /// Fails if `max_depth` or `capacity` is zero.
    pub fn new(
        bound: Bound,
        max_depth: usize,
        capacity: usize,
        options: TreeOptions,
    ) -> Result<Self, TreeError> {
        let nodes = NodeTree::new(bound, max_depth, capacity)?;
        debug!(kind = D::NAME, ?bound, max_depth, capacity, "created tree");
        Ok(Self { nodes, options })
    }

    /// Insert an entity. Returns `false` if it lies outside the root bound.
    pub fn add(&mut self, entity: E) -> bool {
        self.nodes.add(entity)
    }

    /// Remove the entity with `id`, merging afterwards when configured to.
    pub fn remove(&mut self, id: i64) -> bool {
        self.nodes.remove(id, self.options.merge_on_remove())
    }

    /// Entities within `radius` of `center` (mapped through the scale function) that
    /// pass at least one filter, or all of them when `filters` is empty.
    pub fn search_by_radius(
        &self,
        center: [f32; 3],
        radius: f32,
        filters: &[Filter<'_, E>],
    ) -> Vec<E> {
        self.nodes
            .find_entities(self.options.scale(center), radius, filters)
    }

    /// Try to collapse the sibling group of leaf `node` into its parent.
    ///
    /// Merges triggered by [`Self::remove`] stop after one level; call this on the
    /// resulting leaf to continue upward.
    pub fn merge_if(&mut self, node: NodeId) -> bool {
        self.nodes.merge_if(node)
    }

    /// Write `octree.dot` or `quadtree.dot` into the configured draw path.
    pub fn to_dot(&self) -> Result<(), ExportError> {
        let dir = self.options.draw_path().ok_or(ExportError::NoOutputTarget)?;
        let path = dir.join(format!("{}.dot", D::NAME));
        let file = BufWriter::new(File::create(&path)?);
        DotGraph::from_tree(&self.nodes).write_to(file)?;
        info!(path = %path.display(), "wrote {} graph", D::NAME);
        Ok(())
    }

    /// Number of stored entities.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether no entity is stored.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The underlying node arena, for traversal and inspection.
    pub fn nodes(&self) -> &NodeTree<D, E> {
        &self.nodes
    }

    /// The options the tree was created with.
    pub fn options(&self) -> &TreeOptions {
        &self.options
    }
}

impl<D: Dimension, E: Spatial + Clone> Search<E> for SpatialTree<D, E> {
    fn add(&mut self, entity: E) -> bool {
        Self::add(self, entity)
    }

    fn remove(&mut self, id: i64) -> bool {
        Self::remove(self, id)
    }

    fn surrounding_entities(
        &self,
        center: [f32; 3],
        radius: f32,
        filters: &[Filter<'_, E>],
    ) -> Vec<E> {
        self.search_by_radius(center, radius, filters)
    }

    fn to_dot(&self) -> Result<(), ExportError> {
        Self::to_dot(self)
    }
}

/// Partitioning scheme picked at runtime.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TreeKind {
    /// 8-way split on X, Y and Z.
    Octree,
    /// 4-way split on X and Z.
    Quadtree,
}

impl TryFrom<u8> for TreeKind {
    type Error = TreeError;

    /// Map a dimension count to a tree kind.
    fn try_from(dimensions: u8) -> Result<Self, Self::Error> {
        match dimensions {
            2 => Ok(Self::Quadtree),
            3 => Ok(Self::Octree),
            n => Err(TreeError::UnsupportedDimension(n)),
        }
    }
}

/// Create a tree of the given kind behind the [`Search`] contract.
///
/// ```
/// use sylva_tree::{Bound, Spatial, TreeKind, TreeOptions, Vec3i, create_spatial_tree};
///
/// #[derive(Clone)]
/// struct Npc(i64, Vec3i);
///
/// impl Spatial for Npc {
///     fn id(&self) -> i64 {
///         self.0
///     }
///     fn location(&self) -> Vec3i {
///         self.1
///     }
/// }
///
/// let bound = Bound::new(Vec3i::ZERO, Vec3i::new(100, 0, 100));
/// let mut tree = create_spatial_tree(TreeKind::Quadtree, bound, 4, 8, TreeOptions::default())?;
/// tree.add(Npc(1, Vec3i::new(10, 0, 10)));
/// tree.add(Npc(2, Vec3i::new(60, 0, 60)));
/// let near = tree.surrounding_entities([12.0, 0.0, 12.0], 5.0, &[]);
/// assert_eq!(near.len(), 1);
/// # Ok::<(), sylva_tree::TreeError>(())
/// ```
pub fn create_spatial_tree<E>(
    kind: TreeKind,
    bound: Bound,
    max_depth: usize,
    capacity: usize,
    options: TreeOptions,
) -> Result<Box<dyn Search<E>>, TreeError>
where
    E: Spatial + Clone + 'static,
{
    Ok(match kind {
        TreeKind::Octree => Box::new(Octree::new(bound, max_depth, capacity, options)?),
        TreeKind::Quadtree => Box::new(Quadtree::new(bound, max_depth, capacity, options)?),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::tests::{Mock, assert_invariants};
    use crate::types::{Vec3i, within_distance_2d, within_distance_3d};
    use proptest::prelude::*;

    fn cube(a: i32, b: i32) -> Bound {
        Bound::new(Vec3i::new(a, a, a), Vec3i::new(b, b, b))
    }

    fn ids(v: &[Mock]) -> Vec<i64> {
        let mut ids: Vec<i64> = v.iter().map(|m| m.id).collect();
        ids.sort_unstable();
        ids
    }

    #[test]
    fn single_entity_radius_search() {
        let mut tree = Octree::new(cube(0, 100), 1, 1, TreeOptions::default()).unwrap();
        assert!(tree.add(Mock::new(1, 10, 10, 10)));
        assert_eq!(ids(&tree.search_by_radius([10.0, 10.0, 10.0], 1.0, &[])), [1]);
        assert!(tree.search_by_radius([1.0, 1.0, 1.0], 1.0, &[]).is_empty());

        assert!(tree.add(Mock::new(2, 20, 20, 20)));
        assert_eq!(ids(&tree.search_by_radius([20.0, 20.0, 20.0], 1.0, &[])), [2]);
    }

    #[test]
    fn construction_errors() {
        let err = Octree::<Mock>::new(cube(0, 10), 0, 1, TreeOptions::default()).unwrap_err();
        assert_eq!(err.to_string(), "maxDepth must be > 0");
        let err = Quadtree::<Mock>::new(cube(0, 10), 1, 0, TreeOptions::default()).unwrap_err();
        assert_eq!(err.to_string(), "capacity must be > 0");
    }

    #[test]
    fn tree_kind_from_dimensions() {
        assert_eq!(TreeKind::try_from(2), Ok(TreeKind::Quadtree));
        assert_eq!(TreeKind::try_from(3), Ok(TreeKind::Octree));
        let err = TreeKind::try_from(4).unwrap_err();
        assert_eq!(err, TreeError::UnsupportedDimension(4));
        assert_eq!(err.to_string(), "unsupported dimension: 4");
    }

    #[test]
    fn factory_builds_both_kinds() {
        for kind in [TreeKind::Octree, TreeKind::Quadtree] {
            let mut tree: Box<dyn Search<Mock>> =
                create_spatial_tree(kind, cube(0, 100), 3, 2, TreeOptions::default()).unwrap();
            assert!(tree.add(Mock::new(1, 50, 0, 50)));
            assert!(!tree.add(Mock::new(2, 500, 0, 50)));
            assert_eq!(tree.surrounding_entities([50.0, 0.0, 50.0], 1.0, &[]).len(), 1);
            assert!(tree.remove(1));
            assert!(!tree.remove(1));
        }
        assert!(
            create_spatial_tree::<Mock>(TreeKind::Octree, cube(0, 1), 1, 0, TreeOptions::default())
                .is_err()
        );
    }

    #[test]
    fn merge_on_remove_returns_root_to_leaf() {
        let options = TreeOptions::default().with_merge_on_remove(true);
        let mut tree = Octree::new(cube(0, 10), 2, 2, options).unwrap();
        for i in 1..=8 {
            assert!(tree.add(Mock::new(i.into(), i, i, i)));
        }
        assert!(!tree.nodes().is_leaf(tree.nodes().root()));
        for i in 1..=8 {
            assert!(tree.remove(i));
        }
        assert!(tree.is_empty());
        assert!(tree.nodes().is_leaf(tree.nodes().root()));
        assert_eq!(tree.nodes().node_count(), 1);
    }

    #[test]
    fn explicit_merge_continues_upward() {
        let options = TreeOptions::default().with_merge_on_remove(true);
        let bound = Bound::new(Vec3i::ZERO, Vec3i::new(100, 0, 100));
        let mut tree = Quadtree::new(bound, 4, 2, options).unwrap();
        tree.add(Mock::new(1, 10, 0, 10));
        tree.add(Mock::new(2, 40, 0, 40));
        tree.add(Mock::new(3, 20, 0, 20));
        let root = tree.nodes().root();
        let quad0 = tree.nodes().node(root).unwrap().children().get_child(0).unwrap();

        assert!(tree.remove(3));
        assert!(tree.remove(2));
        assert!(tree.nodes().is_leaf(quad0));
        assert!(!tree.nodes().is_leaf(root));
        assert!(tree.merge_if(quad0));
        assert!(tree.nodes().is_leaf(root));
        assert_eq!(ids(&tree.search_by_radius([10.0, 0.0, 10.0], 0.0, &[])), [1]);
    }

    #[test]
    fn remove_without_merge_leaves_structure() {
        let mut tree = Octree::new(cube(0, 10), 2, 2, TreeOptions::default()).unwrap();
        for i in 1..=8 {
            tree.add(Mock::new(i.into(), i, i, i));
        }
        for i in 1..=8 {
            assert!(tree.remove(i));
        }
        assert!(tree.is_empty());
        assert!(!tree.nodes().is_leaf(tree.nodes().root()));
    }

    #[test]
    fn scale_maps_query_center() {
        let options = TreeOptions::default().with_scale(|p| {
            Vec3i::new((p[0] * 10.0) as i32, 0, (p[2] * 10.0) as i32)
        });
        let mut tree = Quadtree::new(cube(0, 100), 3, 4, options).unwrap();
        tree.add(Mock::new(1, 50, 0, 50));
        assert_eq!(ids(&tree.search_by_radius([5.0, 0.0, 5.0], 1.0, &[])), [1]);
        assert!(tree.search_by_radius([50.0, 0.0, 50.0], 1.0, &[]).is_empty());
    }

    #[test]
    fn to_dot_without_draw_path_fails() {
        let tree = Octree::<Mock>::new(cube(0, 10), 1, 1, TreeOptions::default()).unwrap();
        assert!(matches!(tree.to_dot(), Err(ExportError::NoOutputTarget)));
        assert_eq!(
            tree.to_dot().unwrap_err().to_string(),
            "draw path not set"
        );
    }

    #[test]
    fn to_dot_writes_named_file() {
        let dir = std::env::temp_dir().join(format!("sylva_dot_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let options = TreeOptions::default().with_draw_path(&dir);
        let mut tree = Quadtree::new(cube(0, 100), 3, 1, options).unwrap();
        tree.add(Mock::new(1, 10, 0, 10));
        tree.add(Mock::new(2, 90, 0, 90));
        tree.to_dot().unwrap();

        let text = std::fs::read_to_string(dir.join("quadtree.dot")).unwrap();
        assert!(text.contains("\"root\" -> \"node_0_1_0\";"));
        assert!(text.contains("\"node_0_1_2\" -> \"entity_2\";"));
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn filters_pass_through_facade() {
        let mut tree = Octree::new(cube(0, 100), 3, 2, TreeOptions::default()).unwrap();
        for i in 1..=5 {
            tree.add(Mock::new(i.into(), 10 + i, 10, 10));
        }
        let odd = |m: &Mock| m.id % 2 == 1;
        assert_eq!(ids(&tree.search_by_radius([10.0, 10.0, 10.0], 10.0, &[&odd])), [1, 3, 5]);
        assert_eq!(tree.search_by_radius([10.0, 10.0, 10.0], 10.0, &[]).len(), 5);
    }

    fn point(range: i32) -> impl Strategy<Value = (i32, i32, i32)> {
        (0..=range, 0..=range, 0..=range)
    }

    proptest! {
        #[test]
        fn octree_search_matches_brute_force(
            points in prop::collection::vec(point(64), 0..80),
            center in point(64),
            radius in 0.0f32..40.0,
            max_depth in 1usize..6,
            capacity in 1usize..5,
        ) {
            let options = TreeOptions::default();
            let mut tree = Octree::new(cube(0, 64), max_depth, capacity, options).unwrap();
            let mocks: Vec<Mock> = points
                .iter()
                .enumerate()
                .map(|(i, &(x, y, z))| Mock::new(i as i64, x, y, z))
                .collect();
            for m in &mocks {
                prop_assert!(tree.add(m.clone()));
            }
            assert_invariants(tree.nodes());

            let c = Vec3i::new(center.0, center.1, center.2);
            let expected: Vec<i64> = mocks
                .iter()
                .filter(|m| within_distance_3d(m.at, c, radius))
                .map(|m| m.id)
                .collect();
            let found = tree.search_by_radius(c.to_f32(), radius, &[]);
            prop_assert_eq!(ids(&found), expected);
        }

        #[test]
        fn quadtree_search_matches_brute_force(
            points in prop::collection::vec(point(64), 0..80),
            center in point(64),
            radius in 0.0f32..40.0,
        ) {
            let bound = Bound::new(Vec3i::ZERO, Vec3i::new(64, 0, 64));
            let mut tree = Quadtree::new(bound, 5, 2, TreeOptions::default()).unwrap();
            let mocks: Vec<Mock> = points
                .iter()
                .enumerate()
                .map(|(i, &(x, y, z))| Mock::new(i as i64, x, y, z))
                .collect();
            for m in &mocks {
                prop_assert!(tree.add(m.clone()));
            }
            assert_invariants(tree.nodes());

            let c = Vec3i::new(center.0, 0, center.2);
            let even = |m: &Mock| m.id % 2 == 0;
            let expected: Vec<i64> = mocks
                .iter()
                .filter(|m| within_distance_2d(m.at, c, radius) && even(m))
                .map(|m| m.id)
                .collect();
            let found = tree.search_by_radius(c.to_f32(), radius, &[&even]);
            prop_assert_eq!(ids(&found), expected);
        }

        #[test]
        fn merge_round_trip_empties_tree(
            points in prop::collection::vec(point(32), 1..60),
            capacity in 1usize..4,
            max_depth in 1usize..5,
        ) {
            let options = TreeOptions::default().with_merge_on_remove(true);
            let mut tree = Octree::new(cube(0, 32), max_depth, capacity, options).unwrap();
            for (i, &(x, y, z)) in points.iter().enumerate() {
                prop_assert!(tree.add(Mock::new(i as i64, x, y, z)));
            }
            prop_assert_eq!(tree.len(), points.len());
            for i in 0..points.len() {
                prop_assert!(tree.remove(i as i64));
                assert_invariants(tree.nodes());
            }
            prop_assert!(tree.is_empty());
            let mut leaves = vec![];
            tree.nodes().traverse(|n| {
                if n.is_leaf() {
                    leaves.push(n.len());
                }
                true
            });
            prop_assert!(leaves.iter().all(|&n| n == 0));
        }
    }
}
