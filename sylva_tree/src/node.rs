// Copyright 2026 the Sylva Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Arena-backed recursive tree: insertion with subdivision, removal with optional
//! merge, and pruned radius search.
//!
//! Nodes live in a slab owned by [`NodeTree`] and refer to each other through
//! generational [`NodeId`]s: parents own their children by slot, children point back
//! at their parent by handle only.

use std::fmt;

use tracing::{debug, trace, warn};

use crate::dimension::{ChildSlots, Dimension};
use crate::entities::EntityList;
use crate::entity::Spatial;
use crate::error::TreeError;
use crate::types::{Bound, Vec3i};

/// A search predicate. A search keeps entities accepted by at least one filter.
pub type Filter<'a, E> = &'a dyn Fn(&E) -> bool;

/// Generational handle of a tree node.
///
/// Merging frees nodes and subdividing may reuse their slots; a handle to a freed
/// node never aliases the node that later takes its slot because the generation differs.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(u32, u32);

impl NodeId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }
}

#[derive(Clone, Debug)]
struct Node<D: Dimension, E> {
    generation: u32,
    depth: usize,
    index: usize,
    bound: Bound,
    parent: Option<NodeId>,
    children: ChildSlots<D>,
    entities: EntityList<E>,
}

impl<D: Dimension, E> Node<D, E> {
    fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// The recursive spatial tree behind [`SpatialTree`](crate::SpatialTree).
///
/// Every node is either a leaf holding entities or an internal node whose children
/// exactly tile its bound. A leaf holds at most `capacity` entities unless it sits on
/// the last divisible level (`depth == max_depth - 1`), where it grows without bound.
///
/// Not thread-safe for mutation: callers needing shared access must wrap the whole tree
/// in a lock.
pub struct NodeTree<D: Dimension, E> {
    nodes: Vec<Option<Node<D, E>>>,
    generations: Vec<u32>,
    free_list: Vec<usize>,
    root: NodeId,
    max_depth: usize,
    capacity: usize,
    len: usize,
}

impl<D: Dimension, E> fmt::Debug for NodeTree<D, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let alive = self.nodes.iter().filter(|n| n.is_some()).count();
        f.debug_struct("NodeTree")
            .field("kind", &D::NAME)
            .field("max_depth", &self.max_depth)
            .field("capacity", &self.capacity)
            .field("entities", &self.len)
            .field("nodes_alive", &alive)
            .field("free_list", &self.free_list.len())
            .finish_non_exhaustive()
    }
}

/// Read-only view of one node, handed out by [`NodeTree::node`] and [`NodeTree::traverse`].
pub struct NodeRef<'a, D: Dimension, E> {
    id: NodeId,
    node: &'a Node<D, E>,
}

impl<D: Dimension, E> Clone for NodeRef<'_, D, E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<D: Dimension, E> Copy for NodeRef<'_, D, E> {}

impl<D: Dimension, E> fmt::Debug for NodeRef<'_, D, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRef")
            .field("id", &self.id)
            .field("depth", &self.node.depth)
            .field("index", &self.node.index)
            .field("bound", &self.node.bound)
            .field("leaf", &self.node.is_leaf())
            .finish_non_exhaustive()
    }
}

impl<'a, D: Dimension, E: Spatial> NodeRef<'a, D, E> {
    /// Handle of this node.
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Depth below the root (the root is 0).
    pub fn depth(&self) -> usize {
        self.node.depth
    }

    /// Slot of this node in its parent's child array (0 for the root).
    pub fn index(&self) -> usize {
        self.node.index
    }

    /// Parent handle, `None` for the root.
    pub fn parent(&self) -> Option<NodeId> {
        self.node.parent
    }

    /// Region covered by this node.
    pub fn bound(&self) -> &'a Bound {
        &self.node.bound
    }

    /// Whether the node stores entities rather than children.
    pub fn is_leaf(&self) -> bool {
        self.node.is_leaf()
    }

    /// Number of entities stored directly in this node.
    pub fn len(&self) -> usize {
        self.node.entities.len()
    }

    /// Whether this node stores no entities directly.
    pub fn is_empty(&self) -> bool {
        self.node.entities.is_empty()
    }

    /// The child slot array.
    pub fn children(&self) -> &'a ChildSlots<D> {
        &self.node.children
    }

    /// Locally stored entities in insertion order.
    pub fn entities(&self) -> impl Iterator<Item = &'a E> + 'a {
        self.node.entities.iter()
    }
}

impl<D: Dimension, E: Spatial + Clone> NodeTree<D, E> {
    /// Create a tree holding a single empty root leaf covering `bound`.
    pub fn new(bound: Bound, max_depth: usize, capacity: usize) -> Result<Self, TreeError> {
        if max_depth < 1 {
            return Err(TreeError::InvalidMaxDepth);
        }
        if capacity < 1 {
            return Err(TreeError::InvalidCapacity);
        }
        let mut tree = Self {
            nodes: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
            root: NodeId::new(0, 1),
            max_depth,
            capacity,
            len: 0,
        };
        tree.root = tree.alloc(bound, 0, 0, None);
        Ok(tree)
    }

    /// Handle of the root node.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Maximum depth of the tree; nodes are created at depths `0..max_depth`.
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Entity count a leaf may reach before it subdivides.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of entities stored in the whole tree.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the tree stores no entities.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of live nodes, the root included.
    pub fn node_count(&self) -> usize {
        self.nodes.len() - self.free_list.len()
    }

    /// Whether `id` still refers to a live node.
    pub fn is_alive(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    /// View of a live node.
    pub fn node(&self, id: NodeId) -> Option<NodeRef<'_, D, E>> {
        self.get(id).map(|node| NodeRef { id, node })
    }

    /// Whether the entity's location lies inside the node's bound.
    pub fn contains(&self, id: NodeId, entity: &E) -> bool {
        self.get(id)
            .is_some_and(|n| D::contains(&n.bound, entity.location()))
    }

    /// Whether `bound` overlaps the node's bound.
    pub fn intersects(&self, id: NodeId, bound: &Bound) -> bool {
        self.get(id).is_some_and(|n| D::intersects(&n.bound, bound))
    }

    /// Whether the node is a leaf. Stale handles are not leaves.
    pub fn is_leaf(&self, id: NodeId) -> bool {
        self.get(id).is_some_and(Node::is_leaf)
    }

    /// Insert an entity. Returns `false`, without touching the tree, if the entity lies
    /// outside the root bound.
    pub fn add(&mut self, entity: E) -> bool {
        self.add_at(self.root, entity)
    }

    /// Remove the entity with `entity_id`. With `merge`, the leaf it was removed from
    /// tries to collapse its sibling group into their parent (see [`Self::merge_if`]).
    pub fn remove(&mut self, entity_id: i64, merge: bool) -> bool {
        let removed = self.remove_at(self.root, entity_id, merge);
        if !removed {
            trace!(entity_id, "remove missed");
        }
        removed
    }

    /// Subdivide a leaf once it holds at least `capacity` entities and is above the last
    /// divisible level, re-homing its entities into the new children.
    ///
    /// Returns whether the node was divided. Callers holding a pending insertion must
    /// retry it against the node's children.
    pub fn divide_if(&mut self, id: NodeId) -> bool {
        let Some(node) = self.get(id) else {
            return false;
        };
        if node.depth + 1 >= self.max_depth
            || !node.is_leaf()
            || node.entities.len() < self.capacity
        {
            return false;
        }
        let (bound, depth) = (node.bound, node.depth);

        let mut children = ChildSlots::<D>::default();
        for (i, child_bound) in D::split(&bound).as_ref().iter().enumerate() {
            children.set(i, self.alloc(*child_bound, depth + 1, i, Some(id)));
        }
        let node = self.node_mut(id);
        node.children = children;
        let entities = node.entities.take_all();
        self.len -= entities.len();
        debug!(node = ?id, depth, entities = entities.len(), "subdivided {}", D::NAME);

        for entity in entities {
            let placed = self.add_at(id, entity);
            debug_assert!(placed, "children must tile their parent");
        }
        true
    }

    /// Collapse the sibling group of leaf `id` into their parent when every sibling is a
    /// leaf and together they hold fewer than `capacity` entities.
    ///
    /// This touches every sibling and re-inserts every entity through the parent, and
    /// it never cascades to the grandparent. Returns whether a merge happened; on
    /// success `id` and its siblings are freed.
    pub fn merge_if(&mut self, id: NodeId) -> bool {
        let Some(node) = self.get(id) else {
            return false;
        };
        let Some(parent) = node.parent else {
            return false;
        };
        if !node.is_leaf() {
            return false;
        }

        let siblings: Vec<NodeId> = self.node_ref(parent).children.iter().collect();
        let mut count = 0;
        for &sibling in &siblings {
            let sibling = self.node_ref(sibling);
            if !sibling.is_leaf() {
                return false;
            }
            count += sibling.entities.len();
        }
        if count >= self.capacity {
            return false;
        }

        let mut collected = Vec::with_capacity(count);
        for sibling in siblings {
            collected.extend(self.node_mut(sibling).entities.take_all());
            self.free(sibling);
        }
        self.len -= collected.len();
        self.node_mut(parent).children.clear();
        debug!(node = ?parent, entities = collected.len(), "merged children of {}", D::NAME);

        for entity in collected {
            let placed = self.add_at(parent, entity);
            debug_assert!(placed, "merged entities lie inside the parent");
        }
        true
    }

    /// Entities within `radius` of `center`, pruned by an axis-aligned cube of
    /// half-width `radius` and refined by exact distance at the leaves.
    ///
    /// A negative or NaN radius finds nothing.
    pub fn find_entities(&self, center: Vec3i, radius: f32, filters: &[Filter<'_, E>]) -> Vec<E> {
        if radius.is_nan() || radius < 0.0 {
            return Vec::new();
        }
        let mut out = Vec::new();
        let bound = query_cube(center, radius);
        self.collect_in_bound(self.root, &bound, center, radius, filters, &mut out);
        out
    }

    /// Entities in nodes overlapping `bound` that lie within `radius` of the bound's
    /// center and pass at least one filter (or any entity when `filters` is empty).
    ///
    /// Results come in child enumeration order, then leaf insertion order.
    pub fn find_entities_in_bound(
        &self,
        bound: &Bound,
        radius: f32,
        filters: &[Filter<'_, E>],
    ) -> Vec<E> {
        let mut out = Vec::new();
        self.collect_in_bound(self.root, bound, bound.center(), radius, filters, &mut out);
        out
    }

    /// Visit the root and then, depth first in child order, every descendant.
    /// Returning `false` from `visitor` skips the visited node's children.
    pub fn traverse<F>(&self, mut visitor: F)
    where
        F: FnMut(NodeRef<'_, D, E>) -> bool,
    {
        self.traverse_from(self.root, &mut visitor);
    }

    /// Visit the entities stored directly in `id`, in insertion order, until `visitor`
    /// returns `false`.
    pub fn traverse_entities<F>(&self, id: NodeId, mut visitor: F)
    where
        F: FnMut(&E) -> bool,
    {
        let Some(node) = self.get(id) else {
            return;
        };
        for entity in node.entities.iter() {
            if !visitor(entity) {
                return;
            }
        }
    }

    fn add_at(&mut self, id: NodeId, entity: E) -> bool {
        let location = entity.location();
        if !D::contains(&self.node_ref(id).bound, location) {
            trace!(entity_id = entity.id(), %location, "entity outside bound");
            return false;
        }
        let mut at = id;
        loop {
            let node = self.node_ref(at);
            if node.is_leaf() && (node.entities.len() < self.capacity || !self.divide_if(at)) {
                self.push_local(at, entity);
                return true;
            }
            let Some(child) = self.child_containing(at, location) else {
                return false;
            };
            at = child;
        }
    }

    fn remove_at(&mut self, id: NodeId, entity_id: i64, merge: bool) -> bool {
        let node = self.node_mut(id);
        if node.is_leaf() {
            if node.entities.remove(entity_id).is_none() {
                return false;
            }
            self.len -= 1;
            if merge {
                self.merge_if(id);
            }
            return true;
        }
        for i in 0..D::CHILDREN {
            let Some(child) = self.node_ref(id).children.get_child(i) else {
                continue;
            };
            if self.remove_at(child, entity_id, merge) {
                return true;
            }
        }
        false
    }

    fn collect_in_bound(
        &self,
        id: NodeId,
        bound: &Bound,
        center: Vec3i,
        radius: f32,
        filters: &[Filter<'_, E>],
        out: &mut Vec<E>,
    ) {
        let node = self.node_ref(id);
        if !D::intersects(&node.bound, bound) {
            return;
        }
        if node.is_leaf() {
            out.extend(
                node.entities
                    .iter()
                    .filter(|e| D::within_distance(e.location(), center, radius))
                    .filter(|e| filters.is_empty() || filters.iter().any(|f| f(e)))
                    .cloned(),
            );
            return;
        }
        for child in node.children.iter() {
            self.collect_in_bound(child, bound, center, radius, filters, out);
        }
    }

    fn traverse_from<F>(&self, id: NodeId, visitor: &mut F)
    where
        F: FnMut(NodeRef<'_, D, E>) -> bool,
    {
        let node = self.node_ref(id);
        if !visitor(NodeRef { id, node }) {
            return;
        }
        for child in node.children.iter() {
            self.traverse_from(child, visitor);
        }
    }

    fn child_containing(&self, id: NodeId, location: Vec3i) -> Option<NodeId> {
        let children = &self.node_ref(id).children;
        children
            .iter()
            .find(|&c| D::contains(&self.node_ref(c).bound, location))
    }

    fn push_local(&mut self, id: NodeId, entity: E) {
        if let Some(old) = self.node_mut(id).entities.push(entity) {
            warn!(entity_id = old.id(), "duplicate entity id replaced");
        } else {
            self.len += 1;
        }
    }

    fn alloc(
        &mut self,
        bound: Bound,
        depth: usize,
        index: usize,
        parent: Option<NodeId>,
    ) -> NodeId {
        let node = |generation| Node {
            generation,
            depth,
            index,
            bound,
            parent,
            children: ChildSlots::default(),
            entities: EntityList::default(),
        };
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            self.nodes[idx] = Some(node(generation));
            (idx, generation)
        } else {
            let generation = 1_u32;
            self.nodes.push(Some(node(generation)));
            self.generations.push(generation);
            (self.nodes.len() - 1, generation)
        };
        #[allow(
            clippy::cast_possible_truncation,
            reason = "NodeId uses 32-bit indices."
        )]
        let idx = idx as u32;
        NodeId::new(idx, generation)
    }

    fn free(&mut self, id: NodeId) {
        if self.is_alive(id) {
            self.nodes[id.idx()] = None;
            self.free_list.push(id.idx());
        }
    }
}

impl<D: Dimension, E> NodeTree<D, E> {
    fn get(&self, id: NodeId) -> Option<&Node<D, E>> {
        self.nodes
            .get(id.idx())
            .and_then(|n| n.as_ref())
            .filter(|n| n.generation == id.1)
    }

    fn node_ref(&self, id: NodeId) -> &Node<D, E> {
        self.nodes[id.idx()].as_ref().expect("dangling NodeId")
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node<D, E> {
        self.nodes[id.idx()].as_mut().expect("dangling NodeId")
    }
}

/// Cube of half-width `radius` around `center`, clipped to the `i32` range.
///
/// The half-width is widened to `i64` first so a radius past `i32::MAX` still reaches
/// every coordinate it should.
#[allow(
    clippy::cast_possible_truncation,
    reason = "Truncation is exact for integer points; clamped values fit in i32."
)]
fn query_cube(center: Vec3i, radius: f32) -> Bound {
    let half_width = radius as i64;
    let shift = |v: i32, d: i64| {
        i64::from(v)
            .saturating_add(d)
            .clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
    };
    let corner = |d: i64| Vec3i::new(shift(center.x, d), shift(center.y, d), shift(center.z, d));
    Bound::new(corner(-half_width), corner(half_width))
}
