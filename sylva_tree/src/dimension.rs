// Copyright 2026 the Sylva Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Partitioning strategies: planar (4-way) and volumetric (8-way).
//!
//! A strategy knows how to bisect a bound into child bounds, in which order the
//! children are enumerated, and which axes take part in containment, intersection
//! and distance tests. Strategies are zero-sized markers chosen once per tree.

use std::fmt::Debug;

use crate::node::NodeId;
use crate::types::{Bound, Vec3i, within_distance_2d, within_distance_3d};

/// Split geometry and axis set of a tree.
pub trait Dimension: Copy + Debug + Default + 'static {
    /// Number of children created by one subdivision.
    const CHILDREN: usize;

    /// Short name of the tree kind, used for export file names.
    const NAME: &'static str;

    /// Fixed-size child slot array.
    type Slots: Copy + Debug + Default + AsRef<[Option<NodeId>]> + AsMut<[Option<NodeId>]>;

    /// Fixed-size array of child bounds.
    type Bounds: AsRef<[Bound]>;

    /// Bisect `parent` at its center. Element `i` is the bound of child slot `i`.
    fn split(parent: &Bound) -> Self::Bounds;

    /// Whether `point` lies inside `bound` (inclusive) on every axis this strategy uses.
    fn contains(bound: &Bound, point: Vec3i) -> bool;

    /// Whether the two bounds overlap (inclusive) on every axis this strategy uses.
    fn intersects(a: &Bound, b: &Bound) -> bool;

    /// Whether `a` and `b` are at most `radius` apart on this strategy's axes.
    fn within_distance(a: Vec3i, b: Vec3i, radius: f32) -> bool;
}

/// 4-way split on the X/Z plane. Y is flattened to 0 and ignored.
///
/// Child order (looking down the Y axis, Z up):
///
/// ```text
///   Z
///   ^ +---+---+
///   | | 1 | 2 |
///   | +---+---+
///   | | 0 | 3 |
///   | +---+---+
///   +-----------> X
/// ```
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Planar;

/// 8-way split on all three axes.
///
/// Child `i` takes the upper half of X when bit 2 of `i` is set, of Y for bit 1
/// and of Z for bit 0: child 0 is the all-lower octant, child 7 the all-upper one.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Volumetric;

impl Dimension for Planar {
    const CHILDREN: usize = 4;
    const NAME: &'static str = "quadtree";

    type Slots = [Option<NodeId>; 4];
    type Bounds = [Bound; 4];

    fn split(parent: &Bound) -> Self::Bounds {
        let (lo, c, hi) = (parent.min(), parent.center(), parent.max());
        let quad = |x0: i32, z0: i32, x1: i32, z1: i32| {
            Bound::new(Vec3i::new(x0, 0, z0), Vec3i::new(x1, 0, z1))
        };
        [
            quad(lo.x, lo.z, c.x, c.z),
            quad(lo.x, c.z, c.x, hi.z),
            quad(c.x, c.z, hi.x, hi.z),
            quad(c.x, lo.z, hi.x, c.z),
        ]
    }

    #[inline]
    fn contains(bound: &Bound, p: Vec3i) -> bool {
        let (lo, hi) = (bound.min(), bound.max());
        lo.x <= p.x && p.x <= hi.x && lo.z <= p.z && p.z <= hi.z
    }

    #[inline]
    fn intersects(a: &Bound, b: &Bound) -> bool {
        a.min().x <= b.max().x
            && b.min().x <= a.max().x
            && a.min().z <= b.max().z
            && b.min().z <= a.max().z
    }

    #[inline]
    fn within_distance(a: Vec3i, b: Vec3i, radius: f32) -> bool {
        within_distance_2d(a, b, radius)
    }
}

impl Dimension for Volumetric {
    const CHILDREN: usize = 8;
    const NAME: &'static str = "octree";

    type Slots = [Option<NodeId>; 8];
    type Bounds = [Bound; 8];

    fn split(parent: &Bound) -> Self::Bounds {
        let (lo, c, hi) = (parent.min(), parent.center(), parent.max());
        std::array::from_fn(|i| {
            let (x0, x1) = if i & 0b100 == 0 { (lo.x, c.x) } else { (c.x, hi.x) };
            let (y0, y1) = if i & 0b010 == 0 { (lo.y, c.y) } else { (c.y, hi.y) };
            let (z0, z1) = if i & 0b001 == 0 { (lo.z, c.z) } else { (c.z, hi.z) };
            Bound::new(Vec3i::new(x0, y0, z0), Vec3i::new(x1, y1, z1))
        })
    }

    #[inline]
    fn contains(bound: &Bound, p: Vec3i) -> bool {
        let (lo, hi) = (bound.min(), bound.max());
        lo.x <= p.x
            && p.x <= hi.x
            && lo.y <= p.y
            && p.y <= hi.y
            && lo.z <= p.z
            && p.z <= hi.z
    }

    #[inline]
    fn intersects(a: &Bound, b: &Bound) -> bool {
        a.min().x <= b.max().x
            && b.min().x <= a.max().x
            && a.min().y <= b.max().y
            && b.min().y <= a.max().y
            && a.min().z <= b.max().z
            && b.min().z <= a.max().z
    }

    #[inline]
    fn within_distance(a: Vec3i, b: Vec3i, radius: f32) -> bool {
        within_distance_3d(a, b, radius)
    }
}

/// The child slot array of one node.
///
/// Either every slot is populated (internal node) or none is (leaf).
#[derive(Copy, Clone, Debug, Default)]
pub struct ChildSlots<D: Dimension> {
    slots: D::Slots,
}

impl<D: Dimension> ChildSlots<D> {
    /// Number of slots, fixed by the strategy.
    pub const fn children_count(&self) -> usize {
        D::CHILDREN
    }

    /// Child in slot `index`, if populated.
    pub fn get_child(&self, index: usize) -> Option<NodeId> {
        self.slots.as_ref().get(index).copied().flatten()
    }

    /// Whether no slot is populated.
    pub fn is_empty(&self) -> bool {
        self.slots.as_ref().iter().all(Option::is_none)
    }

    /// Populated children in enumeration order.
    pub fn iter(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.slots.as_ref().iter().filter_map(|c| *c)
    }

    pub(crate) fn set(&mut self, index: usize, child: NodeId) {
        self.slots.as_mut()[index] = Some(child);
    }

    /// Empty every slot.
    pub(crate) fn clear(&mut self) {
        self.slots = D::Slots::default();
    }
}
