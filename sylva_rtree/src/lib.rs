// Copyright 2026 the Sylva Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Sylva R-tree: an [`rstar`] backend for entities with real extents.
//!
//! [`RTreeBackend`] implements the same [`Search`] contract as the octree and quadtree in
//! `sylva_tree`, but indexes each entity by its [`Spatial::bound`] instead of a point.
//! A radius query returns every entity whose bound touches the cube `center ± radius`
//! and that passes at least one filter. There is no exact distance test: the cube is
//! the query.
//!
//! ```rust
//! use sylva_rtree::RTreeBackend;
//! use sylva_tree::{Bound, Search, Spatial, Vec3i};
//!
//! #[derive(Clone)]
//! struct Building {
//!     id: i64,
//!     footprint: Bound,
//! }
//!
//! impl Spatial for Building {
//!     fn id(&self) -> i64 {
//!         self.id
//!     }
//!     fn location(&self) -> Vec3i {
//!         self.footprint.center()
//!     }
//!     fn bound(&self) -> Bound {
//!         self.footprint
//!     }
//! }
//!
//! let mut index = RTreeBackend::new();
//! let house = Bound::new(Vec3i::new(0, 0, 0), Vec3i::new(50, 10, 50));
//! let barn = Bound::new(Vec3i::new(200, 0, 200), Vec3i::new(210, 10, 210));
//! index.add(Building { id: 1, footprint: house });
//! index.add(Building { id: 2, footprint: barn });
//!
//! // The query cube reaches into building 1 but not its center.
//! let hits = index.surrounding_entities([60.0, 5.0, 60.0], 12.0, &[]);
//! assert_eq!(hits.len(), 1);
//! assert_eq!(hits[0].id, 1);
//! ```
//!
//! [`Search`]: sylva_tree::Search
//! [`Spatial::bound`]: sylva_tree::Spatial::bound

use std::collections::HashMap;
use std::fmt;

use rstar::{AABB, RTree, RTreeObject};
use sylva_tree::{Bound, ExportError, Filter, Search, Spatial};
use tracing::{debug, trace};

/// What the R-tree itself stores: the ID and envelope of one entity.
#[derive(Clone, Debug)]
struct Entry {
    id: i64,
    envelope: AABB<[f64; 3]>,
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl RTreeObject for Entry {
    type Envelope = AABB<[f64; 3]>;

    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}

fn envelope_of(bound: &Bound) -> AABB<[f64; 3]> {
    let (lo, hi) = (bound.min(), bound.max());
    AABB::from_corners(
        [f64::from(lo.x), f64::from(lo.y), f64::from(lo.z)],
        [f64::from(hi.x), f64::from(hi.y), f64::from(hi.z)],
    )
}

/// R*-tree index keyed by entity ID.
///
/// Unlike the octree there is no world bound: every entity is accepted. Adding an
/// entity whose ID is already stored replaces it.
pub struct RTreeBackend<E> {
    tree: RTree<Entry>,
    entities: HashMap<i64, (E, Entry)>,
}

impl<E> fmt::Debug for RTreeBackend<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RTreeBackend")
            .field("tree_size", &self.tree.size())
            .field("entities", &self.entities.len())
            .finish_non_exhaustive()
    }
}

impl<E> Default for RTreeBackend<E> {
    fn default() -> Self {
        Self {
            tree: RTree::new(),
            entities: HashMap::new(),
        }
    }
}

impl<E: Spatial + Clone> RTreeBackend<E> {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bulk-load an index. Later duplicates of an ID win.
    pub fn bulk_load(entities: impl IntoIterator<Item = E>) -> Self {
        let mut map = HashMap::new();
        for e in entities {
            let entry = Entry {
                id: e.id(),
                envelope: envelope_of(&e.bound()),
            };
            map.insert(entry.id, (e, entry));
        }
        let tree = RTree::bulk_load(map.values().map(|(_, entry)| entry.clone()).collect());
        debug!(entities = map.len(), "bulk loaded rtree");
        Self { tree, entities: map }
    }

    /// Number of stored entities.
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Whether no entity is stored.
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// The stored entity with `id`.
    pub fn get(&self, id: i64) -> Option<&E> {
        self.entities.get(&id).map(|(e, _)| e)
    }
}

impl<E: Spatial + Clone> Search<E> for RTreeBackend<E> {
    fn add(&mut self, entity: E) -> bool {
        let entry = Entry {
            id: entity.id(),
            envelope: envelope_of(&entity.bound()),
        };
        if let Some((_, old)) = self.entities.remove(&entry.id) {
            trace!(entity_id = entry.id, "replacing rtree entry");
            self.tree.remove(&old);
        }
        self.tree.insert(entry.clone());
        self.entities.insert(entry.id, (entity, entry));
        true
    }

    fn remove(&mut self, id: i64) -> bool {
        let Some((_, entry)) = self.entities.remove(&id) else {
            trace!(entity_id = id, "remove missed");
            return false;
        };
        self.tree.remove(&entry);
        true
    }

    fn surrounding_entities(
        &self,
        center: [f32; 3],
        radius: f32,
        filters: &[Filter<'_, E>],
    ) -> Vec<E> {
        if radius.is_nan() || radius < 0.0 {
            return Vec::new();
        }
        let r = f64::from(radius);
        let c = center.map(f64::from);
        let query = AABB::from_corners(c.map(|v| v - r), c.map(|v| v + r));
        self.tree
            .locate_in_envelope_intersecting(&query)
            .filter_map(|entry| self.entities.get(&entry.id))
            .map(|(e, _)| e)
            .filter(|e| filters.is_empty() || filters.iter().any(|f| f(e)))
            .cloned()
            .collect()
    }

    fn to_dot(&self) -> Result<(), ExportError> {
        Err(ExportError::Unsupported("rtree"))
    }
}
