// Copyright 2026 the Sylva Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Sylva Tree: self-subdividing octrees and quadtrees for point entities.
//!
//! Entities are anything implementing [`Spatial`]: a stable `i64` ID and an integer
//! location. A tree covers a fixed world [`Bound`] and answers "what is near this
//! point" queries without scanning every entity.
//!
//! - Leaves split into 8 (octree) or 4 (quadtree) children once they reach `capacity`,
//!   down to `max_depth` levels. The last divisible level grows without bound.
//! - Removal can optionally merge a sibling group back into its parent when their
//!   combined occupancy has dropped below `capacity`.
//! - Radius search prunes nodes with a cube around the query center and tests exact
//!   distance only at the leaves. Quadtrees measure distance on the X/Z plane.
//!
//! # Example
//!
//! ```rust
//! use sylva_tree::{Bound, Octree, Spatial, TreeOptions, Vec3i};
//!
//! #[derive(Clone, Debug)]
//! struct Player {
//!     id: i64,
//!     pos: Vec3i,
//!     team: u8,
//! }
//!
//! impl Spatial for Player {
//!     fn id(&self) -> i64 {
//!         self.id
//!     }
//!     fn location(&self) -> Vec3i {
//!         self.pos
//!     }
//! }
//!
//! let world = Bound::new(Vec3i::new(0, 0, 0), Vec3i::new(1000, 1000, 1000));
//! let options = TreeOptions::default().with_merge_on_remove(true);
//! let mut tree = Octree::new(world, 6, 4, options)?;
//!
//! tree.add(Player { id: 1, pos: Vec3i::new(100, 100, 100), team: 0 });
//! tree.add(Player { id: 2, pos: Vec3i::new(103, 100, 104), team: 1 });
//! tree.add(Player { id: 3, pos: Vec3i::new(900, 900, 900), team: 1 });
//!
//! // Everyone within 10 units.
//! let near = tree.search_by_radius([100.0, 100.0, 100.0], 10.0, &[]);
//! assert_eq!(near.len(), 2);
//!
//! // Filters are OR-ed together.
//! let team_one = |p: &Player| p.team == 1;
//! let near = tree.search_by_radius([100.0, 100.0, 100.0], 10.0, &[&team_one]);
//! assert_eq!(near.len(), 1);
//! assert_eq!(near[0].id, 2);
//!
//! assert!(tree.remove(2));
//! assert!(!tree.remove(2));
//! # Ok::<(), sylva_tree::TreeError>(())
//! ```
//!
//! Trees pick their partitioning at compile time through [`Octree`] and [`Quadtree`], or at
//! runtime through [`create_spatial_tree`], which hands back a `Box<dyn Search<E>>`.
//! With the `serde` feature, [`TreeSettings`] describes a tree as plain data.
//!
//! ## Concurrency
//!
//! Nothing here is synchronized. Subdivision and merge restructure the tree in place, so
//! every operation needs exclusive access for its whole duration. Wrap a shared tree in
//! a lock.
//!
//! ## Logging
//!
//! The crate emits [`tracing`] events: `debug` for construction, subdivision and merge,
//! `trace` for rejected inserts and missed removals, `warn` when a duplicate ID replaces
//! a stored entity. No subscriber is installed.

mod config;
mod dimension;
mod entities;
mod entity;
mod error;
mod export;
mod node;
mod search;
mod tree;
mod types;

pub use config::{ScaleFn, TreeOptions, truncate};
#[cfg(feature = "serde")]
pub use config::TreeSettings;
pub use dimension::{ChildSlots, Dimension, Planar, Volumetric};
pub use entity::Spatial;
pub use error::{ExportError, TreeError};
pub use export::{DotElem, DotGraph};
pub use node::{Filter, NodeId, NodeRef, NodeTree};
pub use search::Search;
pub use tree::{Octree, Quadtree, SpatialTree, TreeKind, create_spatial_tree};
pub use types::{Bound, Vec3i, distance_2d, distance_3d, within_distance_2d, within_distance_3d};
