// Copyright 2026 the Sylva Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Construction-time configuration.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::types::Vec3i;

/// Maps a floating-point query position into the tree's integer coordinate space.
pub type ScaleFn = Box<dyn Fn([f32; 3]) -> Vec3i + Send + Sync>;

/// Default scale: truncate each component toward zero, saturating at the `i32` range.
#[allow(
    clippy::cast_possible_truncation,
    reason = "Truncation is the documented default mapping."
)]
pub fn truncate(p: [f32; 3]) -> Vec3i {
    Vec3i::new(p[0] as i32, p[1] as i32, p[2] as i32)
}

/// Options for [`SpatialTree::new`](crate::SpatialTree::new).
///
/// ```
/// use sylva_tree::{TreeOptions, Vec3i};
///
/// let options = TreeOptions::default()
///     .with_merge_on_remove(true)
///     .with_scale(|p| Vec3i::new(p[0].round() as i32, 0, p[2].round() as i32));
/// assert!(options.merge_on_remove());
/// assert_eq!(options.scale([1.6, 9.0, -0.4]), Vec3i::new(2, 0, 0));
/// ```
pub struct TreeOptions {
    merge_on_remove: bool,
    scale: ScaleFn,
    draw_path: Option<PathBuf>,
}

impl Default for TreeOptions {
    fn default() -> Self {
        Self {
            merge_on_remove: false,
            scale: Box::new(truncate),
            draw_path: None,
        }
    }
}

impl fmt::Debug for TreeOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TreeOptions")
            .field("merge_on_remove", &self.merge_on_remove)
            .field("draw_path", &self.draw_path)
            .finish_non_exhaustive()
    }
}

impl TreeOptions {
    /// Try to collapse sibling leaves after every removal.
    ///
    /// Merging touches every sibling and re-inserts their entities, so it is off by default.
    #[must_use]
    pub fn with_merge_on_remove(mut self, merge: bool) -> Self {
        self.merge_on_remove = merge;
        self
    }

    /// Replace the query-position mapping used by radius search.
    #[must_use]
    pub fn with_scale<F>(mut self, scale: F) -> Self
    where
        F: Fn([f32; 3]) -> Vec3i + Send + Sync + 'static,
    {
        self.scale = Box::new(scale);
        self
    }

    /// Directory that DOT exports are written into.
    #[must_use]
    pub fn with_draw_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.draw_path = Some(path.into());
        self
    }

    /// Whether removals try to merge.
    pub fn merge_on_remove(&self) -> bool {
        self.merge_on_remove
    }

    /// Apply the scale function.
    pub fn scale(&self, p: [f32; 3]) -> Vec3i {
        (self.scale)(p)
    }

    /// Configured export directory.
    pub fn draw_path(&self) -> Option<&Path> {
        self.draw_path.as_deref()
    }
}

#[cfg(feature = "serde")]
pub use settings::TreeSettings;

#[cfg(feature = "serde")]
mod settings {
    use std::path::PathBuf;

    use serde::{Deserialize, Serialize};

    use super::TreeOptions;
    use crate::entity::Spatial;
    use crate::error::TreeError;
    use crate::search::Search;
    use crate::tree::{TreeKind, create_spatial_tree};
    use crate::types::{Bound, Vec3i};

    /// Plain-data tree description, for loading from configuration files.
    ///
    /// ```toml
    /// dimensions = 2
    /// min = { x = 0, y = 0, z = 0 }
    /// max = { x = 1024, y = 0, z = 1024 }
    /// max_depth = 6
    /// capacity = 16
    /// merge_on_remove = true
    /// ```
    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    pub struct TreeSettings {
        /// 2 for a quadtree, 3 for an octree.
        pub dimensions: u8,
        /// Lower corner of the root bound.
        pub min: Vec3i,
        /// Upper corner of the root bound.
        pub max: Vec3i,
        /// Maximum tree depth.
        pub max_depth: usize,
        /// Entities a leaf holds before subdividing.
        pub capacity: usize,
        /// See [`TreeOptions::with_merge_on_remove`].
        #[serde(default)]
        pub merge_on_remove: bool,
        /// See [`TreeOptions::with_draw_path`].
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub draw_path: Option<PathBuf>,
    }

    impl TreeSettings {
        /// Root bound.
        pub fn bound(&self) -> Bound {
            Bound::new(self.min, self.max)
        }

        /// Tree kind selected by `dimensions`.
        pub fn kind(&self) -> Result<TreeKind, TreeError> {
            TreeKind::try_from(self.dimensions)
        }

        /// Options with the default scale function.
        pub fn options(&self) -> TreeOptions {
            let options = TreeOptions::default().with_merge_on_remove(self.merge_on_remove);
            match &self.draw_path {
                Some(path) => options.with_draw_path(path.clone()),
                None => options,
            }
        }

        /// Build the described tree.
        pub fn build<E>(&self) -> Result<Box<dyn Search<E>>, TreeError>
        where
            E: Spatial + Clone + 'static,
        {
            create_spatial_tree(
                self.kind()?,
                self.bound(),
                self.max_depth,
                self.capacity,
                self.options(),
            )
        }
    }
}
