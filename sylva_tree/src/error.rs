// Copyright 2026 the Sylva Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types.

use thiserror::Error;

/// Failure to construct a tree.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum TreeError {
    /// `max_depth` was zero.
    #[error("maxDepth must be > 0")]
    InvalidMaxDepth,
    /// `capacity` was zero.
    #[error("capacity must be > 0")]
    InvalidCapacity,
    /// Only 2 (quadtree) and 3 (octree) dimensions exist.
    #[error("unsupported dimension: {0}")]
    UnsupportedDimension(u8),
}

/// Failure to export a tree as a graph.
#[derive(Debug, Error)]
pub enum ExportError {
    /// No draw path was configured.
    #[error("draw path not set")]
    NoOutputTarget,
    /// The backend cannot be drawn.
    #[error("{0} does not support export")]
    Unsupported(&'static str),
    /// Writing the graph failed.
    #[error("failed to write graph: {0}")]
    Io(#[from] std::io::Error),
}
