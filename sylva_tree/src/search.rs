// Copyright 2026 the Sylva Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The contract shared by every spatial index backend.

use crate::error::ExportError;
use crate::node::Filter;

/// A dynamic spatial index of entities, queried by radius.
///
/// Implemented by [`SpatialTree`](crate::SpatialTree) for both dimensions and by
/// bounding-volume backends built outside this crate. The trait is object safe, so a
/// backend can be picked at runtime through [`create_spatial_tree`](crate::create_spatial_tree).
///
/// No implementation is safe for concurrent mutation; share one behind a lock.
pub trait Search<E> {
    /// Insert an entity. Returns whether it was stored.
    fn add(&mut self, entity: E) -> bool;

    /// Remove the entity with `id`. Returns whether it was found.
    fn remove(&mut self, id: i64) -> bool;

    /// Entities within `radius` of `center` that pass at least one of `filters`
    /// (all of them when `filters` is empty).
    fn surrounding_entities(
        &self,
        center: [f32; 3],
        radius: f32,
        filters: &[Filter<'_, E>],
    ) -> Vec<E>;

    /// Export the index as a Graphviz graph to the backend's configured location.
    fn to_dot(&self) -> Result<(), ExportError>;
}
