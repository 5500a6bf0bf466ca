// Copyright 2026 the Sylva Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Insertion-ordered entity storage with an ID index.

use std::collections::HashMap;
use std::mem;

use crate::entity::Spatial;

// Below this many slots tombstones are never compacted.
const COMPACT_MIN_SLOTS: usize = 16;

/// Entities held by one leaf.
///
/// Removal leaves a tombstone so that every other entry keeps its slot; the slots are
/// compacted once tombstones outnumber live entries.
#[derive(Clone, Debug)]
pub(crate) struct EntityList<E> {
    slots: Vec<Option<E>>,
    index: HashMap<i64, usize>,
}

impl<E> Default for EntityList<E> {
    fn default() -> Self {
        Self {
            slots: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<E: Spatial> EntityList<E> {
    pub(crate) fn len(&self) -> usize {
        self.index.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Append `entity`. An entity with the same ID is replaced in place and returned.
    pub(crate) fn push(&mut self, entity: E) -> Option<E> {
        let id = entity.id();
        if let Some(&slot) = self.index.get(&id) {
            return self.slots[slot].replace(entity);
        }
        self.index.insert(id, self.slots.len());
        self.slots.push(Some(entity));
        None
    }

    pub(crate) fn remove(&mut self, id: i64) -> Option<E> {
        let slot = self.index.remove(&id)?;
        let removed = self.slots[slot].take();
        self.maybe_compact();
        removed
    }

    /// Live entities in insertion order.
    pub(crate) fn iter(&self) -> impl Iterator<Item = &E> + '_ {
        self.slots.iter().flatten()
    }

    /// Move every entity out, in insertion order, leaving the list empty.
    pub(crate) fn take_all(&mut self) -> Vec<E> {
        self.index.clear();
        mem::take(&mut self.slots).into_iter().flatten().collect()
    }

    fn maybe_compact(&mut self) {
        if self.index.is_empty() {
            self.slots.clear();
            return;
        }
        let dead = self.slots.len() - self.index.len();
        if self.slots.len() < COMPACT_MIN_SLOTS || dead <= self.index.len() {
            return;
        }
        self.slots.retain(Option::is_some);
        for (slot, entity) in self.slots.iter().enumerate() {
            if let Some(e) = entity {
                self.index.insert(e.id(), slot);
            }
        }
    }
}
