// Copyright 2026 the Sylva Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Basic usage of Sylva Tree: insert, search by radius with a filter, remove with merge.

use sylva_tree::{Bound, Octree, Spatial, TreeOptions, Vec3i};

#[derive(Clone, Debug)]
struct Marker {
    id: i64,
    at: Vec3i,
}

impl Spatial for Marker {
    fn id(&self) -> i64 {
        self.id
    }

    fn location(&self) -> Vec3i {
        self.at
    }
}

fn main() -> Result<(), sylva_tree::TreeError> {
    let world = Bound::new(Vec3i::ZERO, Vec3i::new(64, 64, 64));
    let options = TreeOptions::default().with_merge_on_remove(true);
    let mut tree = Octree::new(world, 4, 2, options)?;

    for (id, i) in (0..8).enumerate() {
        let at = Vec3i::new(i * 8, i * 8, i * 8);
        tree.add(Marker { id: id as i64, at });
    }
    println!("{} markers in {} nodes", tree.len(), tree.nodes().node_count());

    let near = tree.search_by_radius([8.0, 8.0, 8.0], 14.0, &[]);
    println!("near (8,8,8): {:?}", near);

    let odd = |m: &Marker| m.id % 2 == 1;
    let near = tree.search_by_radius([8.0, 8.0, 8.0], 14.0, &[&odd]);
    println!("odd near (8,8,8): {:?}", near);

    for id in 0..8 {
        tree.remove(id);
    }
    println!("after removal: {} nodes", tree.nodes().node_count());
    Ok(())
}
