// Copyright 2026 the Sylva Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Octree basics: subdivision, radius search with filters, and merge on remove.
//!
//! Run:
//! - `RUST_LOG=sylva_tree=debug cargo run -p sylva_demos --example octree_basics`

use sylva_tree::{Bound, Octree, Spatial, TreeOptions, Vec3i};
use tracing_subscriber::EnvFilter;

#[derive(Clone, Debug)]
struct Unit {
    id: i64,
    pos: Vec3i,
    hostile: bool,
}

impl Spatial for Unit {
    fn id(&self) -> i64 {
        self.id
    }

    fn location(&self) -> Vec3i {
        self.pos
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let world = Bound::new(Vec3i::ZERO, Vec3i::new(256, 256, 256));
    let options = TreeOptions::default().with_merge_on_remove(true);
    let mut tree = Octree::new(world, 5, 2, options)?;

    for i in 0..12_i32 {
        let unit = Unit {
            id: i64::from(i),
            pos: Vec3i::new(100 + i * 3, 100, 100 + (i % 4) * 5),
            hostile: i % 3 == 0,
        };
        tree.add(unit);
    }
    println!("{} units in {} nodes", tree.len(), tree.nodes().node_count());

    // Print the structure, skipping empty leaves.
    tree.nodes().traverse(|node| {
        if !node.is_leaf() || !node.is_empty() {
            let indent = "  ".repeat(node.depth());
            println!("{indent}[{}] {:?} entities={}", node.index(), node.bound().min(), node.len());
        }
        true
    });

    let all = tree.search_by_radius([110.0, 100.0, 105.0], 12.0, &[]);
    println!("within 12 of (110,100,105): {:?}", ids(&all));

    let hostile = |u: &Unit| u.hostile;
    let hostiles = tree.search_by_radius([110.0, 100.0, 105.0], 12.0, &[&hostile]);
    println!("hostile: {:?}", ids(&hostiles));

    for id in 0..12 {
        tree.remove(id);
    }
    println!("after removing all: {} nodes", tree.nodes().node_count());
    Ok(())
}

fn ids(units: &[Unit]) -> Vec<i64> {
    units.iter().map(|u| u.id).collect()
}
