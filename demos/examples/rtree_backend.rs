// Copyright 2026 the Sylva Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Swap an octree for the R-tree backend behind `dyn Search`.
//!
//! Run:
//! - `cargo run -p sylva_demos --example rtree_backend`

use sylva_rtree::RTreeBackend;
use sylva_tree::{Bound, Search, Spatial, TreeKind, TreeOptions, Vec3i, create_spatial_tree};
use tracing_subscriber::EnvFilter;

#[derive(Clone, Debug)]
struct Crate {
    id: i64,
    extent: Bound,
}

impl Spatial for Crate {
    fn id(&self) -> i64 {
        self.id
    }

    fn location(&self) -> Vec3i {
        self.extent.center()
    }

    fn bound(&self) -> Bound {
        self.extent
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let world = Bound::new(Vec3i::ZERO, Vec3i::new(512, 512, 512));
    let octree = create_spatial_tree(TreeKind::Octree, world, 5, 4, TreeOptions::default())?;
    let rtree: Box<dyn Search<Crate>> = Box::new(RTreeBackend::new());

    for (name, mut index) in [("octree", octree), ("rtree", rtree)] {
        for i in 0..10_i32 {
            let min = Vec3i::new(i * 40, 0, i * 40);
            let max = Vec3i::new(i * 40 + 30, 10, i * 40 + 30);
            index.add(Crate {
                id: i64::from(i),
                extent: Bound::new(min, max),
            });
        }
        // The octree tests crate centers; the R-tree tests whole extents.
        let hits = index.surrounding_entities([100.0, 5.0, 100.0], 30.0, &[]);
        let ids: Vec<i64> = hits.iter().map(|c| c.id).collect();
        println!("{name}: {ids:?}");
        if let Err(err) = index.to_dot() {
            println!("{name}: export skipped ({err})");
        }
    }
    Ok(())
}
