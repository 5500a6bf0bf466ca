// Copyright 2026 the Sylva Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Export a quadtree as Graphviz DOT.
//!
//! Run:
//! - `cargo run -p sylva_demos --example dot_export -- out_dir`
//! - `dot -Tsvg out_dir/quadtree.dot -o quadtree.svg`

use sylva_tree::{Bound, DotGraph, Quadtree, Spatial, TreeOptions, Vec3i};
use tracing_subscriber::EnvFilter;

#[derive(Clone, Debug)]
struct Pin(i64, Vec3i);

impl Spatial for Pin {
    fn id(&self) -> i64 {
        self.0
    }

    fn location(&self) -> Vec3i {
        self.1
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let out_dir = std::env::args().nth(1).unwrap_or_else(|| ".".to_string());
    std::fs::create_dir_all(&out_dir)?;

    let world = Bound::new(Vec3i::ZERO, Vec3i::new(100, 0, 100));
    let mut tree = Quadtree::new(world, 4, 1, TreeOptions::default().with_draw_path(&out_dir))?;
    for (id, (x, z)) in [(10, 10), (20, 20), (30, 5), (90, 90), (60, 20)].into_iter().enumerate() {
        tree.add(Pin(id as i64, Vec3i::new(x, 0, z)));
    }
    tree.to_dot()?;

    // The same graph, rendered to stdout.
    DotGraph::from_tree(tree.nodes()).write_to(std::io::stdout().lock())?;
    Ok(())
}
