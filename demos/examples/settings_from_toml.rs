// Copyright 2026 the Sylva Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Build a tree from TOML settings and pick the partitioning at runtime.
//!
//! Run:
//! - `cargo run -p sylva_demos --example settings_from_toml`
//! - `cargo run -p sylva_demos --example settings_from_toml -- path/to/tree.toml`

use std::path::PathBuf;

use sylva_tree::{Spatial, TreeSettings, Vec3i};
use tracing::info;
use tracing_subscriber::EnvFilter;

const DEFAULT_SETTINGS: &str = r#"
dimensions = 2
min = { x = 0, y = 0, z = 0 }
max = { x = 1024, y = 0, z = 1024 }
max_depth = 6
capacity = 4
merge_on_remove = true
"#;

#[derive(Clone, Debug)]
struct Beacon(i64, Vec3i);

impl Spatial for Beacon {
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

    let text = match std::env::args().nth(1).map(PathBuf::from) {
        Some(path) => std::fs::read_to_string(&path)?,
        None => DEFAULT_SETTINGS.to_string(),
    };
    let settings: TreeSettings = toml::from_str(&text)?;
    let kind = settings.kind()?;
    info!(?kind, max_depth = settings.max_depth, capacity = settings.capacity, "loaded settings");

    let mut tree = settings.build::<Beacon>()?;
    for i in 0..64_i32 {
        let at = Vec3i::new((i * 37) % 1024, 0, (i * 91) % 1024);
        tree.add(Beacon(i64::from(i), at));
    }

    let near = tree.surrounding_entities([512.0, 0.0, 512.0], 200.0, &[]);
    info!(found = near.len(), "beacons within 200 of the center");
    for b in &near {
        println!("{} at {}", b.0, b.1);
    }

    println!("{}", toml::to_string_pretty(&settings)?);
    Ok(())
}
