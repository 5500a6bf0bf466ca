// Copyright 2026 the Sylva Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

#![cfg(feature = "compare_rtree")]

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use sylva_rtree::RTreeBackend;
use sylva_tree::{Bound, Octree, Search, Spatial, TreeOptions, Vec3i};

#[derive(Clone)]
struct Cell {
    id: i64,
    bound: Bound,
}

impl Spatial for Cell {
    fn id(&self) -> i64 {
        self.id
    }

    fn location(&self) -> Vec3i {
        self.bound.center()
    }

    fn bound(&self) -> Bound {
        self.bound
    }
}

fn gen_grid_cells(n: usize, cell: i32) -> Vec<Cell> {
    let mut out = Vec::with_capacity(n * n);
    for z in 0..n {
        for x in 0..n {
            let x0 = x as i32 * cell;
            let z0 = z as i32 * cell;
            out.push(Cell {
                id: out.len() as i64,
                bound: Bound::new(Vec3i::new(x0, 0, z0), Vec3i::new(x0 + cell, cell, z0 + cell)),
            });
        }
    }
    out
}

fn bench_rtree_backend_compare(c: &mut Criterion) {
    let mut group = c.benchmark_group("rtree_backend_compare");
    for &n in &[64usize, 128] {
        let cells = gen_grid_cells(n, 10);
        let side = n as i32 * 10;
        let world = Bound::new(Vec3i::ZERO, Vec3i::new(side, side, side));
        group.throughput(Throughput::Elements((n * n) as u64));

        group.bench_function(format!("octree_build_query_n{n}"), |b| {
            b.iter_batched(
                || cells.clone(),
                |cells| {
                    let mut tree = Octree::new(world, 8, 16, TreeOptions::default()).unwrap();
                    for cell in cells {
                        tree.add(cell);
                    }
                    let hits = tree.search_by_radius([300.0, 5.0, 300.0], 200.0, &[]);
                    black_box(hits.len());
                },
                BatchSize::SmallInput,
            );
        });

        group.bench_function(format!("rtree_build_query_n{n}"), |b| {
            b.iter_batched(
                || cells.clone(),
                |cells| {
                    let mut index = RTreeBackend::new();
                    for cell in cells {
                        index.add(cell);
                    }
                    let hits = index.surrounding_entities([300.0, 5.0, 300.0], 200.0, &[]);
                    black_box(hits.len());
                },
                BatchSize::SmallInput,
            );
        });

        group.bench_function(format!("rtree_build_query_bulk_n{n}"), |b| {
            b.iter_batched(
                || cells.clone(),
                |cells| {
                    let index = RTreeBackend::bulk_load(cells);
                    let hits = index.surrounding_entities([300.0, 5.0, 300.0], 200.0, &[]);
                    black_box(hits.len());
                },
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

criterion_group!(benches, bench_rtree_backend_compare);
criterion_main!(benches);
