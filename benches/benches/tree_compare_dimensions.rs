// Copyright 2026 the Sylva Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use sylva_tree::{Bound, Octree, Quadtree, Spatial, TreeOptions, Vec3i};

#[derive(Clone)]
struct Point {
    id: i64,
    at: Vec3i,
}

impl Spatial for Point {
    fn id(&self) -> i64 {
        self.id
    }

    fn location(&self) -> Vec3i {
        self.at
    }
}

#[derive(Clone)]
struct Rng(u64);

impl Rng {
    fn new(seed: u64) -> Self {
        Self(seed)
    }
    fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }
    fn below(&mut self, n: u32) -> i32 {
        (self.next_u64() % u64::from(n)) as i32
    }
}

const WORLD: i32 = 4096;

fn gen_points(count: usize, seed: u64, planar: bool) -> Vec<Point> {
    let mut rng = Rng::new(seed);
    (0..count)
        .map(|i| {
            let x = rng.below(WORLD as u32);
            let y = if planar { 0 } else { rng.below(WORLD as u32) };
            let z = rng.below(WORLD as u32);
            Point {
                id: i as i64,
                at: Vec3i::new(x, y, z),
            }
        })
        .collect()
}

fn gen_clustered_points(count: usize, seed: u64) -> Vec<Point> {
    let mut rng = Rng::new(seed);
    (0..count)
        .map(|i| {
            let cx = (i % 8) as i32 * (WORLD / 8) + WORLD / 16;
            Point {
                id: i as i64,
                at: Vec3i::new(cx + rng.below(32), 0, cx + rng.below(32)),
            }
        })
        .collect()
}

fn world() -> Bound {
    Bound::new(Vec3i::ZERO, Vec3i::new(WORLD, WORLD, WORLD))
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("build");
    for &n in &[1_000usize, 10_000] {
        let points = gen_points(n, 0x5eed, false);
        group.throughput(Throughput::Elements(n as u64));
        for &capacity in &[4usize, 16] {
            group.bench_function(format!("octree_n{n}_cap{capacity}"), |b| {
                b.iter_batched(
                    || points.clone(),
                    |points| {
                        let mut tree =
                            Octree::new(world(), 8, capacity, TreeOptions::default()).unwrap();
                        for p in points {
                            tree.add(p);
                        }
                        black_box(tree.len());
                    },
                    BatchSize::SmallInput,
                );
            });
            group.bench_function(format!("quadtree_n{n}_cap{capacity}"), |b| {
                b.iter_batched(
                    || points.clone(),
                    |points| {
                        let mut tree =
                            Quadtree::new(world(), 8, capacity, TreeOptions::default()).unwrap();
                        for p in points {
                            tree.add(p);
                        }
                        black_box(tree.len());
                    },
                    BatchSize::SmallInput,
                );
            });
        }
    }
    group.finish();
}

fn bench_radius_query(c: &mut Criterion) {
    let mut group = c.benchmark_group("radius_query");
    let n = 10_000;
    let uniform = gen_points(n, 0xfeed, true);
    let clustered = gen_clustered_points(n, 0xfeed);
    for (name, points) in [("uniform", &uniform), ("clustered", &clustered)] {
        let mut octree = Octree::new(world(), 8, 8, TreeOptions::default()).unwrap();
        let mut quadtree = Quadtree::new(world(), 8, 8, TreeOptions::default()).unwrap();
        for p in points {
            octree.add(p.clone());
            quadtree.add(p.clone());
        }
        for &radius in &[32.0f32, 256.0] {
            group.bench_function(format!("octree_{name}_r{radius}"), |b| {
                b.iter(|| {
                    let hits = octree.search_by_radius([2048.0, 0.0, 2048.0], radius, &[]);
                    black_box(hits.len());
                });
            });
            group.bench_function(format!("quadtree_{name}_r{radius}"), |b| {
                b.iter(|| {
                    let hits = quadtree.search_by_radius([2048.0, 0.0, 2048.0], radius, &[]);
                    black_box(hits.len());
                });
            });
        }
    }
    group.finish();
}

fn bench_remove(c: &mut Criterion) {
    let mut group = c.benchmark_group("remove_all");
    let n = 5_000;
    let points = gen_points(n, 0xabcd, false);
    group.throughput(Throughput::Elements(n as u64));
    for merge in [false, true] {
        group.bench_function(format!("octree_merge_{merge}"), |b| {
            b.iter_batched(
                || {
                    let options = TreeOptions::default().with_merge_on_remove(merge);
                    let mut tree = Octree::new(world(), 8, 8, options).unwrap();
                    for p in &points {
                        tree.add(p.clone());
                    }
                    tree
                },
                |mut tree| {
                    for id in 0..n as i64 {
                        tree.remove(id);
                    }
                    black_box(tree.nodes().node_count());
                },
                BatchSize::LargeInput,
            );
        });
    }
    group.finish();
}

criterion_group!(benches, bench_build, bench_radius_query, bench_remove);
criterion_main!(benches);
