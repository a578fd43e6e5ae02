use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use skyline_packer_core::prelude::*;
use std::hint::black_box;

fn generate_sizes(count: usize, min_size: u32, max_size: u32) -> Vec<RectSize> {
    let mut rng = StdRng::seed_from_u64(0x5EED);
    (0..count)
        .map(|_| {
            let w = rng.gen_range(min_size..=max_size);
            let h = rng.gen_range(min_size..=max_size);
            RectSize::new(w, h)
        })
        .collect()
}

fn bench_single_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("single_insert");

    for count in [100, 500, 2000] {
        let sizes = generate_sizes(count, 8, 64);
        group.throughput(Throughput::Elements(count as u64));

        for (name, heuristic, waste) in [
            ("BottomLeft", SkylineHeuristic::BottomLeft, false),
            ("MinWaste", SkylineHeuristic::MinWaste, false),
            ("BottomLeft_WasteMap", SkylineHeuristic::BottomLeft, true),
        ] {
            group.bench_with_input(BenchmarkId::new(name, count), &sizes, |b, sizes| {
                b.iter(|| {
                    let mut packer: SkylinePacker = SkylinePacker::new(2048, 2048, waste);
                    for s in sizes {
                        let _ = packer.insert_with(s.w, s.h, heuristic);
                    }
                    black_box(packer.occupancy())
                });
            });
        }
    }

    group.finish();
}

fn bench_batch_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("batch_insert");

    for count in [50, 100, 200] {
        let sizes = generate_sizes(count, 16, 96);
        group.throughput(Throughput::Elements(count as u64));

        group.bench_with_input(BenchmarkId::new("MinWaste", count), &sizes, |b, sizes| {
            b.iter(|| {
                let mut packer: SkylinePacker = SkylinePacker::new(1024, 1024, false);
                let mut reqs = sizes.clone();
                black_box(packer.insert_batch(&mut reqs))
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_single_insert, bench_batch_insert);
criterion_main!(benches);
