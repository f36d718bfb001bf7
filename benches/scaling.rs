use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use vorograph::{Domain, TessellationBuilder, TessellationConfig};

const SIZES: [usize; 4] = [100, 1000, 10_000, 100_000];

fn benchmark_scaling(c: &mut Criterion) {
    let domain = Domain::cube(100.0);
    let mut rng = StdRng::seed_from_u64(42);

    let mut group = c.benchmark_group("scaling");
    group.sample_size(10);

    for &size in &SIZES {
        let points: Vec<_> = (0..size)
            .map(|_| [rng.gen_range(0.0..100.0), rng.gen_range(0.0..100.0), rng.gen_range(0.0..100.0)])
            .collect();
        let owners = vec![0u32; size];

        // Grid resolution heuristic: cube root of N, against a grid twice as fine
        let grid_res = (size as f64).cbrt().ceil() as usize;
        for (name, resolution) in [("cbrt", grid_res), ("fine", 2 * grid_res)] {
            let builder = TessellationBuilder::new(TessellationConfig {
                grid_resolution: Some(resolution),
                ..Default::default()
            });
            group.bench_with_input(BenchmarkId::new(name, size), &size, |b, _| {
                b.iter(|| builder.build(&points, &owners, &domain).unwrap())
            });
        }
    }
    group.finish();
}

criterion_group!(benches, benchmark_scaling);
criterion_main!(benches);
