use clusterview_nn::{distance::*, CommonNearestNeighbour, NearestNeighbour};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use ndarray::{Array1, Array2};
use ndarray_rand::{rand::SeedableRng, rand_distr::Uniform, RandomExt};
use rand_xoshiro::Xoshiro256Plus;

fn nn_build_bench(c: &mut Criterion) {
    let mut rng = Xoshiro256Plus::seed_from_u64(40);
    let mut benchmark = c.benchmark_group("nn_build");

    for &n_points in &[1000, 5000, 10000] {
        let rng = &mut rng;
        let points = Array2::random_using((n_points, 2), Uniform::new(-500., 500.), rng);

        benchmark.bench_with_input(
            BenchmarkId::new("kdtree", format!("{}", n_points)),
            &points,
            |bencher, points| {
                bencher.iter(|| CommonNearestNeighbour::KdTree.from_batch(points, L2Dist).unwrap());
            },
        );
    }
    benchmark.finish();
}

fn within_range_bench(c: &mut Criterion) {
    let mut rng = Xoshiro256Plus::seed_from_u64(40);
    let mut benchmark = c.benchmark_group("within_range");
    let distr = Uniform::new(-500., 500.);

    let algorithms = &[
        (CommonNearestNeighbour::LinearSearch, "linear search"),
        (CommonNearestNeighbour::KdTree, "kdtree"),
    ];

    for &(n_points, range) in &[(1000, 10.0), (5000, 25.0), (5000, 100.0)] {
        let pt = Array1::random_using(2, distr, &mut rng);
        let points = Array2::random_using((n_points, 2), distr, &mut rng);

        for (alg, name) in algorithms {
            let nn = alg.from_batch(&points, L2Dist).unwrap();
            benchmark.bench_with_input(
                BenchmarkId::new(*name, format!("{}-{}", n_points, range)),
                &range,
                |bencher, &range| {
                    bencher.iter(|| black_box(nn.within_range(pt.view(), range).unwrap()));
                },
            );
        }
    }
    benchmark.finish();
}

criterion_group!(benches, nn_build_bench, within_range_bench);
criterion_main!(benches);
