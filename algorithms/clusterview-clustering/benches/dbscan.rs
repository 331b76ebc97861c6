use clusterview::benchmarks::config;
use clusterview::prelude::{ParamGuard, Transformer};
use clusterview_clustering::Dbscan;
use clusterview_datasets::generate;
use clusterview_nn::CommonNearestNeighbour;
use criterion::{
    black_box, criterion_group, criterion_main, AxisScale, BenchmarkId, Criterion,
    PlotConfiguration,
};
use ndarray::Array2;
use ndarray_rand::rand::SeedableRng;
use ndarray_rand::rand_distr::Uniform;
use ndarray_rand::RandomExt;
use rand_xoshiro::Xoshiro256Plus;

fn dbscan_bench(c: &mut Criterion) {
    let mut rng = Xoshiro256Plus::seed_from_u64(40);
    let cluster_sizes = vec![10, 100, 1000];

    let mut benchmark = c.benchmark_group("dbscan");
    config::set_default_benchmark_configs(&mut benchmark);
    benchmark.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    for cluster_size in cluster_sizes {
        let min_points = 4;
        let tolerance = 0.3;
        let centroids =
            Array2::random_using((min_points, 2), Uniform::new(-30., 30.), &mut rng);
        let dataset = generate::blobs(cluster_size, &centroids, &mut rng);

        for (name, nn_algo) in [
            ("linear", CommonNearestNeighbour::LinearSearch),
            ("kdtree", CommonNearestNeighbour::KdTree),
        ] {
            let params = Dbscan::params(min_points)
                .tolerance(tolerance)
                .nn_algo(nn_algo)
                .check_unwrap();
            benchmark.bench_with_input(
                BenchmarkId::new(name, cluster_size),
                &dataset,
                |bencher, dataset| bencher.iter(|| black_box(params.transform(dataset))),
            );
        }
    }
    benchmark.finish()
}

criterion_group! {
    name = benches;
    config = config::get_default_benchmark_configs();
    targets = dbscan_bench
}
criterion_main!(benches);
