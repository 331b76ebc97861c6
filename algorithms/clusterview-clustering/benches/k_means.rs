use clusterview::benchmarks::config;
use clusterview::traits::Fit;
use clusterview::DatasetBase;
use clusterview_clustering::{KMeans, KMeansInit};
use clusterview_datasets::generate;
use criterion::{
    black_box, criterion_group, criterion_main, AxisScale, BenchmarkId, Criterion,
    PlotConfiguration,
};
use ndarray::Array2;
use ndarray_rand::rand::SeedableRng;
use ndarray_rand::rand_distr::Uniform;
use ndarray_rand::RandomExt;
use rand_xoshiro::Xoshiro256Plus;

fn k_means_bench(c: &mut Criterion) {
    let mut rng = Xoshiro256Plus::seed_from_u64(40);
    let cluster_sizes = vec![(100, 4), (400, 10), (3000, 10)];

    let mut benchmark = c.benchmark_group("naive_k_means");
    config::set_default_benchmark_configs(&mut benchmark);
    benchmark.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));
    for (cluster_size, n_clusters) in cluster_sizes {
        let rng = &mut rng;
        let centroids = Array2::random_using((n_clusters, 2), Uniform::new(-30., 30.), rng);
        let dataset = DatasetBase::from(generate::blobs(cluster_size, &centroids, rng));
        for (name, init) in [
            ("random", KMeansInit::Random),
            ("k_means_plusplus", KMeansInit::KMeansPlusPlus),
        ] {
            benchmark.bench_function(BenchmarkId::new(name, cluster_size), |bencher| {
                bencher.iter(|| {
                    KMeans::params_with_rng(black_box(n_clusters), black_box(rng.clone()))
                        .init_method(init.clone())
                        .max_n_iterations(black_box(1000))
                        .tolerance(black_box(1e-3))
                        .fit(&dataset)
                        .unwrap()
                });
            });
        }
    }

    benchmark.finish();
}

criterion_group! {
    name = benches;
    config = config::get_default_benchmark_configs();
    targets = k_means_bench
}
criterion_main!(benches);
