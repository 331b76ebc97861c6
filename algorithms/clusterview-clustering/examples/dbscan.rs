use clusterview::prelude::*;
use clusterview::DatasetBase;
use clusterview_clustering::Dbscan;
use clusterview_datasets::generate;
use ndarray::array;
use ndarray_rand::rand::SeedableRng;
use rand_xoshiro::Xoshiro256Plus;

// A routine DBSCAN task: build a synthetic dataset, label dense regions and noise, and report
// the size of each group. Run with `RUST_LOG=debug` to see the clustering summary.
fn main() {
    env_logger::init();

    // Our random number generator, seeded for reproducibility
    let mut rng = Xoshiro256Plus::seed_from_u64(42);

    // For each our expected centroids, generate `n` data points around it (a "blob")
    let expected_centroids = array![[10., 10.], [1., 12.], [20., 30.], [-20., 30.],];
    let n = 100;
    let dataset: DatasetBase<_, _> = generate::blobs(n, &expected_centroids, &mut rng).into();

    let min_points = 3;

    println!(
        "Clustering #{} data points grouped in 4 clusters of {} points each",
        dataset.nsamples(),
        n
    );

    let cluster_memberships = Dbscan::params(min_points)
        .tolerance(1.)
        .transform(dataset)
        .unwrap();

    let mut label_count = cluster_memberships
        .label_count()
        .into_iter()
        .collect::<Vec<_>>();
    label_count.sort_unstable();

    println!();
    println!("Result: ");
    for (label, count) in label_count {
        match label {
            None => println!(" - {} noise points", count),
            Some(i) => println!(" - {} points in cluster {}", count, i),
        }
    }
    println!();
}
