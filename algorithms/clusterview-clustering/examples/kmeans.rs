use clusterview::Point;
use clusterview_clustering::{run_kmeans, K_RANGE};
use clusterview_datasets::generate;
use ndarray_rand::rand::SeedableRng;
use rand_xoshiro::Xoshiro256Plus;

// What the interactive view does on every change of `k`: scatter points over the canvas and
// label them with K-means. Run with `RUST_LOG=trace` to follow every iteration.
fn main() {
    env_logger::init();

    let mut rng = Xoshiro256Plus::seed_from_u64(42);
    let points: Vec<Point> = generate::points(&generate::uniform(200, 800., 600., &mut rng))
        .expect("planar points");

    for k in K_RANGE.step_by(3) {
        let outcome = run_kmeans(&points, k, 7).expect("k is at most the number of points");
        println!(
            "k = {:2}: {:3} iterations, mean squared distance to centroid {:10.2}",
            k, outcome.n_iterations, outcome.inertia
        );
        for (idx, centroid) in outcome.centroids.iter().enumerate() {
            let size = outcome
                .assignments
                .iter()
                .filter(|a| a.cluster() == Some(idx))
                .count();
            println!(
                "    cluster {:2} at ({:6.1}, {:6.1}) with {} points",
                idx, centroid.x, centroid.y, size
            );
        }
    }
}
