//! Utility functions for randomly generating point sets

use clusterview::{error::Result, points::points_from_records, DatasetBase, Point};
use ndarray::{s, Array, Array1, Array2, ArrayBase, Data, Ix1, Ix2};
use ndarray_rand::{
    rand::Rng,
    rand_distr::{Distribution, StandardNormal, Uniform},
    RandomExt,
};

/// Special case of `blobs_with_distribution` with a standard normal distribution.
pub fn blobs(
    blob_size: usize,
    blob_centroids: &ArrayBase<impl Data<Elem = f64>, Ix2>,
    rng: &mut impl Rng,
) -> Array2<f64> {
    blobs_with_distribution(blob_size, blob_centroids, StandardNormal, rng)
}

/// Given an input matrix `blob_centroids`, with shape `(n_blobs, n_features)`,
/// generate `blob_size` data points (a "blob") around each of the blob centroids.
///
/// More specifically, each blob is formed by `blob_size` points sampled from a distribution
/// centered in the blob centroid. Points of blob `i` occupy rows `i * blob_size..(i + 1) * blob_size`.
///
/// `blobs` can be used to quickly assemble a synthetic dataset to test or
/// benchmark various clustering algorithms on a best-case scenario input.
pub fn blobs_with_distribution(
    blob_size: usize,
    blob_centroids: &ArrayBase<impl Data<Elem = f64>, Ix2>,
    distribution: impl Distribution<f64> + Clone,
    rng: &mut impl Rng,
) -> Array2<f64> {
    let (n_centroids, n_features) = blob_centroids.dim();
    let mut blobs: Array2<f64> = Array2::zeros((n_centroids * blob_size, n_features));

    for (blob_index, blob_centroid) in blob_centroids.rows().into_iter().enumerate() {
        let blob = make_blob(blob_size, &blob_centroid, distribution.clone(), rng);

        let indexes = s![blob_index * blob_size..(blob_index + 1) * blob_size, ..];
        blobs.slice_mut(indexes).assign(&blob);
    }
    blobs
}

/// Standard normal blobs with the index of the originating blob as target
pub fn labelled_blobs(
    blob_size: usize,
    blob_centroids: &ArrayBase<impl Data<Elem = f64>, Ix2>,
    rng: &mut impl Rng,
) -> DatasetBase<Array2<f64>, Array1<usize>> {
    let records = blobs(blob_size, blob_centroids, rng);
    let targets = Array1::from_shape_fn(records.nrows(), |i| i / blob_size.max(1));
    DatasetBase::new(records, targets)
}

/// `n_points` points in the plane, uniformly distributed over `[0, width) x [0, height)`.
///
/// This is the kind of input the interactive view produces when it scatters random points.
pub fn uniform(n_points: usize, width: f64, height: f64, rng: &mut impl Rng) -> Array2<f64> {
    let xs = Array::random_using(n_points, Uniform::new(0., width), rng);
    let ys = Array::random_using(n_points, Uniform::new(0., height), rng);
    let mut points = Array2::zeros((n_points, 2));
    points.column_mut(0).assign(&xs);
    points.column_mut(1).assign(&ys);
    points
}

/// Read a generated `(n_points, 2)` matrix as points
pub fn points(records: &ArrayBase<impl Data<Elem = f64>, Ix2>) -> Result<Vec<Point>> {
    points_from_records(records)
}

/// Generate `blob_size` data points (a "blob") around `blob_centroid` using the given distribution.
///
/// `blob` can be used to quickly assemble a synthetic stereotypical cluster.
fn make_blob(
    blob_size: usize,
    blob_centroid: &ArrayBase<impl Data<Elem = f64>, Ix1>,
    distribution: impl Distribution<f64>,
    rng: &mut impl Rng,
) -> Array2<f64> {
    let shape = (blob_size, blob_centroid.len());
    let origin_blob: Array2<f64> = Array::random_using(shape, distribution, rng);
    origin_blob + blob_centroid
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::{array, Axis};
    use ndarray_rand::rand::SeedableRng;
    use rand_xoshiro::Xoshiro256Plus;

    #[test]
    fn blobs_surround_their_centroids() {
        let mut rng = Xoshiro256Plus::seed_from_u64(42);
        let centroids = array![[0., 1.], [-10., 20.], [-1., 10.]];
        let data = blobs(500, &centroids, &mut rng);
        assert_eq!(data.dim(), (1500, 2));

        for (i, centroid) in centroids.rows().into_iter().enumerate() {
            let blob = data.slice(s![i * 500..(i + 1) * 500, ..]);
            let mean = blob.mean_axis(Axis(0)).unwrap();
            assert_abs_diff_eq!(mean, centroid, epsilon = 0.2);
        }
    }

    #[test]
    fn labels_follow_blob_order() {
        let mut rng = Xoshiro256Plus::seed_from_u64(1);
        let dataset = labelled_blobs(3, &array![[0., 0.], [5., 5.]], &mut rng);
        assert_eq!(dataset.targets(), &array![0, 0, 0, 1, 1, 1]);
        assert_eq!(dataset.records().nrows(), 6);
    }

    #[test]
    fn uniform_points_stay_inside() {
        let mut rng = Xoshiro256Plus::seed_from_u64(3);
        let data = uniform(200, 800., 600., &mut rng);
        assert_eq!(data.dim(), (200, 2));
        assert!(data.column(0).iter().all(|&x| (0. ..800.).contains(&x)));
        assert!(data.column(1).iter().all(|&y| (0. ..600.).contains(&y)));
        assert_eq!(points(&data).unwrap().len(), 200);
    }
}
