use super::algorithm::update_min_dists;
use crate::KMeansError;
use clusterview::Float;
use clusterview_nn::distance::Distance;
use ndarray::{Array1, Array2, ArrayView2, Axis};
use ndarray_rand::rand::distributions::{Distribution, WeightedIndex};
use ndarray_rand::rand::{self, Rng};
#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Debug, PartialEq)]
#[non_exhaustive]
/// Specifies centroid initialization algorithm for KMeans.
pub enum KMeansInit<F: Float> {
    /// Pick `n_clusters` distinct points uniformly at random, without replacement, as the initial
    /// centroids. When `n_clusters` equals the number of points every point seeds one cluster.
    Random,
    /// Use a precomputed list of centroids, represented as an array of shape
    /// `(n_clusters, n_features)`
    Precomputed(Array2<F>),
    /// K-means++ algorithm. Using this over random initialization causes K-means to converge
    /// faster for almost all cases, since K-means++ produces better centroids.
    KMeansPlusPlus,
}

impl<F: Float> KMeansInit<F> {
    /// Runs the chosen initialization routine
    pub(crate) fn run<R: Rng, D: Distance<F>>(
        &self,
        dist_fn: &D,
        n_clusters: usize,
        observations: ArrayView2<F>,
        rng: &mut R,
    ) -> Result<Array2<F>, KMeansError> {
        match self {
            Self::Random => Ok(random_init(n_clusters, observations, rng)),
            Self::KMeansPlusPlus => Ok(k_means_plusplus(dist_fn, n_clusters, observations, rng)),
            Self::Precomputed(centroids) => {
                let expected = (n_clusters, observations.ncols());
                if centroids.dim() != expected {
                    Err(KMeansError::InitShape {
                        expected,
                        found: centroids.dim(),
                    })
                } else {
                    Ok(centroids.clone())
                }
            }
        }
    }
}

/// Pick random points as initial centroids
fn random_init<F: Float>(
    n_clusters: usize,
    observations: ArrayView2<F>,
    rng: &mut impl Rng,
) -> Array2<F> {
    let (n_samples, _) = observations.dim();
    let indices = rand::seq::index::sample(rng, n_samples, n_clusters).into_vec();
    observations.select(Axis(0), &indices)
}

/// Selects centroids using the KMeans++ initialization algorithm. The weights for choosing the
/// next centroid are the squared distances of each point to its closest existing centroid, so
/// points far away from the current centroids are more likely to be picked.
fn k_means_plusplus<F: Float, D: Distance<F>>(
    dist_fn: &D,
    n_clusters: usize,
    observations: ArrayView2<F>,
    rng: &mut impl Rng,
) -> Array2<F> {
    let (n_samples, n_features) = observations.dim();
    let mut centroids = Array2::zeros((n_clusters, n_features));
    // Pick 1st centroid randomly
    let first_idx = rng.gen_range(0..n_samples);
    centroids.row_mut(0).assign(&observations.row(first_idx));

    let mut dists = Array1::zeros(n_samples);
    for c_cnt in 1..n_clusters {
        update_min_dists(
            dist_fn,
            &centroids.slice(ndarray::s![0..c_cnt, ..]),
            &observations,
            &mut dists,
        );

        // Every point already coincides with a centroid, any choice is as good as another
        let centroid_idx = match WeightedIndex::new(dists.iter()) {
            Ok(weights) => weights.sample(rng),
            Err(_) => rng.gen_range(0..n_samples),
        };
        centroids
            .row_mut(c_cnt)
            .assign(&observations.row(centroid_idx));
    }
    centroids
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use clusterview_nn::distance::L2Dist;
    use ndarray::{array, concatenate, Array};
    use ndarray_rand::rand::SeedableRng;
    use ndarray_rand::rand_distr::Normal;
    use ndarray_rand::RandomExt;
    use rand_xoshiro::Xoshiro256Plus;
    use std::collections::HashSet;

    #[test]
    fn test_precomputed() {
        let mut rng = Xoshiro256Plus::seed_from_u64(40);
        let centroids = array![[0.0, 1.0], [40.0, 10.0]];
        let observations = array![[3.0, 4.0], [1.0, 3.0], [25.0, 15.0]];
        let c = KMeansInit::Precomputed(centroids.clone())
            .run(&L2Dist, 2, observations.view(), &mut rng)
            .unwrap();
        assert_abs_diff_eq!(c, centroids);
    }

    #[test]
    fn test_precomputed_shape_mismatch() {
        let mut rng = Xoshiro256Plus::seed_from_u64(40);
        let observations = array![[3.0, 4.0], [1.0, 3.0], [25.0, 15.0]];
        let res = KMeansInit::Precomputed(array![[0.0, 1.0]]).run(
            &L2Dist,
            2,
            observations.view(),
            &mut rng,
        );
        assert!(matches!(
            res,
            Err(KMeansError::InitShape {
                expected: (2, 2),
                found: (1, 2)
            })
        ));
    }

    #[test]
    fn random_init_picks_distinct_points() {
        let mut rng = Xoshiro256Plus::seed_from_u64(42);
        let observations = Array::from_shape_fn((20, 2), |(i, j)| (i * 2 + j) as f64);
        let centroids = random_init(8, observations.view(), &mut rng);
        assert_eq!(centroids.dim(), (8, 2));
        let picked: HashSet<_> = centroids.rows().into_iter().map(|r| r[0] as usize).collect();
        assert_eq!(picked.len(), 8);
        for row in centroids.rows() {
            let i = row[0] as usize / 2;
            assert_abs_diff_eq!(row, observations.row(i));
        }
    }

    #[test]
    fn random_init_uses_every_point_when_k_equals_n() {
        let mut rng = Xoshiro256Plus::seed_from_u64(7);
        let observations = array![[0.0, 0.0], [0.0, 1.0], [10.0, 10.0], [10.0, 11.0]];
        let centroids = random_init(4, observations.view(), &mut rng);
        let mut picked: Vec<_> = centroids.rows().into_iter().map(|r| (r[0] as i64, r[1] as i64)).collect();
        picked.sort_unstable();
        assert_eq!(picked, vec![(0, 0), (0, 1), (10, 10), (10, 11)]);
    }

    #[test]
    fn test_sample_kmeans_plusplus() {
        let mu = [1.0, 2.0];
        let std = 0.001;
        let mut rng = Xoshiro256Plus::seed_from_u64(42);
        let obs = Array::random_using((1000, 2), Normal::new(mu[0], std).unwrap(), &mut rng);
        let obs_far = Array::random_using((1, 2), Normal::new(500.0, std).unwrap(), &mut rng);
        let observations = concatenate(Axis(0), &[obs.view(), obs_far.view()]).unwrap();

        // With two centroids one of them has to land on the far away outlier
        let centroids = k_means_plusplus(&L2Dist, 2, observations.view(), &mut rng);
        let far = centroids
            .rows()
            .into_iter()
            .filter(|c| c[0] > 400.0)
            .count();
        assert_eq!(far, 1);
    }

    #[test]
    fn kmeans_plusplus_handles_duplicates() {
        let mut rng = Xoshiro256Plus::seed_from_u64(42);
        let observations = Array2::<f64>::ones((5, 2));
        let centroids = k_means_plusplus(&L2Dist, 3, observations.view(), &mut rng);
        assert_abs_diff_eq!(centroids, Array2::ones((3, 2)));
    }
}
