use crate::k_means::{KMeansParams, KMeansValidParams};
use crate::k_means::errors::KMeansError;
use crate::k_means::KMeansInit;
use clusterview::error::Error;
use clusterview::{prelude::*, DatasetBase, Float};
use clusterview_nn::distance::{Distance, L2Dist};
use log::{debug, trace};
use ndarray::{Array1, Array2, ArrayBase, Axis, Data, DataMut, Ix1, Ix2, Zip};
use ndarray_rand::rand::Rng;
use ndarray_rand::rand::SeedableRng;
use rand_xoshiro::Xoshiro256Plus;

#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Debug, PartialEq)]
/// K-means clustering aims to partition a set of unlabeled observations into clusters,
/// where each observation belongs to the cluster with the nearest mean.
///
/// The mean of the points within a cluster is called *centroid*.
///
/// Given the set of centroids, you can assign an observation to a cluster
/// choosing the nearest centroid.
///
/// We provide the _standard algorithm_ (also known as Lloyd's Algorithm).
/// More details on the algorithm can be found in the next section or
/// [here](https://en.wikipedia.org/wiki/K-means_clustering).
///
/// ## Standard algorithm
///
/// K-means is an iterative algorithm: it progressively refines the choice of centroids.
///
/// It's guaranteed to converge, even though it might not find the optimal set of centroids
/// (unfortunately it can get stuck in a local minimum, finding the optimal minimum if NP-hard!).
///
/// There are three steps in the standard algorithm:
/// - initialisation step: select initial centroids using one of our provided algorithms.
///   By default `n_clusters` distinct observations are sampled uniformly at random.
/// - assignment step: assign each observation to the nearest cluster
///   (minimum distance between the observation and the cluster's centroid). Ties go to the
///   centroid with the lowest index;
/// - update step: recompute the centroid of each cluster. A centroid which lost all its
///   observations stays where it is.
///
/// The initialisation step is a one-off, done at the very beginning.
/// Assignment and update are repeated in a loop until the assignment of every
/// observation stays the same between two iterations, no centroid moves by more than
/// `tolerance`, or we hit `max_n_iterations`. Hitting the iteration bound is not an error, the
/// fitted model reports it through [`KMeans::converged`].
///
/// ## Parallelisation
///
/// The work performed by the assignment step does not require any coordination:
/// the closest centroid for each point can be computed independently from the
/// closest centroid for any of the remaining points.
///
/// This makes it a good candidate for parallel execution: `KMeans::fit` parallelises the
/// assignment step thanks to the `rayon` feature in `ndarray`. The update step depends on the
/// complete assignment and runs on a single thread.
///
/// ## Tutorial
///
/// Let's do a walkthrough of a training-predict example.
///
/// ```
/// use clusterview::DatasetBase;
/// use clusterview::traits::{Fit, Predict};
/// use clusterview_clustering::KMeans;
/// use clusterview_datasets::generate;
/// use ndarray::{Axis, array};
/// use ndarray_rand::rand::SeedableRng;
/// use rand_xoshiro::Xoshiro256Plus;
/// use approx::assert_abs_diff_eq;
///
/// // Our random number generator, seeded for reproducibility
/// let mut rng = Xoshiro256Plus::seed_from_u64(42);
///
/// // `expected_centroids` has shape `(n_centroids, n_features)`
/// // i.e. three points in the 2-dimensional plane
/// let expected_centroids = array![[0., 1.], [-10., 20.], [-1., 10.]];
/// // Let's generate a synthetic dataset: three blobs of observations
/// // (100 points each) centered around our `expected_centroids`
/// let data = generate::blobs(100, &expected_centroids, &mut rng);
/// let n_clusters = expected_centroids.len_of(Axis(0));
///
/// let observations = DatasetBase::from(data);
/// // Let's configure and run our K-means algorithm
/// // We use the builder pattern to specify the hyperparameters
/// // `n_clusters` is the only mandatory parameter.
/// // If you don't specify the others (e.g. `n_runs`, `tolerance`, `max_n_iterations`)
/// // default values will be used.
/// let model = KMeans::params_with_rng(n_clusters, rng.clone())
///     .n_runs(5)
///     .fit(&observations)
///     .expect("KMeans fitted");
///
/// // Once we found our set of centroids, we can also assign new points to the nearest cluster
/// let new_observation = DatasetBase::from(array![[-9., 20.5]]);
/// // Predict returns the **index** of the nearest cluster
/// let dataset = model.predict(new_observation);
/// // We can retrieve the actual centroid of the closest cluster using `.centroids()`
/// let closest_centroid = &model.centroids().index_axis(Axis(0), dataset.targets()[0]);
/// assert_abs_diff_eq!(closest_centroid.to_owned(), &array![-10., 20.], epsilon = 1e-1);
/// ```
pub struct KMeans<F: Float, D: Distance<F>> {
    centroids: Array2<F>,
    cluster_count: Array1<F>,
    inertia: F,
    n_iterations: u64,
    converged: bool,
    dist_fn: D,
}

impl<F: Float> KMeans<F, L2Dist> {
    /// Hyperparameters with Euclidean distance and a random generator seeded with `42`
    pub fn params(nclusters: usize) -> KMeansParams<F, Xoshiro256Plus, L2Dist> {
        KMeansParams::new(nclusters, Xoshiro256Plus::seed_from_u64(42), L2Dist)
    }

    pub fn params_with_rng<R: Rng>(nclusters: usize, rng: R) -> KMeansParams<F, R, L2Dist> {
        KMeansParams::new(nclusters, rng, L2Dist)
    }
}

impl<F: Float, D: Distance<F>> KMeans<F, D> {
    pub fn params_with<R: Rng>(nclusters: usize, rng: R, dist_fn: D) -> KMeansParams<F, R, D> {
        KMeansParams::new(nclusters, rng, dist_fn)
    }

    /// Return the set of centroids as a 2-dimensional matrix with shape
    /// `(n_centroids, n_features)`.
    pub fn centroids(&self) -> &Array2<F> {
        &self.centroids
    }

    /// Return the number of training points belonging to each cluster
    pub fn cluster_count(&self) -> &Array1<F> {
        &self.cluster_count
    }

    /// Return the sum of squared distances between each training point and its closest
    /// centroid, averaged across all training points.
    ///
    /// Infinite when that mean exceeds the range of `F`, which can only happen for coordinates
    /// close to the limits of the type.
    pub fn inertia(&self) -> F {
        self.inertia
    }

    /// Number of assignment/update iterations performed by the retained run
    pub fn n_iterations(&self) -> u64 {
        self.n_iterations
    }

    /// Whether the retained run stopped before hitting `max_n_iterations`
    pub fn converged(&self) -> bool {
        self.converged
    }
}

struct Run<F> {
    centroids: Array2<F>,
    inertia: F,
    n_iterations: u64,
    converged: bool,
}

impl<F: Float, R: Rng + Clone, DA: Data<Elem = F>, T, D: Distance<F>>
    Fit<ArrayBase<DA, Ix2>, T, KMeansError> for KMeansValidParams<F, R, D>
{
    type Object = KMeans<F, D>;

    /// Given an input matrix `observations`, with shape `(n_observations, n_features)`,
    /// `fit` identifies `n_clusters` centroids based on the training data distribution.
    ///
    /// An instance of `KMeans` is returned.
    ///
    fn fit(
        &self,
        dataset: &DatasetBase<ArrayBase<DA, Ix2>, T>,
    ) -> Result<Self::Object, KMeansError> {
        let mut rng = self.rng().clone();
        let observations = dataset.records().view();
        let n_samples = dataset.nsamples();

        if n_samples == 0 {
            return Err(KMeansError::EmptyInput);
        }
        if self.n_clusters() > n_samples {
            return Err(KMeansError::TooManyClusters {
                n_clusters: self.n_clusters(),
                n_samples,
            });
        }
        if let Some(index) = observations
            .rows()
            .into_iter()
            .position(|row| row.iter().any(|v| !v.is_finite()))
        {
            return Err(Error::NonFinite { index }.into());
        }

        let scale = downscale_factor(observations.iter());
        let observations = observations.mapv(|v| v / scale);
        let tolerance = self.tolerance() / scale;

        let mut memberships = Array1::zeros(n_samples);
        let mut previous = Array1::zeros(n_samples);
        let mut dists = Array1::zeros(n_samples);
        let mut best: Option<Run<F>> = None;

        for n_run in 0..self.n_runs() {
            let mut centroids = self.init_method().run(
                self.dist_fn(),
                self.n_clusters(),
                observations.view(),
                &mut rng,
            )?;
            if let KMeansInit::Precomputed(_) = self.init_method() {
                centroids.mapv_inplace(|v| v / scale);
            }
            let mut n_iterations = 0;
            let mut converged = false;
            previous.fill(usize::MAX);

            for n_iter in 0..self.max_n_iterations() {
                update_memberships_and_dists(
                    self.dist_fn(),
                    &centroids,
                    &observations,
                    &mut memberships,
                    &mut dists,
                );
                let unchanged = memberships == previous;
                let new_centroids = compute_centroids(&centroids, &observations, &memberships);
                let shift = max_centroid_shift(self.dist_fn(), &centroids, &new_centroids);
                trace!(
                    "k-means run {} iteration {}: inertia {}, largest centroid shift {}",
                    n_run,
                    n_iter,
                    dists.sum() * scale * scale,
                    shift * scale
                );
                centroids = new_centroids;
                n_iterations = n_iter + 1;
                if unchanged || shift < tolerance {
                    converged = true;
                    break;
                }
                previous.assign(&memberships);
            }

            update_min_dists(self.dist_fn(), &centroids, &observations, &mut dists);
            let inertia = dists.sum();
            debug!(
                "k-means run {} stopped after {} iterations (converged: {}), inertia {}",
                n_run,
                n_iterations,
                converged,
                inertia * scale * scale
            );

            // We keep the centroids which minimize the inertia (defined as the sum of
            // the squared distances of the closest centroid for all observations)
            // over the n runs of the KMeans algorithm.
            if best.as_ref().map_or(true, |b| inertia < b.inertia) {
                best = Some(Run {
                    centroids,
                    inertia,
                    n_iterations,
                    converged,
                });
            }
        }

        match best {
            Some(run) if run.inertia.is_finite() => {
                update_cluster_memberships(
                    self.dist_fn(),
                    &run.centroids,
                    &observations,
                    &mut memberships,
                );
                let mut cluster_count = Array1::zeros(self.n_clusters());
                memberships
                    .iter()
                    .for_each(|&c| cluster_count[c] += F::one());
                Ok(KMeans {
                    centroids: run.centroids * scale,
                    cluster_count,
                    inertia: run.inertia / F::cast(n_samples) * scale * scale,
                    n_iterations: run.n_iterations,
                    converged: run.converged,
                    dist_fn: self.dist_fn().clone(),
                })
            }
            _ => Err(KMeansError::InertiaError),
        }
    }
}

impl<F: Float, DA: Data<Elem = F>, D: Distance<F>> Transformer<&ArrayBase<DA, Ix2>, Array1<F>>
    for KMeans<F, D>
{
    /// Given an input matrix `observations`, with shape `(n_observations, n_features)`,
    /// `transform` returns, for each observation, its squared distance to its centroid.
    fn transform(&self, observations: &ArrayBase<DA, Ix2>) -> Array1<F> {
        let mut dists = Array1::zeros(observations.nrows());
        let scale = downscale_factor(observations.iter().chain(self.centroids.iter()));
        if scale == F::one() {
            update_min_dists(
                &self.dist_fn,
                &self.centroids,
                &observations.view(),
                &mut dists,
            );
            dists
        } else {
            update_min_dists(
                &self.dist_fn,
                &(&self.centroids / scale),
                &observations.mapv(|v| v / scale),
                &mut dists,
            );
            dists * (scale * scale)
        }
    }
}

impl<F: Float, DA: Data<Elem = F>, D: Distance<F>> PredictInplace<ArrayBase<DA, Ix2>, Array1<usize>>
    for KMeans<F, D>
{
    /// Given an input matrix `observations`, with shape `(n_observations, n_features)`,
    /// `predict` returns, for each observation, the index of the closest cluster/centroid.
    ///
    /// You can retrieve the centroid associated to an index using the
    /// [`centroids` method](#method.centroids).
    fn predict_inplace(&self, observations: &ArrayBase<DA, Ix2>, memberships: &mut Array1<usize>) {
        assert_eq!(
            observations.nrows(),
            memberships.len(),
            "The number of data points must match the number of memberships."
        );

        let scale = downscale_factor(observations.iter().chain(self.centroids.iter()));
        if scale == F::one() {
            update_cluster_memberships(
                &self.dist_fn,
                &self.centroids,
                &observations.view(),
                memberships,
            );
        } else {
            update_cluster_memberships(
                &self.dist_fn,
                &(&self.centroids / scale),
                &observations.mapv(|v| v / scale),
                memberships,
            );
        }
    }

    fn default_target(&self, x: &ArrayBase<DA, Ix2>) -> Array1<usize> {
        Array1::zeros(x.nrows())
    }
}

impl<F: Float, DA: Data<Elem = F>, D: Distance<F>> PredictInplace<ArrayBase<DA, Ix1>, usize>
    for KMeans<F, D>
{
    /// Given one input observation, return the index of its closest cluster
    ///
    /// You can retrieve the centroid associated to an index using the
    /// [`centroids` method](#method.centroids).
    fn predict_inplace(&self, observation: &ArrayBase<DA, Ix1>, membership: &mut usize) {
        let scale = downscale_factor(observation.iter().chain(self.centroids.iter()));
        *membership = if scale == F::one() {
            closest_centroid(&self.dist_fn, &self.centroids, observation).0
        } else {
            closest_centroid(
                &self.dist_fn,
                &(&self.centroids / scale),
                &observation.mapv(|v| v / scale),
            )
            .0
        };
    }

    fn default_target(&self, _x: &ArrayBase<DA, Ix1>) -> usize {
        0
    }
}

/// K-means is an iterative algorithm.
/// We will perform the assignment and update steps until we are satisfied
/// (according to our convergence criteria).
///
/// `compute_centroids` returns a 2-dimensional array,
/// where the i-th row corresponds to the i-th cluster. Clusters without any observation keep
/// their old centroid.
fn compute_centroids<F: Float>(
    old_centroids: &Array2<F>,
    // (n_observations, n_features)
    observations: &ArrayBase<impl Data<Elem = F>, Ix2>,
    // (n_observations,)
    cluster_memberships: &ArrayBase<impl Data<Elem = usize>, Ix1>,
) -> Array2<F> {
    let n_clusters = old_centroids.nrows();
    let mut counts: Array1<usize> = Array1::zeros(n_clusters);
    let mut centroids = Array2::zeros((n_clusters, observations.ncols()));

    Zip::from(observations.rows())
        .and(cluster_memberships)
        .for_each(|observation, &cluster_membership| {
            let mut centroid = centroids.row_mut(cluster_membership);
            centroid += &observation;
            counts[cluster_membership] += 1;
        });

    Zip::from(centroids.rows_mut())
        .and(old_centroids.rows())
        .and(&counts)
        .for_each(|mut centroid, old_centroid, &cnt| {
            if cnt == 0 {
                centroid.assign(&old_centroid);
            } else {
                centroid /= F::cast(cnt);
            }
        });
    centroids
}

/// Power of two which brings the largest absolute coordinate into `[1, 2)`, or one when no
/// coordinate exceeds one in magnitude.
///
/// Squared distances and coordinate sums of points beyond roughly `1e154` overflow. Dividing by a
/// power of two is exact, so memberships and means computed on the rescaled points are the ones
/// of the original points.
fn downscale_factor<'a, F: Float>(values: impl IntoIterator<Item = &'a F>) -> F {
    let max_abs = values
        .into_iter()
        .fold(F::zero(), |acc, v| acc.max(v.abs()));
    if max_abs > F::one() {
        let two = F::cast(2.);
        max_abs.log2().floor().to_i32().map_or(F::one(), |exp| {
            // log2 rounds up just below a power of two
            if two.powi(exp) > max_abs {
                two.powi(exp - 1)
            } else {
                two.powi(exp)
            }
        })
    } else {
        F::one()
    }
}

/// Largest distance travelled by a centroid during an update step
fn max_centroid_shift<F: Float, D: Distance<F>>(
    dist_fn: &D,
    old_centroids: &Array2<F>,
    new_centroids: &Array2<F>,
) -> F {
    old_centroids
        .rows()
        .into_iter()
        .zip(new_centroids.rows())
        .map(|(old, new)| dist_fn.distance(old, new))
        .fold(F::zero(), |acc, shift| acc.max(shift))
}

// Update `cluster_memberships` with the index of the cluster each observation belongs to.
pub(crate) fn update_cluster_memberships<F: Float, D: Distance<F>>(
    dist_fn: &D,
    centroids: &ArrayBase<impl Data<Elem = F> + Sync, Ix2>,
    observations: &ArrayBase<impl Data<Elem = F> + Sync, Ix2>,
    cluster_memberships: &mut ArrayBase<impl DataMut<Elem = usize>, Ix1>,
) {
    Zip::from(observations.axis_iter(Axis(0)))
        .and(cluster_memberships)
        .par_for_each(|observation, cluster_membership| {
            *cluster_membership = closest_centroid(dist_fn, centroids, &observation).0
        });
}

// Updates `dists` with the distance of each observation from its closest centroid.
pub(crate) fn update_min_dists<F: Float, D: Distance<F>>(
    dist_fn: &D,
    centroids: &ArrayBase<impl Data<Elem = F> + Sync, Ix2>,
    observations: &ArrayBase<impl Data<Elem = F> + Sync, Ix2>,
    dists: &mut ArrayBase<impl DataMut<Elem = F>, Ix1>,
) {
    Zip::from(observations.axis_iter(Axis(0)))
        .and(dists)
        .par_for_each(|observation, dist| {
            *dist = closest_centroid(dist_fn, centroids, &observation).1
        });
}

// Efficient combination of `update_cluster_memberships` and `update_min_dists`.
pub(crate) fn update_memberships_and_dists<F: Float, D: Distance<F>>(
    dist_fn: &D,
    centroids: &ArrayBase<impl Data<Elem = F> + Sync, Ix2>,
    observations: &ArrayBase<impl Data<Elem = F> + Sync, Ix2>,
    cluster_memberships: &mut ArrayBase<impl DataMut<Elem = usize>, Ix1>,
    dists: &mut ArrayBase<impl DataMut<Elem = F>, Ix1>,
) {
    Zip::from(observations.axis_iter(Axis(0)))
        .and(cluster_memberships)
        .and(dists)
        .par_for_each(|observation, cluster_membership, dist| {
            let (m, d) = closest_centroid(dist_fn, centroids, &observation);
            *cluster_membership = m;
            *dist = d;
        });
}

/// Given a matrix of centroids with shape (n_centroids, n_features) and an observation,
/// return the index of the closest centroid (the index of the corresponding row in `centroids`)
/// together with its `rdistance` to the observation. Ties go to the lowest index.
pub(crate) fn closest_centroid<F: Float, D: Distance<F>>(
    dist_fn: &D,
    // (n_centroids, n_features)
    centroids: &ArrayBase<impl Data<Elem = F>, Ix2>,
    // (n_features)
    observation: &ArrayBase<impl Data<Elem = F>, Ix1>,
) -> (usize, F) {
    let iterator = centroids.rows().into_iter();

    let first_centroid = centroids.row(0);
    let (mut closest_index, mut minimum_distance) = (
        0,
        dist_fn.rdistance(first_centroid.view(), observation.view()),
    );

    for (centroid_index, centroid) in iterator.enumerate() {
        let distance = dist_fn.rdistance(centroid.view(), observation.view());
        if distance < minimum_distance {
            closest_index = centroid_index;
            minimum_distance = distance;
        }
    }
    (closest_index, minimum_distance)
}
