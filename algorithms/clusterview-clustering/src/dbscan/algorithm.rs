use crate::dbscan::{DbscanError, DbscanParams, DbscanValidParams};
use clusterview::{error::Error, prelude::*, DatasetBase, Float};
use clusterview_nn::{
    distance::{Distance, L2Dist},
    CommonNearestNeighbour, NearestNeighbour, NearestNeighbourIndex,
};
use log::debug;
use ndarray::{Array1, ArrayBase, Data, Ix2};
use std::collections::VecDeque;

#[derive(Clone, Debug, PartialEq)]
/// DBSCAN (Density-based Spatial Clustering of Applications with Noise)
/// clusters together points which are close together with enough neighbors
/// labelled points which are sparsely neighbored as noise. As points may be
/// part of a cluster or noise the transform method returns
/// `Array1<Option<usize>>`
///
/// As it groups together points in dense regions the number of clusters is
/// determined by the dataset and distance tolerance not the user.
///
/// We provide an implemention of the standard O(N^2) query-based algorithm
/// of which more details can be found in the next section or
/// [here](https://en.wikipedia.org/wiki/DBSCAN).
///
/// The standard DBSCAN algorithm isn't iterative and therefore there's
/// no fit method provided only transform.
///
/// ## The algorithm
///
/// The algorithm iterates over each point in the dataset and for every point
/// not yet assigned to a cluster:
/// - Find all points within the neighborhood of size `tolerance`, the point itself included
/// - If the number of points in the neighborhood is below `min_points`, leave the
///   point as noise for now. A later cluster may still claim it as a border point
/// - Otherwise label the point with a new cluster ID and visit its neighbours breadth-first,
///   expanding through every neighbour which is a core point itself
///
/// Neighbours are visited in ascending index order, so cluster IDs follow the order in which
/// core points are discovered and the result does not depend on the nearest neighbour
/// backend. A border point reachable from several clusters belongs to the first one.
///
/// ## Tutorial
///
/// Let's do a walkthrough of an example running DBSCAN on some data.
///
/// ```rust
/// use clusterview::traits::Transformer;
/// use clusterview_clustering::Dbscan;
/// use clusterview_datasets::generate;
/// use ndarray::array;
/// use ndarray_rand::rand::SeedableRng;
/// use rand_xoshiro::Xoshiro256Plus;
///
/// // Our random number generator, seeded for reproducibility
/// let seed = 42;
/// let mut rng = Xoshiro256Plus::seed_from_u64(seed);
///
/// // `expected_centroids` has shape `(n_centroids, n_features)`
/// // i.e. three points in the 2-dimensional plane
/// let expected_centroids = array![[0., 1.], [-10., 20.], [-1., 10.]];
/// // Let's generate a synthetic dataset: three blobs of observations
/// // (100 points each) centered around our `expected_centroids`
/// let observations = generate::blobs(100, &expected_centroids, &mut rng);
///
/// // Let's configure and run our DBSCAN algorithm
/// // We use the builder pattern to specify the hyperparameters
/// // `min_points` is the only mandatory parameter.
/// // If you don't specify the others (e.g. `tolerance`)
/// // default values will be used.
/// let min_points = 3;
/// let clusters = Dbscan::params(min_points)
///     .tolerance(1.)
///     .transform(&observations)
///     .unwrap();
/// // Points are `None` if noise `Some(id)` if belonging to a cluster.
/// assert_eq!(clusters.len(), 300);
/// ```
///
pub struct Dbscan;

impl Dbscan {
    /// Configures the hyperparameters with the minimum number of points required to form a cluster
    ///
    /// Defaults are provided if the optional parameters are not specified:
    /// * `tolerance = 1e-4`
    /// * `dist_fn = L2Dist` (Euclidean distance)
    /// * `nn_algo = LinearSearch`
    pub fn params<F: Float>(min_points: usize) -> DbscanParams<F, L2Dist, CommonNearestNeighbour> {
        Self::params_with(min_points, L2Dist, CommonNearestNeighbour::LinearSearch)
    }

    /// Configures the hyperparameters with the minimum number of points, a custom distance metric,
    /// and a custom nearest neighbour algorithm
    pub fn params_with<F: Float, D: Distance<F>, N: NearestNeighbour>(
        min_points: usize,
        dist_fn: D,
        nn_algo: N,
    ) -> DbscanParams<F, D, N> {
        DbscanParams::new(min_points, dist_fn, nn_algo)
    }
}

impl<F: Float, D: Data<Elem = F>, DF: Distance<F>, N: NearestNeighbour>
    Transformer<&ArrayBase<D, Ix2>, Result<Array1<Option<usize>>, DbscanError>>
    for DbscanValidParams<F, DF, N>
{
    fn transform(
        &self,
        observations: &ArrayBase<D, Ix2>,
    ) -> Result<Array1<Option<usize>>, DbscanError> {
        let mut cluster_memberships = Array1::from_elem(observations.nrows(), None);
        if observations.nrows() == 0 {
            return Ok(cluster_memberships);
        }
        if let Some(index) = observations
            .rows()
            .into_iter()
            .position(|row| row.iter().any(|v| !v.is_finite()))
        {
            return Err(Error::NonFinite { index }.into());
        }

        let mut current_cluster_id = 0;
        // Tracks whether a value is in the search queue to prevent duplicates
        let mut search_found = vec![false; observations.nrows()];
        let mut search_queue = VecDeque::with_capacity(observations.nrows());
        let nn = self
            .nn_algo()
            .from_batch(observations, self.dist_fn().clone())?;

        for i in 0..observations.nrows() {
            if cluster_memberships[i].is_some() {
                continue;
            }
            let (neighbor_count, neighbors) =
                self.find_neighbors(&*nn, i, observations, &cluster_memberships)?;
            if neighbor_count < self.minimum_points() {
                continue;
            }
            neighbors.iter().for_each(|&n| search_found[n] = true);
            search_queue.extend(neighbors.into_iter());

            // Now go over the neighbours adding them to the cluster
            cluster_memberships[i] = Some(current_cluster_id);

            while let Some(candidate_idx) = search_queue.pop_front() {
                search_found[candidate_idx] = false;

                let (neighbor_count, neighbors) =
                    self.find_neighbors(&*nn, candidate_idx, observations, &cluster_memberships)?;
                // Make the candidate a part of the cluster even if it's not a core point
                cluster_memberships[candidate_idx] = Some(current_cluster_id);
                if neighbor_count >= self.minimum_points() {
                    for n in neighbors.into_iter() {
                        if !search_found[n] {
                            search_queue.push_back(n);
                            search_found[n] = true;
                        }
                    }
                }
            }
            current_cluster_id += 1;
        }

        debug!(
            "dbscan found {} clusters and {} noise points among {} points",
            current_cluster_id,
            cluster_memberships.iter().filter(|m| m.is_none()).count(),
            observations.nrows()
        );
        Ok(cluster_memberships)
    }
}

impl<F: Float, D: Distance<F>, N: NearestNeighbour> DbscanValidParams<F, D, N> {
    /// Size of the neighbourhood of `idx`, the point itself included, and the neighbours which
    /// are not part of a cluster yet in ascending index order
    fn find_neighbors(
        &self,
        nn: &dyn NearestNeighbourIndex<F>,
        idx: usize,
        observations: &ArrayBase<impl Data<Elem = F>, Ix2>,
        clusters: &Array1<Option<usize>>,
    ) -> Result<(usize, Vec<usize>), DbscanError> {
        let candidate = observations.row(idx);
        let mut res = Vec::with_capacity(self.minimum_points());
        let mut count = 0;
        for (_, i) in nn.within_range(candidate.view(), self.tolerance())?.into_iter() {
            count += 1;
            if clusters[i].is_none() && i != idx {
                res.push(i);
            }
        }
        res.sort_unstable();
        Ok((count, res))
    }
}

impl<F: Float, D: Data<Elem = F>, T, DF: Distance<F>, N: NearestNeighbour>
    Transformer<
        DatasetBase<ArrayBase<D, Ix2>, T>,
        Result<DatasetBase<ArrayBase<D, Ix2>, Array1<Option<usize>>>, DbscanError>,
    > for DbscanValidParams<F, DF, N>
{
    fn transform(
        &self,
        dataset: DatasetBase<ArrayBase<D, Ix2>, T>,
    ) -> Result<DatasetBase<ArrayBase<D, Ix2>, Array1<Option<usize>>>, DbscanError> {
        let predicted = self.transform(dataset.records())?;
        Ok(dataset.with_targets(predicted))
    }
}

impl<F: Float, D: Data<Elem = F>, DF: Distance<F>, N: NearestNeighbour>
    Transformer<&ArrayBase<D, Ix2>, Result<Array1<Option<usize>>, DbscanError>>
    for DbscanParams<F, DF, N>
{
    /// Checks the hyperparameters before clustering `observations`
    fn transform(
        &self,
        observations: &ArrayBase<D, Ix2>,
    ) -> Result<Array1<Option<usize>>, DbscanError> {
        self.check_ref()?.transform(observations)
    }
}

impl<F: Float, D: Data<Elem = F>, T, DF: Distance<F>, N: NearestNeighbour>
    Transformer<
        DatasetBase<ArrayBase<D, Ix2>, T>,
        Result<DatasetBase<ArrayBase<D, Ix2>, Array1<Option<usize>>>, DbscanError>,
    > for DbscanParams<F, DF, N>
{
    fn transform(
        &self,
        dataset: DatasetBase<ArrayBase<D, Ix2>, T>,
    ) -> Result<DatasetBase<ArrayBase<D, Ix2>, Array1<Option<usize>>>, DbscanError> {
        self.check_ref()?.transform(dataset)
    }
}
