//! `clusterview-nn` provides the epsilon-neighbourhood queries DBSCAN is built on, together with
//! the distance metrics shared by all clustering algorithms.
//!
//! ## Current state
//!
//! Right now `clusterview-nn` provides the following range query backends:
//! * [Linear search](LinearSearch), the naive `O(N)` scan per query
//! * [KD tree](KdTree), backed by the `kdtree` crate
//!
//! Both return the same set of neighbours for a given query, the order of the returned pairs is
//! not specified. Callers that depend on a deterministic visiting order sort by index.

use clusterview::Float;
use ndarray::{ArrayBase, ArrayView1, Data, Ix2};
#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};
use thiserror::Error;

use distance::Distance;

pub mod distance;
mod kdtree;
mod linear;

pub use crate::kdtree::*;
pub use linear::*;

pub(crate) type Point<'a, F> = ArrayView1<'a, F>;

/// Error returned when building a range query index fails
#[derive(Error, Debug)]
pub enum BuildError {
    #[error("points have dimension of 0")]
    ZeroDim,
    #[error("leaf size is 0")]
    EmptyLeaf,
    #[error("point {0} has a non-finite coordinate")]
    NonFinite(usize),
}

/// Error returned when performing a range query
#[derive(Error, Debug)]
pub enum NnError {
    #[error("dimensions of query point and stored points are different")]
    WrongDimension,
    #[error("query point has a non-finite coordinate")]
    NonFinite,
}

/// Range query index over a batch of points, built by a [`NearestNeighbour`] algorithm.
pub trait NearestNeighbourIndex<F: Float>: Send + Sync + Unpin {
    /// Returns all the points in the batch whose distance to `point` is at most `range`,
    /// together with their row index in the batch. A point of the batch is its own neighbour.
    fn within_range<'b>(
        &self,
        point: Point<'b, F>,
        range: F,
    ) -> Result<Vec<(Point<F>, usize)>, NnError>;

    /// Number of points stored in the index
    fn num_points(&self) -> usize;
}

/// A range query algorithm that builds an index from a batch of points.
pub trait NearestNeighbour: std::fmt::Debug + Send + Sync + Unpin {
    /// Builds a range query index from `batch`, a `(n_points, n_features)` matrix.
    ///
    /// Fails if `batch` has zero features.
    fn from_batch<'a, F: Float, DT: Data<Elem = F>, D: 'a + Distance<F>>(
        &self,
        batch: &'a ArrayBase<DT, Ix2>,
        dist_fn: D,
    ) -> Result<Box<dyn 'a + NearestNeighbourIndex<F>>, BuildError> {
        self.from_batch_with_leaf_size(batch, 2usize.pow(4), dist_fn)
    }

    /// Same as `from_batch`, with the number of points per leaf of tree based backends made
    /// explicit. Fails if `leaf_size` is 0.
    fn from_batch_with_leaf_size<'a, F: Float, DT: Data<Elem = F>, D: 'a + Distance<F>>(
        &self,
        batch: &'a ArrayBase<DT, Ix2>,
        leaf_size: usize,
        dist_fn: D,
    ) -> Result<Box<dyn 'a + NearestNeighbourIndex<F>>, BuildError>;
}

/// Enum that dispatches to one of the crate's [`NearestNeighbour`] implementations based on
/// value.
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum CommonNearestNeighbour {
    /// Linear search
    LinearSearch,
    /// KD Tree
    KdTree,
}

impl Default for CommonNearestNeighbour {
    fn default() -> Self {
        CommonNearestNeighbour::LinearSearch
    }
}

impl NearestNeighbour for CommonNearestNeighbour {
    fn from_batch_with_leaf_size<'a, F: Float, DT: Data<Elem = F>, D: 'a + Distance<F>>(
        &self,
        batch: &'a ArrayBase<DT, Ix2>,
        leaf_size: usize,
        dist_fn: D,
    ) -> Result<Box<dyn 'a + NearestNeighbourIndex<F>>, BuildError> {
        match self {
            Self::LinearSearch => LinearSearch.from_batch_with_leaf_size(batch, leaf_size, dist_fn),
            Self::KdTree => KdTree.from_batch_with_leaf_size(batch, leaf_size, dist_fn),
        }
    }
}
