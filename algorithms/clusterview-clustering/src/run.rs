//! Point-level entry points
//!
//! The presentation layer deals in [`Point`]s and [`ClusterAssignment`]s and picks one algorithm
//! per run. These functions convert between that representation and the record matrices the
//! algorithms work on, and fold every failure into [`ClusteringError`].

use crate::{Dbscan, DbscanError, KMeans, KMeansError};
use clusterview::error::Error as CoreError;
use clusterview::points::{points_from_records, records_from_points};
use clusterview::{prelude::*, ClusterAssignment, DatasetBase, Point};
use log::debug;
use ndarray::Array1;
use ndarray_rand::rand::SeedableRng;
use rand_xoshiro::Xoshiro256Plus;
#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use thiserror::Error;

/// Number of clusters offered by the interface
pub const K_RANGE: RangeInclusive<usize> = 1..=10;
/// Neighbourhood radii offered by the interface
pub const EPSILON_RANGE: RangeInclusive<f64> = 1.0..=100.0;
/// Minimum neighbourhood sizes offered by the interface
pub const MIN_POINTS_RANGE: RangeInclusive<usize> = 1..=10;

/// Why a clustering run produced no labels
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClusteringError {
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
    #[error("no points supplied")]
    EmptyInput,
}

impl From<CoreError> for ClusteringError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::EmptyInput => ClusteringError::EmptyInput,
            err => ClusteringError::InvalidParameter(err.to_string()),
        }
    }
}

impl From<KMeansError> for ClusteringError {
    fn from(err: KMeansError) -> Self {
        match err {
            KMeansError::EmptyInput => ClusteringError::EmptyInput,
            KMeansError::CoreError(err) => err.into(),
            err => ClusteringError::InvalidParameter(err.to_string()),
        }
    }
}

impl From<DbscanError> for ClusteringError {
    fn from(err: DbscanError) -> Self {
        match err {
            DbscanError::CoreError(err) => err.into(),
            err => ClusteringError::InvalidParameter(err.to_string()),
        }
    }
}

/// Result of a K-means run over points
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Debug, PartialEq)]
pub struct KMeansOutcome {
    /// One label per input point, in input order
    pub assignments: Vec<ClusterAssignment>,
    /// Final centroid of every cluster, indexed by cluster
    pub centroids: Vec<Point>,
    /// Mean squared distance of the points to their centroid, infinite if it overflows `f64`
    pub inertia: f64,
    pub n_iterations: u64,
}

/// Partition `points` into `n_clusters` groups with K-means.
///
/// The initial centroids are drawn from a generator seeded with `seed`, so the same points, number
/// of clusters and seed always produce the same outcome.
pub fn run_kmeans(
    points: &[Point],
    n_clusters: usize,
    seed: u64,
) -> Result<KMeansOutcome, ClusteringError> {
    let records = records_from_points(points)?;
    let fitted: Result<_, KMeansError> =
        KMeans::params_with_rng(n_clusters, Xoshiro256Plus::seed_from_u64(seed))
            .fit(&DatasetBase::from(records.view()));
    let model = fitted?;

    let memberships: Array1<usize> = model.predict(&records);
    debug!(
        "k-means over {} points with k = {} (seed {}): {} iterations, converged: {}",
        points.len(),
        n_clusters,
        seed,
        model.n_iterations(),
        model.converged()
    );

    Ok(KMeansOutcome {
        assignments: memberships.iter().map(|&c| c.into()).collect(),
        centroids: points_from_records(model.centroids())?,
        inertia: model.inertia(),
        n_iterations: model.n_iterations(),
    })
}

/// Group `points` into density-connected clusters with DBSCAN.
///
/// Points closer than or exactly `epsilon` apart are neighbours; a point with at least
/// `min_points` neighbours, itself included, is a core point. Points reached by no cluster are
/// labelled [`ClusterAssignment::Noise`].
pub fn run_dbscan(
    points: &[Point],
    epsilon: f64,
    min_points: usize,
) -> Result<Vec<ClusterAssignment>, ClusteringError> {
    let records = records_from_points(points)?;
    let memberships = Dbscan::params(min_points)
        .tolerance(epsilon)
        .transform(&records)?;

    Ok(memberships.iter().map(|&m| m.into()).collect())
}

/// The algorithm picked for one run, together with its parameters
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate", tag = "algorithm", rename_all = "snake_case")
)]
#[derive(Clone, Debug, PartialEq)]
pub enum Algorithm {
    KMeans { n_clusters: usize, seed: u64 },
    Dbscan { epsilon: f64, min_points: usize },
}

impl Algorithm {
    /// Label every point with the selected algorithm
    pub fn run(&self, points: &[Point]) -> Result<Vec<ClusterAssignment>, ClusteringError> {
        match *self {
            Algorithm::KMeans { n_clusters, seed } => {
                run_kmeans(points, n_clusters, seed).map(|outcome| outcome.assignments)
            }
            Algorithm::Dbscan {
                epsilon,
                min_points,
            } => run_dbscan(points, epsilon, min_points),
        }
    }
}
