//! Planar points and the labels attached to them
//!
//! These are the types exchanged with the presentation layer. The algorithms themselves work on
//! `(n_points, n_features)` matrices; [`records_from_points`] and [`points_from_records`]
//! convert between the two representations.

use crate::error::{Error, Result};
use ndarray::{Array2, ArrayBase, Data, Ix2};
#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};
use std::fmt;

/// A point in the plane. Identity is positional: the index in the sequence it was supplied in.
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }

    /// Whether both coordinates are finite
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Euclidean distance to `other`
    pub fn distance(&self, other: &Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Point { x, y }
    }
}

impl From<[f64; 2]> for Point {
    fn from([x, y]: [f64; 2]) -> Self {
        Point { x, y }
    }
}

/// The label attached to one input point
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ClusterAssignment {
    /// Member of the cluster with this index
    Cluster(usize),
    /// Not part of any cluster (DBSCAN only)
    Noise,
}

impl ClusterAssignment {
    /// The cluster index, `None` for noise
    pub fn cluster(&self) -> Option<usize> {
        match self {
            ClusterAssignment::Cluster(idx) => Some(*idx),
            ClusterAssignment::Noise => None,
        }
    }

    pub fn is_noise(&self) -> bool {
        matches!(self, ClusterAssignment::Noise)
    }
}

impl From<usize> for ClusterAssignment {
    fn from(idx: usize) -> Self {
        ClusterAssignment::Cluster(idx)
    }
}

impl From<Option<usize>> for ClusterAssignment {
    fn from(membership: Option<usize>) -> Self {
        membership.map_or(ClusterAssignment::Noise, ClusterAssignment::Cluster)
    }
}

impl fmt::Display for ClusterAssignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClusterAssignment::Cluster(idx) => write!(f, "cluster {}", idx),
            ClusterAssignment::Noise => write!(f, "noise"),
        }
    }
}

/// Stack points into a `(n_points, 2)` record matrix.
///
/// Fails with [`Error::NonFinite`] for the first point carrying a NaN or infinite coordinate.
pub fn records_from_points(points: &[Point]) -> Result<Array2<f64>> {
    if let Some(index) = points.iter().position(|p| !p.is_finite()) {
        return Err(Error::NonFinite { index });
    }
    let flat = points.iter().flat_map(|p| [p.x, p.y]).collect::<Vec<_>>();
    Ok(Array2::from_shape_vec((points.len(), 2), flat)?)
}

/// Read the rows of a `(n_points, 2)` matrix back as points.
pub fn points_from_records(records: &ArrayBase<impl Data<Elem = f64>, Ix2>) -> Result<Vec<Point>> {
    if records.ncols() != 2 {
        return Err(Error::Parameters(format!(
            "expected 2 columns per point, found {}",
            records.ncols()
        )));
    }
    Ok(records
        .rows()
        .into_iter()
        .map(|row| Point::new(row[0], row[1]))
        .collect())
}
