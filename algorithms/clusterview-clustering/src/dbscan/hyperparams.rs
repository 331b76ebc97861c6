use clusterview::{prelude::*, Float};
use clusterview_nn::{distance::Distance, BuildError, NearestNeighbour, NnError};
#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};
use thiserror::Error;

#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Debug, PartialEq)]
/// The set of hyperparameters that can be specified for the execution of
/// the [DBSCAN algorithm](crate::Dbscan).
pub struct DbscanValidParams<F: Float, D: Distance<F>, N: NearestNeighbour> {
    pub(crate) tolerance: F,
    pub(crate) min_points: usize,
    pub(crate) dist_fn: D,
    pub(crate) nn_algo: N,
}

#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Debug, PartialEq)]
/// Helper struct for building a set of [DBSCAN hyperparameters](DbscanValidParams)
pub struct DbscanParams<F: Float, D: Distance<F>, N: NearestNeighbour>(
    pub(crate) DbscanValidParams<F, D, N>,
);

/// An error when running DBSCAN with an invalid hyperparameter
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DbscanParamsError {
    #[error("min_points must be at least 1")]
    MinPoints,
    #[error("tolerance must be a finite number greater than 0")]
    Tolerance,
}

/// An error when running DBSCAN
#[derive(Error, Debug)]
pub enum DbscanError {
    /// When any of the hyperparameters are set the wrong value
    #[error("Invalid hyperparameter: {0}")]
    InvalidParams(#[from] DbscanParamsError),
    /// When the range query index cannot be built over the points
    #[error("Nearest neighbour index: {0}")]
    NearestNeighbour(#[from] BuildError),
    #[error("Range query: {0}")]
    RangeQuery(#[from] NnError),
    #[error(transparent)]
    CoreError(#[from] clusterview::error::Error),
}

impl<F: Float, D: Distance<F>, N: NearestNeighbour> DbscanParams<F, D, N> {
    pub(crate) fn new(min_points: usize, dist_fn: D, nn_algo: N) -> Self {
        Self(DbscanValidParams {
            min_points,
            tolerance: F::cast(1e-4),
            dist_fn,
            nn_algo,
        })
    }

    /// Set the tolerance, the radius of the neighbourhood of a point
    pub fn tolerance(mut self, tolerance: F) -> Self {
        self.0.tolerance = tolerance;
        self
    }

    /// Set the minimum neighbourhood size, the point itself included, of a core point
    pub fn min_points(mut self, min_points: usize) -> Self {
        self.0.min_points = min_points;
        self
    }

    /// Set the nearest neighbour algorithm to be used
    pub fn nn_algo(mut self, nn_algo: N) -> Self {
        self.0.nn_algo = nn_algo;
        self
    }

    /// Set the distance metric
    pub fn dist_fn(mut self, dist_fn: D) -> Self {
        self.0.dist_fn = dist_fn;
        self
    }
}

impl<F: Float, D: Distance<F>, N: NearestNeighbour> ParamGuard for DbscanParams<F, D, N> {
    type Checked = DbscanValidParams<F, D, N>;
    type Error = DbscanParamsError;

    fn check_ref(&self) -> Result<&Self::Checked, Self::Error> {
        if self.0.min_points == 0 {
            Err(DbscanParamsError::MinPoints)
        } else if !self.0.tolerance.is_finite() || self.0.tolerance <= F::zero() {
            Err(DbscanParamsError::Tolerance)
        } else {
            Ok(&self.0)
        }
    }

    fn check(self) -> Result<Self::Checked, Self::Error> {
        self.check_ref()?;
        Ok(self.0)
    }
}

impl<F: Float, D: Distance<F>, N: NearestNeighbour> DbscanValidParams<F, D, N> {
    /// Radius of the neighbourhood of a point
    pub fn tolerance(&self) -> F {
        self.tolerance
    }

    /// Minimum number of neighboring points a point needs to have to be a core
    /// point and not a noise point.
    pub fn minimum_points(&self) -> usize {
        self.min_points
    }

    /// Distance metric used in the DBSCAN calculation
    pub fn dist_fn(&self) -> &D {
        &self.dist_fn
    }

    /// Nearest neighbour algorithm used for range queries
    pub fn nn_algo(&self) -> &N {
        &self.nn_algo
    }
}

#[cfg(test)]
mod tests {
    use clusterview_nn::{distance::L2Dist, CommonNearestNeighbour};

    use super::*;

    #[test]
    fn autotraits() {
        fn has_autotraits<T: Send + Sync + Sized + Unpin>() {}
        has_autotraits::<DbscanParams<f64, L2Dist, CommonNearestNeighbour>>();
        has_autotraits::<DbscanValidParams<f64, L2Dist, CommonNearestNeighbour>>();
        has_autotraits::<DbscanParamsError>();
        has_autotraits::<DbscanError>();
    }

    #[test]
    fn tolerance_cannot_be_zero() {
        let res = DbscanParams::new(2, L2Dist, CommonNearestNeighbour::KdTree)
            .tolerance(0.0)
            .check();
        assert!(matches!(res, Err(DbscanParamsError::Tolerance)));
    }

    #[test]
    fn tolerance_cannot_be_negative_or_nan() {
        for tolerance in [-2.0, f64::NAN, f64::INFINITY] {
            let res = DbscanParams::new(2, L2Dist, CommonNearestNeighbour::LinearSearch)
                .tolerance(tolerance)
                .check();
            assert!(matches!(res, Err(DbscanParamsError::Tolerance)));
        }
    }

    #[test]
    fn min_points_at_least_1() {
        let res = DbscanParams::new(0, L2Dist, CommonNearestNeighbour::KdTree)
            .tolerance(3.3)
            .check();
        assert!(matches!(res, Err(DbscanParamsError::MinPoints)));

        let params = DbscanParams::new(1, L2Dist, CommonNearestNeighbour::KdTree)
            .tolerance(3.3)
            .check_unwrap();
        assert_eq!(params.minimum_points(), 1);
        assert_eq!(params.tolerance(), 3.3);
    }

    #[test]
    fn builder_overrides_defaults() {
        let params = DbscanParams::<f64, _, _>::new(3, L2Dist, CommonNearestNeighbour::LinearSearch)
            .min_points(5)
            .nn_algo(CommonNearestNeighbour::KdTree)
            .check_unwrap();
        assert_eq!(params.minimum_points(), 5);
        assert_eq!(params.nn_algo(), &CommonNearestNeighbour::KdTree);
        assert_eq!(params.tolerance(), 1e-4);
    }
}
