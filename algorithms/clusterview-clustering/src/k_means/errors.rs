use thiserror::Error;

/// An error when fitting with an invalid hyperparameter
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KMeansParamsError {
    #[error("n_clusters cannot be 0")]
    NClusters,
    #[error("n_runs cannot be 0")]
    NRuns,
    #[error("tolerance must be greater than 0")]
    Tolerance,
    #[error("max_n_iterations cannot be 0")]
    MaxIterations,
}

/// An error when modeling a KMeans algorithm
#[derive(Error, Debug)]
pub enum KMeansError {
    /// When any of the hyperparameters are set the wrong value
    #[error("Invalid hyperparameter: {0}")]
    InvalidParams(#[from] KMeansParamsError),
    /// When there is nothing to cluster
    #[error("Fitting failed: no points supplied")]
    EmptyInput,
    /// When more clusters are requested than there are points to seed them with
    #[error("Fitting failed: {n_clusters} clusters requested but only {n_samples} points supplied")]
    TooManyClusters { n_clusters: usize, n_samples: usize },
    /// When precomputed centroids do not match the requested clusters and the data
    #[error("Precomputed centroids have shape {found:?}, expected {expected:?}")]
    InitShape {
        expected: (usize, usize),
        found: (usize, usize),
    },
    /// When the inertia of every run is NaN or infinite
    #[error("Fitting failed: inertia is not finite")]
    InertiaError,
    #[error(transparent)]
    CoreError(#[from] clusterview::error::Error),
}
