//! `clusterview-clustering` partitions a set of planar points into groups, or marks them as
//! noise, for the interactive clustering view.
//!
//! ## The big picture
//!
//! The presentation layer supplies points and the parameters of one algorithm per run and
//! renders the labels it gets back. Everything it needs is in [`run_kmeans`], [`run_dbscan`]
//! and [`Algorithm`]. The algorithms underneath work on `(n_points, n_features)` matrices and
//! follow the usual builder, `Fit`/`Predict` and `Transformer` conventions of the `clusterview`
//! crate, so they can be used on their own as well.
//!
//! ## Current state
//!
//! Right now `clusterview-clustering` provides the following clustering algorithms:
//! * [K-Means](KMeans)
//! * [DBSCAN](Dbscan)
//!
//! Implementation choices, algorithmic details and tutorials can be found in the page dedicated to the specific algorithms.
mod dbscan;
#[allow(clippy::new_ret_no_self)]
mod k_means;
mod run;

pub use dbscan::*;
pub use k_means::*;
pub use run::*;
