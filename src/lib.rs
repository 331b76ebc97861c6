//! `clusterview` is the clustering engine behind an interactive 2-D scatter plot.
//!
//! A user picks an algorithm (K-Means or DBSCAN) and its parameters, and the presentation layer
//! renders the points coloured by the label each of them received. This crate holds the parts
//! both algorithms share:
//!
//! * the data contract with the presentation layer: [`Point`] in, [`ClusterAssignment`] out;
//! * [`DatasetBase`], the record matrix + targets pair the algorithms operate on;
//! * the [`Fit`](traits::Fit), [`Predict`](traits::Predict) and
//!   [`Transformer`](traits::Transformer) traits and the [`ParamGuard`] hyperparameter checks.
//!
//! The algorithms live in `clusterview-clustering`, the neighbourhood queries they rely on in
//! `clusterview-nn`.

pub mod benchmarks;
pub mod dataset;
pub mod error;
mod param_guard;
pub mod points;
pub mod prelude;
pub mod traits;

pub use dataset::{DatasetBase, Float, Label, Records};
pub use param_guard::ParamGuard;
pub use points::{ClusterAssignment, Point};
