//! `clusterview-datasets` generates synthetic point sets ready to be used in tests, benchmarks
//! and demos of the clustering algorithms.
//!
//! ## Current State
//!
//! Currently the following generators are provided in [`generate`]:
//!
//! * `blobs` : points sampled around a set of centroids
//! * `labelled_blobs` : the same, together with the blob every point was sampled from
//! * `uniform` : points scattered uniformly over a rectangle
//! * `points` : any of the above as a sequence of [`clusterview::Point`]
pub mod generate;
