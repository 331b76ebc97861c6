//! Error types in clusterview
//!

use thiserror::Error;

use ndarray::ShapeError;
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug, Clone)]
pub enum Error {
    #[error("invalid parameter {0}")]
    Parameters(String),
    #[error("no points supplied")]
    EmptyInput,
    #[error("point {index} has a non-finite coordinate")]
    NonFinite { index: usize },
    #[error("invalid ndarray shape {0}")]
    NdShape(#[from] ShapeError),
}
