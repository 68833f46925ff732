//! Additional operations for the Burn deep learning framework
//!
//! This crate provides the point-set operations needed by distance-based losses that
//! are not available in the core Burn framework: a differentiable soft minimum,
//! pairwise distances, pixel grids and removal of padded points.

use burn::prelude::*;

mod cdist;
mod generalized_mean;
mod grid;
mod trim;

// Convenient re-exports
pub use cdist::cdist;
pub use generalized_mean::{
    generalized_mean, generalized_mean_dim, GeneralizedMean, DEFAULT_GENERALIZED_MEAN_P,
    GENERALIZED_MEAN_EPS,
};
pub use grid::cartesian_grid;
pub use trim::{trim_invalid_rows, valid_row_indices};

/// Additional operations for Burn point-set tensors
pub trait TensorExtraOps<B: Backend> {
    /// Euclidean distance from every row of `self` to every row of `other`
    fn cdist(self, other: Tensor<B, 2>) -> Tensor<B, 2>;

    /// Drop rows holding a non-positive coordinate
    fn trim_invalid_rows(self) -> Option<Tensor<B, 2>>;
}

impl<B: Backend> TensorExtraOps<B> for Tensor<B, 2> {
    fn cdist(self, other: Tensor<B, 2>) -> Tensor<B, 2> {
        cdist(self, other)
    }

    fn trim_invalid_rows(self) -> Option<Tensor<B, 2>> {
        trim_invalid_rows(self)
    }
}
