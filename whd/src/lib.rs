//! Weighted Hausdorff Distance loss for point localization with the Burn framework.
//!
//! Point-localization models predict a per-pixel probability map instead of bounding
//! boxes. The Weighted Hausdorff Distance compares such a map directly against the
//! ground-truth point set of each image, with no thresholding step, so the loss is
//! differentiable with respect to every pixel of the map.
//!
//! ## Loss Terms
//!
//! - **term 1**: probability mass far from every true point is penalized
//!   (precision-like).
//! - **term 2**: every true point must have confident probability mass nearby,
//!   enforced through a generalized-mean soft minimum (recall-like).
//! - **term 3**: the mean probability must match the number of true points.
//!
//! ## Padded Labels
//!
//! Point counts vary between images, so labels arrive as a `[batch, max_points, 2]`
//! tensor padded with non-positive rows. Padding is stripped per sample before the
//! terms are computed, and a sample without any true point contributes only its
//! count term.
//!
//! ## Usage Example
//!
//! ```rust
//! use burn::{backend::NdArray, prelude::*};
//! use whd_burn::WeightedHausdorffDistanceConfig;
//!
//! let device = Default::default();
//! let loss = WeightedHausdorffDistanceConfig::new(4, 4).init::<NdArray>(&device);
//!
//! let prob_map = Tensor::<NdArray, 4>::full([1, 4, 4, 1], 0.1, &device);
//! let labels = Tensor::<NdArray, 3>::from_floats([[[1.0, 2.0], [-1.0, -1.0]]], &device);
//!
//! let value = loss.forward(prob_map, labels).unwrap().into_combined();
//! assert!(value.into_scalar().is_finite());
//! ```

mod error;
mod loss;
mod terms;

pub use error::{WhdError, WhdResult};
pub use loss::{WeightedHausdorffDistance, WeightedHausdorffDistanceConfig};
pub use terms::{WhdOutput, WhdTerms};

#[cfg(test)]
mod tests;
