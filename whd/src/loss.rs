//! Weighted Hausdorff Distance loss.
//!
//! Compares a per-pixel probability map against a set of ground-truth points without
//! thresholding the map. For a map `p` over pixel locations `x` and true points `y`:
//!
//! ```text
//! term_1 = Σ_x p(x) · min_y d(x, y) / (Σ_x p(x) + ε)
//! term_2 = mean_y M_α[ (1 − p(x)) · d_max + p(x) · d(x, y) ]_x
//! term_3 = | mean_x p(x) − |Y| |
//! ```
//!
//! where `M_α` is the generalized mean with a negative exponent `α` (a soft minimum)
//! and `d_max` is the image diagonal. The loss is `term_1 + term_2 + term_3`,
//! averaged over the batch.

use std::{collections::HashMap, fmt};

use burn::{config::Config, prelude::*};
use burn_extra_ops::{
    cartesian_grid, cdist, generalized_mean, trim_invalid_rows, DEFAULT_GENERALIZED_MEAN_P,
};
use tracing::debug;

use crate::{
    error::{WhdError, WhdResult},
    terms::{WhdOutput, WhdTerms},
};

/// Configuration for creating a [Weighted Hausdorff Distance](WeightedHausdorffDistance).
#[derive(Config, Debug)]
pub struct WeightedHausdorffDistanceConfig {
    /// Height of every probability map.
    pub height: usize,
    /// Width of every probability map.
    pub width: usize,
    /// Exponent of the generalized mean used as a soft minimum. Default: -9
    #[config(default = "DEFAULT_GENERALIZED_MEAN_P")]
    pub p: f64,
    /// Return the three terms instead of their sum. Default: false
    #[config(default = false)]
    pub return_2_terms: bool,
    /// Guard added to the estimated point count before dividing. Default: 1e-6
    #[config(default = 1e-6)]
    pub eps: f64,
}

impl WeightedHausdorffDistanceConfig {
    /// Initialize the [Weighted Hausdorff Distance](WeightedHausdorffDistance) on `device`.
    pub fn init<B: Backend>(&self, device: &B::Device) -> WeightedHausdorffDistance<B> {
        self.assertions();

        let (height, width) = (self.height as f64, self.width as f64);
        WeightedHausdorffDistance {
            height: self.height,
            width: self.width,
            p: self.p,
            return_2_terms: self.return_2_terms,
            eps: self.eps,
            max_dist: height.hypot(width),
            all_img_locations: cartesian_grid(self.height, self.width, device),
        }
    }

    fn assertions(&self) {
        assert!(
            self.height > 0 && self.width > 0,
            "Height and width of WeightedHausdorffDistance must be positive, got {}x{}",
            self.height,
            self.width
        );
        assert!(
            self.p != 0.0 && self.p.is_finite(),
            "Exponent p of WeightedHausdorffDistance must be finite and non-zero, got {}",
            self.p
        );
        assert!(
            self.eps > 0.0,
            "Epsilon for WeightedHausdorffDistance must be positive, got {}",
            self.eps
        );
    }
}

/// Weighted Hausdorff Distance between probability maps and padded point sets.
///
/// The pixel grid and the image diagonal are computed once at construction and
/// reused by every call.
#[derive(Debug, Clone)]
pub struct WeightedHausdorffDistance<B: Backend> {
    height: usize,
    width: usize,
    p: f64,
    return_2_terms: bool,
    eps: f64,
    max_dist: f64,
    /// `[height * width, 2]` pixel coordinates in row-major order.
    all_img_locations: Tensor<B, 2>,
}

impl<B: Backend> fmt::Display for WeightedHausdorffDistance<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "WeightedHausdorffDistance {{height: {}, width: {}, p: {}, return_2_terms: {}}}",
            self.height, self.width, self.p, self.return_2_terms
        )
    }
}

impl<B: Backend> WeightedHausdorffDistance<B> {
    /// Create a new loss for `height`×`width` maps with the default configuration.
    pub fn new(height: usize, width: usize, device: &B::Device) -> Self {
        WeightedHausdorffDistanceConfig::new(height, width).init(device)
    }

    /// Height of the maps this loss accepts.
    pub const fn height(&self) -> usize {
        self.height
    }

    /// Width of the maps this loss accepts.
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Length of the image diagonal, the largest possible pixel distance.
    pub const fn max_dist(&self) -> f64 {
        self.max_dist
    }

    /// Pixel coordinates as a `[height * width, 2]` tensor of `(row, col)` pairs.
    pub fn all_img_locations(&self) -> Tensor<B, 2> {
        self.all_img_locations.clone()
    }

    /// Compute the loss, honouring the configured output mode.
    ///
    /// # Shapes
    ///
    /// - prob_map: `[batch_size, height, width]`, `[batch_size, height, width, 1]` or
    ///   `[batch_size, 1, height, width]`
    /// - labels: `[batch_size, max_points, 2]`, padded with non-positive rows
    /// - output: `[1]` (combined) or three `[1]` terms
    ///
    /// # Errors
    /// Returns a [`WhdError`] if the inputs do not match the configured map size or
    /// each other, or if the batch is empty.
    pub fn forward<const D: usize>(
        &self,
        prob_map: Tensor<B, D>,
        labels: Tensor<B, 3>,
    ) -> WhdResult<WhdOutput<B>> {
        let terms = self.forward_terms(prob_map, labels)?;

        Ok(if self.return_2_terms {
            WhdOutput::Terms(terms)
        } else {
            WhdOutput::Combined(terms.total())
        })
    }

    /// Compute the combined loss together with host copies of every term.
    ///
    /// # Errors
    /// Returns a [`WhdError`] under the same conditions as [`Self::forward`].
    pub fn forward_detailed<const D: usize>(
        &self,
        prob_map: Tensor<B, D>,
        labels: Tensor<B, 3>,
    ) -> WhdResult<(Tensor<B, 1>, HashMap<String, f64>)> {
        let terms = self.forward_terms(prob_map, labels)?;
        let values = terms.to_map();

        Ok((terms.total(), values))
    }

    /// Compute the batch-averaged terms regardless of the configured output mode.
    ///
    /// Every sample is visited exactly once; its labels are stripped of padding
    /// before the terms are computed, and each term sum is divided by the batch size.
    ///
    /// # Errors
    /// Returns a [`WhdError`] under the same conditions as [`Self::forward`].
    pub fn forward_terms<const D: usize>(
        &self,
        prob_map: Tensor<B, D>,
        labels: Tensor<B, 3>,
    ) -> WhdResult<WhdTerms<B>> {
        let batch_size = self.assertions(&prob_map, &labels)?;
        let [_, max_points, point_dims] = labels.dims();
        let num_pixels = self.height * self.width;

        let mut sums = WhdTerms::zeros(&prob_map.device());
        for index in 0..batch_size {
            let prob_map_b = prob_map.clone().narrow(0, index, 1).reshape([num_pixels]);
            let gt_b = (max_points > 0)
                .then(|| {
                    labels
                        .clone()
                        .narrow(0, index, 1)
                        .reshape([max_points, point_dims])
                })
                .and_then(trim_invalid_rows);

            debug!(
                target: "whd",
                sample = index,
                num_points = gt_b.as_ref().map_or(0, |gt| gt.dims()[0]),
                "computing weighted hausdorff terms"
            );

            sums = sums + self.forward_one_sample(prob_map_b, gt_b)?;
        }

        Ok(sums.div_scalar(batch_size as f64))
    }

    /// Compute the three terms for one sample.
    ///
    /// `gt` holds the sample's points without padding; `None` is the empty point set,
    /// for which `term_1` and `term_2` are zero and `term_3` is the mean probability.
    ///
    /// # Shapes
    ///
    /// - prob_map: `[height * width]`
    /// - gt: `[num_points, 2]`
    ///
    /// # Errors
    /// Returns [`WhdError::DimensionMismatch`] if the map length differs from
    /// `height * width` or the points are not two-dimensional.
    pub fn forward_one_sample(
        &self,
        prob_map: Tensor<B, 1>,
        gt: Option<Tensor<B, 2>>,
    ) -> WhdResult<WhdTerms<B>> {
        let [num_pixels] = prob_map.dims();
        if num_pixels != self.height * self.width {
            return Err(WhdError::DimensionMismatch {
                input: "prob_map",
                expected: format!("[{}]", self.height * self.width),
                actual: format!("[{num_pixels}]"),
            });
        }

        let total_pred = prob_map.clone().mean();
        let Some(gt) = gt else {
            let device = prob_map.device();
            return Ok(WhdTerms {
                term_1: Tensor::zeros([1], &device),
                term_2: Tensor::zeros([1], &device),
                term_3: total_pred.abs(),
            });
        };

        let [num_points, point_dims] = gt.dims();
        if point_dims != 2 {
            return Err(WhdError::DimensionMismatch {
                input: "gt",
                expected: "[num_points, 2]".to_owned(),
                actual: format!("{:?}", gt.dims()),
            });
        }

        // [num_pixels, num_points]
        let d_matrix = cdist(self.all_img_locations.clone(), gt);

        let n_est_pts = prob_map.clone().sum();
        let d_matrix_min = d_matrix.clone().min_dim(1).reshape([num_pixels]);
        let term_1 = (prob_map.clone() * d_matrix_min).sum() / n_est_pts.add_scalar(self.eps);

        let p_replicated = prob_map.reshape([num_pixels, 1]).repeat_dim(1, num_points);
        let weighted_d_matrix = p_replicated
            .clone()
            .neg()
            .add_scalar(1.0)
            .mul_scalar(self.max_dist)
            + p_replicated * d_matrix;
        let minn = generalized_mean::<B, 2, 1>(weighted_d_matrix, 0, self.p);
        let term_2 = minn.mean();

        let term_3 = total_pred.sub_scalar(num_points as f64).abs();

        Ok(WhdTerms {
            term_1,
            term_2,
            term_3,
        })
    }

    /// Validates the batch inputs and returns the batch size.
    fn assertions<const D: usize>(
        &self,
        prob_map: &Tensor<B, D>,
        labels: &Tensor<B, 3>,
    ) -> WhdResult<usize> {
        let prob_dims = prob_map.dims();
        let label_dims = labels.dims();
        let (height, width) = (self.height, self.width);

        let spatial_ok = match &prob_dims[1..] {
            [h, w] | [h, w, 1] | [1, h, w] => *h == height && *w == width,
            _ => false,
        };
        if !spatial_ok {
            return Err(WhdError::DimensionMismatch {
                input: "prob_map",
                expected: format!(
                    "[batch_size, {height}, {width}], [batch_size, {height}, {width}, 1] \
                     or [batch_size, 1, {height}, {width}]"
                ),
                actual: format!("{prob_dims:?}"),
            });
        }

        if label_dims[2] != 2 {
            return Err(WhdError::DimensionMismatch {
                input: "labels",
                expected: "[batch_size, max_points, 2]".to_owned(),
                actual: format!("{label_dims:?}"),
            });
        }

        if prob_dims[0] != label_dims[0] {
            return Err(WhdError::BatchSizeMismatch {
                prob_map: prob_dims[0],
                labels: label_dims[0],
            });
        }

        match prob_dims[0] {
            0 => Err(WhdError::EmptyBatch),
            batch_size => Ok(batch_size),
        }
    }
}
