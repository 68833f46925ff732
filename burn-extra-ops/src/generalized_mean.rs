//! # Generalized (power) mean
//!
//! The power mean `M_p(x) = (mean(x^p))^(1/p)` tends to `min(x)` as `p → -∞` and to
//! `max(x)` as `p → +∞`. For a large negative `p` it is a smooth stand-in for the
//! minimum whose gradient is spread over every entry instead of only the arg-min,
//! which keeps losses built on it differentiable everywhere.
//!
//! Bases are shifted by a small epsilon so that zero entries stay finite for
//! negative exponents. The mean is homogeneous of degree one, so the bases are
//! divided by their extreme value along the reduced axis (the minimum for negative
//! `p`, the maximum otherwise) before exponentiation and the result is scaled back:
//!
//! ```text
//! M_p(x) = s · (mean((x / s)^p))^(1/p)
//! ```
//!
//! Every ratio then lies on the side of 1 where `ratio^p <= 1`, so bases near zero
//! never overflow to `inf` in `f32` and backward passes stay free of `0 · inf`.

use burn::prelude::*;

/// Exponent used when no explicit value is requested.
pub const DEFAULT_GENERALIZED_MEAN_P: f64 = -9.0;

/// Shift applied to every base before exponentiation.
pub const GENERALIZED_MEAN_EPS: f64 = 1e-6;

/// A trait for computing the generalized mean of a tensor along one dimension.
pub trait GeneralizedMean<B: Backend, const D: usize> {
    /// Generalized mean along `dim`, keeping that dimension with size 1.
    fn generalized_mean_dim(self, dim: usize, p: f64) -> Tensor<B, D>;
}

impl<B: Backend, const D: usize> GeneralizedMean<B, D> for Tensor<B, D> {
    fn generalized_mean_dim(self, dim: usize, p: f64) -> Tensor<B, D> {
        generalized_mean_dim(self, dim, p)
    }
}

/// Computes `mean((x + eps)^p, dim)^(1/p)`, keeping `dim` with size 1.
///
/// The scale factor is detached from the graph; the mean does not depend on it, so
/// gradients are unchanged.
///
/// # Panics
///
/// Panics if `p` is zero or `dim` is out of range.
pub fn generalized_mean_dim<B: Backend, const D: usize>(
    tensor: Tensor<B, D>,
    dim: usize,
    p: f64,
) -> Tensor<B, D> {
    assert!(p != 0.0, "Exponent of the generalized mean must be non-zero");
    assert!(
        dim < D,
        "Reduction dimension {dim} is out of range for a tensor of rank {D}"
    );

    let size = tensor.dims()[dim];
    let shifted = tensor.add_scalar(GENERALIZED_MEAN_EPS);
    let scale = if p < 0.0 {
        shifted.clone().min_dim(dim)
    } else {
        shifted.clone().max_dim(dim)
    }
    .detach();

    (shifted / scale.clone().repeat_dim(dim, size))
        .powf_scalar(p)
        .mean_dim(dim)
        .powf_scalar(1.0 / p)
        * scale
}

/// Computes `mean((x + eps)^p, dim)^(1/p)` and removes the reduced dimension.
///
/// `D2` must equal `D - 1`.
///
/// # Panics
///
/// Panics if `p` is zero, `dim` is out of range or `D2 != D - 1`.
pub fn generalized_mean<B: Backend, const D: usize, const D2: usize>(
    tensor: Tensor<B, D>,
    dim: usize,
    p: f64,
) -> Tensor<B, D2> {
    assert!(
        D2 + 1 == D,
        "Output rank {D2} must be one less than the input rank {D}"
    );

    let dims = tensor.dims();
    let mut shape = [0usize; D2];
    for (out, size) in shape
        .iter_mut()
        .zip(dims.iter().enumerate().filter(|(i, _)| *i != dim).map(|(_, s)| *s))
    {
        *out = size;
    }

    generalized_mean_dim(tensor, dim, p).reshape(shape)
}

#[cfg(test)]
mod tests {
    use burn::{
        backend::Autodiff,
        tensor::{ElementConversion, TensorData, Tolerance},
    };

    use super::*;
    use crate::tests::TestBackend;

    fn soft_min_of(values: [f32; 3], p: f64) -> f32 {
        let device = Default::default();
        let tensor = Tensor::<TestBackend, 2>::from_floats([values], &device);
        generalized_mean::<TestBackend, 2, 1>(tensor, 1, p)
            .into_scalar()
            .elem::<f32>()
    }

    #[test]
    fn generalized_mean_large_negative_p_approaches_minimum() {
        // With three entries the power mean keeps a factor of 3^(1/|p|) over the minimum.
        let value = soft_min_of([1.0, 2.0, 100.0], -50.0);
        let expected = 3.0_f32.powf(1.0 / 50.0);

        assert!(
            (value - expected).abs() < 1e-3,
            "expected {expected}, got {value}"
        );
        assert!((value - 1.0).abs() < 2.5e-2);
    }

    #[test]
    fn generalized_mean_error_shrinks_as_p_decreases() {
        let errors: Vec<f32> = [-5.0, -9.0, -20.0, -50.0]
            .into_iter()
            .map(|p| (soft_min_of([1.0, 2.0, 100.0], p) - 1.0).abs())
            .collect();

        for pair in errors.windows(2) {
            assert!(pair[1] < pair[0], "errors not decreasing: {errors:?}");
        }
    }

    #[test]
    fn generalized_mean_positive_p_approaches_maximum() {
        let value = soft_min_of([1.0, 2.0, 10.0], 30.0);

        assert!(value > 9.0 && value <= 10.0, "got {value}");
    }

    #[test]
    fn generalized_mean_dim_keeps_reduced_dimension() {
        let device = Default::default();
        let tensor =
            Tensor::<TestBackend, 2>::from_floats([[1.0, 4.0], [2.0, 4.0], [3.0, 4.0]], &device);

        let kept = tensor.clone().generalized_mean_dim(0, DEFAULT_GENERALIZED_MEAN_P);
        let dropped = generalized_mean::<TestBackend, 2, 1>(tensor, 0, DEFAULT_GENERALIZED_MEAN_P);

        assert_eq!(kept.dims(), [1, 2]);
        assert_eq!(dropped.dims(), [2]);
        kept.reshape([2])
            .into_data()
            .assert_approx_eq::<f32>(&dropped.into_data(), Tolerance::default());
    }

    #[test]
    fn generalized_mean_of_constant_is_the_constant() {
        let device = Default::default();
        let tensor = Tensor::<TestBackend, 2>::full([4, 3], 2.5, &device);

        let result = generalized_mean::<TestBackend, 2, 1>(tensor, 1, DEFAULT_GENERALIZED_MEAN_P);

        result.into_data().assert_approx_eq::<f32>(
            &TensorData::from([2.5, 2.5, 2.5, 2.5]),
            Tolerance::absolute(1e-4),
        );
    }

    #[test]
    fn generalized_mean_of_zero_entry_is_zero() {
        let value = soft_min_of([0.0, 3.0, 5.0], DEFAULT_GENERALIZED_MEAN_P);

        assert!(value.abs() < 1e-4, "got {value}");
    }

    #[test]
    fn generalized_mean_of_tiny_entries_stays_finite() {
        // (1e-5)^-9 overflows f32 when exponentiated directly
        let value = soft_min_of([1e-5, 2e-5, 4e-5], DEFAULT_GENERALIZED_MEAN_P);

        assert!(value.is_finite(), "got {value}");
        assert!(value > 1e-5 && value < 2e-5, "got {value}");
    }

    #[test]
    fn generalized_mean_of_tiny_entries_has_finite_gradients() {
        type AutodiffBackend = Autodiff<TestBackend>;

        let device = Default::default();
        let tensor =
            Tensor::<AutodiffBackend, 2>::from_floats([[0.0, 1e-6, 3.0], [2.0, 5.0, 7.0]], &device)
                .require_grad();

        let result =
            generalized_mean::<AutodiffBackend, 2, 1>(tensor.clone(), 1, DEFAULT_GENERALIZED_MEAN_P);
        let grads = result.sum().backward();
        let grad = tensor.grad(&grads).expect("input receives a gradient");

        let values = grad.into_data().to_vec::<f32>().unwrap();
        assert!(values.iter().all(|value| value.is_finite()), "{values:?}");
        // the smallest entry of each row carries most of the gradient
        assert!(values[0] > values[2] && values[3] > values[5], "{values:?}");
    }

    #[test]
    #[should_panic = "Exponent of the generalized mean must be non-zero"]
    fn generalized_mean_zero_exponent_panics() {
        let device = Default::default();
        let tensor = Tensor::<TestBackend, 1>::from_floats([1.0, 2.0], &device);

        let _ = generalized_mean_dim(tensor, 0, 0.0);
    }
}
