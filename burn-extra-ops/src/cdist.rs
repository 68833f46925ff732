//! Pairwise Euclidean distances between two point sets.

use burn::prelude::*;

/// Computes the Euclidean distance between every point of `a` and every point of `b`.
///
/// Rows of the output follow `a` and columns follow `b`: entry `(i, j)` is
/// `‖a[i] − b[j]‖₂`.
///
/// # Shapes
///
/// - a: `[n, dims]`
/// - b: `[m, dims]`
/// - output: `[n, m]`
///
/// # Panics
///
/// Panics if the two point sets do not share the same point dimension.
pub fn cdist<B: Backend>(a: Tensor<B, 2>, b: Tensor<B, 2>) -> Tensor<B, 2> {
    let [n, dims_a] = a.dims();
    let [m, dims_b] = b.dims();
    assert_eq!(
        dims_a, dims_b,
        "Point dimension of the first set ({dims_a}) must match the second set ({dims_b})"
    );

    // [n, m, dims]
    let a = a.unsqueeze_dim::<3>(1).repeat_dim(1, m);
    let b = b.unsqueeze_dim::<3>(0).repeat_dim(0, n);

    (a - b).powf_scalar(2.0).sum_dim(2).reshape([n, m]).sqrt()
}
