//! Removal of padded rows from fixed-length point containers.
//!
//! Batches of variable-length point sets are stored as `[batch, max_points, dims]`
//! tensors where missing points are filled with a non-positive sentinel (usually `-1`).
//! A row counts as a real point only when every coordinate is strictly positive, so
//! a point lying exactly on row or column 0 is indistinguishable from padding.
//!
//! The validity mask is read back to the host because the number of kept rows
//! determines the output shape. Point sets are labels and never carry gradients, so
//! the read-back only costs a device sync per call.

use burn::{prelude::*, tensor::TensorData};

/// Returns the rows of `points` whose coordinates are all strictly positive,
/// in their original order.
///
/// `None` stands for the empty point set, either because every row is padding or
/// because the container has no rows at all.
///
/// # Shapes
///
/// - points: `[max_points, dims]`
/// - output: `[num_valid, dims]`
pub fn trim_invalid_rows<B: Backend>(points: Tensor<B, 2>) -> Option<Tensor<B, 2>> {
    let [rows, _] = points.dims();
    if rows == 0 {
        return None;
    }

    let indices = valid_row_indices(points.clone());
    if indices.is_empty() {
        return None;
    }
    if indices.len() == rows {
        return Some(points);
    }

    let count = indices.len();
    let indices =
        Tensor::<B, 1, Int>::from_data(TensorData::new(indices, [count]), &points.device());
    Some(points.select(0, indices))
}

/// Indices of the rows whose coordinates are all strictly positive.
pub fn valid_row_indices<B: Backend>(points: Tensor<B, 2>) -> Vec<i64> {
    points
        .greater_elem(0.0)
        .all_dim(1)
        .into_data()
        .iter::<bool>()
        .enumerate()
        .filter_map(|(index, valid)| valid.then_some(index as i64))
        .collect()
}
