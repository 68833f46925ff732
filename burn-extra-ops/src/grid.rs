//! Pixel coordinate grids.

use burn::{prelude::*, tensor::TensorData};

/// Cartesian product of `0..height` and `0..width` as `(row, col)` float pairs.
///
/// Rows are enumerated in row-major order, so row `r * width + c` holds `(r, c)` and
/// lines up with a `[height, width]` map flattened by `reshape([height * width])`.
///
/// # Shapes
///
/// - output: `[height * width, 2]`
pub fn cartesian_grid<B: Backend>(height: usize, width: usize, device: &B::Device) -> Tensor<B, 2> {
    let coordinates: Vec<f32> = (0..height)
        .flat_map(|row| (0..width).flat_map(move |col| [row as f32, col as f32]))
        .collect();

    Tensor::from_data(TensorData::new(coordinates, [height * width, 2]), device)
}

#[cfg(test)]
mod tests {
    use burn::tensor::Tolerance;

    use super::*;
    use crate::tests::TestBackend;

    #[test]
    fn cartesian_grid_enumerates_row_major() {
        let device = Default::default();

        let grid = cartesian_grid::<TestBackend>(2, 3, &device);

        assert_eq!(grid.dims(), [6, 2]);
        grid.into_data().assert_approx_eq::<f32>(
            &TensorData::from([
                [0.0, 0.0],
                [0.0, 1.0],
                [0.0, 2.0],
                [1.0, 0.0],
                [1.0, 1.0],
                [1.0, 2.0],
            ]),
            Tolerance::default(),
        );
    }

    #[test]
    fn cartesian_grid_matches_flattened_map_index() {
        let device = Default::default();
        let (height, width) = (4, 5);

        let grid = cartesian_grid::<TestBackend>(height, width, &device);
        let values = grid.into_data().to_vec::<f32>().unwrap();

        let index = 2 * width + 3;
        assert_eq!(values[2 * index], 2.0);
        assert_eq!(values[2 * index + 1], 3.0);
    }
}
