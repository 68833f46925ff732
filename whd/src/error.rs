use thiserror::Error;

/// The error type for Weighted Hausdorff Distance computations.
///
/// Every variant describes a caller contract violation detected before any tensor
/// arithmetic runs. Numerical problems are not reported here; they surface as
/// non-finite loss values.
#[derive(Error, Debug)]
pub enum WhdError {
    /// An input tensor does not have the shape the loss was configured for.
    #[error("tensor dimension mismatch for {input}: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Which input was rejected.
        input: &'static str,
        /// The accepted shape(s).
        expected: String,
        /// The shape that was received.
        actual: String,
    },

    /// Probability maps and labels disagree on the number of samples.
    #[error("batch size mismatch: probability maps hold {prob_map} samples, labels hold {labels}")]
    BatchSizeMismatch {
        /// Batch size of the probability maps.
        prob_map: usize,
        /// Batch size of the label tensor.
        labels: usize,
    },

    /// The batch holds no samples, so the batch mean is undefined.
    #[error("batch is empty - at least one sample is required")]
    EmptyBatch,
}

/// A specialized `Result` type for Weighted Hausdorff Distance operations.
pub type WhdResult<T> = Result<T, WhdError>;
