//! Loss terms returned by the Weighted Hausdorff Distance.

use std::{collections::HashMap, ops::Add};

use burn::tensor::{backend::Backend, cast::ToElement, Tensor};

/// The three additive components of the Weighted Hausdorff Distance.
///
/// Each term is a `[1]` tensor that stays attached to the autodiff graph of the
/// probability map it was computed from.
#[derive(Debug, Clone)]
pub struct WhdTerms<B: Backend> {
    /// Probability-weighted distance from predicted mass to the nearest true point.
    pub term_1: Tensor<B, 1>,
    /// Soft-min distance from every true point to the weighted prediction grid.
    pub term_2: Tensor<B, 1>,
    /// Absolute difference between the mean probability and the true point count.
    pub term_3: Tensor<B, 1>,
}

impl<B: Backend> WhdTerms<B> {
    /// All three terms set to zero.
    pub fn zeros(device: &B::Device) -> Self {
        Self {
            term_1: Tensor::zeros([1], device),
            term_2: Tensor::zeros([1], device),
            term_3: Tensor::zeros([1], device),
        }
    }

    /// The combined loss `term_1 + term_2 + term_3`.
    pub fn total(&self) -> Tensor<B, 1> {
        self.term_1.clone() + self.term_2.clone() + self.term_3.clone()
    }

    /// Divides every term by `divisor`.
    pub fn div_scalar(self, divisor: f64) -> Self {
        Self {
            term_1: self.term_1.div_scalar(divisor),
            term_2: self.term_2.div_scalar(divisor),
            term_3: self.term_3.div_scalar(divisor),
        }
    }

    /// The terms as a `(term_1, term_2, term_3)` tuple.
    pub fn into_tuple(self) -> (Tensor<B, 1>, Tensor<B, 1>, Tensor<B, 1>) {
        (self.term_1, self.term_2, self.term_3)
    }

    /// Reads the terms and their total back to the host, keyed by name.
    pub fn to_map(&self) -> HashMap<String, f64> {
        let mut values = HashMap::with_capacity(4);
        values.insert("term_1".to_owned(), self.term_1.clone().into_scalar().to_f64());
        values.insert("term_2".to_owned(), self.term_2.clone().into_scalar().to_f64());
        values.insert("term_3".to_owned(), self.term_3.clone().into_scalar().to_f64());
        values.insert("total".to_owned(), self.total().into_scalar().to_f64());
        values
    }
}

impl<B: Backend> Add for WhdTerms<B> {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self {
            term_1: self.term_1 + rhs.term_1,
            term_2: self.term_2 + rhs.term_2,
            term_3: self.term_3 + rhs.term_3,
        }
    }
}

/// Result of a loss call: the combined scalar or the separate terms, depending on
/// how the loss was configured.
#[derive(Debug, Clone)]
pub enum WhdOutput<B: Backend> {
    /// `term_1 + term_2 + term_3`.
    Combined(Tensor<B, 1>),
    /// The batch-averaged terms.
    Terms(WhdTerms<B>),
}

impl<B: Backend> WhdOutput<B> {
    /// The combined loss, summing the terms if necessary.
    pub fn into_combined(self) -> Tensor<B, 1> {
        match self {
            Self::Combined(loss) => loss,
            Self::Terms(terms) => terms.total(),
        }
    }

    /// The separate terms, or `None` when only the combined loss was produced.
    pub fn into_terms(self) -> Option<WhdTerms<B>> {
        match self {
            Self::Combined(_) => None,
            Self::Terms(terms) => Some(terms),
        }
    }
}
