//! Fitting a free-form heatmap to point sets with the Weighted Hausdorff Distance.
//!
//! The heatmap is `sigmoid(logits)` with one learnable logit per pixel. There is no
//! model in between, so the fit shows directly how the loss gradients move
//! probability mass towards the labelled points.

use std::collections::HashMap;

use burn::{
    module::Param,
    optim::{AdamConfig, GradientsParams, Optimizer},
    prelude::*,
    tensor::{activation::sigmoid, backend::AutodiffBackend, TensorData},
};
use tracing::info;
use whd_burn::WhdResult;

use crate::config::FitConfig;

/// A batch of learnable probability maps.
#[derive(Module, Debug)]
pub struct Heatmap<B: Backend> {
    logits: Param<Tensor<B, 4>>,
}

impl<B: Backend> Heatmap<B> {
    /// Creates `[batch_size, height, width, 1]` maps starting at probability 0.5.
    pub fn new(batch_size: usize, height: usize, width: usize, device: &B::Device) -> Self {
        Self {
            logits: Param::from_tensor(Tensor::zeros([batch_size, height, width, 1], device)),
        }
    }

    /// Current probability maps.
    pub fn forward(&self) -> Tensor<B, 4> {
        sigmoid(self.logits.val())
    }
}

/// Deterministic padded point sets for a batch.
///
/// Sample `i` holds `1 + i % max_points` points inside the open image area; the
/// remaining rows are filled with `-1`. A map with a single row or column has no
/// open area, so its points land on coordinate 1 of that axis.
///
/// # Shapes
///
/// - output: `[batch_size, max_points, 2]`
pub fn synthetic_labels<B: Backend>(
    batch_size: usize,
    max_points: usize,
    height: usize,
    width: usize,
    device: &B::Device,
) -> Tensor<B, 3> {
    let row_span = height.saturating_sub(1).max(1);
    let col_span = width.saturating_sub(1).max(1);
    let mut values = Vec::with_capacity(batch_size * max_points * 2);
    for sample in 0..batch_size {
        let num_points = 1 + sample % max_points.max(1);
        for point in 0..max_points {
            if point < num_points {
                let row = 1 + (3 * point + 5 * sample) % row_span;
                let col = 1 + (7 * point + 2 * sample) % col_span;
                values.extend([row as f32, col as f32]);
            } else {
                values.extend([-1.0_f32, -1.0]);
            }
        }
    }

    Tensor::from_data(
        TensorData::new(values, [batch_size, max_points, 2]),
        device,
    )
}

/// Result of [`fit`].
#[derive(Debug)]
pub struct FitOutcome<B: Backend> {
    /// The fitted heatmaps.
    pub model: Heatmap<B>,
    /// Combined loss before the first update.
    pub initial_loss: f64,
    /// Terms and total of the last evaluated step.
    pub final_terms: HashMap<String, f64>,
}

/// Minimizes the Weighted Hausdorff Distance of a [`Heatmap`] against
/// [`synthetic_labels`] with Adam.
///
/// # Errors
/// Propagates loss errors; none occur for a configuration accepted by
/// [`FitConfig::validate`].
pub fn fit<B: AutodiffBackend>(config: &FitConfig, device: &B::Device) -> WhdResult<FitOutcome<B>> {
    let (height, width) = (config.loss.height, config.loss.width);
    let loss = config.loss.init::<B>(device);
    let labels = synthetic_labels::<B>(config.batch_size, config.max_points, height, width, device);

    info!(%loss, batch_size = config.batch_size, steps = config.steps, "fitting heatmap");

    let mut model = Heatmap::<B>::new(config.batch_size, height, width, device);
    let mut optim = AdamConfig::new().init::<B, Heatmap<B>>();
    let mut initial_loss = None;
    let mut final_terms = HashMap::new();

    for step in 1..=config.steps {
        let (value, terms) = loss.forward_detailed(model.forward(), labels.clone())?;
        initial_loss.get_or_insert(terms["total"]);

        if step == 1 || step % config.log_every == 0 {
            info!(
                step,
                total = terms["total"],
                term_1 = terms["term_1"],
                term_2 = terms["term_2"],
                term_3 = terms["term_3"],
                "weighted hausdorff distance"
            );
        }

        let grads = GradientsParams::from_grads(value.backward(), &model);
        model = optim.step(config.learning_rate, model, grads);
        final_terms = terms;
    }

    Ok(FitOutcome {
        model,
        initial_loss: initial_loss.unwrap_or_default(),
        final_terms,
    })
}

#[cfg(test)]
mod tests {
    use burn::backend::{Autodiff, NdArray};
    use whd_burn::WeightedHausdorffDistanceConfig;

    use super::*;

    type TestBackend = NdArray<f32>;
    type TestAutodiffBackend = Autodiff<TestBackend>;

    #[test]
    fn synthetic_labels_pad_after_true_points() {
        let device = Default::default();

        let labels = synthetic_labels::<TestBackend>(3, 4, 8, 8, &device);
        let values = labels.into_data().to_vec::<f32>().unwrap();

        // sample 1 holds two points, then two padded rows
        let sample_1 = &values[8..16];
        assert!(sample_1[..4].iter().all(|value| *value > 0.0));
        assert!(sample_1[4..].iter().all(|value| *value == -1.0));
    }

    #[test]
    fn synthetic_labels_handle_single_row_maps() {
        let device = Default::default();

        let labels = synthetic_labels::<TestBackend>(2, 2, 1, 5, &device);
        let values = labels.into_data().to_vec::<f32>().unwrap();

        assert_eq!(values.len(), 8);
        // sample 0 holds one point on row 1, sample 1 holds two
        assert_eq!(values[0], 1.0);
        assert_eq!(&values[2..4], &[-1.0, -1.0]);
        assert_eq!(values[4], 1.0);
        assert_eq!(values[6], 1.0);
    }

    #[test]
    fn heatmap_starts_at_half_probability() {
        let device = Default::default();

        let heatmap = Heatmap::<TestBackend>::new(2, 3, 3, &device);
        let values = heatmap.forward().into_data().to_vec::<f32>().unwrap();

        assert_eq!(values.len(), 18);
        assert!(values.iter().all(|value| (value - 0.5).abs() < 1e-6));
    }

    #[test]
    fn fit_reduces_the_loss() {
        let device = Default::default();
        let config = FitConfig {
            loss: WeightedHausdorffDistanceConfig::new(6, 6),
            batch_size: 2,
            max_points: 2,
            steps: 40,
            learning_rate: 0.1,
            log_every: 10,
        };

        let outcome = fit::<TestAutodiffBackend>(&config, &device).expect("valid configuration");

        assert!(outcome.final_terms["total"].is_finite());
        assert!(
            outcome.final_terms["total"] < outcome.initial_loss,
            "loss did not decrease: {} -> {}",
            outcome.initial_loss,
            outcome.final_terms["total"]
        );
    }
}
