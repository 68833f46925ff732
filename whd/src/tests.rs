use burn::{backend::NdArray, config::Config};

use crate::{WeightedHausdorffDistanceConfig, WhdError};

pub type TestBackend = NdArray<f32>;

#[test]
fn test_default_configuration() {
    let config = WeightedHausdorffDistanceConfig::new(256, 256);

    assert_eq!(config.p, -9.0);
    assert!(!config.return_2_terms);
    assert!((config.eps - 1e-6).abs() < 1e-12);
}

#[test]
fn test_configuration_json_round_trip() {
    let config = WeightedHausdorffDistanceConfig::new(32, 48)
        .with_p(-12.0)
        .with_return_2_terms(true);

    let json = config.to_string();
    let restored = WeightedHausdorffDistanceConfig::load_binary(json.as_bytes())
        .expect("configuration should deserialize");

    assert_eq!(restored.height, 32);
    assert_eq!(restored.width, 48);
    assert_eq!(restored.p, -12.0);
    assert!(restored.return_2_terms);
}

#[test]
fn test_max_dist_is_image_diagonal() {
    let device = Default::default();
    let loss = WeightedHausdorffDistanceConfig::new(256, 256).init::<TestBackend>(&device);

    assert!((loss.max_dist() - 256.0 * 2.0_f64.sqrt()).abs() < 1e-9);
    assert_eq!(loss.all_img_locations().dims(), [256 * 256, 2]);
}

#[test]
fn test_error_messages() {
    let mismatch = WhdError::DimensionMismatch {
        input: "prob_map",
        expected: "[batch_size, 4, 4]".to_owned(),
        actual: "[1, 4, 5]".to_owned(),
    };
    assert_eq!(
        mismatch.to_string(),
        "tensor dimension mismatch for prob_map: expected [batch_size, 4, 4], got [1, 4, 5]"
    );

    let batch = WhdError::BatchSizeMismatch {
        prob_map: 2,
        labels: 3,
    };
    assert!(batch.to_string().contains("2 samples, labels hold 3"));

    assert!(WhdError::EmptyBatch.to_string().contains("batch is empty"));
}
