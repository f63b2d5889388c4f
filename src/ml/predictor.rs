// ============================================================
// Layer 5 — Predictor
// ============================================================
use anyhow::{ensure, Result};
use burn::prelude::*;
use std::fmt;

use crate::data::dataset::extract_window;
use crate::domain::series::SensorTable;
use crate::infra::checkpoint::CheckpointManager;
use crate::ml::model::AttentionRegressor;

pub type InferBackend = burn::backend::Wgpu;

/// Model output for one held-out window next to the window's true label.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HoldoutPrediction {
    pub predicted:     f32,
    /// Mean of the target column over the window
    pub expected:      f32,
    pub squared_error: f32,
}

impl fmt::Display for HoldoutPrediction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "predicted={:.6} expected={:.6} squared_error={:.6}",
            self.predicted, self.expected, self.squared_error
        )
    }
}

pub struct Predictor<B: Backend> {
    model:  AttentionRegressor<B>,
    device: B::Device,
}

impl<B: Backend> Predictor<B> {
    pub fn new(model: AttentionRegressor<B>, device: B::Device) -> Self {
        Self { model, device }
    }

    /// Rebuild the model from train_config.json and load the latest weights.
    pub fn from_checkpoint(ckpt_manager: &CheckpointManager, device: B::Device) -> Result<Self> {
        let cfg       = ckpt_manager.load_config()?;
        let model_cfg = cfg.model_config(cfg.feature_count()).with_dropout(0.0);
        let model     = ckpt_manager.load_model(model_cfg.init::<B>(&device), &device)?;
        tracing::info!("Model loaded from checkpoint");
        Ok(Self { model, device })
    }

    /// inputs: [batch, window_size, features] → one prediction per window.
    pub fn predict_batch(&self, inputs: Tensor<B, 3>) -> Result<Vec<f32>> {
        let output = self.model.forward(inputs);
        output
            .into_data()
            .to_vec::<f32>()
            .map_err(|e| anyhow::anyhow!("Cannot read prediction tensor: {e:?}"))
    }

    /// Predict on a table holding exactly one window of rows.
    pub fn predict_window(&self, window: &SensorTable) -> Result<HoldoutPrediction> {
        ensure!(
            window.rows() == self.model.window_size,
            "held-out slice has {} rows, the model expects exactly {}",
            window.rows(),
            self.model.window_size
        );
        ensure!(
            window.feature_count() == self.model.num_features,
            "held-out slice has {} feature columns, the model expects {}",
            window.feature_count(),
            self.model.num_features
        );

        let sample = extract_window(window, 0, window.rows());
        let input  = Tensor::<B, 1>::from_floats(sample.features.as_slice(), &self.device)
            .reshape([1, sample.window_size, sample.feature_count]);

        let predicted = self
            .predict_batch(input)?
            .first()
            .copied()
            .ok_or_else(|| anyhow::anyhow!("Model returned no prediction"))?;

        let diff = predicted - sample.label;
        tracing::debug!("Held-out window: predicted={predicted:.6} expected={:.6}", sample.label);

        Ok(HoldoutPrediction {
            predicted,
            expected: sample.label,
            squared_error: diff * diff,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ml::model::AttentionRegressorConfig;
    use burn::backend::NdArray;

    type TestBackend = NdArray;

    fn predictor() -> Predictor<TestBackend> {
        let device = Default::default();
        let model = AttentionRegressorConfig::new(10, 5)
            .with_key_dim(4)
            .with_mlp_units(8)
            .init::<TestBackend>(&device);
        Predictor::new(model, device)
    }

    fn window(rows: usize) -> SensorTable {
        let values = (0..rows * 6).map(|v| (v % 7) as f32 * 0.1).collect();
        SensorTable::new(rows, 6, values).unwrap()
    }

    #[test]
    fn test_predict_window() {
        let p = predictor();
        let w = window(10);
        let out = p.predict_window(&w).unwrap();

        let expected = w.column(5).iter().sum::<f32>() / 10.0;
        assert!((out.expected - expected).abs() < 1e-6);
        assert!(out.predicted >= 0.0);
        assert!((out.squared_error - (out.predicted - out.expected).powi(2)).abs() < 1e-6);
    }

    #[test]
    fn test_wrong_window_length_rejected() {
        assert!(predictor().predict_window(&window(9)).is_err());
    }

    #[test]
    fn test_wrong_feature_count_rejected() {
        let table = SensorTable::new(10, 4, vec![0.0; 40]).unwrap();
        assert!(predictor().predict_window(&table).is_err());
    }

    #[test]
    fn test_predict_batch_len() {
        let p = predictor();
        let x = Tensor::<TestBackend, 3>::zeros([3, 10, 5], &Default::default());
        assert_eq!(p.predict_batch(x).unwrap().len(), 3);
    }
}
