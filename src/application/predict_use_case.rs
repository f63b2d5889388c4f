// ============================================================
// Layer 2 — Predict Use Case
// ============================================================
// Rebuilds a trained model from its checkpoint directory and
// predicts one window of a sensor file:
//   1. Load train_config.json (data slicing + architecture)
//   2. Load the sensor file with the same loader settings
//   3. Cut window_size rows starting at `offset`
//      (default: the held-out slice right after the training rows)
//   4. Run the model and compare with the window's mean target

use anyhow::{ensure, Result};
use burn::prelude::Backend;

use crate::data::splitter::split_holdout;
use crate::domain::traits::TableSource;
use crate::infra::checkpoint::CheckpointManager;
use crate::ml::predictor::{HoldoutPrediction, InferBackend, Predictor};

pub struct PredictUseCase {
    checkpoint_dir: String,
    data_path:      Option<String>,
    offset:         Option<usize>,
}

impl PredictUseCase {
    pub fn new(checkpoint_dir: String, data_path: Option<String>, offset: Option<usize>) -> Self {
        Self { checkpoint_dir, data_path, offset }
    }

    pub fn execute(&self) -> Result<HoldoutPrediction> {
        self.execute_on::<InferBackend>(Default::default())
    }

    pub fn execute_on<B: Backend>(&self, device: B::Device) -> Result<HoldoutPrediction> {
        let ckpt = CheckpointManager::new(&self.checkpoint_dir)?;
        let mut cfg = ckpt.load_config()?;
        if let Some(path) = &self.data_path {
            cfg.data_path = path.clone();
        }

        let raw    = cfg.loader()?.load()?;
        let offset = self.offset.unwrap_or(cfg.train_rows);
        ensure!(
            offset <= raw.rows(),
            "offset {} is past the end of '{}' ({} rows)",
            offset,
            cfg.data_path,
            raw.rows()
        );

        // Same column selection as training; everything before `offset`
        // is dropped and the next window_size rows are kept
        let window = split_holdout(&raw, cfg.columns(), offset, cfg.window_size)?.test;
        tracing::info!("Predicting rows {}..{} of '{}'", offset, offset + window.rows(), cfg.data_path);

        let predictor = Predictor::<B>::from_checkpoint(&ckpt, device)?;
        predictor.predict_window(&window)
    }
}
