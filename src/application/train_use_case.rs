// ============================================================
// Layer 2 — TrainUseCase
// ============================================================
// Orchestrates the full training pipeline in order:
//
//   Step 1: Load the sensor file          (Layer 4 - data)
//   Step 2: Select columns, split rows    (Layer 4 - data)
//   Step 3: Build the window generator    (Layer 4 - data)
//   Step 4: Save config                   (Layer 6 - infra)
//   Step 5: Run training loop             (Layer 5 - ml)
//   Step 6: Predict on the held-out slice (Layer 5 - ml)
//           with the in-memory model, not the half-precision
//           checkpoint
//
// Reference: Burn Book §5 (Training)

use anyhow::{ensure, Result};
use burn::{module::AutodiffModule, tensor::backend::AutodiffBackend};
use serde::{Deserialize, Serialize};
use std::{ops::Range, path::PathBuf};

use crate::data::{
    generator::WindowGenerator,
    loader::DelimitedLoader,
    splitter::split_holdout,
};
use crate::domain::traits::TableSource;
use crate::infra::{checkpoint::CheckpointManager, metrics::MetricsLogger};
use crate::ml::model::AttentionRegressorConfig;
use crate::ml::predictor::{HoldoutPrediction, Predictor};
use crate::ml::trainer::{train_loop, TrainBackend, TrainingReport};

// ─── Training Configuration ──────────────────────────────────────────────────
// All settings for a training run. Saved next to the checkpoints
// so `predict` can rebuild the same data slicing and model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainConfig {
    pub data_path:      String,
    pub checkpoint_dir: String,
    pub skip_header:    usize,
    pub delimiter:      char,
    /// First kept column of the raw file (inclusive)
    pub first_column:   usize,
    /// Last kept column of the raw file (exclusive)
    pub last_column:    usize,
    pub train_rows:     usize,
    pub test_rows:      usize,
    pub window_size:    usize,
    pub step_size:      usize,
    pub batch_size:     usize,
    pub epochs:         usize,
    pub lr:             f64,
    pub num_heads:      usize,
    pub key_dim:        usize,
    pub ff_hidden:      usize,
    pub mlp_units:      usize,
    pub dropout:        f64,
    pub shuffle:        bool,
    pub seed:           u64,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            data_path:      "t1.ASC".to_string(),
            checkpoint_dir: "checkpoints".to_string(),
            skip_header:    8,
            delimiter:      ';',
            first_column:   1,
            last_column:    7,
            train_rows:     49_800,
            test_rows:      200,
            window_size:    200,
            step_size:      20,
            batch_size:     32,
            epochs:         10,
            lr:             1e-3,
            num_heads:      4,
            key_dim:        200,
            ff_hidden:      3,
            mlp_units:      128,
            dropout:        0.1,
            shuffle:        true,
            seed:           42,
        }
    }
}

impl TrainConfig {
    /// Raw-file columns kept for the working table.
    pub fn columns(&self) -> Range<usize> {
        self.first_column..self.last_column
    }

    /// Input features per time step: every kept column but the target.
    pub fn feature_count(&self) -> usize {
        self.last_column.saturating_sub(self.first_column).saturating_sub(1)
    }

    pub fn loader(&self) -> Result<DelimitedLoader> {
        ensure!(
            self.delimiter.is_ascii(),
            "delimiter '{}' must be a single ASCII character",
            self.delimiter
        );
        Ok(DelimitedLoader::new(&self.data_path)
            .with_delimiter(self.delimiter as u8)
            .with_skip_header(self.skip_header))
    }

    pub fn model_config(&self, num_features: usize) -> AttentionRegressorConfig {
        AttentionRegressorConfig::new(self.window_size, num_features)
            .with_num_heads(self.num_heads)
            .with_key_dim(self.key_dim)
            .with_ff_hidden(self.ff_hidden)
            .with_mlp_units(self.mlp_units)
            .with_dropout(self.dropout)
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.last_column >= self.first_column + 2,
            "columns {}..{} leave no feature column next to the target",
            self.first_column,
            self.last_column
        );
        ensure!(self.window_size > 0, "window_size must be positive");
        ensure!(self.step_size > 0, "step_size must be positive");
        ensure!(self.batch_size > 0, "batch_size must be positive");
        ensure!(self.num_heads > 0 && self.key_dim > 0, "attention needs heads and key_dim > 0");
        ensure!((0.0..1.0).contains(&self.dropout), "dropout must be in [0, 1)");
        ensure!(self.lr > 0.0, "learning rate must be positive");
        Ok(())
    }
}

/// Everything the CLI reports after a training run.
#[derive(Debug, Clone)]
pub struct TrainOutcome {
    /// (rows, features) of the training inputs
    pub train_features_shape: (usize, usize),
    /// Length of the training target column
    pub train_target_len:     usize,
    pub test_shape:           (usize, usize),
    pub windows:              usize,
    pub batches:              usize,
    pub report:               TrainingReport,
    pub metrics_path:         PathBuf,
    /// None when the held-out slice is shorter than one window
    pub holdout:              Option<HoldoutPrediction>,
}

// ─── TrainUseCase ─────────────────────────────────────────────────────────────
pub struct TrainUseCase {
    config: TrainConfig,
}

impl TrainUseCase {
    pub fn new(config: TrainConfig) -> Self {
        Self { config }
    }

    /// Execute the full training pipeline end to end on the GPU backend
    pub fn execute(&self) -> Result<TrainOutcome> {
        let device = burn::backend::wgpu::WgpuDevice::default();
        tracing::info!("Using WGPU device: {:?}", device);
        self.execute_on::<TrainBackend>(device)
    }

    pub fn execute_on<B: AutodiffBackend>(&self, device: B::Device) -> Result<TrainOutcome> {
        let cfg = &self.config;
        cfg.validate()?;

        // ── Step 1: Load the sensor file ─────────────────────────────────────
        tracing::info!("Loading sensor data from '{}'", cfg.data_path);
        let raw = cfg.loader()?.load()?;
        ensure!(
            !raw.is_empty(),
            "'{}' has no data rows after skipping {} header lines",
            cfg.data_path,
            cfg.skip_header
        );

        // ── Step 2: Keep columns, split train / held-out ─────────────────────
        let split = split_holdout(&raw, cfg.columns(), cfg.train_rows, cfg.test_rows)?;
        let train_features_shape = (split.train.rows(), split.train.feature_count());
        let train_target_len     = split.train.rows();
        tracing::info!(
            "Train features {:?}, train target ({},), held-out {:?}",
            train_features_shape,
            train_target_len,
            split.test.shape()
        );

        // ── Step 3: Window generator ──────────────────────────────────────────
        let generator = WindowGenerator::new(
            split.train,
            cfg.window_size,
            cfg.batch_size,
            cfg.step_size,
        )?;
        tracing::info!(
            "{} windows in {} batches of up to {}",
            generator.window_count(),
            generator.len(),
            cfg.batch_size
        );

        // ── Step 4: Save config for prediction ───────────────────────────────
        let ckpt_manager = CheckpointManager::new(&cfg.checkpoint_dir)?;
        ckpt_manager.save_config(cfg)?;
        let metrics = MetricsLogger::new(ckpt_manager.dir())?;

        // ── Step 5: Run training loop (Layer 5) ───────────────────────────────
        let (model, report) =
            train_loop::<B>(cfg, &generator, &ckpt_manager, &metrics, device.clone())?;

        // ── Step 6: Predict on the held-out slice ────────────────────────────
        let holdout = if split.test.rows() == cfg.window_size {
            let predictor = Predictor::new(model.valid(), device);
            Some(predictor.predict_window(&split.test)?)
        } else {
            tracing::warn!(
                "Held-out slice has {} rows, need exactly {} for a prediction; skipping",
                split.test.rows(),
                cfg.window_size
            );
            None
        };

        Ok(TrainOutcome {
            train_features_shape,
            train_target_len,
            test_shape: split.test.shape(),
            windows: generator.window_count(),
            batches: generator.len(),
            report,
            metrics_path: metrics.csv_path().to_path_buf(),
            holdout,
        })
    }
}
