// ============================================================
// Layer 6 — Checkpoint Directory
// ============================================================
// Everything a training run leaves behind for `predict`:
//
//   <checkpoint_dir>/
//     train_config.json     data slicing + architecture
//     model_epoch_<n>.mpk   AttentionRegressor weights after epoch n
//     latest_epoch.json     {"epoch": n, "train_loss": ...}
//     metrics.csv           (written by MetricsLogger)
//
// Weights go through Burn's CompactRecorder (MessagePack, half
// precision). A record only loads into a model built from the
// AttentionRegressorConfig recorded in train_config.json.

use anyhow::{Context, Result};
use burn::{
    prelude::*,
    record::{CompactRecorder, Recorder},
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::application::train_use_case::TrainConfig;
use crate::infra::metrics::EpochMetrics;
use crate::ml::model::AttentionRegressor;

const CONFIG_FILE: &str = "train_config.json";
const LATEST_FILE: &str = "latest_epoch.json";

/// Pointer to the most recently written weights.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatestCheckpoint {
    pub epoch:      usize,
    pub train_loss: f64,
}

pub struct CheckpointManager {
    dir: PathBuf,
}

impl CheckpointManager {
    /// Open `dir` as a checkpoint directory, creating it if needed.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .with_context(|| format!("Cannot create checkpoint directory '{}'", dir.display()))?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Recorder path for one epoch; CompactRecorder adds the `.mpk` extension.
    fn weights_path(&self, epoch: usize) -> PathBuf {
        self.dir.join(format!("model_epoch_{epoch}"))
    }

    /// Record the weights reached after `metrics.epoch` and point
    /// latest_epoch.json at them.
    pub fn save_model<B: Backend>(
        &self,
        model:   &AttentionRegressor<B>,
        metrics: &EpochMetrics,
    ) -> Result<()> {
        let path = self.weights_path(metrics.epoch);
        CompactRecorder::new()
            .record(model.clone().into_record(), path.clone())
            .with_context(|| format!("Cannot write weights to '{}'", path.display()))?;

        let latest = LatestCheckpoint { epoch: metrics.epoch, train_loss: metrics.train_loss };
        self.write_json(LATEST_FILE, &latest)?;

        tracing::debug!("Weights for epoch {} written to '{}'", metrics.epoch, path.display());
        Ok(())
    }

    /// Load the most recent weights into `model`.
    pub fn load_model<B: Backend>(
        &self,
        model:  AttentionRegressor<B>,
        device: &B::Device,
    ) -> Result<AttentionRegressor<B>> {
        let latest = self.latest()?;
        tracing::info!(
            "Restoring weights of epoch {} (train loss {:.6})",
            latest.epoch,
            latest.train_loss
        );
        self.load_model_at(model, latest.epoch, device)
    }

    /// Load the weights written after `epoch` into `model`.
    pub fn load_model_at<B: Backend>(
        &self,
        model:  AttentionRegressor<B>,
        epoch:  usize,
        device: &B::Device,
    ) -> Result<AttentionRegressor<B>> {
        let path = self.weights_path(epoch);
        let record = CompactRecorder::new()
            .load(path.clone(), device)
            .with_context(|| {
                format!(
                    "Cannot load weights from '{}'; the architecture in {} must match the run that wrote them",
                    path.display(),
                    CONFIG_FILE
                )
            })?;
        Ok(model.load_record(record))
    }

    pub fn save_config(&self, cfg: &TrainConfig) -> Result<()> {
        self.write_json(CONFIG_FILE, cfg)
    }

    pub fn load_config(&self) -> Result<TrainConfig> {
        self.read_json(CONFIG_FILE)
            .context("No training config found; run 'train' before 'predict'")
    }

    pub fn latest(&self) -> Result<LatestCheckpoint> {
        self.read_json(LATEST_FILE)
            .context("No saved weights found; run 'train' before 'predict'")
    }

    fn write_json<T: Serialize + ?Sized>(&self, name: &str, value: &T) -> Result<()> {
        let path = self.dir.join(name);
        let json = serde_json::to_string_pretty(value)?;
        fs::write(&path, json).with_context(|| format!("Cannot write '{}'", path.display()))
    }

    fn read_json<T: DeserializeOwned>(&self, name: &str) -> Result<T> {
        let path = self.dir.join(name);
        let json = fs::read_to_string(&path)
            .with_context(|| format!("Cannot read '{}'", path.display()))?;
        serde_json::from_str(&json).with_context(|| format!("Malformed JSON in '{}'", path.display()))
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::ml::model::AttentionRegressorConfig;
    use burn::backend::NdArray;
    use burn::tensor::Distribution;

    type TestBackend = NdArray;

    #[test]
    fn test_config_round_trip() {
        let dir  = tempfile::tempdir().unwrap();
        let ckpt = CheckpointManager::new(dir.path()).unwrap();

        let cfg = TrainConfig { epochs: 3, window_size: 50, ..TrainConfig::default() };
        ckpt.save_config(&cfg).unwrap();
        assert_eq!(ckpt.load_config().unwrap(), cfg);
    }

    #[test]
    fn test_empty_directory_has_nothing_to_load() {
        let dir  = tempfile::tempdir().unwrap();
        let ckpt = CheckpointManager::new(dir.path().join("nested")).unwrap();
        assert!(ckpt.dir().is_dir());
        assert!(ckpt.latest().is_err());
        assert!(ckpt.load_config().is_err());
    }

    #[test]
    fn test_latest_tracks_last_save() {
        let dir    = tempfile::tempdir().unwrap();
        let ckpt   = CheckpointManager::new(dir.path()).unwrap();
        let device = Default::default();
        let model  = AttentionRegressorConfig::new(4, 2)
            .with_key_dim(2)
            .with_mlp_units(4)
            .init::<TestBackend>(&device);

        ckpt.save_model(&model, &EpochMetrics::new(1, 0.8, 3)).unwrap();
        ckpt.save_model(&model, &EpochMetrics::new(2, 0.4, 3)).unwrap();

        let latest = ckpt.latest().unwrap();
        assert_eq!(latest, LatestCheckpoint { epoch: 2, train_loss: 0.4 });
        assert!(dir.path().join("model_epoch_1.mpk").exists());
        assert!(dir.path().join("model_epoch_2.mpk").exists());
    }

    #[test]
    fn test_model_round_trip() {
        let dir    = tempfile::tempdir().unwrap();
        let ckpt   = CheckpointManager::new(dir.path()).unwrap();
        let device = Default::default();

        let model_cfg = AttentionRegressorConfig::new(8, 3)
            .with_key_dim(4)
            .with_mlp_units(6);
        let model = model_cfg.init::<TestBackend>(&device);
        ckpt.save_model(&model, &EpochMetrics::new(2, 0.1, 1)).unwrap();

        let restored = ckpt
            .load_model(model_cfg.init::<TestBackend>(&device), &device)
            .unwrap();

        // Half-precision storage: outputs agree only approximately
        let x = Tensor::<TestBackend, 3>::random([2, 8, 3], Distribution::Default, &device);
        let a: Vec<f32> = model.forward(x.clone()).into_data().to_vec().unwrap();
        let b: Vec<f32> = restored.forward(x).into_data().to_vec().unwrap();
        for (a, b) in a.iter().zip(&b) {
            assert!((a - b).abs() < 5e-2, "{a} vs {b}");
        }
    }
}
