// ============================================================
// Layer 6 — Epoch Metrics CSV
// ============================================================
// One row per finished epoch, appended as training goes:
//
//   epoch,train_loss,batches
//   1,0.4123,1556
//   2,0.19014,1556
//
// `train_loss` is the mean of the per-batch MSE values of that
// epoch. The file lives next to the checkpoints and is truncated
// when a new run starts.

use anyhow::{Context, Result};
use csv::WriterBuilder;
use serde::{Deserialize, Serialize};
use std::{
    fs::{self, OpenOptions},
    path::{Path, PathBuf},
};

const CSV_FILE: &str = "metrics.csv";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpochMetrics {
    /// 1-based
    pub epoch:      usize,
    pub train_loss: f64,
    pub batches:    usize,
}

impl EpochMetrics {
    pub fn new(epoch: usize, train_loss: f64, batches: usize) -> Self {
        Self { epoch, train_loss, batches }
    }

    pub fn is_improvement(&self, best_loss: f64) -> bool {
        self.train_loss < best_loss
    }
}

pub struct MetricsLogger {
    csv_path: PathBuf,
}

impl MetricsLogger {
    /// Start a fresh `metrics.csv` in `dir` holding only the header row.
    pub fn new(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)
            .with_context(|| format!("Cannot create metrics directory '{}'", dir.display()))?;

        let csv_path = dir.join(CSV_FILE);
        let mut writer = WriterBuilder::new()
            .from_path(&csv_path)
            .with_context(|| format!("Cannot create '{}'", csv_path.display()))?;
        writer.write_record(["epoch", "train_loss", "batches"])?;
        writer.flush()?;

        tracing::debug!("Epoch metrics go to '{}'", csv_path.display());
        Ok(Self { csv_path })
    }

    pub fn log(&self, m: &EpochMetrics) -> Result<()> {
        let file = OpenOptions::new()
            .append(true)
            .open(&self.csv_path)
            .with_context(|| format!("Cannot append to '{}'", self.csv_path.display()))?;

        let mut writer = WriterBuilder::new().has_headers(false).from_writer(file);
        writer.serialize(m)?;
        writer.flush()?;

        tracing::debug!("epoch {} train_loss={:.6} over {} batches", m.epoch, m.train_loss, m.batches);
        Ok(())
    }

    pub fn csv_path(&self) -> &Path {
        &self.csv_path
    }
}

/// Every row of a metrics CSV, in epoch order.
#[cfg(test)]
pub fn read_history(path: &Path) -> Result<Vec<EpochMetrics>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("Cannot read '{}'", path.display()))?;
    reader
        .deserialize()
        .collect::<Result<Vec<EpochMetrics>, _>>()
        .with_context(|| format!("Malformed row in '{}'", path.display()))
}
