// ============================================================
// Layer 4 — Windowed Batch Generator
// ============================================================
// Groups the windows of a WindowDataset into numbered batches:
//
//   batch k = windows [k·N, min((k+1)·N, window_count))
//
// len() = ceil(window_count / N). Every batch except possibly
// the last one holds exactly N windows, and no batch is empty.
//
// Example: 40 windows, N = 32 → batch 0 has 32, batch 1 has 8.
//
// The generator is a read-only view: the only state is the
// start-index list computed when the dataset is built. Batch
// visiting order for an epoch comes from `epoch_order`, which
// optionally shuffles whole batches (windows inside a batch
// keep their order).
//
// Reference: Burn Book §4 (Dataset), rand crate (SliceRandom)

use anyhow::{ensure, Result};
use burn::data::dataset::Dataset;
use rand::{seq::SliceRandom, Rng};

use crate::data::dataset::WindowDataset;
use crate::domain::series::SensorTable;
use crate::domain::window::WindowSample;

pub struct WindowGenerator {
    dataset:    WindowDataset,
    batch_size: usize,
}

impl WindowGenerator {
    pub fn new(
        table:       SensorTable,
        window_size: usize,
        batch_size:  usize,
        step_size:   usize,
    ) -> Result<Self> {
        ensure!(batch_size > 0, "batch_size must be positive");
        let dataset = WindowDataset::new(table, window_size, step_size)?;

        tracing::debug!(
            "Generator: {} windows (W={}, S={}), {} batches of up to {}",
            dataset.len(),
            window_size,
            step_size,
            dataset.len().div_ceil(batch_size),
            batch_size
        );

        Ok(Self { dataset, batch_size })
    }

    /// Number of batches per epoch.
    pub fn len(&self) -> usize {
        self.dataset.len().div_ceil(self.batch_size)
    }

    pub fn is_empty(&self) -> bool {
        self.dataset.is_empty()
    }

    pub fn window_count(&self) -> usize { self.dataset.len() }

    pub fn feature_count(&self) -> usize { self.dataset.feature_count() }

    /// The windows of batch `idx`, or `None` past the last batch.
    pub fn batch(&self, idx: usize) -> Option<Vec<WindowSample>> {
        if idx >= self.len() {
            return None;
        }
        let start = idx * self.batch_size;
        let end   = (start + self.batch_size).min(self.dataset.len());
        Some((start..end).filter_map(|i| self.dataset.get(i)).collect())
    }

    /// All batches in order.
    #[cfg(test)]
    pub fn iter(&self) -> impl Iterator<Item = Vec<WindowSample>> + '_ {
        (0..self.len()).filter_map(move |idx| self.batch(idx))
    }

    /// Batch indices to visit in one epoch.
    pub fn epoch_order<R: Rng + ?Sized>(&self, shuffle: bool, rng: &mut R) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.len()).collect();
        if shuffle {
            order.shuffle(rng);
        }
        order
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    /// 6 columns: five features r*10+c, target = r.
    fn table(rows: usize) -> SensorTable {
        let values = (0..rows)
            .flat_map(|r| (0..6).map(move |c| if c == 5 { r as f32 } else { (r * 10 + c) as f32 }))
            .collect();
        SensorTable::new(rows, 6, values).unwrap()
    }

    #[test]
    fn test_reference_example_batches() {
        let g = WindowGenerator::new(table(1000), 200, 32, 20).unwrap();
        assert_eq!(g.window_count(), 40);
        assert_eq!(g.len(), 2);
        assert_eq!(g.batch(0).unwrap().len(), 32);
        assert_eq!(g.batch(1).unwrap().len(), 8);
        assert!(g.batch(2).is_none());
    }

    #[test]
    fn test_len_is_ceil_of_windows_over_batch() {
        for batch_size in 1..12 {
            let g = WindowGenerator::new(table(100), 10, batch_size, 3).unwrap();
            assert_eq!(g.len(), g.window_count().div_ceil(batch_size));
            let total: usize = g.iter().map(|b| b.len()).sum();
            assert_eq!(total, g.window_count());
            assert!(g.iter().all(|b| !b.is_empty()));
        }
    }

    #[test]
    fn test_labels_are_window_means() {
        let g = WindowGenerator::new(table(100), 10, 4, 7).unwrap();
        for batch in g.iter() {
            for w in batch {
                let expected: f32 = (w.start..w.start + 10).map(|r| r as f32).sum::<f32>() / 10.0;
                assert!((w.label - expected).abs() < 1e-4);
                assert_eq!(w.step(0)[0], (w.start * 10) as f32);
                assert_eq!(w.step(9)[4], ((w.start + 9) * 10 + 4) as f32);
            }
        }
    }

    #[test]
    fn test_batches_follow_start_order() {
        let g = WindowGenerator::new(table(100), 10, 4, 5).unwrap();
        let starts: Vec<usize> = g.batch(1).unwrap().iter().map(|w| w.start).collect();
        assert_eq!(starts, vec![20, 25, 30, 35]);
    }

    #[test]
    fn test_empty_when_table_shorter_than_window() {
        let g = WindowGenerator::new(table(50), 200, 32, 20).unwrap();
        assert!(g.is_empty());
        assert_eq!(g.len(), 0);
        assert!(g.batch(0).is_none());
    }

    #[test]
    fn test_epoch_order() {
        let g = WindowGenerator::new(table(1000), 20, 4, 5).unwrap();
        let mut rng = StdRng::seed_from_u64(7);

        let plain = g.epoch_order(false, &mut rng);
        assert_eq!(plain, (0..g.len()).collect::<Vec<_>>());

        let mut shuffled = g.epoch_order(true, &mut rng);
        assert_eq!(shuffled.len(), g.len());
        shuffled.sort_unstable();
        assert_eq!(shuffled, plain);
    }

    #[test]
    fn test_zero_batch_size_rejected() {
        assert!(WindowGenerator::new(table(100), 10, 0, 1).is_err());
    }
}
