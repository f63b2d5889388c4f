// ============================================================
// Layer 4 — Window Dataset
// ============================================================
// Exposes every window of a SensorTable as one item of a Burn
// Dataset. Items are built lazily from the start index list.
//
// Start indices follow the arange rule with an exclusive stop:
//
//   starts = 0, S, 2S, ...   while start < L − W
//
//   L = 1000, W = 200, S = 20 → 0, 20, ..., 780 → 40 windows
//
// The window beginning exactly at L − W is NOT produced even
// though it would fit; a table with L ≤ W has no windows.

use anyhow::{ensure, Result};
use burn::data::dataset::Dataset;

use crate::domain::series::SensorTable;
use crate::domain::window::WindowSample;

/// Start indices `0, step, 2*step, ...` strictly below `len - window_size`.
pub fn window_starts(len: usize, window_size: usize, step_size: usize) -> Vec<usize> {
    if len <= window_size || step_size == 0 {
        return Vec::new();
    }
    (0..len - window_size).step_by(step_size).collect()
}

/// Reduce rows `start..start + window_size` of `table` to a sample.
/// Panics if the window runs past the end of the table.
pub fn extract_window(table: &SensorTable, start: usize, window_size: usize) -> WindowSample {
    let feature_count = table.feature_count();
    let target_col    = table.cols() - 1;

    let mut features = Vec::with_capacity(window_size * feature_count);
    let mut label_sum = 0.0f64;

    for r in start..start + window_size {
        let row = table.row(r);
        features.extend_from_slice(&row[..feature_count]);
        label_sum += row[target_col] as f64;
    }

    let label = (label_sum / window_size as f64) as f32;
    WindowSample::new(start, window_size, feature_count, features, label)
}

pub struct WindowDataset {
    table:       SensorTable,
    window_size: usize,
    starts:      Vec<usize>,
}

impl WindowDataset {
    pub fn new(table: SensorTable, window_size: usize, step_size: usize) -> Result<Self> {
        ensure!(window_size > 0, "window_size must be positive");
        ensure!(step_size > 0, "step_size must be positive");
        ensure!(
            table.cols() >= 2,
            "a window needs at least one feature column and one target column, table has {}",
            table.cols()
        );

        let starts = window_starts(table.rows(), window_size, step_size);
        Ok(Self { table, window_size, starts })
    }

    pub fn feature_count(&self) -> usize { self.table.feature_count() }
}

impl Dataset<WindowSample> for WindowDataset {
    fn get(&self, index: usize) -> Option<WindowSample> {
        self.starts
            .get(index)
            .map(|&start| extract_window(&self.table, start, self.window_size))
    }

    fn len(&self) -> usize {
        self.starts.len()
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    /// Row r = [r, 10r, ..., target = r] with `features` feature columns.
    fn table(rows: usize, features: usize) -> SensorTable {
        let cols = features + 1;
        let values = (0..rows)
            .flat_map(|r| {
                (0..cols).map(move |c| if c == features { r as f32 } else { (r * 10 + c) as f32 })
            })
            .collect();
        SensorTable::new(rows, cols, values).unwrap()
    }

    #[test]
    fn test_window_starts_reference_example() {
        let starts = window_starts(1000, 200, 20);
        assert_eq!(starts.len(), 40);
        assert_eq!(starts.first(), Some(&0));
        assert_eq!(starts.last(), Some(&780));
    }

    #[test]
    fn test_window_count_is_ceil() {
        for (len, w, s) in [(1000, 200, 20), (1000, 200, 30), (205, 200, 1), (201, 200, 7)] {
            let expected = (len - w + s - 1) / s;
            assert_eq!(window_starts(len, w, s).len(), expected, "L={len} W={w} S={s}");
        }
    }

    #[test]
    fn test_no_windows_when_table_too_short() {
        assert!(window_starts(200, 200, 1).is_empty());
        assert!(window_starts(10, 200, 1).is_empty());
    }

    #[test]
    fn test_tail_window_is_dropped() {
        // L − W = 20 is divisible by S, but the window starting at 20 is excluded
        assert_eq!(window_starts(30, 10, 10), vec![0, 10]);
    }

    #[test]
    fn test_extract_window_features_and_label() {
        let t = table(10, 2);
        let w = extract_window(&t, 3, 4);
        assert_eq!(w.start, 3);
        assert_eq!(w.features.len(), 8);
        assert_eq!(w.step(0), &[30.0, 31.0]);
        assert_eq!(w.step(3), &[60.0, 61.0]);
        // mean(3, 4, 5, 6)
        assert!((w.label - 4.5).abs() < 1e-6);
    }

    #[test]
    fn test_dataset_get_and_len() {
        let ds = WindowDataset::new(table(50, 5), 10, 5).unwrap();
        assert_eq!(ds.len(), 8);
        assert_eq!(ds.feature_count(), 5);
        assert_eq!(ds.get(7).unwrap().start, 35);
        assert!(ds.get(8).is_none());
    }

    #[test]
    fn test_dataset_rejects_bad_parameters() {
        assert!(WindowDataset::new(table(50, 5), 0, 5).is_err());
        assert!(WindowDataset::new(table(50, 5), 10, 0).is_err());
        assert!(WindowDataset::new(table(50, 0), 10, 1).is_err());
    }
}
