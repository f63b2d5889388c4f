// ============================================================
// Layer 3 — WindowSample Domain Type
// ============================================================
// One training / prediction example: W consecutive rows of the
// sensor table, reduced to
//   - features: the leading F columns of every row, row-major
//   - label:    the mean of the last column over the W rows
//
// Example (W = 2, F = 2):
//   rows     = [a0 b0 y0, a1 b1 y1]
//   features = [a0, b0, a1, b1]
//   label    = (y0 + y1) / 2

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowSample {
    /// Row index in the source table where this window starts
    pub start:         usize,
    pub window_size:   usize,
    pub feature_count: usize,
    /// `window_size * feature_count` values, row-major
    pub features:      Vec<f32>,
    pub label:         f32,
}

impl WindowSample {
    pub fn new(
        start:         usize,
        window_size:   usize,
        feature_count: usize,
        features:      Vec<f32>,
        label:         f32,
    ) -> Self {
        debug_assert_eq!(features.len(), window_size * feature_count);
        Self { start, window_size, feature_count, features, label }
    }

    /// Features of time step `t` within the window.
    #[cfg(test)]
    pub fn step(&self, t: usize) -> &[f32] {
        &self.features[t * self.feature_count..(t + 1) * self.feature_count]
    }
}
