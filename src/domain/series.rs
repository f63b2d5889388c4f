// ============================================================
// Layer 3 — SensorTable Domain Type
// ============================================================
// A dense, row-major table of f32 sensor readings.
//
// Row r, column c lives at values[r * cols + c]. Rows are time
// steps, columns are channels. The last column of a selected
// table is the regression target; every column before it is a
// model input feature.
//
// Example (3 rows × 3 cols):
//   values = [a0 b0 y0, a1 b1 y1, a2 b2 y2]
//   row(1)    = [a1, b1, y1]
//   column(2) = [y0, y1, y2]
//
// Reference: Rust Book §8 (Vectors and Slices)

use anyhow::{ensure, Result};
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// A rectangular table of sensor readings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorTable {
    rows:   usize,
    cols:   usize,
    values: Vec<f32>,
}

impl SensorTable {
    /// Build a table from a flat row-major buffer.
    pub fn new(rows: usize, cols: usize, values: Vec<f32>) -> Result<Self> {
        ensure!(
            values.len() == rows * cols,
            "table buffer has {} values, expected {} ({} rows × {} cols)",
            values.len(),
            rows * cols,
            rows,
            cols
        );
        Ok(Self { rows, cols, values })
    }

    /// Build a table from parsed rows. Every row must have the same width.
    pub fn from_rows(rows: Vec<Vec<f32>>) -> Result<Self> {
        let cols = rows.first().map(|r| r.len()).unwrap_or(0);
        let mut values = Vec::with_capacity(rows.len() * cols);

        for (i, row) in rows.iter().enumerate() {
            ensure!(
                row.len() == cols,
                "row {} has {} columns, expected {}",
                i,
                row.len(),
                cols
            );
            values.extend_from_slice(row);
        }

        Self::new(rows.len(), cols, values)
    }

    pub fn rows(&self) -> usize { self.rows }

    pub fn cols(&self) -> usize { self.cols }

    pub fn shape(&self) -> (usize, usize) { (self.rows, self.cols) }

    pub fn is_empty(&self) -> bool { self.rows == 0 }

    pub fn values(&self) -> &[f32] { &self.values }

    /// Number of input features: every column except the last.
    pub fn feature_count(&self) -> usize { self.cols.saturating_sub(1) }

    /// Borrow one row. Panics if `r` is out of range, like slice indexing.
    pub fn row(&self, r: usize) -> &[f32] {
        &self.values[r * self.cols..(r + 1) * self.cols]
    }

    /// Copy one column out of the table.
    #[cfg(test)]
    pub fn column(&self, c: usize) -> Vec<f32> {
        (0..self.rows).map(|r| self.values[r * self.cols + c]).collect()
    }

    /// Keep only the columns in `range` (half-open, like `data[:, 1:7]`).
    pub fn select_columns(&self, range: Range<usize>) -> Result<Self> {
        ensure!(
            range.start < range.end && range.end <= self.cols,
            "column range {}..{} is outside a table with {} columns",
            range.start,
            range.end,
            self.cols
        );

        let width = range.end - range.start;
        let values = (0..self.rows)
            .flat_map(|r| self.row(r)[range.clone()].iter().copied())
            .collect();

        Self::new(self.rows, width, values)
    }

    /// Copy the rows in `range` (half-open) into a new table.
    pub fn slice_rows(&self, range: Range<usize>) -> Result<Self> {
        ensure!(
            range.start <= range.end && range.end <= self.rows,
            "row range {}..{} is outside a table with {} rows",
            range.start,
            range.end,
            self.rows
        );

        let values = self.values[range.start * self.cols..range.end * self.cols].to_vec();
        Self::new(range.end - range.start, self.cols, values)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> SensorTable {
        SensorTable::from_rows(vec![
            vec![0.0, 1.0, 2.0, 3.0],
            vec![10.0, 11.0, 12.0, 13.0],
            vec![20.0, 21.0, 22.0, 23.0],
        ])
        .unwrap()
    }

    #[test]
    fn test_from_rows_shape() {
        let t = sample();
        assert_eq!(t.shape(), (3, 4));
        assert_eq!(t.row(1), &[10.0, 11.0, 12.0, 13.0]);
        assert_eq!(t.column(3), vec![3.0, 13.0, 23.0]);
        assert_eq!(t.feature_count(), 3);
    }

    #[test]
    fn test_ragged_rows_rejected() {
        let err = SensorTable::from_rows(vec![vec![1.0, 2.0], vec![3.0]]);
        assert!(err.is_err());
    }

    #[test]
    fn test_select_columns() {
        let t = sample().select_columns(1..3).unwrap();
        assert_eq!(t.shape(), (3, 2));
        assert_eq!(t.row(2), &[21.0, 22.0]);
    }

    #[test]
    fn test_select_columns_out_of_range() {
        assert!(sample().select_columns(1..7).is_err());
        assert!(sample().select_columns(2..2).is_err());
    }

    #[test]
    fn test_slice_rows() {
        let t = sample().slice_rows(1..3).unwrap();
        assert_eq!(t.rows(), 2);
        assert_eq!(t.row(0), &[10.0, 11.0, 12.0, 13.0]);
        assert!(sample().slice_rows(2..4).is_err());
    }

    #[test]
    fn test_empty_table() {
        let t = SensorTable::from_rows(Vec::new()).unwrap();
        assert!(t.is_empty());
        assert_eq!(t.feature_count(), 0);
    }
}
