// ============================================================
// Layer 4 — Column Selection and Train / Held-out Split
// ============================================================
// Turns the raw table into the two tables the pipeline uses:
//
//   raw table (all columns)
//       │  keep columns first..last        e.g. 1..7 → 6 columns
//       ▼
//   working table
//       ├── rows [0, train_rows)                     → training set
//       └── rows [train_rows, train_rows+test_rows)  → held-out slice
//
// The split is positional, not random: time-series rows must
// stay in order, and the held-out slice is the stretch that
// directly follows the training data.
//
// Reference: Rust Book §8 (Slices)

use anyhow::{ensure, Result};
use std::ops::Range;

use crate::domain::series::SensorTable;

/// The two tables produced by `split_holdout`.
#[derive(Debug, Clone)]
pub struct HoldoutSplit {
    pub train: SensorTable,
    pub test:  SensorTable,
}

/// Keep `columns` of `table`, then cut it into a training prefix of
/// `train_rows` rows and a held-out slice of up to `test_rows` rows.
///
/// The held-out slice is shortened when the table ends early, the
/// same way `data[a:b]` clamps in array libraries.
pub fn split_holdout(
    table:      &SensorTable,
    columns:    Range<usize>,
    train_rows: usize,
    test_rows:  usize,
) -> Result<HoldoutSplit> {
    let working = table.select_columns(columns)?;

    ensure!(
        train_rows <= working.rows(),
        "cannot take {} training rows from a table with {} rows",
        train_rows,
        working.rows()
    );

    let test_end = train_rows.saturating_add(test_rows).min(working.rows());
    if test_end - train_rows < test_rows {
        tracing::warn!(
            "Held-out slice shortened to {} rows (requested {})",
            test_end - train_rows,
            test_rows
        );
    }

    let train = working.slice_rows(0..train_rows)?;
    let test  = working.slice_rows(train_rows..test_end)?;

    tracing::debug!(
        "Split: train {:?}, held-out {:?}",
        train.shape(),
        test.shape()
    );

    Ok(HoldoutSplit { train, test })
}
