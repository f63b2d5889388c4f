// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// Everything from the raw sensor file to tensor batches.
//
// The pipeline flows in this order:
//
//   t1.ASC (';'-delimited text)
//       │
//       ▼
//   DelimitedLoader   → skips the header block, parses numbers
//       │
//       ▼
//   split_holdout     → keeps columns 1..7, cuts train / test rows
//       │
//       ▼
//   WindowDataset     → implements Burn's Dataset trait, one item
//       │               per window start index
//       ▼
//   WindowGenerator   → groups windows into numbered batches
//       │
//       ▼
//   WindowBatcher     → stacks a batch into [N, W, F] / [N, 1] tensors
//
// Reference: Burn Book §4 (Datasets and Batchers)

/// Reads delimited sensor files with the csv crate
pub mod loader;

/// Column selection and the fixed train / held-out row split
pub mod splitter;

/// Implements Burn's Dataset trait over window start indices
pub mod dataset;

/// Batch-indexed view over the window dataset
pub mod generator;

/// Implements Burn's Batcher trait to create tensor batches
pub mod batcher;
