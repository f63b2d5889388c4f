// ============================================================
// Layer 5 — ML / Model Layer (Burn)
// ============================================================
// All Burn module definitions and the training loop live here.
//
//   attention.rs    — multi-head self-attention block
//                     (attention → dropout → residual → LayerNorm)
//
//   feed_forward.rs — position-wise feed-forward block
//                     (LayerNorm → Conv1d k=1 → ReLU → dropout
//                      → Conv1d k=1 → residual)
//
//   regression.rs   — regression head
//                     (global average pool → 2 × dense/dropout
//                      → dense(1) with ReLU)
//
//   model.rs        — the assembled model: [N, W, F] → [N, 1]
//
//   trainer.rs      — epoch loop with RMSprop and MSE loss,
//                     per-epoch checkpoints and metrics
//
//   predictor.rs    — loads a checkpoint and predicts one window
//
// The numerical kernels (matmul, softmax, convolution, autodiff)
// come from Burn; this layer only wires them together.
//
// Reference: Burn Book §3 (Building Blocks), §5 (Training)
//            Vaswani et al. (2017) Attention Is All You Need

/// Multi-head self-attention block
pub mod attention;

/// Conv1d feed-forward block
pub mod feed_forward;

/// Pooling + MLP regression head
pub mod regression;

/// Assembled attention regression model
pub mod model;

/// Training loop with checkpointing
pub mod trainer;

/// Checkpoint-backed prediction
pub mod predictor;
