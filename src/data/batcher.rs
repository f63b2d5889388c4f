// ============================================================
// Layer 4 — Window Batcher
// ============================================================
// Implements Burn's Batcher trait to convert a Vec<WindowSample>
// into tensors on the target device.
//
// How batching works here:
//   Input:  N WindowSamples, each W time steps × F features
//   Output: WindowBatch with
//             inputs  [N, W, F]
//             targets [N, 1]
//
//   All features are flattened into one Vec, then reshaped:
//   [s1_t1_f1, ..., s1_tW_fF, s2_t1_f1, ..., sN_tW_fF] → [N, W, F]
//
// Reference: Burn Book §4 (Batcher)

use burn::{
    data::dataloader::batcher::Batcher,
    prelude::*,
};

use crate::domain::window::WindowSample;

/// A batch of windows ready for the model forward pass.
#[derive(Debug, Clone)]
pub struct WindowBatch<B: Backend> {
    /// Feature windows — shape: [batch_size, window_size, feature_count]
    pub inputs: Tensor<B, 3>,

    /// Mean target per window — shape: [batch_size, 1]
    pub targets: Tensor<B, 2>,
}

#[derive(Clone, Debug)]
pub struct WindowBatcher<B: Backend> {
    pub device: B::Device,
}

impl<B: Backend> WindowBatcher<B> {
    pub fn new(device: B::Device) -> Self {
        Self { device }
    }
}

impl<B: Backend> Batcher<WindowSample, WindowBatch<B>> for WindowBatcher<B> {
    /// Stack samples into a WindowBatch. All samples must share one
    /// window size and feature count; `items` must not be empty.
    fn batch(&self, items: Vec<WindowSample>) -> WindowBatch<B> {
        let batch_size    = items.len();
        let window_size   = items[0].window_size;
        let feature_count = items[0].feature_count;

        let inputs_flat: Vec<f32> = items
            .iter()
            .flat_map(|s| s.features.iter().copied())
            .collect();

        let labels: Vec<f32> = items.iter().map(|s| s.label).collect();

        let inputs = Tensor::<B, 1>::from_floats(inputs_flat.as_slice(), &self.device)
            .reshape([batch_size, window_size, feature_count]);

        let targets = Tensor::<B, 1>::from_floats(labels.as_slice(), &self.device)
            .reshape([batch_size, 1]);

        WindowBatch { inputs, targets }
    }
}
