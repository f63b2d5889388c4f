// ============================================================
// Layer 5 — Feed-Forward Block
// ============================================================
//   out = x + Conv2(Dropout(ReLU(Conv1(LayerNorm(x)))))
//
// Both convolutions have kernel width 1, i.e. the same dense
// projection applied at every time step. burn's Conv1d reads
// [batch, channels, length], so the sequence is transposed in
// and out of channel-first layout around the convolutions.

use burn::{
    nn::{
        conv::{Conv1d, Conv1dConfig},
        Dropout, DropoutConfig,
        LayerNorm, LayerNormConfig,
    },
    prelude::*,
    tensor::activation::relu,
};

#[derive(Config, Debug)]
pub struct FeedForwardConfig {
    pub d_model: usize,
    /// Channels of the first (expanding) convolution
    #[config(default = 3)]
    pub hidden:  usize,
    #[config(default = 0.1)]
    pub dropout: f64,
    #[config(default = 1e-3)]
    pub norm_epsilon: f64,
}

impl FeedForwardConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> FeedForward<B> {
        FeedForward {
            norm:    LayerNormConfig::new(self.d_model)
                .with_epsilon(self.norm_epsilon)
                .init(device),
            conv1:   Conv1dConfig::new(self.d_model, self.hidden, 1).init(device),
            conv2:   Conv1dConfig::new(self.hidden, self.d_model, 1).init(device),
            dropout: DropoutConfig::new(self.dropout).init(),
        }
    }
}

#[derive(Module, Debug)]
pub struct FeedForward<B: Backend> {
    pub norm:    LayerNorm<B>,
    pub conv1:   Conv1d<B>,
    pub conv2:   Conv1d<B>,
    pub dropout: Dropout,
}

impl<B: Backend> FeedForward<B> {
    /// x: [batch, seq_len, d_model] → [batch, seq_len, d_model]
    pub fn forward(&self, x: Tensor<B, 3>) -> Tensor<B, 3> {
        let out = self.norm.forward(x.clone()).swap_dims(1, 2);
        let out = relu(self.conv1.forward(out));
        let out = self.dropout.forward(out);
        let out = self.conv2.forward(out).swap_dims(1, 2);
        x + out
    }
}
