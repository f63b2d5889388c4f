use burn::{
    nn::loss::{MseLoss, Reduction},
    prelude::*,
};

use crate::ml::attention::{SelfAttention, SelfAttentionConfig};
use crate::ml::feed_forward::{FeedForward, FeedForwardConfig};
use crate::ml::regression::{RegressionHead, RegressionHeadConfig};

// NOTE: #[derive(Config)] already generates Clone and Serialize/Deserialize.
#[derive(Config, Debug)]
pub struct AttentionRegressorConfig {
    pub window_size:  usize,
    pub num_features: usize,
    #[config(default = 4)]
    pub num_heads:    usize,
    #[config(default = 200)]
    pub key_dim:      usize,
    #[config(default = 3)]
    pub ff_hidden:    usize,
    #[config(default = 128)]
    pub mlp_units:    usize,
    #[config(default = 0.1)]
    pub dropout:      f64,
}

impl AttentionRegressorConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> AttentionRegressor<B> {
        let attention = SelfAttentionConfig::new(self.num_features)
            .with_num_heads(self.num_heads)
            .with_key_dim(self.key_dim)
            .with_dropout(self.dropout)
            .init(device);
        let feed_forward = FeedForwardConfig::new(self.num_features)
            .with_hidden(self.ff_hidden)
            .with_dropout(self.dropout)
            .init(device);
        let head = RegressionHeadConfig::new(self.num_features)
            .with_units(self.mlp_units)
            .with_dropout(self.dropout)
            .init(device);

        AttentionRegressor {
            attention, feed_forward, head,
            window_size:  self.window_size,
            num_features: self.num_features,
        }
    }
}

#[derive(Module, Debug)]
pub struct AttentionRegressor<B: Backend> {
    pub attention:    SelfAttention<B>,
    pub feed_forward: FeedForward<B>,
    pub head:         RegressionHead<B>,
    pub window_size:  usize,
    pub num_features: usize,
}

impl<B: Backend> AttentionRegressor<B> {
    /// inputs: [batch, window_size, num_features] → predictions: [batch, 1]
    pub fn forward(&self, inputs: Tensor<B, 3>) -> Tensor<B, 2> {
        let x = self.attention.forward(inputs);
        let x = self.feed_forward.forward(x);
        self.head.forward(x)
    }

    /// Mean squared error between predictions and `targets` ([batch, 1]).
    pub fn forward_loss(
        &self,
        inputs:  Tensor<B, 3>,
        targets: Tensor<B, 2>,
    ) -> (Tensor<B, 1>, Tensor<B, 2>) {
        let output = self.forward(inputs);
        let loss = MseLoss::new().forward(output.clone(), targets, Reduction::Mean);
        (loss, output)
    }

    /// Layer structure followed by the trainable parameter count.
    pub fn summary(&self) -> String {
        format!(
            "{}\nInput shape: ({}, {})\nTrainable params: {}",
            self,
            self.window_size,
            self.num_features,
            self.num_params()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::{Autodiff, NdArray};
    use burn::tensor::Distribution;

    type TestBackend = NdArray;

    fn small_config() -> AttentionRegressorConfig {
        AttentionRegressorConfig::new(16, 5)
            .with_key_dim(8)
            .with_mlp_units(12)
    }

    #[test]
    fn test_forward_shape() {
        let device = Default::default();
        let model = small_config().init::<TestBackend>(&device);
        let x = Tensor::<TestBackend, 3>::random([3, 16, 5], Distribution::Default, &device);
        assert_eq!(model.forward(x).dims(), [3, 1]);
    }

    #[test]
    fn test_default_shape_matches_reference_input() {
        let device = Default::default();
        let model = AttentionRegressorConfig::new(200, 5).init::<TestBackend>(&device);
        let x = Tensor::<TestBackend, 3>::zeros([1, 200, 5], &device);
        assert_eq!(model.forward(x).dims(), [1, 1]);
    }

    #[test]
    fn test_loss_is_scalar_and_backprops() {
        type AdBackend = Autodiff<NdArray>;
        let device = Default::default();
        let model = small_config().init::<AdBackend>(&device);

        let x = Tensor::<AdBackend, 3>::random([2, 16, 5], Distribution::Default, &device);
        let y = Tensor::<AdBackend, 2>::ones([2, 1], &device);
        let (loss, output) = model.forward_loss(x, y);

        assert_eq!(loss.dims(), [1]);
        assert_eq!(output.dims(), [2, 1]);
        assert!(loss.clone().into_scalar().elem::<f32>() >= 0.0);

        let grads = loss.backward();
        assert!(model.head.output.weight.grad(&grads).is_some());
    }

    #[test]
    fn test_summary_mentions_param_count() {
        let device = Default::default();
        let model = small_config().init::<TestBackend>(&device);
        assert!(model.summary().contains(&model.num_params().to_string()));
    }

    #[test]
    fn test_config_round_trips_through_json() {
        let cfg = small_config();
        let json = serde_json::to_string(&cfg).unwrap();
        let back: AttentionRegressorConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.key_dim, 8);
        assert_eq!(back.window_size, 16);
    }
}
