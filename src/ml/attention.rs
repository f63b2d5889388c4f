// ============================================================
// Layer 5 — Self-Attention Block
// ============================================================
//   out = LayerNorm(x + Dropout(MHA(x, x, x)))
//
// The per-head key dimension is independent of the model width:
// a 5-feature input is projected to num_heads × key_dim for the
// query / key / value heads and projected back to 5 features
// before the residual add. burn's MultiHeadAttention ties the
// head size to d_model / n_heads, so the projections are wired
// here from Linear layers.
//
// Shapes (N = batch, S = sequence, D = d_model, H = heads, K = key_dim):
//   x        [N, S, D]
//   q, k, v  [N, H, S, K]
//   scores   [N, H, S, S]   softmax over the last axis
//   context  [N, S, H·K] → output projection → [N, S, D]

use burn::{
    nn::{
        Dropout, DropoutConfig,
        LayerNorm, LayerNormConfig,
        Linear, LinearConfig,
    },
    prelude::*,
    tensor::activation::softmax,
};

#[derive(Config, Debug)]
pub struct SelfAttentionConfig {
    pub d_model:   usize,
    #[config(default = 4)]
    pub num_heads: usize,
    #[config(default = 200)]
    pub key_dim:   usize,
    #[config(default = 0.1)]
    pub dropout:   f64,
    #[config(default = 1e-3)]
    pub norm_epsilon: f64,
}

impl SelfAttentionConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> SelfAttention<B> {
        let inner = self.num_heads * self.key_dim;
        SelfAttention {
            query:     LinearConfig::new(self.d_model, inner).init(device),
            key:       LinearConfig::new(self.d_model, inner).init(device),
            value:     LinearConfig::new(self.d_model, inner).init(device),
            output:    LinearConfig::new(inner, self.d_model).init(device),
            dropout:   DropoutConfig::new(self.dropout).init(),
            norm:      LayerNormConfig::new(self.d_model)
                .with_epsilon(self.norm_epsilon)
                .init(device),
            num_heads: self.num_heads,
            key_dim:   self.key_dim,
        }
    }
}

#[derive(Module, Debug)]
pub struct SelfAttention<B: Backend> {
    pub query:     Linear<B>,
    pub key:       Linear<B>,
    pub value:     Linear<B>,
    pub output:    Linear<B>,
    pub dropout:   Dropout,
    pub norm:      LayerNorm<B>,
    pub num_heads: usize,
    pub key_dim:   usize,
}

impl<B: Backend> SelfAttention<B> {
    pub fn forward(&self, x: Tensor<B, 3>) -> Tensor<B, 3> {
        let attn_output = self.dropout.forward(self.attend(x.clone()));
        self.norm.forward(x + attn_output)
    }

    /// Scaled dot-product attention of `x` with itself, projected back to d_model.
    fn attend(&self, x: Tensor<B, 3>) -> Tensor<B, 3> {
        let [batch_size, seq_len, _] = x.dims();
        let heads = |t: Tensor<B, 3>| {
            t.reshape([batch_size, seq_len, self.num_heads, self.key_dim])
                .swap_dims(1, 2)
        };

        let q = heads(self.query.forward(x.clone()));
        let k = heads(self.key.forward(x.clone()));
        let v = heads(self.value.forward(x));

        let scores  = q.matmul(k.swap_dims(2, 3)).div_scalar((self.key_dim as f64).sqrt());
        let weights = softmax(scores, 3);

        let context = weights
            .matmul(v)
            .swap_dims(1, 2)
            .reshape([batch_size, seq_len, self.num_heads * self.key_dim]);

        self.output.forward(context)
    }
}
