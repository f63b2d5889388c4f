// ============================================================
// Layer 5 — Regression Head
// ============================================================
//   [N, S, D] ─ global average pool over S ─▶ [N, D]
//             ─ Mlp(units) ─ Mlp(units) ─▶ [N, units]
//             ─ Linear(1) + ReLU ─▶ [N, 1]
//
// The final ReLU keeps predictions non-negative.

use burn::{
    nn::{
        pool::{AdaptiveAvgPool1d, AdaptiveAvgPool1dConfig},
        Dropout, DropoutConfig,
        Linear, LinearConfig,
    },
    prelude::*,
    tensor::activation::relu,
};

// ─── Mlp ──────────────────────────────────────────────────────────────────────
/// Dense layer with ReLU followed by dropout.
#[derive(Config, Debug)]
pub struct MlpConfig {
    pub d_input: usize,
    #[config(default = 128)]
    pub units:   usize,
    #[config(default = 0.1)]
    pub dropout: f64,
}

impl MlpConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> Mlp<B> {
        Mlp {
            linear:  LinearConfig::new(self.d_input, self.units).init(device),
            dropout: DropoutConfig::new(self.dropout).init(),
        }
    }
}

#[derive(Module, Debug)]
pub struct Mlp<B: Backend> {
    pub linear:  Linear<B>,
    pub dropout: Dropout,
}

impl<B: Backend> Mlp<B> {
    pub fn forward(&self, x: Tensor<B, 2>) -> Tensor<B, 2> {
        self.dropout.forward(relu(self.linear.forward(x)))
    }
}

// ─── RegressionHead ───────────────────────────────────────────────────────────
#[derive(Config, Debug)]
pub struct RegressionHeadConfig {
    pub d_model: usize,
    #[config(default = 128)]
    pub units:   usize,
    #[config(default = 0.1)]
    pub dropout: f64,
}

impl RegressionHeadConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> RegressionHead<B> {
        RegressionHead {
            pool:   AdaptiveAvgPool1dConfig::new(1).init(),
            mlp1:   MlpConfig::new(self.d_model)
                .with_units(self.units)
                .with_dropout(self.dropout)
                .init(device),
            mlp2:   MlpConfig::new(self.units)
                .with_units(self.units)
                .with_dropout(self.dropout)
                .init(device),
            output: LinearConfig::new(self.units, 1).init(device),
        }
    }
}

#[derive(Module, Debug)]
pub struct RegressionHead<B: Backend> {
    pub pool:   AdaptiveAvgPool1d,
    pub mlp1:   Mlp<B>,
    pub mlp2:   Mlp<B>,
    pub output: Linear<B>,
}

impl<B: Backend> RegressionHead<B> {
    /// x: [batch, seq_len, d_model] → [batch, 1]
    pub fn forward(&self, x: Tensor<B, 3>) -> Tensor<B, 2> {
        let [batch_size, _, d_model] = x.dims();

        // AdaptiveAvgPool1d averages the last axis, so pool over time
        // in channel-first layout: [N, D, S] → [N, D, 1]
        let pooled = self.pool
            .forward(x.swap_dims(1, 2))
            .reshape([batch_size, d_model]);

        let x = self.mlp1.forward(pooled);
        let x = self.mlp2.forward(x);
        relu(self.output.forward(x))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;
    use burn::tensor::Distribution;

    type TestBackend = NdArray;

    #[test]
    fn test_head_output_shape_and_sign() {
        let device = Default::default();
        let head = RegressionHeadConfig::new(5)
            .with_units(16)
            .init::<TestBackend>(&device);

        let x = Tensor::<TestBackend, 3>::random([4, 10, 5], Distribution::Normal(0.0, 5.0), &device);
        let out = head.forward(x);
        assert_eq!(out.dims(), [4, 1]);

        let values: Vec<f32> = out.into_data().to_vec().unwrap();
        assert!(values.iter().all(|v| *v >= 0.0));
    }

    #[test]
    fn test_pool_is_time_average() {
        let device = Default::default();
        let head = RegressionHeadConfig::new(2).init::<TestBackend>(&device);

        // Two time steps: [1, 2] and [3, 6] → mean [2, 4]
        let x = Tensor::<TestBackend, 1>::from_floats([1.0, 2.0, 3.0, 6.0], &device)
            .reshape([1, 2, 2]);
        let pooled: Vec<f32> = head.pool
            .forward(x.swap_dims(1, 2))
            .into_data()
            .to_vec()
            .unwrap();
        assert_eq!(pooled, vec![2.0, 4.0]);
    }

    #[test]
    fn test_mlp_output_units() {
        let device = Default::default();
        let mlp = MlpConfig::new(5).with_units(7).init::<TestBackend>(&device);
        let x = Tensor::<TestBackend, 2>::zeros([3, 5], &device);
        assert_eq!(mlp.forward(x).dims(), [3, 7]);
    }
}
