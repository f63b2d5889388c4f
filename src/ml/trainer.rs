// ============================================================
// Layer 5 — Training Loop
// ============================================================
// Epoch loop over the WindowGenerator with RMSprop and MSE.
//
//   for each epoch:
//     for each batch index (in order, or shuffled per epoch):
//       forward → MSE loss → backward → RMSprop step
//     log the average loss, write a checkpoint
//
// RMSprop:
//   v = ρ·v + (1 − ρ)·g²
//   θ = θ − lr · g / (√v + ε)
//   ρ = 0.9, ε = 1e-7
//
// Training runs on an Autodiff backend; the CLI uses
// Autodiff<Wgpu>, the tests use Autodiff<NdArray>.
//
// Reference: Burn Book §5, Hinton (2012) RMSprop lecture notes

use anyhow::{bail, Result};
use burn::{
    data::dataloader::batcher::Batcher,
    optim::{GradientsParams, Optimizer, RmsPropConfig},
    prelude::*,
    tensor::backend::AutodiffBackend,
};
use rand::{rngs::StdRng, SeedableRng};

use crate::application::train_use_case::TrainConfig;
use crate::data::{batcher::WindowBatcher, generator::WindowGenerator};
use crate::infra::{
    checkpoint::CheckpointManager,
    metrics::{EpochMetrics, MetricsLogger},
};
use crate::ml::model::AttentionRegressor;

pub type TrainBackend = burn::backend::Autodiff<burn::backend::Wgpu>;

/// What a finished training run reports back to the application layer.
#[derive(Debug, Clone)]
pub struct TrainingReport {
    pub epochs:       Vec<EpochMetrics>,
    pub best_epoch:   usize,
    pub best_loss:    f64,
    pub model_params: usize,
}

impl TrainingReport {
    pub fn final_loss(&self) -> Option<f64> {
        self.epochs.last().map(|m| m.train_loss)
    }
}

pub fn train_loop<B: AutodiffBackend>(
    cfg:          &TrainConfig,
    generator:    &WindowGenerator,
    ckpt_manager: &CheckpointManager,
    metrics:      &MetricsLogger,
    device:       B::Device,
) -> Result<(AttentionRegressor<B>, TrainingReport)> {
    if generator.is_empty() {
        bail!(
            "No training windows: {} training rows is not more than window_size {}",
            cfg.train_rows,
            cfg.window_size
        );
    }

    // ── Build model ───────────────────────────────────────────────────────────
    let model_cfg = cfg.model_config(generator.feature_count());
    let mut model: AttentionRegressor<B> = model_cfg.init(&device);
    let model_params = model.num_params();
    println!("{}", model.summary());

    // ── RMSprop optimiser ─────────────────────────────────────────────────────
    let mut optim = RmsPropConfig::new()
        .with_alpha(0.9)
        .with_epsilon(1e-7)
        .init();

    let batcher = WindowBatcher::<B>::new(device.clone());
    let mut rng = StdRng::seed_from_u64(cfg.seed);

    let mut history   = Vec::with_capacity(cfg.epochs);
    let mut best_loss  = f64::INFINITY;
    let mut best_epoch = 0usize;

    // ── Epoch loop ────────────────────────────────────────────────────────────
    for epoch in 1..=cfg.epochs {
        let mut loss_sum = 0.0f64;
        let mut batches  = 0usize;

        for idx in generator.epoch_order(cfg.shuffle, &mut rng) {
            let Some(items) = generator.batch(idx) else { continue };
            let batch = batcher.batch(items);

            let (loss, _) = model.forward_loss(batch.inputs, batch.targets);
            loss_sum += loss.clone().into_scalar().elem::<f64>();
            batches  += 1;

            let grads = loss.backward();
            let grads = GradientsParams::from_grads(grads, &model);
            model = optim.step(cfg.lr, model, grads);
        }

        let avg_loss = if batches > 0 { loss_sum / batches as f64 } else { f64::NAN };
        let epoch_metrics = EpochMetrics::new(epoch, avg_loss, batches);

        if epoch_metrics.is_improvement(best_loss) {
            best_loss  = avg_loss;
            best_epoch = epoch;
        }

        println!(
            "Epoch {:>3}/{} | batches={} | loss={:.6}",
            epoch, cfg.epochs, batches, avg_loss,
        );

        metrics.log(&epoch_metrics)?;
        ckpt_manager.save_model(&model, &epoch_metrics)?;
        tracing::info!("Checkpoint saved for epoch {}", epoch);

        history.push(epoch_metrics);
    }

    tracing::info!("Training complete! Best loss {:.6} at epoch {}", best_loss, best_epoch);
    let report = TrainingReport { epochs: history, best_epoch, best_loss, model_params };
    Ok((model, report))
}
