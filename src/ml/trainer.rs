// ============================================================
// Layer 5 — Training Loop
// ============================================================
// Train + validation loop over Burn's DataLoader with Adam,
// generic over both emotion networks.
//
// Per epoch:
//   1. the plan's policy picks the learning rate (step decay)
//   2. forward / backward / Adam step over shuffled mini-batches
//   3. model.valid() is evaluated on the validation split
//   4. metrics row + checkpoint are written
//   5. the policy sees the metrics (reduce-on-plateau)
//
// model.valid() returns the model on the inner (non-autodiff)
// backend, so validation batches are built for that backend too.

use anyhow::Result;
use burn::{
    data::dataloader::DataLoaderBuilder,
    module::AutodiffModule,
    optim::{AdamConfig, GradientsParams, Optimizer},
    prelude::*,
    tensor::backend::AutodiffBackend,
};

use crate::data::{batcher::EmotionBatcher, dataset::EmotionDataset};
use crate::infra::{checkpoint::CheckpointManager, metrics::{EpochMetrics, MetricsLogger}};
use crate::ml::evaluator::evaluate;
use crate::ml::net::EmotionNet;
use crate::ml::plan::TrainingPlan;

/// Adam epsilon.
const ADAM_EPSILON: f32 = 1e-7;

/// Where each epoch's results go.
pub struct EpochSinks<'a> {
    pub checkpoints: &'a CheckpointManager,
    pub metrics:     &'a MetricsLogger,
}

pub fn fit<B, M>(
    mut model:     M,
    plan:          &TrainingPlan,
    train_dataset: EmotionDataset,
    val_dataset:   EmotionDataset,
    sinks:         EpochSinks<'_>,
    device:        &B::Device,
) -> Result<M>
where
    B: AutodiffBackend,
    M: AutodiffModule<B> + EmotionNet<B>,
    M::InnerModule: EmotionNet<B::InnerBackend>,
{
    let mut optim = AdamConfig::new()
        .with_epsilon(ADAM_EPSILON)
        .init::<B, M>();

    // ── Training data loader (AutodiffBackend) ────────────────────────────────
    let train_loader = DataLoaderBuilder::new(EmotionBatcher::<B>::new(device.clone()))
        .batch_size(plan.batch_size)
        .shuffle(plan.shuffle_seed)
        .num_workers(plan.num_workers)
        .build(train_dataset);

    // ── Validation data loader (InnerBackend — no autodiff overhead) ──────────
    let val_loader = DataLoaderBuilder::new(EmotionBatcher::<B::InnerBackend>::new(device.clone()))
        .batch_size(plan.batch_size)
        .build(val_dataset);

    let mut policy = plan.policy.clone();
    let mut lr     = plan.learning_rate;

    for epoch in 0..plan.epochs {
        lr = policy.on_epoch_begin(epoch, lr);

        // ── Training phase ────────────────────────────────────────────────────
        let mut loss_sum = 0.0f64;
        let mut seen     = 0usize;

        for batch in train_loader.iter() {
            let batch_size = batch.targets.dims()[0];
            let (loss, _)  = model.forward_loss(batch.features, batch.targets);

            loss_sum += loss.clone().into_scalar().elem::<f64>() * batch_size as f64;
            seen     += batch_size;

            let grads = loss.backward();
            let grads = GradientsParams::from_grads(grads, &model);
            model = optim.step(lr, model, grads);
        }

        let train_loss = if seen > 0 { loss_sum / seen as f64 } else { f64::NAN };

        // ── Validation phase ──────────────────────────────────────────────────
        let report = evaluate(&model.valid(), &*val_loader)?;

        let metrics = EpochMetrics::new(epoch + 1, lr, train_loss, report.loss, report.accuracy);
        println!(
            "Epoch {:>3}/{} | lr={:.2e} | train_loss={:.4} | val_loss={:.4} | val_acc={:.1}%",
            metrics.epoch, plan.epochs, lr, train_loss, report.loss, report.accuracy * 100.0,
        );

        sinks.metrics.log(&metrics)?;
        sinks.checkpoints.save_model::<B, M>(&model, epoch + 1)?;

        lr = policy.on_epoch_end(&metrics, lr);
    }

    tracing::info!("Training complete! Metrics in '{}'", sinks.metrics.csv_path().display());
    Ok(model)
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::emotion::Emotion;
    use crate::domain::sample::EmotionSample;
    use crate::domain::variant::Variant;
    use crate::ml::landmark_net::{LandmarkNet, LandmarkNetConfig};
    use crate::ml::schedule::{LrPolicy, ReduceOnPlateau, StepDecay};

    type TestBackend = burn::backend::Autodiff<burn::backend::NdArray>;

    fn samples(n: usize) -> Vec<EmotionSample> {
        (0..n)
            .map(|i| {
                let label = Emotion::ALL[i % 2];
                EmotionSample::new(vec![(i % 2) as f32 * 10.0; 136], [68, 2], label)
            })
            .collect()
    }

    #[test]
    fn test_fit_writes_one_checkpoint_and_row_per_epoch() {
        let dir     = tempfile::tempdir().unwrap();
        let ckpt    = CheckpointManager::new(dir.path()).unwrap();
        let metrics = MetricsLogger::create(dir.path()).unwrap();
        let device  = Default::default();

        let model: LandmarkNet<TestBackend> = LandmarkNetConfig::new().init(&device);
        let plan = TrainingPlan::prepare(Variant::Landmark, 2, 4, 1e-3);

        fit::<TestBackend, _>(
            model,
            &plan,
            EmotionDataset::new(samples(12)),
            EmotionDataset::new(samples(4)),
            EpochSinks { checkpoints: &ckpt, metrics: &metrics },
            &device,
        )
        .unwrap();

        assert_eq!(ckpt.latest_epoch().unwrap(), 2);
        let log = std::fs::read_to_string(metrics.csv_path()).unwrap();
        assert_eq!(log.lines().count(), 3);
    }

    /// Train for `plan.epochs` and return the lr column of metrics.csv.
    fn logged_rates(plan: &TrainingPlan) -> Vec<f64> {
        let dir     = tempfile::tempdir().unwrap();
        let ckpt    = CheckpointManager::new(dir.path()).unwrap();
        let metrics = MetricsLogger::create(dir.path()).unwrap();
        let device  = Default::default();

        let model: LandmarkNet<TestBackend> = LandmarkNetConfig::new().init(&device);
        fit::<TestBackend, _>(
            model,
            plan,
            EmotionDataset::new(samples(8)),
            EmotionDataset::new(samples(4)),
            EpochSinks { checkpoints: &ckpt, metrics: &metrics },
            &device,
        )
        .unwrap();

        csv::Reader::from_path(metrics.csv_path())
            .unwrap()
            .deserialize::<EpochMetrics>()
            .map(|row| row.unwrap().lr)
            .collect()
    }

    #[test]
    fn test_step_decay_applies_before_the_epoch() {
        let mut plan = TrainingPlan::prepare(Variant::Pixel, 3, 4, 1e-3);
        plan.policy = LrPolicy::StepDecay(StepDecay { at_epoch: 1, factor: 0.2 });

        let rates = logged_rates(&plan);
        assert_eq!(rates.len(), 3);
        approx::assert_relative_eq!(rates[0], 1e-3);
        approx::assert_relative_eq!(rates[1], 2e-4);
        approx::assert_relative_eq!(rates[2], 2e-4);
    }

    #[test]
    fn test_plateau_reduces_after_validation() {
        // A min_delta no loss can beat: every epoch after the first plateaus.
        let mut plateau = ReduceOnPlateau::default();
        plateau.patience  = 1;
        plateau.min_delta = 1e9;

        let mut plan = TrainingPlan::prepare(Variant::Landmark, 3, 4, 1e-3);
        plan.policy = LrPolicy::ReduceOnPlateau(plateau);

        let rates = logged_rates(&plan);
        assert_eq!(rates.len(), 3);
        approx::assert_relative_eq!(rates[0], 1e-3);
        approx::assert_relative_eq!(rates[1], 1e-3);
        approx::assert_relative_eq!(rates[2], 2e-4);
    }

    #[test]
    fn test_fit_tolerates_empty_validation() {
        let dir     = tempfile::tempdir().unwrap();
        let ckpt    = CheckpointManager::new(dir.path()).unwrap();
        let metrics = MetricsLogger::create(dir.path()).unwrap();
        let device  = Default::default();

        let model: LandmarkNet<TestBackend> = LandmarkNetConfig::new().init(&device);
        let plan = TrainingPlan::prepare(Variant::Landmark, 1, 4, 1e-3);

        let result = fit::<TestBackend, _>(
            model,
            &plan,
            EmotionDataset::new(samples(3)),
            EmotionDataset::new(Vec::new()),
            EpochSinks { checkpoints: &ckpt, metrics: &metrics },
            &device,
        );
        assert!(result.is_ok());
    }
}
