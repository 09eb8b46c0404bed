// ============================================================
// Layer 2 — TrainUseCase
// ============================================================
// Orchestrates the full training pipeline in order:
//
//   Step 1: Load + shuffle + split the dataset   (Layer 4 - data)
//   Step 2: Build Burn datasets                  (Layer 4 - data)
//   Step 3: Prepare the training plan            (Layer 5 - ml)
//   Step 4: Save config, open metrics log        (Layer 6 - infra)
//   Step 5: Build the network and train it       (Layer 5 - ml)
//   Step 6: Evaluate on the held-out test split  (Layer 5 - ml)

use anyhow::{Context, Result};
use burn::{
    backend::{ndarray::NdArrayDevice, wgpu::WgpuDevice, Autodiff, NdArray, Wgpu},
    module::AutodiffModule,
    tensor::backend::AutodiffBackend,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::data::{dataset::EmotionDataset, source_for};
use crate::domain::{sample::EmotionSample, split::DatasetSplits, variant::Variant};
use crate::infra::{checkpoint::CheckpointManager, metrics::MetricsLogger};
use crate::ml::{
    evaluator::{evaluate_dataset, EvaluationReport},
    landmark_net::LandmarkNetConfig,
    net::EmotionNet,
    pixel_net::PixelNetConfig,
    plan::TrainingPlan,
    trainer::{fit, EpochSinks},
};

// ─── Backend selection ────────────────────────────────────────────────────────
/// Which Burn backend runs the tensors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// GPU through WebGPU
    #[default]
    Wgpu,
    /// CPU through ndarray
    NdArray,
}

// ─── Training Configuration ──────────────────────────────────────────────────
// All settings for a training run. Saved to the artifact directory
// so `evaluate` can rebuild the same network and test split.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainConfig {
    pub variant:      Variant,
    pub data_path:    PathBuf,
    pub artifact_dir: PathBuf,
    pub epochs:       usize,
    pub batch_size:   usize,
    pub lr:           f64,
    /// Seeds both the dataset shuffle and the mini-batch shuffle
    pub seed:         u64,
    pub num_workers:  usize,
    pub backend:      BackendKind,
}

impl TrainConfig {
    /// Defaults for a variant: 16 epochs, batch size 32, seed 0,
    /// and the variant's initial learning rate.
    pub fn for_variant(variant: Variant, data_path: impl Into<PathBuf>) -> Self {
        Self {
            variant,
            data_path:    data_path.into(),
            artifact_dir: PathBuf::from("artifacts").join(variant.model_name()),
            epochs:       16,
            batch_size:   32,
            lr:           variant.default_learning_rate(),
            seed:         0,
            num_workers:  1,
            backend:      BackendKind::default(),
        }
    }

    pub fn plan(&self) -> TrainingPlan {
        TrainingPlan::prepare(self.variant, self.epochs, self.batch_size, self.lr)
            .with_shuffle_seed(self.seed)
            .with_num_workers(self.num_workers)
    }
}

// ─── TrainUseCase ─────────────────────────────────────────────────────────────
pub struct TrainUseCase {
    config: TrainConfig,
}

impl TrainUseCase {
    pub fn new(config: TrainConfig) -> Self {
        Self { config }
    }

    /// Run the pipeline and return the test-split report.
    pub fn execute(&self) -> Result<EvaluationReport> {
        match self.config.backend {
            BackendKind::Wgpu    => self.run::<Autodiff<Wgpu>>(WgpuDevice::default()),
            BackendKind::NdArray => self.run::<Autodiff<NdArray>>(NdArrayDevice::Cpu),
        }
    }

    fn run<B: AutodiffBackend>(&self, device: B::Device) -> Result<EvaluationReport> {
        let cfg = &self.config;
        tracing::info!("Training {} ({}) on {:?}", cfg.variant.model_name(), cfg.variant, device);

        // ── Step 1: Load, shuffle and split ───────────────────────────────────
        let splits = source_for(cfg.variant)
            .load_splits(&cfg.data_path, cfg.seed)
            .with_context(|| format!("Cannot load dataset '{}'", cfg.data_path.display()))?;

        // ── Step 3: Training plan ─────────────────────────────────────────────
        let plan = cfg.plan();
        tracing::info!(
            "Plan: {} epochs, batch size {}, lr {:e}, policy {:?}",
            plan.epochs, plan.batch_size, plan.learning_rate, plan.policy
        );

        // ── Step 4: Artifacts ─────────────────────────────────────────────────
        let checkpoints = CheckpointManager::new(&cfg.artifact_dir)?;
        checkpoints.save_config(cfg)?;
        let metrics = MetricsLogger::create(&cfg.artifact_dir)?;

        // ── Steps 2, 5, 6: Build the network, train, test ─────────────────────
        let sinks = EpochSinks { checkpoints: &checkpoints, metrics: &metrics };
        match cfg.variant {
            Variant::Pixel => {
                let model = PixelNetConfig::new().init::<B>(&device);
                train_and_test::<B, _>(model, &plan, splits, sinks, &device)
            }
            Variant::Landmark => {
                let model = LandmarkNetConfig::new().init::<B>(&device);
                train_and_test::<B, _>(model, &plan, splits, sinks, &device)
            }
        }
    }
}

fn train_and_test<B, M>(
    model:  M,
    plan:   &TrainingPlan,
    splits: DatasetSplits<EmotionSample>,
    sinks:  EpochSinks<'_>,
    device: &B::Device,
) -> Result<EvaluationReport>
where
    B: AutodiffBackend,
    M: AutodiffModule<B> + EmotionNet<B>,
    M::InnerModule: EmotionNet<B::InnerBackend>,
{
    // ── Step 2: Burn datasets ─────────────────────────────────────────────────
    let DatasetSplits { training, validation, testing } = splits;
    let train_dataset = EmotionDataset::new(training);
    let val_dataset   = EmotionDataset::new(validation);
    let test_dataset  = EmotionDataset::new(testing);

    // ── Step 5: Train ─────────────────────────────────────────────────────────
    let model = fit::<B, M>(model, plan, train_dataset, val_dataset, sinks, device)?;

    // ── Step 6: Held-out test split ───────────────────────────────────────────
    let report = evaluate_dataset::<B::InnerBackend, _>(
        &model.valid(),
        test_dataset,
        plan.batch_size,
        device,
    )?;
    tracing::info!(
        "Test split: {} samples, loss {:.4}, accuracy {:.1}%",
        report.samples,
        report.loss,
        report.accuracy * 100.0
    );
    Ok(report)
}
