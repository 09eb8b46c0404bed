// ============================================================
// Layer 2 — EvaluateUseCase
// ============================================================
// Scores a trained network on its held-out test split:
//
//   Step 1: Read train_config.json from the artifact directory
//   Step 2: Re-load the dataset and re-split it with the saved seed
//   Step 3: Build the variant's network and load the latest weights
//   Step 4: Evaluate on the test split (no autodiff, no dropout)
//
// The same file and seed always give the same test split, so
// evaluation never touches rows the network trained on.

use anyhow::{Context, Result};
use burn::{
    backend::{ndarray::NdArrayDevice, wgpu::WgpuDevice, NdArray, Wgpu},
    prelude::*,
};
use std::path::PathBuf;

use crate::application::train_use_case::{BackendKind, TrainConfig};
use crate::data::{dataset::EmotionDataset, source_for};
use crate::domain::variant::Variant;
use crate::infra::checkpoint::CheckpointManager;
use crate::ml::{
    evaluator::{evaluate_dataset, EvaluationReport},
    landmark_net::LandmarkNetConfig,
    net::EmotionNet,
    pixel_net::PixelNetConfig,
};

pub struct EvaluateUseCase {
    checkpoints: CheckpointManager,
    config:      TrainConfig,
    backend:     BackendKind,
}

impl EvaluateUseCase {
    /// Open a trained artifact directory. `backend` overrides the
    /// backend the run was trained with.
    pub fn new(artifact_dir: impl Into<PathBuf>, backend: Option<BackendKind>) -> Result<Self> {
        let checkpoints = CheckpointManager::open(artifact_dir);

        // ── Step 1: Saved run configuration ───────────────────────────────────
        let config  = checkpoints.load_config()?;
        let backend = backend.unwrap_or(config.backend);

        Ok(Self { checkpoints, config, backend })
    }

    pub fn variant(&self) -> Variant {
        self.config.variant
    }

    pub fn execute(&self) -> Result<EvaluationReport> {
        match self.backend {
            BackendKind::Wgpu    => self.run::<Wgpu>(WgpuDevice::default()),
            BackendKind::NdArray => self.run::<NdArray>(NdArrayDevice::Cpu),
        }
    }

    fn run<B: Backend>(&self, device: B::Device) -> Result<EvaluationReport> {
        let cfg = &self.config;

        // ── Step 2: Same file, same seed, same test split ─────────────────────
        let splits = source_for(cfg.variant)
            .load_splits(&cfg.data_path, cfg.seed)
            .with_context(|| format!("Cannot load dataset '{}'", cfg.data_path.display()))?;
        let testing = EmotionDataset::new(splits.testing);
        tracing::info!("Evaluating {} on {} test samples", cfg.variant.model_name(), testing.sample_count());

        // ── Steps 3 + 4 ───────────────────────────────────────────────────────
        match cfg.variant {
            Variant::Pixel => {
                let model = PixelNetConfig::new().init::<B>(&device);
                self.score::<B, _>(model, testing, &device)
            }
            Variant::Landmark => {
                let model = LandmarkNetConfig::new().init::<B>(&device);
                self.score::<B, _>(model, testing, &device)
            }
        }
    }

    fn score<B: Backend, M: Module<B> + EmotionNet<B>>(
        &self,
        model:   M,
        testing: EmotionDataset,
        device:  &B::Device,
    ) -> Result<EvaluationReport> {
        let model = self.checkpoints.load_model::<B, M>(model, device)?;
        evaluate_dataset::<B, M>(&model, testing, self.config.batch_size, device)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_artifacts_fail_to_open() {
        let dir = tempfile::tempdir().unwrap();
        assert!(EvaluateUseCase::new(dir.path(), None).is_err());
    }

    #[test]
    fn test_backend_override() {
        let dir  = tempfile::tempdir().unwrap();
        let ckpt = CheckpointManager::new(dir.path()).unwrap();
        let cfg  = TrainConfig::for_variant(Variant::Landmark, "landmarks.csv");
        ckpt.save_config(&cfg).unwrap();

        let saved = EvaluateUseCase::new(dir.path(), None).unwrap();
        assert_eq!(saved.backend, BackendKind::Wgpu);
        assert_eq!(saved.variant(), Variant::Landmark);

        let cpu = EvaluateUseCase::new(dir.path(), Some(BackendKind::NdArray)).unwrap();
        assert_eq!(cpu.backend, BackendKind::NdArray);
    }

    #[test]
    fn test_missing_checkpoint_is_reported() {
        use std::io::Write;
        use crate::domain::landmarks::FeatureGroup;

        let mut data = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        let header: Vec<&str> = std::iter::once("emotion")
            .chain(FeatureGroup::LOADER_ORDER.iter().map(|g| g.column()))
            .collect();
        writeln!(data, "{}", header.join(",")).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let mut cfg = TrainConfig::for_variant(Variant::Landmark, data.path());
        cfg.backend = BackendKind::NdArray;
        CheckpointManager::new(dir.path()).unwrap().save_config(&cfg).unwrap();

        let err = EvaluateUseCase::new(dir.path(), None).unwrap().execute().unwrap_err();
        assert!(format!("{err:#}").contains("latest_epoch.json"));
    }
}
