// ============================================================
// Layer 5 — Training Plan (trainer configurator)
// ============================================================
// Fixes epoch count and batch size and attaches exactly one
// learning-rate policy, chosen by network variant:
//
//   Pixel    → StepDecay        (×0.2 at epoch 10)
//   Landmark → ReduceOnPlateau  (val_loss, ×0.2, patience 5, auto)
//
// The plan is pure configuration; ml::trainer executes it.

use serde::{Deserialize, Serialize};

use crate::domain::variant::Variant;
use crate::ml::schedule::{LrPolicy, ReduceOnPlateau, StepDecay};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingPlan {
    pub epochs:        usize,
    pub batch_size:    usize,
    /// Initial Adam learning rate
    pub learning_rate: f64,
    pub policy:        LrPolicy,
    /// Seed for the per-epoch mini-batch shuffle
    pub shuffle_seed:  u64,
    pub num_workers:   usize,
}

impl TrainingPlan {
    pub fn prepare(variant: Variant, epochs: usize, batch_size: usize, learning_rate: f64) -> Self {
        let policy = match variant {
            Variant::Pixel    => LrPolicy::StepDecay(StepDecay::default()),
            Variant::Landmark => LrPolicy::ReduceOnPlateau(ReduceOnPlateau::default()),
        };

        Self {
            epochs,
            batch_size: batch_size.max(1),
            learning_rate,
            policy,
            shuffle_seed: 0,
            num_workers:  1,
        }
    }

    pub fn with_shuffle_seed(mut self, seed: u64) -> Self {
        self.shuffle_seed = seed;
        self
    }

    pub fn with_num_workers(mut self, workers: usize) -> Self {
        self.num_workers = workers.max(1);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ml::schedule::{Mode, Monitor};

    #[test]
    fn test_pixel_plan_uses_step_decay() {
        let plan = TrainingPlan::prepare(Variant::Pixel, 16, 32, 1e-4);
        assert_eq!(plan.epochs, 16);
        assert_eq!(plan.batch_size, 32);
        assert_eq!(plan.policy, LrPolicy::StepDecay(StepDecay { at_epoch: 10, factor: 0.2 }));
    }

    #[test]
    fn test_landmark_plan_uses_plateau() {
        let plan = TrainingPlan::prepare(Variant::Landmark, 16, 32, 1e-3);
        let LrPolicy::ReduceOnPlateau(p) = plan.policy else {
            panic!("expected a plateau policy");
        };
        assert_eq!(p.monitor, Monitor::ValLoss);
        assert_eq!(p.factor, 0.2);
        assert_eq!(p.patience, 5);
        assert_eq!(p.mode, Mode::Auto);
    }

    #[test]
    fn test_workers_never_zero() {
        let plan = TrainingPlan::prepare(Variant::Pixel, 1, 1, 1e-4).with_num_workers(0);
        assert_eq!(plan.num_workers, 1);
    }
}
