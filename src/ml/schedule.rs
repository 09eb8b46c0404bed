// ============================================================
// Layer 5 — Learning-Rate Policies
// ============================================================
// Each training plan carries exactly one adaptive learning-rate
// policy. The trainer consults it twice per epoch:
//
//   before the epoch  → StepDecay may change the rate
//   after validation  → ReduceOnPlateau may change the rate
//
// Epochs are 0-based here; log lines print them 1-based.

use serde::{Deserialize, Serialize};

use crate::infra::metrics::EpochMetrics;

// ─── StepDecay ────────────────────────────────────────────────────────────────
/// Multiply the rate by `factor` once, at the start of epoch `at_epoch`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StepDecay {
    pub at_epoch: usize,
    pub factor:   f64,
}

impl Default for StepDecay {
    fn default() -> Self {
        Self { at_epoch: 10, factor: 0.2 }
    }
}

impl StepDecay {
    pub fn rate(&self, epoch: usize, lr: f64) -> f64 {
        if epoch == self.at_epoch {
            lr * self.factor
        } else {
            lr
        }
    }
}

// ─── ReduceOnPlateau ──────────────────────────────────────────────────────────
/// Which epoch metric the plateau policy watches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Monitor {
    ValLoss,
    ValAccuracy,
}

impl Monitor {
    pub fn name(self) -> &'static str {
        match self {
            Monitor::ValLoss     => "val_loss",
            Monitor::ValAccuracy => "val_accuracy",
        }
    }

    fn read(self, metrics: &EpochMetrics) -> f64 {
        match self {
            Monitor::ValLoss     => metrics.val_loss,
            Monitor::ValAccuracy => metrics.val_acc,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Min,
    Max,
    /// Max for accuracy-like monitors, min otherwise
    Auto,
}

/// Cut the rate by `factor` when the monitored metric has not
/// improved by more than `min_delta` for `patience` epochs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReduceOnPlateau {
    pub monitor:   Monitor,
    pub factor:    f64,
    pub patience:  usize,
    pub mode:      Mode,
    pub min_delta: f64,
    pub cooldown:  usize,
    pub min_lr:    f64,

    #[serde(skip)]
    state: PlateauState,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
struct PlateauState {
    best:             Option<f64>,
    wait:             usize,
    cooldown_counter: usize,
}

impl Default for ReduceOnPlateau {
    fn default() -> Self {
        Self {
            monitor:   Monitor::ValLoss,
            factor:    0.2,
            patience:  5,
            mode:      Mode::Auto,
            min_delta: 1e-4,
            cooldown:  0,
            min_lr:    0.0,
            state:     PlateauState::default(),
        }
    }
}

impl ReduceOnPlateau {
    fn maximizing(&self) -> bool {
        match self.mode {
            Mode::Min  => false,
            Mode::Max  => true,
            Mode::Auto => self.monitor.name().contains("acc"),
        }
    }

    fn improved(&self, current: f64, best: f64) -> bool {
        if self.maximizing() {
            current > best + self.min_delta
        } else {
            current < best - self.min_delta
        }
    }

    pub fn best(&self) -> Option<f64> {
        self.state.best
    }

    /// Feed one epoch's metrics; returns the rate for the next epoch.
    pub fn step(&mut self, metrics: &EpochMetrics, lr: f64) -> f64 {
        let current = self.monitor.read(metrics);
        if !current.is_finite() {
            tracing::warn!(
                "{} is not finite at epoch {}; skipping plateau update",
                self.monitor.name(),
                metrics.epoch
            );
            return lr;
        }

        let in_cooldown = self.state.cooldown_counter > 0;
        if in_cooldown {
            self.state.cooldown_counter -= 1;
            self.state.wait = 0;
        }

        let improved = match self.state.best {
            None       => true,
            Some(best) => self.improved(current, best),
        };

        if improved {
            self.state.best = Some(current);
            self.state.wait = 0;
            return lr;
        }

        if in_cooldown {
            return lr;
        }

        self.state.wait += 1;
        if self.state.wait >= self.patience && lr > self.min_lr {
            let new_lr = (lr * self.factor).max(self.min_lr);
            tracing::info!(
                "Epoch {}: {} plateaued for {} epochs, reducing learning rate to {:e}",
                metrics.epoch,
                self.monitor.name(),
                self.state.wait,
                new_lr
            );
            self.state.cooldown_counter = self.cooldown;
            self.state.wait = 0;
            return new_lr;
        }

        lr
    }
}

// ─── LrPolicy ─────────────────────────────────────────────────────────────────
/// The single learning-rate policy attached to a training plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LrPolicy {
    StepDecay(StepDecay),
    ReduceOnPlateau(ReduceOnPlateau),
}

impl LrPolicy {
    /// Rate to train `epoch` with.
    pub fn on_epoch_begin(&mut self, epoch: usize, lr: f64) -> f64 {
        match self {
            LrPolicy::StepDecay(s)       => s.rate(epoch, lr),
            LrPolicy::ReduceOnPlateau(_) => lr,
        }
    }

    /// Rate after seeing the epoch's validation metrics.
    pub fn on_epoch_end(&mut self, metrics: &EpochMetrics, lr: f64) -> f64 {
        match self {
            LrPolicy::StepDecay(_)       => lr,
            LrPolicy::ReduceOnPlateau(p) => p.step(metrics, lr),
        }
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn metrics(epoch: usize, val_loss: f64) -> EpochMetrics {
        EpochMetrics::new(epoch, 1e-3, 1.0, val_loss, 0.5)
    }

    #[test]
    fn test_step_decay_at_epoch_ten() {
        let step = StepDecay::default();
        assert_relative_eq!(step.rate(10, 0.0001), 0.00002);
        assert_eq!(step.rate(9, 0.0001), 0.0001);
        assert_eq!(step.rate(11, 0.0001), 0.0001);
        assert_eq!(step.rate(0, 0.0001), 0.0001);
    }

    #[test]
    fn test_step_decay_policy_only_acts_before_epoch() {
        let mut policy = LrPolicy::StepDecay(StepDecay::default());
        assert_eq!(policy.on_epoch_end(&metrics(10, 9.0), 0.1), 0.1);
        assert_relative_eq!(policy.on_epoch_begin(10, 0.1), 0.02);
    }

    #[test]
    fn test_plateau_waits_for_patience() {
        let mut plateau = ReduceOnPlateau::default();
        let mut lr = 1e-3;

        lr = plateau.step(&metrics(0, 1.0), lr);
        assert_eq!(lr, 1e-3);

        // Five epochs without improvement: unchanged for four, cut on the fifth
        for epoch in 1..5 {
            lr = plateau.step(&metrics(epoch, 1.0), lr);
            assert_eq!(lr, 1e-3, "epoch {epoch}");
        }
        lr = plateau.step(&metrics(5, 1.0), lr);
        assert_relative_eq!(lr, 2e-4);

        // Counter restarts after a reduction
        for epoch in 6..10 {
            lr = plateau.step(&metrics(epoch, 1.0), lr);
        }
        assert_relative_eq!(lr, 2e-4);
        lr = plateau.step(&metrics(10, 1.0), lr);
        assert_relative_eq!(lr, 4e-5);
    }

    #[test]
    fn test_plateau_improvement_resets_wait() {
        let mut plateau = ReduceOnPlateau::default();
        let mut lr = 1e-3;
        let losses = [1.0, 1.0, 1.0, 1.0, 1.0, 0.5, 0.5, 0.5, 0.5, 0.5];
        for (epoch, loss) in losses.into_iter().enumerate() {
            lr = plateau.step(&metrics(epoch, loss), lr);
        }
        assert_eq!(lr, 1e-3);
        assert_eq!(plateau.best(), Some(0.5));
    }

    #[test]
    fn test_plateau_ignores_tiny_improvements() {
        let mut plateau = ReduceOnPlateau::default();
        let mut lr = 1e-3;
        lr = plateau.step(&metrics(0, 1.0), lr);
        for epoch in 1..=5 {
            // below min_delta, not an improvement
            lr = plateau.step(&metrics(epoch, 1.0 - 0.00001 * epoch as f64), lr);
        }
        assert_relative_eq!(lr, 2e-4);
    }

    #[test]
    fn test_plateau_skips_non_finite() {
        let mut plateau = ReduceOnPlateau::default();
        for epoch in 0..10 {
            assert_eq!(plateau.step(&metrics(epoch, f64::NAN), 1e-3), 1e-3);
        }
        assert_eq!(plateau.best(), None);
    }

    #[test]
    fn test_auto_mode_maximizes_accuracy() {
        let mut plateau = ReduceOnPlateau {
            monitor: Monitor::ValAccuracy,
            patience: 1,
            ..ReduceOnPlateau::default()
        };
        let mut m = metrics(0, 1.0);
        m.val_acc = 0.5;
        assert_eq!(plateau.step(&m, 1.0), 1.0);
        m.val_acc = 0.6;
        assert_eq!(plateau.step(&m, 1.0), 1.0);
        m.val_acc = 0.4;
        assert_relative_eq!(plateau.step(&m, 1.0), 0.2);
    }
}
