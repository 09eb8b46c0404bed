// ============================================================
// Layer 5 — ML / Model Layer (Burn)
// ============================================================
// All Burn model and training code lives here.
//
//   net.rs          — EmotionNet trait shared by both networks,
//                     plus layer-summary helpers
//   pixel_net.rs    — NN1: conv stack over 48×48 pixels
//   landmark_net.rs — NN2: per-group encoders over 68 landmarks
//   schedule.rs     — step-decay and reduce-on-plateau policies
//   plan.rs         — epochs / batch size / policy per variant
//   trainer.rs      — train + validation loop with Adam
//   evaluator.rs    — loss, accuracy and confusion matrix
//
// Reference: Burn Book §3 (Building Blocks), §5 (Training)

/// The network interface both architectures implement
pub mod net;

/// Convolutional pixel classifier (NN1)
pub mod pixel_net;

/// Landmark feature-group classifier (NN2)
pub mod landmark_net;

/// Adaptive learning-rate policies
pub mod schedule;

/// Trainer configuration per variant
pub mod plan;

/// Full training loop with validation and checkpointing
pub mod trainer;

/// Split evaluation and reports
pub mod evaluator;

use crate::domain::variant::Variant;
use crate::ml::net::{format_summary, LayerSummary};

/// Layer table of a variant's network, as printed by `summary`.
pub fn layer_summary(variant: Variant) -> Vec<LayerSummary> {
    match variant {
        Variant::Pixel    => pixel_net::PixelNetConfig::new().layer_summary(),
        Variant::Landmark => landmark_net::LandmarkNetConfig::new().layer_summary(),
    }
}

pub fn render_summary(variant: Variant) -> String {
    format_summary(variant.model_name(), &layer_summary(variant))
}
