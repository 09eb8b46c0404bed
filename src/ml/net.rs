// ============================================================
// Layer 5 — Emotion Network Interface
// ============================================================
// The seam between the two architectures and the code that
// trains and evaluates them. Both networks take a batch of
// feature matrices [batch, rows, cols] and return one logit
// per emotion class [batch, 7].
//
// Softmax is not part of forward(): cross-entropy applies it
// internally during training, and predict_proba() applies it
// when probabilities are wanted.

use burn::{
    nn::loss::CrossEntropyLossConfig,
    prelude::*,
    tensor::activation::softmax,
};

pub trait EmotionNet<B: Backend> {
    /// features: [batch, rows, cols] → logits: [batch, 7]
    fn forward(&self, features: Tensor<B, 3>) -> Tensor<B, 2>;

    /// Class probabilities: softmax over the logits, rows sum to 1.
    fn predict_proba(&self, features: Tensor<B, 3>) -> Tensor<B, 2> {
        softmax(self.forward(features), 1)
    }

    /// Mean cross-entropy over the batch, plus the logits.
    fn forward_loss(
        &self,
        features: Tensor<B, 3>,
        targets:  Tensor<B, 1, Int>,
    ) -> (Tensor<B, 1>, Tensor<B, 2>) {
        let logits = self.forward(features);
        let loss = CrossEntropyLossConfig::new()
            .init(&logits.device())
            .forward(logits.clone(), targets);
        (loss, logits)
    }
}

// ─── Layer summaries ──────────────────────────────────────────────────────────

/// One row of a printed model summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerSummary {
    pub name:   String,
    /// Output shape without the batch dimension
    pub shape:  Vec<usize>,
    /// Trainable parameters
    pub params: usize,
}

impl LayerSummary {
    pub fn new(name: impl Into<String>, shape: Vec<usize>, params: usize) -> Self {
        Self { name: name.into(), shape, params }
    }
}

/// Parameters of a dense layer: weights plus bias.
pub fn dense_params(inputs: usize, outputs: usize) -> usize {
    inputs * outputs + outputs
}

/// Output side length of a valid (unpadded) convolution or pooling window.
pub fn window_output(input: usize, kernel: usize, stride: usize) -> usize {
    (input - kernel) / stride + 1
}

pub fn total_params(layers: &[LayerSummary]) -> usize {
    layers.iter().map(|l| l.params).sum()
}

/// Render a table in the spirit of a Keras model summary.
pub fn format_summary(title: &str, layers: &[LayerSummary]) -> String {
    let mut out = String::new();
    out.push_str(&format!("Model: \"{title}\"\n"));
    out.push_str(&format!("{:<28}{:<22}{:>12}\n", "Layer", "Output Shape", "Param #"));
    out.push_str(&format!("{}\n", "=".repeat(62)));
    for layer in layers {
        let dims: Vec<String> = layer.shape.iter().map(|d| d.to_string()).collect();
        let shape = format!("(None, {})", dims.join(", "));
        out.push_str(&format!("{:<28}{:<22}{:>12}\n", layer.name, shape, layer.params));
    }
    out.push_str(&format!("{}\n", "=".repeat(62)));
    out.push_str(&format!("Trainable params: {}\n", total_params(layers)));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_output() {
        assert_eq!(window_output(48, 2, 1), 47);
        assert_eq!(window_output(45, 2, 2), 22);
    }

    #[test]
    fn test_format_summary_totals() {
        let layers = vec![
            LayerSummary::new("dense", vec![4], dense_params(2, 4)),
            LayerSummary::new("output", vec![7], dense_params(4, 7)),
        ];
        let text = format_summary("tiny", &layers);
        assert!(text.contains("(None, 4)"));
        assert!(text.contains("Trainable params: 47"));
    }
}
