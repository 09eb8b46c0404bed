use burn::{
    nn::{
        BatchNorm, BatchNormConfig,
        Dropout, DropoutConfig,
        Linear, LinearConfig,
    },
    prelude::*,
    tensor::activation::sigmoid,
};

use crate::domain::emotion::NUM_CLASSES;
use crate::domain::landmarks::{FeatureGroup, COORDS_PER_LANDMARK, NUM_LANDMARKS};
use crate::ml::net::{dense_params, EmotionNet, LayerSummary};

#[derive(Config, Debug)]
pub struct LandmarkNetConfig {
    /// Units in each per-group encoder
    #[config(default = 4)]
    pub group_units: usize,
    #[config(default = 256)]
    pub hidden1:     usize,
    #[config(default = 512)]
    pub hidden2:     usize,
    #[config(default = 16)]
    pub bottleneck:  usize,
    #[config(default = 0.2)]
    pub dropout:     f64,
}

// Batch-norm epsilon and running-average momentum.
// Momentum is the weight of the NEW batch statistic.
const NORM_EPSILON:  f64 = 1e-3;
const NORM_MOMENTUM: f64 = 0.01;

impl LandmarkNetConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> LandmarkNet<B> {
        let group_encoders = FeatureGroup::ARCHITECTURE_ORDER
            .iter()
            .map(|_| LinearConfig::new(COORDS_PER_LANDMARK, self.group_units).init::<B>(device))
            .collect();

        LandmarkNet {
            group_encoders,
            norm: BatchNormConfig::new(self.flattened_len())
                .with_epsilon(NORM_EPSILON)
                .with_momentum(NORM_MOMENTUM)
                .init(device),
            dense1:  LinearConfig::new(self.flattened_len(), self.hidden1).init(device),
            dense2:  LinearConfig::new(self.hidden1, self.hidden2).init(device),
            dense3:  LinearConfig::new(self.hidden2, self.bottleneck).init(device),
            dropout: DropoutConfig::new(self.dropout).init(),
            output:  LinearConfig::new(self.bottleneck, NUM_CLASSES).init(device),
        }
    }

    /// 68 landmarks × group_units encoded features.
    pub fn flattened_len(&self) -> usize {
        NUM_LANDMARKS * self.group_units
    }

    pub fn layer_summary(&self) -> Vec<LayerSummary> {
        let mut layers: Vec<LayerSummary> = FeatureGroup::ARCHITECTURE_ORDER
            .iter()
            .map(|g| {
                LayerSummary::new(
                    format!("dense_{}", g.column()),
                    vec![g.point_count(), self.group_units],
                    dense_params(COORDS_PER_LANDMARK, self.group_units),
                )
            })
            .collect();

        let flat = self.flattened_len();
        layers.push(LayerSummary::new("concatenate", vec![NUM_LANDMARKS, self.group_units], 0));
        layers.push(LayerSummary::new("flatten", vec![flat], 0));
        layers.push(LayerSummary::new("batch_norm", vec![flat], 2 * flat));
        layers.push(LayerSummary::new("dense_sigmoid_1", vec![self.hidden1], dense_params(flat, self.hidden1)));
        layers.push(LayerSummary::new("dense_sigmoid_2", vec![self.hidden2], dense_params(self.hidden1, self.hidden2)));
        layers.push(LayerSummary::new("dense_sigmoid_3", vec![self.bottleneck], dense_params(self.hidden2, self.bottleneck)));
        layers.push(LayerSummary::new("dropout", vec![self.bottleneck], 0));
        layers.push(LayerSummary::new("output_softmax", vec![NUM_CLASSES], dense_params(self.bottleneck, NUM_CLASSES)));
        layers
    }
}

/// Per-feature-group encoders converging into a shared classifier.
#[derive(Module, Debug)]
pub struct LandmarkNet<B: Backend> {
    /// One encoder per group, in FeatureGroup::ARCHITECTURE_ORDER
    pub group_encoders: Vec<Linear<B>>,
    pub norm:           BatchNorm<B, 1>,
    pub dense1:         Linear<B>,
    pub dense2:         Linear<B>,
    pub dense3:         Linear<B>,
    pub dropout:        Dropout,
    pub output:         Linear<B>,
}

impl<B: Backend> EmotionNet<B> for LandmarkNet<B> {
    /// features: [batch, 68, 2] → logits: [batch, 7]
    fn forward(&self, features: Tensor<B, 3>) -> Tensor<B, 2> {
        let [batch_size, _, coords] = features.dims();

        // Each group sees only its own rows; the encoder runs per landmark.
        let encoded: Vec<Tensor<B, 3>> = FeatureGroup::ARCHITECTURE_ORDER
            .iter()
            .zip(&self.group_encoders)
            .map(|(group, encoder)| {
                let rows = features
                    .clone()
                    .slice([0..batch_size, group.architecture_range(), 0..coords]);
                sigmoid(encoder.forward(rows))
            })
            .collect();

        // [batch, 68, units] → [batch, 68 * units]
        let x = Tensor::cat(encoded, 1).flatten::<2>(1, 2);
        let [_, flat] = x.dims();

        // Normalise each of the flattened features as a channel
        let x = self
            .norm
            .forward(x.reshape([batch_size, flat, 1]))
            .reshape([batch_size, flat]);

        let x = sigmoid(self.dense1.forward(x));
        let x = sigmoid(self.dense2.forward(x));
        let x = sigmoid(self.dense3.forward(x));
        let x = self.dropout.forward(x);
        self.output.forward(x)
    }
}
