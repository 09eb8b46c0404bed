use burn::{
    nn::{
        conv::{Conv2d, Conv2dConfig},
        pool::{MaxPool2d, MaxPool2dConfig},
        Linear, LinearConfig,
    },
    prelude::*,
    tensor::activation::{relu, sigmoid},
};

use crate::domain::emotion::NUM_CLASSES;
use crate::domain::variant::IMAGE_SIDE;
use crate::ml::net::{dense_params, window_output, EmotionNet, LayerSummary};

// NOTE: #[derive(Config)] already generates Clone and Serialize/Deserialize.
#[derive(Config, Debug)]
pub struct PixelNetConfig {
    #[config(default = 48)]
    pub image_side: usize,
    #[config(default = 512)]
    pub hidden:     usize,
    #[config(default = 16)]
    pub bottleneck: usize,
}

/// (out_channels, pool stride) of the three conv stages; every
/// conv and pool window is 2×2.
const CONV_STAGES: [(usize, usize); 3] = [(16, 1), (32, 2), (64, 1)];
const WINDOW: usize = 2;

impl PixelNetConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> PixelNet<B> {
        let conv = |c_in: usize, c_out: usize| {
            Conv2dConfig::new([c_in, c_out], [WINDOW, WINDOW]).init::<B>(device)
        };
        let pool = |stride: usize| {
            MaxPool2dConfig::new([WINDOW, WINDOW])
                .with_strides([stride, stride])
                .init()
        };

        let [(c1, s1), (c2, s2), (c3, s3)] = CONV_STAGES;
        PixelNet {
            conv1:  conv(1, c1),
            pool1:  pool(s1),
            conv2:  conv(c1, c2),
            pool2:  pool(s2),
            conv3:  conv(c2, c3),
            pool3:  pool(s3),
            dense1: LinearConfig::new(self.flattened_len(), self.hidden).init(device),
            dense2: LinearConfig::new(self.hidden, self.bottleneck).init(device),
            output: LinearConfig::new(self.bottleneck, NUM_CLASSES).init(device),
        }
    }

    /// Per-layer output shapes ([channels, h, w]) and parameter counts.
    pub fn layer_summary(&self) -> Vec<LayerSummary> {
        let mut layers   = Vec::new();
        let mut side     = self.image_side;
        let mut channels = 1;

        for (i, (c_out, stride)) in CONV_STAGES.into_iter().enumerate() {
            side = window_output(side, WINDOW, 1);
            let params = channels * c_out * WINDOW * WINDOW + c_out;
            layers.push(LayerSummary::new(format!("conv2d_{}", i + 1), vec![c_out, side, side], params));

            side = window_output(side, WINDOW, stride);
            layers.push(LayerSummary::new(format!("max_pool2d_{}", i + 1), vec![c_out, side, side], 0));
            channels = c_out;
        }

        let flat = channels * side * side;
        layers.push(LayerSummary::new("flatten", vec![flat], 0));
        layers.push(LayerSummary::new("dense_relu", vec![self.hidden], dense_params(flat, self.hidden)));
        layers.push(LayerSummary::new("dense_sigmoid", vec![self.bottleneck], dense_params(self.hidden, self.bottleneck)));
        layers.push(LayerSummary::new("output_softmax", vec![NUM_CLASSES], dense_params(self.bottleneck, NUM_CLASSES)));
        layers
    }

    /// Width of the flattened conv stack output (25600 for 48×48 input).
    pub fn flattened_len(&self) -> usize {
        let mut side = self.image_side;
        for (_, stride) in CONV_STAGES {
            side = window_output(side, WINDOW, 1);
            side = window_output(side, WINDOW, stride);
        }
        CONV_STAGES[CONV_STAGES.len() - 1].0 * side * side
    }
}

/// Convolutional classifier over 48×48 grayscale faces.
#[derive(Module, Debug)]
pub struct PixelNet<B: Backend> {
    pub conv1:  Conv2d<B>,
    pub pool1:  MaxPool2d,
    pub conv2:  Conv2d<B>,
    pub pool2:  MaxPool2d,
    pub conv3:  Conv2d<B>,
    pub pool3:  MaxPool2d,
    pub dense1: Linear<B>,
    pub dense2: Linear<B>,
    pub output: Linear<B>,
}

impl<B: Backend> EmotionNet<B> for PixelNet<B> {
    /// features: [batch, 48, 48] → logits: [batch, 7]
    fn forward(&self, features: Tensor<B, 3>) -> Tensor<B, 2> {
        let [batch_size, height, width] = features.dims();

        // Single grayscale channel: [batch, 1, 48, 48]
        let x = features.reshape([batch_size, 1, height, width]);

        let x = self.pool1.forward(relu(self.conv1.forward(x)));
        let x = self.pool2.forward(relu(self.conv2.forward(x)));
        let x = self.pool3.forward(relu(self.conv3.forward(x)));

        let x = x.flatten::<2>(1, 3);
        let x = relu(self.dense1.forward(x));
        let x = sigmoid(self.dense2.forward(x));
        self.output.forward(x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ml::net::total_params;

    type TestBackend = burn::backend::NdArray;

    #[test]
    fn test_flattened_len() {
        assert_eq!(PixelNetConfig::new().flattened_len(), 64 * 20 * 20);
    }

    #[test]
    fn test_summary_shapes_and_params() {
        let layers = PixelNetConfig::new().layer_summary();
        let shapes: Vec<Vec<usize>> = layers.iter().map(|l| l.shape.clone()).collect();
        assert_eq!(shapes[0], vec![16, 47, 47]);
        assert_eq!(shapes[1], vec![16, 46, 46]);
        assert_eq!(shapes[3], vec![32, 22, 22]);
        assert_eq!(shapes[5], vec![64, 20, 20]);
        assert_eq!(shapes[6], vec![25600]);
        assert_eq!(total_params(&layers), 13_126_455);
    }

    #[test]
    fn test_forward_shape_and_probabilities() {
        let device = Default::default();
        let model: PixelNet<TestBackend> = PixelNetConfig::new().init(&device);
        assert_eq!(model.num_params(), 13_126_455);

        let input = Tensor::<TestBackend, 3>::ones([2, IMAGE_SIDE, IMAGE_SIDE], &device) * 0.5;
        let probs = model.predict_proba(input);
        assert_eq!(probs.dims(), [2, 7]);

        let row_sums: Vec<f32> = probs.sum_dim(1).into_data().convert::<f32>().to_vec().unwrap();
        for s in row_sums {
            approx::assert_abs_diff_eq!(s, 1.0, epsilon = 1e-5);
        }
    }
}
