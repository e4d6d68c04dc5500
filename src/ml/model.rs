// ============================================================
// Layer 5 - Convolutional Classifier
// ============================================================
// LeNet-style architecture sized by class count:
//
//   Conv 3->20, 5x5, same padding   + ReLU
//   MaxPool 2x2, stride 2                     28 -> 14
//   Conv 20->50, 5x5, same padding  + ReLU
//   MaxPool 2x2, stride 2                     14 -> 7
//   Flatten                                   50 * 7 * 7 = 2450
//   Linear 2450 -> 500              + ReLU
//   Linear 500 -> num_classes                 (logits)
//
// Loss is cross-entropy over the logits with integer class
// targets; softmax happens inside the loss during training and
// explicitly in the predictor at inference time.
//
// Reference: LeCun et al. (1998) LeNet

use burn::{
    nn::{
        conv::{Conv2d, Conv2dConfig},
        loss::CrossEntropyLossConfig,
        pool::{MaxPool2d, MaxPool2dConfig},
        Linear, LinearConfig, PaddingConfig2d, Relu,
    },
    prelude::*,
    tensor::backend::AutodiffBackend,
};

use crate::data::preprocessor::{CHANNELS, IMAGE_SIZE};

// Feature map edge after two 2x2 pools over a 28-pixel input
const POOLED: usize = IMAGE_SIZE / 4;
const FLAT: usize = 50 * POOLED * POOLED;

// NOTE: #[derive(Config)] already generates Clone and Serialize/Deserialize
// internally - do NOT add them again or you get conflicting impls.
#[derive(Config, Debug)]
pub struct ClassifierConfig {
    /// Number of output classes K
    pub num_classes: usize,
}

impl ClassifierConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> FruitClassifier<B> {
        FruitClassifier {
            conv1: Conv2dConfig::new([CHANNELS, 20], [5, 5])
                .with_padding(PaddingConfig2d::Same)
                .init(device),
            pool1: MaxPool2dConfig::new([2, 2]).with_strides([2, 2]).init(),
            conv2: Conv2dConfig::new([20, 50], [5, 5])
                .with_padding(PaddingConfig2d::Same)
                .init(device),
            pool2: MaxPool2dConfig::new([2, 2]).with_strides([2, 2]).init(),
            fc1: LinearConfig::new(FLAT, 500).init(device),
            fc2: LinearConfig::new(500, self.num_classes).init(device),
            activation: Relu::new(),
        }
    }
}

#[derive(Module, Debug)]
pub struct FruitClassifier<B: Backend> {
    conv1: Conv2d<B>,
    pool1: MaxPool2d,
    conv2: Conv2d<B>,
    pool2: MaxPool2d,
    fc1: Linear<B>,
    fc2: Linear<B>,
    activation: Relu,
}

impl<B: Backend> FruitClassifier<B> {
    /// images: [batch, 3, 28, 28] -> logits: [batch, num_classes]
    pub fn forward(&self, images: Tensor<B, 4>) -> Tensor<B, 2> {
        let x = self.activation.forward(self.conv1.forward(images));
        let x = self.pool1.forward(x);
        let x = self.activation.forward(self.conv2.forward(x));
        let x = self.pool2.forward(x);

        // [batch, 50, 7, 7] -> [batch, 2450]
        let x = x.flatten::<2>(1, 3);

        let x = self.activation.forward(self.fc1.forward(x));
        self.fc2.forward(x)
    }

    /// Forward pass plus cross-entropy loss against integer targets.
    pub fn forward_loss(
        &self,
        images: Tensor<B, 4>,
        targets: Tensor<B, 1, Int>,
    ) -> (Tensor<B, 1>, Tensor<B, 2>)
    where
        B: AutodiffBackend,
    {
        let logits = self.forward(images);
        let loss = CrossEntropyLossConfig::new()
            .init(&logits.device())
            .forward(logits.clone(), targets);
        (loss, logits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::{ndarray::NdArrayDevice, NdArray};

    #[test]
    fn test_logit_shape_tracks_class_count() {
        let device = NdArrayDevice::default();
        for num_classes in [2usize, 5] {
            let model = ClassifierConfig::new(num_classes).init::<NdArray>(&device);
            let images = Tensor::<NdArray, 4>::zeros([4, CHANNELS, IMAGE_SIZE, IMAGE_SIZE], &device);
            let logits = model.forward(images);
            assert_eq!(logits.dims(), [4, num_classes]);
        }
    }

    #[test]
    fn test_single_image_batch() {
        let device = NdArrayDevice::default();
        let model = ClassifierConfig::new(3).init::<NdArray>(&device);
        let images = Tensor::<NdArray, 4>::ones([1, CHANNELS, IMAGE_SIZE, IMAGE_SIZE], &device);
        assert_eq!(model.forward(images).dims(), [1, 3]);
    }
}
