// ============================================================
// Layer 4 - Image Batcher
// ============================================================
// Implements Burn's Batcher trait to stack ImageSamples into
// model-ready tensors.
//
// Input:  Vec of N samples, each a flat [3, 28, 28] buffer
// Output: ImageBatch with
//           images  [N, 3, 28, 28]  Float
//           targets [N]             Int
//
// Stacking is a straight flatten-and-reshape. Every sample has
// the same shape by the preprocessor's contract, so no dynamic
// padding is needed here.

use burn::{data::dataloader::batcher::Batcher, prelude::*};

use crate::data::dataset::ImageSample;
use crate::data::preprocessor::{CHANNELS, IMAGE_SIZE};

// ─── ImageBatch ───────────────────────────────────────────────────────────────
/// A batch of image samples ready for the model forward pass.
/// B is the Burn backend, generic so the same batcher serves the
/// autodiff training backend and the plain validation backend.
#[derive(Debug, Clone)]
pub struct ImageBatch<B: Backend> {
    /// Pixel data, shape [batch_size, 3, 28, 28]
    pub images: Tensor<B, 4>,

    /// Class indices, shape [batch_size]
    pub targets: Tensor<B, 1, Int>,
}

// ─── ImageBatcher ─────────────────────────────────────────────────────────────
/// Holds the target device so tensors land where the model lives.
#[derive(Clone, Debug)]
pub struct ImageBatcher<B: Backend> {
    pub device: B::Device,
}

impl<B: Backend> ImageBatcher<B> {
    pub fn new(device: B::Device) -> Self {
        Self { device }
    }
}

impl<B: Backend> Batcher<ImageSample, ImageBatch<B>> for ImageBatcher<B> {
    fn batch(&self, items: Vec<ImageSample>) -> ImageBatch<B> {
        let batch_size = items.len();

        let image_flat: Vec<f32> = items
            .iter()
            .flat_map(|s| s.image.iter().copied())
            .collect();

        let targets: Vec<i32> = items.iter().map(|s| s.label as i32).collect();

        let images = Tensor::<B, 1>::from_floats(image_flat.as_slice(), &self.device)
            .reshape([batch_size, CHANNELS, IMAGE_SIZE, IMAGE_SIZE]);

        let targets = Tensor::<B, 1, Int>::from_ints(targets.as_slice(), &self.device);

        ImageBatch { images, targets }
    }
}
