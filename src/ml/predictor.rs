// ============================================================
// Layer 5 - Predictor
// ============================================================
// Loads the persisted artifact and classifies single images.
//
// The input image goes through the SAME preprocessor transform
// the training pipeline used (resize 28x28, /255, CHW). Feeding
// the model anything else would not fail loudly, it would just
// classify badly, so the transform is shared code, not a copy.

use std::path::Path;

use anyhow::{anyhow, Result};
use burn::{prelude::*, tensor::activation::softmax};

use crate::data::preprocessor::{ImageTensor, CHANNELS, IMAGE_SIZE};
use crate::domain::label_codec::LabelCodec;
use crate::infra::artifact::ArtifactStore;
use crate::ml::model::{ClassifierConfig, FruitClassifier};

type InferBackend = burn::backend::NdArray;

/// One classification result
#[derive(Debug, Clone)]
pub struct Prediction {
    /// Predicted class label
    pub label: String,

    /// Probability of that class, in [0, 1]
    pub confidence: f32,
}

pub struct Predictor {
    model:  FruitClassifier<InferBackend>,
    codec:  LabelCodec,
    device: burn::backend::ndarray::NdArrayDevice,
}

impl Predictor {
    /// Rebuild the trained model from a persisted artifact. The
    /// label mapping stored beside the weights fixes both the
    /// architecture width and the index -> label decoding.
    pub fn from_artifact(store: &ArtifactStore) -> Result<Self> {
        let device = burn::backend::ndarray::NdArrayDevice::default();

        let codec = store.load_codec()?;
        let model = ClassifierConfig::new(codec.num_classes()).init::<InferBackend>(&device);
        let model = store.load_model(model, &device)?;

        tracing::info!("Model loaded ({} classes)", codec.num_classes());
        Ok(Self { model, codec, device })
    }

    /// Decode, preprocess, and classify one image file.
    pub fn classify_file(&self, path: &Path) -> Result<Prediction> {
        let tensor = ImageTensor::open(path)?;
        self.classify(&tensor)
    }

    /// Classify an already-preprocessed image.
    pub fn classify(&self, tensor: &ImageTensor) -> Result<Prediction> {
        // batch of one
        let input = Tensor::<InferBackend, 1>::from_floats(tensor.pixels(), &self.device)
            .reshape([1, CHANNELS, IMAGE_SIZE, IMAGE_SIZE]);

        let logits = self.model.forward(input);
        let probs: Vec<f32> = softmax(logits, 1)
            .into_data()
            .to_vec()
            .map_err(|e| anyhow!("cannot read probabilities off the backend: {e:?}"))?;

        let mut best_index = 0usize;
        let mut best_prob  = f32::NEG_INFINITY;
        for (i, &p) in probs.iter().enumerate() {
            if p > best_prob {
                best_prob  = p;
                best_index = i;
            }
        }

        let label = self
            .codec
            .decode(best_index)
            .ok_or_else(|| anyhow!("class index {best_index} missing from label mapping"))?;

        tracing::debug!("Predicted '{}' with confidence {:.4}", label, best_prob);
        Ok(Prediction {
            label: label.to_string(),
            confidence: best_prob,
        })
    }
}
