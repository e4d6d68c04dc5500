// ============================================================
// Layer 4 - Image Dataset
// ============================================================
// Turns collected (path, label) pairs into an in-memory dataset
// of preprocessed tensors with integer-encoded labels.
//
// The whole dataset is materialised up front: every file is
// decoded and resized once, before training starts. Memory
// bounds scalability (28x28x3 floats per sample), which is the
// accepted trade for a pipeline this size.
//
// Decode failures here are fatal. This path assumes the
// sanitizer already ran over the tree; a bad file at this point
// means the input contract is broken, not that cleanup is due.

use anyhow::Result;
use burn::data::dataset::Dataset;

use crate::data::preprocessor::ImageTensor;
use crate::domain::label_codec::LabelCodec;
use crate::domain::labeled_path::LabeledPath;

/// One preprocessed sample: CHW pixel buffer + encoded class.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageSample {
    /// Flat CHW pixels, length TENSOR_LEN, values in [0, 1]
    pub image: Vec<f32>,

    /// Dense class index from the fitted LabelCodec
    pub label: usize,
}

/// In-memory image dataset. `data[i]` and `labels[i]` travel
/// together inside one ImageSample, so the two sequences can
/// never drift out of step.
pub struct FruitDataset {
    samples: Vec<ImageSample>,
}

impl FruitDataset {
    pub fn new(samples: Vec<ImageSample>) -> Self {
        Self { samples }
    }
}

impl Dataset<ImageSample> for FruitDataset {
    fn get(&self, index: usize) -> Option<ImageSample> {
        self.samples.get(index).cloned()
    }

    fn len(&self) -> usize {
        self.samples.len()
    }
}

/// Fit a label codec over the observed labels and decode every
/// file through the canonical preprocessor.
///
/// Returns the samples in input order plus the fitted codec.
pub fn build_samples(paths: &[LabeledPath]) -> Result<(Vec<ImageSample>, LabelCodec)> {
    let codec = LabelCodec::fit(paths.iter().map(|p| p.label.as_str()));

    let mut samples = Vec::with_capacity(paths.len());
    for lp in paths {
        let tensor = ImageTensor::open(&lp.path)?;
        // every label came out of the set the codec was fitted on
        let Some(label) = codec.encode(&lp.label) else {
            continue;
        };
        samples.push(ImageSample {
            image: tensor.into_pixels(),
            label,
        });
    }

    tracing::info!(
        "Built {} samples across {} classes",
        samples.len(),
        codec.num_classes()
    );
    Ok((samples, codec))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::preprocessor::TENSOR_LEN;
    use image::RgbImage;
    use std::fs;
    use std::path::Path;

    fn write_image(path: &Path, tint: u8) {
        RgbImage::from_fn(12, 9, |x, _| image::Rgb([tint, x as u8 * 5, 40])).save(path).unwrap();
    }

    fn seed_labeled_tree(root: &Path) -> Vec<LabeledPath> {
        let mut out = Vec::new();
        for (class, n, tint) in [("apple", 3usize, 200u8), ("banana", 2usize, 60u8)] {
            let dir = root.join(class);
            fs::create_dir_all(&dir).unwrap();
            for i in 0..n {
                let path = dir.join(format!("{class}_{i}.png"));
                write_image(&path, tint);
                out.push(LabeledPath::from_path(path).unwrap());
            }
        }
        out
    }

    #[test]
    fn test_samples_match_paths_one_to_one() {
        let dir = tempfile::tempdir().unwrap();
        let paths = seed_labeled_tree(dir.path());

        let (samples, codec) = build_samples(&paths).unwrap();
        assert_eq!(samples.len(), paths.len());
        assert_eq!(codec.num_classes(), 2);
        assert!(samples.iter().all(|s| s.image.len() == TENSOR_LEN));
    }

    #[test]
    fn test_labels_are_codec_indices() {
        let dir = tempfile::tempdir().unwrap();
        let paths = seed_labeled_tree(dir.path());

        let (samples, codec) = build_samples(&paths).unwrap();
        let apple = codec.encode("apple").unwrap();
        let banana = codec.encode("banana").unwrap();
        assert_eq!(samples.iter().filter(|s| s.label == apple).count(), 3);
        assert_eq!(samples.iter().filter(|s| s.label == banana).count(), 2);
    }

    #[test]
    fn test_undecodable_file_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let class = dir.path().join("apple");
        fs::create_dir_all(&class).unwrap();
        let bad = class.join("broken.png");
        fs::write(&bad, b"not a png").unwrap();

        let paths = vec![LabeledPath::from_path(bad).unwrap()];
        assert!(build_samples(&paths).is_err());
    }

    #[test]
    fn test_dataset_trait_get_and_len() {
        let samples = vec![
            ImageSample { image: vec![0.0; TENSOR_LEN], label: 0 },
            ImageSample { image: vec![1.0; TENSOR_LEN], label: 1 },
        ];
        let ds = FruitDataset::new(samples);
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.get(1).unwrap().label, 1);
        assert!(ds.get(2).is_none());
    }
}
