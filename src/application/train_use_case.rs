// ============================================================
// Layer 2 - Train Use Case
// ============================================================
// Orchestrates the full training pipeline in order:
//
//   Step 1: Collect labelled image paths   (Layer 4 - data)
//   Step 2: Build tensors + label codec    (Layer 4 - data)
//   Step 3: Split train/validation         (Layer 4 - data)
//   Step 4: Construct augmentation policy  (Layer 4 - data)
//   Step 5: Run the training loop          (Layer 5 - ml)
//   Step 6: Write metrics CSV              (Layer 6 - infra)
//   Step 7: Render the history chart       (Layer 6 - infra)
//
// The trainer itself persists the model artifact (Step 5 side
// effect); this use case owns everything around it.

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

use crate::data::{
    augment::AugmentationPolicy,
    collector::{collect_labeled_paths, SHUFFLE_SEED},
    dataset::{build_samples, FruitDataset},
    splitter::split_train_val,
};
use crate::domain::layout::DataLayout;
use crate::infra::artifact::ArtifactStore;
use crate::infra::report::render_history;
use crate::ml::trainer::run_training;

// ─── Training Configuration ──────────────────────────────────────────────────
// All hyperparameters of a training run. Serialisable so the
// trainer can persist it next to the artifact for the record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainConfig {
    /// Samples per optimizer step
    pub batch_size: usize,

    /// Full passes over the training set
    pub epochs: usize,

    /// Adam learning rate before decay
    pub initial_lr: f64,

    /// Seed for the collector shuffle, the split, and every
    /// augmentation draw
    pub seed: u64,

    /// Fraction of samples that go to training (rest validate)
    pub train_fraction: f64,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            batch_size:     32,
            epochs:         25,
            initial_lr:     1e-3,
            seed:           SHUFFLE_SEED,
            train_fraction: 0.75,
        }
    }
}

// ─── TrainUseCase ─────────────────────────────────────────────────────────────
pub struct TrainUseCase {
    layout: DataLayout,
    config: TrainConfig,
}

impl TrainUseCase {
    pub fn new(layout: DataLayout, config: TrainConfig) -> Self {
        Self { layout, config }
    }

    /// Execute the full training pipeline end to end.
    pub fn execute(&self) -> Result<()> {
        let cfg = &self.config;

        // ── Step 1: Collect labelled image paths ──────────────────────────────
        tracing::info!("Loading images from '{}'", self.layout.cleaned_dir.display());
        let paths = collect_labeled_paths(&self.layout.cleaned_dir, cfg.seed)?;
        if paths.is_empty() {
            return Err(anyhow!(
                "no images under '{}' (run `preprocess` first?)",
                self.layout.cleaned_dir.display()
            ));
        }

        // ── Step 2: Decode into tensors, fit the label codec ──────────────────
        let (samples, codec) = build_samples(&paths)?;

        // ── Step 3: Train / validation split ──────────────────────────────────
        let (train_samples, val_samples) =
            split_train_val(samples, cfg.train_fraction, cfg.seed);
        tracing::info!(
            "Split: {} train, {} validation",
            train_samples.len(),
            val_samples.len()
        );
        let train_set = FruitDataset::new(train_samples);
        let val_set   = FruitDataset::new(val_samples);

        // ── Step 4: Augmentation policy ───────────────────────────────────────
        // Applied per batch draw inside the trainer, never baked
        // into the stored dataset.
        let policy = AugmentationPolicy::default();

        // ── Step 5: Run the training loop ─────────────────────────────────────
        let store = ArtifactStore::new(&self.layout.model_dir);
        let history = run_training(cfg, train_set, val_set, &policy, &codec, &store)?;

        // ── Step 6: Metrics CSV ───────────────────────────────────────────────
        history.write_csv(&self.layout.history_csv_path())?;

        // ── Step 7: History chart ─────────────────────────────────────────────
        render_history(&history, &self.layout.plot_path())?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ml::predictor::Predictor;
    use image::RgbImage;
    use std::fs;
    use std::path::Path;

    /// Two visually distinct classes, enough samples for a
    /// meaningful split.
    fn seed_cleaned_tree(root: &Path) {
        for (class, base) in [("apple", [200u8, 30u8, 30u8]), ("banana", [30u8, 30u8, 200u8])] {
            let dir = root.join(class);
            fs::create_dir_all(&dir).unwrap();
            for i in 0..20u8 {
                let img = RgbImage::from_fn(16, 16, |x, y| {
                    image::Rgb([
                        base[0].saturating_add(x as u8 + i),
                        base[1].saturating_add(y as u8),
                        base[2].saturating_add(i),
                    ])
                });
                img.save(dir.join(format!("{class}_{i:02}.png"))).unwrap();
            }
        }
    }

    fn tiny_config() -> TrainConfig {
        TrainConfig {
            batch_size: 8,
            epochs:     2,
            ..TrainConfig::default()
        }
    }

    #[test]
    fn test_end_to_end_train_then_predict() {
        let dir = tempfile::tempdir().unwrap();
        let layout = DataLayout {
            raw_dir:     dir.path().join("raw"),
            cleaned_dir: dir.path().join("cleaned"),
            model_dir:   dir.path().join("models"),
            plot_dir:    dir.path().join("plots"),
        };
        seed_cleaned_tree(&layout.cleaned_dir);

        let config = tiny_config();
        TrainUseCase::new(layout.clone(), config.clone())
            .execute()
            .unwrap();

        // artifact, chart, and CSV all exist
        let store = ArtifactStore::new(&layout.model_dir);
        assert!(store.exists());
        assert!(layout.plot_path().is_file());

        let csv = fs::read_to_string(layout.history_csv_path()).unwrap();
        // header plus exactly one row per epoch
        assert_eq!(csv.lines().count(), config.epochs + 1);

        // the predictor can load the artifact and classify a
        // training image to a known label
        let predictor = Predictor::from_artifact(&store).unwrap();
        let sample = layout.cleaned_dir.join("apple/apple_00.png");
        let prediction = predictor.classify_file(&sample).unwrap();
        assert!(["apple", "banana"].contains(&prediction.label.as_str()));
        assert!((0.0..=1.0).contains(&prediction.confidence));
    }

    #[test]
    fn test_empty_cleaned_tree_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let layout = DataLayout {
            raw_dir:     dir.path().join("raw"),
            cleaned_dir: dir.path().join("cleaned"),
            model_dir:   dir.path().join("models"),
            plot_dir:    dir.path().join("plots"),
        };
        fs::create_dir_all(&layout.cleaned_dir).unwrap();

        let result = TrainUseCase::new(layout, tiny_config()).execute();
        assert!(result.is_err());
    }
}
