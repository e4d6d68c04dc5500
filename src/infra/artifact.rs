// ============================================================
// Layer 6 - Artifact Store
// ============================================================
// Persists and restores everything the predictor needs:
//
//   model.*            model weights (Burn CompactRecorder:
//                      compressed MessagePack, type-safe on
//                      load; the recorder owns the extension)
//   train_config.json  hyperparameters of the producing run
//   labels.json        class-index -> label-string mapping
//
// The artifact is written once per training run and overwritten
// on retrain. Concurrent writers are not coordinated: if two
// training runs race on the same directory, the last writer
// wins, file by file. Readers see whichever write finished last.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use burn::{
    prelude::*,
    record::{CompactRecorder, Recorder},
};

use crate::application::train_use_case::TrainConfig;
use crate::domain::errors::PipelineError;
use crate::domain::label_codec::LabelCodec;
use crate::domain::layout::{LABELS_FILE, MODEL_FILE_STEM, TRAIN_CONFIG_FILE};
use crate::ml::model::FruitClassifier;

pub struct ArtifactStore {
    /// Directory holding the artifact files
    dir: PathBuf,
}

impl ArtifactStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Path handed to the recorder; the recorder appends its own
    /// file extension.
    fn model_stem(&self) -> PathBuf {
        self.dir.join(MODEL_FILE_STEM)
    }

    pub fn labels_path(&self) -> PathBuf {
        self.dir.join(LABELS_FILE)
    }

    fn config_path(&self) -> PathBuf {
        self.dir.join(TRAIN_CONFIG_FILE)
    }

    /// True once a trained artifact has been persisted here. The
    /// recorder owns the weights file extension, so look for any
    /// file it derived from the model stem.
    pub fn exists(&self) -> bool {
        let Ok(entries) = fs::read_dir(&self.dir) else {
            return false;
        };
        entries
            .filter_map(|e| e.ok())
            .filter(|e| e.path().is_file())
            .any(|e| {
                e.file_name()
                    .to_str()
                    .is_some_and(|n| n.starts_with(&format!("{MODEL_FILE_STEM}.")))
            })
    }

    /// Persist weights, config, and label mapping, creating the
    /// directory if absent and overwriting any prior artifact.
    pub fn save<B: Backend>(
        &self,
        model: &FruitClassifier<B>,
        config: &TrainConfig,
        codec: &LabelCodec,
    ) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .map_err(|e| PipelineError::io(&self.dir, e))?;

        CompactRecorder::new()
            .record(model.clone().into_record(), self.model_stem())
            .with_context(|| {
                format!("failed to save model weights to '{}'", self.model_stem().display())
            })?;

        let json = serde_json::to_string_pretty(config)?;
        fs::write(self.config_path(), json)
            .map_err(|e| PipelineError::io(self.config_path(), e))?;

        codec.save(&self.labels_path())?;

        tracing::info!("Artifact saved under '{}'", self.dir.display());
        Ok(())
    }

    /// Load the persisted label mapping.
    pub fn load_codec(&self) -> Result<LabelCodec> {
        if !self.exists() {
            return Err(PipelineError::ArtifactNotFound(self.model_stem()).into());
        }
        LabelCodec::load(&self.labels_path())
    }

    /// Restore weights into a freshly initialised model of the
    /// matching architecture.
    pub fn load_model<B: Backend>(
        &self,
        model: FruitClassifier<B>,
        device: &B::Device,
    ) -> Result<FruitClassifier<B>> {
        if !self.exists() {
            return Err(PipelineError::ArtifactNotFound(self.model_stem()).into());
        }

        let record = CompactRecorder::new()
            .load(self.model_stem(), device)
            .with_context(|| {
                format!("cannot load model weights from '{}'", self.model_stem().display())
            })?;

        Ok(model.load_record(record))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ml::model::ClassifierConfig;
    use burn::backend::{ndarray::NdArrayDevice, NdArray};

    #[test]
    fn test_missing_artifact_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path().join("models"));
        assert!(!store.exists());
        assert!(store.load_codec().is_err());

        let device = NdArrayDevice::default();
        let model = ClassifierConfig::new(2).init::<NdArray>(&device);
        assert!(store.load_model(model, &device).is_err());
    }

    #[test]
    fn test_save_then_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path().join("models"));
        let device = NdArrayDevice::default();

        let model = ClassifierConfig::new(2).init::<NdArray>(&device);
        let codec = LabelCodec::fit(["apple", "banana"]);
        let config = TrainConfig::default();

        store.save(&model, &config, &codec).unwrap();
        assert!(store.exists());

        let loaded_codec = store.load_codec().unwrap();
        assert_eq!(loaded_codec, codec);

        let fresh = ClassifierConfig::new(2).init::<NdArray>(&device);
        assert!(store.load_model(fresh, &device).is_ok());
    }
}
