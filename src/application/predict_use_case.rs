// ============================================================
// Layer 2 - Predict Use Case
// ============================================================
// Classifies one image with the persisted model:
//
//   1. resolve the input path (given explicitly, or a random
//      pick from the cleaned tree when omitted)
//   2. load the artifact (weights + label mapping)
//   3. preprocess + classify
//
// The random pick is intentionally unseeded: it exists so a bare
// `predict` can demo the model on some image it was trained
// near, not for reproducibility.

use std::path::{Path, PathBuf};

use anyhow::Result;
use rand::seq::SliceRandom;

use crate::domain::errors::PipelineError;
use crate::domain::layout::DataLayout;
use crate::infra::artifact::ArtifactStore;
use crate::ml::predictor::{Prediction, Predictor};

pub struct PredictUseCase {
    layout: DataLayout,
    image:  Option<PathBuf>,
}

impl PredictUseCase {
    pub fn new(layout: DataLayout, image: Option<PathBuf>) -> Self {
        Self { layout, image }
    }

    /// Returns the classified path together with the prediction.
    pub fn execute(&self) -> Result<(PathBuf, Prediction)> {
        let path = match &self.image {
            Some(path) => path.clone(),
            None => pick_random_image(&self.layout.cleaned_dir)?,
        };

        let store = ArtifactStore::new(&self.layout.model_dir);
        let predictor = Predictor::from_artifact(&store)?;

        let prediction = predictor.classify_file(&path)?;
        Ok((path, prediction))
    }
}

/// Pick a random file from a random class directory of the
/// cleaned tree.
fn pick_random_image(cleaned_dir: &Path) -> Result<PathBuf> {
    let mut rng = rand::thread_rng();

    let class_dirs: Vec<PathBuf> = read_entries(cleaned_dir)?
        .into_iter()
        .filter(|p| p.is_dir())
        .collect();
    let class_dir = class_dirs
        .choose(&mut rng)
        .ok_or_else(|| PipelineError::NotFound(cleaned_dir.to_path_buf()))?;

    let files: Vec<PathBuf> = read_entries(class_dir)?
        .into_iter()
        .filter(|p| p.is_file())
        .collect();
    let file = files
        .choose(&mut rng)
        .ok_or_else(|| PipelineError::NotFound(class_dir.clone()))?;

    tracing::info!("No image given, picked '{}'", file.display());
    Ok(file.clone())
}

fn read_entries(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(PipelineError::NotFound(dir.to_path_buf()).into());
    }
    let entries = std::fs::read_dir(dir)
        .map_err(|e| PipelineError::io(dir, e))?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .collect();
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_random_pick_comes_from_a_class_directory() {
        let dir = tempfile::tempdir().unwrap();
        for class in ["apple", "banana"] {
            let d = dir.path().join(class);
            fs::create_dir_all(&d).unwrap();
            fs::write(d.join("img.png"), b"x").unwrap();
        }

        let picked = pick_random_image(dir.path()).unwrap();
        assert!(picked.is_file());
        let class = picked.parent().unwrap().file_name().unwrap();
        assert!(class == "apple" || class == "banana");
    }

    #[test]
    fn test_empty_cleaned_tree_cannot_be_picked_from() {
        let dir = tempfile::tempdir().unwrap();
        assert!(pick_random_image(dir.path()).is_err());
    }

    #[test]
    fn test_missing_cleaned_tree_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(pick_random_image(&dir.path().join("absent")).is_err());
    }
}
