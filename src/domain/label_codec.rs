// ============================================================
// Layer 3 - Label Codec
// ============================================================
// Bijection between label strings (class directory names) and
// dense integer class indices 0..K-1.
//
// The mapping is fitted once per training run from the observed
// label set: unique labels, sorted lexicographically, indexed in
// order. Sorting makes the mapping a function of the label SET,
// not of the sample ordering, so the same directories always
// produce the same indices.
//
// The codec is persisted as JSON next to the model artifact and
// reloaded at prediction time. Without that file the predictor
// would have to re-derive the mapping from whatever directories
// happen to exist, and a class added or removed between training
// and inference would silently shift every index.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Fitted label <-> class-index bijection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelCodec {
    /// Class names in index order: classes[i] is the label for index i
    classes: Vec<String>,
}

impl LabelCodec {
    /// Fit a codec over the observed labels: unique, sorted.
    pub fn fit<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut classes: Vec<String> = labels
            .into_iter()
            .map(|l| l.as_ref().to_string())
            .collect();
        classes.sort();
        classes.dedup();
        Self { classes }
    }

    /// Number of classes K
    pub fn num_classes(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Label string -> class index. None if the label was not seen at fit time.
    pub fn encode(&self, label: &str) -> Option<usize> {
        self.classes.binary_search_by(|c| c.as_str().cmp(label)).ok()
    }

    /// Class index -> label string
    pub fn decode(&self, index: usize) -> Option<&str> {
        self.classes.get(index).map(String::as_str)
    }

    /// One-hot expansion of a class index over the K discovered classes.
    /// Out-of-range indices yield an all-zero vector.
    pub fn one_hot(&self, index: usize) -> Vec<f32> {
        let mut row = vec![0.0; self.classes.len()];
        if let Some(slot) = row.get_mut(index) {
            *slot = 1.0;
        }
        row
    }

    /// All class names in index order
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    // ── Persistence ──────────────────────────────────────────────────────────
    // Saved as a plain JSON array so the file stays readable by hand.

    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.classes)?;
        fs::write(path, json)
            .with_context(|| format!("cannot write label mapping to '{}'", path.display()))?;
        tracing::debug!("Saved {} class labels to '{}'", self.classes.len(), path.display());
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)
            .with_context(|| format!("cannot read label mapping from '{}'", path.display()))?;
        let classes: Vec<String> = serde_json::from_str(&json)?;
        Ok(Self { classes })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_sorts_and_dedups() {
        let codec = LabelCodec::fit(["banana", "apple", "banana", "cherry"]);
        assert_eq!(codec.classes(), &["apple", "banana", "cherry"]);
        assert_eq!(codec.num_classes(), 3);
    }

    #[test]
    fn test_encode_decode_roundtrip() {
        let codec = LabelCodec::fit(["pear", "apple"]);
        for label in ["apple", "pear"] {
            let idx = codec.encode(label).unwrap();
            assert_eq!(codec.decode(idx), Some(label));
        }
        assert_eq!(codec.encode("mango"), None);
        assert_eq!(codec.decode(99), None);
    }

    #[test]
    fn test_one_hot_width_matches_class_count() {
        let codec = LabelCodec::fit(["a", "b", "c", "d"]);
        let row = codec.one_hot(2);
        assert_eq!(row.len(), 4);
        assert_eq!(row, vec![0.0, 0.0, 1.0, 0.0]);
        assert_eq!(row.iter().sum::<f32>(), 1.0);
    }

    #[test]
    fn test_json_roundtrip() {
        let codec = LabelCodec::fit(["apple", "banana"]);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("labels.json");
        codec.save(&path).unwrap();
        let loaded = LabelCodec::load(&path).unwrap();
        assert_eq!(codec, loaded);
    }
}
