// ============================================================
// Layer 3 - LabeledPath Domain Type
// ============================================================
// Represents one sample file on disk together with its class
// label. The label is not stored anywhere in the file itself:
// it is the name of the file's immediate parent directory.
//
// Example:
//   generated_data/cleaned_data/apple/img_004.jpg
//                               ^^^^^
//                               label = "apple"

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// A sample file path paired with the class label encoded by its
/// parent directory name. Immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabeledPath {
    /// Absolute or root-relative path to the sample file
    pub path: PathBuf,

    /// Name of the immediate parent directory
    pub label: String,
}

impl LabeledPath {
    /// Derive the label from the path's parent directory name.
    /// Returns None for paths with no named parent (e.g. "/").
    pub fn from_path(path: impl Into<PathBuf>) -> Option<Self> {
        let path: PathBuf = path.into();
        let label = path
            .parent()
            .and_then(Path::file_name)
            .and_then(|n| n.to_str())?
            .to_string();
        Some(Self { path, label })
    }
}
